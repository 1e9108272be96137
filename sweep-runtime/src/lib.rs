//! Tokio runtime plus the root cancellation token for tweet-sweep processes.
//!
//! Every in-flight search runs under a child of the root token, so shutting the
//! runtime down stops pagination between (or during) page fetches.
use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct SweepHandle {
    inner: Handle,
    cancel: CancellationToken,
}

pub struct SweepRuntime {
    runtime: Runtime,
    cancel: CancellationToken,
}

impl SweepRuntime {
    /// Build a multi-thread runtime. `worker_threads` of `None` keeps tokio's default.
    ///
    /// ```
    /// use sweep_runtime::SweepRuntime;
    /// use std::time::Duration;
    ///
    /// let runtime = SweepRuntime::build("doctest-runtime", Some(1)).expect("runtime builds");
    /// assert_eq!(runtime.block_on(async { 2 + 2 }), 4);
    /// runtime.shutdown(Duration::from_millis(10));
    /// ```
    pub fn build(thread_name: &str, worker_threads: Option<usize>) -> Result<Self> {
        let mut builder = Builder::new_multi_thread();
        builder.enable_all().thread_name(thread_name);

        if let Some(workers) = worker_threads {
            builder.worker_threads(workers.max(1));
        }

        let runtime = builder.build()?;
        Ok(Self {
            runtime,
            cancel: CancellationToken::new(),
        })
    }

    pub fn handle(&self) -> SweepHandle {
        SweepHandle {
            inner: self.runtime.handle().clone(),
            cancel: self.cancel.clone(),
        }
    }

    pub fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }

    /// Cancel outstanding work and shut the runtime down.
    ///
    /// ```
    /// use sweep_runtime::SweepRuntime;
    /// use std::time::Duration;
    ///
    /// let runtime = SweepRuntime::build("shutdown-example", Some(1)).unwrap();
    /// let cancel = runtime.handle().cancellation();
    /// runtime.shutdown(Duration::from_millis(5));
    /// assert!(cancel.is_cancelled());
    /// ```
    pub fn shutdown(self, graceful: Duration) {
        self.cancel.cancel();
        self.runtime.shutdown_timeout(graceful);
    }
}

impl SweepHandle {
    pub fn spawn<F, T>(&self, fut: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.inner.spawn(fut)
    }

    /// The root token; cancelling it stops every search.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// A token that fires with the root but can also be cancelled on its own.
    ///
    /// ```
    /// use sweep_runtime::SweepRuntime;
    ///
    /// let runtime = SweepRuntime::build("child-example", Some(1)).unwrap();
    /// let handle = runtime.handle();
    /// let child = handle.child_token();
    /// child.cancel();
    /// assert!(!handle.cancellation().is_cancelled());
    /// ```
    pub fn child_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    /// Resolve on Ctrl-C, or when something else cancelled the root first.
    pub async fn cancel_on_ctrl_c(&self) {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    tracing::warn!(error = %e, "runtime.ctrl_c.listen_failed");
                }
                tracing::info!("runtime.shutdown.requested");
                self.cancel.cancel();
            }
            _ = self.cancel.cancelled() => {}
        }
    }
}
