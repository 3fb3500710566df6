//! Handles to submitted writes

use std::future::Future;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::Result;

/// A write that has been submitted and may still be running
///
/// Dropping the handle detaches the write; it still runs to completion. Await
/// [`WriteHandle::wait`] to learn its outcome.
pub struct WriteHandle {
    state: State,
}

enum State {
    Pending(JoinHandle<Result<()>>),
    Ready(Result<()>),
}

impl WriteHandle {
    /// Run `write` on `runtime`
    pub fn spawn<F>(runtime: &Handle, write: F) -> Self
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            state: State::Pending(runtime.spawn(write)),
        }
    }

    /// A write that already finished with `result`
    pub fn ready(result: Result<()>) -> Self {
        Self {
            state: State::Ready(result),
        }
    }

    pub fn is_finished(&self) -> bool {
        match &self.state {
            State::Pending(join) => join.is_finished(),
            State::Ready(_) => true,
        }
    }

    /// Wait for the write and return its outcome
    pub async fn wait(self) -> Result<()> {
        match self.state {
            State::Pending(join) => join.await?,
            State::Ready(result) => result,
        }
    }
}

impl std::fmt::Debug for WriteHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteHandle")
            .field("finished", &self.is_finished())
            .finish()
    }
}
