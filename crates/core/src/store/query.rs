//! Live task list query

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{BoxStream, Stream, StreamExt};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::task::Task;
use crate::Result;

/// One full read of the task table
pub type Snapshot = Result<Vec<Task>>;

/// Subscription to the task table
///
/// Yields the current snapshot first, then a fresh one after every committed
/// write. A slow reader skips intermediate snapshots but always ends on the
/// latest. Dropping the query unsubscribes.
pub struct TaskQuery {
    inner: BoxStream<'static, Snapshot>,
}

impl TaskQuery {
    pub(crate) fn new(receiver: watch::Receiver<Snapshot>) -> Self {
        Self {
            inner: WatchStream::new(receiver).boxed(),
        }
    }
}

impl Stream for TaskQuery {
    type Item = Snapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl std::fmt::Debug for TaskQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQuery").finish_non_exhaustive()
    }
}
