//! Async adapter over the outbound notification.

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio_stream::Stream;

/// Stream of "interfaces may have changed" notifications.
///
/// Created together with its feeding reference by
/// [`CallbackRef::channel`](super::CallbackRef::channel). Each invocation of
/// the reference yields one `()` item, in invocation order. The stream ends
/// when every clone of the reference has been dropped, which happens once
/// the owning session is stopped and the caller releases its own copy.
///
/// # Example
///
/// ```
/// use netwatch_bridge::watch::CallbackRef;
/// use tokio_stream::StreamExt;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (callback, mut stream) = CallbackRef::channel();
/// callback.invoke();
/// drop(callback);
///
/// assert_eq!(stream.next().await, Some(()));
/// assert_eq!(stream.next().await, None);
/// # }
/// ```
#[derive(Debug)]
pub struct ChangeStream {
    receiver: mpsc::UnboundedReceiver<()>,
}

impl ChangeStream {
    pub(super) const fn new(receiver: mpsc::UnboundedReceiver<()>) -> Self {
        Self { receiver }
    }
}

impl Stream for ChangeStream {
    type Item = ();

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
