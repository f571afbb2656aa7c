//! Subscription helpers for bridging service channels into iced
//!
//! Converts a crossbeam channel receiver into an iced `Subscription`, so
//! batches published by a service thread arrive as messages in the update
//! loop.

use std::any::TypeId;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{Receiver, TryRecvError};
use iced::advanced::subscription::{self, EventStream, Hasher, Recipe};
use iced::futures::stream::BoxStream;
use iced::Subscription;

/// Recipe for polling a crossbeam receiver as an iced subscription.
struct ChannelRecipe<T> {
    /// Unique ID for subscription identity
    id: u64,
    /// The receiver to poll
    receiver: Arc<Receiver<T>>,
}

impl<T: Send + 'static> Recipe for ChannelRecipe<T> {
    type Output = T;

    fn hash(&self, state: &mut Hasher) {
        TypeId::of::<Self>().hash(state);
        self.id.hash(state);
    }

    fn stream(self: Box<Self>, _input: EventStream) -> BoxStream<'static, Self::Output> {
        let receiver = self.receiver;

        Box::pin(iced::futures::stream::unfold(receiver, |rx| async move {
            loop {
                match rx.try_recv() {
                    Ok(item) => return Some((item, rx)),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => return None,
                }

                // 1ms keeps latency invisible without busy-spinning
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        }))
    }
}

/// Create an iced subscription from a crossbeam channel receiver.
///
/// The receiver is polled with a small sleep between attempts; the stream
/// ends when the sending side disconnects. Use `.map()` to convert the
/// yielded items into your message type.
pub fn channel_subscription<T>(receiver: Arc<Receiver<T>>) -> Subscription<T>
where
    T: Send + 'static,
{
    // The allocation address distinguishes receivers of the same type
    let id = Arc::as_ptr(&receiver) as u64;

    subscription::from_recipe(ChannelRecipe { id, receiver })
}
