//! Chat reply stream contracts and in-memory stream utilities.
//!
//! ```rust
//! use pprovider::{BoxedEventStream, StreamEvent, VecEventStream};
//!
//! let stream = VecEventStream::new(vec![Ok(StreamEvent::TextDelta("hello".into()))]);
//! let _boxed: BoxedEventStream<'static> = Box::pin(stream);
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    TextDelta(String),
    /// A frame that could not be decoded and was dropped.
    ChunkSkipped { reason: String },
}

/// Provider stream contract.
///
/// Invariants for consumers:
/// - Events are emitted in wire order.
/// - An `Err` item is terminal; nothing follows it.
/// - Once the stream yields `None`, it must not yield additional items.
/// - Streams are single-use. A new reply needs a new call.
pub trait ModelEventStream: Stream<Item = Result<StreamEvent, ProviderError>> + Send {}

impl<T> ModelEventStream for T where T: Stream<Item = Result<StreamEvent, ProviderError>> + Send {}

pub type BoxedEventStream<'a> = Pin<Box<dyn ModelEventStream + 'a>>;

#[derive(Debug)]
pub struct VecEventStream {
    events: VecDeque<Result<StreamEvent, ProviderError>>,
}

impl VecEventStream {
    pub fn new(events: Vec<Result<StreamEvent, ProviderError>>) -> Self {
        Self {
            events: events.into(),
        }
    }

    pub fn text(fragments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(
            fragments
                .into_iter()
                .map(|fragment| Ok(StreamEvent::TextDelta(fragment.into())))
                .collect(),
        )
    }
}

impl Stream for VecEventStream {
    type Item = Result<StreamEvent, ProviderError>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<StreamEvent, ProviderError>>> {
        Poll::Ready(self.events.pop_front())
    }
}
