//! Events pushed to the owning application.

use std::task::Poll;

use enum_as_inner::EnumAsInner;
use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;

use super::message::Envelope;
use crate::{listener::Listener, Error};

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Event delivered by a push source
#[derive(Debug, EnumAsInner)]
pub enum Event {
    /// a successful push
    Data(Envelope),
    /// envelope with `successful: false`, the session continues
    Error(Envelope),
    /// the session is dead, nothing follows this event
    Fatal(Error),
}

/// Stream of [Event]s produced by a running source.
///
/// The source stops producing when this stream is dropped or [stopped](EventStream::stop).
#[derive(Debug)]
pub struct EventStream {
    pub(crate) rx: mpsc::Receiver<Event>,
}

impl Stream for EventStream {
    type Item = Event;

    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl EventStream {
    /// stop the source, events already produced but not yet received are discarded
    pub fn stop(&mut self) {
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
    }

    /// feed every event to `listener` until the stream ends, then give the listener back
    pub async fn dispatch<L: Listener>(mut self, mut listener: L) -> L {
        log::debug!("Dispatching events to listener {}", listener.name());

        while let Some(event) = self.next().await {
            match event {
                Event::Data(envelope) => listener.on_data(envelope).await,
                Event::Error(envelope) => listener.on_error(envelope).await,
                Event::Fatal(err) => listener.on_fatal(err).await,
            }
        }

        log::debug!("Event stream of listener {} ended", listener.name());

        listener
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventSender {
    tx: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new() -> (Self, EventStream) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        (Self { tx }, EventStream { rx })
    }

    /// false means receive side dropped
    async fn send(&self, event: Event) -> bool {
        self.tx.send(event).await.is_ok()
    }

    pub async fn data(&self, envelope: Envelope) -> bool {
        log::trace!("Send data event to event stream");
        self.send(Event::Data(envelope)).await
    }

    pub async fn error(&self, envelope: Envelope) -> bool {
        log::trace!("Send error event to event stream");
        self.send(Event::Error(envelope)).await
    }

    pub async fn fatal(self, err: Error) {
        log::trace!("Send fatal event to event stream");
        self.send(Event::Fatal(err)).await;
    }

    /// resolves once the receive side is dropped or stopped
    pub async fn closed(&self) {
        self.tx.closed().await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_events_in_order() {
        let (sender, mut stream) = EventSender::new();

        assert!(sender.data(Envelope::new(json!([1]))).await);
        assert!(sender.error(Envelope::new(json!([2]))).await);
        drop(sender);

        assert_eq!(
            stream.next().await.unwrap().into_data().unwrap(),
            Envelope::new(json!([1]))
        );
        assert_eq!(
            stream.next().await.unwrap().into_error().unwrap(),
            Envelope::new(json!([2]))
        );
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stop_discards_and_closes() {
        let (sender, mut stream) = EventSender::new();

        assert!(sender.data(Envelope::new(json!([1]))).await);
        stream.stop();

        assert!(!sender.data(Envelope::new(json!([2]))).await);
        sender.closed().await;
        assert!(stream.next().await.is_none());
    }
}
