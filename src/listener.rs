//! Event listeners.

use std::{borrow::Cow, future::Future};

use crate::{
    realtime::{Envelope, Event},
    Error,
};

/// Listener can be fed by [EventStream::dispatch](crate::realtime::EventStream::dispatch).
#[async_trait::async_trait]
pub trait Listener: Send {
    /// listener name
    fn name(&self) -> Cow<'static, str>;
    /// callback will be execute for every successful push
    async fn on_data(&mut self, envelope: Envelope);
    /// callback will be execute for every envelope with `successful: false`
    async fn on_error(&mut self, envelope: Envelope) {
        log::warn!(
            "Listener {} ignored error envelope: {}",
            self.name(),
            envelope.as_value()
        );
    }
    /// callback will be execute once when the session dies
    async fn on_fatal(&mut self, error: Error);
}

#[async_trait::async_trait]
impl<F, Fut> Listener for F
where
    F: FnMut(Event) -> Fut + Send,
    Fut: Future<Output = ()> + Send,
{
    fn name(&self) -> Cow<'static, str> {
        "Anonymous FnMut Listener".into()
    }

    async fn on_data(&mut self, envelope: Envelope) {
        self(Event::Data(envelope)).await
    }

    async fn on_error(&mut self, envelope: Envelope) {
        self(Event::Error(envelope)).await
    }

    async fn on_fatal(&mut self, error: Error) {
        self(Event::Fatal(error)).await
    }
}
