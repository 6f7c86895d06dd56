//! Mock push source, emits a fixed payload on a fixed cadence without any network.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use snafu::prelude::*;
use tokio::time::Instant;

use crate::{
    realtime::{Envelope, EventSender, EventStream},
    PushSource,
};

/// a zero period timer is not allowed, the fastest mock ticks every millisecond
const MIN_DELAY: Duration = Duration::from_millis(1);

/// Error when loading mock payload
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), module(error), context(suffix(false)))]
pub enum LoadMockError {
    /// read payload file failed
    #[snafu(display("read mock payload {} failed: {source}", path.display()))]
    Read {
        /// payload file
        path: PathBuf,
        /// source error
        source: std::io::Error,
    },

    /// payload file is not json
    #[snafu(display("parse mock payload {} failed: {source}", path.display()))]
    Parse {
        /// payload file
        path: PathBuf,
        /// source error
        source: serde_json::Error,
    },
}

/// Mock source, see [module doc](self)
#[derive(Debug, Clone)]
pub struct MockSource {
    payload: Envelope,
    delay: Duration,
}

impl MockSource {
    /// emit `payload` every `delay`
    pub fn new(payload: serde_json::Value, delay: Duration) -> Self {
        Self {
            payload: Envelope::new(payload),
            delay: delay.max(MIN_DELAY),
        }
    }

    /// emit the json content of file `path` every `delay`
    pub fn from_file<P: AsRef<Path>>(path: P, delay: Duration) -> Result<Self, LoadMockError> {
        let path = path.as_ref();
        let content = std::fs::read(path).context(error::Read { path })?;
        let payload = serde_json::from_slice(&content).context(error::Parse { path })?;

        log::debug!("Loaded mock payload from {}", path.display());

        Ok(Self::new(payload, delay))
    }

    /// the payload emitted on every tick
    pub fn payload(&self) -> &Envelope {
        &self.payload
    }

    /// Start emitting in background until the returned stream is stopped or dropped.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(self) -> EventStream {
        log::info!("Starting mock push source, delay {:?}", self.delay);

        let (sender, stream) = EventSender::new();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + self.delay, self.delay);

            loop {
                tokio::select! {
                    biased;

                    _ = sender.closed() => {
                        log::debug!("Mock event stream closed, stop");
                        break;
                    }

                    _ = ticker.tick() => {
                        log::debug!("Sending mock data");

                        if !sender.data(self.payload.clone()).await {
                            log::debug!("Send mock event failed, receive side dropped, stop");
                            break;
                        }
                    }
                }
            }
        });

        stream
    }
}

impl PushSource for MockSource {
    fn start(self) -> EventStream {
        MockSource::start(self)
    }
}
