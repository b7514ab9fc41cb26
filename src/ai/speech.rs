//! Speech-to-text capture. Platforms that can transcribe microphone
//! audio implement `SpeechToText`; a session without one treats
//! dictation as unsupported.
use anyhow::{Error, Result};
use tokio::sync::mpsc;

#[derive(Clone, Debug, PartialEq)]
pub enum SpeechEvent {
    /// An incremental transcript. Interim fragments are superseded by
    /// the next event, final fragments are kept.
    Transcript { is_final: bool, fragment: String },
    Error(String),
    End,
}

/// Stops a capture when called or dropped, whichever comes first.
pub struct StopHandle(Option<Box<dyn FnOnce() + Send>>);

impl StopHandle {
    pub fn new(stop: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(stop)))
    }

    pub fn stop(&mut self) {
        if let Some(stop) = self.0.take() {
            stop();
        }
    }
}

impl Drop for StopHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A running capture. Events arrive until the capture is stopped, the
/// platform ends it, or it's dropped.
pub struct Capture {
    events: mpsc::UnboundedReceiver<SpeechEvent>,
    stop: StopHandle,
}

impl Capture {
    pub fn new(
        events: mpsc::UnboundedReceiver<SpeechEvent>,
        stop: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            events,
            stop: StopHandle::new(stop),
        }
    }

    /// Split into the event stream and the handle that ends it so they
    /// can live on different tasks.
    pub fn into_parts(self) -> (mpsc::UnboundedReceiver<SpeechEvent>, StopHandle) {
        (self.events, self.stop)
    }
}

pub trait SpeechToText: Send + Sync {
    /// Start capturing for a BCP 47 `locale` such as "en-US".
    fn start(&self, locale: &str) -> Result<Capture, Error>;
}
