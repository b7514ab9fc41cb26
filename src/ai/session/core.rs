use std::sync::Arc;

use anyhow::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::models::{
    Attachment, ChatMessage, Draft, ImageFile, ImageOrigin, MAX_ATTACHMENT_BYTES, MessageId,
    MessagePart, Role, Transcript,
};
use crate::ai::speech::{SpeechEvent, SpeechToText, StopHandle};
use crate::catalog::Language;
use crate::core::i18n;
use crate::gemini::{Assistant, AssistantRequest};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendRejection {
    Busy,
    EmptyDraft,
    Closed,
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum SessionError {
    #[error("Attachment is {size} bytes, the limit is {max}")]
    AttachmentTooLarge { size: usize, max: usize },
    #[error("Speech recognition is not available")]
    SpeechUnsupported,
    #[error("Speech capture failed: {0}")]
    SpeechCaptureFailed(String),
    #[error("Assistant request failed: {0}")]
    AssistantRequestFailed(String),
    #[error("Send rejected: {0:?}")]
    SendRejected(SendRejection),
    #[error("Session is closed")]
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Sending { placeholder: MessageId },
}

/// Something that happened outside the session and needs to be folded
/// back into it.
#[derive(Debug)]
pub enum SessionEvent {
    Completion {
        turn: MessageId,
        result: Result<String, Error>,
    },
    Dictation {
        generation: u64,
        event: SpeechEvent,
    },
}

/// The visible effect of applying a `SessionEvent`.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionUpdate {
    ReplyReceived(MessageId),
    ReplyFailed { id: MessageId, error: SessionError },
    DraftChanged,
    DictationStopped,
}

struct ActiveCapture {
    stop: StopHandle,
    forward: JoinHandle<()>,
}

impl Drop for ActiveCapture {
    fn drop(&mut self) {
        self.stop.stop();
        self.forward.abort();
    }
}

pub struct SessionBuilder {
    assistant: Arc<dyn Assistant>,
    speech: Option<Arc<dyn SpeechToText>>,
    language: Language,
    system_instruction: Option<String>,
}

impl SessionBuilder {
    pub fn new(assistant: Arc<dyn Assistant>) -> Self {
        Self {
            assistant,
            speech: None,
            language: Language::default(),
            system_instruction: None,
        }
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn speech(mut self, speech: Arc<dyn SpeechToText>) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn system_instruction(mut self, instruction: &str) -> Self {
        self.system_instruction = Some(instruction.to_string());
        self
    }

    pub fn build(self) -> Session {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::new(
            Role::Assistant,
            vec![MessagePart::text(&i18n::t(self.language, i18n::RAFIQI_WELCOME))],
        ));
        Session {
            assistant: self.assistant,
            speech: self.speech,
            language: self.language,
            system_instruction: self.system_instruction,
            transcript,
            draft: Draft::default(),
            state: RequestState::Idle,
            closed: false,
            speech_unsupported_reported: false,
            generation: 0,
            capture: None,
            events_tx,
            events_rx,
        }
    }
}

/// One conversation with the assistant. The session owns its transcript
/// and draft outright; replies and dictation arrive as `SessionEvent`s
/// that are applied on the owner's task.
pub struct Session {
    assistant: Arc<dyn Assistant>,
    speech: Option<Arc<dyn SpeechToText>>,
    language: Language,
    system_instruction: Option<String>,
    transcript: Transcript,
    draft: Draft,
    state: RequestState,
    closed: bool,
    speech_unsupported_reported: bool,
    generation: u64,
    capture: Option<ActiveCapture>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl Session {
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_dictating(&self) -> bool {
        self.draft.is_dictating()
    }

    pub fn speech_supported(&self) -> bool {
        self.speech.is_some()
    }

    /// True once `SpeechUnsupported` has been returned so callers can
    /// show it a single time.
    pub fn speech_unsupported_reported(&self) -> bool {
        self.speech_unsupported_reported
    }

    pub fn can_send(&self) -> bool {
        !self.closed && self.state == RequestState::Idle && self.draft.is_sendable()
    }

    pub fn set_draft_text(&mut self, value: &str) {
        if self.closed {
            return;
        }
        self.draft.set_text(value);
    }

    pub fn attach_image(&mut self, image: ImageFile) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        if image.size() > MAX_ATTACHMENT_BYTES {
            return Err(SessionError::AttachmentTooLarge {
                size: image.size(),
                max: MAX_ATTACHMENT_BYTES,
            });
        }
        self.draft.attachment = Some(Attachment::new(image));
        Ok(())
    }

    pub fn clear_attachment(&mut self) {
        if self.closed {
            return;
        }
        self.draft.attachment = None;
    }

    /// Start or stop dictation. Returns whether dictation is now active.
    pub fn toggle_dictation(&mut self) -> Result<bool, SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        if self.draft.is_dictating() {
            self.stop_dictation();
            return Ok(false);
        }

        let Some(speech) = self.speech.clone() else {
            self.speech_unsupported_reported = true;
            return Err(SessionError::SpeechUnsupported);
        };
        let capture = speech.start(self.language.speech_locale()).map_err(|e| {
            tracing::warn!("Failed to start dictation: {}", e);
            SessionError::SpeechCaptureFailed(e.to_string())
        })?;

        self.generation += 1;
        let generation = self.generation;
        let (mut events, stop) = capture.into_parts();
        let tx = self.events_tx.clone();
        let forward = tokio::spawn(async move {
            loop {
                let event = events.recv().await.unwrap_or(SpeechEvent::End);
                let finished = matches!(event, SpeechEvent::Error(_) | SpeechEvent::End);
                if tx.send(SessionEvent::Dictation { generation, event }).is_err() || finished {
                    break;
                }
            }
        });

        self.capture = Some(ActiveCapture { stop, forward });
        self.draft.begin_dictation(generation);
        tracing::debug!("Dictation started ({})", self.language.speech_locale());
        Ok(true)
    }

    fn stop_dictation(&mut self) {
        if self.capture.take().is_some() {
            tracing::debug!("Dictation stopped");
        }
        self.draft.end_dictation();
    }

    /// Send the draft. The user message and an empty pending reply are
    /// appended, the draft is reset and the request runs in the
    /// background. Returns the id of the pending reply.
    pub fn send(&mut self) -> Result<MessageId, SessionError> {
        if self.closed {
            return Err(SessionError::SendRejected(SendRejection::Closed));
        }
        if self.state != RequestState::Idle {
            return Err(SessionError::SendRejected(SendRejection::Busy));
        }
        if !self.draft.is_sendable() {
            return Err(SessionError::SendRejected(SendRejection::EmptyDraft));
        }

        self.stop_dictation();
        let draft = std::mem::take(&mut self.draft);
        let text = draft.text.trim();

        let mut parts = Vec::new();
        let mut request = AssistantRequest::default();
        if !text.is_empty() {
            parts.push(MessagePart::text(text));
            request.text = Some(text.to_string());
        }
        if let Some(attachment) = &draft.attachment {
            parts.push(MessagePart::Image {
                reference: attachment.preview.clone(),
                origin: ImageOrigin::Local,
            });
            request.image = Some(attachment.image.to_inline());
        }
        request.system_instruction = self.system_instruction.clone();

        self.transcript.push(ChatMessage::new(Role::User, parts));
        let placeholder = ChatMessage::placeholder();
        let turn = placeholder.id;
        self.transcript.push(placeholder);
        self.state = RequestState::Sending { placeholder: turn };
        tracing::debug!("Sending turn {}", turn);

        let assistant = Arc::clone(&self.assistant);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = assistant.generate(&request).await;
            // The session may be gone by now
            let _ = tx.send(SessionEvent::Completion { turn, result });
        });

        Ok(turn)
    }

    /// Fold an event into the session. Events are dropped once the
    /// session is closed or when they belong to a turn or capture that
    /// is no longer current.
    pub fn apply(&mut self, event: SessionEvent) -> Option<SessionUpdate> {
        if self.closed {
            tracing::debug!("Session closed, discarding {:?}", event);
            return None;
        }
        match event {
            SessionEvent::Completion { turn, result } => self.complete(turn, result),
            SessionEvent::Dictation { generation, event } => self.dictate(generation, event),
        }
    }

    fn complete(&mut self, turn: MessageId, result: Result<String, Error>) -> Option<SessionUpdate> {
        match self.state {
            RequestState::Sending { placeholder } if placeholder == turn => {}
            _ => {
                tracing::debug!("Discarding stale completion for turn {}", turn);
                return None;
            }
        }
        self.state = RequestState::Idle;

        match result {
            Ok(text) => {
                self.transcript.resolve(turn, vec![MessagePart::text(&text)]);
                Some(SessionUpdate::ReplyReceived(turn))
            }
            Err(e) => {
                tracing::error!("Assistant request failed: {:?}", e);
                let apology = i18n::t(self.language, i18n::RAFIQI_ERROR);
                self.transcript.resolve(turn, vec![MessagePart::text(&apology)]);
                Some(SessionUpdate::ReplyFailed {
                    id: turn,
                    error: SessionError::AssistantRequestFailed(e.to_string()),
                })
            }
        }
    }

    fn dictate(&mut self, generation: u64, event: SpeechEvent) -> Option<SessionUpdate> {
        if self.draft.dictation_generation() != Some(generation) {
            return None;
        }
        match event {
            SpeechEvent::Transcript { is_final, fragment } => {
                self.draft.apply_transcript(is_final, &fragment);
                Some(SessionUpdate::DraftChanged)
            }
            SpeechEvent::Error(e) => {
                tracing::warn!("Dictation error: {}", e);
                self.stop_dictation();
                Some(SessionUpdate::DictationStopped)
            }
            SpeechEvent::End => {
                self.stop_dictation();
                Some(SessionUpdate::DictationStopped)
            }
        }
    }

    /// Apply every event that has already arrived without waiting.
    pub fn process_pending(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            if let Some(update) = self.apply(event) {
                updates.push(update);
            }
        }
        updates
    }

    /// Wait for the next event that changes the session. Returns `None`
    /// once the session is closed. Waits indefinitely when nothing is in
    /// flight.
    pub async fn next_update(&mut self) -> Option<SessionUpdate> {
        while !self.closed {
            let event = self.events_rx.recv().await?;
            if let Some(update) = self.apply(event) {
                return Some(update);
            }
        }
        None
    }

    /// Stop dictation and ignore anything that arrives afterwards. An
    /// outstanding request isn't cancelled, its reply is dropped.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.stop_dictation();
        self.closed = true;
        tracing::debug!("Session closed");
    }
}
