//! The transcript and draft models behind a chat session.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gemini::InlineImage;

/// Largest image that can be attached to a message (4 MiB).
pub const MAX_ATTACHMENT_BYTES: usize = 4 * 1024 * 1024;

pub const LOCAL_REFERENCE_PREFIX: &str = "local:";

pub type MessageId = Uuid;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageOrigin {
    /// Only valid while the session that created it is alive.
    Local,
    Remote,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessagePart {
    Text { content: String },
    Image { reference: String, origin: ImageOrigin },
}

impl MessagePart {
    pub fn text(content: &str) -> Self {
        MessagePart::Text {
            content: content.to_string(),
        }
    }

    pub fn is_local_image(&self) -> bool {
        matches!(
            self,
            MessagePart::Image {
                origin: ImageOrigin::Local,
                ..
            }
        )
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub parts: Vec<MessagePart>,
    pub timestamp: DateTime<Utc>,
    pub pending: bool,
}

impl ChatMessage {
    pub fn new(role: Role, parts: Vec<MessagePart>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            parts,
            timestamp: Utc::now(),
            pending: false,
        }
    }

    /// An empty assistant message reserving the slot for a reply.
    pub fn placeholder() -> Self {
        Self {
            pending: true,
            ..Self::new(Role::Assistant, vec![])
        }
    }

    /// All text parts joined by newlines.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                MessagePart::Text { content } => Some(content.as_str()),
                MessagePart::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The message as it may be stored: local image references are
    /// dropped and pending or emptied messages aren't stored at all.
    pub fn persistable(&self) -> Option<ChatMessage> {
        if self.pending {
            return None;
        }
        let parts: Vec<MessagePart> = self
            .parts
            .iter()
            .filter(|p| !p.is_local_image())
            .cloned()
            .collect();
        if parts.is_empty() {
            return None;
        }
        Some(ChatMessage {
            parts,
            ..self.clone()
        })
    }
}

/// Ordered record of a conversation. Append-only except for resolving
/// the pending placeholder in place.
#[derive(Default, Debug, Clone)]
pub struct Transcript(Vec<ChatMessage>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.0.last()
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.0.iter().find(|m| m.id == id)
    }

    pub fn position(&self, id: MessageId) -> Option<usize> {
        self.0.iter().position(|m| m.id == id)
    }

    pub fn pending_count(&self) -> usize {
        self.0.iter().filter(|m| m.pending).count()
    }

    /// Append `msg`, clamping its timestamp so the transcript never goes
    /// back in time.
    pub fn push(&mut self, mut msg: ChatMessage) {
        if let Some(last) = self.0.last()
            && msg.timestamp < last.timestamp
        {
            msg.timestamp = last.timestamp;
        }
        self.0.push(msg)
    }

    /// Fill in the pending message `id` with `parts`. Id, position and
    /// timestamp are kept. Returns false if there's no such pending
    /// message.
    pub fn resolve(&mut self, id: MessageId, parts: Vec<MessagePart>) -> bool {
        match self.0.iter_mut().find(|m| m.id == id && m.pending) {
            Some(msg) => {
                msg.parts = parts;
                msg.pending = false;
                true
            }
            None => false,
        }
    }
}

/// An image picked by the user, held in memory until it's sent.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: &str, mime_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            bytes,
        }
    }

    /// Read an image from disk. At most one byte past
    /// `MAX_ATTACHMENT_BYTES` is read, which is enough for an oversized
    /// file to be rejected when it's attached.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        File::open(path)?
            .take(MAX_ATTACHMENT_BYTES as u64 + 1)
            .read_to_end(&mut bytes)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self::new(&name, mime_type_for(path), bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn to_inline(&self) -> InlineImage {
        InlineImage::from_bytes(&self.mime_type, &self.bytes)
    }
}

fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Attachment {
    pub image: ImageFile,
    /// Session-local reference used to show the image before and after
    /// it's sent.
    pub preview: String,
}

impl Attachment {
    pub fn new(image: ImageFile) -> Self {
        Self {
            image,
            preview: format!("{}{}", LOCAL_REFERENCE_PREFIX, Uuid::new_v4()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Dictation {
    pub generation: u64,
    prefix: String,
    finals: String,
    interim: String,
}

impl Dictation {
    fn render(&self) -> String {
        format!("{}{}{}", self.prefix, self.finals, self.interim)
    }
}

/// What the user is composing before it's sent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Draft {
    pub text: String,
    pub attachment: Option<Attachment>,
    pub(crate) dictation: Option<Dictation>,
}

impl Draft {
    pub fn is_sendable(&self) -> bool {
        !self.text.trim().is_empty() || self.attachment.is_some()
    }

    pub fn is_dictating(&self) -> bool {
        self.dictation.is_some()
    }

    pub fn set_text(&mut self, value: &str) {
        self.text = value.to_string();
        if let Some(dictation) = self.dictation.as_mut() {
            *dictation = Dictation {
                generation: dictation.generation,
                prefix: value.to_string(),
                ..Default::default()
            };
        }
    }

    pub(crate) fn begin_dictation(&mut self, generation: u64) {
        self.dictation = Some(Dictation {
            generation,
            prefix: self.text.clone(),
            ..Default::default()
        });
    }

    /// Stop dictating, keeping whatever text has accumulated.
    pub(crate) fn end_dictation(&mut self) {
        self.dictation = None;
    }

    pub(crate) fn dictation_generation(&self) -> Option<u64> {
        self.dictation.as_ref().map(|d| d.generation)
    }

    /// Merge a transcript update: the text becomes the prior text
    /// followed by every final fragment so far and the latest interim.
    pub(crate) fn apply_transcript(&mut self, is_final: bool, fragment: &str) {
        if let Some(dictation) = self.dictation.as_mut() {
            if is_final {
                dictation.finals.push_str(fragment);
                dictation.interim.clear();
            } else {
                dictation.interim = fragment.to_string();
            }
            self.text = dictation.render();
        }
    }

    pub fn clear(&mut self) {
        *self = Draft::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_message_serialization() {
        let msg = ChatMessage::new(
            Role::User,
            vec![
                MessagePart::text("What is this?"),
                MessagePart::Image {
                    reference: String::from("https://example.com/a.jpg"),
                    origin: ImageOrigin::Remote,
                },
            ],
        );
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["parts"][0]["type"], "text");
        assert_eq!(value["parts"][0]["content"], "What is this?");
        assert_eq!(value["parts"][1]["type"], "image");
        assert_eq!(value["parts"][1]["origin"], "remote");
        assert_eq!(value["pending"], false);
    }

    #[test]
    fn test_persistable_strips_local_images() {
        let msg = ChatMessage::new(
            Role::User,
            vec![
                MessagePart::text("Look"),
                MessagePart::Image {
                    reference: String::from("local:abc"),
                    origin: ImageOrigin::Local,
                },
            ],
        );
        let stored = msg.persistable().unwrap();
        assert_eq!(stored.id, msg.id);
        assert_eq!(stored.parts, vec![MessagePart::text("Look")]);

        let image_only = ChatMessage::new(
            Role::User,
            vec![MessagePart::Image {
                reference: String::from("local:abc"),
                origin: ImageOrigin::Local,
            }],
        );
        assert!(image_only.persistable().is_none());
        assert!(ChatMessage::placeholder().persistable().is_none());
    }

    #[test]
    fn test_transcript_timestamps_never_decrease() {
        let mut transcript = Transcript::new();
        let first = ChatMessage::new(Role::User, vec![MessagePart::text("a")]);
        let mut earlier = ChatMessage::new(Role::Assistant, vec![MessagePart::text("b")]);
        earlier.timestamp = first.timestamp - Duration::seconds(30);
        transcript.push(first.clone());
        transcript.push(earlier);

        let messages = transcript.messages();
        assert!(messages[1].timestamp >= messages[0].timestamp);
        assert_eq!(messages[1].timestamp, first.timestamp);
    }

    #[test]
    fn test_resolve_only_touches_pending() {
        let mut transcript = Transcript::new();
        let user = ChatMessage::new(Role::User, vec![MessagePart::text("hi")]);
        let placeholder = ChatMessage::placeholder();
        let (user_id, placeholder_id) = (user.id, placeholder.id);
        transcript.push(user);
        transcript.push(placeholder);

        assert!(!transcript.resolve(user_id, vec![MessagePart::text("x")]));
        assert!(transcript.resolve(placeholder_id, vec![MessagePart::text("hello")]));
        assert_eq!(transcript.position(placeholder_id), Some(1));
        assert_eq!(transcript.pending_count(), 0);
        // Already resolved
        assert!(!transcript.resolve(placeholder_id, vec![]));
    }

    #[test]
    fn test_image_file_from_path() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("sphinx.JPG");
        std::fs::write(&path, b"\xff\xd8\xff")?;

        let image = ImageFile::from_path(&path)?;
        assert_eq!(image.name, "sphinx.JPG");
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.size(), 3);
        assert_eq!(image.to_inline().data, "/9j/");
        Ok(())
    }

    #[test]
    fn test_image_file_from_path_stops_past_limit() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("huge.png");
        File::create(&path)?.set_len(256 * 1024 * 1024)?;

        let image = ImageFile::from_path(&path)?;
        assert_eq!(image.size(), MAX_ATTACHMENT_BYTES + 1);
        assert_eq!(image.mime_type, "image/png");
        Ok(())
    }

    #[test]
    fn test_attachment_preview_is_local() {
        let a = Attachment::new(ImageFile::new("a.png", "image/png", vec![1]));
        let b = Attachment::new(ImageFile::new("a.png", "image/png", vec![1]));
        assert!(a.preview.starts_with(LOCAL_REFERENCE_PREFIX));
        assert_ne!(a.preview, b.preview);
    }

    #[test]
    fn test_dictation_merge_keeps_prefix() {
        let mut draft = Draft::default();
        draft.set_text("Hello ");
        draft.begin_dictation(1);
        draft.apply_transcript(false, "wor");
        assert_eq!(draft.text, "Hello wor");
        draft.apply_transcript(true, "world");
        assert_eq!(draft.text, "Hello world");
        draft.apply_transcript(false, " again");
        assert_eq!(draft.text, "Hello world again");
        draft.end_dictation();
        assert_eq!(draft.text, "Hello world again");
        assert!(!draft.is_dictating());
    }

    #[test]
    fn test_set_text_while_dictating_rebases() {
        let mut draft = Draft::default();
        draft.begin_dictation(7);
        draft.apply_transcript(true, "bonjour");
        draft.set_text("Hi ");
        draft.apply_transcript(false, "there");
        assert_eq!(draft.text, "Hi there");
        assert_eq!(draft.dictation_generation(), Some(7));
    }

    #[test]
    fn test_sendable() {
        let mut draft = Draft::default();
        assert!(!draft.is_sendable());
        draft.set_text("   ");
        assert!(!draft.is_sendable());
        draft.attachment = Some(Attachment::new(ImageFile::new("a.png", "image/png", vec![])));
        assert!(draft.is_sendable());
        draft.clear();
        assert!(!draft.is_sendable());
    }
}
