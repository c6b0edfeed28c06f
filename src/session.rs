//! In-memory editor session
//!
//! Owns the conversation, the counterpart profile, and the display
//! preferences. All mutations are synchronous; nothing here persists past
//! the process.

use chrono::Local;

use crate::avatar::AvatarSlot;
use crate::theme::Theme;
use crate::Device;

/// Fixed two-value sender tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Me,
    Them,
}

/// One conversation entry
///
/// Immutable after creation; the timestamp is formatted once when the
/// message is appended and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: String,
}

/// The whole UI session state tree
pub struct Session {
    messages: Vec<Message>,
    next_id: u64,
    /// Pending input buffer, consumed by [`Session::submit`]
    pub input: String,
    their_name: String,
    pub avatar: AvatarSlot,
    theme: Theme,
    device: Device,
    show_watermark: bool,
}

impl Session {
    pub fn new() -> Self {
        Session {
            messages: Vec::new(),
            next_id: 1,
            input: String::new(),
            their_name: "Pepe".to_string(),
            avatar: AvatarSlot::default(),
            theme: Theme::Whatsapp,
            device: Device::Mobile,
            show_watermark: true,
        }
    }

    /// Append a message from `sender`
    ///
    /// Whitespace-only text is silently ignored and returns `None`;
    /// otherwise the new message gets a fresh id, a local `%H:%M` timestamp,
    /// and lands at the end of the conversation. The pending input buffer is
    /// cleared whenever a message is created.
    pub fn append(&mut self, sender: Sender, text: &str) -> Option<u64> {
        let timestamp = Local::now().format("%H:%M").to_string();
        self.append_stamped(sender, text, timestamp)
    }

    /// [`Session::append`] with a caller-supplied timestamp
    ///
    /// Used by deterministic fixtures; behaves identically otherwise.
    pub fn append_stamped(
        &mut self,
        sender: Sender,
        text: &str,
        timestamp: impl Into<String>,
    ) -> Option<u64> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message {
            id,
            text: trimmed.to_string(),
            sender,
            timestamp: timestamp.into(),
        });
        self.input.clear();
        Some(id)
    }

    /// Append the pending input buffer as a message from `sender`
    pub fn submit(&mut self, sender: Sender) -> Option<u64> {
        let text = std::mem::take(&mut self.input);
        self.append(sender, &text)
    }

    /// Remove the message with the given id
    ///
    /// Idempotent: an absent id is a no-op. Returns whether a message was
    /// removed.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        self.messages.len() != before
    }

    /// Destructively empty the conversation, gated on `confirm`
    ///
    /// The confirmation callback is supplied by the UI layer (a y/n prompt
    /// in the bundled binary). Declining leaves the conversation untouched.
    /// Returns whether the conversation was cleared.
    pub fn clear_all(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !self.messages.is_empty() && confirm() {
            self.messages.clear();
            true
        } else {
            false
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn set_device(&mut self, device: Device) {
        self.device = device;
    }

    pub fn their_name(&self) -> &str {
        &self.their_name
    }

    pub fn set_their_name(&mut self, name: impl Into<String>) {
        self.their_name = name.into();
    }

    pub fn show_watermark(&self) -> bool {
        self.show_watermark
    }

    pub fn set_show_watermark(&mut self, show: bool) {
        self.show_watermark = show;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
