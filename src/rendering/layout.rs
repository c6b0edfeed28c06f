//! Mockup surface layout
//!
//! Stacks the header bar, message rows, and footer vertically and positions
//! every message according to the theme's layout mode. Text width is
//! estimated from the fixed glyph advance of the built-in font, the same
//! model the rasterizer draws with.

use crate::session::{Message, Sender};
use crate::theme::{MessageStyle, ThemeStyles};
use crate::Viewport;

pub const HEADER_HEIGHT: u32 = 64;
pub const FOOTER_HEIGHT: u32 = 64;
/// Outer padding of the message area
pub const SURFACE_PAD: u32 = 16;
/// Vertical gap between message rows
pub const ROW_GAP: u32 = 8;

/// Text scale used for message bodies and names
pub const BODY_SCALE: u32 = 2;
/// Text scale used for timestamps and secondary labels
pub const META_SCALE: u32 = 1;

/// Horizontal advance of one glyph cell at the given text scale
pub const fn char_advance(scale: u32) -> u32 {
    6 * scale
}

/// Line height at the given text scale
pub const fn line_height(scale: u32) -> u32 {
    10 * scale
}

pub const BUBBLE_PAD_X: u32 = 10;
pub const BUBBLE_PAD_Y: u32 = 8;
/// Counterpart avatar beside a bubble
const SIDE_AVATAR: u32 = 32;
/// Avatar in an avatar-row line
const ROW_AVATAR: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }
}

/// One positioned message
#[derive(Debug, Clone)]
pub enum MessageRow {
    /// Two-sided chat bubble
    Bubble {
        /// Index into the conversation
        index: usize,
        bubble: Rect,
        /// Wrapped body lines
        lines: Vec<String>,
        /// Counterpart avatar beside the bubble, when the theme shows one
        avatar: Option<Rect>,
        /// Anchor of the right-aligned timestamp, when the theme shows one
        timestamp: Option<(i32, i32)>,
    },
    /// Name + avatar header row followed by plain text
    AvatarRow {
        index: usize,
        avatar: Rect,
        /// Anchor of the bold name; the timestamp trails it on the baseline
        name_pos: (i32, i32),
        body_pos: (i32, i32),
        lines: Vec<String>,
    },
}

/// The positioned mockup surface tree
#[derive(Debug, Clone)]
pub struct MockupLayout {
    pub width: u32,
    pub height: u32,
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
    pub rows: Vec<MessageRow>,
    /// Render the centered empty-state hint
    pub empty_state: bool,
}

/// Wrap `text` into lines of at most `max_chars` glyphs
///
/// Words longer than a full line are hard-broken so no line overflows.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if !cur.is_empty() && cur.chars().count() + 1 + word_len > max_chars {
            lines.push(std::mem::take(&mut cur));
        }
        if word_len > max_chars {
            // Hard-break an unbroken run across lines
            for ch in word.chars() {
                if cur.chars().count() == max_chars {
                    lines.push(std::mem::take(&mut cur));
                }
                cur.push(ch);
            }
        } else {
            if !cur.is_empty() {
                cur.push(' ');
            }
            cur.push_str(word);
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Compute the mockup surface layout for a conversation
pub fn layout_mockup(
    messages: &[Message],
    styles: &ThemeStyles,
    viewport: Viewport,
) -> MockupLayout {
    let width = viewport.width;
    let inner_width = width - 2 * SURFACE_PAD;
    let mut y = (HEADER_HEIGHT + SURFACE_PAD) as i32;
    let mut rows = Vec::with_capacity(messages.len());

    for (index, msg) in messages.iter().enumerate() {
        let row = match &styles.messages {
            MessageStyle::Bubble(bubble_layout) => {
                let show_avatar =
                    bubble_layout.show_counterpart_avatar && msg.sender == Sender::Them;
                let avatar_space = if show_avatar { SIDE_AVATAR + ROW_GAP } else { 0 };
                let max_bubble_w = (inner_width - avatar_space) * 85 / 100;
                let max_chars =
                    ((max_bubble_w - 2 * BUBBLE_PAD_X) / char_advance(BODY_SCALE)) as usize;
                let lines = wrap_text(&msg.text, max_chars);

                let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
                let mut text_w = longest as u32 * char_advance(BODY_SCALE);
                if bubble_layout.show_timestamp {
                    // Timestamp row must fit too
                    text_w = text_w.max(msg.timestamp.chars().count() as u32
                        * char_advance(META_SCALE));
                }
                let bubble_w = (text_w + 2 * BUBBLE_PAD_X).min(max_bubble_w);
                let mut bubble_h = lines.len() as u32 * line_height(BODY_SCALE) + 2 * BUBBLE_PAD_Y;
                if bubble_layout.show_timestamp {
                    bubble_h += line_height(META_SCALE) + 2;
                }

                let bubble_x = match msg.sender {
                    Sender::Me => (width - SURFACE_PAD - bubble_w) as i32,
                    Sender::Them => (SURFACE_PAD + avatar_space) as i32,
                };
                let bubble = Rect::new(bubble_x, y, bubble_w, bubble_h);

                let avatar = show_avatar.then(|| {
                    // Bottom-aligned with the bubble
                    Rect::new(
                        SURFACE_PAD as i32,
                        bubble.bottom() - SIDE_AVATAR as i32,
                        SIDE_AVATAR,
                        SIDE_AVATAR,
                    )
                });

                let timestamp = bubble_layout.show_timestamp.then(|| {
                    let ts_w = msg.timestamp.chars().count() as u32 * char_advance(META_SCALE);
                    (
                        bubble.right() - (BUBBLE_PAD_X + ts_w) as i32,
                        bubble.y
                            + (BUBBLE_PAD_Y + lines.len() as u32 * line_height(BODY_SCALE) + 2)
                                as i32,
                    )
                });

                y = bubble.bottom() + ROW_GAP as i32;
                MessageRow::Bubble { index, bubble, lines, avatar, timestamp }
            }
            MessageStyle::AvatarRow(_) => {
                let avatar = Rect::new(SURFACE_PAD as i32, y, ROW_AVATAR, ROW_AVATAR);
                let text_x = avatar.right() + 12;
                let max_chars =
                    ((width as i32 - text_x - SURFACE_PAD as i32).max(char_advance(BODY_SCALE) as i32)
                        as u32
                        / char_advance(BODY_SCALE)) as usize;
                let lines = wrap_text(&msg.text, max_chars);

                // Timestamp trails the name on the same baseline; paint offsets
                // it by the rendered name width.
                let name_pos = (text_x, y);
                let body_y = y + line_height(BODY_SCALE) as i32 + 2;
                let body_pos = (text_x, body_y);

                let text_h =
                    line_height(BODY_SCALE) + 2 + lines.len() as u32 * line_height(BODY_SCALE);
                let row_h = text_h.max(ROW_AVATAR);
                y += (row_h + ROW_GAP + 4) as i32;

                MessageRow::AvatarRow { index, avatar, name_pos, body_pos, lines }
            }
        };
        rows.push(row);
    }

    let content_bottom = y as u32 + SURFACE_PAD;
    let height = (content_bottom + FOOTER_HEIGHT).max(viewport.height);

    MockupLayout {
        width,
        height,
        header: Rect::new(0, 0, width, HEADER_HEIGHT),
        body: Rect::new(
            0,
            HEADER_HEIGHT as i32,
            width,
            height - HEADER_HEIGHT - FOOTER_HEIGHT,
        ),
        footer: Rect::new(0, (height - FOOTER_HEIGHT) as i32, width, FOOTER_HEIGHT),
        rows,
        empty_state: messages.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use crate::Device;

    fn msg(id: u64, sender: Sender, text: &str) -> Message {
        Message { id, text: text.to_string(), sender, timestamp: "10:00".to_string() }
    }

    #[test]
    fn wrap_respects_limit() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 10);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.concat().replace(' ', ""), "thequickbrownfoxjumpsoverthelazydog");
    }

    #[test]
    fn wrap_hard_breaks_long_runs() {
        let lines = wrap_text(&"x".repeat(25), 10);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn bubbles_align_by_sender() {
        let styles = Theme::Whatsapp.styles();
        let messages = vec![msg(1, Sender::Them, "hey"), msg(2, Sender::Me, "hey")];
        let tree = layout_mockup(&messages, &styles, Device::Mobile.viewport());

        match (&tree.rows[0], &tree.rows[1]) {
            (
                MessageRow::Bubble { bubble: them, .. },
                MessageRow::Bubble { bubble: me, .. },
            ) => {
                assert_eq!(them.x, SURFACE_PAD as i32);
                assert_eq!(me.right(), (375 - SURFACE_PAD) as i32);
            }
            _ => panic!("expected bubble rows"),
        }
    }

    #[test]
    fn counterpart_avatar_only_on_their_side() {
        let styles = Theme::Messenger.styles();
        let messages = vec![msg(1, Sender::Them, "hi"), msg(2, Sender::Me, "hi")];
        let tree = layout_mockup(&messages, &styles, Device::Mobile.viewport());

        match &tree.rows[0] {
            MessageRow::Bubble { avatar, .. } => assert!(avatar.is_some()),
            _ => panic!("expected bubble"),
        }
        match &tree.rows[1] {
            MessageRow::Bubble { avatar, .. } => assert!(avatar.is_none()),
            _ => panic!("expected bubble"),
        }
    }

    #[test]
    fn hidden_timestamp_shrinks_bubble() {
        let them = vec![msg(1, Sender::Them, "hello there")];
        let with_ts = layout_mockup(&them, &Theme::Whatsapp.styles(), Device::Mobile.viewport());
        let without_ts =
            layout_mockup(&them, &Theme::Snapchat.styles(), Device::Mobile.viewport());

        let h = |tree: &MockupLayout| match &tree.rows[0] {
            MessageRow::Bubble { bubble, timestamp, .. } => (bubble.height, timestamp.is_some()),
            _ => panic!("expected bubble"),
        };
        let (h_with, ts_with) = h(&with_ts);
        let (h_without, ts_without) = h(&without_ts);
        assert!(ts_with && !ts_without);
        assert!(h_with > h_without);
    }

    #[test]
    fn avatar_row_mode_positions_rows() {
        let styles = Theme::Discord.styles();
        let messages = vec![msg(1, Sender::Them, "hello"), msg(2, Sender::Me, "hi")];
        let tree = layout_mockup(&messages, &styles, Device::Mobile.viewport());

        for row in &tree.rows {
            match row {
                MessageRow::AvatarRow { avatar, body_pos, .. } => {
                    assert_eq!(avatar.x, SURFACE_PAD as i32);
                    assert!(body_pos.0 > avatar.right());
                }
                _ => panic!("expected avatar rows"),
            }
        }
    }

    #[test]
    fn surface_grows_with_long_conversations() {
        let styles = Theme::Whatsapp.styles();
        let messages: Vec<Message> = (0..60)
            .map(|i| msg(i, if i % 2 == 0 { Sender::Them } else { Sender::Me }, "line"))
            .collect();
        let tree = layout_mockup(&messages, &styles, Device::Mobile.viewport());
        assert!(tree.height > 667);
        assert_eq!(tree.footer.bottom(), tree.height as i32);
    }

    #[test]
    fn empty_conversation_flags_empty_state() {
        let tree = layout_mockup(&[], &Theme::Whatsapp.styles(), Device::Mobile.viewport());
        assert!(tree.empty_state);
        assert_eq!(tree.height, 667);
    }
}
