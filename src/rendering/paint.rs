//! Display-list painting
//!
//! Flattens a positioned layout tree against the resolved theme styles into
//! a list of drawing commands. Commands are plain data; everything
//! conditional per theme was already resolved into the style records.

use crate::rendering::layout::{
    char_advance, line_height, MessageRow, MockupLayout, BODY_SCALE, BUBBLE_PAD_X, BUBBLE_PAD_Y,
    META_SCALE, SURFACE_PAD,
};
use crate::rendering::layout::Rect;
use crate::session::{Sender, Session};
use crate::theme::{Color, Corner, MessageStyle, ThemeStyles};
use crate::Device;

/// One drawing command, in paint order
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        rect: Rect,
        color: Color,
    },
    RoundedRect {
        rect: Rect,
        radius: u32,
        /// Corner left squared off (bubble tail)
        square: Option<Corner>,
        fill: Color,
        border: Option<Color>,
    },
    /// Horizontal two-stop gradient
    GradientRect {
        rect: Rect,
        from: Color,
        to: Color,
    },
    /// Repeating dot pattern across `rect`
    DotGrid {
        rect: Rect,
        spacing: u32,
        dot_radius: u32,
        color: Color,
    },
    /// Solid filled circle inscribed in `rect`
    Disc {
        rect: Rect,
        fill: Color,
    },
    /// The session avatar, circle-clipped into `rect`
    AvatarDisc {
        rect: Rect,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        scale: u32,
        color: Color,
    },
    /// 1px horizontal rule
    HLine {
        x0: i32,
        x1: i32,
        y: i32,
        color: Color,
    },
}

fn faded(c: Color, a: u8) -> Color {
    Color::rgba(c.r, c.g, c.b, a)
}

fn centered_x(width: u32, text: &str, scale: u32) -> i32 {
    (width as i32 - (text.chars().count() as u32 * char_advance(scale)) as i32) / 2
}

/// Flatten the mockup into a display list
pub fn paint_mockup(
    tree: &MockupLayout,
    session: &Session,
    styles: &ThemeStyles,
) -> Vec<PaintCommand> {
    let mut ops = Vec::new();
    let full = Rect::new(0, 0, tree.width, tree.height);

    // Container: the desktop frame gets rounded corners and a border
    match session.device() {
        Device::Desktop => ops.push(PaintCommand::RoundedRect {
            rect: full,
            radius: 8,
            square: None,
            fill: styles.container.background,
            border: Some(Color::hex(0xd1d5db)),
        }),
        Device::Mobile => {
            ops.push(PaintCommand::SolidRect { rect: full, color: styles.container.background })
        }
    }

    if styles.container.dotted_background {
        ops.push(PaintCommand::DotGrid {
            rect: tree.body,
            spacing: 20,
            dot_radius: 1,
            color: Color::hex(0xcbd5e1),
        });
    }

    if session.show_watermark() {
        let text = "MOCKCHAT";
        let scale = 4;
        ops.push(PaintCommand::Text {
            x: centered_x(tree.width, text, scale),
            y: tree.body.y + (tree.body.height as i32 - line_height(scale) as i32) / 2,
            text: text.to_string(),
            scale,
            color: faded(styles.container.text, 10),
        });
    }

    paint_header(&mut ops, tree, session, styles);

    if tree.empty_state {
        paint_empty_state(&mut ops, tree, styles);
    }

    for row in &tree.rows {
        match (row, &styles.messages) {
            (MessageRow::Bubble { index, bubble, lines, avatar, timestamp }, MessageStyle::Bubble(b)) => {
                let msg = &session.messages()[*index];
                let style = match msg.sender {
                    Sender::Me => &b.me,
                    Sender::Them => &b.them,
                };

                if let Some(rect) = avatar {
                    ops.push(PaintCommand::AvatarDisc { rect: *rect });
                }

                if let Some(edge) = style.accent_edge {
                    ops.push(PaintCommand::SolidRect { rect: *bubble, color: style.fill });
                    ops.push(PaintCommand::SolidRect {
                        rect: Rect::new(bubble.x, bubble.y, 3, bubble.height),
                        color: edge,
                    });
                } else {
                    ops.push(PaintCommand::RoundedRect {
                        rect: *bubble,
                        radius: style.radius.min(bubble.height / 2),
                        square: style.tail,
                        fill: style.fill,
                        border: style.border,
                    });
                }

                let text_x = bubble.x + BUBBLE_PAD_X as i32;
                let mut text_y = bubble.y + BUBBLE_PAD_Y as i32;
                for line in lines {
                    ops.push(PaintCommand::Text {
                        x: text_x,
                        y: text_y,
                        text: line.clone(),
                        scale: BODY_SCALE,
                        color: style.text,
                    });
                    text_y += line_height(BODY_SCALE) as i32;
                }

                if let Some((ts_x, ts_y)) = timestamp {
                    let color = match (msg.sender, b.me_timestamp_tint) {
                        (Sender::Me, Some(tint)) => tint,
                        _ => faded(style.text, 150),
                    };
                    ops.push(PaintCommand::Text {
                        x: *ts_x,
                        y: *ts_y,
                        text: msg.timestamp.clone(),
                        scale: META_SCALE,
                        color,
                    });
                }
            }
            (MessageRow::AvatarRow { index, avatar, name_pos, body_pos, lines }, MessageStyle::AvatarRow(r)) => {
                let msg = &session.messages()[*index];

                match msg.sender {
                    Sender::Them => ops.push(PaintCommand::AvatarDisc { rect: *avatar }),
                    Sender::Me => {
                        ops.push(PaintCommand::Disc { rect: *avatar, fill: r.me_avatar_fill });
                        let badge = "ME";
                        ops.push(PaintCommand::Text {
                            x: avatar.x
                                + (avatar.width as i32
                                    - (badge.len() as u32 * char_advance(META_SCALE)) as i32)
                                    / 2,
                            y: avatar.y + (avatar.height as i32 - 7) / 2,
                            text: badge.to_string(),
                            scale: META_SCALE,
                            color: Color::WHITE,
                        });
                    }
                }

                let (name, name_color) = match msg.sender {
                    Sender::Me => ("Me".to_string(), r.me_name),
                    Sender::Them => (session.their_name().to_string(), r.them_name),
                };
                let name_w = name.chars().count() as u32 * char_advance(BODY_SCALE);
                ops.push(PaintCommand::Text {
                    x: name_pos.0,
                    y: name_pos.1,
                    text: name,
                    scale: BODY_SCALE,
                    color: name_color,
                });
                ops.push(PaintCommand::Text {
                    x: name_pos.0 + name_w as i32 + 8,
                    y: name_pos.1 + (line_height(BODY_SCALE) - line_height(META_SCALE)) as i32 / 2,
                    text: msg.timestamp.clone(),
                    scale: META_SCALE,
                    color: r.timestamp,
                });

                let mut text_y = body_pos.1;
                for line in lines {
                    ops.push(PaintCommand::Text {
                        x: body_pos.0,
                        y: text_y,
                        text: line.clone(),
                        scale: BODY_SCALE,
                        color: r.body,
                    });
                    text_y += line_height(BODY_SCALE) as i32;
                }
            }
            // Layout mode and message style derive from the same bundle
            _ => unreachable!("layout rows always match the theme's message style"),
        }
    }

    paint_footer(&mut ops, tree, session, styles);

    ops
}

fn paint_header(
    ops: &mut Vec<PaintCommand>,
    tree: &MockupLayout,
    session: &Session,
    styles: &ThemeStyles,
) {
    let header = tree.header;
    match styles.header.gradient_to {
        Some(to) => ops.push(PaintCommand::GradientRect {
            rect: header,
            from: styles.header.background,
            to,
        }),
        None => ops.push(PaintCommand::SolidRect { rect: header, color: styles.header.background }),
    }
    if styles.header.bottom_border {
        ops.push(PaintCommand::HLine {
            x0: header.x,
            x1: header.right(),
            y: header.bottom() - 1,
            color: faded(styles.header.text, 60),
        });
    }

    let bubble_mode = matches!(styles.messages, MessageStyle::Bubble(_));
    let avatar_x = if bubble_mode {
        // Back arrow only exists in bubble mode
        ops.push(PaintCommand::Text {
            x: 12,
            y: header.y + 22,
            text: "<".to_string(),
            scale: 2,
            color: styles.header.text,
        });
        40
    } else {
        SURFACE_PAD as i32
    };

    ops.push(PaintCommand::AvatarDisc { rect: Rect::new(avatar_x, header.y + 12, 40, 40) });

    let text_x = avatar_x + 40 + 12;
    ops.push(PaintCommand::Text {
        x: text_x,
        y: header.y + 14,
        text: session.their_name().to_string(),
        scale: BODY_SCALE,
        color: styles.header.text,
    });
    ops.push(PaintCommand::Text {
        x: text_x,
        y: header.y + 38,
        text: "Online".to_string(),
        scale: META_SCALE,
        color: faded(styles.header.text, 200),
    });
}

fn paint_empty_state(ops: &mut Vec<PaintCommand>, tree: &MockupLayout, styles: &ThemeStyles) {
    let hint = faded(styles.container.text, 80);
    let mid_y = tree.body.y + tree.body.height as i32 / 2;
    let first = "No messages yet.";
    let second = "Type in the sidebar to start chatting!";
    ops.push(PaintCommand::Text {
        x: centered_x(tree.width, first, BODY_SCALE),
        y: mid_y - line_height(BODY_SCALE) as i32,
        text: first.to_string(),
        scale: BODY_SCALE,
        color: hint,
    });
    ops.push(PaintCommand::Text {
        x: centered_x(tree.width, second, META_SCALE),
        y: mid_y + 6,
        text: second.to_string(),
        scale: META_SCALE,
        color: hint,
    });
}

fn paint_footer(
    ops: &mut Vec<PaintCommand>,
    tree: &MockupLayout,
    session: &Session,
    styles: &ThemeStyles,
) {
    let footer = tree.footer;
    match styles.messages {
        MessageStyle::AvatarRow(_) => {
            // Single composer box, no chrome behind it
            let rect = Rect::new(
                footer.x + SURFACE_PAD as i32,
                footer.y + 8,
                footer.width - 2 * SURFACE_PAD,
                footer.height - 24,
            );
            ops.push(PaintCommand::RoundedRect {
                rect,
                radius: 8,
                square: None,
                fill: Color::hex(0x40444b),
                border: None,
            });
            ops.push(PaintCommand::Text {
                x: rect.x + 14,
                y: rect.y + (rect.height as i32 - line_height(META_SCALE) as i32) / 2 + 2,
                text: format!("Message @{}", session.their_name()),
                scale: META_SCALE,
                color: Color::hex(0x9ca3af),
            });
        }
        MessageStyle::Bubble(_) => {
            ops.push(PaintCommand::SolidRect {
                rect: footer,
                color: Color::rgba(255, 255, 255, 230),
            });
            ops.push(PaintCommand::HLine {
                x0: footer.x,
                x1: footer.right(),
                y: footer.y,
                color: Color::rgba(0, 0, 0, 30),
            });

            let gray = Color::hex(0x9ca3af);
            let plus = Rect::new(footer.x + SURFACE_PAD as i32, footer.y + 16, 32, 32);
            ops.push(PaintCommand::Disc { rect: plus, fill: Color::rgba(0, 0, 0, 20) });
            ops.push(PaintCommand::Text {
                x: plus.x + 13,
                y: plus.y + 12,
                text: "+".to_string(),
                scale: META_SCALE,
                color: gray,
            });

            let pill = Rect::new(
                plus.right() + 8,
                footer.y + 14,
                footer.width - 2 * SURFACE_PAD - 48,
                36,
            );
            ops.push(PaintCommand::RoundedRect {
                rect: pill,
                radius: 18,
                square: None,
                fill: Color::rgba(0, 0, 0, 13),
                border: None,
            });
            ops.push(PaintCommand::Text {
                x: pill.x + 14,
                y: pill.y + (pill.height as i32 - line_height(META_SCALE) as i32) / 2 + 2,
                text: "Type a message...".to_string(),
                scale: META_SCALE,
                color: gray,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::layout::layout_mockup;
    use crate::theme::Theme;
    use crate::Device;

    fn painted(session: &Session) -> Vec<PaintCommand> {
        let styles = session.theme().styles();
        let tree = layout_mockup(session.messages(), &styles, session.device().viewport());
        paint_mockup(&tree, session, &styles)
    }

    fn seeded(theme: Theme) -> Session {
        let mut s = Session::new();
        s.set_theme(theme);
        s.append_stamped(Sender::Them, "Hello", "10:00");
        s.append_stamped(Sender::Me, "Hi!", "10:01");
        s
    }

    #[test]
    fn whatsapp_paints_dot_grid() {
        let ops = painted(&seeded(Theme::Whatsapp));
        assert!(ops.iter().any(|c| matches!(c, PaintCommand::DotGrid { .. })));
        let ops = painted(&seeded(Theme::Telegram));
        assert!(!ops.iter().any(|c| matches!(c, PaintCommand::DotGrid { .. })));
    }

    #[test]
    fn tinder_header_is_a_gradient() {
        let ops = painted(&seeded(Theme::Tinder));
        assert!(ops.iter().any(|c| matches!(c, PaintCommand::GradientRect { .. })));
    }

    #[test]
    fn snapchat_draws_accent_edges_not_rounded_bubbles() {
        let ops = painted(&seeded(Theme::Snapchat));
        let edges = ops
            .iter()
            .filter(|c| {
                matches!(c, PaintCommand::SolidRect { rect, .. } if rect.width == 3)
            })
            .count();
        assert_eq!(edges, 2);
    }

    #[test]
    fn watermark_toggle_is_respected() {
        let mut session = seeded(Theme::Whatsapp);
        let with = painted(&session);
        session.set_show_watermark(false);
        let without = painted(&session);
        assert_eq!(with.len(), without.len() + 1);
    }

    #[test]
    fn discord_me_rows_get_a_badge_disc() {
        let ops = painted(&seeded(Theme::Discord));
        assert!(ops.iter().any(|c| matches!(
            c,
            PaintCommand::Disc { fill, .. } if *fill == Color::hex(0x5865f2)
        )));
        assert!(ops
            .iter()
            .any(|c| matches!(c, PaintCommand::Text { text, .. } if text == "ME")));
    }

    #[test]
    fn empty_conversation_paints_hint() {
        let mut session = Session::new();
        session.set_theme(Theme::Imessage);
        let ops = painted(&session);
        assert!(ops
            .iter()
            .any(|c| matches!(c, PaintCommand::Text { text, .. } if text == "No messages yet.")));
    }

    #[test]
    fn desktop_frame_is_rounded() {
        let mut session = seeded(Theme::Reddit);
        session.set_device(Device::Desktop);
        let ops = painted(&session);
        match &ops[0] {
            PaintCommand::RoundedRect { border, .. } => assert!(border.is_some()),
            other => panic!("expected rounded container, got {other:?}"),
        }
    }
}
