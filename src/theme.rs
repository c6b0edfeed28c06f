//! Theme catalog and resolver
//!
//! Each of the 16 presets maps to a fixed bundle of style records plus a
//! layout mode. The mapping is total (the `match` in [`Theme::styles`] is
//! exhaustive over the enum, so coverage is checked at compile time) and
//! pure: no hidden state, no side effects.

use crate::error::{Error, Result};

/// An sRGB color with alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Build an opaque color from a packed 0xRRGGBB value
    pub const fn hex(rgb: u32) -> Self {
        Color::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
}

const NEAR_BLACK: Color = Color::hex(0x111111);
const MUTED_GRAY: Color = Color::hex(0x9ca3af);
const BORDER_GRAY: Color = Color::hex(0xe5e7eb);

/// The closed set of 16 theme presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Whatsapp,
    Discord,
    Imessage,
    Instagram,
    Line,
    Messenger,
    Teams,
    Reddit,
    Signal,
    Slack,
    Snapchat,
    Telegram,
    Tiktok,
    Tinder,
    Wechat,
    Twitter,
}

/// Structural arrangement used to render each message
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// Two-sided chat bubbles with per-sender background/shape
    Bubble,
    /// Name + avatar header row followed by plain message text
    AvatarRow,
}

/// Which bubble corner is squared off into a "tail"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Style of the scrollable message area behind the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceStyle {
    pub background: Color,
    pub text: Color,
    /// Radial dot grid behind the messages (whatsapp only)
    pub dotted_background: bool,
}

/// Style of the 64px contact header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderStyle {
    pub background: Color,
    /// Second stop of a horizontal gradient when present (tinder)
    pub gradient_to: Option<Color>,
    pub text: Color,
    pub bottom_border: bool,
}

/// Style of one sender's chat bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubbleStyle {
    pub fill: Color,
    pub text: Color,
    /// Corner radius in logical pixels
    pub radius: u32,
    /// Squared-off tail corner, if the theme has one
    pub tail: Option<Corner>,
    pub border: Option<Color>,
    /// Colored left edge drawn instead of a filled bubble (snapchat)
    pub accent_edge: Option<Color>,
}

/// Per-message styling in bubble mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubbleLayout {
    pub me: BubbleStyle,
    pub them: BubbleStyle,
    /// Render the counterpart's avatar beside their bubbles
    pub show_counterpart_avatar: bool,
    /// Render the timestamp row inside each bubble
    pub show_timestamp: bool,
    /// Timestamp tint inside "me" bubbles, when the theme overrides the
    /// default faded treatment for contrast (imessage)
    pub me_timestamp_tint: Option<Color>,
}

/// Per-message styling in avatar-row mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarRowStyle {
    pub me_name: Color,
    pub them_name: Color,
    pub body: Color,
    pub timestamp: Color,
    /// Fill behind the "ME" fallback avatar
    pub me_avatar_fill: Color,
}

/// Message styling, keyed by the theme's layout mode
///
/// A theme is either bubble-styled or row-styled, never both; the sum type
/// keeps the unused half unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Bubble(BubbleLayout),
    AvatarRow(AvatarRowStyle),
}

/// The full presentation bundle for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeStyles {
    pub container: SurfaceStyle,
    pub header: HeaderStyle,
    pub messages: MessageStyle,
}

impl ThemeStyles {
    pub fn layout(&self) -> LayoutMode {
        match self.messages {
            MessageStyle::Bubble(_) => LayoutMode::Bubble,
            MessageStyle::AvatarRow(_) => LayoutMode::AvatarRow,
        }
    }
}

fn bubble(me: BubbleStyle, them: BubbleStyle) -> MessageStyle {
    MessageStyle::Bubble(BubbleLayout {
        me,
        them,
        show_counterpart_avatar: false,
        show_timestamp: true,
        me_timestamp_tint: None,
    })
}

fn plain_bubble(fill: Color, text: Color, radius: u32) -> BubbleStyle {
    BubbleStyle { fill, text, radius, tail: None, border: None, accent_edge: None }
}

fn tailed_bubble(fill: Color, text: Color, radius: u32, tail: Corner) -> BubbleStyle {
    BubbleStyle { fill, text, radius, tail: Some(tail), border: None, accent_edge: None }
}

fn light_surface() -> SurfaceStyle {
    SurfaceStyle { background: Color::WHITE, text: NEAR_BLACK, dotted_background: false }
}

fn light_header() -> HeaderStyle {
    HeaderStyle {
        background: Color::WHITE,
        gradient_to: None,
        text: NEAR_BLACK,
        bottom_border: true,
    }
}

impl Theme {
    /// Every preset, in the order the selector presents them
    pub const ALL: [Theme; 16] = [
        Theme::Whatsapp,
        Theme::Discord,
        Theme::Imessage,
        Theme::Instagram,
        Theme::Line,
        Theme::Messenger,
        Theme::Teams,
        Theme::Reddit,
        Theme::Signal,
        Theme::Slack,
        Theme::Snapchat,
        Theme::Telegram,
        Theme::Tiktok,
        Theme::Tinder,
        Theme::Wechat,
        Theme::Twitter,
    ];

    /// Resolve this theme to its presentation bundle
    pub fn styles(self) -> ThemeStyles {
        match self {
            Theme::Whatsapp => ThemeStyles {
                container: SurfaceStyle {
                    background: Color::hex(0xe5ddd5),
                    text: NEAR_BLACK,
                    dotted_background: true,
                },
                header: HeaderStyle {
                    background: Color::hex(0x075e54),
                    gradient_to: None,
                    text: Color::WHITE,
                    bottom_border: false,
                },
                messages: bubble(
                    tailed_bubble(Color::hex(0xdcf8c6), NEAR_BLACK, 8, Corner::TopRight),
                    tailed_bubble(Color::WHITE, NEAR_BLACK, 8, Corner::TopLeft),
                ),
            },
            Theme::Imessage => ThemeStyles {
                container: light_surface(),
                header: HeaderStyle {
                    background: Color::hex(0xf5f5f5),
                    gradient_to: None,
                    text: NEAR_BLACK,
                    bottom_border: true,
                },
                messages: MessageStyle::Bubble(BubbleLayout {
                    me: tailed_bubble(Color::hex(0x007aff), Color::WHITE, 16, Corner::BottomRight),
                    them: tailed_bubble(Color::hex(0xe5e5ea), NEAR_BLACK, 16, Corner::BottomLeft),
                    show_counterpart_avatar: false,
                    show_timestamp: true,
                    me_timestamp_tint: Some(Color::hex(0xdbeafe)),
                }),
            },
            Theme::Instagram => ThemeStyles {
                container: light_surface(),
                header: light_header(),
                messages: MessageStyle::Bubble(BubbleLayout {
                    me: plain_bubble(Color::hex(0xefefef), NEAR_BLACK, 22),
                    them: BubbleStyle {
                        fill: Color::WHITE,
                        text: NEAR_BLACK,
                        radius: 22,
                        tail: None,
                        border: Some(Color::hex(0xdbdbdb)),
                        accent_edge: None,
                    },
                    show_counterpart_avatar: true,
                    show_timestamp: false,
                    me_timestamp_tint: None,
                }),
            },
            Theme::Telegram => ThemeStyles {
                container: SurfaceStyle {
                    background: Color::hex(0x8cabd9),
                    text: NEAR_BLACK,
                    dotted_background: false,
                },
                header: HeaderStyle {
                    background: Color::hex(0x517da2),
                    gradient_to: None,
                    text: Color::WHITE,
                    bottom_border: false,
                },
                messages: bubble(
                    tailed_bubble(Color::hex(0xeffdde), NEAR_BLACK, 8, Corner::TopRight),
                    tailed_bubble(Color::WHITE, NEAR_BLACK, 8, Corner::TopLeft),
                ),
            },
            Theme::Messenger => ThemeStyles {
                container: light_surface(),
                header: light_header(),
                messages: MessageStyle::Bubble(BubbleLayout {
                    me: plain_bubble(Color::hex(0x0084ff), Color::WHITE, 20),
                    them: plain_bubble(Color::hex(0xe4e6eb), NEAR_BLACK, 20),
                    show_counterpart_avatar: true,
                    show_timestamp: false,
                    me_timestamp_tint: None,
                }),
            },
            Theme::Line => ThemeStyles {
                container: SurfaceStyle {
                    background: Color::hex(0x849ebf),
                    text: NEAR_BLACK,
                    dotted_background: false,
                },
                header: HeaderStyle {
                    background: Color::hex(0x232d4b),
                    gradient_to: None,
                    text: Color::WHITE,
                    bottom_border: false,
                },
                messages: MessageStyle::Bubble(BubbleLayout {
                    me: tailed_bubble(Color::hex(0x7dec65), NEAR_BLACK, 20, Corner::TopRight),
                    them: tailed_bubble(Color::WHITE, NEAR_BLACK, 20, Corner::TopLeft),
                    show_counterpart_avatar: true,
                    show_timestamp: true,
                    me_timestamp_tint: None,
                }),
            },
            Theme::Reddit => ThemeStyles {
                container: light_surface(),
                header: light_header(),
                messages: bubble(
                    plain_bubble(Color::hex(0x0079d3), Color::WHITE, 20),
                    plain_bubble(Color::hex(0xf0f0f0), NEAR_BLACK, 20),
                ),
            },
            Theme::Signal => ThemeStyles {
                container: light_surface(),
                header: light_header(),
                messages: bubble(
                    tailed_bubble(Color::hex(0x2c6bed), Color::WHITE, 18, Corner::BottomRight),
                    tailed_bubble(Color::hex(0xf6f6f6), NEAR_BLACK, 18, Corner::BottomLeft),
                ),
            },
            Theme::Snapchat => ThemeStyles {
                container: light_surface(),
                header: HeaderStyle {
                    background: Color::WHITE,
                    gradient_to: None,
                    text: Color::hex(0x00b2ff),
                    bottom_border: true,
                },
                messages: MessageStyle::Bubble(BubbleLayout {
                    me: BubbleStyle {
                        fill: Color::WHITE,
                        text: NEAR_BLACK,
                        radius: 0,
                        tail: None,
                        border: None,
                        accent_edge: Some(Color::hex(0xf23c57)),
                    },
                    them: BubbleStyle {
                        fill: Color::WHITE,
                        text: NEAR_BLACK,
                        radius: 0,
                        tail: None,
                        border: None,
                        accent_edge: Some(Color::hex(0x00b2ff)),
                    },
                    show_counterpart_avatar: false,
                    show_timestamp: false,
                    me_timestamp_tint: None,
                }),
            },
            Theme::Tiktok => ThemeStyles {
                container: SurfaceStyle {
                    background: Color::hex(0x121212),
                    text: Color::WHITE,
                    dotted_background: false,
                },
                header: HeaderStyle {
                    background: Color::hex(0x121212),
                    gradient_to: None,
                    text: Color::WHITE,
                    bottom_border: true,
                },
                messages: MessageStyle::Bubble(BubbleLayout {
                    me: plain_bubble(Color::hex(0xfe2c55), Color::WHITE, 12),
                    them: plain_bubble(Color::hex(0x2f2f2f), Color::WHITE, 12),
                    show_counterpart_avatar: true,
                    show_timestamp: true,
                    me_timestamp_tint: None,
                }),
            },
            Theme::Tinder => ThemeStyles {
                container: light_surface(),
                header: HeaderStyle {
                    background: Color::hex(0xfd267d),
                    gradient_to: Some(Color::hex(0xff6036)),
                    text: Color::WHITE,
                    bottom_border: false,
                },
                messages: bubble(
                    tailed_bubble(Color::hex(0xfd267d), Color::WHITE, 16, Corner::BottomRight),
                    tailed_bubble(Color::hex(0xf0f0f0), NEAR_BLACK, 16, Corner::BottomLeft),
                ),
            },
            Theme::Wechat => ThemeStyles {
                container: SurfaceStyle {
                    background: Color::hex(0xf5f5f5),
                    text: NEAR_BLACK,
                    dotted_background: false,
                },
                header: HeaderStyle {
                    background: Color::hex(0xededed),
                    gradient_to: None,
                    text: NEAR_BLACK,
                    bottom_border: true,
                },
                messages: bubble(
                    BubbleStyle {
                        fill: Color::hex(0xa0e75a),
                        text: NEAR_BLACK,
                        radius: 4,
                        tail: Some(Corner::TopRight),
                        border: Some(Color::hex(0x8bc253)),
                        accent_edge: None,
                    },
                    BubbleStyle {
                        fill: Color::WHITE,
                        text: NEAR_BLACK,
                        radius: 4,
                        tail: Some(Corner::TopLeft),
                        border: Some(BORDER_GRAY),
                        accent_edge: None,
                    },
                ),
            },

            // Avatar-row layouts
            Theme::Discord => ThemeStyles {
                container: SurfaceStyle {
                    background: Color::hex(0x36393f),
                    text: Color::WHITE,
                    dotted_background: false,
                },
                header: HeaderStyle {
                    background: Color::hex(0x2f3136),
                    gradient_to: None,
                    text: Color::WHITE,
                    bottom_border: true,
                },
                messages: MessageStyle::AvatarRow(AvatarRowStyle {
                    me_name: Color::hex(0xeab308),
                    them_name: Color::WHITE,
                    body: Color::hex(0xdcddde),
                    timestamp: MUTED_GRAY,
                    me_avatar_fill: Color::hex(0x5865f2),
                }),
            },
            Theme::Twitter => ThemeStyles {
                container: SurfaceStyle {
                    background: Color::BLACK,
                    text: Color::WHITE,
                    dotted_background: false,
                },
                header: HeaderStyle {
                    background: Color::BLACK,
                    gradient_to: None,
                    text: Color::WHITE,
                    bottom_border: true,
                },
                messages: MessageStyle::AvatarRow(AvatarRowStyle {
                    me_name: Color::WHITE,
                    them_name: Color::WHITE,
                    body: Color::WHITE,
                    timestamp: MUTED_GRAY,
                    me_avatar_fill: Color::hex(0x2563eb),
                }),
            },
            Theme::Teams => ThemeStyles {
                container: SurfaceStyle {
                    background: Color::hex(0xf5f5f5),
                    text: NEAR_BLACK,
                    dotted_background: false,
                },
                header: HeaderStyle {
                    background: Color::hex(0x464775),
                    gradient_to: None,
                    text: Color::WHITE,
                    bottom_border: true,
                },
                messages: MessageStyle::AvatarRow(AvatarRowStyle {
                    me_name: NEAR_BLACK,
                    them_name: NEAR_BLACK,
                    body: NEAR_BLACK,
                    timestamp: MUTED_GRAY,
                    me_avatar_fill: Color::hex(0x2563eb),
                }),
            },
            Theme::Slack => ThemeStyles {
                container: light_surface(),
                header: HeaderStyle {
                    background: Color::hex(0x350d36),
                    gradient_to: None,
                    text: Color::WHITE,
                    bottom_border: false,
                },
                messages: MessageStyle::AvatarRow(AvatarRowStyle {
                    me_name: NEAR_BLACK,
                    them_name: NEAR_BLACK,
                    body: NEAR_BLACK,
                    timestamp: MUTED_GRAY,
                    me_avatar_fill: Color::hex(0x2563eb),
                }),
            },
        }
    }

    /// Structural layout mode for this theme
    pub fn layout(self) -> LayoutMode {
        self.styles().layout()
    }

    /// The theme catalog as plain listable entries
    pub fn catalog() -> Vec<ThemeInfo> {
        Theme::ALL
            .iter()
            .map(|&t| ThemeInfo { name: t.to_string(), layout: t.layout() })
            .collect()
    }
}

/// One entry of the selectable theme catalog
#[derive(Debug, Clone, serde::Serialize)]
pub struct ThemeInfo {
    pub name: String,
    pub layout: LayoutMode,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Theme::Whatsapp => "whatsapp",
            Theme::Discord => "discord",
            Theme::Imessage => "imessage",
            Theme::Instagram => "instagram",
            Theme::Line => "line",
            Theme::Messenger => "messenger",
            Theme::Teams => "teams",
            Theme::Reddit => "reddit",
            Theme::Signal => "signal",
            Theme::Slack => "slack",
            Theme::Snapchat => "snapchat",
            Theme::Telegram => "telegram",
            Theme::Tiktok => "tiktok",
            Theme::Tinder => "tinder",
            Theme::Wechat => "wechat",
            Theme::Twitter => "twitter",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Theme::ALL
            .iter()
            .copied()
            .find(|t| t.to_string() == needle)
            .ok_or_else(|| Error::ConfigError(format!("unknown theme '{s}'")))
    }
}
