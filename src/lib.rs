//! MockChat
//!
//! A configurable fake chat-conversation screenshot generator: pick a
//! messaging-app theme, compose a back-and-forth conversation, and export
//! the rendered mockup as a PNG.
//!
//! # Features
//!
//! - **16 theme presets**: each resolves to a fixed style bundle and one of
//!   two layout modes (chat bubbles or avatar rows)
//! - **Pure rendering pipeline**: layout -> paint commands -> rasterized
//!   `Screenshot`, no platform surface required
//! - **Capture pipeline**: settles pending avatar loads, rasterizes at 2x,
//!   and saves a themed PNG
//!
//! # Example
//!
//! ```
//! use mockchat::{Sender, Session, Theme};
//!
//! # fn main() -> mockchat::Result<()> {
//! let mut session = Session::new();
//! session.set_theme(Theme::Whatsapp);
//! session.append(Sender::Them, "Hello");
//! session.append(Sender::Me, "Hi!");
//!
//! let shot = mockchat::rendering::render_mockup(&session)?;
//! assert!(!shot.png_data.is_empty());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod theme;
pub use theme::{LayoutMode, Theme, ThemeStyles};

pub mod session;
pub use session::{Message, Sender, Session};

pub mod avatar;

pub mod rendering;
pub use rendering::Screenshot;

pub mod capture;

/// Device frame the mockup is rendered into
///
/// Selects the mockup surface width; the minimum height is shared. The set
/// is closed: parsing happens at the CLI boundary and an out-of-set value is
/// not representable past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Mobile,
    Desktop,
}

impl Device {
    /// Mockup surface dimensions for this device frame
    pub fn viewport(self) -> Viewport {
        match self {
            Device::Mobile => Viewport { width: 375, height: 667 },
            Device::Desktop => Viewport { width: 800, height: 667 },
        }
    }
}

impl Default for Device {
    fn default() -> Self {
        Device::Mobile
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::Mobile => write!(f, "mobile"),
            Device::Desktop => write!(f, "desktop"),
        }
    }
}

impl std::str::FromStr for Device {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mobile" => Ok(Device::Mobile),
            "desktop" => Ok(Device::Desktop),
            other => Err(Error::ConfigError(format!("unknown device '{other}'"))),
        }
    }
}

/// Mockup surface dimensions in CSS-like logical pixels
///
/// `height` is a minimum; a long conversation grows the surface downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Device::Mobile.viewport()
    }
}

/// Configuration for the capture pipeline
///
/// The defaults mirror what the exported screenshots are expected to look
/// like: 2x pixel density on a transparent background, with a 200ms settle
/// deadline for asynchronously loading avatars.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Output pixel density multiplier
    pub pixel_ratio: u32,
    /// Upper bound in milliseconds to wait for pending image loads
    pub settle_delay_ms: u64,
    /// Leave unpainted pixels transparent rather than filling white
    pub transparent_background: bool,
    /// Directory the PNG is written into (current directory when `None`)
    pub out_dir: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            pixel_ratio: 2,
            settle_delay_ms: 200,
            transparent_background: true,
            out_dir: None,
        }
    }
}
