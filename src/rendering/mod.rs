//! Mockup rendering pipeline
//!
//! Three stages, each pure over its inputs: `layout` positions the mockup
//! surface tree, `paint` flattens it against the theme styles into a display
//! list, and `raster` draws the list into a PNG.

pub mod layout;
pub mod paint;
pub mod raster;

use crate::error::Result;
use crate::session::Session;
use crate::CaptureConfig;

/// A rendered mockup, PNG-encoded
#[derive(Debug, Clone)]
pub struct Screenshot {
    /// Output width in device pixels (logical width x pixel ratio)
    pub width: u32,
    /// Output height in device pixels
    pub height: u32,
    pub png_data: Vec<u8>,
}

/// Render the session's mockup surface with default capture settings
pub fn render_mockup(session: &Session) -> Result<Screenshot> {
    render_mockup_with(session, &CaptureConfig::default())
}

/// Render the session's mockup surface
///
/// This is the synchronous serialization step of the capture pipeline; it
/// reads the avatar buffer already in memory and never touches the avatar's
/// original source.
pub fn render_mockup_with(session: &Session, config: &CaptureConfig) -> Result<Screenshot> {
    let styles = session.theme().styles();
    let viewport = session.device().viewport();

    let tree = layout::layout_mockup(session.messages(), &styles, viewport);
    let commands = paint::paint_mockup(&tree, session, &styles);
    raster::rasterize(&commands, &tree, &session.avatar.image(), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Sender;
    use crate::theme::Theme;

    #[test]
    fn render_produces_png_for_every_theme() {
        let mut session = Session::new();
        session.append_stamped(Sender::Them, "Hello", "10:00");
        session.append_stamped(Sender::Me, "Hi!", "10:01");

        for theme in Theme::ALL {
            session.set_theme(theme);
            let shot = render_mockup(&session).expect("render");
            assert!(shot.png_data.starts_with(&[0x89, b'P', b'N', b'G']), "{theme}");
            assert_eq!(shot.width, 375 * 2, "{theme}");
            assert!(shot.height >= 667 * 2, "{theme}");
        }
    }
}
