//! Rasterizer
//!
//! Draws a display list into an RGBA canvas at the configured pixel ratio
//! and PNG-encodes the result. Text uses an embedded 5x7 bitmap font
//! (column-encoded, LSB at the top), scaled per command.

use image::RgbaImage;

use crate::error::Result;
use crate::rendering::layout::{MockupLayout, Rect};
use crate::rendering::paint::PaintCommand;
use crate::rendering::Screenshot;
use crate::theme::{Color, Corner};
use crate::CaptureConfig;

/// Rasterize `commands` into a PNG screenshot
///
/// `avatar` is the already-decoded avatar buffer referenced by
/// `AvatarDisc` commands; the rasterizer never re-reads the avatar's
/// original source.
pub fn rasterize(
    commands: &[PaintCommand],
    tree: &MockupLayout,
    avatar: &RgbaImage,
    config: &CaptureConfig,
) -> Result<Screenshot> {
    let pr = config.pixel_ratio.max(1);
    let width = tree.width * pr;
    let height = tree.height * pr;

    let background = if config.transparent_background {
        image::Rgba([0, 0, 0, 0])
    } else {
        image::Rgba([255, 255, 255, 255])
    };
    let mut canvas = Canvas { img: RgbaImage::from_pixel(width, height, background), pr };

    for cmd in commands {
        match cmd {
            PaintCommand::SolidRect { rect, color } => canvas.fill_rect(*rect, *color),
            PaintCommand::RoundedRect { rect, radius, square, fill, border } => {
                match border {
                    Some(border) => {
                        canvas.fill_rounded(*rect, *radius, *square, *border);
                        canvas.fill_rounded(
                            inset(*rect, 1),
                            radius.saturating_sub(1),
                            *square,
                            *fill,
                        );
                    }
                    None => canvas.fill_rounded(*rect, *radius, *square, *fill),
                }
            }
            PaintCommand::GradientRect { rect, from, to } => canvas.fill_gradient(*rect, *from, *to),
            PaintCommand::DotGrid { rect, spacing, dot_radius, color } => {
                let mut cy = rect.y + *spacing as i32 / 2;
                while cy < rect.bottom() {
                    let mut cx = rect.x + *spacing as i32 / 2;
                    while cx < rect.right() {
                        canvas.fill_disc(cx as f32, cy as f32, *dot_radius as f32, *color);
                        cx += *spacing as i32;
                    }
                    cy += *spacing as i32;
                }
            }
            PaintCommand::Disc { rect, fill } => {
                let r = rect.width.min(rect.height) as f32 / 2.0;
                canvas.fill_disc(
                    rect.x as f32 + rect.width as f32 / 2.0,
                    rect.y as f32 + rect.height as f32 / 2.0,
                    r,
                    *fill,
                );
            }
            PaintCommand::AvatarDisc { rect } => canvas.blit_avatar_disc(*rect, avatar),
            PaintCommand::Text { x, y, text, scale, color } => {
                canvas.draw_text(*x, *y, text, *scale, *color)
            }
            PaintCommand::HLine { x0, x1, y, color } => {
                canvas.fill_rect(Rect::new(*x0, *y, (*x1 - *x0).max(0) as u32, 1), *color)
            }
        }
    }

    let mut png_data = Vec::new();
    {
        use image::ImageEncoder;
        let encoder = image::codecs::png::PngEncoder::new(&mut png_data);
        encoder.write_image(canvas.img.as_raw(), width, height, image::ExtendedColorType::Rgba8)?;
    }

    Ok(Screenshot { width, height, png_data })
}

struct Canvas {
    img: RgbaImage,
    pr: u32,
}

impl Canvas {
    /// Source-over blend at device coordinates
    fn blend(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.img.width() || y >= self.img.height() {
            return;
        }
        let dst = self.img.get_pixel_mut(x, y);
        let a = color.a as u32;
        if a == 0 {
            return;
        }
        if a == 255 {
            *dst = image::Rgba([color.r, color.g, color.b, 255]);
            return;
        }
        let inv = 255 - a;
        let out_a = a + dst.0[3] as u32 * inv / 255;
        for (i, src) in [color.r, color.g, color.b].into_iter().enumerate() {
            dst.0[i] = ((src as u32 * a + dst.0[i] as u32 * inv) / 255) as u8;
        }
        dst.0[3] = out_a.min(255) as u8;
    }

    /// Fill the device-pixel expansion of a logical rect
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let pr = self.pr as i32;
        for dy in rect.y * pr..rect.bottom() * pr {
            for dx in rect.x * pr..rect.right() * pr {
                self.blend(dx, dy, color);
            }
        }
    }

    fn fill_gradient(&mut self, rect: Rect, from: Color, to: Color) {
        let pr = self.pr as i32;
        let span = (rect.width * self.pr).max(1) as f32;
        for dx in rect.x * pr..rect.right() * pr {
            let t = (dx - rect.x * pr) as f32 / span;
            let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
            let color = Color::rgba(
                lerp(from.r, to.r),
                lerp(from.g, to.g),
                lerp(from.b, to.b),
                lerp(from.a, to.a),
            );
            for dy in rect.y * pr..rect.bottom() * pr {
                self.blend(dx, dy, color);
            }
        }
    }

    fn fill_rounded(&mut self, rect: Rect, radius: u32, square: Option<Corner>, color: Color) {
        let radius = radius.min(rect.width / 2).min(rect.height / 2) as f32;
        if radius == 0.0 {
            self.fill_rect(rect, color);
            return;
        }
        let pr = self.pr as i32;
        for dy in rect.y * pr..rect.bottom() * pr {
            for dx in rect.x * pr..rect.right() * pr {
                // Logical position inside the rect
                let lx = dx as f32 / self.pr as f32 - rect.x as f32;
                let ly = dy as f32 / self.pr as f32 - rect.y as f32;
                let w = rect.width as f32;
                let h = rect.height as f32;

                let corner = match (lx < radius, ly < radius, lx > w - radius, ly > h - radius) {
                    (true, true, _, _) => Some((Corner::TopLeft, radius, radius)),
                    (_, true, true, _) => Some((Corner::TopRight, w - radius, radius)),
                    (true, _, _, true) => Some((Corner::BottomLeft, radius, h - radius)),
                    (_, _, true, true) => Some((Corner::BottomRight, w - radius, h - radius)),
                    _ => None,
                };
                if let Some((which, cx, cy)) = corner {
                    if Some(which) != square {
                        let (ddx, ddy) = (lx - cx, ly - cy);
                        if ddx * ddx + ddy * ddy > radius * radius {
                            continue;
                        }
                    }
                }
                self.blend(dx, dy, color);
            }
        }
    }

    fn fill_disc(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        let pr = self.pr as f32;
        let x0 = ((cx - radius) * pr).floor() as i32;
        let x1 = ((cx + radius) * pr).ceil() as i32;
        let y0 = ((cy - radius) * pr).floor() as i32;
        let y1 = ((cy + radius) * pr).ceil() as i32;
        for dy in y0..=y1 {
            for dx in x0..=x1 {
                let lx = (dx as f32 + 0.5) / pr - cx;
                let ly = (dy as f32 + 0.5) / pr - cy;
                if lx * lx + ly * ly <= radius * radius {
                    self.blend(dx, dy, color);
                }
            }
        }
    }

    /// Nearest-neighbor blit of the avatar, clipped to a circle
    fn blit_avatar_disc(&mut self, rect: Rect, avatar: &RgbaImage) {
        let pr = self.pr as f32;
        let (src_w, src_h) = avatar.dimensions();
        if src_w == 0 || src_h == 0 {
            return;
        }
        let radius = rect.width.min(rect.height) as f32 / 2.0;
        let cx = rect.x as f32 + rect.width as f32 / 2.0;
        let cy = rect.y as f32 + rect.height as f32 / 2.0;

        let pri = self.pr as i32;
        for dy in rect.y * pri..rect.bottom() * pri {
            for dx in rect.x * pri..rect.right() * pri {
                let lx = (dx as f32 + 0.5) / pr;
                let ly = (dy as f32 + 0.5) / pr;
                let (ox, oy) = (lx - cx, ly - cy);
                if ox * ox + oy * oy > radius * radius {
                    continue;
                }
                let u = ((lx - rect.x as f32) / rect.width as f32 * src_w as f32) as u32;
                let v = ((ly - rect.y as f32) / rect.height as f32 * src_h as f32) as u32;
                let p = avatar.get_pixel(u.min(src_w - 1), v.min(src_h - 1));
                self.blend(dx, dy, Color::rgba(p.0[0], p.0[1], p.0[2], p.0[3]));
            }
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, scale: u32, color: Color) {
        let advance = 6 * scale as i32;
        let mut pen_x = x;
        for ch in text.chars() {
            self.draw_glyph(pen_x, y, ch, scale, color);
            pen_x += advance;
        }
    }

    fn draw_glyph(&mut self, x: i32, y: i32, ch: char, scale: u32, color: Color) {
        let glyph = glyph_columns(ch);
        let s = scale as i32;
        for (col, bits) in glyph.iter().enumerate() {
            for row in 0..7 {
                if bits & (1 << row) != 0 {
                    self.fill_rect(
                        Rect::new(x + col as i32 * s, y + row * s, scale, scale),
                        color,
                    );
                }
            }
        }
    }
}

fn inset(rect: Rect, by: u32) -> Rect {
    Rect::new(
        rect.x + by as i32,
        rect.y + by as i32,
        rect.width.saturating_sub(2 * by),
        rect.height.saturating_sub(2 * by),
    )
}

fn glyph_columns(ch: char) -> [u8; 5] {
    let idx = ch as usize;
    if (0x20..=0x7e).contains(&idx) {
        FONT5X7[idx - 0x20]
    } else {
        // Hollow box for anything outside printable ASCII
        [0x7f, 0x41, 0x41, 0x41, 0x7f]
    }
}

/// Classic 5x7 glyphs for ASCII 0x20..=0x7E, one byte per column, bit 0 = top row
const FONT5X7: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5f, 0x00, 0x00], // '!'
    [0x00, 0x07, 0x00, 0x07, 0x00], // '"'
    [0x14, 0x7f, 0x14, 0x7f, 0x14], // '#'
    [0x24, 0x2a, 0x7f, 0x2a, 0x12], // '$'
    [0x23, 0x13, 0x08, 0x64, 0x62], // '%'
    [0x36, 0x49, 0x55, 0x22, 0x50], // '&'
    [0x00, 0x05, 0x03, 0x00, 0x00], // '\''
    [0x00, 0x1c, 0x22, 0x41, 0x00], // '('
    [0x00, 0x41, 0x22, 0x1c, 0x00], // ')'
    [0x08, 0x2a, 0x1c, 0x2a, 0x08], // '*'
    [0x08, 0x08, 0x3e, 0x08, 0x08], // '+'
    [0x00, 0x50, 0x30, 0x00, 0x00], // ','
    [0x08, 0x08, 0x08, 0x08, 0x08], // '-'
    [0x00, 0x60, 0x60, 0x00, 0x00], // '.'
    [0x20, 0x10, 0x08, 0x04, 0x02], // '/'
    [0x3e, 0x51, 0x49, 0x45, 0x3e], // '0'
    [0x00, 0x42, 0x7f, 0x40, 0x00], // '1'
    [0x42, 0x61, 0x51, 0x49, 0x46], // '2'
    [0x21, 0x41, 0x45, 0x4b, 0x31], // '3'
    [0x18, 0x14, 0x12, 0x7f, 0x10], // '4'
    [0x27, 0x45, 0x45, 0x45, 0x39], // '5'
    [0x3c, 0x4a, 0x49, 0x49, 0x30], // '6'
    [0x01, 0x71, 0x09, 0x05, 0x03], // '7'
    [0x36, 0x49, 0x49, 0x49, 0x36], // '8'
    [0x06, 0x49, 0x49, 0x29, 0x1e], // '9'
    [0x00, 0x36, 0x36, 0x00, 0x00], // ':'
    [0x00, 0x56, 0x36, 0x00, 0x00], // ';'
    [0x00, 0x08, 0x14, 0x22, 0x41], // '<'
    [0x14, 0x14, 0x14, 0x14, 0x14], // '='
    [0x41, 0x22, 0x14, 0x08, 0x00], // '>'
    [0x02, 0x01, 0x51, 0x09, 0x06], // '?'
    [0x32, 0x49, 0x79, 0x41, 0x3e], // '@'
    [0x7e, 0x11, 0x11, 0x11, 0x7e], // 'A'
    [0x7f, 0x49, 0x49, 0x49, 0x36], // 'B'
    [0x3e, 0x41, 0x41, 0x41, 0x22], // 'C'
    [0x7f, 0x41, 0x41, 0x22, 0x1c], // 'D'
    [0x7f, 0x49, 0x49, 0x49, 0x41], // 'E'
    [0x7f, 0x09, 0x09, 0x01, 0x01], // 'F'
    [0x3e, 0x41, 0x41, 0x51, 0x32], // 'G'
    [0x7f, 0x08, 0x08, 0x08, 0x7f], // 'H'
    [0x00, 0x41, 0x7f, 0x41, 0x00], // 'I'
    [0x20, 0x40, 0x41, 0x3f, 0x01], // 'J'
    [0x7f, 0x08, 0x14, 0x22, 0x41], // 'K'
    [0x7f, 0x40, 0x40, 0x40, 0x40], // 'L'
    [0x7f, 0x02, 0x04, 0x02, 0x7f], // 'M'
    [0x7f, 0x04, 0x08, 0x10, 0x7f], // 'N'
    [0x3e, 0x41, 0x41, 0x41, 0x3e], // 'O'
    [0x7f, 0x09, 0x09, 0x09, 0x06], // 'P'
    [0x3e, 0x41, 0x51, 0x21, 0x5e], // 'Q'
    [0x7f, 0x09, 0x19, 0x29, 0x46], // 'R'
    [0x46, 0x49, 0x49, 0x49, 0x31], // 'S'
    [0x01, 0x01, 0x7f, 0x01, 0x01], // 'T'
    [0x3f, 0x40, 0x40, 0x40, 0x3f], // 'U'
    [0x1f, 0x20, 0x40, 0x20, 0x1f], // 'V'
    [0x7f, 0x20, 0x18, 0x20, 0x7f], // 'W'
    [0x63, 0x14, 0x08, 0x14, 0x63], // 'X'
    [0x03, 0x04, 0x78, 0x04, 0x03], // 'Y'
    [0x61, 0x51, 0x49, 0x45, 0x43], // 'Z'
    [0x00, 0x00, 0x7f, 0x41, 0x41], // '['
    [0x02, 0x04, 0x08, 0x10, 0x20], // '\\'
    [0x41, 0x41, 0x7f, 0x00, 0x00], // ']'
    [0x04, 0x02, 0x01, 0x02, 0x04], // '^'
    [0x40, 0x40, 0x40, 0x40, 0x40], // '_'
    [0x00, 0x01, 0x02, 0x04, 0x00], // '`'
    [0x20, 0x54, 0x54, 0x54, 0x78], // 'a'
    [0x7f, 0x48, 0x44, 0x44, 0x38], // 'b'
    [0x38, 0x44, 0x44, 0x44, 0x20], // 'c'
    [0x38, 0x44, 0x44, 0x48, 0x7f], // 'd'
    [0x38, 0x54, 0x54, 0x54, 0x18], // 'e'
    [0x08, 0x7e, 0x09, 0x01, 0x02], // 'f'
    [0x08, 0x14, 0x54, 0x54, 0x3c], // 'g'
    [0x7f, 0x08, 0x04, 0x04, 0x78], // 'h'
    [0x00, 0x44, 0x7d, 0x40, 0x00], // 'i'
    [0x20, 0x40, 0x44, 0x3d, 0x00], // 'j'
    [0x00, 0x7f, 0x10, 0x28, 0x44], // 'k'
    [0x00, 0x41, 0x7f, 0x40, 0x00], // 'l'
    [0x7c, 0x04, 0x18, 0x04, 0x78], // 'm'
    [0x7c, 0x08, 0x04, 0x04, 0x78], // 'n'
    [0x38, 0x44, 0x44, 0x44, 0x38], // 'o'
    [0x7c, 0x14, 0x14, 0x14, 0x08], // 'p'
    [0x08, 0x14, 0x14, 0x18, 0x7c], // 'q'
    [0x7c, 0x08, 0x04, 0x04, 0x08], // 'r'
    [0x48, 0x54, 0x54, 0x54, 0x20], // 's'
    [0x04, 0x3f, 0x44, 0x40, 0x20], // 't'
    [0x3c, 0x40, 0x40, 0x20, 0x7c], // 'u'
    [0x1c, 0x20, 0x40, 0x20, 0x1c], // 'v'
    [0x3c, 0x40, 0x30, 0x40, 0x3c], // 'w'
    [0x44, 0x28, 0x10, 0x28, 0x44], // 'x'
    [0x0c, 0x50, 0x50, 0x50, 0x3c], // 'y'
    [0x44, 0x64, 0x54, 0x4c, 0x44], // 'z'
    [0x00, 0x08, 0x36, 0x41, 0x00], // '{'
    [0x00, 0x00, 0x7f, 0x00, 0x00], // '|'
    [0x00, 0x41, 0x36, 0x08, 0x00], // '}'
    [0x08, 0x08, 0x2a, 0x1c, 0x08], // '~'
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::layout::layout_mockup;
    use crate::rendering::paint::paint_mockup;
    use crate::session::{Sender, Session};
    use crate::theme::Theme;
    use crate::Device;

    fn shot_of(session: &Session, config: &CaptureConfig) -> Screenshot {
        let styles = session.theme().styles();
        let tree = layout_mockup(session.messages(), &styles, session.device().viewport());
        let ops = paint_mockup(&tree, session, &styles);
        rasterize(&ops, &tree, &session.avatar.image(), config).expect("rasterize")
    }

    fn seeded() -> Session {
        let mut s = Session::new();
        s.append_stamped(Sender::Them, "Hello", "10:00");
        s.append_stamped(Sender::Me, "Hi!", "10:01");
        s
    }

    #[test]
    fn output_respects_pixel_ratio() {
        let session = seeded();
        let at_1x = shot_of(&session, &CaptureConfig { pixel_ratio: 1, ..Default::default() });
        let at_2x = shot_of(&session, &CaptureConfig::default());
        assert_eq!(at_1x.width * 2, at_2x.width);
        assert_eq!(at_1x.height * 2, at_2x.height);
        assert!(at_2x.png_data.starts_with(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]));
    }

    #[test]
    fn rendering_is_deterministic() {
        let session = seeded();
        let a = shot_of(&session, &CaptureConfig::default());
        let b = shot_of(&session, &CaptureConfig::default());
        assert_eq!(a.png_data, b.png_data);
    }

    #[test]
    fn desktop_frame_leaves_corners_transparent() {
        let mut session = seeded();
        session.set_device(Device::Desktop);
        session.set_theme(Theme::Reddit);

        let styles = session.theme().styles();
        let tree = layout_mockup(session.messages(), &styles, session.device().viewport());
        let ops = paint_mockup(&tree, &session, &styles);
        let config = CaptureConfig::default();
        let pr = config.pixel_ratio;
        let canvas_shot = rasterize(&ops, &tree, &session.avatar.image(), &config).unwrap();

        let decoded = image::load_from_memory(&canvas_shot.png_data).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0).0[3], 0);
        // Well inside the frame is opaque
        let mid = (tree.width * pr / 2, tree.height * pr / 2);
        assert_eq!(decoded.get_pixel(mid.0, mid.1).0[3], 255);
    }

    #[test]
    fn glyphs_cover_printable_ascii() {
        assert_eq!(FONT5X7.len(), 95);
        assert_eq!(glyph_columns('A'), [0x7e, 0x11, 0x11, 0x11, 0x7e]);
        // Fallback box for non-ASCII
        assert_eq!(glyph_columns('é'), [0x7f, 0x41, 0x41, 0x41, 0x7f]);
    }

    #[test]
    fn text_marks_the_canvas() {
        let tree = layout_mockup(&[], &Theme::Whatsapp.styles(), Device::Mobile.viewport());
        let blank: Vec<PaintCommand> = vec![];
        let text = vec![PaintCommand::Text {
            x: 10,
            y: 10,
            text: "hi".to_string(),
            scale: 2,
            color: Color::BLACK,
        }];
        let avatar = RgbaImage::new(1, 1);
        let cfg = CaptureConfig::default();
        let empty = rasterize(&blank, &tree, &avatar, &cfg).unwrap();
        let drawn = rasterize(&text, &tree, &avatar, &cfg).unwrap();
        assert_ne!(empty.png_data, drawn.png_data);
    }
}
