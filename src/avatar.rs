//! Counterpart avatar handling
//!
//! The avatar is a session-scoped resource: a built-in stand-in face by
//! default, replaceable by a user-supplied file or `data:` URI. Uploads
//! decode on a background task; the slot exposes a load-complete signal the
//! capture pipeline waits on instead of trusting a fixed delay. Replacing
//! an upload drops the previous decode buffer with it.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use base64::Engine as _;
use image::RgbaImage;
use tokio::sync::watch;

use crate::error::{Error, Result};

/// Source pixel size of the built-in and placeholder faces
pub const AVATAR_SOURCE_SIZE: u32 = 64;

struct Inner {
    image: Mutex<Arc<RgbaImage>>,
    label: Mutex<String>,
    settled_tx: watch::Sender<bool>,
}

/// Holder for the counterpart avatar image
///
/// Cheap to clone; clones share the same slot. The displayed image is always
/// available (never mid-load blank): until a pending decode lands, readers
/// keep seeing the previous image.
#[derive(Clone)]
pub struct AvatarSlot {
    inner: Arc<Inner>,
}

impl AvatarSlot {
    /// Slot holding the built-in stand-in face
    pub fn new() -> Self {
        let (settled_tx, _) = watch::channel(true);
        AvatarSlot {
            inner: Arc::new(Inner {
                image: Mutex::new(Arc::new(builtin_face())),
                label: Mutex::new("built-in".to_string()),
                settled_tx,
            }),
        }
    }

    /// Current avatar pixels
    pub fn image(&self) -> Arc<RgbaImage> {
        self.inner.image.lock().expect("avatar lock").clone()
    }

    /// Human-readable source of the current avatar
    pub fn label(&self) -> String {
        self.inner.label.lock().expect("avatar lock").clone()
    }

    /// Subscribe to the load-complete signal
    ///
    /// `false` while a decode is pending, `true` once the slot has settled
    /// (successfully or with the broken-image placeholder).
    pub fn settled(&self) -> watch::Receiver<bool> {
        self.inner.settled_tx.subscribe()
    }

    /// Replace the avatar with an image file, decoding in the background
    ///
    /// Must be called within a tokio runtime. A malformed file is not an
    /// error: the slot settles on a broken-image placeholder, matching
    /// best-effort display semantics.
    pub fn upload(&self, path: PathBuf) {
        self.begin(format!("file:{}", path.display()));
        let inner = self.inner.clone();
        tokio::spawn(async move {
            let decoded = tokio::task::spawn_blocking(move || decode_file(&path))
                .await
                .unwrap_or_else(|e| Err(Error::AvatarError(e.to_string())));
            finish(&inner, decoded);
        });
    }

    /// Replace the avatar with a `data:<mime>;base64,...` reference
    pub fn upload_data_uri(&self, uri: &str) {
        self.begin("data-uri".to_string());
        let inner = self.inner.clone();
        let uri = uri.to_string();
        tokio::spawn(async move {
            let decoded = tokio::task::spawn_blocking(move || decode_data_uri(&uri))
                .await
                .unwrap_or_else(|e| Err(Error::AvatarError(e.to_string())));
            finish(&inner, decoded);
        });
    }

    /// Synchronous replacement, for pre-seeding before the event loop runs
    pub fn upload_blocking(&self, path: &Path) {
        self.begin(format!("file:{}", path.display()));
        finish(&self.inner, decode_file(path));
    }

    fn begin(&self, label: String) {
        *self.inner.label.lock().expect("avatar lock") = label;
        // send_replace: the value must flip even while nobody subscribes yet
        self.inner.settled_tx.send_replace(false);
    }
}

fn finish(inner: &Inner, decoded: Result<RgbaImage>) {
    let img = match decoded {
        Ok(img) => img,
        Err(e) => {
            log::warn!("avatar decode failed, using placeholder: {e}");
            broken_placeholder()
        }
    };
    // Old buffer is released here once transient render clones drop.
    *inner.image.lock().expect("avatar lock") = Arc::new(img);
    inner.settled_tx.send_replace(true);
}

fn decode_file(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|e| Error::AvatarError(e.to_string()))?;
    Ok(img.to_rgba8())
}

fn decode_data_uri(uri: &str) -> Result<RgbaImage> {
    let payload = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, data)| data)
        .ok_or_else(|| Error::AvatarError("not a base64 data URI".to_string()))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::AvatarError(format!("bad base64 payload: {e}")))?;
    let img = image::load_from_memory(&bytes).map_err(|e| Error::AvatarError(e.to_string()))?;
    Ok(img.to_rgba8())
}

/// The default stand-in face: a friendly green disc with eyes and a smile
fn builtin_face() -> RgbaImage {
    let size = AVATAR_SOURCE_SIZE;
    let mut img = RgbaImage::from_pixel(size, size, image::Rgba([0, 0, 0, 0]));

    let face = image::Rgba([0x4c, 0xdb, 0x95, 0xff]);
    let dark = image::Rgba([0x33, 0x33, 0x33, 0xff]);

    fill_disc(&mut img, 32.0, 32.0, 30.0, face);
    fill_disc(&mut img, 20.0, 24.0, 5.0, dark);
    fill_disc(&mut img, 44.0, 24.0, 5.0, dark);

    // Smile: quadratic arc from (20,38) to (44,38) sagging through (32,52)
    let steps = 48;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let inv = 1.0 - t;
        let x = inv * inv * 20.0 + 2.0 * inv * t * 32.0 + t * t * 44.0;
        let y = inv * inv * 38.0 + 2.0 * inv * t * 52.0 + t * t * 38.0;
        fill_disc(&mut img, x, y, 1.5, dark);
    }

    img
}

/// Gray tile with an X, shown when an uploaded file does not decode
fn broken_placeholder() -> RgbaImage {
    let size = AVATAR_SOURCE_SIZE;
    let mut img = RgbaImage::from_pixel(size, size, image::Rgba([0xdd, 0xdd, 0xdd, 0xff]));
    let stroke = image::Rgba([0x88, 0x88, 0x88, 0xff]);
    for i in 0..size {
        for d in 0..3u32 {
            let j = (i + d).min(size - 1);
            img.put_pixel(i, j, stroke);
            img.put_pixel(i, size - 1 - j, stroke);
        }
    }
    img
}

fn fill_disc(img: &mut RgbaImage, cx: f32, cy: f32, radius: f32, color: image::Rgba<u8>) {
    let (w, h) = img.dimensions();
    let r2 = radius * radius;
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= r2 {
                img.put_pixel(x, y, color);
            }
        }
    }
}

impl Default for AvatarSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_face_is_drawn() {
        let slot = AvatarSlot::new();
        let img = slot.image();
        assert_eq!(img.dimensions(), (AVATAR_SOURCE_SIZE, AVATAR_SOURCE_SIZE));
        // Center of the disc is face-colored, corners stay transparent
        assert_eq!(img.get_pixel(32, 44).0, [0x4c, 0xdb, 0x95, 0xff]);
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
        assert!(*slot.settled().borrow());
    }

    #[test]
    fn data_uri_parser_rejects_garbage() {
        assert!(decode_data_uri("http://example.com/a.png").is_err());
        assert!(decode_data_uri("data:image/png;base64,!!!").is_err());
    }

    #[tokio::test]
    async fn missing_file_settles_on_placeholder() {
        let slot = AvatarSlot::new();
        slot.upload(PathBuf::from("/no/such/avatar.png"));

        let mut rx = slot.settled();
        rx.wait_for(|s| *s).await.expect("settle");

        let img = slot.image();
        assert_eq!(img.get_pixel(30, 5).0, [0xdd, 0xdd, 0xdd, 0xff]);
    }

    #[tokio::test]
    async fn data_uri_upload_replaces_image() {
        // 2x2 red PNG, encoded on the fly
        let red = RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(red)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("encode");
        let uri = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&png)
        );

        let slot = AvatarSlot::new();
        slot.upload_data_uri(&uri);
        slot.settled().wait_for(|s| *s).await.expect("settle");

        let img = slot.image();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(slot.label(), "data-uri");
    }
}
