//! Capture pipeline
//!
//! Produces a downloadable PNG of the currently rendered mockup: guard,
//! settle, serialize, save. The settle step waits on the avatar slot's
//! explicit load-complete signal rather than trusting a fixed delay alone;
//! the configured settle interval caps how long capture will wait for a
//! straggling load before taking the surface as-is.

use std::path::{Path, PathBuf};

use tokio::time::{timeout, Duration};

use crate::error::{Error, Result};
use crate::rendering;
use crate::session::Session;
use crate::CaptureConfig;

/// File name the exported mockup is saved under
pub fn output_name(session: &Session) -> String {
    format!("mockchat-{}.png", session.theme())
}

/// Capture the mockup surface and save it as a themed PNG
///
/// `surface` is the rendered mockup reference; `None` (nothing mounted yet)
/// aborts silently with `Ok(None)`. On success returns the written path.
/// Failures during settle/serialize surface as a single `CaptureError`; no
/// partial output is written.
pub async fn capture(
    surface: Option<&Session>,
    config: &CaptureConfig,
) -> Result<Option<PathBuf>> {
    let Some(session) = surface else {
        log::debug!("capture skipped: mockup surface not mounted");
        return Ok(None);
    };

    let dir = config.out_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(output_name(session));
    capture_into(session, &path, config).await?;
    Ok(Some(path))
}

/// Capture the mockup surface to an explicit path
pub async fn capture_into(session: &Session, path: &Path, config: &CaptureConfig) -> Result<()> {
    settle(session, config).await;

    log::debug!("serializing mockup surface at {}x", config.pixel_ratio);
    let shot = rendering::render_mockup_with(session, config)
        .map_err(|e| Error::CaptureError(e.to_string()))?;

    tokio::fs::write(path, &shot.png_data).await?;
    log::debug!("saved {} ({} bytes)", path.display(), shot.png_data.len());
    Ok(())
}

/// Wait for pending avatar loads, bounded by the settle deadline
async fn settle(session: &Session, config: &CaptureConfig) {
    let mut settled = session.avatar.settled();
    if *settled.borrow() {
        return;
    }
    let deadline = Duration::from_millis(config.settle_delay_ms);
    match timeout(deadline, settled.wait_for(|s| *s)).await {
        Ok(Ok(_)) => {}
        // Slow loads are not retried; capture proceeds with whatever the
        // slot currently shows.
        Ok(Err(_)) | Err(_) => {
            log::debug!("settle deadline elapsed before avatar load completed")
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Sender;
    use crate::theme::Theme;

    #[tokio::test]
    async fn unmounted_surface_aborts_silently() {
        let result = capture(None, &CaptureConfig::default()).await.expect("no error");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn capture_writes_themed_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = Session::new();
        session.set_theme(Theme::Telegram);
        session.append_stamped(Sender::Them, "Hello", "10:00");

        let config = CaptureConfig {
            out_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let path = capture(Some(&session), &config).await.expect("capture").expect("path");

        assert_eq!(path.file_name().unwrap().to_str().unwrap(), "mockchat-telegram.png");
        let bytes = std::fs::read(&path).expect("read output");
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[tokio::test]
    async fn capture_settles_a_pending_avatar_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = Session::new();
        session.append_stamped(Sender::Them, "new avatar, who dis", "10:00");
        // Kicks off a background decode that settles on the placeholder
        session.avatar.upload(dir.path().join("missing.png"));

        let config = CaptureConfig {
            out_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let path = capture(Some(&session), &config).await.expect("capture").expect("path");
        assert!(path.exists());
        assert!(*session.avatar.settled().borrow());
    }
}
