use mockchat::capture::{capture, capture_into, output_name};
use mockchat::theme::Theme;
use mockchat::{CaptureConfig, Device, Sender, Session};

fn demo_session(theme: Theme) -> Session {
    let mut session = Session::new();
    session.set_theme(theme);
    session.set_their_name("Pepe");
    session.append_stamped(Sender::Them, "Hello", "09:41");
    session.append_stamped(Sender::Me, "Hi! Long time no see.", "09:42");
    session.append_stamped(Sender::Them, "Way too long. Coffee this week?", "09:44");
    session
}

#[tokio::test]
async fn exports_a_png_named_after_the_theme() {
    let dir = tempfile::tempdir().expect("tempdir");
    let session = demo_session(Theme::Whatsapp);
    let config = CaptureConfig { out_dir: Some(dir.path().to_path_buf()), ..Default::default() };

    let path = capture(Some(&session), &config).await.expect("capture").expect("path");

    assert_eq!(path.file_name().unwrap().to_str().unwrap(), "mockchat-whatsapp.png");
    let bytes = std::fs::read(&path).expect("read");
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]));

    // 2x density: decoded dimensions are twice the mobile viewport
    let img = image::load_from_memory(&bytes).expect("decode");
    assert_eq!(img.width(), 375 * 2);
    assert!(img.height() >= 667 * 2);
}

#[tokio::test]
async fn avatar_row_theme_exports_too() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut session = demo_session(Theme::Discord);
    session.set_device(Device::Desktop);
    let config = CaptureConfig { out_dir: Some(dir.path().to_path_buf()), ..Default::default() };

    let path = capture(Some(&session), &config).await.expect("capture").expect("path");
    assert_eq!(path.file_name().unwrap().to_str().unwrap(), "mockchat-discord.png");

    let img = image::load_from_memory(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(img.width(), 800 * 2);
}

#[tokio::test]
async fn unmounted_surface_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = CaptureConfig { out_dir: Some(dir.path().to_path_buf()), ..Default::default() };

    let result = capture(None, &config).await.expect("no error");
    assert!(result.is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn capture_into_honors_an_explicit_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let session = demo_session(Theme::Tinder);
    let path = dir.path().join("pinned.png");

    capture_into(&session, &path, &CaptureConfig::default()).await.expect("capture");
    assert!(path.exists());
}

#[tokio::test]
async fn capture_waits_for_an_uploaded_avatar() {
    let dir = tempfile::tempdir().expect("tempdir");

    // Write a real avatar file, then upload it right before capturing so the
    // decode is still in flight when the pipeline starts.
    let avatar_path = dir.path().join("face.png");
    let face = image::RgbaImage::from_pixel(8, 8, image::Rgba([200, 40, 40, 255]));
    image::DynamicImage::ImageRgba8(face).save(&avatar_path).expect("write avatar");

    let session = demo_session(Theme::Messenger);
    session.avatar.upload(avatar_path);

    let config = CaptureConfig { out_dir: Some(dir.path().to_path_buf()), ..Default::default() };
    let path = capture(Some(&session), &config).await.expect("capture").expect("path");

    assert!(path.exists());
    assert!(*session.avatar.settled().borrow());
    assert_eq!(session.avatar.image().dimensions(), (8, 8));
}

#[test]
fn output_name_embeds_the_active_theme() {
    for theme in Theme::ALL {
        let mut session = Session::new();
        session.set_theme(theme);
        assert_eq!(output_name(&session), format!("mockchat-{theme}.png"));
    }
}
