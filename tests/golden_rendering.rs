use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use mockchat::rendering::render_mockup;
use mockchat::theme::Theme;
use mockchat::{Sender, Session};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

fn fixture_session(theme: Theme) -> Session {
    let mut session = Session::new();
    session.set_theme(theme);
    session.set_their_name("Pepe");
    session.append_stamped(Sender::Them, "Hello", "09:41");
    session.append_stamped(Sender::Me, "Hi!", "09:42");
    session
}

#[test]
fn golden_render_matches_fixture() {
    let session = fixture_session(Theme::Whatsapp);
    let shot = render_mockup(&session).expect("render");
    let digest = hex::encode(Sha256::digest(&shot.png_data));

    let expected_path = golden_path("whatsapp.sha256");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &digest).expect("write golden");
        println!("Updated golden: {expected_path:?}");
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {expected_path:?}; run with UPDATE_GOLDENS=1 to create it. Skipping."
        );
        return;
    }

    let expected = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(digest, expected.trim());
}

#[test]
fn fixture_render_is_stable_across_runs() {
    let a = render_mockup(&fixture_session(Theme::Discord)).expect("render");
    let b = render_mockup(&fixture_session(Theme::Discord)).expect("render");
    assert_eq!(
        hex::encode(Sha256::digest(&a.png_data)),
        hex::encode(Sha256::digest(&b.png_data)),
    );
}

#[test]
fn distinct_themes_render_distinct_pixels() {
    let mut digests = std::collections::HashSet::new();
    for theme in Theme::ALL {
        let shot = render_mockup(&fixture_session(theme)).expect("render");
        digests.insert(hex::encode(Sha256::digest(&shot.png_data)));
    }
    assert_eq!(digests.len(), Theme::ALL.len());
}
