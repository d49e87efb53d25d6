use std::fs;
use std::process::Command;

use tempfile::TempDir;

#[test]
fn list_deck_prints_manifest_cards() {
    let root = TempDir::new().unwrap();
    let manifest = root.path().join("deck.toml");
    fs::write(
        &manifest,
        r#"
        [[card]]
        title = "Harbor Lights"
        text = "Night harbor under sodium lamps"
        image = "harbor.png"

        [[card]]
        title = "Dune Study"
        kind = "Restyle"
        "#,
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_deckshade"))
        .args(["--deck", manifest.to_str().unwrap(), "--list-deck"])
        .output()
        .expect("failed to run deckshade --list-deck");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Harbor Lights"));
    assert!(stdout.contains("Dune Study"));
    assert!(stdout.contains("Restyle"));
    // Relative image paths resolve next to the manifest.
    assert!(stdout.contains("harbor.png"));
    assert!(stdout.contains(root.path().to_str().unwrap()));
}

#[test]
fn list_deck_without_manifest_uses_builtin_deck() {
    let output = Command::new(env!("CARGO_BIN_EXE_deckshade"))
        .arg("--list-deck")
        .output()
        .expect("failed to run deckshade --list-deck");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Aurora Drift"));
    assert!(stdout.contains("gradient"));
}

#[test]
fn empty_deck_manifest_is_rejected() {
    let root = TempDir::new().unwrap();
    let manifest = root.path().join("deck.toml");
    fs::write(&manifest, "version = 1\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_deckshade"))
        .args(["--deck", manifest.to_str().unwrap(), "--list-deck"])
        .output()
        .expect("failed to run deckshade");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("at least one card"));
}

#[test]
fn invalid_size_flag_is_rejected() {
    let output = Command::new(env!("CARGO_BIN_EXE_deckshade"))
        .args(["--size", "widexhigh", "--list-deck"])
        .output()
        .expect("failed to run deckshade");

    assert!(!output.status.success());
}
