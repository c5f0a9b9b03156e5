use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const TEMPLATE: &str = include_str!("../templates/visual.rs");

fn visuals(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_visuals"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run visuals")
}

#[test]
fn add_visual_twice() {
    let dir = tempdir().unwrap();

    let first = visuals(dir.path(), &["add", "visual"]);
    assert!(first.status.success());
    let stdout = String::from_utf8_lossy(&first.stdout);
    assert!(stdout.contains("Created folder"), "stdout: {stdout}");

    let written = dir.path().join("src/components/ui/visual.rs");
    assert_eq!(std::fs::read_to_string(&written).unwrap(), TEMPLATE);

    let second = visuals(dir.path(), &["add", "visual"]);
    assert_eq!(second.status.code(), Some(1));
    assert!(!second.stderr.is_empty());
    assert_eq!(std::fs::read_to_string(&written).unwrap(), TEMPLATE);
}

#[test]
fn anything_else_prints_usage() {
    let dir = tempdir().unwrap();

    for args in [&[][..], &["add"][..], &["remove", "visual"][..], &["--help"][..]] {
        let out = visuals(dir.path(), args);
        assert_eq!(out.status.code(), Some(0), "args: {args:?}");
        assert_eq!(
            String::from_utf8_lossy(&out.stdout).trim(),
            "Usage: visuals add visual"
        );
    }
    assert!(!dir.path().join("src").exists());
}
