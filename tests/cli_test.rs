use image::{ImageFormat, Rgba, RgbaImage};
use std::path::Path;
use std::process::Command;

fn write_cover(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 3) as u8, (y * 5) as u8, ((x + y) * 7) as u8, 255])
    });
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

fn stego() -> Command {
    Command::new(env!("CARGO_BIN_EXE_stego"))
}

#[test]
fn cli_encode_then_decode() {
    let dir = tempfile::tempdir().unwrap();
    let cover = dir.path().join("cover.png");
    let output = dir.path().join("out");
    write_cover(&cover, 80, 80);

    let status = stego()
        .args(["-e", "-m", "Lena is beautiful.", "--pwd", "s3cret", "-p"])
        .arg(&cover)
        .arg("-o")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let written = dir.path().join("out.png");
    assert!(written.exists());

    let decoded = stego()
        .args(["-d", "--pwd", "s3cret", "-p"])
        .arg(&written)
        .output()
        .unwrap();
    assert!(decoded.status.success());
    assert_eq!(decoded.stdout, b"Lena is beautiful.");
}

#[test]
fn cli_reports_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let cover = dir.path().join("cover.png");
    write_cover(&cover, 100, 100);

    let out = stego().arg("-p").arg(&cover).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.ends_with("can hold 1196 characters\n"), "{}", stdout);

    let out = stego().arg("--json").arg("-p").arg(&cover).output().unwrap();
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["max_payload"], 255);
    assert_eq!(report["width"], 100);
}

#[test]
fn cli_encode_requires_message() {
    let dir = tempfile::tempdir().unwrap();
    let cover = dir.path().join("cover.png");
    write_cover(&cover, 20, 20);

    let out = stego().arg("-e").arg("-p").arg(&cover).output().unwrap();
    assert!(!out.status.success());
}

#[test]
fn cli_rejects_message_that_does_not_fit() {
    let dir = tempfile::tempdir().unwrap();
    let cover = dir.path().join("small.png");
    let output = dir.path().join("small-out.png");
    write_cover(&cover, 10, 10);

    let out = stego()
        .args(["-e", "-m", "far too long for ten by ten", "-p"])
        .arg(&cover)
        .arg("-o")
        .arg(&output)
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(!output.exists());
}
