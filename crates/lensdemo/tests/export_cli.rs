use std::fs;
use std::path::Path;
use std::process::Command;

use image::{Rgba, RgbaImage};
use tempfile::TempDir;

fn lensdemo(config_dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_lensdemo"));
    command
        .env("LENSDEMO_CONFIG_DIR", config_dir)
        .env("RUST_LOG", "warn");
    command
}

fn write_solid_png(path: &Path, colour: [u8; 3]) {
    let image = RgbaImage::from_pixel(32, 18, Rgba([colour[0], colour[1], colour[2], 255]));
    image.save(path).unwrap();
}

#[test]
fn export_writes_png_of_requested_size() {
    let root = TempDir::new().unwrap();
    let source = root.path().join("source.png");
    let output = root.path().join("frames/out.png");
    write_solid_png(&source, [10, 200, 30]);

    let status = lensdemo(root.path())
        .args(["export", "--size", "48x27", "--output"])
        .arg(&output)
        .arg(&source)
        .status()
        .expect("failed to run lensdemo export");
    assert!(status.success());

    let frame = image::open(&output).unwrap().to_rgba8();
    assert_eq!(frame.dimensions(), (48, 27));
    // Far from the centred bubble the background is untouched.
    assert_eq!(frame.get_pixel(0, 0), &Rgba([10, 200, 30, 255]));
    assert_eq!(frame.get_pixel(47, 26), &Rgba([10, 200, 30, 255]));
    // The shadow ring darkens pixels just outside the bubble.
    let ring = frame.get_pixel(40, 13);
    assert!(ring[1] < 200, "expected shadowed pixel, got {ring:?}");
}

#[test]
fn export_reads_image_and_size_from_config() {
    let root = TempDir::new().unwrap();
    write_solid_png(&root.path().join("photo.png"), [0, 0, 255]);
    fs::write(
        root.path().join("lensdemo.toml"),
        "image = \"photo.png\"\n\n[window]\nsize = \"20x10\"\n",
    )
    .unwrap();
    let output = root.path().join("still.png");

    let status = lensdemo(root.path())
        .args(["export", "--pointer", "0.0,0.0", "--output"])
        .arg(&output)
        .status()
        .expect("failed to run lensdemo export");
    assert!(status.success());

    let frame = image::open(&output).unwrap().to_rgba8();
    assert_eq!(frame.dimensions(), (20, 10));
}

#[test]
fn export_without_image_fails() {
    let root = TempDir::new().unwrap();
    let result = lensdemo(root.path())
        .args(["export", "--output"])
        .arg(root.path().join("out.png"))
        .output()
        .expect("failed to run lensdemo export");
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("no image given"), "stderr: {stderr}");
}

#[test]
fn export_with_missing_image_fails() {
    let root = TempDir::new().unwrap();
    let result = lensdemo(root.path())
        .args(["export", "--output"])
        .arg(root.path().join("out.png"))
        .arg(root.path().join("nope.png"))
        .output()
        .expect("failed to run lensdemo export");
    assert!(!result.status.success());
    assert!(!root.path().join("out.png").exists());
}

#[test]
fn export_rejects_oversized_frames() {
    let root = TempDir::new().unwrap();
    let source = root.path().join("source.png");
    write_solid_png(&source, [1, 2, 3]);
    let result = lensdemo(root.path())
        .args(["export", "--size", "100000x100000", "--output"])
        .arg(root.path().join("huge.png"))
        .arg(&source)
        .output()
        .expect("failed to run lensdemo export");
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("exceeds"), "stderr: {stderr}");
    assert!(!root.path().join("huge.png").exists());
}

#[test]
fn config_where_honours_env_override() {
    let root = TempDir::new().unwrap();
    let result = lensdemo(root.path())
        .args(["config", "where"])
        .output()
        .expect("failed to run lensdemo config where");
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert_eq!(
        stdout.trim(),
        root.path().join("lensdemo.toml").display().to_string()
    );
}

#[test]
fn config_show_merges_file_with_defaults() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("lensdemo.toml"), "[lens]\nradius = 0.25\n").unwrap();

    let result = lensdemo(root.path())
        .args(["config", "show"])
        .output()
        .expect("failed to run lensdemo config show");
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("radius = 0.25"), "stdout: {stdout}");
    assert!(stdout.contains("edge_width = 0.003\n"), "stdout: {stdout}");
    assert!(stdout.contains("size = \"1920x1080\""), "stdout: {stdout}");
    assert!(stdout.contains("mode = \"fixed\""), "stdout: {stdout}");
}

#[test]
fn unknown_config_keys_are_rejected() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("lensdemo.toml"), "[lens]\nwobble = 1.0\n").unwrap();

    let result = lensdemo(root.path())
        .args(["config", "show"])
        .output()
        .expect("failed to run lensdemo config show");
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("wobble"), "stderr: {stderr}");
}
