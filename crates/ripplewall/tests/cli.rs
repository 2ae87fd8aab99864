use std::path::{Path, PathBuf};
use std::process::Command;

use image::{Rgba, RgbaImage};
use serde_json::Value;
use tempfile::TempDir;

fn write_image(dir: &Path, name: &str, color: [u8; 4]) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(8, 8, Rgba(color)).save(&path).unwrap();
    path
}

fn ripplewall(config_dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ripplewall"));
    command
        .env("RIPPLEWALL_CONFIG_DIR", config_dir)
        .env("RUST_LOG", "warn");
    command
}

#[test]
fn trace_prints_monotonic_mount_convergence() {
    let root = TempDir::new().unwrap();
    let image = write_image(root.path(), "plane.png", [10, 120, 200, 255]);

    let output = ripplewall(root.path())
        .args(["trace", "--frames", "240", "--fps", "60", "--image"])
        .arg(&image)
        .output()
        .expect("failed to run ripplewall trace");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let records: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 240);

    let amplitude = |record: &Value| record["noise_amplitude"].as_f64().unwrap();
    let time = |record: &Value| record["time"].as_f64().unwrap();
    assert_eq!(records[0]["frame"].as_u64(), Some(0));
    assert!((amplitude(&records[0]) - 0.045).abs() < 1e-6);
    for pair in records.windows(2) {
        assert!(amplitude(&pair[1]) <= amplitude(&pair[0]));
        assert!(time(&pair[1]) >= time(&pair[0]));
    }
    assert!((amplitude(records.last().unwrap()) - 0.002).abs() < 1e-6);
}

#[test]
fn trace_enter_then_leave_moves_towards_each_target() {
    let root = TempDir::new().unwrap();
    let image = write_image(root.path(), "plane.png", [255, 255, 255, 255]);

    let output = ripplewall(root.path())
        .args([
            "trace", "--frames", "600", "--enter", "4", "--leave", "6", "--image",
        ])
        .arg(&image)
        .output()
        .expect("failed to run ripplewall trace");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let amplitudes: Vec<f64> = stdout
        .lines()
        .map(|line| {
            let record: Value = serde_json::from_str(line).unwrap();
            record["noise_amplitude"].as_f64().unwrap()
        })
        .collect();
    // Frame 330 is 5.5s: the 1s enter tween has settled.
    assert!((amplitudes[330] - 0.03).abs() < 1e-6);
    assert!((amplitudes[599] - 0.005).abs() < 1e-6);
}

#[test]
fn export_writes_png_of_requested_size() {
    let root = TempDir::new().unwrap();
    let image = write_image(root.path(), "red.png", [255, 0, 0, 255]);
    let output_path = root.path().join("out/frame.png");

    let status = ripplewall(root.path())
        .args(["export", "--size", "64x96", "--time", "1.5", "--hover", "0@0.5"])
        .arg("--image")
        .arg(&image)
        .arg("--output")
        .arg(&output_path)
        .status()
        .expect("failed to run ripplewall export");
    assert!(status.success());

    let frame = image::open(&output_path).unwrap().to_rgba8();
    assert_eq!(frame.dimensions(), (64, 96));
    assert_eq!(frame.get_pixel(32, 48), &Rgba([255, 0, 0, 255]));
}

#[test]
fn export_uses_default_scene_file() {
    let root = TempDir::new().unwrap();
    write_image(root.path(), "plane.png", [0, 255, 0, 255]);
    std::fs::write(
        root.path().join("scene.toml"),
        "version = 1\n[[surfaces]]\nimage = \"plane.png\"\n",
    )
    .unwrap();
    let output_path = root.path().join("still.png");

    let status = ripplewall(root.path())
        .args(["export", "--size", "32x32", "--output"])
        .arg(&output_path)
        .status()
        .expect("failed to run ripplewall export");
    assert!(status.success());
    assert!(output_path.exists());
}

#[test]
fn missing_image_exits_with_failure() {
    let root = TempDir::new().unwrap();
    let output = ripplewall(root.path())
        .args(["trace", "--frames", "1", "--image"])
        .arg(root.path().join("does-not-exist.png"))
        .output()
        .expect("failed to run ripplewall trace");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does-not-exist.png"));
}

#[test]
fn out_of_range_hover_is_rejected() {
    let root = TempDir::new().unwrap();
    let image = write_image(root.path(), "plane.png", [0, 0, 0, 255]);
    let status = ripplewall(root.path())
        .args(["export", "--hover", "3@0", "--output"])
        .arg(root.path().join("never.png"))
        .arg("--image")
        .arg(&image)
        .status()
        .expect("failed to run ripplewall export");

    assert!(!status.success());
    assert!(!root.path().join("never.png").exists());
}

#[test]
fn where_reports_config_override() {
    let root = TempDir::new().unwrap();
    let output = ripplewall(root.path())
        .arg("where")
        .output()
        .expect("failed to run ripplewall where");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(&root.path().display().to_string()));
    assert!(stdout.contains("scene.toml (missing)"));
}
