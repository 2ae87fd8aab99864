use std::path::Path;

use anyhow::{Context, Result};
use glam::{Vec2, Vec4};
use image::{Rgba, RgbaImage};

use crate::camera::Camera;
use crate::scene::Scene;

const CLEAR_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Ray-casts every pixel of a `size` frame through each surface's camera and
/// shades hits with the CPU ripple program. Pixels outside every plane keep
/// the clear colour.
pub fn render_still(scene: &Scene, size: (u32, u32)) -> RgbaImage {
    let (width, height) = (size.0.max(1), size.1.max(1));
    let mut frame = RgbaImage::from_pixel(width, height, CLEAR_COLOR);

    for (surface, viewport) in scene.surfaces().iter().zip(scene.layout((width, height))) {
        let picker = Camera::new(viewport.aspect()).picker();
        let plane = surface.plane_size();
        let top = viewport.y.max(0.0) as u32;
        let bottom = ((viewport.y + viewport.height).ceil() as u32).min(height);

        for y in top..bottom {
            for x in 0..width {
                let centre = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if !viewport.contains(centre) {
                    continue;
                }
                let Some(uv) = picker.pick(viewport.to_ndc(centre), plane) else {
                    continue;
                };
                let color = ripple::shade(uv, surface.uniforms(), surface.texture());
                frame.put_pixel(x, y, to_rgba8(color));
            }
        }
    }
    frame
}

pub fn export_png(scene: &Scene, size: (u32, u32), path: &Path) -> Result<()> {
    let frame = render_still(scene, size);
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    frame
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write still frame to {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        width = frame.width(),
        height = frame.height(),
        "still frame exported"
    );
    Ok(())
}

fn to_rgba8(color: Vec4) -> Rgba<u8> {
    let scaled = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
    Rgba([
        scaled.x as u8,
        scaled.y as u8,
        scaled.z as u8,
        scaled.w as u8,
    ])
}

#[cfg(test)]
mod tests {
    use sceneconfig::SceneConfig;
    use tempfile::TempDir;

    use super::*;

    fn solid_scene(dir: &TempDir, count: usize) -> Scene {
        let path = dir.path().join("red.png");
        RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();
        let config = SceneConfig::from_images(std::iter::repeat(path).take(count)).unwrap();
        let mut scene = Scene::from_config(&config, dir.path()).unwrap();
        scene.advance(1.5);
        scene
    }

    #[test]
    fn still_has_requested_dimensions() {
        let dir = TempDir::new().unwrap();
        let frame = render_still(&solid_scene(&dir, 1), (64, 48));
        assert_eq!(frame.dimensions(), (64, 48));
    }

    #[test]
    fn solid_image_renders_solid_and_gap_stays_clear() {
        let dir = TempDir::new().unwrap();
        let scene = solid_scene(&dir, 2);
        let frame = render_still(&scene, (40, 136));
        // (136 - 56) / 2 = 40 pixel tall viewports, gap rows 40..96.
        assert_eq!(*frame.get_pixel(5, 5), Rgba([255, 0, 0, 255]));
        assert_eq!(*frame.get_pixel(20, 120), Rgba([255, 0, 0, 255]));
        assert_eq!(*frame.get_pixel(20, 60), CLEAR_COLOR);
    }

    #[test]
    fn export_writes_png() {
        let dir = TempDir::new().unwrap();
        let scene = solid_scene(&dir, 1);
        let output = dir.path().join("out/still.png");
        export_png(&scene, (32, 20), &output).unwrap();
        let written = image::open(&output).unwrap();
        assert_eq!((written.width(), written.height()), (32, 20));
    }
}
