use std::path::{Path, PathBuf};

use glam::{Vec2, Vec4};
use image::imageops::flip_vertical_in_place;
use image::{DynamicImage, ImageError, Rgba, RgbaImage};

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to open image at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image at {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("image at {path} has no pixels")]
    Empty { path: PathBuf },
    #[error("texture must have pixels, got {width}x{height}")]
    ZeroSized { width: u32, height: u32 },
}

/// Texel filtering used when sampling between texel centres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    Nearest,
    #[default]
    Linear,
}

/// CPU-side 2D sampling source with repeat addressing.
///
/// Rows are stored bottom-up so `uv.y == 0` addresses the bottom of the
/// image, matching the flipped upload used for the GPU texture.
#[derive(Debug, Clone)]
pub struct Texture {
    pixels: RgbaImage,
    filter: Filter,
}

impl Texture {
    pub fn open(path: &Path) -> Result<Self, TextureError> {
        let image = image::open(path).map_err(|err| match err {
            ImageError::IoError(source) => TextureError::Open {
                path: path.to_path_buf(),
                source,
            },
            other => TextureError::Decode {
                path: path.to_path_buf(),
                source: other,
            },
        })?;
        if image.width() == 0 || image.height() == 0 {
            return Err(TextureError::Empty {
                path: path.to_path_buf(),
            });
        }
        tracing::debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "loaded texture"
        );
        Self::from_image(image)
    }

    pub fn from_image(image: DynamicImage) -> Result<Self, TextureError> {
        let mut pixels = image.to_rgba8();
        flip_vertical_in_place(&mut pixels);
        Self::from_rgba_bottom_up(pixels)
    }

    /// Wraps an image whose rows are already ordered bottom-up.
    pub fn from_rgba_bottom_up(pixels: RgbaImage) -> Result<Self, TextureError> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroSized { width, height });
        }
        Ok(Self {
            pixels,
            filter: Filter::default(),
        })
    }

    pub fn solid(color: [u8; 4]) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(1, 1, Rgba(color)),
            filter: Filter::default(),
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Raw RGBA8 bytes, bottom row first, ready for a GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Fetches a texel, wrapping out-of-range coordinates.
    pub fn texel(&self, x: i64, y: i64) -> Vec4 {
        let (width, height) = self.pixels.dimensions();
        let x = x.rem_euclid(i64::from(width)) as u32;
        let y = y.rem_euclid(i64::from(height)) as u32;
        let Rgba([r, g, b, a]) = *self.pixels.get_pixel(x, y);
        Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0
    }

    pub fn sample(&self, uv: Vec2) -> Vec4 {
        let (width, height) = self.pixels.dimensions();
        let size = Vec2::new(width as f32, height as f32);
        let uv = uv - uv.floor();

        match self.filter {
            Filter::Nearest => {
                let coord = (uv * size).floor();
                self.texel(coord.x as i64, coord.y as i64)
            }
            Filter::Linear => {
                let coord = uv * size - Vec2::splat(0.5);
                let base = coord.floor();
                let weight = coord - base;
                let (x0, y0) = (base.x as i64, base.y as i64);

                let bottom = mix(self.texel(x0, y0), self.texel(x0 + 1, y0), weight.x);
                let top = mix(self.texel(x0, y0 + 1), self.texel(x0 + 1, y0 + 1), weight.x);
                mix(bottom, top, weight.y)
            }
        }
    }
}

/// `a + (b - a) * t`: returns `a` exactly when both ends agree.
fn mix(a: Vec4, b: Vec4, t: f32) -> Vec4 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> Texture {
        // 2x1: black on the left, white on the right.
        let mut pixels = RgbaImage::new(2, 1);
        pixels.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        pixels.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        Texture::from_rgba_bottom_up(pixels).unwrap()
    }

    #[test]
    fn solid_texture_samples_exactly() {
        let texture = Texture::solid([255, 0, 0, 255]);
        for uv in [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.37, 0.91),
            Vec2::new(-1.25, 3.5),
            Vec2::new(0.999, 0.001),
        ] {
            assert_eq!(texture.sample(uv), Vec4::new(1.0, 0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn texel_coordinates_wrap() {
        let texture = gradient();
        assert_eq!(texture.texel(2, 0), texture.texel(0, 0));
        assert_eq!(texture.texel(-1, 5), texture.texel(1, 0));
    }

    #[test]
    fn linear_filter_blends_between_centres() {
        let texture = gradient();
        // Texel centres sit at u = 0.25 and u = 0.75.
        assert_eq!(texture.sample(Vec2::new(0.25, 0.5)).x, 0.0);
        assert_eq!(texture.sample(Vec2::new(0.75, 0.5)).x, 1.0);
        assert!((texture.sample(Vec2::new(0.5, 0.5)).x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn nearest_filter_picks_containing_texel() {
        let texture = gradient().with_filter(Filter::Nearest);
        assert_eq!(texture.sample(Vec2::new(0.49, 0.5)).x, 0.0);
        assert_eq!(texture.sample(Vec2::new(0.51, 0.5)).x, 1.0);
        assert_eq!(texture.sample(Vec2::new(1.51, 0.5)).x, 1.0);
    }

    #[test]
    fn from_image_flips_rows() {
        let mut pixels = RgbaImage::new(1, 2);
        pixels.put_pixel(0, 0, Rgba([255, 255, 255, 255])); // top row
        pixels.put_pixel(0, 1, Rgba([0, 0, 0, 255]));
        let texture = Texture::from_image(DynamicImage::ImageRgba8(pixels))
            .unwrap()
            .with_filter(Filter::Nearest);
        assert_eq!(texture.sample(Vec2::new(0.5, 0.25)).x, 0.0);
        assert_eq!(texture.sample(Vec2::new(0.5, 0.75)).x, 1.0);
    }

    #[test]
    fn zero_sized_images_are_rejected() {
        let err = Texture::from_image(DynamicImage::new_rgba8(0, 0)).unwrap_err();
        assert!(matches!(err, TextureError::ZeroSized { width: 0, height: 0 }));
        assert!(Texture::from_rgba_bottom_up(RgbaImage::new(3, 0)).is_err());
    }

    #[test]
    fn open_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Texture::open(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, TextureError::Open { .. }), "{err}");
    }

    #[test]
    fn open_reports_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = Texture::open(&path).unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }), "{err}");
    }

    #[test]
    fn open_loads_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        RgbaImage::from_pixel(4, 3, Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();
        let texture = Texture::open(&path).unwrap();
        assert_eq!(texture.dimensions(), (4, 3));
        assert_eq!(texture.as_bytes().len(), 4 * 3 * 4);
    }
}
