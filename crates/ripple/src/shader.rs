//! CPU evaluation of the ripple fragment program.
//!
//! The GPU pipeline compiles a GLSL copy of the same arithmetic; both read the
//! constants below, and still exports are rendered through [`shade`].

use glam::{Vec2, Vec4};

use crate::texture::Texture;
use crate::uniforms::RippleUniforms;

/// UV displacement between the red, green and blue samples.
pub const CHROMATIC_OFFSET: f32 = 0.01;

/// Noise lattice cells per tile. Lattice indices wrap at this period so the
/// displacement field matches across tile edges.
pub const NOISE_CELLS: f32 = 8.0;

pub const HASH_VECTOR: Vec2 = Vec2::new(12.9898, 78.233);
pub const HASH_SCALE: f32 = 43_758.547;

/// Lattice offset of the second noise lookup, giving the y displacement a
/// field independent of the x one.
pub const SECOND_SAMPLE_SHIFT: Vec2 = Vec2::new(5.2, 1.3);

/// Lattice drift per unit of shader time.
pub const DRIFT: Vec2 = Vec2::new(0.35, 0.21);

#[inline]
pub fn fract(v: f32) -> f32 {
    v - v.floor()
}

#[inline]
pub fn fract2(v: Vec2) -> Vec2 {
    v - v.floor()
}

/// Pseudo-random value in `[0, 1)` for a lattice point.
pub fn hash(cell: Vec2) -> f32 {
    fract(cell.dot(HASH_VECTOR).sin() * HASH_SCALE)
}

fn wrap_cell(cell: Vec2) -> Vec2 {
    Vec2::new(
        cell.x.rem_euclid(NOISE_CELLS),
        cell.y.rem_euclid(NOISE_CELLS),
    )
}

/// Smoothly interpolated value noise over a lattice that repeats every
/// [`NOISE_CELLS`] units. Output lies in `[0, 1]`.
pub fn value_noise(q: Vec2) -> f32 {
    let cell = q.floor();
    let f = q - cell;
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);

    let a = hash(wrap_cell(cell));
    let b = hash(wrap_cell(cell + Vec2::X));
    let c = hash(wrap_cell(cell + Vec2::Y));
    let d = hash(wrap_cell(cell + Vec2::ONE));

    let bottom = a + (b - a) * u.x;
    let top = c + (d - c) * u.x;
    bottom + (top - bottom) * u.y
}

/// Displacement direction for tile position `p` at shader time `time`, with
/// each component in `[-1, 1]`.
pub fn ripple_offset(p: Vec2, time: f32) -> Vec2 {
    let q = p * NOISE_CELLS + DRIFT * time;
    let n = Vec2::new(value_noise(q), value_noise(q + SECOND_SAMPLE_SHIFT));
    n * 2.0 - Vec2::ONE
}

/// Position inside the current tile.
pub fn tile(uv: Vec2, repeats: f32) -> Vec2 {
    fract2(uv * repeats)
}

/// Samples red at `p`, green at `p + e` and blue at `p - e`. Alpha is opaque.
pub fn sample_chromatic(p: Vec2, texture: &Texture) -> Vec4 {
    let e = Vec2::splat(CHROMATIC_OFFSET);
    let r = texture.sample(p).x;
    let g = texture.sample(p + e).y;
    let b = texture.sample(p - e).z;
    Vec4::new(r, g, b, 1.0)
}

/// Colour of the surface at `uv`.
pub fn shade(uv: Vec2, uniforms: &RippleUniforms, texture: &Texture) -> Vec4 {
    let mut p = tile(uv, uniforms.repeats());
    let amplitude = uniforms.noise_amplitude();
    if amplitude > 0.0 {
        p += amplitude * ripple_offset(p, uniforms.time());
    }
    sample_chromatic(p, texture)
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;

    fn checkerboard() -> Texture {
        let mut pixels = RgbaImage::new(4, 4);
        for (x, y, pixel) in pixels.enumerate_pixels_mut() {
            let on = (x / 2 + y / 2) % 2 == 0;
            *pixel = if on {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            };
        }
        Texture::from_rgba_bottom_up(pixels).unwrap()
    }

    fn gradient() -> Texture {
        let mut pixels = RgbaImage::new(2, 1);
        pixels.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        pixels.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        Texture::from_rgba_bottom_up(pixels).unwrap()
    }

    fn grid() -> impl Iterator<Item = Vec2> {
        (0..9).flat_map(|y| (0..9).map(move |x| Vec2::new(x as f32 / 8.0, y as f32 / 8.0)))
    }

    #[test]
    fn zero_amplitude_ignores_time() {
        let texture = checkerboard();
        let still = RippleUniforms::new(1.0, 0.0).unwrap();
        for uv in grid() {
            let at_zero = shade(uv, &still.with_time(0.0), &texture);
            let later = shade(uv, &still.with_time(97.3), &texture);
            assert_eq!(at_zero, later, "uv {uv:?}");
            assert_eq!(at_zero, sample_chromatic(tile(uv, 1.0), &texture));
        }
    }

    #[test]
    fn output_repeats_per_tile() {
        let texture = checkerboard();
        let uniforms = RippleUniforms::new(2.0, 0.03).unwrap().with_time(1.7);
        let uv = Vec2::new(0.125, 0.25);
        let base = shade(uv, &uniforms, &texture);
        assert_eq!(base, shade(uv + Vec2::new(0.5, 0.0), &uniforms, &texture));
        assert_eq!(base, shade(uv + Vec2::new(0.0, 0.5), &uniforms, &texture));
    }

    #[test]
    fn whole_uv_shifts_land_on_the_same_texel() {
        let texture = checkerboard();
        for repeats in [1.0, 2.0, 3.0] {
            let uniforms = RippleUniforms::new(repeats, 0.045)
                .unwrap()
                .with_time(4.37);
            for i in 0..10 {
                let uv = Vec2::new(0.137 + i as f32 * 0.0731, 0.291 + i as f32 * 0.0613);
                let base = shade(uv, &uniforms, &texture);
                for k in [-2.0, 1.0, 3.0] {
                    let shifted = shade(uv + Vec2::splat(k), &uniforms, &texture);
                    // fract() of a larger argument rounds differently.
                    assert!(
                        (base - shifted).abs().max_element() < 1e-4,
                        "repeats {repeats} uv {uv:?} k {k}: {base:?} vs {shifted:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn repeated_checkerboard_matches_across_tiles() {
        let texture = checkerboard();
        let uniforms = RippleUniforms::new(2.0, 0.0).unwrap();
        assert_eq!(
            shade(Vec2::new(0.25, 0.25), &uniforms, &texture),
            shade(Vec2::new(0.75, 0.75), &uniforms, &texture)
        );
    }

    #[test]
    fn solid_image_is_unaffected_by_noise() {
        let texture = Texture::solid([255, 0, 0, 255]);
        let uniforms = RippleUniforms::new(3.0, 0.2).unwrap().with_time(12.5);
        for uv in grid() {
            assert_eq!(
                shade(uv, &uniforms, &texture),
                Vec4::new(1.0, 0.0, 0.0, 1.0)
            );
        }
    }

    #[test]
    fn alpha_is_always_opaque() {
        let mut pixels = RgbaImage::from_pixel(2, 2, Rgba([10, 200, 30, 0]));
        pixels.put_pixel(1, 1, Rgba([90, 90, 90, 128]));
        let texture = Texture::from_rgba_bottom_up(pixels).unwrap();
        let uniforms = RippleUniforms::new(1.0, 0.05).unwrap().with_time(3.0);
        for uv in grid() {
            assert_eq!(shade(uv, &uniforms, &texture).w, 1.0);
        }
    }

    #[test]
    fn channels_are_split_horizontally_and_vertically() {
        let texture = gradient();
        let color = sample_chromatic(Vec2::new(0.5, 0.5), &texture);
        assert!((color.x - 0.5).abs() < 1e-5);
        assert!((color.y - 0.52).abs() < 1e-5);
        assert!((color.z - 0.48).abs() < 1e-5);
    }

    #[test]
    fn noise_is_bounded_and_periodic() {
        for time in [0.0, 0.8, 41.0] {
            for p in grid() {
                let offset = ripple_offset(p, time);
                assert!(offset.abs().max_element() <= 1.0, "{offset:?}");
                let wrapped = ripple_offset(p + Vec2::new(1.0, 0.0), time);
                assert!((offset - wrapped).abs().max_element() < 1e-3);
                let wrapped = ripple_offset(p + Vec2::new(0.0, 1.0), time);
                assert!((offset - wrapped).abs().max_element() < 1e-3);
            }
        }
    }

    #[test]
    fn positive_amplitude_animates() {
        let texture = checkerboard();
        let uniforms = RippleUniforms::new(1.0, 0.05).unwrap();
        let changed = grid().any(|uv| {
            shade(uv, &uniforms.with_time(0.0), &texture)
                != shade(uv, &uniforms.with_time(2.0), &texture)
        });
        assert!(changed);
    }
}
