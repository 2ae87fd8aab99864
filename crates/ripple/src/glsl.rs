//! Vulkan-flavoured GLSL sources of the ripple program.
//!
//! Bind group 0 holds [`UNIFORM_BLOCK`] (camera matrix plus the ripple
//! uniforms), group 1 holds the surface texture and its sampler. Vertices carry
//! a position at location 0 and a uv at location 1.

/// Name of the uniform block both stages declare.
pub const UNIFORM_BLOCK: &str = "RippleParams";

pub const VERTEX_SHADER: &str = r"#version 450
layout(location = 0) in vec3 position;
layout(location = 1) in vec2 uv;
layout(location = 0) out vec2 v_uv;

layout(std140, set = 0, binding = 0) uniform RippleParams {
    mat4 view_proj;
    float repeats;
    float time;
    float noise_amplitude;
    float _padding;
} ubo;

void main() {
    v_uv = uv;
    gl_Position = ubo.view_proj * vec4(position, 1.0);
}
";

pub const FRAGMENT_SHADER: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform RippleParams {
    mat4 view_proj;
    float repeats;
    float time;
    float noise_amplitude;
    float _padding;
} ubo;

layout(set = 1, binding = 0) uniform texture2D ripple_texture;
layout(set = 1, binding = 1) uniform sampler ripple_sampler;

const float CHROMATIC_OFFSET = 0.01;
const float NOISE_CELLS = 8.0;
const vec2 HASH_VECTOR = vec2(12.9898, 78.233);
const float HASH_SCALE = 43758.547;
const vec2 SECOND_SAMPLE_SHIFT = vec2(5.2, 1.3);
const vec2 DRIFT = vec2(0.35, 0.21);

float ripple_hash(vec2 cell) {
    return fract(sin(dot(cell, HASH_VECTOR)) * HASH_SCALE);
}

vec2 wrap_cell(vec2 cell) {
    return cell - NOISE_CELLS * floor(cell / NOISE_CELLS);
}

float value_noise(vec2 q) {
    vec2 cell = floor(q);
    vec2 f = q - cell;
    vec2 u = f * f * (3.0 - 2.0 * f);

    float a = ripple_hash(wrap_cell(cell));
    float b = ripple_hash(wrap_cell(cell + vec2(1.0, 0.0)));
    float c = ripple_hash(wrap_cell(cell + vec2(0.0, 1.0)));
    float d = ripple_hash(wrap_cell(cell + vec2(1.0, 1.0)));

    float bottom = a + (b - a) * u.x;
    float top = c + (d - c) * u.x;
    return bottom + (top - bottom) * u.y;
}

vec2 ripple_offset(vec2 p, float t) {
    vec2 q = p * NOISE_CELLS + DRIFT * t;
    vec2 n = vec2(value_noise(q), value_noise(q + SECOND_SAMPLE_SHIFT));
    return n * 2.0 - 1.0;
}

vec4 fetch(vec2 p) {
    return texture(sampler2D(ripple_texture, ripple_sampler), p - floor(p));
}

void main() {
    vec2 p = fract(v_uv * ubo.repeats);
    if (ubo.noise_amplitude > 0.0) {
        p += ubo.noise_amplitude * ripple_offset(p, ubo.time);
    }

    vec2 e = vec2(CHROMATIC_OFFSET);
    float r = fetch(p).r;
    float g = fetch(p + e).g;
    float b = fetch(p - e).b;
    out_color = vec4(r, g, b, 1.0);
}
";

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::shader::{
        CHROMATIC_OFFSET, DRIFT, HASH_SCALE, HASH_VECTOR, NOISE_CELLS, SECOND_SAMPLE_SHIFT,
    };

    fn vec2(v: Vec2) -> String {
        format!("vec2({:?}, {:?})", v.x, v.y)
    }

    #[test]
    fn fragment_constants_match_cpu_program() {
        let expected = [
            format!("const float CHROMATIC_OFFSET = {CHROMATIC_OFFSET:?};"),
            format!("const float NOISE_CELLS = {NOISE_CELLS:?};"),
            format!("const vec2 HASH_VECTOR = {};", vec2(HASH_VECTOR)),
            format!("const float HASH_SCALE = {HASH_SCALE:?};"),
            format!("const vec2 SECOND_SAMPLE_SHIFT = {};", vec2(SECOND_SAMPLE_SHIFT)),
            format!("const vec2 DRIFT = {};", vec2(DRIFT)),
        ];
        for line in expected {
            assert!(FRAGMENT_SHADER.contains(&line), "missing `{line}`");
        }
    }

    #[test]
    fn both_stages_share_the_uniform_block() {
        let block = format!("uniform {UNIFORM_BLOCK} {{");
        assert!(VERTEX_SHADER.contains(&block));
        assert!(FRAGMENT_SHADER.contains(&block));
        assert!(FRAGMENT_SHADER.contains("out_color = vec4(r, g, b, 1.0);"));
    }
}
