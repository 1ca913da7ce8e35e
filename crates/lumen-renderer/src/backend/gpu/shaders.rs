//! WGSL sources for the four shader programs.
//!
//! Every program binds the projection uniforms at binding 0. Textured
//! programs add a sampler at binding 1 and one `texture_2d` per slot from
//! binding 2 on. Texture coordinates use a lower-left origin, so the
//! fragment stages flip v before sampling.

use std::fmt::Write;

use crate::backend::ShaderProgram;

/// Bytes in the uniform block: two column-major 4x4 matrices.
pub(super) const UNIFORM_SIZE: u64 = 128;
/// Offset of `screen_projection` within the uniform block.
pub(super) const SCREEN_PROJECTION_OFFSET: u64 = 64;

/// First binding used by textures.
pub(super) const FIRST_TEXTURE_BINDING: u32 = 2;

const UNIFORMS: &str = r#"
struct Uniforms {
    view_projection: mat4x4<f32>,
    screen_projection: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;
"#;

const BATCH_QUAD_STAGES: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
    @location(2) texture_coordinates: vec2<f32>,
    @location(3) texture_index: f32,
    @location(4) projection_type: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) texture_coordinates: vec2<f32>,
    @location(2) @interpolate(flat) texture_index: u32,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var projection = uniforms.view_projection;
    if in.projection_type > 0.5 {
        projection = uniforms.screen_projection;
    }

    var out: VertexOutput;
    out.clip_position = projection * vec4<f32>(in.position, 0.0, 1.0);
    out.color = in.color;
    out.texture_coordinates = in.texture_coordinates;
    out.texture_index = u32(in.texture_index + 0.5);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let uv = vec2<f32>(in.texture_coordinates.x, 1.0 - in.texture_coordinates.y);
    return sample_slot(in.texture_index, uv) * in.color;
}
"#;

const BATCH_LINE: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
    @location(2) projection_type: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var projection = uniforms.view_projection;
    if in.projection_type > 0.5 {
        projection = uniforms.screen_projection;
    }

    var out: VertexOutput;
    out.clip_position = projection * vec4<f32>(in.position, 0.0, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

const QUAD: &str = r#"
@group(0) @binding(1)
var texture_sampler: sampler;
@group(0) @binding(2)
var texture_0: texture_2d<f32>;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
    @location(2) texture_coordinates: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) texture_coordinates: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.view_projection * vec4<f32>(in.position, 0.0, 1.0);
    out.color = in.color;
    out.texture_coordinates = in.texture_coordinates;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let uv = vec2<f32>(in.texture_coordinates.x, 1.0 - in.texture_coordinates.y);
    return textureSample(texture_0, texture_sampler, uv) * in.color;
}
"#;

const LINE: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.view_projection * vec4<f32>(in.position, 0.0, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Number of texture bindings `program` declares.
pub(super) fn texture_bindings(program: ShaderProgram, texture_slots: u32) -> u32 {
    match program {
        ShaderProgram::BatchQuad => texture_slots.max(1),
        ShaderProgram::Quad => 1,
        ShaderProgram::BatchLine | ShaderProgram::Line => 0,
    }
}

/// Full WGSL module for `program`.
pub(super) fn source(program: ShaderProgram, texture_slots: u32) -> String {
    let mut wgsl = String::from(UNIFORMS);
    match program {
        ShaderProgram::BatchQuad => {
            write_slot_sampler(&mut wgsl, texture_bindings(program, texture_slots));
            wgsl.push_str(BATCH_QUAD_STAGES);
        }
        ShaderProgram::BatchLine => wgsl.push_str(BATCH_LINE),
        ShaderProgram::Quad => wgsl.push_str(QUAD),
        ShaderProgram::Line => wgsl.push_str(LINE),
    }
    wgsl
}

/// Declare `slots` textures and a `sample_slot` function that picks one by index.
///
/// Uses `textureSampleLevel` because the slot index varies per fragment.
fn write_slot_sampler(wgsl: &mut String, slots: u32) {
    wgsl.push_str("\n@group(0) @binding(1)\nvar texture_sampler: sampler;\n");
    for slot in 0..slots {
        let _ = writeln!(
            wgsl,
            "@group(0) @binding({})\nvar texture_{slot}: texture_2d<f32>;",
            FIRST_TEXTURE_BINDING + slot
        );
    }

    wgsl.push_str("\nfn sample_slot(index: u32, uv: vec2<f32>) -> vec4<f32> {\n    switch index {\n");
    for slot in 1..slots {
        let _ = writeln!(
            wgsl,
            "        case {slot}u: {{ return textureSampleLevel(texture_{slot}, texture_sampler, uv, 0.0); }}"
        );
    }
    wgsl.push_str(
        "        default: { return textureSampleLevel(texture_0, texture_sampler, uv, 0.0); }\n    }\n}\n",
    );
}
