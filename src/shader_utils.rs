//! WGSL for the rendering side of the light-volume classifier.
//!
//! [`CLASSIFY_WGSL`] is the GPU twin of [`crate::light_volume::classify`]. It
//! is shared by the point-sprite render shader, which uses it in the fragment
//! stage to pick the lit or faded opacity, and by the compute shader the
//! headless GPU classifier runs to check the two paths agree.
//!
//! # Bindings
//!
//! Render shader (group 0):
//! - `@binding(0)` [`Uniforms`](crate::uniforms::Uniforms)
//! - `@binding(1)` [`LightVolumeUniforms`](crate::uniforms::LightVolumeUniforms)
//! - vertex buffer 0, instance step mode: packed `vec3<f32>` positions
//!
//! Compute shader (group 0):
//! - `@binding(0)` packed positions as `array<f32>`
//! - `@binding(1)` light volume uniforms
//! - `@binding(2)` `array<u32>` output, 1 inside / 0 outside

/// Threads per compute workgroup.
pub const WORKGROUP_SIZE: u32 = 256;

/// Light volume struct and the containment test.
pub const CLASSIFY_WGSL: &str = r#"
struct LightVolume {
    shear: mat4x4<f32>,
    center: vec3<f32>,
    lit_alpha: f32,
    half_extent: vec3<f32>,
    faded_alpha: f32,
    color: vec3<f32>,
    point_size: f32,
};

// Shear is translation-free; the center is subtracted separately.
fn classify_light_volume(volume: LightVolume, pos: vec3<f32>) -> bool {
    let local = (volume.shear * vec4<f32>(pos, 0.0)).xyz;
    let delta = abs(volume.center - local);
    return all(delta <= volume.half_extent);
}
"#;

/// Point-sprite render shader using the classifier in the fragment stage.
pub fn render_shader() -> String {
    format!(
        r#"{CLASSIFY_WGSL}
struct Uniforms {{
    view_proj: mat4x4<f32>,
    viewport: vec2<f32>,
    time: f32,
    delta_time: f32,
}};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(0) @binding(1)
var<uniform> light_volume: LightVolume;

struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) @interpolate(flat) world_pos: vec3<f32>,
    @location(1) uv: vec2<f32>,
}};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) particle_pos: vec3<f32>,
) -> VertexOutput {{
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    let quad_pos = quad_vertices[vertex_index];
    var clip_pos = uniforms.view_proj * vec4<f32>(particle_pos, 1.0);

    // point_size is in pixels; NDC spans 2 units across the viewport.
    let half_size = light_volume.point_size / uniforms.viewport;
    clip_pos.x += quad_pos.x * half_size.x * clip_pos.w;
    clip_pos.y += quad_pos.y * half_size.y * clip_pos.w;

    var out: VertexOutput;
    out.clip_position = clip_pos;
    out.world_pos = particle_pos;
    out.uv = quad_pos;
    return out;
}}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {{
    if length(in.uv) > 1.0 {{
        discard;
    }}
    let lit = classify_light_volume(light_volume, in.world_pos);
    let alpha = select(light_volume.faded_alpha, light_volume.lit_alpha, lit);
    return vec4<f32>(light_volume.color, alpha);
}}
"#
    )
}

/// Compute shader writing one classification per particle.
///
/// Dispatches may be two-dimensional when the workgroup count exceeds the
/// per-dimension limit; the flat index folds `y` back in.
pub fn classify_compute_shader() -> String {
    format!(
        r#"{CLASSIFY_WGSL}
@group(0) @binding(0)
var<storage, read> positions: array<f32>;

@group(0) @binding(1)
var<uniform> light_volume: LightVolume;

@group(0) @binding(2)
var<storage, read_write> classes: array<u32>;

@compute @workgroup_size({WORKGROUP_SIZE})
fn main(
    @builtin(global_invocation_id) global_id: vec3<u32>,
    @builtin(num_workgroups) num_groups: vec3<u32>,
) {{
    let index = global_id.x + global_id.y * num_groups.x * {WORKGROUP_SIZE}u;
    if index >= arrayLength(&classes) {{
        return;
    }}

    let base = index * 3u;
    let pos = vec3<f32>(positions[base], positions[base + 1u], positions[base + 2u]);
    classes[index] = select(0u, 1u, classify_light_volume(light_volume, pos));
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_classify_snippet_is_valid() {
        validate_wgsl(CLASSIFY_WGSL).expect("classifier WGSL should be valid");
    }

    #[test]
    fn test_render_shader_is_valid() {
        let shader = render_shader();
        assert!(shader.contains("fn vs_main"));
        assert!(shader.contains("fn fs_main"));
        assert!(shader.contains("classify_light_volume(light_volume, in.world_pos)"));
        validate_wgsl(&shader).expect("render WGSL should be valid");
    }

    #[test]
    fn test_compute_shader_is_valid() {
        let shader = classify_compute_shader();
        assert!(shader.contains("@workgroup_size(256)"));
        validate_wgsl(&shader).expect("compute WGSL should be valid");
    }
}
