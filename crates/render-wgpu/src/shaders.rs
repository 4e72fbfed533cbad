/// WGSL shader for instanced pentagon faces.
///
/// Per-instance inputs are the [`InstanceInfo`](pentahex_render::InstanceInfo)
/// record (locations 2..4) followed by the node's model matrix (5..8).
pub const FACE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
};

struct InstanceInput {
    @location(2) spherical: vec3<f32>,
    @location(3) rotation: f32,
    @location(4) scale: f32,
    @location(5) model_0: vec4<f32>,
    @location(6) model_1: vec4<f32>,
    @location(7) model_2: vec4<f32>,
    @location(8) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

fn spherical_offset(s: vec3<f32>) -> vec3<f32> {
    return s.x * vec3<f32>(sin(s.y) * cos(s.z), cos(s.y), sin(s.y) * sin(s.z));
}

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let node = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let c = cos(instance.rotation);
    let s = sin(instance.rotation);
    let local = instance.scale * vec2<f32>(
        c * vertex.position.x - s * vertex.position.y,
        s * vertex.position.x + c * vertex.position.y,
    );
    let world = uniforms.model * node;
    let world_pos = world * vec4<f32>(local, 0.0, 1.0)
        + vec4<f32>(spherical_offset(instance.spherical), 0.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize((world * vec4<f32>(0.0, 0.0, 1.0, 0.0)).xyz);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let light_dir = normalize(vec3<f32>(0.3, 0.6, 1.0));
    let ambient = 0.35;
    let diffuse = abs(dot(in.world_normal, light_dir));
    let lighting = ambient + diffuse * 0.65;
    return vec4<f32>(in.color.rgb * lighting, in.color.a);
}
"#;
