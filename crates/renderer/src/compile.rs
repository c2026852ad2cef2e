use std::borrow::Cow;

use wgpu::naga::ShaderStage;

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    })
}

/// Compiles the lens fragment shader.
pub(crate) fn compile_fragment_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("lens fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(FRAGMENT_SHADER_GLSL),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    })
}

/// Minimal full-screen triangle vertex shader.
///
/// `v_uv` spans `[0, 1]²` across the viewport with `y = 0` at the bottom.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

/// Lens bubble fragment shader.
///
/// Must stay in step with `refraction::shade`; the uniform block layout must
/// match [`LensUniforms`](crate::gpu::LensUniforms).
const FRAGMENT_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform LensUniforms {
    vec2 _resolution;
    vec2 _imageResolution;
    vec2 _mouse;
    vec2 _padding0;
    vec4 _lens;
    vec4 _shaping;
} ubo;

#define resolution ubo._resolution
#define imageResolution ubo._imageResolution
#define u_mouse ubo._mouse
#define radius ubo._lens.x
#define edgeWidth ubo._lens.y
#define shadowBand ubo._lens.z
#define shadowFloor ubo._lens.w
#define noiseFrequency ubo._shaping.x
#define noiseAmplitude ubo._shaping.y
#define refractionStart ubo._shaping.z
#define refractionPower ubo._shaping.w

layout(set = 1, binding = 0) uniform texture2D lens_source_texture;
layout(set = 1, binding = 1) uniform sampler lens_source_sampler;

#define u_tex sampler2D(lens_source_texture, lens_source_sampler)

float map_range(float value, float min1, float max1, float min2, float max2) {
    float v = clamp(value, min1, max1);
    return min2 + (v - min1) * (max2 - min2) / (max1 - min1);
}

vec2 fade(vec2 t) {
    return t * t * t * (t * (t * 6.0 - 15.0) + 10.0);
}

vec4 permute(vec4 x) {
    return mod(((x * 34.0) + 1.0) * x, vec4(289.0));
}

float cnoise(vec2 P) {
    vec4 Pi = floor(P.xyxy) + vec4(0.0, 0.0, 1.0, 1.0);
    vec4 Pf = fract(P.xyxy) - vec4(0.0, 0.0, 1.0, 1.0);
    Pi = mod(Pi, vec4(289.0));
    vec4 ix = Pi.xzxz;
    vec4 iy = Pi.yyww;
    vec4 fx = Pf.xzxz;
    vec4 fy = Pf.yyww;
    vec4 i = permute(permute(ix) + iy);
    vec4 gx = 2.0 * fract(i * 0.024390243) - 1.0;
    vec4 gy = abs(gx) - 0.5;
    vec4 tx = floor(gx + 0.5);
    gx = gx - tx;
    vec2 g00 = vec2(gx.x, gy.x);
    vec2 g10 = vec2(gx.y, gy.y);
    vec2 g01 = vec2(gx.z, gy.z);
    vec2 g11 = vec2(gx.w, gy.w);
    vec4 norm = 1.7928429 - 0.8537347 * vec4(dot(g00, g00), dot(g01, g01), dot(g10, g10), dot(g11, g11));
    g00 *= norm.x;
    g01 *= norm.y;
    g10 *= norm.z;
    g11 *= norm.w;
    float n00 = dot(g00, vec2(fx.x, fy.x));
    float n10 = dot(g10, vec2(fx.y, fy.y));
    float n01 = dot(g01, vec2(fx.z, fy.z));
    float n11 = dot(g11, vec2(fx.w, fy.w));
    vec2 fade_xy = fade(Pf.xy);
    vec2 n_x = mix(vec2(n00, n01), vec2(n10, n11), vec2(fade_xy.x));
    float n_xy = mix(n_x.x, n_x.y, fade_xy.y);
    return 2.3 * n_xy;
}

void main() {
    // background-size: cover
    vec2 ratio = vec2(
        min((resolution.x / resolution.y) / (imageResolution.x / imageResolution.y), 1.0),
        min((resolution.y / resolution.x) / (imageResolution.y / imageResolution.x), 1.0)
    );
    vec2 uv = v_uv * ratio + (vec2(1.0) - ratio) * 0.5;

    float n = cnoise(uv * noiseFrequency) * noiseAmplitude;
    float dist = distance(v_uv, u_mouse) + n;
    float limit = 1.0 - smoothstep(radius - edgeWidth, radius, dist);

    float range = pow(map_range(dist, refractionStart, radius, 0.0, 1.0), refractionPower);
    vec2 displacement = (uv - u_mouse) * range;
    vec3 inCircle = texture(u_tex, uv - displacement).rgb;

    float shadow = smoothstep(radius, radius + shadowBand, dist);
    shadow = shadow * (1.0 - shadowFloor) + shadowFloor;

    vec3 base = texture(u_tex, uv).rgb;
    vec3 color = mix(vec3(0.0), base, vec3(shadow));
    color = mix(color, inCircle, vec3(limit));
    outColor = vec4(color, 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::naga::front::glsl::{Frontend, Options};
    use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};

    fn parse_and_validate(source: &str, stage: ShaderStage) {
        let module = Frontend::default()
            .parse(&Options::from(stage), source)
            .unwrap_or_else(|err| panic!("{stage:?} shader failed to parse: {err:?}"));
        Validator::new(ValidationFlags::all(), Capabilities::all())
            .validate(&module)
            .unwrap_or_else(|err| panic!("{stage:?} shader failed validation: {err:?}"));
    }

    #[test]
    fn vertex_shader_compiles() {
        parse_and_validate(VERTEX_SHADER_GLSL, ShaderStage::Vertex);
    }

    #[test]
    fn fragment_shader_compiles() {
        parse_and_validate(FRAGMENT_SHADER_GLSL, ShaderStage::Fragment);
    }

    #[test]
    fn fragment_shader_exposes_lens_uniforms() {
        for name in ["resolution", "imageResolution", "u_mouse", "u_tex"] {
            assert!(
                FRAGMENT_SHADER_GLSL.contains(&format!("#define {name} ")),
                "missing {name}"
            );
        }
    }

    /// Per-pixel steps of `main()`, in the order `refraction::LensParams::evaluate`
    /// and `refraction::shade` run them.
    const SHADE_STEPS: &[&str] = &[
        "vec2 uv = v_uv * ratio + (vec2(1.0) - ratio) * 0.5;",
        "float n = cnoise(uv * noiseFrequency) * noiseAmplitude;",
        "float dist = distance(v_uv, u_mouse) + n;",
        "float limit = 1.0 - smoothstep(radius - edgeWidth, radius, dist);",
        "float range = pow(map_range(dist, refractionStart, radius, 0.0, 1.0), refractionPower);",
        "vec2 displacement = (uv - u_mouse) * range;",
        "vec3 inCircle = texture(u_tex, uv - displacement).rgb;",
        "float shadow = smoothstep(radius, radius + shadowBand, dist);",
        "shadow = shadow * (1.0 - shadowFloor) + shadowFloor;",
        "vec3 base = texture(u_tex, uv).rgb;",
        "vec3 color = mix(vec3(0.0), base, vec3(shadow));",
        "color = mix(color, inCircle, vec3(limit));",
    ];

    #[test]
    fn fragment_main_follows_cpu_shading_order() {
        let body = FRAGMENT_SHADER_GLSL
            .split_once("void main()")
            .map(|(_, body)| body)
            .expect("fragment shader has a main function");
        let mut cursor = 0;
        for step in SHADE_STEPS {
            let offset = body[cursor..]
                .find(step)
                .unwrap_or_else(|| panic!("step missing or out of order: {step}"));
            cursor += offset + step.len();
        }
    }

    #[test]
    fn noise_constants_match_cpu_noise() {
        use refraction::noise::{
            GRADIENT_SPREAD, OUTPUT_SCALE, TAYLOR_INV_SQRT_A, TAYLOR_INV_SQRT_B,
        };
        let expected = [
            ("0.024390243", GRADIENT_SPREAD),
            ("1.7928429", TAYLOR_INV_SQRT_A),
            ("0.8537347", TAYLOR_INV_SQRT_B),
            ("2.3", OUTPUT_SCALE),
        ];
        for (literal, value) in expected {
            assert!(FRAGMENT_SHADER_GLSL.contains(literal), "missing {literal}");
            assert_eq!(literal.parse::<f32>().unwrap(), value);
        }
        assert!(FRAGMENT_SHADER_GLSL.contains("mod(((x * 34.0) + 1.0) * x, vec4(289.0))"));
    }
}
