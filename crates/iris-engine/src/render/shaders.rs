//! WGSL sources for both passes.
//!
//! The `.wgsl` files are templates: vertex tables come from [`geometry`] and
//! the background color from [`BackgroundConfig`](super::BackgroundConfig), so
//! the shader and the host never disagree on ordering or defaults.

use std::fmt::Write as _;

use super::geometry::{BACKGROUND_TRIANGLE, QUAD_VERTICES};
use crate::paint::Color;

const BACKGROUND_TEMPLATE: &str = include_str!("shaders/background.wgsl");
const IMAGE_TEMPLATE: &str = include_str!("shaders/image.wgsl");

pub(crate) const VS_ENTRY: &str = "vs_main";
pub(crate) const FS_ENTRY: &str = "fs_main";

/// Bind group slots of the image pass.
pub(crate) const UNIFORMS_BINDING: u32 = 0;
pub(crate) const TEXTURE_BINDING: u32 = 1;
pub(crate) const SAMPLER_BINDING: u32 = 2;

pub(crate) fn background_source(color: Color) -> String {
    let positions = vec2_list(BACKGROUND_TRIANGLE.iter().copied());
    let color = format!(
        "vec4<f32>({}, {}, {}, {})",
        float(color.r),
        float(color.g),
        float(color.b),
        float(color.a)
    );

    BACKGROUND_TEMPLATE
        .replace("{{BACKGROUND_POSITIONS}}", &positions)
        .replace("{{BACKGROUND_COLOR}}", &color)
}

pub(crate) fn image_source() -> String {
    let positions = vec2_list(QUAD_VERTICES.iter().map(|v| v.position));
    let uvs = vec2_list(QUAD_VERTICES.iter().map(|v| v.uv));

    IMAGE_TEMPLATE
        .replace("{{QUAD_POSITIONS}}", &positions)
        .replace("{{QUAD_UVS}}", &uvs)
}

/// Float literal WGSL accepts as `f32` (always carries a `.` or exponent).
fn float(v: f32) -> String {
    // Debug formatting keeps the fractional part (`1.0`, not `1`).
    let v = if v.is_finite() { v } else { 0.0 };
    format!("{v:?}")
}

fn vec2_list(points: impl Iterator<Item = [f32; 2]>) -> String {
    let mut out = String::new();
    for (i, [x, y]) in points.enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        let _ = write!(out, "        vec2<f32>({}, {})", float(x), float(y));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::UNIFORMS_SIZE;

    fn parse_and_validate(source: &str) -> naga::Module {
        let module = naga::front::wgsl::parse_str(source)
            .unwrap_or_else(|e| panic!("WGSL parse error: {}", e.emit_to_string(source)));

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        );
        validator
            .validate(&module)
            .unwrap_or_else(|e| panic!("WGSL validation error: {e:?}"));

        module
    }

    fn entry_points(module: &naga::Module) -> Vec<(String, naga::ShaderStage)> {
        module
            .entry_points
            .iter()
            .map(|ep| (ep.name.clone(), ep.stage))
            .collect()
    }

    #[test]
    fn templates_are_fully_expanded() {
        assert!(!background_source(Color::BACKGROUND).contains("{{BACKGROUND_"));
        assert!(!image_source().contains("{{QUAD_"));
    }

    #[test]
    fn float_literals_keep_a_fraction() {
        assert_eq!(float(1.0), "1.0");
        assert_eq!(float(-0.5), "-0.5");
        assert_eq!(float(0.051), "0.051");
        assert_eq!(float(f32::NAN), "0.0");
    }

    #[test]
    fn background_shader_is_valid_and_unbound() {
        let module = parse_and_validate(&background_source(Color::BACKGROUND));
        assert_eq!(
            entry_points(&module),
            vec![
                (VS_ENTRY.to_string(), naga::ShaderStage::Vertex),
                (FS_ENTRY.to_string(), naga::ShaderStage::Fragment),
            ]
        );
        assert!(
            module.global_variables.iter().all(|(_, g)| g.binding.is_none()),
            "background pass takes no resources"
        );
    }

    #[test]
    fn background_color_is_baked_in() {
        let src = background_source(Color::new(0.25, 0.5, 0.75, 1.0));
        assert!(src.contains("vec4<f32>(0.25, 0.5, 0.75, 1.0)"));
        parse_and_validate(&src);
    }

    #[test]
    fn image_shader_is_valid() {
        let module = parse_and_validate(&image_source());
        assert_eq!(
            entry_points(&module),
            vec![
                (VS_ENTRY.to_string(), naga::ShaderStage::Vertex),
                (FS_ENTRY.to_string(), naga::ShaderStage::Fragment),
            ]
        );
    }

    #[test]
    fn image_shader_bindings_match_layout() {
        let module = parse_and_validate(&image_source());

        let mut seen = Vec::new();
        for (_, global) in module.global_variables.iter() {
            let Some(binding) = &global.binding else { continue };
            assert_eq!(binding.group, 0);

            let inner = &module.types[global.ty].inner;
            match binding.binding {
                UNIFORMS_BINDING => {
                    assert_eq!(global.space, naga::AddressSpace::Uniform);
                    match inner {
                        naga::TypeInner::Struct { members, span } => {
                            assert_eq!(u64::from(*span), UNIFORMS_SIZE);
                            assert_eq!(members.len(), 2);
                            assert_eq!(members[0].offset, 0);
                            assert_eq!(members[1].offset, 64);
                        }
                        other => panic!("binding 0 should be a struct, got {other:?}"),
                    }
                }
                TEXTURE_BINDING => match inner {
                    naga::TypeInner::Image { dim, arrayed, .. } => {
                        assert_eq!(*dim, naga::ImageDimension::D2);
                        assert!(!arrayed);
                    }
                    other => panic!("binding 1 should be a texture, got {other:?}"),
                },
                SAMPLER_BINDING => {
                    assert!(matches!(inner, naga::TypeInner::Sampler { comparison: false }));
                }
                other => panic!("unexpected binding slot {other}"),
            }
            seen.push(binding.binding);
        }

        seen.sort_unstable();
        assert_eq!(seen, vec![UNIFORMS_BINDING, TEXTURE_BINDING, SAMPLER_BINDING]);
    }

    #[test]
    fn generated_tables_follow_geometry_order() {
        let src = image_source();
        let first = src.find("vec2<f32>(-0.5, 0.5)").unwrap();
        let last = src.find("vec2<f32>(0.5, -0.5)").unwrap();
        assert!(first < last);
        // Positions block precedes the UV block, which starts at the top-left texel.
        let uvs = src.find("var uvs = array<vec2<f32>, 6>(").unwrap();
        let uv_block = src[uvs..]
            .trim_start_matches("var uvs = array<vec2<f32>, 6>(")
            .trim_start();
        assert!(uv_block.starts_with("vec2<f32>(0.0, 0.0)"));
    }
}
