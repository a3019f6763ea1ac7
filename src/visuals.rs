//! Colours and blending used by the sculpture.
//!
//! Palette entries are authored as sRGB hex values and converted to linear RGB
//! before they reach the GPU, since the surface format is sRGB.

use glam::Vec3;

/// Deep emerald accent.
pub const EMERALD: u32 = 0x004d40;
/// Gold used for ornaments and the key light.
pub const GOLD: u32 = 0xffd700;
/// Deep red ornament colour.
pub const DEEP_RED: u32 = 0x8b0000;
/// Warm white ornament colour.
pub const OFF_WHITE: u32 = 0xfdfcf0;
/// Bright green ornament colour.
pub const ORNAMENT_GREEN: u32 = 0x00c853;
/// Clear colour of the scene.
pub const BACKGROUND: u32 = 0x010a01;

/// Ornament colours; each ornament picks one uniformly.
pub const ORNAMENT_PALETTE: [u32; 4] = [GOLD, DEEP_RED, OFF_WHITE, ORNAMENT_GREEN];

/// Foliage colour at hash 0 (used as-is, not sRGB-decoded).
pub const FOLIAGE_BASE_COLOR: Vec3 = Vec3::new(0.0, 0.3, 0.25);
/// Foliage colour at hash 1.
pub const FOLIAGE_TIP_COLOR: Vec3 = Vec3::new(1.0, 0.84, 0.0);
/// Fraction of the way towards [`FOLIAGE_TIP_COLOR`] the brightest needle gets.
pub const FOLIAGE_TIP_MIX: f32 = 0.2;

/// Convert a single sRGB channel in `[0, 1]` to linear.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Decode a `0xRRGGBB` sRGB colour into linear RGB.
pub fn hex_to_linear(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

/// Background colour as a wgpu clear colour.
pub fn clear_color() -> wgpu::Color {
    let c = hex_to_linear(BACKGROUND);
    wgpu::Color {
        r: c.x as f64,
        g: c.y as f64,
        b: c.z as f64,
        a: 1.0,
    }
}

/// Blend mode for a render layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha blending (default).
    #[default]
    Alpha,

    /// Additive blending.
    ///
    /// Overlapping needles brighten each other, giving the foliage its glow.
    Additive,
}

impl BlendMode {
    /// Convert to the wgpu blend state.
    pub fn to_blend_state(self) -> wgpu::BlendState {
        match self {
            BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
            BlendMode::Additive => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            },
        }
    }

    /// Whether a layer drawn with this mode should write depth.
    pub fn writes_depth(self) -> bool {
        !matches!(self, BlendMode::Additive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_linear_extremes() {
        assert_eq!(hex_to_linear(0x000000), Vec3::ZERO);
        let white = hex_to_linear(0xffffff);
        assert!((white - Vec3::ONE).abs().max_element() < 1e-5);
    }

    #[test]
    fn test_gold_channels() {
        let gold = hex_to_linear(GOLD);
        assert!((gold.x - 1.0).abs() < 1e-5);
        // 0xd7 = 215 -> ~0.68 linear
        assert!(gold.y > 0.6 && gold.y < 0.75);
        assert_eq!(gold.z, 0.0);
    }

    #[test]
    fn test_additive_does_not_write_depth() {
        assert!(!BlendMode::Additive.writes_depth());
        assert!(BlendMode::Alpha.writes_depth());
    }
}
