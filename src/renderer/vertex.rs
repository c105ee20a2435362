//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// 8-bit RGB to a float color with the given alpha
pub fn rgb(c: [u8; 3], alpha: f32) -> [f32; 4] {
    [
        c[0] as f32 / 255.0,
        c[1] as f32 / 255.0,
        c[2] as f32 / 255.0,
        alpha,
    ]
}

/// Replace the color with its luma, keeping alpha
pub fn grayscale(color: [f32; 4]) -> [f32; 4] {
    let lum = 0.2989 * color[0] + 0.5870 * color[1] + 0.1140 * color[2];
    [lum, lum, lum, color[3]]
}

/// Colors for game elements
pub mod colors {
    pub const SKY_TOP: [u8; 3] = [120, 180, 235];
    pub const SKY_BOTTOM: [u8; 3] = [200, 230, 250];
    pub const GROUND: [u8; 3] = [150, 120, 80];

    pub const BOMB_BODY: [u8; 3] = [20, 60, 90];
    pub const BOMB_SHINE: [u8; 3] = [40, 100, 140];
    pub const BOMB_FUSE: [u8; 3] = [80, 60, 40];
    pub const BOMB_SPARK: [u8; 3] = [255, 220, 80];

    pub const COIN_FACE: [u8; 3] = [212, 175, 55];
    pub const COIN_RIM: [u8; 3] = [120, 90, 20];

    pub const HEALTH_BOX: [u8; 3] = [255, 255, 255];
    pub const HEALTH_CROSS: [u8; 3] = [200, 40, 40];

    pub const PLAYER_BODY: [u8; 3] = [0, 0, 0];
    pub const PLAYER_SKIN: [u8; 3] = [240, 200, 160];
    pub const HURT_TINT: [u8; 3] = [220, 40, 40];

    pub const PLANE_BODY: [u8; 3] = [110, 120, 110];
    pub const PLANE_WING: [u8; 3] = [80, 90, 80];
    pub const PLANE_WINDOW: [u8; 3] = [180, 220, 240];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(Vertex::desc().array_stride, 24);
    }

    #[test]
    fn test_grayscale_keeps_alpha() {
        let g = grayscale([1.0, 0.0, 0.0, 0.5]);
        assert!((g[0] - 0.2989).abs() < 1e-6);
        assert_eq!(g[0], g[1]);
        assert_eq!(g[1], g[2]);
        assert_eq!(g[3], 0.5);
        let white = grayscale([1.0, 1.0, 1.0, 1.0]);
        assert!((white[0] - 0.9999).abs() < 1e-4);
    }
}
