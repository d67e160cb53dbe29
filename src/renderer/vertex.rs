//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::sim::Tint;

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

/// Colors for game elements
pub mod colors {
    pub const PLAYER: [f32; 4] = [0.23, 0.91, 1.0, 1.0]; // #3ae8ff
    pub const COCKPIT: [f32; 4] = [1.0, 1.0, 1.0, 0.6];
    pub const ENEMY: [f32; 4] = [0.88, 0.28, 0.56, 1.0]; // #e04890
    pub const PLAYER_SHOT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const ENEMY_SHOT: [f32; 4] = [1.0, 0.87, 0.4, 1.0]; // #fd6
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.06, 1.0];
    /// Starfield palette, cycled by star index
    pub const STARS: [[f32; 4]; 4] = [
        [1.0, 1.0, 1.0, 0.2],
        [1.0, 1.0, 1.0, 0.73],
        [0.23, 0.91, 1.0, 0.4],
        [0.88, 0.28, 0.56, 0.4],
    ];
}

/// RGBA for a simulation tint
pub fn tint_color(tint: Tint) -> [f32; 4] {
    match tint {
        Tint::Player => colors::PLAYER,
        Tint::Enemy => colors::ENEMY,
        Tint::White => colors::PLAYER_SHOT,
        Tint::Amber => colors::ENEMY_SHOT,
    }
}

/// Same color with alpha scaled
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}
