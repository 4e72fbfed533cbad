use crate::constants::Constants;
use bytemuck::{Pod, Zeroable};
use glam::{Mat2, Vec2};
use std::f64::consts::PI;

pub const VERTEX_COUNT: usize = 5;
pub const INDEX_COUNT: usize = 5;

/// Triangle-strip order covering the face. Identical for every instance.
pub const STRIP_INDICES: [u16; INDEX_COUNT] = [2, 3, 1, 4, 0];

/// Accent color carried by every face vertex (orange).
pub const ACCENT_COLOR: [f32; 4] = [1.0, 165.0 / 255.0, 0.0, 1.0];

/// GPU vertex record: 2D position plus RGBA color, 24 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FaceVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// One irregular pentagon in its local frame.
///
/// The origin is the incircle center, the face lies in the XY plane and the
/// outline runs clockwise when seen from +Z. Vertex 2 is the acute apex on
/// the negative Y axis; the face is mirror-symmetric about X = 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    vertices: [FaceVertex; VERTEX_COUNT],
    indices: [u16; INDEX_COUNT],
}

impl Face {
    /// Build the face mesh from the constant set.
    pub fn build(constants: &Constants) -> Self {
        let vertices = outline(constants).map(|p| FaceVertex {
            position: p.to_array(),
            color: ACCENT_COLOR,
        });
        Self {
            vertices,
            indices: STRIP_INDICES,
        }
    }

    pub fn vertices(&self) -> &[FaceVertex; VERTEX_COUNT] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16; INDEX_COUNT] {
        &self.indices
    }

    /// Vertex positions in boundary order.
    pub fn outline(&self) -> [Vec2; VERTEX_COUNT] {
        self.vertices.map(|v| Vec2::from_array(v.position))
    }

    /// The strip expanded into a triangle list.
    ///
    /// Odd strip triangles have their first two indices swapped so all three
    /// share the winding of the first one.
    pub fn triangles(&self) -> [[u16; 3]; INDEX_COUNT - 2] {
        let i = &self.indices;
        std::array::from_fn(|k| {
            if k % 2 == 0 {
                [i[k], i[k + 1], i[k + 2]]
            } else {
                [i[k + 1], i[k], i[k + 2]]
            }
        })
    }

    /// Shoelace area of the outline. Negative because the outline is clockwise.
    pub fn signed_area(&self) -> f32 {
        let p = self.outline();
        let twice: f32 = (0..VERTEX_COUNT)
            .map(|k| p[k].perp_dot(p[(k + 1) % VERTEX_COUNT]))
            .sum();
        twice / 2.0
    }

    pub fn area(&self) -> f32 {
        self.signed_area().abs()
    }
}

fn outline(constants: &Constants) -> [Vec2; VERTEX_COUNT] {
    let r = constants.r() as f32;
    let a = constants.a() as f32;
    let turn = Mat2::from_angle((PI + constants.angle_b()) as f32);

    let v0 = Vec2::new(0.5, r);
    let v1 = v0 + turn * Vec2::X;
    let mut v2 = v1 + turn * (turn * Vec2::new(a, 0.0));
    // The apex sits on the mirror axis.
    v2.x = 0.0;
    let v3 = Vec2::new(-v1.x, v1.y);
    let v4 = Vec2::new(-v0.x, v0.y);

    [v0, v1, v2, v3, v4]
}
