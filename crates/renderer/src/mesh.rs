use bytemuck::{Pod, Zeroable};

/// Vertex layout shared by the GPU pipeline: position at location 0, uv at 1.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Subdivided rectangle centred on the origin in the z = 0 plane.
///
/// uv runs from (0, 0) at the bottom-left corner to (1, 1) at the top-right.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneMesh {
    width: f32,
    height: f32,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl PlaneMesh {
    pub fn new(width: f32, height: f32, segments_x: u32, segments_y: u32) -> Self {
        let segments_x = segments_x.max(1);
        let segments_y = segments_y.max(1);
        let columns = segments_x + 1;

        let mut vertices = Vec::with_capacity((columns * (segments_y + 1)) as usize);
        for row in 0..=segments_y {
            let v = row as f32 / segments_y as f32;
            for column in 0..=segments_x {
                let u = column as f32 / segments_x as f32;
                vertices.push(Vertex {
                    position: [(u - 0.5) * width, (v - 0.5) * height, 0.0],
                    uv: [u, v],
                });
            }
        }

        let mut indices = Vec::with_capacity((segments_x * segments_y * 6) as usize);
        for row in 0..segments_y {
            for column in 0..segments_x {
                let a = row * columns + column;
                let b = a + 1;
                let c = a + columns;
                let d = c + 1;
                indices.extend_from_slice(&[a, b, d, a, d, c]);
            }
        }

        Self {
            width,
            height,
            vertices,
            indices,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}
