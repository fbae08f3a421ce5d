use bytemuck::{Pod, Zeroable};

/// One vertex: a clip-space position.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    /// Attribute table: `@location(0)` is the position.
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("mesh has no vertices or no indices")]
    Empty,

    #[error("index count {0} is not a multiple of 3")]
    IndexCountNotTriangles(usize),

    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        index: u32,
        position: usize,
        vertex_count: usize,
    },
}

/// Indexed triangle list.
///
/// Invariant: non-empty, index count divisible by 3, every index in range.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if vertices.is_empty() || indices.is_empty() {
            return Err(MeshError::Empty);
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotTriangles(indices.len()));
        }
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertices.len())
        {
            return Err(MeshError::IndexOutOfRange {
                index,
                position,
                vertex_count: vertices.len(),
            });
        }

        Ok(Self { vertices, indices })
    }

    /// Axis-aligned quad of half-extent 0.5, two triangles sharing the diagonal
    /// from top-right (1) to top-left (3).
    pub fn quad() -> Self {
        Self {
            vertices: vec![
                Vertex::new(0.5, 0.5, 0.0),   // top right
                Vertex::new(0.5, -0.5, 0.0),  // bottom right
                Vertex::new(-0.5, -0.5, 0.0), // bottom left
                Vertex::new(-0.5, 0.5, 0.0),  // top left
            ],
            indices: vec![0, 1, 3, 1, 2, 3],
        }
    }

    pub fn triangle() -> Self {
        Self {
            vertices: vec![
                Vertex::new(-0.5, -0.5, 0.0),
                Vertex::new(0.5, -0.5, 0.0),
                Vertex::new(0.0, 0.5, 0.0),
            ],
            indices: vec![0, 1, 2],
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
