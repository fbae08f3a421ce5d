use wgpu::util::DeviceExt;

use super::Mesh;

/// A `Mesh` uploaded to static GPU buffers.
///
/// Buffers are released when this value is dropped.
pub struct GpuMesh {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        let vbo_label = format!("{label} vbo");
        let ibo_label = format!("{label} ibo");

        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(vbo_label.as_str()),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(ibo_label.as_str()),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "uploaded mesh \"{label}\": {} vertices, {} triangles",
            mesh.vertices().len(),
            mesh.triangle_count()
        );

        Self {
            vbo,
            ibo,
            index_count: mesh.indices().len() as u32,
        }
    }

    /// Binds the buffers and issues one indexed draw.
    ///
    /// The caller sets the pipeline.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vbo.slice(..));
        pass.set_index_buffer(self.ibo.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_sizes_buffers_from_mesh() {
        let (device, _queue) = wgpu::Device::noop(&wgpu::DeviceDescriptor::default());

        let quad = GpuMesh::upload(&device, "quad", &Mesh::quad());
        assert_eq!(quad.vbo.size(), 4 * 12);
        assert_eq!(quad.ibo.size(), 6 * 4);
        assert_eq!(quad.index_count, 6);

        let triangle = GpuMesh::upload(&device, "triangle", &Mesh::triangle());
        assert_eq!(triangle.vbo.size(), 3 * 12);
        assert_eq!(triangle.index_count, 3);
    }
}
