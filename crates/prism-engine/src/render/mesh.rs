use bytemuck::Pod;
use wgpu::util::DeviceExt;

/// Static indexed mesh: one vertex buffer and one `u16` index buffer,
/// uploaded once and never modified.
pub struct IndexedMesh {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

impl IndexedMesh {
    pub fn upload<V: Pod>(
        device: &wgpu::Device,
        label: &str,
        vertices: &[V],
        indices: &[u16],
    ) -> Self {
        debug_assert!(
            indices.iter().all(|&i| (i as usize) < vertices.len()),
            "IndexedMesh::upload: index out of range for {} vertices",
            vertices.len()
        );

        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} vbo")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} ibo")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::info!(
            "uploaded mesh '{label}': {} vertices, {} indices",
            vertices.len(),
            indices.len()
        );

        Self {
            vbo,
            ibo,
            index_count: indices.len() as u32,
        }
    }

    /// Binds the mesh buffers to `pass` and draws every index once.
    ///
    /// The caller sets the pipeline and bind groups first.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vbo.slice(..));
        pass.set_index_buffer(self.ibo.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
