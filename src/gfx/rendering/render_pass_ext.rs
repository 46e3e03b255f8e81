//! Render pass extensions for drawing uploaded scene objects

use crate::gfx::resources::object_bindings::ObjectResources;

/// Draws a mesh whose GPU resources have been uploaded
pub trait DrawObject {
    /// Binds the object's uniforms at `group` and issues an indexed draw
    fn draw_object(&mut self, group: u32, object: &ObjectResources);
}

impl DrawObject for wgpu::RenderPass<'_> {
    fn draw_object(&mut self, group: u32, object: &ObjectResources) {
        if object.index_count == 0 {
            return;
        }
        self.set_bind_group(group, &object.bind_group, &[]);
        self.set_vertex_buffer(0, object.vertex_buffer.slice(..));
        self.set_index_buffer(object.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..object.index_count, 0, 0..1);
    }
}
