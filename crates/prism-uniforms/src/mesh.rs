use bytemuck::{Pod, Zeroable};

/// Position (xyz) followed by color (rgb); 24-byte stride.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const RED: [f32; 3] = [1.0, 0.0, 0.0];

const fn v(x: f32, y: f32, color: [f32; 3]) -> Vertex {
    Vertex { position: [x, y, 0.0], color }
}

/// A green rectangle with a red triangle roof on top of it.
///
/// The roof does not share vertices with the rectangle so each part keeps
/// its own flat color.
pub const VERTICES: [Vertex; 7] = [
    v(-0.5, -0.5, GREEN),
    v( 0.5, -0.5, GREEN),
    v(-0.5,  0.0, GREEN),
    v( 0.5,  0.0, GREEN),
    v(-0.5,  0.0, RED),
    v( 0.5,  0.0, RED),
    v( 0.0,  0.5, RED),
];

/// Triangle list: two triangles for the rectangle, one for the roof.
pub const INDICES: [u16; 9] = [
    0, 1, 2,
    1, 3, 2,
    4, 5, 6,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_stride_is_six_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(Vertex::layout().array_stride, 24);
    }

    #[test]
    fn color_attribute_follows_position() {
        let layout = Vertex::layout();
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[1].shader_location, 1);
        assert_eq!(layout.attributes[1].offset, 12);
    }

    #[test]
    fn indices_stay_in_range() {
        assert!(INDICES.iter().all(|&i| (i as usize) < VERTICES.len()));
        assert_eq!(INDICES.len() % 3, 0);
    }

    #[test]
    fn roof_is_red_and_body_green() {
        assert!(INDICES[..6].iter().all(|&i| VERTICES[i as usize].color == GREEN));
        assert!(INDICES[6..].iter().all(|&i| VERTICES[i as usize].color == RED));
    }

    #[test]
    fn raw_bytes_match_interleaved_layout() {
        let floats: &[f32] = bytemuck::cast_slice(&VERTICES);
        assert_eq!(floats.len(), 7 * 6);
        assert_eq!(&floats[36..42], &[0.0, 0.5, 0.0, 1.0, 0.0, 0.0]);
    }
}
