//! The polygon on screen: built-in shapes, and their vertex/index buffers on the GPU.
use std::{ffi::c_void, mem::size_of, ptr::null};

use bytemuck::{Pod, Zeroable};
use gl::types::{GLenum, GLint, GLsizei, GLsizeiptr, GLuint};
use serde::{Deserialize, Serialize};

use crate::{error::DemoError, indices::Triangulation};

#[derive(Clone, Copy, Debug)]
pub enum GlType {
    Float, // f32
}

impl GlType {
    pub const fn get_size(&self) -> usize {
        match *self {
            GlType::Float => size_of::<f32>(),
        }
    }
    pub const fn gl_enum(&self) -> GLenum {
        match *self {
            GlType::Float => gl::FLOAT,
        }
    }
}

/// One vertex attribute: `components` values of `gl_type`, tightly packed.
#[derive(Clone, Copy, Debug)]
pub struct Attribute {
    pub gl_type: GlType,
    pub components: GLint,
}

/// Describes how a vertex type looks to OpenGL.
/// Attribute `i` in `ATTRIBUTES` is bound to shader location `i`.
///
/// # Safety
/// `ATTRIBUTES` must match the byte layout of `Self` exactly, in order, with
/// no padding in between. If it says 3 Floats, `Self` must be 3 f32s.
pub unsafe trait GlLayout: Pod {
    const ATTRIBUTES: &'static [Attribute];
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { pos: [x, y, z] }
    }
}

// SAFETY:
// Vertex is repr(C) and exactly three f32s.
unsafe impl GlLayout for Vertex {
    const ATTRIBUTES: &'static [Attribute] = &[Attribute {
        gl_type: GlType::Float,
        components: 3,
    }];
}

/// The polygons the demo knows how to draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Covers the whole viewport.
    #[default]
    Quad,
    Triangle,
    Pentagon,
}

const QUAD: [Vertex; 4] = [
    Vertex::new(-1.0, 1.0, 0.0),  // Top left
    Vertex::new(-1.0, -1.0, 0.0), // Bottom left
    Vertex::new(1.0, -1.0, 0.0),  // Bottom right
    Vertex::new(1.0, 1.0, 0.0),   // Top right
];

const TRIANGLE: [Vertex; 3] = [
    Vertex::new(0.0, 0.5, 0.0),   // Top
    Vertex::new(-0.5, -0.5, 0.0), // Left
    Vertex::new(0.5, -0.5, 0.0),  // Right
];

const PENTAGON: [Vertex; 5] = [
    Vertex::new(0.0, 1.0, 0.0),   // Top
    Vertex::new(-1.0, 0.3, 0.0),  // Middle left
    Vertex::new(-0.6, -1.0, 0.0), // Bottom left
    Vertex::new(0.6, -1.0, 0.0),  // Bottom right
    Vertex::new(1.0, 0.3, 0.0),   // Middle right
];

impl Shape {
    /// Corners going counter-clockwise around the shape.
    pub fn outline(self) -> &'static [Vertex] {
        match self {
            Self::Quad => &QUAD,
            Self::Triangle => &TRIANGLE,
            Self::Pentagon => &PENTAGON,
        }
    }

    /// The vertices in the order `triangulation` expects them.
    pub fn vertices(self, triangulation: Triangulation) -> Vec<Vertex> {
        match triangulation {
            Triangulation::ConvexFan => self.outline().to_vec(),
            Triangulation::Strip => strip_order(self.outline()),
        }
    }
}

/// Reorder a convex outline so every three consecutive vertices form a
/// triangle inside it: first, second, last, third, second to last, ...
pub fn strip_order<T: Copy>(outline: &[T]) -> Vec<T> {
    let Some((&first, rest)) = outline.split_first() else {
        return vec![];
    };
    let mut order = Vec::with_capacity(outline.len());
    order.push(first);

    let mut remaining = rest.iter().copied();
    let mut from_front = true;
    loop {
        let next = if from_front {
            remaining.next()
        } else {
            remaining.next_back()
        };
        match next {
            Some(vertex) => order.push(vertex),
            None => break,
        }
        from_front = !from_front;
    }
    order
}

/// Vertices and indices, ready to upload.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// # Errors
    /// Errors if no index buffer can be produced for the shape.
    pub fn new(shape: Shape, triangulation: Triangulation) -> Result<Self, DemoError> {
        let vertices = shape.vertices(triangulation);
        let indices = triangulation
            .indices(vertices.len())
            .ok_or(DemoError::DegenerateMesh(vertices.len()))?;
        Ok(Self { vertices, indices })
    }
}

/// Byte length of `bytes` as OpenGL wants it.
fn gl_byte_size(bytes: &[u8]) -> GLsizeiptr {
    // slices never exceed isize::MAX bytes
    bytes.len() as GLsizeiptr
}

/// A mesh living on the GPU: a VAO with its vertex and element buffers.
///
/// All three objects are deleted when this is dropped, so it must not
/// outlive the GL context.
#[derive(Debug)]
pub struct GpuMesh {
    vao: GLuint,
    vbo: GLuint,
    ebo: GLuint,
    index_count: GLsizei,
}

impl GpuMesh {
    /// Upload `vertices` and `indices` once, for static drawing.
    ///
    /// # Errors
    /// Errors if there are more indices than a single draw call takes.
    pub fn upload<V: GlLayout>(vertices: &[V], indices: &[u32]) -> Result<Self, DemoError> {
        let index_count =
            GLsizei::try_from(indices.len()).map_err(|_| DemoError::MeshTooLarge(indices.len()))?;
        let stride = GLsizei::try_from(size_of::<V>())
            .map_err(|_| DemoError::MeshTooLarge(vertices.len()))?;
        let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(indices);

        let (mut vao, mut vbo, mut ebo) = (0, 0, 0);
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);
            gl::GenBuffers(1, &mut ebo);

            // bind the Vertex Array Object first, then bind and set vertex buffers, and then configure attributes
            gl::BindVertexArray(vao);

            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                gl_byte_size(vertex_bytes),
                vertex_bytes.as_ptr().cast(),
                gl::STATIC_DRAW,
            );

            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                gl_byte_size(index_bytes),
                index_bytes.as_ptr().cast(),
                gl::STATIC_DRAW,
            );

            let mut offset = 0;
            for (location, attribute) in (0..).zip(V::ATTRIBUTES) {
                gl::VertexAttribPointer(
                    location,
                    attribute.components,
                    attribute.gl_type.gl_enum(),
                    gl::FALSE,
                    stride,
                    offset as *const c_void,
                );
                gl::EnableVertexAttribArray(location);
                offset += attribute.gl_type.get_size() * attribute.components as usize;
            }

            // the VAO keeps the EBO binding, so only the VBO is unbound
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindVertexArray(0);
        }
        log::debug!(
            "uploaded mesh: vao {vao}, vbo {vbo}, ebo {ebo}, {} vertices, {index_count} indices",
            vertices.len()
        );

        Ok(Self {
            vao,
            vbo,
            ebo,
            index_count,
        })
    }

    pub fn index_count(&self) -> GLsizei {
        self.index_count
    }

    /// Draw every index as triangles with whatever program is current.
    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawElements(gl::TRIANGLES, self.index_count, gl::UNSIGNED_INT, null());
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for GpuMesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ebo);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_order_of_pentagon_is_top_down() {
        let order = Shape::Pentagon.vertices(Triangulation::Strip);
        assert_eq!(
            order,
            vec![
                Vertex::new(0.0, 1.0, 0.0),
                Vertex::new(-1.0, 0.3, 0.0),
                Vertex::new(1.0, 0.3, 0.0),
                Vertex::new(-0.6, -1.0, 0.0),
                Vertex::new(0.6, -1.0, 0.0),
            ]
        );
    }

    #[test]
    fn strip_order_zigzags() {
        assert_eq!(strip_order(&[0, 1, 2, 3, 4, 5]), vec![0, 1, 5, 2, 4, 3]);
        assert_eq!(strip_order(&[0, 1, 2]), vec![0, 1, 2]);
        assert_eq!(strip_order::<u8>(&[]), vec![]);
        assert_eq!(strip_order(&[7]), vec![7]);
    }

    #[test]
    fn fan_uses_outline_as_is() {
        assert_eq!(Shape::Quad.vertices(Triangulation::ConvexFan), QUAD.to_vec());
    }

    /// Twice the signed area; positive when counter-clockwise.
    fn signed_area(a: Vertex, b: Vertex, c: Vertex) -> f32 {
        (b.pos[0] - a.pos[0]) * (c.pos[1] - a.pos[1]) - (b.pos[1] - a.pos[1]) * (c.pos[0] - a.pos[0])
    }

    #[test]
    fn outlines_are_counter_clockwise() {
        for shape in [Shape::Quad, Shape::Triangle, Shape::Pentagon] {
            let mesh = MeshData::new(shape, Triangulation::ConvexFan).unwrap();
            for tri in mesh.indices.chunks(3) {
                let [a, b, c] = [0, 1, 2].map(|k| mesh.vertices[tri[k] as usize]);
                assert!(signed_area(a, b, c) > 0.0, "{shape:?} {tri:?}");
            }
        }
    }

    #[test]
    fn triangulations_cover_the_same_area() {
        for shape in [Shape::Quad, Shape::Triangle, Shape::Pentagon] {
            let area = |triangulation| {
                let mesh = MeshData::new(shape, triangulation).unwrap();
                mesh.indices
                    .chunks(3)
                    .map(|tri| {
                        let [a, b, c] = [0, 1, 2].map(|k| mesh.vertices[tri[k] as usize]);
                        signed_area(a, b, c).abs()
                    })
                    .sum::<f32>()
            };
            let fan = area(Triangulation::ConvexFan);
            let strip = area(Triangulation::Strip);
            assert!((fan - strip).abs() < 1e-5, "{shape:?}: {fan} vs {strip}");
        }
    }

    #[test]
    fn quad_strip_mesh() {
        let mesh = MeshData::new(Shape::Quad, Triangulation::Strip).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 1, 2, 3]);
    }

    #[test]
    fn vertex_layout_matches_size() {
        let described: usize = Vertex::ATTRIBUTES
            .iter()
            .map(|a| a.gl_type.get_size() * a.components as usize)
            .sum();
        assert_eq!(described, size_of::<Vertex>());
    }
}
