//! Exports [`Shader`] and [`CompiledShader`].
use std::fmt;

use super::{Built, ShaderBackend};
use crate::source::ShaderSource;

/// Represents the type of a shader object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderKind {
    /// This shader is a Fragment shader.
    Fragment,
    /// This shader is a Geometry shader.
    Geometry,
    /// This shader is a Vertex shader.
    Vertex,
}

impl ShaderKind {
    pub fn gl_enum(self) -> gl::types::GLenum {
        match self {
            Self::Fragment => gl::FRAGMENT_SHADER,
            Self::Geometry => gl::GEOMETRY_SHADER,
            Self::Vertex => gl::VERTEX_SHADER,
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fragment => "fragment",
            Self::Geometry => "geometry",
            Self::Vertex => "vertex",
        })
    }
}

/// An uncompiled OpenGL shader.
/// Owns the source code necessary to compile it.
pub struct Shader<'b, B: ShaderBackend> {
    backend: &'b B,
    /// GL ID for this shader.
    inner: gl::types::GLuint,
    kind: ShaderKind,
    /// Dropped as soon as compilation returns.
    source: ShaderSource,
    /// Set once ownership of `inner` moved into a [`CompiledShader`].
    was_compiled: bool,
}

impl<'b, B: ShaderBackend> Shader<'b, B> {
    /// Create the shader object for `source`.
    pub fn new(backend: &'b B, kind: ShaderKind, source: ShaderSource) -> Self {
        let inner = backend.create_shader(kind);
        Self {
            backend,
            inner,
            kind,
            source,
            was_compiled: false,
        }
    }
    /// Helper function for `Shader::new()` with vertex shaders.
    pub fn vertex(backend: &'b B, source: ShaderSource) -> Self {
        Self::new(backend, ShaderKind::Vertex, source)
    }
    /// Helper function for `Shader::new()` with fragment shaders.
    pub fn fragment(backend: &'b B, source: ShaderSource) -> Self {
        Self::new(backend, ShaderKind::Fragment, source)
    }

    /// Compile this shader.
    ///
    /// A [`CompiledShader`] is always returned, even if the driver rejected
    /// the source; in that case the info log is in [`Built::diagnostic`] and
    /// has already been logged. Linking a failed shader fails the link, it
    /// does not crash.
    pub fn compile(mut self) -> Built<CompiledShader<'b, B>> {
        let diagnostic = match self.backend.compile_shader(self.inner, self.source.as_c_str()) {
            Ok(()) => {
                log::debug!(
                    "compiled {} shader {} from '{}'",
                    self.kind,
                    self.inner,
                    self.source.origin().display()
                );
                None
            }
            Err(infolog) => {
                log::error!(
                    "Shader compilation failed ({} shader '{}'): {}",
                    self.kind,
                    self.source.origin().display(),
                    infolog
                );
                Some(infolog)
            }
        };
        self.was_compiled = true;
        let object = CompiledShader {
            backend: self.backend,
            id: self.inner,
            kind: self.kind,
        };
        Built { object, diagnostic }
    }
}

impl<B: ShaderBackend> Drop for Shader<'_, B> {
    fn drop(&mut self) {
        if !self.was_compiled {
            self.backend.delete_shader(self.inner);
        }
    }
}

/// A compiled shader object.
/// This can be linked into [`Program`](super::Program)s, and is deleted when dropped.
pub struct CompiledShader<'b, B: ShaderBackend> {
    backend: &'b B,
    /// GL ID for this compiled shader.
    id: gl::types::GLuint,
    kind: ShaderKind,
}

impl<B: ShaderBackend> CompiledShader<'_, B> {
    /// Get the internal GL ID of this shader.
    pub fn id(&self) -> gl::types::GLuint {
        self.id
    }
    pub fn kind(&self) -> ShaderKind {
        self.kind
    }
}

impl<B: ShaderBackend> Drop for CompiledShader<'_, B> {
    fn drop(&mut self) {
        self.backend.delete_shader(self.id);
    }
}

impl<B: ShaderBackend> fmt::Debug for CompiledShader<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledShader")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Delete a list of shaders, in order.
///
/// Once a program is linked its shaders are no longer needed on their own.
pub fn delete_shaders<'b, B: ShaderBackend + 'b>(
    shaders: impl IntoIterator<Item = CompiledShader<'b, B>>,
) {
    for shader in shaders {
        log::trace!("deleting {} shader {}", shader.kind, shader.id);
        drop(shader);
    }
}
