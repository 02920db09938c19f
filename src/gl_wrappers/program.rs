//! Exports [`Program`].
use std::{ffi::CString, fmt};

use super::{Built, CompiledShader, ShaderBackend};
use crate::error::DemoError;

/// Wrapper for an OpenGL program.
///
/// <https://www.khronos.org/opengl/wiki/GLSL_Object#Program_objects>
///
/// The program is deleted when this is dropped.
pub struct Program<'b, B: ShaderBackend> {
    backend: &'b B,
    /// The internal OpenGL id for this object.
    id: gl::types::GLuint,
}

/// Link `shaders` into a new program, attaching them in order.
///
/// A program is returned even if linking failed; the driver's reply is then
/// in [`Built::diagnostic`] and has already been logged.
///
/// # Errors
/// Errors if `shaders` is empty.
pub fn link_program<'b, B: ShaderBackend>(
    backend: &'b B,
    shaders: &[&CompiledShader<'b, B>],
) -> Result<Built<Program<'b, B>>, DemoError> {
    if shaders.is_empty() {
        return Err(DemoError::NoShaders);
    }

    let program = Program {
        backend,
        id: backend.create_program(),
    };
    for shader in shaders {
        backend.attach_shader(program.id, shader.id());
    }

    let diagnostic = match backend.link_program(program.id) {
        Ok(()) => {
            log::debug!("linked program {} from {} shaders", program.id, shaders.len());
            None
        }
        Err(infolog) => {
            log::error!("Error linking program. OpenGL reply: '{infolog}'");
            Some(infolog)
        }
    };
    Ok(Built {
        object: program,
        diagnostic,
    })
}

impl<B: ShaderBackend> Program<'_, B> {
    /// Get the internal id of this program.
    pub fn id(&self) -> gl::types::GLuint {
        self.id
    }
    /// Make this the program used by subsequent draw calls.
    pub fn activate(&self) {
        self.backend.use_program(self.id);
    }
    /// Get the location of a uniform in this program.
    ///
    /// `None` if the program has no active uniform called `name`, or if
    /// `name` contains interior nuls.
    pub fn uniform_location(&self, name: impl AsRef<str>) -> Option<gl::types::GLint> {
        let name = CString::new(name.as_ref()).ok()?;
        self.backend.uniform_location(self.id, &name)
    }
}

impl<B: ShaderBackend> Drop for Program<'_, B> {
    fn drop(&mut self) {
        log::trace!("deleting program {}", self.id);
        self.backend.delete_program(self.id);
    }
}

impl<B: ShaderBackend> fmt::Debug for Program<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program").field("id", &self.id).finish()
    }
}
