//! Exports [`ShaderBackend`] and [`GlBackend`].
use std::{
    ffi::{c_void, CStr},
    ptr::null,
};

use gl::types::{GLchar, GLint, GLsizei, GLuint};

use super::ShaderKind;
use crate::error::DemoError;

/// The slice of the OpenGL API the shader lifecycle needs.
///
/// Handles are the raw driver ids. Nothing here checks that an id is valid,
/// that is up to the owning wrapper ([`CompiledShader`], [`Program`]).
///
/// [`CompiledShader`]: super::CompiledShader
/// [`Program`]: super::Program
pub trait ShaderBackend {
    fn create_shader(&self, kind: ShaderKind) -> GLuint;
    /// Upload `source` and compile it.
    ///
    /// # Errors
    /// Errors with the driver's info log if compilation failed.
    fn compile_shader(&self, shader: GLuint, source: &CStr) -> Result<(), String>;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    /// # Errors
    /// Errors with the driver's info log if linking failed.
    fn link_program(&self, program: GLuint) -> Result<(), String>;
    fn use_program(&self, program: GLuint);
    fn delete_program(&self, program: GLuint);

    fn uniform_location(&self, program: GLuint, name: &CStr) -> Option<GLint>;
    fn uniform_1f(&self, location: GLint, value: f32);
    fn uniform_2f(&self, location: GLint, x: f32, y: f32);
}

/// Entry points that must resolve for the demo to run at all.
const REQUIRED_ENTRY_POINTS: &[(&str, fn() -> bool)] = &[
    ("glCreateShader", gl::CreateShader::is_loaded),
    ("glShaderSource", gl::ShaderSource::is_loaded),
    ("glCompileShader", gl::CompileShader::is_loaded),
    ("glCreateProgram", gl::CreateProgram::is_loaded),
    ("glLinkProgram", gl::LinkProgram::is_loaded),
    ("glUseProgram", gl::UseProgram::is_loaded),
    ("glGetUniformLocation", gl::GetUniformLocation::is_loaded),
    ("glGenVertexArrays", gl::GenVertexArrays::is_loaded),
    ("glGenBuffers", gl::GenBuffers::is_loaded),
    ("glDrawElements", gl::DrawElements::is_loaded),
];

/// [`ShaderBackend`] that talks to the current OpenGL context.
///
/// Only obtainable through [`GlBackend::load_with`], so holding one means the
/// function pointers are there.
#[derive(Debug)]
pub struct GlBackend {
    _loaded: (),
}

impl GlBackend {
    /// Load every OpenGL function pointer through `loader`.
    ///
    /// A context must be current on this thread.
    ///
    /// # Errors
    /// Errors with the first required entry point that did not resolve.
    pub fn load_with<F>(loader: F) -> Result<Self, DemoError>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        for &(name, is_loaded) in REQUIRED_ENTRY_POINTS {
            if !is_loaded() {
                return Err(DemoError::GlLoader(name));
            }
        }
        Ok(Self { _loaded: () })
    }
}

/// Read an info log of `len` bytes (as reported by `INFO_LOG_LENGTH`).
fn read_info_log(len: GLint, read: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar)) -> String {
    let capacity = len.max(1);
    let mut infolog: Vec<u8> = vec![0; usize::try_from(capacity).unwrap_or(1)];
    let mut written = 0;
    read(capacity, &mut written, infolog.as_mut_ptr().cast());
    infolog.truncate(usize::try_from(written).unwrap_or(0));
    String::from_utf8_lossy(&infolog).trim_end().to_owned()
}

impl ShaderBackend for GlBackend {
    fn create_shader(&self, kind: ShaderKind) -> GLuint {
        unsafe { gl::CreateShader(kind.gl_enum()) }
    }

    fn compile_shader(&self, shader: GLuint, source: &CStr) -> Result<(), String> {
        // SAFETY:
        // `source` is NUL-terminated, so a null length array is allowed.
        unsafe {
            gl::ShaderSource(shader, 1, &source.as_ptr(), null());
            gl::CompileShader(shader);

            let mut success = 0;
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
            if success == gl::TRUE.into() {
                return Ok(());
            }

            let mut len = 0;
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
            Err(read_info_log(len, |capacity, written, buf| {
                gl::GetShaderInfoLog(shader, capacity, written, buf)
            }))
        }
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) -> Result<(), String> {
        unsafe {
            gl::LinkProgram(program);

            let mut success = 0;
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
            if success == gl::TRUE.into() {
                return Ok(());
            }

            let mut len = 0;
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
            Err(read_info_log(len, |capacity, written, buf| {
                gl::GetProgramInfoLog(program, capacity, written, buf)
            }))
        }
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> Option<GLint> {
        let location = unsafe { gl::GetUniformLocation(program, name.as_ptr()) };
        if location < 0 {
            None
        } else {
            Some(location)
        }
    }

    fn uniform_1f(&self, location: GLint, value: f32) {
        unsafe { gl::Uniform1f(location, value) }
    }

    fn uniform_2f(&self, location: GLint, x: f32, y: f32) {
        unsafe { gl::Uniform2f(location, x, y) }
    }
}
