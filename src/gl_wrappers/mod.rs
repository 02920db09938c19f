//! Standalone functions and modules to wrap the nitty-gritty of
//! OpenGL objects with Rust structs.
pub mod backend;
pub mod program;
pub mod shader;

#[cfg(test)]
pub(crate) mod recording;

pub use backend::*;
pub use program::*;
pub use shader::*;

/// An OpenGL object together with what the driver had to say about building it.
///
/// Compile and link failures are not fatal: the object still exists and can
/// be used (it will just render nothing useful), so it is handed back either way.
#[derive(Debug)]
pub struct Built<T> {
    pub object: T,
    /// The driver's info log, if building failed.
    pub diagnostic: Option<String>,
}

impl<T> Built<T> {
    pub fn succeeded(&self) -> bool {
        self.diagnostic.is_none()
    }
    pub fn into_inner(self) -> T {
        self.object
    }
}

/// Update the OpenGL viewport to cover a `width` x `height` drawable.
pub fn gl_upd_viewport(width: u32, height: u32) {
    let real_width = i32::try_from(width).unwrap_or(i32::MAX);
    let real_height = i32::try_from(height).unwrap_or(i32::MAX);
    // SAFETY:
    // gl::Viewport does not fail with non-negative values.
    unsafe {
        gl::Viewport(0, 0, real_width, real_height);
    }
}
