//! Exports [`DemoError`].
use std::{io, path::PathBuf};

use thiserror::Error;

/// Everything that can stop the demo from starting, or abort a hot reload.
///
/// Shader compile and link failures are not in here: those still produce a
/// handle and travel as a diagnostic in [`Built`](crate::gl_wrappers::Built).
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("SDL initialization failed: {0}")]
    Sdl(String),
    #[error("failed to create window: {0}")]
    Window(String),
    #[error("failed to create OpenGL context: {0}")]
    Context(String),
    #[error("OpenGL loader failed, missing entry point `{0}`")]
    GlLoader(&'static str),
    #[error("failed to read shader source '{}': {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("shader source '{}' contains a NUL byte at offset {offset}", path.display())]
    SourceNul { path: PathBuf, offset: usize },
    #[error("cannot link a program without any shaders")]
    NoShaders,
    #[error("failed to read config '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Config(String),
    #[error("mesh with {0} vertices cannot be triangulated")]
    DegenerateMesh(usize),
    #[error("mesh with {0} elements is too large to draw in one call")]
    MeshTooLarge(usize),
}

impl DemoError {
    /// The process exit code for this error.
    ///
    /// Failures while bringing up the window or the GL loader exit with `-1`,
    /// everything else with `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Sdl(_) | Self::Window(_) | Self::Context(_) | Self::GlLoader(_) => -1,
            _ => 1,
        }
    }
}
