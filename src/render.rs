//! Exports [`RenderContext`], the owner of the active shader program.
use gl::types::{GLint, GLuint};

use crate::{
    error::DemoError,
    gl_wrappers::{delete_shaders, link_program, Program, Shader, ShaderBackend},
    source::{ShaderPaths, ShaderSource},
};

/// Name of the `float` uniform holding seconds since startup.
pub const TIME_UNIFORM: &str = "iTime";
/// Name of the `vec2` uniform holding the window size in pixels.
pub const RESOLUTION_UNIFORM: &str = "iResolution";

/// Uniform locations of the active program. `None` if the program does not
/// use one (or failed to link).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameUniforms {
    pub time: Option<GLint>,
    pub resolution: Option<GLint>,
}

impl FrameUniforms {
    pub fn locate<B: ShaderBackend>(program: &Program<'_, B>) -> Self {
        let uniforms = Self {
            time: program.uniform_location(TIME_UNIFORM),
            resolution: program.uniform_location(RESOLUTION_UNIFORM),
        };
        if uniforms.time.is_none() {
            log::debug!("program {} has no active `{TIME_UNIFORM}` uniform", program.id());
        }
        if uniforms.resolution.is_none() {
            log::debug!("program {} has no active `{RESOLUTION_UNIFORM}` uniform", program.id());
        }
        uniforms
    }
}

/// Holds the one active program, and knows where its sources live so it can
/// rebuild it.
pub struct RenderContext<'b, B: ShaderBackend> {
    backend: &'b B,
    paths: ShaderPaths,
    /// Only `None` between deleting the old program and linking the new one.
    program: Option<Program<'b, B>>,
    uniforms: FrameUniforms,
}

impl<'b, B: ShaderBackend> RenderContext<'b, B> {
    /// Load, compile, and link the shaders at `paths`, and make the result
    /// the active program.
    ///
    /// # Errors
    /// Errors if either source cannot be loaded. Compile and link failures
    /// are logged, and the (broken) program is used anyway.
    pub fn new(backend: &'b B, paths: ShaderPaths) -> Result<Self, DemoError> {
        let (vertex, fragment) = paths.load_pair()?;
        let mut ctx = Self {
            backend,
            paths,
            program: None,
            uniforms: FrameUniforms::default(),
        };
        ctx.install(vertex, fragment)?;
        log::info!(
            "shader program {} ready ('{}' + '{}')",
            ctx.program_id().unwrap_or_default(),
            ctx.paths.vertex.display(),
            ctx.paths.fragment.display()
        );
        Ok(ctx)
    }

    /// Rebuild the program from the files on disk.
    ///
    /// Both files are read before anything else happens; if either is
    /// missing the current program stays active and the error is returned.
    ///
    /// # Errors
    /// Errors if a source cannot be loaded.
    pub fn reload(&mut self) -> Result<(), DemoError> {
        let (vertex, fragment) = self.paths.load_pair()?;
        let previous = self.program_id();
        self.install(vertex, fragment)?;
        log::info!(
            "reloaded shaders: program {} -> {}",
            previous.unwrap_or_default(),
            self.program_id().unwrap_or_default()
        );
        Ok(())
    }

    /// Compile both stages, delete the current program, link the new one,
    /// activate it, and delete the stages.
    fn install(&mut self, vertex: ShaderSource, fragment: ShaderSource) -> Result<(), DemoError> {
        let vertex = Shader::vertex(self.backend, vertex).compile().into_inner();
        let fragment = Shader::fragment(self.backend, fragment).compile().into_inner();

        // the old program has to go before the new one takes its place
        drop(self.program.take());

        let program = link_program(self.backend, &[&vertex, &fragment])?.into_inner();
        program.activate();
        delete_shaders([vertex, fragment]);

        self.uniforms = FrameUniforms::locate(&program);
        self.program = Some(program);
        Ok(())
    }

    pub fn program_id(&self) -> Option<GLuint> {
        self.program.as_ref().map(Program::id)
    }

    pub fn uniforms(&self) -> FrameUniforms {
        self.uniforms
    }

    pub fn paths(&self) -> &ShaderPaths {
        &self.paths
    }

    /// Push this frame's `iTime` and `iResolution` to the active program.
    pub fn push_frame_uniforms(&self, elapsed_secs: f32, width: u32, height: u32) {
        if let Some(location) = self.uniforms.time {
            self.backend.uniform_1f(location, elapsed_secs);
        }
        if let Some(location) = self.uniforms.resolution {
            self.backend.uniform_2f(location, width as f32, height as f32);
        }
    }
}
