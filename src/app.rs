//! The window, the render loop, and the key handling around it.
use std::{
    ffi::{c_void, CStr},
    ptr::null,
    time::Instant,
};

use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Keycode,
    video::{self, SwapInterval},
};

use crate::{
    config::DemoConfig,
    error::DemoError,
    frame_stats::FrameStats,
    gl_wrappers::{gl_upd_viewport, GlBackend, ShaderBackend},
    mesh::{GpuMesh, MeshData},
    render::RenderContext,
};

/// Where the demo is in its life. Startup walks these in order, `Running`
/// repeats once per frame, `Closed` is final.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Uninitialized,
    WindowCreated,
    ContextCurrent,
    GraphicsLoaded,
    GeometryUploaded,
    Running,
    Closed,
}

impl Stage {
    pub fn next(self) -> Self {
        match self {
            Self::Uninitialized => Self::WindowCreated,
            Self::WindowCreated => Self::ContextCurrent,
            Self::ContextCurrent => Self::GraphicsLoaded,
            Self::GraphicsLoaded => Self::GeometryUploaded,
            Self::GeometryUploaded => Self::Running,
            Self::Running | Self::Closed => Self::Closed,
        }
    }

    pub fn advance(&mut self) {
        let next = self.next();
        log::debug!("stage: {self:?} -> {next:?}");
        *self = next;
    }
}

/// Forwards driver debug messages to the log.
extern "system" fn gl_debug_output(
    _source: gl::types::GLenum,
    _output_type: gl::types::GLenum,
    id: gl::types::GLuint,
    severity: gl::types::GLenum,
    length: gl::types::GLsizei,
    message: *const gl::types::GLchar,
    _user_param: *mut c_void,
) {
    if message.is_null() {
        return;
    }
    // SAFETY:
    // the driver hands us `length` bytes, or a NUL-terminated string if length is negative.
    let bytes = unsafe {
        match usize::try_from(length) {
            Ok(len) => std::slice::from_raw_parts(message.cast::<u8>(), len),
            Err(_) => CStr::from_ptr(message).to_bytes(),
        }
    };
    let message = String::from_utf8_lossy(bytes);
    match severity {
        gl::DEBUG_SEVERITY_HIGH => log::error!("GL [{id}]: {message}"),
        gl::DEBUG_SEVERITY_MEDIUM => log::warn!("GL [{id}]: {message}"),
        gl::DEBUG_SEVERITY_LOW => log::info!("GL [{id}]: {message}"),
        _ => log::debug!("GL [{id}]: {message}"),
    }
}

fn install_debug_output() {
    if !gl::DebugMessageCallback::is_loaded() {
        log::warn!("GL debug output requested, but glDebugMessageCallback is not available");
        return;
    }
    unsafe {
        gl::Enable(gl::DEBUG_OUTPUT);
        gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
        gl::DebugMessageCallback(Some(gl_debug_output), null());
    }
}

fn init_sdl(config: &DemoConfig) -> Result<(sdl2::Sdl, sdl2::VideoSubsystem, video::Window), DemoError> {
    let sdl_ctx = sdl2::init().map_err(DemoError::Sdl)?;

    let video_ctx = sdl_ctx.video().map_err(DemoError::Sdl)?;

    {
        let gl_attr = video_ctx.gl_attr();
        gl_attr.set_context_profile(video::GLProfile::Core);
        gl_attr.set_context_version(config.gl.major, config.gl.minor);
        if config.gl.debug {
            gl_attr.set_context_flags().forward_compatible().debug().set();
        } else {
            gl_attr.set_context_flags().forward_compatible().set();
        }
    }

    let window = video_ctx
        .window(&config.window.title, config.window.width, config.window.height)
        .position_centered()
        .resizable()
        .opengl()
        .build()
        .map_err(|err| DemoError::Window(err.to_string()))?;

    Ok((sdl_ctx, video_ctx, window))
}

/// Reload the shaders if `key` is the reload key.
///
/// A failed reload is logged and the current program stays.
pub fn key_callback<B: ShaderBackend>(render_ctx: &mut RenderContext<'_, B>, key: Keycode, reload_key: Keycode) {
    if key != reload_key {
        return;
    }
    log::info!("{} pressed, reloading shaders", key.name());
    if let Err(err) = render_ctx.reload() {
        log::error!(
            "shader reload failed, keeping program {}: {err}",
            render_ctx.program_id().unwrap_or_default()
        );
    }
}

/// Resolve a key name from the config.
///
/// # Errors
/// Errors if SDL does not know the key.
pub fn parse_key(name: &str) -> Result<Keycode, DemoError> {
    Keycode::from_name(name.trim())
        .ok_or_else(|| DemoError::Config(format!("unknown reload key '{name}'")))
}

/// Open the window and run until it is closed.
///
/// # Errors
/// Errors if anything during startup fails. Nothing in the frame loop can.
pub fn run(config: &DemoConfig) -> Result<(), DemoError> {
    let start = Instant::now();
    let reload_key = parse_key(&config.shaders.reload_key)?;
    let mut stage = Stage::Uninitialized;

    let (sdl_ctx, video_ctx, window) = init_sdl(config)?;
    stage.advance();

    let gl_ctx = window.gl_create_context().map_err(DemoError::Context)?;
    window.gl_make_current(&gl_ctx).map_err(DemoError::Context)?;
    let interval = if config.window.vsync {
        SwapInterval::VSync
    } else {
        SwapInterval::Immediate
    };
    if let Err(err) = video_ctx.gl_set_swap_interval(interval) {
        log::warn!("could not set swap interval: {err}");
    }
    stage.advance();

    let backend = GlBackend::load_with(|name| video_ctx.gl_get_proc_address(name).cast())?;
    if config.gl.debug {
        install_debug_output();
    }
    stage.advance();

    let mut render_ctx = RenderContext::new(&backend, config.shaders.paths())?;
    let mesh = {
        let data = MeshData::new(config.mesh.shape, config.mesh.triangulation)?;
        GpuMesh::upload(&data.vertices, &data.indices)?
    };
    stage.advance();

    let (width, height) = window.drawable_size();
    gl_upd_viewport(width, height);
    let [red, green, blue, alpha] = config.render.clear_color;
    unsafe {
        gl::ClearColor(red, green, blue, alpha);
    }
    let mut event_pump = sdl_ctx.event_pump().map_err(DemoError::Sdl)?;
    let main_id = window.id();
    log::info!(
        "running: {:?} mesh ({:?}, {} indices), press {} to reload shaders",
        config.mesh.shape,
        config.mesh.triangulation,
        mesh.index_count(),
        reload_key.name()
    );
    stage.advance();

    let mut stats = FrameStats::new(Instant::now());
    'running: loop {
        let instant_frame_start = Instant::now();
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }

        let (width, height) = window.drawable_size();
        render_ctx.push_frame_uniforms(start.elapsed().as_secs_f32(), width, height);
        mesh.draw();

        window.gl_swap_window();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::ESCAPE),
                    ..
                } => {
                    break 'running;
                }
                Event::Window {
                    window_id,
                    win_event: WindowEvent::SizeChanged(..),
                    ..
                } if window_id == main_id => {
                    let (width, height) = window.drawable_size();
                    gl_upd_viewport(width, height);
                }
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => key_callback(&mut render_ctx, key, reload_key),
                _ => {}
            }
        }

        let now = Instant::now();
        if let Some(summary) = stats.push(now.duration_since(instant_frame_start), now) {
            log::debug!(
                "frametime: {:0.2}ms, FPS: {:0.1}, frames counted: {:05}",
                summary.avg_frametime * 1000.,
                summary.fps,
                summary.frames
            );
        }
    }
    stage.advance();

    // GPU objects go first, while the context is still alive
    drop(mesh);
    drop(render_ctx);
    drop(gl_ctx);
    drop(window);
    log::info!("window closed after {:0.1}s", start.elapsed().as_secs_f64());
    Ok(())
}
