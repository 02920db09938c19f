//! Demo configuration, read from a TOML file.
//!
//! Every section and field is optional; whatever is missing falls back to
//! the defaults below.
//!
//! ```toml
//! log_filter = "gl_shader_demo=debug"
//!
//! [window]
//! title = "6624"
//! width = 600
//! height = 600
//! vsync = true
//!
//! [gl]
//! major = 3
//! minor = 3
//! debug = false
//!
//! [shaders]
//! vertex = "shaders/vertex.vert"
//! fragment = "shaders/colors.frag"
//! reload_key = "R"
//!
//! [mesh]
//! shape = "quad"            # quad | triangle | pentagon
//! triangulation = "strip"   # strip | convex_fan
//!
//! [render]
//! clear_color = [0.0, 0.0, 0.0, 1.0]
//! ```
use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{error::DemoError, indices::Triangulation, mesh::Shape, source::ShaderPaths};

/// Where the config is looked for when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "demo.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// `env_logger` filter, overrides `RUST_LOG` when set.
    pub log_filter: Option<String>,
    pub window: WindowConfig,
    pub gl: GlConfig,
    pub shaders: ShaderConfig,
    pub mesh: MeshConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "6624".to_string(),
            width: 600,
            height: 600,
            vsync: true,
        }
    }
}

/// Requested OpenGL core profile version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlConfig {
    pub major: u8,
    pub minor: u8,
    /// Ask for a debug context and forward driver messages to the log.
    pub debug: bool,
}

impl Default for GlConfig {
    fn default() -> Self {
        Self {
            major: 3,
            minor: 3,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
    /// SDL key name that triggers a reload, e.g. "R" or "F5".
    pub reload_key: String,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("shaders/vertex.vert"),
            fragment: PathBuf::from("shaders/colors.frag"),
            reload_key: "R".to_string(),
        }
    }
}

impl ShaderConfig {
    pub fn paths(&self) -> ShaderPaths {
        ShaderPaths::new(&self.vertex, &self.fragment)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub shape: Shape,
    pub triangulation: Triangulation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl DemoConfig {
    /// Parse a config from TOML text. `origin` is only used for messages.
    ///
    /// # Errors
    /// Errors if the text is not valid TOML for this config, or fails [`validate`](Self::validate).
    pub fn from_toml(origin: impl AsRef<Path>, text: &str) -> Result<Self, DemoError> {
        let config: DemoConfig = toml::from_str(text).map_err(|source| DemoError::ConfigParse {
            path: origin.as_ref().to_owned(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Errors if the file cannot be read or parsed.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, DemoError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| DemoError::ConfigRead {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml(path, &contents)
    }

    /// Like [`load_from_file`](Self::load_from_file), but a missing file means defaults.
    ///
    /// # Errors
    /// Errors if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, DemoError> {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Err(DemoError::ConfigRead { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                log::info!("no config at '{}', using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn to_toml(&self) -> String {
        // every field is a plain value, serializing cannot fail
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Check values serde cannot.
    ///
    /// # Errors
    /// Errors with a description of the first bad value.
    pub fn validate(&self) -> Result<(), DemoError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(DemoError::Config(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if (self.gl.major, self.gl.minor) < (3, 3) {
            return Err(DemoError::Config(format!(
                "OpenGL {}.{} has no core profile with vertex array objects, need 3.3 or newer",
                self.gl.major, self.gl.minor
            )));
        }
        if self.shaders.reload_key.trim().is_empty() {
            return Err(DemoError::Config("shaders.reload_key is empty".to_string()));
        }
        if let Some(channel) = self.render.clear_color.iter().find(|c| !(0.0..=1.0).contains(*c)) {
            return Err(DemoError::Config(format!(
                "clear_color channels must be within 0.0..=1.0, got {channel}"
            )));
        }
        Ok(())
    }
}
