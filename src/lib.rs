//! A small OpenGL shader playground.
//!
//! Opens a window, draws a polygon with a vertex/fragment shader pair read
//! from disk, feeds it `iTime` and `iResolution` every frame, and rebuilds
//! the program from the files whenever the reload key is pressed.

pub mod app;
pub mod config;
pub mod error;
pub mod frame_stats;
pub mod gl_wrappers;
pub mod indices;
pub mod logging;
pub mod mesh;
pub mod render;
pub mod source;

pub use error::DemoError;
