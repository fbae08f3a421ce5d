//! prism engine crate.
//!
//! Window, GPU context, input and timing runtime, plus the shader
//! compile/link pipeline and static mesh rendering used by the tutorial.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod shader;
pub mod time;
pub mod window;
