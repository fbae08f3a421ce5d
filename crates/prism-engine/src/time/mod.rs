//! Frame timing.
//!
//! - `FrameClock`: one per render loop, `tick()` once per presented frame
//! - `FrameStats`: rolling frame-rate report over a fixed number of frames

mod frame_clock;
mod stats;

pub use frame_clock::{FrameClock, FrameTime};
pub use stats::FrameStats;
