/// Accumulates frame times and reports an average frame rate once every
/// `window` frames.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window: u32,
    frames: u32,
    elapsed: f32,
}

impl FrameStats {
    /// `window` is clamped to at least one frame.
    pub fn new(window: u32) -> Self {
        Self {
            window: window.max(1),
            frames: 0,
            elapsed: 0.0,
        }
    }

    /// Records one frame of `dt` seconds.
    ///
    /// Returns the average frames-per-second when a window completes.
    pub fn record(&mut self, dt: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += dt.max(0.0);

        if self.frames < self.window {
            return None;
        }

        let fps = if self.elapsed > 0.0 {
            self.frames as f32 / self.elapsed
        } else {
            0.0
        };

        self.frames = 0;
        self.elapsed = 0.0;
        Some(fps)
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(300)
    }
}
