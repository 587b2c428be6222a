//! Rendering backend that steps the simulation without a window.

use std::time::Duration;

use anyhow::Result as AnyResult;
use packet_striker_rendering::{
    FrameControl, FrameInput, Presentation, RenderingBackend, Scene,
};
use tracing::{debug, info};

use crate::autopilot::Autopilot;

/// Presents frames into the void as fast as the simulation allows.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HeadlessBackend {
    max_frames: u64,
    autopilot: Option<Autopilot>,
}

impl HeadlessBackend {
    /// Creates a backend that stops after `max_frames` frames.
    pub(crate) const fn new(max_frames: u64, autopilot: Option<Autopilot>) -> Self {
        Self {
            max_frames,
            autopilot,
        }
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput) -> (Scene, FrameControl) + 'static,
    {
        let dt = presentation.timing.frame_duration();
        let report_every = u64::from(presentation.timing.frames_per_second()) * 10;
        info!(
            "{}: stepping up to {} frames headless",
            presentation.window_title, self.max_frames
        );

        let mut input = FrameInput::default();
        for frame in 0..self.max_frames {
            let (scene, control) = update_scene(dt, input);
            if frame % report_every == 0 {
                debug!(
                    "frame {frame}: {} | score {} | {} sprites",
                    scene.hud.wave_caption(),
                    scene.hud.score,
                    scene.sprites.len()
                );
            }
            if control == FrameControl::Exit {
                break;
            }
            input = self
                .autopilot
                .map_or_else(FrameInput::default, |pilot| pilot.steer(&scene));
        }
        Ok(())
    }
}
