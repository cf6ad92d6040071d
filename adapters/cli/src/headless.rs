//! Terminal backend that runs frames without a window and prints the HUD.

use std::io::{self, Write};

use anyhow::{Context, Result as AnyResult};
use log::info;
use tower_defence_rendering::{FrameClock, Presentation, RenderingBackend, Scene};

/// Backend that steps a fixed number of frames and writes HUD lines.
#[derive(Debug)]
pub(crate) struct HeadlessBackend<W> {
    clock: FrameClock,
    frames: u64,
    hud_every: u64,
    out: W,
}

impl<W: Write> HeadlessBackend<W> {
    pub(crate) fn new(clock: FrameClock, frames: u64, hud_every: u64, out: W) -> Self {
        Self {
            clock,
            frames,
            hud_every,
            out,
        }
    }
}

impl HeadlessBackend<io::Stdout> {
    pub(crate) fn stdout(clock: FrameClock, frames: u64, hud_every: u64) -> Self {
        Self::new(clock, frames, hud_every, io::stdout())
    }
}

impl<W: Write> RenderingBackend for HeadlessBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(std::time::Duration, &mut Scene) -> bool + 'static,
    {
        let Presentation {
            window_title,
            mut scene,
            ..
        } = presentation;
        info!(
            "{window_title}: running {} frames of {:?}",
            self.frames,
            self.clock.frame_time()
        );

        let mut frame = 0;
        while frame < self.frames {
            frame += 1;
            let keep_running = update_scene(self.clock.frame_time(), &mut scene);

            if self.hud_every > 0 && frame % self.hud_every == 0 {
                writeln!(self.out, "[frame {frame:>6}] {}", scene.hud)
                    .context("failed to write HUD line")?;
            }

            if !keep_running {
                break;
            }
        }

        writeln!(self.out, "finished after {frame} frames: {}", scene.hud)
            .context("failed to write final HUD line")?;
        self.out.flush().context("failed to flush HUD output")
    }
}
