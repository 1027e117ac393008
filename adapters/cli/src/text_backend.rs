//! Rendering backend that prints HUD changes as plain text.

use std::{io::Write, time::Duration};

use anyhow::{Context, Result};
use cauldron_rendering::{FrameInput, Presentation, RenderingBackend, Scene};

/// Steps the scene on a fixed simulated clock and writes the HUD whenever it changes.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    output: W,
    duration: Duration,
    tick: Duration,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend that runs for `duration` of simulated time in `tick` steps.
    pub(crate) fn new(output: W, duration: Duration, tick: Duration) -> Self {
        Self {
            output,
            duration,
            tick,
        }
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> bool,
    {
        let Self {
            mut output,
            duration,
            tick,
        } = self;
        let Presentation {
            window_title,
            mut scene,
        } = presentation;

        writeln!(output, "{window_title}").context("failed to write banner")?;
        print_hud(&mut output, Duration::ZERO, &scene)?;

        let mut shown = scene.clone();
        let mut elapsed = Duration::ZERO;
        while !tick.is_zero() && elapsed < duration {
            elapsed = elapsed.saturating_add(tick);
            if !update_scene(tick, FrameInput::default(), &mut scene) {
                break;
            }
            if scene.hud_differs(&shown) {
                print_hud(&mut output, elapsed, &scene)?;
                shown = scene.clone();
            }
        }

        output.flush().context("failed to flush output")
    }
}

fn print_hud<W: Write>(output: &mut W, elapsed: Duration, scene: &Scene) -> Result<()> {
    writeln!(
        output,
        "[{:>7.2}s] score {} | needle {:.1} | level {:.1}",
        elapsed.as_secs_f32(),
        scene.score_text,
        scene.needle.degrees(),
        scene.level_arrow.degrees()
    )
    .context("failed to write HUD")?;
    writeln!(output, "{}", scene.recipe_text.trim_end()).context("failed to write HUD")
}
