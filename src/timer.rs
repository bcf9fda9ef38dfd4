use chrono::{Local, TimeDelta};
use std::io;
use tokio::time::Instant;
use tracing::debug;

use crate::alert::{Alarm, AlertPlan};
use crate::console::{Console, HiddenCursor};
use crate::duration::{Duration, Hms, UnitVisibility};
use crate::frame::{self, GLYPH_TOP_ROW};
use crate::glyphs::GlyphTable;

/// Pause between expiry and the next loop.
const RESTART_DELAY: std::time::Duration = std::time::Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSettings {
    pub duration: Duration,
    pub looping: bool,
    /// `None` when silent.
    pub alert: Option<AlertPlan>,
    pub notify: bool,
}

/// What one poll of a running countdown calls for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    Unchanged,
    Render(Hms),
    Expired,
}

/// State of a single pass through the countdown. Recreated on every restart.
#[derive(Debug)]
pub struct RunState {
    duration: Duration,
    last_rendered: Option<u64>,
}

impl RunState {
    pub fn new(duration: Duration) -> Self {
        RunState { duration, last_rendered: None }
    }

    /// Compares the remaining time against the last rendered value.
    ///
    /// Remaining zero is still shown; expiry comes once elapsed time passes the
    /// full duration.
    pub fn tick(&mut self, elapsed: std::time::Duration) -> Tick {
        let mode = self.duration.mode;
        let elapsed = mode.elapsed_units(elapsed);
        let Some(remaining) = self.duration.units.checked_sub(elapsed) else {
            return Tick::Expired;
        };
        if self.last_rendered == Some(remaining) {
            return Tick::Unchanged;
        }
        self.last_rendered = Some(remaining);
        Tick::Render(mode.split(remaining))
    }
}

/// Drives one countdown, restarting it when looping.
pub struct Countdown<'a, C: Console> {
    settings: RunSettings,
    glyphs: &'a GlyphTable,
    console: C,
    alarm: Alarm,
}

impl<'a, C: Console> Countdown<'a, C> {
    pub fn new(settings: RunSettings, glyphs: &'a GlyphTable, console: C, alarm: Alarm) -> Self {
        Countdown { settings, glyphs, console, alarm }
    }

    /// Runs until expiry, or forever when looping. The cursor stays hidden for
    /// the whole call and is shown again however it ends, including when this
    /// future is dropped.
    pub async fn run(&mut self) -> io::Result<()> {
        let settings = self.settings;
        let visibility = settings.duration.visibility();
        let mut console = HiddenCursor::new(&mut self.console)?;

        loop {
            count_down(&mut *console, self.glyphs, settings.duration, visibility).await?;
            debug!(looping = settings.looping, "countdown expired");

            console.clear()?;
            let zero = self.glyphs.render(Hms::ZERO, visibility);
            console.draw_lines(0, &frame::finished_lines(settings.looping, &zero))?;

            if settings.notify {
                crate::notify::send_expiry(&settings.duration.format(), settings.looping);
            }
            if let Some(plan) = settings.alert {
                let count = if settings.looping { 1 } else { plan.beeps };
                self.alarm.sound(&plan, count).await;
            }

            if !settings.looping {
                return Ok(());
            }
            tokio::time::sleep(RESTART_DELAY).await;
            debug!("restarting countdown");
        }
    }
}

async fn count_down<C: Console>(
    console: &mut C,
    glyphs: &GlyphTable,
    duration: Duration,
    visibility: UnitVisibility,
) -> io::Result<()> {
    let wall_start = Local::now();
    let wall_end = wall_start + TimeDelta::from_std(duration.real()).unwrap_or(TimeDelta::zero());

    console.clear()?;
    console.draw_lines(
        0,
        &frame::static_lines(
            &duration.format(),
            &frame::timestamp(wall_start),
            &frame::timestamp(wall_end),
        ),
    )?;

    let started = Instant::now();
    let mut state = RunState::new(duration);
    loop {
        match state.tick(started.elapsed()) {
            Tick::Expired => return Ok(()),
            Tick::Render(hms) => {
                let band = frame::glyph_band(&glyphs.render(hms, visibility));
                console.draw_lines(GLYPH_TOP_ROW, &band)?;
            }
            Tick::Unchanged => {}
        }
        tokio::time::sleep(duration.mode.poll_interval()).await;
    }
}
