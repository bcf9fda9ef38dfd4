//! Audible completion alerts.
//!
//! An [`Alarm`] holds beepers in order of preference. A beeper that fails hands
//! over to the next one for the rest of the sequence.

use std::io::{self, Write};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::ValidationError;

pub trait Beeper {
    fn name(&self) -> &'static str;

    /// Sounds one beep, blocking for its length where the device supports that.
    fn beep(&mut self, frequency_hz: u32, length: Duration) -> io::Result<()>;

    /// Pause to leave after a beep when `gap` was requested.
    fn spacing(&self, gap: Duration) -> Duration {
        gap
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertPlan {
    pub frequency_hz: u32,
    pub beeps: u32,
    pub length: Duration,
    pub gap: Duration,
}

impl Default for AlertPlan {
    fn default() -> Self {
        AlertPlan {
            frequency_hz: 800,
            beeps: 3,
            length: Duration::from_millis(1000),
            gap: Duration::from_millis(300),
        }
    }
}

impl AlertPlan {
    /// Checks raw flag values, reporting every violated bound.
    pub fn validate(
        frequency_hz: i64,
        beeps: i64,
        length_ms: i64,
        gap_ms: i64,
    ) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();
        if !(37..=32767).contains(&frequency_hz) {
            errors.push(ValidationError::Frequency(frequency_hz));
        }
        if beeps < 1 {
            errors.push(ValidationError::Beeps(beeps));
        }
        if length_ms < 1 {
            errors.push(ValidationError::BeepDuration(length_ms));
        }
        if gap_ms < 0 {
            errors.push(ValidationError::Gap(gap_ms));
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(AlertPlan {
            frequency_hz: frequency_hz as u32,
            beeps: u32::try_from(beeps).unwrap_or(u32::MAX),
            length: Duration::from_millis(length_ms as u64),
            gap: Duration::from_millis(gap_ms as u64),
        })
    }
}

pub struct Alarm {
    beepers: Vec<Box<dyn Beeper>>,
}

impl Alarm {
    pub fn new(beepers: Vec<Box<dyn Beeper>>) -> Self {
        Alarm { beepers }
    }

    /// Console speaker first, then the terminal bell.
    pub fn system() -> Self {
        Self::new(vec![
            Box::new(ConsoleTone),
            Box::new(TerminalBell::new(io::stdout())),
        ])
    }

    /// Plays `count` beeps from `plan`, one after another. Returns how many sounded.
    pub async fn sound(&mut self, plan: &AlertPlan, count: u32) -> u32 {
        let mut rank = 0;
        let mut played = 0;
        while played < count {
            let Some(beeper) = self.beepers.get_mut(rank) else {
                warn!(played, count, "no working beeper left, alert abandoned");
                break;
            };
            match beeper.beep(plan.frequency_hz, plan.length) {
                Ok(()) => {
                    played += 1;
                    let pause = beeper.spacing(plan.gap);
                    if played < count && !pause.is_zero() {
                        tokio::time::sleep(pause).await;
                    }
                }
                Err(e) => {
                    debug!(beeper = beeper.name(), error = %e, "beeper failed, falling back");
                    rank += 1;
                }
            }
        }
        played
    }
}

/// The PC speaker on a Linux virtual console.
pub struct ConsoleTone;

#[cfg(target_os = "linux")]
impl Beeper for ConsoleTone {
    fn name(&self) -> &'static str {
        "console-tone"
    }

    fn beep(&mut self, frequency_hz: u32, length: Duration) -> io::Result<()> {
        use std::os::fd::AsRawFd;

        const KIOCSOUND: u64 = 0x4B2F;
        const CLOCK_TICK_RATE: u32 = 1_193_180;

        let tty = std::fs::OpenOptions::new().write(true).open("/dev/tty")?;
        let fd = tty.as_raw_fd();
        let divisor = (CLOCK_TICK_RATE / frequency_hz.max(1)) as libc::c_int;

        // SAFETY: `fd` is a valid open descriptor for the lifetime of `tty`, and
        // KIOCSOUND takes its argument by value.
        if unsafe { libc::ioctl(fd, KIOCSOUND as _, divisor) } < 0 {
            return Err(io::Error::last_os_error());
        }
        // Blocks the single-threaded runtime, so Ctrl+C is handled once the tone ends.
        std::thread::sleep(length);
        // SAFETY: as above; a zero divisor silences the speaker.
        if unsafe { libc::ioctl(fd, KIOCSOUND as _, 0 as libc::c_int) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(not(target_os = "linux"))]
impl Beeper for ConsoleTone {
    fn name(&self) -> &'static str {
        "console-tone"
    }

    fn beep(&mut self, _frequency_hz: u32, _length: Duration) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "console tone needs a Linux virtual console",
        ))
    }
}

/// BEL written to the terminal. Pitch and length are up to the terminal.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        TerminalBell { out }
    }
}

impl<W: Write> Beeper for TerminalBell<W> {
    fn name(&self) -> &'static str {
        "terminal-bell"
    }

    fn beep(&mut self, _frequency_hz: u32, _length: Duration) -> io::Result<()> {
        self.out.write_all(b"\x07")?;
        self.out.flush()
    }

    // Back-to-back bells merge into one, so they keep their own spacing.
    fn spacing(&self, _gap: Duration) -> Duration {
        Duration::from_millis(500)
    }
}
