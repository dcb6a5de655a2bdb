//! Configuration and CLI argument handling

use anyhow::{bail, Result};
use clap::Parser;

use crate::state::{SessionDurations, TimerSettings};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "focus-timer")]
#[command(about = "A presence-aware Pomodoro session timer served over HTTP")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "8000")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Work session length in minutes
    #[arg(long, default_value = "25")]
    pub work_minutes: u64,

    /// Short break length in minutes
    #[arg(long, default_value = "5")]
    pub short_break_minutes: u64,

    /// Long break length in minutes
    #[arg(long, default_value = "15")]
    pub long_break_minutes: u64,

    /// Completed work sessions between long breaks
    #[arg(long, default_value = "4")]
    pub sessions_until_long_break: u32,

    /// Start with presence-driven auto-pause turned off
    #[arg(long)]
    pub no_auto_pause: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Reject settings the timer cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.work_minutes == 0 || self.short_break_minutes == 0 || self.long_break_minutes == 0 {
            bail!("session durations must be at least one minute");
        }
        if self.sessions_until_long_break == 0 {
            bail!("sessions-until-long-break must be at least 1");
        }
        if self.durations().is_none() {
            bail!("session durations are too large to count in seconds");
        }
        Ok(())
    }

    fn durations(&self) -> Option<SessionDurations> {
        SessionDurations::from_minutes(
            self.work_minutes,
            self.short_break_minutes,
            self.long_break_minutes,
        )
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Timer settings derived from the CLI flags. Call after `validate()`;
    /// durations that overflow fall back to the defaults.
    pub fn timer_settings(&self) -> TimerSettings {
        TimerSettings {
            durations: self.durations().unwrap_or_default(),
            sessions_until_long_break: self.sessions_until_long_break,
            auto_pause_enabled: !self.no_auto_pause,
        }
    }
}
