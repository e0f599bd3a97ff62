use chrono::NaiveTime;
use serde::Deserialize;
use std::env;

use slated_core::SchedulerRules;
use slated_domain::DailyWindow;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub booking: BookingRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Operational scheduling knobs. The window default mirrors the classic
/// 09:00-18:00 hourly slot sheet for services that never set their own.
#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    #[serde(default = "default_window_start")]
    pub default_window_start: NaiveTime,
    #[serde(default = "default_window_end")]
    pub default_window_end: NaiveTime,
    #[serde(default = "default_max_range_days")]
    pub max_range_days: i64,
}

fn default_window_start() -> NaiveTime {
    DailyWindow::default().start
}

fn default_window_end() -> NaiveTime {
    DailyWindow::default().end
}

fn default_max_range_days() -> i64 {
    SchedulerRules::default().max_range_days
}

impl BookingRules {
    pub fn scheduler_rules(&self) -> SchedulerRules {
        SchedulerRules {
            default_window: DailyWindow {
                start: self.default_window_start,
                end: self.default_window_end,
            },
            max_range_days: self.max_range_days,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of SLATED)
            .add_source(config::Environment::with_prefix("SLATED").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
