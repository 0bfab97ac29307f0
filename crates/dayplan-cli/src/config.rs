use chrono_tz::Tz;
use dayplan_core::error::CoreError;
use dayplan_core::layout::TimelineGeometry;
use dayplan_core::reminders::ReminderConfig;
use dayplan_core::suggest::SuggestionConfig;
use dayplan_core::timezone::parse_timezone;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::timezone::detect_system_timezone;

pub const CONFIG_FILE: &str = "dayplan.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub database_path: String,
    /// IANA name of the zone task times are written in
    pub timezone: String,
    #[serde(default)]
    pub timeline: TimelineGeometry,
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub suggestions: SuggestionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "dayplan.db".to_string(),
            timezone: detect_system_timezone(),
            timeline: TimelineGeometry::default(),
            reminders: ReminderConfig::default(),
            suggestions: SuggestionConfig::default(),
        }
    }
}

impl Config {
    /// Defaults, then `dayplan.toml`, then the environment.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(
                Env::raw()
                    .only(&["GEMINI_API_KEY"])
                    .map(|_| "suggestions.api_key".into()),
            )
            .merge(Env::prefixed("DAYPLAN_").split("__"))
    }

    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn tz(&self) -> Result<Tz, CoreError> {
        parse_timezone(&self.timezone)
    }
}
