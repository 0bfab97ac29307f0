use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use dayplan_core::repository::Planner;
use dayplan_core::store::SqliteStore;
use dayplan_core::timezone::{local_today, to_local};
use tracing::debug;

use crate::config::Config;

/// Everything a command needs: the planner, the loaded config and the user's zone.
pub struct App {
    pub planner: Planner<SqliteStore>,
    pub config: Config,
    pub tz: Tz,
}

impl App {
    pub async fn open(config: Config) -> Result<Self> {
        let tz = config.tz()?;
        debug!(database = %config.database_path, timezone = %tz, "opening planner");
        let store = SqliteStore::connect(&config.database_path).await?;
        Ok(Self {
            planner: Planner::new(store),
            config,
            tz,
        })
    }

    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// The wall clock in the configured zone.
    pub fn local_now(&self) -> NaiveDateTime {
        to_local(self.now(), self.tz)
    }

    pub fn today(&self) -> NaiveDate {
        local_today(self.now(), self.tz)
    }
}
