//! Where the CLI finds its config and database, and which clock it reads.

use chrono::{DateTime, Utc};
use keepsake_core::storage::data_dir;
use keepsake_core::{Clock, Config, Database, FixedClock, SystemClock};
use std::error::Error;
use std::path::PathBuf;

pub struct Context {
    data_dir: Option<PathBuf>,
}

impl Context {
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        Self { data_dir }
    }

    fn dir(&self) -> Result<PathBuf, Box<dyn Error>> {
        match &self.data_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                Ok(dir.clone())
            }
            None => Ok(data_dir()?),
        }
    }

    pub fn load_config(&self) -> Result<Config, Box<dyn Error>> {
        match &self.data_dir {
            Some(_) => Ok(Config::load_from(&self.dir()?.join("config.toml"))?),
            None => Ok(Config::load()?),
        }
    }

    pub fn save_config(&self, config: &Config) -> Result<(), Box<dyn Error>> {
        match &self.data_dir {
            Some(_) => Ok(config.save_to(&self.dir()?.join("config.toml"))?),
            None => Ok(config.save()?),
        }
    }

    pub fn open_db(&self) -> Result<Database, Box<dyn Error>> {
        match &self.data_dir {
            Some(_) => Ok(Database::open_at(&self.dir()?.join("keepsake.db"))?),
            None => Ok(Database::open()?),
        }
    }
}

/// `--now` when given, otherwise the system clock.
pub fn now_or_system(now: Option<DateTime<Utc>>) -> DateTime<Utc> {
    match now {
        Some(at) => FixedClock(at).now(),
        None => SystemClock.now(),
    }
}
