use std::env;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::ConfigError;

const DEFAULT_DATABASE_URL: &str = "sqlite://billy.db";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_TIME_ZONE: &str = "America/Los_Angeles";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub max_connections: u32,
    pub reference_tz: Tz,
}

impl Config {
    /// Reads the service settings from the process environment.
    /// Call `dotenv()` first if a `.env` file should be honored.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());

        let bind_address = match (lookup("BIND_ADDRESS"), lookup("PORT")) {
            (Some(address), _) => address,
            (None, Some(port)) => {
                let port: u16 = port.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::InvalidVar {
                        name: "PORT",
                        value: port.clone(),
                        reason: e.to_string(),
                    }
                })?;
                format!("0.0.0.0:{}", port)
            }
            (None, None) => DEFAULT_BIND_ADDRESS.into(),
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => match value.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidVar {
                        name: "DATABASE_MAX_CONNECTIONS",
                        value,
                        reason: "expected a positive integer".into(),
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let tz_name = lookup("REFERENCE_TIME_ZONE").unwrap_or_else(|| DEFAULT_TIME_ZONE.into());
        let reference_tz = tz_name.parse::<Tz>().map_err(|e| ConfigError::InvalidVar {
            name: "REFERENCE_TIME_ZONE",
            value: tz_name.clone(),
            reason: e.to_string(),
        })?;

        Ok(Config {
            database_url,
            bind_address,
            max_connections,
            reference_tz,
        })
    }

    // "Today" as seen from the reference time zone, used for tasks without a date
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.reference_tz).date_naive()
    }
}
