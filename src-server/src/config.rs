use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use sprintview_core::calendar::HolidayCalendarKind;
use sprintview_core::forecast::ForecastSettings;
use sprintview_core::issues::IssueSourceFormat;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Server settings, read from `SPRINTVIEW_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub issues_file: PathBuf,
    pub issues_format: IssueSourceFormat,
    pub holidays: HolidayCalendarKind,
    /// Holiday table read when `holidays` is `list`
    pub holidays_file: Option<PathBuf>,
    pub forecast: ForecastSettings,
}

fn parse<T>(key: &'static str, raw: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host: IpAddr = match lookup("SPRINTVIEW_HOST") {
            Some(raw) => parse("SPRINTVIEW_HOST", raw)?,
            None => IpAddr::from([127, 0, 0, 1]),
        };
        let port: u16 = match lookup("SPRINTVIEW_PORT") {
            Some(raw) => parse("SPRINTVIEW_PORT", raw)?,
            None => 8088,
        };

        let issues_file = lookup("SPRINTVIEW_ISSUES_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("SPRINTVIEW_ISSUES_FILE"))?;

        let issues_format = match lookup("SPRINTVIEW_ISSUES_FORMAT") {
            Some(raw) => parse("SPRINTVIEW_ISSUES_FORMAT", raw)?,
            None => IssueSourceFormat::default(),
        };
        let holidays_file = lookup("SPRINTVIEW_HOLIDAYS_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let holidays = match lookup("SPRINTVIEW_HOLIDAYS") {
            Some(raw) => parse("SPRINTVIEW_HOLIDAYS", raw)?,
            None if holidays_file.is_some() => HolidayCalendarKind::List,
            None => HolidayCalendarKind::default(),
        };
        if holidays == HolidayCalendarKind::List && holidays_file.is_none() {
            return Err(ConfigError::Missing("SPRINTVIEW_HOLIDAYS_FILE"));
        }

        let mut forecast = ForecastSettings::default();
        if let Some(raw) = lookup("SPRINTVIEW_UTC_OFFSET_SECONDS") {
            forecast.utc_offset_seconds = parse("SPRINTVIEW_UTC_OFFSET_SECONDS", raw)?;
        }
        if let Some(raw) = lookup("SPRINTVIEW_RECENCY_DAYS") {
            forecast.recency_window_days = parse("SPRINTVIEW_RECENCY_DAYS", raw)?;
        }
        forecast.validate().map_err(|e| ConfigError::Invalid {
            key: "SPRINTVIEW_UTC_OFFSET_SECONDS",
            value: forecast.utc_offset_seconds.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Config {
            listen_addr: SocketAddr::new(host, port),
            issues_file,
            issues_format,
            holidays,
            holidays_file,
            forecast,
        })
    }
}
