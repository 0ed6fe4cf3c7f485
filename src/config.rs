// config.rs
use crate::domain::limits::{AmountLimits, AmountRange};
use crate::scraper::browser::BrowserConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: cannot parse {value:?}")]
    Invalid { key: String, value: String },

    #[error("{key}: min {min} is above max {max}")]
    EmptyRange { key: String, min: i64, max: i64 },
}

/// Everything read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    /// Unset means reqwest's default.
    pub fetch_timeout: Option<Duration>,
    pub browser: BrowserConfig,
    pub limits: AmountLimits,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary key source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AmountLimits::default();
        let browser_defaults = BrowserConfig::default();

        let rent = range(&lookup, ("RENT_MIN", "RENT_MAX"), defaults.rent)?;
        let fee = range(&lookup, ("FEE_MIN", "FEE_MAX"), defaults.condo)?;

        Ok(Self {
            bind_addr: parsed(&lookup, "BIND_ADDR")?
                .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000))),
            max_workers: parsed(&lookup, "MAX_WORKERS")?.unwrap_or(8),
            fetch_timeout: parsed(&lookup, "FETCH_TIMEOUT_SECS")?.map(Duration::from_secs),
            browser: BrowserConfig {
                chrome_path: lookup("CHROME_PATH")
                    .filter(|p| !p.trim().is_empty())
                    .map(PathBuf::from),
                nav_timeout: parsed(&lookup, "NAV_TIMEOUT_SECS")?
                    .map(Duration::from_secs)
                    .unwrap_or(browser_defaults.nav_timeout),
                settle: parsed(&lookup, "SETTLE_SECS")?
                    .map(Duration::from_secs)
                    .unwrap_or(browser_defaults.settle),
                ..browser_defaults
            },
            limits: AmountLimits {
                rent,
                condo: fee,
                iptu: fee,
            },
        })
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                key: key.to_string(),
                value: raw,
            }),
    }
}

fn range<F>(
    lookup: &F,
    (min_key, max_key): (&str, &str),
    default: AmountRange,
) -> Result<AmountRange, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let min = parsed(lookup, min_key)?.unwrap_or(default.min);
    let max = parsed(lookup, max_key)?.unwrap_or(default.max);
    if min > max {
        return Err(ConfigError::EmptyRange {
            key: format!("{min_key}/{max_key}"),
            min,
            max,
        });
    }
    Ok(AmountRange::new(min, max))
}
