//! Configuration loading from TOML files.
//!
//! Everything has a working default, so a missing section falls back to the
//! stock merchant-gateway endpoints. The file itself must exist: running
//! against the wrong gateway because a typo'd path silently produced
//! defaults is worse than failing fast.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveTime;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub platform: PlatformConfig,
    pub business_hours: BusinessHoursConfig,
    pub logging: LoggingConfig,
}

/// Merchant gateway endpoints and connection tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Account profile lookup (POST, empty body).
    pub profile_url: String,
    /// Merchant/shop info lookup (POST, empty JSON object).
    pub merchant_url: String,
    /// Chat token issuance (POST).
    pub token_url: String,
    /// Reply submission endpoint (POST).
    pub send_url: String,
    /// Chat stream endpoint; token and role are appended as query parameters.
    pub ws_url: String,
    /// Protocol version tag sent on the stream handshake.
    pub ws_version: String,
    /// Keep-alive ping interval for the chat stream, in seconds.
    pub ping_interval_secs: u64,
    /// Headers applied to every gateway request. A `cookie` entry here is
    /// replaced by the session cookie set at request time.
    pub default_headers: BTreeMap<String, String>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert(
            "user-agent".into(),
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
                .into(),
        );
        default_headers.insert("accept".into(), "application/json, text/plain, */*".into());
        default_headers.insert("origin".into(), "https://mms.pinduoduo.com".into());
        default_headers.insert("referer".into(), "https://mms.pinduoduo.com/".into());

        Self {
            profile_url: "https://mms.pinduoduo.com/janus/api/new/userinfo".into(),
            merchant_url: "https://mms.pinduoduo.com/earth/api/merchant/queryMerchantInfoByMallId"
                .into(),
            token_url: "https://mms.pinduoduo.com/chats/getToken".into(),
            send_url: "https://mms.pinduoduo.com/plateau/chat/send_message".into(),
            ws_url: "wss://m-ws.pinduoduo.com/".into(),
            ws_version: "202506091557".into(),
            ping_interval_secs: 20,
            default_headers,
        }
    }
}

/// Shop service window. Parsed and shown at startup; the relay itself runs
/// whenever the operator does.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BusinessHoursConfig {
    pub start: String,
    pub end: String,
}

impl Default for BusinessHoursConfig {
    fn default() -> Self {
        Self {
            start: "09:00".into(),
            end: "23:00".into(),
        }
    }
}

impl BusinessHoursConfig {
    fn parse(&self) -> std::result::Result<(NaiveTime, NaiveTime), ConfigError> {
        let parse_one = |field: &'static str, value: &str| {
            NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| ConfigError::InvalidValue {
                field,
                reason: format!("expected HH:MM, got {value:?}: {e}"),
            })
        };
        Ok((
            parse_one("business_hours.start", &self.start)?,
            parse_one("business_hours.end", &self.end)?,
        ))
    }

    /// Whether `time` falls inside the service window. Windows that cross
    /// midnight (start > end) wrap around.
    pub fn contains(&self, time: NaiveTime) -> bool {
        let Ok((start, end)) = self.parse() else {
            return true;
        };
        if start <= end {
            start <= time && time < end
        } else {
            time >= start || time < end
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("platform.profile_url", &self.platform.profile_url),
            ("platform.merchant_url", &self.platform.merchant_url),
            ("platform.token_url", &self.platform.token_url),
            ("platform.send_url", &self.platform.send_url),
            ("platform.ws_url", &self.platform.ws_url),
        ] {
            if value.is_empty() {
                return Err(ConfigError::MissingField { field }.into());
            }
        }
        url::Url::parse(&self.platform.ws_url).map_err(|e| ConfigError::InvalidValue {
            field: "platform.ws_url",
            reason: e.to_string(),
        })?;
        if self.platform.ping_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "platform.ping_interval_secs",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        self.business_hours.parse()?;
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn minimal_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.platform.ping_interval_secs, 20);
        assert!(config.platform.ws_url.starts_with("wss://"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_ping_interval_is_rejected() {
        let config: Config =
            toml::from_str("[platform]\nping_interval_secs = 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ping_interval_secs"));
    }

    #[test]
    fn malformed_business_hours_are_rejected() {
        let config: Config =
            toml::from_str("[business_hours]\nstart = \"9am\"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("business_hours.start"));
    }

    #[test]
    fn business_hours_contain_daytime() {
        let hours = BusinessHoursConfig::default();
        assert!(hours.contains(NaiveTime::from_hms_opt(12, 0, 0).unwrap()));
        assert!(!hours.contains(NaiveTime::from_hms_opt(3, 30, 0).unwrap()));
    }

    #[test]
    fn overnight_business_hours_wrap() {
        let hours = BusinessHoursConfig {
            start: "22:00".into(),
            end: "06:00".into(),
        };
        assert!(hours.contains(NaiveTime::from_hms_opt(23, 30, 0).unwrap()));
        assert!(hours.contains(NaiveTime::from_hms_opt(2, 0, 0).unwrap()));
        assert!(!hours.contains(NaiveTime::from_hms_opt(12, 0, 0).unwrap()));
    }
}
