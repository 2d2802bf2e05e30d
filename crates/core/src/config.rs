use crate::common::TickerSymbol;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// 默认的远程标的池地址 (S&P 500 成分股)
pub const DEFAULT_UNIVERSE_URL: &str =
    "https://gist.githubusercontent.com/princefishthrower/30ab8a532b4b281ce5bfe386e1df7a29/raw";

/// # Summary
/// 配置加载与校验错误，属于启动期致命错误。
#[derive(Error, Debug)]
pub enum ConfigError {
    // 配置源读取或反序列化失败
    #[error("Failed to load configuration: {0}")]
    Load(String),
    // 字段取值非法
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # Summary
/// 全局应用配置，每个入口调用加载一次，运行期间只读。
///
/// # Invariants
/// - `email` 必填。
/// - `analysis_time` 为 24 小时制 "HH:MM"。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    // 显式指定的标的列表，缺省或为空时回退到标的池提供者
    #[serde(default)]
    pub tickers: Option<Vec<TickerSymbol>>,
    // 通知收件人
    pub email: String,
    #[serde(default = "default_analysis_time")]
    pub analysis_time: String,
    #[serde(default = "default_profit_threshold")]
    pub profit_threshold: f64,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    #[serde(default = "default_universe_url")]
    pub universe_url: String,
    #[serde(default = "default_tickers_cache")]
    pub tickers_cache: PathBuf,
    #[serde(default)]
    pub smtp: SmtpConfig,
}

// 仅覆盖部分字段时其余字段取默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 465,
        }
    }
}

fn default_analysis_time() -> String {
    "09:00".to_string()
}

fn default_profit_threshold() -> f64 {
    0.05
}

fn default_top_n() -> usize {
    5
}

fn default_poll_interval_secs() -> u64 {
    300
}

fn default_history_days() -> u32 {
    60
}

fn default_universe_url() -> String {
    DEFAULT_UNIVERSE_URL.to_string()
}

fn default_tickers_cache() -> PathBuf {
    PathBuf::from("all_tickers.json")
}

impl AppConfig {
    /// 仅填写收件人、其余取默认值的配置
    pub fn with_email(email: &str) -> Self {
        Self {
            tickers: None,
            email: email.to_string(),
            analysis_time: default_analysis_time(),
            profit_threshold: default_profit_threshold(),
            top_n: default_top_n(),
            poll_interval_secs: default_poll_interval_secs(),
            history_days: default_history_days(),
            universe_url: default_universe_url(),
            tickers_cache: default_tickers_cache(),
            smtp: SmtpConfig::default(),
        }
    }

    /// 非空的显式标的列表；空列表与缺省同样视为未配置
    pub fn explicit_tickers(&self) -> Option<&[TickerSymbol]> {
        self.tickers.as_deref().filter(|t| !t.is_empty())
    }

    /// # Summary
    /// 解析每日分析时间。
    ///
    /// # Returns
    /// 成功返回本地挂钟时刻，格式非法返回 `ConfigError::Invalid`。
    pub fn analysis_time(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(self.analysis_time.trim(), "%H:%M").map_err(|e| {
            ConfigError::Invalid(format!(
                "analysis_time {:?} is not HH:MM: {}",
                self.analysis_time, e
            ))
        })
    }

    /// # Summary
    /// 启动期校验，任何一项不合法都会中止启动。
    ///
    /// # Logic
    /// 1. 收件人非空。
    /// 2. 分析时间可解析。
    /// 3. 阈值为正的有限值。
    /// 4. `top_n` 与轮询间隔大于零。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.email.trim().is_empty() {
            return Err(ConfigError::Invalid("email must not be empty".into()));
        }
        self.analysis_time()?;
        if !self.profit_threshold.is_finite() || self.profit_threshold <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "profit_threshold must be a positive number, got {}",
                self.profit_threshold
            )));
        }
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be at least 1".into()));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"email": "u@x.com"}"#).unwrap();
        assert_eq!(config.email, "u@x.com");
        assert_eq!(config.analysis_time, "09:00");
        assert_eq!(config.profit_threshold, 0.05);
        assert_eq!(config.top_n, 5);
        assert_eq!(config.poll_interval_secs, 300);
        assert_eq!(config.smtp.port, 465);
        assert!(config.explicit_tickers().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_email_is_rejected() {
        let result = serde_json::from_str::<AppConfig>(r#"{"tickers": ["AAA"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_ticker_list_means_fallback() {
        let config: AppConfig =
            serde_json::from_str(r#"{"email": "u@x.com", "tickers": []}"#).unwrap();
        assert!(config.explicit_tickers().is_none());

        let config: AppConfig =
            serde_json::from_str(r#"{"email": "u@x.com", "tickers": ["AAA", "BBB"]}"#).unwrap();
        assert_eq!(config.explicit_tickers().map(|t| t.len()), Some(2));
    }

    #[test]
    fn test_analysis_time_parsing() {
        let mut config = AppConfig::with_email("u@x.com");
        config.analysis_time = "16:30".into();
        assert_eq!(
            config.analysis_time().unwrap(),
            NaiveTime::from_hms_opt(16, 30, 0).unwrap()
        );

        config.analysis_time = "25:00".into();
        assert!(matches!(config.analysis_time(), Err(ConfigError::Invalid(_))));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_threshold_must_be_positive() {
        let mut config = AppConfig::with_email("u@x.com");
        config.profit_threshold = 0.0;
        assert!(config.validate().is_err());
        config.profit_threshold = f64::NAN;
        assert!(config.validate().is_err());
    }
}
