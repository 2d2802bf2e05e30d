use argus_core::common::{TickerSymbol, dedup_symbols};
use argus_core::config::AppConfig;
use argus_core::universe::error::UniverseError;
use argus_core::universe::port::TickerUniverse;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// # Summary
/// 由配置文件显式给出的标的池。
///
/// # Invariants
/// - 构造时即完成去重，`load` 不做任何 IO。
pub struct StaticUniverse {
    symbols: Vec<TickerSymbol>,
}

impl StaticUniverse {
    pub fn new(symbols: impl IntoIterator<Item = TickerSymbol>) -> Self {
        Self {
            symbols: dedup_symbols(symbols),
        }
    }
}

#[async_trait]
impl TickerUniverse for StaticUniverse {
    async fn load(&self) -> Vec<TickerSymbol> {
        self.symbols.clone()
    }
}

/// 远程列表格式：`{"companies": [{"symbol": "AAPL", ...}]}`
#[derive(Deserialize)]
struct RemoteList {
    #[serde(default)]
    companies: Vec<RemoteCompany>,
}

#[derive(Deserialize)]
struct RemoteCompany {
    symbol: String,
}

/// 本地缓存格式：`{"data": [[_, _, "AAPL", ...]]}`，代码位于下标 2
#[derive(Deserialize)]
struct CachedList {
    #[serde(default)]
    data: Vec<Vec<serde_json::Value>>,
}

/// # Summary
/// 远程成分股列表，失败时回退到本地缓存文件。
///
/// # Invariants
/// - `load` 永不返回错误：远程与缓存都失败时返回空列表。
pub struct RemoteUniverse {
    client: Client,
    url: String,
    cache_path: PathBuf,
}

impl RemoteUniverse {
    /// # Summary
    /// 创建远程标的池。
    ///
    /// # Arguments
    /// * `url` - 远程 JSON 列表地址。
    /// * `cache_path` - 本地回退文件路径。
    ///
    /// # Returns
    /// * 成功返回实例，HTTP 客户端构建失败返回 `UniverseError::Network`。
    pub fn new(url: &str, cache_path: impl Into<PathBuf>) -> Result<Self, UniverseError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| UniverseError::Network(e.to_string()))?;
        Ok(Self {
            client,
            url: url.to_string(),
            cache_path: cache_path.into(),
        })
    }

    async fn fetch_remote(&self) -> Result<Vec<TickerSymbol>, UniverseError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| UniverseError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(UniverseError::Network(format!("HTTP {}", resp.status())));
        }

        // gist raw 接口返回 text/plain，按文本读取后再解析
        let body = resp
            .text()
            .await
            .map_err(|e| UniverseError::Network(e.to_string()))?;
        parse_remote(&body)
    }
}

fn parse_remote(body: &str) -> Result<Vec<TickerSymbol>, UniverseError> {
    let list: RemoteList =
        serde_json::from_str(body).map_err(|e| UniverseError::Parse(e.to_string()))?;
    Ok(dedup_symbols(
        list.companies
            .iter()
            .filter_map(|c| TickerSymbol::new(&c.symbol)),
    ))
}

fn parse_cache(body: &str) -> Result<Vec<TickerSymbol>, UniverseError> {
    let list: CachedList =
        serde_json::from_str(body).map_err(|e| UniverseError::Parse(e.to_string()))?;
    Ok(dedup_symbols(list.data.iter().filter_map(|row| {
        row.get(2)
            .and_then(|v| v.as_str())
            .and_then(TickerSymbol::new)
    })))
}

/// 读取本地缓存文件
pub async fn read_cache(path: &Path) -> Result<Vec<TickerSymbol>, UniverseError> {
    let body = tokio::fs::read_to_string(path).await?;
    parse_cache(&body)
}

#[async_trait]
impl TickerUniverse for RemoteUniverse {
    /// # Summary
    /// 加载标的池。
    ///
    /// # Logic
    /// 1. 请求远程列表，成功即返回。
    /// 2. 远程失败时读取本地缓存文件。
    /// 3. 两者都失败时记录错误并返回空列表。
    async fn load(&self) -> Vec<TickerSymbol> {
        match self.fetch_remote().await {
            Ok(symbols) => {
                info!(count = symbols.len(), "Loaded ticker universe from remote list");
                return symbols;
            }
            Err(e) => warn!(url = %self.url, error = %e, "Failed to fetch remote ticker list"),
        }

        match read_cache(&self.cache_path).await {
            Ok(symbols) => {
                info!(
                    count = symbols.len(),
                    path = %self.cache_path.display(),
                    "Loaded ticker universe from local cache"
                );
                symbols
            }
            Err(e) => {
                error!(
                    path = %self.cache_path.display(),
                    error = %e,
                    "Ticker universe unavailable, nothing to analyze"
                );
                Vec::new()
            }
        }
    }
}

/// # Summary
/// 根据配置选择标的池实现。
///
/// # Logic
/// 1. 配置中有非空 `tickers` 时使用静态列表。
/// 2. 否则使用远程列表 + 本地缓存回退。
pub fn universe_from_config(config: &AppConfig) -> Result<Arc<dyn TickerUniverse>, UniverseError> {
    match config.explicit_tickers() {
        Some(symbols) => Ok(Arc::new(StaticUniverse::new(symbols.iter().cloned()))),
        None => Ok(Arc::new(RemoteUniverse::new(
            &config.universe_url,
            config.tickers_cache.clone(),
        )?)),
    }
}
