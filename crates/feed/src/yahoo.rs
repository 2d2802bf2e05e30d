use argus_core::common::{TickerSymbol, TimeFrame};
use argus_core::market::entity::PriceBar;
use argus_core::market::error::MarketError;
use argus_core::market::port::{HistoryWindow, MarketDataProvider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// # Summary
/// Yahoo Finance 行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯。
/// - 返回的 K 线时间戳严格递增。
#[derive(Clone)]
pub struct YahooProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// chart 接口根地址
    base_url: String,
}

impl YahooProvider {
    /// # Summary
    /// 创建一个新的 YahooProvider 实例。
    ///
    /// # Logic
    /// 1. 配置 10 秒超时。
    /// 2. 设置伪装浏览器 Header (User-Agent) 以减少被拦截风险。
    /// 3. 初始化 reqwest 客户端。
    ///
    /// # Returns
    /// 成功返回 YahooProvider，客户端构建失败返回 MarketError。
    pub fn new() -> Result<Self, MarketError> {
        Self::with_base_url(CHART_URL)
    }

    /// 指定 chart 接口根地址，便于接入镜像或本地桩服务
    pub fn with_base_url(base_url: &str) -> Result<Self, MarketError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
            ),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()
            .map_err(|e| MarketError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// # Summary
/// Yahoo API 响应顶层结构。
///
/// # Invariants
/// - 映射自 Yahoo v8 chart 接口。
#[derive(Deserialize, Debug)]
struct YahooResponse {
    chart: YahooChart,
}

/// # Summary
/// Yahoo API 图表数据部分。
#[derive(Deserialize, Debug)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

/// # Summary
/// Yahoo API 错误详情。
#[derive(Deserialize, Debug)]
struct YahooError {
    description: String,
}

/// # Summary
/// Yahoo API 单个时间序列结果。
/// 非交易时段请求时 `timestamp` 字段会整体缺失。
#[derive(Deserialize, Debug)]
struct YahooResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

/// # Summary
/// Yahoo API 指标容器。
#[derive(Deserialize, Debug)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

/// # Summary
/// Yahoo API 原始报价数据，停牌或盘中缺口处为 null。
#[derive(Deserialize, Debug)]
struct YahooQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// 映射 TimeFrame 为 Yahoo 识别的 interval
fn interval_param(timeframe: TimeFrame) -> &'static str {
    match timeframe {
        TimeFrame::Minute1 => "1m",
        TimeFrame::Day1 => "1d",
    }
}

/// # Summary
/// 将 chart 响应转换为 K 线序列。
///
/// # Logic
/// 1. 接口返回 error 字段时转换为 MarketError。
/// 2. 缺少收盘价或收盘价非有限的记录被丢弃。
/// 3. 时间戳不严格递增的记录被丢弃，保证序列无重复。
///
/// # Returns
/// K 线列表，可能为空。
fn parse_chart(response: YahooResponse) -> Result<Vec<PriceBar>, MarketError> {
    if let Some(err) = response.chart.error {
        return Err(MarketError::Upstream(err.description));
    }

    let result = response
        .chart
        .result
        .ok_or(MarketError::NotFound)?
        .pop()
        .ok_or(MarketError::NotFound)?;

    let Some(quote) = result.indicators.quote.first() else {
        return Ok(Vec::new());
    };

    let mut bars: Vec<PriceBar> = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(close) = quote.close.get(i).copied().flatten() else {
            continue;
        };
        if !close.is_finite() {
            continue;
        }
        let Some(time) = DateTime::<Utc>::from_timestamp(ts, 0) else {
            continue;
        };
        if bars.last().is_some_and(|prev| prev.time >= time) {
            continue;
        }

        bars.push(PriceBar {
            time,
            open: quote.open.get(i).copied().flatten(),
            high: quote.high.get(i).copied().flatten(),
            low: quote.low.get(i).copied().flatten(),
            close,
            volume: quote.volume.get(i).copied().flatten(),
        });
    }

    Ok(bars)
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    /// # Summary
    /// 从 Yahoo Finance 抓取回溯窗口内的 K 线。
    ///
    /// # Logic
    /// 1. 以 `range={days}d` 与 `interval` 构建请求，由 Yahoo 按交易日对齐窗口。
    /// 2. 发起异步请求并解析嵌套的 JSON 数据。
    /// 3. 转换为按时间升序的 PriceBar。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `window`: 回溯窗口。
    ///
    /// # Returns
    /// 成功返回 K 线列表，失败返回 MarketError。
    async fn fetch_history(
        &self,
        symbol: &TickerSymbol,
        window: HistoryWindow,
    ) -> Result<Vec<PriceBar>, MarketError> {
        let url = format!("{}/{}", self.base_url, symbol);
        let range = format!("{}d", window.days);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("range", range.as_str()),
                ("interval", interval_param(window.timeframe)),
            ])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MarketError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(MarketError::Status(resp.status().as_u16()));
        }

        let json: YahooResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        let bars = parse_chart(json)?;
        debug!(
            ticker = %symbol,
            bars = bars.len(),
            range = %range,
            interval = %window.timeframe,
            "Fetched Yahoo history"
        );
        Ok(bars)
    }
}
