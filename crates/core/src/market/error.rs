use thiserror::Error;

/// # Summary
/// 行情获取失败的原因。对分析管线和盯盘循环而言都只影响单只证券。
#[derive(Error, Debug)]
pub enum MarketError {
    // 连接、超时等传输层失败
    #[error("Network error: {0}")]
    Network(String),
    // 数据源返回了非成功的 HTTP 状态码
    #[error("Unexpected HTTP status {0}")]
    Status(u16),
    // 响应体无法按预期结构解析
    #[error("Parse error: {0}")]
    Parse(String),
    // 代码不存在或响应中没有结果
    #[error("Data not found")]
    NotFound,
    // 数据源在响应体中明确报告的错误
    #[error("Data source error: {0}")]
    Upstream(String),
}
