use thiserror::Error;

/// # Summary
/// 标的池加载错误枚举。
///
/// # Invariants
/// - 仅在适配器内部流转，`TickerUniverse::load` 不向调用方暴露。
#[derive(Error, Debug)]
pub enum UniverseError {
    // 远程列表请求失败
    #[error("Network error: {0}")]
    Network(String),
    // 列表内容无法解析
    #[error("Parse error: {0}")]
    Parse(String),
    // 本地缓存文件读取失败
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
