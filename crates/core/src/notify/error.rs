use thiserror::Error;

/// # Summary
/// 通知投递失败的原因。由告警分发器记录日志后吞掉，不会中断调用流程。
///
/// # Invariants
/// - 缺少凭据不属于错误，见 `Delivery::Skipped`。
#[derive(Error, Debug)]
pub enum NotifyError {
    /// 与 SMTP 服务器的连接或会话失败
    #[error("Network error: {0}")]
    Network(String),

    /// 地址或服务器配置不合法
    #[error("Configuration error: {0}")]
    Config(String),

    /// 消息构建失败或被服务器拒收
    #[error("Platform error: {0}")]
    Platform(String),
}
