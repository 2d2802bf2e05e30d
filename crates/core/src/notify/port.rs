use crate::notify::error::NotifyError;
use async_trait::async_trait;

/// # Summary
/// 一次投递尝试的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// 消息已交给传输层
    Sent,
    /// 未配置凭据，本次投递被跳过
    Skipped,
}

/// # Summary
/// 发送通知到外部系统的接口定义。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync` 以支持并发调用。
/// - 缺少凭据不是错误：实现应返回 `Delivery::Skipped`。
#[async_trait]
pub trait Notifier: Send + Sync {
    /// # Summary
    /// 向指定收件人发送带有主题和内容的通知。
    ///
    /// # Logic
    /// 1. 根据目标平台要求格式化消息。
    /// 2. 通过底层传输协议发送消息。
    /// 3. 返回投递结果或失败原因。
    ///
    /// # Arguments
    /// * `to` - 收件人地址。
    /// * `subject` - 通知标题或主题。
    /// * `content` - 通知的具体内容。
    ///
    /// # Returns
    /// * 成功返回 `Ok(Delivery)`。
    /// * 失败返回 `Err(NotifyError)`。
    async fn notify(&self, to: &str, subject: &str, content: &str) -> Result<Delivery, NotifyError>;
}
