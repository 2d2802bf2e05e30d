//! # `argus-notify` - 通知适配器
//!
//! 通过 SMTP 投递告警邮件。未配置凭据时投递被静默跳过。

pub mod email;
