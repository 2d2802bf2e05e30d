//! # `argus-core` - 领域核心
//!
//! 定义实体、错误枚举与端口 (Port) trait，不包含任何具体实现。
//! 适配器 crate (`argus-feed`、`argus-notify`) 实现这些端口，
//! `argus-engine` 只依赖这里的抽象。

pub mod common;
pub mod config;

pub mod market {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod notify {
    pub mod error;
    pub mod port;
}

pub mod signal {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod universe {
    pub mod error;
    pub mod port;
}
