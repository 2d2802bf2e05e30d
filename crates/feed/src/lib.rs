//! # `argus-feed` - 外部数据适配器
//!
//! - `yahoo`: 基于 Yahoo Finance v8 chart 接口的历史行情提供者。
//! - `universe`: 静态配置或远程列表 (带本地缓存回退) 的标的池。

pub mod universe;
pub mod yahoo;
