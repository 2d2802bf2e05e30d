use argus_core::config::{AppConfig, ConfigError};
use config::{Environment, File, FileFormat};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "ARGUS_CONFIG";
/// 未指定时在工作目录下查找的配置文件
pub const DEFAULT_CONFIG_PATH: &str = "config.json";
/// 覆盖配置项的环境变量前缀，例如 `ARGUS_EMAIL`、`ARGUS_SMTP__PORT`
pub const ENV_PREFIX: &str = "ARGUS";

/// # Summary
/// 加载并校验应用配置。
///
/// # Logic
/// 1. 读取 `ARGUS_CONFIG` 指定的文件，未设置时读取 `config.json`；文件必须存在。
/// 2. 以 `ARGUS_` 前缀的环境变量覆盖文件中的值，嵌套键用 `__` 分隔。
/// 3. 反序列化后执行启动期校验。
///
/// # Returns
/// 成功返回只读配置；任何失败都是启动期致命错误。
pub fn load() -> Result<AppConfig, ConfigError> {
    let path = config_path(std::env::var(CONFIG_PATH_ENV).ok());
    load_from(&path, environment(None))
}

/// # Summary
/// 每次定时分析前重新读取配置，使 `tickers`、`email` 等修改在下一次运行时生效。
///
/// # Logic
/// 1. 按启动时相同的来源与优先级重新加载。
/// 2. 读取或校验失败时记录告警并沿用上一份配置，不中断调度。
pub fn reload(previous: &AppConfig) -> AppConfig {
    let path = config_path(std::env::var(CONFIG_PATH_ENV).ok());
    reload_from(&path, environment(None), previous)
}

fn reload_from(path: &Path, env: Environment, previous: &AppConfig) -> AppConfig {
    match load_from(path, env) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Config reload failed, keeping previous configuration");
            previous.clone()
        }
    }
}

/// 配置文件路径：空白的覆盖值视为未设置
fn config_path(override_path: Option<String>) -> PathBuf {
    override_path
        .filter(|p| !p.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// 环境变量覆盖源；`vars` 为 None 时读取进程环境
fn environment(vars: Option<HashMap<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("tickers")
        .source(vars.map(|v| v.into_iter().collect()))
}

fn load_from(path: &Path, env: Environment) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = config::Config::builder()
        .add_source(File::from(path).format(FileFormat::Json).required(true))
        .add_source(env)
        .build()
        .and_then(config::Config::try_deserialize)
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;

    config.validate()?;
    Ok(config)
}
