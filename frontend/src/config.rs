//! 运行时配置 (Runtime Configuration)
//!
//! WASM 环境没有进程环境变量，配置在编译期通过 `option_env!` 注入，
//! 未设置时回退到默认值。

use log::Level;

/// 这些是默认值，如果构建时没有设置对应的环境变量，则使用这些值
const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_LOG_LEVEL: Level = Level::Info;

const API_URL_VAR: &str = "TASKDECK_API_URL";
const LOG_LEVEL_VAR: &str = "TASKDECK_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 后端 API 基础地址（不含结尾的 `/`）
    pub api_base_url: String,
    pub log_level: Level,
}

impl AppConfig {
    /// 读取构建时注入的配置
    pub fn from_build_env() -> Self {
        Self::from_lookup(|name| match name {
            API_URL_VAR => option_env!("TASKDECK_API_URL").map(str::to_string),
            LOG_LEVEL_VAR => option_env!("TASKDECK_LOG_LEVEL").map(str::to_string),
            _ => None,
        })
    }

    /// 通过查找函数构建配置，读不到或为空时使用默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base_url = lookup(API_URL_VAR)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let log_level = lookup(LOG_LEVEL_VAR)
            .and_then(|v| v.trim().parse::<Level>().ok())
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            api_base_url,
            log_level,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_local_backend() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.log_level, Level::Info);
    }

    #[test]
    fn test_overrides_trim_trailing_slash() {
        let config = AppConfig::from_lookup(|name| match name {
            "TASKDECK_API_URL" => Some("https://tasks.example.com/api/".to_string()),
            "TASKDECK_LOG_LEVEL" => Some("debug".to_string()),
            _ => None,
        });
        assert_eq!(config.api_base_url, "https://tasks.example.com/api");
        assert_eq!(config.log_level, Level::Debug);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = AppConfig::from_lookup(|name| match name {
            "TASKDECK_API_URL" => Some("  ".to_string()),
            "TASKDECK_LOG_LEVEL" => Some("loud".to_string()),
            _ => None,
        });
        assert_eq!(config, AppConfig::default());
    }
}
