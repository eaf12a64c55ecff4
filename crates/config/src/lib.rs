//! 统一配置中心
//!
//! 提供应用的全局配置管理，包括：
//! - 服务监听地址
//! - 存储后端与数据库连接
//! - Webhook 推送
//!
//! 加载顺序：默认值 -> 可选配置文件（`APP_CONFIG_FILE`）-> 环境变量（`APP_*`，
//! 以 `__` 分隔层级，例如 `APP_WEBHOOK__URL`）。

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// 服务配置
    #[validate(nested)]
    pub server: ServerConfig,
    /// 存储后端选择
    #[serde(default)]
    pub storage: StorageConfig,
    /// 数据库配置
    #[validate(nested)]
    pub database: DatabaseConfig,
    /// Webhook 配置
    #[serde(default)]
    #[validate(nested)]
    pub webhook: WebhookConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// 进程内存，重启后丢失
    Memory,
    /// 嵌入式 SQLite
    #[default]
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    #[validate(length(min = 1))]
    pub url: String,
    #[validate(range(min = 1))]
    pub max_connections: u32,
}

/// Webhook 配置
///
/// `url` 含有访问令牌，只能来自配置文件或环境变量。
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WebhookConfig {
    #[validate(url)]
    pub url: Option<String>,
    /// 以该名称发送消息
    pub username: Option<String>,
    #[validate(range(min = 1))]
    pub timeout_seconds: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            timeout_seconds: 10,
        }
    }
}

impl WebhookConfig {
    /// 只保留协议与主机，用于日志
    pub fn redacted_url(&self) -> Option<String> {
        self.url.as_deref().map(redact_url)
    }
}

fn redact_url(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) => {
            let host = rest.split('/').next().unwrap_or_default();
            format!("{scheme}://{host}/***")
        }
        None => "***".to_string(),
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 8000,
            },
            storage: StorageConfig::default(),
            database: DatabaseConfig {
                url: "sqlite://data/events.db".into(),
                max_connections: 5,
            },
            webhook: WebhookConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load config with precedence: defaults -> optional file (APP_CONFIG_FILE) -> env (APP_*)
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// 组装配置来源，测试中可以直接替换
    pub fn figment() -> Figment {
        let mut fig = Figment::new().merge(Serialized::defaults(AppConfig::default()));
        if let Ok(path) = std::env::var("APP_CONFIG_FILE") {
            if path.ends_with(".yml") || path.ends_with(".yaml") {
                fig = fig.merge(Yaml::file(path));
            } else if path.ends_with(".json") {
                fig = fig.merge(Json::file(path));
            } else {
                fig = fig.merge(Toml::file(path));
            }
        }
        fig.merge(Env::prefixed("APP_").split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let cfg: AppConfig = figment.extract().map_err(Box::new)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Return a sanitized string representation (for logs)
    pub fn sanitize(&self) -> String {
        format!(
            "server={} storage={:?} database={} webhook={} webhook_username={}",
            self.server.bind_address(),
            self.storage.backend,
            self.database.url,
            self.webhook
                .redacted_url()
                .unwrap_or_else(|| "<disabled>".to_string()),
            self.webhook.username.as_deref().unwrap_or("<default>"),
        )
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Source(#[from] Box<figment::Error>),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}
