use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 占位密钥，生产环境必须覆盖
const PLACEHOLDER_JWT_SECRET: &str = "change-me-in-production";

/// 常用环境变量到配置键的映射，优先级高于 `TKSE_*`
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("APP_ENV", "app.environment"),
    ("RUST_LOG", "app.log_level"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("UNIX_SOCKET", "server.unix_socket_path"),
    ("CPU_COUNT", "server.workers"),
    ("JWT_SECRET", "jwt.secret"),
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "cache.redis.url"),
    ("REDIS_KEY_PREFIX", "cache.redis.key_prefix"),
    ("CACHE_TTL", "cache.default_ttl"),
    ("FRONTEND_RESET_URL", "password_reset.frontend_reset_url"),
    ("VOOMP_WEBHOOK_TOKEN", "voomp.webhook_token"),
];

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{environment}")).required(false))
            .add_source(
                Environment::with_prefix("TKSE")
                    .separator("_")
                    .try_parsing(true),
            );

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;

        // 0 表示按 CPU 数决定
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        app_config.validate()?;
        Ok(app_config)
    }

    /// 校验配置取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        if self.is_production() && self.jwt.secret == PLACEHOLDER_JWT_SECRET {
            return Err(ConfigError::Message(
                "jwt.secret must be overridden in production".into(),
            ));
        }
        if self.jwt.access_token_expiry <= 0 {
            return Err(ConfigError::Message(
                "jwt.access_token_expiry must be positive".into(),
            ));
        }
        if self.chat.heartbeat_interval == 0 {
            return Err(ConfigError::Message(
                "chat.heartbeat_interval must be positive".into(),
            ));
        }
        if self.password_reset.token_ttl_minutes <= 0 {
            return Err(ConfigError::Message(
                "password_reset.token_ttl_minutes must be positive".into(),
            ));
        }
        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Unix 套接字路径，未配置时为 None
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        Some(self.server.unix_socket_path.as_str()).filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(extra: &str) -> AppConfig {
        let base = include_str!("../../config.toml");
        Config::builder()
            .add_source(File::from_str(base, FileFormat::Toml))
            .add_source(File::from_str(extra, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_file_is_valid() {
        let config = from_toml("");
        assert!(config.validate().is_ok());
        assert_eq!(config.server_bind_address(), "127.0.0.1:8080");
        assert!(config.is_development());
    }

    #[test]
    fn test_placeholder_secret_rejected_in_production() {
        let config = from_toml("[app]\nenvironment = \"production\"");
        assert!(config.validate().is_err());

        let config = from_toml(
            "[app]\nenvironment = \"production\"\n[jwt]\nsecret = \"a-real-secret\"",
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_heartbeat_rejected() {
        let config = from_toml("[chat]\nheartbeat_interval = 0");
        assert!(config.validate().is_err());
    }
}
