use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::order::StatusPolicy;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    /// PostgreSQL connection URL; without one the gateway runs on the in-memory store
    #[serde(default)]
    pub postgres_url: Option<String>,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub orders: OrdersConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Empty list = any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: i64,
}

fn default_expiry_hours() -> i64 {
    24
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OrdersConfig {
    #[serde(default)]
    pub status_policy: StatusPolicy,
}

impl AppConfig {
    /// Load `config/{env}.yaml`, then apply `JWT_SECRET` / `DATABASE_URL` overrides
    pub fn load(env: &str) -> Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path))?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        anyhow::ensure!(
            !config.jwt.secret.is_empty(),
            "jwt.secret is empty: set it in {} or via JWT_SECRET",
            config_path
        );
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(secret) = var("JWT_SECRET").filter(|s| !s.is_empty()) {
            self.jwt.secret = secret;
        }
        if let Some(url) = var("DATABASE_URL").filter(|s| !s.is_empty()) {
            self.postgres_url = Some(url);
        }
    }
}
