use crate::error::{BoardCheckError, Result};
use boardcheck_common::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ベースURLを上書きする環境変数
pub const BASE_URL_ENV: &str = "BOARDCHECK_API_URL";

const STORE_FILE_NAME: &str = "store.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub base_url: Option<String>,
    pub detect_timeout_seconds: Option<u64>,
    /// 履歴・言語設定の保存先（未指定ならデータディレクトリ）
    pub store_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BoardCheckError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("boardcheck").join("config.json"))
    }

    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.store_path {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| BoardCheckError::Config("data directory not found".into()))?;
        Ok(data_dir.join("boardcheck").join(STORE_FILE_NAME))
    }

    /// 実際に使うベースURL（環境変数 > 設定ファイル > 既定値）
    pub fn base_url(&self) -> String {
        self.resolve_base_url(std::env::var(BASE_URL_ENV).ok())
    }

    fn resolve_base_url(&self, env_value: Option<String>) -> String {
        env_value
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| ClientConfig::default().base_url)
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut client = ClientConfig::with_base_url(self.base_url());
        if let Some(secs) = self.detect_timeout_seconds {
            client.detect_timeout_secs = secs;
        }
        client
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        let trimmed = url.trim().trim_end_matches('/').to_string();
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(BoardCheckError::Config(format!(
                "base URL must start with http:// or https://: {}",
                url
            )));
        }
        self.base_url = Some(trimmed);
        self.save()
    }
}
