//! 网关 pass-through 配置（server/proxy 两段）。
//!
//! 控制面只负责原样存取这些值，具体含义由网关服务端解释。
//! 读多写少：ArcSwap 快照无锁读取，写入时整文件替换 config.json。

use anyhow::Context;
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_PORT: u16 = 8045;
pub const DEFAULT_PROXY_TIMEOUT_SECS: u32 = 120;
pub const DEFAULT_MAX_WAIT_SECS: u32 = 60;
pub const DEFAULT_SCHEDULE_MODE: &str = "balance";

/// server 段。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub auth_enabled: bool,
    #[serde(default)]
    pub lan_access: bool,
    #[serde(default = "default_true")]
    pub autostart: bool,
}

/// proxy 段。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxySettings {
    #[serde(default = "default_proxy_timeout")]
    pub timeout: u32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_true")]
    pub auto_rotate: bool,
    #[serde(default = "default_true")]
    pub stream_enabled: bool,
    #[serde(default = "default_schedule_mode")]
    pub schedule_mode: String,
    #[serde(default = "default_max_wait")]
    pub max_wait_time: u32,
}

/// 完整配置面。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySettings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub proxy: ProxySettings,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            api_key: String::new(),
            auth_enabled: false,
            lan_access: false,
            autostart: true,
        }
    }
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_PROXY_TIMEOUT_SECS,
            max_retries: 3,
            auto_rotate: true,
            stream_enabled: true,
            schedule_mode: DEFAULT_SCHEDULE_MODE.to_string(),
            max_wait_time: DEFAULT_MAX_WAIT_SECS,
        }
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            proxy: ProxySettings::default(),
        }
    }
}

impl GatewaySettings {
    /// 出厂默认值（config.json 不存在时写入），含新生成的 API Key。
    pub fn factory_default() -> Self {
        let mut s = Self::default();
        s.server.api_key = generate_api_key();
        s
    }
}

/// 生成随机 API Key（sk- 前缀 + 48 个十六进制字符）。
pub fn generate_api_key() -> String {
    let a = uuid::Uuid::new_v4().simple().to_string();
    let b = uuid::Uuid::new_v4().simple().to_string();
    format!("sk-{}", &format!("{a}{b}")[..48])
}

/// 配置存储：内存快照 + config.json。
#[derive(Debug)]
pub struct SettingsStore {
    file_path: PathBuf,
    current: ArcSwap<GatewaySettings>,
}

impl SettingsStore {
    pub fn new(data_dir: &str) -> Self {
        Self {
            file_path: PathBuf::from(data_dir).join("config.json"),
            current: ArcSwap::from_pointee(GatewaySettings::factory_default()),
        }
    }

    /// 加载 config.json；文件不存在时落盘出厂默认值。
    pub async fn load(&self) -> anyhow::Result<()> {
        ensure_parent_dir(&self.file_path).await?;

        let data = match tokio::fs::read(&self.file_path).await {
            Ok(v) => v,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return self.save().await;
            }
            Err(e) => return Err(e).context("读取 config.json 失败"),
        };

        let settings: GatewaySettings =
            sonic_rs::from_slice(&data).context("解析 config.json 失败")?;
        self.current.store(Arc::new(settings));
        Ok(())
    }

    /// 当前配置快照。
    pub fn get(&self) -> Arc<GatewaySettings> {
        self.current.load_full()
    }

    /// 整体替换并落盘。
    pub async fn update(&self, settings: GatewaySettings) -> anyhow::Result<()> {
        self.current.store(Arc::new(settings));
        self.save().await
    }

    async fn save(&self) -> anyhow::Result<()> {
        ensure_parent_dir(&self.file_path).await?;
        let snapshot = self.get();
        let data =
            sonic_rs::to_vec_pretty(snapshot.as_ref()).context("序列化 config.json 失败")?;
        tokio::fs::write(&self.file_path, data)
            .await
            .context("写入 config.json 失败")
    }
}

async fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    tokio::fs::create_dir_all(dir)
        .await
        .context("创建数据目录失败")
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_proxy_timeout() -> u32 {
    DEFAULT_PROXY_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    3
}

fn default_schedule_mode() -> String {
    DEFAULT_SCHEDULE_MODE.to_string()
}

fn default_max_wait() -> u32 {
    DEFAULT_MAX_WAIT_SECS
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_default_values() {
        let s = GatewaySettings::factory_default();
        assert_eq!(s.server.port, 8045);
        assert_eq!(s.proxy.timeout, 120);
        assert_eq!(s.proxy.schedule_mode, "balance");
        assert_eq!(s.proxy.max_wait_time, 60);
        assert!(s.server.api_key.starts_with("sk-"));
        assert_eq!(s.server.api_key.len(), 51);
    }

    #[test]
    fn test_generated_api_keys_are_distinct() {
        assert_ne!(generate_api_key(), generate_api_key());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: GatewaySettings =
            sonic_rs::from_str(r#"{"server":{"port":9000},"proxy":{}}"#).unwrap();
        assert_eq!(s.server.port, 9000);
        assert_eq!(s.server.log_level, "info");
        assert_eq!(s.proxy.schedule_mode, "balance");
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let dir = std::env::temp_dir()
            .join(format!("aigw-admin-test-{}", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned();

        let store = SettingsStore::new(&dir);
        let mut settings = GatewaySettings::factory_default();
        settings.server.port = 9100;
        settings.proxy.schedule_mode = "priority".to_string();
        store.update(settings).await.unwrap();

        let reloaded = SettingsStore::new(&dir);
        reloaded.load().await.unwrap();
        let s = reloaded.get();
        assert_eq!(s.server.port, 9100);
        assert_eq!(s.proxy.schedule_mode, "priority");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
