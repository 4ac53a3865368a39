//! 路由表持久化：data 目录下的 routes.json。
//!
//! 存储格式是显式有序的 (pattern, target) 列表，而不是 pattern→target
//! 的无序映射：first-match-wins 依赖插入顺序在落盘/加载之间原样保留。
//! 保存是整表替换，不做增量写入。

use crate::routing::preset;
use crate::routing::table::{RouteRule, RouteTable};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

#[derive(Debug)]
pub struct RouteStore {
    file_path: PathBuf,
    table: RwLock<RouteTable>,
}

impl RouteStore {
    pub fn new(data_dir: &str) -> Self {
        Self {
            file_path: PathBuf::from(data_dir).join("routes.json"),
            table: RwLock::new(RouteTable::new()),
        }
    }

    /// 加载 routes.json；文件不存在时落盘出厂默认路由。
    pub async fn load(&self) -> anyhow::Result<()> {
        ensure_parent_dir(&self.file_path).await?;

        let data = match tokio::fs::read(&self.file_path).await {
            Ok(v) => v,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                {
                    let mut table = self.table.write().await;
                    table.apply_preset(preset::DEFAULT_ROUTES);
                }
                return self.save().await;
            }
            Err(e) => return Err(e).context("读取 routes.json 失败"),
        };

        let rules: Vec<RouteRule> =
            sonic_rs::from_slice(&data).context("解析 routes.json 失败")?;

        let mut table = self.table.write().await;
        table.replace_all(rules);
        Ok(())
    }

    /// 全量保存当前规则。pattern/target 为空的规则在这里被静默丢弃，
    /// 内存中的编辑状态保持不变。
    pub async fn save(&self) -> anyhow::Result<()> {
        let snapshot = {
            let table = self.table.read().await;
            table.persistable_rules()
        };
        self.save_snapshot(&snapshot).await
    }

    /// 按存储顺序返回全部规则。
    pub async fn rules(&self) -> Vec<RouteRule> {
        let table = self.table.read().await;
        table.rules().to_vec()
    }

    /// 解析入站模型名；无匹配返回 None。
    pub async fn resolve(&self, model: &str) -> Option<String> {
        let table = self.table.read().await;
        table.resolve(model).map(str::to_string)
    }

    /// 整表替换并落盘。写锁内一次性换掉整个规则向量，
    /// 读者不会观察到半套规则。
    pub async fn replace_all(&self, rules: Vec<RouteRule>) -> anyhow::Result<()> {
        {
            let mut table = self.table.write().await;
            table.replace_all(rules);
        }
        self.save().await
    }

    /// 应用内置预设（整表替换）并落盘，返回替换后的规则。
    pub async fn apply_preset(&self) -> anyhow::Result<Vec<RouteRule>> {
        let snapshot = {
            let mut table = self.table.write().await;
            table.apply_preset(preset::PRESET_ROUTES);
            table.rules().to_vec()
        };
        self.save().await?;
        Ok(snapshot)
    }

    async fn save_snapshot(&self, rules: &[RouteRule]) -> anyhow::Result<()> {
        ensure_parent_dir(&self.file_path).await?;
        let data = sonic_rs::to_vec_pretty(rules).context("序列化 routes.json 失败")?;
        tokio::fs::write(&self.file_path, data)
            .await
            .context("写入 routes.json 失败")
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

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_data_dir() -> String {
        std::env::temp_dir()
            .join(format!("aigw-admin-test-{}", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned()
    }

    #[tokio::test]
    async fn test_load_seeds_default_routes_when_file_missing() {
        let dir = temp_data_dir();
        let store = RouteStore::new(&dir);
        store.load().await.unwrap();

        let rules = store.rules().await;
        assert_eq!(rules.len(), preset::DEFAULT_ROUTES.len());
        assert_eq!(
            store.resolve("gpt-4o-mini").await.as_deref(),
            Some("gemini-3-flash")
        );

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_save_load_round_trip_preserves_order() {
        let dir = temp_data_dir();
        let store = RouteStore::new(&dir);

        store
            .replace_all(vec![
                RouteRule::new("gpt-4*", "A"),
                RouteRule::new("gpt-4", "B"),
                RouteRule::new("", "dropped-at-save"),
            ])
            .await
            .unwrap();

        let reloaded = RouteStore::new(&dir);
        reloaded.load().await.unwrap();

        let rules = reloaded.rules().await;
        assert_eq!(
            rules,
            vec![RouteRule::new("gpt-4*", "A"), RouteRule::new("gpt-4", "B")]
        );
        // 顺序存活：精确规则仍然排在通配之后。
        assert_eq!(reloaded.resolve("gpt-4").await.as_deref(), Some("A"));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_apply_preset_replaces_and_persists() {
        let dir = temp_data_dir();
        let store = RouteStore::new(&dir);
        store
            .replace_all(vec![RouteRule::new("old-*", "gone")])
            .await
            .unwrap();

        let rules = store.apply_preset().await.unwrap();
        assert_eq!(rules.len(), preset::PRESET_ROUTES.len());
        assert_eq!(store.resolve("old-model").await, None);

        let reloaded = RouteStore::new(&dir);
        reloaded.load().await.unwrap();
        assert_eq!(reloaded.rules().await.len(), preset::PRESET_ROUTES.len());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
