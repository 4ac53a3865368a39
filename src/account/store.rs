//! 账号持久化：data 目录下的 accounts.json，整文件替换式写入。

use crate::account::types::{Account, AccountExport, AccountInput, AccountType, Status};
use anyhow::{Context, anyhow};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

#[derive(Debug)]
pub struct Store {
    file_path: PathBuf,
    state: RwLock<Vec<Account>>,
}

impl Store {
    pub fn new(data_dir: &str) -> Self {
        Self {
            file_path: PathBuf::from(data_dir).join("accounts.json"),
            state: RwLock::new(Vec::new()),
        }
    }

    /// 加载 accounts.json；文件不存在视为空账号列表。
    pub async fn load(&self) -> anyhow::Result<()> {
        ensure_parent_dir(&self.file_path).await?;

        let data = match tokio::fs::read(&self.file_path).await {
            Ok(v) => v,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.state.write().await.clear();
                return Ok(());
            }
            Err(e) => return Err(e).context("读取 accounts.json 失败"),
        };

        let accounts: Vec<Account> = match sonic_rs::from_slice(&data) {
            Ok(v) => v,
            Err(e) => {
                self.state.write().await.clear();
                return Err(anyhow!(e)).context("解析 accounts.json 失败");
            }
        };

        *self.state.write().await = accounts;
        Ok(())
    }

    pub async fn get_all(&self) -> Vec<Account> {
        self.state.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.state.read().await.len()
    }

    /// 新增账号。refresh_token 与现有账号重复时原地替换
    /// （保留原始 id 与 created_at），不产生重复条目。
    pub async fn add(&self, input: AccountInput) -> anyhow::Result<Account> {
        let token = input.refresh_token.trim();
        if token.is_empty() {
            return Err(anyhow!("refresh_token 为空"));
        }

        let now = Utc::now();
        let mut account = Account {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            refresh_token: token.to_string(),
            status: Status::Unknown,
            account_type: input.account_type,
            quota_used: 0,
            quota_limit: 0,
            created_at: now,
            updated_at: now,
        };

        let snapshot = {
            let mut state = self.state.write().await;
            let mut replaced = false;
            for existing in state.iter_mut() {
                if existing.refresh_token == account.refresh_token {
                    // 保留原始 id 与 created_at
                    account.id = existing.id.clone();
                    account.created_at = existing.created_at;
                    *existing = account.clone();
                    replaced = true;
                    break;
                }
            }
            if !replaced {
                state.push(account.clone());
            }
            state.clone()
        };

        self.save_snapshot(&snapshot).await?;
        Ok(account)
    }

    /// 按 id 删除；返回是否找到了对应账号。
    pub async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let snapshot = {
            let mut state = self.state.write().await;
            let before = state.len();
            state.retain(|a| a.id != id);
            if state.len() == before {
                return Ok(false);
            }
            state.clone()
        };
        self.save_snapshot(&snapshot).await?;
        Ok(true)
    }

    /// 批量导入：每个 token 创建一个账号，逐条统计成功/失败。
    /// token 的有效性不在这里校验——那是账号检测接口的职责。
    pub async fn import_tokens(
        &self,
        tokens: &[String],
        account_type: AccountType,
    ) -> (usize, usize) {
        let base = Utc::now().timestamp_millis();
        let mut imported = 0usize;
        let mut failed = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let input = AccountInput {
                name: format!("Account {base}-{i}"),
                email: String::new(),
                refresh_token: token.clone(),
                account_type,
            };
            match self.add(input).await {
                Ok(_) => imported += 1,
                Err(e) => {
                    tracing::warn!("导入账号失败: {e:#}");
                    failed += 1;
                }
            }
        }

        (imported, failed)
    }

    pub async fn export(&self) -> Vec<AccountExport> {
        let state = self.state.read().await;
        state
            .iter()
            .map(|a| AccountExport {
                name: a.name.clone(),
                email: a.email.clone(),
                refresh_token: a.refresh_token.clone(),
                account_type: a.account_type,
            })
            .collect()
    }

    async fn save_snapshot(&self, accounts: &[Account]) -> anyhow::Result<()> {
        ensure_parent_dir(&self.file_path).await?;
        let data = sonic_rs::to_vec_pretty(accounts).context("序列化 accounts.json 失败")?;
        tokio::fs::write(&self.file_path, data)
            .await
            .context("写入 accounts.json 失败")
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
