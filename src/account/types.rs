use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quota::{self, QuotaReading};

/// 账号的配额/用量分类（订阅档位）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Free,
    Pro,
    Ultra,
}

/// 账号状态。生命周期流转（检测/封禁/过期）由网关服务端负责，
/// 控制面只存储并展示当前值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Expired,
    Banned,
    #[default]
    Unknown,
}

/// 一个上游凭证账号（accounts.json 中的持久化形态）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub email: String,
    pub refresh_token: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub quota_used: i64,
    #[serde(default)]
    pub quota_limit: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 创建账号的入参。
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInput {
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub refresh_token: String,
    #[serde(default)]
    pub account_type: AccountType,
}

/// 列表响应视图：绝不暴露 refresh_token。
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    pub status: Status,
    pub account_type: AccountType,
    pub quota_used: i64,
    pub quota_limit: i64,
    /// 派生的展示标签；配额未知时为 null，前端必须渲染
    /// 「无配额数据」而不是伪造的 0%。
    pub quota: Option<QuotaReading>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountView {
    pub fn from_account(acc: &Account) -> Self {
        Self {
            id: acc.id.clone(),
            name: acc.name.clone(),
            email: acc.email.clone(),
            status: acc.status,
            account_type: acc.account_type,
            quota_used: acc.quota_used,
            quota_limit: acc.quota_limit,
            quota: quota::classify(acc.quota_used, acc.quota_limit),
            created_at: acc.created_at,
            updated_at: acc.updated_at,
        }
    }
}

/// 导出条目（accounts.json 备份/迁移用，含 refresh_token）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountExport {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub email: String,
    pub refresh_token: String,
    pub account_type: AccountType,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quota::QuotaTier;

    fn sample(quota_used: i64, quota_limit: i64) -> Account {
        let now = Utc::now();
        Account {
            id: "a-1".to_string(),
            name: "acc".to_string(),
            email: String::new(),
            refresh_token: "1//secret".to_string(),
            status: Status::Active,
            account_type: AccountType::Pro,
            quota_used,
            quota_limit,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_view_carries_quota_tag() {
        let view = AccountView::from_account(&sample(70, 100));
        let quota = view.quota.unwrap();
        assert_eq!(quota.percentage, 30);
        assert_eq!(quota.tier, QuotaTier::Medium);
    }

    #[test]
    fn test_view_quota_unknown_without_limit() {
        let view = AccountView::from_account(&sample(0, 0));
        assert!(view.quota.is_none());
    }

    #[test]
    fn test_view_never_serializes_refresh_token() {
        let view = AccountView::from_account(&sample(0, 100));
        let json = sonic_rs::to_string(&view).unwrap();
        assert!(!json.contains("1//secret"));
        assert!(!json.contains("refresh_token"));
    }
}
