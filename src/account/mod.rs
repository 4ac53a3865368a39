//! 账号存储：上游凭证及其配额/用量分类标签。

pub mod store;
pub mod types;
