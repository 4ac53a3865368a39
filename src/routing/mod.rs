//! 模型别名路由：入站模型名 → 上游模型名的规则表。
//!
//! 规则按插入顺序存储，解析时首条匹配生效（first-match-wins），
//! 顺序在 load / edit / save 之间必须原样保留。

pub mod preset;
pub mod store;
pub mod table;

pub use store::RouteStore;
pub use table::{RouteRule, RouteTable};
