//! 管理 API 模块。
//!
//! 提供 WebUI 所需的控制面接口：
//! - 账号管理与批量导入
//! - 路由表编辑、预设与解析
//! - 网关设置存取

pub mod handler;

pub use handler::*;
