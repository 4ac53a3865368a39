//! 随程序发布的静态路由配置。
//!
//! 列表顺序即路由表的插入顺序：更具体的 pattern 必须排在
//! 它的前缀通配之前（例如 gpt-4o* 在 gpt-4* 之前），否则永远不会命中。

/// WebUI「应用预设」对应的整表替换映射。
pub const PRESET_ROUTES: &[(&str, &str)] = &[
    ("claude-haiku-*", "gemini-2.5-flash-lite"),
    ("claude-3-haiku-*", "gemini-2.5-flash-lite"),
    ("claude-3-5-sonnet-*", "claude-sonnet-4-5"),
    ("claude-3-opus-*", "claude-opus-4-5-thinking"),
    ("gpt-4o*", "gemini-3-flash"),
    ("gpt-4*", "gemini-3-pro-high"),
    ("gpt-3.5*", "gemini-2.5-flash"),
    ("o1-*", "gemini-3-pro-high"),
];

/// routes.json 不存在时写入的出厂默认路由。
pub const DEFAULT_ROUTES: &[(&str, &str)] = &[
    ("gpt-4o*", "gemini-3-flash"),
    ("gpt-4*", "gemini-3-pro-high"),
    ("gpt-3.5*", "gemini-2.5-flash"),
    ("o1-*", "gemini-3-pro-high"),
    ("o3-*", "gemini-3-pro-high"),
    ("claude-3-haiku-*", "gemini-2.5-flash-lite"),
    ("claude-haiku-*", "gemini-2.5-flash-lite"),
    ("claude-3-5-sonnet-*", "claude-sonnet-4-5"),
    ("claude-3-opus-*", "claude-opus-4-5-thinking"),
    ("claude-opus-4-*", "claude-opus-4-5-thinking"),
];
