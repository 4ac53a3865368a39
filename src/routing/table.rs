//! 有序路由表与单条规则的匹配语义。

use serde::{Deserialize, Serialize};

/// 单条路由规则：入站模型名 pattern → 上游模型名 target。
///
/// pattern 最多支持一个尾随 `*`（字面前缀匹配，大小写敏感），
/// 不支持行首/行中通配；target 是不透明的上游模型标识，从不参与匹配。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    pub pattern: String,
    pub target: String,
}

impl RouteRule {
    pub fn new(pattern: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            target: target.into(),
        }
    }

    /// 是否匹配给定模型名。
    ///
    /// 空 pattern 与裸 `*` 都匹配一切模型名——操作员可以合法地
    /// 在表尾放一条 catch-all，这里不做特殊处理也不拒绝。
    pub fn matches(&self, model: &str) -> bool {
        if self.pattern.is_empty() {
            return true;
        }
        match self.pattern.strip_suffix('*') {
            Some(prefix) => model.starts_with(prefix),
            None => self.pattern == model,
        }
    }

    /// 持久化时是否保留。pattern 或 target 为空的规则在保存阶段
    /// 静默丢弃，但不从内存中的编辑状态移除。
    pub fn is_persistable(&self) -> bool {
        !self.pattern.trim().is_empty() && !self.target.trim().is_empty()
    }
}

/// 有序路由表。
///
/// 允许重复 pattern；解析严格按插入顺序取首条匹配，
/// 不做任何「更具体优先」的排序。
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 解析入站模型名，返回首条匹配规则的 target。
    ///
    /// 无匹配返回 None——这是正常结果，不是错误；
    /// 是否回退为原始模型名（passthrough-on-no-match）是调用方的策略，
    /// 不在解析器内部实现。
    pub fn resolve(&self, model: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(model))
            .map(|rule| rule.target.as_str())
    }

    /// 在表尾追加一条规则。
    pub fn add(&mut self, pattern: impl Into<String>, target: impl Into<String>) {
        self.rules.push(RouteRule::new(pattern, target));
    }

    /// 删除指定下标的规则；下标越界返回 false。
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.rules.len() {
            return false;
        }
        self.rules.remove(index);
        true
    }

    /// 整表替换。
    pub fn replace_all(&mut self, rules: Vec<RouteRule>) {
        self.rules = rules;
    }

    /// 用预设映射整表替换（丢弃全部现有规则，不做合并）。
    pub fn apply_preset(&mut self, preset: &[(&str, &str)]) {
        self.rules = preset
            .iter()
            .map(|(pattern, target)| RouteRule::new(*pattern, *target))
            .collect();
    }

    /// 保存用快照：剔除不可持久化的规则，内存状态不变。
    pub fn persistable_rules(&self) -> Vec<RouteRule> {
        self.rules
            .iter()
            .filter(|r| r.is_persistable())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::preset;

    fn table(rules: &[(&str, &str)]) -> RouteTable {
        let mut t = RouteTable::new();
        for (pattern, target) in rules {
            t.add(*pattern, *target);
        }
        t
    }

    #[test]
    fn test_first_match_wins_over_exact_match() {
        // 精确匹配排在后面也不会赢：优先级只看插入顺序。
        let t = table(&[("gpt-4*", "A"), ("gpt-4", "B")]);
        assert_eq!(t.resolve("gpt-4"), Some("A"));
    }

    #[test]
    fn test_empty_table_yields_no_match() {
        let t = RouteTable::new();
        assert!(t.is_empty());
        assert_eq!(t.resolve("claude-3-opus"), None);
    }

    #[test]
    fn test_exact_match_is_case_sensitive() {
        let t = table(&[("gpt-4", "A")]);
        assert_eq!(t.resolve("gpt-4"), Some("A"));
        assert_eq!(t.resolve("GPT-4"), None);
        assert_eq!(t.resolve("gpt-4o"), None);
    }

    #[test]
    fn test_wildcard_suffix_matches_prefix_only() {
        let t = table(&[("claude-haiku-*", "lite")]);
        assert_eq!(t.resolve("claude-haiku-20240307"), Some("lite"));
        assert_eq!(t.resolve("claude-haiku"), None);
        assert_eq!(t.resolve("claude-opus-haiku"), None);
    }

    #[test]
    fn test_catch_all_patterns() {
        let t = table(&[("gpt-4", "A"), ("*", "fallback")]);
        assert_eq!(t.resolve("anything-else"), Some("fallback"));
        assert_eq!(t.resolve("gpt-4"), Some("A"));

        let t = table(&[("", "everything")]);
        assert_eq!(t.resolve("whatever"), Some("everything"));
    }

    #[test]
    fn test_duplicate_patterns_keep_first() {
        let t = table(&[("m-*", "first"), ("m-*", "second")]);
        assert_eq!(t.resolve("m-1"), Some("first"));
    }

    #[test]
    fn test_remove_at_bounds() {
        let mut t = table(&[("a", "1"), ("b", "2")]);
        assert!(!t.remove_at(2));
        assert!(t.remove_at(0));
        assert_eq!(t.resolve("b"), Some("2"));
        assert_eq!(t.resolve("a"), None);
    }

    #[test]
    fn test_apply_preset_discards_existing_rules() {
        let mut t = table(&[("old-*", "gone")]);
        t.apply_preset(preset::PRESET_ROUTES);
        assert_eq!(t.len(), preset::PRESET_ROUTES.len());
        assert_eq!(t.resolve("old-model"), None);
        assert_eq!(t.resolve("gpt-4o-mini"), Some("gemini-3-flash"));
        // gpt-4o* 在 gpt-4* 之前声明，顺序保证它可达。
        assert_eq!(t.resolve("gpt-4-turbo"), Some("gemini-3-pro-high"));
    }

    #[test]
    fn test_persistable_rules_drop_empty_fields_only_at_save() {
        let mut t = table(&[("keep-*", "yes"), ("", ""), ("no-target", "")]);
        let saved = t.persistable_rules();
        assert_eq!(saved, vec![RouteRule::new("keep-*", "yes")]);
        // 内存中的编辑状态不受影响。
        assert_eq!(t.len(), 3);
        assert!(t.remove_at(1));
    }
}
