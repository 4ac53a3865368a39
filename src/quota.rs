//! 配额分类：把 (used, limit) 映射为剩余百分比与三档严重度。
//!
//! 结果只用于 WebUI 展示标签，永远不落库。

use serde::Serialize;

/// 剩余配额档位，驱动前端的严重度配色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotaTier {
    High,
    Medium,
    Low,
}

/// 一次配额分类结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaReading {
    /// 剩余百分比，[0, 100]。
    pub percentage: u8,
    pub tier: QuotaTier,
}

/// 分类 (used, limit) 配额对。
///
/// limit 缺失/为零/为负时返回 None（「无配额数据」，与 0% 是两种状态）。
/// used 允许超过 limit，剩余量截断为 0，不会出现负百分比。
/// 档位边界 30 / 60 归属上档：30% 是 medium，60% 是 high。
pub fn classify(used: i64, limit: i64) -> Option<QuotaReading> {
    if limit <= 0 {
        return None;
    }

    let remaining = (limit - used).max(0);
    let percentage = ((remaining as f64 / limit as f64) * 100.0).round() as u8;

    let tier = if percentage < 30 {
        QuotaTier::Low
    } else if percentage < 60 {
        QuotaTier::Medium
    } else {
        QuotaTier::High
    };

    Some(QuotaReading { percentage, tier })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_when_limit_missing_or_invalid() {
        assert_eq!(classify(0, 0), None);
        assert_eq!(classify(50, 0), None);
        assert_eq!(classify(50, -1), None);
    }

    #[test]
    fn test_tier_boundaries_belong_to_upper_tier() {
        // 30% 恰好落在 medium，29% 才是 low。
        let r = classify(70, 100).unwrap();
        assert_eq!(r.percentage, 30);
        assert_eq!(r.tier, QuotaTier::Medium);

        let r = classify(71, 100).unwrap();
        assert_eq!(r.percentage, 29);
        assert_eq!(r.tier, QuotaTier::Low);

        // 60% 恰好落在 high。
        let r = classify(40, 100).unwrap();
        assert_eq!(r.percentage, 60);
        assert_eq!(r.tier, QuotaTier::High);

        let r = classify(41, 100).unwrap();
        assert_eq!(r.percentage, 59);
        assert_eq!(r.tier, QuotaTier::Medium);
    }

    #[test]
    fn test_overused_clamps_to_zero() {
        let r = classify(150, 100).unwrap();
        assert_eq!(r.percentage, 0);
        assert_eq!(r.tier, QuotaTier::Low);
    }

    #[test]
    fn test_unused_is_full() {
        let r = classify(0, 100).unwrap();
        assert_eq!(r.percentage, 100);
        assert_eq!(r.tier, QuotaTier::High);
    }

    #[test]
    fn test_percentage_rounds_to_nearest() {
        // 剩余 1/3 → 33%，剩余 2/3 → 67%。
        assert_eq!(classify(2, 3).unwrap().percentage, 33);
        assert_eq!(classify(1, 3).unwrap().percentage, 67);
    }
}
