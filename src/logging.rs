//! 日志等级：DEBUG=off/low/medium/high 控制控制面自身日志详细程度。

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl LogLevel {
    pub fn parse(debug: &str) -> Self {
        match debug.trim().to_lowercase().as_str() {
            "low" | "info" => Self::Low,
            "medium" | "debug" => Self::Medium,
            "high" | "all" | "trace" => Self::High,
            _ => Self::Off,
        }
    }

    /// 对应的 tracing EnvFilter 指令（仅作用于本 crate 的 target）。
    pub fn directive(self) -> &'static str {
        match self {
            Self::Off => "warn",
            Self::Low => "info",
            Self::Medium => "debug",
            Self::High => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_aliases_and_defaults_to_off() {
        assert_eq!(LogLevel::parse("low"), LogLevel::Low);
        assert_eq!(LogLevel::parse("INFO"), LogLevel::Low);
        assert_eq!(LogLevel::parse("  medium "), LogLevel::Medium);
        assert_eq!(LogLevel::parse("trace"), LogLevel::High);
        assert_eq!(LogLevel::parse(""), LogLevel::Off);
        assert_eq!(LogLevel::parse("nonsense"), LogLevel::Off);
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(LogLevel::Off < LogLevel::Low);
        assert!(LogLevel::Low < LogLevel::Medium);
        assert!(LogLevel::Medium < LogLevel::High);
    }
}
