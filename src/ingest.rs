//! 批量凭证导入解析：把操作员粘贴的自由文本解析为去重后的 refresh token 列表。
//!
//! 三种策略按序尝试，先命中者生效（结果不跨策略合并）：
//! 1. JSON 数组：元素为裸字符串，或携带 refresh_token 字段的对象
//! 2. 签名扫描：`1//` 开头的 OAuth refresh token
//! 3. 按行切分：trim 后长度 > 10 的行
//!
//! 解析器不做任何网络请求，也不校验 token 是否有效——
//! 有效性由账号检测接口负责。

use serde::Deserialize;
use serde::de::IgnoredAny;

/// 行回退策略的最短长度：trim 后不超过该长度的行被丢弃。
const MIN_LINE_LEN: usize = 10;

/// 上游 OAuth refresh token 的固定前缀。
const TOKEN_SIGNATURE: &str = "1//";

/// JSON 数组元素的两种合法形态；其余形态静默跳过。
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenEntry {
    Bare(String),
    WithField { refresh_token: String },
    Other(IgnoredAny),
}

/// 解析粘贴文本，返回去重后的 token 列表（保留首次出现的顺序）。
///
/// 任何输入都不会报错：没有识别出 token 时返回空列表，
/// 由调用方提示「没有可导入的内容」。
pub fn parse_token_input(text: &str) -> Vec<String> {
    let tokens = parse_json_array(text).unwrap_or_else(|| {
        let scanned = scan_signature_tokens(text);
        if scanned.is_empty() {
            split_long_lines(text)
        } else {
            scanned
        }
    });

    dedup_preserving_order(tokens)
}

/// 策略 1：JSON 数组。
///
/// 非 JSON 或非数组返回 None（落入下一策略）；
/// 数组解析成功但没有合法元素时返回空列表，不再落入后续策略。
fn parse_json_array(text: &str) -> Option<Vec<String>> {
    let entries: Vec<TokenEntry> = sonic_rs::from_str(text).ok()?;

    Some(
        entries
            .into_iter()
            .filter_map(|entry| match entry {
                TokenEntry::Bare(token) => Some(token),
                TokenEntry::WithField { refresh_token } => Some(refresh_token),
                TokenEntry::Other(_) => None,
            })
            .collect(),
    )
}

fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// 策略 2：扫描所有 `1//xxxx` 形态的子串（不重叠，按出现顺序）。
fn scan_signature_tokens(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let sig = TOKEN_SIGNATURE.as_bytes();
    let mut out = Vec::new();

    let mut i = 0;
    while i + sig.len() <= bytes.len() {
        if &bytes[i..i + sig.len()] != sig {
            i += 1;
            continue;
        }

        let mut end = i + sig.len();
        while end < bytes.len() && is_token_char(bytes[end]) {
            end += 1;
        }

        // 前缀后至少要有一个 token 字符才算命中。
        if end > i + sig.len() {
            out.push(text[i..end].to_string());
            i = end;
        } else {
            i += 1;
        }
    }

    out
}

/// 策略 3：按行切分，保留 trim 后长度超过 MIN_LINE_LEN 的行。
fn split_long_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.len() > MIN_LINE_LEN)
        .map(str::to_string)
        .collect()
}

/// 精确去重，首次出现的位置保留。
fn dedup_preserving_order(tokens: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(tokens.len());
    tokens.into_iter().filter(|t| seen.insert(t.clone())).collect()
}
