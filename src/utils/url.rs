//! URL 规范化与校验
//!
//! 订阅源里的链接质量参差不齐：scheme 被二次编码、host 和路径之间缺少
//! 分隔符、整条 URL 里嵌着另一条 URL、反斜杠当路径分隔符用……
//! 规范化的目标不是严格的 RFC 3986 合规，而是尽力修复，让同一资源的
//! 各种畸形写法收敛到同一个规范字符串（作为去重键使用）。
//!
//! 规范化实现为一组有序的修复规则管道，每条规则在前一条的输出上运行。
//! 规则顺序即优先级契约（重复 scheme 折叠先于缺失分隔符修复，
//! 缺失分隔符修复先于默认端口裁剪），由一致性测试固定。

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::debug;
use url::Url;

use crate::core::{FeedProcError, Result};

/// 路径/查询部分需要补编码的字符：只编码破坏良构性的字符，
/// 已有的 %XX 序列不会被二次编码（'%' 不在集合内）
const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// 不透明 scheme：剩余部分不拆分为 host/path，原样返回
const OPAQUE_SCHEMES: &[&str] = &["urn:", "magnet:"];

/// 缺失分隔符修复的触发后缀（经验列表，以一致性测试为准）
const REPAIR_SUFFIXES: &[&str] = &[".com", ".net", ".org", ".edu", ".gov"];

/// 把任意字符串规范化为规范 URL 形式
///
/// 空输入返回空字符串；不透明 scheme（`urn:`、`magnet:`）原样返回；
/// 不像 URL 的纯文本（没有 scheme、首个斜杠前没有点号）原样返回。
/// 相对引用在提供 `base_url` 时解析为绝对 URL，否则原样返回。
///
/// 此函数从不失败，最坏情况返回（修剪过的）输入本身。
pub fn normalize_url(raw: &str, base_url: Option<&str>) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if is_opaque(trimmed) || has_opaque_form(trimmed) {
        return trimmed.to_string();
    }

    let mut url = decode_separators(trimmed);
    url = url.replace('\\', "/");
    url = infer_scheme(url);

    if has_scheme(&url) {
        url = collapse_duplicate_scheme(url);
        url = repair_missing_separator(url);
        url = normalize_hierarchical(url);
        encode_unsafe(url)
    } else if let Some(base) = base_url {
        resolve_against_base(&url, base)
    } else {
        // 既不是绝对 URL 也没有 base，原样返回
        trimmed.to_string()
    }
}

/// 校验并返回规范 URL
///
/// 先走规范化管道，再要求结果能解析为带非空 host 的绝对 URL。
/// 成功时返回规范化产出的同一字符串，校验本身从不改写它。
/// 不透明 scheme 始终视为有效。
pub fn validate_url(raw: &str) -> Result<String> {
    let norm = normalize_url(raw, None);
    if is_opaque(&norm) {
        return Ok(norm);
    }
    match Url::parse(&norm) {
        Ok(parsed) if parsed.has_host() => Ok(norm),
        _ => Err(FeedProcError::InvalidUrl(raw.to_string())),
    }
}

/// 前缀匹配（忽略 ASCII 大小写，容忍多字节字符边界）
fn has_prefix_ci(url: &str, prefix: &str) -> bool {
    url.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn is_opaque(url: &str) -> bool {
    OPAQUE_SCHEMES.iter().any(|s| has_prefix_ci(url, s))
}

/// 非层级形式：`mailto:`、`tel:`、`data:`、`tag:` 等 `scheme:` 开头
/// 但没有 `//` 的输入。修复规则只对层级 URL 有意义，这类输入原样放行。
///
/// scheme 里不允许 '.'，这样 `example.com:8080` 不会被误判成 scheme。
fn has_opaque_form(url: &str) -> bool {
    let Some(pos) = url.find(':') else {
        return false;
    };
    if url[pos..].starts_with("://") {
        return false;
    }
    let scheme = &url[..pos];
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-'))
}

/// 解码被二次编码的结构分隔符：`%3A//` 还原为 `://`，
/// `%5C` 还原为反斜杠（随后和字面反斜杠一样折叠为 `/`）
fn decode_separators(url: &str) -> String {
    let mut s = url.replace("%3A//", "://").replace("%3a//", "://");
    if s.contains("%5C") || s.contains("%5c") {
        s = s.replace("%5C", "\\").replace("%5c", "\\");
    }
    s
}

/// 拆出 `scheme://rest`；scheme 必须是合法 token，否则视为无 scheme
fn split_scheme(url: &str) -> Option<(&str, &str)> {
    let pos = url.find("://")?;
    let scheme = &url[..pos];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    Some((scheme, &url[pos + 3..]))
}

fn has_scheme(url: &str) -> bool {
    split_scheme(url).is_some()
}

/// scheme 推断：`://host` 补上 `http`；没有 scheme 但看起来像 host
/// （首个斜杠前有点号）的输入前缀上 `http://`
fn infer_scheme(url: String) -> String {
    if let Some(rest) = url.strip_prefix("://") {
        return format!("http://{rest}");
    }
    if has_scheme(&url) {
        return url;
    }
    if looks_like_host(&url) {
        debug!(url = %url, "scheme-less host-like url, assuming http");
        return format!("http://{url}");
    }
    url
}

/// 首个 `/`、`?`、`#` 之前含有点号、且是无空白的纯 ASCII，视为 host
fn looks_like_host(url: &str) -> bool {
    let head = url.split(['/', '?', '#']).next().unwrap_or(url);
    !head.is_empty()
        && head.is_ascii()
        && head.contains('.')
        && !head.contains(char::is_whitespace)
}

/// 重复 scheme 折叠：字符串靠后的位置又嵌了一条绝对 URL
/// （常见的畸形订阅源产物），丢弃它之前的所有内容
fn collapse_duplicate_scheme(url: String) -> String {
    let mut last: Option<usize> = None;
    for pat in ["http://", "https://"] {
        if let Some(i) = url.rfind(pat) {
            if i > 0 {
                last = Some(last.map_or(i, |p| p.max(i)));
            }
        }
    }
    match last {
        Some(i) => {
            debug!(url = %url, "collapsing duplicate embedded scheme");
            url[i..].to_string()
        }
        None => url,
    }
}

/// 缺失分隔符修复：`example.comblog` 这种 host 和路径粘连的写法，
/// 在已知后缀之后补一个 `/`。后缀后面紧跟 `.`、`:`（端口）或
/// 字符串结尾时不触发。
fn repair_missing_separator(url: String) -> String {
    let Some((scheme, rest)) = split_scheme(&url) else {
        return url;
    };
    let auth_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(auth_end);
    for suffix in REPAIR_SUFFIXES {
        if let Some(i) = authority.find(suffix) {
            let host_end = i + suffix.len();
            let extra = &authority[host_end..];
            if !extra.is_empty() && !extra.starts_with('.') && !extra.starts_with(':') {
                debug!(url = %url, "inserting missing host/path separator");
                let host = &authority[..host_end];
                return format!("{scheme}://{host}/{extra}{tail}");
            }
        }
    }
    url
}

/// 层级 URL 的结构清理：scheme 小写、默认端口裁剪、路径内连续斜杠折叠
fn normalize_hierarchical(url: String) -> String {
    let Some((scheme, rest)) = split_scheme(&url) else {
        return url;
    };
    let scheme = scheme.to_ascii_lowercase();

    let auth_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (mut authority, tail) = rest.split_at(auth_end);

    // 默认端口只对匹配的 scheme 裁剪
    let default_port = match scheme.as_str() {
        "http" => ":80",
        "https" => ":443",
        _ => "",
    };
    if !default_port.is_empty() {
        authority = authority.strip_suffix(default_port).unwrap_or(authority);
    }

    let (path, suffix) = match tail.find(['?', '#']) {
        Some(i) => tail.split_at(i),
        None => (tail, ""),
    };
    let path = collapse_slashes(path);

    format!("{scheme}://{authority}{path}{suffix}")
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev = '\0';
    for c in path.chars() {
        if c == '/' && prev == '/' {
            continue;
        }
        out.push(c);
        prev = c;
    }
    out
}

/// 对路径和查询部分补编码空格等不安全字符；
/// 已有的 %XX 序列（包括多字节 UTF-8 编码的非 ASCII 路径）保持原样
fn encode_unsafe(url: String) -> String {
    let Some((scheme, rest)) = split_scheme(&url) else {
        return url;
    };
    match rest.find('/') {
        Some(i) => {
            let (authority, tail) = rest.split_at(i);
            let encoded = utf8_percent_encode(tail, PATH_ENCODE_SET);
            format!("{scheme}://{authority}{encoded}")
        }
        None => url,
    }
}

/// 相对引用解析：绝对路径整体替换 base 的路径，
/// 相对路径在 base 的目录下拼接。base 解析失败时原样返回输入。
fn resolve_against_base(input: &str, base: &str) -> String {
    match Url::parse(base).and_then(|b| b.join(input)) {
        Ok(joined) => joined.to_string(),
        Err(_) => input.to_string(),
    }
}
