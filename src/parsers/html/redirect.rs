//! HTML 重定向页探测
//!
//! 有些订阅源条目指向的不是正文，而是一个客户端重定向页：
//! 真正的内容在 meta refresh 或脚本跳转指向的另一个 URL。
//! 本模块按优先级扫描两类重定向信号：
//!
//! 1. `<meta http-equiv="refresh" content="N; url=...">`
//! 2. 脚本里的最小 location 赋值模式（`location.href = "..."` 等）
//!
//! 找不到信号返回 `None`，对调用者来说"不是重定向页"是正常结果而非错误。

use markup5ever_rcdom::Handle;
use tracing::debug;

use super::dom::{find_nodes, get_node_attr, html_to_dom, text_content};
use crate::utils::url::normalize_url;

/// 探测 HTML 是否为客户端重定向页，是则返回解析后的目标 URL
///
/// meta refresh 优先于脚本跳转；同类信号按文档顺序取第一个命中。
/// 目标 URL 会经规范化管道对 `base_url` 解析。
pub fn get_html_redirect_url(html: &str, base_url: &str) -> Option<String> {
    let dom = html_to_dom(html.as_bytes(), "utf-8".to_string());
    let target =
        find_meta_refresh(&dom.document).or_else(|| find_script_redirect(&dom.document))?;
    debug!(target = %target, "html redirect signal found");
    Some(normalize_url(&target, Some(base_url)))
}

fn find_meta_refresh(document: &Handle) -> Option<String> {
    for meta_node in find_nodes(document, &["meta"]) {
        if !get_node_attr(&meta_node, "http-equiv")
            .unwrap_or_default()
            .trim()
            .eq_ignore_ascii_case("refresh")
        {
            continue;
        }
        if let Some(content) = get_node_attr(&meta_node, "content") {
            if let Some(target) = parse_refresh_content(&content) {
                return Some(target);
            }
        }
    }
    None
}

/// 解析 refresh content 值，如 `0; url=/x`、`3; URL='/x'`
fn parse_refresh_content(content: &str) -> Option<String> {
    for part in content.split(';') {
        let part = part.trim();
        let Some(eq) = part.find('=') else {
            continue;
        };
        let (key, value) = part.split_at(eq);
        if !key.trim().eq_ignore_ascii_case("url") {
            continue;
        }
        let target = value[1..]
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .trim();
        if !target.is_empty() {
            return Some(target.to_string());
        }
    }
    None
}

fn find_script_redirect(document: &Handle) -> Option<String> {
    for script_node in find_nodes(document, &["script"]) {
        let code = text_content(&script_node);
        if let Some(target) = scan_location_assignment(&code) {
            return Some(target);
        }
    }
    None
}

/// 在脚本文本里扫描最小的 location 重赋值模式：
/// `location = "..."`、`location.href = "..."`、
/// `location.replace("...")`、`location.assign("...")`，
/// 前面可以带 `window.` / `document.` 前缀，单双引号均可。
fn scan_location_assignment(code: &str) -> Option<String> {
    let mut rest = code;
    while let Some(i) = rest.find("location") {
        let after = &rest[i + "location".len()..];
        let mut s = after.trim_start();
        if let Some(tail) = s.strip_prefix(".href") {
            s = tail.trim_start();
        }
        let target = if let Some(tail) = s.strip_prefix('=') {
            // 排除 `==` 比较
            if tail.starts_with('=') {
                None
            } else {
                read_quoted(tail)
            }
        } else if let Some(tail) = s
            .strip_prefix(".replace(")
            .or_else(|| s.strip_prefix(".assign("))
        {
            read_quoted(tail)
        } else {
            None
        };
        if target.is_some() {
            return target;
        }
        rest = after;
    }
    None
}

fn read_quoted(s: &str) -> Option<String> {
    let s = s.trim_start();
    let quote = s.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let body = &s[1..];
    let end = body.find(quote)?;
    let target = &body[..end];
    if target.is_empty() {
        None
    } else {
        Some(target.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_refresh_content() {
        assert_eq!(
            parse_refresh_content("0; url=/html-redirect/"),
            Some("/html-redirect/".to_string())
        );
        assert_eq!(
            parse_refresh_content("3;URL='/html-redirect/'"),
            Some("/html-redirect/".to_string())
        );
        assert_eq!(
            parse_refresh_content("0; url=\"https://example.com/x\""),
            Some("https://example.com/x".to_string())
        );
        // 只有延迟没有 url 不算重定向
        assert_eq!(parse_refresh_content("30"), None);
        assert_eq!(parse_refresh_content("0; url="), None);
    }

    #[test]
    fn test_scan_location_assignment() {
        let cases = [
            ("location.href = \"/next\";", "/next"),
            ("window.location = '/next';", "/next"),
            ("window.location.href='/next'", "/next"),
            ("document.location.replace(\"/next\")", "/next"),
            ("location.assign('/next');", "/next"),
        ];
        for (code, expect) in cases {
            assert_eq!(
                scan_location_assignment(code).as_deref(),
                Some(expect),
                "code={code:?}"
            );
        }
        // 比较表达式不是跳转
        assert_eq!(scan_location_assignment("if (location.href == 'x') {}"), None);
        assert_eq!(scan_location_assignment("var x = 1;"), None);
    }

    #[test]
    fn test_meta_refresh_priority_over_script() {
        let html = "<html><head>\
            <script>location.href = \"/from-script\";</script>\
            <meta http-equiv=\"refresh\" content=\"0; url=/from-meta\">\
            </head></html>";
        let got = get_html_redirect_url(html, "https://blog.example.com");
        assert_eq!(got.as_deref(), Some("https://blog.example.com/from-meta"));
    }

    #[test]
    fn test_no_redirect_signal() {
        let html = "<html><body><p>正文内容</p></body></html>";
        assert_eq!(get_html_redirect_url(html, "https://blog.example.com"), None);
        assert_eq!(get_html_redirect_url("", "https://blog.example.com"), None);
        assert_eq!(
            get_html_redirect_url("<div>Unclosed", "https://blog.example.com"),
            None
        );
    }
}
