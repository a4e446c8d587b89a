//! 故事附件（嵌入媒体）提取
//!
//! 从故事正文 HTML 里定位两类嵌入媒体：iframe 类嵌入（视频播放器等）
//! 和 audio 元素。两次扫描相互独立，各自按文档顺序取第一个命中，
//! 保证结果确定、可复现。畸形 HTML 从不报错，最坏情况所有字段缺失。

use markup5ever_rcdom::Handle;

use super::dom::{find_nodes, get_node_attr, html_to_dom};
use crate::utils::url::normalize_url;

/// iframe 类嵌入标签（常见视频嵌入写法）
const IFRAME_NAMES: &[&str] = &["iframe", "embed"];

/// 故事附件记录
///
/// 每个字段要么是规范化后的 URL，要么缺失；一次提取各自最多填充一个。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoryAttach {
    /// 第一个 iframe 类嵌入的地址
    pub iframe_url: Option<String>,
    /// 第一个 audio 元素的音频地址
    pub audio_url: Option<String>,
}

/// 从故事 HTML 提取嵌入媒体附件
///
/// 找到的地址在提供 `base_url` 时经规范化管道解析为绝对 URL。
pub fn story_extract_attach(html: &str, base_url: Option<&str>) -> StoryAttach {
    let dom = html_to_dom(html.as_bytes(), "utf-8".to_string());
    let iframe_url = find_iframe_src(&dom.document).map(|src| normalize_url(&src, base_url));
    let audio_url = find_audio_src(&dom.document).map(|src| normalize_url(&src, base_url));
    StoryAttach {
        iframe_url,
        audio_url,
    }
}

fn find_iframe_src(document: &Handle) -> Option<String> {
    find_nodes(document, IFRAME_NAMES)
        .iter()
        .find_map(|node| non_empty_attr(node, "src"))
}

/// audio 元素自带 src 属性优先；否则取其内嵌的第一个带 src 的 source 子元素
fn find_audio_src(document: &Handle) -> Option<String> {
    for audio_node in find_nodes(document, &["audio"]) {
        if let Some(src) = non_empty_attr(&audio_node, "src") {
            return Some(src);
        }
        if let Some(src) = find_nodes(&audio_node, &["source"])
            .iter()
            .find_map(|node| non_empty_attr(node, "src"))
        {
            return Some(src);
        }
    }
    None
}

fn non_empty_attr(node: &Handle, attr_name: &str) -> Option<String> {
    get_node_attr(node, attr_name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
