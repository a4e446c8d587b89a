//! HTML解析和处理模块
//!
//! 这个模块按职责拆分为多个子模块：
//!
//! - `dom`: 基础DOM操作（容错解析、文档序遍历、属性读取）
//! - `redirect`: 客户端重定向页探测
//! - `attachment`: 嵌入媒体（iframe / audio）提取

pub mod attachment;
pub mod dom;
pub mod redirect;

// 重新导出主要的公共 API
pub use attachment::{story_extract_attach, StoryAttach};
pub use dom::{find_nodes, get_node_attr, get_node_name, html_to_dom, text_content};
pub use redirect::get_html_redirect_url;
