//! # 解析器模块
//!
//! 这个模块包含 HTML 解析相关的功能：
//!
//! - `html` - HTML 文档解析、重定向探测、附件提取

pub mod html;

// Re-export commonly used items for convenience
pub use html::*;
