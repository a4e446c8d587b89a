//! # 工具模块
//!
//! 这个模块包含各种工具函数和实用程序：
//!
//! - URL 规范化（去重键生成）
//! - URL 校验
//!
//! # 模块组织
//!
//! - `url` - URL 规范化、校验等工具函数

pub mod url;

// Re-export commonly used items for convenience
pub use url::{normalize_url, validate_url};
