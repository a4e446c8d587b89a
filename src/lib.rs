//! # Feedproc Library
//!
//! 订阅源故事后处理工具库：URL 规范化、HTML 重定向页探测与嵌入媒体提取。
//!
//! 订阅源内容是不可信的，链接经常是畸形的。本库把任意字符串修复为唯一的
//! 规范 URL 形式（在管道的其它部分作为去重键使用），并从任意畸形的 HTML
//! 中定位两类结构信号：客户端重定向目标、嵌入媒体（iframe / audio）地址。
//!
//! ## 模块组织
//!
//! - `core` - 错误类型
//! - `utils` - URL 规范化与校验
//! - `parsers` - HTML 解析（DOM 操作、重定向探测、附件提取）
//!
//! 所有操作都是纯函数：无共享状态、无 I/O、无网络访问，可以在任意线程
//! 并发调用。每次调用构建的解析树在返回时即释放。

pub mod core;
pub mod parsers;
pub mod utils;

// Re-export commonly used items for convenience
pub use crate::core::*;
pub use crate::parsers::*;
pub use crate::utils::*;
