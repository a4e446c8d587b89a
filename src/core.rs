//! 核心错误类型
//!
//! 本库只有一种可恢复错误：`InvalidUrl`，仅由 URL 校验器产生。
//! 其余操作都是全函数，畸形输入产生空值/缺失值而不是错误。

use thiserror::Error;

/// 故事后处理错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedProcError {
    /// 无效 URL：规范化后仍不是带 scheme 和 host 的绝对 URL
    #[error("无效的URL: {0}")]
    InvalidUrl(String),
}

/// 本库统一的 Result 类型
pub type Result<T> = std::result::Result<T, FeedProcError>;
