//! 隐写库的错误类型。

use std::io;
use thiserror::Error;

/// 隐写操作的结果类型。
pub type Result<T> = std::result::Result<T, StegoError>;

/// 嵌入与提取过程中可能出现的致命错误。
///
/// 容量不足导致的截断不是错误，它以 [`crate::pipeline::Warning`] 的形式报告。
#[derive(Error, Debug)]
pub enum StegoError {
    /// 图像像素数不足以容纳 4 字节长度前缀。
    #[error("Image has {pixels} pixel(s), at least 4 are needed for the length prefix")]
    ImageTooSmall { pixels: usize },

    /// 载荷流读取失败，或在声明的长度之前结束。
    #[error("Failed to read payload byte {position}: {source}")]
    PayloadRead {
        position: u64,
        #[source]
        source: io::Error,
    },

    /// 提取结果写入输出时失败。
    #[error("Failed to write recovered payload: {0}")]
    SinkWrite(#[source] io::Error),
}
