//! # pixel_stow 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：像素通道模型、位编解码、帧布局，
//! 以及组合它们的嵌入与提取流水线。

// 声明库包含的所有模块。

pub mod cli;
pub mod constants;
pub mod error;
pub mod frame;
pub mod handler;
pub mod pipeline;
pub mod pixel;
pub mod steganography;

pub use error::{Result, StegoError};
pub use pipeline::{
    Embedded, ExtractReport, FrameInfo, Warning, embed, embed_bytes, extract, extract_bytes,
    inspect,
};
pub use pixel::{BitLayout, Pixel};
