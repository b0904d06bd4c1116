//! # 嵌入与提取流水线
//!
//! 组合帧布局与位编解码：嵌入时先写长度前缀，再从像素 4 开始逐字节写入载荷；
//! 提取时先读长度前缀，再读回最多 `length` 个字节。
//!
//! 图像容量不足时两个方向都会截断，截断以 [`Warning`] 的形式随结果返回，
//! 而不是错误。

use crate::constants::LENGTH_PREFIX_PIXELS;
use crate::error::{Result, StegoError};
use crate::frame::{capacity, embed_at, extract_at, pixel_count, read_length, write_length};
use crate::pixel::BitLayout;
use image::RgbaImage;
use log::{debug, warn};
use std::fmt;
use std::io::{Read, Write};

/// 非致命的处理结果提示。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// 载荷超出图像容量，只嵌入了前 `embedded` 个字节。
    /// 长度前缀仍记录原始大小。
    PayloadTruncated { payload_len: u64, embedded: usize },

    /// 载荷大小超过 `u32` 范围，长度前缀只记录了其低 32 位。
    LengthPrefixWrapped { payload_len: u64, recorded: u32 },

    /// 声明的长度超过图像剩余像素，只恢复了 `recovered` 个字节。
    DeclaredLengthExceedsImage { declared: u32, recovered: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::PayloadTruncated {
                payload_len,
                embedded,
            } => write!(
                f,
                "The payload ({payload_len} bytes) exceeds the image capacity, only {embedded} bytes were embedded"
            ),
            Warning::LengthPrefixWrapped {
                payload_len,
                recorded,
            } => write!(
                f,
                "The payload size {payload_len} does not fit in 32 bits, the length prefix records {recorded}"
            ),
            Warning::DeclaredLengthExceedsImage {
                declared,
                recovered,
            } => write!(
                f,
                "The declared length ({declared} bytes) exceeds the image, only {recovered} bytes were recovered"
            ),
        }
    }
}

/// 嵌入结果：一张完整的新图像及其统计。
#[derive(Debug, Clone)]
pub struct Embedded {
    pub image: RgbaImage,
    /// 写入长度前缀的值。
    pub declared_len: u32,
    /// 实际嵌入的载荷字节数。
    pub embedded: usize,
    pub warnings: Vec<Warning>,
}

/// 提取结果的统计。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    /// 长度前缀中声明的载荷字节数。
    pub declared_len: u32,
    /// 实际恢复的字节数。
    pub recovered: usize,
    pub warnings: Vec<Warning>,
}

/// 图像中帧的概况。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub width: u32,
    pub height: u32,
    pub pixels: usize,
    /// 可嵌入的载荷字节数。
    pub capacity: usize,
    /// 按给定布局解读出的长度前缀。
    pub declared_len: u32,
}

/// 将长度为 `payload_len` 的载荷流嵌入 `source` 的副本。
///
/// 载荷按顺序逐字节读取，每个字节占用一个像素，从线性下标 4 开始。
/// 超出容量的部分不会被读取，结果中附带 [`Warning::PayloadTruncated`]。
/// 未写入的像素与 `source` 完全相同。
///
/// # Errors
///
/// * 图像少于 4 个像素：[`StegoError::ImageTooSmall`]。
/// * 载荷流读取失败或提前结束：[`StegoError::PayloadRead`]。此时不产生任何输出。
pub fn embed<R: Read>(
    source: &RgbaImage,
    mut payload: R,
    payload_len: u64,
    layout: BitLayout,
) -> Result<Embedded> {
    let mut image = source.clone();
    let mut warnings = Vec::new();

    let declared_len = payload_len as u32;
    if u64::from(declared_len) != payload_len {
        warnings.push(Warning::LengthPrefixWrapped {
            payload_len,
            recorded: declared_len,
        });
    }

    write_length(&mut image, declared_len, layout)?;

    let available = capacity(&image);
    let embedded = usize::try_from(payload_len).map_or(available, |len| len.min(available));
    debug!(
        "embedding {embedded} of {payload_len} payload bytes into {}x{} pixels ({layout:?})",
        image.width(),
        image.height()
    );

    let mut buf = [0u8; 1];
    for offset in 0..embedded {
        payload
            .read_exact(&mut buf)
            .map_err(|source| StegoError::PayloadRead {
                position: offset as u64,
                source,
            })?;
        embed_at(&mut image, LENGTH_PREFIX_PIXELS + offset, buf[0], layout);
    }

    if (embedded as u64) < payload_len {
        warn!("payload truncated: {embedded} of {payload_len} bytes embedded");
        warnings.push(Warning::PayloadTruncated {
            payload_len,
            embedded,
        });
    }

    Ok(Embedded {
        image,
        declared_len,
        embedded,
        warnings,
    })
}

/// [`embed`] 的内存版本。
pub fn embed_bytes(source: &RgbaImage, payload: &[u8], layout: BitLayout) -> Result<Embedded> {
    embed(source, payload, payload.len() as u64, layout)
}

/// 从 `image` 读回载荷。
///
/// 返回 `min(declared, capacity)` 个字节；声明的长度超出图像时附带
/// [`Warning::DeclaredLengthExceedsImage`]。不会修改图像。
///
/// # Errors
///
/// 图像少于 4 个像素时返回 [`StegoError::ImageTooSmall`]。
pub fn extract_bytes(image: &RgbaImage, layout: BitLayout) -> Result<(Vec<u8>, ExtractReport)> {
    let declared_len = read_length(image, layout)?;
    let end_pos = pixel_count(image);
    let stop = end_pos.min(LENGTH_PREFIX_PIXELS.saturating_add(declared_len as usize));
    debug!("declared payload length {declared_len}, image holds {end_pos} pixels ({layout:?})");

    let payload: Vec<u8> = (LENGTH_PREFIX_PIXELS..stop)
        .map(|pos| extract_at(image, pos, layout))
        .collect();

    let mut warnings = Vec::new();
    if payload.len() < declared_len as usize {
        warn!(
            "declared length {declared_len} exceeds the image, recovered {} bytes",
            payload.len()
        );
        warnings.push(Warning::DeclaredLengthExceedsImage {
            declared: declared_len,
            recovered: payload.len(),
        });
    }

    let report = ExtractReport {
        declared_len,
        recovered: payload.len(),
        warnings,
    };
    Ok((payload, report))
}

/// 从 `image` 读回载荷并按顺序写入 `sink`。
///
/// # Errors
///
/// * 图像少于 4 个像素：[`StegoError::ImageTooSmall`]。
/// * 写入 `sink` 失败：[`StegoError::SinkWrite`]。
pub fn extract<W: Write>(image: &RgbaImage, mut sink: W, layout: BitLayout) -> Result<ExtractReport> {
    let (payload, report) = extract_bytes(image, layout)?;
    sink.write_all(&payload).map_err(StegoError::SinkWrite)?;
    sink.flush().map_err(StegoError::SinkWrite)?;
    Ok(report)
}

/// 汇总图像尺寸、容量与长度前缀。
pub fn inspect(image: &RgbaImage, layout: BitLayout) -> Result<FrameInfo> {
    Ok(FrameInfo {
        width: image.width(),
        height: image.height(),
        pixels: pixel_count(image),
        capacity: capacity(image),
        declared_len: read_length(image, layout)?,
    })
}
