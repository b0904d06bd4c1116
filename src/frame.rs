//! # 帧布局模块
//!
//! 帧 = 4 字节小端长度前缀 + `length` 个载荷字节，每个像素承载一个字节。
//! 像素按行优先的线性下标 `pos = y * width + x` 遍历。

use crate::constants::LENGTH_PREFIX_PIXELS;
use crate::error::{Result, StegoError};
use crate::pixel::{BitLayout, Pixel};
use crate::steganography::{embed_byte, extract_byte};
use image::RgbaImage;

/// 图像的像素总数。
pub fn pixel_count(image: &RgbaImage) -> usize {
    image.width() as usize * image.height() as usize
}

/// 图像除长度前缀外可容纳的载荷字节数。
pub fn capacity(image: &RgbaImage) -> usize {
    pixel_count(image).saturating_sub(LENGTH_PREFIX_PIXELS)
}

/// 将线性下标换算为 `(x, y)` 坐标。
pub fn coordinates(image: &RgbaImage, pos: usize) -> (u32, u32) {
    let width = image.width() as usize;
    ((pos % width) as u32, (pos / width) as u32)
}

/// 读取线性下标 `pos` 处的像素。
///
/// # Panics
///
/// `pos` 不小于 [`pixel_count`] 时 panic。
pub fn pixel_at(image: &RgbaImage, pos: usize) -> Pixel {
    let (x, y) = coordinates(image, pos);
    Pixel::from(*image.get_pixel(x, y))
}

/// 覆盖线性下标 `pos` 处的像素。
///
/// # Panics
///
/// `pos` 不小于 [`pixel_count`] 时 panic。
pub fn put_pixel_at(image: &mut RgbaImage, pos: usize, pixel: Pixel) {
    let (x, y) = coordinates(image, pos);
    image.put_pixel(x, y, pixel.into());
}

/// 将 `byte` 嵌入线性下标 `pos` 处的像素。
///
/// # Panics
///
/// `pos` 不小于 [`pixel_count`] 时 panic。
pub fn embed_at(image: &mut RgbaImage, pos: usize, byte: u8, layout: BitLayout) {
    let pixel = pixel_at(image, pos);
    put_pixel_at(image, pos, embed_byte(pixel, byte, layout));
}

/// 读取线性下标 `pos` 处像素承载的字节。
///
/// # Panics
///
/// `pos` 不小于 [`pixel_count`] 时 panic。
pub fn extract_at(image: &RgbaImage, pos: usize, layout: BitLayout) -> u8 {
    extract_byte(pixel_at(image, pos), layout)
}

fn ensure_prefix_fits(image: &RgbaImage) -> Result<()> {
    let pixels = pixel_count(image);
    if pixels < LENGTH_PREFIX_PIXELS {
        return Err(StegoError::ImageTooSmall { pixels });
    }
    Ok(())
}

/// 将 `length` 按小端字节序写入像素 0..4，字节 `k` 写入像素 `k`。
///
/// # Errors
///
/// 图像少于 4 个像素时返回 [`StegoError::ImageTooSmall`]。
pub fn write_length(image: &mut RgbaImage, length: u32, layout: BitLayout) -> Result<()> {
    ensure_prefix_fits(image)?;

    for (pos, byte) in length.to_le_bytes().into_iter().enumerate() {
        embed_at(image, pos, byte, layout);
    }

    Ok(())
}

/// 从像素 0..4 读回小端长度前缀，即声明的载荷字节数。
///
/// # Errors
///
/// 图像少于 4 个像素时返回 [`StegoError::ImageTooSmall`]。
pub fn read_length(image: &RgbaImage, layout: BitLayout) -> Result<u32> {
    ensure_prefix_fits(image)?;

    let length = (0..LENGTH_PREFIX_PIXELS).fold(0u32, |length, pos| {
        length | (u32::from(extract_at(image, pos, layout)) << (pos * 8))
    });

    Ok(length)
}
