//! # 位编解码模块
//!
//! 单个载荷字节与单个像素四个通道值之间的纯函数转换，与图像解码无关。

use crate::constants::BITS_PER_BYTE;
use crate::pixel::{BitLayout, Pixel};

/// 按 `condition` 置位或清除 `mask` 指定的位，其余位保持不变。
pub fn set_bit(value: u8, mask: u8, condition: bool) -> u8 {
    if condition { value | mask } else { value & !mask }
}

/// 将 `byte` 的 8 个位写入 `pixel` 的四个通道，返回新像素。
///
/// 每个位只改写 [`BitLayout::slot`] 给出的那一位 (读-改-写)，
/// 通道的其余位与原像素逐位相同。
pub fn embed_byte(pixel: Pixel, byte: u8, layout: BitLayout) -> Pixel {
    let mut channels = pixel.channels();

    for bit in 0..BITS_PER_BYTE {
        let (channel, mask) = layout.slot(bit);
        channels[channel] = set_bit(channels[channel], mask, (byte >> bit) & 1 == 1);
    }

    Pixel::from_channels(channels)
}

/// 从 `pixel` 中按 `layout` 读回一个字节。不会修改像素。
pub fn extract_byte(pixel: Pixel, layout: BitLayout) -> u8 {
    let channels = pixel.channels();

    (0..BITS_PER_BYTE).fold(0u8, |byte, bit| {
        let (channel, mask) = layout.slot(bit);
        set_bit(byte, 1 << bit, channels[channel] & mask == mask)
    })
}
