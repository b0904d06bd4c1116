//! # 像素通道模型
//!
//! 定义像素的四个 8 位通道的排列顺序，以及一个载荷字节的 8 个位
//! 分别落在哪个通道的哪一位上。嵌入与提取必须使用同一套映射。

use crate::constants::{BITS_PER_BYTE, CHANNELS_PER_PIXEL, LSB_MASK, SECOND_LSB_MASK};
use clap::ValueEnum;
use image::Rgba;

/// 一个像素的四个通道，按位映射所用的顺序 (alpha, red, green, blue) 排列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Pixel {
    pub const fn new(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self {
            alpha,
            red,
            green,
            blue,
        }
    }

    /// 以 `[alpha, red, green, blue]` 顺序返回通道值。
    pub const fn channels(&self) -> [u8; CHANNELS_PER_PIXEL] {
        [self.alpha, self.red, self.green, self.blue]
    }

    pub const fn from_channels([alpha, red, green, blue]: [u8; CHANNELS_PER_PIXEL]) -> Self {
        Self::new(alpha, red, green, blue)
    }
}

impl From<Rgba<u8>> for Pixel {
    fn from(Rgba([red, green, blue, alpha]): Rgba<u8>) -> Self {
        Self::new(alpha, red, green, blue)
    }
}

impl From<Pixel> for Rgba<u8> {
    fn from(pixel: Pixel) -> Self {
        Rgba([pixel.red, pixel.green, pixel.blue, pixel.alpha])
    }
}

/// 载荷字节在像素通道中的位布局。
///
/// 两种布局都让每个通道承载 2 位，但位的分配方式不同，彼此不兼容：
/// 提取时必须使用嵌入时的布局。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BitLayout {
    /// 位 `i` 写入通道 `i % 4`；位 0-3 占用次低位 (`0b10`)，位 4-7 占用最低位 (`0b01`)。
    #[default]
    Split,

    /// 通道 `k` 依次承载位 `2k` (最低位) 与 `2k + 1` (次低位)。
    Packed,
}

impl BitLayout {
    /// 返回字节第 `bit` 位对应的 (通道下标, 通道内掩码)。
    ///
    /// 通道下标基于 [`Pixel::channels`] 的顺序。
    ///
    /// # Panics
    ///
    /// `bit` 不小于 8 时 panic。
    pub const fn slot(self, bit: usize) -> (usize, u8) {
        assert!(bit < BITS_PER_BYTE, "bit index out of range for a byte");
        match self {
            BitLayout::Split => {
                let mask = if bit < CHANNELS_PER_PIXEL {
                    SECOND_LSB_MASK
                } else {
                    LSB_MASK
                };
                (bit % CHANNELS_PER_PIXEL, mask)
            }
            BitLayout::Packed => {
                let mask = if bit % 2 == 0 { LSB_MASK } else { SECOND_LSB_MASK };
                (bit / 2, mask)
            }
        }
    }
}
