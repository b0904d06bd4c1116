/// 长度前缀占用的像素数。
/// 每个像素承载一个字节，`u32` 长度需要 4 个像素。
pub const LENGTH_PREFIX_PIXELS: usize = 4;

/// 每个像素的通道数 (alpha, red, green, blue)。
pub const CHANNELS_PER_PIXEL: usize = 4;

/// 每个字节的位数。
pub const BITS_PER_BYTE: usize = 8;

/// 通道最低有效位 (bit 0) 的掩码。
pub const LSB_MASK: u8 = 0b01;

/// 通道次低有效位 (bit 1) 的掩码。
pub const SECOND_LSB_MASK: u8 = 0b10;

/// 嵌入过程可能改动的全部通道位。其余位必须保持不变。
pub const PAYLOAD_BITS_MASK: u8 = LSB_MASK | SECOND_LSB_MASK;
