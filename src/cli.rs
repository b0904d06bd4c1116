//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 参数数量不符或子命令未知时，`clap` 打印用法说明且不执行任何操作。

use crate::pixel::BitLayout;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// 基于 LSB (最低有效位) 隐写术的命令行工具，将任意二进制载荷嵌入无损图像 (如 PNG, BMP) 的像素中，或从中恢复。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "基于 LSB (最低有效位) 隐写术的命令行工具。载荷以 4 字节长度前缀开头，每个像素承载一个字节。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：embed (嵌入)、extract (提取) 和 inspect (查看)。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 将载荷文件嵌入图像，输出新的图像文件。
    Embed(EmbedArgs),

    /// 从经过隐写的图像中提取载荷。
    Extract(ExtractArgs),

    /// 显示图像尺寸、容量以及长度前缀。
    Inspect(InspectArgs),
}

/// 'embed' 命令所需的参数。
#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// 输入图像文件路径。
    pub image: PathBuf,

    /// 要嵌入的载荷文件路径。
    pub payload: PathBuf,

    /// 输出图像路径，格式由扩展名决定 (png, bmp, tiff, webp, qoi)。
    pub output: PathBuf,

    /// 载荷位在像素通道中的布局。
    #[arg(short, long, value_enum, default_value_t = BitLayout::Split)]
    pub layout: BitLayout,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'extract' 命令所需的参数。
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// 已嵌入载荷的图像文件路径。
    pub image: PathBuf,

    /// 恢复出的载荷的保存路径。
    pub output: PathBuf,

    /// 载荷位在像素通道中的布局，必须与嵌入时一致。
    #[arg(short, long, value_enum, default_value_t = BitLayout::Split)]
    pub layout: BitLayout,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'inspect' 命令所需的参数。
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// 要查看的图像文件路径。
    pub image: PathBuf,

    /// 解读长度前缀所用的布局。
    #[arg(short, long, value_enum, default_value_t = BitLayout::Split)]
    pub layout: BitLayout,
}
