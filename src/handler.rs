//! # 命令处理逻辑模块
//!
//! 包含处理 `embed`、`extract` 和 `inspect` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、图像解码与编码、调用嵌入/提取流水线以及向用户报告结果。
//!
//! 所有输出先写入目标目录下的临时文件，只有整个操作成功后才提交到目标路径。

use crate::cli::{EmbedArgs, ExtractArgs, InspectArgs};
use crate::pipeline::{Warning, embed, extract, inspect};
use anyhow::{Context, Result};
use colored::Colorize;
use image::{ImageFormat, RgbaImage};
use log::debug;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// 处理 'Embed' 命令的执行逻辑。
///
/// 读取图像与载荷，将长度前缀和载荷嵌入图像副本，再按输出扩展名编码保存。
/// 载荷超出图像容量时只打印警告并截断。
///
/// # Arguments
///
/// * `args` - 包含输入图像、载荷、输出路径以及位布局的 `EmbedArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误，且不会产生输出文件：
/// * 输出文件已存在且未指定 `--force`。
/// * 输出扩展名不是受支持的图像格式。
/// * 无法读取或解码输入图像，或无法打开载荷文件。
/// * 图像不足 4 个像素，或载荷读取中途失败。
/// * 无法写入目标图像文件。
pub fn handle_embed(args: EmbedArgs) -> Result<()> {
    ensure_writable(&args.output, args.force)?;

    let format = ImageFormat::from_path(&args.output).with_context(|| {
        format!(
            "Unsupported output image format: {}",
            args.output.to_string_lossy().red().bold()
        )
    })?;

    let cover = load_image(&args.image)?;

    let payload = File::open(&args.payload).with_context(|| {
        format!(
            "Unable to open payload file: {}",
            args.payload.to_string_lossy().red().bold()
        )
    })?;
    let payload_len = payload
        .metadata()
        .with_context(|| {
            format!(
                "Unable to obtain payload length: {}",
                args.payload.to_string_lossy().red().bold()
            )
        })?
        .len();

    let embedded = embed(&cover, BufReader::new(payload), payload_len, args.layout)
        .with_context(|| {
            format!(
                "Failed to embed '{}' into '{}'.",
                args.payload.to_string_lossy().red().bold(),
                args.image.to_string_lossy().red().bold()
            )
        })?;
    report_warnings(&embedded.warnings);

    write_atomically(&args.output, args.force, |writer| {
        embedded
            .image
            .write_to(writer, format)
            .context("Failed to encode the output image")
    })?;

    println!(
        "{} of {} payload bytes have been embedded and saved: {}",
        embedded.embedded.to_string().green(),
        payload_len.to_string().green(),
        args.output.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Extract' 命令的执行逻辑。
///
/// 读取图像中的长度前缀，再读回对应数量的载荷字节并写入输出文件。
/// 声明的长度超出图像时只打印警告，输出实际恢复的部分。
///
/// # Arguments
///
/// * `args` - 包含输入图像、输出路径以及位布局的 `ExtractArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误，且不会产生输出文件：
/// * 输出文件已存在且未指定 `--force`。
/// * 无法读取或解码输入图像。
/// * 图像不足 4 个像素。
/// * 无法写入目标文件。
pub fn handle_extract(args: ExtractArgs) -> Result<()> {
    ensure_writable(&args.output, args.force)?;

    let picture = load_image(&args.image)?;

    let report = write_atomically(&args.output, args.force, |writer| {
        extract(&picture, writer, args.layout).with_context(|| {
            format!(
                "Failed to extract a payload from '{}'. \nThe image may not contain a hidden payload or is too small.",
                args.image.to_string_lossy().red().bold()
            )
        })
    })?;
    report_warnings(&report.warnings);

    println!(
        "{} of {} declared bytes have been recovered and saved: {}",
        report.recovered.to_string().green(),
        report.declared_len.to_string().green(),
        args.output.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Inspect' 命令的执行逻辑。
///
/// 打印图像尺寸、像素数、可嵌入容量以及按给定布局解读出的长度前缀。
///
/// # Arguments
///
/// * `args` - 包含图像路径以及位布局的 `InspectArgs` 结构体。
///
/// # Errors
///
/// 无法读取或解码图像，或图像不足 4 个像素时返回错误。
pub fn handle_inspect(args: InspectArgs) -> Result<()> {
    let picture = load_image(&args.image)?;
    let info = inspect(&picture, args.layout).with_context(|| {
        format!(
            "Failed to read the length prefix of '{}'.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    println!("Image:           {}", args.image.to_string_lossy().bold());
    println!("Dimensions:      {}x{}", info.width, info.height);
    println!("Pixels:          {}", info.pixels);
    println!("Capacity:        {} bytes", info.capacity.to_string().green());

    let declared = info.declared_len.to_string();
    if info.declared_len as usize > info.capacity {
        println!("Declared length: {} bytes (exceeds capacity)", declared.yellow());
    } else {
        println!("Declared length: {} bytes", declared.green());
    }

    Ok(())
}

/// 读取并解码图像，统一转换为 8 位 RGBA 像素。
fn load_image(path: &Path) -> Result<RgbaImage> {
    let picture = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    debug!("decoded {} as {:?}", path.display(), picture.color());
    Ok(picture.to_rgba8())
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 在 `dest` 所在目录创建临时文件，交给 `write` 写入，成功后才重命名为 `dest`。
///
/// 任何一步失败时临时文件随 `NamedTempFile` 一起被删除，`dest` 不受影响。
fn write_atomically<T, F>(dest: &Path, force: bool, write: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<T>,
{
    let dir = dest
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut staged = NamedTempFile::new_in(dir).with_context(|| {
        format!(
            "Unable to create a temporary file in: {}",
            dir.to_string_lossy().red().bold()
        )
    })?;

    let value = {
        let mut writer = BufWriter::new(staged.as_file_mut());
        let value = write(&mut writer)?;
        writer.flush().with_context(|| {
            format!(
                "Unable to write to target file: {}",
                dest.to_string_lossy().red().bold()
            )
        })?;
        value
    };

    let committed = if force {
        staged.persist(dest)
    } else {
        staged.persist_noclobber(dest)
    };
    committed.map_err(|err| err.error).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;
    debug!("committed {}", dest.display());

    Ok(value)
}

fn report_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("{} {}", "Warning:".yellow().bold(), warning);
    }
}
