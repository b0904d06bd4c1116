use clap::Parser;
use image::{ImageBuffer, Rgba};
use pixel_stow::{
    BitLayout,
    cli::{Cli, Commands, EmbedArgs, ExtractArgs, InspectArgs},
    handler::{handle_embed, handle_extract, handle_inspect},
};
use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(4))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgba([chunk[0], chunk[1], chunk[2], chunk[3]]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

fn random_payload(len: usize) -> Vec<u8> {
    let mut payload = vec![0u8; len];
    rand::rng().fill_bytes(&mut payload);
    payload
}

fn embed_args(image: &Path, payload: &Path, output: &Path, force: bool) -> EmbedArgs {
    EmbedArgs {
        image: image.to_path_buf(),
        payload: payload.to_path_buf(),
        output: output.to_path_buf(),
        layout: BitLayout::Split,
        force,
    }
}

fn extract_args(image: &Path, output: &Path) -> ExtractArgs {
    ExtractArgs {
        image: image.to_path_buf(),
        output: output.to_path_buf(),
        layout: BitLayout::Split,
        force: false,
    }
}

/// 验证从嵌入到提取的完整流程
#[test]
fn test_handle_embed_and_extract_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let stego_image_path = dir.path().join("stego.png");
    let payload_path = dir.path().join("payload.bin");
    let recovered_path = dir.path().join("recovered.bin");

    create_test_image(&original_image_path, 100, 100);
    let payload = random_payload(4096);
    fs::write(&payload_path, &payload)?;

    // 2. 测试 handle_embed
    handle_embed(embed_args(
        &original_image_path,
        &payload_path,
        &stego_image_path,
        false,
    ))?;
    assert!(stego_image_path.exists(), "Stego image should be created.");

    // 3. 测试 handle_extract
    handle_extract(extract_args(&stego_image_path, &recovered_path))?;
    assert!(recovered_path.exists(), "Recovered payload should be created.");

    // 4. 验证结果
    assert_eq!(
        fs::read(&recovered_path)?,
        payload,
        "Recovered payload must match the original."
    );

    Ok(())
}

/// 验证 packed 布局的完整流程，输出为 qoi 格式
#[test]
fn test_packed_layout_round_trip_through_qoi() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("cover.png");
    let stego_path = dir.path().join("stego.qoi");
    let payload_path = dir.path().join("payload.txt");
    let recovered_path = dir.path().join("recovered.txt");

    create_test_image(&image_path, 40, 30);
    let text = "Packed layout payload. 打包布局载荷。";
    fs::write(&payload_path, text)?;

    handle_embed(EmbedArgs {
        layout: BitLayout::Packed,
        ..embed_args(&image_path, &payload_path, &stego_path, false)
    })?;
    handle_extract(ExtractArgs {
        layout: BitLayout::Packed,
        ..extract_args(&stego_path, &recovered_path)
    })?;

    assert_eq!(fs::read_to_string(&recovered_path)?, text);
    Ok(())
}

/// 载荷超出容量时嵌入仍然成功，提取结果是载荷的前缀
#[test]
fn test_oversized_payload_is_truncated() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("small.png");
    let stego_path = dir.path().join("stego.png");
    let payload_path = dir.path().join("large.bin");
    let recovered_path = dir.path().join("recovered.bin");

    create_test_image(&image_path, 10, 10);
    let payload = random_payload(5000);
    fs::write(&payload_path, &payload)?;

    handle_embed(embed_args(&image_path, &payload_path, &stego_path, false))?;
    handle_extract(extract_args(&stego_path, &recovered_path))?;

    assert_eq!(fs::read(&recovered_path)?, &payload[..96]);
    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let payload_path = dir.path().join("payload.txt");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 50, 50);
    fs::write(&payload_path, "some text")?;

    // 2. 场景一：测试覆盖保护
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;

    let result = handle_embed(embed_args(&image_path, &payload_path, &dest_path, false));
    assert!(
        result.is_err(),
        "Execution should fail without --force when file exists."
    );
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }
    assert_eq!(
        fs::read(&dest_path)?,
        b"this is a dummy file to be overwritten"
    );

    // 3. 场景二：测试强制覆盖
    let result = handle_embed(embed_args(&image_path, &payload_path, &dest_path, true));
    assert!(
        result.is_ok(),
        "Execution should succeed with --force when file exists."
    );

    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");

    Ok(())
}

fn dir_entries(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();
    Ok(entries)
}

/// 失败的操作不留下任何输出文件 (包括临时文件)
#[test]
fn test_failed_operations_leave_no_output() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let tiny_path = dir.path().join("tiny.png");
    let payload_path = dir.path().join("payload.txt");

    create_test_image(&tiny_path, 1, 3);
    fs::write(&payload_path, "abc")?;
    let before = dir_entries(dir.path())?;

    let result = handle_embed(embed_args(
        &tiny_path,
        &payload_path,
        &dir.path().join("out.png"),
        false,
    ));
    assert!(result.is_err(), "A 3-pixel image cannot hold the length prefix.");

    let result = handle_extract(extract_args(&tiny_path, &dir.path().join("out.bin")));
    assert!(result.is_err(), "A 3-pixel image has no length prefix.");

    let result = handle_embed(embed_args(
        &dir.path().join("missing.png"),
        &payload_path,
        &dir.path().join("out.png"),
        false,
    ));
    assert!(result.is_err());

    assert_eq!(dir_entries(dir.path())?, before);
    Ok(())
}

#[test]
fn test_unsupported_output_format_is_rejected() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let payload_path = dir.path().join("payload.txt");
    let dest_path = dir.path().join("dest.unknown");

    create_test_image(&image_path, 20, 20);
    fs::write(&payload_path, "some text")?;

    let result = handle_embed(embed_args(&image_path, &payload_path, &dest_path, false));
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Unsupported output image format"));
    }
    assert!(!dest_path.exists());

    Ok(())
}

#[test]
fn test_handle_inspect() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let stego_path = dir.path().join("stego.png");
    let payload_path = dir.path().join("payload.txt");

    create_test_image(&image_path, 20, 20);
    fs::write(&payload_path, "inspect me")?;
    handle_embed(embed_args(&image_path, &payload_path, &stego_path, false))?;

    handle_inspect(InspectArgs {
        image: stego_path,
        layout: BitLayout::Split,
    })?;

    let result = handle_inspect(InspectArgs {
        image: dir.path().join("missing.png"),
        layout: BitLayout::Split,
    });
    assert!(result.is_err());

    Ok(())
}

/// 验证参数数量不符或子命令未知时命令行解析失败，不执行任何操作
#[test]
fn test_cli_rejects_wrong_argument_counts() {
    let invalid: [&[&str]; 5] = [
        &["pixel_stow"],
        &["pixel_stow", "embed", "a", "b"],
        &["pixel_stow", "embed", "a", "b", "c", "d"],
        &["pixel_stow", "extract", "a"],
        &["pixel_stow", "bogus"],
    ];

    for args in invalid {
        assert!(
            Cli::try_parse_from(args).is_err(),
            "{args:?} should be rejected"
        );
    }
}

/// 验证合法参数被解析为正确的子命令与字段
#[test]
fn test_cli_parses_valid_commands() -> anyhow::Result<()> {
    let cli = Cli::try_parse_from(["pixel_stow", "embed", "a", "b", "c"])?;
    match cli.command {
        Commands::Embed(args) => {
            assert_eq!(args.image, PathBuf::from("a"));
            assert_eq!(args.payload, PathBuf::from("b"));
            assert_eq!(args.output, PathBuf::from("c"));
            assert_eq!(args.layout, BitLayout::Split);
            assert!(!args.force);
        }
        other => panic!("expected embed, got {other:?}"),
    }

    let cli = Cli::try_parse_from(["pixel_stow", "extract", "a", "b", "-l", "packed", "-f"])?;
    match cli.command {
        Commands::Extract(args) => {
            assert_eq!(args.image, PathBuf::from("a"));
            assert_eq!(args.output, PathBuf::from("b"));
            assert_eq!(args.layout, BitLayout::Packed);
            assert!(args.force);
        }
        other => panic!("expected extract, got {other:?}"),
    }

    Ok(())
}
