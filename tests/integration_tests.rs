use image::{ImageBuffer, Rgb, Rgba};
use lsb_vault::{
    cli::{CapacityArgs, DiffArgs, HideImageArgs, HideTextArgs, RevealImageArgs, RevealTextArgs},
    handler::{
        handle_capacity, handle_diff, handle_hide_image, handle_hide_text, handle_reveal_image,
        handle_reveal_text,
    },
};
use rand::RngCore;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const KEY: &str = "0123456789ABCDEF";

/// 一个辅助函数，用于创建一个带有随机像素的测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(4))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgba([chunk[0], chunk[1], chunk[2], 255]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

/// 创建一个渐变水印图像
fn create_watermark(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 128])
    });
    img.save(path).expect("Failed to create watermark image.");
}

/// 验证从隐藏到恢复文本的完整流程
#[test]
fn test_hide_and_reveal_text_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let hidden_image_path = dir.path().join("hidden.png");
    let source_text_path = dir.path().join("source.txt");
    let recovered_text_path = dir.path().join("recovered.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "This is a test message for the handler! 这是一个给处理器的测试信息！";
    fs::write(&source_text_path, original_text)?;

    // 2. 隐藏
    handle_hide_text(HideTextArgs {
        image: original_image_path.clone(),
        text: source_text_path.clone(),
        key: KEY.to_string(),
        dest: Some(hidden_image_path.clone()),
        force: false,
    })?;
    assert!(
        hidden_image_path.exists(),
        "Hidden image should be created."
    );

    // 3. 恢复
    handle_reveal_text(RevealTextArgs {
        image: hidden_image_path.clone(),
        key: KEY.to_string(),
        text: Some(recovered_text_path.clone()),
        force: false,
    })?;

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&recovered_text_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text must match the original."
    );

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径并完成操作
#[test]
fn test_hide_and_reveal_text_with_defaults() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let source_text_path = dir.path().join("source.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "HELLO";
    fs::write(&source_text_path, original_text)?;

    handle_hide_text(HideTextArgs {
        image: original_image_path.clone(),
        text: source_text_path.clone(),
        key: KEY.to_string(),
        dest: None,
        force: false,
    })?;

    let expected_hidden_path = dir.path().join("doctored_original.png");
    assert!(
        expected_hidden_path.exists(),
        "Default hidden image should be created at: {:?}",
        expected_hidden_path
    );

    handle_reveal_text(RevealTextArgs {
        image: expected_hidden_path,
        key: KEY.to_string(),
        text: None,
        force: false,
    })?;

    let expected_recovered_path = dir.path().join("recovered_doctored_original.txt");
    let recovered_text = fs::read_to_string(&expected_recovered_path)?;
    assert_eq!(original_text, recovered_text);

    Ok(())
}

/// 验证错误的密钥不会得到看似合理的明文
#[test]
fn test_reveal_text_with_wrong_key_fails() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let text_path = dir.path().join("text.txt");
    let hidden_path = dir.path().join("hidden.png");
    let out_path = dir.path().join("out.txt");

    create_test_image(&image_path, 60, 60);
    fs::write(&text_path, "the eagle has landed")?;

    handle_hide_text(HideTextArgs {
        image: image_path,
        text: text_path,
        key: KEY.to_string(),
        dest: Some(hidden_path.clone()),
        force: false,
    })?;

    let result = handle_reveal_text(RevealTextArgs {
        image: hidden_path,
        key: "FEDCBA9876543210".to_string(),
        text: Some(out_path.clone()),
        force: false,
    });

    assert!(result.is_err(), "A wrong key must not decrypt the message.");
    assert!(!out_path.exists());

    Ok(())
}

/// 验证密钥长度检查发生在写入任何文件之前
#[test]
fn test_hide_text_rejects_bad_key() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let text_path = dir.path().join("text.txt");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 30, 30);
    fs::write(&text_path, "some text")?;

    let result = handle_hide_text(HideTextArgs {
        image: image_path,
        text: text_path,
        key: "too short".to_string(),
        dest: Some(dest_path.clone()),
        force: false,
    });

    assert!(result.is_err());
    assert!(!dest_path.exists());

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let text_path = dir.path().join("text.txt");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 50, 50);
    fs::write(&text_path, "some text")?;

    // 先创建一个同名的目标文件，模拟“文件已存在”的场景
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;

    let result = handle_hide_text(HideTextArgs {
        image: image_path.clone(),
        text: text_path.clone(),
        key: KEY.to_string(),
        dest: Some(dest_path.clone()),
        force: false,
    });
    assert!(result.is_err(), "Execution should fail without --force when file exists.");
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    let result = handle_hide_text(HideTextArgs {
        image: image_path,
        text: text_path,
        key: KEY.to_string(),
        dest: Some(dest_path.clone()),
        force: true,
    });
    assert!(result.is_ok(), "Execution should succeed with --force when file exists.");

    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");

    Ok(())
}

/// 验证空间不足时的错误处理，且不会生成输出文件
#[test]
fn test_hide_text_not_enough_space() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("small.png");
    let text_path = dir.path().join("large.txt");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 10, 10);
    fs::write(&text_path, "a".repeat(5000))?;

    let result = handle_hide_text(HideTextArgs {
        image: image_path,
        text: text_path,
        key: KEY.to_string(),
        dest: Some(dest_path.clone()),
        force: false,
    });

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Not enough space"));
    }
    assert!(!dest_path.exists());

    Ok(())
}

/// 没有隐藏数据的图像只会得到提示，不会生成输出文件
#[test]
fn test_reveal_from_clean_image_finds_nothing() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("clean.png");
    let out_path = dir.path().join("out.txt");

    // 全黑图像的 LSB 全为 0，不可能出现终止符
    ImageBuffer::from_pixel(20, 20, Rgb([0u8, 0, 0])).save(&image_path)?;

    handle_reveal_text(RevealTextArgs {
        image: image_path,
        key: KEY.to_string(),
        text: Some(out_path.clone()),
        force: false,
    })?;
    assert!(!out_path.exists());

    Ok(())
}

/// 验证水印图像的隐藏与恢复
#[test]
fn test_hide_and_reveal_image_integration() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let watermark_path = dir.path().join("mark.png");
    let hidden_path = dir.path().join("hidden.png");
    let recovered_path = dir.path().join("mark_out.png");

    create_test_image(&carrier_path, 200, 200);
    create_watermark(&watermark_path, 16, 16);

    handle_hide_image(HideImageArgs {
        image: carrier_path,
        watermark: watermark_path.clone(),
        dest: Some(hidden_path.clone()),
        fit: false,
        force: false,
    })?;

    handle_reveal_image(RevealImageArgs {
        image: hidden_path,
        output: Some(recovered_path.clone()),
        force: false,
    })?;

    let original = image::open(&watermark_path)?.to_rgb8();
    let recovered = image::open(&recovered_path)?.to_rgb8();
    assert_eq!(original, recovered, "PNG re-encoding must be lossless.");

    Ok(())
}

/// 过大的水印在 `--fit` 下会被缩小后隐藏
#[test]
fn test_hide_image_fit_shrinks_watermark() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let watermark_path = dir.path().join("mark.png");
    let hidden_path = dir.path().join("hidden.png");

    create_test_image(&carrier_path, 120, 120);
    // 随机噪声几乎无法压缩，原尺寸肯定放不下
    create_test_image(&watermark_path, 300, 300);

    let without_fit = handle_hide_image(HideImageArgs {
        image: carrier_path.clone(),
        watermark: watermark_path.clone(),
        dest: Some(hidden_path.clone()),
        fit: false,
        force: false,
    });
    assert!(without_fit.is_err());

    handle_hide_image(HideImageArgs {
        image: carrier_path,
        watermark: watermark_path,
        dest: Some(hidden_path.clone()),
        fit: true,
        force: false,
    })?;

    handle_reveal_image(RevealImageArgs {
        image: hidden_path,
        output: None,
        force: false,
    })?;

    let recovered = image::open(dir.path().join("recovered_hidden.png"))?;
    assert!(recovered.width() < 300 && recovered.height() < 300);

    Ok(())
}

/// 差异图与容量报告
#[test]
fn test_diff_and_capacity() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let original_path = dir.path().join("original.png");
    let text_path = dir.path().join("text.txt");

    create_test_image(&original_path, 40, 40);
    fs::write(&text_path, "compare me")?;

    handle_capacity(CapacityArgs {
        image: original_path.clone(),
    })?;

    handle_hide_text(HideTextArgs {
        image: original_path.clone(),
        text: text_path,
        key: KEY.to_string(),
        dest: None,
        force: false,
    })?;
    let doctored_path = dir.path().join("doctored_original.png");

    handle_diff(DiffArgs {
        original: original_path,
        modified: doctored_path,
        output: None,
        force: false,
    })?;

    let diff = image::open(dir.path().join("diff_doctored_original.png"))?.to_rgb8();
    assert!(diff.pixels().all(|p| p.0.iter().all(|&s| s == 0 || s == 20)));
    assert!(diff.pixels().any(|p| p.0.contains(&20)));

    Ok(())
}
