//! # 命令处理逻辑模块
//!
//! 包含处理各个子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::capacity::compute_capacity;
use crate::cli::{
    CapacityArgs, DiffArgs, HideImageArgs, HideTextArgs, RevealImageArgs, RevealTextArgs,
};
use crate::constants::DIFF_AMPLIFICATION;
use crate::diff::amplify;
use crate::error::StegoError;
use crate::media::{
    encode_png, fit_watermark, image_dimensions, load_raster, open_image, save_raster,
};
use crate::observer::{Action, Event, LogObserver, Observer, Status};
use crate::raster::RasterImage;
use crate::steganography::Progress;
use crate::vault;
use anyhow::{Context, Result};
use colored::Colorize;
use image::DynamicImage;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Capacity' 命令，打印图像可隐藏的最大字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let raster = load_with_event(&args.image, &mut LogObserver)?;
    let capacity = compute_capacity(&raster)?;

    println!(
        "{} ({}x{}) can hide up to {} bytes.",
        args.image.to_string_lossy().green().bold(),
        raster.width(),
        raster.height(),
        capacity.to_string().green().bold()
    );
    Ok(())
}

/// 处理 'HideText' 命令的执行逻辑。
///
/// 负责读取图像和文本文件、加密并检查隐写空间是否足够，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与密钥的 `HideTextArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件，或文本为空。
/// * 输出文件已存在且未指定 `--force`。
/// * 密钥长度不是 16 字节，或图像没有足够的空间来隐藏文本。
/// * 无法写入到目标图像文件。
pub fn handle_hide_text(args: HideTextArgs) -> Result<()> {
    let dest = resolve_output(args.dest, &args.image, "doctored", "png")?;
    ensure_writable(&dest, args.force)?;

    let raster = load_with_event(&args.image, &mut LogObserver)?;
    let text = fs::read_to_string(&args.text).with_context(|| {
        format!(
            "Unable to read text file: {}",
            args.text.to_string_lossy().red().bold()
        )
    })?;
    anyhow::ensure!(!text.is_empty(), "The text file is empty, nothing to hide.");

    let mut observer = LogObserver;
    let embedded = vault::hide_text(&raster, &text, args.key.as_bytes(), &mut observer)
        .map_err(explain_capacity)?;

    save_with_event(&embedded.raster, &dest, &mut observer)?;

    println!(
        "The text has been successfully hidden and saved: {} (used {}/{} bytes)",
        dest.to_string_lossy().green().bold(),
        embedded.usage.used_bytes.to_string().green(),
        embedded.usage.capacity_bytes
    );
    Ok(())
}

/// 处理 'RevealText' 命令的执行逻辑。
///
/// 图像中没有隐藏数据不视为错误，只打印提示。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 隐藏的数据损坏，或密钥错误导致解密失败。
/// * 无法写入到目标文本文件。
pub fn handle_reveal_text(args: RevealTextArgs) -> Result<()> {
    let dest = resolve_output(args.text, &args.image, "recovered", "txt")?;
    ensure_writable(&dest, args.force)?;

    let raster = load_with_event(&args.image, &mut LogObserver)?;
    let text = match vault::reveal_text(
        &raster,
        args.key.as_bytes(),
        &mut LogObserver,
        &mut log_progress,
    ) {
        Err(StegoError::NotFound) => return report_not_found(&args.image),
        other => other.with_context(|| {
            format!(
                "Failed to recover text from '{}'. \nCheck that the key is correct.",
                args.image.to_string_lossy().red().bold()
            )
        })?,
    };

    fs::write(&dest, text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'HideImage' 命令的执行逻辑。
///
/// 水印会被重新编码为 PNG 后隐藏，指定 `--fit` 时过大的水印会先被缩小。
pub fn handle_hide_image(args: HideImageArgs) -> Result<()> {
    let dest = resolve_output(args.dest, &args.image, "doctored", "png")?;
    ensure_writable(&dest, args.force)?;

    let mut observer = LogObserver;
    let raster = load_with_event(&args.image, &mut LogObserver)?;
    let mut watermark = open_image(&args.watermark)?;

    if args.fit {
        watermark = fit_with_event(watermark, &raster, &mut observer)?;
    }

    let bytes = encode_png(&watermark)?;
    let embedded = vault::hide_image(&raster, &bytes, &mut observer)
        .map_err(explain_capacity)
        .with_context(|| {
            format!(
                "Failed to hide {}. Try --fit to shrink the watermark.",
                args.watermark.to_string_lossy().red().bold()
            )
        })?;

    save_with_event(&embedded.raster, &dest, &mut observer)?;

    println!(
        "The watermark has been successfully hidden and saved: {} (used {}/{} bytes)",
        dest.to_string_lossy().green().bold(),
        embedded.usage.used_bytes.to_string().green(),
        embedded.usage.capacity_bytes
    );
    Ok(())
}

/// 处理 'RevealImage' 命令的执行逻辑。恢复出的字节原样写出。
pub fn handle_reveal_image(args: RevealImageArgs) -> Result<()> {
    let dest = resolve_output(args.output, &args.image, "recovered", "png")?;
    ensure_writable(&dest, args.force)?;

    let raster = load_with_event(&args.image, &mut LogObserver)?;
    let bytes = match vault::reveal_image(&raster, &mut LogObserver, &mut log_progress) {
        Err(StegoError::NotFound) => return report_not_found(&args.image),
        other => other.with_context(|| {
            format!(
                "Failed to recover a watermark from '{}'.",
                args.image.to_string_lossy().red().bold()
            )
        })?,
    };

    let (width, height) = image_dimensions(&bytes)?;
    fs::write(&dest, &bytes).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "A {}x{} watermark has been recovered and saved: {}",
        width,
        height,
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Diff' 命令：计算差异、保存放大后的差异图并打印统计。
pub fn handle_diff(args: DiffArgs) -> Result<()> {
    let dest = resolve_output(args.output, &args.modified, "diff", "png")?;
    ensure_writable(&dest, args.force)?;

    let original = load_with_event(&args.original, &mut LogObserver)?;
    let modified = load_with_event(&args.modified, &mut LogObserver)?;

    let mut observer = LogObserver;
    let (diff, stats) = vault::compare(&original, &modified, &mut observer)
        .context("The two images cannot be compared")?;

    save_with_event(&amplify(&diff, DIFF_AMPLIFICATION), &dest, &mut observer)?;

    println!(
        "{} of {} samples changed ({:.4}%). Difference map saved: {}",
        stats.changed_samples.to_string().yellow().bold(),
        stats.total_samples,
        stats.changed_percent,
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 未指定输出路径时，在输入文件旁生成 `<前缀>_<名称>.<扩展名>`。
fn resolve_output(
    explicit: Option<PathBuf>,
    input: &Path,
    prefix: &str,
    ext: &str,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let stem = input
        .file_stem()
        .with_context(|| format!("Invalid input path: {}", input.display()))?
        .to_string_lossy();
    let name = format!("{prefix}_{stem}.{ext}");

    Ok(match input.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    })
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 水印过大时按比例缩小，并向观察者报告缩放结果或失败原因。
fn fit_with_event(
    watermark: DynamicImage,
    carrier: &RasterImage,
    observer: &mut dyn Observer,
) -> Result<DynamicImage> {
    match fit_watermark(&watermark, carrier) {
        Ok(None) => Ok(watermark),
        Ok(Some(fitted)) => {
            let detail = format!("watermark resized to {}x{}", fitted.width(), fitted.height());
            observer.on_event(&Event::new(Action::HideImage, Status::Warning, detail));
            println!(
                "The watermark is too large and was resized to {}x{}.",
                fitted.width().to_string().yellow().bold(),
                fitted.height().to_string().yellow().bold()
            );
            Ok(fitted)
        }
        Err(e) => {
            observer.on_event(&Event::new(Action::HideImage, Status::Failure, e.to_string()));
            Err(e)
        }
    }
}

fn load_with_event(path: &Path, observer: &mut dyn Observer) -> Result<RasterImage> {
    let detail = path.to_string_lossy().into_owned();
    match load_raster(path) {
        Ok(raster) => {
            observer.on_event(&Event::new(Action::LoadImage, Status::Success, detail));
            Ok(raster)
        }
        Err(e) => {
            observer.on_event(&Event::new(Action::LoadImage, Status::Failure, detail));
            Err(e)
        }
    }
}

fn save_with_event(raster: &RasterImage, path: &Path, observer: &mut dyn Observer) -> Result<()> {
    let detail = path.to_string_lossy().into_owned();
    match save_raster(raster, path) {
        Ok(()) => {
            observer.on_event(&Event::new(Action::SaveImage, Status::Success, detail));
            Ok(())
        }
        Err(e) => {
            observer.on_event(&Event::new(Action::SaveImage, Status::Failure, detail));
            Err(e)
        }
    }
}

fn explain_capacity(e: StegoError) -> anyhow::Error {
    match e {
        StegoError::PayloadTooLarge {
            required_bits,
            available_bits,
        } => anyhow::anyhow!(
            "Not enough space in the image to hide the data. \nRequired: {} bits, Available: {} bits",
            required_bits.to_string().red().bold(),
            available_bits.to_string().green().bold()
        ),
        other => other.into(),
    }
}

fn report_not_found(image: &Path) -> Result<()> {
    println!(
        "No hidden data was found in {}.",
        image.to_string_lossy().yellow().bold()
    );
    Ok(())
}

fn log_progress(progress: Progress) {
    debug!(
        "scanned {}/{} pixels ({:.1}%)",
        progress.processed_pixels,
        progress.total_pixels,
        progress.percent()
    );
}
