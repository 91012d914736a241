//! # 图像文件模块
//!
//! 负责核心算法之外的图像 I/O：从磁盘解码栅格、无损保存结果、
//! 把水印图像重新编码为 PNG 字节，以及在水印过大时按比例缩小。

use crate::capacity::usable_bits;
use crate::constants::{COLOR_CHANNELS, SENTINEL_BITS, WATERMARK_FIT_DIVISOR, WATERMARK_MIN_SIDE};
use crate::raster::RasterImage;
use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use log::debug;
use std::io::Cursor;
use std::path::Path;

/// 读取并解码图像文件。
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| format!("Unable to decode image file: {}", path.display()))
}

/// 读取图像文件并转换为栅格。
pub fn load_raster(path: &Path) -> Result<RasterImage> {
    let img = open_image(path)?;
    let raster = RasterImage::from_dynamic(&img)
        .with_context(|| format!("Unsupported image: {}", path.display()))?;
    debug!("loaded {} as {} raster", path.display(), raster.shape());
    Ok(raster)
}

/// 按扩展名选择格式保存栅格。只编译了无损格式，有损格式会直接报错。
pub fn save_raster(raster: &RasterImage, path: &Path) -> Result<()> {
    raster
        .to_dynamic()?
        .save(path)
        .with_context(|| format!("Unable to encode image file: {}", path.display()))
}

/// 将水印重新编码为 PNG 字节 (丢弃 alpha)。
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .context("Unable to re-encode watermark as PNG")?;
    Ok(buf)
}

/// 解码恢复出的图像字节，返回 (宽, 高)。
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let img = image::load_from_memory(bytes).context("Recovered bytes are not a decodable image")?;
    Ok((img.width(), img.height()))
}

/// 水印的原始采样数超过载体容量时，把它缩小到约十分之一容量。
///
/// 返回 `None` 表示无需缩放。
///
/// # Errors
///
/// * 缩放后任一边小于 `WATERMARK_MIN_SIDE` 像素。
pub fn fit_watermark(
    watermark: &DynamicImage,
    carrier: &RasterImage,
) -> Result<Option<DynamicImage>> {
    let available = usable_bits(carrier).saturating_sub(SENTINEL_BITS);
    let wm_samples = watermark.width() as usize * watermark.height() as usize * COLOR_CHANNELS;

    if wm_samples * 8 <= available {
        return Ok(None);
    }

    let target = available / WATERMARK_FIT_DIVISOR;
    let scale = (target as f64 / wm_samples as f64).sqrt();
    let new_width = (watermark.width() as f64 * scale) as u32;
    let new_height = (watermark.height() as f64 * scale) as u32;

    anyhow::ensure!(
        new_width >= WATERMARK_MIN_SIDE && new_height >= WATERMARK_MIN_SIDE,
        "The watermark would shrink to {}x{}, which is too small to be useful",
        new_width,
        new_height
    );

    Ok(Some(watermark.resize_exact(new_width, new_height, FilterType::Triangle)))
}
