//! # 组合操作模块
//!
//! 把容量检查、负载编解码、嵌入与提取组合成完整的隐藏/恢复操作。
//! 所有参数校验都在复制或修改图像之前完成，嵌入要么完整生效，要么完全不发生。
//! 每个操作结束时向调用方传入的 `Observer` 报告一次结果。

use crate::bits::BitStream;
use crate::capacity::{compute_capacity, ensure_fits};
use crate::constants::SENTINEL_BITS;
use crate::diff::{DiffStats, diff};
use crate::error::{Result, StegoError};
use crate::observer::{Action, Event, Observer, Status};
use crate::payload::{decode_image, decode_text, encode_image, encode_text};
use crate::raster::RasterImage;
use crate::steganography::{Progress, embed, extract_with_progress};

/// 已使用容量与总容量 (字节)。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    /// 负载位数，含终止符。
    pub payload_bits: usize,
    pub used_bytes: usize,
    pub capacity_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct Embedded {
    pub raster: RasterImage,
    pub usage: Usage,
}

/// 加密文本并隐藏到图像副本中。
///
/// # Errors
///
/// * `InvalidKeyLength`、`UnsupportedRaster` 或 `PayloadTooLarge`，此时原图不会被复制或修改。
pub fn hide_text(
    raster: &RasterImage,
    text: &str,
    key: &[u8],
    observer: &mut dyn Observer,
) -> Result<Embedded> {
    let result = encode_text(text, key).and_then(|bits| embed_checked(raster, &bits));
    report(observer, Action::HideText, result, describe_usage)
}

/// 从图像中提取并解密文本。
pub fn reveal_text(
    raster: &RasterImage,
    key: &[u8],
    observer: &mut dyn Observer,
    progress: &mut dyn FnMut(Progress),
) -> Result<String> {
    let result = extract_with_progress(raster, progress).and_then(|bits| decode_text(&bits, key));
    report(observer, Action::RevealText, result, |text| {
        format!("recovered {} bytes of text", text.len())
    })
}

/// 把已编码的图像字节 (不加密) 隐藏到图像副本中。
pub fn hide_image(
    raster: &RasterImage,
    image_bytes: &[u8],
    observer: &mut dyn Observer,
) -> Result<Embedded> {
    let bits = encode_image(image_bytes);
    let result = embed_checked(raster, &bits);
    report(observer, Action::HideImage, result, describe_usage)
}

pub fn reveal_image(
    raster: &RasterImage,
    observer: &mut dyn Observer,
    progress: &mut dyn FnMut(Progress),
) -> Result<Vec<u8>> {
    let result = extract_with_progress(raster, progress).and_then(|bits| decode_image(&bits));
    report(observer, Action::RevealImage, result, |bytes| {
        format!("recovered {} bytes of image data", bytes.len())
    })
}

/// 比较原图与隐写后的图像。
pub fn compare(
    original: &RasterImage,
    modified: &RasterImage,
    observer: &mut dyn Observer,
) -> Result<(RasterImage, DiffStats)> {
    let result = diff(original, modified);
    report(observer, Action::ShowDifference, result, |(_, stats)| {
        format!(
            "{}/{} samples changed ({:.4}%)",
            stats.changed_samples, stats.total_samples, stats.changed_percent
        )
    })
}

fn embed_checked(raster: &RasterImage, bits: &BitStream) -> Result<Embedded> {
    let capacity_bytes = compute_capacity(raster)?;
    ensure_fits(raster, bits.len())?;

    Ok(Embedded {
        raster: embed(raster, bits)?,
        usage: Usage {
            payload_bits: bits.len(),
            used_bytes: bits.len().saturating_sub(SENTINEL_BITS) / 8,
            capacity_bytes,
        },
    })
}

fn describe_usage(e: &Embedded) -> String {
    let usage = e.usage;
    format!(
        "used {}/{} bytes ({} payload bits)",
        usage.used_bytes, usage.capacity_bytes, usage.payload_bits
    )
}

fn report<T>(
    observer: &mut dyn Observer,
    action: Action,
    result: Result<T>,
    describe: impl FnOnce(&T) -> String,
) -> Result<T> {
    let event = match &result {
        Ok(value) => Event::new(action, Status::Success, describe(value)),
        Err(StegoError::NotFound) => {
            Event::new(action, Status::Warning, StegoError::NotFound.to_string())
        }
        Err(e) => Event::new(action, Status::Failure, e.to_string()),
    };
    observer.on_event(&event);
    result
}
