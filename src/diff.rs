//! # 差异分析模块
//!
//! 逐采样比较原图与隐写后的图像，仅用于诊断，不参与嵌入或提取。

use crate::constants::COLOR_CHANNELS;
use crate::error::{Result, StegoError};
use crate::raster::RasterImage;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffStats {
    pub total_samples: usize,
    pub changed_samples: usize,
    pub changed_percent: f64,
}

/// 计算 `|a - b|` 差异图及统计信息。
///
/// 只比较每个像素的前三个颜色通道，alpha 或其他额外通道不参与比较，
/// 因此差异图总是 3 个通道，统计的总采样数为 `height * width * 3`。
///
/// # Errors
///
/// * 两张图像的形状不同时返回 `ShapeMismatch`。
/// * 图像少于 3 个颜色通道时返回 `UnsupportedRaster`。
pub fn diff(a: &RasterImage, b: &RasterImage) -> Result<(RasterImage, DiffStats)> {
    if a.shape() != b.shape() {
        return Err(StegoError::ShapeMismatch {
            left: a.shape(),
            right: b.shape(),
        });
    }
    a.ensure_color()?;

    let channels = a.channels();
    let samples: Vec<u8> = a
        .samples()
        .chunks_exact(channels)
        .zip(b.samples().chunks_exact(channels))
        .flat_map(|(x, y)| {
            x[..COLOR_CHANNELS]
                .iter()
                .zip(&y[..COLOR_CHANNELS])
                .map(|(&x, &y)| x.abs_diff(y))
        })
        .collect();

    let total_samples = samples.len();
    let changed_samples = samples.iter().filter(|&&d| d != 0).count();
    let changed_percent = if total_samples == 0 {
        0.0
    } else {
        changed_samples as f64 / total_samples as f64 * 100.0
    };

    let raster = RasterImage::new(a.height(), a.width(), COLOR_CHANNELS, a.layout(), samples)?;

    Ok((
        raster,
        DiffStats {
            total_samples,
            changed_samples,
            changed_percent,
        },
    ))
}

/// 放大差异图以便肉眼观察，结果饱和截断到 255。
pub fn amplify(diff: &RasterImage, factor: u8) -> RasterImage {
    let mut out = diff.clone();
    out.samples_mut()
        .iter_mut()
        .for_each(|s| *s = s.saturating_mul(factor));
    out
}
