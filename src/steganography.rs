use crate::bits::BitStream;
use crate::constants::PROGRESS_CADENCE;
use crate::error::{Result, StegoError};
use crate::raster::RasterImage;

/// 提取进度，只用于观察，不影响提取结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed_pixels: usize,
    pub total_pixels: usize,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total_pixels == 0 {
            100.0
        } else {
            self.processed_pixels as f64 / self.total_pixels as f64 * 100.0
        }
    }
}

/// 将位流写入图像副本的 LSB，原图保持不变。
pub fn embed(raster: &RasterImage, bits: &BitStream) -> Result<RasterImage> {
    let mut out = raster.clone();
    embed_in_place(&mut out, bits)?;
    Ok(out)
}

/// 原地写入位流，返回实际写入的位数。
///
/// 按行优先、像素内 B, G, R 的顺序逐个替换采样的最低位，位流用完后其余采样不动。
/// 不检查容量：超出图像的部分会被截断，调用前应先用 `capacity::ensure_fits`。
pub fn embed_in_place(raster: &mut RasterImage, bits: &BitStream) -> Result<usize> {
    raster.ensure_color()?;

    let indices: Vec<usize> = raster.color_sample_indices().take(bits.len()).collect();
    let samples = raster.samples_mut();

    for (&idx, bit) in indices.iter().zip(bits.iter()) {
        samples[idx] = (samples[idx] & 0xFE) | bit as u8;
    }

    Ok(indices.len())
}

pub fn extract(raster: &RasterImage) -> Result<BitStream> {
    extract_with_progress(raster, &mut |_| {})
}

/// 按嵌入时的顺序读取 LSB，直到末尾 16 位等于终止符为止。
///
/// 每处理 `PROGRESS_CADENCE` 个像素回调一次 `progress`，扫描结束时再回调一次。
/// 终止符匹配没有任何转义，负载自身包含该位模式时会提前截断。
///
/// # Errors
///
/// * 图像少于 3 个颜色通道时返回 `UnsupportedRaster`。
/// * 扫描完整张图像仍未找到终止符时返回 `NotFound`。
pub fn extract_with_progress(
    raster: &RasterImage,
    progress: &mut dyn FnMut(Progress),
) -> Result<BitStream> {
    raster.ensure_color()?;

    let total_pixels = raster.height() * raster.width();
    let channels = raster.channels();
    let order = raster.layout().visit_order();
    let samples = raster.samples();
    let mut acc = BitStream::new();

    for pixel in 0..total_pixels {
        if pixel % PROGRESS_CADENCE == 0 {
            progress(Progress {
                processed_pixels: pixel,
                total_pixels,
            });
        }

        let base = pixel * channels;
        for c in order {
            acc.push(samples[base + c] & 1 == 1);
            if acc.strip_sentinel() {
                progress(Progress {
                    processed_pixels: pixel + 1,
                    total_pixels,
                });
                return Ok(acc);
            }
        }
    }

    progress(Progress {
        processed_pixels: total_pixels,
        total_pixels,
    });
    Err(StegoError::NotFound)
}
