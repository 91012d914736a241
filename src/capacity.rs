use crate::constants::{COLOR_CHANNELS, SENTINEL_BITS};
use crate::error::{Result, StegoError};
use crate::raster::RasterImage;

/// 计算图像最多能隐藏多少字节的负载 (编码后、终止符之前)。
///
/// 可用位数为 `height * width * 3`，扣除 16 位终止符后按字节向下取整。
/// 图像尺寸一旦变化就必须重新计算。
///
/// # Errors
///
/// * 图像少于 3 个颜色通道时返回 `UnsupportedRaster`。
pub fn compute_capacity(raster: &RasterImage) -> Result<usize> {
    raster.ensure_color()?;
    Ok(usable_bits(raster).saturating_sub(SENTINEL_BITS) / 8)
}

/// 图像中可以写入的总位数 (含终止符)。
pub fn usable_bits(raster: &RasterImage) -> usize {
    raster.height() * raster.width() * COLOR_CHANNELS
}

/// 检查一段已附加终止符的位流能否完整写入图像。
///
/// # Errors
///
/// * 位数超过 `capacity * 8 + 16` 时返回 `PayloadTooLarge`。
pub fn ensure_fits(raster: &RasterImage, payload_bits: usize) -> Result<()> {
    let available_bits = compute_capacity(raster)? * 8 + SENTINEL_BITS;
    if payload_bits > available_bits {
        return Err(StegoError::PayloadTooLarge {
            required_bits: payload_bits,
            available_bits,
        });
    }
    Ok(())
}
