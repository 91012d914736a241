//! # 栅格图像模块
//!
//! `RasterImage` 是核心算法处理的唯一图像表示：一个 height × width × channels 的
//! 8 位采样网格，按行优先顺序存放。
//!
//! 隐写只触及每个像素的前三个颜色通道，并且总是按 **B, G, R** 的规范顺序访问它们，
//! 与缓冲区的物理排列 (`ChannelLayout`) 无关。

use crate::constants::COLOR_CHANNELS;
use crate::error::{Result, StegoError};
use image::{DynamicImage, RgbImage, RgbaImage};
use std::fmt;

/// 缓冲区中前三个颜色通道的物理排列。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// R, G, B (可选 alpha)，`image` crate 的默认排列
    Rgb,
    /// B, G, R (可选 alpha)
    Bgr,
}

impl ChannelLayout {
    /// 规范访问顺序 (B, G, R) 在像素内对应的物理通道下标。
    pub fn visit_order(self) -> [usize; COLOR_CHANNELS] {
        match self {
            ChannelLayout::Rgb => [2, 1, 0],
            ChannelLayout::Bgr => [0, 1, 2],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.height, self.width, self.channels)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    shape: Shape,
    layout: ChannelLayout,
    samples: Vec<u8>,
}

impl RasterImage {
    /// 从原始采样缓冲区构造栅格图像。
    ///
    /// # Errors
    ///
    /// * 缓冲区长度不等于 `height * width * channels` 时返回 `UnsupportedRaster`。
    pub fn new(
        height: usize,
        width: usize,
        channels: usize,
        layout: ChannelLayout,
        samples: Vec<u8>,
    ) -> Result<Self> {
        let expected = height
            .checked_mul(width)
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| StegoError::UnsupportedRaster("dimensions overflow".into()))?;

        if samples.len() != expected {
            return Err(StegoError::UnsupportedRaster(format!(
                "expected {} samples for a {}x{}x{} raster, got {}",
                expected,
                height,
                width,
                channels,
                samples.len()
            )));
        }

        Ok(Self {
            shape: Shape {
                height,
                width,
                channels,
            },
            layout,
            samples,
        })
    }

    /// 由 `image` crate 解码后的图像构造栅格。
    /// 带 alpha 的图像保留 4 个通道 (alpha 不参与隐写)，灰度图像会被拒绝。
    pub fn from_dynamic(img: &DynamicImage) -> Result<Self> {
        let color = img.color();
        if (color.channel_count() as usize) < COLOR_CHANNELS {
            return Err(StegoError::UnsupportedRaster(format!(
                "{:?} has fewer than {} color channels",
                color, COLOR_CHANNELS
            )));
        }

        let (width, height) = (img.width() as usize, img.height() as usize);
        if color.has_alpha() {
            Self::new(height, width, 4, ChannelLayout::Rgb, img.to_rgba8().into_raw())
        } else {
            Self::new(height, width, 3, ChannelLayout::Rgb, img.to_rgb8().into_raw())
        }
    }

    /// 转换回 `image` crate 的图像，以便编码保存。
    pub fn to_dynamic(&self) -> Result<DynamicImage> {
        let samples = match self.layout {
            ChannelLayout::Rgb => self.samples.clone(),
            ChannelLayout::Bgr => {
                let mut swapped = self.samples.clone();
                swapped
                    .chunks_exact_mut(self.shape.channels)
                    .for_each(|pixel| pixel.swap(0, 2));
                swapped
            }
        };

        let (w, h) = (self.shape.width as u32, self.shape.height as u32);
        let invalid = || StegoError::UnsupportedRaster(format!("cannot encode {}", self.shape));
        match self.shape.channels {
            3 => RgbImage::from_raw(w, h, samples)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(invalid),
            4 => RgbaImage::from_raw(w, h, samples)
                .map(DynamicImage::ImageRgba8)
                .ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn height(&self) -> usize {
        self.shape.height
    }

    pub fn width(&self) -> usize {
        self.shape.width
    }

    pub fn channels(&self) -> usize {
        self.shape.channels
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    /// 采样下标，按隐写访问顺序排列：行优先，像素内按 B, G, R。
    pub fn color_sample_indices(&self) -> impl Iterator<Item = usize> + use<> {
        let channels = self.shape.channels;
        let order = self.layout.visit_order();
        let pixels = self.shape.height * self.shape.width;
        (0..pixels).flat_map(move |p| order.map(|c| p * channels + c))
    }

    pub(crate) fn ensure_color(&self) -> Result<()> {
        if self.shape.channels < COLOR_CHANNELS {
            return Err(StegoError::UnsupportedRaster(format!(
                "{} channel(s), at least {} are required",
                self.shape.channels, COLOR_CHANNELS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_buffer_that_does_not_match_dimensions() {
        let result = RasterImage::new(2, 2, 3, ChannelLayout::Rgb, vec![0; 11]);
        assert!(matches!(result, Err(StegoError::UnsupportedRaster(_))));
    }

    #[test]
    fn visits_blue_green_red_regardless_of_layout() {
        let rgb = RasterImage::new(1, 2, 4, ChannelLayout::Rgb, vec![0; 8]).unwrap();
        let order: Vec<usize> = rgb.color_sample_indices().collect();
        assert_eq!(order, vec![2, 1, 0, 6, 5, 4]);

        let bgr = RasterImage::new(1, 2, 3, ChannelLayout::Bgr, vec![0; 6]).unwrap();
        let order: Vec<usize> = bgr.color_sample_indices().collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn grayscale_images_are_unsupported() {
        let gray = DynamicImage::new_luma8(4, 4);
        assert!(matches!(
            RasterImage::from_dynamic(&gray),
            Err(StegoError::UnsupportedRaster(_))
        ));
    }

    #[test]
    fn bgr_raster_is_swapped_back_to_rgb() {
        let raster = RasterImage::new(1, 1, 3, ChannelLayout::Bgr, vec![10, 20, 30]).unwrap();
        let img = raster.to_dynamic().unwrap().to_rgb8();
        assert_eq!(img.get_pixel(0, 0).0, [30, 20, 10]);
    }

    #[test]
    fn alpha_channel_survives_conversion() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(1, 0, image::Rgba([1, 2, 3, 128]));
        let raster = RasterImage::from_dynamic(&DynamicImage::ImageRgba8(img.clone())).unwrap();
        assert_eq!(raster.channels(), 4);
        assert_eq!(raster.to_dynamic().unwrap().to_rgba8(), img);
    }
}
