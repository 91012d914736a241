//! # lsb_vault 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：容量计算、负载编解码 (AES-128-ECB + base64)、
//! 按固定顺序嵌入/提取位流，以及诊断用的差异分析。

// 声明库包含的所有模块。

pub mod bits;
pub mod capacity;
pub mod cli;
pub mod constants;
pub mod diff;
pub mod error;
pub mod handler;
pub mod media;
pub mod observer;
pub mod payload;
pub mod raster;
pub mod steganography;
pub mod vault;

pub use bits::BitStream;
pub use capacity::compute_capacity;
pub use diff::{DiffStats, diff};
pub use error::{Result, StegoError};
pub use payload::{decode_image, decode_text, encode_image, encode_text};
pub use raster::{ChannelLayout, RasterImage, Shape};
pub use steganography::{Progress, embed, embed_in_place, extract, extract_with_progress};
