//! # 错误类型
//!
//! 核心库的所有失败路径都返回 `StegoError` 的某个可区分变体，从不在内部吞掉错误。

use crate::raster::Shape;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StegoError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 密钥长度不是 16 字节
    #[error("The cipher key must be exactly 16 bytes long, got {0} bytes")]
    InvalidKeyLength(usize),

    /// 编码后的负载 (含终止符) 超出了图像可承载的位数
    #[error("Payload needs {required_bits} bits but the image can only carry {available_bits} bits")]
    PayloadTooLarge {
        required_bits: usize,
        available_bits: usize,
    },

    /// 图像少于 3 个颜色通道，或像素缓冲区与尺寸不符
    #[error("Unsupported raster: {0}")]
    UnsupportedRaster(String),

    /// 两张图像的尺寸或通道数不同，无法比较
    #[error("Raster shapes differ: {left} vs {right}")]
    ShapeMismatch { left: Shape, right: Shape },

    /// base64 或结构层面的解码失败
    #[error("Hidden payload is corrupt: {0}")]
    CorruptPayload(String),

    /// 解密后填充无效或结果不是合法的 UTF-8，通常意味着密钥错误
    #[error("Decryption failed, the key is probably wrong: {0}")]
    DecryptionFailed(String),

    /// 整张图像中都没有找到终止符
    #[error("No hidden data found: the end marker is missing")]
    NotFound,
}
