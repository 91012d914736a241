/// 标记隐藏数据结束的 16 位终止符 (`1111111111111110`)。
/// 嵌入与提取必须使用完全相同的位模式，否则无法互通。
pub const SENTINEL: [bool; 16] = [
    true, true, true, true, true, true, true, true, true, true, true, true, true, true, true, false,
];

/// 终止符占用的位数。
pub const SENTINEL_BITS: usize = SENTINEL.len();

/// 每个像素参与隐写的颜色通道数。
/// 只使用前三个颜色通道，alpha 或其他额外通道一律忽略。
pub const COLOR_CHANNELS: usize = 3;

/// AES-128 密钥的字节长度。密钥原样使用，不做任何派生。
pub const KEY_LEN: usize = 16;

/// 提取过程中每处理多少个像素回调一次进度。
pub const PROGRESS_CADENCE: usize = 10_000;

/// 差异图的放大倍数，使只有 LSB 不同的像素肉眼可见。
pub const DIFF_AMPLIFICATION: u8 = 20;

/// 自动缩放水印时的目标：只使用载体容量的约十分之一。
pub const WATERMARK_FIT_DIVISOR: usize = 10;

/// 缩放后水印的最小边长 (像素)。
pub const WATERMARK_MIN_SIDE: u32 = 10;
