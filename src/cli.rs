//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::Parser;
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，在无损格式图像中隐藏 AES 加密的文本或水印图像。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，在无损格式图像 (如 PNG, BMP) 中隐藏 AES-128 加密的文本或未加密的水印图像，并可比较隐写前后的差异。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Parser, Debug)]
pub enum Commands {
    /// 显示图像可隐藏的最大字节数。
    Capacity(CapacityArgs),

    /// 加密文本文件内容并隐藏到图像中。
    HideText(HideTextArgs),

    /// 从隐写图像中恢复并解密文本。
    RevealText(RevealTextArgs),

    /// 将水印图像隐藏到载体图像中 (不加密)。
    HideImage(HideImageArgs),

    /// 从隐写图像中恢复水印图像。
    RevealImage(RevealImageArgs),

    /// 比较原图与隐写图像，输出放大后的差异图。
    Diff(DiffArgs),
}

#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,
}

/// 'hide-text' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideTextArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径 (UTF-8)。
    #[arg(short, long)]
    pub text: PathBuf,

    /// 16 字节的 AES 密钥。
    #[arg(short, long, env = "LSB_VAULT_KEY", hide_env_values = true)]
    pub key: String,

    /// 结果图像的输出路径，默认为输入图像旁的 `doctored_<名称>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'reveal-text' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RevealTextArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 16 字节的 AES 密钥。
    #[arg(short, long, env = "LSB_VAULT_KEY", hide_env_values = true)]
    pub key: String,

    /// 恢复文本的输出路径，默认为 `recovered_<名称>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    #[arg(short, long)]
    pub force: bool,
}

/// 'hide-image' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideImageArgs {
    /// 载体图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的水印图像文件路径。
    #[arg(short, long)]
    pub watermark: PathBuf,

    /// 结果图像的输出路径，默认为 `doctored_<名称>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 水印过大时自动按比例缩小。
    #[arg(long)]
    pub fit: bool,

    #[arg(short, long)]
    pub force: bool,
}

/// 'reveal-image' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RevealImageArgs {
    /// 已隐藏水印的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复出的水印输出路径，默认为 `recovered_<名称>.png`。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(short, long)]
    pub force: bool,
}

/// 'diff' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// 原始图像。
    #[arg(short = 'a', long)]
    pub original: PathBuf,

    /// 隐写后的图像。
    #[arg(short = 'b', long)]
    pub modified: PathBuf,

    /// 差异图的输出路径，默认为 `diff_<名称>.png`。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(short, long)]
    pub force: bool,
}
