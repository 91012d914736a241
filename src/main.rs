use clap::Parser;

use lsb_vault::{
    cli::{Cli, Commands},
    handler::{
        handle_capacity, handle_diff, handle_hide_image, handle_hide_text, handle_reveal_image,
        handle_reveal_text,
    },
};

/// 程序的主入口点
///
/// 初始化日志 (默认 `info` 级别，可通过 `RUST_LOG` 覆盖)，解析命令行参数，
/// 并根据子命令将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 解析命令行参数
    let cli = Cli::parse();

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Capacity(args) => handle_capacity(args),
        Commands::HideText(args) => handle_hide_text(args),
        Commands::RevealText(args) => handle_reveal_text(args),
        Commands::HideImage(args) => handle_hide_image(args),
        Commands::RevealImage(args) => handle_reveal_image(args),
        Commands::Diff(args) => handle_diff(args),
    }
}
