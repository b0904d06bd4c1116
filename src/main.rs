use clap::Parser;
use env_logger::Env;

use pixel_stow::{
    cli::{Cli, Commands},
    handler::{handle_embed, handle_extract, handle_inspect},
};

/// 程序的主入口点
///
/// 初始化日志 (默认级别 `warn`，可通过 `RUST_LOG` 覆盖)，解析命令行参数，
/// 并根据指定的子命令将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    // 解析命令行参数
    let cli = Cli::parse();

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Embed(args) => handle_embed(args),
        Commands::Extract(args) => handle_extract(args),
        Commands::Inspect(args) => handle_inspect(args),
    }
}
