//! Indenta CLI - reindent HTML, script and style sheet files.
//! Indenta CLI - 重新缩进 HTML、脚本和样式表文件。

mod commands;
mod config;
mod error;
mod logger;
mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use commands::{Job, Lang, LineRange};
use config::Overrides;
use error::CliError;

/// Main CLI structure.
/// 主 CLI 结构体。
#[derive(Parser)]
#[command(name = "indenta")]
#[command(author, version, about = "Indenta - indentation for mixed-language documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Columns per indentation level. / 每级缩进的列数。
    #[arg(long, global = true)]
    indent_width: Option<usize>,

    /// Tab stop width. / 制表符宽度。
    #[arg(long, global = true)]
    tab_size: Option<usize>,

    /// Indent with tabs. / 使用制表符缩进。
    #[arg(long, global = true)]
    use_tabs: bool,

    /// JSON config file. / JSON 配置文件。
    #[arg(long, global = true, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Fail on offset errors instead of skipping the file.
    #[arg(long, global = true)]
    strict: bool,

    /// Enable verbose output. / 启用详细输出。
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log every line's indent commands. / 记录每行的缩进命令。
    #[arg(long, global = true)]
    trace: bool,

    /// Suppress output. / 抑制输出。
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Available CLI commands.
/// 可用的 CLI 命令。
#[derive(Subcommand)]
enum Commands {
    /// Reindent a file. / 重新缩进文件。
    Indent {
        #[command(flatten)]
        target: Target,

        /// Write changes to the file. / 将更改写入文件。
        #[arg(short, long)]
        write: bool,

        /// Only reindent lines A to B (1-based, inclusive).
        #[arg(long, value_name = "A:B")]
        lines: Option<LineRange>,

        /// Empty blank lines in a line range too.
        #[arg(long)]
        reformat: bool,
    },

    /// Check if a file is indented. / 检查文件是否已缩进。
    Check {
        #[command(flatten)]
        target: Target,
    },
}

#[derive(Args)]
struct Target {
    /// The file to process. / 要处理的文件。
    file: PathBuf,

    /// Language of the file, if the extension does not tell.
    #[arg(long, value_enum)]
    lang: Option<Lang>,
}

/// Main entry point.
/// 主入口点。
fn main() {
    let cli = Cli::parse();
    logger::init(logger::level_for(cli.quiet, cli.verbose, cli.trace));

    if let Err(e) = run(&cli) {
        if !cli.quiet {
            output::error(&e.to_string());
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let overrides = Overrides {
        indent_width: cli.indent_width,
        tab_size: cli.tab_size,
        use_tabs: cli.use_tabs,
        strict: cli.strict,
    };
    let config = config::load(cli.config.as_deref(), &overrides)?;

    match &cli.command {
        Commands::Indent {
            target,
            write,
            lines,
            reformat,
        } => {
            let job = Job {
                lang: target.lang,
                lines: *lines,
                reformat: *reformat,
                timings: cli.verbose || cli.trace,
            };
            commands::indent::run(&target.file, &job, &config, *write, cli.quiet)
        }
        Commands::Check { target } => {
            let job = Job {
                lang: target.lang,
                timings: cli.verbose || cli.trace,
                ..Job::default()
            };
            commands::check::run(&target.file, &job, &config, cli.quiet)
        }
    }
}
