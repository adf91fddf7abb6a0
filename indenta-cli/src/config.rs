//! Configuration loading: a JSON file with command-line overrides on top.
//! 配置加载：JSON 文件，命令行参数覆盖其上。

use std::fs;
use std::path::Path;

use indenta_engine::IndentConfig;

use crate::error::CliError;

/// Settings given on the command line. `None` keeps the file's value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub indent_width: Option<usize>,
    pub tab_size: Option<usize>,
    pub use_tabs: bool,
    pub strict: bool,
}

/// Read `path` (if any) and apply `overrides`.
pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<IndentConfig, CliError> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            parse(&text).map_err(|source| CliError::Config {
                path: path.to_path_buf(),
                source,
            })?
        }
        None => IndentConfig::default(),
    };
    Ok(apply(config, overrides))
}

fn parse(text: &str) -> Result<IndentConfig, serde_json::Error> {
    serde_json::from_str(text)
}

fn apply(mut config: IndentConfig, overrides: &Overrides) -> IndentConfig {
    if let Some(width) = overrides.indent_width {
        config = config.indent_width(width);
    }
    if let Some(size) = overrides.tab_size {
        config = config.tab_size(size);
    }
    if overrides.use_tabs {
        config = config.use_tabs(true);
    }
    if overrides.strict {
        config = config.strict(true);
    }
    config
}
