// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::models::CleanupOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Clean up yarn cache like a boss", long_about = None)]
#[command(override_usage = "yacr [OPTIONS] <PACKAGES>...\n       yacr package1 package2@version @scope/package@version")]
struct CliParser {
    /// Packages to remove from cache : `name`, `name@version`, `@scope/name` or `@scope/name@version`
    #[arg(required = true, num_args = 1..)]
    pub packages: Vec<String>,

    /// Cache folder to clean, instead of asking yarn where it lives
    #[arg(long, value_name = "PATH")]
    pub cache_folder: Option<PathBuf>,

    /// Forwarded to `yarn cache dir --cache-folder` when locating the cache
    #[arg(long, value_name = "PATH", conflicts_with = "cache_folder")]
    pub yarn_cache_folder: Option<String>,

    /// Print nothing but errors from the shell
    #[arg(short, long)]
    pub silent: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_colors: bool,

    /// Log what happens behind the scenes
    #[arg(short, long)]
    pub verbose: bool,
}

pub struct Invocation {
    pub packages: Vec<String>,
    pub options: CleanupOptions,
    pub verbose: bool,
}

impl From<CliParser> for Invocation {
    fn from(cli: CliParser) -> Self {
        let options = CleanupOptions {
            silent: cli.silent,
            use_colors: !cli.no_colors,
            cache_dir: cli.cache_folder,
            yarn_cache_folder: cli.yarn_cache_folder,
        };

        Self {
            packages: cli.packages,
            options,
            verbose: cli.verbose,
        }
    }
}

pub fn parse_arguments() -> Invocation {
    Invocation::from(CliParser::parse())
}
