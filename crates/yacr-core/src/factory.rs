// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::locators::{CacheRootLocator, CacheRootResolver};
use crate::domain::models::CleanupOptions;
use crate::infra::cli::reporter::{ConsoleReporter, Reporter};
use crate::infra::yarn::YarnCacheDirCommand;
use crate::yacr::Yacr;
use std::sync::Arc;

fn cache_root_resolver(options: &CleanupOptions) -> CacheRootResolver {
    let yarn = YarnCacheDirCommand::new(options.yarn_cache_folder.clone());
    CacheRootResolver::new(options.cache_dir.clone(), CacheRootLocator::YarnCli(yarn))
}

fn console_reporter(options: &CleanupOptions) -> Arc<Reporter> {
    let console = ConsoleReporter::new(options.use_colors, options.silent);
    Arc::new(Reporter::Console(console))
}

pub fn create_yacr(options: CleanupOptions) -> Yacr {
    Yacr::new(cache_root_resolver(&options), console_reporter(&options))
}
