// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::interfaces::CacheRootDiscovery;
use crate::infra::yarn::YarnCacheDirCommand;
#[cfg(test)]
use anyhow::bail;
use std::path::PathBuf;

pub enum CacheRootLocator {
    YarnCli(YarnCacheDirCommand),
    #[cfg(test)]
    FakeYarn(Option<String>),
}

impl CacheRootDiscovery for CacheRootLocator {
    fn discover(&self) -> anyhow::Result<String> {
        match self {
            CacheRootLocator::YarnCli(delegate) => delegate.discover(),
            #[cfg(test)]
            CacheRootLocator::FakeYarn(maybe_dir) => match maybe_dir {
                Some(dir) => Ok(dir.clone()),
                None => bail!("couldn't run `yarn cache dir` to locate the cache"),
            },
        }
    }
}

/// Decides which folder holds the yarn cache.
///
/// An explicit folder always wins over asking yarn, and relative folders are
/// resolved against the current working directory.
pub struct CacheRootResolver {
    explicit_dir: Option<PathBuf>,
    locator: CacheRootLocator,
}

impl CacheRootResolver {
    pub fn new(explicit_dir: Option<PathBuf>, locator: CacheRootLocator) -> Self {
        Self { explicit_dir, locator }
    }

    pub fn resolve(&self) -> Option<PathBuf> {
        let cache_root = match &self.explicit_dir {
            Some(explicit_dir) => explicit_dir.clone(),
            None => match self.locator.discover() {
                Ok(discovered) => PathBuf::from(discovered),
                Err(e) => {
                    log::error!("[yacr.locator] cannot discover cache folder : {}", e);
                    return None;
                },
            },
        };

        if cache_root.as_os_str().is_empty() {
            log::error!("[yacr.locator] empty cache folder location");
            return None;
        }

        match std::path::absolute(&cache_root) {
            Ok(resolved) => {
                log::info!("[yacr.locator] using cache folder {:?}", resolved);
                Some(resolved)
            },
            Err(e) => {
                log::error!("[yacr.locator] cannot resolve {:?} : {}", cache_root, e);
                None
            },
        }
    }
}
