// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::interfaces::CacheRootDiscovery;
use anyhow::bail;
use std::process::Command;

/// Asks yarn where its cache lives, through `yarn cache dir`
pub struct YarnCacheDirCommand {
    cache_folder: Option<String>,
}

impl YarnCacheDirCommand {
    pub fn new(cache_folder: Option<String>) -> Self {
        Self { cache_folder }
    }

    fn arguments(&self) -> Vec<&str> {
        let mut arguments = vec!["cache", "dir"];
        if let Some(folder) = &self.cache_folder {
            arguments.extend(["--cache-folder", folder.as_str()]);
        }
        arguments
    }
}

impl CacheRootDiscovery for YarnCacheDirCommand {
    fn discover(&self) -> anyhow::Result<String> {
        let arguments = self.arguments();
        log::info!("[yacr.locator] running yarn {}", arguments.join(" "));

        let yarn_cache_dir = Command::new("yarn").args(&arguments).output();

        match yarn_cache_dir {
            Ok(output) => {
                if !output.status.success() {
                    log::error!("yarn cache dir failed: {:?}", output.status);
                    bail!("error when running `yarn {}`", arguments.join(" "))
                }

                let stdout = String::from_utf8_lossy(&output.stdout);
                Ok(stdout.trim().to_string())
            },
            Err(e) => {
                log::error!("yarn cache dir failed: {}", e);
                bail!("couldn't run `yarn {}` to locate the cache", arguments.join(" "))
            },
        }
    }
}
