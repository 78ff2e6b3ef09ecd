// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::models::PackageManifest;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

static SCOPE_FOLDER_PREFIX: &str = "npm-@";
static MANIFEST_FILE_NAME: &str = "package.json";

/// Filesystem access to a yarn cache root
#[derive(Clone, Debug)]
pub struct YarnCache {
    cache_root: PathBuf,
}

impl YarnCache {
    pub fn new(cache_root: PathBuf) -> Self {
        Self { cache_root }
    }

    pub fn root(&self) -> &Path {
        self.cache_root.as_path()
    }

    pub fn search_dir(&self, scope: Option<&str>) -> PathBuf {
        match scope {
            Some(scope) => self.cache_root.join(format!("{}{}", SCOPE_FOLDER_PREFIX, scope)),
            None => self.cache_root.clone(),
        }
    }

    /// Lists the immediate children of `search_dir`, lazily.
    ///
    /// Children that cannot be read, or whose names are not valid UTF-8,
    /// are skipped.
    pub fn list_entries(&self, search_dir: &Path) -> anyhow::Result<impl Iterator<Item = (String, PathBuf)> + use<>> {
        let listing = std::fs::read_dir(search_dir)?;

        let entries = listing.filter_map(|maybe_entry| {
            let entry = match maybe_entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("[yacr.cache] cannot read cache entry : {}", e);
                    return None;
                },
            };

            let path = entry.path();
            match entry.file_name().into_string() {
                Ok(dir_name) => Some((dir_name, path)),
                Err(_) => {
                    log::warn!("[yacr.cache] skipping non UTF-8 entry {:?}", path);
                    None
                },
            }
        });

        Ok(entries)
    }

    pub fn read_manifest(&self, entry_dir: &Path) -> PackageManifest {
        let manifest_file = entry_dir.join(MANIFEST_FILE_NAME);

        let contents = match std::fs::read_to_string(&manifest_file) {
            Ok(contents) => contents,
            Err(e) => {
                log::debug!("[yacr.cache] cannot read {:?} : {}", manifest_file, e);
                return PackageManifest::default();
            },
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            log::debug!("[yacr.cache] cannot parse {:?} : {}", manifest_file, e);
            PackageManifest::default()
        })
    }

    /// Recursively removes a cache entry. An entry already gone counts as removed.
    pub async fn remove_entry(&self, entry_dir: &Path) -> anyhow::Result<()> {
        match tokio::fs::remove_dir_all(entry_dir).await {
            Ok(_) => {
                log::info!("[yacr.cache] removed {:?}", entry_dir);
                Ok(())
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("[yacr.cache] {:?} already gone", entry_dir);
                Ok(())
            },
            Err(e) => {
                log::error!("[yacr.cache] cannot remove {:?} : {}", entry_dir, e);
                Err(e.into())
            },
        }
    }
}
