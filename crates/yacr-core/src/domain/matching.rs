// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::models::{MatchedEntry, PackageManifest, PackageSpecifier};
use crate::infra::caching::YarnCache;

static SCOPED_REPO_TYPE: &str = "npm";

/// Finds cache entries holding a given package.
///
/// Entry names are cheap to list but manifests are not, so entries are first
/// narrowed by a prefix check on their names, and only the survivors get their
/// `package.json` read and compared exactly.
#[derive(Clone, Debug)]
pub struct CacheEntriesMatcher {
    cache: YarnCache,
}

impl CacheEntriesMatcher {
    pub fn new(cache: YarnCache) -> Self {
        Self { cache }
    }

    pub fn find_matches(
        &self,
        specifier: &PackageSpecifier,
    ) -> anyhow::Result<impl Iterator<Item = MatchedEntry> + use<>> {
        let search_dir = self.cache.search_dir(specifier.scope.as_deref());
        log::info!("[yacr.scanner] looking for {} at {:?}", specifier, search_dir);

        let cache = self.cache.clone();
        let prefiltering = specifier.clone();
        let target = specifier.clone();

        let matches = self
            .cache
            .list_entries(&search_dir)?
            .filter(move |(dir_name, _)| is_candidate(&prefiltering, dir_name))
            .filter_map(move |(dir_name, path)| {
                let manifest = cache.read_manifest(&path);
                if !is_exact_match(&target, &manifest) {
                    log::info!("[yacr.scanner] {} rejected for {}", dir_name, target);
                    return None;
                }

                log::info!("[yacr.scanner] {} matches {}", dir_name, target);
                Some(MatchedEntry {
                    path,
                    dir_name,
                    manifest,
                })
            });

        Ok(matches)
    }
}

/// Name of the cached package as encoded in its entry folder name.
///
/// Unscoped entries look like `npm-leftpad-1.0.0`, so the leading repo type is dropped.
/// Scoped entries live in their own scope folder and are kept as they are, minus an
/// optional `npm-<scope>-` prefix.
pub fn derived_name<'a>(dir_name: &'a str, scope: Option<&str>) -> &'a str {
    match scope {
        Some(scope) => {
            let prefix = format!("{}-{}-", SCOPED_REPO_TYPE, scope);
            dir_name.strip_prefix(prefix.as_str()).unwrap_or(dir_name)
        },
        None => dir_name.split_once('-').map(|(_, rest)| rest).unwrap_or_default(),
    }
}

pub fn is_candidate(specifier: &PackageSpecifier, dir_name: &str) -> bool {
    derived_name(dir_name, specifier.scope.as_deref()).starts_with(specifier.name.as_str())
}

pub fn is_exact_match(specifier: &PackageSpecifier, manifest: &PackageManifest) -> bool {
    let same_name = manifest.name == specifier.full_name();
    let same_version = specifier
        .version
        .as_ref()
        .is_none_or(|version| *version == manifest.version);
    same_name && same_version
}
