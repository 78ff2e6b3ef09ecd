// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

pub(crate) mod remover;

use crate::domain::locators::CacheRootResolver;
use crate::domain::matching::CacheEntriesMatcher;
use crate::domain::models::{
    CleanupResults, MatchedEntry, PackageSpecifier, RemovalOutcome, RemovalStatus, SkipReason, SkippedSpecifier,
};
use crate::infra::caching::YarnCache;
use crate::infra::cli::reporter::{CleanupNotice, Reporter};
use remover::CacheEntryRemover;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::{Id, JoinSet};

struct PackageCleanup {
    removals: Vec<RemovalOutcome>,
    skipped: Option<SkippedSpecifier>,
}

impl PackageCleanup {
    fn skipped(specifier: String, reason: SkipReason) -> Self {
        Self {
            removals: vec![],
            skipped: Some(SkippedSpecifier { specifier, reason }),
        }
    }
}

/// Scans, matches and removes the cache entries of a single requested package
struct PackageCleaner {
    matcher: CacheEntriesMatcher,
    remover: CacheEntryRemover,
    reporter: Arc<Reporter>,
}

impl PackageCleaner {
    async fn cleanup(self: Arc<Self>, raw_specifier: String) -> PackageCleanup {
        let specifier = PackageSpecifier::from(raw_specifier.as_str());

        if !specifier.is_usable() {
            log::warn!("[yacr.orchestrator] cannot parse '{}'", raw_specifier);
            return self.skip(raw_specifier, SkipReason::Unparsable);
        }

        let matcher = self.matcher.clone();
        let scanning = specifier.clone();
        let scan = tokio::task::spawn_blocking(move || {
            matcher
                .find_matches(&scanning)
                .map(|matches| matches.collect::<Vec<_>>())
        })
        .await;

        let matches = match scan {
            Ok(Ok(matches)) => matches,
            Ok(Err(e)) => return self.skip(raw_specifier, SkipReason::ScanFailed(e.to_string())),
            Err(e) => return self.skip(raw_specifier, SkipReason::ScanFailed(e.to_string())),
        };

        log::info!("[yacr.orchestrator] {} entries matched for {}", matches.len(), specifier);

        let mut removals = JoinSet::new();
        let mut dispatched: HashMap<Id, MatchedEntry> = HashMap::new();

        for entry in matches {
            let cleaner = self.clone();
            let requested = raw_specifier.clone();
            let removing = entry.clone();
            let handle = removals.spawn(async move { cleaner.remover.remove(requested, removing).await });
            dispatched.insert(handle.id(), entry);
        }

        let mut outcomes = Vec::with_capacity(dispatched.len());
        while let Some(joined) = removals.join_next_with_id().await {
            match joined {
                Ok((_, outcome)) => outcomes.push(outcome),
                Err(e) => {
                    log::error!("[yacr.orchestrator] removal task failed : {}", e);
                    if let Some(entry) = dispatched.remove(&e.id()) {
                        outcomes.push(RemovalOutcome {
                            specifier: raw_specifier.clone(),
                            entry,
                            status: RemovalStatus::Failed(e.to_string()),
                        });
                    }
                },
            }
        }

        PackageCleanup {
            removals: outcomes,
            skipped: None,
        }
    }

    fn skip(&self, specifier: String, reason: SkipReason) -> PackageCleanup {
        self.reporter.report(CleanupNotice::Skipped {
            specifier: specifier.clone(),
            reason: reason.clone(),
        });
        PackageCleanup::skipped(specifier, reason)
    }
}

pub struct Yacr {
    resolver: CacheRootResolver,
    reporter: Arc<Reporter>,
}

impl Yacr {
    pub(crate) fn new(resolver: CacheRootResolver, reporter: Arc<Reporter>) -> Self {
        Self { resolver, reporter }
    }

    /// Removes from the cache every entry matching one of `packages`.
    ///
    /// Packages are processed concurrently and independently: a package that cannot be
    /// parsed or scanned, or an entry that cannot be removed, never stops the others.
    /// Returns once every dispatched removal has settled, with outcomes in the order
    /// packages were given.
    pub async fn execute(self, packages: Vec<String>) -> CleanupResults {
        self.reporter.report_started();

        let Some(cache_root) = self.resolver.resolve() else {
            self.reporter.report(CleanupNotice::CacheUnresolved);
            return CleanupResults::unresolved();
        };

        let cache = YarnCache::new(cache_root.clone());
        let cleaner = Arc::new(PackageCleaner {
            matcher: CacheEntriesMatcher::new(cache.clone()),
            remover: CacheEntryRemover::new(cache, self.reporter.clone()),
            reporter: self.reporter.clone(),
        });

        let mut cleanups = JoinSet::new();
        let mut dispatched: HashMap<Id, (usize, String)> = HashMap::new();

        for (position, raw_specifier) in packages.into_iter().enumerate() {
            let handle = cleanups.spawn(cleaner.clone().cleanup(raw_specifier.clone()));
            dispatched.insert(handle.id(), (position, raw_specifier));
        }

        let mut settled = Vec::with_capacity(dispatched.len());
        while let Some(joined) = cleanups.join_next_with_id().await {
            match joined {
                Ok((id, cleanup)) => {
                    if let Some((position, _)) = dispatched.remove(&id) {
                        settled.push((position, cleanup));
                    }
                },
                Err(e) => {
                    log::error!("[yacr.orchestrator] cleanup task failed : {}", e);
                    if let Some((position, raw_specifier)) = dispatched.remove(&e.id()) {
                        let cleanup = cleaner.skip(raw_specifier, SkipReason::ScanFailed(e.to_string()));
                        settled.push((position, cleanup));
                    }
                },
            }
        }

        settled.sort_by_key(|(position, _)| *position);

        let mut results = CleanupResults {
            cache_root: Some(cache_root),
            ..CleanupResults::default()
        };

        for (_, cleanup) in settled {
            results.removals.extend(cleanup.removals);
            results.skipped.extend(cleanup.skipped);
        }

        self.reporter.report_finished(&results);
        results
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::locators::{CacheRootLocator, CacheRootResolver};
    use crate::domain::models::{CleanupResults, RemovalStatus, SkipReason, SkippedSpecifier};
    use crate::infra::cli::reporter::{CleanupNotice, Reporter};
    use crate::yacr::Yacr;
    use assertor::{BooleanAssertion, EqualityAssertion};
    use std::fs;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use temp_dir::TempDir;

    fn cache_entry(parent: &Path, dir_name: &str, name: &str, version: &str) {
        let entry_dir = parent.join(dir_name);
        fs::create_dir_all(&entry_dir).expect("failed to create cache entry");
        let manifest = format!(r#"{{"name":"{}","version":"{}"}}"#, name, version);
        fs::write(entry_dir.join("package.json"), manifest).expect("failed to write manifest");
    }

    fn yarn_cache() -> TempDir {
        let cache_root = TempDir::new().expect("Cant create temp dir");
        let root = cache_root.path();
        cache_entry(root, "npm-leftpad-1.0.0", "leftpad", "1.0.0");
        cache_entry(root, "npm-leftpad-2.0.0", "leftpad", "2.0.0");
        cache_entry(root, "npm-leftpad-extra-1.0.0", "leftpad-extra", "1.0.0");
        cache_entry(root, "npm-rightpad-3.1.0", "rightpad", "3.1.0");
        cache_entry(&root.join("npm-@myorg"), "npm-myorg-widget-1.0.0", "@myorg/widget", "1.0.0");
        cache_root
    }

    fn recording_reporter() -> Arc<Reporter> {
        Arc::new(Reporter::Recording(Mutex::new(vec![])))
    }

    fn yacr(cache_root: Option<&Path>, reporter: Arc<Reporter>) -> Yacr {
        let discovered = cache_root.map(|root| root.to_string_lossy().to_string());
        let resolver = CacheRootResolver::new(None, CacheRootLocator::FakeYarn(discovered));
        Yacr::new(resolver, reporter)
    }

    fn packages(raw_specifiers: &[&str]) -> Vec<String> {
        raw_specifiers.iter().map(|raw| raw.to_string()).collect()
    }

    fn removed_dirs(results: &CleanupResults) -> Vec<String> {
        let mut dir_names = results
            .removals
            .iter()
            .filter(|outcome| outcome.status == RemovalStatus::Removed)
            .map(|outcome| outcome.entry.dir_name.clone())
            .collect::<Vec<_>>();
        dir_names.sort();
        dir_names
    }

    #[tokio::test]
    async fn should_remove_only_requested_version() {
        let cache_root = yarn_cache();
        let reporter = recording_reporter();

        let results = yacr(Some(cache_root.path()), reporter.clone())
            .execute(packages(&["leftpad@1.0.0"]))
            .await;

        assertor::assert_that!(removed_dirs(&results)).is_equal_to(vec!["npm-leftpad-1.0.0".to_string()]);
        assertor::assert_that!(cache_root.path().join("npm-leftpad-1.0.0").exists()).is_false();
        assertor::assert_that!(cache_root.path().join("npm-leftpad-2.0.0").exists()).is_true();
        assertor::assert_that!(cache_root.path().join("npm-leftpad-extra-1.0.0").exists()).is_true();
        assertor::assert_that!(reporter.recorded().len()).is_equal_to(1);
    }

    #[tokio::test]
    async fn should_remove_every_version_when_unversioned() {
        let cache_root = yarn_cache();

        let results = yacr(Some(cache_root.path()), recording_reporter())
            .execute(packages(&["leftpad"]))
            .await;

        let expected = vec!["npm-leftpad-1.0.0".to_string(), "npm-leftpad-2.0.0".to_string()];
        assertor::assert_that!(removed_dirs(&results)).is_equal_to(expected);
        assertor::assert_that!(cache_root.path().join("npm-leftpad-extra-1.0.0").exists()).is_true();
        assertor::assert_that!(cache_root.path().join("npm-rightpad-3.1.0").exists()).is_true();
    }

    #[tokio::test]
    async fn should_remove_scoped_package() {
        let cache_root = yarn_cache();
        let entry_dir = cache_root.path().join("npm-@myorg").join("npm-myorg-widget-1.0.0");

        let unknown = yacr(Some(cache_root.path()), recording_reporter())
            .execute(packages(&["@myorg/widget@9.9.9"]))
            .await;

        assertor::assert_that!(unknown.removals.is_empty()).is_true();
        assertor::assert_that!(entry_dir.exists()).is_true();

        let known = yacr(Some(cache_root.path()), recording_reporter())
            .execute(packages(&["@myorg/widget@1.0.0"]))
            .await;

        assertor::assert_that!(removed_dirs(&known)).is_equal_to(vec!["npm-myorg-widget-1.0.0".to_string()]);
        assertor::assert_that!(entry_dir.exists()).is_false();
    }

    #[tokio::test]
    async fn should_skip_unparsable_packages_and_keep_going() {
        let cache_root = yarn_cache();
        let reporter = recording_reporter();

        let results = yacr(Some(cache_root.path()), reporter.clone())
            .execute(packages(&["", "rightpad"]))
            .await;

        let expected_skipped = vec![SkippedSpecifier {
            specifier: String::new(),
            reason: SkipReason::Unparsable,
        }];

        assertor::assert_that!(results.skipped).is_equal_to(expected_skipped);
        assertor::assert_that!(removed_dirs(&results)).is_equal_to(vec!["npm-rightpad-3.1.0".to_string()]);

        let unparsable_notice = CleanupNotice::Skipped {
            specifier: String::new(),
            reason: SkipReason::Unparsable,
        };
        assertor::assert_that!(reporter.recorded().contains(&unparsable_notice)).is_true();
    }

    #[tokio::test]
    async fn should_skip_packages_with_missing_scope_folder() {
        let cache_root = yarn_cache();

        let results = yacr(Some(cache_root.path()), recording_reporter())
            .execute(packages(&["@ghost/widget", "leftpad@2.0.0"]))
            .await;

        let scan_failed = matches!(results.skipped[0].reason, SkipReason::ScanFailed(_));
        assertor::assert_that!(scan_failed).is_true();
        assertor::assert_that!(results.skipped[0].specifier.clone()).is_equal_to("@ghost/widget".to_string());
        assertor::assert_that!(removed_dirs(&results)).is_equal_to(vec!["npm-leftpad-2.0.0".to_string()]);
    }

    #[tokio::test]
    async fn should_keep_outcomes_in_requested_order() {
        let cache_root = yarn_cache();

        let results = yacr(Some(cache_root.path()), recording_reporter())
            .execute(packages(&["rightpad", "leftpad-extra", "leftpad@2.0.0"]))
            .await;

        let specifiers = results
            .removals
            .iter()
            .map(|outcome| outcome.specifier.as_str())
            .collect::<Vec<_>>();

        assertor::assert_that!(specifiers).is_equal_to(vec!["rightpad", "leftpad-extra", "leftpad@2.0.0"]);
    }

    #[tokio::test]
    async fn should_do_nothing_when_cache_folder_is_unknown() {
        let cache_root = yarn_cache();
        let reporter = recording_reporter();

        let results = yacr(None, reporter.clone()).execute(packages(&["leftpad"])).await;

        assertor::assert_that!(results).is_equal_to(CleanupResults::unresolved());
        assertor::assert_that!(reporter.recorded()).is_equal_to(vec![CleanupNotice::CacheUnresolved]);
        assertor::assert_that!(cache_root.path().join("npm-leftpad-1.0.0").exists()).is_true();
    }

    #[tokio::test]
    async fn should_do_nothing_when_yarn_reports_empty_cache_folder() {
        let reporter = recording_reporter();
        let resolver = CacheRootResolver::new(None, CacheRootLocator::FakeYarn(Some(String::new())));

        let results = Yacr::new(resolver, reporter.clone()).execute(packages(&["leftpad"])).await;

        assertor::assert_that!(results.removals.is_empty()).is_true();
        assertor::assert_that!(reporter.recorded()).is_equal_to(vec![CleanupNotice::CacheUnresolved]);
    }

    #[tokio::test]
    async fn should_prefer_explicit_cache_folder_over_yarn() {
        let cache_root = yarn_cache();
        let resolver = CacheRootResolver::new(
            Some(cache_root.path().to_path_buf()),
            CacheRootLocator::FakeYarn(None),
        );

        let results = Yacr::new(resolver, recording_reporter())
            .execute(packages(&["rightpad@3.1.0"]))
            .await;

        assertor::assert_that!(removed_dirs(&results)).is_equal_to(vec!["npm-rightpad-3.1.0".to_string()]);
    }
}
