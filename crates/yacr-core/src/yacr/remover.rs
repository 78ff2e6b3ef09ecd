// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::models::{MatchedEntry, RemovalOutcome, RemovalStatus};
use crate::infra::caching::YarnCache;
use crate::infra::cli::reporter::{CleanupNotice, Reporter};
use std::sync::Arc;

pub(crate) struct CacheEntryRemover {
    cache: YarnCache,
    reporter: Arc<Reporter>,
}

impl CacheEntryRemover {
    pub fn new(cache: YarnCache, reporter: Arc<Reporter>) -> Self {
        Self { cache, reporter }
    }

    pub async fn remove(&self, specifier: String, entry: MatchedEntry) -> RemovalOutcome {
        self.reporter.report(CleanupNotice::Removing(entry.clone()));

        let status = match self.cache.remove_entry(&entry.path).await {
            Ok(_) => RemovalStatus::Removed,
            Err(e) => {
                let reason = e.to_string();
                self.reporter.report(CleanupNotice::RemovalFailed {
                    entry: entry.clone(),
                    reason: reason.clone(),
                });
                RemovalStatus::Failed(reason)
            },
        };

        RemovalOutcome {
            specifier,
            entry,
            status,
        }
    }
}
