// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// A package requested for removal, as in `@scope/name@version`.
///
/// The scope is kept bare, without the leading `@` and the trailing `/`.
/// An empty name means the raw input could not be parsed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PackageSpecifier {
    pub scope: Option<String>,
    pub name: String,
    pub version: Option<String>,
}

impl PackageSpecifier {
    pub fn with(scope: Option<&str>, name: &str, version: Option<&str>) -> Self {
        Self {
            scope: scope.map(|value| value.to_string()),
            name: name.to_string(),
            version: version.map(|value| value.to_string()),
        }
    }

    pub fn is_usable(&self) -> bool {
        !self.name.is_empty()
    }

    /// The name a matching manifest must declare, like `@myorg/widget`
    pub fn full_name(&self) -> String {
        match &self.scope {
            Some(scope) => format!("@{}/{}", scope, self.name),
            None => self.name.clone(),
        }
    }
}

impl Display for PackageSpecifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(version) => f.write_fmt(format_args!("{}@{}", self.full_name(), version)),
            None => f.write_str(&self.full_name()),
        }
    }
}

/// The `package.json` stored inside a cache entry.
///
/// Missing fields decode as empty strings, so that unrelated or broken
/// entries just fail the exact match instead of aborting a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

impl PackageManifest {
    pub fn with(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchedEntry {
    pub path: PathBuf,
    pub dir_name: String,
    pub manifest: PackageManifest,
}

impl Display for MatchedEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "{}@{} ({})",
            self.manifest.name, self.manifest.version, self.dir_name
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemovalStatus {
    Removed,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemovalOutcome {
    pub specifier: String,
    pub entry: MatchedEntry,
    pub status: RemovalStatus,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Unparsable,
    ScanFailed(String),
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Unparsable => f.write_str("could not parse package name"),
            SkipReason::ScanFailed(reason) => f.write_fmt(format_args!("could not scan cache ({})", reason)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedSpecifier {
    pub specifier: String,
    pub reason: SkipReason,
}

#[derive(Clone, Debug, Default)]
pub struct CleanupOptions {
    pub silent: bool,
    pub use_colors: bool,
    /// Explicit cache root, bypassing yarn
    pub cache_dir: Option<PathBuf>,
    /// Forwarded as `yarn cache dir --cache-folder`
    pub yarn_cache_folder: Option<String>,
}

/// Everything that happened during a single cleanup run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanupResults {
    pub cache_root: Option<PathBuf>,
    pub removals: Vec<RemovalOutcome>,
    pub skipped: Vec<SkippedSpecifier>,
}

impl CleanupResults {
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn removed_count(&self) -> usize {
        self.removals
            .iter()
            .filter(|outcome| outcome.status == RemovalStatus::Removed)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.removals.len() - self.removed_count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }
}
