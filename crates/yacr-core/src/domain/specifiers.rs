// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::models::PackageSpecifier;
use regex::Regex;
use std::sync::LazyLock;

static PACKAGE_SPECIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^@[^/]+/)?([^@]+)@?(.*)").expect("invalid package specifier pattern"));

impl From<&str> for PackageSpecifier {
    fn from(raw: &str) -> Self {
        let Some(captures) = PACKAGE_SPECIFIER.captures(raw) else {
            return PackageSpecifier::default();
        };

        let scope = captures
            .get(1)
            .map(|found| found.as_str().trim_start_matches('@').trim_end_matches('/'))
            .filter(|scope| !scope.is_empty());

        let name = captures.get(2).map(|found| found.as_str()).unwrap_or_default();

        let version = captures
            .get(3)
            .map(|found| found.as_str())
            .filter(|version| !version.is_empty());

        PackageSpecifier::with(scope, name, version)
    }
}
