// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

pub trait CacheRootDiscovery {
    fn discover(&self) -> anyhow::Result<String>;
}
