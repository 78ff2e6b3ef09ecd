// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use anyhow::bail;
use tikv_jemallocator::Jemalloc;
use yacr_core::factory;
use yacr_core::infra::cli;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let invocation = cli::parsing::parse_arguments();
    cli::troubleshooting::setup_troubleshooting(invocation.verbose);

    let yacr = factory::create_yacr(invocation.options);
    let results = yacr.execute(invocation.packages).await;

    if results.has_failures() {
        bail!("yacr.cli : could not remove {} cached entries", results.failed_count())
    }

    Ok(())
}
