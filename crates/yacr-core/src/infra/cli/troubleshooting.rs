// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use log::LevelFilter;

/// Installs panic handlers and logging. `RUST_LOG` is honoured in any case;
/// `verbose` additionally surfaces what yacr-core is doing.
pub fn setup_troubleshooting(verbose: bool) {
    better_panic::install();
    human_panic::setup_panic!();

    let mut logging = env_logger::builder();

    if verbose {
        logging.filter_module("yacr_core", LevelFilter::Info);
    }

    logging
        .format_timestamp(None)
        .format_module_path(false)
        .format_level(false)
        .format_file(false)
        .format_target(false)
        .init();
}
