// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::models::{CleanupResults, MatchedEntry, RemovalStatus, SkipReason};
use comfy_table::Table;
use console::{StyledObject, style};
use std::fmt::{Display, Formatter};
#[cfg(test)]
use std::sync::Mutex;

/// Something worth telling the user while a cleanup runs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CleanupNotice {
    CacheUnresolved,
    Skipped { specifier: String, reason: SkipReason },
    Removing(MatchedEntry),
    RemovalFailed { entry: MatchedEntry, reason: String },
}

impl CleanupNotice {
    fn is_diagnostic(&self) -> bool {
        !matches!(self, CleanupNotice::Removing(_))
    }
}

impl Display for CleanupNotice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanupNotice::CacheUnresolved => f.write_str("Could not get yarn cache directory location."),
            CleanupNotice::Skipped { specifier, reason } => match reason {
                SkipReason::Unparsable => f.write_fmt(format_args!("Could not parse package name '{}'", specifier)),
                SkipReason::ScanFailed(_) => f.write_fmt(format_args!("Skipping {} : {}", specifier, reason)),
            },
            CleanupNotice::Removing(entry) => f.write_fmt(format_args!("Removing {}", entry)),
            CleanupNotice::RemovalFailed { entry, reason } => {
                f.write_fmt(format_args!("Could not remove {} : {}", entry.dir_name, reason))
            },
        }
    }
}

pub enum Reporter {
    Console(ConsoleReporter),
    #[cfg(test)]
    Recording(Mutex<Vec<CleanupNotice>>),
}

impl Reporter {
    pub fn report_started(&self) {
        match self {
            Reporter::Console(console) => console.report_started(),
            #[cfg(test)]
            Reporter::Recording(_) => {},
        }
    }

    pub fn report(&self, notice: CleanupNotice) {
        match self {
            Reporter::Console(console) => console.report(&notice),
            #[cfg(test)]
            Reporter::Recording(notices) => {
                if let Ok(mut recorded) = notices.lock() {
                    recorded.push(notice)
                }
            },
        }
    }

    pub fn report_finished(&self, results: &CleanupResults) {
        match self {
            Reporter::Console(console) => console.report_finished(results),
            #[cfg(test)]
            Reporter::Recording(_) => {},
        }
    }

    #[cfg(test)]
    pub fn recorded(&self) -> Vec<CleanupNotice> {
        match self {
            Reporter::Recording(notices) => notices.lock().map(|recorded| recorded.clone()).unwrap_or_default(),
            Reporter::Console(_) => vec![],
        }
    }
}

#[derive(Default)]
pub struct ConsoleReporter {
    use_colors: bool,
    silent: bool,
}

impl ConsoleReporter {
    pub fn new(use_colors: bool, silent: bool) -> Self {
        Self { use_colors, silent }
    }

    pub fn report_started(&self) {
        if self.silent {
            return;
        }

        println!("Clean up yarn cache like a boss.");
        println!();
    }

    pub fn report(&self, notice: &CleanupNotice) {
        if self.silent {
            return;
        }

        match notice.is_diagnostic() {
            true => println!("{}", self.red(notice)),
            false => println!("{}", notice),
        }
    }

    pub fn report_finished(&self, results: &CleanupResults) {
        if self.silent || results.cache_root.is_none() {
            return;
        }

        println!();

        if results.removals.is_empty() {
            println!("{}", self.cyan("No cached entries matched the given packages."));
            println!();
            return;
        }

        let mut table = Table::new();
        table.set_header(vec!["Package", "Version", "Cache entry", "Status"]);
        results.removals.iter().for_each(|outcome| {
            let manifest = &outcome.entry.manifest;
            let status = match &outcome.status {
                RemovalStatus::Removed => "removed".to_string(),
                RemovalStatus::Failed(reason) => format!("failed ({})", reason),
            };

            table.add_row(vec![
                manifest.name.as_str(),
                manifest.version.as_str(),
                outcome.entry.dir_name.as_str(),
                status.as_str(),
            ]);
        });

        println!("{table}");
        println!();
        println!("• removed entries : {}", self.cyan(results.removed_count()));
        println!("• failed removals : {}", self.red(results.failed_count()));
        println!("• skipped packages : {}", self.cyan(results.skipped.len()));
        println!();
    }

    fn cyan<T>(&self, what: T) -> StyledObject<T> {
        match self.use_colors {
            true => style(what).cyan(),
            false => style(what),
        }
    }

    fn red<T>(&self, what: T) -> StyledObject<T> {
        match self.use_colors {
            true => style(what).red(),
            false => style(what),
        }
    }
}
