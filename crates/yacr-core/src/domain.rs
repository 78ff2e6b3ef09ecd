// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

pub mod interfaces;
pub mod locators;
pub mod matching;
pub mod models;
pub mod specifiers;
