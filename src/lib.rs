// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! SwipeSort: swipe-to-triage image sorter
//!
//! A small HTTP service that lists images waiting in a pending directory and
//! moves them into approved or declined directories, plus the client-side
//! triage session that drives it.

pub mod config;
pub mod error;
pub mod naming;
pub mod store;
pub mod triage;
pub mod web;

pub use config::AppConfig;
pub use error::{Result, SwipeError};
pub use store::{FileStore, Verdict};
