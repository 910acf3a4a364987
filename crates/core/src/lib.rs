// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod apply;
mod assignment;
mod command;
mod config;
mod desk;
mod error;
mod registry;
mod report;
mod selector;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::apply;
pub use assignment::{Binding, DeskStats};
pub use command::Command;
pub use config::{
    DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_COMMIT_RETRIES, DEFAULT_TIMEZONE, DeskConfig,
};
pub use desk::{ConversationRequest, SellerDesk};
pub use error::CoreError;
pub use registry::{NewSeller, SellerRegistry, SellerUpdate};
pub use report::{AvailabilityReport, SellerAvailability};
pub use selector::{FallbackPolicy, RankKey, SelectionPolicy, assign, select_seller};
pub use state::{
    DeskSnapshot, RegistrySnapshot, SNAPSHOT_VERSION, TransitionResult, seller_snapshot,
};
