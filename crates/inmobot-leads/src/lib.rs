// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lead identity resolution and qualification scoring.
//!
//! [`LeadManager::upsert`] maps an interaction to exactly one lead (by
//! session, platform username, phone, then email), merges the captured data
//! without ever blanking known values, rescores it and persists the whole
//! collection.

pub mod identity;
pub mod manager;
pub mod scoring;

pub use identity::{MatchKey, resolve};
pub use manager::{LeadManager, LeadStats};
pub use scoring::ScoringPolicy;
