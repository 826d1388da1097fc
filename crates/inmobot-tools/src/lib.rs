// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The tools InmoBot's model can call.
//!
//! Three fixed tools are offered: `show_catalog`, `search_properties` and
//! `save_lead_info`. Raw calls are parsed into a typed [`ToolInvocation`]
//! at the [`ToolDispatcher`] boundary, and every handler returns result
//! text plus the lead data it captured.

pub mod dispatch;
pub mod invocation;
pub mod kind;
pub mod render;
pub mod search;

pub use dispatch::{ToolContext, ToolDispatcher, ToolOutcome};
pub use invocation::ToolInvocation;
pub use kind::{ToolKind, tool_definitions};
pub use search::{SearchCriteria, SearchOutcome};
