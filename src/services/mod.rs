// SPDX-License-Identifier: MIT

//! Services module - collaborator clients.

pub mod identity;
pub mod insights;

pub use identity::{IdentityClient, IdentityUser};
pub use insights::{InsightsClient, InsightsInput, InsightsOutput};
