// SPDX-License-Identifier: MIT

//! Member (gym user) model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Membership tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipPlan {
    Basic,
    Premium,
    #[serde(rename = "VIP")]
    Vip,
}

/// Membership status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStatus {
    Active,
    Inactive,
    Pending,
}

/// Role within the gym.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Trainer,
    Member,
}

/// Member profile stored in the `users` collection.
///
/// Created on sign-up (keyed by the auth uid) or by the admin add-member
/// flow (generated document ID). Only name and email are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Firestore document ID; populated on reads, never stored as a field.
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Membership tier, unset until the member picks a plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_plan: Option<MembershipPlan>,
    /// Membership status
    pub status: MemberStatus,
    /// When the member joined
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub join_date: DateTime<Utc>,
    /// Role within the gym
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<MemberRole>,
}
