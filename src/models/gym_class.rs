// SPDX-License-Identifier: MIT

//! Class schedule entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled class in the `schedules` collection.
///
/// `enrolled_members` is a manually maintained counter, not derived from
/// attendance records, and nothing prevents it exceeding `max_members`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymClass {
    /// Firestore document ID; populated on reads, never stored as a field.
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    /// Class name (e.g. "Morning Yoga")
    pub class_name: String,
    /// Trainer running the class
    pub trainer_name: String,
    /// When the class takes place
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub date_time: DateTime<Utc>,
    /// Duration in minutes
    pub duration_minutes: u32,
    /// Enrollment capacity
    pub max_members: u32,
    /// Current enrollment count
    pub enrolled_members: u32,
    /// When the schedule entry was created
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
}
