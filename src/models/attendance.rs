// SPDX-License-Identifier: MIT

//! Attendance record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the member showed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// One member's attendance for one class on one date, in the `attendances`
/// collection. Only `status` is editable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendance {
    /// Firestore document ID; populated on reads, never stored as a field.
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    /// Member the record belongs to (auth uid or member document ID)
    pub user_id: String,
    /// Class the record is for
    pub class_id: String,
    /// Date attendance was marked for; never in the future
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub date: DateTime<Utc>,
    /// Present or Absent
    pub status: AttendanceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_spellings() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Present).unwrap(),
            "\"Present\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Absent).unwrap(),
            "\"Absent\""
        );
    }
}
