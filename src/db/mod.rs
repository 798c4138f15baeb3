// SPDX-License-Identifier: MIT

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const SCHEDULES: &str = "schedules";
    pub const ATTENDANCES: &str = "attendances";
}
