// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod attendance;
pub mod gym_class;
pub mod member;

pub use attendance::{Attendance, AttendanceStatus};
pub use gym_class::GymClass;
pub use member::{Member, MemberRole, MemberStatus, MembershipPlan};
