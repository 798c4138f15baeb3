// SPDX-License-Identifier: MIT

//! Admin authorization policy.
//!
//! The entire authorization model is a single predicate: a principal is an
//! admin if and only if their email matches the configured admin address.
//! Keeping the predicate behind an injected policy keeps the identity
//! literal out of handler code and lets tests swap it freely.

use crate::middleware::auth::AuthUser;

/// Decides which principals get admin affordances.
#[derive(Debug, Clone)]
pub struct AdminPolicy {
    admin_email: String,
}

impl AdminPolicy {
    pub fn new(admin_email: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
        }
    }

    /// True iff the principal's email matches the admin address.
    ///
    /// Email comparison is case-insensitive; identity providers are not
    /// consistent about the casing they return.
    pub fn is_admin(&self, user: &AuthUser) -> bool {
        user.email.eq_ignore_ascii_case(&self.admin_email)
    }

    /// Errors with `Forbidden` unless the principal is an admin.
    pub fn require_admin(&self, user: &AuthUser) -> crate::error::Result<()> {
        if self.is_admin(user) {
            Ok(())
        } else {
            Err(crate::error::AppError::Forbidden)
        }
    }
}
