// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Members (the `users` collection)
//! - Schedules (class entries)
//! - Attendances (per-member attendance records)
//!
//! Every screen treats the store as the sole source of truth; no caching
//! happens here.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Attendance, GymClass, Member};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // ExternalJwtFunctionSource provides a dummy token without needing a
        // custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Member Operations ───────────────────────────────────────

    /// List every member. Collections are small; list screens filter and
    /// sort in memory.
    pub async fn list_members(&self) -> Result<Vec<Member>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a member by document ID.
    pub async fn get_member(&self, member_id: &str) -> Result<Option<Member>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(member_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a member with a generated document ID. Returns the stored
    /// record with its new ID populated.
    pub async fn insert_member(&self, member: &Member) -> Result<Member, AppError> {
        self.get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .generate_document_id()
            .object(member)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace a member document keyed by an explicit ID (the auth
    /// uid, for sign-up flows).
    pub async fn upsert_member(&self, member_id: &str, member: &Member) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(member_id)
            .object(member)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Replace an existing member document. Callers fetch-modify-write so
    /// unrelated fields survive the update.
    pub async fn update_member(&self, member: &Member) -> Result<(), AppError> {
        self.upsert_member(&member.id, member).await
    }

    /// Delete a member. No cascade: schedules and attendance records that
    /// reference the member are left untouched.
    pub async fn delete_member(&self, member_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(member_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Schedule Operations ─────────────────────────────────────

    /// List every schedule entry.
    pub async fn list_classes(&self) -> Result<Vec<GymClass>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::SCHEDULES)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a schedule entry by document ID.
    pub async fn get_class(&self, class_id: &str) -> Result<Option<GymClass>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SCHEDULES)
            .obj()
            .one(class_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a schedule entry with a generated document ID.
    pub async fn insert_class(&self, class: &GymClass) -> Result<GymClass, AppError> {
        self.get_client()?
            .fluent()
            .insert()
            .into(collections::SCHEDULES)
            .generate_document_id()
            .object(class)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replace an existing schedule entry.
    pub async fn update_class(&self, class: &GymClass) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SCHEDULES)
            .document_id(&class.id)
            .object(class)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a schedule entry.
    pub async fn delete_class(&self, class_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::SCHEDULES)
            .document_id(class_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Attendance Operations ───────────────────────────────────

    /// List every attendance record (admin view).
    pub async fn list_attendance(&self) -> Result<Vec<Attendance>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ATTENDANCES)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List attendance records for one member (non-admin view).
    ///
    /// The scope is enforced in the store query, not filtered after the
    /// fact, so a non-admin caller never receives other members' rows.
    pub async fn list_attendance_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Attendance>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ATTENDANCES)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an attendance record by document ID.
    pub async fn get_attendance(&self, record_id: &str) -> Result<Option<Attendance>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ATTENDANCES)
            .obj()
            .one(record_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert an attendance record with a generated document ID.
    ///
    /// The future-date guard lives at the route layer; by the time a record
    /// reaches here it has already been validated.
    pub async fn insert_attendance(&self, record: &Attendance) -> Result<Attendance, AppError> {
        self.get_client()?
            .fluent()
            .insert()
            .into(collections::ATTENDANCES)
            .generate_document_id()
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replace an existing attendance record.
    pub async fn update_attendance(&self, record: &Attendance) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ATTENDANCES)
            .document_id(&record.id)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete an attendance record.
    pub async fn delete_attendance(&self, record_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::ATTENDANCES)
            .document_id(record_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
