// SPDX-License-Identifier: MIT

//! GymFlow: membership, class schedule, and attendance management
//!
//! This crate provides the backend API for the GymFlow dashboard: member,
//! schedule, and attendance CRUD backed by Firestore, sessions backed by
//! Google Identity Toolkit, and LLM-generated business insights.

pub mod config;
pub mod db;
pub mod error;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use policy::AdminPolicy;
use services::{IdentityClient, InsightsClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub identity: IdentityClient,
    pub insights: InsightsClient,
    pub admin_policy: AdminPolicy,
}
