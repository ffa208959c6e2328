// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Threadnest: user-profile and social-graph backend for a threaded
//! discussion app.
//!
//! This crate provides the data-access API over Firestore: profile upserts,
//! nested post expansion, paginated user search, and the reply activity feed.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::{Revalidator, UserService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub users: UserService,
    pub revalidator: Revalidator,
}
