// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// External user id (also used as document ID)
    pub id: String,
    /// Unique handle, stored lowercased
    pub username: String,
    /// Display name
    pub name: String,
    /// Profile bio
    pub bio: String,
    /// Profile picture URL
    pub image: Option<String>,
    /// Whether the user finished onboarding
    pub onboarded: bool,
    /// When the profile was first created (ISO 8601)
    pub created_at: String,
    /// IDs of threads authored by this user, in creation order
    pub threads: Vec<String>,
}

/// Author projection attached to expanded replies (`id`, `name`, `image` only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            image: user.image.clone(),
        }
    }
}
