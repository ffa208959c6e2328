// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Thread model and the expanded view types returned by the read endpoints.

use serde::{Deserialize, Serialize};

use crate::models::{AuthorSummary, User};

/// Thread document stored in Firestore.
///
/// A reply is itself a thread: it carries `parent_id` and appears in the
/// parent's `children` list. The schema allows unbounded nesting; the read
/// paths expand at most two levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    /// Thread id (also used as document ID)
    pub id: String,
    /// Body text
    pub text: String,
    /// External id of the authoring user
    pub author: String,
    /// Parent thread id when this thread is a reply
    pub parent_id: Option<String>,
    /// IDs of direct replies, in creation order
    pub children: Vec<String>,
    /// When the thread was posted (ISO 8601)
    pub created_at: String,
}

/// A thread with its `author` reference expanded to the summary projection.
///
/// The `children` relation stays as raw ids; expansion stops here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub id: String,
    pub text: String,
    pub author: AuthorSummary,
    pub parent_id: Option<String>,
    pub children: Vec<String>,
    pub created_at: String,
}

impl Reply {
    /// Join a thread document with its author projection.
    pub fn from_thread(thread: Thread, author: AuthorSummary) -> Self {
        Self {
            id: thread.id,
            text: thread.text,
            author,
            parent_id: thread.parent_id,
            children: thread.children,
            created_at: thread.created_at,
        }
    }
}

/// A top-level thread with its `children` relation expanded to replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadWithReplies {
    pub id: String,
    pub text: String,
    pub author: String,
    pub parent_id: Option<String>,
    pub children: Vec<Reply>,
    pub created_at: String,
}

/// A user's profile with all authored threads expanded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPosts {
    pub user: User,
    pub threads: Vec<ThreadWithReplies>,
}
