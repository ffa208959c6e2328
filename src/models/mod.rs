// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod thread;
pub mod user;

pub use thread::{Reply, Thread, ThreadWithReplies, UserPosts};
pub use user::{AuthorSummary, User};
