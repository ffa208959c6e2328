// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User data-access service.
//!
//! Implements the profile and social-graph operations:
//! 1. Upsert a user profile (with optional route revalidation)
//! 2. Point lookup by external id
//! 3. Posts fetch with two-level expansion (threads → replies → author)
//! 4. Paginated substring search over username/name
//! 5. Activity feed: replies to a user's threads, excluding self-replies

use std::collections::HashMap;

use regex::Regex;

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{AuthorSummary, Reply, Thread, ThreadWithReplies, User, UserPosts};
use crate::services::Revalidator;

/// Items per page when the search request does not say.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Profile fields for an upsert. Every field overwrites the stored value;
/// there are no partial-update semantics.
#[derive(Debug, Clone)]
pub struct UpdateUserParams {
    pub user_id: String,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub image: Option<String>,
    /// UI route to revalidate, checked against the configured policy.
    pub path: Option<String>,
}

/// What an upsert did.
#[derive(Debug, Clone, Copy)]
pub struct UpdateOutcome {
    /// True when the profile document did not exist before.
    pub created: bool,
    /// True when a route revalidation fired.
    pub revalidated: bool,
}

/// Sort direction for search results (by creation time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(AppError::BadRequest(format!(
                "Invalid sort order '{}': expected 'asc' or 'desc'",
                other
            ))),
        }
    }
}

/// Parameters for the paginated user search.
#[derive(Debug, Clone)]
pub struct UserSearchParams {
    /// Requesting user, excluded from the results.
    pub user_id: String,
    /// Substring to match against username or name; blank matches everyone.
    pub search_string: String,
    /// 1-indexed page number; values below 1 are treated as 1.
    pub page_number: u32,
    pub page_size: u32,
    pub sort: SortOrder,
}

/// One page of search results.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<User>,
    /// Whether more pages exist past this one.
    pub is_next: bool,
}

/// User profile and social-graph operations over Firestore.
#[derive(Clone)]
pub struct UserService {
    db: FirestoreDb,
    revalidator: Revalidator,
}

impl UserService {
    pub fn new(db: FirestoreDb, revalidator: Revalidator) -> Self {
        Self { db, revalidator }
    }

    /// Create or update a user profile by external id.
    ///
    /// Profile fields are overwritten unconditionally and `username` is
    /// stored lowercased. `created_at` and the authored-thread list survive
    /// updates. The read-modify-write pair is not atomic; concurrent upserts
    /// of the same user resolve last-writer-wins at the store.
    pub async fn update_user(&self, params: UpdateUserParams) -> Result<UpdateOutcome> {
        let existing = self.db.get_user(&params.user_id).await?;
        let created = existing.is_none();

        let user = match existing {
            Some(mut user) => {
                user.username = params.username.to_lowercase();
                user.name = params.name;
                user.bio = params.bio;
                user.image = params.image;
                user.onboarded = true;
                user
            }
            None => User {
                id: params.user_id.clone(),
                username: params.username.to_lowercase(),
                name: params.name,
                bio: params.bio,
                image: params.image,
                onboarded: true,
                created_at: chrono::Utc::now().to_rfc3339(),
                threads: Vec::new(),
            },
        };

        self.db.upsert_user(&user).await?;
        tracing::info!(user_id = %user.id, created, "User profile upserted");

        let revalidated = params
            .path
            .as_deref()
            .is_some_and(|path| self.revalidator.revalidate_if_eligible(path));

        Ok(UpdateOutcome {
            created,
            revalidated,
        })
    }

    /// Get a user by external id. A missing user is a normal empty result.
    pub async fn fetch_user(&self, user_id: &str) -> Result<Option<User>> {
        self.db.get_user(user_id).await
    }

    /// Get a user with authored threads expanded two levels deep:
    /// threads → replies, each reply's author projected to
    /// `id`/`name`/`image`. Reply-of-reply ids stay unexpanded.
    pub async fn fetch_user_posts(&self, user_id: &str) -> Result<Option<UserPosts>> {
        let Some(user) = self.db.get_user(user_id).await? else {
            return Ok(None);
        };

        // 1. Expand the user's authored threads (reference-list order).
        let threads = self.db.get_threads_by_ids(&user.threads).await?;

        // 2. Batch-fetch every reply across all threads.
        let reply_ids = collect_reply_ids(&threads);
        let replies = self.db.get_threads_by_ids(&reply_ids).await?;

        // 3. Batch-fetch the reply authors for the summary projection.
        let authors = self.reply_authors(&replies).await?;
        let replies_by_id: HashMap<String, Thread> = replies
            .into_iter()
            .map(|thread| (thread.id.clone(), thread))
            .collect();

        // 4. Reassemble, skipping dangling references.
        let threads = threads
            .into_iter()
            .map(|thread| {
                let expanded = thread
                    .children
                    .iter()
                    .filter_map(|reply_id| {
                        let reply = replies_by_id.get(reply_id)?.clone();
                        let author = authors.get(&reply.author)?.clone();
                        Some(Reply::from_thread(reply, author))
                    })
                    .collect();
                ThreadWithReplies {
                    id: thread.id,
                    text: thread.text,
                    author: thread.author,
                    parent_id: thread.parent_id,
                    children: expanded,
                    created_at: thread.created_at,
                }
            })
            .collect();

        Ok(Some(UserPosts { user, threads }))
    }

    /// Case-insensitive substring search over username/name with skip/limit
    /// pagination. The requesting user never appears in the results.
    pub async fn fetch_users(&self, params: &UserSearchParams) -> Result<UserPage> {
        let direction = match params.sort {
            SortOrder::Asc => firestore::FirestoreQueryDirection::Ascending,
            SortOrder::Desc => firestore::FirestoreQueryDirection::Descending,
        };
        let matcher = search_matcher(&params.search_string)?;

        // The store orders by creation time; the substring filter runs here
        // since Firestore has no server-side pattern matching.
        let candidates = self.db.list_users_by_created(direction).await?;
        let matching: Vec<User> = candidates
            .into_iter()
            .filter(|user| user.id != params.user_id)
            .filter(|user| {
                matcher
                    .as_ref()
                    .is_none_or(|re| re.is_match(&user.username) || re.is_match(&user.name))
            })
            .collect();

        let total = matching.len();
        let skip = skip_amount(params.page_number, params.page_size);
        let users: Vec<User> = matching
            .into_iter()
            .skip(skip)
            .take(params.page_size as usize)
            .collect();
        let is_next = total > skip + users.len();

        Ok(UserPage { users, is_next })
    }

    /// Replies other users posted under this user's threads, newest first,
    /// each with the author projection attached.
    ///
    /// The thread query and the reply fetch are two separate reads with no
    /// snapshot between them; a reply posted in the gap may be missed until
    /// the next call.
    pub async fn get_activity(&self, user_id: &str) -> Result<Vec<Reply>> {
        // 1. All threads authored by the user.
        let threads = self.db.threads_by_author(user_id).await?;

        // 2. Flatten their reply ids and fetch the reply documents,
        //    dropping the user's own replies to their threads.
        let reply_ids = collect_reply_ids(&threads);
        let mut replies: Vec<Thread> = self
            .db
            .get_threads_by_ids(&reply_ids)
            .await?
            .into_iter()
            .filter(|reply| reply.author != user_id)
            .collect();

        // 3. Attach author projections.
        let authors = self.reply_authors(&replies).await?;

        replies.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(replies
            .into_iter()
            .filter_map(|reply| {
                let author = authors.get(&reply.author)?.clone();
                Some(Reply::from_thread(reply, author))
            })
            .collect())
    }

    /// Batch-fetch the authors of the given threads, keyed by user id.
    async fn reply_authors(&self, replies: &[Thread]) -> Result<HashMap<String, AuthorSummary>> {
        let author_ids: Vec<String> = replies.iter().map(|r| r.author.clone()).collect();
        let authors = self.db.get_users_by_ids(&author_ids).await?;
        Ok(authors
            .iter()
            .map(|user| (user.id.clone(), AuthorSummary::from(user)))
            .collect())
    }
}

/// Build the case-insensitive substring matcher, or `None` for a blank
/// search. The input is escaped so metacharacters match literally.
pub fn search_matcher(search_string: &str) -> Result<Option<Regex>> {
    let trimmed = search_string.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let pattern = format!("(?i){}", regex::escape(trimmed));
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Search pattern failed to compile: {}", e)))
}

/// Documents to skip for a 1-indexed page. Page numbers below 1 mean page 1.
fn skip_amount(page_number: u32, page_size: u32) -> usize {
    let page = page_number.max(1) as usize;
    (page - 1) * page_size as usize
}

/// Flatten the `children` lists of the given threads into one id sequence.
/// A reply id listed under several parents appears once per parent.
fn collect_reply_ids(threads: &[Thread]) -> Vec<String> {
    threads
        .iter()
        .flat_map(|thread| thread.children.iter().cloned())
        .collect()
}
