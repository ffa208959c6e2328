// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod revalidate;
pub mod users;

pub use revalidate::Revalidator;
pub use users::{
    SortOrder, UpdateOutcome, UpdateUserParams, UserPage, UserSearchParams, UserService,
};
