//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Community members.
    users (id) {
        /// Primary key: UUID identifier.
        id -> Uuid,
        /// Unique username (max 32 characters).
        username -> Varchar,
        /// One of `regular`, `admin`, `superuser`.
        role -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Top-level posts with denormalised vote counters.
    posts (id) {
        id -> Int8,
        author_id -> Uuid,
        title -> Text,
        content -> Text,
        up_votes -> Int4,
        down_votes -> Int4,
        /// Idempotency token, unique per author.
        client_token -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments on posts with denormalised vote counters.
    comments (id) {
        id -> Int8,
        post_id -> Int8,
        author_id -> Uuid,
        content -> Text,
        up_votes -> Int4,
        down_votes -> Int4,
        client_token -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Vote ledger for posts: at most one row per post and voter.
    post_votes (post_id, user_id) {
        post_id -> Int8,
        user_id -> Uuid,
        /// `up` or `down`.
        direction -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Vote ledger for comments: at most one row per comment and voter.
    comment_votes (comment_id, user_id) {
        comment_id -> Int8,
        user_id -> Uuid,
        direction -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Applied example data seeds.
    example_data_runs (seed_key) {
        seed_key -> Text,
        seeded_at -> Timestamptz,
        user_count -> Int4,
        seed -> Int8,
    }
}

diesel::joinable!(posts -> users (author_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(comments -> users (author_id));
diesel::joinable!(post_votes -> posts (post_id));
diesel::joinable!(comment_votes -> comments (comment_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    posts,
    comments,
    post_votes,
    comment_votes,
    example_data_runs,
);
