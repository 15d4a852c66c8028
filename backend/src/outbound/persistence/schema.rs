//! Diesel table definitions.
//!
//! Must match `backend/migrations/` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Recurring weekly availability, owned by the profile CRUD layer.
    availability (id) {
        /// Surrogate key.
        id -> Int8,
        /// Owner.
        user_id -> Text,
        /// Full English day name, `Monday` through `Sunday`.
        day_of_week -> Varchar,
        /// Inclusive start.
        start_time -> Time,
        /// Exclusive end; always after `start_time`.
        end_time -> Time,
    }
}

diesel::table! {
    /// One preference vector per user.
    preference_vectors (user_id) {
        /// Owner.
        user_id -> Text,
        /// Ordered answers. PostgreSQL arrays admit NULL elements.
        components -> Array<Nullable<Int4>>,
        /// Last write.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Materialised top-N match list per user.
    cached_matches (user1_id, user2_id) {
        /// Owner of the list.
        user1_id -> Text,
        /// Ranked counterpart.
        user2_id -> Text,
        /// Zero-based position.
        rank -> Int4,
        /// Cosine similarity at refresh time.
        score -> Float8,
        /// JSON array of `{day, start, end}` intervals.
        overlaps -> Jsonb,
        /// Refresh that wrote the row.
        refreshed_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(availability, preference_vectors, cached_matches);
