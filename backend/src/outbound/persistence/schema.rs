//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Employee directory entries.
    employees (id) {
        id -> Int8,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Direct manager; `NULL` for employees who report to nobody.
        manager_id -> Nullable<Int8>,
        /// `EMPLOYEE` or `ADMINISTRATOR`.
        role -> Varchar,
    }
}

diesel::table! {
    /// Performance reviews pairing an employee with a reviewing manager.
    performance_reviews (id) {
        id -> Int8,
        employee_id -> Int8,
        manager_id -> Int8,
    }
}

diesel::table! {
    /// Objectives owned by employees and optionally linked to a review.
    objectives (id) {
        id -> Int8,
        employee_id -> Int8,
        review_id -> Nullable<Int8>,
        title -> Varchar,
        description -> Nullable<Text>,
        objective_type -> Varchar,
        category -> Nullable<Varchar>,
        metric_type -> Varchar,
        target_value -> Nullable<Float8>,
        current_value -> Float8,
        /// Constrained to `1..=100`.
        weight -> Int2,
        start_date -> Date,
        due_date -> Date,
        status -> Varchar,
        /// Constrained to `0..=100` when present.
        self_progress -> Nullable<Int2>,
        /// Constrained to `0..=100` when present.
        manager_progress -> Nullable<Int2>,
        self_comments -> Nullable<Text>,
        manager_comments -> Nullable<Text>,
        completed_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Key results; rows cascade with their objective.
    key_results (id) {
        id -> Int8,
        objective_id -> Int8,
        title -> Varchar,
        target_value -> Nullable<Float8>,
        current_value -> Float8,
        unit -> Nullable<Varchar>,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(key_results -> objectives (objective_id));
diesel::joinable!(objectives -> performance_reviews (review_id));

diesel::allow_tables_to_appear_in_same_query!(employees, key_results, objectives, performance_reviews);
