//! Diesel ORM row types for the pre-launch tables.
//!
//! These provide compile-time type checking for database operations; the
//! domain models live in `crate::models`.

use diesel::prelude::*;

use crate::schema;

/// Email signup row.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::emails)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SignupRecord {
    pub id: i32,
    pub email: String,
    pub created_at: String,
}

/// New signup for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::emails)]
pub struct NewSignup<'a> {
    pub email: &'a str,
    pub created_at: &'a str,
}

/// Generation row.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::generations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GenerationRecord {
    pub id: i32,
    pub ip_address: String,
    pub level: String,
    pub stack: String,
    pub goal: String,
    pub blueprint_title: String,
    pub day: String,
    pub created_at: String,
}

/// New generation for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::generations)]
pub struct NewGeneration<'a> {
    pub ip_address: &'a str,
    pub level: &'a str,
    pub stack: &'a str,
    pub goal: &'a str,
    pub blueprint_title: &'a str,
    pub day: &'a str,
    pub created_at: &'a str,
}
