//! Error types for column features.

use crate::schema::DataType;

/// Programmer errors raised while a class is being configured.
///
/// These are meant to fail fast at startup; nothing at runtime recovers
/// from them.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error(
        "The column specified, {column}, is a {data_type} column. Must be one of {allowed} to be set as {feature} column."
    )]
    IncompatibleColumnType {
        column: String,
        data_type: DataType,
        allowed: String,
        feature: &'static str,
    },

    #[error("The type specified, {charset}, is an invalid type. Must be one of: {allowed}.")]
    InvalidCharset { charset: String, allowed: String },

    #[error("The length specified, {length}, needs to be an integer greater than zero.")]
    InvalidLength { length: i64 },

    #[error(
        "The column specified, {column}, on {class} is already configured as a {existing} column and cannot also be a {requested} column."
    )]
    FeatureConflict {
        class: String,
        column: String,
        existing: &'static str,
        requested: &'static str,
    },

    #[error("Failed to parse feature manifest: {0}")]
    Manifest(String),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Hook error: {0}")]
    Hook(#[from] HookError),
}

/// Schema lookup and introspection errors.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown column {column} in table {table}")]
    UnknownColumn { table: String, column: String },

    #[error("Schema introspection failed: {0}")]
    Introspection(#[from] sqlx::Error),
}

/// Errors surfaced by the database collaborator.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Hook registration errors.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error(
        "The {slot} override for {class}.{column} is already provided by {existing}; refusing to replace it with {requested}"
    )]
    OverrideConflict {
        class: String,
        column: String,
        slot: &'static str,
        existing: String,
        requested: String,
    },
}

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    #[error(
        "Could not generate a unique value for {class}.{column} after {attempts} attempts"
    )]
    RandomExhausted {
        class: String,
        column: String,
        attempts: u32,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
