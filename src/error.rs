//! Error types for sqlproj-gen

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a generation run.
///
/// Every variant names the qualified entity that caused it. There is no
/// recoverable channel: callers treat any error as "no usable output".
#[derive(Error, Debug)]
pub enum SqlGenError {
    #[error("Failed to read definition file: {path}")]
    DefinitionReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse definition file: {path}")]
    DefinitionParseError {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Invalid definition: {message}")]
    InvalidDefinition { message: String },

    #[error("Database {database} is already registered in this run")]
    DuplicateDatabase { database: String },

    #[error("Database {database} doesn't exist in the run registry")]
    DatabaseNotRegistered { database: String },

    #[error("{database}.{schema}.{object} references non-existing schema {schema}")]
    SchemaNotFound {
        database: String,
        schema: String,
        object: String,
    },

    #[error("Object {qualified_name} is declared more than once")]
    DuplicateObject { qualified_name: String },

    #[error("Column {column} is declared more than once in table {table}")]
    DuplicateColumn { table: String, column: String },

    #[error("Failed to find column {column} in table {database}.{schema}.{table}")]
    ColumnNotFound {
        database: String,
        schema: String,
        table: String,
        column: String,
    },

    #[error("Data type {data_type} of column {column} is not supported")]
    UnsupportedDataType { data_type: String, column: String },

    #[error(
        "The input string ({input}) either started or ended with a bracket, but not both. It is invalid."
    )]
    InvalidBrackets { input: String },

    #[error("Invalid system dependency {dependency} referenced by database {database}")]
    InvalidSystemDependency { dependency: String, database: String },

    #[error("Failed to find database object {dependency}, which database {database} depends on")]
    DependencyNotFound { dependency: String, database: String },

    #[error("Configuration value {key} is required by database {database}")]
    MissingConfiguration { key: String, database: String },

    #[error("Failed to resolve package {package} for include path {path}")]
    PackageNotFound { package: String, path: String },

    #[error("Failed to find database include folder {path}")]
    IncludeFolderNotFound { path: PathBuf },

    #[error("Failed to find dacpac {path} referenced by database {database}")]
    DacpacNotFound { path: PathBuf, database: String },

    #[error("Failed to read {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML generation error: {message}")]
    XmlGenerationError { message: String },
}

impl SqlGenError {
    pub(crate) fn definition(message: impl Into<String>) -> Self {
        SqlGenError::InvalidDefinition {
            message: message.into(),
        }
    }

    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        SqlGenError::XmlGenerationError {
            message: err.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SqlGenError::WriteError {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, SqlGenError>;
