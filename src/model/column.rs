//! Columns and the lookup keys used to reference them

use std::fmt;

use crate::definition::PlainColumnDecl;
use crate::error::{Result, SqlGenError};

/// Identifies a table by name within the run registry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableKey {
    pub database: String,
    pub schema: String,
    pub table: String,
}

impl TableKey {
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// `[schema].[table]`
    pub fn two_part_name(&self) -> String {
        format!("[{}].[{}]", self.schema, self.table)
    }

    pub fn column(&self, column: impl Into<String>) -> ColumnKey {
        ColumnKey {
            table: self.clone(),
            column: column.into(),
        }
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.database, self.schema, self.table)
    }
}

/// Identifies a column by name within the run registry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnKey {
    pub table: TableKey,
    pub column: String,
}

impl ColumnKey {
    pub(crate) fn not_found(&self) -> SqlGenError {
        SqlGenError::ColumnNotFound {
            database: self.table.database.clone(),
            schema: self.table.schema.clone(),
            table: self.table.table.clone(),
            column: self.column.clone(),
        }
    }
}

/// Resolves a column key to an already constructed column.
///
/// Implemented by the run context; foreign-key columns go through this seam
/// instead of holding references to other tables.
pub trait ColumnResolver {
    fn resolve_column(&self, key: &ColumnKey) -> Result<&Column>;
}

/// A table column with its SQL type already resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// SQL type text; a `-1` length is kept as `(-1)` until rendering
    pub data_type: String,
    pub nullable: bool,
    pub length: i32,
    pub precision: i32,
    pub scale: i32,
    /// Referenced column, for foreign-key columns
    pub references: Option<ColumnKey>,
}

impl Column {
    /// Build a column from an explicit logical type
    pub fn new(decl: &PlainColumnDecl, table: &TableKey) -> Result<Self> {
        let data_type = decl
            .data_type
            .sql_type(decl.length, decl.precision, decl.scale)
            .ok_or_else(|| SqlGenError::UnsupportedDataType {
                data_type: decl.data_type.to_string(),
                column: format!("{}.{}", table, decl.name),
            })?;

        Ok(Self {
            name: decl.name.clone(),
            data_type,
            nullable: decl.is_nullable,
            length: decl.length,
            precision: decl.precision,
            scale: decl.scale,
            references: None,
        })
    }

    /// Build a foreign-key column that copies its type from `referenced`
    pub fn referencing(
        name: impl Into<String>,
        nullable: bool,
        referenced: &Column,
        key: ColumnKey,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: referenced.data_type.clone(),
            nullable,
            length: referenced.length,
            precision: referenced.precision,
            scale: referenced.scale,
            references: Some(key),
        }
    }

    /// Type text as written into DDL
    pub fn sql_type(&self) -> String {
        self.data_type.replace("(-1)", "(MAX)")
    }
}
