//! Declarative database definition
//!
//! The input tree a generation run consumes. Values here are already
//! structurally valid: defaults have been substituted by the reader and
//! enumerations parsed. Semantic checks (unknown schemas, unresolved foreign
//! keys, unsupported types) happen during model construction.

mod reader;

pub use reader::{parse_definition, read_definition};

use crate::model::{CompressionType, DataType, SortOrder, SqlServerPlatform, SqlServerVersion};

/// Root of a definition document
#[derive(Debug, Clone, Default)]
pub struct SqlDefinition {
    pub projects: Vec<SqlProjectDecl>,
}

/// A top-level project; produces one solution
#[derive(Debug, Clone, Default)]
pub struct SqlProjectDecl {
    pub name: String,
    pub databases: Vec<DatabaseDecl>,
}

#[derive(Debug, Clone, Default)]
pub struct DatabaseDecl {
    pub name: String,
    pub create_project: bool,
    pub platform: SqlServerPlatform,
    pub version: SqlServerVersion,
    pub treat_tsql_warnings_as_errors: bool,
    /// Folder trees copied into the generated project
    pub includes: Vec<String>,
    pub dependencies: Vec<Dependency>,
    pub schema_compare: Option<SchemaCompareOptions>,
    pub schemas: Vec<SchemaDecl>,
    pub tables: Vec<TableDecl>,
    pub views: Vec<ScriptedObjectDecl>,
    pub functions: Vec<ScriptedObjectDecl>,
    pub procedures: Vec<ScriptedObjectDecl>,
}

/// Kind of a database dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    /// Another database generated in the same run
    Database,
    /// A built-in system database (`master`, `msdb`)
    System,
    /// A pre-built dacpac file relative to the project directory
    Dacpac,
}

/// A typed database dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub kind: DependencyKind,
    pub name: String,
}

/// Options for the optional schema-compare descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaCompareOptions {
    pub connection_string: String,
    pub exclude_database_roles: bool,
    pub exclude_users: bool,
    pub exclude_tables: bool,
    pub exclude_views: bool,
    pub exclude_procedures: bool,
    pub exclude_table_valued_functions: bool,
    pub exclude_scalar_functions: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDecl {
    pub name: String,
    pub owner: String,
}

#[derive(Debug, Clone, Default)]
pub struct TableDecl {
    pub name: String,
    pub schema: String,
    pub compression: CompressionType,
    pub columns: Vec<ColumnDecl>,
    pub primary_key: Option<PrimaryKeyDecl>,
    pub indexes: Vec<IndexDecl>,
    pub triggers: Vec<String>,
}

/// A column declaration; the variant decides how its type is obtained
#[derive(Debug, Clone)]
pub enum ColumnDecl {
    Plain(PlainColumnDecl),
    ForeignKey(ForeignKeyColumnDecl),
    MultipleColumnForeignKey(MultiColumnForeignKeyDecl),
}

impl ColumnDecl {
    pub fn name(&self) -> &str {
        match self {
            ColumnDecl::Plain(c) => &c.name,
            ColumnDecl::ForeignKey(c) => &c.name,
            ColumnDecl::MultipleColumnForeignKey(c) => &c.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlainColumnDecl {
    pub name: String,
    pub data_type: DataType,
    pub length: i32,
    pub precision: i32,
    pub scale: i32,
    pub is_nullable: bool,
}

impl PlainColumnDecl {
    /// A column with the definition defaults for length, precision and scale
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            length: 0,
            precision: -1,
            scale: -1,
            is_nullable: false,
        }
    }
}

/// Column whose type is copied from the column it references
#[derive(Debug, Clone)]
pub struct ForeignKeyColumnDecl {
    pub name: String,
    pub schema_name: String,
    /// Referenced table text as written; also used in the constraint name
    pub table_name: String,
    pub column_name: String,
    pub is_nullable: bool,
}

/// One member of a composite foreign key
#[derive(Debug, Clone)]
pub struct MultiColumnForeignKeyDecl {
    pub name: String,
    pub foreign_column_name: String,
    /// Members sharing a group name form one constraint
    pub group_name: String,
    pub hint: ColumnReferenceHint,
    pub is_nullable: bool,
}

/// Table targeted by a composite foreign key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReferenceHint {
    pub schema_name: String,
    pub table_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct PrimaryKeyDecl {
    pub name: String,
    pub clustered: bool,
    pub compression: CompressionType,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct IndexDecl {
    pub name: String,
    pub unique: bool,
    pub clustered: bool,
    pub compression: CompressionType,
    pub columns: Vec<IndexColumnDecl>,
    pub includes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumnDecl {
    pub column_name: String,
    pub sort_order: SortOrder,
}

/// View, function or procedure given as a literal statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedObjectDecl {
    pub name: String,
    pub schema: String,
    pub statement: String,
}
