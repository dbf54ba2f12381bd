//! Database registry entry

use indexmap::IndexMap;

use super::objects::{DatabaseObject, Schema};
use super::table::Table;
use super::types::{SqlServerPlatform, SqlServerVersion};
use crate::definition::{DatabaseDecl, Dependency, SchemaCompareOptions, SchemaDecl};
use crate::error::{Result, SqlGenError};

/// A constructed database.
///
/// Created empty from its declaration and registered with the run context;
/// schemas and objects are added afterwards in generation order.
#[derive(Debug, Clone)]
pub struct Database {
    pub name: String,
    pub create_project: bool,
    pub platform: SqlServerPlatform,
    pub version: SqlServerVersion,
    pub treat_tsql_warnings_as_errors: bool,
    pub dependencies: Vec<Dependency>,
    pub include_paths: Vec<String>,
    pub schema_compare: Option<SchemaCompareOptions>,
    pub schemas: IndexMap<String, Schema>,
}

impl Database {
    pub fn new(decl: &DatabaseDecl) -> Self {
        Self {
            name: decl.name.clone(),
            create_project: decl.create_project,
            platform: decl.platform,
            version: decl.version,
            treat_tsql_warnings_as_errors: decl.treat_tsql_warnings_as_errors,
            dependencies: decl.dependencies.clone(),
            include_paths: decl.includes.clone(),
            schema_compare: decl.schema_compare.clone(),
            schemas: IndexMap::new(),
        }
    }

    pub fn add_schema(&mut self, decl: &SchemaDecl) -> Result<()> {
        if self.schemas.contains_key(&decl.name) {
            return Err(SqlGenError::DuplicateObject {
                qualified_name: format!("{}.{}", self.name, decl.name),
            });
        }
        self.schemas
            .insert(decl.name.clone(), Schema::new(decl, &self.name));
        Ok(())
    }

    /// Add an object to its schema, which must already exist
    pub fn add_object(&mut self, object: DatabaseObject) -> Result<()> {
        let schema = match self.schemas.get_mut(object.schema()) {
            Some(schema) => schema,
            None => {
                return Err(SqlGenError::SchemaNotFound {
                    database: self.name.clone(),
                    schema: object.schema().to_string(),
                    object: object.name().to_string(),
                })
            }
        };
        schema.insert(object)
    }

    pub fn find_table(&self, schema: &str, table: &str) -> Option<&Table> {
        self.schemas.get(schema).and_then(|s| s.table(table))
    }

    /// Iterate every object across all schemas
    pub fn objects(&self) -> impl Iterator<Item = &DatabaseObject> {
        self.schemas.values().flat_map(|s| s.objects.values())
    }
}
