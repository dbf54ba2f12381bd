//! Schemas and the objects they own

use indexmap::IndexMap;

use super::table::Table;
use crate::definition::{SchemaDecl, ScriptedObjectDecl};
use crate::error::{Result, SqlGenError};

/// Object category; decides the output folder under the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Function,
    Procedure,
    Table,
    View,
}

impl ObjectKind {
    /// Folder-inclusion order in project descriptors
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::Function,
        ObjectKind::Procedure,
        ObjectKind::Table,
        ObjectKind::View,
    ];

    pub fn folder_name(&self) -> &'static str {
        match self {
            ObjectKind::Function => "Functions",
            ObjectKind::Procedure => "Stored Procedures",
            ObjectKind::Table => "Tables",
            ObjectKind::View => "Views",
        }
    }
}

/// View, function or procedure body kept as literal text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedObject {
    pub database: String,
    pub schema: String,
    pub name: String,
    pub statement: String,
}

impl ScriptedObject {
    pub fn new(decl: &ScriptedObjectDecl, database: &str) -> Self {
        Self {
            database: database.to_string(),
            schema: decl.schema.clone(),
            name: decl.name.clone(),
            statement: decl.statement.clone(),
        }
    }
}

/// Any object that lives inside a schema
#[derive(Debug, Clone)]
pub enum DatabaseObject {
    Table(Table),
    View(ScriptedObject),
    Function(ScriptedObject),
    Procedure(ScriptedObject),
}

impl DatabaseObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            DatabaseObject::Table(_) => ObjectKind::Table,
            DatabaseObject::View(_) => ObjectKind::View,
            DatabaseObject::Function(_) => ObjectKind::Function,
            DatabaseObject::Procedure(_) => ObjectKind::Procedure,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DatabaseObject::Table(t) => &t.name,
            DatabaseObject::View(o) | DatabaseObject::Function(o) | DatabaseObject::Procedure(o) => {
                &o.name
            }
        }
    }

    pub fn schema(&self) -> &str {
        match self {
            DatabaseObject::Table(t) => &t.schema,
            DatabaseObject::View(o) | DatabaseObject::Function(o) | DatabaseObject::Procedure(o) => {
                &o.schema
            }
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            DatabaseObject::Table(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    pub database: String,
    pub name: String,
    pub owner: String,
    /// Objects keyed by name, unique across all kinds
    pub objects: IndexMap<String, DatabaseObject>,
}

impl Schema {
    pub fn new(decl: &SchemaDecl, database: &str) -> Self {
        Self {
            database: database.to_string(),
            name: decl.name.clone(),
            owner: decl.owner.clone(),
            objects: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, object: DatabaseObject) -> Result<()> {
        if self.objects.contains_key(object.name()) {
            return Err(SqlGenError::DuplicateObject {
                qualified_name: format!("{}.{}.{}", self.database, self.name, object.name()),
            });
        }
        self.objects.insert(object.name().to_string(), object);
        Ok(())
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.objects.get(name).and_then(DatabaseObject::as_table)
    }

    /// Categories present in this schema, in folder-inclusion order
    pub fn kinds(&self) -> Vec<ObjectKind> {
        ObjectKind::ALL
            .into_iter()
            .filter(|kind| self.objects.values().any(|o| o.kind() == *kind))
            .collect()
    }
}
