//! Run-scoped registry of constructed databases

use indexmap::IndexMap;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::definition::DatabaseDecl;
use crate::error::{Result, SqlGenError};
use crate::model::{
    Column, ColumnKey, ColumnResolver, Database, DatabaseObject, ScriptedObject, Table,
};
use crate::project::PackageResolver;

/// State for one generation run.
///
/// Databases are registered before their objects are generated so that
/// foreign-key columns can resolve against tables built earlier. A key always
/// names the owning table's database; lookups go through the registry.
pub struct RunContext<'a> {
    pub config: &'a GeneratorConfig,
    pub packages: &'a dyn PackageResolver,
    databases: IndexMap<String, Database>,
}

impl<'a> RunContext<'a> {
    pub fn new(config: &'a GeneratorConfig, packages: &'a dyn PackageResolver) -> Self {
        Self {
            config,
            packages,
            databases: IndexMap::new(),
        }
    }

    /// Register and populate a database
    pub fn construct_database(&mut self, decl: &DatabaseDecl) -> Result<()> {
        self.register_database(decl)?;
        self.generate_objects(decl)
    }

    pub fn register_database(&mut self, decl: &DatabaseDecl) -> Result<()> {
        if self.databases.contains_key(&decl.name) {
            return Err(SqlGenError::DuplicateDatabase {
                database: decl.name.clone(),
            });
        }
        self.databases.insert(decl.name.clone(), Database::new(decl));
        Ok(())
    }

    /// Populate a registered database: schemas, tables, views, functions,
    /// then procedures.
    pub fn generate_objects(&mut self, decl: &DatabaseDecl) -> Result<()> {
        for schema in &decl.schemas {
            self.database_mut(&decl.name)?.add_schema(schema)?;
        }

        for table in &decl.tables {
            let table = Table::build(table, &decl.name, &*self)?;
            debug!(
                "Built table {}.{} with {} columns",
                decl.name,
                table.two_part_name(),
                table.columns.len()
            );
            self.database_mut(&decl.name)?
                .add_object(DatabaseObject::Table(table))?;
        }

        let scripted = decl
            .views
            .iter()
            .map(|v| DatabaseObject::View(ScriptedObject::new(v, &decl.name)))
            .chain(
                decl.functions
                    .iter()
                    .map(|f| DatabaseObject::Function(ScriptedObject::new(f, &decl.name))),
            )
            .chain(
                decl.procedures
                    .iter()
                    .map(|p| DatabaseObject::Procedure(ScriptedObject::new(p, &decl.name))),
            );

        let database = self.database_mut(&decl.name)?;
        for object in scripted {
            database.add_object(object)?;
        }

        Ok(())
    }

    pub fn database(&self, name: &str) -> Result<&Database> {
        self.databases
            .get(name)
            .ok_or_else(|| SqlGenError::DatabaseNotRegistered {
                database: name.to_string(),
            })
    }

    fn database_mut(&mut self, name: &str) -> Result<&mut Database> {
        self.databases
            .get_mut(name)
            .ok_or_else(|| SqlGenError::DatabaseNotRegistered {
                database: name.to_string(),
            })
    }

    /// Databases in registration order
    pub fn databases(&self) -> impl Iterator<Item = &Database> {
        self.databases.values()
    }
}

impl ColumnResolver for RunContext<'_> {
    fn resolve_column(&self, key: &ColumnKey) -> Result<&Column> {
        self.databases
            .get(&key.table.database)
            .and_then(|db| db.find_table(&key.table.schema, &key.table.table))
            .and_then(|table| table.columns.get(&key.column))
            .ok_or_else(|| key.not_found())
    }
}
