//! Tables and the components they own

use indexmap::IndexMap;

use super::column::{Column, ColumnResolver, TableKey};
use super::types::{CompressionType, SortOrder};
use crate::definition::{ColumnDecl, IndexDecl, PrimaryKeyDecl, TableDecl};
use crate::error::{Result, SqlGenError};

/// Table with columns in declaration order
#[derive(Debug, Clone)]
pub struct Table {
    pub database: String,
    pub schema: String,
    pub name: String,
    pub compression: CompressionType,
    pub columns: IndexMap<String, Column>,
    pub primary_key: Option<PrimaryKey>,
    pub foreign_keys: Vec<ForeignKey>,
    pub indexes: Vec<Index>,
    /// Trigger bodies, emitted verbatim
    pub triggers: Vec<String>,
}

/// Primary key constraint rendered inside CREATE TABLE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    pub name: String,
    pub clustered: bool,
    pub compression: CompressionType,
    /// Names of owned columns, in key order
    pub columns: Vec<String>,
}

/// Foreign key constraint added after the table is created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Bracketed, not yet shortened
    pub name: String,
    pub columns: Vec<String>,
    pub referenced_table: TableKey,
    pub referenced_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    pub unique: bool,
    pub clustered: bool,
    pub compression: CompressionType,
    pub columns: Vec<IndexColumn>,
    /// Non-key columns stored at the leaf level
    pub includes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    pub name: String,
    pub sort_order: SortOrder,
}

impl Table {
    /// Construct a table from its declaration.
    ///
    /// Columns are built first, resolving foreign-key columns through
    /// `resolver`; then the primary key, indexes and triggers, all of which
    /// may only name columns that already exist.
    pub fn build(decl: &TableDecl, database: &str, resolver: &impl ColumnResolver) -> Result<Self> {
        let mut table = Table {
            database: database.to_string(),
            schema: decl.schema.clone(),
            name: decl.name.clone(),
            compression: decl.compression,
            columns: IndexMap::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
            triggers: decl.triggers.clone(),
        };

        table.build_columns(&decl.columns, resolver)?;

        if let Some(pk) = &decl.primary_key {
            table.primary_key = Some(table.build_primary_key(pk)?);
        }

        for index in &decl.indexes {
            let index = table.build_index(index)?;
            table.indexes.push(index);
        }

        Ok(table)
    }

    pub fn key(&self) -> TableKey {
        TableKey::new(&self.database, &self.schema, &self.name)
    }

    /// `[schema].[name]`
    pub fn two_part_name(&self) -> String {
        self.key().two_part_name()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| self.key().column(name).not_found())
    }

    fn build_columns(&mut self, columns: &[ColumnDecl], resolver: &impl ColumnResolver) -> Result<()> {
        // Position in `foreign_keys` of each composite group seen so far
        let mut groups: IndexMap<String, usize> = IndexMap::new();

        for decl in columns {
            let column = match decl {
                ColumnDecl::Plain(plain) => Column::new(plain, &self.key())?,
                ColumnDecl::ForeignKey(fk) => {
                    let target = TableKey::new(&self.database, &fk.schema_name, &fk.table_name);
                    let key = target.column(&fk.column_name);
                    let referenced = resolver.resolve_column(&key)?;

                    self.foreign_keys.push(ForeignKey {
                        name: format!("[FK_{}_{}_{}]", self.name, fk.table_name, fk.name),
                        columns: vec![fk.name.clone()],
                        referenced_table: target,
                        referenced_columns: vec![fk.column_name.clone()],
                    });

                    Column::referencing(&fk.name, fk.is_nullable, referenced, key)
                }
                ColumnDecl::MultipleColumnForeignKey(member) => {
                    let target = TableKey::new(
                        &self.database,
                        &member.hint.schema_name,
                        &member.hint.table_name,
                    );
                    let key = target.column(&member.foreign_column_name);
                    let referenced = resolver.resolve_column(&key)?;

                    match groups.get(&member.group_name) {
                        Some(&position) => {
                            if self.foreign_keys[position].referenced_table != target {
                                return Err(SqlGenError::definition(format!(
                                    "{} groups columns referencing {} and {} under foreign key {}",
                                    self.key(),
                                    self.foreign_keys[position].referenced_table,
                                    target,
                                    member.group_name
                                )));
                            }
                            let fk = &mut self.foreign_keys[position];
                            fk.columns.push(member.name.clone());
                            fk.referenced_columns.push(member.foreign_column_name.clone());
                        }
                        None => {
                            groups.insert(member.group_name.clone(), self.foreign_keys.len());
                            self.foreign_keys.push(ForeignKey {
                                name: format!(
                                    "[FK_{}_{}_{}]",
                                    self.name, member.hint.table_name, member.group_name
                                ),
                                columns: vec![member.name.clone()],
                                referenced_table: target,
                                referenced_columns: vec![member.foreign_column_name.clone()],
                            });
                        }
                    }

                    Column::referencing(&member.name, member.is_nullable, referenced, key)
                }
            };

            if self.columns.contains_key(&column.name) {
                return Err(SqlGenError::DuplicateColumn {
                    table: self.key().to_string(),
                    column: column.name,
                });
            }
            self.columns.insert(column.name.clone(), column);
        }

        Ok(())
    }

    fn build_primary_key(&self, decl: &PrimaryKeyDecl) -> Result<PrimaryKey> {
        for column in &decl.columns {
            self.column(column)?;
        }

        // Clustered keys keep their own compression only on uncompressed tables
        let compression = if !decl.clustered || self.compression == CompressionType::None {
            decl.compression
        } else {
            CompressionType::None
        };

        Ok(PrimaryKey {
            name: decl.name.clone(),
            clustered: decl.clustered,
            compression,
            columns: decl.columns.clone(),
        })
    }

    fn build_index(&self, decl: &IndexDecl) -> Result<Index> {
        for column in &decl.columns {
            self.column(&column.column_name)?;
        }
        for include in &decl.includes {
            self.column(include)?;
        }

        Ok(Index {
            name: decl.name.clone(),
            unique: decl.unique,
            clustered: decl.clustered,
            compression: decl.compression,
            columns: decl
                .columns
                .iter()
                .map(|c| IndexColumn {
                    name: c.column_name.clone(),
                    sort_order: c.sort_order,
                })
                .collect(),
            includes: decl.includes.clone(),
        })
    }
}
