//! DDL script rendering
//!
//! Turns constructed model objects into SQL Server scripts. Every statement
//! is terminated by a batch separator: a `GO` line followed by a blank line.
//! Rendering is pure; the only failure is an identifier with a single bracket.

use std::path::PathBuf;

use crate::error::Result;
use crate::model::{
    Column, Database, DatabaseObject, ForeignKey, Index, ObjectKind, PrimaryKey, Schema, Table,
};
use crate::util::{add_brackets, shorten_if_too_long};

const BATCH_SEPARATOR: &str = "GO";

/// A rendered script and its path relative to the database folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFile {
    pub path: PathBuf,
    pub content: String,
}

/// Accumulates SQL text batch by batch
#[derive(Debug, Default)]
struct Script {
    text: String,
}

impl Script {
    fn line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    /// Terminate the current batch
    fn go(&mut self) {
        self.text.push_str(BATCH_SEPARATOR);
        self.text.push_str("\n\n");
    }

    /// Append a complete statement as its own batch
    fn batch(&mut self, statement: &str) {
        self.text.push_str(statement);
        if !statement.ends_with('\n') {
            self.text.push('\n');
        }
        self.go();
    }

    fn finish(self) -> String {
        self.text
    }
}

/// `\t[Name] type NULL,`
pub fn render_column(column: &Column) -> Result<String> {
    let nullable = if column.nullable { "NULL" } else { "NOT NULL" };
    Ok(format!(
        "\t{} {} {},",
        add_brackets(&column.name)?,
        column.sql_type(),
        nullable
    ))
}

/// Constraint clause placed inside the CREATE TABLE body
pub fn render_primary_key(pk: &PrimaryKey) -> Result<String> {
    Ok(format!(
        "\tCONSTRAINT {} PRIMARY KEY {} ({}) WITH (DATA_COMPRESSION = {})",
        add_brackets(&pk.name)?,
        clustering(pk.clustered),
        bracketed_list(&pk.columns)?,
        pk.compression
    ))
}

/// Full table script: CREATE TABLE, then foreign keys, indexes and triggers
pub fn render_table(table: &Table) -> Result<String> {
    let two_part_name = table.two_part_name();
    let mut script = Script::default();

    script.line(&format!("CREATE TABLE {}", two_part_name));
    script.line("(");
    for column in table.columns.values() {
        script.line(&render_column(column)?);
    }
    if let Some(pk) = &table.primary_key {
        script.line(&render_primary_key(pk)?);
    }
    script.line(")");
    script.line("ON [PRIMARY]");

    if table.compression.is_columnstore() {
        script.go();
        script.line(&format!(
            "CREATE CLUSTERED COLUMNSTORE INDEX CCSIX_{} ON {}",
            table.name, two_part_name
        ));
    }
    script.line(&format!(
        "WITH (DATA_COMPRESSION = {});",
        table.compression
    ));
    script.go();

    for fk in &table.foreign_keys {
        render_foreign_key(&mut script, &two_part_name, fk)?;
    }

    for index in &table.indexes {
        script.batch(&render_index(&two_part_name, index)?);
    }

    for trigger in &table.triggers {
        script.line(trigger);
        script.go();
    }

    Ok(script.finish())
}

/// ADD CONSTRAINT followed by NOCHECK, each in its own batch
fn render_foreign_key(script: &mut Script, table: &str, fk: &ForeignKey) -> Result<()> {
    let name = shorten_if_too_long(&fk.name);

    script.line(&format!(
        "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({})",
        table,
        name,
        bracketed_list(&fk.columns)?
    ));
    script.line(&format!(
        "REFERENCES {} ({});",
        fk.referenced_table.two_part_name(),
        bracketed_list(&fk.referenced_columns)?
    ));
    script.go();

    script.line(&format!("ALTER TABLE {} NOCHECK CONSTRAINT {};", table, name));
    script.go();

    Ok(())
}

/// CREATE INDEX statement without its batch separator
pub fn render_index(table: &str, index: &Index) -> Result<String> {
    let unique = if index.unique { "UNIQUE " } else { "" };

    let columns = index
        .columns
        .iter()
        .map(|c| Ok(format!("{} {}", add_brackets(&c.name)?, c.sort_order)))
        .collect::<Result<Vec<_>>>()?
        .join(", ");

    let mut sql = format!(
        "CREATE {}{} INDEX {}\nON {} ({})\n",
        unique,
        clustering(index.clustered),
        add_brackets(&index.name)?,
        table,
        columns
    );
    if !index.includes.is_empty() {
        sql.push_str(&format!("INCLUDE ({})\n", bracketed_list(&index.includes)?));
    }
    sql.push_str(&format!(
        "WITH (DATA_COMPRESSION = {})\nON [PRIMARY];\n",
        index.compression
    ));

    Ok(sql)
}

pub fn render_schema(schema: &Schema) -> String {
    format!("CREATE SCHEMA [{}] AUTHORIZATION {};", schema.name, schema.owner)
}

/// Script body of any schema object
pub fn render_object(object: &DatabaseObject) -> Result<String> {
    match object {
        DatabaseObject::Table(table) => render_table(table),
        DatabaseObject::View(o) | DatabaseObject::Function(o) | DatabaseObject::Procedure(o) => {
            Ok(o.statement.clone())
        }
    }
}

/// `Security/<schema>.sql`
pub fn schema_path(schema: &Schema) -> PathBuf {
    PathBuf::from("Security").join(format!("{}.sql", schema.name))
}

/// `<schema>/<Folder>/<name>.sql`
pub fn object_path(object: &DatabaseObject) -> PathBuf {
    object_folder(object.schema(), object.kind()).join(format!("{}.sql", object.name()))
}

pub fn object_folder(schema: &str, kind: ObjectKind) -> PathBuf {
    PathBuf::from(schema).join(kind.folder_name())
}

/// Every script of a database: schemas first, then their objects
pub fn database_scripts(database: &Database) -> Result<Vec<ScriptFile>> {
    let mut files = Vec::new();

    for schema in database.schemas.values() {
        files.push(ScriptFile {
            path: schema_path(schema),
            content: render_schema(schema),
        });
    }

    for object in database.objects() {
        files.push(ScriptFile {
            path: object_path(object),
            content: render_object(object)?,
        });
    }

    Ok(files)
}

fn clustering(clustered: bool) -> &'static str {
    if clustered {
        "CLUSTERED"
    } else {
        "NONCLUSTERED"
    }
}

fn bracketed_list(names: &[String]) -> Result<String> {
    Ok(names
        .iter()
        .map(|n| add_brackets(n))
        .collect::<Result<Vec<_>>>()?
        .join(", "))
}
