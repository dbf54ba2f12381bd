//! Reader for XML definition documents

use std::path::Path;
use std::str::FromStr;

use roxmltree::{Document, Node};

use super::*;
use crate::error::{Result, SqlGenError};

const ROOT_ELEMENT: &str = "Sql";

/// Read a definition file.
///
/// Returns `Ok(None)` when the document has no `Sql` root element.
pub fn read_definition(path: &Path) -> Result<Option<SqlDefinition>> {
    let content = std::fs::read_to_string(path).map_err(|e| SqlGenError::DefinitionReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let doc = Document::parse(&content).map_err(|e| SqlGenError::DefinitionParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    definition_from_document(&doc)
}

/// Parse a definition from an in-memory XML string
pub fn parse_definition(content: &str) -> Result<Option<SqlDefinition>> {
    let doc = Document::parse(content).map_err(|e| SqlGenError::definition(e.to_string()))?;
    definition_from_document(&doc)
}

fn definition_from_document(doc: &Document) -> Result<Option<SqlDefinition>> {
    let root = doc.root_element();
    if root.tag_name().name() != ROOT_ELEMENT {
        return Ok(None);
    }

    let projects = root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "SqlProject")
        .map(parse_project)
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(SqlDefinition { projects }))
}

fn parse_project(node: Node) -> Result<SqlProjectDecl> {
    let name = required_attr(node, "Name")?;
    let databases = container(node, "Databases")
        .map(parse_database)
        .collect::<Result<Vec<_>>>()?;

    Ok(SqlProjectDecl { name, databases })
}

fn parse_database(node: Node) -> Result<DatabaseDecl> {
    let includes = container(node, "DatabaseIncludes")
        .map(|folder| required_attr(folder, "Path"))
        .collect::<Result<Vec<_>>>()?;

    let dependencies = container(node, "Dependencies")
        .map(parse_dependency)
        .collect::<Result<Vec<_>>>()?;

    let schema_compare = node
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "SchemaCompare")
        .map(parse_schema_compare)
        .transpose()?;

    let schemas = container(node, "Schemas")
        .map(|schema| -> Result<SchemaDecl> {
            Ok(SchemaDecl {
                name: required_attr(schema, "Name")?,
                owner: required_attr(schema, "Owner")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let tables = container(node, "Tables")
        .map(parse_table)
        .collect::<Result<Vec<_>>>()?;

    Ok(DatabaseDecl {
        name: required_attr(node, "Name")?,
        create_project: bool_attr(node, "CreateProject", false)?,
        platform: parsed_attr(node, "TargetSqlServerPlatform")?.unwrap_or_default(),
        version: parsed_attr(node, "TargetSqlServerVersion")?.unwrap_or_default(),
        treat_tsql_warnings_as_errors: bool_attr(node, "TreatTSqlWarningsAsErrors", false)?,
        includes,
        dependencies,
        schema_compare,
        schemas,
        tables,
        views: scripted_objects(node, "Views")?,
        functions: scripted_objects(node, "Functions")?,
        procedures: scripted_objects(node, "Procedures")?,
    })
}

fn parse_dependency(node: Node) -> Result<Dependency> {
    let kind = match node.tag_name().name() {
        "DatabaseDependency" => DependencyKind::Database,
        "SystemDependency" => DependencyKind::System,
        "DacpacDependency" => DependencyKind::Dacpac,
        other => {
            return Err(SqlGenError::definition(format!(
                "Unknown dependency element {}",
                other
            )))
        }
    };

    Ok(Dependency {
        kind,
        name: required_attr(node, "Name")?,
    })
}

fn parse_schema_compare(node: Node) -> Result<SchemaCompareOptions> {
    Ok(SchemaCompareOptions {
        connection_string: required_attr(node, "ConnectionString")?,
        exclude_database_roles: bool_attr(node, "ExcludeDatabaseRoles", false)?,
        exclude_users: bool_attr(node, "ExcludeUsers", false)?,
        exclude_tables: bool_attr(node, "ExcludeTables", false)?,
        exclude_views: bool_attr(node, "ExcludeViews", false)?,
        exclude_procedures: bool_attr(node, "ExcludeProcedures", false)?,
        exclude_table_valued_functions: bool_attr(node, "ExcludeTableValuedFunctions", false)?,
        exclude_scalar_functions: bool_attr(node, "ExcludeScalarFunctions", false)?,
    })
}

fn parse_table(node: Node) -> Result<TableDecl> {
    let columns = container(node, "TableColumns")
        .map(parse_column)
        .collect::<Result<Vec<_>>>()?;

    let primary_key = node
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "PrimaryKey")
        .map(|pk| -> Result<PrimaryKeyDecl> {
            Ok(PrimaryKeyDecl {
                name: required_attr(pk, "Name")?,
                clustered: bool_attr(pk, "Clustered", false)?,
                compression: parsed_attr(pk, "CompressionType")?.unwrap_or_default(),
                columns: container(pk, "TablePrimaryKeyColumns")
                    .map(|c| required_attr(c, "ColumnName"))
                    .collect::<Result<Vec<_>>>()?,
            })
        })
        .transpose()?;

    let indexes = container(node, "Indexes")
        .map(parse_index)
        .collect::<Result<Vec<_>>>()?;

    let triggers = container(node, "Triggers").map(statement).collect();

    Ok(TableDecl {
        name: required_attr(node, "Name")?,
        schema: required_attr(node, "Schema")?,
        compression: parsed_attr(node, "CompressionType")?.unwrap_or_default(),
        columns,
        primary_key,
        indexes,
        triggers,
    })
}

fn parse_column(node: Node) -> Result<ColumnDecl> {
    let name = required_attr(node, "Name")?;
    let is_nullable = bool_attr(node, "IsNullable", false)?;

    match node.tag_name().name() {
        "TableColumn" => Ok(ColumnDecl::Plain(PlainColumnDecl {
            data_type: parsed_attr(node, "DataType")?.ok_or_else(|| missing(node, "DataType"))?,
            length: int_attr(node, "Length", 0)?,
            precision: int_attr(node, "Precision", -1)?,
            scale: int_attr(node, "Scale", -1)?,
            name,
            is_nullable,
        })),
        "ForeignKey" => Ok(ColumnDecl::ForeignKey(ForeignKeyColumnDecl {
            schema_name: required_attr(node, "SchemaName")?,
            table_name: required_attr(node, "TableName")?,
            column_name: required_attr(node, "ColumnName")?,
            name,
            is_nullable,
        })),
        "MultipleColumnForeignKey" => {
            let hint = node
                .children()
                .find(|n| n.is_element() && n.tag_name().name() == "ColumnReferenceHint")
                .ok_or_else(|| {
                    SqlGenError::definition(format!(
                        "MultipleColumnForeignKey {} is missing its ColumnReferenceHint",
                        name
                    ))
                })?;

            Ok(ColumnDecl::MultipleColumnForeignKey(
                MultiColumnForeignKeyDecl {
                    foreign_column_name: required_attr(node, "ForeignColumnName")?,
                    group_name: required_attr(node, "MultipleColumnTableReferenceGroupName")?,
                    hint: ColumnReferenceHint {
                        schema_name: required_attr(hint, "SchemaName")?,
                        table_name: required_attr(hint, "TableName")?,
                    },
                    name,
                    is_nullable,
                },
            ))
        }
        other => Err(SqlGenError::definition(format!(
            "Unknown column element {} ({})",
            other, name
        ))),
    }
}

fn parse_index(node: Node) -> Result<IndexDecl> {
    let columns = container(node, "TableIndexColumns")
        .map(|c| -> Result<IndexColumnDecl> {
            Ok(IndexColumnDecl {
                column_name: required_attr(c, "ColumnName")?,
                sort_order: parsed_attr(c, "SortOrder")?.unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let includes = container(node, "TableIndexIncludes")
        .map(|c| required_attr(c, "ColumnName"))
        .collect::<Result<Vec<_>>>()?;

    Ok(IndexDecl {
        name: required_attr(node, "Name")?,
        unique: bool_attr(node, "Unique", false)?,
        clustered: bool_attr(node, "Clustered", false)?,
        compression: parsed_attr(node, "CompressionType")?.unwrap_or_default(),
        columns,
        includes,
    })
}

fn scripted_objects(node: Node, container_name: &str) -> Result<Vec<ScriptedObjectDecl>> {
    container(node, container_name)
        .map(|object| -> Result<ScriptedObjectDecl> {
            Ok(ScriptedObjectDecl {
                name: required_attr(object, "Name")?,
                schema: required_attr(object, "Schema")?,
                statement: statement(object),
            })
        })
        .collect()
}

/// Element children of the named container child, if present
fn container<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
        .flat_map(|c| c.children().filter(|n| n.is_element()))
}

/// Statement text from a `Statement` attribute or the element's own text
fn statement(node: Node) -> String {
    if let Some(attr) = node.attribute("Statement") {
        return attr.to_string();
    }

    node.children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn missing(node: Node, attr: &str) -> SqlGenError {
    let name = node.attribute("Name").unwrap_or("<unnamed>");
    SqlGenError::definition(format!(
        "{} {} is missing required attribute {}",
        node.tag_name().name(),
        name,
        attr
    ))
}

fn required_attr(node: Node, attr: &str) -> Result<String> {
    node.attribute(attr)
        .map(|s| s.to_string())
        .ok_or_else(|| missing(node, attr))
}

fn bool_attr(node: Node, attr: &str, default: bool) -> Result<bool> {
    match node.attribute(attr) {
        None => Ok(default),
        Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
        Some(v) => Err(SqlGenError::definition(format!(
            "Attribute {} of {} must be true or false, got {}",
            attr,
            node.tag_name().name(),
            v
        ))),
    }
}

fn int_attr(node: Node, attr: &str, default: i32) -> Result<i32> {
    match node.attribute(attr) {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| {
            SqlGenError::definition(format!(
                "Attribute {} of {} must be an integer, got {}",
                attr,
                node.tag_name().name(),
                v
            ))
        }),
    }
}

fn parsed_attr<T>(node: Node, attr: &str) -> Result<Option<T>>
where
    T: FromStr<Err = SqlGenError>,
{
    node.attribute(attr).map(str::parse).transpose()
}
