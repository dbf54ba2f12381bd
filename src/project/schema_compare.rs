//! Schema-compare (.scmp) descriptors

use std::path::{Path, PathBuf};

use super::xml::XmlDocument;
use super::Project;
use crate::definition::SchemaCompareOptions;
use crate::error::Result;
use crate::util::write_file;

const SQL_OBJECT_TYPE_PREFIX: &str = "Microsoft.Data.Tools.Schema.Sql.SchemaModel.";

/// Object types excluded from comparison, in a fixed order
pub fn excluded_types(options: &SchemaCompareOptions) -> Vec<&'static str> {
    [
        (options.exclude_database_roles, "SqlRole"),
        (options.exclude_users, "SqlUser"),
        (options.exclude_tables, "SqlTable"),
        (options.exclude_views, "SqlView"),
        (options.exclude_procedures, "SqlProcedure"),
        (options.exclude_table_valued_functions, "SqlTableValuedFunction"),
        (options.exclude_scalar_functions, "SqlScalarFunction"),
    ]
    .into_iter()
    .filter_map(|(excluded, name)| excluded.then_some(name))
    .collect()
}

/// Render the descriptor comparing `project` against the target database
pub fn render_scmp(project: &Project, options: &SchemaCompareOptions) -> Result<String> {
    let mut xml = XmlDocument::new()?;

    xml.start("SchemaComparison", &[])?;
    xml.element("Version", "10")?;

    xml.start("SourceModelProvider", &[])?;
    xml.start("ProjectBasedModelProvider", &[])?;
    xml.element("ProjectFilePath", &project.file_name())?;
    xml.element("ProjectGuid", &project.guid)?;
    xml.element("Dsp", &project.dsp)?;
    xml.element("FolderStructure", "3")?;
    xml.end("ProjectBasedModelProvider")?;
    xml.end("SourceModelProvider")?;

    xml.start("TargetModelProvider", &[])?;
    xml.start("ConnectionBasedModelProvider", &[])?;
    xml.element("ConnectionString", &options.connection_string)?;
    xml.end("ConnectionBasedModelProvider")?;
    xml.end("TargetModelProvider")?;

    xml.start("ExcludedTypes", &[])?;
    for name in excluded_types(options) {
        xml.element("ExcludedType", &format!("{}{}", SQL_OBJECT_TYPE_PREFIX, name))?;
    }
    xml.end("ExcludedTypes")?;

    xml.end("SchemaComparison")?;
    xml.finish()
}

/// Write `<name>.scmp` into `dir`
pub fn write_scmp(dir: &Path, project: &Project, options: &SchemaCompareOptions) -> Result<PathBuf> {
    let path = dir.join(format!("{}.scmp", project.name));
    write_file(&path, render_scmp(project, options)?)?;
    Ok(path)
}
