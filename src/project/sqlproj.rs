//! SQL project (.sqlproj) assembly and emission

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::packages::resolve_include_path;
use super::xml::{msbuild_bool, XmlDocument};
use crate::context::RunContext;
use crate::definition::DependencyKind;
use crate::error::{Result, SqlGenError};
use crate::model::{dsp_name, Database, SqlServerPlatform};
use crate::util::{file_name, write_file};

const MSBUILD_NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

/// System databases that may be referenced as dacpac dependencies
pub const SYSTEM_DATABASES: [&str; 2] = ["master", "msdb"];

const VISUAL_STUDIO_ROOT: &str = r"C:\Program Files (x86)\Microsoft Visual Studio\2019";
const AZURE_DACPAC_ROOT: &str = "$(DacPacRootPath)";

/// A resolved reference in the project's dependency item group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectDependency {
    /// Pre-built dacpac copied next to the solution
    Dacpac { file_name: String },
    /// Another project of the same solution
    Project { name: String, guid: String },
    /// System database shipped with the SQL tooling
    System { name: String, hint_path: String },
}

/// Build descriptor for one database
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    /// `{UPPERCASE-GUID}`
    pub guid: String,
    pub dsp: String,
    pub treat_tsql_warnings_as_errors: bool,
    pub dependencies: Vec<ProjectDependency>,
    pub has_schema_compare: bool,
    /// Folder include entries, each ending in `\`
    pub folders: Vec<String>,
}

impl Project {
    /// Assemble the descriptor for `database`.
    ///
    /// Database dependencies resolve only against `previous`, the projects
    /// assembled before this one.
    pub fn assemble(database: &Database, previous: &[Project], ctx: &RunContext) -> Result<Self> {
        let dependencies = database
            .dependencies
            .iter()
            .map(|dependency| match dependency.kind {
                DependencyKind::Dacpac => Ok(ProjectDependency::Dacpac {
                    file_name: file_name(&dependency.name).to_string(),
                }),
                DependencyKind::Database => previous
                    .iter()
                    .find(|p| p.name == dependency.name)
                    .map(|p| ProjectDependency::Project {
                        name: p.name.clone(),
                        guid: p.guid.clone(),
                    })
                    .ok_or_else(|| SqlGenError::DependencyNotFound {
                        dependency: dependency.name.clone(),
                        database: database.name.clone(),
                    }),
                DependencyKind::System => system_dependency(database, &dependency.name, ctx),
            })
            .collect::<Result<Vec<_>>>()?;

        let folders = folder_includes(database, ctx)?;

        debug!(
            "Assembled project {} with {} dependencies and {} folders",
            database.name,
            dependencies.len(),
            folders.len()
        );

        Ok(Self {
            name: database.name.clone(),
            guid: new_guid(),
            dsp: dsp_name(database.platform, database.version),
            treat_tsql_warnings_as_errors: database.treat_tsql_warnings_as_errors,
            dependencies,
            has_schema_compare: database.schema_compare.is_some(),
            folders,
        })
    }

    pub fn file_name(&self) -> String {
        format!("{}.sqlproj", self.name)
    }

    /// Build item glob covering every generated script
    pub fn build_glob(&self) -> String {
        format!(r"{}\**\*.sql", self.name)
    }

    pub fn to_xml(&self) -> Result<String> {
        let mut xml = XmlDocument::new()?;
        let warnings_as_errors = msbuild_bool(self.treat_tsql_warnings_as_errors);

        xml.start(
            "Project",
            &[
                ("DefaultTargets", "Build"),
                ("xmlns", MSBUILD_NAMESPACE),
                ("ToolsVersion", "4.0"),
            ],
        )?;
        xml.empty(
            "Import",
            &[
                (
                    "Project",
                    r"$(MSBuildExtensionsPath)\$(MSBuildToolsVersion)\Microsoft.Common.props",
                ),
                (
                    "Condition",
                    r"Exists('$(MSBuildExtensionsPath)\$(MSBuildToolsVersion)\Microsoft.Common.props')",
                ),
            ],
        )?;

        xml.start("PropertyGroup", &[])?;
        xml.element_with("Configuration", &[("Condition", " '$(Configuration)' == '' ")], "Debug")?;
        xml.element_with("Platform", &[("Condition", " '$(Platform)' == '' ")], "AnyCPU")?;
        xml.element("Name", &self.name)?;
        xml.element("SchemaVersion", "2.0")?;
        xml.element("ProjectVersion", "4.1")?;
        xml.element("ProjectGuid", &self.guid)?;
        xml.element("DSP", &self.dsp)?;
        xml.element("OutputType", "Database")?;
        xml.empty("RootPath", &[])?;
        xml.element("RootNamespace", &self.name)?;
        xml.element("AssemblyName", &self.name)?;
        xml.element("ModelCollation", "1033, CI")?;
        xml.element("DefaultFileStructure", "BySchemaAndSchemaType")?;
        xml.element("DeployToDatabase", "True")?;
        xml.element("TargetFrameworkVersion", "v4.8")?;
        xml.element("TargetLanguage", "CS")?;
        xml.element("AppDesignerFolder", "Properties")?;
        xml.element("SqlServerVerification", "False")?;
        xml.element("IncludeCompositeObjects", "True")?;
        xml.element("TargetDatabaseSet", "True")?;
        xml.end("PropertyGroup")?;

        xml.start(
            "PropertyGroup",
            &[("Condition", " '$(Configuration)|$(Platform)' == 'Release|AnyCPU' ")],
        )?;
        xml.element("OutputPath", r"bin\Release\")?;
        xml.element("BuildScriptName", "$(MSBuildProjectName).sql")?;
        xml.element("TreatWarningsAsErrors", "False")?;
        xml.element("DebugType", "pdbonly")?;
        xml.element("Optimize", "true")?;
        xml.element("DefineDebug", "false")?;
        xml.element("DefineTrace", "true")?;
        xml.element("ErrorReport", "prompt")?;
        xml.element("WarningLevel", "4")?;
        xml.element("TreatTSqlWarningsAsErrors", warnings_as_errors)?;
        xml.end("PropertyGroup")?;

        xml.start(
            "PropertyGroup",
            &[("Condition", " '$(Configuration)|$(Platform)' == 'Debug|AnyCPU' ")],
        )?;
        xml.element("OutputPath", r"bin\Debug\")?;
        xml.element("BuildScriptName", "$(MSBuildProjectName).sql")?;
        xml.element("TreatWarningsAsErrors", "false")?;
        xml.element("DebugSymbols", "true")?;
        xml.element("DebugType", "full")?;
        xml.element("Optimize", "false")?;
        xml.element("DefineDebug", "true")?;
        xml.element("DefineTrace", "true")?;
        xml.element("ErrorReport", "prompt")?;
        xml.element("WarningLevel", "4")?;
        xml.element("TreatTSqlWarningsAsErrors", warnings_as_errors)?;
        xml.end("PropertyGroup")?;

        xml.start("PropertyGroup", &[])?;
        xml.element_with(
            "VisualStudioVersion",
            &[("Condition", "'$(VisualStudioVersion)' == ''")],
            "11.0",
        )?;
        xml.element_with(
            "SSDTExists",
            &[(
                "Condition",
                r"Exists('$(MSBuildExtensionsPath)\Microsoft\VisualStudio\v$(VisualStudioVersion)\SSDT\Microsoft.Data.Tools.Schema.SqlTasks.targets')",
            )],
            "True",
        )?;
        xml.element_with(
            "VisualStudioVersion",
            &[("Condition", "'$(SSDTExists)' == ''")],
            "11.0",
        )?;
        xml.end("PropertyGroup")?;

        xml.empty(
            "Import",
            &[
                ("Condition", "'$(SQLDBExtensionsRefPath)' != ''"),
                (
                    "Project",
                    r"$(SQLDBExtensionsRefPath)\Microsoft.Data.Tools.Schema.SqlTasks.targets",
                ),
            ],
        )?;
        xml.empty(
            "Import",
            &[
                ("Condition", "'$(SQLDBExtensionsRefPath)' == ''"),
                (
                    "Project",
                    r"$(MSBuildExtensionsPath)\Microsoft\VisualStudio\v$(VisualStudioVersion)\SSDT\Microsoft.Data.Tools.Schema.SqlTasks.targets",
                ),
            ],
        )?;

        xml.start("ItemGroup", &[])?;
        xml.empty("Build", &[("Include", self.build_glob().as_str())])?;
        xml.empty("Folder", &[("Include", self.name.as_str())])?;
        xml.end("ItemGroup")?;

        xml.start("ItemGroup", &[])?;
        for dependency in &self.dependencies {
            write_dependency(&mut xml, dependency)?;
        }
        xml.end("ItemGroup")?;

        xml.start("ItemGroup", &[])?;
        if self.has_schema_compare {
            xml.empty("None", &[("Include", format!("{}.scmp", self.name).as_str())])?;
        }
        xml.end("ItemGroup")?;

        xml.start("ItemGroup", &[])?;
        for folder in &self.folders {
            xml.empty("Folder", &[("Include", folder.as_str())])?;
        }
        xml.end("ItemGroup")?;

        xml.end("Project")?;
        xml.finish()
    }

    /// Write `<name>.sqlproj` into `dir`
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        write_file(&path, self.to_xml()?)?;
        Ok(path)
    }
}

fn write_dependency(xml: &mut XmlDocument, dependency: &ProjectDependency) -> Result<()> {
    match dependency {
        ProjectDependency::Dacpac { file_name } => {
            let stem = Path::new(file_name)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or(file_name);
            xml.start("ArtifactReference", &[("Include", file_name.as_str())])?;
            xml.element("HintPath", file_name)?;
            xml.element("SuppressMissingDependenciesErrors", "False")?;
            xml.element("DatabaseVariableLiteralValue", stem)?;
            xml.end("ArtifactReference")
        }
        ProjectDependency::Project { name, guid } => {
            xml.start("ProjectReference", &[("Include", format!("{}.sqlproj", name).as_str())])?;
            xml.element("Name", name)?;
            xml.element("Project", guid)?;
            xml.element("Private", "True")?;
            xml.element("SuppressMissingDependenciesErrors", "False")?;
            xml.element("DatabaseVariableLiteralValue", name)?;
            xml.end("ProjectReference")
        }
        ProjectDependency::System { name, hint_path } => {
            xml.start("ArtifactReference", &[("Include", hint_path.as_str())])?;
            xml.element("HintPath", hint_path)?;
            xml.element("SuppressMissingDependenciesErrors", "False")?;
            xml.element("DatabaseVariableLiteralValue", name)?;
            xml.end("ArtifactReference")
        }
    }
}

fn system_dependency(
    database: &Database,
    name: &str,
    ctx: &RunContext,
) -> Result<ProjectDependency> {
    if !SYSTEM_DATABASES.contains(&name) {
        return Err(SqlGenError::InvalidSystemDependency {
            dependency: name.to_string(),
            database: database.name.clone(),
        });
    }

    let (root, sub_folder) = match database.platform {
        SqlServerPlatform::Azure => (AZURE_DACPAC_ROOT.to_string(), "AzureV12".to_string()),
        SqlServerPlatform::SqlServer => {
            let edition = ctx.config.visual_studio_edition.as_deref().ok_or_else(|| {
                SqlGenError::MissingConfiguration {
                    key: "VisualStudioEdition".to_string(),
                    database: database.name.clone(),
                }
            })?;
            (
                format!(r"{}\{}\Common7\IDE", VISUAL_STUDIO_ROOT, edition),
                format!("{}0", database.version.major()),
            )
        }
    };

    Ok(ProjectDependency::System {
        name: name.to_string(),
        hint_path: format!(
            r"{}\Extensions\Microsoft\SQLDB\Extensions\SqlServer\{}\SqlSchemas\{}.dacpac",
            root, sub_folder, name
        ),
    })
}

/// Folder entries: security, each schema with its object categories, then
/// the top two directory levels of every include path.
fn folder_includes(database: &Database, ctx: &RunContext) -> Result<Vec<String>> {
    let db = &database.name;
    let mut folders = vec![format!(r"{}\Security\", db)];

    for schema in database.schemas.values() {
        folders.push(format!(r"{}\{}\", db, schema.name));
        for kind in schema.kinds() {
            folders.push(format!(r"{}\{}\{}\", db, schema.name, kind.folder_name()));
        }
    }

    for include in &database.include_paths {
        let root = resolve_include_path(include, &ctx.config.project_dir, ctx.packages)?;
        if !root.is_dir() {
            return Err(SqlGenError::IncludeFolderNotFound { path: root });
        }

        let walker = WalkDir::new(&root)
            .min_depth(1)
            .max_depth(2)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| SqlGenError::ReadError {
                path: root.clone(),
                source: e.into(),
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&root)
                .unwrap_or(entry.path())
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(r"\");
            let folder = format!(r"{}\{}\", db, relative);

            if !folders.contains(&folder) {
                folders.push(folder);
            }
        }
    }

    Ok(folders)
}

/// New project id in `{XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}` form
pub fn new_guid() -> String {
    format!("{{{}}}", uuid::Uuid::new_v4().to_string().to_uppercase())
}
