//! Generation orchestrator
//!
//! One top-level project becomes one solution directory. All databases are
//! constructed first; only then are projects assembled and files written, so
//! a construction error leaves nothing on disk for that solution.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::GeneratorConfig;
use crate::context::RunContext;
use crate::ddl::database_scripts;
use crate::definition::{DependencyKind, SqlProjectDecl};
use crate::error::{Result, SqlGenError};
use crate::model::Database;
use crate::project::{resolve_include_path, write_scmp, PackageResolver, Project, Solution};
use crate::util::{file_name, path_segments, write_file};

/// What a single solution run produced
#[derive(Debug, Clone)]
pub struct SolutionOutput {
    pub name: String,
    /// `<output_dir>/<name>`
    pub directory: PathBuf,
    pub projects: Vec<Project>,
    /// Absent when no database asked for a project
    pub solution_path: Option<PathBuf>,
    pub script_count: usize,
}

/// Generate the solution for one top-level project with a fresh registry
pub fn generate_solution(
    decl: &SqlProjectDecl,
    config: &GeneratorConfig,
    packages: &dyn PackageResolver,
) -> Result<SolutionOutput> {
    let mut ctx = RunContext::new(config, packages);

    for database in &decl.databases {
        ctx.construct_database(database)?;
        debug!(
            "Constructed database {} ({} schemas, {} tables)",
            database.name,
            database.schemas.len(),
            database.tables.len()
        );
    }

    let directory = config.output_dir.join(&decl.name);
    let mut projects: Vec<Project> = Vec::new();
    let mut script_count = 0;

    for database in ctx.databases().filter(|d| d.create_project) {
        let project = Project::assemble(database, &projects, &ctx)?;
        let project_path = project.write(&directory)?;
        info!("Wrote project {}", project_path.display());

        if let Some(options) = &database.schema_compare {
            let scmp_path = write_scmp(&directory, &project, options)?;
            debug!("Wrote schema compare {}", scmp_path.display());
        }

        copy_include_folders(database, &directory, &ctx)?;
        copy_dacpacs(database, &directory, config)?;
        script_count += write_scripts(database, &directory)?;

        projects.push(project);
    }

    let solution_path = if projects.is_empty() {
        debug!("No projects requested for {}; skipping solution", decl.name);
        None
    } else {
        let solution = Solution::new(&decl.name, &projects);
        let path = solution.write(&directory)?;
        info!(
            "Wrote solution {} with {} projects",
            path.display(),
            projects.len()
        );
        Some(path)
    };

    Ok(SolutionOutput {
        name: decl.name.clone(),
        directory,
        projects,
        solution_path,
        script_count,
    })
}

/// Write every schema and object script under `<directory>/<database>/`
fn write_scripts(database: &Database, directory: &Path) -> Result<usize> {
    let database_dir = directory.join(&database.name);
    let scripts = database_scripts(database)?;

    for script in &scripts {
        write_file(&database_dir.join(&script.path), &script.content)?;
    }

    debug!("Wrote {} scripts for {}", scripts.len(), database.name);
    Ok(scripts.len())
}

fn copy_include_folders(database: &Database, directory: &Path, ctx: &RunContext) -> Result<()> {
    let destination = directory.join(&database.name);

    for include in &database.include_paths {
        let source = resolve_include_path(include, &ctx.config.project_dir, ctx.packages)?;
        if !source.is_dir() {
            return Err(SqlGenError::IncludeFolderNotFound { path: source });
        }

        let copied = copy_folder(&source, &destination)?;
        debug!("Copied {} files from {}", copied, source.display());
    }

    Ok(())
}

/// Recursively copy the files under `source` into `destination`, overwriting
fn copy_folder(source: &Path, destination: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(|e| SqlGenError::ReadError {
            path: source.to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(source)
            .unwrap_or(entry.path());
        let target = destination.join(relative);

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SqlGenError::write(parent, e))?;
        }
        std::fs::copy(entry.path(), &target).map_err(|e| SqlGenError::write(&target, e))?;
        copied += 1;
    }

    Ok(copied)
}

/// Copy dacpac dependencies next to the solution unless already present
fn copy_dacpacs(database: &Database, directory: &Path, config: &GeneratorConfig) -> Result<()> {
    let dacpacs = database
        .dependencies
        .iter()
        .filter(|d| d.kind == DependencyKind::Dacpac);

    for dependency in dacpacs {
        let source = path_segments(&dependency.name)
            .iter()
            .fold(config.project_dir.clone(), |acc, segment| acc.join(segment));
        if !source.is_file() {
            return Err(SqlGenError::DacpacNotFound {
                path: source,
                database: database.name.clone(),
            });
        }

        let target = directory.join(file_name(&dependency.name));
        if target.exists() {
            debug!("Dacpac {} already present", target.display());
            continue;
        }

        std::fs::create_dir_all(directory).map_err(|e| SqlGenError::write(directory, e))?;
        std::fs::copy(&source, &target).map_err(|e| SqlGenError::write(&target, e))?;
        debug!("Copied dacpac {}", target.display());
    }

    Ok(())
}
