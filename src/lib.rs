//! sqlproj-gen: SQL Server database project generator
//!
//! This library turns a declarative database definition into DDL scripts
//! organized by schema and object type, one `.sqlproj` per database and a
//! `.sln` tying the projects together.

pub mod config;
pub mod context;
pub mod ddl;
pub mod definition;
pub mod error;
pub mod generator;
pub mod model;
pub mod project;
pub mod util;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};

pub use config::GeneratorConfig;
pub use error::SqlGenError;
pub use generator::{generate_solution, SolutionOutput};
pub use project::{PackageMap, PackageResolver};

/// Options for a generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Path to the XML definition document
    pub definition_path: PathBuf,
    pub config: GeneratorConfig,
    /// Content directories for package-relative include paths
    pub packages: PackageMap,
}

/// Generate one solution per top-level project in the definition file
pub fn generate(options: GenerateOptions) -> Result<Vec<SolutionOutput>> {
    let started = Instant::now();
    info!(
        "Reading definition: {} ({} package mappings)",
        options.definition_path.display(),
        options.packages.len()
    );

    let definition = match definition::read_definition(&options.definition_path)? {
        Some(definition) => definition,
        None => {
            warn!(
                "{} has no Sql root element; nothing to generate",
                options.definition_path.display()
            );
            return Ok(Vec::new());
        }
    };

    let mut outputs = Vec::with_capacity(definition.projects.len());
    for project in &definition.projects {
        info!(
            "Generating solution {} ({} databases)",
            project.name,
            project.databases.len()
        );
        outputs.push(generate_solution(
            project,
            &options.config,
            &options.packages,
        )?);
    }

    info!(
        "Generated {} solutions in {:.2?}",
        outputs.len(),
        started.elapsed()
    );

    Ok(outputs)
}
