//! Generator configuration

use std::path::PathBuf;

/// Settings shared by every database of a run
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    /// Solutions are written to `<output_dir>/<project name>/`
    pub output_dir: PathBuf,
    /// Base for relative include folders and dacpac dependencies
    pub project_dir: PathBuf,
    /// Visual Studio edition (e.g. `Enterprise`) used in system dependency
    /// paths for non-Azure targets
    pub visual_studio_edition: Option<String>,
}

impl GeneratorConfig {
    pub fn new(output_dir: impl Into<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            project_dir: project_dir.into(),
            visual_studio_edition: None,
        }
    }

    pub fn with_edition(mut self, edition: impl Into<String>) -> Self {
        self.visual_studio_edition = Some(edition.into());
        self
    }
}
