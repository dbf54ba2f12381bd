//! Visual Studio solution (.sln) emission

use std::path::{Path, PathBuf};

use super::sqlproj::new_guid;
use super::Project;
use crate::error::Result;
use crate::util::write_file;

/// Project type id of SQL database projects
pub const SQLPROJ_TYPE_GUID: &str = "{00D1A9C2-B5F0-4AF3-8072-F6C62B433612}";

const CONFIGURATIONS: [&str; 2] = ["Debug", "Release"];
const STEPS: [&str; 3] = ["ActiveCfg", "Build.0", "Deploy.0"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionEntry {
    pub name: String,
    pub guid: String,
}

/// Solution listing every assembled project
#[derive(Debug, Clone)]
pub struct Solution {
    pub name: String,
    pub guid: String,
    pub entries: Vec<SolutionEntry>,
}

impl Solution {
    pub fn new(name: impl Into<String>, projects: &[Project]) -> Self {
        Self {
            name: name.into(),
            guid: new_guid(),
            entries: projects
                .iter()
                .map(|p| SolutionEntry {
                    name: p.name.clone(),
                    guid: p.guid.clone(),
                })
                .collect(),
        }
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            "Microsoft Visual Studio Solution File, Format Version 12.00".to_string(),
            "# Visual Studio Version 16".to_string(),
            "VisualStudioVersion = 16.0.31112.23".to_string(),
            "MinimumVisualStudioVersion = 10.0.40219.1".to_string(),
        ];

        for entry in &self.entries {
            lines.push(format!(
                "Project(\"{}\") = \"{}\", \"{}.sqlproj\", \"{}\"",
                SQLPROJ_TYPE_GUID, entry.name, entry.name, entry.guid
            ));
            lines.push("EndProject".to_string());
        }

        lines.push("Global".to_string());
        lines.push("\tGlobalSection(SolutionConfigurationPlatforms) = preSolution".to_string());
        for configuration in CONFIGURATIONS {
            lines.push(format!(
                "\t\t{0}|Any CPU = {0}|Any CPU",
                configuration
            ));
        }
        lines.push("\tEndGlobalSection".to_string());

        lines.push("\tGlobalSection(ProjectConfigurationPlatforms) = postSolution".to_string());
        for entry in &self.entries {
            for configuration in CONFIGURATIONS {
                for step in STEPS {
                    lines.push(format!(
                        "\t\t{guid}.{configuration}|Any CPU.{step} = {configuration}|Any CPU",
                        guid = entry.guid
                    ));
                }
            }
        }
        lines.push("\tEndGlobalSection".to_string());

        lines.push("\tGlobalSection(SolutionProperties) = preSolution".to_string());
        lines.push("\t\tHideSolutionNode = FALSE".to_string());
        lines.push("\tEndGlobalSection".to_string());
        lines.push("\tGlobalSection(ExtensibilityGlobals) = postSolution".to_string());
        lines.push(format!("\t\tSolutionGuid = {}", self.guid));
        lines.push("\tEndGlobalSection".to_string());
        lines.push("EndGlobal".to_string());

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Write `<name>.sln` into `dir`
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}.sln", self.name));
        write_file(&path, self.render())?;
        Ok(path)
    }
}
