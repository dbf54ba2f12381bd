//! Project, solution and schema-compare descriptors

mod packages;
mod schema_compare;
mod solution;
mod sqlproj;
mod xml;

pub use packages::{resolve_include_path, PackageMap, PackageResolver, PACKAGE_PATH_PREFIX};
pub use schema_compare::{excluded_types, render_scmp, write_scmp};
pub use solution::{Solution, SolutionEntry, SQLPROJ_TYPE_GUID};
pub use sqlproj::{new_guid, Project, ProjectDependency, SYSTEM_DATABASES};
