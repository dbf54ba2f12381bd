//! Package-relative include paths

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, SqlGenError};
use crate::util::path_segments;

/// First segment of an include path that names a package instead of a folder
pub const PACKAGE_PATH_PREFIX: &str = "Nuget";

/// Maps a package name to the absolute directory holding its content files
pub trait PackageResolver {
    fn content_dir(&self, package: &str) -> Option<PathBuf>;
}

/// Resolver backed by an explicit name to directory table
#[derive(Debug, Clone, Default)]
pub struct PackageMap {
    packages: HashMap<String, PathBuf>,
}

impl PackageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, package: impl Into<String>, content_dir: impl Into<PathBuf>) {
        self.packages.insert(package.into(), content_dir.into());
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl<K: Into<String>, V: Into<PathBuf>> FromIterator<(K, V)> for PackageMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = PackageMap::new();
        for (package, dir) in iter {
            map.insert(package, dir);
        }
        map
    }
}

impl PackageResolver for PackageMap {
    fn content_dir(&self, package: &str) -> Option<PathBuf> {
        self.packages.get(package).cloned()
    }
}

/// Resolve an include path from a database definition to an absolute folder.
///
/// `Nuget\<package>\rest` becomes the package's content directory joined with
/// `rest`; any other path is taken relative to `project_dir`.
pub fn resolve_include_path(
    path: &str,
    project_dir: &Path,
    packages: &dyn PackageResolver,
) -> Result<PathBuf> {
    let segments = path_segments(path);

    match segments.split_first() {
        Some((&first, rest)) if first == PACKAGE_PATH_PREFIX => {
            let (package, remainder) = rest.split_first().ok_or_else(|| {
                SqlGenError::PackageNotFound {
                    package: String::new(),
                    path: path.to_string(),
                }
            })?;
            let base = packages
                .content_dir(package)
                .ok_or_else(|| SqlGenError::PackageNotFound {
                    package: package.to_string(),
                    path: path.to_string(),
                })?;
            Ok(remainder.iter().fold(base, |acc, segment| acc.join(segment)))
        }
        _ => Ok(segments
            .iter()
            .fold(project_dir.to_path_buf(), |acc, segment| acc.join(segment))),
    }
}
