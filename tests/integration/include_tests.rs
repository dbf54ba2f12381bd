//! Integration tests for include folders, package paths and dacpac copies

use std::fs;

use pretty_assertions::assert_eq;

use crate::common::{SqlprojInfo, TestContext};

#[test]
fn test_include_folders_are_copied_into_database_folder() {
    let ctx = TestContext::with_fixture("includes");
    ctx.generate_successfully();

    assert_eq!(
        ctx.read_output("Includes/Core/audit/Tables/Log.sql").trim_end(),
        "CREATE TABLE [audit].[Log] ([Id] INT NOT NULL)"
    );
    assert!(ctx.output_path("Includes/Core/audit/Views/vLog.sql").is_file());
    assert!(ctx.output_path("Includes/Core/Scripts/PostDeploy.sql").is_file());
}

#[test]
fn test_package_include_resolves_through_package_map() {
    let ctx = TestContext::with_fixture("includes");
    ctx.generate_successfully();

    assert!(ctx.output_path("Includes/Core/Types/IdList.sql").is_file());
}

#[test]
fn test_unknown_package_fails() {
    let ctx = TestContext::with_fixture("includes");
    let mut options = ctx.options();
    options.packages = sqlproj_gen::PackageMap::new();

    let result = ctx.generate_with(options);
    assert!(!result.success);
    assert!(
        result.errors[0].contains("Failed to resolve package Acme.Sql"),
        "{:?}",
        result.errors
    );
}

#[test]
fn test_include_folders_are_listed_in_project() {
    let ctx = TestContext::with_fixture("includes");
    ctx.generate_successfully();

    let info = SqlprojInfo::from_file(&ctx.output_path("Includes/Core.sqlproj")).unwrap();
    assert_eq!(
        info.folders,
        vec![
            "Core",
            r"Core\Security\",
            r"Core\dbo\",
            r"Core\dbo\Tables\",
            r"Core\Scripts\",
            r"Core\audit\",
            r"Core\audit\Tables\",
            r"Core\audit\Views\",
            r"Core\Types\",
        ]
    );
}

#[test]
fn test_missing_include_folder_fails() {
    let ctx = TestContext::with_fixture("includes");
    fs::remove_dir_all(ctx.project_dir.join("Includes")).unwrap();

    let result = ctx.generate();
    assert!(!result.success);
    assert!(
        result.errors[0].contains("Failed to find database include folder"),
        "{:?}",
        result.errors
    );
}

// ============================================================================
// Dacpac Dependency Tests
// ============================================================================

#[test]
fn test_dacpac_is_copied_next_to_solution() {
    let ctx = TestContext::with_fixture("includes");
    ctx.generate_successfully();

    assert_eq!(ctx.read_output("Includes/Lib.dacpac"), "PK-not-a-real-dacpac");

    let info = SqlprojInfo::from_file(&ctx.output_path("Includes/Core.sqlproj")).unwrap();
    assert_eq!(
        info.artifact_references,
        vec![("Lib.dacpac".to_string(), "Lib".to_string())]
    );
}

#[test]
fn test_existing_dacpac_is_not_overwritten() {
    let ctx = TestContext::with_fixture("includes");
    let target = ctx.output_path("Includes/Lib.dacpac");
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    fs::write(&target, "already here").unwrap();

    ctx.generate_successfully();
    assert_eq!(fs::read_to_string(&target).unwrap(), "already here");
}

#[test]
fn test_missing_dacpac_fails() {
    let ctx = TestContext::with_fixture("includes");
    fs::remove_file(ctx.project_dir.join("refs").join("Lib.dacpac")).unwrap();

    let result = ctx.generate();
    assert!(!result.success);
    assert!(
        result.errors[0].contains("Failed to find dacpac"),
        "{:?}",
        result.errors
    );
}
