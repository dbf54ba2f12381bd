//! Integration tests for the generation workflow
//!
//! These tests run the full pipeline from a definition file to scripts,
//! project files and the solution on disk.

use pretty_assertions::assert_eq;

use crate::assert_script_contains;
use crate::common::TestContext;

// ============================================================================
// Basic Generation Tests
// ============================================================================

#[test]
fn test_simple_table_generation() {
    let ctx = TestContext::with_fixture("simple_table");
    let solutions = ctx.generate_successfully();

    assert_eq!(solutions.len(), 1);
    let solution = &solutions[0];
    assert_eq!(solution.name, "Simple");
    assert_eq!(solution.projects.len(), 1);
    assert_eq!(solution.directory, ctx.output_dir.join("Simple"));

    let table = ctx.read_output("Simple/Core/dbo/Tables/Foo.sql");
    assert_eq!(
        table,
        "CREATE TABLE [dbo].[Foo]\n\
         (\n\
         \t[Id] int NOT NULL,\n\
         \t[Name] nvarchar(50) NULL,\n\
         \tCONSTRAINT [PK_Foo] PRIMARY KEY CLUSTERED ([Id]) WITH (DATA_COMPRESSION = None)\n\
         )\n\
         ON [PRIMARY]\n\
         WITH (DATA_COMPRESSION = None);\n\
         GO\n\n"
    );
}

#[test]
fn test_simple_table_writes_every_script() {
    let ctx = TestContext::with_fixture("simple_table");
    let solutions = ctx.generate_successfully();

    // One schema script plus table, view, function and procedure
    assert_eq!(solutions[0].script_count, 5);

    assert_eq!(
        ctx.read_output("Simple/Core/Security/dbo.sql"),
        "CREATE SCHEMA [dbo] AUTHORIZATION dbo;"
    );
    assert_eq!(
        ctx.read_output("Simple/Core/dbo/Views/vFoo.sql"),
        "CREATE VIEW [dbo].[vFoo] AS SELECT [Id], [Name] FROM [dbo].[Foo]"
    );
    assert!(ctx.output_path("Simple/Core/dbo/Functions/fnOne.sql").is_file());
    assert!(ctx
        .output_path("Simple/Core/dbo/Stored Procedures/uspFoo.sql")
        .is_file());
}

#[test]
fn test_generated_scripts_match_build_glob() {
    let ctx = TestContext::with_fixture("simple_table");
    ctx.generate_successfully();

    let pattern = ctx.output_dir.join("Simple").join("Core").join("**").join("*.sql");
    let scripts: Vec<_> = glob::glob(&pattern.to_string_lossy())
        .expect("valid glob pattern")
        .filter_map(|entry| entry.ok())
        .collect();

    assert_eq!(scripts.len(), 5, "scripts found: {:?}", scripts);
}

#[test]
fn test_rerun_overwrites_previous_output() {
    let ctx = TestContext::with_fixture("simple_table");
    ctx.generate_successfully();

    let table = ctx.output_path("Simple/Core/dbo/Tables/Foo.sql");
    std::fs::write(&table, "stale").unwrap();

    ctx.generate_successfully();
    assert_script_contains!(ctx.read_output("Simple/Core/dbo/Tables/Foo.sql"), "CREATE TABLE");
}

// ============================================================================
// Compression Tests
// ============================================================================

#[test]
fn test_columnstore_tables() {
    let ctx = TestContext::with_fixture("columnstore");
    ctx.generate_successfully();

    let sales = ctx.read_output("Facts/Dw/fact/Tables/Sales.sql");
    assert_script_contains!(
        sales,
        "CREATE CLUSTERED COLUMNSTORE INDEX CCSIX_Sales ON [fact].[Sales]\nWITH (DATA_COMPRESSION = ColumnStore);\nGO\n\n"
    );
    assert_script_contains!(
        sales,
        "\tCONSTRAINT [PK_Sales] PRIMARY KEY NONCLUSTERED ([SaleId]) WITH (DATA_COMPRESSION = Page)\n"
    );
    assert_script_contains!(sales, "\t[Amount] decimal(19, 4) NOT NULL,\n");

    let archive = ctx.read_output("Facts/Dw/fact/Tables/SalesArchive.sql");
    assert_script_contains!(archive, "CCSIX_SalesArchive");
    assert_script_contains!(archive, "WITH (DATA_COMPRESSION = ColumnStoreArchive);");
}

#[test]
fn test_clustered_primary_key_drops_compression_on_compressed_table() {
    let ctx = TestContext::with_fixture("columnstore");
    ctx.generate_successfully();

    let staging = ctx.read_output("Facts/Dw/fact/Tables/SalesStaging.sql");
    assert_script_contains!(
        staging,
        "PRIMARY KEY CLUSTERED ([SaleId]) WITH (DATA_COMPRESSION = None)"
    );
    assert_script_contains!(staging, "ON [PRIMARY]\nWITH (DATA_COMPRESSION = Page);\nGO\n\n");
    assert!(!staging.contains("COLUMNSTORE"));
}

// ============================================================================
// Foreign Key Tests
// ============================================================================

#[test]
fn test_foreign_key_columns_copy_referenced_type() {
    let ctx = TestContext::with_fixture("foreign_keys");
    ctx.generate_successfully();

    let order = ctx.read_output("Shop/Sales/dbo/Tables/Order.sql");
    assert_script_contains!(order, "\t[CustomerId] int NULL,\n");
    assert_script_contains!(order, "\t[CustomerCode] char(8) NOT NULL,\n");
    assert_script_contains!(order, "\t[RegionCountry] smallint NOT NULL,\n");
    assert_script_contains!(order, "\t[RegionCode] int NOT NULL,\n");
}

#[test]
fn test_foreign_key_constraints() {
    let ctx = TestContext::with_fixture("foreign_keys");
    ctx.generate_successfully();

    let order = ctx.read_output("Shop/Sales/dbo/Tables/Order.sql");
    assert_script_contains!(
        order,
        "ALTER TABLE [dbo].[Order] ADD CONSTRAINT [FK_Order_Customer_CustomerId] FOREIGN KEY ([CustomerId])\n\
         REFERENCES [dbo].[Customer] ([Id]);\n\
         GO\n\n\
         ALTER TABLE [dbo].[Order] NOCHECK CONSTRAINT [FK_Order_Customer_CustomerId];\n\
         GO\n\n"
    );
    assert_script_contains!(
        order,
        "ALTER TABLE [dbo].[Order] ADD CONSTRAINT [FK_Order_Region_Region] FOREIGN KEY ([RegionCountry], [RegionCode])\n\
         REFERENCES [geo].[Region] ([Country], [Code]);\n"
    );
}

#[test]
fn test_indexes_follow_foreign_keys() {
    let ctx = TestContext::with_fixture("foreign_keys");
    ctx.generate_successfully();

    let order = ctx.read_output("Shop/Sales/dbo/Tables/Order.sql");
    let index = "CREATE NONCLUSTERED INDEX [IX_Order_CustomerId]\n\
                 ON [dbo].[Order] ([CustomerId] ASC)\n\
                 INCLUDE ([CustomerCode])\n\
                 WITH (DATA_COMPRESSION = Row)\n\
                 ON [PRIMARY];\n\
                 GO\n\n";
    assert!(order.ends_with(index), "{}", order);

    let last_fk = order.rfind("NOCHECK CONSTRAINT").unwrap();
    assert!(last_fk < order.find("CREATE NONCLUSTERED INDEX").unwrap());
}

#[test]
fn test_max_length_column() {
    let ctx = TestContext::with_fixture("foreign_keys");
    ctx.generate_successfully();

    let customer = ctx.read_output("Shop/Sales/dbo/Tables/Customer.sql");
    assert_script_contains!(customer, "\t[Notes] nvarchar(MAX) NULL,\n");
}

#[test]
fn test_long_foreign_key_name_is_shortened() {
    let ctx = TestContext::with_fixture("foreign_keys");
    ctx.generate_successfully();

    let table = "CustomerPreferenceHistoryEntriesForMarketingCampaignAnalysisAndReportingAcrossAllRegionalSubsidiariesAndPartners";
    let script = ctx.read_output(&format!("Shop/Sales/dbo/Tables/{}.sql", table));

    let full_name = format!("[FK_{}_Customer_CustomerId]", table);
    assert!(!script.contains(&full_name));

    let add_line = script
        .lines()
        .find(|l| l.contains("ADD CONSTRAINT"))
        .expect("foreign key statement");
    let name = add_line
        .split("ADD CONSTRAINT ")
        .nth(1)
        .and_then(|rest| rest.split(" FOREIGN KEY").next())
        .unwrap();

    assert!(name.chars().count() <= 128, "{}", name);
    assert!(name.starts_with(&full_name[..116]));
    assert_script_contains!(script, &format!("NOCHECK CONSTRAINT {};", name));
}

// ============================================================================
// Definition Edge Cases
// ============================================================================

#[test]
fn test_definition_without_sql_root_generates_nothing() {
    let ctx = TestContext::with_fixture("not_sql_root");
    let solutions = ctx.generate_successfully();

    assert!(solutions.is_empty());
    assert!(!ctx.output_dir.exists());
}

#[test]
fn test_no_project_databases_skip_solution() {
    let ctx = TestContext::with_fixture("no_projects");
    let solutions = ctx.generate_successfully();

    assert_eq!(solutions.len(), 1);
    assert!(solutions[0].projects.is_empty());
    assert!(solutions[0].solution_path.is_none());
    assert_eq!(solutions[0].script_count, 0);
    assert!(!ctx.output_path("Reference/Reference.sln").exists());
}

#[test]
fn test_missing_definition_file_fails() {
    let ctx = TestContext::with_fixture("simple_table");
    let mut options = ctx.options();
    options.definition_path = ctx.project_dir.join("missing.xml");

    let result = ctx.generate_with(options);
    assert!(!result.success);
    assert!(
        result.errors[0].contains("Failed to read definition file"),
        "{:?}",
        result.errors
    );
}
