//! Unit tests for type mapping and script rendering

use std::path::PathBuf;

use pretty_assertions::assert_eq;

use sqlproj_gen::context::RunContext;
use sqlproj_gen::ddl::{database_scripts, object_folder, render_index};
use sqlproj_gen::definition::{
    ColumnDecl, DatabaseDecl, PlainColumnDecl, SchemaDecl, ScriptedObjectDecl, TableDecl,
};
use sqlproj_gen::model::{
    CompressionType, DataType, Index, IndexColumn, ObjectKind, SortOrder,
};
use sqlproj_gen::util::{add_brackets, deterministic_hash, shorten_if_too_long};
use sqlproj_gen::{GeneratorConfig, PackageMap};

// ============================================================================
// Type Mapping Tests
// ============================================================================

#[test]
fn test_sql_type_mapping() {
    let cases = [
        (DataType::AnsiString, 20, -1, -1, "varchar(20)"),
        (DataType::String, -1, -1, -1, "nvarchar(-1)"),
        (DataType::AnsiStringFixedLength, 3, -1, -1, "char(3)"),
        (DataType::StringFixedLength, 2, -1, -1, "nchar(2)"),
        (DataType::Binary, 16, -1, -1, "binary(16)"),
        (DataType::Boolean, 0, -1, -1, "bit"),
        (DataType::Byte, 0, -1, -1, "tinyint"),
        (DataType::Currency, 0, -1, -1, "money"),
        (DataType::Date, 0, -1, -1, "date"),
        (DataType::DateTime, 0, -1, -1, "datetime"),
        (DataType::DateTime2, 0, -1, 7, "datetime2(7)"),
        (DataType::DateTimeOffset, 0, -1, -1, "datetimeoffset(0)"),
        (DataType::Decimal, 0, -1, -1, "decimal(18, 0)"),
        (DataType::Decimal, 0, 28, 6, "decimal(28, 6)"),
        (DataType::Double, 0, -1, -1, "float"),
        (DataType::Guid, 0, -1, -1, "uniqueidentifier"),
        (DataType::Int16, 0, -1, -1, "smallint"),
        (DataType::UInt16, 0, -1, -1, "smallint"),
        (DataType::Int32, 0, -1, -1, "int"),
        (DataType::UInt32, 0, -1, -1, "int"),
        (DataType::Int64, 0, -1, -1, "bigint"),
        (DataType::UInt64, 0, -1, -1, "bigint"),
        (DataType::Single, 0, -1, -1, "real"),
        (DataType::Time, 0, -1, 3, "time(3)"),
    ];

    for (data_type, length, precision, scale, expected) in cases {
        assert_eq!(
            data_type.sql_type(length, precision, scale).as_deref(),
            Some(expected),
            "{}",
            data_type
        );
    }
}

#[test]
fn test_unmapped_types() {
    for data_type in [DataType::Object, DataType::SByte, DataType::VarNumeric, DataType::Xml] {
        assert_eq!(data_type.sql_type(0, -1, -1), None, "{}", data_type);
    }
}

#[test]
fn test_unmapped_type_fails_construction() {
    let config = GeneratorConfig::default();
    let packages = PackageMap::new();
    let mut ctx = RunContext::new(&config, &packages);

    let decl = DatabaseDecl {
        name: "Shop".to_string(),
        schemas: vec![SchemaDecl {
            name: "dbo".to_string(),
            owner: "dbo".to_string(),
        }],
        tables: vec![TableDecl {
            name: "Doc".to_string(),
            schema: "dbo".to_string(),
            columns: vec![ColumnDecl::Plain(PlainColumnDecl::new("Body", DataType::Xml))],
            ..Default::default()
        }],
        ..Default::default()
    };

    let err = ctx.construct_database(&decl).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Data type Xml of column Shop.dbo.Doc.Body is not supported"
    );
}

// ============================================================================
// Identifier Tests
// ============================================================================

#[test]
fn test_short_names_are_unchanged() {
    let name = format!("[{}]", "N".repeat(126));
    assert_eq!(shorten_if_too_long(&name), name);
}

#[test]
fn test_shortened_name_shape() {
    let name = format!("[FK_{}]", "Customer".repeat(20));
    let short = shorten_if_too_long(&name);

    let suffix = &short[116..];
    assert!(short.starts_with(&name[..116]));
    assert!(suffix.starts_with('_') && suffix.ends_with(']'));

    let digits = &suffix[1..suffix.len() - 1];
    assert!(digits.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(digits, deterministic_hash(&name).unsigned_abs().to_string());
}

#[test]
fn test_hash_is_stable_across_calls() {
    let name = format!("[FK_{}]", "Z".repeat(200));
    assert_eq!(deterministic_hash(&name), deterministic_hash(&name));
    assert_eq!(shorten_if_too_long(&name), shorten_if_too_long(&name));
    assert_ne!(deterministic_hash("[a]"), deterministic_hash("[b]"));
}

#[test]
fn test_half_bracketed_identifier_is_rejected() {
    let err = add_brackets("Orders]").unwrap_err();
    assert_eq!(
        err.to_string(),
        "The input string (Orders]) either started or ended with a bracket, but not both. It is invalid."
    );
}

// ============================================================================
// Rendering Tests
// ============================================================================

#[test]
fn test_unique_clustered_index_with_sort_orders() {
    let index = Index {
        name: "UX_Order".to_string(),
        unique: true,
        clustered: true,
        compression: CompressionType::Page,
        columns: vec![
            IndexColumn {
                name: "CustomerId".to_string(),
                sort_order: SortOrder::Asc,
            },
            IndexColumn {
                name: "PlacedAt".to_string(),
                sort_order: SortOrder::Desc,
            },
        ],
        includes: Vec::new(),
    };

    assert_eq!(
        render_index("[dbo].[Order]", &index).unwrap(),
        "CREATE UNIQUE CLUSTERED INDEX [UX_Order]\n\
         ON [dbo].[Order] ([CustomerId] ASC, [PlacedAt] DESC)\n\
         WITH (DATA_COMPRESSION = Page)\n\
         ON [PRIMARY];\n"
    );
}

#[test]
fn test_database_scripts_order_and_paths() {
    let config = GeneratorConfig::default();
    let packages = PackageMap::new();
    let mut ctx = RunContext::new(&config, &packages);

    let scripted = |name: &str, schema: &str| ScriptedObjectDecl {
        name: name.to_string(),
        schema: schema.to_string(),
        statement: format!("-- {}", name),
    };

    let decl = DatabaseDecl {
        name: "Shop".to_string(),
        schemas: vec![
            SchemaDecl {
                name: "dbo".to_string(),
                owner: "dbo".to_string(),
            },
            SchemaDecl {
                name: "rpt".to_string(),
                owner: "dbo".to_string(),
            },
        ],
        tables: vec![TableDecl {
            name: "Orders".to_string(),
            schema: "dbo".to_string(),
            columns: vec![ColumnDecl::Plain(PlainColumnDecl::new("Id", DataType::Int32))],
            ..Default::default()
        }],
        views: vec![scripted("vOrders", "rpt")],
        procedures: vec![scripted("uspOrders", "dbo")],
        ..Default::default()
    };
    ctx.construct_database(&decl).unwrap();

    let scripts = database_scripts(ctx.database("Shop").unwrap()).unwrap();
    let paths: Vec<PathBuf> = scripts.iter().map(|s| s.path.clone()).collect();

    assert_eq!(
        paths,
        vec![
            PathBuf::from("Security").join("dbo.sql"),
            PathBuf::from("Security").join("rpt.sql"),
            PathBuf::from("dbo").join("Tables").join("Orders.sql"),
            PathBuf::from("dbo").join("Stored Procedures").join("uspOrders.sql"),
            PathBuf::from("rpt").join("Views").join("vOrders.sql"),
        ]
    );
    assert_eq!(scripts[4].content, "-- vOrders");
}

#[test]
fn test_object_folders() {
    assert_eq!(
        object_folder("dbo", ObjectKind::Function),
        PathBuf::from("dbo").join("Functions")
    );
    assert_eq!(
        object_folder("dbo", ObjectKind::Procedure),
        PathBuf::from("dbo").join("Stored Procedures")
    );
}
