//! Enumerations shared by the definition and the object model

use std::fmt;
use std::str::FromStr;

use crate::error::SqlGenError;

/// Default precision substituted when a column declares `-1`
pub const DEFAULT_PRECISION: i32 = 18;
/// Default scale substituted when a column declares `-1`
pub const DEFAULT_SCALE: i32 = 0;

/// Logical data type declared on a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    AnsiString,
    AnsiStringFixedLength,
    Binary,
    Byte,
    Boolean,
    Currency,
    Date,
    DateTime,
    DateTime2,
    DateTimeOffset,
    Decimal,
    Double,
    Guid,
    Int16,
    Int32,
    Int64,
    Object,
    SByte,
    Single,
    String,
    StringFixedLength,
    Time,
    UInt16,
    UInt32,
    UInt64,
    VarNumeric,
    Xml,
}

impl DataType {
    pub const ALL: [DataType; 27] = [
        DataType::AnsiString,
        DataType::AnsiStringFixedLength,
        DataType::Binary,
        DataType::Byte,
        DataType::Boolean,
        DataType::Currency,
        DataType::Date,
        DataType::DateTime,
        DataType::DateTime2,
        DataType::DateTimeOffset,
        DataType::Decimal,
        DataType::Double,
        DataType::Guid,
        DataType::Int16,
        DataType::Int32,
        DataType::Int64,
        DataType::Object,
        DataType::SByte,
        DataType::Single,
        DataType::String,
        DataType::StringFixedLength,
        DataType::Time,
        DataType::UInt16,
        DataType::UInt32,
        DataType::UInt64,
        DataType::VarNumeric,
        DataType::Xml,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DataType::AnsiString => "AnsiString",
            DataType::AnsiStringFixedLength => "AnsiStringFixedLength",
            DataType::Binary => "Binary",
            DataType::Byte => "Byte",
            DataType::Boolean => "Boolean",
            DataType::Currency => "Currency",
            DataType::Date => "Date",
            DataType::DateTime => "DateTime",
            DataType::DateTime2 => "DateTime2",
            DataType::DateTimeOffset => "DateTimeOffset",
            DataType::Decimal => "Decimal",
            DataType::Double => "Double",
            DataType::Guid => "Guid",
            DataType::Int16 => "Int16",
            DataType::Int32 => "Int32",
            DataType::Int64 => "Int64",
            DataType::Object => "Object",
            DataType::SByte => "SByte",
            DataType::Single => "Single",
            DataType::String => "String",
            DataType::StringFixedLength => "StringFixedLength",
            DataType::Time => "Time",
            DataType::UInt16 => "UInt16",
            DataType::UInt32 => "UInt32",
            DataType::UInt64 => "UInt64",
            DataType::VarNumeric => "VarNumeric",
            DataType::Xml => "Xml",
        }
    }

    /// Map the logical type to SQL Server type syntax.
    ///
    /// Precision and scale of `-1` fall back to 18 and 0. Returns `None` for
    /// logical types that have no SQL Server mapping.
    pub fn sql_type(&self, length: i32, precision: i32, scale: i32) -> Option<String> {
        let precision = if precision == -1 {
            DEFAULT_PRECISION
        } else {
            precision
        };
        let scale = if scale == -1 { DEFAULT_SCALE } else { scale };

        let sql = match self {
            DataType::AnsiString => format!("varchar({})", length),
            DataType::String => format!("nvarchar({})", length),
            DataType::AnsiStringFixedLength => format!("char({})", length),
            DataType::StringFixedLength => format!("nchar({})", length),
            DataType::Binary => format!("binary({})", length),
            DataType::Boolean => "bit".to_string(),
            DataType::Byte => "tinyint".to_string(),
            DataType::Currency => "money".to_string(),
            DataType::Date => "date".to_string(),
            DataType::DateTime => "datetime".to_string(),
            DataType::DateTime2 => format!("datetime2({})", scale),
            DataType::DateTimeOffset => format!("datetimeoffset({})", scale),
            DataType::Decimal => format!("decimal({}, {})", precision, scale),
            DataType::Double => "float".to_string(),
            DataType::Int16 | DataType::UInt16 => "smallint".to_string(),
            DataType::Int32 | DataType::UInt32 => "int".to_string(),
            DataType::Int64 | DataType::UInt64 => "bigint".to_string(),
            DataType::Single => "real".to_string(),
            DataType::Time => format!("time({})", scale),
            DataType::Guid => "uniqueidentifier".to_string(),
            DataType::Object | DataType::SByte | DataType::VarNumeric | DataType::Xml => {
                return None
            }
        };

        Some(sql)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = SqlGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| SqlGenError::definition(format!("Unknown data type: {}", s)))
    }
}

/// Data compression mode for tables, primary keys and indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionType {
    #[default]
    None,
    Row,
    Page,
    ColumnStore,
    ColumnStoreArchive,
}

impl CompressionType {
    /// Columnstore modes require a clustered columnstore index on the table
    pub fn is_columnstore(&self) -> bool {
        matches!(
            self,
            CompressionType::ColumnStore | CompressionType::ColumnStoreArchive
        )
    }
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompressionType::None => "None",
            CompressionType::Row => "Row",
            CompressionType::Page => "Page",
            CompressionType::ColumnStore => "ColumnStore",
            CompressionType::ColumnStoreArchive => "ColumnStoreArchive",
        };
        f.write_str(name)
    }
}

impl FromStr for CompressionType {
    type Err = SqlGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(CompressionType::None),
            "Row" => Ok(CompressionType::Row),
            "Page" => Ok(CompressionType::Page),
            "ColumnStore" => Ok(CompressionType::ColumnStore),
            "ColumnStoreArchive" => Ok(CompressionType::ColumnStoreArchive),
            _ => Err(SqlGenError::definition(format!(
                "Unknown compression type: {}",
                s
            ))),
        }
    }
}

/// Index key column sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("ASC"),
            SortOrder::Desc => f.write_str("DESC"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = SqlGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(SqlGenError::definition(format!("Unknown sort order: {}", s))),
        }
    }
}

/// Target SQL Server platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlServerPlatform {
    Azure,
    #[default]
    SqlServer,
}

impl FromStr for SqlServerPlatform {
    type Err = SqlGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Azure" => Ok(SqlServerPlatform::Azure),
            "SqlServer" => Ok(SqlServerPlatform::SqlServer),
            _ => Err(SqlGenError::definition(format!(
                "Unknown SQL Server platform: {}",
                s
            ))),
        }
    }
}

/// SQL Server version target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlServerVersion {
    SqlServer2016, // 13
    SqlServer2017, // 14
    #[default]
    SqlServer2019, // 15
    SqlServer2022, // 16
}

impl FromStr for SqlServerVersion {
    type Err = SqlGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SqlServer2016" => Ok(SqlServerVersion::SqlServer2016),
            "SqlServer2017" => Ok(SqlServerVersion::SqlServer2017),
            "SqlServer2019" => Ok(SqlServerVersion::SqlServer2019),
            "SqlServer2022" => Ok(SqlServerVersion::SqlServer2022),
            _ => Err(SqlGenError::definition(format!(
                "Unknown SQL Server version: {}",
                s
            ))),
        }
    }
}

impl SqlServerVersion {
    /// Major version number
    pub fn major(&self) -> u16 {
        match self {
            SqlServerVersion::SqlServer2016 => 13,
            SqlServerVersion::SqlServer2017 => 14,
            SqlServerVersion::SqlServer2019 => 15,
            SqlServerVersion::SqlServer2022 => 16,
        }
    }
}

/// Provider token written to the project's DSP property
pub fn dsp_name(platform: SqlServerPlatform, version: SqlServerVersion) -> String {
    match platform {
        SqlServerPlatform::Azure => {
            "Microsoft.Data.Tools.Schema.Sql.SqlAzureV12DatabaseSchemaProvider".to_string()
        }
        SqlServerPlatform::SqlServer => format!(
            "Microsoft.Data.Tools.Schema.Sql.Sql{}0DatabaseSchemaProvider",
            version.major()
        ),
    }
}
