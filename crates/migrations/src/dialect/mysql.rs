//! MySQL Dialect - concrete type mapping exemplar
//!
//! Maps the logical column metamodel to MySQL DDL and back from MySQL's
//! reported column metadata. Two directions plus one normalization:
//!
//! - `column_ddl` renders the *requested* form (the DDL the caller asked
//!   for, display widths included verbatim);
//! - `column_from_metadata` parses the *reported* form back into a logical
//!   column, classifying by type name, never by display width (display
//!   width is cosmetic and does not constrain the storable range);
//! - `canonical_column_type` renders the form the engine reports after
//!   creation: absent or below-default display widths normalize to the
//!   engine default, widths above 255 clamp to 255, decimal defaults are
//!   applied, and enum value lists are re-quoted without separator
//!   whitespace.

use std::fmt::Write as _;

use crate::backends::ColumnMetadata;
use crate::dialect::Dialect;
use crate::error::{MigrationError, MigrationResult};
use crate::schema::{Column, ColumnType, TableDefinition};

/// Widest display width MySQL accepts for integer types
const MAX_DISPLAY_WIDTH: u32 = 255;

/// MySQL dialect implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    pub fn new() -> Self {
        Self
    }

    /// Render the requested native type, keeping caller-supplied widths
    fn native_type(&self, column: &Column) -> MigrationResult<String> {
        let rendered = match column.column_type {
            ColumnType::TinyInteger => with_width("TINYINT", column.size),
            ColumnType::SmallInteger => with_width("SMALLINT", column.size),
            ColumnType::MediumInteger => with_width("MEDIUMINT", column.size),
            ColumnType::Integer => with_width("INT", column.size),
            ColumnType::BigInteger => with_width("BIGINT", column.size),
            ColumnType::Decimal => format!(
                "DECIMAL({},{})",
                column.size.unwrap_or(10),
                column.scale.unwrap_or(0)
            ),
            ColumnType::Float => "FLOAT".to_string(),
            ColumnType::Double => "DOUBLE".to_string(),
            ColumnType::Char => format!("CHAR({})", column.size.unwrap_or(1)),
            ColumnType::Varchar => match column.size {
                Some(size) => format!("VARCHAR({})", size),
                None => {
                    return Err(MigrationError::InvalidColumnDefinition {
                        column: column.name.clone(),
                        message: "varchar columns require a size".to_string(),
                    })
                }
            },
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Blob => "BLOB".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::DateTime => "DATETIME".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Time => "TIME".to_string(),
            ColumnType::Json => "JSON".to_string(),
            // The allowed-value list is already quoted; it goes into the
            // DDL verbatim.
            ColumnType::Enum => match &column.values {
                Some(values) => format!("ENUM({})", values),
                None => {
                    return Err(MigrationError::InvalidColumnDefinition {
                        column: column.name.clone(),
                        message: "enum columns require an allowed-value list".to_string(),
                    })
                }
            },
        };
        Ok(rendered)
    }

    /// Render one column DDL fragment; `include_primary` controls whether a
    /// single-column primary key is emitted inline (CREATE TABLE with a
    /// composite key moves it to a table-level constraint instead)
    fn render_column(&self, column: &Column, include_primary: bool) -> MigrationResult<String> {
        column.validate()?;

        let mut ddl = format!("{} {}", self.quote(&column.name), self.native_type(column)?);
        if column.unsigned && column.column_type.is_integer() {
            ddl.push_str(" UNSIGNED");
        }
        ddl.push_str(if column.not_null { " NOT NULL" } else { " NULL" });
        if let Some(default) = &column.default {
            let _ = write!(ddl, " DEFAULT {}", default);
        }
        if column.auto_increment {
            ddl.push_str(" AUTO_INCREMENT");
        }
        if include_primary && column.primary {
            ddl.push_str(" PRIMARY KEY");
        }
        Ok(ddl)
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote(&self, identifier: &str) -> String {
        format!("`{}`", identifier.replace('`', "``"))
    }

    fn column_ddl(&self, column: &Column) -> MigrationResult<String> {
        self.render_column(column, true)
    }

    fn column_from_metadata(&self, meta: &ColumnMetadata) -> MigrationResult<Column> {
        let (base_raw, args, flags) = split_native_type(meta.column_type.trim());
        let base = base_raw.to_ascii_lowercase();

        let column_type = match base.as_str() {
            "tinyint" => ColumnType::TinyInteger,
            "smallint" => ColumnType::SmallInteger,
            "mediumint" => ColumnType::MediumInteger,
            "int" | "integer" => ColumnType::Integer,
            "bigint" => ColumnType::BigInteger,
            "decimal" | "numeric" => ColumnType::Decimal,
            "float" => ColumnType::Float,
            "double" | "real" => ColumnType::Double,
            "char" => ColumnType::Char,
            "varchar" => ColumnType::Varchar,
            "text" | "tinytext" | "mediumtext" | "longtext" => ColumnType::Text,
            "blob" | "tinyblob" | "mediumblob" | "longblob" => ColumnType::Blob,
            "date" => ColumnType::Date,
            "datetime" => ColumnType::DateTime,
            "timestamp" => ColumnType::Timestamp,
            "time" => ColumnType::Time,
            "json" => ColumnType::Json,
            "enum" => ColumnType::Enum,
            _ => {
                return Err(MigrationError::UnsupportedColumnType {
                    column: meta.name.clone(),
                    native_type: meta.column_type.clone(),
                })
            }
        };

        let mut size = None;
        let mut scale = None;
        let mut values = None;
        if let Some(args) = args {
            match column_type {
                ColumnType::Enum => values = Some(args.to_string()),
                ColumnType::Decimal => {
                    let mut parts = args.splitn(2, ',');
                    size = parts.next().and_then(|p| p.trim().parse().ok());
                    scale = parts.next().and_then(|p| p.trim().parse().ok());
                }
                _ => size = args.trim().parse().ok(),
            }
        }

        let unsigned =
            column_type.is_integer() && flags.to_ascii_lowercase().contains("unsigned");

        Ok(Column {
            name: meta.name.clone(),
            column_type,
            size,
            scale,
            values,
            unsigned,
            not_null: !meta.nullable,
            primary: meta.primary,
            auto_increment: meta.auto_increment,
            default: None,
            first: false,
        })
    }

    fn canonical_column_type(&self, column: &Column) -> MigrationResult<String> {
        column.validate()?;

        let base = match column.column_type {
            ColumnType::TinyInteger => "tinyint",
            ColumnType::SmallInteger => "smallint",
            ColumnType::MediumInteger => "mediumint",
            ColumnType::Integer => "int",
            ColumnType::BigInteger => "bigint",
            ColumnType::Decimal => {
                return Ok(format!(
                    "decimal({},{})",
                    column.size.unwrap_or(10),
                    column.scale.unwrap_or(0)
                ))
            }
            ColumnType::Float => return Ok("float".to_string()),
            ColumnType::Double => return Ok("double".to_string()),
            ColumnType::Char => return Ok(format!("char({})", column.size.unwrap_or(1))),
            ColumnType::Varchar => {
                return Ok(format!("varchar({})", column.size.unwrap_or(255)))
            }
            ColumnType::Text => return Ok("text".to_string()),
            ColumnType::Blob => return Ok("blob".to_string()),
            ColumnType::Date => return Ok("date".to_string()),
            ColumnType::DateTime => return Ok("datetime".to_string()),
            ColumnType::Timestamp => return Ok("timestamp".to_string()),
            ColumnType::Time => return Ok("time".to_string()),
            ColumnType::Json => return Ok("json".to_string()),
            ColumnType::Enum => {
                let raw = column.values.as_deref().unwrap_or("");
                let rendered: Vec<String> =
                    parse_enum_values(raw).iter().map(|v| quote_enum_value(v)).collect();
                return Ok(format!("enum({})", rendered.join(",")));
            }
        };

        let width = canonical_display_width(column.column_type, column.unsigned, column.size);
        if column.unsigned {
            Ok(format!("{}({}) unsigned", base, width))
        } else {
            Ok(format!("{}({})", base, width))
        }
    }

    fn create_table_sql(&self, definition: &TableDefinition) -> MigrationResult<String> {
        definition.validate()?;
        if definition.columns.is_empty() {
            return Err(MigrationError::Database(format!(
                "table '{}' must contain at least one column",
                definition.name
            )));
        }

        let primary: Vec<&str> = definition
            .primary_columns()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        let inline_primary = primary.len() == 1;

        let mut parts = Vec::new();
        for column in &definition.columns {
            parts.push(self.render_column(column, inline_primary)?);
        }
        if primary.len() > 1 {
            let quoted: Vec<String> = primary.iter().map(|c| self.quote(c)).collect();
            parts.push(format!("PRIMARY KEY ({})", quoted.join(", ")));
        }
        for index in &definition.indexes {
            let kind = if index.unique { "UNIQUE KEY" } else { "KEY" };
            let quoted: Vec<String> = index.columns.iter().map(|c| self.quote(c)).collect();
            parts.push(format!(
                "{} {} ({})",
                kind,
                self.quote(&index.name),
                quoted.join(", ")
            ));
        }

        let mut sql = format!(
            "CREATE TABLE {} (\n    {}\n)",
            self.quote(&definition.name),
            parts.join(",\n    ")
        );
        for (key, value) in &definition.options {
            let _ = write!(sql, " {}={}", key, value);
        }
        Ok(sql)
    }

    fn add_column_sql(
        &self,
        table: &str,
        column: &Column,
        after: Option<&str>,
    ) -> MigrationResult<String> {
        let mut sql = format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote(table),
            self.render_column(column, true)?
        );
        if column.first {
            sql.push_str(" FIRST");
        } else if let Some(after) = after {
            let _ = write!(sql, " AFTER {}", self.quote(after));
        }
        Ok(sql)
    }

    fn drop_table_sql(&self, table: &str) -> String {
        format!("DROP TABLE IF EXISTS {}", self.quote(table))
    }
}

fn with_width(base: &str, size: Option<u32>) -> String {
    match size {
        Some(width) => format!("{}({})", base, width),
        None => base.to_string(),
    }
}

/// The display width MySQL assigns when none is requested
fn default_display_width(column_type: ColumnType, unsigned: bool) -> u32 {
    match (column_type, unsigned) {
        (ColumnType::TinyInteger, false) => 4,
        (ColumnType::TinyInteger, true) => 3,
        (ColumnType::SmallInteger, false) => 6,
        (ColumnType::SmallInteger, true) => 5,
        (ColumnType::MediumInteger, false) => 9,
        (ColumnType::MediumInteger, true) => 8,
        (ColumnType::Integer, false) => 11,
        (ColumnType::Integer, true) => 10,
        (ColumnType::BigInteger, _) => 20,
        _ => 0,
    }
}

/// Engine normalization of a requested display width: absent or
/// below-default widths report the default, anything past the engine
/// maximum reports the maximum
fn canonical_display_width(
    column_type: ColumnType,
    unsigned: bool,
    requested: Option<u32>,
) -> u32 {
    let default = default_display_width(column_type, unsigned);
    match requested {
        None => default,
        Some(width) if width < default => default,
        Some(width) if width > MAX_DISPLAY_WIDTH => MAX_DISPLAY_WIDTH,
        Some(width) => width,
    }
}

/// Split a reported native type into base name, parenthesized arguments,
/// and trailing flags, e.g. `mediumint(9) unsigned` → `("mediumint",
/// Some("9"), " unsigned")`
fn split_native_type(raw: &str) -> (&str, Option<&str>, &str) {
    match raw.find('(') {
        Some(open) => {
            let close = raw
                .rfind(')')
                .filter(|&close| close > open)
                .unwrap_or(raw.len());
            let base = raw[..open].trim();
            let args = &raw[open + 1..close];
            let flags = if close < raw.len() {
                &raw[close + 1..]
            } else {
                ""
            };
            (base, Some(args), flags)
        }
        None => {
            let mut parts = raw.splitn(2, ' ');
            let base = parts.next().unwrap_or("");
            let flags = parts.next().unwrap_or("");
            (base.trim(), None, flags)
        }
    }
}

/// Parse a quoted enum value list (`'Y','N','D',''`) into its entries,
/// honoring `''` escapes inside quotes and ignoring separator whitespace
pub(crate) fn parse_enum_values(raw: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut seen_any = false;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    current.push('\'');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '\'' => {
                    in_quotes = true;
                    seen_any = true;
                }
                ',' => {
                    values.push(std::mem::take(&mut current));
                    seen_any = false;
                }
                c if c.is_whitespace() => {}
                c => {
                    current.push(c);
                    seen_any = true;
                }
            }
        }
    }
    if seen_any || !values.is_empty() {
        values.push(current);
    }
    values
}

fn quote_enum_value(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
