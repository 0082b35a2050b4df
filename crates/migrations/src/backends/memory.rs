//! In-Memory Database Adapter
//!
//! A structural, in-process engine that emulates MySQL column semantics:
//! integer ranges per width class (display width never constrains the
//! range), decimal precision/scale enforcement with round-half-up, enum
//! membership, NOT NULL rejection, auto-increment assignment, and
//! primary-key uniqueness. Column metadata is reported in the dialect's
//! canonical (engine-normalized) form, so introspection behaves like a live
//! server.
//!
//! The test suite runs the full generate/run/insert/introspect cycle
//! against this adapter; it is also usable as a dry-run backend.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use super::adapter::{ColumnMetadata, DatabaseAdapter, DatabaseValue, IndexMetadata};
use crate::dialect::mysql::parse_enum_values;
use crate::dialect::{Dialect, MysqlDialect};
use crate::error::{MigrationError, MigrationResult};
use crate::schema::{Column, ColumnType, TableDefinition};

struct TableState {
    definition: TableDefinition,
    rows: Vec<BTreeMap<String, DatabaseValue>>,
    next_auto_increment: i64,
}

impl TableState {
    fn new(definition: TableDefinition) -> Self {
        Self {
            definition,
            rows: Vec::new(),
            next_auto_increment: 1,
        }
    }
}

/// In-memory database adapter with MySQL column semantics
pub struct MemoryDatabase {
    dialect: MysqlDialect,
    tables: DashMap<String, TableState>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self {
            dialect: MysqlDialect::new(),
            tables: DashMap::new(),
        }
    }

    fn not_found(table: &str) -> MigrationError {
        MigrationError::TableNotFound {
            table: table.to_string(),
        }
    }
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseAdapter for MemoryDatabase {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    async fn execute_ddl(&self, _statement: &str) -> MigrationResult<()> {
        Err(MigrationError::Database(
            "the in-memory adapter does not execute raw DDL; use the structural operations"
                .to_string(),
        ))
    }

    async fn create_table(&self, definition: &TableDefinition) -> MigrationResult<()> {
        definition.validate()?;
        if definition.columns.is_empty() {
            return Err(MigrationError::Database(format!(
                "table '{}' must contain at least one column",
                definition.name
            )));
        }
        // Reject unmappable columns at creation time, like a real engine
        // rejecting bad DDL.
        for column in &definition.columns {
            self.dialect.canonical_column_type(column)?;
        }

        match self.tables.entry(definition.name.clone()) {
            Entry::Occupied(_) => Err(MigrationError::Database(format!(
                "table '{}' already exists",
                definition.name
            ))),
            Entry::Vacant(slot) => {
                slot.insert(TableState::new(definition.clone()));
                Ok(())
            }
        }
    }

    async fn add_column(
        &self,
        table: &str,
        column: &Column,
        after: Option<&str>,
    ) -> MigrationResult<()> {
        column.validate()?;
        let mut state = self
            .tables
            .get_mut(table)
            .ok_or_else(|| Self::not_found(table))?;

        if state.definition.column_named(&column.name).is_some() {
            return Err(MigrationError::Database(format!(
                "duplicate column name '{}' in table '{}'",
                column.name, table
            )));
        }

        let position = if column.first {
            0
        } else if let Some(after) = after {
            let index = state
                .definition
                .columns
                .iter()
                .position(|c| c.name == after)
                .ok_or_else(|| {
                    MigrationError::Database(format!(
                        "unknown column '{}' in table '{}'",
                        after, table
                    ))
                })?;
            index + 1
        } else {
            state.definition.columns.len()
        };

        let state = &mut *state;
        state.definition.columns.insert(position, column.clone());
        // Existing rows get the engine's implicit default for the new
        // column (auto-increment columns get sequential values).
        for row in &mut state.rows {
            let fill = if column.auto_increment {
                let value = state.next_auto_increment;
                state.next_auto_increment += 1;
                if column.unsigned {
                    DatabaseValue::UInt64(value as u64)
                } else {
                    DatabaseValue::Int64(value)
                }
            } else if !column.not_null {
                DatabaseValue::Null
            } else {
                implicit_default(column)
            };
            row.insert(column.name.clone(), fill);
        }
        Ok(())
    }

    async fn drop_table(&self, table: &str) -> MigrationResult<()> {
        self.tables.remove(table);
        Ok(())
    }

    async fn table_exists(&self, table: &str) -> MigrationResult<bool> {
        Ok(self.tables.contains_key(table))
    }

    async fn describe_columns(&self, table: &str) -> MigrationResult<Vec<ColumnMetadata>> {
        let state = self.tables.get(table).ok_or_else(|| Self::not_found(table))?;
        state
            .definition
            .columns
            .iter()
            .map(|column| {
                Ok(ColumnMetadata {
                    name: column.name.clone(),
                    column_type: self.dialect.canonical_column_type(column)?,
                    nullable: !column.not_null,
                    primary: column.primary,
                    auto_increment: column.auto_increment,
                })
            })
            .collect()
    }

    async fn describe_indexes(&self, table: &str) -> MigrationResult<Vec<IndexMetadata>> {
        let state = self.tables.get(table).ok_or_else(|| Self::not_found(table))?;

        let mut indexes = Vec::new();
        let primary: Vec<String> = state
            .definition
            .primary_columns()
            .iter()
            .map(|c| c.name.clone())
            .collect();
        if !primary.is_empty() {
            indexes.push(IndexMetadata {
                name: "PRIMARY".to_string(),
                columns: primary,
                unique: true,
            });
        }
        for index in &state.definition.indexes {
            indexes.push(IndexMetadata {
                name: index.name.clone(),
                columns: index.columns.clone(),
                unique: index.unique,
            });
        }
        Ok(indexes)
    }

    async fn insert_row(
        &self,
        table: &str,
        values: &[DatabaseValue],
        columns: &[&str],
    ) -> MigrationResult<()> {
        if values.len() != columns.len() {
            return Err(MigrationError::Database(format!(
                "column count {} does not match value count {} for table '{}'",
                columns.len(),
                values.len(),
                table
            )));
        }

        let mut state = self
            .tables
            .get_mut(table)
            .ok_or_else(|| Self::not_found(table))?;
        let state = &mut *state;

        for name in columns {
            if state.definition.column_named(name).is_none() {
                return Err(MigrationError::Database(format!(
                    "unknown column '{}' in table '{}'",
                    name, table
                )));
            }
        }

        let mut row = BTreeMap::new();
        for column in &state.definition.columns {
            let provided = columns.iter().position(|c| *c == column.name);
            let value = match provided {
                Some(index) => coerce_value(column, values[index].clone())?,
                None if column.auto_increment => {
                    let value = state.next_auto_increment;
                    state.next_auto_increment += 1;
                    if column.unsigned {
                        DatabaseValue::UInt64(value as u64)
                    } else {
                        DatabaseValue::Int64(value)
                    }
                }
                None => match &column.default {
                    Some(default) => {
                        coerce_value(column, DatabaseValue::String(default.clone()))?
                    }
                    None if !column.not_null => DatabaseValue::Null,
                    None => {
                        return Err(MigrationError::Database(format!(
                            "field '{}' doesn't have a default value",
                            column.name
                        )))
                    }
                },
            };

            if column.auto_increment {
                let explicit = match value {
                    DatabaseValue::Int64(v) => Some(v),
                    DatabaseValue::UInt64(v) => Some(v as i64),
                    _ => None,
                };
                if let Some(v) = explicit {
                    state.next_auto_increment = state.next_auto_increment.max(v + 1);
                }
            }
            row.insert(column.name.clone(), value);
        }

        let primary: Vec<&str> = state
            .definition
            .primary_columns()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        if !primary.is_empty() {
            for existing in &state.rows {
                if primary.iter().all(|c| existing.get(*c) == row.get(*c)) {
                    return Err(MigrationError::Database(format!(
                        "duplicate entry for key 'PRIMARY' in table '{}'",
                        table
                    )));
                }
            }
        }

        state.rows.push(row);
        Ok(())
    }

    async fn fetch_column(
        &self,
        table: &str,
        column: &str,
    ) -> MigrationResult<Vec<DatabaseValue>> {
        let state = self.tables.get(table).ok_or_else(|| Self::not_found(table))?;
        if state.definition.column_named(column).is_none() {
            return Err(MigrationError::Database(format!(
                "unknown column '{}' in table '{}'",
                column, table
            )));
        }
        Ok(state
            .rows
            .iter()
            .map(|row| row.get(column).cloned().unwrap_or(DatabaseValue::Null))
            .collect())
    }
}

/// Validate and normalize one value against a column, the way the engine
/// would on INSERT
fn coerce_value(column: &Column, value: DatabaseValue) -> MigrationResult<DatabaseValue> {
    if value.is_null() {
        if column.not_null {
            return Err(MigrationError::Database(format!(
                "column '{}' cannot be null",
                column.name
            )));
        }
        return Ok(DatabaseValue::Null);
    }

    match column.column_type {
        ColumnType::TinyInteger
        | ColumnType::SmallInteger
        | ColumnType::MediumInteger
        | ColumnType::Integer
        | ColumnType::BigInteger => coerce_integer(column, value),
        ColumnType::Decimal => coerce_decimal(column, value),
        ColumnType::Float | ColumnType::Double => match value {
            DatabaseValue::Float64(v) => Ok(DatabaseValue::Float64(v)),
            DatabaseValue::Int64(v) => Ok(DatabaseValue::Float64(v as f64)),
            DatabaseValue::UInt64(v) => Ok(DatabaseValue::Float64(v as f64)),
            other => Err(type_mismatch(column, &other)),
        },
        ColumnType::Char | ColumnType::Varchar => {
            let text = expect_string(column, value)?;
            let limit = column.size.unwrap_or(1) as usize;
            if text.chars().count() > limit {
                return Err(MigrationError::Database(format!(
                    "data too long for column '{}'",
                    column.name
                )));
            }
            Ok(DatabaseValue::String(text))
        }
        ColumnType::Text | ColumnType::Blob => {
            Ok(DatabaseValue::String(expect_string(column, value)?))
        }
        ColumnType::Date => {
            let text = expect_string(column, value)?;
            let date = NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|_| {
                MigrationError::Database(format!(
                    "incorrect date value '{}' for column '{}'",
                    text, column.name
                ))
            })?;
            Ok(DatabaseValue::String(date.format("%Y-%m-%d").to_string()))
        }
        ColumnType::DateTime | ColumnType::Timestamp => {
            let text = expect_string(column, value)?;
            let datetime =
                NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S").map_err(|_| {
                    MigrationError::Database(format!(
                        "incorrect datetime value '{}' for column '{}'",
                        text, column.name
                    ))
                })?;
            Ok(DatabaseValue::String(
                datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            ))
        }
        ColumnType::Time => match value {
            DatabaseValue::Time(time) => {
                Ok(DatabaseValue::String(time.format("%H:%M:%S").to_string()))
            }
            DatabaseValue::String(text) => {
                let time = NaiveTime::parse_from_str(&text, "%H:%M:%S").map_err(|_| {
                    MigrationError::Database(format!(
                        "incorrect time value '{}' for column '{}'",
                        text, column.name
                    ))
                })?;
                Ok(DatabaseValue::String(time.format("%H:%M:%S").to_string()))
            }
            other => Err(type_mismatch(column, &other)),
        },
        ColumnType::Json => match value {
            DatabaseValue::Json(json) => Ok(DatabaseValue::Json(json)),
            DatabaseValue::String(text) => serde_json::from_str::<JsonValue>(&text)
                .map(DatabaseValue::Json)
                .map_err(|e| {
                    MigrationError::Database(format!(
                        "invalid JSON text for column '{}': {}",
                        column.name, e
                    ))
                }),
            other => Err(type_mismatch(column, &other)),
        },
        ColumnType::Enum => {
            let text = expect_string(column, value)?;
            let allowed = parse_enum_values(column.values.as_deref().unwrap_or(""));
            if allowed.iter().any(|v| v == &text) {
                Ok(DatabaseValue::String(text))
            } else {
                Err(MigrationError::Database(format!(
                    "data truncated for column '{}': '{}' is not an allowed value",
                    column.name, text
                )))
            }
        }
    }
}

fn coerce_integer(column: &Column, value: DatabaseValue) -> MigrationResult<DatabaseValue> {
    let parsed: i128 = match value {
        DatabaseValue::Int64(v) => v as i128,
        DatabaseValue::UInt64(v) => v as i128,
        DatabaseValue::Bool(v) => v as i128,
        DatabaseValue::String(s) => s.trim().parse().map_err(|_| {
            MigrationError::Database(format!(
                "incorrect integer value '{}' for column '{}'",
                s, column.name
            ))
        })?,
        other => return Err(type_mismatch(column, &other)),
    };

    let (min, max) = integer_range(column.column_type, column.unsigned);
    if parsed < min || parsed > max {
        return Err(MigrationError::Database(format!(
            "out of range value {} for column '{}'",
            parsed, column.name
        )));
    }

    Ok(if column.unsigned {
        DatabaseValue::UInt64(parsed as u64)
    } else {
        DatabaseValue::Int64(parsed as i64)
    })
}

fn coerce_decimal(column: &Column, value: DatabaseValue) -> MigrationResult<DatabaseValue> {
    let text = match value {
        DatabaseValue::Decimal(s) => s,
        DatabaseValue::String(s) => s,
        DatabaseValue::Int64(v) => v.to_string(),
        DatabaseValue::UInt64(v) => v.to_string(),
        DatabaseValue::Float64(v) => v.to_string(),
        other => return Err(type_mismatch(column, &other)),
    };
    let precision = column.size.unwrap_or(10);
    let scale = column.scale.unwrap_or(0);
    normalize_decimal(&text, precision, scale)
        .map(DatabaseValue::Decimal)
        .map_err(|message| {
            MigrationError::Database(format!("{} for column '{}'", message, column.name))
        })
}

/// The storable range of an integer column. Display width plays no part
/// here; only the type name and signedness decide the range.
fn integer_range(column_type: ColumnType, unsigned: bool) -> (i128, i128) {
    match (column_type, unsigned) {
        (ColumnType::TinyInteger, false) => (-128, 127),
        (ColumnType::TinyInteger, true) => (0, 255),
        (ColumnType::SmallInteger, false) => (-32_768, 32_767),
        (ColumnType::SmallInteger, true) => (0, 65_535),
        (ColumnType::MediumInteger, false) => (-8_388_608, 8_388_607),
        (ColumnType::MediumInteger, true) => (0, 16_777_215),
        (ColumnType::Integer, false) => (i32::MIN as i128, i32::MAX as i128),
        (ColumnType::Integer, true) => (0, u32::MAX as i128),
        (ColumnType::BigInteger, false) => (i64::MIN as i128, i64::MAX as i128),
        (ColumnType::BigInteger, true) => (0, u64::MAX as i128),
        _ => (0, 0),
    }
}

/// Normalize a decimal literal to `precision`/`scale`: round half-up to the
/// scale, pad fractional digits, and reject integer-part overflow
fn normalize_decimal(text: &str, precision: u32, scale: u32) -> Result<String, String> {
    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let mut split = body.splitn(2, '.');
    let int_raw = split.next().unwrap_or("");
    let frac_raw = split.next().unwrap_or("");
    if int_raw.is_empty() && frac_raw.is_empty() {
        return Err(format!("incorrect decimal value '{}'", text));
    }
    if !int_raw.bytes().all(|b| b.is_ascii_digit())
        || !frac_raw.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(format!("incorrect decimal value '{}'", text));
    }

    let scale = scale as usize;
    let mut int_digits: Vec<u8> = int_raw.bytes().map(|b| b - b'0').collect();
    let mut frac_digits: Vec<u8> = frac_raw.bytes().map(|b| b - b'0').collect();

    if frac_digits.len() > scale {
        let round_up = frac_digits[scale] >= 5;
        frac_digits.truncate(scale);
        if round_up && increment_digits(&mut frac_digits) && increment_digits(&mut int_digits) {
            int_digits.insert(0, 1);
        }
    } else {
        frac_digits.resize(scale, 0);
    }

    while int_digits.len() > 1 && int_digits[0] == 0 {
        int_digits.remove(0);
    }
    if int_digits.is_empty() {
        int_digits.push(0);
    }

    let integer_capacity = (precision as usize).saturating_sub(scale);
    let significant = if int_digits == [0] { 0 } else { int_digits.len() };
    if significant > integer_capacity {
        return Err(format!("out of range value '{}'", text));
    }

    let mut out = String::new();
    let is_zero = significant == 0 && frac_digits.iter().all(|&d| d == 0);
    if negative && !is_zero {
        out.push('-');
    }
    out.extend(int_digits.iter().map(|d| (d + b'0') as char));
    if scale > 0 {
        out.push('.');
        out.extend(frac_digits.iter().map(|d| (d + b'0') as char));
    }
    Ok(out)
}

/// Add one to a digit sequence in place; returns true when the carry
/// overflows the leading digit
fn increment_digits(digits: &mut [u8]) -> bool {
    for digit in digits.iter_mut().rev() {
        if *digit == 9 {
            *digit = 0;
        } else {
            *digit += 1;
            return false;
        }
    }
    true
}

/// MySQL's implicit default for a NOT NULL column added without one
fn implicit_default(column: &Column) -> DatabaseValue {
    match column.column_type {
        t if t.is_integer() => {
            if column.unsigned {
                DatabaseValue::UInt64(0)
            } else {
                DatabaseValue::Int64(0)
            }
        }
        ColumnType::Decimal => {
            let scale = column.scale.unwrap_or(0) as usize;
            if scale > 0 {
                DatabaseValue::Decimal(format!("0.{}", "0".repeat(scale)))
            } else {
                DatabaseValue::Decimal("0".to_string())
            }
        }
        ColumnType::Float | ColumnType::Double => DatabaseValue::Float64(0.0),
        ColumnType::Time => DatabaseValue::String("00:00:00".to_string()),
        ColumnType::Date => DatabaseValue::String("0000-00-00".to_string()),
        ColumnType::DateTime | ColumnType::Timestamp => {
            DatabaseValue::String("0000-00-00 00:00:00".to_string())
        }
        ColumnType::Json => DatabaseValue::Json(JsonValue::Null),
        ColumnType::Enum => {
            let allowed = parse_enum_values(column.values.as_deref().unwrap_or(""));
            DatabaseValue::String(allowed.into_iter().next().unwrap_or_default())
        }
        _ => DatabaseValue::String(String::new()),
    }
}

fn expect_string(column: &Column, value: DatabaseValue) -> MigrationResult<String> {
    match value {
        DatabaseValue::String(s) => Ok(s),
        other => Err(type_mismatch(column, &other)),
    }
}

fn type_mismatch(column: &Column, value: &DatabaseValue) -> MigrationError {
    MigrationError::Database(format!(
        "incorrect {} value for column '{}'",
        value.type_name(),
        column.name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_column_table(column: Column) -> TableDefinition {
        TableDefinition::new("t").column(column)
    }

    #[tokio::test]
    async fn test_create_table_twice_fails() {
        let db = MemoryDatabase::new();
        let table = single_column_table(Column::new("n", ColumnType::Integer));
        db.create_table(&table).await.unwrap();
        assert!(db.create_table(&table).await.is_err());
    }

    #[tokio::test]
    async fn test_integer_range_is_bound_by_type_not_display_width() {
        let db = MemoryDatabase::new();
        let table =
            single_column_table(Column::new("n", ColumnType::MediumInteger).size(1));
        db.create_table(&table).await.unwrap();

        for value in [8_388_607i64, 0, -8_388_608] {
            db.insert_row("t", &[value.into()], &["n"]).await.unwrap();
        }
        assert!(db
            .insert_row("t", &[8_388_608i64.into()], &["n"])
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_unsigned_range() {
        let db = MemoryDatabase::new();
        let table = single_column_table(
            Column::new("n", ColumnType::TinyInteger).unsigned(true),
        );
        db.create_table(&table).await.unwrap();

        db.insert_row("t", &[255u64.into()], &["n"]).await.unwrap();
        db.insert_row("t", &[0u64.into()], &["n"]).await.unwrap();
        assert!(db.insert_row("t", &[(-1i64).into()], &["n"]).await.is_err());
        assert!(db.insert_row("t", &[256i64.into()], &["n"]).await.is_err());
    }

    #[tokio::test]
    async fn test_not_null_rejects_null() {
        let db = MemoryDatabase::new();
        let table = single_column_table(Column::new("n", ColumnType::Integer));
        db.create_table(&table).await.unwrap();
        assert!(db
            .insert_row("t", &[DatabaseValue::Null], &["n"])
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_auto_increment_assigns_and_tracks_explicit_values() {
        let db = MemoryDatabase::new();
        let table = single_column_table(
            Column::new("id", ColumnType::Integer)
                .primary(true)
                .auto_increment(true),
        )
        .column(Column::new("n", ColumnType::Integer).not_null(false));
        db.create_table(&table).await.unwrap();

        db.insert_row("t", &[1i64.into()], &["n"]).await.unwrap();
        db.insert_row("t", &[7i64.into()], &["id"]).await.unwrap();
        db.insert_row("t", &[2i64.into()], &["n"]).await.unwrap();

        assert_eq!(
            db.fetch_column("t", "id").await.unwrap(),
            vec![
                DatabaseValue::Int64(1),
                DatabaseValue::Int64(7),
                DatabaseValue::Int64(8)
            ]
        );
    }

    #[tokio::test]
    async fn test_duplicate_primary_key_rejected() {
        let db = MemoryDatabase::new();
        let table = single_column_table(
            Column::new("id", ColumnType::Integer).primary(true),
        );
        db.create_table(&table).await.unwrap();

        db.insert_row("t", &[1i64.into()], &["id"]).await.unwrap();
        let err = db.insert_row("t", &[1i64.into()], &["id"]).await.unwrap_err();
        assert!(err.to_string().contains("duplicate entry"));
    }

    #[tokio::test]
    async fn test_varchar_length_enforced() {
        let db = MemoryDatabase::new();
        let table = single_column_table(Column::new("s", ColumnType::Varchar).size(3));
        db.create_table(&table).await.unwrap();

        db.insert_row("t", &["abc".into()], &["s"]).await.unwrap();
        assert!(db.insert_row("t", &["abcd".into()], &["s"]).await.is_err());
    }

    #[tokio::test]
    async fn test_decimal_normalization_and_overflow() {
        let db = MemoryDatabase::new();
        let table = single_column_table(
            Column::new("d", ColumnType::Decimal).size(10).scale(2),
        );
        db.create_table(&table).await.unwrap();

        db.insert_row("t", &[DatabaseValue::Decimal("2.3".into())], &["d"])
            .await
            .unwrap();
        db.insert_row("t", &[DatabaseValue::Decimal("12345678.12".into())], &["d"])
            .await
            .unwrap();
        assert_eq!(
            db.fetch_column("t", "d").await.unwrap(),
            vec![
                DatabaseValue::Decimal("2.30".into()),
                DatabaseValue::Decimal("12345678.12".into())
            ]
        );

        // Nine integer digits overflow DECIMAL(10,2).
        assert!(db
            .insert_row("t", &[DatabaseValue::Decimal("123456789".into())], &["d"])
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_add_column_backfills_existing_rows() {
        let db = MemoryDatabase::new();
        let table = single_column_table(Column::new("a", ColumnType::Integer));
        db.create_table(&table).await.unwrap();
        db.insert_row("t", &[1i64.into()], &["a"]).await.unwrap();

        db.add_column("t", &Column::new("b", ColumnType::Integer), Some("a"))
            .await
            .unwrap();
        assert_eq!(
            db.fetch_column("t", "b").await.unwrap(),
            vec![DatabaseValue::Int64(0)]
        );

        let names: Vec<String> = db
            .describe_columns("t")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_normalize_decimal_rounds_half_up() {
        assert_eq!(normalize_decimal("2.345", 10, 2).unwrap(), "2.35");
        assert_eq!(normalize_decimal("9.999", 10, 2).unwrap(), "10.00");
        assert_eq!(normalize_decimal("-0.0", 10, 2).unwrap(), "0.00");
        assert_eq!(normalize_decimal("007", 10, 0).unwrap(), "7");
        assert!(normalize_decimal("abc", 10, 2).is_err());
    }
}
