//! Column Model - engine-independent column descriptions
//!
//! A `Column` captures the logical attributes of one table column: type,
//! size/scale hints, signedness, nullability, key participation, and
//! placement. Dialects translate these to and from concrete DDL; the model
//! itself carries no engine-specific behavior.

use serde::{Deserialize, Serialize};

use crate::error::{MigrationError, MigrationResult};

/// Logical column type classification, independent of any database engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    TinyInteger,
    SmallInteger,
    MediumInteger,
    Integer,
    BigInteger,
    Decimal,
    Float,
    Double,
    Char,
    Varchar,
    Text,
    Blob,
    Date,
    DateTime,
    Timestamp,
    Time,
    Json,
    Enum,
}

impl ColumnType {
    /// Whether this type belongs to the integer family (width-bounded,
    /// optionally unsigned, eligible for auto-increment)
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ColumnType::TinyInteger
                | ColumnType::SmallInteger
                | ColumnType::MediumInteger
                | ColumnType::Integer
                | ColumnType::BigInteger
        )
    }

    /// Whether this type stores numeric values
    pub fn is_numeric(&self) -> bool {
        self.is_integer()
            || matches!(
                self,
                ColumnType::Decimal | ColumnType::Float | ColumnType::Double
            )
    }
}

fn default_not_null() -> bool {
    true
}

/// Logical description of one table column
///
/// Immutable once constructed; the builder-style setters consume and return
/// the value. Columns default to NOT NULL when nullability is unspecified,
/// matching the DDL the generator emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column identifier, unique within its table
    pub name: String,
    /// Logical type classification
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Display width (integers), total precision (decimal), or character
    /// length (char/varchar); unused for other types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// Fractional digit count, meaningful only for Decimal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    /// Enum only: the literal, already-quoted allowed-value list
    /// (e.g. `'Y','N','D',''`), passed verbatim into the DDL value list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,
    /// Unsigned storage; integer family only, ignored elsewhere
    #[serde(default)]
    pub unsigned: bool,
    /// NOT NULL constraint; defaults to true when unspecified
    #[serde(default = "default_not_null")]
    pub not_null: bool,
    /// Participates in the primary key
    #[serde(default)]
    pub primary: bool,
    /// Engine assigns sequential values; requires `primary` and an
    /// integer-family type
    #[serde(default)]
    pub auto_increment: bool,
    /// Literal DEFAULT clause value, passed through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Placement hint; only meaningful in ADD COLUMN DDL
    #[serde(default)]
    pub first: bool,
}

impl Column {
    /// Create a column of the given logical type, NOT NULL by default
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            size: None,
            scale: None,
            values: None,
            unsigned: false,
            not_null: true,
            primary: false,
            auto_increment: false,
            default: None,
            first: false,
        }
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Set the enum allowed-value list as a quoted literal,
    /// e.g. `"'Y','N','D',''"`
    pub fn values(mut self, values: impl Into<String>) -> Self {
        self.values = Some(values.into());
        self
    }

    pub fn unsigned(mut self, unsigned: bool) -> Self {
        self.unsigned = unsigned;
        self
    }

    pub fn not_null(mut self, not_null: bool) -> Self {
        self.not_null = not_null;
        self
    }

    pub fn primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }

    pub fn auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn first(mut self, first: bool) -> Self {
        self.first = first;
        self
    }

    /// Validate the model invariants
    ///
    /// `auto_increment` requires `primary` and an integer-family type;
    /// Varchar requires a length; Decimal precision must cover its scale;
    /// Enum requires an allowed-value list. A `scale` on a non-decimal type
    /// is ignored by engines and is not an error.
    pub fn validate(&self) -> MigrationResult<()> {
        if self.auto_increment && !self.primary {
            return Err(self.invalid("auto_increment requires the column to be primary"));
        }
        if self.auto_increment && !self.column_type.is_integer() {
            return Err(self.invalid("auto_increment requires an integer-family type"));
        }
        if self.column_type == ColumnType::Varchar && self.size.is_none() {
            return Err(self.invalid("varchar columns require a size"));
        }
        if self.column_type == ColumnType::Decimal {
            if let (Some(size), Some(scale)) = (self.size, self.scale) {
                if size < scale {
                    return Err(self.invalid(&format!(
                        "decimal precision {} cannot be smaller than scale {}",
                        size, scale
                    )));
                }
            }
        }
        if self.column_type == ColumnType::Enum && self.values.is_none() {
            return Err(self.invalid("enum columns require an allowed-value list"));
        }
        Ok(())
    }

    fn invalid(&self, message: &str) -> MigrationError {
        MigrationError::InvalidColumnDefinition {
            column: self.name.clone(),
            message: message.to_string(),
        }
    }
}
