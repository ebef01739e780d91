//! Table descriptors and row normalization

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// A stored row: column name to value
pub type Row = serde_json::Map<String, Value>;

/// Storage shape of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// 64-bit integer, accepted from JSON numbers or decimal strings
    BigInt,
    /// 32-bit integer
    Integer,
    Text,
    /// UTC timestamp, kept as RFC 3339 with microsecond precision
    Timestamp,
    Boolean,
}

impl ColumnKind {
    /// Coerce a value into this column's canonical JSON form
    pub fn normalize(self, value: Value) -> Result<Value, String> {
        match (self, value) {
            (_, Value::Null) => Ok(Value::Null),
            (Self::BigInt, Value::Number(n)) => n
                .as_i64()
                .map(Value::from)
                .ok_or_else(|| format!("expected a 64-bit integer, got {n}")),
            (Self::BigInt, Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| format!("expected a 64-bit integer, got {s:?}")),
            (Self::Integer, Value::Number(n)) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(Value::from)
                .ok_or_else(|| format!("expected a 32-bit integer, got {n}")),
            (Self::Text, Value::String(s)) => Ok(Value::String(s)),
            (Self::Timestamp, Value::String(s)) => DateTime::parse_from_rfc3339(&s)
                .map(|t| {
                    Value::String(
                        t.with_timezone(&Utc)
                            .to_rfc3339_opts(SecondsFormat::Micros, true),
                    )
                })
                .map_err(|e| format!("expected an RFC 3339 timestamp, got {s:?} ({e})")),
            (Self::Boolean, Value::Bool(b)) => Ok(Value::Bool(b)),
            (kind, other) => Err(format!("expected {kind}, got {}", json_type(&other))),
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BigInt => "bigint",
            Self::Integer => "integer",
            Self::Text => "text",
            Self::Timestamp => "timestamp",
            Self::Boolean => "boolean",
        })
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A column of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
        }
    }

    pub const fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }
}

/// Physical location and shape of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: &'static str,
    pub columns: &'static [Column],
    /// Column groups that must be unique in addition to the primary key
    pub unique: &'static [&'static [&'static str]],
}

impl TableDescriptor {
    pub const fn new(name: &'static str, columns: &'static [Column]) -> Self {
        Self {
            name,
            columns,
            unique: &[],
        }
    }

    pub const fn with_unique(self, unique: &'static [&'static [&'static str]]) -> Self {
        Self { unique, ..self }
    }

    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Normalize a single value for `column`
    pub fn normalize_value(&self, column: &str, value: Value) -> Result<Value, String> {
        let col = self
            .column(column)
            .ok_or_else(|| format!("unknown column `{column}`"))?;
        col.kind
            .normalize(value)
            .map_err(|message| format!("{column}: {message}"))
    }

    /// Check a complete row against the table shape.
    ///
    /// Unknown columns and missing non-nullable columns are rejected, absent
    /// nullable columns become `null`, and every value is coerced to its
    /// column's canonical form.
    pub fn normalize_row(&self, mut row: Row) -> Result<Row, String> {
        if let Some(unknown) = row.keys().find(|k| !self.has_column(k)) {
            return Err(format!("unknown column `{unknown}`"));
        }

        let mut normalized = Row::new();
        for column in self.columns {
            let value = row.remove(column.name).unwrap_or(Value::Null);
            let value = column
                .kind
                .normalize(value)
                .map_err(|message| format!("{}: {message}", column.name))?;
            if value.is_null() && !column.nullable {
                return Err(format!("{}: is required", column.name));
            }
            normalized.insert(column.name.to_string(), value);
        }
        Ok(normalized)
    }
}
