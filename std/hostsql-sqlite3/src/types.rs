///
/// Values crossing the engine boundary.
///
/// - `BindValue`: what the codec hands to a statement placeholder
/// - `ColumnRef`: a borrowed view of the current row's column value
/// - `DynamicValue`: an owned, materialized column value
/// - `ColumnType`: the storage class a column declares at prepare time
///

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Null,
    Text(String),
    Float(f64),
    Integer(i64),
}

/// A column value of the row the statement currently points at.
/// Borrowed data is only valid until the next step or reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnRef<'a> {
    Null,
    Integer(i64),
    Float(f64),
    Text(&'a [u8]),
    Blob(&'a [u8]),
}

impl ColumnRef<'_> {
    pub fn storage_name(&self) -> &'static str {
        match self {
            ColumnRef::Null => "null",
            ColumnRef::Integer(_) => "integer",
            ColumnRef::Float(_) => "float",
            ColumnRef::Text(_) => "text",
            ColumnRef::Blob(_) => "blob",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    Null,
    Text(String),
    Real(f64),
    Integer(i64),
}

impl DynamicValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DynamicValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynamicValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DynamicValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DynamicValue::Real(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicValue::Null => write!(f, "NULL"),
            DynamicValue::Text(s) => write!(f, "{}", s),
            DynamicValue::Real(r) => write!(f, "{}", r),
            DynamicValue::Integer(i) => write!(f, "{}", i),
        }
    }
}

/// Storage class a result column declares, derived once at prepare time
/// from the column's declared SQL type.
///
/// `Null` means the column has no fixed storage class (an expression, or a
/// numeric-affinity column); its values decide their class row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Null,
    Text,
    Float,
    Integer,
    Unsupported,
}

impl ColumnType {
    /// Classify a declared column type with SQLite's affinity rules.
    pub fn from_declared(declared: &str) -> Self {
        let upper = declared.to_ascii_uppercase();
        if upper.contains("INT") {
            ColumnType::Integer
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            ColumnType::Text
        } else if upper.contains("BLOB") {
            ColumnType::Unsupported
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            ColumnType::Float
        } else {
            ColumnType::Null
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Null => "null",
            ColumnType::Text => "text",
            ColumnType::Float => "float",
            ColumnType::Integer => "integer",
            ColumnType::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affinity_rules() {
        assert_eq!(ColumnType::from_declared("INTEGER"), ColumnType::Integer);
        assert_eq!(ColumnType::from_declared("bigint"), ColumnType::Integer);
        assert_eq!(ColumnType::from_declared("VARCHAR(40)"), ColumnType::Text);
        assert_eq!(ColumnType::from_declared("text"), ColumnType::Text);
        assert_eq!(ColumnType::from_declared("DOUBLE PRECISION"), ColumnType::Float);
        assert_eq!(ColumnType::from_declared("real"), ColumnType::Float);
        assert_eq!(ColumnType::from_declared("BLOB"), ColumnType::Unsupported);
        assert_eq!(ColumnType::from_declared("DECIMAL(10,2)"), ColumnType::Null);
        assert_eq!(ColumnType::from_declared(""), ColumnType::Null);
    }

    #[test]
    fn test_int_wins_over_char() {
        // "CHARINT" has both substrings; INT is checked first.
        assert_eq!(ColumnType::from_declared("CHARINT"), ColumnType::Integer);
    }

    #[test]
    fn test_dynamic_value_display() {
        assert_eq!(DynamicValue::Null.to_string(), "NULL");
        assert_eq!(DynamicValue::Integer(-4).to_string(), "-4");
        assert_eq!(DynamicValue::Real(1.5).to_string(), "1.5");
        assert_eq!(DynamicValue::Text("abc".into()).to_string(), "abc");
    }

    #[test]
    fn test_dynamic_value_accessors() {
        assert_eq!(DynamicValue::Integer(7).as_i64(), Some(7));
        assert_eq!(DynamicValue::Integer(7).as_f64(), None);
        assert_eq!(DynamicValue::Real(0.25).as_f64(), Some(0.25));
        assert_eq!(DynamicValue::Text("x".into()).as_str(), Some("x"));
        assert!(DynamicValue::Null.is_null());
    }
}
