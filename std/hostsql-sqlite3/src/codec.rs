///
/// Value codec: host values to bind values, column values to dynamic values.
///
/// Encoding classifies a host value by class:
/// - char → Text (an owned copy; the engine copies again on bind)
/// - single, double → Float
/// - int8 .. uint64 → Integer, widened to i64 without wraparound
/// - logical → Integer 0 or 1
/// - function handle → no binding at all (the placeholder is skipped)
/// - struct → TypeMismatch
///
/// Numeric and logical values must be scalars. An empty array binds NULL;
/// more than one element is a TypeMismatch. uint64 values above i64::MAX
/// fail with IntegerOverflow.
///
/// A NaN float encodes as Float(NaN), but SQLite stores NaN as NULL, so it
/// reads back as Null.
///

use hostsql_core::{ClassId, HostValue};

use crate::errors::CodecError;
use crate::types::{BindValue, ColumnRef, DynamicValue};

/// Classify a host value for binding. `Ok(None)` means the value is a
/// function handle and no bind call should be issued for its position.
pub fn encode(value: &HostValue) -> Result<Option<BindValue>, CodecError> {
    let class = value.class_id();
    let bind = match value {
        HostValue::Char(s) => BindValue::Text(s.clone()),
        HostValue::Single(v) => float(class, v, f64::from)?,
        HostValue::Double(v) => float(class, v, |f| f)?,
        HostValue::Int8(v) => integer(class, v)?,
        HostValue::UInt8(v) => integer(class, v)?,
        HostValue::Int16(v) => integer(class, v)?,
        HostValue::UInt16(v) => integer(class, v)?,
        HostValue::Int32(v) => integer(class, v)?,
        HostValue::UInt32(v) => integer(class, v)?,
        HostValue::Int64(v) => integer(class, v)?,
        HostValue::UInt64(v) => match scalar(class, v)? {
            Some(u) => i64::try_from(u)
                .map(BindValue::Integer)
                .map_err(|_| CodecError::IntegerOverflow { value: u })?,
            None => BindValue::Null,
        },
        HostValue::Logical(v) => match scalar(class, v)? {
            Some(b) => BindValue::Integer(i64::from(b)),
            None => BindValue::Null,
        },
        HostValue::Function(_) => return Ok(None),
        HostValue::Struct(_) => {
            return Err(CodecError::TypeMismatch {
                class,
                reason: "nested record arrays cannot be bound".to_string(),
            });
        }
    };
    Ok(Some(bind))
}

/// Materialize the current row's column value.
pub fn decode(column: ColumnRef<'_>) -> Result<DynamicValue, CodecError> {
    match column {
        ColumnRef::Null => Ok(DynamicValue::Null),
        ColumnRef::Integer(i) => Ok(DynamicValue::Integer(i)),
        ColumnRef::Float(f) => Ok(DynamicValue::Real(f)),
        ColumnRef::Text(bytes) => Ok(DynamicValue::Text(
            String::from_utf8_lossy(bytes).into_owned(),
        )),
        ColumnRef::Blob(_) => Err(CodecError::UnsupportedColumnType {
            storage: column.storage_name(),
        }),
    }
}

/// Convert a materialized value into the host value it is returned as:
/// NULL becomes the empty value, integers come back as int64 scalars and
/// reals as double scalars.
pub fn to_host(value: DynamicValue) -> HostValue {
    match value {
        DynamicValue::Null => HostValue::empty(),
        DynamicValue::Text(s) => HostValue::Char(s),
        DynamicValue::Real(f) => HostValue::Double(vec![f]),
        DynamicValue::Integer(i) => HostValue::Int64(vec![i]),
    }
}

fn scalar<T: Copy>(class: ClassId, values: &[T]) -> Result<Option<T>, CodecError> {
    match values {
        [] => Ok(None),
        [value] => Ok(Some(*value)),
        _ => Err(CodecError::TypeMismatch {
            class,
            reason: format!("expected a scalar, got {} elements", values.len()),
        }),
    }
}

fn integer<T: Copy + Into<i64>>(class: ClassId, values: &[T]) -> Result<BindValue, CodecError> {
    Ok(match scalar(class, values)? {
        Some(value) => BindValue::Integer(value.into()),
        None => BindValue::Null,
    })
}

fn float<T: Copy>(
    class: ClassId,
    values: &[T],
    widen: impl Fn(T) -> f64,
) -> Result<BindValue, CodecError> {
    Ok(match scalar(class, values)? {
        Some(value) => BindValue::Float(widen(value)),
        None => BindValue::Null,
    })
}
