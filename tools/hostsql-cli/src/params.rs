///
/// # Parameter Batches
///
/// Parameter batches arrive as JSON and become a `RecordArray`. Three
/// shapes are accepted:
///
/// - Columnar: `{"fields": ["a", "b"], "rows": [[1, "x"], [2, "y"]]}`
/// - Records: `[{"a": 1, "b": "x"}, {"a": 2, "b": "y"}]`. Field order is the
///   key order of the first record; later records must carry the same keys.
/// - A single record object, which becomes a one-row batch.
///
/// ## Value Mapping
///
/// | JSON                      | Host value               |
/// |---------------------------|--------------------------|
/// | string                    | char                     |
/// | integer                   | int64 (uint64 above i64) |
/// | float                     | double                   |
/// | boolean                   | logical                  |
/// | null                      | empty                    |
/// | array of numbers/booleans | numeric/logical array    |
/// | `{"int16": 5}`            | that class               |
/// | `{"function": "name"}`    | function handle          |
///

use hostsql_core::{ClassId, HostValue, RecordArray};
use serde_json::{Map, Number, Value};

use crate::errors::CliError;

pub fn parse_batch(json: &str) -> Result<RecordArray, CliError> {
    let value: Value = serde_json::from_str(json)?;
    batch_from_value(&value)
}

pub fn batch_from_value(value: &Value) -> Result<RecordArray, CliError> {
    match value {
        Value::Object(object) if is_columnar(object) => columnar(object),
        Value::Object(object) => records(std::slice::from_ref(value), object),
        Value::Array(items) => match items.first() {
            None => Ok(RecordArray::default()),
            Some(Value::Object(first)) => records(items, first),
            Some(_) => Err(CliError::Params(
                "a record batch must be an array of objects".to_string(),
            )),
        },
        _ => Err(CliError::Params(
            "expected an object or an array of objects".to_string(),
        )),
    }
}

fn is_columnar(object: &Map<String, Value>) -> bool {
    object.len() == 2 && object.get("fields").is_some_and(Value::is_array) && object.contains_key("rows")
}

fn columnar(object: &Map<String, Value>) -> Result<RecordArray, CliError> {
    let fields = object
        .get("fields")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .map(|field| {
            field
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| CliError::Params(format!("field name {} is not a string", field)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let rows = object
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| CliError::Params("'rows' must be an array".to_string()))?;

    let mut batch = RecordArray::new(fields);
    for (index, row) in rows.iter().enumerate() {
        let cells = row
            .as_array()
            .ok_or_else(|| CliError::Params(format!("row {} is not an array", index)))?;
        let values = cells.iter().map(host_value).collect::<Result<Vec<_>, _>>()?;
        batch.push_row(values)?;
    }
    Ok(batch)
}

fn records(items: &[Value], first: &Map<String, Value>) -> Result<RecordArray, CliError> {
    let fields: Vec<String> = first.keys().cloned().collect();
    let mut batch = RecordArray::new(fields.iter().cloned());

    for (index, item) in items.iter().enumerate() {
        let record = item
            .as_object()
            .ok_or_else(|| CliError::Params(format!("record {} is not an object", index)))?;
        if record.len() != fields.len() {
            return Err(CliError::Params(format!(
                "record {} has {} fields, expected {}",
                index,
                record.len(),
                fields.len()
            )));
        }
        let values = fields
            .iter()
            .map(|field| {
                let value = record.get(field).ok_or_else(|| {
                    CliError::Params(format!("record {} is missing field '{}'", index, field))
                })?;
                host_value(value)
            })
            .collect::<Result<Vec<_>, _>>()?;
        batch.push_row(values)?;
    }
    Ok(batch)
}

/// Map one JSON value to the host value it stands for.
pub fn host_value(value: &Value) -> Result<HostValue, CliError> {
    match value {
        Value::Null => Ok(HostValue::empty()),
        Value::Bool(b) => Ok(HostValue::from(*b)),
        Value::String(s) => Ok(HostValue::char(s.as_str())),
        Value::Number(n) => Ok(number(n)),
        Value::Array(items) => array(items),
        Value::Object(object) => typed(object),
    }
}

fn number(n: &Number) -> HostValue {
    if let Some(i) = n.as_i64() {
        HostValue::from(i)
    } else if let Some(u) = n.as_u64() {
        HostValue::from(u)
    } else {
        HostValue::from(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn array(items: &[Value]) -> Result<HostValue, CliError> {
    if items.is_empty() {
        return Ok(HostValue::empty());
    }
    if let Some(flags) = items.iter().map(Value::as_bool).collect::<Option<Vec<_>>>() {
        return Ok(HostValue::Logical(flags));
    }
    if let Some(ints) = items.iter().map(Value::as_i64).collect::<Option<Vec<_>>>() {
        return Ok(HostValue::Int64(ints));
    }
    items
        .iter()
        .map(Value::as_f64)
        .collect::<Option<Vec<_>>>()
        .map(HostValue::Double)
        .ok_or_else(|| {
            CliError::Params("arrays must hold only numbers or only booleans".to_string())
        })
}

fn typed(object: &Map<String, Value>) -> Result<HostValue, CliError> {
    let mut entries = object.iter();
    let (Some((name, inner)), None) = (entries.next(), entries.next()) else {
        return Err(CliError::Params(
            "typed values must be single-key objects like {\"int16\": 5}".to_string(),
        ));
    };
    let class = ClassId::from_name(name)
        .or_else(|| (name == "function").then_some(ClassId::Function))
        .ok_or_else(|| CliError::Params(format!("unknown class '{}'", name)))?;

    match class {
        ClassId::Char => inner
            .as_str()
            .map(HostValue::char)
            .ok_or_else(|| mismatch(class, inner)),
        ClassId::Function => inner
            .as_str()
            .map(HostValue::function)
            .ok_or_else(|| mismatch(class, inner)),
        ClassId::Logical => elements(inner)
            .iter()
            .map(|v| v.as_bool())
            .collect::<Option<Vec<_>>>()
            .map(HostValue::Logical)
            .ok_or_else(|| mismatch(class, inner)),
        ClassId::Struct => match inner {
            Value::Object(_) | Value::Array(_) => {
                Ok(HostValue::Struct(batch_from_value(inner)?))
            }
            _ => Err(mismatch(class, inner)),
        },
        ClassId::Single => floats(class, inner)
            .map(|v| HostValue::Single(v.into_iter().map(|f| f as f32).collect())),
        ClassId::Double => floats(class, inner).map(HostValue::Double),
        ClassId::Int8 => signed(class, inner).map(HostValue::Int8),
        ClassId::Int16 => signed(class, inner).map(HostValue::Int16),
        ClassId::Int32 => signed(class, inner).map(HostValue::Int32),
        ClassId::Int64 => signed(class, inner).map(HostValue::Int64),
        ClassId::UInt8 => unsigned(class, inner).map(HostValue::UInt8),
        ClassId::UInt16 => unsigned(class, inner).map(HostValue::UInt16),
        ClassId::UInt32 => unsigned(class, inner).map(HostValue::UInt32),
        ClassId::UInt64 => unsigned(class, inner).map(HostValue::UInt64),
    }
}

/// A typed payload is either one element or an array of them.
fn elements(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    }
}

fn floats(class: ClassId, value: &Value) -> Result<Vec<f64>, CliError> {
    elements(value)
        .iter()
        .map(|v| v.as_f64().ok_or_else(|| mismatch(class, v)))
        .collect()
}

fn signed<T: TryFrom<i64>>(class: ClassId, value: &Value) -> Result<Vec<T>, CliError> {
    elements(value)
        .iter()
        .map(|v| {
            v.as_i64()
                .and_then(|i| T::try_from(i).ok())
                .ok_or_else(|| mismatch(class, v))
        })
        .collect()
}

fn unsigned<T: TryFrom<u64>>(class: ClassId, value: &Value) -> Result<Vec<T>, CliError> {
    elements(value)
        .iter()
        .map(|v| {
            v.as_u64()
                .and_then(|u| T::try_from(u).ok())
                .ok_or_else(|| mismatch(class, v))
        })
        .collect()
}

fn mismatch(class: ClassId, value: &Value) -> CliError {
    CliError::Params(format!("{} is not a valid {} value", value, class))
}
