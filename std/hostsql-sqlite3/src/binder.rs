///
/// Positional binding of one parameter row.
///
/// Field i of the row binds placeholder i + 1, regardless of field names.
/// Function handles leave their placeholder unbound. A row with more fields
/// than the statement has placeholders fails on the first out-of-range
/// position, as reported by the engine.
///

use hostsql_core::RecordArray;
use tracing::trace;

use crate::codec::encode;
use crate::engine::Statement;
use crate::errors::BridgeError;

pub fn bind_row<S: Statement + ?Sized>(
    stmt: &mut S,
    batch: &RecordArray,
    row: usize,
) -> Result<(), BridgeError> {
    let values = batch.row(row).ok_or(BridgeError::RowOutOfRange {
        row,
        len: batch.len(),
    })?;

    for (field, (name, value)) in batch.fields().iter().zip(values).enumerate() {
        let position = field + 1;
        let bind = encode(value).map_err(|source| BridgeError::Encode {
            row,
            field: name.clone(),
            source,
        })?;
        let Some(bind) = bind else {
            trace!(row, position, "skipping function handle");
            continue;
        };
        stmt.bind(position, &bind)
            .map_err(|source| BridgeError::Bind {
                row,
                position,
                source,
            })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedStatement, SQLITE_RANGE};
    use crate::types::BindValue;
    use hostsql_core::HostValue;

    fn batch() -> RecordArray {
        RecordArray::from_rows(
            ["name", "age", "score"],
            vec![
                vec![
                    HostValue::from("ada"),
                    HostValue::from(36u8),
                    HostValue::from(9.5f64),
                ],
                vec![
                    HostValue::from("grace"),
                    HostValue::function("callback"),
                    HostValue::empty(),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_fields_bind_in_declaration_order() {
        let mut stmt = ScriptedStatement::command(3);
        bind_row(&mut stmt, &batch(), 0).unwrap();
        assert_eq!(
            stmt.bind_log,
            vec![
                (1, BindValue::Text("ada".to_string())),
                (2, BindValue::Integer(36)),
                (3, BindValue::Float(9.5)),
            ]
        );
    }

    #[test]
    fn test_function_handle_leaves_position_unbound() {
        let mut stmt = ScriptedStatement::command(3);
        bind_row(&mut stmt, &batch(), 1).unwrap();
        assert_eq!(
            stmt.bind_log,
            vec![
                (1, BindValue::Text("grace".to_string())),
                (3, BindValue::Null),
            ]
        );
        assert!(!stmt.bound.contains_key(&2));
    }

    #[test]
    fn test_extra_fields_fail_at_out_of_range_position() {
        let mut stmt = ScriptedStatement::command(2);
        let err = bind_row(&mut stmt, &batch(), 0).unwrap_err();
        match err {
            BridgeError::Bind {
                row,
                position,
                source,
            } => {
                assert_eq!(row, 0);
                assert_eq!(position, 3);
                assert_eq!(source.code, SQLITE_RANGE);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_encode_failure_names_row_and_field() {
        let records = RecordArray::from_rows(
            ["id", "flags"],
            vec![vec![HostValue::from(1i32), HostValue::from(u64::MAX)]],
        )
        .unwrap();
        let mut stmt = ScriptedStatement::command(2);
        let err = bind_row(&mut stmt, &records, 0).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Encode { row: 0, ref field, .. } if field == "flags"
        ));
    }

    #[test]
    fn test_row_out_of_range() {
        let mut stmt = ScriptedStatement::command(3);
        let err = bind_row(&mut stmt, &batch(), 2).unwrap_err();
        assert!(matches!(err, BridgeError::RowOutOfRange { row: 2, len: 2 }));
        assert!(stmt.bind_log.is_empty());
    }
}
