//!
//! Record Arrays
//!
//! A `RecordArray` is a 1xN array of records that share one positional field
//! schema. Field names and their order are fixed when the array is created;
//! every record holds exactly one value per field.
//!
//! Parameter batches reach the bridge as record arrays sliced by record, and
//! query results leave it as one.
//!

use thiserror::Error;

use crate::value::HostValue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record {row} has {found} fields, but the array declares {expected}")]
    FieldCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown field '{0}'")]
    UnknownField(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordArray {
    fields: Vec<String>,
    rows: Vec<Vec<HostValue>>,
}

impl RecordArray {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a record array from a field list and its records, validating
    /// every record against the field count.
    pub fn from_rows<I, S>(fields: I, rows: Vec<Vec<HostValue>>) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut records = Self::new(fields);
        records.rows.reserve(rows.len());
        for row in rows {
            records.push_row(row)?;
        }
        Ok(records)
    }

    pub fn push_row(&mut self, row: Vec<HostValue>) -> Result<(), RecordError> {
        if row.len() != self.fields.len() {
            return Err(RecordError::FieldCountMismatch {
                row: self.rows.len(),
                expected: self.fields.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Position of the first field with this name
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field == name)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&[HostValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[HostValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn get(&self, row: usize, field: &str) -> Result<Option<&HostValue>, RecordError> {
        let index = self
            .field_index(field)
            .ok_or_else(|| RecordError::UnknownField(field.to_string()))?;
        Ok(self.rows.get(row).map(|values| &values[index]))
    }

    /// All values of one field, in record order
    pub fn column(&self, field: &str) -> Result<Vec<&HostValue>, RecordError> {
        let index = self
            .field_index(field)
            .ok_or_else(|| RecordError::UnknownField(field.to_string()))?;
        Ok(self.rows.iter().map(|values| &values[index]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> RecordArray {
        RecordArray::from_rows(
            ["id", "name"],
            vec![
                vec![HostValue::from(1i64), HostValue::from("ada")],
                vec![HostValue::from(2i64), HostValue::from("grace")],
            ],
        )
        .expect("valid records")
    }

    #[test]
    fn test_from_rows_keeps_order() {
        let records = people();
        assert_eq!(records.fields(), ["id", "name"]);
        assert_eq!(records.len(), 2);
        assert_eq!(records.row(1).unwrap()[1], HostValue::from("grace"));
        assert!(records.row(2).is_none());
    }

    #[test]
    fn test_push_row_rejects_wrong_width() {
        let mut records = people();
        let err = records
            .push_row(vec![HostValue::from(3i64)])
            .unwrap_err();
        assert_eq!(
            err,
            RecordError::FieldCountMismatch {
                row: 2,
                expected: 2,
                found: 1
            }
        );
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_field_lookup() {
        let records = people();
        assert_eq!(
            records.get(0, "name").unwrap(),
            Some(&HostValue::from("ada"))
        );
        assert_eq!(records.get(5, "name").unwrap(), None);
        assert!(matches!(
            records.get(0, "email"),
            Err(RecordError::UnknownField(_))
        ));

        let ids = records.column("id").unwrap();
        assert_eq!(ids, vec![&HostValue::from(1i64), &HostValue::from(2i64)]);
    }

    #[test]
    fn test_empty_array_keeps_fields() {
        let records = RecordArray::new(["a", "b", "c"]);
        assert!(records.is_empty());
        assert_eq!(records.field_count(), 3);
        assert_eq!(records.rows().count(), 0);
    }
}
