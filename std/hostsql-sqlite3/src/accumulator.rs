///
/// Row accumulation.
///
/// A `RowAccumulator` is started with the statement schema, takes rows one
/// at a time and collapses into a `ResultSet` when the statement is done.
/// Rows live in one contiguous vector: appends are amortized O(1) and
/// teardown is flat regardless of the row count.
///

use hostsql_core::RecordArray;

use crate::codec::to_host;
use crate::engine::Statement;
use crate::errors::BridgeError;
use crate::types::{ColumnType, DynamicValue};

/// One materialized row, positionally aligned with the schema
pub type ResultRow = Vec<DynamicValue>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub storage: ColumnType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Read the column names and declared storage classes of a prepared
    /// statement.
    pub fn from_statement<S: Statement + ?Sized>(stmt: &S) -> Result<Self, BridgeError> {
        let columns = (0..stmt.column_count())
            .map(|index| {
                Ok(Column {
                    name: stmt.column_name(index)?.to_string(),
                    storage: stmt.column_storage_type(index),
                })
            })
            .collect::<Result<Vec<_>, BridgeError>>()?;
        Ok(Self { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }
}

#[derive(Debug)]
pub struct RowAccumulator {
    schema: Schema,
    rows: Vec<ResultRow>,
}

impl RowAccumulator {
    pub fn start(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Append a row. A row whose width differs from the schema is rejected
    /// and leaves the rows accumulated so far untouched.
    pub fn append(&mut self, row: ResultRow) -> Result<(), BridgeError> {
        if row.len() != self.schema.len() {
            return Err(BridgeError::SchemaMismatch {
                expected: self.schema.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn finish(self) -> ResultSet {
        ResultSet {
            schema: self.schema,
            rows: self.rows,
        }
    }
}

/// Rows of a finished query, in the order the engine produced them
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    schema: Schema,
    rows: Vec<ResultRow>,
}

impl ResultSet {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[DynamicValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&DynamicValue> {
        let index = self.schema.index_of(column)?;
        self.rows.get(row).map(|values| &values[index])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<ResultRow> {
        self.rows
    }

    /// Collapse into a host record array with one field per column.
    pub fn into_record_array(self) -> Result<RecordArray, BridgeError> {
        let fields: Vec<String> = self.schema.names().map(str::to_string).collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(to_host).collect())
            .collect();
        Ok(RecordArray::from_rows(fields, rows)?)
    }
}
