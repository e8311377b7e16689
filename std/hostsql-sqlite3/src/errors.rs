///
/// Bridge error types.
///
/// - `EngineError`: a status code and message reported by the SQL engine
/// - `CodecError`: a single value that cannot cross the bridge
/// - `BridgeError`: any failure of an execution, with the row, field or
///   column it happened at
///
/// Nothing is recovered locally. Every failure aborts the current call and
/// is returned to the caller.
///

use hostsql_core::{ClassId, RecordError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct EngineError {
    pub code: i32,
    pub message: String,
}

impl EngineError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Cannot bind a value of class '{class}': {reason}")]
    TypeMismatch { class: ClassId, reason: String },

    #[error("Integer {value} does not fit in a signed 64-bit integer")]
    IntegerOverflow { value: u64 },

    #[error("Unsupported column storage class '{storage}'")]
    UnsupportedColumnType { storage: &'static str },
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Failed to open database '{path}': {source}")]
    Open { path: String, source: EngineError },

    #[error("Failed to prepare query '{query}': {source}")]
    Prepare { query: String, source: EngineError },

    #[error("Failed to encode row {row}, field '{field}': {source}")]
    Encode {
        row: usize,
        field: String,
        source: CodecError,
    },

    #[error("Failed to read column {column} ('{name}'): {source}")]
    Column {
        column: usize,
        name: String,
        source: EngineError,
    },

    #[error("Failed to decode column {column} ('{name}'): {source}")]
    Decode {
        column: usize,
        name: String,
        source: CodecError,
    },

    #[error("Schema mismatch: expected {expected} fields, found {found}")]
    SchemaMismatch { expected: usize, found: usize },

    #[error("Parameter row {row} is out of range for a batch of {len}")]
    RowOutOfRange { row: usize, len: usize },

    #[error("Failed to bind row {row}, parameter {position}: {source}")]
    Bind {
        row: usize,
        position: usize,
        source: EngineError,
    },

    #[error("Statement step failed{}: {source}", at_row(.row))]
    Step {
        row: Option<usize>,
        source: EngineError,
    },

    #[error("Failed to reset statement after row {row}: {source}")]
    Reset { row: usize, source: EngineError },

    #[error("Command statement returned a row{}", at_row(.row))]
    UnexpectedRow { row: Option<usize> },

    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("{0}")]
    Record(#[from] RecordError),
}

impl BridgeError {
    /// Index of the parameter row the failure happened at, if any
    pub fn row(&self) -> Option<usize> {
        match self {
            BridgeError::Encode { row, .. }
            | BridgeError::RowOutOfRange { row, .. }
            | BridgeError::Bind { row, .. }
            | BridgeError::Reset { row, .. } => Some(*row),
            BridgeError::Step { row, .. } | BridgeError::UnexpectedRow { row } => *row,
            _ => None,
        }
    }

    /// Status code reported by the engine, if the engine caused the failure
    pub fn engine_code(&self) -> Option<i32> {
        match self {
            BridgeError::Open { source, .. }
            | BridgeError::Prepare { source, .. }
            | BridgeError::Bind { source, .. }
            | BridgeError::Step { source, .. }
            | BridgeError::Reset { source, .. }
            | BridgeError::Column { source, .. }
            | BridgeError::Engine(source) => Some(source.code),
            _ => None,
        }
    }
}

fn at_row(row: &Option<usize>) -> String {
    match row {
        Some(row) => format!(" at row {}", row),
        None => String::new(),
    }
}
