///
/// Connection and statement seam.
///
/// The execution pipeline only talks to the engine through these traits.
/// `sqlite.rs` implements them over SQLite; tests drive the pipeline with
/// scripted statements.
///
/// Column indices are zero-based. Parameter positions are one-based, as in
/// SQL placeholders.
///

use crate::errors::EngineError;
use crate::types::{BindValue, ColumnRef, ColumnType};

/// Outcome of advancing a statement by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// A result row is available through `Statement::column_value`
    Row,
    /// The statement ran to completion
    Done,
}

pub trait Statement {
    fn column_count(&self) -> usize;

    fn column_name(&self, index: usize) -> Result<&str, EngineError>;

    fn column_storage_type(&self, index: usize) -> ColumnType;

    fn parameter_count(&self) -> usize;

    fn bind(&mut self, position: usize, value: &BindValue) -> Result<(), EngineError>;

    fn step(&mut self) -> Result<StepResult, EngineError>;

    fn column_value(&self, index: usize) -> Result<ColumnRef<'_>, EngineError>;

    /// Rewind the statement so it can be stepped again. Bindings survive.
    fn reset(&mut self) -> Result<(), EngineError>;

    /// Unbind every placeholder; unbound placeholders read as NULL.
    fn clear_bindings(&mut self) -> Result<(), EngineError>;

    /// Running count of rows modified through the owning connection
    fn total_changes(&self) -> u64;
}

/// A connection that prepares statements borrowing it, so a statement can
/// never outlive the connection it was prepared on.
pub trait Connection {
    type Statement<'conn>: Statement
    where
        Self: 'conn;

    fn prepare<'conn>(&'conn self, query: &str) -> Result<Self::Statement<'conn>, EngineError>;
}
