///
/// Scripted statement for exercising the pipeline without an engine.
///
/// A `ScriptedStatement` replays a fixed list of result rows per execution,
/// records every bind, and counts step/reset/clear calls. Failures can be
/// injected at a given step, execution or reset.
///

use std::collections::BTreeMap;

use crate::engine::{StepResult, Statement};
use crate::errors::EngineError;
use crate::types::{BindValue, ColumnRef, ColumnType};

pub const SQLITE_RANGE: i32 = 25;
pub const SQLITE_CONSTRAINT: i32 = 19;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
}

#[derive(Debug, Default)]
pub struct ScriptedStatement {
    pub columns: Vec<String>,
    pub parameters: usize,
    pub rows: Vec<Vec<Cell>>,
    /// Fail the n-th call to `step` (zero-based, counted across executions)
    pub fail_step_at: Option<usize>,
    /// Fail the n-th execution's first step
    pub fail_execution: Option<usize>,
    /// Fail the n-th call to `reset` (zero-based)
    pub fail_reset_at: Option<usize>,

    pub steps: usize,
    pub resets: usize,
    pub clears: usize,
    pub executions: usize,
    pub bound: BTreeMap<usize, BindValue>,
    pub bind_log: Vec<(usize, BindValue)>,
    pub changes: u64,

    cursor: Option<usize>,
}

impl ScriptedStatement {
    pub fn command(parameters: usize) -> Self {
        Self {
            parameters,
            ..Self::default()
        }
    }

    pub fn query(columns: &[&str], rows: Vec<Vec<Cell>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            ..Self::default()
        }
    }

    pub fn with_parameters(mut self, parameters: usize) -> Self {
        self.parameters = parameters;
        self
    }

    fn current(&self) -> Option<&Vec<Cell>> {
        let cursor = self.cursor?;
        self.rows.get(cursor)
    }
}

impl Statement for ScriptedStatement {
    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, index: usize) -> Result<&str, EngineError> {
        self.columns
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| EngineError::new(SQLITE_RANGE, "column index out of range"))
    }

    fn column_storage_type(&self, _index: usize) -> ColumnType {
        ColumnType::Null
    }

    fn parameter_count(&self) -> usize {
        self.parameters
    }

    fn bind(&mut self, position: usize, value: &BindValue) -> Result<(), EngineError> {
        if position == 0 || position > self.parameters {
            return Err(EngineError::new(SQLITE_RANGE, "column index out of range"));
        }
        self.bound.insert(position, value.clone());
        self.bind_log.push((position, value.clone()));
        Ok(())
    }

    fn step(&mut self) -> Result<StepResult, EngineError> {
        let call = self.steps;
        self.steps += 1;
        if self.fail_step_at == Some(call) {
            return Err(EngineError::new(SQLITE_CONSTRAINT, "constraint failed"));
        }
        let next = match self.cursor {
            None => {
                if self.fail_execution == Some(self.executions) {
                    return Err(EngineError::new(SQLITE_CONSTRAINT, "constraint failed"));
                }
                0
            }
            Some(cursor) => cursor + 1,
        };
        self.cursor = Some(next);
        if next < self.rows.len() {
            Ok(StepResult::Row)
        } else {
            self.executions += 1;
            self.changes += 1;
            Ok(StepResult::Done)
        }
    }

    fn column_value(&self, index: usize) -> Result<ColumnRef<'_>, EngineError> {
        let row = self
            .current()
            .ok_or_else(|| EngineError::new(21, "no current row"))?;
        let cell = row
            .get(index)
            .ok_or_else(|| EngineError::new(SQLITE_RANGE, "column index out of range"))?;
        Ok(match cell {
            Cell::Null => ColumnRef::Null,
            Cell::Integer(i) => ColumnRef::Integer(*i),
            Cell::Float(f) => ColumnRef::Float(*f),
            Cell::Text(s) => ColumnRef::Text(s.as_bytes()),
            Cell::Blob(b) => ColumnRef::Blob(b),
        })
    }

    fn reset(&mut self) -> Result<(), EngineError> {
        let call = self.resets;
        self.resets += 1;
        self.cursor = None;
        if self.fail_reset_at == Some(call) {
            return Err(EngineError::new(SQLITE_CONSTRAINT, "constraint failed"));
        }
        Ok(())
    }

    fn clear_bindings(&mut self) -> Result<(), EngineError> {
        self.clears += 1;
        self.bound.clear();
        Ok(())
    }

    fn total_changes(&self) -> u64 {
        self.changes
    }
}
