///
/// Statement execution.
///
/// `execute` inspects the prepared statement once:
/// - Statements that produce columns are queries. They are stepped until
///   done and every row is decoded into one `ResultSet`. With a parameter
///   batch, each batch row is bound and run in turn and all rows land in
///   the same result set.
/// - Statements without columns are commands. Without a batch they are
///   stepped exactly once. With a batch every row is bound, stepped, reset
///   and cleared in order.
///
/// A command batch stops at the first row that fails. Rows before it have
/// already been applied by the engine and are not rolled back; callers that
/// need all-or-nothing batches must wrap the call in their own transaction.
///

use hostsql_core::RecordArray;
use tracing::{debug, trace, warn};

use crate::accumulator::{ResultRow, ResultSet, RowAccumulator, Schema};
use crate::binder::bind_row;
use crate::codec::decode;
use crate::engine::{StepResult, Statement};
use crate::errors::BridgeError;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The statement was a query
    Rows(ResultSet),
    /// The statement was a command
    Done {
        /// Number of times the statement ran to completion
        executions: usize,
        /// Rows inserted, updated or deleted across all executions
        changes: u64,
    },
}

impl Outcome {
    pub fn rows(&self) -> Option<&ResultSet> {
        match self {
            Outcome::Rows(results) => Some(results),
            Outcome::Done { .. } => None,
        }
    }

    pub fn into_rows(self) -> Option<ResultSet> {
        match self {
            Outcome::Rows(results) => Some(results),
            Outcome::Done { .. } => None,
        }
    }
}

pub fn execute<S: Statement + ?Sized>(
    stmt: &mut S,
    params: Option<&RecordArray>,
) -> Result<Outcome, BridgeError> {
    let column_count = stmt.column_count();
    if column_count > 0 {
        debug!(columns = column_count, "statement produces columns, fetching rows");
        fetch_results(stmt, params).map(Outcome::Rows)
    } else {
        let before = stmt.total_changes();
        let executions = match params {
            Some(batch) => execute_many(stmt, batch)?,
            None => {
                step_done(stmt, None)?;
                1
            }
        };
        Ok(Outcome::Done {
            executions,
            changes: stmt.total_changes().saturating_sub(before),
        })
    }
}

fn fetch_results<S: Statement + ?Sized>(
    stmt: &mut S,
    params: Option<&RecordArray>,
) -> Result<ResultSet, BridgeError> {
    let mut results = RowAccumulator::start(Schema::from_statement(stmt)?);
    match params {
        None => fetch_rows(stmt, &mut results, None)?,
        Some(batch) => {
            for row in 0..batch.len() {
                debug!(row, total = batch.len(), "binding query parameters");
                bind_row(stmt, batch, row)?;
                fetch_rows(stmt, &mut results, Some(row))?;
                rewind(stmt, row)?;
            }
        }
    }
    debug!(rows = results.len(), "query finished");
    Ok(results.finish())
}

fn fetch_rows<S: Statement + ?Sized>(
    stmt: &mut S,
    results: &mut RowAccumulator,
    batch_row: Option<usize>,
) -> Result<(), BridgeError> {
    loop {
        let step = stmt
            .step()
            .map_err(|source| BridgeError::Step {
                row: batch_row,
                source,
            })?;
        match step {
            StepResult::Done => return Ok(()),
            StepResult::Row => {
                let row = fetch_row(stmt, results.schema())?;
                trace!(index = results.len(), "fetched row");
                results.append(row)?;
            }
        }
    }
}

fn fetch_row<S: Statement + ?Sized>(stmt: &S, schema: &Schema) -> Result<ResultRow, BridgeError> {
    (0..stmt.column_count())
        .map(|column| {
            let name = || {
                schema
                    .column(column)
                    .map(|c| c.name.clone())
                    .unwrap_or_default()
            };
            let value = stmt.column_value(column).map_err(|source| BridgeError::Column {
                column,
                name: name(),
                source,
            })?;
            decode(value).map_err(|source| BridgeError::Decode {
                column,
                name: name(),
                source,
            })
        })
        .collect()
}

fn execute_many<S: Statement + ?Sized>(
    stmt: &mut S,
    batch: &RecordArray,
) -> Result<usize, BridgeError> {
    let total = batch.len();
    for row in 0..total {
        debug!(row, total, "binding parameters");
        if let Err(err) = execute_row(stmt, batch, row) {
            if row > 0 {
                warn!(
                    failed_row = row,
                    applied = row,
                    "batch stopped; earlier rows remain applied"
                );
            }
            return Err(err);
        }
    }
    Ok(total)
}

fn execute_row<S: Statement + ?Sized>(
    stmt: &mut S,
    batch: &RecordArray,
    row: usize,
) -> Result<(), BridgeError> {
    bind_row(stmt, batch, row)?;
    step_done(stmt, Some(row))?;
    rewind(stmt, row)
}

/// Reset after batch row `row` and drop its bindings.
fn rewind<S: Statement + ?Sized>(stmt: &mut S, row: usize) -> Result<(), BridgeError> {
    stmt.reset()
        .and_then(|()| stmt.clear_bindings())
        .map_err(|source| BridgeError::Reset { row, source })
}

/// Step a command once; anything but Done is a failure.
fn step_done<S: Statement + ?Sized>(stmt: &mut S, row: Option<usize>) -> Result<(), BridgeError> {
    match stmt.step() {
        Ok(StepResult::Done) => Ok(()),
        Ok(StepResult::Row) => Err(BridgeError::UnexpectedRow { row }),
        Err(source) => Err(BridgeError::Step { row, source }),
    }
}
