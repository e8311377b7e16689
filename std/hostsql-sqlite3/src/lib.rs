///
/// hostsql SQLite3 Bridge
///
/// Moves host values into SQLite and query results back out.
///
/// Architecture:
/// - `codec` classifies host values into bind values and decodes column
///   values into dynamic values.
/// - `binder` binds one parameter row positionally to a statement.
/// - `accumulator` collects decoded rows against the statement schema.
/// - `driver` runs a prepared statement as a query or a command, once or
///   once per parameter row.
/// - `engine` is the connection/statement seam the pipeline runs against;
///   `sqlite` implements it on rusqlite with bundled SQLite.
///
/// Entry point:
/// - `run(target, query, params, options)` opens the database, prepares the
///   query, executes it and closes everything again.
///

pub mod accumulator;
pub mod binder;
pub mod codec;
pub mod driver;
pub mod engine;
pub mod errors;
pub mod sqlite;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use accumulator::{Column, ResultRow, ResultSet, RowAccumulator, Schema};
pub use binder::bind_row;
pub use codec::{decode, encode, to_host};
pub use driver::{execute, Outcome};
pub use engine::{Connection, StepResult, Statement};
pub use errors::{BridgeError, CodecError, EngineError};
pub use sqlite::{run, OpenOptions, SqliteConnection, SqliteStatement};
pub use types::{BindValue, ColumnRef, ColumnType, DynamicValue};
