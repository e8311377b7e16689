///
/// SQLite engine for the execution pipeline.
///
/// Connections are opened through rusqlite (bundled SQLite). Statements are
/// driven through the raw C API exposed by `rusqlite::ffi` so the pipeline
/// can step one row at a time, reset and clear bindings between batch rows,
/// and read each column's storage class as the engine reports it.
///
/// Lifetimes:
/// - A `SqliteStatement` borrows its `SqliteConnection`, so it is always
///   finalized (on drop) before the connection closes.
/// - Text is bound with `SQLITE_TRANSIENT`: SQLite takes its own copy, so
///   the caller's string may be dropped right after `bind`.
/// - `ColumnRef` values borrow the statement and cannot outlive the next
///   step or reset.
///

use std::ffi::{c_int, CStr};
use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::time::Duration;

use hostsql_core::RecordArray;
use rusqlite::{ffi, OpenFlags};
use tracing::{debug, warn};

use crate::driver::{execute, Outcome};
use crate::engine::{Connection, StepResult, Statement};
use crate::errors::{BridgeError, EngineError};
use crate::types::{BindValue, ColumnRef, ColumnType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOptions {
    pub read_only: bool,
    /// Create the database file if it does not exist
    pub create: bool,
    /// How long to wait on a locked database before failing with SQLITE_BUSY
    pub busy_timeout: Option<Duration>,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            read_only: false,
            create: true,
            busy_timeout: None,
        }
    }
}

impl OpenOptions {
    fn flags(&self) -> OpenFlags {
        let mut flags = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.read_only {
            flags |= OpenFlags::SQLITE_OPEN_READ_ONLY;
        } else {
            flags |= OpenFlags::SQLITE_OPEN_READ_WRITE;
            if self.create {
                flags |= OpenFlags::SQLITE_OPEN_CREATE;
            }
        }
        flags
    }
}

pub struct SqliteConnection {
    conn: rusqlite::Connection,
    path: String,
}

impl SqliteConnection {
    pub fn open(path: &str, options: &OpenOptions) -> Result<Self, BridgeError> {
        let open_error = |e: rusqlite::Error| BridgeError::Open {
            path: path.to_string(),
            source: engine_error(&e),
        };
        let conn = rusqlite::Connection::open_with_flags(path, options.flags()).map_err(open_error)?;
        if let Some(timeout) = options.busy_timeout {
            conn.busy_timeout(timeout).map_err(open_error)?;
        }
        debug!(path, read_only = options.read_only, "opened database");
        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    pub fn open_in_memory() -> Result<Self, BridgeError> {
        Self::open(":memory:", &OpenOptions::default())
    }

    /// The underlying rusqlite connection, for setup outside the pipeline
    pub fn inner(&self) -> &rusqlite::Connection {
        &self.conn
    }

    pub fn close(self) -> Result<(), BridgeError> {
        self.conn
            .close()
            .map_err(|(_, e)| BridgeError::Engine(engine_error(&e)))?;
        debug!(path = %self.path, "closed database");
        Ok(())
    }

    fn handle(&self) -> *mut ffi::sqlite3 {
        // The handle stays valid for as long as `self.conn` is alive.
        unsafe { self.conn.handle() }
    }
}

impl Connection for SqliteConnection {
    type Statement<'conn> = SqliteStatement<'conn>;

    fn prepare<'conn>(&'conn self, query: &str) -> Result<SqliteStatement<'conn>, EngineError> {
        let db = self.handle();
        let len = c_int::try_from(query.len())
            .map_err(|_| EngineError::new(ffi::SQLITE_TOOBIG, "query text is too long"))?;
        let mut raw = ptr::null_mut();
        let mut tail = ptr::null();
        let rc = unsafe {
            ffi::sqlite3_prepare_v2(db, query.as_ptr().cast(), len, &mut raw, &mut tail)
        };
        if rc != ffi::SQLITE_OK {
            return Err(error_from(db, rc));
        }
        let raw = NonNull::new(raw)
            .ok_or_else(|| EngineError::new(ffi::SQLITE_MISUSE, "query contains no SQL statement"))?;

        if !tail.is_null() {
            let consumed = unsafe { tail.offset_from(query.as_ptr().cast()) };
            let rest = usize::try_from(consumed)
                .ok()
                .and_then(|consumed| query.get(consumed..))
                .unwrap_or("");
            if !rest.trim().is_empty() {
                warn!(ignored = rest.trim(), "only the first SQL statement is executed");
            }
        }

        let stmt = SqliteStatement {
            raw,
            db,
            _conn: PhantomData,
        };
        debug!(
            columns = stmt.column_count(),
            parameters = stmt.parameter_count(),
            "prepared statement"
        );
        Ok(stmt)
    }
}

pub struct SqliteStatement<'conn> {
    raw: NonNull<ffi::sqlite3_stmt>,
    db: *mut ffi::sqlite3,
    _conn: PhantomData<&'conn SqliteConnection>,
}

impl SqliteStatement<'_> {
    fn ptr(&self) -> *mut ffi::sqlite3_stmt {
        self.raw.as_ptr()
    }

    fn check(&self, rc: c_int) -> Result<(), EngineError> {
        if rc == ffi::SQLITE_OK {
            Ok(())
        } else {
            Err(error_from(self.db, rc))
        }
    }
}

impl Statement for SqliteStatement<'_> {
    fn column_count(&self) -> usize {
        let count = unsafe { ffi::sqlite3_column_count(self.ptr()) };
        usize::try_from(count).unwrap_or(0)
    }

    fn column_name(&self, index: usize) -> Result<&str, EngineError> {
        let name = unsafe { ffi::sqlite3_column_name(self.ptr(), c_index(index)?) };
        if name.is_null() {
            return Err(EngineError::new(ffi::SQLITE_RANGE, "column index out of range"));
        }
        unsafe { CStr::from_ptr(name) }
            .to_str()
            .map_err(|_| EngineError::new(ffi::SQLITE_MISMATCH, "column name is not valid UTF-8"))
    }

    fn column_storage_type(&self, index: usize) -> ColumnType {
        let Ok(index) = c_index(index) else {
            return ColumnType::Null;
        };
        let declared = unsafe { ffi::sqlite3_column_decltype(self.ptr(), index) };
        if declared.is_null() {
            return ColumnType::Null;
        }
        let declared = unsafe { CStr::from_ptr(declared) }.to_string_lossy();
        ColumnType::from_declared(&declared)
    }

    fn parameter_count(&self) -> usize {
        let count = unsafe { ffi::sqlite3_bind_parameter_count(self.ptr()) };
        usize::try_from(count).unwrap_or(0)
    }

    fn bind(&mut self, position: usize, value: &BindValue) -> Result<(), EngineError> {
        let position = c_index(position)?;
        let rc = match value {
            BindValue::Null => unsafe { ffi::sqlite3_bind_null(self.ptr(), position) },
            BindValue::Integer(i) => unsafe { ffi::sqlite3_bind_int64(self.ptr(), position, *i) },
            BindValue::Float(f) => unsafe { ffi::sqlite3_bind_double(self.ptr(), position, *f) },
            BindValue::Text(s) => {
                let len = c_int::try_from(s.len())
                    .map_err(|_| EngineError::new(ffi::SQLITE_TOOBIG, "text value is too long"))?;
                unsafe {
                    ffi::sqlite3_bind_text(
                        self.ptr(),
                        position,
                        s.as_ptr().cast(),
                        len,
                        ffi::SQLITE_TRANSIENT(),
                    )
                }
            }
        };
        self.check(rc)
    }

    fn step(&mut self) -> Result<StepResult, EngineError> {
        match unsafe { ffi::sqlite3_step(self.ptr()) } {
            ffi::SQLITE_ROW => Ok(StepResult::Row),
            ffi::SQLITE_DONE => Ok(StepResult::Done),
            rc => Err(error_from(self.db, rc)),
        }
    }

    fn column_value(&self, index: usize) -> Result<ColumnRef<'_>, EngineError> {
        if index >= self.column_count() {
            return Err(EngineError::new(ffi::SQLITE_RANGE, "column index out of range"));
        }
        let index = c_index(index)?;
        let stmt = self.ptr();
        let value = unsafe {
            match ffi::sqlite3_column_type(stmt, index) {
                ffi::SQLITE_INTEGER => ColumnRef::Integer(ffi::sqlite3_column_int64(stmt, index)),
                ffi::SQLITE_FLOAT => ColumnRef::Float(ffi::sqlite3_column_double(stmt, index)),
                ffi::SQLITE_TEXT => {
                    let data = ffi::sqlite3_column_text(stmt, index);
                    let len = ffi::sqlite3_column_bytes(stmt, index);
                    ColumnRef::Text(column_bytes(data.cast(), len))
                }
                ffi::SQLITE_BLOB => {
                    let data = ffi::sqlite3_column_blob(stmt, index);
                    let len = ffi::sqlite3_column_bytes(stmt, index);
                    ColumnRef::Blob(column_bytes(data.cast(), len))
                }
                _ => ColumnRef::Null,
            }
        };
        Ok(value)
    }

    fn reset(&mut self) -> Result<(), EngineError> {
        let rc = unsafe { ffi::sqlite3_reset(self.ptr()) };
        self.check(rc)
    }

    fn clear_bindings(&mut self) -> Result<(), EngineError> {
        let rc = unsafe { ffi::sqlite3_clear_bindings(self.ptr()) };
        self.check(rc)
    }

    fn total_changes(&self) -> u64 {
        let changes = unsafe { ffi::sqlite3_total_changes64(self.db) };
        u64::try_from(changes).unwrap_or(0)
    }
}

impl Drop for SqliteStatement<'_> {
    fn drop(&mut self) {
        unsafe {
            ffi::sqlite3_finalize(self.ptr());
        }
    }
}

/// Open `target`, run `query` with an optional parameter batch, and close
/// the database again. The statement is finalized and the connection
/// closed on every exit path.
pub fn run(
    target: &str,
    query: &str,
    params: Option<&RecordArray>,
    options: &OpenOptions,
) -> Result<Outcome, BridgeError> {
    let conn = SqliteConnection::open(target, options)?;
    let outcome = {
        let mut stmt = conn.prepare(query).map_err(|source| BridgeError::Prepare {
            query: query.to_string(),
            source,
        })?;
        execute(&mut stmt, params)?
    };
    conn.close()?;
    Ok(outcome)
}

fn engine_error(err: &rusqlite::Error) -> EngineError {
    match err {
        rusqlite::Error::SqliteFailure(failure, message) => EngineError::new(
            failure.extended_code,
            message.clone().unwrap_or_else(|| failure.to_string()),
        ),
        other => EngineError::new(-1, other.to_string()),
    }
}

fn error_from(db: *mut ffi::sqlite3, code: c_int) -> EngineError {
    let message = unsafe { ffi::sqlite3_errmsg(db) };
    if message.is_null() {
        return EngineError::new(code, format!("SQLite error {}", code));
    }
    let message = unsafe { CStr::from_ptr(message) }.to_string_lossy().into_owned();
    EngineError::new(code, message)
}

fn c_index(index: usize) -> Result<c_int, EngineError> {
    c_int::try_from(index).map_err(|_| EngineError::new(ffi::SQLITE_RANGE, "index out of range"))
}

unsafe fn column_bytes<'a>(data: *const u8, len: c_int) -> &'a [u8] {
    match usize::try_from(len) {
        Ok(len) if len > 0 && !data.is_null() => unsafe { std::slice::from_raw_parts(data, len) },
        _ => &[],
    }
}
