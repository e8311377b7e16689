//!
//! hostsql-core - Host Value Model
//!
//! This crate provides the dynamically-typed values exchanged between a host
//! runtime and the SQL bridge:
//!
//! - `ClassId` for the runtime class tag of every host value
//! - `HostValue` for char, floating-point, integer, logical, function-handle
//!   and record values
//! - `RecordArray` for 1xN record arrays with a fixed positional field schema
//!
//! Numeric and logical values are arrays, as in the host. A scalar is a
//! one-element array and an empty array is the host's empty value.
//!

pub mod record;
pub mod value;

pub use record::*;
pub use value::*;
