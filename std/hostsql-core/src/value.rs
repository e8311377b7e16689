//!
//! Host Value Representation
//!
//! Every host value carries a class tag. Numeric classes hold arrays of their
//! element type, so `Int16(vec![5])` is the scalar 5 of class int16 and
//! `Double(vec![])` is the empty value.
//!

use std::fmt;

use crate::record::RecordArray;

/// Runtime class tags for host values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassId {
    Char,
    Single,
    Double,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Logical,
    Function,
    Struct,
}

impl ClassId {
    pub const ALL: [ClassId; 14] = [
        ClassId::Char,
        ClassId::Single,
        ClassId::Double,
        ClassId::Int8,
        ClassId::UInt8,
        ClassId::Int16,
        ClassId::UInt16,
        ClassId::Int32,
        ClassId::UInt32,
        ClassId::Int64,
        ClassId::UInt64,
        ClassId::Logical,
        ClassId::Function,
        ClassId::Struct,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ClassId::Char => "char",
            ClassId::Single => "single",
            ClassId::Double => "double",
            ClassId::Int8 => "int8",
            ClassId::UInt8 => "uint8",
            ClassId::Int16 => "int16",
            ClassId::UInt16 => "uint16",
            ClassId::Int32 => "int32",
            ClassId::UInt32 => "uint32",
            ClassId::Int64 => "int64",
            ClassId::UInt64 => "uint64",
            ClassId::Logical => "logical",
            ClassId::Function => "function_handle",
            ClassId::Struct => "struct",
        }
    }

    /// Look up a class by its host name (`"int16"`, `"double"`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.name() == name)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A runtime-tagged host value
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Char(String),
    Single(Vec<f32>),
    Double(Vec<f64>),
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Logical(Vec<bool>),
    /// A callable handle, identified by the name it was created from
    Function(String),
    Struct(RecordArray),
}

impl HostValue {
    /// The host's empty value: a 0x0 double array
    pub fn empty() -> Self {
        HostValue::Double(Vec::new())
    }

    pub fn char(text: impl Into<String>) -> Self {
        HostValue::Char(text.into())
    }

    pub fn function(name: impl Into<String>) -> Self {
        HostValue::Function(name.into())
    }

    pub fn class_id(&self) -> ClassId {
        match self {
            HostValue::Char(_) => ClassId::Char,
            HostValue::Single(_) => ClassId::Single,
            HostValue::Double(_) => ClassId::Double,
            HostValue::Int8(_) => ClassId::Int8,
            HostValue::UInt8(_) => ClassId::UInt8,
            HostValue::Int16(_) => ClassId::Int16,
            HostValue::UInt16(_) => ClassId::UInt16,
            HostValue::Int32(_) => ClassId::Int32,
            HostValue::UInt32(_) => ClassId::UInt32,
            HostValue::Int64(_) => ClassId::Int64,
            HostValue::UInt64(_) => ClassId::UInt64,
            HostValue::Logical(_) => ClassId::Logical,
            HostValue::Function(_) => ClassId::Function,
            HostValue::Struct(_) => ClassId::Struct,
        }
    }

    /// Number of elements. Char values count characters, function handles
    /// are always a single element and record arrays count records.
    pub fn len(&self) -> usize {
        match self {
            HostValue::Char(s) => s.chars().count(),
            HostValue::Single(v) => v.len(),
            HostValue::Double(v) => v.len(),
            HostValue::Int8(v) => v.len(),
            HostValue::UInt8(v) => v.len(),
            HostValue::Int16(v) => v.len(),
            HostValue::UInt16(v) => v.len(),
            HostValue::Int32(v) => v.len(),
            HostValue::UInt32(v) => v.len(),
            HostValue::Int64(v) => v.len(),
            HostValue::UInt64(v) => v.len(),
            HostValue::Logical(v) => v.len(),
            HostValue::Function(_) => 1,
            HostValue::Struct(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::Char(s) => Some(s),
            _ => None,
        }
    }
}

macro_rules! impl_scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for HostValue {
                fn from(value: $ty) -> Self {
                    HostValue::$variant(vec![value])
                }
            }

            impl From<Vec<$ty>> for HostValue {
                fn from(values: Vec<$ty>) -> Self {
                    HostValue::$variant(values)
                }
            }
        )*
    };
}

impl_scalar_from! {
    f32 => Single,
    f64 => Double,
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    bool => Logical,
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        HostValue::Char(value.to_string())
    }
}

impl From<String> for HostValue {
    fn from(value: String) -> Self {
        HostValue::Char(value)
    }
}

impl From<RecordArray> for HostValue {
    fn from(value: RecordArray) -> Self {
        HostValue::Struct(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_names_round_trip() {
        for class in ClassId::ALL {
            assert_eq!(ClassId::from_name(class.name()), Some(class));
        }
        assert_eq!(ClassId::from_name("cell"), None);
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(HostValue::from(5i16), HostValue::Int16(vec![5]));
        assert_eq!(HostValue::from(2.5f32).class_id(), ClassId::Single);
        assert_eq!(HostValue::from(true), HostValue::Logical(vec![true]));
        assert_eq!(HostValue::from("abc"), HostValue::Char("abc".to_string()));
        assert_eq!(HostValue::from(vec![1u8, 2, 3]).len(), 3);
    }

    #[test]
    fn test_empty_value() {
        let empty = HostValue::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.class_id(), ClassId::Double);

        assert!(HostValue::char("").is_empty());
        assert!(!HostValue::function("disp").is_empty());
    }

    #[test]
    fn test_char_length_counts_characters() {
        assert_eq!(HostValue::char("héllo").len(), 5);
        assert_eq!(HostValue::char("héllo").as_str(), Some("héllo"));
        assert_eq!(HostValue::from(1.0f64).as_str(), None);
    }
}
