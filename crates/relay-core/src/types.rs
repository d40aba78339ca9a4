// SPDX-License-Identifier: Apache-2.0
//! Type identifier enumeration for the dynamic value system.
//!
//! The numeric order of [`TypeId`] is load-bearing: the cast matrices and the
//! canonical text-buffer-size table are indexed by
//! `id - TypeId::Bool as u8` and `id as usize` respectively. Reordering or
//! renumbering the discriminants is a breaking schema change.

/// Identifier for every value kind the engine can describe.
///
/// The primitive range is `Bool..=WString` (27 kinds). The structural kinds
/// (`DerivedData` onward) name derived-type machinery that is represented at
/// the type level only; they never participate in cast lookups and have no
/// canonical text form.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeId {
    /// Generic placeholder; assignable from any concrete value.
    Any = 0,
    /// Boolean.
    Bool,
    /// 8-bit signed integer.
    SInt,
    /// 16-bit signed integer.
    Int,
    /// 32-bit signed integer.
    DInt,
    /// 64-bit signed integer.
    LInt,
    /// 8-bit unsigned integer.
    USInt,
    /// 16-bit unsigned integer.
    UInt,
    /// 32-bit unsigned integer.
    UDInt,
    /// 64-bit unsigned integer.
    ULInt,
    /// 8-bit bit-string.
    Byte,
    /// 16-bit bit-string.
    Word,
    /// 32-bit bit-string.
    DWord,
    /// 64-bit bit-string.
    LWord,
    /// Calendar date, days since 1970-01-01.
    Date,
    /// Time of day, milliseconds since midnight.
    TimeOfDay,
    /// Date and time of day, milliseconds since the epoch.
    DateAndTime,
    /// Duration, signed milliseconds.
    Time,
    /// Single 8-bit character.
    Char,
    /// Single 16-bit character.
    WChar,
    /// Calendar date, nanoseconds since the epoch.
    LDate,
    /// Time of day, nanoseconds since midnight.
    LTimeOfDay,
    /// Date and time of day, nanoseconds since the epoch.
    LDateAndTime,
    /// Duration, signed nanoseconds.
    LTime,
    /// 32-bit floating point.
    Real,
    /// 64-bit floating point.
    LReal,
    /// Character string (8-bit characters).
    String,
    /// Wide character string.
    WString,
    /// Derived data type.
    DerivedData,
    /// Directly derived data type.
    DirectlyDerivedData,
    /// Enumerated data type.
    EnumeratedData,
    /// Subrange data type.
    SubrangeData,
    /// Array type.
    Array,
    /// Structure type.
    Struct,
    /// Externally defined type.
    External,
}

/// Number of primitive kinds (`Bool..=WString`).
pub const PRIMITIVE_TYPE_COUNT: usize = 27;

impl TypeId {
    /// Every identifier, in declaration (= numeric) order.
    pub const ALL: [Self; 35] = [
        Self::Any,
        Self::Bool,
        Self::SInt,
        Self::Int,
        Self::DInt,
        Self::LInt,
        Self::USInt,
        Self::UInt,
        Self::UDInt,
        Self::ULInt,
        Self::Byte,
        Self::Word,
        Self::DWord,
        Self::LWord,
        Self::Date,
        Self::TimeOfDay,
        Self::DateAndTime,
        Self::Time,
        Self::Char,
        Self::WChar,
        Self::LDate,
        Self::LTimeOfDay,
        Self::LDateAndTime,
        Self::LTime,
        Self::Real,
        Self::LReal,
        Self::String,
        Self::WString,
        Self::DerivedData,
        Self::DirectlyDerivedData,
        Self::EnumeratedData,
        Self::SubrangeData,
        Self::Array,
        Self::Struct,
        Self::External,
    ];

    /// The primitive kinds, in matrix row/column order.
    pub const PRIMITIVES: [Self; PRIMITIVE_TYPE_COUNT] = [
        Self::Bool,
        Self::SInt,
        Self::Int,
        Self::DInt,
        Self::LInt,
        Self::USInt,
        Self::UInt,
        Self::UDInt,
        Self::ULInt,
        Self::Byte,
        Self::Word,
        Self::DWord,
        Self::LWord,
        Self::Date,
        Self::TimeOfDay,
        Self::DateAndTime,
        Self::Time,
        Self::Char,
        Self::WChar,
        Self::LDate,
        Self::LTimeOfDay,
        Self::LDateAndTime,
        Self::LTime,
        Self::Real,
        Self::LReal,
        Self::String,
        Self::WString,
    ];

    /// Returns `true` for the primitive range `Bool..=WString`.
    #[must_use]
    pub fn is_primitive(self) -> bool {
        (Self::Bool as u8..=Self::WString as u8).contains(&(self as u8))
    }

    /// Dense index into the cast matrices (`id - Bool`), `None` outside the
    /// primitive range.
    #[must_use]
    pub fn primitive_index(self) -> Option<usize> {
        if self.is_primitive() {
            Some(self as usize - Self::Bool as usize)
        } else {
            None
        }
    }

    /// Canonical type name as spelled in control-logic sources.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::Bool => "BOOL",
            Self::SInt => "SINT",
            Self::Int => "INT",
            Self::DInt => "DINT",
            Self::LInt => "LINT",
            Self::USInt => "USINT",
            Self::UInt => "UINT",
            Self::UDInt => "UDINT",
            Self::ULInt => "ULINT",
            Self::Byte => "BYTE",
            Self::Word => "WORD",
            Self::DWord => "DWORD",
            Self::LWord => "LWORD",
            Self::Date => "DATE",
            Self::TimeOfDay => "TIME_OF_DAY",
            Self::DateAndTime => "DATE_AND_TIME",
            Self::Time => "TIME",
            Self::Char => "CHAR",
            Self::WChar => "WCHAR",
            Self::LDate => "LDATE",
            Self::LTimeOfDay => "LTIME_OF_DAY",
            Self::LDateAndTime => "LDATE_AND_TIME",
            Self::LTime => "LTIME",
            Self::Real => "REAL",
            Self::LReal => "LREAL",
            Self::String => "STRING",
            Self::WString => "WSTRING",
            Self::DerivedData => "DERIVED",
            Self::DirectlyDerivedData => "DIRECTLY_DERIVED",
            Self::EnumeratedData => "ENUM",
            Self::SubrangeData => "SUBRANGE",
            Self::Array => "ARRAY",
            Self::Struct => "STRUCT",
            Self::External => "EXTERNAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_order_is_dense_and_stable() {
        for (expected, id) in TypeId::ALL.iter().enumerate() {
            assert_eq!(*id as usize, expected);
        }
    }

    #[test]
    fn primitive_range_boundaries() {
        assert!(!TypeId::Any.is_primitive());
        assert!(TypeId::Bool.is_primitive());
        assert!(TypeId::WString.is_primitive());
        assert!(!TypeId::DerivedData.is_primitive());
        assert_eq!(TypeId::Bool.primitive_index(), Some(0));
        assert_eq!(
            TypeId::WString.primitive_index(),
            Some(PRIMITIVE_TYPE_COUNT - 1)
        );
        assert_eq!(TypeId::Array.primitive_index(), None);
    }

    #[test]
    fn primitives_list_matches_index_mapping() {
        for (i, id) in TypeId::PRIMITIVES.iter().enumerate() {
            assert_eq!(id.primitive_index(), Some(i));
        }
    }
}
