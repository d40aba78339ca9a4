// SPDX-License-Identifier: Apache-2.0
//! Tagged-union value representation.
//!
//! One in-memory representation per primitive type identifier plus the
//! generic `Any` placeholder. The layout per kind is fixed and declared once
//! here; the canonical text codec (`text`) and the cast semantics (`cast`)
//! match on it exhaustively, so adding a kind is a compile-enforced,
//! crate-wide change.

use crate::cast::{cast_primitive, is_castable};
use crate::types::TypeId;

/// A dynamically typed value.
///
/// Date/time kinds store raw counts: `Date` days since 1970-01-01,
/// `TimeOfDay` milliseconds since midnight, `DateAndTime` milliseconds since
/// the epoch, `Time` signed millisecond durations, and the long (`L*`)
/// variants the same quantities in nanoseconds. `String` carries 8-bit
/// character-string semantics; `WString` carries wide characters. Both are
/// backed by UTF-8 storage.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Generic placeholder with no payload.
    Any,
    /// Boolean.
    Bool(bool),
    /// 8-bit signed integer.
    SInt(i8),
    /// 16-bit signed integer.
    Int(i16),
    /// 32-bit signed integer.
    DInt(i32),
    /// 64-bit signed integer.
    LInt(i64),
    /// 8-bit unsigned integer.
    USInt(u8),
    /// 16-bit unsigned integer.
    UInt(u16),
    /// 32-bit unsigned integer.
    UDInt(u32),
    /// 64-bit unsigned integer.
    ULInt(u64),
    /// 8-bit bit-string.
    Byte(u8),
    /// 16-bit bit-string.
    Word(u16),
    /// 32-bit bit-string.
    DWord(u32),
    /// 64-bit bit-string.
    LWord(u64),
    /// Days since 1970-01-01.
    Date(u64),
    /// Milliseconds since midnight.
    TimeOfDay(u32),
    /// Milliseconds since the epoch.
    DateAndTime(u64),
    /// Signed millisecond duration.
    Time(i64),
    /// Single 8-bit character.
    Char(u8),
    /// Single 16-bit character.
    WChar(u16),
    /// Nanoseconds since the epoch, truncated to whole days.
    LDate(u64),
    /// Nanoseconds since midnight.
    LTimeOfDay(u64),
    /// Nanoseconds since the epoch.
    LDateAndTime(u64),
    /// Signed nanosecond duration.
    LTime(i64),
    /// 32-bit floating point.
    Real(f32),
    /// 64-bit floating point.
    LReal(f64),
    /// Character string.
    String(String),
    /// Wide character string.
    WString(String),
}

/// What a [`Value::save_assign`] call did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AssignOutcome {
    /// Same-type copy or a matrix-approved cast was performed.
    Assigned,
    /// The destination was the `Any` placeholder and now carries the
    /// source's full representation (type and payload).
    Replaced,
    /// The pair was neither same-type, nor destination-`Any`, nor castable;
    /// the destination is unchanged.
    Ignored,
}

impl Value {
    /// Returns this value's type identifier. O(1), never fails.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        match self {
            Self::Any => TypeId::Any,
            Self::Bool(_) => TypeId::Bool,
            Self::SInt(_) => TypeId::SInt,
            Self::Int(_) => TypeId::Int,
            Self::DInt(_) => TypeId::DInt,
            Self::LInt(_) => TypeId::LInt,
            Self::USInt(_) => TypeId::USInt,
            Self::UInt(_) => TypeId::UInt,
            Self::UDInt(_) => TypeId::UDInt,
            Self::ULInt(_) => TypeId::ULInt,
            Self::Byte(_) => TypeId::Byte,
            Self::Word(_) => TypeId::Word,
            Self::DWord(_) => TypeId::DWord,
            Self::LWord(_) => TypeId::LWord,
            Self::Date(_) => TypeId::Date,
            Self::TimeOfDay(_) => TypeId::TimeOfDay,
            Self::DateAndTime(_) => TypeId::DateAndTime,
            Self::Time(_) => TypeId::Time,
            Self::Char(_) => TypeId::Char,
            Self::WChar(_) => TypeId::WChar,
            Self::LDate(_) => TypeId::LDate,
            Self::LTimeOfDay(_) => TypeId::LTimeOfDay,
            Self::LDateAndTime(_) => TypeId::LDateAndTime,
            Self::LTime(_) => TypeId::LTime,
            Self::Real(_) => TypeId::Real,
            Self::LReal(_) => TypeId::LReal,
            Self::String(_) => TypeId::String,
            Self::WString(_) => TypeId::WString,
        }
    }

    /// Zero/default value for a primitive kind or the `Any` placeholder.
    ///
    /// Structural kinds have no value representation in this crate and
    /// return `None`.
    #[must_use]
    pub fn default_for(id: TypeId) -> Option<Self> {
        Some(match id {
            TypeId::Any => Self::Any,
            TypeId::Bool => Self::Bool(false),
            TypeId::SInt => Self::SInt(0),
            TypeId::Int => Self::Int(0),
            TypeId::DInt => Self::DInt(0),
            TypeId::LInt => Self::LInt(0),
            TypeId::USInt => Self::USInt(0),
            TypeId::UInt => Self::UInt(0),
            TypeId::UDInt => Self::UDInt(0),
            TypeId::ULInt => Self::ULInt(0),
            TypeId::Byte => Self::Byte(0),
            TypeId::Word => Self::Word(0),
            TypeId::DWord => Self::DWord(0),
            TypeId::LWord => Self::LWord(0),
            TypeId::Date => Self::Date(0),
            TypeId::TimeOfDay => Self::TimeOfDay(0),
            TypeId::DateAndTime => Self::DateAndTime(0),
            TypeId::Time => Self::Time(0),
            TypeId::Char => Self::Char(0),
            TypeId::WChar => Self::WChar(0),
            TypeId::LDate => Self::LDate(0),
            TypeId::LTimeOfDay => Self::LTimeOfDay(0),
            TypeId::LDateAndTime => Self::LDateAndTime(0),
            TypeId::LTime => Self::LTime(0),
            TypeId::Real => Self::Real(0.0),
            TypeId::LReal => Self::LReal(0.0),
            TypeId::String => Self::String(String::new()),
            TypeId::WString => Self::WString(String::new()),
            TypeId::DerivedData
            | TypeId::DirectlyDerivedData
            | TypeId::EnumeratedData
            | TypeId::SubrangeData
            | TypeId::Array
            | TypeId::Struct
            | TypeId::External => return None,
        })
    }

    /// Generic assignment across possibly different type identifiers.
    ///
    /// - Same type id: plain copy.
    /// - This value is the `Any` placeholder: clone `other`'s full
    ///   representation into this value (the only structural escape hatch).
    /// - The pair is castable per the matrices: convert; `Real`/`LReal`
    ///   sources take the precision-preserving special cast.
    /// - Otherwise the assignment is absorbed and the destination is left
    ///   untouched; the returned [`AssignOutcome::Ignored`] is the only
    ///   signal.
    pub fn save_assign(&mut self, other: &Self) -> AssignOutcome {
        let src = other.type_id();
        let dst = self.type_id();
        if src == dst {
            *self = other.clone();
            return AssignOutcome::Assigned;
        }
        if dst == TypeId::Any {
            *self = other.clone();
            return AssignOutcome::Replaced;
        }
        if is_castable(src, dst).is_some() {
            if let Some(converted) = cast_primitive(other, dst) {
                *self = converted;
                return AssignOutcome::Assigned;
            }
        }
        AssignOutcome::Ignored
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn type_id_matches_variant() {
        assert_eq!(Value::Any.type_id(), TypeId::Any);
        assert_eq!(Value::Time(5).type_id(), TypeId::Time);
        assert_eq!(Value::WString("x".into()).type_id(), TypeId::WString);
    }

    #[test]
    fn default_for_every_primitive() {
        for id in TypeId::PRIMITIVES {
            let v = Value::default_for(id).unwrap();
            assert_eq!(v.type_id(), id);
        }
        assert_eq!(Value::default_for(TypeId::Struct), None);
    }

    #[test]
    fn save_assign_same_type_copies() {
        let mut dst = Value::Int(0);
        let src = Value::Int(-42);
        assert_eq!(dst.save_assign(&src), AssignOutcome::Assigned);
        assert_eq!(dst, src);
    }

    #[test]
    fn save_assign_into_any_clones_type_and_payload() {
        let mut dst = Value::Any;
        let src = Value::UDInt(7);
        assert_eq!(dst.save_assign(&src), AssignOutcome::Replaced);
        assert_eq!(dst.type_id(), TypeId::UDInt);
        assert_eq!(dst, src);
    }

    #[test]
    fn save_assign_castable_pair_converts() {
        let mut dst = Value::LInt(0);
        assert_eq!(dst.save_assign(&Value::Int(-3)), AssignOutcome::Assigned);
        assert_eq!(dst, Value::LInt(-3));

        let mut dst = Value::LReal(0.0);
        assert_eq!(dst.save_assign(&Value::Real(0.5)), AssignOutcome::Assigned);
        assert_eq!(dst, Value::LReal(0.5));
    }

    #[test]
    fn save_assign_incompatible_pair_is_absorbed() {
        let mut dst = Value::String("keep".to_owned());
        assert_eq!(dst.save_assign(&Value::Bool(true)), AssignOutcome::Ignored);
        assert_eq!(dst, Value::String("keep".to_owned()));
    }

    #[test]
    fn save_assign_source_any_into_concrete_is_absorbed() {
        let mut dst = Value::Int(9);
        assert_eq!(dst.save_assign(&Value::Any), AssignOutcome::Ignored);
        assert_eq!(dst, Value::Int(9));
    }
}
