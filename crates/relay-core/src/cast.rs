// SPDX-License-Identifier: Apache-2.0
//! Cast-compatibility matrices and primitive conversion semantics.
//!
//! Two boolean tables over the primitive type range decide which cross-type
//! assignments are legal: `UP` entries are lossless, `DOWN` entries may lose
//! information. The tables are built once at process start from explicit
//! per-source destination lists and are immutable process-wide state with no
//! teardown requirement.
//!
//! Identity is not encoded — same-type assignment bypasses the matrix — and
//! a pair of distinct kinds is lossless in at most one direction. Where a
//! reinterpretation is lossless both ways (a float and the bit-string of the
//! same width), the value-kind to bit-string direction is the upcast and the
//! reverse is classified as a downcast.
//!
//! Conversion semantics once the matrix allows a pair:
//! - integer/boolean/bit-string sources convert through a 64-bit bridge with
//!   wrapping truncation at the destination width;
//! - float sources take the precision-preserving special cast: numeric
//!   (saturating) conversion to integer kinds, precision change between the
//!   two float kinds, bit-pattern reinterpretation to the bit-string of the
//!   same or wider width, numeric truncation to narrower bit-strings;
//! - bit-string sources reinterpret their pattern when the destination is a
//!   float kind;
//! - date/time kinds scale into their long (nanosecond) counterparts,
//!   saturating;
//! - `Char`/`WChar` lift into the matching string kind (an invalid 16-bit
//!   code unit refuses the cast).

use std::sync::OnceLock;

use crate::types::{TypeId, PRIMITIVE_TYPE_COUNT};
use crate::value::Value;

/// Direction of a legal primitive cast.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CastKind {
    /// Lossless conversion.
    Up,
    /// Potentially lossy conversion.
    Down,
}

/// Lossless destinations per source kind. Matrix row order follows
/// [`TypeId::PRIMITIVES`]; kinds without lossless destinations are omitted.
const UPCASTS: &[(TypeId, &[TypeId])] = &[
    (
        TypeId::Bool,
        &[
            TypeId::SInt,
            TypeId::Int,
            TypeId::DInt,
            TypeId::LInt,
            TypeId::USInt,
            TypeId::UInt,
            TypeId::UDInt,
            TypeId::ULInt,
            TypeId::Byte,
            TypeId::Word,
            TypeId::DWord,
            TypeId::LWord,
            TypeId::Real,
            TypeId::LReal,
        ],
    ),
    (
        TypeId::SInt,
        &[
            TypeId::Int,
            TypeId::DInt,
            TypeId::LInt,
            TypeId::Byte,
            TypeId::Word,
            TypeId::DWord,
            TypeId::LWord,
            TypeId::Real,
            TypeId::LReal,
        ],
    ),
    (
        TypeId::Int,
        &[
            TypeId::DInt,
            TypeId::LInt,
            TypeId::Word,
            TypeId::DWord,
            TypeId::LWord,
            TypeId::Real,
            TypeId::LReal,
        ],
    ),
    (
        TypeId::DInt,
        &[TypeId::LInt, TypeId::DWord, TypeId::LWord, TypeId::LReal],
    ),
    (TypeId::LInt, &[TypeId::LWord]),
    (
        TypeId::USInt,
        &[
            TypeId::Int,
            TypeId::DInt,
            TypeId::LInt,
            TypeId::UInt,
            TypeId::UDInt,
            TypeId::ULInt,
            TypeId::Byte,
            TypeId::Word,
            TypeId::DWord,
            TypeId::LWord,
            TypeId::Real,
            TypeId::LReal,
        ],
    ),
    (
        TypeId::UInt,
        &[
            TypeId::DInt,
            TypeId::LInt,
            TypeId::UDInt,
            TypeId::ULInt,
            TypeId::Word,
            TypeId::DWord,
            TypeId::LWord,
            TypeId::Real,
            TypeId::LReal,
        ],
    ),
    (
        TypeId::UDInt,
        &[
            TypeId::LInt,
            TypeId::ULInt,
            TypeId::DWord,
            TypeId::LWord,
            TypeId::LReal,
        ],
    ),
    (TypeId::ULInt, &[TypeId::LWord]),
    (TypeId::Byte, &[TypeId::Word, TypeId::DWord, TypeId::LWord]),
    (TypeId::Word, &[TypeId::DWord, TypeId::LWord]),
    (TypeId::DWord, &[TypeId::LWord]),
    (TypeId::Date, &[TypeId::LDate]),
    (TypeId::TimeOfDay, &[TypeId::LTimeOfDay]),
    (TypeId::DateAndTime, &[TypeId::LDateAndTime]),
    (TypeId::Time, &[TypeId::LTime]),
    (TypeId::Char, &[TypeId::String]),
    (TypeId::WChar, &[TypeId::WString]),
    (TypeId::Real, &[TypeId::DWord, TypeId::LWord, TypeId::LReal]),
    (TypeId::LReal, &[TypeId::LWord]),
];

/// Potentially lossy destinations per source kind.
const DOWNCASTS: &[(TypeId, &[TypeId])] = &[
    (
        TypeId::SInt,
        &[
            TypeId::Bool,
            TypeId::USInt,
            TypeId::UInt,
            TypeId::UDInt,
            TypeId::ULInt,
        ],
    ),
    (
        TypeId::Int,
        &[
            TypeId::Bool,
            TypeId::SInt,
            TypeId::USInt,
            TypeId::UInt,
            TypeId::UDInt,
            TypeId::ULInt,
            TypeId::Byte,
        ],
    ),
    (
        TypeId::DInt,
        &[
            TypeId::Bool,
            TypeId::SInt,
            TypeId::Int,
            TypeId::USInt,
            TypeId::UInt,
            TypeId::UDInt,
            TypeId::ULInt,
            TypeId::Byte,
            TypeId::Word,
            TypeId::Real,
        ],
    ),
    (
        TypeId::LInt,
        &[
            TypeId::Bool,
            TypeId::SInt,
            TypeId::Int,
            TypeId::DInt,
            TypeId::USInt,
            TypeId::UInt,
            TypeId::UDInt,
            TypeId::ULInt,
            TypeId::Byte,
            TypeId::Word,
            TypeId::DWord,
            TypeId::Real,
            TypeId::LReal,
        ],
    ),
    (TypeId::USInt, &[TypeId::Bool, TypeId::SInt]),
    (
        TypeId::UInt,
        &[
            TypeId::Bool,
            TypeId::SInt,
            TypeId::Int,
            TypeId::USInt,
            TypeId::Byte,
        ],
    ),
    (
        TypeId::UDInt,
        &[
            TypeId::Bool,
            TypeId::SInt,
            TypeId::Int,
            TypeId::DInt,
            TypeId::USInt,
            TypeId::UInt,
            TypeId::Byte,
            TypeId::Word,
            TypeId::Real,
        ],
    ),
    (
        TypeId::ULInt,
        &[
            TypeId::Bool,
            TypeId::SInt,
            TypeId::Int,
            TypeId::DInt,
            TypeId::LInt,
            TypeId::USInt,
            TypeId::UInt,
            TypeId::UDInt,
            TypeId::Byte,
            TypeId::Word,
            TypeId::DWord,
            TypeId::Real,
            TypeId::LReal,
        ],
    ),
    (
        TypeId::Byte,
        &[
            TypeId::Bool,
            TypeId::SInt,
            TypeId::Int,
            TypeId::DInt,
            TypeId::LInt,
            TypeId::USInt,
            TypeId::UInt,
            TypeId::UDInt,
            TypeId::ULInt,
            TypeId::Real,
            TypeId::LReal,
        ],
    ),
    (
        TypeId::Word,
        &[
            TypeId::Bool,
            TypeId::SInt,
            TypeId::Int,
            TypeId::DInt,
            TypeId::LInt,
            TypeId::USInt,
            TypeId::UInt,
            TypeId::UDInt,
            TypeId::ULInt,
            TypeId::Byte,
            TypeId::Real,
            TypeId::LReal,
        ],
    ),
    (
        TypeId::DWord,
        &[
            TypeId::Bool,
            TypeId::SInt,
            TypeId::Int,
            TypeId::DInt,
            TypeId::LInt,
            TypeId::USInt,
            TypeId::UInt,
            TypeId::UDInt,
            TypeId::ULInt,
            TypeId::Byte,
            TypeId::Word,
            TypeId::Real,
            TypeId::LReal,
        ],
    ),
    (
        TypeId::LWord,
        &[
            TypeId::Bool,
            TypeId::SInt,
            TypeId::Int,
            TypeId::DInt,
            TypeId::LInt,
            TypeId::USInt,
            TypeId::UInt,
            TypeId::UDInt,
            TypeId::ULInt,
            TypeId::Byte,
            TypeId::Word,
            TypeId::DWord,
            TypeId::Real,
            TypeId::LReal,
        ],
    ),
    (
        TypeId::Real,
        &[
            TypeId::Bool,
            TypeId::SInt,
            TypeId::Int,
            TypeId::DInt,
            TypeId::LInt,
            TypeId::USInt,
            TypeId::UInt,
            TypeId::UDInt,
            TypeId::ULInt,
            TypeId::Byte,
            TypeId::Word,
        ],
    ),
    (
        TypeId::LReal,
        &[
            TypeId::Bool,
            TypeId::SInt,
            TypeId::Int,
            TypeId::DInt,
            TypeId::LInt,
            TypeId::USInt,
            TypeId::UInt,
            TypeId::UDInt,
            TypeId::ULInt,
            TypeId::Byte,
            TypeId::Word,
            TypeId::DWord,
            TypeId::Real,
        ],
    ),
];

struct CastTables {
    up: [[bool; PRIMITIVE_TYPE_COUNT]; PRIMITIVE_TYPE_COUNT],
    down: [[bool; PRIMITIVE_TYPE_COUNT]; PRIMITIVE_TYPE_COUNT],
}

fn tables() -> &'static CastTables {
    static TABLES: OnceLock<CastTables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let mut up = [[false; PRIMITIVE_TYPE_COUNT]; PRIMITIVE_TYPE_COUNT];
        let mut down = [[false; PRIMITIVE_TYPE_COUNT]; PRIMITIVE_TYPE_COUNT];
        fill(&mut up, UPCASTS);
        fill(&mut down, DOWNCASTS);
        CastTables { up, down }
    })
}

fn fill(
    matrix: &mut [[bool; PRIMITIVE_TYPE_COUNT]; PRIMITIVE_TYPE_COUNT],
    entries: &[(TypeId, &[TypeId])],
) {
    for (src, dsts) in entries {
        let Some(row) = src.primitive_index() else {
            continue;
        };
        for dst in *dsts {
            if let Some(col) = dst.primitive_index() {
                matrix[row][col] = true;
            }
        }
    }
}

/// Reports whether `src` may be assigned to `dst` across types, and in which
/// direction.
///
/// Both identifiers are bounds-checked against the primitive range first;
/// structural kinds and the `Any` placeholder are never castable through the
/// matrix and return `None` without a table lookup. Identity is not encoded:
/// `is_castable(t, t)` is `None` for every `t`.
#[must_use]
pub fn is_castable(src: TypeId, dst: TypeId) -> Option<CastKind> {
    let row = src.primitive_index()?;
    let col = dst.primitive_index()?;
    let t = tables();
    if t.up[row][col] {
        Some(CastKind::Up)
    } else if t.down[row][col] {
        Some(CastKind::Down)
    } else {
        None
    }
}

/// 64-bit bridge for the integer-family conversions.
enum Scalar {
    Signed(i64),
    Unsigned(u64),
    Bits(u64),
}

impl Scalar {
    fn raw(&self) -> u64 {
        match *self {
            Self::Signed(v) => v as u64,
            Self::Unsigned(v) | Self::Bits(v) => v,
        }
    }
}

fn scalar_of(value: &Value) -> Option<Scalar> {
    match *value {
        Value::Bool(b) => Some(Scalar::Unsigned(u64::from(b))),
        Value::SInt(v) => Some(Scalar::Signed(i64::from(v))),
        Value::Int(v) => Some(Scalar::Signed(i64::from(v))),
        Value::DInt(v) => Some(Scalar::Signed(i64::from(v))),
        Value::LInt(v) => Some(Scalar::Signed(v)),
        Value::USInt(v) => Some(Scalar::Unsigned(u64::from(v))),
        Value::UInt(v) => Some(Scalar::Unsigned(u64::from(v))),
        Value::UDInt(v) => Some(Scalar::Unsigned(u64::from(v))),
        Value::ULInt(v) => Some(Scalar::Unsigned(v)),
        Value::Byte(v) => Some(Scalar::Bits(u64::from(v))),
        Value::Word(v) => Some(Scalar::Bits(u64::from(v))),
        Value::DWord(v) => Some(Scalar::Bits(u64::from(v))),
        Value::LWord(v) => Some(Scalar::Bits(v)),
        _ => None,
    }
}

/// Converts `src` into a value of kind `dst`, assuming the matrix already
/// allowed the pair. Returns `None` when the pair has no conversion (which
/// the matrix should have refused) or when a `WChar` code unit is not a
/// valid character.
#[must_use]
pub fn cast_primitive(src: &Value, dst: TypeId) -> Option<Value> {
    match src {
        Value::Real(_) | Value::LReal(_) => special_cast(src, dst),
        _ => general_cast(src, dst),
    }
}

fn general_cast(src: &Value, dst: TypeId) -> Option<Value> {
    if let Some(scalar) = scalar_of(src) {
        return integer_bridge_to(&scalar, dst);
    }
    match (src, dst) {
        (Value::Char(c), TypeId::String) => Some(Value::String(char::from(*c).to_string())),
        (Value::WChar(w), TypeId::WString) => {
            char::from_u32(u32::from(*w)).map(|c| Value::WString(c.to_string()))
        }
        (Value::Date(days), TypeId::LDate) => {
            Some(Value::LDate(days.saturating_mul(86_400_000_000_000)))
        }
        (Value::TimeOfDay(ms), TypeId::LTimeOfDay) => {
            Some(Value::LTimeOfDay(u64::from(*ms).saturating_mul(1_000_000)))
        }
        (Value::DateAndTime(ms), TypeId::LDateAndTime) => {
            Some(Value::LDateAndTime(ms.saturating_mul(1_000_000)))
        }
        (Value::Time(ms), TypeId::LTime) => Some(Value::LTime(ms.saturating_mul(1_000_000))),
        _ => None,
    }
}

fn integer_bridge_to(scalar: &Scalar, dst: TypeId) -> Option<Value> {
    let raw = scalar.raw();
    Some(match dst {
        TypeId::Bool => Value::Bool(raw != 0),
        TypeId::SInt => Value::SInt(raw as i8),
        TypeId::Int => Value::Int(raw as i16),
        TypeId::DInt => Value::DInt(raw as i32),
        TypeId::LInt => Value::LInt(raw as i64),
        TypeId::USInt => Value::USInt(raw as u8),
        TypeId::UInt => Value::UInt(raw as u16),
        TypeId::UDInt => Value::UDInt(raw as u32),
        TypeId::ULInt => Value::ULInt(raw),
        TypeId::Byte => Value::Byte(raw as u8),
        TypeId::Word => Value::Word(raw as u16),
        TypeId::DWord => Value::DWord(raw as u32),
        TypeId::LWord => Value::LWord(raw),
        TypeId::Real => match scalar {
            Scalar::Signed(v) => Value::Real(*v as f32),
            Scalar::Unsigned(v) => Value::Real(*v as f32),
            Scalar::Bits(v) => Value::Real(f32::from_bits(*v as u32)),
        },
        TypeId::LReal => match scalar {
            Scalar::Signed(v) => Value::LReal(*v as f64),
            Scalar::Unsigned(v) => Value::LReal(*v as f64),
            Scalar::Bits(v) => Value::LReal(f64::from_bits(*v)),
        },
        _ => return None,
    })
}

/// Precision-preserving cast for `Real`/`LReal` sources.
fn special_cast(src: &Value, dst: TypeId) -> Option<Value> {
    let f = match *src {
        Value::Real(r) => f64::from(r),
        Value::LReal(d) => d,
        _ => {
            tracing::error!(src = ?src.type_id(), "special cast requested for a non-float source");
            return None;
        }
    };
    Some(match dst {
        TypeId::Bool => Value::Bool(f != 0.0),
        TypeId::SInt => Value::SInt(f as i8),
        TypeId::Int => Value::Int(f as i16),
        TypeId::DInt => Value::DInt(f as i32),
        TypeId::LInt => Value::LInt(f as i64),
        TypeId::USInt => Value::USInt(f as u8),
        TypeId::UInt => Value::UInt(f as u16),
        TypeId::UDInt => Value::UDInt(f as u32),
        TypeId::ULInt => Value::ULInt(f as u64),
        TypeId::Byte => Value::Byte(f as u8),
        TypeId::Word => Value::Word(f as u16),
        TypeId::DWord => match *src {
            Value::Real(r) => Value::DWord(r.to_bits()),
            _ => Value::DWord(f as u32),
        },
        TypeId::LWord => match *src {
            Value::Real(r) => Value::LWord(u64::from(r.to_bits())),
            Value::LReal(d) => Value::LWord(d.to_bits()),
            _ => return None,
        },
        TypeId::Real => Value::Real(f as f32),
        TypeId::LReal => Value::LReal(f),
        _ => return None,
    })
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_never_encoded() {
        for id in TypeId::PRIMITIVES {
            assert_eq!(is_castable(id, id), None, "{id:?}");
        }
    }

    #[test]
    fn structural_kinds_never_touch_the_matrix() {
        assert_eq!(is_castable(TypeId::Any, TypeId::Int), None);
        assert_eq!(is_castable(TypeId::Int, TypeId::Any), None);
        assert_eq!(is_castable(TypeId::Array, TypeId::Struct), None);
        assert_eq!(is_castable(TypeId::Bool, TypeId::External), None);
    }

    #[test]
    fn lossless_in_at_most_one_direction() {
        for a in TypeId::PRIMITIVES {
            for b in TypeId::PRIMITIVES {
                if a == b {
                    continue;
                }
                let forward = is_castable(a, b);
                let backward = is_castable(b, a);
                assert!(
                    !(forward == Some(CastKind::Up) && backward == Some(CastKind::Up)),
                    "{a:?} <-> {b:?} both lossless"
                );
            }
        }
    }

    #[test]
    fn ordered_pair_is_up_or_down_never_both() {
        let t = super::tables();
        for row in 0..PRIMITIVE_TYPE_COUNT {
            for col in 0..PRIMITIVE_TYPE_COUNT {
                assert!(!(t.up[row][col] && t.down[row][col]), "({row},{col})");
            }
        }
    }

    #[test]
    fn representative_directions() {
        assert_eq!(is_castable(TypeId::Bool, TypeId::LInt), Some(CastKind::Up));
        assert_eq!(is_castable(TypeId::Int, TypeId::Real), Some(CastKind::Up));
        assert_eq!(
            is_castable(TypeId::LReal, TypeId::Real),
            Some(CastKind::Down)
        );
        assert_eq!(
            is_castable(TypeId::Real, TypeId::LReal),
            Some(CastKind::Up)
        );
        assert_eq!(is_castable(TypeId::Time, TypeId::LTime), Some(CastKind::Up));
        assert_eq!(is_castable(TypeId::LTime, TypeId::Time), None);
        assert_eq!(
            is_castable(TypeId::Char, TypeId::String),
            Some(CastKind::Up)
        );
        assert_eq!(is_castable(TypeId::String, TypeId::WString), None);
    }

    #[test]
    fn integer_bridge_truncates_like_a_register_copy() {
        let v = Value::Int(-1);
        assert_eq!(cast_primitive(&v, TypeId::USInt), Some(Value::USInt(255)));
        let v = Value::UDInt(0x1_0001);
        assert_eq!(cast_primitive(&v, TypeId::Word), Some(Value::Word(1)));
        let v = Value::Bool(true);
        assert_eq!(cast_primitive(&v, TypeId::LReal), Some(Value::LReal(1.0)));
    }

    #[test]
    fn float_special_cast_preserves_precision_and_bits() {
        let v = Value::Real(1.5);
        assert_eq!(cast_primitive(&v, TypeId::LReal), Some(Value::LReal(1.5)));
        assert_eq!(
            cast_primitive(&v, TypeId::DWord),
            Some(Value::DWord(1.5f32.to_bits()))
        );
        let v = Value::LReal(-2.25);
        assert_eq!(cast_primitive(&v, TypeId::Int), Some(Value::Int(-2)));
    }

    #[test]
    fn wchar_surrogate_refuses_the_cast() {
        let v = Value::WChar(0xD800);
        assert_eq!(cast_primitive(&v, TypeId::WString), None);
        let v = Value::WChar(u16::from(b'Z'));
        assert_eq!(
            cast_primitive(&v, TypeId::WString),
            Some(Value::WString("Z".to_owned()))
        );
    }
}
