// SPDX-License-Identifier: Apache-2.0
//! Type registry: canonical type names resolved to identifiers.
//!
//! Init-once process-wide map from interned type names to [`TypeId`] for the
//! primitive kinds plus `ANY`. The only in-core consumer is text parsing
//! into an `Any` placeholder, which needs `TypeName#payload` tags resolved
//! to a concrete constructor ([`crate::Value::default_for`]).

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::strings::{self, StringId};
use crate::types::TypeId;

fn name_map() -> &'static FxHashMap<StringId, TypeId> {
    static MAP: OnceLock<FxHashMap<StringId, TypeId>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = FxHashMap::default();
        map.insert(strings::intern(TypeId::Any.name()), TypeId::Any);
        for id in TypeId::PRIMITIVES {
            map.insert(strings::intern(id.name()), id);
        }
        map
    })
}

/// Resolves an interned type name to its identifier.
#[must_use]
pub fn type_from_name_id(name: StringId) -> Option<TypeId> {
    name_map().get(&name).copied()
}

/// Resolves a type name given as text. Names are matched in their canonical
/// upper-case spelling.
#[must_use]
pub fn type_from_name(name: &str) -> Option<TypeId> {
    // Force the map (and its interned names) to exist before looking up.
    let map = name_map();
    strings::lookup(name).and_then(|id| map.get(&id).copied())
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_primitive_name() {
        for id in TypeId::PRIMITIVES {
            assert_eq!(type_from_name(id.name()), Some(id), "{id:?}");
        }
        assert_eq!(type_from_name("ANY"), Some(TypeId::Any));
    }

    #[test]
    fn unknown_and_structural_names_do_not_resolve() {
        assert_eq!(type_from_name("NOT_A_TYPE"), None);
        // Structural kinds are type-level only and deliberately unregistered.
        assert_eq!(type_from_name("ARRAY"), None);
    }
}
