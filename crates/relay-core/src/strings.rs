// SPDX-License-Identifier: Apache-2.0
//! Process-wide interned-string table.
//!
//! All port, type, and instance names are referenced by an opaque
//! [`StringId`] obtained here; the core never stores raw text for names and
//! resolves ids back to text only at (de)serialization and error-reporting
//! boundaries. The table is init-once process-wide state with no teardown:
//! interned storage is intentionally leaked so resolution can hand out
//! `'static` references.

use std::sync::{Mutex, OnceLock, PoisonError};

use rustc_hash::FxHashMap;

/// Opaque identifier for an interned string.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringId(u32);

#[derive(Default)]
struct Table {
    ids: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

fn table() -> &'static Mutex<Table> {
    static TABLE: OnceLock<Mutex<Table>> = OnceLock::new();
    TABLE.get_or_init(|| Mutex::new(Table::default()))
}

/// Interns `text`, returning the existing id when present.
pub fn intern(text: &str) -> StringId {
    let mut table = table().lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(&id) = table.ids.get(text) {
        return StringId(id);
    }
    debug_assert!(table.strings.len() < u32::MAX as usize);
    let id = table.strings.len() as u32;
    let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
    table.strings.push(leaked);
    table.ids.insert(leaked, id);
    StringId(id)
}

/// Looks up `text` without inserting it.
#[must_use]
pub fn lookup(text: &str) -> Option<StringId> {
    let table = table().lock().unwrap_or_else(PoisonError::into_inner);
    table.ids.get(text).map(|&id| StringId(id))
}

/// Resolves an id back to its text. `None` for ids this process never
/// produced.
#[must_use]
pub fn resolve(id: StringId) -> Option<&'static str> {
    let table = table().lock().unwrap_or_else(PoisonError::into_inner);
    table.strings.get(id.0 as usize).copied()
}
