// SPDX-License-Identifier: Apache-2.0
//! relay-core: dynamic value/type system and function-block execution model.
//!
//! The crate provides the typed value layer (tagged-union values, cast
//! compatibility matrices, the canonical text codec) and the block layer
//! (interface specifications, shared data links, the per-event execution
//! protocol, generic interface synthesis). Concrete block algorithms,
//! schedulers and communication adapters live in higher layers.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::many_single_char_names,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::use_self,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::match_same_arms
)]
// Width-changing numeric casts are the business of this crate; the cast
// matrices gate which conversions are reachable.

mod block;
mod cast;
mod connection;
mod exec;
mod generic;
mod interface;
/// Process-wide interned-string table.
pub mod strings;
mod text;
mod types;
mod value;

/// Type registry resolving canonical type names.
pub mod registry;

// Re-exports for stable public API
/// Block instances, the behavior trait, and wiring.
pub use block::{
    connect_data, connect_event, lock_block, new_handle, BlockHandle, BlockInstance, ConnectError,
    FunctionBlock,
};
/// Cast compatibility queries and primitive conversion.
pub use cast::{cast_primitive, is_castable, CastKind};
/// Shared data links and event edges.
pub use connection::{ConnectionHub, EventDestination, HubGuard, LinkId};
/// Event delivery and synchronous chains.
pub use exec::deliver_event;
/// Generic interface synthesis.
pub use generic::{
    configure_generic_instance, generate_any_data_points, generate_point_names,
    generic_point_count, GenericConfigError, MAX_IDENTIFIER_LEN,
};
/// Interface specifications and port/event identifiers.
pub use interface::{
    DataPoint, EventId, InterfaceError, InterfaceSpec, InterfaceSpecBuilder, PortId,
};
/// Interned-string identifiers.
pub use strings::StringId;
/// Canonical text codec surface.
pub use text::{text_buffer_entry, TextError, ANY_TEXT};
/// Type identifiers.
pub use types::TypeId;
/// Tagged-union values and generic assignment.
pub use value::{AssignOutcome, Value};
