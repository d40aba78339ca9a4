// SPDX-License-Identifier: Apache-2.0
//! Shared data links and event edges.
//!
//! All data connections of one resource share a single [`ConnectionHub`]: a
//! mutex over the link slots that every wired block reaches through an
//! `Arc`. A block publishes each connected output to one link slot and every
//! consumer reads from that same slot, so a read and a write of the same
//! link can never interleave mid-value. The hub lock is the resource's
//! critical region; block algorithms run outside it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::block::BlockHandle;
use crate::interface::EventId;
use crate::value::{AssignOutcome, Value};

/// Typed index of a link slot within a hub.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct LinkId(usize);

impl LinkId {
    /// The raw slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Resource-wide shared data connection state.
#[derive(Debug, Default)]
pub struct ConnectionHub {
    links: Mutex<Vec<Value>>,
}

impl ConnectionHub {
    /// Creates an empty hub, ready to be shared via `Arc`.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Allocates a link slot seeded with `initial` (the publishing output's
    /// current value) and returns its id.
    pub fn create_link(&self, initial: Value) -> LinkId {
        let mut links = self.guard();
        links.push(initial);
        LinkId(links.len() - 1)
    }

    /// Enters the hub's critical region. Held for the duration of one read
    /// or write phase and released on every exit path by RAII.
    #[must_use]
    pub fn lock(&self) -> HubGuard<'_> {
        HubGuard { links: self.guard() }
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Value>> {
        // A panicked writer must not wedge the whole resource; the slot
        // still holds a complete previous value.
        self.links.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Scoped access to the hub's link slots.
pub struct HubGuard<'a> {
    links: MutexGuard<'a, Vec<Value>>,
}

impl HubGuard<'_> {
    /// Pulls the link's value into `dst` via the generic assignment rules.
    /// Unknown links leave `dst` untouched.
    pub fn read_into(&self, link: LinkId, dst: &mut Value) -> AssignOutcome {
        match self.links.get(link.0) {
            Some(src) => dst.save_assign(src),
            None => AssignOutcome::Ignored,
        }
    }

    /// Publishes `src` into the link's slot via the generic assignment
    /// rules. Unknown links absorb the write.
    pub fn write_from(&mut self, link: LinkId, src: &Value) -> AssignOutcome {
        match self.links.get_mut(link.0) {
            Some(slot) => slot.save_assign(src),
            None => AssignOutcome::Ignored,
        }
    }

    /// Current value of a link slot, `None` for unknown links.
    #[must_use]
    pub fn peek(&self, link: LinkId) -> Option<&Value> {
        self.links.get(link.0)
    }
}

/// A directed event edge: one specific input event on a destination
/// instance.
#[derive(Clone)]
pub struct EventDestination {
    /// The instance receiving the event.
    pub target: BlockHandle,
    /// The input event to trigger on it.
    pub event: EventId,
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::TypeId;

    #[test]
    fn link_slots_are_allocated_in_order() {
        let hub = ConnectionHub::new();
        let a = hub.create_link(Value::Int(1));
        let b = hub.create_link(Value::Bool(true));
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        let guard = hub.lock();
        assert_eq!(guard.peek(a), Some(&Value::Int(1)));
        assert_eq!(guard.peek(b), Some(&Value::Bool(true)));
    }

    #[test]
    fn write_then_read_moves_the_value_across() {
        let hub = ConnectionHub::new();
        let link = hub.create_link(Value::UDInt(0));
        {
            let mut guard = hub.lock();
            assert_eq!(
                guard.write_from(link, &Value::UDInt(77)),
                AssignOutcome::Assigned
            );
        }
        let mut dst = Value::Any;
        let guard = hub.lock();
        assert_eq!(guard.read_into(link, &mut dst), AssignOutcome::Replaced);
        assert_eq!(dst, Value::UDInt(77));
        assert_eq!(dst.type_id(), TypeId::UDInt);
    }

    #[test]
    fn incompatible_write_leaves_slot_untouched() {
        let hub = ConnectionHub::new();
        let link = hub.create_link(Value::Bool(false));
        let mut guard = hub.lock();
        assert_eq!(
            guard.write_from(link, &Value::String("no".to_owned())),
            AssignOutcome::Ignored
        );
        assert_eq!(guard.peek(link), Some(&Value::Bool(false)));
    }

    #[test]
    fn unknown_link_is_absorbed() {
        let hub = ConnectionHub::new();
        let mut dst = Value::Int(5);
        let mut guard = hub.lock();
        assert_eq!(
            guard.read_into(LinkId(9), &mut dst),
            AssignOutcome::Ignored
        );
        assert_eq!(dst, Value::Int(5));
        assert_eq!(
            guard.write_from(LinkId(9), &Value::Int(1)),
            AssignOutcome::Ignored
        );
    }
}
