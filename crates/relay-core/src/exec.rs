// SPDX-License-Identifier: Apache-2.0
//! Event delivery and synchronous event chains.
//!
//! One delivery runs the full per-event protocol on the target instance:
//! record the cursor, read phase, algorithm, then per emitted output event a
//! write phase and destination collection. The instance lock is released
//! before downstream deliveries, so a chain only ever holds one instance
//! lock at a time. Chains are synchronous call depth; breaking cycles within
//! one dispatch is the scheduler's obligation, not enforced here.

use tracing::warn;

use crate::block::{lock_block, BlockHandle};
use crate::connection::EventDestination;
use crate::interface::EventId;

/// Delivers one input event to a block and runs the resulting chain to
/// completion.
///
/// Out-of-range event ids are logged and dropped; delivery is never fatal.
pub fn deliver_event(handle: &BlockHandle, event: EventId) {
    let pending = run_protocol(handle, event);
    for destination in pending {
        deliver_event(&destination.target, destination.event);
    }
}

/// Executes the protocol under the instance lock and returns the collected
/// downstream destinations, in emission order.
fn run_protocol(handle: &BlockHandle, event: EventId) -> Vec<EventDestination> {
    let mut guard = lock_block(handle);
    let block = &mut *guard;
    let input_count = block.instance().spec().event_input_count();
    if event.index() >= input_count {
        warn!(
            event = event.index(),
            count = input_count,
            "dropping out-of-range input event"
        );
        return Vec::new();
    }
    block.instance_mut().set_current_event(Some(event));
    block.instance_mut().read_input_data(event);
    let emitted = block.execute_event(event);
    let mut pending = Vec::new();
    for output in emitted {
        block.instance_mut().write_output_data(output);
        if let Some(destinations) = block.instance().eo_destinations(output) {
            pending.extend_from_slice(destinations);
        }
    }
    block.instance_mut().set_current_event(None);
    pending
}
