// SPDX-License-Identifier: Apache-2.0
//! Function block instances, behavior trait, and wiring.
//!
//! A block is split along a fixed seam: [`BlockInstance`] owns everything
//! structural (the interface spec, the input/output value storage, the data
//! and event connection tables, the execution cursor) while the
//! [`FunctionBlock`] trait supplies the algorithm. The execution driver in
//! [`crate::exec`] talks to both halves through a shared [`BlockHandle`].
//!
//! Wiring happens through the free functions [`connect_data`] and
//! [`connect_event`]; after configuration the connection tables are only
//! read.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::cast::is_castable;
use crate::connection::{ConnectionHub, EventDestination, LinkId};
use crate::interface::{EventId, InterfaceSpec, PortId};
use crate::strings::{self, StringId};
use crate::types::TypeId;
use crate::value::Value;

/// Shared, lockable handle to a block.
pub type BlockHandle = Arc<Mutex<dyn FunctionBlock>>;

/// Wraps a block in a shared handle.
pub fn new_handle<B: FunctionBlock + 'static>(block: B) -> BlockHandle {
    Arc::new(Mutex::new(block))
}

/// Locks a block handle, absorbing poisoning: an algorithm that panicked
/// mid-execution leaves structurally valid storage behind.
pub fn lock_block(handle: &BlockHandle) -> MutexGuard<'_, dyn FunctionBlock + 'static> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Behavior of a block kind.
///
/// The algorithm in [`FunctionBlock::execute_event`] runs strictly between
/// the read and write phases of the execution protocol: it sees stable input
/// copies, writes its results to the output storage, and must not touch the
/// connection hub. It returns the output events to emit, in order; the
/// driver performs the write phase and the downstream delivery for each.
pub trait FunctionBlock: Send {
    /// Structural half of the block.
    fn instance(&self) -> &BlockInstance;
    /// Mutable access to the structural half.
    fn instance_mut(&mut self) -> &mut BlockInstance;
    /// Runs the algorithm for one input event.
    fn execute_event(&mut self, event: EventId) -> Vec<EventId>;
}

/// Wiring failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    /// A data port index exceeds the declared count for its role.
    #[error("{role} port {port} out of range (count {count})")]
    PortOutOfRange {
        /// `"source output"` or `"destination input"`.
        role: &'static str,
        /// The offending index.
        port: usize,
        /// Declared port count.
        count: usize,
    },
    /// An event index exceeds the declared count for its role.
    #[error("{role} event {event} out of range (count {count})")]
    EventOutOfRange {
        /// `"source output"` or `"destination input"`.
        role: &'static str,
        /// The offending index.
        event: usize,
        /// Declared event count.
        count: usize,
    },
    /// The endpoint types are neither identical, nor generic, nor castable.
    #[error("cannot connect {from:?} output to {to:?} input")]
    IncompatibleTypes {
        /// Source output type.
        from: TypeId,
        /// Destination input type.
        to: TypeId,
    },
    /// The endpoints live on different connection hubs.
    #[error("endpoints belong to different resources")]
    MixedResources,
}

/// Structural state of one block instance.
pub struct BlockInstance {
    name: StringId,
    spec: Arc<InterfaceSpec>,
    inputs: Vec<Value>,
    outputs: Vec<Value>,
    di_conns: Vec<Option<LinkId>>,
    do_conns: Vec<Option<LinkId>>,
    eo_conns: Vec<Vec<EventDestination>>,
    hub: Arc<ConnectionHub>,
    current_event: Option<EventId>,
}

impl BlockInstance {
    /// Builds an instance of the given shape on a resource's hub. Value
    /// storage is sized by the spec and seeded with each point's declared
    /// default; points of structural kinds fall back to the generic
    /// placeholder.
    #[must_use]
    pub fn new(name: &str, spec: Arc<InterfaceSpec>, hub: Arc<ConnectionHub>) -> Self {
        let defaults = |points: &[crate::interface::DataPoint]| {
            points
                .iter()
                .map(|p| Value::default_for(p.ty).unwrap_or(Value::Any))
                .collect::<Vec<_>>()
        };
        let inputs = defaults(spec.data_inputs());
        let outputs = defaults(spec.data_outputs());
        let di_conns = vec![None; spec.data_input_count()];
        let do_conns = vec![None; spec.data_output_count()];
        let eo_conns = vec![Vec::new(); spec.event_output_count()];
        Self {
            name: strings::intern(name),
            spec,
            inputs,
            outputs,
            di_conns,
            do_conns,
            eo_conns,
            hub,
            current_event: None,
        }
    }

    /// Interned instance name.
    #[must_use]
    pub fn name(&self) -> StringId {
        self.name
    }

    /// The interface shape of this instance.
    #[must_use]
    pub fn spec(&self) -> &Arc<InterfaceSpec> {
        &self.spec
    }

    /// The resource hub this instance is wired to.
    #[must_use]
    pub fn hub(&self) -> &Arc<ConnectionHub> {
        &self.hub
    }

    /// The event currently being executed, if any.
    #[must_use]
    pub fn current_event(&self) -> Option<EventId> {
        self.current_event
    }

    pub(crate) fn set_current_event(&mut self, event: Option<EventId>) {
        self.current_event = event;
    }

    /// Data input value, `None` out of the declared range.
    #[must_use]
    pub fn data_input(&self, port: PortId) -> Option<&Value> {
        self.inputs.get(port.index())
    }

    /// Mutable data input value, `None` out of range.
    pub fn data_input_mut(&mut self, port: PortId) -> Option<&mut Value> {
        self.inputs.get_mut(port.index())
    }

    /// Data output value, `None` out of range.
    #[must_use]
    pub fn data_output(&self, port: PortId) -> Option<&Value> {
        self.outputs.get(port.index())
    }

    /// Mutable data output value, `None` out of range.
    pub fn data_output_mut(&mut self, port: PortId) -> Option<&mut Value> {
        self.outputs.get_mut(port.index())
    }

    /// Event destinations registered on an output event, `None` out of
    /// range.
    #[must_use]
    pub fn eo_destinations(&self, event: EventId) -> Option<&[EventDestination]> {
        self.eo_conns.get(event.index()).map(Vec::as_slice)
    }

    /// Data input value without a range check. The caller owns range
    /// validity; `port` must be below the declared input count.
    #[must_use]
    pub fn data_input_unchecked(&self, port: PortId) -> &Value {
        &self.inputs[port.index()]
    }

    /// Data output value without a range check.
    #[must_use]
    pub fn data_output_unchecked(&self, port: PortId) -> &Value {
        &self.outputs[port.index()]
    }

    /// Mutable data output value without a range check.
    pub fn data_output_unchecked_mut(&mut self, port: PortId) -> &mut Value {
        &mut self.outputs[port.index()]
    }

    /// Input link of a data input without a range check.
    #[must_use]
    pub fn di_con_unchecked(&self, port: PortId) -> Option<LinkId> {
        self.di_conns[port.index()]
    }

    /// Published link of a data output without a range check.
    #[must_use]
    pub fn do_con_unchecked(&self, port: PortId) -> Option<LinkId> {
        self.do_conns[port.index()]
    }

    /// Event destinations of an output event without a range check.
    #[must_use]
    pub fn eo_destinations_unchecked(&self, event: EventId) -> &[EventDestination] {
        &self.eo_conns[event.index()]
    }

    /// Read phase: pulls the event's WITH-associated inputs from their links
    /// under one hub lock scope. Unconnected inputs keep their last value;
    /// an out-of-range event reads nothing.
    pub fn read_input_data(&mut self, event: EventId) {
        let spec = Arc::clone(&self.spec);
        let Some(with) = spec.input_with(event) else {
            return;
        };
        let hub = Arc::clone(&self.hub);
        let guard = hub.lock();
        for &port in with {
            if let Some(link) = self.di_conns.get(port.index()).copied().flatten() {
                if let Some(slot) = self.inputs.get_mut(port.index()) {
                    guard.read_into(link, slot);
                }
            }
        }
    }

    /// Write phase: publishes the event's WITH-associated outputs to their
    /// links under one hub lock scope.
    pub fn write_output_data(&mut self, event: EventId) {
        let spec = Arc::clone(&self.spec);
        let Some(with) = spec.output_with(event) else {
            return;
        };
        let hub = Arc::clone(&self.hub);
        let mut guard = hub.lock();
        for &port in with {
            if let Some(link) = self.do_conns.get(port.index()).copied().flatten() {
                if let Some(value) = self.outputs.get(port.index()) {
                    guard.write_from(link, value);
                }
            }
        }
    }
}

/// Wires a source data output to a destination data input.
///
/// The source's published link is created on first connection (seeded with
/// the output's current value) and reused for every further consumer;
/// reconnecting an already-wired input replaces its source. Endpoints must
/// share one hub and their types must be identical, generic on either side,
/// or related by the cast matrices.
///
/// # Errors
/// [`ConnectError::PortOutOfRange`], [`ConnectError::IncompatibleTypes`], or
/// [`ConnectError::MixedResources`].
pub fn connect_data(
    src: &BlockHandle,
    src_port: PortId,
    dst: &BlockHandle,
    dst_port: PortId,
) -> Result<(), ConnectError> {
    if Arc::ptr_eq(src, dst) {
        let mut guard = lock_block(src);
        let inst = guard.instance_mut();
        let from = source_type(inst, src_port)?;
        let to = dest_type(inst, dst_port)?;
        check_compatible(from, to)?;
        let link = publish_link(inst, src_port);
        attach_input(inst, dst_port, link);
        return Ok(());
    }
    let mut src_guard = lock_block(src);
    let mut dst_guard = lock_block(dst);
    let src_inst = src_guard.instance_mut();
    let dst_inst = dst_guard.instance_mut();
    if !Arc::ptr_eq(src_inst.hub(), dst_inst.hub()) {
        return Err(ConnectError::MixedResources);
    }
    let from = source_type(src_inst, src_port)?;
    let to = dest_type(dst_inst, dst_port)?;
    check_compatible(from, to)?;
    let link = publish_link(src_inst, src_port);
    attach_input(dst_inst, dst_port, link);
    Ok(())
}

/// Wires a source output event to a destination input event (fan-out
/// append; one output event may feed any number of destinations).
///
/// # Errors
/// [`ConnectError::EventOutOfRange`] for either endpoint.
pub fn connect_event(
    src: &BlockHandle,
    src_event: EventId,
    dst: &BlockHandle,
    dst_event: EventId,
) -> Result<(), ConnectError> {
    if Arc::ptr_eq(src, dst) {
        let mut guard = lock_block(src);
        let inst = guard.instance_mut();
        check_event_range("source output", src_event, inst.spec().event_output_count())?;
        check_event_range(
            "destination input",
            dst_event,
            inst.spec().event_input_count(),
        )?;
        inst.eo_conns[src_event.index()].push(EventDestination {
            target: Arc::clone(dst),
            event: dst_event,
        });
        return Ok(());
    }
    {
        let dst_guard = lock_block(dst);
        check_event_range(
            "destination input",
            dst_event,
            dst_guard.instance().spec().event_input_count(),
        )?;
    }
    let mut src_guard = lock_block(src);
    let inst = src_guard.instance_mut();
    check_event_range("source output", src_event, inst.spec().event_output_count())?;
    inst.eo_conns[src_event.index()].push(EventDestination {
        target: Arc::clone(dst),
        event: dst_event,
    });
    Ok(())
}

fn source_type(inst: &BlockInstance, port: PortId) -> Result<TypeId, ConnectError> {
    inst.spec()
        .data_output(port)
        .map(|p| p.ty)
        .ok_or(ConnectError::PortOutOfRange {
            role: "source output",
            port: port.index(),
            count: inst.spec().data_output_count(),
        })
}

fn dest_type(inst: &BlockInstance, port: PortId) -> Result<TypeId, ConnectError> {
    inst.spec()
        .data_input(port)
        .map(|p| p.ty)
        .ok_or(ConnectError::PortOutOfRange {
            role: "destination input",
            port: port.index(),
            count: inst.spec().data_input_count(),
        })
}

fn check_compatible(from: TypeId, to: TypeId) -> Result<(), ConnectError> {
    let generic = from == TypeId::Any || to == TypeId::Any;
    if from == to || generic || is_castable(from, to).is_some() {
        Ok(())
    } else {
        Err(ConnectError::IncompatibleTypes { from, to })
    }
}

fn check_event_range(
    role: &'static str,
    event: EventId,
    count: usize,
) -> Result<(), ConnectError> {
    if event.index() < count {
        Ok(())
    } else {
        Err(ConnectError::EventOutOfRange {
            role,
            event: event.index(),
            count,
        })
    }
}

/// Ensures the output publishes to a link, creating and seeding it on first
/// use. `port` is validated by the caller.
fn publish_link(inst: &mut BlockInstance, port: PortId) -> LinkId {
    if let Some(link) = inst.do_conns[port.index()] {
        return link;
    }
    let initial = inst.outputs[port.index()].clone();
    let link = inst.hub.create_link(initial);
    inst.do_conns[port.index()] = Some(link);
    link
}

fn attach_input(inst: &mut BlockInstance, port: PortId, link: LinkId) {
    inst.di_conns[port.index()] = Some(link);
}
