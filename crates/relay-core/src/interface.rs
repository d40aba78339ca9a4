// SPDX-License-Identifier: Apache-2.0
//! Block interface specifications.
//!
//! An [`InterfaceSpec`] is the immutable shape of a block: ordered event
//! input/output names, typed data input/output points, and one WITH list per
//! event associating it with the data points sampled or published when the
//! event fires. Instances hold the spec behind an `Arc`; statically shaped
//! block kinds share one spec across all instances while generic blocks
//! synthesize a per-instance spec at configuration time.

use std::sync::Arc;

use thiserror::Error;

use crate::strings::{self, StringId};
use crate::types::TypeId;

/// Index of a data point within one direction of an interface.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortId(u32);

impl PortId {
    /// Wraps a raw port index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw index, usable for direct storage access.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of an event within one direction of an interface.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventId(u32);

impl EventId {
    /// Wraps a raw event index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One named, typed data point.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataPoint {
    /// Interned point name.
    pub name: StringId,
    /// Declared type of the point.
    pub ty: TypeId,
}

/// Interface validation failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceError {
    /// A WITH list references a data point index beyond the declared count
    /// for its direction.
    #[error("WITH list for {direction} event {event} references data point {port} of {count}")]
    WithIndexOutOfRange {
        /// `"input"` or `"output"`.
        direction: &'static str,
        /// Index of the offending event.
        event: usize,
        /// Out-of-range data point index.
        port: usize,
        /// Declared data point count for the direction.
        count: usize,
    },
    /// The number of WITH lists does not match the number of events for a
    /// direction.
    #[error("{direction} WITH table has {lists} lists for {events} events")]
    WithCountMismatch {
        /// `"input"` or `"output"`.
        direction: &'static str,
        /// Number of WITH lists supplied.
        lists: usize,
        /// Number of events declared.
        events: usize,
    },
}

/// Immutable interface shape of a block kind or configured instance.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InterfaceSpec {
    event_inputs: Vec<StringId>,
    event_outputs: Vec<StringId>,
    data_inputs: Vec<DataPoint>,
    data_outputs: Vec<DataPoint>,
    ei_with: Vec<Vec<PortId>>,
    eo_with: Vec<Vec<PortId>>,
}

impl InterfaceSpec {
    /// Validates and assembles an interface from its six tables.
    ///
    /// WITH tables carry exactly one list per event (in event order); every
    /// index inside a list must name a declared data point of the matching
    /// direction. An entirely empty interface is legal.
    ///
    /// # Errors
    /// [`InterfaceError::WithCountMismatch`] when a WITH table's length
    /// differs from its event count, [`InterfaceError::WithIndexOutOfRange`]
    /// when a list entry exceeds the declared data point count.
    pub fn new(
        event_inputs: Vec<StringId>,
        event_outputs: Vec<StringId>,
        data_inputs: Vec<DataPoint>,
        data_outputs: Vec<DataPoint>,
        ei_with: Vec<Vec<PortId>>,
        eo_with: Vec<Vec<PortId>>,
    ) -> Result<Self, InterfaceError> {
        validate_with("input", &ei_with, event_inputs.len(), data_inputs.len())?;
        validate_with("output", &eo_with, event_outputs.len(), data_outputs.len())?;
        Ok(Self {
            event_inputs,
            event_outputs,
            data_inputs,
            data_outputs,
            ei_with,
            eo_with,
        })
    }

    /// Starts an empty builder.
    #[must_use]
    pub fn builder() -> InterfaceSpecBuilder {
        InterfaceSpecBuilder::default()
    }

    /// Number of event inputs.
    #[must_use]
    pub fn event_input_count(&self) -> usize {
        self.event_inputs.len()
    }

    /// Number of event outputs.
    #[must_use]
    pub fn event_output_count(&self) -> usize {
        self.event_outputs.len()
    }

    /// Number of data inputs.
    #[must_use]
    pub fn data_input_count(&self) -> usize {
        self.data_inputs.len()
    }

    /// Number of data outputs.
    #[must_use]
    pub fn data_output_count(&self) -> usize {
        self.data_outputs.len()
    }

    /// Name of an event input, `None` out of range.
    #[must_use]
    pub fn event_input_name(&self, event: EventId) -> Option<StringId> {
        self.event_inputs.get(event.index()).copied()
    }

    /// Name of an event output, `None` out of range.
    #[must_use]
    pub fn event_output_name(&self, event: EventId) -> Option<StringId> {
        self.event_outputs.get(event.index()).copied()
    }

    /// Declared data input point, `None` out of range.
    #[must_use]
    pub fn data_input(&self, port: PortId) -> Option<DataPoint> {
        self.data_inputs.get(port.index()).copied()
    }

    /// Declared data output point, `None` out of range.
    #[must_use]
    pub fn data_output(&self, port: PortId) -> Option<DataPoint> {
        self.data_outputs.get(port.index()).copied()
    }

    /// All declared data inputs, in port order.
    #[must_use]
    pub fn data_inputs(&self) -> &[DataPoint] {
        &self.data_inputs
    }

    /// All declared data outputs, in port order.
    #[must_use]
    pub fn data_outputs(&self) -> &[DataPoint] {
        &self.data_outputs
    }

    /// WITH list of an input event: the data inputs sampled when it fires,
    /// in association order. `None` out of range.
    #[must_use]
    pub fn input_with(&self, event: EventId) -> Option<&[PortId]> {
        self.ei_with.get(event.index()).map(Vec::as_slice)
    }

    /// WITH list of an output event: the data outputs published when it is
    /// emitted. `None` out of range.
    #[must_use]
    pub fn output_with(&self, event: EventId) -> Option<&[PortId]> {
        self.eo_with.get(event.index()).map(Vec::as_slice)
    }

    /// Finds an event input by interned name.
    #[must_use]
    pub fn event_input_index(&self, name: StringId) -> Option<EventId> {
        position(&self.event_inputs, name).map(EventId::new)
    }

    /// Finds an event output by interned name.
    #[must_use]
    pub fn event_output_index(&self, name: StringId) -> Option<EventId> {
        position(&self.event_outputs, name).map(EventId::new)
    }

    /// Finds a data input by interned name.
    #[must_use]
    pub fn data_input_index(&self, name: StringId) -> Option<PortId> {
        position_point(&self.data_inputs, name).map(PortId::new)
    }

    /// Finds a data output by interned name.
    #[must_use]
    pub fn data_output_index(&self, name: StringId) -> Option<PortId> {
        position_point(&self.data_outputs, name).map(PortId::new)
    }
}

fn position(names: &[StringId], name: StringId) -> Option<u32> {
    names.iter().position(|&n| n == name).map(|i| i as u32)
}

fn position_point(points: &[DataPoint], name: StringId) -> Option<u32> {
    points.iter().position(|p| p.name == name).map(|i| i as u32)
}

fn validate_with(
    direction: &'static str,
    table: &[Vec<PortId>],
    events: usize,
    points: usize,
) -> Result<(), InterfaceError> {
    if table.len() != events {
        return Err(InterfaceError::WithCountMismatch {
            direction,
            lists: table.len(),
            events,
        });
    }
    for (event, list) in table.iter().enumerate() {
        for &port in list {
            if port.index() >= points {
                return Err(InterfaceError::WithIndexOutOfRange {
                    direction,
                    event,
                    port: port.index(),
                    count: points,
                });
            }
        }
    }
    Ok(())
}

/// Incremental [`InterfaceSpec`] assembly; names are interned on the way in.
#[derive(Default)]
pub struct InterfaceSpecBuilder {
    event_inputs: Vec<StringId>,
    event_outputs: Vec<StringId>,
    data_inputs: Vec<DataPoint>,
    data_outputs: Vec<DataPoint>,
    ei_with: Vec<Vec<PortId>>,
    eo_with: Vec<Vec<PortId>>,
}

impl InterfaceSpecBuilder {
    /// Declares an event input and its WITH list (data input indices).
    #[must_use]
    pub fn event_input(mut self, name: &str, with: &[u32]) -> Self {
        self.event_inputs.push(strings::intern(name));
        self.ei_with
            .push(with.iter().map(|&i| PortId::new(i)).collect());
        self
    }

    /// Declares an event output and its WITH list (data output indices).
    #[must_use]
    pub fn event_output(mut self, name: &str, with: &[u32]) -> Self {
        self.event_outputs.push(strings::intern(name));
        self.eo_with
            .push(with.iter().map(|&i| PortId::new(i)).collect());
        self
    }

    /// Declares a data input point.
    #[must_use]
    pub fn data_input(mut self, name: &str, ty: TypeId) -> Self {
        self.data_inputs.push(DataPoint {
            name: strings::intern(name),
            ty,
        });
        self
    }

    /// Declares a data output point.
    #[must_use]
    pub fn data_output(mut self, name: &str, ty: TypeId) -> Self {
        self.data_outputs.push(DataPoint {
            name: strings::intern(name),
            ty,
        });
        self
    }

    /// Validates and produces the spec behind an `Arc`, ready to be shared
    /// across instances.
    ///
    /// # Errors
    /// See [`InterfaceSpec::new`].
    pub fn build(self) -> Result<Arc<InterfaceSpec>, InterfaceError> {
        InterfaceSpec::new(
            self.event_inputs,
            self.event_outputs,
            self.data_inputs,
            self.data_outputs,
            self.ei_with,
            self.eo_with,
        )
        .map(Arc::new)
    }
}
