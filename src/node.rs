//! Core processor trait and identity types.

use core::any::Any;
use core::fmt;

use crate::channel::ChannelDescriptor;

/// Unique identifier for a processor within a host graph.
///
/// Ids are assigned by the host and are stable across session save/load,
/// which is what makes them usable as persisted handles.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Persisted form of "no node".
    pub const UNSET: i64 = -1;

    /// Encode an optional handle for a session record.
    pub fn encode(id: Option<NodeId>) -> i64 {
        id.map_or(Self::UNSET, |id| i64::from(id.0))
    }

    /// Decode a persisted id. Negative or out-of-range values decode to `None`.
    pub fn decode(raw: i64) -> Option<NodeId> {
        u32::try_from(raw).ok().map(NodeId)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stream-level settings a processor reports to its downstream neighbours.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessorSettings {
    /// Number of continuous input channels.
    pub num_inputs: usize,
    /// Number of continuous output channels.
    pub num_outputs: usize,
    /// Sample rate of the stream in Hz.
    pub sample_rate: f32,
    /// The acquisition source this stream ultimately comes from.
    pub origin: Option<NodeId>,
}

impl ProcessorSettings {
    /// Reset counts and origin, keeping nothing from the previous layout.
    pub fn clear(&mut self, sample_rate: f32) {
        self.num_inputs = 0;
        self.num_outputs = 0;
        self.sample_rate = sample_rate;
        self.origin = None;
    }
}

/// The capability every upstream processor exposes to a merger.
///
/// This is deliberately narrow: a merger only ever reads channel metadata
/// from its sources and tells them where their data goes.
///
/// ```
/// use merger::{ChannelDescriptor, NodeId, Processor};
///
/// struct Tetrode {
///     id: NodeId,
///     channels: Vec<ChannelDescriptor>,
///     dest: Option<NodeId>,
/// }
///
/// impl Processor for Tetrode {
///     fn node_id(&self) -> NodeId { self.id }
///     fn name(&self) -> &str { "Tetrode" }
///     fn continuous_channels(&self) -> &[ChannelDescriptor] { &self.channels }
///     fn event_channels(&self) -> &[ChannelDescriptor] { &[] }
///     fn origin(&self) -> Option<NodeId> { Some(self.id) }
///     fn sample_rate(&self) -> f32 { 30_000.0 }
///     fn dest_node(&self) -> Option<NodeId> { self.dest }
///     fn set_dest_node(&mut self, dest: Option<NodeId>) { self.dest = dest; }
/// }
/// ```
pub trait Processor: AsAny {
    /// Host-assigned id of this node.
    fn node_id(&self) -> NodeId;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Continuous channel descriptors, in output order.
    fn continuous_channels(&self) -> &[ChannelDescriptor];

    /// Event channel descriptors, in output order.
    fn event_channels(&self) -> &[ChannelDescriptor];

    /// The acquisition source the stream originates from.
    fn origin(&self) -> Option<NodeId>;

    /// Sample rate of the stream in Hz.
    fn sample_rate(&self) -> f32;

    /// Number of continuous output channels.
    fn num_outputs(&self) -> usize {
        self.continuous_channels().len()
    }

    /// The node this one currently sends its data to.
    fn dest_node(&self) -> Option<NodeId>;

    /// Point this node's output at `dest`.
    fn set_dest_node(&mut self, dest: Option<NodeId>);
}

/// Access to the concrete type behind a `dyn Processor`.
///
/// Implemented for every `'static` type, so processors never write it.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_encoding() {
        assert_eq!(NodeId::encode(Some(NodeId(7))), 7);
        assert_eq!(NodeId::encode(None), NodeId::UNSET);
    }

    #[test]
    fn test_node_id_decoding() {
        assert_eq!(NodeId::decode(101), Some(NodeId(101)));
        assert_eq!(NodeId::decode(NodeId::UNSET), None);
        assert_eq!(NodeId::decode(-42), None);
        assert_eq!(NodeId::decode(i64::from(u32::MAX) + 1), None);
    }

    #[test]
    fn test_settings_clear() {
        let mut settings = ProcessorSettings {
            num_inputs: 8,
            num_outputs: 8,
            sample_rate: 30_000.0,
            origin: Some(NodeId(3)),
        };
        settings.clear(44_100.0);
        assert_eq!(settings.num_inputs, 0);
        assert_eq!(settings.num_outputs, 0);
        assert_eq!(settings.sample_rate, 44_100.0);
        assert_eq!(settings.origin, None);
    }
}
