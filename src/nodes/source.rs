//! Fixed-layout upstream source

use crate::channel::ChannelDescriptor;
use crate::node::{NodeId, Processor};

/// A source node with a fixed channel layout.
///
/// Stands in for an acquisition board or file reader: it owns a set of
/// continuous and event channels and reports itself as their origin
/// unless told otherwise.
///
/// ```
/// use merger::{NodeId, Processor};
/// use merger::nodes::StaticSource;
///
/// let source = StaticSource::new(NodeId(100), "Rhythm FPGA", 30_000.0)
///     .with_continuous(32)
///     .with_events(8);
/// assert_eq!(source.num_outputs(), 32);
/// assert_eq!(source.origin(), Some(NodeId(100)));
/// ```
#[derive(Clone, Debug)]
pub struct StaticSource {
    id: NodeId,
    name: String,
    sample_rate: f32,
    bit_volts: f32,
    origin: Option<NodeId>,
    channels: Vec<ChannelDescriptor>,
    event_channels: Vec<ChannelDescriptor>,
    dest: Option<NodeId>,
}

impl StaticSource {
    pub fn new(id: NodeId, name: impl Into<String>, sample_rate: f32) -> Self {
        Self {
            id,
            name: name.into(),
            sample_rate,
            bit_volts: 1.0,
            origin: Some(id),
            channels: Vec::new(),
            event_channels: Vec::new(),
            dest: None,
        }
    }

    /// Replace the continuous channels with `count` generated ones.
    pub fn with_continuous(mut self, count: usize) -> Self {
        self.channels = (0..count)
            .map(|i| {
                ChannelDescriptor::continuous(self.id, i, self.sample_rate)
                    .with_bit_volts(self.bit_volts)
            })
            .collect();
        self
    }

    /// Replace the event channels with `count` generated ones.
    pub fn with_events(mut self, count: usize) -> Self {
        self.event_channels = (0..count)
            .map(|i| ChannelDescriptor::event(self.id, i, self.sample_rate))
            .collect();
        self
    }

    /// Set the gain of the continuous channels, including ones already generated.
    pub fn with_bit_volts(mut self, bit_volts: f32) -> Self {
        self.bit_volts = bit_volts;
        for ch in self.channels.iter_mut() {
            ch.bit_volts = bit_volts;
        }
        self
    }

    /// Report a different node as the origin of this stream.
    pub fn with_origin(mut self, origin: NodeId) -> Self {
        self.origin = Some(origin);
        self
    }
}

impl Processor for StaticSource {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn continuous_channels(&self) -> &[ChannelDescriptor] {
        &self.channels
    }

    fn event_channels(&self) -> &[ChannelDescriptor] {
        &self.event_channels
    }

    fn origin(&self) -> Option<NodeId> {
        self.origin
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn dest_node(&self) -> Option<NodeId> {
        self.dest
    }

    fn set_dest_node(&mut self, dest: Option<NodeId>) {
        self.dest = dest;
    }
}
