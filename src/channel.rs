//! Channel metadata carried between processors.

use crate::node::NodeId;

/// Whether a channel carries sampled data or discrete events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Sampled data (one value per sample tick).
    Continuous,
    /// Discrete events (TTL edges, messages).
    Event,
}

/// Metadata for one continuous or event channel.
///
/// Descriptors are plain values: a merger clones them from its sources
/// rather than sharing them, so a refresh never aliases upstream state.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelDescriptor {
    /// Display name, e.g. `CH1`.
    pub name: String,
    /// Index of the channel within the node that created it.
    pub index: usize,
    /// The node that created this channel.
    pub source_node: NodeId,
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Microvolts per bit.
    pub bit_volts: f32,
    pub kind: ChannelKind,
}

impl ChannelDescriptor {
    /// A continuous channel with unity gain and a generated name.
    pub fn continuous(source_node: NodeId, index: usize, sample_rate: f32) -> Self {
        Self {
            name: format!("CH{}", index + 1),
            index,
            source_node,
            sample_rate,
            bit_volts: 1.0,
            kind: ChannelKind::Continuous,
        }
    }

    /// An event channel with a generated name.
    pub fn event(source_node: NodeId, index: usize, sample_rate: f32) -> Self {
        Self {
            name: format!("EVT{}", index + 1),
            index,
            source_node,
            sample_rate,
            bit_volts: 1.0,
            kind: ChannelKind::Event,
        }
    }

    pub fn with_bit_volts(mut self, bit_volts: f32) -> Self {
        self.bit_volts = bit_volts;
        self
    }

    #[inline]
    pub fn is_event(&self) -> bool {
        self.kind == ChannelKind::Event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_names_are_one_based() {
        let ch = ChannelDescriptor::continuous(NodeId(1), 0, 30_000.0);
        assert_eq!(ch.name, "CH1");
        assert!(!ch.is_event());

        let evt = ChannelDescriptor::event(NodeId(1), 3, 30_000.0);
        assert_eq!(evt.name, "EVT4");
        assert!(evt.is_event());
    }

    #[test]
    fn test_builder_overrides() {
        let ch = ChannelDescriptor::continuous(NodeId(2), 5, 1_000.0)
            .with_bit_volts(0.195);
        assert_eq!(ch.name, "CH6");
        assert_eq!(ch.bit_volts, 0.195);
        assert_eq!(ch.index, 5);
        assert_eq!(ch.source_node, NodeId(2));
    }
}
