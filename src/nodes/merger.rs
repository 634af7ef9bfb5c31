//! Two-input merger - selects between and aggregates two upstream sources

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::channel::ChannelDescriptor;
use crate::config::HostDefaults;
use crate::error::Result;
use crate::graph::NodeTable;
use crate::node::{NodeId, Processor, ProcessorSettings};
use crate::session::MergerRecord;

/// One of the merger's two source attachment points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Slot {
    #[default]
    A,
    B,
}

impl Slot {
    /// The opposite slot.
    #[inline]
    pub fn other(self) -> Slot {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }
}

/// Which kinds of channel a slot contributes to the merged output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Forwarding {
    continuous: bool,
    events: bool,
}

impl Default for Forwarding {
    fn default() -> Self {
        Self {
            continuous: true,
            events: true,
        }
    }
}

/// Merges two upstream sources into one downstream stream.
///
/// The merger holds a handle to a source in each of its two [`Slot`]s. One
/// slot is *active*: it is the one the next [`assign_source`] fills and the
/// one reported by [`current_source`]. Output metadata is the concatenation
/// of slot A's and slot B's channels, gated per slot and per channel kind.
///
/// Nothing is recomputed automatically; call [`refresh_metadata`] after
/// changing a slot or a forwarding flag.
///
/// ```
/// use merger::{HostDefaults, NodeId, Processor, ProcessorGraph};
/// use merger::nodes::{Merger, Slot, StaticSource};
///
/// let mut graph = ProcessorGraph::new();
/// graph.add(StaticSource::new(NodeId(1), "Headstage A", 30_000.0).with_continuous(2)).unwrap();
/// graph.add(StaticSource::new(NodeId(2), "Headstage B", 30_000.0).with_continuous(4)).unwrap();
///
/// let mut merger = Merger::new(NodeId(3), HostDefaults::default());
/// merger.assign_source(&mut graph, Some(NodeId(1)));
/// merger.set_active_slot(Slot::B);
/// merger.assign_source(&mut graph, Some(NodeId(2)));
/// merger.refresh_metadata(&graph);
///
/// assert!(merger.has_complete_pair());
/// assert_eq!(merger.continuous_channels().len(), 6);
/// ```
///
/// [`assign_source`]: Merger::assign_source
/// [`current_source`]: Merger::current_source
/// [`refresh_metadata`]: Merger::refresh_metadata
pub struct Merger {
    id: NodeId,
    name: String,
    sources: [Option<NodeId>; 2],
    active: Slot,
    forwarding: [Forwarding; 2],

    channels: Vec<ChannelDescriptor>,
    event_channels: Vec<ChannelDescriptor>,
    settings: ProcessorSettings,
    defaults: HostDefaults,

    dest: Option<NodeId>,
}

impl Merger {
    /// Create an empty merger with slot A active and all forwarding enabled.
    pub fn new(id: NodeId, defaults: HostDefaults) -> Self {
        Self {
            id,
            name: String::from("Merger"),
            sources: [None, None],
            active: Slot::A,
            forwarding: [Forwarding::default(); 2],
            channels: Vec::new(),
            event_channels: Vec::new(),
            settings: ProcessorSettings {
                num_inputs: 0,
                num_outputs: 0,
                sample_rate: defaults.sample_rate,
                origin: None,
            },
            defaults,
            dest: None,
        }
    }

    /// Put `node` in the active slot, or clear the slot with `None`.
    ///
    /// The new source is pointed at this merger through the host table.
    pub fn assign_source<T: NodeTable + ?Sized>(&mut self, table: &mut T, node: Option<NodeId>) {
        self.sources[self.active.index()] = node;
        debug!(merger = %self.id, slot = ?self.active, source = ?node, "assigned merger source");

        if let Some(source) = node {
            if !table.attach_destination(source, self.id) {
                debug!(merger = %self.id, source = %source, "source not in host graph");
            }
        }
    }

    pub fn set_active_slot(&mut self, slot: Slot) {
        self.active = slot;
        debug!(merger = %self.id, slot = ?slot, "switched merger path");
    }

    pub fn toggle_active_slot(&mut self) {
        self.set_active_slot(self.active.other());
    }

    #[inline]
    pub fn active_slot(&self) -> Slot {
        self.active
    }

    /// The source in the active slot.
    #[inline]
    pub fn current_source(&self) -> Option<NodeId> {
        self.sources[self.active.index()]
    }

    #[inline]
    pub fn source(&self, slot: Slot) -> Option<NodeId> {
        self.sources[slot.index()]
    }

    /// True when both slots hold a source.
    pub fn has_complete_pair(&self) -> bool {
        self.sources.iter().all(Option::is_some)
    }

    /// The slot `source` occupies. Slot A wins if it fills both.
    pub fn slot_of(&self, source: NodeId) -> Option<Slot> {
        [Slot::A, Slot::B]
            .into_iter()
            .find(|slot| self.sources[slot.index()] == Some(source))
    }

    /// Whether event channels from `source` reach the output.
    /// False for a node in neither slot.
    pub fn forwards_events(&self, source: NodeId) -> bool {
        self.slot_of(source)
            .map_or(false, |slot| self.forwarding[slot.index()].events)
    }

    /// Whether continuous channels from `source` reach the output.
    /// False for a node in neither slot.
    pub fn forwards_continuous(&self, source: NodeId) -> bool {
        self.slot_of(source)
            .map_or(false, |slot| self.forwarding[slot.index()].continuous)
    }

    pub fn set_forward_continuous(&mut self, slot: Slot, enabled: bool) {
        self.forwarding[slot.index()].continuous = enabled;
    }

    pub fn set_forward_events(&mut self, slot: Slot, enabled: bool) {
        self.forwarding[slot.index()].events = enabled;
    }

    /// Rebuild the output channel lists and settings from the current slots.
    ///
    /// Slot A's channels come first, then slot B's. Stream settings (origin
    /// and sample rate) are taken from each present source in turn, so B's
    /// win when both are set. With no source at all the output is a stub
    /// of [`HostDefaults::num_outputs`] channels.
    pub fn refresh_metadata<T: NodeTable + ?Sized>(&mut self, table: &T) {
        self.channels.clear();
        self.event_channels.clear();
        self.settings.clear(self.defaults.sample_rate);

        for slot in [Slot::A, Slot::B] {
            let Some(id) = self.sources[slot.index()] else {
                continue;
            };
            match table.resolve(id) {
                Some(source) => self.add_settings_from(slot, source),
                None => warn!(merger = %self.id, slot = ?slot, source = %id, "merger source is gone"),
            }
        }

        if self.sources.iter().all(Option::is_none) {
            self.settings.sample_rate = self.defaults.sample_rate;
            self.settings.num_outputs = self.defaults.num_outputs;

            self.channels = (0..self.defaults.num_outputs)
                .map(|i| {
                    ChannelDescriptor::continuous(self.id, i, self.defaults.sample_rate)
                        .with_bit_volts(self.defaults.bit_volts)
                })
                .collect();
        }

        debug!(
            merger = %self.id,
            outputs = self.settings.num_outputs,
            events = self.event_channels.len(),
            "refreshed merger metadata"
        );
    }

    fn add_settings_from(&mut self, slot: Slot, source: &dyn Processor) {
        let forwarding = self.forwarding[slot.index()];
        debug!(merger = %self.id, slot = ?slot, source = source.name(), "adding settings from source");

        if forwarding.continuous {
            self.settings.num_inputs += source.num_outputs();
            self.channels
                .extend(source.continuous_channels().iter().cloned());
        }

        if forwarding.events {
            self.event_channels
                .extend(source.event_channels().iter().cloned());
        }

        self.settings.origin = source.origin();
        self.settings.sample_rate = source.sample_rate();
        self.settings.num_outputs = self.settings.num_inputs;
    }

    /// Snapshot the two slots for saving.
    pub fn serialize_config(&self) -> MergerRecord {
        MergerRecord::new(self.sources[0], self.sources[1])
    }

    /// Re-fill the slots from a saved record, then refresh.
    ///
    /// Ids that no longer exist in `table` are skipped and their slot is left
    /// as it was. The active slot ends on the last slot restored.
    pub fn restore_config<T: NodeTable + ?Sized>(&mut self, record: &MergerRecord, table: &mut T) {
        let node_a = record.node_a();
        let node_b = record.node_b();

        for id in table.processor_ids() {
            if Some(id) == node_a {
                info!(merger = %self.id, source = %id, "restoring merger source A");
                self.set_active_slot(Slot::A);
                self.assign_source(table, Some(id));
            }
            if Some(id) == node_b {
                info!(merger = %self.id, source = %id, "restoring merger source B");
                self.set_active_slot(Slot::B);
                self.assign_source(table, Some(id));
            }
        }

        self.refresh_metadata(&*table);
    }

    /// Write this merger's block into a session object.
    pub fn save_parameters(&self, parent: &mut Map<String, Value>) -> Result<()> {
        self.serialize_config().write_into(parent)
    }

    /// Restore from the merger block of a session object.
    ///
    /// Returns `Ok(false)` if the session has no merger block.
    pub fn load_parameters<T: NodeTable + ?Sized>(
        &mut self,
        parent: &Value,
        table: &mut T,
    ) -> Result<bool> {
        match MergerRecord::read_from(parent)? {
            Some(record) => {
                self.restore_config(&record, table);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[inline]
    pub fn settings(&self) -> &ProcessorSettings {
        &self.settings
    }

    #[inline]
    pub fn num_inputs(&self) -> usize {
        self.settings.num_inputs
    }
}

impl Processor for Merger {
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
        self.settings.origin
    }

    fn sample_rate(&self) -> f32 {
        self.settings.sample_rate
    }

    fn num_outputs(&self) -> usize {
        self.settings.num_outputs
    }

    fn dest_node(&self) -> Option<NodeId> {
        self.dest
    }

    fn set_dest_node(&mut self, dest: Option<NodeId>) {
        self.dest = dest;
    }
}
