//! Host graph surface - node lookup and downstream wiring

use core::mem;

use hashbrown::HashMap;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;
use tracing::debug;

use crate::error::{MergerError, Result};
use crate::channel::ChannelDescriptor;
use crate::node::{NodeId, Processor};

/// What a merger needs from the graph that hosts it.
///
/// Mergers never hold references to their sources, only [`NodeId`]s, and
/// go through this trait whenever they need to look at one.
pub trait NodeTable {
    /// Look up a live node by id.
    fn resolve(&self, id: NodeId) -> Option<&dyn Processor>;

    /// Ids of every node in the graph, in insertion order.
    fn processor_ids(&self) -> Vec<NodeId>;

    /// Record that `source` now sends its output to `dest`.
    ///
    /// Returns false if `source` is not in the graph.
    fn attach_destination(&mut self, source: NodeId, dest: NodeId) -> bool;
}

type InnerGraph = StableDiGraph<Box<dyn Processor>, ()>;

/// A minimal in-memory processor graph.
///
/// Nodes are boxed [`Processor`]s keyed by their own id. An edge is kept
/// from each node to its current destination whenever both ends live in
/// the graph.
pub struct ProcessorGraph {
    graph: InnerGraph,
    node_indices: HashMap<NodeId, NodeIndex>,
    order: Vec<NodeId>,
    next_node_id: u32,
}

impl ProcessorGraph {
    pub fn new() -> Self {
        Self {
            graph: InnerGraph::with_capacity(64, 64),
            node_indices: HashMap::new(),
            order: Vec::new(),
            next_node_id: 0,
        }
    }

    /// An id no node in this graph has used yet.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.next_node_id)
    }

    /// Add a node under its own id.
    pub fn add<P: Processor + 'static>(&mut self, node: P) -> Result<NodeId> {
        let id = node.node_id();
        if self.node_indices.contains_key(&id) {
            return Err(MergerError::DuplicateNode(id));
        }

        let dest = node.dest_node();
        let idx = self.graph.add_node(Box::new(node));
        self.node_indices.insert(id, idx);
        self.order.push(id);
        self.next_node_id = self.next_node_id.max(id.0.saturating_add(1));

        // Wire up nodes that were already pointed at this one
        let upstream: Vec<NodeIndex> = self
            .node_indices
            .values()
            .copied()
            .filter(|&other| other != idx && self.graph[other].dest_node() == Some(id))
            .collect();
        for other in upstream {
            self.graph.add_edge(other, idx, ());
        }

        if let Some(&dest_idx) = dest.and_then(|d| self.node_indices.get(&d)) {
            self.graph.add_edge(idx, dest_idx, ());
        }

        debug!(node = %id, "added node to graph");
        Ok(id)
    }

    /// Remove a node, returning it. Edges touching it go with it.
    pub fn remove(&mut self, id: NodeId) -> Option<Box<dyn Processor>> {
        let idx = self.node_indices.remove(&id)?;
        self.order.retain(|&other| other != id);
        self.graph.remove_node(idx)
    }

    pub fn get(&self, id: NodeId) -> Option<&dyn Processor> {
        let idx = *self.node_indices.get(&id)?;
        self.graph.node_weight(idx).map(|node| &**node)
    }

    /// Run `f` on node `id` as its concrete type, with the rest of the graph
    /// still usable as a [`NodeTable`].
    ///
    /// The node is lifted out for the duration of the call and a blank
    /// stand-in with no channels holds its place and edges. Destination
    /// changes made to the stand-in are carried back to the node. Returns
    /// `None` if `id` is not in the graph or is not a `P`.
    pub fn with_node<P, R>(&mut self, id: NodeId, f: impl FnOnce(&mut P, &mut Self) -> R) -> Option<R>
    where
        P: Processor + 'static,
    {
        let idx = *self.node_indices.get(&id)?;
        if !(*self.graph[idx]).as_any().is::<P>() {
            return None;
        }

        let seeded = self.graph[idx].dest_node();
        let mut node = mem::replace(&mut self.graph[idx], Box::new(Vacant { id, dest: seeded }));
        let result = (*node)
            .as_any_mut()
            .downcast_mut::<P>()
            .map(|typed| f(typed, self));

        // The stand-in is only swapped back if it is still the one we left
        match self.graph.node_weight_mut(idx) {
            Some(slot)
                if self.node_indices.get(&id) == Some(&idx) && (**slot).as_any().is::<Vacant>() =>
            {
                let dest = slot.dest_node();
                if dest != seeded {
                    node.set_dest_node(dest);
                }
                *slot = node;
            }
            _ => debug!(node = %id, "node left the graph while borrowed"),
        }
        result
    }

    /// The node `id` has an edge to, if its destination lives in this graph.
    pub fn downstream_of(&self, id: NodeId) -> Option<NodeId> {
        let idx = *self.node_indices.get(&id)?;
        self.graph
            .neighbors_directed(idx, Direction::Outgoing)
            .next()
            .map(|next| self.graph[next].node_id())
    }

    /// Every node with an edge into `id`, in no particular order.
    pub fn upstream_of(&self, id: NodeId) -> Vec<NodeId> {
        match self.node_indices.get(&id) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .map(|prev| self.graph[prev].node_id())
                .collect(),
            None => Vec::new(),
        }
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node_indices.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for ProcessorGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTable for ProcessorGraph {
    fn resolve(&self, id: NodeId) -> Option<&dyn Processor> {
        self.get(id)
    }

    fn processor_ids(&self) -> Vec<NodeId> {
        self.order.clone()
    }

    fn attach_destination(&mut self, source: NodeId, dest: NodeId) -> bool {
        let src_idx = match self.node_indices.get(&source) {
            Some(&idx) => idx,
            None => return false,
        };

        // A node feeds exactly one destination
        let stale: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(src_idx, Direction::Outgoing)
            .collect();
        for target in stale {
            if let Some(edge) = self.graph.find_edge(src_idx, target) {
                self.graph.remove_edge(edge);
            }
        }

        if let Some(&dest_idx) = self.node_indices.get(&dest) {
            self.graph.add_edge(src_idx, dest_idx, ());
        }
        self.graph[src_idx].set_dest_node(Some(dest));

        debug!(source = %source, dest = %dest, "attached destination");
        true
    }
}

/// Placeholder for a node borrowed out by [`ProcessorGraph::with_node`].
struct Vacant {
    id: NodeId,
    dest: Option<NodeId>,
}

impl Processor for Vacant {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &str {
        "Vacant"
    }

    fn continuous_channels(&self) -> &[ChannelDescriptor] {
        &[]
    }

    fn event_channels(&self) -> &[ChannelDescriptor] {
        &[]
    }

    fn origin(&self) -> Option<NodeId> {
        None
    }

    fn sample_rate(&self) -> f32 {
        0.0
    }

    fn dest_node(&self) -> Option<NodeId> {
        self.dest
    }

    fn set_dest_node(&mut self, dest: Option<NodeId>) {
        self.dest = dest;
    }
}
