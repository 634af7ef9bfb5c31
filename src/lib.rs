//! Merger - two-source routing node for neural data acquisition graphs
//!
//! A [`Merger`](nodes::Merger) sits in a host processor graph with two
//! upstream sources attached to its slots A and B. It reports one of them
//! as the active source and publishes the combined channel metadata of
//! both to whatever sits downstream.
//!
//! Design principles:
//! - Sources are referenced by [`NodeId`], never owned
//! - The host graph is reached only through the [`NodeTable`] trait
//! - Host defaults are injected, not read from globals
//! - Metadata is rebuilt wholesale on every refresh

mod channel;
mod config;
mod error;
mod graph;
mod node;
pub mod nodes;
pub mod session;

pub use channel::{ChannelDescriptor, ChannelKind};
pub use config::HostDefaults;
pub use error::{MergerError, Result};
pub use graph::{NodeTable, ProcessorGraph};
pub use node::{AsAny, NodeId, Processor, ProcessorSettings};
pub use session::MergerRecord;
