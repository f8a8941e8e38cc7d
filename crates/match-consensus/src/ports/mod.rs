//! Ports for the consensus aggregation subsystem

pub mod inbound;

pub use inbound::ConsensusApi;
