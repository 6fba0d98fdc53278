//! # HierLib
//!
//! HierLib is a library for simulating a two level set-associative cache hierarchy on read-only
//! address streams
//!
//! It provides a cache level parameterised by a replacement policy (LRU or FIFO), a simulator
//! composing an L1, an L2, and main memory which reports hit rates and average memory access time,
//! and the workload generation and configuration sweeps used to compare hierarchies
//!
//! Simulation is deterministic: the same configuration and address sequence always produce the
//! same statistics

/// Contains the bounded/unbounded access log used by levels and the hierarchy
pub mod access_log;

/// Contains the cache block and the set-associative cache level
pub mod cache;

/// Contains definitions for the JSON configuration formats
pub mod config;

/// Contains the error types
pub mod error;

/// Contains trace reading and CSV output
pub mod io;

/// Contains the provided replacement policies
pub mod replacement_policies;

/// Contains the two level simulator
pub mod simulator;

/// Contains the configuration sweep used to compare hierarchies
pub mod sweep;

/// Contains the synthetic workload generator
pub mod workload;

#[cfg(test)]
mod test;
