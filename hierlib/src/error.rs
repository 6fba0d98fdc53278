use std::fmt;
use std::io;
use crate::workload::AccessPattern;

/// Raised when a cache level, hierarchy, or workload cannot be built from the values given
///
/// Degenerate geometries are rejected up front, a cache with zero sets would make every access
/// undefined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    UnknownReplacementPolicy(String),
    UnknownWorkloadPattern(String),
    ZeroBlockSize,
    ZeroAssociativity,
    UnevenCapacity {
        size: u64,
        block_size: u64,
        associativity: u64,
    },
    NoSets {
        size: u64,
        block_size: u64,
        associativity: u64,
    },
    /// The highest generated address would not fit in 64 bits
    WorkloadOverflow {
        pattern: AccessPattern,
        size: usize,
        stride: u64,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::UnknownReplacementPolicy(name) => {
                write!(f, "Unknown replacement policy {name:?}, expected LRU or FIFO")
            }
            ConfigurationError::UnknownWorkloadPattern(name) => {
                write!(f, "Unknown workload pattern {name:?}, expected sequential, looping, or random")
            }
            ConfigurationError::ZeroBlockSize => f.write_str("Block size must be at least one byte"),
            ConfigurationError::ZeroAssociativity => f.write_str("Associativity must be at least one way"),
            ConfigurationError::UnevenCapacity { size, block_size, associativity } => write!(
                f,
                "Capacity of {size} bytes is not a multiple of block size {block_size} * associativity {associativity}"
            ),
            ConfigurationError::NoSets { size, block_size, associativity } => write!(
                f,
                "Capacity of {size} bytes is too small for a single set of {associativity} ways of {block_size} bytes"
            ),
            ConfigurationError::WorkloadOverflow { pattern, size, stride } => write!(
                f,
                "A {pattern} workload of {size} addresses with stride {stride} overflows a 64 bit address"
            ),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Raised when reading an address trace
#[derive(Debug)]
pub enum TraceError {
    Io(io::Error),
    /// A line which isn't blank, a comment, or an address. Lines are numbered from 1
    Parse { line: usize, text: String },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Io(e) => write!(f, "Couldn't read the trace: {e}"),
            TraceError::Parse { line, text } => write!(f, "Couldn't parse an address on line {line}: {text:?}"),
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceError::Io(e) => Some(e),
            TraceError::Parse { .. } => None,
        }
    }
}

impl From<io::Error> for TraceError {
    fn from(value: io::Error) -> Self {
        TraceError::Io(value)
    }
}
