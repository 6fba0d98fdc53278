use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::ConfigurationError;

/// Length of the repeated window used by `AccessPattern::Looping`
pub const LOOP_LENGTH: u64 = 16;

/// Random addresses are drawn from this many distinct strides
pub const RANDOM_SLOTS: u64 = 256;

/// The synthetic access patterns used to drive a hierarchy
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AccessPattern {
    /// 0, stride, 2 * stride, ... with no reuse
    Sequential,
    /// The first `LOOP_LENGTH` strides, repeated
    Looping,
    /// Uniformly chosen from the first `RANDOM_SLOTS` strides
    Random,
}

impl AccessPattern {
    pub fn name(&self) -> &'static str {
        match self {
            AccessPattern::Sequential => "sequential",
            AccessPattern::Looping => "looping",
            AccessPattern::Random => "random",
        }
    }
}

/// Generates `size` addresses following a pattern
///
/// Only `Random` draws from the generator, seed it for reproducible runs
///
/// # Arguments
///
/// * `pattern`: The access pattern
/// * `size`: How many addresses to generate
/// * `stride`: Distance in bytes between neighbouring slots, usually the block size
/// * `rng`: Source of randomness for `Random`
///
/// returns: Result<Vec<u64>, ConfigurationError>, failing if the highest address the pattern
/// could produce doesn't fit in a u64
///
/// # Examples
///
/// ```
/// use hierlib::workload::{generate_workload, AccessPattern};
/// let mut rng = fastrand::Rng::with_seed(7);
/// assert_eq!(generate_workload(AccessPattern::Sequential, 4, 8, &mut rng).unwrap(), vec![0, 8, 16, 24]);
/// ```
pub fn generate_workload(
    pattern: AccessPattern,
    size: usize,
    stride: u64,
    rng: &mut fastrand::Rng,
) -> Result<Vec<u64>, ConfigurationError> {
    let slots = match pattern {
        AccessPattern::Sequential => size as u64,
        AccessPattern::Looping => (size as u64).min(LOOP_LENGTH),
        AccessPattern::Random if size == 0 => 0,
        AccessPattern::Random => RANDOM_SLOTS,
    };
    // Every address is at most (slots - 1) * stride
    if slots.saturating_sub(1).checked_mul(stride).is_none() {
        return Err(ConfigurationError::WorkloadOverflow { pattern, size, stride });
    }
    Ok(match pattern {
        AccessPattern::Sequential => (0..size as u64).map(|i| i * stride).collect(),
        AccessPattern::Looping => (0..size as u64).map(|i| (i % LOOP_LENGTH) * stride).collect(),
        AccessPattern::Random => (0..size).map(|_| rng.u64(0..RANDOM_SLOTS) * stride).collect(),
    })
}

impl FromStr for AccessPattern {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(AccessPattern::Sequential),
            "looping" => Ok(AccessPattern::Looping),
            "random" => Ok(AccessPattern::Random),
            _ => Err(ConfigurationError::UnknownWorkloadPattern(s.to_string())),
        }
    }
}

impl TryFrom<String> for AccessPattern {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccessPattern> for String {
    fn from(value: AccessPattern) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for AccessPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
