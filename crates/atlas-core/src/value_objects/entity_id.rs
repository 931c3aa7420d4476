//! Entity ID - 64-bit unique identifier for every business row
//!
//! Structure:
//! - Bits 63-22: Timestamp (milliseconds since custom epoch)
//! - Bits 21-12: Node ID (0-1023)
//! - Bits 11-0:  Sequence number (0-4095)

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// 64-bit entity identifier
///
/// Serialized as a plain JSON number so command payloads can carry ids
/// directly (e.g. `{"parentId": 2}`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    /// Custom epoch: 2024-01-01 00:00:00 UTC (milliseconds)
    pub const EPOCH: i64 = 1704067200000;

    /// Create an EntityId from a raw i64 value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Check if the id is zero (uninitialized)
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Extract timestamp (milliseconds since Unix epoch)
    ///
    /// Only meaningful for generated ids; externally supplied values may
    /// carry arbitrary bits.
    #[inline]
    pub fn timestamp(&self) -> i64 {
        (self.0 >> 22) + Self::EPOCH
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, EntityIdParseError> {
        s.parse::<i64>()
            .map(EntityId)
            .map_err(|_| EntityIdParseError::InvalidFormat)
    }
}

/// Error when parsing an EntityId from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EntityIdParseError {
    #[error("invalid entity id format")]
    InvalidFormat,
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl std::str::FromStr for EntityId {
    type Err = EntityIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityId::parse(s)
    }
}

/// Thread-safe EntityId generator
///
/// Generates unique ids at up to 4096 per millisecond per node. Generator
/// state sits behind a `parking_lot::Mutex`; id allocation is nowhere near
/// a contention hot path in this service.
pub struct EntityIdGenerator {
    node_id: u16,
    state: Mutex<GeneratorState>,
}

#[derive(Default)]
struct GeneratorState {
    last_timestamp: i64,
    sequence: i64,
}

impl EntityIdGenerator {
    /// Create a new generator with the given node ID
    ///
    /// # Panics
    /// Panics if node_id >= 1024
    pub fn new(node_id: u16) -> Self {
        assert!(node_id < 1024, "Node ID must be < 1024");
        Self {
            node_id,
            state: Mutex::new(GeneratorState::default()),
        }
    }

    /// Generate a new unique EntityId
    pub fn generate(&self) -> EntityId {
        let mut state = self.state.lock();
        let mut timestamp = current_timestamp();

        // Clock moved backwards, wait for it to catch up
        while timestamp < state.last_timestamp {
            std::hint::spin_loop();
            timestamp = current_timestamp();
        }

        if timestamp == state.last_timestamp {
            state.sequence = (state.sequence + 1) & 0xFFF;
            if state.sequence == 0 {
                // Sequence exhausted for this millisecond
                while timestamp <= state.last_timestamp {
                    std::hint::spin_loop();
                    timestamp = current_timestamp();
                }
            }
        } else {
            state.sequence = 0;
        }
        state.last_timestamp = timestamp;

        EntityId::new(
            ((timestamp - EntityId::EPOCH) << 22)
                | (i64::from(self.node_id) << 12)
                | state.sequence,
        )
    }

    /// Get the node ID of this generator
    pub fn node_id(&self) -> u16 {
        self.node_id
    }
}

/// Current timestamp in milliseconds since Unix epoch
#[inline]
fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

impl Default for EntityIdGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}
