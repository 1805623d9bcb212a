//! # Identifier Generation
//!
//! Item ids are 24 lowercase hex characters laid out like a database object
//! id: a 4-byte timestamp, 5 bytes of per-generator randomness and a 3-byte
//! rolling counter. Ids from one generator never repeat until the counter
//! wraps within the same second.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::item::ItemId;
use crate::random::ChaChaRandom;

/// Produces globally unique item ids on demand.
pub trait IdSource {
    /// Returns a fresh id.
    fn next_id(&mut self) -> ItemId;
}

/// Object-id style generator.
#[derive(Clone, Debug)]
pub struct ObjectIdGenerator {
    /// Random bytes fixed for the generator's lifetime.
    process_unique: [u8; 5],
    /// Rolling counter, only the low 24 bits are used.
    counter: u32,
}

impl ObjectIdGenerator {
    /// Creates a generator seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self::from_random(&mut ChaChaRandom::from_entropy())
    }

    /// Creates a generator whose random parts derive from `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_random(&mut ChaChaRandom::from_seed(seed))
    }

    fn from_random(rng: &mut ChaChaRandom) -> Self {
        let mut process_unique = [0u8; 5];
        rng.fill_bytes(&mut process_unique);
        let mut counter_bytes = [0u8; 4];
        rng.fill_bytes(&mut counter_bytes);

        Self {
            process_unique,
            counter: u32::from_le_bytes(counter_bytes) & 0x00FF_FFFF,
        }
    }

    fn timestamp() -> u32 {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());
        u32::try_from(secs).unwrap_or(u32::MAX)
    }
}

impl Default for ObjectIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for ObjectIdGenerator {
    fn next_id(&mut self) -> ItemId {
        self.counter = (self.counter + 1) & 0x00FF_FFFF;

        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&Self::timestamp().to_be_bytes());
        bytes[4..9].copy_from_slice(&self.process_unique);
        bytes[9..12].copy_from_slice(&self.counter.to_be_bytes()[1..4]);

        ItemId::new(bytes.iter().map(|byte| format!("{byte:02x}")).collect::<String>())
    }
}
