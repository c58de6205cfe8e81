use crc32fast::Hasher;
use uuid::Uuid;

use crate::path::PATH_SEPARATOR;

/// Derive a short, stable seed from a name (proposal id, file path) using CRC32
pub fn get_seed(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Identifier source for sections, blocks and columns
///
/// Identifiers never contain `.`, which is reserved as the path separator.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    strategy: Strategy,
}

#[derive(Debug, Clone)]
enum Strategy {
    /// Random v4 UUIDs
    Random,

    /// `<seed>-<count>`, reproducible across runs
    Sequential { seed: String, count: u64 },
}

impl IdGenerator {
    pub fn random() -> Self {
        Self {
            strategy: Strategy::Random,
        }
    }

    /// Sequential generator seeded from the CRC32 of `name`
    pub fn sequential(name: &str) -> Self {
        Self::from_seed(get_seed(name))
    }

    /// Sequential generator with an explicit seed; separators in the seed
    /// become `-`
    pub fn from_seed(seed: String) -> Self {
        let seed = seed.replace(PATH_SEPARATOR, "-");
        Self {
            strategy: Strategy::Sequential { seed, count: 0 },
        }
    }

    /// Generate the next identifier
    pub fn new_id(&mut self) -> String {
        match &mut self.strategy {
            Strategy::Random => Uuid::new_v4().to_string(),
            Strategy::Sequential { seed, count } => {
                *count += 1;
                format!("{}-{}", seed, count)
            }
        }
    }

    /// Seed of a sequential generator
    pub fn seed(&self) -> Option<&str> {
        match &self.strategy {
            Strategy::Random => None,
            Strategy::Sequential { seed, .. } => Some(seed),
        }
    }

    /// Advance a sequential generator past every identifier it could have
    /// produced among `existing`, so a reloaded document never sees a reused id.
    pub fn reserve<'a>(&mut self, existing: impl IntoIterator<Item = &'a str>) {
        let Strategy::Sequential { seed, count } = &mut self.strategy else {
            return;
        };

        for id in existing {
            let issued = id
                .strip_prefix(seed.as_str())
                .and_then(|rest| rest.strip_prefix('-'))
                .and_then(|n| n.parse::<u64>().ok());

            if let Some(n) = issued {
                *count = (*count).max(n);
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::random()
    }
}
