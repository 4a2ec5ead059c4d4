use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use uuid::Uuid;

/// Hierarchy level a chain id is minted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainLevel {
    Root,
    Regional,
    Branch,
    Manager,
}

impl ChainLevel {
    pub fn prefix(self) -> &'static str {
        match self {
            ChainLevel::Root => "RT",
            ChainLevel::Regional => "RM",
            ChainLevel::Branch => "BM",
            ChainLevel::Manager => "MG",
        }
    }
}

/// Source of record and chain identifiers.
///
/// Injected so the allocation logic stays deterministic under test; the
/// production generator is UUID-backed, tests swap in a counter.
pub trait IdGenerator: Send + Sync {
    fn record_id(&self) -> Uuid;
    fn chain_id(&self, level: ChainLevel) -> String;
}

pub type SharedIdGenerator = Arc<dyn IdGenerator>;

/// UUID v4 generator used in production.
#[derive(Debug, Default, Clone)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn record_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    fn chain_id(&self, level: ChainLevel) -> String {
        format!("{}-{}", level.prefix(), Uuid::new_v4().simple())
    }
}

/// Monotonic counter generator for deterministic tests.
#[derive(Debug, Default)]
pub struct SequenceIdGenerator {
    next: AtomicU64,
}

impl IdGenerator for SequenceIdGenerator {
    fn record_id(&self) -> Uuid {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        Uuid::from_u128(n as u128)
    }

    fn chain_id(&self, level: ChainLevel) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{:06}", level.prefix(), n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_generator_is_monotonic() {
        let ids = SequenceIdGenerator::default();
        let a = ids.chain_id(ChainLevel::Root);
        let b = ids.chain_id(ChainLevel::Regional);
        assert!(a.starts_with("RT-"));
        assert!(b.starts_with("RM-"));
        assert_ne!(a, b);
    }

    #[test]
    fn uuid_generator_prefixes_by_level() {
        let ids = UuidIdGenerator;
        assert!(ids.chain_id(ChainLevel::Branch).starts_with("BM-"));
        assert!(ids.chain_id(ChainLevel::Manager).starts_with("MG-"));
        assert_ne!(
            ids.chain_id(ChainLevel::Root),
            ids.chain_id(ChainLevel::Root)
        );
    }
}
