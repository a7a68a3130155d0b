//! Entity ID generation.
//!
//! Snowflake-style i64 ids minted by a process-wide generator. Ids embed a
//! timestamp, so they sort by creation order, which the listing indexes
//! rely on.

use std::sync::OnceLock;

use folio_types::error::{Error, Result};
use idgenerator::IdGeneratorOptions;

/// Epoch the timestamp bits count from: 2024-01-01T00:00:00Z, ms
const ID_EPOCH_MS: i64 = 1_704_067_200_000;

/// Worker IDs use 10 bits
const MAX_WORKER_ID: u16 = 1023;

static WORKER_ID: OnceLock<u16> = OnceLock::new();

/// Process-wide Snowflake ID generator
pub struct IdGenerator;

impl IdGenerator {
    /// Configure the generator; call once at startup, before any `next_id`
    ///
    /// A second call is a no-op keeping the first worker ID. The worker ID
    /// only matters when several instances mint ids against the same store.
    pub fn init(worker_id: u16) -> Result<()> {
        if worker_id > MAX_WORKER_ID {
            return Err(Error::config(format!(
                "Worker ID must be at most {MAX_WORKER_ID}, got {worker_id}"
            )));
        }

        WORKER_ID.get_or_init(|| {
            let options = IdGeneratorOptions::new()
                .worker_id(worker_id.into())
                .worker_id_bit_len(10)
                .base_time(ID_EPOCH_MS);

            // Initialization failure at startup is unrecoverable
            #[allow(clippy::expect_used)]
            idgenerator::IdInstance::init(options).expect("ID generator setup failed");
            worker_id
        });

        Ok(())
    }

    /// Mint the next ID
    ///
    /// # Panics
    ///
    /// Panics when called before [`IdGenerator::init`].
    pub fn next_id() -> i64 {
        idgenerator::IdInstance::next_id()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    // Tests share the process-wide generator, so init results are ignored;
    // whichever test runs first wins the worker ID.

    #[test]
    fn test_out_of_range_worker_id_is_rejected() {
        assert!(IdGenerator::init(MAX_WORKER_ID + 1).is_err());
        let _ = IdGenerator::init(MAX_WORKER_ID);
    }

    #[test]
    fn test_ids_are_positive_and_distinct() {
        let _ = IdGenerator::init(1);

        let a = IdGenerator::next_id();
        let b = IdGenerator::next_id();
        assert!(a > 0);
        assert!(b > 0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_ids_are_strictly_increasing() {
        let _ = IdGenerator::init(1);

        let ids: Vec<i64> = (0..500).map(|_| IdGenerator::next_id()).collect();
        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0], "{} should exceed {}", pair[1], pair[0]);
        }
    }

    #[test]
    fn test_no_duplicates_in_a_burst() {
        let _ = IdGenerator::init(1);

        let mut seen = HashSet::new();
        for _ in 0..2000 {
            assert!(seen.insert(IdGenerator::next_id()));
        }
    }
}
