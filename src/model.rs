// Normalized draw-history data model shared by every stage of the pipeline.

use serde::{Deserialize, Serialize};

/// One historical draw: a sequential contest number plus the numbers drawn.
///
/// Adapters only ever construct records that satisfy the game's invariants
/// (exact draw size, distinct numbers, all within `1..=universe_max`);
/// source rows that fail to parse into a valid record are dropped upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    /// Official contest ("concurso") number, unique per game.
    pub draw_number: u32,
    /// Drawn numbers in source order. Length is fixed per game.
    pub numbers: Vec<u8>,
}

impl DrawRecord {
    pub fn new(draw_number: u32, numbers: Vec<u8>) -> Self {
        Self {
            draw_number,
            numbers,
        }
    }
}

/// Full fetched history, ascending by draw number. Produced fresh per fetch
/// and owned by the caller; nothing in the crate retains it.
pub type DrawHistory = Vec<DrawRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_roundtrips_through_json() {
        let record = DrawRecord::new(2701, vec![4, 18, 29, 33, 41, 56]);
        let json = serde_json::to_string(&record).unwrap();
        let back: DrawRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
