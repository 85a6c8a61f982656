// Ticket suggestion: constrained randomized construction seeded by the
// frequency anchors and biased toward primes.
//
// The random source is injected so callers control determinism; the binary
// passes `rand::rng()`, tests pass a seeded `StdRng`.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Suggestion
// ---------------------------------------------------------------------------

/// A suggested ticket. `numbers` is sorted ascending and duplicate-free;
/// `requested` records the size asked for so an under-filled ticket is
/// visibly degraded rather than silently passed off as complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub numbers: Vec<u8>,
    pub requested: usize,
}

impl Suggestion {
    /// How many numbers short of the request this ticket is. Non-zero only
    /// when `requested` exceeded the universe size.
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.numbers.len())
    }

    pub fn is_short(&self) -> bool {
        self.shortfall() > 0
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Build a ticket of `target_size` distinct numbers in `1..=universe_max`.
///
/// 1. Seed with the anchors as a set: `most_common` first, then
///    `least_common`, each inserted only while the ticket is below the
///    target (most-common outranks least-common for tiny targets).
/// 2. Add up to 2 primes, shuffled uniformly from the pool minus the
///    ticket.
/// 3. Fill from the shuffled remaining universe until the target is
///    reached or the universe is exhausted.
///
/// Precondition (caller's job): `target_size` lies within the game's ticket
/// bounds. If it exceeds `universe_max` the ticket comes back short, with
/// the deficit visible via `Suggestion::shortfall`.
pub fn suggest_ticket<R: Rng + ?Sized>(
    most_common: &[u8],
    least_common: &[u8],
    prime_pool: &[u8],
    universe_max: u8,
    target_size: usize,
    rng: &mut R,
) -> Suggestion {
    let mut ticket: BTreeSet<u8> = BTreeSet::new();

    for &anchor in most_common.iter().chain(least_common) {
        if ticket.len() >= target_size {
            break;
        }
        ticket.insert(anchor);
    }

    // Up to 2 primes not already on the ticket, chosen uniformly.
    let mut primes: Vec<u8> = prime_pool
        .iter()
        .copied()
        .filter(|p| !ticket.contains(p))
        .collect();
    primes.shuffle(rng);
    for prime in primes.into_iter().take(2) {
        if ticket.len() >= target_size {
            break;
        }
        ticket.insert(prime);
    }

    // Uniform fill from the rest of the universe.
    let mut remaining: Vec<u8> = (1..=universe_max).filter(|n| !ticket.contains(n)).collect();
    remaining.shuffle(rng);
    for number in remaining {
        if ticket.len() >= target_size {
            break;
        }
        ticket.insert(number);
    }

    Suggestion {
        numbers: ticket.into_iter().collect(),
        requested: target_size,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const MEGA_PRIMES: [u8; 17] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59];

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn assert_valid(ticket: &Suggestion, universe_max: u8) {
        assert!(
            ticket.numbers.windows(2).all(|w| w[0] < w[1]),
            "not sorted/distinct: {:?}",
            ticket.numbers
        );
        assert!(ticket.numbers.iter().all(|&n| n >= 1 && n <= universe_max));
    }

    #[test]
    fn exact_size_and_anchors_included() {
        for seed in 0..50 {
            let ticket = suggest_ticket(&[2, 4], &[9], &MEGA_PRIMES, 60, 6, &mut rng(seed));

            assert_eq!(ticket.numbers.len(), 6);
            assert!(!ticket.is_short());
            assert_valid(&ticket, 60);
            for anchor in [2, 4, 9] {
                assert!(ticket.numbers.contains(&anchor), "missing anchor {anchor}");
            }
        }
    }

    #[test]
    fn prime_bias_fills_with_primes_when_room_allows() {
        // Anchors take 3 slots of 5; both remaining slots must be primes
        // because the prime step runs before the uniform fill.
        for seed in 0..50 {
            let ticket = suggest_ticket(&[2, 4], &[9], &MEGA_PRIMES, 60, 5, &mut rng(seed));

            let non_anchor: Vec<u8> = ticket
                .numbers
                .iter()
                .copied()
                .filter(|n| ![2, 4, 9].contains(n))
                .collect();
            assert_eq!(non_anchor.len(), 2);
            for n in non_anchor {
                assert!(MEGA_PRIMES.contains(&n), "expected prime, got {n}");
            }
        }
    }

    #[test]
    fn overlapping_anchors_use_set_semantics() {
        // most_common and least_common share 7; anchors contribute 2, not 3.
        let ticket = suggest_ticket(&[7, 11], &[7], &MEGA_PRIMES, 60, 6, &mut rng(1));

        assert_eq!(ticket.numbers.len(), 6);
        assert_valid(&ticket, 60);
        assert!(ticket.numbers.contains(&7));
        assert!(ticket.numbers.contains(&11));
    }

    #[test]
    fn full_universe_when_target_equals_universe() {
        let ticket = suggest_ticket(&[2, 4], &[9], &[2, 3, 5, 7, 11, 13], 15, 15, &mut rng(3));
        assert_eq!(ticket.numbers, (1..=15).collect::<Vec<u8>>());
        assert!(!ticket.is_short());
    }

    #[test]
    fn oversized_target_reports_shortfall() {
        let ticket = suggest_ticket(&[], &[], &[2, 3, 5, 7], 10, 12, &mut rng(4));

        assert_eq!(ticket.numbers, (1..=10).collect::<Vec<u8>>());
        assert_eq!(ticket.requested, 12);
        assert!(ticket.is_short());
        assert_eq!(ticket.shortfall(), 2);
    }

    #[test]
    fn no_anchors_still_builds_full_ticket() {
        // Empty history produces no anchors; the ticket is primes + fill.
        for seed in 0..20 {
            let ticket = suggest_ticket(&[], &[], &MEGA_PRIMES, 60, 6, &mut rng(seed));
            assert_eq!(ticket.numbers.len(), 6);
            assert_valid(&ticket, 60);
        }
    }

    #[test]
    fn most_common_outranks_least_common_for_tiny_targets() {
        // Target smaller than the anchor set: most-common seeds first.
        let ticket = suggest_ticket(&[10, 20], &[30], &[], 60, 2, &mut rng(5));
        assert_eq!(ticket.numbers, vec![10, 20]);
        assert!(!ticket.numbers.contains(&30));
        assert!(!ticket.is_short());
    }

    #[test]
    fn small_universe_anchors_always_present() {
        for seed in 0..50 {
            let ticket =
                suggest_ticket(&[2, 4], &[9], &[2, 3, 5, 7, 11, 13], 15, 6, &mut rng(seed));

            assert_eq!(ticket.numbers.len(), 6);
            assert_valid(&ticket, 15);
            for anchor in [2, 4, 9] {
                assert!(ticket.numbers.contains(&anchor), "missing anchor {anchor}");
            }
        }
    }

    #[test]
    fn same_seed_same_ticket() {
        let a = suggest_ticket(&[2, 4], &[9], &MEGA_PRIMES, 60, 10, &mut rng(42));
        let b = suggest_ticket(&[2, 4], &[9], &MEGA_PRIMES, 60, 10, &mut rng(42));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_prime_pool_is_fine() {
        let ticket = suggest_ticket(&[2, 4], &[9], &[], 60, 6, &mut rng(6));
        assert_eq!(ticket.numbers.len(), 6);
        assert_valid(&ticket, 60);
    }

    #[test]
    fn lotofacil_shape_ticket() {
        let primes = [2, 3, 5, 7, 11, 13, 17, 19, 23];
        for seed in 0..20 {
            let ticket = suggest_ticket(&[5, 20], &[13], &primes, 25, 15, &mut rng(seed));
            assert_eq!(ticket.numbers.len(), 15);
            assert_valid(&ticket, 25);
            for anchor in [5, 20, 13] {
                assert!(ticket.numbers.contains(&anchor));
            }
        }
    }
}
