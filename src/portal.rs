use std::{iter::StepBy, ops::RangeInclusive};

use clap::ValueEnum;
use serde::Deserialize;

/// How an exit with divisibility modulus `0` is interpreted.
#[derive(Debug, ValueEnum, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZeroModulus {
    /// The exit reaches no node at all.
    #[default]
    Unreachable,
    /// The exit reaches every node of its range, like a zero entry modulus.
    Unconstrained,
}

/// A one-shot connector from the nodes admitted by its entry to the nodes
/// reached by its exit.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Portal {
    pub a1: i64,
    pub l1: i64,
    pub r1: i64,
    pub a2: i64,
    pub l2: i64,
    pub r2: i64,
}

pub type Candidates = StepBy<RangeInclusive<usize>>;

#[allow(clippy::reversed_empty_ranges)]
fn nothing() -> Candidates {
    (1..=0).step_by(1)
}

/// Multiples of `modulus` inside `[lo, hi] ∩ [1, nodes]`, in increasing order.
fn aligned(modulus: i64, lo: i64, hi: i64, nodes: usize, zero: ZeroModulus) -> Candidates {
    let lo = lo.max(1);
    let hi = hi.min(i64::try_from(nodes).unwrap_or(i64::MAX));
    if lo > hi {
        return nothing();
    }
    let (first, step) = match modulus {
        m if m < 0 => return nothing(),
        0 => match zero {
            ZeroModulus::Unreachable => return nothing(),
            ZeroModulus::Unconstrained => (lo, 1),
        },
        _ => {
            let rem = lo % modulus;
            let first = if rem == 0 {
                Some(lo)
            } else {
                (lo - rem).checked_add(modulus)
            };
            match first {
                Some(first) if first <= hi => (first, modulus),
                _ => return nothing(),
            }
        }
    };
    // both bounds lie in [1, nodes] here
    (first as usize..=hi as usize).step_by(usize::try_from(step).unwrap_or(usize::MAX))
}

impl Portal {
    pub fn admits(&self, v: usize) -> bool {
        let v = v as i64;
        self.l1 <= v && v <= self.r1 && (self.a1 == 0 || v % self.a1 == 0)
    }

    /// Ordinary nodes admitted by the entry. A zero entry modulus never
    /// constrains.
    pub fn entries(&self, nodes: usize) -> Candidates {
        aligned(self.a1, self.l1, self.r1, nodes, ZeroModulus::Unconstrained)
    }

    /// Ordinary nodes reached by the exit, smallest first.
    pub fn exits(&self, nodes: usize, zero: ZeroModulus) -> Candidates {
        aligned(self.a2, self.l2, self.r2, nodes, zero)
    }

    pub fn negative_modulus(&self) -> Option<i64> {
        [self.a1, self.a2].into_iter().find(|a| *a < 0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn portal(a1: i64, l1: i64, r1: i64, a2: i64, l2: i64, r2: i64) -> Portal {
        Portal {
            a1,
            l1,
            r1,
            a2,
            l2,
            r2,
        }
    }

    #[test]
    fn zero_entry_modulus_admits_whole_range() {
        let p = portal(0, 3, 7, 1, 1, 1);
        assert!((3..=7).all(|v| p.admits(v)));
        assert!(!p.admits(2));
        assert!(!p.admits(8));
        assert_eq!(p.entries(10).collect::<Vec<_>>(), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn entry_divisibility() {
        let p = portal(3, 1, 20, 1, 1, 1);
        let admitted: Vec<_> = (1..=20).filter(|v| p.admits(*v)).collect();
        assert_eq!(admitted, vec![3, 6, 9, 12, 15, 18]);
        assert_eq!(p.entries(10).collect::<Vec<_>>(), vec![3, 6, 9]);
    }

    #[test]
    fn exits_are_aligned_and_clamped() {
        let p = portal(1, 1, 1, 4, -10, 30);
        assert_eq!(p.exits(13, ZeroModulus::Unreachable).collect::<Vec<_>>(), vec![4, 8, 12]);
        let p = portal(1, 1, 1, 5, 6, 100);
        assert_eq!(p.exits(20, ZeroModulus::Unreachable).collect::<Vec<_>>(), vec![10, 15, 20]);
    }

    #[test]
    fn exit_without_multiple_in_range_is_empty() {
        let p = portal(1, 1, 1, 7, 8, 13);
        assert_eq!(p.exits(100, ZeroModulus::Unreachable).count(), 0);
        let p = portal(1, 1, 1, i64::MAX, 2, 50);
        assert_eq!(p.exits(100, ZeroModulus::Unreachable).count(), 0);
        let p = portal(1, 1, 1, 2, 9, 3);
        assert_eq!(p.exits(100, ZeroModulus::Unconstrained).count(), 0);
    }

    #[test]
    fn zero_exit_modulus_follows_policy() {
        let p = portal(1, 1, 1, 0, 2, 4);
        assert_eq!(p.exits(10, ZeroModulus::Unreachable).count(), 0);
        assert_eq!(
            p.exits(10, ZeroModulus::Unconstrained).collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
    }

    #[test]
    fn negative_modulus_is_reported() {
        assert_eq!(portal(2, 1, 1, -3, 1, 1).negative_modulus(), Some(-3));
        assert_eq!(portal(0, 1, 1, 0, 1, 1).negative_modulus(), None);
    }
}
