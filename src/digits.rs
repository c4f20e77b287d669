//! Meet-in-the-middle search for `x * y == D(x, y)`.
//!
//! `x` has eight digits and `y` seven. `D(x, y)` writes the leading digit of
//! `x` followed by the products of the remaining seven digit pairs (aligned to
//! the right), and is only defined when each of those products has two digits.
//! Both numbers are split after their third-to-last digit: `x = 1000 xl + xr`,
//! `y = 1000 yl + yr`, so `D = DL * 10^6 + DR`.

use std::{ops::Range, sync::Mutex};

use rayon::prelude::*;
use tracing::info;

pub const XL: Range<i64> = 10_000..100_000;
pub const YL: Range<i64> = 1_000..10_000;
const HALF: i64 = 1_000;

fn digits<const N: usize>(mut value: i64) -> [i64; N] {
    let mut out = [0; N];
    for slot in out.iter_mut().rev() {
        *slot = value % 10;
        value /= 10;
    }
    out
}

/// Appends two-digit products, failing on any single-digit one.
fn append_products(mut acc: i64, a: &[i64], b: &[i64]) -> Option<i64> {
    for (a, b) in a.iter().zip(b) {
        let product = a * b;
        if product < 10 {
            return None;
        }
        acc = acc * 100 + product;
    }
    Some(acc)
}

/// `DR`: the three right-hand digit products.
pub fn right_product(xr: i64, yr: i64) -> Option<i64> {
    append_products(0, &digits::<3>(xr), &digits::<3>(yr))
}

/// `DL`: leading digit of `xl` and the four products of the left halves.
pub fn left_product(xl: i64, yl: i64) -> Option<i64> {
    let a = digits::<5>(xl);
    append_products(a[0], &a[1..], &digits::<4>(yl))
}

/// `D(x, y)` computed directly on the full numbers.
pub fn digit_product(x: i64, y: i64) -> Option<i64> {
    let a = digits::<8>(x);
    append_products(a[0], &a[1..], &digits::<7>(y))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Solution {
    pub x: i64,
    pub y: i64,
}

/// A right half whose low three digits already agree: `xr * yr - DR` is a
/// multiple of 1000 and `carry` is the quotient.
#[derive(Debug, Clone, Copy)]
struct RightHalf {
    xr: i64,
    yr: i64,
    carry: i64,
}

fn right_halves() -> Vec<RightHalf> {
    (0..HALF)
        .into_par_iter()
        .flat_map_iter(|xr| {
            (0..HALF).filter_map(move |yr| {
                let dr = right_product(xr, yr)?;
                let diff = xr * yr - dr;
                (diff % HALF == 0).then_some(RightHalf {
                    xr,
                    yr,
                    carry: diff / HALF,
                })
            })
        })
        .collect()
}

/// Carry of every right half, indexed by `yr * 1000 + xr`.
pub struct RightIndex {
    carries: Box<[Option<i64>]>,
    yr_options: Vec<i64>,
}

impl RightIndex {
    pub fn build() -> Self {
        let halves = right_halves();
        info!("Found {} valid right-half pairs", halves.len());
        let mut carries = vec![None; (HALF * HALF) as usize].into_boxed_slice();
        for half in &halves {
            carries[(half.yr * HALF + half.xr) as usize] = Some(half.carry);
        }
        let mut yr_options: Vec<i64> = halves.iter().map(|h| h.yr).collect();
        yr_options.sort_unstable();
        yr_options.dedup();
        info!("{} distinct right halves of y", yr_options.len());
        RightIndex {
            carries,
            yr_options,
        }
    }

    fn carry(&self, xr: i64, yr: i64) -> Option<i64> {
        if !(0..HALF).contains(&xr) {
            return None;
        }
        self.carries[(yr * HALF + xr) as usize]
    }

    /// Solutions whose left half of `x` lies in `xls`.
    pub fn scan(&self, xls: Range<i64>, report_progress: bool) -> Vec<Solution> {
        let mut found = Vec::new();
        for xl in xls {
            if report_progress && xl % 1000 == 0 {
                info!(xl, "probing");
            }
            for yl in YL {
                let Some(dl) = left_product(xl, yl) else {
                    continue;
                };
                for &yr in &self.yr_options {
                    // xr * yl + carry == target with |carry| < 1000 <= yl
                    let target = HALF * (dl - xl * yl) - xl * yr;
                    let q = target.div_euclid(yl);
                    for xr in [q, q + 1] {
                        if self.carry(xr, yr).is_some_and(|c| xr * yl + c == target) {
                            let (x, y) = (xl * HALF + xr, yl * HALF + yr);
                            debug_assert_eq!(digit_product(x, y), Some(x * y));
                            found.push(Solution { x, y });
                        }
                    }
                }
            }
        }
        found
    }
}

/// Splits `xls` into one contiguous chunk per rayon worker. Workers collect
/// locally and merge once under a single lock.
pub fn search(index: &RightIndex, xls: Range<i64>) -> Vec<Solution> {
    let workers = rayon::current_num_threads().max(1) as i64;
    let width = (xls.end - xls.start).max(0);
    let chunk = width / workers;
    let chunks: Vec<Range<i64>> = (0..workers)
        .map(|i| {
            let start = xls.start + i * chunk;
            let end = if i == workers - 1 { xls.end } else { start + chunk };
            start..end
        })
        .collect();
    info!(workers, "starting search over {:?}", xls);
    let solutions = Mutex::new(Vec::new());
    chunks.into_par_iter().enumerate().for_each(|(i, xls)| {
        let local = index.scan(xls, i == 0);
        if !local.is_empty() {
            solutions
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .extend(local);
        }
    });
    let mut solutions = solutions
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    solutions.sort_unstable();
    solutions
}
