//! Binomial coefficients and k-combination enumeration.

use smallvec::SmallVec;

/// Exact count type for consistent game states.
///
/// `u128` leaves headroom well beyond the classic 21-card game, whose
/// unconstrained state space is below 10^15.
pub type StateCount = u128;

/// Number of ways to choose `k` items out of `n`.
///
/// Returns 0 when `k > n`, and saturates at `StateCount::MAX` when the
/// coefficient does not fit; use `checked_choose` to detect that case.
///
/// ```
/// use clue_deduce::counting::choose;
///
/// assert_eq!(choose(6, 3), 20);
/// assert_eq!(choose(5, 0), 1);
/// assert_eq!(choose(2, 3), 0);
/// ```
#[must_use]
pub fn choose(n: usize, k: usize) -> StateCount {
    checked_choose(n, k).unwrap_or(StateCount::MAX)
}

/// Number of ways to choose `k` items out of `n`, or `None` if it does not
/// fit in a `StateCount`.
#[must_use]
pub fn checked_choose(n: usize, k: usize) -> Option<StateCount> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut result: StateCount = 1;
    for i in 0..k {
        // result * num / den is exact; cancel the common factor first so
        // only a genuine overflow of the running value can fail
        let mut num = (n - i) as StateCount;
        let mut den = (i + 1) as StateCount;
        let g = gcd(result, den);
        result /= g;
        den /= g;
        num /= den;
        result = result.checked_mul(num)?;
    }
    Some(result)
}

fn gcd(mut a: StateCount, mut b: StateCount) -> StateCount {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Lexicographic k-combinations of a slice.
///
/// Yields each combination once, in the order `itertools`-style
/// enumeration would: indices advance from the right. Choosing 0 items
/// yields one empty combination; choosing more than available yields none.
pub struct Combinations<'a, T> {
    items: &'a [T],
    indices: SmallVec<[usize; 8]>,
    done: bool,
}

impl<'a, T: Copy> Combinations<'a, T> {
    /// Enumerate all `k`-element combinations of `items`.
    #[must_use]
    pub fn new(items: &'a [T], k: usize) -> Self {
        Self {
            items,
            indices: (0..k).collect(),
            done: k > items.len(),
        }
    }
}

impl<T: Copy> Iterator for Combinations<'_, T> {
    type Item = SmallVec<[T; 8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.iter().map(|&i| self.items[i]).collect();

        // advance to the next index tuple
        let n = self.items.len();
        let k = self.indices.len();
        let mut pos = k;
        loop {
            if pos == 0 {
                self.done = true;
                break;
            }
            pos -= 1;
            if self.indices[pos] != pos + n - k {
                self.indices[pos] += 1;
                for j in pos + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
        }

        Some(current)
    }
}
