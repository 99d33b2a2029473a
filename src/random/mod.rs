// This file is part of minex-validation, a validation driver for MINEX III
// fingerprint template generators and matchers.
//
// You can redistribute minex-validation source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

//! Seeded, reproducible ordering of validation items.
//!
//! Result logs are compared across runs and across driver implementations, so
//! the generator (MT19937-64), the bounded draw and the shuffle all reproduce
//! what libstdc++ does for `std::shuffle(first, last, std::mt19937_64(seed))`.

const NN: usize = 312;
const MM: usize = 156;
const MATRIX_A: u64 = 0xB502_6F5A_A966_19E9;
const UPPER_MASK: u64 = 0xFFFF_FFFF_8000_0000;
const LOWER_MASK: u64 = 0x7FFF_FFFF;

/// Seed used by a default-constructed C++ `std::mt19937_64`.
pub const DEFAULT_SEED: u64 = 5489;

/// 64-bit Mersenne Twister.
pub struct Mt64 {
    state: [u64; NN],
    index: usize,
}

impl Mt64 {
    pub fn new(seed: u64) -> Self {
        let mut state = [0u64; NN];
        state[0] = seed;
        for i in 1..NN {
            let prev = state[i - 1];
            state[i] = 6_364_136_223_846_793_005u64
                .wrapping_mul(prev ^ (prev >> 62))
                .wrapping_add(i as u64);
        }
        Mt64 { state, index: NN }
    }

    fn twist(&mut self) {
        for i in 0..NN {
            let x = (self.state[i] & UPPER_MASK) | (self.state[(i + 1) % NN] & LOWER_MASK);
            let mut x_a = x >> 1;
            if x & 1 != 0 {
                x_a ^= MATRIX_A;
            }
            self.state[i] = self.state[(i + MM) % NN] ^ x_a;
        }
        self.index = 0;
    }

    pub fn next_u64(&mut self) -> u64 {
        if self.index >= NN {
            self.twist();
        }

        let mut x = self.state[self.index];
        self.index += 1;

        x ^= (x >> 29) & 0x5555_5555_5555_5555;
        x ^= (x << 17) & 0x71D6_7FFF_EDA6_0000;
        x ^= (x << 37) & 0xFFF7_EEE0_0000_0000;
        x ^= x >> 43;
        x
    }

    /// Draw uniformly from `[0, upper]`, as `uniform_int_distribution<u64>{0, upper}`.
    pub fn uniform_inclusive(&mut self, upper: u64) -> u64 {
        if upper == u64::MAX {
            return self.next_u64();
        }
        self.below(upper + 1)
    }

    // Lemire's multiply-shift reduction to [0, range), rejecting the biased low products.
    fn below(&mut self, range: u64) -> u64 {
        let mut product = u128::from(self.next_u64()) * u128::from(range);
        let mut low = product as u64;
        if low < range {
            let threshold = range.wrapping_neg() % range;
            while low < threshold {
                product = u128::from(self.next_u64()) * u128::from(range);
                low = product as u64;
            }
        }
        (product >> 64) as u64
    }

    /// Draw a uniform index into a collection of `len` elements.
    ///
    /// # Panics
    ///
    /// Panics if `len` is 0.
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            panic!("Cannot choose from an empty collection");
        }
        self.uniform_inclusive(len as u64 - 1) as usize
    }

    /// Pick a uniformly chosen element of `items`, or `None` if it is empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.index(items.len())])
        }
    }
}

// Two independent draws from [0, b0) and [0, b1) taken out of a single draw.
fn two_uniform(rng: &mut Mt64, b0: u64, b1: u64) -> (u64, u64) {
    let x = rng.uniform_inclusive(b0 * b1 - 1);
    (x / b1, x % b1)
}

/// Shuffle `items` in place, producing the same permutation as libstdc++'s
/// `std::shuffle` driven by the same generator.
///
/// While `len * len` fits the generator's range, swap positions are drawn two
/// at a time: an even-length slice first swaps element 1 with a draw from
/// `[0, 1]`, then elements `i` and `i + 1` take positions from one draw over
/// `[0, (i + 1) * (i + 2))`. Longer slices fall back to one draw per element.
pub fn shuffle<T>(items: &mut [T], rng: &mut Mt64) {
    let len = items.len() as u64;
    if len < 2 {
        return;
    }

    if u64::MAX / len < len {
        for i in 1..items.len() {
            let j = rng.uniform_inclusive(i as u64) as usize;
            items.swap(i, j);
        }
        return;
    }

    let mut i = 1;
    if len % 2 == 0 {
        let j = rng.uniform_inclusive(1) as usize;
        items.swap(1, j);
        i = 2;
    }
    while i < items.len() {
        let (first, second) = two_uniform(rng, i as u64 + 1, i as u64 + 2);
        items.swap(i, first as usize);
        items.swap(i + 1, second as usize);
        i += 2;
    }
}

/// Shuffle `items` with a generator freshly seeded with `seed`.
pub fn shuffle_with_seed<T>(items: &mut [T], seed: u64) {
    let mut rng = Mt64::new(seed);
    shuffle(items, &mut rng);
}
