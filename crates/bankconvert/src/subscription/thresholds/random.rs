//! Mersenne Twister stream matching the legacy seeded generator used by the training split.
//!
//! Only the pieces the split needs are provided: integer seeding, 32-bit draws, bounded
//! integers by masked rejection, and Fisher-Yates permutations driven from the top index down.

const STATE_LEN: usize = 624;
const SHIFT: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

pub(crate) struct LegacyRandomState {
    key: [u32; STATE_LEN],
    pos: usize,
}

impl LegacyRandomState {
    pub(crate) fn seeded(seed: u32) -> Self {
        let mut key = [0u32; STATE_LEN];
        let mut value = seed;
        for (pos, slot) in key.iter_mut().enumerate() {
            *slot = value;
            value = 1_812_433_253u32
                .wrapping_mul(value ^ (value >> 30))
                .wrapping_add(pos as u32 + 1);
        }

        Self {
            key,
            pos: STATE_LEN,
        }
    }

    fn regenerate(&mut self) {
        let twist = |upper: u32, lower: u32, far: u32| {
            let y = (upper & UPPER_MASK) | (lower & LOWER_MASK);
            let mag = if y & 1 == 1 { MATRIX_A } else { 0 };
            far ^ (y >> 1) ^ mag
        };

        for i in 0..STATE_LEN - SHIFT {
            self.key[i] = twist(self.key[i], self.key[i + 1], self.key[i + SHIFT]);
        }
        for i in STATE_LEN - SHIFT..STATE_LEN - 1 {
            self.key[i] = twist(self.key[i], self.key[i + 1], self.key[i + SHIFT - STATE_LEN]);
        }
        self.key[STATE_LEN - 1] = twist(
            self.key[STATE_LEN - 1],
            self.key[0],
            self.key[SHIFT - 1],
        );
        self.pos = 0;
    }

    pub(crate) fn next_u32(&mut self) -> u32 {
        if self.pos == STATE_LEN {
            self.regenerate();
        }

        let mut y = self.key[self.pos];
        self.pos += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^ (y >> 18)
    }

    /// Uniform integer in `0..=max`.
    pub(crate) fn interval(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }

        let mut mask = max;
        mask |= mask >> 1;
        mask |= mask >> 2;
        mask |= mask >> 4;
        mask |= mask >> 8;
        mask |= mask >> 16;

        loop {
            let value = self.next_u32() & mask;
            if value <= max {
                return value;
            }
        }
    }

    pub(crate) fn shuffle<T>(&mut self, values: &mut [T]) {
        for i in (1..values.len()).rev() {
            let j = self.interval(i as u32) as usize;
            values.swap(i, j);
        }
    }

    pub(crate) fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut values: Vec<usize> = (0..n).collect();
        self.shuffle(&mut values);
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_seed_produces_reference_draw() {
        let mut rng = LegacyRandomState::seeded(5489);
        assert_eq!(rng.next_u32(), 3_499_211_612);
    }

    #[test]
    fn zero_seed_permutation_matches_reference_order() {
        let mut rng = LegacyRandomState::seeded(0);
        assert_eq!(rng.permutation(10), vec![2, 8, 4, 9, 1, 6, 7, 3, 0, 5]);
    }

    #[test]
    fn interval_stays_within_bound() {
        let mut rng = LegacyRandomState::seeded(2025);
        for max in [1u32, 2, 7, 100, 41_175] {
            for _ in 0..200 {
                assert!(rng.interval(max) <= max);
            }
        }
    }

    #[test]
    fn permutations_of_trivial_lengths_consume_nothing() {
        let mut left = LegacyRandomState::seeded(7);
        let mut right = LegacyRandomState::seeded(7);
        assert_eq!(left.permutation(1), vec![0]);
        assert!(left.permutation(0).is_empty());
        assert_eq!(left.next_u32(), right.next_u32());
    }
}
