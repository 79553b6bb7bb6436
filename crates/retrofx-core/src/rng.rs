//! The legacy engine's bit-register PRNG
//!
//! This is not a general-purpose generator: weather placement, lifetime
//! jitter and random flipbook start frames must draw from exactly this
//! sequence to reproduce the legacy look.

/// Power-on value of the register.
pub const DEFAULT_SEED: u32 = 0x6151f;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRng {
    reg: u32,
}

impl LegacyRng {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u32) -> Self {
        Self { reg: seed }
    }

    /// Current register contents
    pub fn state(&self) -> u32 {
        self.reg
    }

    /// Returns a value in `[0, max)`. `max == 0` yields 0 without touching
    /// the register.
    pub fn random(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.reg ^= self.reg.wrapping_shl(1);
        if self.reg & 0x8000_0000 != 0 {
            if self.reg == 0x8000_0000 {
                self.reg = 0;
            }
        } else {
            self.reg = self.reg.wrapping_add(1);
        }
        self.reg % max
    }
}

impl Default for LegacyRng {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_draws_from_power_on_seed() {
        let mut rng = LegacyRng::new();
        // 0x6151f ^ 0xc2a3e = 0xa3f21, sign bit clear -> +1
        assert_eq!(rng.random(u32::MAX), 0xa3f22);
        assert_eq!(rng.state(), 0xa3f22);
        // 0xa3f22 ^ 0x147e44 = 0x1e4166 -> +1
        assert_eq!(rng.random(u32::MAX), 0x1e4167);
    }

    #[test]
    fn zero_max_leaves_register_alone() {
        let mut rng = LegacyRng::with_seed(1234);
        assert_eq!(rng.random(0), 0);
        assert_eq!(rng.state(), 1234);
    }

    #[test]
    fn sign_bit_register_resets_to_zero() {
        // the shifted-out top bit leaves 0x8000_0000, the reset value
        let mut rng = LegacyRng::with_seed(0x8000_0000);
        rng.random(7);
        assert_eq!(rng.state(), 0);
    }

    #[test]
    fn sign_bit_set_skips_increment() {
        // 0xC000_0001 ^ 0x8000_0002 = 0x4000_0003, clear -> +1
        let mut rng = LegacyRng::with_seed(0xC000_0001);
        rng.random(100);
        assert_eq!(rng.state(), 0x4000_0004);
        // 0x4000_0004 ^ 0x8000_0008 = 0xC000_000C, set and not reset
        rng.random(100);
        assert_eq!(rng.state(), 0xC000_000C);
    }

    #[test]
    fn values_stay_below_max() {
        let mut rng = LegacyRng::new();
        for _ in 0..1000 {
            assert!(rng.random(2) < 2);
            assert!(rng.random(2560) < 2560);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = LegacyRng::with_seed(99);
        let mut b = LegacyRng::with_seed(99);
        for _ in 0..256 {
            assert_eq!(a.random(1000), b.random(1000));
        }
    }
}
