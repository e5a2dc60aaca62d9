//! Seeded pseudo-random number generator
//!
//! Deterministic PRNG for reproducible critical-hit draws.
//! Uses a simple but effective xorshift algorithm.

/// Seeded random number generator
///
/// Deterministic: same seed = same sequence
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new RNG from a 64-bit seed
    pub fn new(seed: u64) -> Self {
        // xorshift has a fixed point at zero
        let state = (seed ^ 0x9e3779b97f4a7c15).wrapping_mul(0x517cc1b727220a95) | 1;

        // Warm up the generator
        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }

        rng
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Generate next u32
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Generate a value 0-99 (for percentage checks)
    pub fn next_percent(&mut self) -> u8 {
        (self.next_u32() % 100) as u8
    }

    /// True with probability `percent`/100
    pub fn chance(&mut self, percent: u8) -> bool {
        self.next_percent() < percent
    }
}

/// Source of the per-exchange critical-hit flag.
pub trait CriticalRoll {
    fn roll(&mut self) -> bool;
}

/// Closures make handy scripted rolls in tests.
impl<F: FnMut() -> bool> CriticalRoll for F {
    fn roll(&mut self) -> bool {
        self()
    }
}

/// Seeded critical draw with a fixed percent chance.
#[derive(Clone, Debug)]
pub struct CriticalDice {
    rng: SeededRng,
    chance_percent: u8,
}

impl CriticalDice {
    pub fn new(seed: u64, chance_percent: u8) -> Self {
        Self {
            rng: SeededRng::new(seed),
            chance_percent,
        }
    }
}

impl CriticalRoll for CriticalDice {
    fn roll(&mut self) -> bool {
        self.rng.chance(self.chance_percent)
    }
}
