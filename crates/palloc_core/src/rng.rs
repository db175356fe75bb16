//! Deterministic seeded PRNGs: Permuted Congruential Generator and its
//! truncated, increment-free "fast" variant.
//!
//! Both produce a `u32` stream from a `u64` state and implement
//! [`RngCore`] so they plug straight into `rand`'s and `rand_distr`'s
//! sampling algorithms (uniform-int, discrete, Poisson) instead of a
//! hand-rolled sampler.
//!
//! Reference: <https://en.wikipedia.org/wiki/Permuted_congruential_generator>

use rand_core::{impls, Error, RngCore};

const MULTIPLIER: u64 = 6364136223846793005;
const INCREMENT: u64 = 1442695040888963407;

fn rotr32(x: u32, r: u32) -> u32 {
    x >> r | x << ((-(r as i32)) as u32 & 31)
}

/// Standard 32-bit-output, 64-bit-state PCG (`XSH-RR`).
#[derive(Debug, Clone)]
pub struct Pcg32 {
    state: u64,
}

impl Pcg32 {
    pub fn new(seed: u64) -> Self {
        let mut rng = Self {
            state: seed.wrapping_add(INCREMENT),
        };
        rng.next_u32();
        rng
    }
}

impl RngCore for Pcg32 {
    fn next_u32(&mut self) -> u32 {
        let x = self.state;
        let count = ((x >> 59) as u32) + 1;
        self.state = x.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        let x = x ^ (x >> 18);
        rotr32((x >> 27) as u32, count)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Truncated multiplicative PCG: drops the increment for a shorter dependency
/// chain between outputs, at the cost of a shorter guaranteed period.
#[derive(Debug, Clone)]
pub struct Pcg32Fast {
    state: u64,
}

impl Pcg32Fast {
    pub fn new(seed: u64) -> Self {
        let mut rng = Self {
            state: seed.wrapping_mul(2).wrapping_add(1),
        };
        rng.next_u32();
        rng
    }
}

impl RngCore for Pcg32Fast {
    fn next_u32(&mut self) -> u32 {
        let x = self.state;
        let count = (x >> 61) as u32;
        self.state = x.wrapping_mul(MULTIPLIER);
        let x = x ^ (x >> 22);
        (x >> (22 + count)) as u32
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// The two selectable engines, tagged rather than boxed: the sampling loop in
/// [`crate::generator::RequestGenerator`] runs once per timestep per live run,
/// so a vtable indirection here is worth avoiding.
#[derive(Debug, Clone)]
pub enum RandomEngine {
    Pcg(Pcg32),
    PcgFast(Pcg32Fast),
}

impl RandomEngine {
    /// Build an engine from its CLI name. `"pcg"` or `"pcg-fast"`; anything
    /// else is a configuration error, not a panic.
    pub fn by_name(name: &str, seed: u64) -> Result<Self, crate::error::PallocError> {
        match name {
            "pcg" => Ok(Self::Pcg(Pcg32::new(seed))),
            "pcg-fast" => Ok(Self::PcgFast(Pcg32Fast::new(seed))),
            other => Err(crate::error::PallocError::Input(format!(
                "unknown random generator: {other}"
            ))),
        }
    }
}

impl RngCore for RandomEngine {
    fn next_u32(&mut self) -> u32 {
        match self {
            Self::Pcg(r) => r.next_u32(),
            Self::PcgFast(r) => r.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self {
            Self::Pcg(r) => r.next_u64(),
            Self::PcgFast(r) => r.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match self {
            Self::Pcg(r) => r.fill_bytes(dest),
            Self::PcgFast(r) => r.fill_bytes(dest),
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        match self {
            Self::Pcg(r) => r.try_fill_bytes(dest),
            Self::PcgFast(r) => r.try_fill_bytes(dest),
        }
    }
}
