//! Per-domain RNG streams derived from a single session seed.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

use crate::constants::{RNG_TAG_AGE, RNG_TAG_CHARACTERISTICS, RNG_TAG_MONEY, RNG_TAG_SOCIAL_CLASS};

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha20Rng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// Independent streams so that rolling money never shifts characteristic rolls.
#[derive(Debug, Clone)]
pub struct RngBundle {
    seed: u64,
    characteristics: CountingRng<ChaCha20Rng>,
    money: CountingRng<ChaCha20Rng>,
    social_class: CountingRng<ChaCha20Rng>,
    age: CountingRng<ChaCha20Rng>,
}

impl RngBundle {
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed,
            characteristics: CountingRng::new(derive_stream_seed(seed, RNG_TAG_CHARACTERISTICS)),
            money: CountingRng::new(derive_stream_seed(seed, RNG_TAG_MONEY)),
            social_class: CountingRng::new(derive_stream_seed(seed, RNG_TAG_SOCIAL_CLASS)),
            age: CountingRng::new(derive_stream_seed(seed, RNG_TAG_AGE)),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    pub fn characteristics(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.characteristics
    }

    pub fn money(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.money
    }

    pub fn social_class(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.social_class
    }

    pub fn age(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.age
    }

    /// Money and social-class streams together, for a single money roll.
    pub fn money_streams(
        &mut self,
    ) -> (&mut CountingRng<ChaCha20Rng>, &mut CountingRng<ChaCha20Rng>) {
        (&mut self.money, &mut self.social_class)
    }

    /// Total draws across every stream.
    #[must_use]
    pub const fn total_draws(&self) -> u64 {
        self.characteristics
            .draws()
            .saturating_add(self.money.draws())
            .saturating_add(self.social_class.draws())
            .saturating_add(self.age.draws())
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).map_or(user_seed, |mut mac| {
        mac.update(domain_tag);
        let digest = mac.finalize().into_bytes();
        let mut seed_bytes = [0_u8; 8];
        seed_bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(seed_bytes)
    })
}
