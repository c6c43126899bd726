//!
//! Deployment salts.
//!
//! Salts come from a thread-local ChaCha20 PRNG seeded lazily from the
//! operating system's entropy source; `seed_from` pins the stream for
//! reproducible runs.
//!

use rand_chacha::{
    ChaCha20Rng,
    rand_core::{RngCore, SeedableRng},
};
use std::cell::RefCell;

thread_local! {
    static RNG: RefCell<Option<ChaCha20Rng>> = const { RefCell::new(None) };
}

///
/// Salt
///
/// 32 random bytes mixed into address derivation. Single use.
///

#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Salt(pub [u8; 32]);

super::impl_fixed_bytes!(Salt, 32);

impl Salt {
    /// Draw a fresh salt from the thread-local PRNG.
    #[must_use]
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        RNG.with_borrow_mut(|rng| {
            rng.get_or_insert_with(ChaCha20Rng::from_os_rng).fill_bytes(&mut bytes);
        });

        Self(bytes)
    }

    /// Reseed the thread-local PRNG so later salts are reproducible.
    pub fn seed_from(seed: [u8; 32]) {
        RNG.with_borrow_mut(|rng| {
            *rng = Some(ChaCha20Rng::from_seed(seed));
        });
    }

    /// Return to OS-seeded salts after `seed_from`.
    pub fn reseed_from_os() {
        RNG.with_borrow_mut(|rng| {
            *rng = Some(ChaCha20Rng::from_os_rng());
        });
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_stream_is_reproducible() {
        Salt::seed_from([42; 32]);
        let a = (Salt::random(), Salt::random());

        Salt::seed_from([42; 32]);
        let b = (Salt::random(), Salt::random());

        assert_eq!(a, b);
        assert_ne!(a.0, a.1, "consecutive salts must differ");
    }

    #[test]
    fn unseeded_salts_are_unique() {
        let first = Salt::random();
        let second = Salt::random();

        assert_ne!(first, second);
    }

    #[test]
    fn os_seeded_streams_do_not_repeat_across_threads() {
        let draw = || std::thread::spawn(Salt::random).join().expect("thread");

        assert_ne!(draw(), draw());
    }

    #[test]
    fn reseeding_from_os_leaves_the_pinned_stream() {
        Salt::seed_from([7; 32]);
        let pinned = Salt::random();

        Salt::seed_from([7; 32]);
        Salt::reseed_from_os();

        assert_ne!(Salt::random(), pinned);
    }
}
