//! Draw-frequency tests for the slab-spike mixture prior.

use rand::rngs::StdRng;
use rand::SeedableRng;

use corella_prior::Prior;

fn spike_fraction(mix: f64, n: usize, seed: u64) -> f64 {
    let slab = Prior::uniform(-1.0, 1.0).unwrap();
    let prior = Prior::slab_spike(slab, mix).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    let hits = (0..n).filter(|_| prior.sample(&mut rng) == 0.0).count();
    hits as f64 / n as f64
}

#[test]
fn all_spike_at_mix_one() {
    assert_eq!(spike_fraction(1.0, 5000, 1), 1.0);
}

#[test]
fn no_exact_spike_at_mix_zero() {
    // The slab is continuous, so an exact zero draw has probability zero.
    // rescale(u) = -1 + 2u only returns 0.0 at u = 0.5 exactly.
    assert_eq!(spike_fraction(0.0, 5000, 2), 0.0);
}

#[test]
fn spike_frequency_converges_to_mix() {
    let n = 200_000;
    let freq = spike_fraction(0.5, n, 3);
    // Binomial standard error ~ sqrt(0.25 / n) ~ 0.0011; allow 5 sigma.
    assert!(
        (freq - 0.5).abs() < 6e-3,
        "spike frequency {freq} too far from 0.5"
    );

    let freq_low = spike_fraction(0.1, n, 4);
    assert!(
        (freq_low - 0.1).abs() < 5e-3,
        "spike frequency {freq_low} too far from 0.1"
    );
}

#[test]
fn slab_draws_stay_in_slab() {
    let slab = Prior::uniform(-2.0, 2.0).unwrap();
    let prior = Prior::slab_spike(slab, 0.3).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..10_000 {
        let v = prior.sample(&mut rng);
        assert!((-2.0..=2.0).contains(&v));
    }
}
