//! Deterministic synthetic series for demos, benchmarks and tests.
//!
//! Produces a random walk of hourly bars starting at 1.1000 (an FX-like
//! price scale, so the default ATR threshold is meaningful). The RNG seed
//! is derived from BLAKE3 of the series name and the numeric seed, so the
//! same `(name, seed)` always yields the same bars.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use oblab_core::Bar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const START_PRICE: f64 = 1.1000;

fn start_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn rng_for(name: &str, seed: u64) -> StdRng {
    let mut hasher = blake3::Hasher::new();
    hasher.update(name.as_bytes());
    hasher.update(&seed.to_le_bytes());
    StdRng::from_seed(*hasher.finalize().as_bytes())
}

/// Generate `n` sane OHLC bars.
pub fn generate_bars(name: &str, n: usize, seed: u64) -> Vec<Bar> {
    let mut rng = rng_for(name, seed);
    let mut bars = Vec::with_capacity(n);
    let mut price = START_PRICE;
    let mut drift = 0.0_f64;
    let base = start_time();

    for i in 0..n {
        // Slowly wandering drift gives trending stretches with pullbacks.
        drift = (drift + rng.gen_range(-0.0002..0.0002)).clamp(-0.0008, 0.0008);
        let step: f64 = drift + rng.gen_range(-0.0030..0.0030);
        let open = price;
        let close = (price * (1.0 + step)).max(0.01);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.0025));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.0025));

        bars.push(Bar::new(
            base + Duration::hours(i as i64),
            open,
            high,
            low,
            close,
        ));
        price = close;
    }
    bars
}
