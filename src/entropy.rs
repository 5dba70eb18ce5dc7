use chrono::{Local, NaiveDateTime};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of randomness for every probabilistic branch in the games.
pub trait Dice {
    /// Uniform value in `[0, 1)`.
    fn roll(&mut self) -> f64;

    /// Uniform index below `len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        let idx = (self.roll() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }
}

pub struct SeededDice {
    rng: StdRng,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        SeededDice {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Dice for SeededDice {
    fn roll(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Seed used when the config does not pin one.
#[cfg(target_arch = "wasm32")]
pub fn ambient_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) | lo
}

#[cfg(not(target_arch = "wasm32"))]
pub fn ambient_seed() -> u64 {
    Local::now().timestamp_micros() as u64
}

pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// `10/19/2026, 14:03:22`, the en-US 24h rendering the terminal prints.
pub fn timestamp(at: NaiveDateTime) -> String {
    at.format("%-m/%-d/%Y, %H:%M:%S").to_string()
}

#[cfg(test)]
pub struct ScriptedDice {
    rolls: std::collections::VecDeque<f64>,
    fallback: f64,
}

#[cfg(test)]
impl ScriptedDice {
    pub fn new(rolls: &[f64]) -> Self {
        ScriptedDice {
            rolls: rolls.iter().copied().collect(),
            fallback: 0.0,
        }
    }

    /// Every roll returns `value`.
    pub fn always(value: f64) -> Self {
        ScriptedDice {
            rolls: Default::default(),
            fallback: value,
        }
    }
}

#[cfg(test)]
impl Dice for ScriptedDice {
    fn roll(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
pub struct FixedClock(pub NaiveDateTime);

#[cfg(test)]
impl FixedClock {
    pub fn epoch() -> Self {
        let at = chrono::NaiveDate::from_ymd_opt(2024, 5, 15)
            .and_then(|d| d.and_hms_opt(9, 22, 1))
            .unwrap();
        FixedClock(at)
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_dice_is_reproducible() {
        let mut a = SeededDice::new(42);
        let mut b = SeededDice::new(42);
        for _ in 0..16 {
            let x = a.roll();
            assert_eq!(x, b.roll());
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_pick_stays_in_bounds() {
        let mut dice = ScriptedDice::new(&[0.0, 0.5, 0.999_999]);
        assert_eq!(dice.pick(4), 0);
        assert_eq!(dice.pick(4), 2);
        assert_eq!(dice.pick(4), 3);
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(timestamp(FixedClock::epoch().now()), "5/15/2024, 09:22:01");
    }
}
