use serde::Serialize;
use std::fmt;

/// A stat bounded to `0..=100`. Every mutation clamps both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct Meter(u8);

impl Meter {
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Self {
        Meter(value.min(Self::MAX))
    }

    pub fn full() -> Self {
        Meter(Self::MAX)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn raise(&mut self, by: u8) {
        self.0 = self.0.saturating_add(by).min(Self::MAX);
    }

    pub fn lower(&mut self, by: u8) {
        self.0 = self.0.saturating_sub(by);
    }

    pub fn is_depleted(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_both_ends() {
        let mut m = Meter::new(95);
        m.raise(20);
        assert_eq!(m.get(), 100);
        m.lower(250);
        assert_eq!(m.get(), 0);
        assert!(m.is_depleted());
        assert_eq!(Meter::new(200).get(), 100);
    }
}
