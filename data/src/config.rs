use serde::{Deserialize, Serialize};

pub mod docking;
pub mod state;

pub const MIN_DIMENSION: u32 = 40;
pub const MAX_DIMENSION: u32 = 4096;

/// Thickness of a docked region, in pixels, across its docking edge.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct Dimension(u32);

impl Default for Dimension {
    fn default() -> Self {
        Self(250)
    }
}

impl From<u32> for Dimension {
    fn from(value: u32) -> Self {
        Dimension(value.clamp(MIN_DIMENSION, MAX_DIMENSION))
    }
}

impl From<Dimension> for u32 {
    fn from(value: Dimension) -> Self {
        value.0
    }
}

impl PartialEq<u32> for Dimension {
    fn eq(&self, other: &u32) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_is_clamped() {
        assert_eq!(Dimension::from(2), MIN_DIMENSION);
        assert_eq!(Dimension::from(100_000), MAX_DIMENSION);
        assert_eq!(u32::from(Dimension::from(300)), 300);
    }
}
