use serde::{Deserialize, Serialize};

/// Number of layer slots an entity can live on.
pub const LAYER_COUNT: u8 = 32;

/// Bitset selecting which layers take part in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// Mask containing a single layer. Layers outside `0..32` yield an empty mask.
    pub fn from_layer(layer: u8) -> Self {
        if layer < LAYER_COUNT {
            Self(1 << layer)
        } else {
            Self::NONE
        }
    }

    pub fn contains(&self, layer: u8) -> bool {
        layer < LAYER_COUNT && self.0 & (1 << layer) != 0
    }

    pub fn with(self, layer: u8) -> Self {
        Self(self.0 | Self::from_layer(layer).0)
    }

    pub fn without(self, layer: u8) -> Self {
        Self(self.0 & !Self::from_layer(layer).0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::from_layer(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_layer_mask() {
        let mask = LayerMask::from_layer(8);
        assert!(mask.contains(8));
        assert!(!mask.contains(0));
        assert_eq!(mask.0, 256);
    }

    #[test]
    fn out_of_range_layer_is_empty() {
        assert_eq!(LayerMask::from_layer(40), LayerMask::NONE);
        assert!(!LayerMask::ALL.contains(40));
    }

    #[test]
    fn with_and_without() {
        let mask = LayerMask::NONE.with(1).with(3).without(1);
        assert!(mask.contains(3));
        assert!(!mask.contains(1));
    }
}
