//! Skeleton grid shown while the first fetch is pending

/// Number of skeleton cards (a 3x3 grid)
pub const SKELETON_COUNT: usize = 9;

/// Placeholder bar width as a fraction of the card width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub numerator:   u8,
    pub denominator: u8,
}

impl Bar {
    pub const FULL: Bar = Bar::new(1, 1);

    pub const fn new(numerator: u8, denominator: u8) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Width in columns for a card of `total` columns
    pub fn width(&self, total: usize) -> usize {
        total * self.numerator as usize / self.denominator as usize
    }
}

/// One skeleton card, laid out like a real prompt card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonCard {
    pub title:       Bar,
    pub description: Bar,
    pub lines:       [Bar; 3],
}

impl Default for SkeletonCard {
    fn default() -> Self {
        Self {
            title:       Bar::new(3, 4),
            description: Bar::new(1, 2),
            lines:       [Bar::FULL, Bar::FULL, Bar::new(5, 6)],
        }
    }
}

/// The full placeholder grid
pub fn skeleton_cards() -> Vec<SkeletonCard> {
    vec![SkeletonCard::default(); SKELETON_COUNT]
}
