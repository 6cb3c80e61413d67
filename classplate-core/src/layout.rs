//! Chain geometry
//!
//! The chain is partitioned at build time. Modules `[0, FIXED_ZONE_END)`
//! show the clock and temperature, modules `[FIXED_ZONE_END, NUM_MODULES)`
//! carry the scrolling message.
//!
//! ```text
//! ┌──────┬──────┬──────┬──────┬──────┬──────┬──────┬──────┐
//! │  0   │  1   │  2   │  3   │  4   │  5   │  6   │  7   │
//! │ temp │ °C   │ hour │ min  │◄──────── scroll ─────────│
//! └──────┴──────┴──────┴──────┴──────┴──────┴──────┴──────┘
//! ```

use core::ops::Range;

/// Number of cascaded controller chips
pub const NUM_MODULES: usize = 8;

/// First module of the scroll zone
pub const FIXED_ZONE_END: usize = 4;

/// Number of modules in the scroll zone
pub const SCROLL_MODULES: usize = NUM_MODULES - FIXED_ZONE_END;

/// Rows (and columns) per module
pub const ROWS: usize = 8;

/// Bytes in one full-chain burst
pub const FRAME_BYTES: usize = 2 * NUM_MODULES;

/// Temperature digit pair
pub const TEMPERATURE_MODULE: ModuleIndex = ModuleIndex(0);

/// Temperature unit glyph
pub const UNIT_MODULE: ModuleIndex = ModuleIndex(1);

/// Hours digit pair
pub const HOURS_MODULE: ModuleIndex = ModuleIndex(2);

/// Minutes digit pair
pub const MINUTES_MODULE: ModuleIndex = ModuleIndex(3);

/// Status text until the clock has a time to show; the temperature
/// modules stay free so a reading can go up before the first sync
pub const STATUS_MODULES: [ModuleIndex; 2] = [HOURS_MODULE, MINUTES_MODULE];

/// Position of one module in the chain, always below [`NUM_MODULES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModuleIndex(u8);

impl ModuleIndex {
    /// Validate a chain position
    pub const fn new(index: usize) -> Option<Self> {
        if index < NUM_MODULES {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Chain position as an array index
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Zone this module belongs to
    pub const fn zone(self) -> Zone {
        Zone::of(self)
    }

    /// Every module in chain order
    pub fn all() -> impl Iterator<Item = ModuleIndex> {
        (0..NUM_MODULES as u8).map(ModuleIndex)
    }
}

/// Static partition of the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Zone {
    /// Clock, temperature and status glyphs
    Fixed,
    /// Scrolling message
    Scroll,
}

impl Zone {
    /// Zone a module belongs to
    pub const fn of(module: ModuleIndex) -> Zone {
        if module.index() < FIXED_ZONE_END {
            Zone::Fixed
        } else {
            Zone::Scroll
        }
    }

    /// Chain positions covered by this zone
    pub const fn range(self) -> Range<usize> {
        match self {
            Zone::Fixed => 0..FIXED_ZONE_END,
            Zone::Scroll => FIXED_ZONE_END..NUM_MODULES,
        }
    }

    /// First (leftmost) module of the zone
    pub const fn first(self) -> ModuleIndex {
        ModuleIndex(self.range().start as u8)
    }

    /// Number of modules in the zone
    pub const fn len(self) -> usize {
        match self {
            Zone::Fixed => FIXED_ZONE_END,
            Zone::Scroll => SCROLL_MODULES,
        }
    }

    /// Modules of the zone, left to right
    pub fn modules(self) -> impl Iterator<Item = ModuleIndex> {
        self.range().map(|i| ModuleIndex(i as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_index_bounds() {
        assert!(ModuleIndex::new(NUM_MODULES - 1).is_some());
        assert!(ModuleIndex::new(NUM_MODULES).is_none());
    }

    #[test]
    fn test_zones_partition_the_chain() {
        let fixed: Vec<_> = Zone::Fixed.modules().collect();
        let scroll: Vec<_> = Zone::Scroll.modules().collect();

        assert_eq!(fixed.len() + scroll.len(), NUM_MODULES);
        assert!(fixed.iter().all(|m| m.zone() == Zone::Fixed));
        assert!(scroll.iter().all(|m| m.zone() == Zone::Scroll));
        assert_eq!(Zone::Scroll.first().index(), FIXED_ZONE_END);
    }

    #[test]
    fn test_fixed_roles_live_in_fixed_zone() {
        for module in [TEMPERATURE_MODULE, UNIT_MODULE, HOURS_MODULE, MINUTES_MODULE] {
            assert_eq!(module.zone(), Zone::Fixed);
        }
    }
}
