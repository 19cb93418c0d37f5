//! Selectable roster columns and their persisted bit flags.

use bitflags::bitflags;
use once_cell::sync::Lazy;

bitflags! {
    /// Bitmask selecting which roster columns a widget instance displays.
    ///
    /// Bit values are persisted in host widget settings and must never be
    /// reassigned.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldFlags: u32 {
        const NAME = 1;
        const COUNTRY = 2;
        const IDLE_TIME = 4;
        const INGAME = 8;
        const CHANNEL_NAME = 16;
    }
}

/// A selectable roster column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Country,
    IdleTime,
    Ingame,
    ChannelName,
}

impl Field {
    pub fn flag(self) -> FieldFlags {
        match self {
            Field::Name => FieldFlags::NAME,
            Field::Country => FieldFlags::COUNTRY,
            Field::IdleTime => FieldFlags::IDLE_TIME,
            Field::Ingame => FieldFlags::INGAME,
            Field::ChannelName => FieldFlags::CHANNEL_NAME,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Country => "Country",
            Field::IdleTime => "Idle time",
            Field::Ingame => "Ingame",
            Field::ChannelName => "Channel",
        }
    }
}

/// All columns in canonical order. Read-only after startup.
static COLUMNS: Lazy<[Field; 5]> = Lazy::new(|| {
    [
        Field::Name,
        Field::Country,
        Field::IdleTime,
        Field::Ingame,
        Field::ChannelName,
    ]
});

impl FieldFlags {
    /// Parse a persisted mask, ignoring bits outside the defined columns.
    pub fn from_mask(mask: u32) -> Self {
        Self::from_bits_truncate(mask)
    }

    /// Columns selected by this mask, in canonical order.
    pub fn columns(self) -> impl Iterator<Item = Field> {
        COLUMNS
            .iter()
            .copied()
            .filter(move |field| self.contains(field.flag()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_follow_canonical_order() {
        let selected: Vec<&str> = FieldFlags::all().columns().map(Field::label).collect();
        assert_eq!(
            selected,
            vec!["Name", "Country", "Idle time", "Ingame", "Channel"]
        );
    }

    #[test]
    fn columns_exclude_unset_flags() {
        let mask = FieldFlags::NAME | FieldFlags::INGAME;
        let selected: Vec<&str> = mask.columns().map(Field::label).collect();
        assert_eq!(selected, vec!["Name", "Ingame"]);
    }

    #[test]
    fn empty_mask_selects_nothing() {
        assert_eq!(FieldFlags::empty().columns().count(), 0);
        assert_eq!(FieldFlags::from_mask(0).columns().count(), 0);
    }

    #[test]
    fn bit_assignments_are_stable() {
        assert_eq!(FieldFlags::NAME.bits(), 1);
        assert_eq!(FieldFlags::COUNTRY.bits(), 2);
        assert_eq!(FieldFlags::IDLE_TIME.bits(), 4);
        assert_eq!(FieldFlags::INGAME.bits(), 8);
        assert_eq!(FieldFlags::CHANNEL_NAME.bits(), 16);
    }

    #[test]
    fn from_mask_drops_unknown_bits() {
        let flags = FieldFlags::from_mask(0b1110_0001);
        assert_eq!(flags, FieldFlags::NAME);
    }
}
