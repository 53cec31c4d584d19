//! Opaque handles and time units shared by every layer.
use std::fmt;

/// Unique identifier for any actor (player or non-player) tracked by the stat system.
///
/// The host maps its own entity identity (usually a UUID) onto this handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u64);

impl ActorId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Little-endian bytes, used when deriving stable keys.
    pub const fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque reference to an item stack owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemHandle(pub u64);

impl fmt::Display for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item:{}", self.0)
    }
}

/// Identifier of an ability definition, as declared in item metadata.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityId(pub String);

impl AbilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AbilityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for AbilityId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// One host game tick. All delays and cooldowns are expressed in ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Ticks elapsed since `earlier`, zero if `earlier` lies in the future.
    pub const fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0.saturating_add(rhs))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Equipment slot an item is read from, or an activation was performed with.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EquipmentSlot {
    MainHand,
    OffHand,
    Helmet,
    Chestplate,
    Leggings,
    Boots,
    Accessory,
}

impl EquipmentSlot {
    /// Returns true for the two hand slots.
    pub const fn is_hand(self) -> bool {
        matches!(self, Self::MainHand | Self::OffHand)
    }
}

/// Raw input action reported by the host.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InputAction {
    LeftClick,
    RightClick,
    SneakLeftClick,
    SneakRightClick,
    Drop,
    SwapHands,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_since_saturates() {
        assert_eq!(Tick(25).since(Tick(5)), 20);
        assert_eq!(Tick(5).since(Tick(25)), 0);
    }

    #[test]
    fn slot_and_action_parse_case_insensitively() {
        assert_eq!("MAIN_HAND".parse::<EquipmentSlot>(), Ok(EquipmentSlot::MainHand));
        assert_eq!(
            "sneak_right_click".parse::<InputAction>(),
            Ok(InputAction::SneakRightClick)
        );
        assert!("kick".parse::<InputAction>().is_err());
    }
}
