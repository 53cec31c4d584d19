//! Equipment contribution: the per-stat bonus table summed from gear.
//!
//! Items declare flat per-stat bonuses. A recompute pass folds every equipped
//! item's table into one [`StatBonuses`] and hands it to the snapshot
//! constructor. The table is never cached on its own.

use std::ops::AddAssign;

use strum::{EnumCount, IntoEnumIterator};

use super::kind::StatKind;
use crate::error::StatError;

/// Dense table of flat bonuses, one slot per [`StatKind`].
///
/// Sums are kept in `i64` so stacking many large items cannot overflow before
/// the snapshot clamps the aggregate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatBonuses {
    values: [i64; StatKind::COUNT],
}

impl StatBonuses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: StatKind) -> i64 {
        self.values[kind.index()]
    }

    /// Add a flat bonus to one stat.
    pub fn add(&mut self, kind: StatKind, value: i64) {
        let slot = &mut self.values[kind.index()];
        *slot = slot.saturating_add(value);
    }

    /// Builder form of [`add`](Self::add).
    pub fn with(mut self, kind: StatKind, value: i64) -> Self {
        self.add(kind, value);
        self
    }

    /// Add a bonus addressed by stat name.
    ///
    /// Unknown names are rejected so the caller can log them and move on.
    pub fn add_named(&mut self, name: &str, value: i64) -> Result<(), StatError> {
        let kind = name
            .parse::<StatKind>()
            .map_err(|_| StatError::UnknownStat(name.to_owned()))?;
        self.add(kind, value);
        Ok(())
    }

    /// Iterate over the stats that carry a non-zero bonus.
    pub fn iter(&self) -> impl Iterator<Item = (StatKind, i64)> + '_ {
        StatKind::iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|(_, value)| *value != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| *v == 0)
    }
}

impl AddAssign<&StatBonuses> for StatBonuses {
    fn add_assign(&mut self, rhs: &StatBonuses) {
        for kind in StatKind::iter() {
            self.add(kind, rhs.get(kind));
        }
    }
}

impl FromIterator<(StatKind, i64)> for StatBonuses {
    fn from_iter<T: IntoIterator<Item = (StatKind, i64)>>(iter: T) -> Self {
        let mut bonuses = Self::new();
        for (kind, value) in iter {
            bonuses.add(kind, value);
        }
        bonuses
    }
}
