//! Constraint strengths: the priority hierarchy deciding which constraint
//! wins when two could determine the same variable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eight ranked priority levels.
///
/// Comparisons go through the arithmetic value table, where a lower value
/// means a stronger constraint. The table is fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    AbsoluteStrongest,
    Required,
    StrongPreferred,
    Preferred,
    StrongDefault,
    Default,
    WeakDefault,
    AbsoluteWeakest,
}

const ARITHMETIC_VALUES: [i32; 8] = [-10000, -800, -600, -400, -200, 0, 500, 10000];

impl Strength {
    /// All levels, strongest first.
    pub const ALL: [Strength; 8] = [
        Strength::AbsoluteStrongest,
        Strength::Required,
        Strength::StrongPreferred,
        Strength::Preferred,
        Strength::StrongDefault,
        Strength::Default,
        Strength::WeakDefault,
        Strength::AbsoluteWeakest,
    ];

    /// Returns the level declared at `rank` (0 = absolute strongest).
    pub fn of(rank: usize) -> Option<Strength> {
        Self::ALL.get(rank).copied()
    }

    /// Declared position of this level (0 = absolute strongest, 7 = absolute weakest).
    pub const fn rank(self) -> usize {
        self as usize
    }

    /// Value used for all comparisons; lower is stronger.
    pub const fn arithmetic_value(self) -> i32 {
        ARITHMETIC_VALUES[self.rank()]
    }

    pub const fn stronger_than(self, other: Strength) -> bool {
        self.arithmetic_value() < other.arithmetic_value()
    }

    pub const fn weaker_than(self, other: Strength) -> bool {
        self.arithmetic_value() > other.arithmetic_value()
    }

    pub const fn same_as(self, other: Strength) -> bool {
        self.arithmetic_value() == other.arithmetic_value()
    }

    /// The stronger of `self` and `other`.
    pub const fn strongest(self, other: Strength) -> Strength {
        if other.stronger_than(self) {
            other
        } else {
            self
        }
    }

    /// The weaker of `self` and `other`.
    pub const fn weakest(self, other: Strength) -> Strength {
        if other.weaker_than(self) {
            other
        } else {
            self
        }
    }

    pub const fn is_required(self) -> bool {
        self.same_as(Strength::Required)
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strength::AbsoluteStrongest => "absolute_strongest",
            Strength::Required => "required",
            Strength::StrongPreferred => "strong_preferred",
            Strength::Preferred => "preferred",
            Strength::StrongDefault => "strong_default",
            Strength::Default => "default",
            Strength::WeakDefault => "weak_default",
            Strength::AbsoluteWeakest => "absolute_weakest",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_levels_are_strictly_ordered() {
        for pair in Strength::ALL.windows(2) {
            assert!(pair[0].stronger_than(pair[1]), "{} vs {}", pair[0], pair[1]);
            assert!(pair[1].weaker_than(pair[0]));
        }
    }

    #[test]
    fn ordering_is_transitive() {
        for (i, a) in Strength::ALL.iter().enumerate() {
            for (j, b) in Strength::ALL.iter().enumerate() {
                assert_eq!(a.stronger_than(*b), i < j);
                assert_eq!(a.weaker_than(*b), i > j);
                assert_eq!(a.same_as(*b), i == j);
            }
        }
    }

    #[test]
    fn absolute_strongest_beats_required() {
        assert!(Strength::AbsoluteStrongest.stronger_than(Strength::Required));
        assert!(Strength::Required.stronger_than(Strength::Preferred));
        assert!(Strength::WeakDefault.stronger_than(Strength::AbsoluteWeakest));
    }

    #[test]
    fn strongest_and_weakest() {
        assert_eq!(
            Strength::Preferred.strongest(Strength::Required),
            Strength::Required
        );
        assert_eq!(
            Strength::Preferred.weakest(Strength::Required),
            Strength::Preferred
        );
        assert_eq!(
            Strength::Default.weakest(Strength::Default),
            Strength::Default
        );
    }

    #[test]
    fn of_returns_canonical_level() {
        assert_eq!(Strength::of(0), Some(Strength::AbsoluteStrongest));
        assert_eq!(Strength::of(4), Some(Strength::StrongDefault));
        assert_eq!(Strength::of(7), Some(Strength::AbsoluteWeakest));
        assert_eq!(Strength::of(8), None);
        for s in Strength::ALL {
            assert_eq!(Strength::of(s.rank()), Some(s));
        }
    }

    #[test]
    fn arithmetic_values_are_monotone() {
        let values: Vec<i32> = Strength::ALL.iter().map(|s| s.arithmetic_value()).collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn display_uses_snake_case() {
        assert_eq!(Strength::StrongDefault.to_string(), "strong_default");
        assert_eq!(Strength::Required.to_string(), "required");
    }
}
