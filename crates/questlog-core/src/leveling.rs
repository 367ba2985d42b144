//! The leveling curve — a pure function from cumulative experience to
//! level and max-HP growth. No side effects, no I/O.

use serde::{Deserialize, Serialize};

// ─── Curve ───────────────────────────────────────────────────────────────────

/// Parameters of the experience threshold.
///
/// The default is the classic linear rule: a user levels up while
/// `exp >= level * 100`, gaining 10 max HP per level. The rule is a
/// policy choice, not a universal constant, so both knobs are
/// configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCurve {
  pub exp_per_level:    i64,
  pub max_hp_per_level: i64,
}

impl Default for LevelCurve {
  fn default() -> Self {
    Self {
      exp_per_level:    100,
      max_hp_per_level: 10,
    }
  }
}

/// The outcome of applying an experience gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
  pub level:         i64,
  pub exp:           i64,
  pub max_hp:        i64,
  pub levels_gained: i64,
}

impl LevelCurve {
  /// Add `gained` experience to the given stats and resolve any
  /// level-ups.
  ///
  /// The threshold is re-checked against the *new* level after each
  /// level-up, so a single large grant can cross several levels in one
  /// call. Level, experience, and max HP never decrease; a non-positive
  /// gain leaves experience untouched. A non-positive `exp_per_level`
  /// disables leveling entirely.
  pub fn apply_experience(
    &self,
    level:  i64,
    exp:    i64,
    max_hp: i64,
    gained: i64,
  ) -> Progression {
    let mut p = Progression {
      level: level.max(1),
      exp: exp + gained.max(0),
      max_hp,
      levels_gained: 0,
    };

    while self.exp_per_level > 0 && p.exp >= p.level * self.exp_per_level {
      p.level += 1;
      p.max_hp += self.max_hp_per_level;
      p.levels_gained += 1;
    }

    p
  }
}
