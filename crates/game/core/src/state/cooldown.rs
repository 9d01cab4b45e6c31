//! Per-combatant attack cooldowns.
//!
//! Cooldowns use the same fresh-mark rule as status effects: a cooldown
//! started since the previous round tick survives that tick untouched, so an
//! attack with `max_cooldown = N` is unavailable for exactly `N` of its
//! owner's following turns.

use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Cooldown {
    remaining: u32,
    fresh: bool,
}

/// Remaining cooldown per attack name. Absent entries are ready.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cooldowns {
    entries: BTreeMap<String, Cooldown>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns left before `attack` can be used again (0 = ready).
    pub fn remaining(&self, attack: &str) -> u32 {
        self.entries.get(attack).map_or(0, |c| c.remaining)
    }

    pub fn is_ready(&self, attack: &str) -> bool {
        self.remaining(attack) == 0
    }

    /// Puts `attack` on cooldown for `turns` turns.
    pub fn start(&mut self, attack: &str, turns: u32) {
        if turns == 0 {
            self.entries.remove(attack);
            return;
        }
        self.entries.insert(
            attack.to_owned(),
            Cooldown {
                remaining: turns,
                fresh: true,
            },
        );
    }

    /// Advances every cooldown by one round.
    pub fn tick(&mut self) {
        for cooldown in self.entries.values_mut() {
            if cooldown.fresh {
                cooldown.fresh = false;
            } else {
                cooldown.remaining = cooldown.remaining.saturating_sub(1);
            }
        }
        self.entries.retain(|_, c| c.remaining > 0);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Attacks currently cooling down, with their remaining turns.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries
            .iter()
            .map(|(name, c)| (name.as_str(), c.remaining))
    }
}
