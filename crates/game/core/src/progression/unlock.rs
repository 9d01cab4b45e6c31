//! Which attacks of the player's moveset are usable.

use super::upgrade::AttackUnlock;
use crate::attack::AttackDefinition;

/// How many attacks the player starts a run with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnlockMode {
    /// Every attack of the moveset is available from the start.
    #[default]
    Full,
    /// Only the first attack; the rest are unlocked by upgrades.
    Progressive,
}

/// Unlocked attack names, kept in moveset order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loadout {
    unlocked: Vec<String>,
}

impl Loadout {
    pub fn for_mode(mode: UnlockMode, moveset: &[AttackDefinition]) -> Self {
        match mode {
            UnlockMode::Full => Self::full(moveset),
            UnlockMode::Progressive => Self::starting(moveset),
        }
    }

    pub fn full(moveset: &[AttackDefinition]) -> Self {
        Self {
            unlocked: moveset.iter().map(|a| a.name.clone()).collect(),
        }
    }

    /// Only the starting attack (position 0).
    pub fn starting(moveset: &[AttackDefinition]) -> Self {
        Self {
            unlocked: moveset.iter().take(1).map(|a| a.name.clone()).collect(),
        }
    }

    pub fn is_unlocked(&self, name: &str) -> bool {
        self.unlocked.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.unlocked
    }

    /// Unlocked attacks, in moveset order.
    pub fn attacks<'m>(
        &self,
        moveset: &'m [AttackDefinition],
    ) -> impl Iterator<Item = &'m AttackDefinition> {
        moveset.iter().filter(|a| self.is_unlocked(&a.name))
    }

    pub fn next_locked<'a>(&self, moveset: &'a [AttackDefinition]) -> Option<&'a AttackDefinition> {
        moveset.iter().find(|a| !self.is_unlocked(&a.name))
    }

    /// Returns true if the unlock would open a new attack.
    pub fn can_unlock(&self, unlock: &AttackUnlock, moveset: &[AttackDefinition]) -> bool {
        self.target_of(unlock, moveset).is_some()
    }

    /// Unlocks the attack named by `unlock`. Returns its name if it was locked.
    pub fn unlock_from(
        &mut self,
        unlock: &AttackUnlock,
        moveset: &[AttackDefinition],
    ) -> Option<String> {
        let name = self.target_of(unlock, moveset)?.name.clone();
        self.unlocked.push(name.clone());
        self.unlocked.sort_by_key(|n| {
            moveset
                .iter()
                .position(|a| &a.name == n)
                .unwrap_or(usize::MAX)
        });
        Some(name)
    }

    fn target_of<'a>(
        &self,
        unlock: &AttackUnlock,
        moveset: &'a [AttackDefinition],
    ) -> Option<&'a AttackDefinition> {
        match unlock {
            AttackUnlock::Next => self.next_locked(moveset),
            AttackUnlock::Named(name) => moveset
                .iter()
                .find(|a| &a.name == name && !self.is_unlocked(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::AttackKind;

    fn moveset() -> Vec<AttackDefinition> {
        ["Jab", "Hook", "Uppercut"]
            .into_iter()
            .map(|name| AttackDefinition::new(name, AttackKind::MeleeHit, 5.0))
            .collect()
    }

    #[test]
    fn progressive_mode_starts_with_the_first_attack() {
        let moveset = moveset();
        let loadout = Loadout::for_mode(UnlockMode::Progressive, &moveset);
        assert_eq!(loadout.names(), ["Jab".to_string()]);
        assert_eq!(loadout.next_locked(&moveset).unwrap().name, "Hook");
    }

    #[test]
    fn named_unlocks_keep_moveset_order() {
        let moveset = moveset();
        let mut loadout = Loadout::starting(&moveset);
        let unlocked = loadout.unlock_from(&AttackUnlock::Named("Uppercut".into()), &moveset);
        assert_eq!(unlocked.as_deref(), Some("Uppercut"));

        loadout.unlock_from(&AttackUnlock::Next, &moveset);
        let names: Vec<&str> = loadout.attacks(&moveset).map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Jab", "Hook", "Uppercut"]);
        assert_eq!(loadout.names(), ["Jab", "Hook", "Uppercut"]);
    }

    #[test]
    fn nothing_left_to_unlock() {
        let moveset = moveset();
        let mut loadout = Loadout::full(&moveset);
        assert!(!loadout.can_unlock(&AttackUnlock::Next, &moveset));
        assert_eq!(loadout.unlock_from(&AttackUnlock::Next, &moveset), None);
        assert!(!loadout.can_unlock(&AttackUnlock::Named("Kick".into()), &moveset));
    }
}
