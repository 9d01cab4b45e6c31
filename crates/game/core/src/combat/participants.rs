use crate::state::{Combatant, CombatantId};

/// Mutable view of everyone on the field for a single resolution.
///
/// Combatants are looked up by id one at a time, so the resolver never holds
/// two mutable borrows at once.
#[derive(Debug)]
pub struct Participants<'a> {
    player: &'a mut Combatant,
    enemies: &'a mut [Combatant],
}

impl<'a> Participants<'a> {
    pub fn new(player: &'a mut Combatant, enemies: &'a mut [Combatant]) -> Self {
        Self { player, enemies }
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        if id.is_player() {
            Some(&*self.player)
        } else {
            self.enemies.iter().find(|e| e.id == id)
        }
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        if id.is_player() {
            Some(&mut *self.player)
        } else {
            self.enemies.iter_mut().find(|e| e.id == id)
        }
    }

    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.get(id).is_some_and(Combatant::is_alive)
    }

    /// Most injured living combatant on `id`'s side; ties go to spawn order.
    pub fn most_injured_ally(&self, id: CombatantId) -> Option<CombatantId> {
        if id.is_player() {
            return self.player.is_alive().then_some(id);
        }
        self.enemies
            .iter()
            .filter(|e| e.is_alive())
            .fold(None::<&Combatant>, |best, e| match best {
                Some(b) if b.missing_health() >= e.missing_health() => Some(b),
                _ => Some(e),
            })
            .map(|e| e.id)
    }
}
