//! Combat stats that sit on top of an attack's base numbers.

pub mod modifiers;

pub use modifiers::{CombatModifiers, ModifierStat};
