//! Background workers owned by the runtime.

mod battle;

pub(crate) use battle::{BattleWorker, Command};
