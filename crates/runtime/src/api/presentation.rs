//! Fire-and-forget presentation hooks.
//!
//! Hosts that animate attacks or play sound cues implement
//! [`PresentationSink`]. The worker calls it after each state change with the
//! events of that change; nothing it does can influence the battle.
use battle_core::BattleEvent;
use tracing::debug;

pub trait PresentationSink: Send + Sync {
    fn present(&self, event: &BattleEvent);
}

/// Sink that only traces sound cues and defeats.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl PresentationSink for TracingSink {
    fn present(&self, event: &BattleEvent) {
        match event {
            BattleEvent::AttackUsed {
                attacker,
                attack,
                sound_cue: Some(cue),
                ..
            } => debug!(%attacker, %attack, %cue, "play sound cue"),
            BattleEvent::Defeated { combatant } => debug!(%combatant, "play defeat animation"),
            _ => {}
        }
    }
}
