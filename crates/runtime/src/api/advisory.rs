//! Optional external advice for enemy attack selection.
//!
//! An [`AdvisoryPolicy`] receives the acting enemy's view of the battle as
//! JSON and may answer with the name of one of its ready attacks. Advice is
//! bounded by a timeout; a slow, failing or nonsensical policy degrades to
//! the default strategy and never stalls or corrupts the battle.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use battle_core::{
    AttackDefinition, BattleSnapshot, Combatant, EnemyStrategy, HighestDamageStrategy,
    ready_by_name,
};

use super::errors::AdvisoryError;

/// External source of enemy attack choices.
///
/// `snapshot` is a JSON-encoded [`BattleSnapshot`]. Returning `Ok(None)`
/// means "no opinion".
#[async_trait]
pub trait AdvisoryPolicy: Send + Sync {
    async fn advise(&self, snapshot: &str) -> Result<Option<String>, AdvisoryError>;
}

/// Enemy strategy that consults an [`AdvisoryPolicy`] first.
#[derive(Clone)]
pub struct AdvisedEnemyStrategy {
    policy: Arc<dyn AdvisoryPolicy>,
    timeout: Duration,
    fallback: HighestDamageStrategy,
}

impl AdvisedEnemyStrategy {
    pub fn new(policy: Arc<dyn AdvisoryPolicy>, timeout: Duration) -> Self {
        Self {
            policy,
            timeout,
            fallback: HighestDamageStrategy,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Picks one of `ready`, preferring the policy's advice.
    pub async fn choose_attack<'a>(
        &self,
        enemy: &Combatant,
        ready: &[&'a AttackDefinition],
        snapshot: &BattleSnapshot,
    ) -> Option<&'a AttackDefinition> {
        if ready.is_empty() {
            return None;
        }

        match self.consult(ready, snapshot).await {
            Ok(Some(attack)) => {
                debug!(enemy = %enemy.id, attack = %attack.name, "following advisory choice");
                return Some(attack);
            }
            Ok(None) => debug!(enemy = %enemy.id, "advisory policy had no opinion"),
            Err(error) => {
                warn!(enemy = %enemy.id, %error, "advisory failed, using default strategy")
            }
        }

        self.fallback.choose_attack(enemy, ready, snapshot)
    }

    async fn consult<'a>(
        &self,
        ready: &[&'a AttackDefinition],
        snapshot: &BattleSnapshot,
    ) -> Result<Option<&'a AttackDefinition>, AdvisoryError> {
        let payload = serde_json::to_string(snapshot)?;
        let advice = tokio::time::timeout(self.timeout, self.policy.advise(&payload))
            .await
            .map_err(|_| AdvisoryError::Timeout(self.timeout))??;

        let Some(advice) = advice else {
            return Ok(None);
        };
        let name = normalize_advice(&advice);
        ready_by_name(ready, name)
            .map(Some)
            .ok_or_else(|| AdvisoryError::ParseFailure(advice.clone()))
    }
}

/// Strips the quoting and trailing punctuation free-form answers tend to carry.
fn normalize_advice(advice: &str) -> &str {
    advice.trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '.' | '!'))
}
