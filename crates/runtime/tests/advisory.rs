use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use battle_core::{
    ArchetypeId, AttackDefinition, AttackKind, BattleConfig, BattleEvent, BattleSnapshot,
    EnemyAction, StaticCatalog, WaveConfig,
};
use battle_runtime::{
    AdvisoryError, AdvisoryPolicy, BattleRuntime, PresentationSink, RuntimeConfig,
};

fn catalog() -> StaticCatalog {
    StaticCatalog::new()
        .with_moveset(
            "Knight",
            vec![AttackDefinition::new("Slash", AttackKind::MeleeHit, 10.0)],
        )
        .with_moveset(
            ArchetypeId::DEFAULT_NAME,
            vec![
                AttackDefinition::new("Bite", AttackKind::MeleeHit, 5.0).with_sound_cue("bite.ogg"),
                AttackDefinition::new("Lick", AttackKind::MeleeHit, 1.0),
            ],
        )
}

fn config(timeout: Duration) -> RuntimeConfig {
    RuntimeConfig {
        battle: BattleConfig::default().with_waves(
            WaveConfig::new()
                .with_enemy_health(30.0, 1.0)
                .with_spawn_slots(1),
        ),
        advisory_timeout: timeout,
        ..RuntimeConfig::default()
    }
}

/// Answers with a fixed choice and records every snapshot it was shown.
#[derive(Default)]
struct Scripted {
    answer: Option<&'static str>,
    seen: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl AdvisoryPolicy for Scripted {
    async fn advise(&self, snapshot: &str) -> Result<Option<String>, AdvisoryError> {
        self.seen.lock().unwrap().push(snapshot.to_owned());
        Ok(self.answer.map(str::to_owned))
    }
}

struct Sleepy;

#[async_trait]
impl AdvisoryPolicy for Sleepy {
    async fn advise(&self, _snapshot: &str) -> Result<Option<String>, AdvisoryError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Some("Lick".into()))
    }
}

/// Damage the player took from one round of Slash against a single enemy.
async fn damage_taken_with(policy: impl AdvisoryPolicy + 'static, timeout: Duration) -> f32 {
    let runtime = BattleRuntime::builder()
        .config(config(timeout))
        .catalog(catalog())
        .player_archetype("Knight")
        .seed(11)
        .advisory_policy(policy)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    let report = handle.submit_player_attack("Slash", None).await.unwrap();
    assert!(matches!(report.enemy_actions.as_slice(), [EnemyAction::Attacked(_)]));

    let view = handle.battle_state().await.unwrap();
    view.player_max_health - view.player_health
}

#[tokio::test]
async fn valid_advice_picks_the_attack() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let policy = Scripted {
        answer: Some("lick"),
        seen: Arc::clone(&seen),
    };

    assert_eq!(damage_taken_with(policy, Duration::from_secs(1)).await, 1.0);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let snapshot: BattleSnapshot = serde_json::from_str(&seen[0]).unwrap();
    assert_eq!(snapshot.wave, 1);
    let ready: Vec<_> = snapshot.ready_attacks.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(ready, ["Bite", "Lick"]);
}

#[tokio::test]
async fn unknown_advice_falls_back_to_the_strongest_attack() {
    let policy = Scripted {
        answer: Some("Fireball"),
        ..Scripted::default()
    };
    assert_eq!(damage_taken_with(policy, Duration::from_secs(1)).await, 5.0);
}

#[tokio::test]
async fn no_opinion_falls_back_to_the_strongest_attack() {
    assert_eq!(
        damage_taken_with(Scripted::default(), Duration::from_secs(1)).await,
        5.0
    );
}

#[tokio::test]
async fn slow_advice_times_out_and_the_battle_goes_on() {
    let round = tokio::time::timeout(
        Duration::from_secs(2),
        damage_taken_with(Sleepy, Duration::from_millis(20)),
    )
    .await
    .expect("timeout should bound the enemy turn");
    assert_eq!(round, 5.0);
}

#[derive(Default)]
struct Recorder(Arc<Mutex<Vec<String>>>);

impl PresentationSink for Recorder {
    fn present(&self, event: &BattleEvent) {
        if let BattleEvent::AttackUsed {
            sound_cue: Some(cue),
            ..
        } = event
        {
            self.0.lock().unwrap().push(cue.clone());
        }
    }
}

#[tokio::test]
async fn presentation_sink_sees_sound_cues() {
    let cues = Arc::new(Mutex::new(Vec::new()));
    let runtime = BattleRuntime::builder()
        .config(config(Duration::from_secs(1)))
        .catalog(catalog())
        .player_archetype("Knight")
        .presentation(Recorder(Arc::clone(&cues)))
        .build()
        .await
        .unwrap();

    runtime
        .handle()
        .submit_player_attack("Slash", None)
        .await
        .unwrap();

    assert_eq!(*cues.lock().unwrap(), vec!["bite.ogg".to_string()]);
}
