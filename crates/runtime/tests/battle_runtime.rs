use std::time::Duration;

use battle_content::ContentFactory;
use battle_core::{
    ArchetypeId, AttackDefinition, AttackKind, BattleConfig, BattleError, BattleEvent,
    CombatantId, EnemyAction, Phase, Rarity, StaticCatalog, TurnReport, UpgradeDefinition,
    UpgradeEffect, WaveConfig,
};
use battle_runtime::{BattleHandle, BattleRuntime, EventBus, RuntimeError, Topic};

fn catalog() -> StaticCatalog {
    StaticCatalog::new()
        .with_moveset(
            "Knight",
            vec![
                AttackDefinition::new("Slash", AttackKind::MeleeHit, 10.0),
                AttackDefinition::new("Finisher", AttackKind::MeleeHit, 100.0).with_cooldown(5),
            ],
        )
        .with_moveset(
            ArchetypeId::DEFAULT_NAME,
            vec![
                AttackDefinition::new("Bite", AttackKind::MeleeHit, 5.0),
                AttackDefinition::new("Lick", AttackKind::MeleeHit, 1.0),
            ],
        )
        .with_upgrade(
            UpgradeDefinition::new("stone-skin", "Stone Skin", Rarity::Common)
                .with_effect(UpgradeEffect::MaxHealth(10.0)),
        )
}

/// One 30 HP enemy per wave, two waves.
fn waves() -> WaveConfig {
    WaveConfig::new()
        .with_max_waves(2)
        .with_enemy_health(30.0, 1.0)
        .with_spawn_slots(1)
}

fn config() -> BattleConfig {
    BattleConfig::default().with_waves(waves())
}

async fn start() -> (BattleRuntime, BattleHandle) {
    let runtime = BattleRuntime::builder()
        .catalog(catalog())
        .seed(7)
        .start_battle("Knight", waves())
        .await
        .expect("runtime should start");
    let handle = runtime.handle();
    (runtime, handle)
}

#[tokio::test]
async fn a_round_resolves_the_player_then_the_enemies() {
    let (runtime, handle) = start().await;
    assert_eq!(runtime.seed(), 7);

    let attacks = handle.available_attacks().await.unwrap();
    let names: Vec<_> = attacks.iter().map(|a| a.attack.name.as_str()).collect();
    assert_eq!(names, ["Slash", "Finisher"]);
    assert!(attacks.iter().all(|a| a.is_ready()));

    let report = handle.submit_player_attack("Slash", None).await.unwrap();
    assert_eq!(report.phase, Phase::AwaitingPlayerChoice);
    assert_eq!(report.enemy_actions.len(), 1);
    match &report.enemy_actions[0] {
        EnemyAction::Attacked(result) => assert_eq!(result.attack, "Bite"),
        other => panic!("enemy should have attacked, got {other:?}"),
    }

    let view = handle.battle_state().await.unwrap();
    assert_eq!(view.player_health, 95.0);
    assert_eq!(view.enemy_healths(), vec![20.0]);
    assert_eq!(view.wave, 1);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn rejected_attacks_leave_the_battle_untouched() {
    let (_runtime, handle) = start().await;
    handle.submit_player_attack("Slash", None).await.unwrap();
    let before = format!("{:?}", handle.query_state().await.unwrap());

    let unknown = handle.submit_player_attack("Fireball", None).await.unwrap_err();
    assert!(matches!(
        unknown.as_battle(),
        Some(BattleError::UnknownAttack { attack }) if attack == "Fireball"
    ));
    assert!(unknown.is_recoverable());

    let bad_target = handle.submit_player_attack("Slash", Some(4)).await.unwrap_err();
    assert!(matches!(
        bad_target,
        RuntimeError::Battle(BattleError::InvalidTarget { index: 4 })
    ));

    let pass = handle.pass_turn().await.unwrap_err();
    assert!(matches!(
        pass.as_battle(),
        Some(BattleError::AttackReady { attack }) if attack == "Slash"
    ));
    assert!(pass.is_recoverable());

    let skip = handle.skip_upgrade().await.unwrap_err();
    assert!(matches!(
        skip,
        RuntimeError::Battle(BattleError::WrongPhase { .. })
    ));

    let missing = BattleRuntime::builder().build().await;
    assert!(matches!(missing, Err(RuntimeError::MissingCatalog)));

    assert_eq!(format!("{:?}", handle.query_state().await.unwrap()), before);
}

#[tokio::test]
async fn clearing_waves_leads_to_upgrades_and_victory() {
    let (_runtime, handle) = start().await;

    let cleared = handle.submit_player_attack("Finisher", None).await.unwrap();
    assert_eq!(cleared.phase, Phase::ChoosingUpgrade);
    assert!(cleared.enemy_actions.is_empty());

    let offers = handle.upgrade_offers().await.unwrap();
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].id, "stone-skin");

    let next = handle.select_upgrade("stone-skin").await.unwrap();
    assert_eq!(next.phase, Phase::AwaitingPlayerChoice);
    let view = handle.battle_state().await.unwrap();
    assert_eq!(view.wave, 2);
    assert_eq!(view.player_max_health, 110.0);
    assert_eq!(view.enemies[0].id, CombatantId(2));

    // Cooldowns reset between waves.
    let finale = handle.submit_player_attack("Finisher", None).await.unwrap();
    assert_eq!(finale.phase, Phase::Victory);
    let stats = finale.stats.expect("final stats");
    assert_eq!(stats.waves_cleared, 2);
    assert_eq!(stats.upgrades_taken, vec!["stone-skin".to_string()]);

    let after = handle.submit_player_attack("Slash", None).await.unwrap_err();
    assert!(matches!(
        after,
        RuntimeError::Battle(BattleError::BattleOver { phase: Phase::Victory })
    ));
}

#[tokio::test]
async fn events_are_published_by_topic() {
    let bus = EventBus::with_capacity(64);
    let mut progression = bus.subscribe(Topic::Progression);
    let mut combat = bus.subscribe(Topic::Combat);

    let runtime = BattleRuntime::builder()
        .catalog(catalog())
        .battle_config(config())
        .player_archetype("Knight")
        .seed(1)
        .event_bus(bus)
        .build()
        .await
        .unwrap();
    assert!(matches!(
        runtime.opening_report().events.first(),
        Some(BattleEvent::WaveStarted { wave: 1, .. })
    ));

    let opening = tokio::time::timeout(Duration::from_secs(1), progression.recv())
        .await
        .expect("progression event")
        .unwrap();
    assert!(matches!(
        opening.battle_event(),
        BattleEvent::WaveStarted { wave: 1, .. }
    ));

    runtime
        .handle()
        .submit_player_attack("Slash", None)
        .await
        .unwrap();

    let first = tokio::time::timeout(Duration::from_secs(1), combat.recv())
        .await
        .expect("combat event")
        .unwrap();
    assert!(matches!(
        first.battle_event(),
        BattleEvent::AttackUsed { attacker, attack, .. }
            if *attacker == CombatantId::PLAYER && attack == "Slash"
    ));
    assert_eq!(first.topic(), Topic::Combat);
}

async fn play(seed: u64, rounds: usize) -> Vec<TurnReport> {
    let content = ContentFactory::embedded().load().unwrap();
    let archetype = content.player_archetype("brawler");
    let runtime = BattleRuntime::builder()
        .content(content)
        .player_archetype(archetype)
        .seed(seed)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    let mut reports = vec![runtime.opening_report().clone()];
    for _ in 0..rounds {
        let view = handle.battle_state().await.unwrap();
        if view.is_over {
            break;
        }
        let report = if view.phase == Phase::ChoosingUpgrade {
            let offers = handle.upgrade_offers().await.unwrap();
            handle.select_upgrade(offers[0].id.clone()).await.unwrap()
        } else {
            let attacks = handle.available_attacks().await.unwrap();
            let attack = attacks.iter().find(|a| a.is_ready()).expect("a ready attack");
            let target = view.enemies.iter().position(|e| e.alive);
            handle
                .submit_player_attack(attack.attack.name.clone(), target)
                .await
                .unwrap()
        };
        reports.push(report);
    }
    reports
}

#[tokio::test]
async fn a_seed_replays_the_same_battle() {
    let first = play(42, 12).await;
    let second = play(42, 12).await;
    assert_eq!(first, second);
    assert!(first.len() > 1);
}
