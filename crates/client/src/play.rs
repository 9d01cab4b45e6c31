//! Turn loop driving a battle through its handle.
use anyhow::{Context, Result};
use battle_core::{Phase, TurnReport};
use battle_runtime::{BattleHandle, RuntimeError};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info};

use crate::render;

/// Where the player's choices come from.
enum Input {
    Auto,
    Prompt(Lines<BufReader<Stdin>>),
}

impl Input {
    /// Next line typed by the player; `None` on end of input.
    async fn line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self {
            Input::Auto => Ok(None),
            Input::Prompt(lines) => {
                println!("{prompt}");
                lines.next_line().await.context("failed to read from stdin")
            }
        }
    }
}

/// A parsed attack command: 1-based menu number and optional target index.
fn parse_attack(line: &str) -> Option<(usize, Option<usize>)> {
    let mut parts = line.split_whitespace();
    let choice = parts.next()?.parse::<usize>().ok()?.checked_sub(1)?;
    let target = match parts.next() {
        Some(target) => Some(target.parse().ok()?),
        None => None,
    };
    Some((choice, target))
}

pub async fn play(handle: &BattleHandle, autoplay: bool) -> Result<()> {
    let mut input = if autoplay {
        Input::Auto
    } else {
        Input::Prompt(BufReader::new(tokio::io::stdin()).lines())
    };

    loop {
        let view = handle.battle_state().await?;
        if view.is_over {
            let stats = handle.query_state().await?.stats;
            println!("{}", render::summary(&stats));
            info!(phase = %view.phase, "run finished");
            return Ok(());
        }

        let report = match view.phase {
            Phase::ChoosingUpgrade => choose_upgrade(handle, &mut input).await?,
            _ => {
                println!("{}", render::status_line(&view));
                let target = view.enemies.iter().position(|e| e.alive);
                attack(handle, &mut input, target).await?
            }
        };
        let Some(report) = report else {
            info!("player left the battle");
            return Ok(());
        };
        for line in report.events.iter().filter_map(render::describe) {
            println!("  {line}");
        }
    }
}

async fn attack(
    handle: &BattleHandle,
    input: &mut Input,
    default_target: Option<usize>,
) -> Result<Option<TurnReport>> {
    let attacks = handle.available_attacks().await?;
    for line in render::attack_menu(&attacks) {
        println!("  {line}");
    }
    if !attacks.iter().any(|a| a.is_ready()) {
        println!("Nothing is ready, the round passes.");
        return Ok(Some(handle.pass_turn().await?));
    }

    loop {
        let (name, target) = match input {
            Input::Auto => {
                let Some(ready) = attacks.iter().find(|a| a.is_ready()) else {
                    return Ok(Some(handle.pass_turn().await?));
                };
                (ready.attack.name.clone(), default_target)
            }
            Input::Prompt(_) => {
                let Some(line) = input.line("Attack (number [target]), or q to quit:").await? else {
                    return Ok(None);
                };
                if line.trim().eq_ignore_ascii_case("q") {
                    return Ok(None);
                }
                let Some((choice, target)) = parse_attack(&line) else {
                    println!("Type the attack number, optionally followed by a target index.");
                    continue;
                };
                let Some(available) = attacks.get(choice) else {
                    println!("There is no attack {}.", choice + 1);
                    continue;
                };
                (available.attack.name.clone(), target.or(default_target))
            }
        };

        debug!(attack = %name, ?target, "submitting player attack");
        match handle.submit_player_attack(name, target).await {
            Ok(report) => return Ok(Some(report)),
            Err(error @ RuntimeError::Battle(_)) if error.is_recoverable() => {
                println!("{error}");
                if matches!(input, Input::Auto) {
                    return Err(error.into());
                }
            }
            Err(error) => return Err(error.into()),
        }
    }
}

async fn choose_upgrade(handle: &BattleHandle, input: &mut Input) -> Result<Option<TurnReport>> {
    let offers = handle.upgrade_offers().await?;
    println!("Choose an upgrade:");
    for line in render::offer_menu(&offers) {
        println!("  {line}");
    }

    loop {
        let choice = match input {
            Input::Auto => Some(0),
            Input::Prompt(_) => {
                let prompt = "Upgrade number, s to skip, or q to quit:";
                let Some(line) = input.line(prompt).await? else {
                    return Ok(None);
                };
                match line.trim() {
                    "q" | "Q" => return Ok(None),
                    "s" | "S" => None,
                    other => match other.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
                        Some(index) if index < offers.len() => Some(index),
                        _ => {
                            println!("Type a number from the list.");
                            continue;
                        }
                    },
                }
            }
        };

        let result = match choice {
            Some(index) => handle.select_upgrade(offers[index].id.clone()).await,
            None => handle.skip_upgrade().await,
        };
        match result {
            Ok(report) => return Ok(Some(report)),
            Err(error) if error.is_recoverable() && !matches!(input, Input::Auto) => {
                println!("{error}");
            }
            Err(error) => return Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_commands_parse() {
        assert_eq!(parse_attack("2"), Some((1, None)));
        assert_eq!(parse_attack(" 1 3 "), Some((0, Some(3))));
        assert_eq!(parse_attack("0"), None);
        assert_eq!(parse_attack("jab"), None);
        assert_eq!(parse_attack("1 x"), None);
    }
}
