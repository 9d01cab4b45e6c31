//! Names of the archetypes shipped with the default content.

/// Characters a player can pick.
pub const PLAYER_ARCHETYPES: [&str; 4] = ["Brawler", "Gunslinger", "Arcanist", "Berserker"];

/// Enemy classes waves are drawn from.
pub const ENEMY_ARCHETYPES: [&str; 4] = ["Slime", "Goblin", "Skeleton", "Wraith"];

/// Case-insensitive check against [`PLAYER_ARCHETYPES`].
pub fn is_player_archetype(name: &str) -> bool {
    PLAYER_ARCHETYPES
        .iter()
        .any(|archetype| archetype.eq_ignore_ascii_case(name.trim()))
}
