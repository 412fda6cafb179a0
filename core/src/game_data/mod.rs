//! Static game knowledge used by the analysis filter.
//!
//! The ignore lists are generated at build time from `data/*.txt`.

include!(concat!(env!("OUT_DIR"), "/ignore_lists.rs"));

/// Line type tags of the network log.
pub mod line_tag {
    pub const GAME_LOG: &str = "00";
    pub const CHANGE_ZONE: &str = "01";
    pub const CHANGE_PRIMARY_PLAYER: &str = "02";
    pub const ADD_COMBATANT: &str = "03";
    pub const REMOVE_COMBATANT: &str = "04";
    pub const PARTY_LIST: &str = "11";
    pub const PLAYER_STATS: &str = "12";
    pub const STARTS_USING: &str = "20";
    pub const ABILITY: &str = "21";
    pub const AOE_ABILITY: &str = "22";
    pub const CANCEL_ABILITY: &str = "23";
    pub const DOT_HOT: &str = "24";
    pub const WAS_DEFEATED: &str = "25";
    pub const GAINS_EFFECT: &str = "26";
    pub const HEAD_MARKER: &str = "27";
    pub const RAID_MARKER: &str = "28";
    pub const TARGET_MARKER: &str = "29";
    pub const LOSES_EFFECT: &str = "30";
    pub const GAUGE: &str = "31";
    pub const WORLD: &str = "32";
    pub const ACTOR_CONTROL: &str = "33";
    pub const NAME_TOGGLE: &str = "34";
    pub const TETHER: &str = "35";
    pub const LIMIT_BREAK: &str = "36";
    pub const EFFECT_RESULT: &str = "37";
    pub const STATUS_EFFECT: &str = "38";
    pub const UPDATE_HP: &str = "39";
    pub const MAP: &str = "40";
    pub const SYSTEM_LOG_MESSAGE: &str = "41";
    pub const STATUS_LIST: &str = "42";
    pub const PARSER_INFO: &str = "249";
    pub const PROCESS_INFO: &str = "250";
    pub const DEBUG: &str = "251";
    pub const PACKET_DUMP: &str = "252";
    pub const VERSION: &str = "253";
    pub const ERROR: &str = "254";
    pub const LINE_REGISTRATION: &str = "256";
    pub const MAP_EFFECT: &str = "257";
    pub const FATE_DIRECTOR: &str = "258";
    pub const CE_DIRECTOR: &str = "259";
    pub const IN_COMBAT: &str = "260";
    pub const COMBATANT_MEMORY: &str = "261";
    pub const RSV_DATA: &str = "262";
    pub const STARTS_USING_EXTRA: &str = "263";
    pub const ABILITY_EXTRA: &str = "264";
    pub const CONTENT_FINDER_SETTINGS: &str = "265";
    pub const NPC_YELL: &str = "266";
    pub const BATTLE_TALK: &str = "267";
    pub const COUNTDOWN: &str = "268";
    pub const COUNTDOWN_CANCEL: &str = "269";
    pub const ACTOR_MOVE: &str = "270";
    pub const ACTOR_SET_POS: &str = "271";
    pub const SPAWN_NPC_EXTRA: &str = "272";
    pub const ACTOR_CONTROL_EXTRA: &str = "273";
    pub const ACTOR_CONTROL_SELF_EXTRA: &str = "274";
}

/// Combatants whose actions are excluded from analysis output (player pets and summons).
pub fn is_ignored_combatant_name(name: &str) -> bool {
    IGNORED_COMBATANT_NAMES.contains(name.trim().to_lowercase().as_str())
}

/// Abilities that never describe a mechanic: auto-attacks and unnamed actions.
pub fn is_ignored_ability_name(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    lower.is_empty() || lower.starts_with("unknown_") || IGNORED_ABILITY_NAMES.contains(lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_combatant_names_are_case_insensitive() {
        assert!(is_ignored_combatant_name("Carbuncle"));
        assert!(is_ignored_combatant_name("EARTHLY STAR"));
        assert!(!is_ignored_combatant_name("Striking Dummy"));
        assert!(!is_ignored_combatant_name(""));
    }

    #[test]
    fn test_unnamed_abilities_are_ignored() {
        assert!(is_ignored_ability_name("attack"));
        assert!(is_ignored_ability_name("Attack"));
        assert!(is_ignored_ability_name(""));
        assert!(is_ignored_ability_name("Unknown_7A2B"));
        assert!(!is_ignored_ability_name("Megaflare"));
    }
}
