//! Built-in line definitions for the network log.
//!
//! Custom TOML definitions loaded on top of this table replace entries with the
//! same tag (see `registry::config`).

use super::schema::{LineRole, LineSchema};
use crate::game_data::line_tag::*;

/// Combatant ids of non-player entities.
pub const NPC_ID: &str = "4[0-9A-F]{7}";

pub fn builtin_schemas() -> Vec<LineSchema> {
    let ability = LineRole::Ability { name: 5 };
    let combatant_added = LineRole::CombatantAdded { id: 2, name: 3 };
    let combatant_removed = LineRole::CombatantRemoved { id: 2, name: 3 };

    vec![
        // 00|ts|code|name|line|hash
        LineSchema::new(GAME_LOG, "GameLog")
            .substitutable(&[3, 4])
            .filter(&[(2, "0039|0044|0839")]),
        LineSchema::new(CHANGE_ZONE, "ChangeZone")
            .role(LineRole::ZoneChange { id: 2, name: 3 })
            .last()
            .analysis_all(),
        LineSchema::new(CHANGE_PRIMARY_PLAYER, "ChangePrimaryPlayer").last(),
        // 03|ts|id|name|job|level|ownerId|worldId|world|npcNameId|npcBaseId|...
        LineSchema::new(ADD_COMBATANT, "AddCombatant")
            .role(combatant_added)
            .combatant_ids(&[2])
            .filter(&[(2, NPC_ID)]),
        LineSchema::new(REMOVE_COMBATANT, "RemoveCombatant")
            .role(combatant_removed)
            .combatant_ids(&[2])
            .filter(&[(2, NPC_ID)]),
        LineSchema::new(PARTY_LIST, "PartyList").last(),
        LineSchema::new(PLAYER_STATS, "PlayerStats").last(),
        // 20|ts|sourceId|source|id|ability|targetId|target|castTime|...
        LineSchema::new(STARTS_USING, "StartsUsing")
            .role(ability)
            .substitutable(&[5])
            .combatant_ids(&[2])
            .filter(&[(2, NPC_ID)]),
        LineSchema::new(ABILITY, "Ability")
            .role(ability)
            .substitutable(&[5])
            .combatant_ids(&[2])
            .filter(&[(2, NPC_ID)]),
        LineSchema::new(AOE_ABILITY, "NetworkAOEAbility")
            .role(ability)
            .substitutable(&[5])
            .combatant_ids(&[2])
            .filter(&[(2, NPC_ID)]),
        LineSchema::new(CANCEL_ABILITY, "NetworkCancelAbility").substitutable(&[5]),
        LineSchema::new(DOT_HOT, "NetworkDoT"),
        LineSchema::new(WAS_DEFEATED, "WasDefeated").analysis_all(),
        // 26|ts|effectId|effect|duration|sourceId|source|targetId|target|count|...
        LineSchema::new(GAINS_EFFECT, "GainsEffect")
            .substitutable(&[3])
            .combatant_ids(&[5])
            .filter(&[(5, NPC_ID)])
            .filter(&[(7, NPC_ID)]),
        LineSchema::new(HEAD_MARKER, "HeadMarker").analysis_all(),
        LineSchema::new(RAID_MARKER, "NetworkRaidMarker"),
        LineSchema::new(TARGET_MARKER, "NetworkTargetMarker"),
        LineSchema::new(LOSES_EFFECT, "LosesEffect")
            .substitutable(&[3])
            .combatant_ids(&[5])
            .filter(&[(5, NPC_ID)])
            .filter(&[(7, NPC_ID)]),
        LineSchema::new(GAUGE, "NetworkGauge"),
        LineSchema::new(WORLD, "NetworkWorld"),
        LineSchema::new(ACTOR_CONTROL, "ActorControl").analysis_all(),
        LineSchema::new(NAME_TOGGLE, "NameToggle")
            .combatant_ids(&[2])
            .filter(&[(2, NPC_ID)]),
        LineSchema::new(TETHER, "Tether").analysis_all(),
        LineSchema::new(LIMIT_BREAK, "LimitBreak"),
        LineSchema::new(EFFECT_RESULT, "NetworkEffectResult"),
        LineSchema::new(STATUS_EFFECT, "StatusEffect"),
        LineSchema::new(UPDATE_HP, "UpdateHp"),
        LineSchema::new(MAP, "Map").last().analysis_all(),
        LineSchema::new(SYSTEM_LOG_MESSAGE, "SystemLogMessage").analysis_all(),
        LineSchema::new(STATUS_LIST, "StatusList3"),
        LineSchema::new(PARSER_INFO, "ParserInfo").global(),
        LineSchema::new(PROCESS_INFO, "ProcessInfo").global(),
        LineSchema::new(DEBUG, "Debug"),
        LineSchema::new(PACKET_DUMP, "PacketDump"),
        LineSchema::new(VERSION, "Version").global(),
        LineSchema::new(ERROR, "Error"),
        LineSchema::new(LINE_REGISTRATION, "LineRegistration").global(),
        LineSchema::new(MAP_EFFECT, "MapEffect").analysis_all(),
        LineSchema::new(FATE_DIRECTOR, "FateDirector"),
        LineSchema::new(CE_DIRECTOR, "CEDirector").analysis_all(),
        LineSchema::new(IN_COMBAT, "InCombat").analysis_all(),
        // 261|ts|change|id|...
        LineSchema::new(COMBATANT_MEMORY, "CombatantMemory")
            .combatant_ids(&[3])
            .filter(&[(3, NPC_ID)]),
        // 262|ts|locale|unknown|key|value|hash
        LineSchema::new(RSV_DATA, "RSVData")
            .role(LineRole::Substitution { key: 4, value: 5 })
            .analysis_all(),
        LineSchema::new(STARTS_USING_EXTRA, "StartsUsingExtra"),
        LineSchema::new(ABILITY_EXTRA, "AbilityExtra"),
        LineSchema::new(CONTENT_FINDER_SETTINGS, "ContentFinderSettings")
            .last()
            .analysis_all(),
        LineSchema::new(NPC_YELL, "NpcYell").analysis_all(),
        LineSchema::new(BATTLE_TALK, "BattleTalk2").analysis_all(),
        LineSchema::new(COUNTDOWN, "Countdown").analysis_all(),
        LineSchema::new(COUNTDOWN_CANCEL, "CountdownCancel"),
        LineSchema::new(ACTOR_MOVE, "ActorMove")
            .combatant_ids(&[2])
            .filter(&[(2, NPC_ID)]),
        LineSchema::new(ACTOR_SET_POS, "ActorSetPos")
            .combatant_ids(&[2])
            .filter(&[(2, NPC_ID)]),
        LineSchema::new(SPAWN_NPC_EXTRA, "SpawnNpcExtra")
            .combatant_ids(&[2])
            .filter(&[(2, NPC_ID)]),
        LineSchema::new(ACTOR_CONTROL_EXTRA, "ActorControlExtra")
            .combatant_ids(&[2])
            .filter(&[(2, NPC_ID)]),
        LineSchema::new(ACTOR_CONTROL_SELF_EXTRA, "ActorControlSelfExtra")
            .combatant_ids(&[2])
            .filter(&[(2, NPC_ID)]),
    ]
}
