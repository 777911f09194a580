use serde::{Deserialize, Serialize};

/// What a history line records.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    Start,
    Evolution,
    Devolution,
    Excrement,
    TypeChange,
    DoomsdayDeviceTriggered,
    DoomsdayDeviceExploded,
    Death,
    DeathDuringImmortalEvolution,
    /// An item from a feeding event was applied.
    Item,
}

impl HistoryKind {
    /// Translation scope key, e.g. `history.<key>.description`.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            HistoryKind::Start => "start",
            HistoryKind::Evolution => "evolution",
            HistoryKind::Devolution => "devolution",
            HistoryKind::Excrement => "excrement",
            HistoryKind::TypeChange => "type_change",
            HistoryKind::DoomsdayDeviceTriggered => "doomsday_device_triggered",
            HistoryKind::DoomsdayDeviceExploded => "doomsday_device_exploded",
            HistoryKind::Death => "death",
            HistoryKind::DeathDuringImmortalEvolution => "death_during_immortal_evolution",
            HistoryKind::Item => "item",
        }
    }
}

/// One append-only entry of a pet's history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryEvent {
    pub kind: HistoryKind,
    pub height: u64,
    /// Feeding event or doomsday device that caused the entry.
    pub id: Option<String>,
    pub description: String,
    pub emoji: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_key() {
        for kind in [
            HistoryKind::Start,
            HistoryKind::TypeChange,
            HistoryKind::DeathDuringImmortalEvolution,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.key()));
        }
    }
}
