use crate::error::{LfResult, LineupForgeError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Which side of the adjacency constraint a player falls on.
/// `B` players may never bat back to back (including last-to-first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlayerGroup {
    #[default]
    #[serde(alias = "M", alias = "m", alias = "a")]
    A,
    #[serde(alias = "F", alias = "f", alias = "b")]
    B,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "gender")]
    pub group: PlayerGroup,
    #[serde(default)]
    pub outs: u32,
    #[serde(default)]
    pub singles: u32,
    #[serde(default)]
    pub doubles: u32,
    #[serde(default)]
    pub triples: u32,
    #[serde(default, alias = "homeRuns", alias = "home_runs")]
    pub homeruns: u32,
}

impl Player {
    pub fn new(id: &str, group: PlayerGroup, counts: [u32; 5]) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            group,
            outs: counts[0],
            singles: counts[1],
            doubles: counts[2],
            triples: counts[3],
            homeruns: counts[4],
        }
    }

    /// Counts in outcome order: out, single, double, triple, home run.
    pub fn outcome_counts(&self) -> [u32; 5] {
        [
            self.outs,
            self.singles,
            self.doubles,
            self.triples,
            self.homeruns,
        ]
    }

    pub fn plate_appearances(&self) -> u64 {
        self.outcome_counts().iter().map(|&c| c as u64).sum()
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsDocument {
    pub players: Vec<Player>,
}

impl StatsDocument {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LfResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LineupForgeError::Config(format!(
                "Unable to read the stats file from '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> LfResult<Self> {
        let doc: StatsDocument = serde_json::from_str(content)?;
        doc.validate()?;
        debug!("Loaded stats for {} players", doc.players.len());
        Ok(doc)
    }

    /// Rejects empty and duplicate ids.
    pub fn validate(&self) -> LfResult<()> {
        let mut seen = HashSet::new();
        for p in &self.players {
            if p.id.trim().is_empty() {
                return Err(LineupForgeError::Config(
                    "Player entry with an empty id".to_string(),
                ));
            }
            if !seen.insert(p.id.as_str()) {
                return Err(LineupForgeError::Config(format!(
                    "Duplicate player id '{}'",
                    p.id
                )));
            }
        }
        Ok(())
    }

    /// Resolves a list of ids or names into shared players, in the order given.
    /// An empty selection means every player in the document.
    pub fn select(&self, selection: &[String]) -> LfResult<Vec<Arc<Player>>> {
        if selection.is_empty() {
            return Ok(self.players.iter().cloned().map(Arc::new).collect());
        }

        let mut chosen: Vec<Arc<Player>> = Vec::with_capacity(selection.len());
        for key in selection {
            let key = key.trim();
            let player = self
                .players
                .iter()
                .find(|p| p.id == key)
                .or_else(|| self.players.iter().find(|p| p.name == key))
                .ok_or_else(|| {
                    LineupForgeError::Config(format!("Unknown player '{}' in lineup", key))
                })?;
            if chosen.iter().any(|c| c.id == player.id) {
                return Err(LineupForgeError::Config(format!(
                    "Player '{}' was selected more than once",
                    key
                )));
            }
            chosen.push(Arc::new(player.clone()));
        }
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "players": [
            { "id": "p1", "name": "Oscar", "gender": "M", "outs": 5, "singles": 3 },
            { "id": "p2", "name": "Molly", "gender": "F", "outs": 4, "doubles": 2, "homeRuns": 1 },
            { "id": "p3", "name": "Nelly", "group": "B", "outs": 6, "triples": 1 }
        ]
    }"#;

    #[test]
    fn parses_gender_and_group_aliases() {
        let doc = StatsDocument::from_json(DOC).unwrap();
        assert_eq!(doc.players[0].group, PlayerGroup::A);
        assert_eq!(doc.players[1].group, PlayerGroup::B);
        assert_eq!(doc.players[2].group, PlayerGroup::B);
        assert_eq!(doc.players[1].homeruns, 1);
        assert_eq!(doc.players[1].plate_appearances(), 7);
    }

    #[test]
    fn selects_by_id_or_name_in_order() {
        let doc = StatsDocument::from_json(DOC).unwrap();
        let chosen = doc
            .select(&["Nelly".to_string(), "p1".to_string()])
            .unwrap();
        let ids: Vec<&str> = chosen.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p3", "p1"]);
    }

    #[test]
    fn empty_selection_means_everyone() {
        let doc = StatsDocument::from_json(DOC).unwrap();
        assert_eq!(doc.select(&[]).unwrap().len(), 3);
    }

    #[test]
    fn unknown_and_duplicate_players_are_rejected() {
        let doc = StatsDocument::from_json(DOC).unwrap();
        assert!(matches!(
            doc.select(&["nobody".to_string()]),
            Err(LineupForgeError::Config(_))
        ));
        assert!(matches!(
            doc.select(&["p1".to_string(), "Oscar".to_string()]),
            Err(LineupForgeError::Config(_))
        ));
    }

    #[test]
    fn duplicate_ids_fail_validation() {
        let json = r#"{ "players": [ { "id": "x", "outs": 1 }, { "id": "x", "outs": 1 } ] }"#;
        assert!(StatsDocument::from_json(json).is_err());
    }
}
