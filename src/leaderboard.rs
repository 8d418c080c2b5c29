//! Leaderboard
//!
//! Persisted to LocalStorage, keeps the top 10 by revenue.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;

/// "Biggest challenge" options offered on the lead form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Challenge {
    NeedMoreLeads,
    LowWebsiteTraffic,
    PoorBrandRecognition,
    InconsistentMarketing,
    Other,
}

impl Challenge {
    pub const ALL: [Challenge; 5] = [
        Challenge::NeedMoreLeads,
        Challenge::LowWebsiteTraffic,
        Challenge::PoorBrandRecognition,
        Challenge::InconsistentMarketing,
        Challenge::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Challenge::NeedMoreLeads => "Need More Leads",
            Challenge::LowWebsiteTraffic => "Low Website Traffic",
            Challenge::PoorBrandRecognition => "Poor Brand Recognition",
            Challenge::InconsistentMarketing => "Inconsistent Marketing",
            Challenge::Other => "Other",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// A single leaderboard row
///
/// Field names match the JSON the landing page has always stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub business_name: String,
    /// Final revenue
    pub score: u64,
    pub customers: u32,
    /// Free text; seed rows use short labels that aren't `Challenge` values
    pub challenge: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_tip: Option<String>,
}

impl LeaderboardEntry {
    pub fn new(business_name: impl Into<String>, score: u64, customers: u32, challenge: Challenge) -> Self {
        Self {
            business_name: business_name.into(),
            score,
            customers,
            challenge: challenge.as_str().to_string(),
            ai_tip: None,
        }
    }

    pub fn with_tip(mut self, tip: impl Into<String>) -> Self {
        self.ai_tip = Some(tip.into());
        self
    }
}

/// Where the ranked list lives between visits
pub trait LeaderboardStore {
    /// `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<Vec<LeaderboardEntry>>>;
    fn save(&mut self, entries: &[LeaderboardEntry]) -> Result<()>;
}

/// Ranked list, sorted descending by score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rows shown to first-time visitors
    pub fn seeded() -> Self {
        let seed = |name: &str, score: u64, customers: u32, challenge: &str| LeaderboardEntry {
            business_name: name.to_string(),
            score,
            customers,
            challenge: challenge.to_string(),
            ai_tip: None,
        };
        Self {
            entries: vec![
                seed("Apex Digital", 85_000, 85, "Growth"),
                seed("Creative Co", 62_000, 60, "Branding"),
                seed("Local Eats", 45_000, 45, "Traffic"),
            ],
        }
    }

    /// Load from the store, falling back to the seed rows when empty or unreadable
    pub fn load_from<S: LeaderboardStore>(store: &S) -> Self {
        match store.load() {
            Ok(Some(mut entries)) => {
                entries.sort_by(|a, b| b.score.cmp(&a.score));
                entries.truncate(MAX_ENTRIES);
                log::info!("Loaded {} leaderboard entries", entries.len());
                Self { entries }
            }
            Ok(None) => {
                log::info!("No leaderboard found, using seed entries");
                Self::seeded()
            }
            Err(e) => {
                log::warn!("Leaderboard unreadable ({}), using seed entries", e);
                Self::seeded()
            }
        }
    }

    pub fn save_to<S: LeaderboardStore>(&self, store: &mut S) -> Result<()> {
        store.save(&self.entries)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Add an entry, keep the top 10, and return its 1-indexed rank if it made the cut.
    ///
    /// Ties keep existing rows ahead of the newcomer.
    pub fn submit(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_ENTRIES);

        (pos < MAX_ENTRIES).then_some(pos + 1)
    }
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub json: Option<String>,
}

impl LeaderboardStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<LeaderboardEntry>>> {
        match &self.json {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, entries: &[LeaderboardEntry]) -> Result<()> {
        self.json = Some(serde_json::to_string(entries)?);
        Ok(())
    }
}

/// `window.localStorage` under the page's historical key
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "marketMomentumLeaderboard";

    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(crate::Error::StorageUnavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl LeaderboardStore for LocalStorageStore {
    fn load(&self) -> Result<Option<Vec<LeaderboardEntry>>> {
        let json = Self::storage()?
            .get_item(Self::STORAGE_KEY)
            .map_err(|e| crate::Error::Storage(crate::Error::describe_js(&e)))?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, entries: &[LeaderboardEntry]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| crate::Error::Storage(crate::Error::describe_js(&e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u64) -> LeaderboardEntry {
        LeaderboardEntry::new(name, score, (score / 1500) as u32, Challenge::Other)
    }

    #[test]
    fn test_empty_store_seeds() {
        let board = Leaderboard::load_from(&MemoryStore::default());
        assert_eq!(board.entries.len(), 3);
        assert_eq!(board.entries[0].score, 85_000);
    }

    #[test]
    fn test_corrupt_store_seeds() {
        let store = MemoryStore {
            json: Some("{not json".to_string()),
        };
        assert_eq!(Leaderboard::load_from(&store), Leaderboard::seeded());
    }

    #[test]
    fn test_submit_ranks_descending() {
        let mut board = Leaderboard::seeded();
        assert_eq!(board.submit(entry("Unity Clinic", 75_000)), Some(2));
        assert_eq!(board.submit(entry("Zero", 0)), Some(5));
        let scores: Vec<u64> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![85_000, 75_000, 62_000, 45_000, 0]);
    }

    #[test]
    fn test_ties_rank_after_existing() {
        let mut board = Leaderboard::seeded();
        assert_eq!(board.submit(entry("Tie", 62_000)), Some(3));
        assert_eq!(board.entries[1].business_name, "Creative Co");
    }

    #[test]
    fn test_keeps_top_ten() {
        let mut board = Leaderboard::new();
        for i in 0..10 {
            board.submit(entry(&format!("B{i}"), 10_000 + i * 1500));
        }
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert_eq!(board.submit(entry("Low", 1_500)), None);
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert!(board.entries.iter().all(|e| e.business_name != "Low"));
        assert_eq!(board.submit(entry("High", 90_000)), Some(1));
        assert_eq!(board.entries.len(), MAX_ENTRIES);
    }

    #[test]
    fn test_store_round_trip_uses_camel_case() {
        let mut store = MemoryStore::default();
        let mut board = Leaderboard::seeded();
        board.submit(entry("Unity Clinic", 37_500).with_tip("Mail more."));
        board.save_to(&mut store).unwrap();

        let json = store.json.clone().unwrap();
        assert!(json.contains("\"businessName\":\"Unity Clinic\""));
        assert!(json.contains("\"aiTip\":\"Mail more.\""));
        assert_eq!(json.matches("aiTip").count(), 1);

        assert_eq!(Leaderboard::load_from(&store), board);
    }

    #[test]
    fn test_challenge_labels() {
        for c in Challenge::ALL {
            assert_eq!(Challenge::from_label(c.as_str()), Some(c));
        }
        assert_eq!(Challenge::from_label("Growth"), None);
    }
}
