use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Running statistics for one participant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub id: String,
    pub display_name: String,
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    /// Handicap-adjusted attempt values in the order games were recorded
    pub attempts: Vec<f64>,
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(default)]
    pub handicap: f64,
}

impl ParticipantRecord {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            ..Self::default()
        }
    }
}

/// A single result to fold into the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreUpdate {
    pub participant_id: String,
    pub display_name: String,
    /// Whether `display_name` came from the directory rather than a fallback
    pub name_resolved: bool,
    pub attempts: u8,
    pub success: bool,
}

/// Raw chat message handed over by the transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub message_id: String,
    pub text: String,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
}

impl IncomingMessage {
    pub fn new(message_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            text: text.into(),
            posted_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    /// False when the message is not a group-result announcement
    pub applicable: bool,
    /// True when the message id had already been applied
    pub duplicate: bool,
    pub applied: usize,
    pub streaks_reset: usize,
    pub group_streak: Option<u32>,
    pub puzzle_number: Option<i64>,
}

impl ApplyOutcome {
    pub fn not_applicable() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RankingView {
    Overall,
    Streak,
}

/// Derived leaderboard entry, computed fresh on every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub participant_id: String,
    pub display_name: String,
    pub average: f64,
    pub adjusted_average: f64,
    pub std_dev: f64,
    pub games: usize,
    pub completion_rate: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
}
