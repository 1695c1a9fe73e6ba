use serde::{Deserialize, Serialize};

/// Lifecycle status of a match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "match_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    /// Scheduled or being played
    #[default]
    Ongoing,
    /// Finished, with a score for both teams
    Completed,
    /// Called off
    Canceled,
}

impl MatchStatus {
    pub fn is_completed(self) -> bool {
        self == MatchStatus::Completed
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Ongoing => write!(f, "ONGOING"),
            MatchStatus::Completed => write!(f, "COMPLETED"),
            MatchStatus::Canceled => write!(f, "CANCELED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_ongoing() {
        assert_eq!(MatchStatus::default(), MatchStatus::Ongoing);
    }

    #[test]
    fn status_display() {
        assert_eq!(MatchStatus::Ongoing.to_string(), "ONGOING");
        assert_eq!(MatchStatus::Completed.to_string(), "COMPLETED");
        assert_eq!(MatchStatus::Canceled.to_string(), "CANCELED");
    }

    #[test]
    fn status_json_matches_display() {
        let status: MatchStatus = serde_json::from_str("\"CANCELED\"").unwrap();
        assert_eq!(status, MatchStatus::Canceled);
        assert_eq!(serde_json::to_string(&MatchStatus::Completed).unwrap(), "\"COMPLETED\"");
    }
}
