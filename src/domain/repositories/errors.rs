use thiserror::Error;

/// Storage constraints the application knows how to explain
///
/// Identified by constraint name, never by error message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    PlayerLicenseNumber,
    PlayerEmail,
    PlayerUserId,
    TeamPlayer1,
    TeamPlayer2,
    PoolName,
    TeamPlayer1Ref,
    TeamPlayer2Ref,
    MatchTeam1Ref,
    MatchTeam2Ref,
    /// A constraint with no specific mapping
    Unknown(String),
}

impl Constraint {
    pub fn from_name(name: &str) -> Self {
        match name {
            "players_license_number_key" => Constraint::PlayerLicenseNumber,
            "players_email_key" => Constraint::PlayerEmail,
            "players_user_id_key" => Constraint::PlayerUserId,
            "teams_player1_id_key" => Constraint::TeamPlayer1,
            "teams_player2_id_key" => Constraint::TeamPlayer2,
            "pools_name_key" => Constraint::PoolName,
            "teams_player1_id_fkey" => Constraint::TeamPlayer1Ref,
            "teams_player2_id_fkey" => Constraint::TeamPlayer2Ref,
            "matches_team1_id_fkey" => Constraint::MatchTeam1Ref,
            "matches_team2_id_fkey" => Constraint::MatchTeam2Ref,
            other => Constraint::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Constraint::PlayerLicenseNumber => "players_license_number_key",
            Constraint::PlayerEmail => "players_email_key",
            Constraint::PlayerUserId => "players_user_id_key",
            Constraint::TeamPlayer1 => "teams_player1_id_key",
            Constraint::TeamPlayer2 => "teams_player2_id_key",
            Constraint::PoolName => "pools_name_key",
            Constraint::TeamPlayer1Ref => "teams_player1_id_fkey",
            Constraint::TeamPlayer2Ref => "teams_player2_id_fkey",
            Constraint::MatchTeam1Ref => "matches_team1_id_fkey",
            Constraint::MatchTeam2Ref => "matches_team2_id_fkey",
            Constraint::Unknown(name) => name,
        }
    }
}

/// Failures reported by repository implementations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("unique constraint violated: {}", .0.name())]
    UniqueViolation(Constraint),

    #[error("foreign key constraint violated: {}", .0.name())]
    ForeignKeyViolation(Constraint),

    #[error("database error: {0}")]
    Database(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
