use thiserror::Error;

use crate::domain::repositories::{Constraint, RepositoryError};
use crate::domain::score::ScoreError;

/// Broad category of a tournament failure
///
/// Each kind maps to exactly one HTTP status at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Conflict,
    Forbidden,
    NotFound,
    Internal,
}

/// Errors raised by the tournament services
///
/// Display strings are the messages shown to the end user.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Un événement existe déjà à moins d'une heure d'intervalle.")]
    ScheduleConflict,

    #[error("Ce créneau est complet (3 matchs maximum)")]
    SlotFull,

    #[error("Le terrain {0} est déjà pris sur ce créneau")]
    CourtTaken(i32),

    #[error("Une des équipes joue déjà sur ce créneau")]
    TeamAlreadyScheduled,

    #[error(transparent)]
    InvalidScore(#[from] ScoreError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Une erreur interne est survenue")]
    Storage(#[source] RepositoryError),
}

impl TournamentError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TournamentError::ScheduleConflict
            | TournamentError::SlotFull
            | TournamentError::CourtTaken(_)
            | TournamentError::TeamAlreadyScheduled
            | TournamentError::Conflict(_) => ErrorKind::Conflict,
            TournamentError::InvalidScore(_) | TournamentError::BadRequest(_) => {
                ErrorKind::BadRequest
            }
            TournamentError::Forbidden(_) => ErrorKind::Forbidden,
            TournamentError::NotFound(_) => ErrorKind::NotFound,
            TournamentError::Storage(_) => ErrorKind::Internal,
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            TournamentError::ScheduleConflict => "SCHEDULE_CONFLICT",
            TournamentError::SlotFull => "SLOT_FULL",
            TournamentError::CourtTaken(_) => "COURT_TAKEN",
            TournamentError::TeamAlreadyScheduled => "TEAM_ALREADY_SCHEDULED",
            TournamentError::InvalidScore(e) => e.code(),
            TournamentError::BadRequest(_) => "BAD_REQUEST",
            TournamentError::Conflict(_) => "CONFLICT",
            TournamentError::Forbidden(_) => "FORBIDDEN",
            TournamentError::NotFound(_) => "NOT_FOUND",
            TournamentError::Storage(_) => "INTERNAL_ERROR",
        }
    }
}

/// Classifies storage failures by the constraint they violated
///
/// Unique violations always become conflicts; an unmapped constraint gets
/// the generic conflict message. Foreign keys guarding team and player
/// deletion become forbidden. Everything else is an internal error.
impl From<RepositoryError> for TournamentError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation(constraint) => match constraint {
                Constraint::PlayerLicenseNumber => {
                    Self::conflict("Ce numéro de licence est déjà utilisé.")
                }
                Constraint::PlayerEmail => {
                    Self::conflict("Cette adresse email est déjà utilisée par un autre joueur.")
                }
                Constraint::PlayerUserId => {
                    Self::conflict("Ce compte est déjà lié à un autre joueur.")
                }
                Constraint::TeamPlayer1 | Constraint::TeamPlayer2 => {
                    Self::conflict("Un des joueurs est déjà dans une équipe")
                }
                Constraint::PoolName => Self::conflict("Une poule porte déjà ce nom."),
                _ => Self::conflict("Données uniques en conflit."),
            },
            RepositoryError::ForeignKeyViolation(
                Constraint::MatchTeam1Ref | Constraint::MatchTeam2Ref,
            ) => Self::forbidden("Impossible de supprimer une équipe qui a déjà joué des matchs."),
            RepositoryError::ForeignKeyViolation(
                Constraint::TeamPlayer1Ref | Constraint::TeamPlayer2Ref,
            ) => Self::forbidden(
                "Impossible de supprimer ce joueur car il appartient à une équipe.",
            ),
            other => Self::Storage(other),
        }
    }
}

pub type TournamentResult<T> = Result<T, TournamentError>;
