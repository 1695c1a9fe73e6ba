use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Games won by each team in one set
///
/// A side left empty means the set was not entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub team1: Option<i32>,
    pub team2: Option<i32>,
}

impl SetScore {
    /// A fully entered set
    pub fn new(team1: i32, team2: i32) -> Self {
        Self {
            team1: Some(team1),
            team2: Some(team2),
        }
    }

    /// A set nobody entered
    pub fn empty() -> Self {
        Self::default()
    }

    fn both(&self) -> Option<(i32, i32)> {
        self.team1.zip(self.team2)
    }

    fn is_touched(&self) -> bool {
        self.team1.is_some() || self.team2.is_some()
    }
}

/// Full score of a best-of-3 padel match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub set1: SetScore,
    pub set2: SetScore,
    pub set3: SetScore,
}

impl MatchScore {
    pub fn new(set1: SetScore, set2: SetScore, set3: SetScore) -> Self {
        Self { set1, set2, set3 }
    }

    /// Reads a stored score string such as `"6-4, 3-6, 7-5"`
    ///
    /// Up to three tokens are read in order. A token that does not parse
    /// leaves its set empty, so validation reports it as incomplete.
    /// Tokens past the third are ignored.
    ///
    /// # Example
    /// ```
    /// use padel_tournament_api::domain::score::{MatchScore, SetScore};
    ///
    /// let score = MatchScore::from_score_string("6-4, 6-2");
    /// assert_eq!(score.set1, SetScore::new(6, 4));
    /// assert_eq!(score.set3, SetScore::empty());
    /// ```
    pub fn from_score_string(score: &str) -> Self {
        let mut sets = [SetScore::empty(); 3];
        for (slot, token) in sets.iter_mut().zip(score.split(',')) {
            if let Some((a, b)) = parse_set_token(token) {
                *slot = SetScore::new(a, b);
            }
        }
        let [set1, set2, set3] = sets;
        Self { set1, set2, set3 }
    }
}

/// Reasons a match score is rejected
///
/// The messages are shown to the end user as they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("Le score du set 1 est incomplet (ex: 6-4, 7-5).")]
    IncompleteSet1,
    #[error("Le score du set 1 est invalide (ex: 6-4, 7-5).")]
    InvalidSet1,
    #[error("Le score du set 2 est incomplet (ex: 6-4, 7-5).")]
    IncompleteSet2,
    #[error("Le score du set 2 est invalide (ex: 6-4, 7-5).")]
    InvalidSet2,
    #[error("Le match est fini en 2 sets, pas besoin de 3ème set.")]
    DecidedInTwoSets,
    #[error("Un 3ème set est requis (1 set partout).")]
    ThirdSetRequired,
    #[error("Le score du set 3 est invalide.")]
    InvalidSet3,
}

impl ScoreError {
    /// Machine-readable code for API clients
    pub fn code(&self) -> &'static str {
        match self {
            ScoreError::IncompleteSet1 => "INCOMPLETE_SET_1",
            ScoreError::InvalidSet1 => "INVALID_SET_1",
            ScoreError::IncompleteSet2 => "INCOMPLETE_SET_2",
            ScoreError::InvalidSet2 => "INVALID_SET_2",
            ScoreError::DecidedInTwoSets => "DECIDED_IN_TWO_SETS",
            ScoreError::ThirdSetRequired => "THIRD_SET_REQUIRED",
            ScoreError::InvalidSet3 => "INVALID_SET_3",
        }
    }
}

/// Checks whether a single set score is a legal padel result
///
/// Legal results are 6-0 up to 6-4, 7-5 and 7-6, in either direction.
///
/// # Example
/// ```
/// use padel_tournament_api::domain::score::validate_set;
///
/// assert!(validate_set(7, 6));
/// assert!(!validate_set(6, 5));
/// ```
pub fn validate_set(games_a: i32, games_b: i32) -> bool {
    if games_a < 0 || games_b < 0 {
        return false;
    }
    matches!(
        (games_a, games_b),
        (6, 0..=4) | (0..=4, 6) | (7, 5 | 6) | (5 | 6, 7)
    )
}

/// Validates a complete best-of-3 score
///
/// # Rules
/// - Sets 1 and 2 must be entered and legal
/// - If one team won both, set 3 must be left empty
/// - If they split, set 3 must be entered and legal
pub fn validate_match_score(score: &MatchScore) -> Result<(), ScoreError> {
    let (s1a, s1b) = score.set1.both().ok_or(ScoreError::IncompleteSet1)?;
    if !validate_set(s1a, s1b) {
        return Err(ScoreError::InvalidSet1);
    }

    let (s2a, s2b) = score.set2.both().ok_or(ScoreError::IncompleteSet2)?;
    if !validate_set(s2a, s2b) {
        return Err(ScoreError::InvalidSet2);
    }

    let set1_to_team1 = s1a > s1b;
    let set2_to_team1 = s2a > s2b;

    if set1_to_team1 == set2_to_team1 {
        if score.set3.is_touched() {
            return Err(ScoreError::DecidedInTwoSets);
        }
        return Ok(());
    }

    let (s3a, s3b) = score.set3.both().ok_or(ScoreError::ThirdSetRequired)?;
    if !validate_set(s3a, s3b) {
        return Err(ScoreError::InvalidSet3);
    }

    Ok(())
}

/// Counts the sets won by each team in a stored score string
///
/// Never fails: malformed tokens and tied tokens add nothing, and a
/// missing score counts as `(0, 0)`.
///
/// # Example
/// ```
/// use padel_tournament_api::domain::score::parse_score_string;
///
/// assert_eq!(parse_score_string(Some("6-4, 4-6, 6-0")), (2, 1));
/// assert_eq!(parse_score_string(None), (0, 0));
/// ```
pub fn parse_score_string(score: Option<&str>) -> (u32, u32) {
    let Some(score) = score else {
        return (0, 0);
    };

    score
        .split(',')
        .filter_map(parse_set_token)
        .fold((0, 0), |(team1, team2), (a, b)| match a.cmp(&b) {
            std::cmp::Ordering::Greater => (team1 + 1, team2),
            std::cmp::Ordering::Less => (team1, team2 + 1),
            std::cmp::Ordering::Equal => (team1, team2),
        })
}

fn parse_set_token(token: &str) -> Option<(i32, i32)> {
    let mut parts = token.trim().split('-');
    let a = parts.next()?.trim().parse().ok()?;
    let b = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((a, b))
}
