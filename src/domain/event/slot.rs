use std::collections::HashSet;

use crate::domain::errors::TournamentError;
use crate::domain::matches::{Match, MatchDraft};

/// Capacity of one event
pub const MAX_MATCHES_PER_EVENT: usize = 3;

/// Checks whether a match may join an existing slot
///
/// Checks run in a fixed order so the reported error is deterministic:
/// capacity, then court, then teams.
pub fn check_slot_admission(
    slot_matches: &[Match],
    candidate: &MatchDraft,
) -> Result<(), TournamentError> {
    if slot_matches.len() >= MAX_MATCHES_PER_EVENT {
        return Err(TournamentError::SlotFull);
    }
    check_slot_exclusivity(slot_matches, candidate)
}

/// Court and team exclusivity against the other matches of a slot
pub fn check_slot_exclusivity(
    others: &[Match],
    candidate: &MatchDraft,
) -> Result<(), TournamentError> {
    if others
        .iter()
        .any(|m| m.court_number == candidate.court_number)
    {
        return Err(TournamentError::CourtTaken(candidate.court_number));
    }

    if others.iter().any(|m| m.shares_team_with(candidate)) {
        return Err(TournamentError::TeamAlreadyScheduled);
    }

    Ok(())
}

/// Validates the full match list of an event payload
///
/// # Business Rules
/// - One to three matches
/// - Each match is valid on its own
/// - Court numbers are unique within the event
/// - A team plays at most once within the event
pub fn check_event_matches(drafts: &[MatchDraft]) -> Result<(), TournamentError> {
    if drafts.is_empty() {
        return Err(TournamentError::bad_request("Au moins un match est requis"));
    }
    if drafts.len() > MAX_MATCHES_PER_EVENT {
        return Err(TournamentError::bad_request("Maximum 3 matchs par événement"));
    }

    for draft in drafts {
        draft.validate()?;
    }

    let courts: HashSet<i32> = drafts.iter().map(|d| d.court_number).collect();
    if courts.len() != drafts.len() {
        return Err(TournamentError::bad_request(
            "Chaque match doit avoir un numéro de piste unique",
        ));
    }

    let mut teams = HashSet::new();
    for draft in drafts {
        if !teams.insert(draft.team1_id) || !teams.insert(draft.team2_id) {
            return Err(TournamentError::bad_request(
                "Une équipe ne peut pas jouer deux matchs sur le même créneau",
            ));
        }
    }

    Ok(())
}
