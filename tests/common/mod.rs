//! Shared fixtures for the integration tests
#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use padel_tournament_api::domain::access::{Access, Capability};
use padel_tournament_api::domain::event::{EventInput, SlotTime};
use padel_tournament_api::domain::matches::MatchDraft;
use padel_tournament_api::domain::player::NewPlayer;
use padel_tournament_api::domain::team::{NewTeam, TeamDetails};
use padel_tournament_api::infrastructure::repositories::InMemoryStore;
use padel_tournament_api::services::{MatchPlacement, Services};

pub const ALL_CAPABILITIES: [Capability; 6] = Capability::ALL;

pub fn services() -> Services {
    Services::new(Arc::new(InMemoryStore::new()))
}

pub fn admin() -> Access {
    Access::new(Uuid::new_v4(), ALL_CAPABILITIES)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(hour: u16, minute: u16) -> SlotTime {
    SlotTime::new(hour, minute).unwrap()
}

pub fn new_player(tag: &str, company: &str, user_id: Option<Uuid>) -> NewPlayer {
    NewPlayer {
        first_name: format!("Prenom{}", tag),
        last_name: format!("Nom{}", tag),
        email: format!("{}@example.com", tag),
        company: company.to_string(),
        license_number: format!("LIC-{}", tag),
        user_id,
        birth_date: None,
    }
}

/// Registers two players of `company` and pairs them
pub async fn seed_team(services: &Services, company: &str, tag: &str) -> TeamDetails {
    seed_team_with_account(services, company, tag, None).await
}

/// Same as [`seed_team`], with the first player linked to `account`
pub async fn seed_team_with_account(
    services: &Services,
    company: &str,
    tag: &str,
    account: Option<Uuid>,
) -> TeamDetails {
    let admin = admin();
    let p1 = services
        .players
        .create(&admin, new_player(&format!("{}-1", tag), company, account))
        .await
        .unwrap();
    let p2 = services
        .players
        .create(&admin, new_player(&format!("{}-2", tag), company, None))
        .await
        .unwrap();
    services
        .teams
        .create(
            &admin,
            NewTeam {
                company: company.to_string(),
                player1_id: p1.id,
                player2_id: p2.id,
            },
        )
        .await
        .unwrap()
}

pub async fn seed_teams(services: &Services, count: usize) -> Vec<TeamDetails> {
    let mut teams = Vec::with_capacity(count);
    for n in 0..count {
        teams.push(seed_team(services, &format!("Company{}", n), &format!("t{}", n)).await);
    }
    teams
}

pub fn event_input(date: NaiveDate, time: SlotTime, matches: Vec<MatchDraft>) -> EventInput {
    EventInput {
        event_date: date,
        event_time: time,
        matches,
    }
}

pub fn placement(date: NaiveDate, time: SlotTime, draft: MatchDraft) -> MatchPlacement {
    MatchPlacement { date, time, draft }
}
