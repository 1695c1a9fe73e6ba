//! Integration tests for the PostgreSQL store
//!
//! These tests verify that the repository implementations run against a
//! real database: migrations, constraint classification, cascades and
//! transaction handling. They need `DATABASE_URL` and are ignored by default.

use chrono::NaiveDate;
use padel_tournament_api::domain::event::SlotTime;
use padel_tournament_api::domain::matches::{MatchDraft, MatchFilter};
use padel_tournament_api::domain::player::{NewPlayer, Player};
use padel_tournament_api::domain::repositories::{
    Constraint, EventRepository, MatchRepository, PlayerRepository, RepositoryError, Store,
    TeamRepository,
};
use padel_tournament_api::domain::team::NewTeam;
use padel_tournament_api::infrastructure::repositories::PostgresStore;
use uuid::Uuid;

/// Set up a migrated store
async fn setup_store() -> PostgresStore {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for integration tests");

    let store = PostgresStore::connect(&database_url, 2)
        .await
        .expect("Failed to connect to test database");
    store.migrate().await.expect("Failed to run migrations");
    store
}

/// Player data unique to this run
fn unique_player(company: &str) -> NewPlayer {
    let tag = Uuid::new_v4().simple().to_string();
    NewPlayer {
        first_name: "Test".to_string(),
        last_name: "Player".to_string(),
        email: format!("{}@test.local", tag),
        company: company.to_string(),
        license_number: format!("LIC-{}", tag),
        user_id: None,
        birth_date: None,
    }
}

async fn insert_players(store: &PostgresStore, players: &[NewPlayer]) -> Vec<Player> {
    let mut uow = store.begin().await.unwrap();
    let mut inserted = Vec::new();
    for player in players {
        inserted.push(uow.insert_player(player).await.unwrap());
    }
    uow.commit().await.unwrap();
    inserted
}

/// Clean up test data
async fn cleanup_players(store: &PostgresStore, ids: &[i64]) {
    let mut uow = store.begin().await.unwrap();
    for id in ids {
        uow.delete_player(*id).await.unwrap();
    }
    uow.commit().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_player_insert_and_lookups() {
    let store = setup_store().await;
    let new_player = unique_player("Acme");
    let player = insert_players(&store, &[new_player.clone()]).await.remove(0);

    let mut uow = store.begin().await.unwrap();
    let by_license = uow
        .find_player_by_license(&new_player.license_number)
        .await
        .unwrap();
    let by_email = uow.find_player_by_email(&new_player.email).await.unwrap();
    drop(uow);

    assert_eq!(by_license, Some(player.clone()));
    assert_eq!(by_email, Some(player.clone()));

    cleanup_players(&store, &[player.id]).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_duplicate_license_maps_to_its_constraint() {
    let store = setup_store().await;
    let first = unique_player("Acme");
    let player = insert_players(&store, &[first.clone()]).await.remove(0);

    let mut duplicate = unique_player("Acme");
    duplicate.license_number = first.license_number.clone();

    let mut uow = store.begin().await.unwrap();
    let err = uow.insert_player(&duplicate).await.unwrap_err();
    drop(uow);

    assert!(
        matches!(
            err,
            RepositoryError::UniqueViolation(Constraint::PlayerLicenseNumber)
        ),
        "unexpected error: {:?}",
        err
    );

    cleanup_players(&store, &[player.id]).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_dropped_unit_of_work_rolls_back() {
    let store = setup_store().await;
    let new_player = unique_player("Acme");

    let mut uow = store.begin().await.unwrap();
    uow.insert_player(&new_player).await.unwrap();
    drop(uow);

    let mut uow = store.begin().await.unwrap();
    let found = uow
        .find_player_by_license(&new_player.license_number)
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_team_references_guard_player_delete() {
    let store = setup_store().await;
    let players = insert_players(&store, &[unique_player("Acme"), unique_player("Acme")]).await;

    let mut uow = store.begin().await.unwrap();
    let team = uow
        .insert_team(&NewTeam {
            company: "Acme".to_string(),
            player1_id: players[0].id,
            player2_id: players[1].id,
        })
        .await
        .unwrap();
    uow.commit().await.unwrap();

    let mut uow = store.begin().await.unwrap();
    let err = uow.delete_player(players[0].id).await.unwrap_err();
    drop(uow);
    assert!(matches!(
        err,
        RepositoryError::ForeignKeyViolation(Constraint::TeamPlayer1Ref)
    ));

    let mut uow = store.begin().await.unwrap();
    assert!(uow.delete_team(team.id).await.unwrap());
    uow.commit().await.unwrap();
    cleanup_players(&store, &[players[0].id, players[1].id]).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_event_delete_cascades_to_matches() {
    let store = setup_store().await;
    let players = insert_players(
        &store,
        &[
            unique_player("Acme"),
            unique_player("Acme"),
            unique_player("Globex"),
            unique_player("Globex"),
        ],
    )
    .await;

    let date = NaiveDate::from_ymd_opt(2099, 1, 15).unwrap();
    let time = SlotTime::new(18, 0).unwrap();

    let mut uow = store.begin().await.unwrap();
    let acme = uow
        .insert_team(&NewTeam {
            company: "Acme".to_string(),
            player1_id: players[0].id,
            player2_id: players[1].id,
        })
        .await
        .unwrap();
    let globex = uow
        .insert_team(&NewTeam {
            company: "Globex".to_string(),
            player1_id: players[2].id,
            player2_id: players[3].id,
        })
        .await
        .unwrap();
    let event = uow.insert_event(date, time).await.unwrap();
    let m = uow
        .insert_match(event.id, &MatchDraft::new(1, acme.id, globex.id))
        .await
        .unwrap();
    uow.commit().await.unwrap();

    let mut uow = store.begin().await.unwrap();
    assert_eq!(uow.find_event_at(date, time, None).await.unwrap(), Some(event));
    let listed = uow
        .list_matches(&MatchFilter {
            team_id: Some(acme.id),
            ..MatchFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(listed, vec![m.clone()]);

    assert!(uow.delete_event(event.id).await.unwrap());
    assert!(uow.find_match(m.id).await.unwrap().is_none());
    assert!(uow.delete_team(acme.id).await.unwrap());
    assert!(uow.delete_team(globex.id).await.unwrap());
    uow.commit().await.unwrap();

    cleanup_players(&store, &players.iter().map(|p| p.id).collect::<Vec<_>>()).await;
}
