use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered tournament player
///
/// License number and linked account are unique across players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub license_number: String,
    pub user_id: Option<Uuid>,
    pub birth_date: Option<NaiveDate>,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether this player is linked to the given account
    pub fn is_account(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }
}

/// Player data supplied on creation or update
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub license_number: String,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

impl NewPlayer {
    pub fn into_player(self, id: i64) -> Player {
        Player {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            company: self.company,
            license_number: self.license_number,
            user_id: self.user_id,
            birth_date: self.birth_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_player() -> NewPlayer {
        NewPlayer {
            first_name: "Ana".to_string(),
            last_name: "Ruiz".to_string(),
            email: "ana@acme.test".to_string(),
            company: "Acme".to_string(),
            license_number: "L-001".to_string(),
            user_id: None,
            birth_date: None,
        }
    }

    #[test]
    fn full_name_joins_first_and_last() {
        let player = new_player().into_player(1);
        assert_eq!(player.full_name(), "Ana Ruiz");
    }

    #[test]
    fn account_link_is_checked_by_id() {
        let user_id = Uuid::new_v4();
        let mut data = new_player();
        data.user_id = Some(user_id);
        let player = data.into_player(7);

        assert!(player.is_account(user_id));
        assert!(!player.is_account(Uuid::new_v4()));
    }
}
