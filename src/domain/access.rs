use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::TournamentError;

/// Named capability granted to a principal by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    ManageEvents,
    ManageMatches,
    ManageTeams,
    ManagePools,
    ManagePlayers,
    ViewStatistics,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::ManageEvents,
        Capability::ManageMatches,
        Capability::ManageTeams,
        Capability::ManagePools,
        Capability::ManagePlayers,
        Capability::ViewStatistics,
    ];

    /// Wire name, as carried in token claims
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::ManageEvents => "MANAGE_EVENTS",
            Capability::ManageMatches => "MANAGE_MATCHES",
            Capability::ManageTeams => "MANAGE_TEAMS",
            Capability::ManagePools => "MANAGE_POOLS",
            Capability::ManagePlayers => "MANAGE_PLAYERS",
            Capability::ViewStatistics => "VIEW_STATISTICS",
        }
    }

    /// Looks a capability up by wire name; names granted for other
    /// services yield `None`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

/// The acting principal and what it may do
///
/// Built once per request from the bearer token and passed explicitly to
/// every mutating service call.
#[derive(Debug, Clone)]
pub struct Access {
    principal: Uuid,
    capabilities: HashSet<Capability>,
}

impl Access {
    pub fn new(principal: Uuid, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            principal,
            capabilities: capabilities.into_iter().collect(),
        }
    }

    pub fn principal(&self) -> Uuid {
        self.principal
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Fails with a forbidden error when the capability is missing
    pub fn require(&self, capability: Capability) -> Result<(), TournamentError> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(TournamentError::forbidden(
                "Accès refusé : vous n'avez pas les permissions nécessaires.",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    #[test]
    fn granted_capability_passes() {
        let access = Access::new(Uuid::new_v4(), [Capability::ManageEvents]);
        assert!(access.require(Capability::ManageEvents).is_ok());
    }

    #[test]
    fn missing_capability_is_forbidden() {
        let access = Access::new(Uuid::new_v4(), [Capability::ManageEvents]);
        let err = access.require(Capability::ManagePools).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn capabilities_serialize_in_screaming_case() {
        let json = serde_json::to_string(&Capability::ManageMatches).unwrap();
        assert_eq!(json, "\"MANAGE_MATCHES\"");
    }

    #[test]
    fn wire_names_match_serde() {
        for capability in Capability::ALL {
            let json = serde_json::to_string(&capability).unwrap();
            assert_eq!(json, format!("\"{}\"", capability.as_str()));
            assert_eq!(Capability::from_name(capability.as_str()), Some(capability));
        }
    }

    #[test]
    fn foreign_names_are_unknown() {
        assert_eq!(Capability::from_name("MANAGE_ACCOUNTS"), None);
        assert_eq!(Capability::from_name("manage_events"), None);
    }
}
