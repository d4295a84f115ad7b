//! The owner of transactions, budgets and savings goals.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// An opaque, non-empty identifier for the user account that owns a record.
///
/// Every store operation takes the owner explicitly, records are never shared
/// between owners.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    /// Create an owner ID.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyOwnerId] if `id` is empty or only whitespace.
    pub fn new(id: &str) -> Result<Self, Error> {
        let id = id.trim();

        if id.is_empty() {
            Err(Error::EmptyOwnerId)
        } else {
            Ok(Self(id.to_owned()))
        }
    }
}

impl TryFrom<String> for OwnerId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<OwnerId> for String {
    fn from(owner_id: OwnerId) -> Self {
        owner_id.0
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for OwnerId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for OwnerId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        String::column_result(value)
            .and_then(|id| Self::new(&id).map_err(|error| FromSqlError::Other(Box::new(error))))
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::Error;

    use super::OwnerId;

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(OwnerId::new(""), Err(Error::EmptyOwnerId));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(OwnerId::new(" \t\n"), Err(Error::EmptyOwnerId));
    }

    #[test]
    fn new_trims_surrounding_whitespace() {
        let owner = OwnerId::new("  user-1 ").unwrap();

        assert_eq!(owner.as_ref(), "user-1");
    }

    #[test]
    fn deserialize_rejects_blank_id() {
        let result: Result<OwnerId, _> = serde_json::from_str("\"   \"");

        assert!(result.is_err());
    }

    #[test]
    fn deserialize_trims_id() {
        let owner: OwnerId = serde_json::from_str("\" user-1 \"").unwrap();

        assert_eq!(owner, OwnerId::new("user-1").unwrap());
        assert_eq!(serde_json::to_string(&owner).unwrap(), "\"user-1\"");
    }

    #[test]
    fn reading_blank_id_from_database_fails() {
        let conn = Connection::open_in_memory().unwrap();

        let result: Result<OwnerId, _> = conn.query_row("SELECT ''", [], |row| row.get(0));

        assert!(matches!(
            result,
            Err(rusqlite::Error::FromSqlConversionFailure(..))
        ));
    }
}
