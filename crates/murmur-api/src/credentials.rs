use std::sync::Arc;

use tracing::debug;

use murmur_db::Database;
use murmur_types::models::{Account, AccountDetails, Authority};

use crate::error::AuthError;

pub trait AccountRepository: Send + Sync {
    /// `username` is expected to be normalized already.
    fn find_one_by_username(&self, username: &str) -> anyhow::Result<Option<Account>>;
}

impl AccountRepository for Database {
    fn find_one_by_username(&self, username: &str) -> anyhow::Result<Option<Account>> {
        let found = self.get_account_with_authorities(username)?;
        Ok(found.map(|(row, authorities)| Account {
            username: row.username,
            password_hash: row.password,
            activated: row.activated,
            authorities,
        }))
    }
}

/// Loads the details the login flow verifies against, refusing accounts
/// that have not been activated.
#[derive(Clone)]
pub struct CredentialLookupAdapter {
    accounts: Arc<dyn AccountRepository>,
}

impl CredentialLookupAdapter {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    pub fn load_account_details(&self, username: &str) -> Result<AccountDetails, AuthError> {
        debug!("Authenticating {}", username);
        let username = username.to_lowercase();

        let account = self
            .accounts
            .find_one_by_username(&username)?
            .ok_or_else(|| AuthError::AccountNotFound(username.clone()))?;

        if !account.activated {
            return Err(AuthError::AccountNotActivated(username));
        }

        Ok(AccountDetails {
            username,
            password_hash: account.password_hash,
            authorities: account.authorities.into_iter().map(Authority::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct MemoryAccounts(HashMap<String, Account>);

    impl AccountRepository for MemoryAccounts {
        fn find_one_by_username(&self, username: &str) -> anyhow::Result<Option<Account>> {
            Ok(self.0.get(username).cloned())
        }
    }

    struct BrokenAccounts;

    impl AccountRepository for BrokenAccounts {
        fn find_one_by_username(&self, _username: &str) -> anyhow::Result<Option<Account>> {
            anyhow::bail!("connection refused")
        }
    }

    fn account(username: &str, activated: bool) -> Account {
        Account {
            username: username.into(),
            password_hash: format!("{}-hash", username),
            activated,
            authorities: vec![Authority::USER.into(), Authority::ADMIN.into()],
        }
    }

    fn adapter() -> CredentialLookupAdapter {
        let accounts = HashMap::from([
            ("alice".to_string(), account("alice", true)),
            ("dormant".to_string(), account("dormant", false)),
        ]);
        CredentialLookupAdapter::new(Arc::new(MemoryAccounts(accounts)))
    }

    #[test]
    fn lookup_ignores_case() {
        let adapter = adapter();
        let upper = adapter.load_account_details("Alice").unwrap();
        let lower = adapter.load_account_details("alice").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.username, "alice");
    }

    #[test]
    fn details_carry_hash_and_authorities() {
        let details = adapter().load_account_details("ALICE").unwrap();
        assert_eq!(details.password_hash, "alice-hash");
        assert_eq!(
            details.authorities,
            vec![Authority::new(Authority::USER), Authority::new(Authority::ADMIN)]
        );
    }

    #[test]
    fn unknown_account_is_not_found() {
        let err = adapter().load_account_details("mallory").unwrap_err();
        assert!(matches!(err, AuthError::AccountNotFound(ref u) if u == "mallory"));
    }

    #[test]
    fn deactivated_account_is_distinct_from_missing() {
        let err = adapter().load_account_details("Dormant").unwrap_err();
        assert!(matches!(err, AuthError::AccountNotActivated(ref u) if u == "dormant"));
    }

    #[test]
    fn repository_failure_propagates() {
        let adapter = CredentialLookupAdapter::new(Arc::new(BrokenAccounts));
        assert!(matches!(
            adapter.load_account_details("alice"),
            Err(AuthError::Repository(_))
        ));
    }

    #[test]
    fn reads_accounts_from_sqlite() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.create_account("carol", "carol-hash", true, None, &[Authority::USER])
            .unwrap();
        let adapter = CredentialLookupAdapter::new(db);

        let details = adapter.load_account_details("CAROL").unwrap();
        assert_eq!(details.username, "carol");
        assert!(details.has_authority(Authority::USER));
    }
}
