//! Default accounts created at startup
//!
//! Seeding only creates: an account that already exists, whoever created it,
//! is left untouched along with its profile. Failures are logged and skipped.

use tracing::{info, warn};

use crate::{
    error::HubError,
    models::NewUser,
    repositories::{ProfileRepository, UserRepository, user::hash_password},
};

/// An account that must exist on every deployment
#[derive(Debug, Clone, Copy)]
pub struct DefaultAccount {
    pub username: &'static str,
    pub email: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub is_superuser: bool,
}

pub const DEFAULT_ACCOUNTS: [DefaultAccount; 2] = [
    DefaultAccount {
        username: "admin",
        email: "admin@resume-hub.com",
        first_name: "Admin",
        last_name: "",
        is_superuser: true,
    },
    DefaultAccount {
        username: "teacher",
        email: "teacher@resume-hub.com",
        first_name: "Sample",
        last_name: "Teacher",
        is_superuser: false,
    },
];

/// Result of one seeding pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub created: Vec<&'static str>,
    pub existing: Vec<&'static str>,
    pub failed: Vec<&'static str>,
}

/// Create every missing [`DEFAULT_ACCOUNTS`] entry with a special profile
pub async fn seed_default_accounts(
    users: &UserRepository,
    profiles: &ProfileRepository,
    password: &str,
) -> SeedReport {
    seed_accounts(users, profiles, &DEFAULT_ACCOUNTS, password).await
}

/// Create the missing accounts of `accounts`, each with a special profile
pub async fn seed_accounts(
    users: &UserRepository,
    profiles: &ProfileRepository,
    accounts: &[DefaultAccount],
    password: &str,
) -> SeedReport {
    let mut report = SeedReport::default();

    for account in accounts {
        match ensure_account(users, profiles, account, password).await {
            Ok(true) => {
                info!("Seeded default account {}", account.username);
                report.created.push(account.username);
            }
            Ok(false) => report.existing.push(account.username),
            Err(e) => {
                warn!("Failed to seed default account {}: {}", account.username, e);
                report.failed.push(account.username);
            }
        }
    }

    report
}

/// Returns whether the user had to be created
async fn ensure_account(
    users: &UserRepository,
    profiles: &ProfileRepository,
    account: &DefaultAccount,
    password: &str,
) -> Result<bool, HubError> {
    if users.find_by_username(account.username).await?.is_some() {
        return Ok(false);
    }

    let new_user = NewUser {
        username: account.username.to_string(),
        password_hash: hash_password(password)?,
        first_name: account.first_name.to_string(),
        last_name: account.last_name.to_string(),
        email: account.email.to_string(),
        is_superuser: account.is_superuser,
    };
    let user = users.create(&new_user).await?;

    let profile = profiles.get_or_create(user.id).await?.into_profile();
    profiles.set_special(profile.id, true).await?;

    Ok(true)
}
