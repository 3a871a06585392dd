use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::UserDirectory;
use crate::domain::user::{NewUser, Role, Session, User, UserAccount};

/// Plaintext credential lookup against the stored user list.
pub struct AuthService<D> {
    directory: D,
}

impl<D: UserDirectory> AuthService<D> {
    /// Seeds the default accounts if no user list exists yet.
    pub fn new(directory: D) -> Result<Self, DomainError> {
        if directory.load_users()?.is_none() {
            directory.save_users(&default_accounts())?;
            log::info!("seeded default user accounts");
        }
        Ok(Self { directory })
    }

    fn accounts(&self) -> Result<Vec<UserAccount>, DomainError> {
        Ok(self.directory.load_users()?.unwrap_or_default())
    }

    pub fn users(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.accounts()?.into_iter().map(|a| a.user).collect())
    }

    pub fn login(&self, username: &str, password: &str) -> Result<Session, DomainError> {
        let account = self
            .accounts()?
            .into_iter()
            .find(|a| a.user.username == username && a.password == password);

        match account {
            Some(account) => {
                log::info!("user '{}' logged in", account.user.username);
                Ok(Session::new(account.user))
            }
            None => {
                log::warn!("failed login for '{}'", username);
                Err(DomainError::InvalidCredentials)
            }
        }
    }

    pub fn logout(&self, session: Session) {
        log::info!("user '{}' logged out", session.user().username);
    }

    pub fn register(&self, new_user: NewUser) -> Result<User, DomainError> {
        if new_user.username.trim().is_empty() || new_user.password.is_empty() {
            return Err(DomainError::InvalidInput(
                "username and password are required".to_string(),
            ));
        }

        let mut accounts = self.accounts()?;
        if accounts.iter().any(|a| a.user.username == new_user.username) {
            return Err(DomainError::Rejected(format!(
                "user '{}' already exists",
                new_user.username
            )));
        }

        let user = User {
            id: format!("user-{}", Uuid::new_v4()),
            username: new_user.username,
            role: new_user.role.unwrap_or(Role::Client),
            name: new_user.name,
            email: new_user.email,
        };
        accounts.push(UserAccount {
            user: user.clone(),
            password: new_user.password,
        });
        self.directory.save_users(&accounts)?;

        log::info!("registered user '{}' as {}", user.username, user.role);
        Ok(user)
    }
}

fn default_accounts() -> Vec<UserAccount> {
    let account = |id: &str, username: &str, password: &str, role, name: &str, email: &str| {
        UserAccount {
            user: User {
                id: id.to_string(),
                username: username.to_string(),
                role,
                name: name.to_string(),
                email: email.to_string(),
            },
            password: password.to_string(),
        }
    };

    vec![
        account(
            "admin001",
            "admin",
            "admin123",
            Role::Admin,
            "Администратор",
            "admin@furniture.com",
        ),
        account(
            "client001",
            "client",
            "client123",
            Role::Client,
            "Клиент Тестовый",
            "client@test.com",
        ),
        account(
            "designer001",
            "designer",
            "designer123",
            Role::Designer,
            "Дизайнер Петров",
            "designer@furniture.com",
        ),
    ]
}
