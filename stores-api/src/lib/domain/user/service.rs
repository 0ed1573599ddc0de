use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::Mailer;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

const WELCOME_SUBJECT: &str = "Successfully signed up.";

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR, M>
where
    UR: UserRepository,
    M: Mailer,
{
    repository: Arc<UR>,
    mailer: Arc<M>,
    password_hasher: auth::CredentialStore,
    admin_usernames: HashSet<String>,
    mail_timeout: Duration,
}

impl<UR, M> UserService<UR, M>
where
    UR: UserRepository,
    M: Mailer,
{
    pub const DEFAULT_MAIL_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `mailer` - Welcome mail delivery
    pub fn new(repository: Arc<UR>, mailer: Arc<M>) -> Self {
        Self {
            repository,
            mailer,
            password_hasher: auth::CredentialStore::new(),
            admin_usernames: HashSet::new(),
            mail_timeout: Self::DEFAULT_MAIL_TIMEOUT,
        }
    }

    /// Usernames that are flagged as admins when they register.
    pub fn with_admin_usernames<I, S>(mut self, usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.admin_usernames = usernames.into_iter().map(Into::into).collect();
        self
    }

    /// Upper bound on a single welcome mail delivery.
    pub fn with_mail_timeout(mut self, timeout: Duration) -> Self {
        self.mail_timeout = timeout;
        self
    }

    /// Send the welcome mail in the background.
    ///
    /// Runs after the user row is committed. Failures are only logged.
    fn send_welcome_mail(&self, user: &User) {
        let mailer = Arc::clone(&self.mailer);
        let timeout = self.mail_timeout;
        let user_id = user.id;
        let to = user.email.as_str().to_string();
        let body = format!(
            "Hello {}! You have successfully signed up to the Stores REST API.",
            user.username
        );

        tokio::spawn(async move {
            match tokio::time::timeout(timeout, mailer.send(&to, WELCOME_SUBJECT, &body)).await {
                Ok(Ok(())) => {
                    tracing::info!(user_id = %user_id, to = %to, "Welcome mail sent");
                }
                Ok(Err(e)) => {
                    tracing::error!(user_id = %user_id, to = %to, error = %e, "Welcome mail failed");
                }
                Err(_) => {
                    tracing::warn!(
                        user_id = %user_id,
                        to = %to,
                        timeout_secs = timeout.as_secs(),
                        "Welcome mail timed out"
                    );
                }
            }
        });
    }
}

#[async_trait]
impl<UR, M> UserServicePort for UserService<UR, M>
where
    UR: UserRepository,
    M: Mailer,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(UserError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        if self.repository.find_by_email(&command.email).await?.is_some() {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self.password_hasher.hash(&command.password)?;
        let is_admin = self.admin_usernames.contains(command.username.as_str());

        let user = NewUser {
            username: command.username,
            email: command.email,
            password_hash,
            is_admin,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            is_admin = created_user.is_admin,
            "User registered"
        );

        self.send_welcome_mail(&created_user);

        Ok(created_user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(*id))
    }

    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or(UserError::NotFoundByUsername(username.to_string()))
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::user::errors::MailError;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: NewUser) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    type SentMail = (String, String, String);

    /// Mailer that reports every delivery attempt on a channel.
    struct RecordingMailer {
        sent: mpsc::UnboundedSender<SentMail>,
        outcome: Result<(), MailError>,
        delay: Duration,
    }

    impl RecordingMailer {
        fn new(outcome: Result<(), MailError>) -> (Self, mpsc::UnboundedReceiver<SentMail>) {
            let (sent, received) = mpsc::unbounded_channel();
            let mailer = Self {
                sent,
                outcome,
                delay: Duration::ZERO,
            };
            (mailer, received)
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
            tokio::time::sleep(self.delay).await;
            let _ = self
                .sent
                .send((to.to_string(), subject.to_string(), body.to_string()));
            self.outcome.clone()
        }
    }

    fn stored(new_user: NewUser, id: i64) -> User {
        User {
            id: UserId(id),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            is_admin: new_user.is_admin,
            created_at: new_user.created_at,
        }
    }

    fn existing_user(username: &str, email: &str) -> User {
        User {
            id: UserId(1),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    fn command(username: &str, email: &str, password: &str) -> CreateUserCommand {
        CreateUserCommand::new(
            Username::new(username.to_string()).unwrap(),
            EmailAddress::new(email.to_string()).unwrap(),
            password.to_string(),
        )
    }

    fn free_repository() -> MockTestUserRepository {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .returning(|_| Ok(None));
        repository.expect_find_by_email().returning(|_| Ok(None));
        repository
    }

    #[tokio::test]
    async fn test_create_user_hashes_password_and_sends_welcome_mail() {
        let mut repository = free_repository();
        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "alice"
                    && user.email.as_str() == "a@x.com"
                    && user.password_hash.starts_with("$argon2")
                    && user.password_hash != "p"
                    && !user.is_admin
            })
            .times(1)
            .returning(|user| Ok(stored(user, 1)));

        let (mailer, mut sent) = RecordingMailer::new(Ok(()));
        let service = UserService::new(Arc::new(repository), Arc::new(mailer));

        let user = service
            .create_user(command("alice", "a@x.com", "p"))
            .await
            .expect("Registration failed");
        assert_eq!(user.id, UserId(1));

        let (to, subject, body) = tokio::time::timeout(Duration::from_secs(1), sent.recv())
            .await
            .expect("Welcome mail not sent")
            .expect("Mailer dropped");
        assert_eq!(to, "a@x.com");
        assert_eq!(subject, "Successfully signed up.");
        assert!(body.contains("Hello alice!"));
    }

    #[tokio::test]
    async fn test_create_user_flags_configured_admin() {
        let mut repository = free_repository();
        repository
            .expect_create()
            .withf(|user| user.is_admin)
            .times(1)
            .returning(|user| Ok(stored(user, 2)));

        let (mailer, _sent) = RecordingMailer::new(Ok(()));
        let service = UserService::new(Arc::new(repository), Arc::new(mailer))
            .with_admin_usernames(["root_admin"]);

        let user = service
            .create_user(command("root_admin", "root@x.com", "pw"))
            .await
            .unwrap();
        assert!(user.is_admin);
    }

    #[tokio::test]
    async fn test_create_user_succeeds_when_mail_fails() {
        let mut repository = free_repository();
        repository
            .expect_create()
            .times(1)
            .returning(|user| Ok(stored(user, 1)));

        let (mailer, mut sent) =
            RecordingMailer::new(Err(MailError::Transport("connection refused".to_string())));
        let service = UserService::new(Arc::new(repository), Arc::new(mailer));

        let result = service.create_user(command("alice", "a@x.com", "p")).await;
        assert!(result.is_ok());
        assert!(sent.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_create_user_does_not_wait_for_slow_mail() {
        let mut repository = free_repository();
        repository
            .expect_create()
            .times(1)
            .returning(|user| Ok(stored(user, 1)));

        let (mut mailer, _sent) = RecordingMailer::new(Ok(()));
        mailer.delay = Duration::from_secs(30);
        let service = UserService::new(Arc::new(repository), Arc::new(mailer))
            .with_mail_timeout(Duration::from_millis(50));

        let result = tokio::time::timeout(
            Duration::from_secs(1),
            service.create_user(command("alice", "a@x.com", "p")),
        )
        .await
        .expect("Registration blocked on mail delivery");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(Some(existing_user("alice", "other@x.com"))));
        repository.expect_create().times(0);

        let (mailer, mut sent) = RecordingMailer::new(Ok(()));
        let service = UserService::new(Arc::new(repository), Arc::new(mailer));

        let result = service.create_user(command("alice", "a@x.com", "p")).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::UsernameAlreadyExists(_)
        ));
        drop(service);
        assert!(sent.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .returning(|_| Ok(None));
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(existing_user("bob", "a@x.com"))));
        repository.expect_create().times(0);

        let (mailer, _sent) = RecordingMailer::new(Ok(()));
        let service = UserService::new(Arc::new(repository), Arc::new(mailer));

        let result = service.create_user(command("alice", "a@x.com", "p")).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::EmailAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_create_user_race_lost_to_constraint() {
        let mut repository = free_repository();
        repository
            .expect_create()
            .times(1)
            .returning(|user| Err(UserError::UsernameAlreadyExists(user.username.to_string())));

        let (mailer, _sent) = RecordingMailer::new(Ok(()));
        let service = UserService::new(Arc::new(repository), Arc::new(mailer));

        let result = service.create_user(command("alice", "a@x.com", "p")).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::UsernameAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let (mailer, _sent) = RecordingMailer::new(Ok(()));
        let service = UserService::new(Arc::new(repository), Arc::new(mailer));

        let result = service.get_user(&UserId(99)).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(UserId(99))));
    }

    #[tokio::test]
    async fn test_get_user_by_username_success() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .withf(|u| u.as_str() == "alice")
            .times(1)
            .returning(|_| Ok(Some(existing_user("alice", "a@x.com"))));

        let (mailer, _sent) = RecordingMailer::new(Ok(()));
        let service = UserService::new(Arc::new(repository), Arc::new(mailer));

        let username = Username::new("alice".to_string()).unwrap();
        let user = service.get_user_by_username(&username).await.unwrap();
        assert_eq!(user.email.as_str(), "a@x.com");
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_delete()
            .times(1)
            .returning(|id| Err(UserError::NotFound(*id)));

        let (mailer, _sent) = RecordingMailer::new(Ok(()));
        let service = UserService::new(Arc::new(repository), Arc::new(mailer));

        let result = service.delete_user(&UserId(3)).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }
}
