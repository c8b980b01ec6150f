//! User application service: signup, approval and skill management.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::application::dto::*;
use crate::domain::aggregates::{Role, User};
use crate::domain::policy::{authorize, Capability, Ownership};
use crate::domain::value_objects::{Email, EntityId};
use crate::ports::inbound::{UseCaseError, UserUseCases};
use crate::ports::outbound::{EventPublisher, UserRepository};

/// User application service
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            user_repo,
            event_publisher,
        }
    }

    async fn load(&self, id: &EntityId) -> Result<User, UseCaseError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound(format!("user {id}")))
    }

    async fn ensure_email_free(&self, email: &Email) -> Result<(), UseCaseError> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(UseCaseError::Validation(format!("email {email} is already registered")));
        }
        Ok(())
    }

    async fn save_and_publish(&self, user: &mut User) -> Result<(), UseCaseError> {
        self.user_repo.save(user).await?;
        let events = user.take_events();
        if !events.is_empty() {
            if let Err(e) = self.event_publisher.publish(events).await {
                warn!(error = %e, "failed to publish user events");
            }
        }
        Ok(())
    }

    async fn admin(&self, actor_id: &EntityId) -> Result<User, UseCaseError> {
        let actor = self.load(actor_id).await?;
        authorize(&actor, Capability::ManageUsers, Ownership::none())?;
        Ok(actor)
    }

    async fn skill_owner(&self, actor_id: &EntityId, user_id: &EntityId) -> Result<User, UseCaseError> {
        let actor = self.load(actor_id).await?;
        authorize(&actor, Capability::ManageOwnSkills, Ownership::account(user_id))?;
        Ok(actor)
    }
}

#[async_trait]
impl UserUseCases for UserService {
    async fn signup(&self, command: SignupCommand) -> Result<User, UseCaseError> {
        let role = match Role::from_name(&command.role) {
            Some(role @ (Role::Sales | Role::Skilled { .. })) => role,
            _ => {
                return Err(UseCaseError::Validation(format!(
                    "role must be sales or skilled, got '{}'",
                    command.role
                )))
            }
        };
        let email = Email::parse(&command.email)?;
        self.ensure_email_free(&email).await?;

        let mut user = User::register(command.name, email, role)?;
        self.save_and_publish(&mut user).await?;

        info!(user_id = %user.id(), role = user.role().name(), "user signed up, awaiting approval");
        Ok(user)
    }

    async fn bootstrap_admin(&self, name: &str, email: &str) -> Result<User, UseCaseError> {
        if self.user_repo.list().await?.iter().any(|u| u.is_admin() && u.is_active()) {
            return Err(UseCaseError::Forbidden("an active administrator already exists".into()));
        }
        let email = Email::parse(email)?;
        self.ensure_email_free(&email).await?;

        let mut admin = User::bootstrap_admin(name, email)?;
        self.save_and_publish(&mut admin).await?;

        info!(user_id = %admin.id(), "administrator created");
        Ok(admin)
    }

    async fn approve(&self, actor_id: &EntityId, user_id: &EntityId) -> Result<User, UseCaseError> {
        let actor = self.admin(actor_id).await?;
        let mut user = self.load(user_id).await?;

        user.approve(actor.id())?;
        self.save_and_publish(&mut user).await?;

        info!(user_id = %user_id, by = %actor_id, "user approved");
        Ok(user)
    }

    async fn reject(&self, actor_id: &EntityId, user_id: &EntityId) -> Result<User, UseCaseError> {
        let actor = self.admin(actor_id).await?;
        if actor_id == user_id {
            return Err(UseCaseError::Forbidden("administrators cannot reject their own account".into()));
        }
        let mut user = self.load(user_id).await?;

        user.reject(actor.id())?;
        self.save_and_publish(&mut user).await?;

        info!(user_id = %user_id, by = %actor_id, "user rejected");
        Ok(user)
    }

    async fn add_skill(&self, actor_id: &EntityId, user_id: &EntityId, skill: &str) -> Result<User, UseCaseError> {
        let mut user = self.skill_owner(actor_id, user_id).await?;

        if user.add_skill(skill)? {
            self.save_and_publish(&mut user).await?;
            info!(user_id = %user_id, skill = skill.trim(), "skill added");
        }
        Ok(user)
    }

    async fn remove_skill(&self, actor_id: &EntityId, user_id: &EntityId, skill: &str) -> Result<User, UseCaseError> {
        let mut user = self.skill_owner(actor_id, user_id).await?;

        if user.remove_skill(skill)? {
            self.save_and_publish(&mut user).await?;
            info!(user_id = %user_id, skill = skill.trim(), "skill removed");
        }
        Ok(user)
    }

    async fn get_user(&self, id: &EntityId) -> Result<Option<User>, UseCaseError> {
        Ok(self.user_repo.find_by_id(id).await?)
    }

    async fn list_users(&self, query: UserQuery) -> Result<Vec<User>, UseCaseError> {
        let role = match query.role.as_deref() {
            Some(name) => Some(
                Role::from_name(name)
                    .ok_or_else(|| UseCaseError::Validation(format!("unknown role '{name}'")))?
                    .name(),
            ),
            None => None,
        };

        let mut users: Vec<User> = self
            .user_repo
            .list()
            .await?
            .into_iter()
            .filter(|u| role.map_or(true, |r| u.role().name() == r))
            .filter(|u| query.status.map_or(true, |s| u.status() == s))
            .collect();
        users.sort_by(|a, b| a.created_at().cmp(&b.created_at()).then_with(|| a.id().cmp(b.id())));
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::AccountStatus;
    use crate::infrastructure::events::RecordingEventPublisher;
    use crate::infrastructure::persistence::InMemoryUserRepository;

    fn service() -> (UserService, Arc<RecordingEventPublisher>) {
        let events = Arc::new(RecordingEventPublisher::new());
        let service = UserService::new(Arc::new(InMemoryUserRepository::new()), events.clone());
        (service, events)
    }

    fn signup(name: &str, email: &str, role: &str) -> SignupCommand {
        SignupCommand {
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_pending_and_unique() {
        let (service, events) = service();

        let user = service.signup(signup("Ada", "Ada@Example.com", "skilled")).await.unwrap();
        assert_eq!(user.status(), AccountStatus::Pending);
        assert_eq!(user.email().as_str(), "ada@example.com");
        assert_eq!(events.event_types(), ["user.signed_up"]);

        let dup = service.signup(signup("Ada 2", "ada@example.com", "sales")).await;
        assert!(matches!(dup, Err(UseCaseError::Validation(_))));
    }

    #[tokio::test]
    async fn test_signup_rejects_admin_and_bad_input() {
        let (service, _) = service();
        assert!(matches!(
            service.signup(signup("Eve", "eve@example.com", "admin")).await,
            Err(UseCaseError::Validation(_))
        ));
        assert!(matches!(
            service.signup(signup("Eve", "not-an-email", "sales")).await,
            Err(UseCaseError::Validation(_))
        ));
        assert!(matches!(
            service.signup(signup("  ", "eve@example.com", "sales")).await,
            Err(UseCaseError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_only_one_bootstrap_admin() {
        let (service, _) = service();
        let admin = service.bootstrap_admin("Root", "root@example.com").await.unwrap();
        assert!(admin.is_admin() && admin.is_active());

        let second = service.bootstrap_admin("Other", "other@example.com").await;
        assert!(matches!(second, Err(UseCaseError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_admin_cannot_lock_themselves_out() {
        let (service, _) = service();
        let admin = service.bootstrap_admin("Root", "root@example.com").await.unwrap();
        let ada = service.signup(signup("Ada", "ada@example.com", "skilled")).await.unwrap();

        let own = service.reject(admin.id(), admin.id()).await;
        assert!(matches!(own, Err(UseCaseError::Forbidden(_))));

        let root = service.get_user(admin.id()).await.unwrap().unwrap();
        assert!(root.is_active());
        assert!(service.approve(admin.id(), ada.id()).await.unwrap().is_active());
    }

    #[tokio::test]
    async fn test_bootstrap_again_when_no_admin_is_active() {
        let users = Arc::new(InMemoryUserRepository::new());
        let service = UserService::new(users.clone(), Arc::new(RecordingEventPublisher::new()));

        // an admin record left rejected in storage
        let mut stale = User::bootstrap_admin("Old", Email::parse("old@example.com").unwrap()).unwrap();
        stale.reject(&EntityId::new()).unwrap();
        users.save(&stale).await.unwrap();

        let admin = service.bootstrap_admin("Root", "root@example.com").await.unwrap();
        assert!(admin.is_admin() && admin.is_active());
    }

    #[tokio::test]
    async fn test_approval_flow() {
        let (service, _) = service();
        let admin = service.bootstrap_admin("Root", "root@example.com").await.unwrap();
        let ada = service.signup(signup("Ada", "ada@example.com", "skilled")).await.unwrap();
        let sam = service.signup(signup("Sam", "sam@example.com", "sales")).await.unwrap();

        let denied = service.approve(sam.id(), ada.id()).await;
        assert!(matches!(denied, Err(UseCaseError::Forbidden(_))));

        let approved = service.approve(admin.id(), ada.id()).await.unwrap();
        assert!(approved.is_assignable());

        service.reject(admin.id(), sam.id()).await.unwrap();
        let pending = service
            .list_users(UserQuery { role: None, status: Some(AccountStatus::Rejected) })
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id(), sam.id());
    }

    #[tokio::test]
    async fn test_skills_managed_by_owner_only() {
        let (service, _) = service();
        let admin = service.bootstrap_admin("Root", "root@example.com").await.unwrap();
        let ada = service.signup(signup("Ada", "ada@example.com", "skilled")).await.unwrap();

        // pending agents cannot edit yet
        let early = service.add_skill(ada.id(), ada.id(), "billing").await;
        assert!(matches!(early, Err(UseCaseError::Forbidden(_))));

        service.approve(admin.id(), ada.id()).await.unwrap();
        let ada = service.add_skill(ada.id(), ada.id(), " Billing ").await.unwrap();
        assert!(ada.skills().unwrap().contains("billing"));

        let by_admin = service.add_skill(admin.id(), ada.id(), "refund").await;
        assert!(matches!(by_admin, Err(UseCaseError::Forbidden(_))));

        let blank = service.add_skill(ada.id(), ada.id(), "   ").await;
        assert!(matches!(blank, Err(UseCaseError::Validation(_))));

        let ada = service.remove_skill(ada.id(), ada.id(), "BILLING").await.unwrap();
        assert!(ada.skills().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_role() {
        let (service, _) = service();
        service.signup(signup("Ada", "ada@example.com", "skilled")).await.unwrap();
        service.signup(signup("Sam", "sam@example.com", "sales")).await.unwrap();

        let agents = service
            .list_users(UserQuery { role: Some("skilled".into()), status: None })
            .await
            .unwrap();
        assert_eq!(agents.len(), 1);

        let unknown = service.list_users(UserQuery { role: Some("wizard".into()), status: None }).await;
        assert!(matches!(unknown, Err(UseCaseError::Validation(_))));
    }
}
