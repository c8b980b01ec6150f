//! User Aggregate
//!
//! Admins, sales users and skilled agents share one aggregate; the role is a
//! typed variant and only agents carry a skill set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::events::{DomainEvent, UserEvent};
use crate::domain::value_objects::{normalize_skill, AccountStatus, Email, EntityId, SkillSet};

/// Role of a user account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Role {
    Admin,
    Sales,
    Skilled { skills: SkillSet },
}

impl Role {
    pub fn skilled() -> Self {
        Self::Skilled { skills: SkillSet::new() }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Sales => "sales",
            Self::Skilled { .. } => "skilled",
        }
    }

    /// Parse a role name as typed on the command line or in a signup form.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "sales" => Some(Self::Sales),
            "skilled" | "agent" => Some(Self::skilled()),
            _ => None,
        }
    }
}

/// User aggregate root
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    id: EntityId,
    name: String,
    email: Email,
    role: Role,
    status: AccountStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

impl User {
    /// Register a new account awaiting admin approval.
    pub fn register(name: impl Into<String>, email: Email, role: Role) -> Result<Self, UserError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(UserError::EmptyName);
        }

        let now = Utc::now();
        let id = EntityId::new();
        let mut user = Self {
            id: id.clone(),
            name,
            email,
            role,
            status: AccountStatus::Pending,
            created_at: now,
            updated_at: now,
            events: vec![],
        };

        user.raise_event(DomainEvent::User(UserEvent::SignedUp {
            user_id: id,
            role: user.role.name(),
        }));

        Ok(user)
    }

    /// Create an already-active administrator.
    pub fn bootstrap_admin(name: impl Into<String>, email: Email) -> Result<Self, UserError> {
        let mut admin = Self::register(name, email, Role::Admin)?;
        admin.status = AccountStatus::Active;
        Ok(admin)
    }

    pub fn id(&self) -> &EntityId { &self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn email(&self) -> &Email { &self.email }
    pub fn role(&self) -> &Role { &self.role }
    pub fn status(&self) -> AccountStatus { self.status }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    pub fn is_admin(&self) -> bool { matches!(self.role, Role::Admin) }
    pub fn is_agent(&self) -> bool { matches!(self.role, Role::Skilled { .. }) }
    pub fn is_active(&self) -> bool { self.status == AccountStatus::Active }

    /// Eligible to receive ticket assignments right now.
    pub fn is_assignable(&self) -> bool {
        self.is_agent() && self.is_active()
    }

    pub fn skills(&self) -> Option<&SkillSet> {
        match &self.role {
            Role::Skilled { skills } => Some(skills),
            _ => None,
        }
    }

    pub fn approve(&mut self, approved_by: &EntityId) -> Result<(), UserError> {
        if self.status == AccountStatus::Active {
            return Err(UserError::AlreadyActive);
        }
        self.status = AccountStatus::Active;
        self.touch();
        self.raise_event(DomainEvent::User(UserEvent::Approved {
            user_id: self.id.clone(),
            approved_by: approved_by.clone(),
        }));
        Ok(())
    }

    pub fn reject(&mut self, rejected_by: &EntityId) -> Result<(), UserError> {
        if self.status == AccountStatus::Rejected {
            return Err(UserError::AlreadyRejected);
        }
        self.status = AccountStatus::Rejected;
        self.touch();
        self.raise_event(DomainEvent::User(UserEvent::Rejected {
            user_id: self.id.clone(),
            rejected_by: rejected_by.clone(),
        }));
        Ok(())
    }

    /// Returns false when the agent already had the skill.
    pub fn add_skill(&mut self, skill: &str) -> Result<bool, UserError> {
        let normalized = normalize_skill(skill);
        if normalized.is_empty() {
            return Err(UserError::EmptySkill);
        }
        let Role::Skilled { skills } = &mut self.role else {
            return Err(UserError::NotAnAgent);
        };

        let added = skills.insert(&normalized);
        if added {
            self.touch();
            self.raise_event(DomainEvent::User(UserEvent::SkillAdded {
                user_id: self.id.clone(),
                skill: normalized,
            }));
        }
        Ok(added)
    }

    /// Returns false when the agent did not have the skill.
    pub fn remove_skill(&mut self, skill: &str) -> Result<bool, UserError> {
        let normalized = normalize_skill(skill);
        if normalized.is_empty() {
            return Err(UserError::EmptySkill);
        }
        let Role::Skilled { skills } = &mut self.role else {
            return Err(UserError::NotAnAgent);
        };

        let removed = skills.remove(&normalized);
        if removed {
            self.touch();
            self.raise_event(DomainEvent::User(UserEvent::SkillRemoved {
                user_id: self.id.clone(),
                skill: normalized,
            }));
        }
        Ok(removed)
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise_event(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("skill cannot be empty")]
    EmptySkill,
    #[error("only skilled agents have skills")]
    NotAnAgent,
    #[error("account is already active")]
    AlreadyActive,
    #[error("account is already rejected")]
    AlreadyRejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> User {
        let email = Email::parse("agent@example.com").unwrap();
        User::register("Ada", email, Role::skilled()).unwrap()
    }

    #[test]
    fn test_signup_starts_pending() {
        let mut user = agent();
        assert_eq!(user.status(), AccountStatus::Pending);
        assert!(!user.is_assignable());

        let events = user.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], DomainEvent::User(UserEvent::SignedUp { role: "skilled", .. })));
    }

    #[test]
    fn test_blank_name_rejected() {
        let email = Email::parse("x@example.com").unwrap();
        assert!(matches!(User::register("   ", email, Role::Sales), Err(UserError::EmptyName)));
    }

    #[test]
    fn test_approval_makes_agent_assignable() {
        let mut user = agent();
        user.approve(&EntityId::new()).unwrap();
        assert!(user.is_assignable());
        assert_eq!(user.approve(&EntityId::new()), Err(UserError::AlreadyActive));
    }

    #[test]
    fn test_skills_are_normalized_and_deduplicated() {
        let mut user = agent();
        user.take_events();

        assert!(user.add_skill("  Billing ").unwrap());
        assert!(!user.add_skill("billing").unwrap());
        assert_eq!(user.skills().unwrap().len(), 1);
        assert_eq!(user.take_events().len(), 1);

        assert!(user.remove_skill("BILLING").unwrap());
        assert!(user.skills().unwrap().is_empty());
    }

    #[test]
    fn test_sales_user_has_no_skills() {
        let email = Email::parse("sales@example.com").unwrap();
        let mut user = User::register("Sam", email, Role::Sales).unwrap();
        assert_eq!(user.add_skill("billing"), Err(UserError::NotAnAgent));
        assert!(user.skills().is_none());
    }

    #[test]
    fn test_bootstrap_admin_is_active() {
        let email = Email::parse("root@example.com").unwrap();
        let admin = User::bootstrap_admin("Root", email).unwrap();
        assert!(admin.is_admin());
        assert!(admin.is_active());
    }
}
