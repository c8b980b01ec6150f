//! In-memory repository implementations

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::aggregates::{Ticket, User};
use crate::domain::value_objects::{Email, EntityId};
use crate::ports::outbound::{RepositoryError, TicketFilter, TicketRepository, UserRepository};

/// In-memory user repository
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<EntityId, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email() == email)
            .map(|u| u.value().clone()))
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.users.iter().map(|u| u.value().clone()).collect())
    }

    async fn find_active_agents(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self
            .users
            .iter()
            .filter(|u| u.is_assignable())
            .map(|u| u.value().clone())
            .collect())
    }

    async fn save(&self, user: &User) -> Result<(), RepositoryError> {
        self.users.insert(user.id().clone(), user.clone());
        Ok(())
    }

    async fn delete(&self, id: &EntityId) -> Result<(), RepositoryError> {
        self.users.remove(id);
        Ok(())
    }
}

/// In-memory ticket repository
#[derive(Default)]
pub struct InMemoryTicketRepository {
    tickets: DashMap<EntityId, Ticket>,
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Ticket>, RepositoryError> {
        Ok(self.tickets.get(id).map(|t| t.value().clone()))
    }

    async fn query(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, RepositoryError> {
        Ok(self
            .tickets
            .iter()
            .filter(|t| filter.matches(t.value()))
            .map(|t| t.value().clone())
            .collect())
    }

    async fn count_open_assigned(&self, agent_id: &EntityId) -> Result<usize, RepositoryError> {
        Ok(self
            .tickets
            .iter()
            .filter(|t| t.is_assigned_to(agent_id) && t.is_active())
            .count())
    }

    async fn open_workloads(&self) -> Result<HashMap<EntityId, usize>, RepositoryError> {
        let mut workloads = HashMap::new();
        for entry in self.tickets.iter().filter(|t| t.is_active()) {
            if let Some(agent) = entry.assigned_to() {
                *workloads.entry(agent.clone()).or_insert(0) += 1;
            }
        }
        Ok(workloads)
    }

    async fn save(&self, ticket: &Ticket) -> Result<(), RepositoryError> {
        self.tickets.insert(ticket.id().clone(), ticket.clone());
        Ok(())
    }

    async fn delete(&self, id: &EntityId) -> Result<(), RepositoryError> {
        self.tickets.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{Role, TicketDraft};
    use crate::domain::value_objects::{Classification, EscalationRisk, Sentiment, TicketStatus};

    fn active_agent() -> User {
        let email = Email::parse("agent@example.com").unwrap();
        let mut agent = User::register("Ada", email, Role::skilled()).unwrap();
        agent.approve(&EntityId::new()).unwrap();
        agent
    }

    fn ticket(title: &str, assignee: Option<&User>) -> Ticket {
        let draft = TicketDraft {
            title: title.to_string(),
            description: String::new(),
            customer_email: None,
            customer_name: None,
            classification: Classification::fallback(),
            sentiment: Sentiment::Neutral,
            escalation_risk: EscalationRisk::Low,
            troubleshoot_steps: vec!["Restart".to_string()],
        };
        Ticket::open(draft, assignee, None).unwrap()
    }

    #[tokio::test]
    async fn test_user_repository_save_and_find() {
        let repo = InMemoryUserRepository::new();
        let agent = active_agent();
        repo.save(&agent).await.unwrap();

        let found = repo.find_by_email(agent.email()).await.unwrap();
        assert_eq!(found.unwrap().id(), agent.id());
        assert_eq!(repo.find_active_agents().await.unwrap().len(), 1);

        repo.delete(agent.id()).await.unwrap();
        assert!(repo.find_by_id(agent.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_assigned_excludes_resolved() {
        let repo = InMemoryTicketRepository::new();
        let agent = active_agent();

        let open = ticket("Still open", Some(&agent));
        let mut done = ticket("Done", Some(&agent));
        done.transition_to(TicketStatus::InProgress).unwrap();
        done.transition_to(TicketStatus::Resolved).unwrap();
        repo.save(&open).await.unwrap();
        repo.save(&done).await.unwrap();
        repo.save(&ticket("Unassigned", None)).await.unwrap();

        assert_eq!(repo.count_open_assigned(agent.id()).await.unwrap(), 1);
        assert_eq!(repo.len(), 3);

        let workloads = repo.open_workloads().await.unwrap();
        assert_eq!(workloads.len(), 1);
        assert_eq!(workloads.get(agent.id()), Some(&1));
    }

    #[tokio::test]
    async fn test_query_by_filter() {
        let repo = InMemoryTicketRepository::new();
        let agent = active_agent();
        repo.save(&ticket("Printer jam", Some(&agent))).await.unwrap();
        repo.save(&ticket("Laptop slow", None)).await.unwrap();

        let filter = TicketFilter {
            assigned_to: Some(agent.id().clone()),
            ..Default::default()
        };
        assert_eq!(repo.query(&filter).await.unwrap().len(), 1);

        let filter = TicketFilter {
            search: Some("laptop".to_string()),
            ..Default::default()
        };
        let found = repo.query(&filter).await.unwrap();
        assert_eq!(found[0].title(), "Laptop slow");
    }
}
