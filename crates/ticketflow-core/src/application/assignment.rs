//! Agent assignment against live repository state.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::aggregates::User;
use crate::domain::services::{select_agent, AgentCandidate};
use crate::domain::value_objects::SkillSet;
use crate::ports::outbound::{RepositoryError, TicketRepository, UserRepository};

/// Reads the active agent pool and workloads, then delegates the choice to
/// the pure selection policy. Nothing is reserved: two concurrent intakes may
/// pick the same agent.
pub struct AgentAssignor {
    users: Arc<dyn UserRepository>,
    tickets: Arc<dyn TicketRepository>,
}

impl AgentAssignor {
    pub fn new(users: Arc<dyn UserRepository>, tickets: Arc<dyn TicketRepository>) -> Self {
        Self { users, tickets }
    }

    /// Active agents with their current workload. Tickets are read once,
    /// whatever the pool size.
    pub async fn pool(&self) -> Result<Vec<AgentCandidate>, RepositoryError> {
        let agents = self.users.find_active_agents().await?;
        if agents.is_empty() {
            return Ok(Vec::new());
        }
        let workloads = self.tickets.open_workloads().await?;
        Ok(agents
            .into_iter()
            .map(|agent| {
                let workload = workloads.get(agent.id()).copied().unwrap_or(0);
                AgentCandidate::new(agent, workload)
            })
            .collect())
    }

    pub async fn assign(&self, required: &SkillSet) -> Result<Option<User>, RepositoryError> {
        let pool = self.pool().await?;
        if pool.is_empty() {
            warn!("no active skilled agents available");
            return Ok(None);
        }

        let picked = select_agent(&pool, required, &mut rand::thread_rng()).map(|c| c.agent.clone());
        if let Some(agent) = &picked {
            debug!(agent = %agent.id(), required = %required, "agent selected");
        }
        Ok(picked)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::aggregates::{Role, Ticket, TicketDraft};
    use crate::domain::value_objects::{Classification, Email, EntityId, EscalationRisk, Sentiment};
    use crate::infrastructure::persistence::{InMemoryTicketRepository, InMemoryUserRepository};
    use crate::ports::outbound::TicketFilter;

    /// Counts every full read of the ticket set.
    #[derive(Default)]
    struct CountingTickets {
        inner: InMemoryTicketRepository,
        scans: AtomicUsize,
    }

    #[async_trait]
    impl TicketRepository for CountingTickets {
        async fn find_by_id(&self, id: &EntityId) -> Result<Option<Ticket>, RepositoryError> {
            self.inner.find_by_id(id).await
        }

        async fn query(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, RepositoryError> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            self.inner.query(filter).await
        }

        async fn count_open_assigned(&self, agent_id: &EntityId) -> Result<usize, RepositoryError> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            self.inner.count_open_assigned(agent_id).await
        }

        async fn open_workloads(&self) -> Result<HashMap<EntityId, usize>, RepositoryError> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            self.inner.open_workloads().await
        }

        async fn save(&self, ticket: &Ticket) -> Result<(), RepositoryError> {
            self.inner.save(ticket).await
        }

        async fn delete(&self, id: &EntityId) -> Result<(), RepositoryError> {
            self.inner.delete(id).await
        }
    }

    fn agent(n: usize) -> User {
        let email = Email::parse(&format!("agent{n}@example.com")).unwrap();
        let mut agent = User::register(format!("Agent {n}"), email, Role::skilled()).unwrap();
        agent.approve(&EntityId::new()).unwrap();
        agent
    }

    fn assigned_to(agent: &User) -> Ticket {
        let draft = TicketDraft {
            title: "Printer jam".to_string(),
            description: String::new(),
            customer_email: None,
            customer_name: None,
            classification: Classification::fallback(),
            sentiment: Sentiment::Neutral,
            escalation_risk: EscalationRisk::Low,
            troubleshoot_steps: vec!["Restart".to_string()],
        };
        Ticket::open(draft, Some(agent), None).unwrap()
    }

    #[tokio::test]
    async fn test_pool_reads_tickets_once() {
        let users = Arc::new(InMemoryUserRepository::new());
        let tickets = Arc::new(CountingTickets::default());

        let agents: Vec<User> = (0..5).map(agent).collect();
        for a in &agents {
            users.save(a).await.unwrap();
        }
        tickets.save(&assigned_to(&agents[2])).await.unwrap();
        tickets.save(&assigned_to(&agents[2])).await.unwrap();

        let assignor = AgentAssignor::new(users, tickets.clone());
        let pool = assignor.pool().await.unwrap();

        assert_eq!(pool.len(), 5);
        assert_eq!(tickets.scans.load(Ordering::SeqCst), 1);
        let busy = pool.iter().find(|c| c.agent.id() == agents[2].id()).unwrap();
        assert_eq!(busy.workload, 2);
        assert_eq!(pool.iter().map(|c| c.workload).sum::<usize>(), 2);
    }

    #[tokio::test]
    async fn test_empty_pool_skips_ticket_read() {
        let tickets = Arc::new(CountingTickets::default());
        let assignor = AgentAssignor::new(Arc::new(InMemoryUserRepository::new()), tickets.clone());

        let required: SkillSet = ["billing"].into_iter().collect();
        assert!(assignor.assign(&required).await.unwrap().is_none());
        assert_eq!(tickets.scans.load(Ordering::SeqCst), 0);
    }
}
