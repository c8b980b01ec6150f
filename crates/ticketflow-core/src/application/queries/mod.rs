//! Read-side helpers: visibility scoping, ordering and dashboard stats.

use std::cmp::Ordering;

use crate::application::dto::{AgentWorkload, SortDirection, TicketSortKey, TicketStats};
use crate::domain::aggregates::{Role, Ticket, User};
use crate::domain::policy::{authorize, Capability, Ownership};
use crate::domain::services::AgentCandidate;
use crate::domain::value_objects::{EscalationRisk, TicketStatus};
use crate::ports::outbound::TicketFilter;

/// Storage filter limiting results to what `viewer` may see: admins see
/// everything, agents their assigned tickets, sales users the ones they opened.
pub fn visibility_filter(viewer: &User) -> TicketFilter {
    if authorize(viewer, Capability::ViewAllTickets, Ownership::none()).is_ok() {
        return TicketFilter::default();
    }
    match viewer.role() {
        Role::Skilled { .. } => TicketFilter {
            assigned_to: Some(viewer.id().clone()),
            ..Default::default()
        },
        Role::Sales | Role::Admin => TicketFilter {
            created_by: Some(viewer.id().clone()),
            ..Default::default()
        },
    }
}

/// Sort in place. Ties fall back to creation time, then id, so output is stable.
pub fn sort_tickets(tickets: &mut [Ticket], key: TicketSortKey, direction: SortDirection) {
    tickets.sort_by(|a, b| {
        let primary = match key {
            TicketSortKey::CreatedAt => Ordering::Equal,
            TicketSortKey::Priority => a.priority().cmp(&b.priority()),
            TicketSortKey::Status => a.status().cmp(&b.status()),
            TicketSortKey::Title => a.title().to_lowercase().cmp(&b.title().to_lowercase()),
        };
        let ordering = primary
            .then_with(|| a.created_at().cmp(&b.created_at()))
            .then_with(|| a.id().cmp(b.id()));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

pub fn compute_stats(tickets: &[Ticket], pool: &[AgentCandidate]) -> TicketStats {
    let mut stats = TicketStats {
        total: tickets.len(),
        ..Default::default()
    };

    for ticket in tickets {
        match ticket.status() {
            TicketStatus::Open => stats.open += 1,
            TicketStatus::InProgress => stats.in_progress += 1,
            TicketStatus::Resolved => stats.resolved += 1,
        }
        if ticket.assigned_to().is_none() {
            stats.unassigned += 1;
        }
        if ticket.escalation_risk() == EscalationRisk::High {
            stats.high_escalation += 1;
        }
        *stats.by_category.entry(ticket.category().to_string()).or_default() += 1;
    }

    stats.agent_workloads = pool
        .iter()
        .map(|c| AgentWorkload {
            agent_id: c.agent.id().to_string(),
            name: c.agent.name().to_string(),
            skills: c.agent.skills().map(|s| s.iter().map(String::from).collect()).unwrap_or_default(),
            workload: c.workload,
        })
        .collect();
    stats
        .agent_workloads
        .sort_by(|a, b| b.workload.cmp(&a.workload).then_with(|| a.name.cmp(&b.name)));

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::TicketDraft;
    use crate::domain::value_objects::{Category, Classification, Email, EntityId, Priority, Sentiment};

    fn user(role: Role, email: &str) -> User {
        let mut user = User::register("U", Email::parse(email).unwrap(), role).unwrap();
        user.approve(&EntityId::new()).unwrap();
        user
    }

    fn ticket(title: &str, priority: Priority, risk: EscalationRisk) -> Ticket {
        let draft = TicketDraft {
            title: title.to_string(),
            description: String::new(),
            customer_email: None,
            customer_name: None,
            classification: Classification::new(Category::Billing, priority),
            sentiment: Sentiment::Neutral,
            escalation_risk: risk,
            troubleshoot_steps: vec!["Restart".to_string()],
        };
        Ticket::open(draft, None, None).unwrap()
    }

    #[test]
    fn test_visibility_by_role() {
        let admin = user(Role::Admin, "a@example.com");
        let agent = user(Role::skilled(), "b@example.com");
        let sales = user(Role::Sales, "c@example.com");

        let all = visibility_filter(&admin);
        assert!(all.assigned_to.is_none() && all.created_by.is_none());
        assert_eq!(visibility_filter(&agent).assigned_to.as_ref(), Some(agent.id()));
        assert_eq!(visibility_filter(&sales).created_by.as_ref(), Some(sales.id()));
    }

    #[test]
    fn test_sort_by_priority_and_title() {
        let mut tickets = vec![
            ticket("beta", Priority::Low, EscalationRisk::Low),
            ticket("Alpha", Priority::High, EscalationRisk::Low),
            ticket("gamma", Priority::Medium, EscalationRisk::Low),
        ];

        sort_tickets(&mut tickets, TicketSortKey::Priority, SortDirection::Desc);
        let titles: Vec<&str> = tickets.iter().map(Ticket::title).collect();
        assert_eq!(titles, ["Alpha", "gamma", "beta"]);

        sort_tickets(&mut tickets, TicketSortKey::Title, SortDirection::Asc);
        let titles: Vec<&str> = tickets.iter().map(Ticket::title).collect();
        assert_eq!(titles, ["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_stats_counts() {
        let mut progressing = ticket("two", Priority::Low, EscalationRisk::Low);
        progressing.transition_to(TicketStatus::InProgress).unwrap();
        let tickets = vec![ticket("one", Priority::High, EscalationRisk::High), progressing];

        let agent = user(Role::skilled(), "agent@example.com");
        let stats = compute_stats(&tickets, &[AgentCandidate::new(agent, 4)]);

        assert_eq!(stats.total, 2);
        assert_eq!(stats.open, 1);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.unassigned, 2);
        assert_eq!(stats.high_escalation, 1);
        assert_eq!(stats.by_category.get("Billing"), Some(&2));
        assert_eq!(stats.agent_workloads[0].workload, 4);
    }
}
