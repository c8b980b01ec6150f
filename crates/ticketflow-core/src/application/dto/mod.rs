//! Data Transfer Objects (DTOs)
//!
//! Objects for transferring data across boundaries.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{AccountStatus, Category, TicketStatus};

// =============================================================================
// Ticket Commands
// =============================================================================

/// Input to the intake pipeline
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TicketSubmission {
    pub title: String,
    pub description: Option<String>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    /// Id of the user opening the ticket
    pub created_by: Option<String>,
}

impl TicketSubmission {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_customer(mut self, name: Option<String>, email: Option<String>) -> Self {
        self.customer_name = name;
        self.customer_email = email;
        self
    }

    pub fn created_by(mut self, user_id: impl Into<String>) -> Self {
        self.created_by = Some(user_id.into());
        self
    }
}

// =============================================================================
// Ticket Queries
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketSortKey {
    #[default]
    CreatedAt,
    Priority,
    Status,
    Title,
}

impl FromStr for TicketSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "created_at" | "created" | "date" => Ok(Self::CreatedAt),
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            "title" => Ok(Self::Title),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

/// Ticket listing request. Defaults to every visible ticket, newest first.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TicketQuery {
    /// Scope results to what this user may see
    pub viewer: Option<String>,
    pub status: Option<TicketStatus>,
    pub category: Option<Category>,
    pub search: Option<String>,
    pub sort: TicketSortKey,
    pub direction: SortDirection,
}

// =============================================================================
// User Commands
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignupCommand {
    pub name: String,
    pub email: String,
    /// `sales` or `skilled`
    pub role: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserQuery {
    pub role: Option<String>,
    pub status: Option<AccountStatus>,
}

// =============================================================================
// Views (Read Models)
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentWorkload {
    pub agent_id: String,
    pub name: String,
    pub skills: Vec<String>,
    pub workload: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStats {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub unassigned: usize,
    pub high_escalation: usize,
    pub by_category: BTreeMap<String, usize>,
    pub agent_workloads: Vec<AgentWorkload>,
}

impl fmt::Display for TicketStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tickets ({} open, {} in progress, {} resolved, {} unassigned, {} high escalation)",
            self.total, self.open, self.in_progress, self.resolved, self.unassigned, self.high_escalation
        )
    }
}
