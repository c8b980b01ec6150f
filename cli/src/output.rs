//! Output formatting

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use ticketflow_core::application::TicketStats;
use ticketflow_core::{Ticket, User};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Print `data` as JSON/YAML, or the rows built by `rows` as a table.
    pub fn print<T, R>(&self, data: &T, rows: impl FnOnce() -> Vec<R>) -> Result<()>
    where
        T: Serialize + ?Sized,
        R: Tabled,
    {
        match self {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(data)?),
            OutputFormat::Table => {
                let rows = rows();
                if rows.is_empty() {
                    println!("{}", "(none)".dimmed());
                } else {
                    println!("{}", Table::new(rows).with(Style::rounded()));
                }
            }
        }
        Ok(())
    }

    pub fn tickets(&self, tickets: &[Ticket]) -> Result<()> {
        self.print(tickets, || tickets.iter().map(TicketRow::from).collect())
    }

    pub fn ticket(&self, ticket: &Ticket) -> Result<()> {
        self.print(ticket, || ticket_fields(ticket))
    }

    pub fn users(&self, users: &[User]) -> Result<()> {
        self.print(users, || users.iter().map(UserRow::from).collect())
    }

    pub fn user(&self, user: &User) -> Result<()> {
        self.print(user, || vec![UserRow::from(user)])
    }

    pub fn stats(&self, stats: &TicketStats) -> Result<()> {
        if let OutputFormat::Table = self {
            println!("{}", stats.to_string().bold());
            for (category, count) in &stats.by_category {
                println!("  {category}: {count}");
            }
        }
        self.print(stats, || {
            stats
                .agent_workloads
                .iter()
                .map(|w| WorkloadRow {
                    agent: w.agent_id.clone(),
                    name: w.name.clone(),
                    skills: w.skills.join(", "),
                    workload: w.workload,
                })
                .collect()
        })
    }

    /// Plain list of strings (troubleshooting steps, generated text).
    pub fn lines(&self, lines: &[String]) -> Result<()> {
        match self {
            OutputFormat::Table => {
                for (i, line) in lines.iter().enumerate() {
                    println!("{:>2}. {line}", i + 1);
                }
                Ok(())
            }
            _ => self.print(lines, Vec::<Field>::new),
        }
    }
}

pub fn success(message: impl AsRef<str>) {
    println!("{} {}", "✓".green().bold(), message.as_ref());
}

pub fn warning(message: impl AsRef<str>) {
    eprintln!("{} {}", "!".yellow().bold(), message.as_ref());
}

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Escalation")]
    escalation: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Ticket> for TicketRow {
    fn from(t: &Ticket) -> Self {
        Self {
            id: t.id().to_string(),
            title: truncate(t.title(), 40),
            category: t.category().to_string(),
            priority: t.priority().to_string(),
            status: t.status().to_string(),
            escalation: t.escalation_risk().to_string(),
            assignee: t.assigned_to_name().to_string(),
            created: t.created_at().format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Skills")]
    skills: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id().to_string(),
            name: u.name().to_string(),
            email: u.email().as_str().to_string(),
            role: u.role().name().to_string(),
            status: u.status().to_string(),
            skills: u.skills().map(|s| s.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct WorkloadRow {
    #[tabled(rename = "Agent")]
    agent: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Skills")]
    skills: String,
    #[tabled(rename = "Open tickets")]
    workload: usize,
}

#[derive(Tabled)]
struct Field {
    #[tabled(rename = "Field")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn ticket_fields(t: &Ticket) -> Vec<Field> {
    let field = |name: &'static str, value: String| Field { name, value };
    let steps = t
        .troubleshoot_steps()
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {s}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    vec![
        field("ID", t.id().to_string()),
        field("Title", t.title().to_string()),
        field("Description", t.description().to_string()),
        field("Customer", t.customer_name().unwrap_or("-").to_string()),
        field("Customer email", t.customer_email().unwrap_or("-").to_string()),
        field("Category", t.category().to_string()),
        field("Priority", t.priority().to_string()),
        field("Sentiment", t.sentiment().to_string()),
        field("Escalation", t.escalation_risk().to_string()),
        field("Status", t.status().to_string()),
        field("Assigned to", t.assigned_to_name().to_string()),
        field("Created by", t.created_by_name().unwrap_or("-").to_string()),
        field("Created", t.created_at().to_rfc3339()),
        field("Updated", t.updated_at().to_rfc3339()),
        field("Troubleshooting", steps),
    ]
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}
