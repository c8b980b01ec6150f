//! Tickets commands

use anyhow::{anyhow, Result};
use colored::Colorize;
use ticketflow_core::application::{TicketQuery, TicketSubmission};
use ticketflow_core::{EscalationRisk, Ticket, TicketUseCases, UNASSIGNED};

use super::{entity_id, parse_category, App};
use crate::output::{self, OutputFormat};
use crate::TicketCommands;

pub async fn handle(action: TicketCommands, app: &App, format: OutputFormat) -> Result<()> {
    let tickets = &app.tickets;
    match action {
        TicketCommands::Create {
            title,
            description,
            customer_name,
            customer_email,
            actor,
        } => {
            let mut submission = TicketSubmission::new(title).with_customer(customer_name, customer_email);
            if let Some(description) = description {
                submission = submission.with_description(description);
            }
            let ticket = match actor {
                Some(actor) => tickets.open_ticket(&entity_id(&actor)?, submission).await?,
                None => tickets.intake(submission).await?,
            };
            if let OutputFormat::Table = format {
                report_intake(&ticket);
            }
            format.ticket(&ticket)?;
        }
        TicketCommands::List {
            actor,
            status,
            category,
            search,
            sort,
            direction,
        } => {
            let query = TicketQuery {
                viewer: actor,
                status,
                category: category.as_deref().map(parse_category).transpose()?,
                search,
                sort,
                direction,
            };
            let list = tickets.list_tickets(query).await?;
            format.tickets(&list)?;
        }
        TicketCommands::Get { id } => {
            let ticket = tickets
                .get_ticket(&entity_id(&id)?)
                .await?
                .ok_or_else(|| anyhow!("ticket {id} not found"))?;
            format.ticket(&ticket)?;
        }
        TicketCommands::Status { id, status, actor } => {
            let ticket = tickets
                .update_status(&entity_id(&actor)?, &entity_id(&id)?, status)
                .await?;
            output::success(format!("Ticket {} is now {}", ticket.id(), ticket.status()));
        }
        TicketCommands::Reassign { id, agent, actor } => {
            let ticket = tickets
                .reassign(&entity_id(&actor)?, &entity_id(&id)?, &entity_id(&agent)?)
                .await?;
            output::success(format!("Ticket {} reassigned to {}", ticket.id(), ticket.assigned_to_name()));
        }
        TicketCommands::RefreshAi { id, actor } => {
            let ticket = tickets
                .refresh_ai_details(&entity_id(&actor)?, &entity_id(&id)?)
                .await?;
            format.ticket(&ticket)?;
        }
        TicketCommands::Delete { id, actor } => {
            tickets.delete_ticket(&entity_id(&actor)?, &entity_id(&id)?).await?;
            output::success(format!("Ticket {id} deleted"));
        }
        TicketCommands::Stats { actor } => {
            let viewer = actor.as_deref().map(entity_id).transpose()?;
            let stats = tickets.stats(viewer.as_ref()).await?;
            format.stats(&stats)?;
        }
    }
    Ok(())
}

fn report_intake(ticket: &Ticket) {
    output::success(format!(
        "Ticket {} created: {} / {}",
        ticket.id(),
        ticket.category(),
        ticket.priority()
    ));
    if ticket.assigned_to_name() == UNASSIGNED {
        output::warning("no active agent available, ticket is unassigned");
    }
    if ticket.escalation_risk() == EscalationRisk::High {
        eprintln!("{}", "High escalation risk".red().bold());
    }
}
