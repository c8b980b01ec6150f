//! Users commands

use anyhow::{anyhow, Result};
use ticketflow_core::application::{SignupCommand, UserQuery};
use ticketflow_core::UserUseCases;

use super::{entity_id, App};
use crate::output::{self, OutputFormat};
use crate::UserCommands;

pub async fn handle(action: UserCommands, app: &App, format: OutputFormat) -> Result<()> {
    let users = &app.users;
    match action {
        UserCommands::Signup { name, email, role } => {
            let user = users.signup(SignupCommand { name, email, role }).await?;
            output::success(format!("Signed up {} ({}), awaiting approval", user.id(), user.role().name()));
        }
        UserCommands::BootstrapAdmin { name, email } => {
            let admin = users.bootstrap_admin(&name, &email).await?;
            output::success(format!("Administrator created: {}", admin.id()));
        }
        UserCommands::Approve { id, actor } => {
            let user = users.approve(&entity_id(&actor)?, &entity_id(&id)?).await?;
            output::success(format!("Approved {} <{}>", user.name(), user.email()));
        }
        UserCommands::Reject { id, actor } => {
            let user = users.reject(&entity_id(&actor)?, &entity_id(&id)?).await?;
            output::success(format!("Rejected {} <{}>", user.name(), user.email()));
        }
        UserCommands::List { role, status } => {
            let list = users.list_users(UserQuery { role, status }).await?;
            format.users(&list)?;
        }
        UserCommands::Get { id } => {
            let user = users
                .get_user(&entity_id(&id)?)
                .await?
                .ok_or_else(|| anyhow!("user {id} not found"))?;
            format.user(&user)?;
        }
        UserCommands::AddSkill { skill, actor } => {
            let actor = entity_id(&actor)?;
            let user = users.add_skill(&actor, &actor, &skill).await?;
            format.user(&user)?;
        }
        UserCommands::RemoveSkill { skill, actor } => {
            let actor = entity_id(&actor)?;
            let user = users.remove_skill(&actor, &actor, &skill).await?;
            format.user(&user)?;
        }
    }
    Ok(())
}
