//! File-backed store: one pretty-printed JSON document per record.
//!
//! Layout under the data directory:
//!
//! ```text
//! <data_dir>/users/<id>.json
//! <data_dir>/tickets/<id>.json
//! ```
//!
//! Writes go to a uniquely named temp file in the same directory and are then
//! renamed over the target, so readers never observe a half-written record.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::debug;

use crate::domain::aggregates::{Ticket, User};
use crate::domain::value_objects::{Email, EntityId};
use crate::ports::outbound::{RepositoryError, TicketFilter, TicketRepository, UserRepository};

const USERS_DIR: &str = "users";
const TICKETS_DIR: &str = "tickets";

#[derive(Clone, Debug)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `data_dir`.
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let root = data_dir.into();
        for dir in [USERS_DIR, TICKETS_DIR] {
            let path = root.join(dir);
            fs::create_dir_all(&path).await.map_err(|e| storage_error(&path, e))?;
        }
        debug!(root = %root.display(), "opened json file store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, dir: &str, id: &EntityId) -> Option<PathBuf> {
        let valid = !id.as_str().is_empty()
            && id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| self.root.join(dir).join(format!("{}.json", id.as_str())))
    }

    async fn read_one<T: DeserializeOwned>(&self, dir: &str, id: &EntityId) -> Result<Option<T>, RepositoryError> {
        let Some(path) = self.record_path(dir, id) else {
            return Ok(None);
        };
        match fs::read_to_string(&path).await {
            Ok(body) => parse(&path, &body).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(&path, e)),
        }
    }

    async fn read_all<T: DeserializeOwned>(&self, dir: &str) -> Result<Vec<T>, RepositoryError> {
        let dir_path = self.root.join(dir);
        let mut entries = fs::read_dir(&dir_path).await.map_err(|e| storage_error(&dir_path, e))?;
        let mut records = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(|e| storage_error(&dir_path, e))? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match fs::read_to_string(&path).await {
                Ok(body) => records.push(parse(&path, &body)?),
                // deleted between listing and reading
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(storage_error(&path, e)),
            }
        }
        Ok(records)
    }

    async fn write<T: Serialize>(&self, dir: &str, id: &EntityId, record: &T) -> Result<(), RepositoryError> {
        let path = self
            .record_path(dir, id)
            .ok_or_else(|| RepositoryError::Storage(format!("invalid record id: {id}")))?;
        let body = serde_json::to_string_pretty(record).map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        let tmp = path.with_file_name(format!(".{}.{}.tmp", id.as_str(), uuid::Uuid::new_v4()));
        fs::write(&tmp, body).await.map_err(|e| storage_error(&tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(storage_error(&path, e));
        }
        Ok(())
    }

    async fn remove(&self, dir: &str, id: &EntityId) -> Result<(), RepositoryError> {
        let Some(path) = self.record_path(dir, id) else {
            return Ok(());
        };
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&path, e)),
        }
    }
}

fn parse<T: DeserializeOwned>(path: &Path, body: &str) -> Result<T, RepositoryError> {
    serde_json::from_str(body).map_err(|e| RepositoryError::Serialization(format!("{}: {e}", path.display())))
}

fn storage_error(path: &Path, e: std::io::Error) -> RepositoryError {
    RepositoryError::Storage(format!("{}: {e}", path.display()))
}

#[async_trait]
impl UserRepository for JsonFileStore {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<User>, RepositoryError> {
        self.read_one(USERS_DIR, id).await
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let users: Vec<User> = self.read_all(USERS_DIR).await?;
        Ok(users.into_iter().find(|u| u.email() == email))
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        self.read_all(USERS_DIR).await
    }

    async fn find_active_agents(&self) -> Result<Vec<User>, RepositoryError> {
        let users: Vec<User> = self.read_all(USERS_DIR).await?;
        Ok(users.into_iter().filter(User::is_assignable).collect())
    }

    async fn save(&self, user: &User) -> Result<(), RepositoryError> {
        self.write(USERS_DIR, user.id(), user).await
    }

    async fn delete(&self, id: &EntityId) -> Result<(), RepositoryError> {
        self.remove(USERS_DIR, id).await
    }
}

#[async_trait]
impl TicketRepository for JsonFileStore {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Ticket>, RepositoryError> {
        self.read_one(TICKETS_DIR, id).await
    }

    async fn query(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, RepositoryError> {
        let tickets: Vec<Ticket> = self.read_all(TICKETS_DIR).await?;
        Ok(tickets.into_iter().filter(|t| filter.matches(t)).collect())
    }

    async fn count_open_assigned(&self, agent_id: &EntityId) -> Result<usize, RepositoryError> {
        let tickets: Vec<Ticket> = self.read_all(TICKETS_DIR).await?;
        Ok(tickets
            .iter()
            .filter(|t| t.is_assigned_to(agent_id) && t.is_active())
            .count())
    }

    async fn open_workloads(&self) -> Result<HashMap<EntityId, usize>, RepositoryError> {
        let tickets: Vec<Ticket> = self.read_all(TICKETS_DIR).await?;
        let mut workloads = HashMap::new();
        for agent in tickets.iter().filter(|t| t.is_active()).filter_map(Ticket::assigned_to) {
            *workloads.entry(agent.clone()).or_insert(0) += 1;
        }
        Ok(workloads)
    }

    async fn save(&self, ticket: &Ticket) -> Result<(), RepositoryError> {
        self.write(TICKETS_DIR, ticket.id(), ticket).await
    }

    async fn delete(&self, id: &EntityId) -> Result<(), RepositoryError> {
        self.remove(TICKETS_DIR, id).await
    }
}
