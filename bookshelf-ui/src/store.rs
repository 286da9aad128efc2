//! Book record store
//!
//! A submitted form becomes a [`BookRecord`] owned by one user. Every store
//! operation is owner-scoped: a record belonging to someone else behaves
//! exactly like a missing one.

use std::collections::HashMap;

use async_trait::async_trait;
use bookshelf_common::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::form::BookStatus;

/// Identifier of the user who owns a record
pub type OwnerId = Uuid;

/// Validated form contents, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub status: BookStatus,
    pub notes: Option<String>,
    pub cover_url: Option<String>,
}

/// Stored book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub title: String,
    pub author: String,
    pub status: BookStatus,
    pub notes: Option<String>,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookRecord {
    fn apply(&mut self, book: NewBook) {
        self.title = book.title;
        self.author = book.author;
        self.status = book.status;
        self.notes = book.notes;
        self.cover_url = book.cover_url;
        self.updated_at = Utc::now();
    }
}

/// Persistence port for book records
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create(&self, owner: OwnerId, book: NewBook) -> Result<BookRecord>;

    async fn get(&self, owner: OwnerId, id: Uuid) -> Result<BookRecord>;

    /// All records of `owner`, newest first
    async fn list(&self, owner: OwnerId) -> Result<Vec<BookRecord>>;

    async fn update(&self, owner: OwnerId, id: Uuid, book: NewBook) -> Result<BookRecord>;

    async fn delete(&self, owner: OwnerId, id: Uuid) -> Result<()>;
}

/// Process-local store
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<Uuid, BookRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(format!("Book not found: {}", id))
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create(&self, owner: OwnerId, book: NewBook) -> Result<BookRecord> {
        let now = Utc::now();
        let record = BookRecord {
            id: Uuid::new_v4(),
            owner_id: owner,
            title: book.title,
            author: book.author,
            status: book.status,
            notes: book.notes,
            cover_url: book.cover_url,
            created_at: now,
            updated_at: now,
        };

        self.records.write().await.insert(record.id, record.clone());
        tracing::debug!(id = %record.id, owner = %owner, "Book record created");
        Ok(record)
    }

    async fn get(&self, owner: OwnerId, id: Uuid) -> Result<BookRecord> {
        self.records
            .read()
            .await
            .get(&id)
            .filter(|record| record.owner_id == owner)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn list(&self, owner: OwnerId) -> Result<Vec<BookRecord>> {
        let mut records: Vec<BookRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|record| record.owner_id == owner)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn update(&self, owner: OwnerId, id: Uuid, book: NewBook) -> Result<BookRecord> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .filter(|record| record.owner_id == owner)
            .ok_or_else(|| not_found(id))?;
        record.apply(book);
        Ok(record.clone())
    }

    async fn delete(&self, owner: OwnerId, id: Uuid) -> Result<()> {
        let mut records = self.records.write().await;
        match records.get(&id) {
            Some(record) if record.owner_id == owner => {
                records.remove(&id);
                Ok(())
            }
            _ => Err(not_found(id)),
        }
    }
}
