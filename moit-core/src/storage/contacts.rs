//! Contact-form rows.

use chrono::{DateTime, Utc};
use libsql::params;

use super::{Storage, from_secs, to_secs};
use crate::error::CoreError;
use crate::models::{Contact, ContactStatus};

const CONTACT_COLUMNS: &str = "id, name, email, phone, message, status, created_at, updated_at";

fn contact_from_row(row: &libsql::Row) -> Result<Contact, CoreError> {
    let status: String = row.get(5)?;
    Ok(Contact {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        message: row.get(4)?,
        status: status
            .parse()
            .map_err(|_| CoreError::Storage(format!("bad contact status: {status}")))?,
        created_at: from_secs(row.get(6)?),
        updated_at: from_secs(row.get(7)?),
    })
}

impl Storage {
    pub async fn insert_contact(&self, contact: &Contact) -> Result<(), CoreError> {
        self.conn()
            .execute(
                &format!("INSERT INTO contacts ({CONTACT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                params![
                    contact.id.as_str(),
                    contact.name.as_str(),
                    contact.email.as_str(),
                    contact.phone.as_str(),
                    contact.message.as_str(),
                    contact.status.to_string(),
                    to_secs(contact.created_at),
                    to_secs(contact.updated_at)
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn list_contacts(&self) -> Result<Vec<Contact>, CoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY created_at DESC"),
                (),
            )
            .await?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next().await? {
            contacts.push(contact_from_row(&row)?);
        }
        Ok(contacts)
    }

    pub async fn get_contact(&self, id: &str) -> Result<Option<Contact>, CoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"),
                params![id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(contact_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Returns the updated contact, or None when it does not exist.
    pub async fn update_contact_status(
        &self,
        id: &str,
        status: ContactStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Contact>, CoreError> {
        let affected = self
            .conn()
            .execute(
                "UPDATE contacts SET status = ?2, updated_at = ?3 WHERE id = ?1",
                params![id, status.to_string(), to_secs(at)],
            )
            .await?;
        if affected == 0 {
            return Ok(None);
        }
        self.get_contact(id).await
    }

    pub async fn delete_contact(&self, id: &str) -> Result<bool, CoreError> {
        let affected = self
            .conn()
            .execute("DELETE FROM contacts WHERE id = ?1", params![id])
            .await?;
        Ok(affected > 0)
    }
}
