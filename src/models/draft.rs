use crate::error::AppError;
use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A report that is being put together across the wizard screens and has not
/// been submitted yet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Draft {
    pub id: Uuid,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category: String,
    pub title: String,
    pub details: String,
    /// Locator of the attached photo, empty when there is none
    pub file: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whether a photo is attached, derived from `Draft::file`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentState {
    Empty,
    Attached,
}

impl AttachmentState {
    pub fn of(file: &str) -> Self {
        if file.is_empty() {
            AttachmentState::Empty
        } else {
            AttachmentState::Attached
        }
    }
}

impl Draft {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            latitude: None,
            longitude: None,
            category: String::new(),
            title: String::new(),
            details: String::new(),
            file: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn attachment_state(&self) -> AttachmentState {
        AttachmentState::of(&self.file)
    }

    #[allow(dead_code)]
    pub fn has_photo(&self) -> bool {
        self.attachment_state() == AttachmentState::Attached
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(lat) = self.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(AppError::Validation(format!("Latitude out of range: {}", lat)));
            }
        }
        if let Some(lon) = self.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(AppError::Validation(format!("Longitude out of range: {}", lon)));
            }
        }
        Ok(())
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> TryFrom<&Row<'r>> for Draft {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'r>) -> Result<Self, Self::Error> {
        let uuid_str: String = row.get(0)?;
        let id = Uuid::parse_str(&uuid_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Draft {
            id,
            latitude: row.get(1)?,
            longitude: row.get(2)?,
            category: row.get(3)?,
            title: row.get(4)?,
            details: row.get(5)?,
            file: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}
