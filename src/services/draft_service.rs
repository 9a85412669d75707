use crate::error::AppError;
use crate::models::Draft;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

const DRAFT_COLUMNS: &str =
    "uuid, latitude, longitude, category, title, details, file, created_at, updated_at";

/// Persistence the wizard screens call after every change to a draft
pub trait DraftStore {
    fn save(&self, draft: &Draft) -> Result<(), AppError>;
}

/// `DraftStore` backed by the app's SQLite database
pub struct SqliteDraftStore {
    conn: Connection,
}

impl SqliteDraftStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens the app database
    pub fn open() -> Result<Self, AppError> {
        Ok(Self::new(crate::database::init_database()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl DraftStore for SqliteDraftStore {
    fn save(&self, draft: &Draft) -> Result<(), AppError> {
        save_draft(&self.conn, draft)
    }
}

/// Creates a new empty draft and stores it
pub fn create_draft(conn: &Connection) -> Result<Draft, AppError> {
    let draft = Draft::new();
    save_draft(conn, &draft)?;
    log::info!("Created draft {}", draft.id);
    Ok(draft)
}

/// Inserts or updates a draft. `updated_at` is set to the time of the save.
pub fn save_draft(conn: &Connection, draft: &Draft) -> Result<(), AppError> {
    draft.validate()?;

    conn.execute(
        "INSERT INTO drafts (uuid, latitude, longitude, category, title, details, file, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(uuid) DO UPDATE SET
            latitude = excluded.latitude,
            longitude = excluded.longitude,
            category = excluded.category,
            title = excluded.title,
            details = excluded.details,
            file = excluded.file,
            updated_at = excluded.updated_at",
        (
            draft.id.to_string(),
            draft.latitude,
            draft.longitude,
            &draft.category,
            &draft.title,
            &draft.details,
            &draft.file,
            draft.created_at,
            Utc::now(),
        ),
    )?;

    log::debug!("Saved draft {} (photo: {:?})", draft.id, draft.file);
    Ok(())
}

/// Loads a draft by id
pub fn load_draft(conn: &Connection, id: &Uuid) -> Result<Draft, AppError> {
    let sql = format!("SELECT {} FROM drafts WHERE uuid = ?1", DRAFT_COLUMNS);
    conn.query_row(&sql, [id.to_string()], |row| Draft::try_from(row))
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AppError::NotFound("Draft".to_string()),
            _ => AppError::Database(e),
        })
}

/// The most recently edited draft, or a freshly created one
pub fn current_or_new_draft(conn: &Connection) -> Result<Draft, AppError> {
    let sql = format!(
        "SELECT {} FROM drafts ORDER BY updated_at DESC LIMIT 1",
        DRAFT_COLUMNS
    );
    let latest = conn
        .query_row(&sql, [], |row| Draft::try_from(row))
        .optional()?;

    match latest {
        Some(draft) => Ok(draft),
        None => create_draft(conn),
    }
}

/// Deletes a draft (after submission or when discarded)
#[allow(dead_code)]
pub fn delete_draft(conn: &Connection, id: &Uuid) -> Result<(), AppError> {
    let rows_affected = conn.execute("DELETE FROM drafts WHERE uuid = ?1", [id.to_string()])?;

    if rows_affected == 0 {
        return Err(AppError::NotFound("Draft".to_string()));
    }

    Ok(())
}

/// All photo locators currently attached to a draft
pub fn referenced_photos(conn: &Connection) -> Result<Vec<String>, AppError> {
    let mut stmt = conn.prepare("SELECT file FROM drafts WHERE file != ''")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
