//! Show use cases: create, get, list, delete.
//!
//! `show_create` is the write path that keeps the denormalized venue and
//! artist rosters in step with the shows table. It classifies the new
//! show against the injected clock, appends the id to the matching
//! roster on both parents and bumps their counters, all inside a single
//! transaction.

use crate::domain::{Clock, ShowRoster, ShowSlot};
use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowCreateReq {
    pub venue_id: String,
    pub artist_id: String,
    pub start_time: String,
}

#[derive(Debug, Serialize)]
pub struct ShowDetailDto {
    pub id: String,
    pub venue_id: String,
    pub venue_name: String,
    pub artist_id: String,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
    pub created_at: String,
}

fn load_roster(conn: &Connection, table: &str, label: &str, id: &str) -> Result<ShowRoster, AppError> {
    let sql = format!(
        "SELECT past_shows, upcoming_shows, past_shows_count, upcoming_shows_count FROM {} WHERE id = ?1",
        table
    );
    let (past_json, upcoming_json, past_shows_count, upcoming_shows_count): (String, String, i64, i64) =
        conn.query_row(&sql, [id], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)))
            .map_err(|_| AppError::NotFound(format!("{} {}", label, id)))?;

    let roster = ShowRoster {
        past_shows: serde_json::from_str(&past_json)
            .map_err(|e| AppError::Persistence(e.to_string()))?,
        upcoming_shows: serde_json::from_str(&upcoming_json)
            .map_err(|e| AppError::Persistence(e.to_string()))?,
        past_shows_count,
        upcoming_shows_count,
    };
    if !roster.counts_consistent() {
        log::warn!("{} {} roster counters out of sync with id lists", label, id);
    }
    Ok(roster)
}

fn save_roster(
    conn: &Connection,
    table: &str,
    id: &str,
    roster: &ShowRoster,
    now: &str,
) -> Result<(), AppError> {
    let past_json = serde_json::to_string(&roster.past_shows)
        .map_err(|e| AppError::Persistence(e.to_string()))?;
    let upcoming_json = serde_json::to_string(&roster.upcoming_shows)
        .map_err(|e| AppError::Persistence(e.to_string()))?;
    let sql = format!(
        "UPDATE {} SET past_shows = ?1, upcoming_shows = ?2, past_shows_count = ?3, upcoming_shows_count = ?4, updated_at = ?5 WHERE id = ?6",
        table
    );
    conn.execute(
        &sql,
        params![
            past_json,
            upcoming_json,
            roster.past_shows_count,
            roster.upcoming_shows_count,
            now,
            id
        ],
    )
    .map_err(|e| AppError::Persistence(e.to_string()))?;
    Ok(())
}

/// Records a show and updates both parent rosters in one transaction.
///
/// The show is compared date-only against the clock's current day: a
/// start date before today lands in `past_shows`, today or later in
/// `upcoming_shows`. A missing venue or artist aborts before anything
/// is written.
pub fn show_create(
    pool: &DbPool,
    clock: &dyn Clock,
    req: ShowCreateReq,
) -> Result<ShowDetailDto, AppError> {
    let venue_id = req.venue_id.trim();
    if venue_id.is_empty() {
        return Err(AppError::Validation("venue_id is required".into()));
    }
    let artist_id = req.artist_id.trim();
    if artist_id.is_empty() {
        return Err(AppError::Validation("artist_id is required".into()));
    }
    let start = DateTime::parse_from_rfc3339(req.start_time.trim())
        .map_err(|_| AppError::Validation("start_time must be an RFC 3339 timestamp".into()))?
        .with_timezone(&Utc);

    let id = Uuid::new_v4().to_string();
    let start_time = start.to_rfc3339();
    let now = clock.now().to_rfc3339();
    let slot = ShowSlot::classify(start.date_naive(), clock.today());

    {
        let conn = get_connection(pool);
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        // Both parents must exist before the show row goes in.
        let mut venue_roster = load_roster(&tx, "venues", "venue", venue_id)?;
        let mut artist_roster = load_roster(&tx, "artists", "artist", artist_id)?;

        tx.execute(
            "INSERT INTO shows (id, start_time, venue_id, artist_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, start_time, venue_id, artist_id, &now],
        )
        .map_err(|e| AppError::Persistence(e.to_string()))?;

        venue_roster.record(&id, slot);
        artist_roster.record(&id, slot);
        save_roster(&tx, "venues", venue_id, &venue_roster, &now)?;
        save_roster(&tx, "artists", artist_id, &artist_roster, &now)?;

        tx.commit()
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        log::info!(
            "recorded {} show {} for venue {} and artist {}",
            slot.as_str(),
            id,
            venue_id,
            artist_id
        );
    } // release conn before calling show_get to avoid deadlock

    show_get(pool, &id)
}

pub fn show_get(pool: &DbPool, show_id: &str) -> Result<ShowDetailDto, AppError> {
    let conn = get_connection(pool);
    conn.query_row(
        "SELECT s.id, s.venue_id, v.name, s.artist_id, a.name, a.image_link, s.start_time, s.created_at \
         FROM shows s \
         JOIN venues v ON v.id = s.venue_id \
         JOIN artists a ON a.id = s.artist_id \
         WHERE s.id = ?1",
        [show_id],
        |r| {
            Ok(ShowDetailDto {
                id: r.get(0)?,
                venue_id: r.get(1)?,
                venue_name: r.get(2)?,
                artist_id: r.get(3)?,
                artist_name: r.get(4)?,
                artist_image_link: r.get(5)?,
                start_time: r.get(6)?,
                created_at: r.get(7)?,
            })
        },
    )
    .map_err(|_| AppError::NotFound(format!("show {}", show_id)))
}

/// All shows in chronological order. Stored start times are normalized
/// UTC RFC 3339 strings, so text order is time order.
pub fn show_list(pool: &DbPool) -> Result<Vec<ShowDetailDto>, AppError> {
    let conn = get_connection(pool);
    let mut stmt = conn
        .prepare(
            "SELECT s.id, s.venue_id, v.name, s.artist_id, a.name, a.image_link, s.start_time, s.created_at \
             FROM shows s \
             JOIN venues v ON v.id = s.venue_id \
             JOIN artists a ON a.id = s.artist_id \
             ORDER BY s.start_time",
        )
        .map_err(|e| AppError::Persistence(e.to_string()))?;
    let rows = stmt.query_map([], |r| {
        Ok(ShowDetailDto {
            id: r.get(0)?,
            venue_id: r.get(1)?,
            venue_name: r.get(2)?,
            artist_id: r.get(3)?,
            artist_name: r.get(4)?,
            artist_image_link: r.get(5)?,
            start_time: r.get(6)?,
            created_at: r.get(7)?,
        })
    })?;
    let mut shows = Vec::new();
    for s in rows {
        shows.push(s.map_err(|e| AppError::Persistence(e.to_string()))?);
    }
    Ok(shows)
}

/// Deletes the show row only. The venue and artist rosters keep the id
/// and their counters keep the old totals; detail views skip the
/// dangling entry when resolving.
pub fn show_delete(pool: &DbPool, id: &str) -> Result<(), AppError> {
    let conn = get_connection(pool);
    let rows = conn
        .execute("DELETE FROM shows WHERE id = ?1", [id])
        .map_err(|e| AppError::Persistence(e.to_string()))?;
    if rows == 0 {
        return Err(AppError::NotFound(format!("show {}", id)));
    }
    Ok(())
}
