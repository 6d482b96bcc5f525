//! Venue use cases: create, get, list, search, update, delete.

use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use chrono::Utc;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type alias to reduce complexity of the raw venue query tuple.
type VenueRawRow = (
    String, // id
    String, // name
    String, // genres (json)
    String, // city
    String, // state
    String, // address
    String, // phone
    String, // image_link
    String, // website_link
    String, // facebook_link
    i32,    // seeking_talent
    String, // seeking_description
    String, // past_shows (json)
    String, // upcoming_shows (json)
    i64,    // past_shows_count
    i64,    // upcoming_shows_count
    String, // created_at
    String, // updated_at
);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueCreateReq {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub genres: Option<Vec<String>>,
    pub image_link: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: Option<bool>,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VenueShowDto {
    pub show_id: String,
    pub artist_id: String,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

#[derive(Debug, Serialize)]
pub struct VenueDetailDto {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub website_link: String,
    pub facebook_link: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
    pub past_shows: Vec<VenueShowDto>,
    pub upcoming_shows: Vec<VenueShowDto>,
    pub past_shows_count: i64,
    pub upcoming_shows_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct VenueListItemDto {
    pub id: String,
    pub name: String,
    pub num_upcoming_shows: i64,
}

/// One (city, state) group of the venues listing.
#[derive(Debug, Serialize)]
pub struct CityVenuesDto {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueListItemDto>,
}

#[derive(Debug, Serialize)]
pub struct VenueSearchResultDto {
    pub count: i64,
    pub items: Vec<VenueListItemDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueUpdateReq {
    pub id: String,
    pub name: Option<String>,
    pub genres: Option<Vec<String>>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: Option<bool>,
    pub seeking_description: Option<String>,
}

fn decode_list(raw: &str) -> Result<Vec<String>, AppError> {
    serde_json::from_str(raw).map_err(|e| AppError::Persistence(e.to_string()))
}

pub fn venue_create(pool: &DbPool, req: VenueCreateReq) -> Result<VenueDetailDto, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    if req.city.trim().is_empty() {
        return Err(AppError::Validation("city is required".into()));
    }
    if req.state.trim().is_empty() {
        return Err(AppError::Validation("state is required".into()));
    }
    if req.address.trim().is_empty() {
        return Err(AppError::Validation("address is required".into()));
    }
    if req.phone.trim().is_empty() {
        return Err(AppError::Validation("phone is required".into()));
    }

    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();
    let genres: Vec<String> = req
        .genres
        .unwrap_or_default()
        .iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect();
    let genres_json =
        serde_json::to_string(&genres).map_err(|e| AppError::Persistence(e.to_string()))?;
    let image_link = req
        .image_link
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("No Image Link")
        .to_string();
    let website_link = req
        .website_link
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("No Website")
        .to_string();
    let facebook_link = req
        .facebook_link
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("No Facebook Link")
        .to_string();
    let seeking_talent = req.seeking_talent.unwrap_or(false);
    let seeking_description = req
        .seeking_description
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| {
            if seeking_talent {
                "Currently seeking talent".to_string()
            } else {
                "Not currently seeking talent".to_string()
            }
        });

    {
        let conn = get_connection(pool);
        conn.execute(
            "INSERT INTO venues (id, name, genres, city, state, address, phone, image_link, website_link, facebook_link, seeking_talent, seeking_description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
            params![
                id,
                name,
                genres_json,
                req.city.trim(),
                req.state.trim(),
                req.address.trim(),
                req.phone.trim(),
                image_link,
                website_link,
                facebook_link,
                seeking_talent as i32,
                seeking_description,
                &now
            ],
        )
        .map_err(|e| AppError::Persistence(e.to_string()))?;
    } // release conn before calling venue_get to avoid deadlock

    venue_get(pool, &id)
}

pub fn venue_get(pool: &DbPool, venue_id: &str) -> Result<VenueDetailDto, AppError> {
    let conn = get_connection(pool);

    let venue: VenueRawRow = conn
        .query_row(
            "SELECT id, name, genres, city, state, address, phone, image_link, website_link, facebook_link, seeking_talent, seeking_description, past_shows, upcoming_shows, past_shows_count, upcoming_shows_count, created_at, updated_at FROM venues WHERE id = ?1",
            [venue_id],
            |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                    r.get(6)?,
                    r.get(7)?,
                    r.get(8)?,
                    r.get(9)?,
                    r.get(10)?,
                    r.get(11)?,
                    r.get(12)?,
                    r.get(13)?,
                    r.get(14)?,
                    r.get(15)?,
                    r.get(16)?,
                    r.get(17)?,
                ))
            },
        )
        .map_err(|_| AppError::NotFound(format!("venue {}", venue_id)))?;

    let genres = decode_list(&venue.2)?;
    let past_ids = decode_list(&venue.12)?;
    let upcoming_ids = decode_list(&venue.13)?;

    let mut stmt = conn
        .prepare(
            "SELECT s.id, s.artist_id, a.name, a.image_link, s.start_time \
             FROM shows s JOIN artists a ON a.id = s.artist_id \
             WHERE s.id = ?1",
        )
        .map_err(|e| AppError::Persistence(e.to_string()))?;

    let mut past_shows = Vec::new();
    for show_id in &past_ids {
        match stmt.query_row([show_id], |r| {
            Ok(VenueShowDto {
                show_id: r.get(0)?,
                artist_id: r.get(1)?,
                artist_name: r.get(2)?,
                artist_image_link: r.get(3)?,
                start_time: r.get(4)?,
            })
        }) {
            Ok(dto) => past_shows.push(dto),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                // Roster entries survive show deletion; resolution skips them.
                log::warn!("venue {} past roster references missing show {}", venue_id, show_id);
            }
            Err(e) => return Err(AppError::Persistence(e.to_string())),
        }
    }

    let mut upcoming_shows = Vec::new();
    for show_id in &upcoming_ids {
        match stmt.query_row([show_id], |r| {
            Ok(VenueShowDto {
                show_id: r.get(0)?,
                artist_id: r.get(1)?,
                artist_name: r.get(2)?,
                artist_image_link: r.get(3)?,
                start_time: r.get(4)?,
            })
        }) {
            Ok(dto) => upcoming_shows.push(dto),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                log::warn!("venue {} upcoming roster references missing show {}", venue_id, show_id);
            }
            Err(e) => return Err(AppError::Persistence(e.to_string())),
        }
    }

    Ok(VenueDetailDto {
        id: venue.0,
        name: venue.1,
        genres,
        city: venue.3,
        state: venue.4,
        address: venue.5,
        phone: venue.6,
        image_link: venue.7,
        website_link: venue.8,
        facebook_link: venue.9,
        seeking_talent: venue.10 != 0,
        seeking_description: venue.11,
        past_shows,
        upcoming_shows,
        past_shows_count: venue.14,
        upcoming_shows_count: venue.15,
        created_at: venue.16,
        updated_at: venue.17,
    })
}

/// Venues grouped by (city, state), one group per consecutive run of the
/// case-insensitive ordering.
pub fn venue_list(pool: &DbPool) -> Result<Vec<CityVenuesDto>, AppError> {
    let conn = get_connection(pool);
    let mut stmt = conn
        .prepare(
            "SELECT id, name, city, state, upcoming_shows_count FROM venues \
             ORDER BY city COLLATE NOCASE, state COLLATE NOCASE, name COLLATE NOCASE",
        )
        .map_err(|e| AppError::Persistence(e.to_string()))?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, i64>(4)?,
        ))
    })?;

    let mut groups: Vec<CityVenuesDto> = Vec::new();
    for row in rows {
        let (id, name, city, state, num_upcoming_shows) =
            row.map_err(|e| AppError::Persistence(e.to_string()))?;
        let item = VenueListItemDto {
            id,
            name,
            num_upcoming_shows,
        };
        match groups.last_mut() {
            Some(group)
                if group.city.eq_ignore_ascii_case(&city)
                    && group.state.eq_ignore_ascii_case(&state) =>
            {
                group.venues.push(item);
            }
            _ => groups.push(CityVenuesDto {
                city,
                state,
                venues: vec![item],
            }),
        }
    }
    Ok(groups)
}

/// Case-insensitive substring match on venue name.
pub fn venue_search(pool: &DbPool, term: &str) -> Result<VenueSearchResultDto, AppError> {
    let conn = get_connection(pool);
    let mut stmt = conn
        .prepare(
            "SELECT id, name, upcoming_shows_count FROM venues \
             WHERE instr(lower(name), lower(?1)) > 0 \
             ORDER BY name COLLATE NOCASE",
        )
        .map_err(|e| AppError::Persistence(e.to_string()))?;
    let rows = stmt.query_map([term], |r| {
        Ok(VenueListItemDto {
            id: r.get(0)?,
            name: r.get(1)?,
            num_upcoming_shows: r.get(2)?,
        })
    })?;
    let mut items = Vec::new();
    for r in rows {
        items.push(r.map_err(|e| AppError::Persistence(e.to_string()))?);
    }
    Ok(VenueSearchResultDto {
        count: items.len() as i64,
        items,
    })
}

/// Overlay update: absent fields keep current values, blanked optional
/// links fall back to their placeholder defaults. Rosters and counters
/// are never touched here.
pub fn venue_update(pool: &DbPool, req: VenueUpdateReq) -> Result<VenueDetailDto, AppError> {
    let now = Utc::now().to_rfc3339();

    {
        let conn = get_connection(pool);

        let (
            name,
            genres_json,
            city,
            state,
            address,
            phone,
            image_link,
            website_link,
            facebook_link,
            seeking_talent,
            seeking_description,
        ): (
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            i32,
            String,
        ) = conn
            .query_row(
                "SELECT name, genres, city, state, address, phone, image_link, website_link, facebook_link, seeking_talent, seeking_description FROM venues WHERE id = ?1",
                [&req.id],
                |r| {
                    Ok((
                        r.get(0)?,
                        r.get(1)?,
                        r.get(2)?,
                        r.get(3)?,
                        r.get(4)?,
                        r.get(5)?,
                        r.get(6)?,
                        r.get(7)?,
                        r.get(8)?,
                        r.get(9)?,
                        r.get(10)?,
                    ))
                },
            )
            .map_err(|_| AppError::NotFound(format!("venue {}", req.id)))?;

        let name = req
            .name
            .as_deref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(name);
        let city = req
            .city
            .as_deref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(city);
        let state = req
            .state
            .as_deref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(state);
        let address = req
            .address
            .as_deref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(address);
        let phone = req
            .phone
            .as_deref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(phone);
        let genres_json = match req.genres {
            Some(ref list) => {
                let cleaned: Vec<String> = list
                    .iter()
                    .map(|g| g.trim().to_string())
                    .filter(|g| !g.is_empty())
                    .collect();
                serde_json::to_string(&cleaned)
                    .map_err(|e| AppError::Persistence(e.to_string()))?
            }
            None => genres_json,
        };
        let seeking_talent = req.seeking_talent.unwrap_or(seeking_talent != 0);
        let image_link = match req.image_link.as_deref() {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            Some(_) => "No Image Link".to_string(),
            None => image_link,
        };
        let website_link = match req.website_link.as_deref() {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            Some(_) => "No Website".to_string(),
            None => website_link,
        };
        let facebook_link = match req.facebook_link.as_deref() {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            Some(_) => "No Facebook Link".to_string(),
            None => facebook_link,
        };
        let seeking_description = match req.seeking_description.as_deref() {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            Some(_) if seeking_talent => "Currently seeking talent".to_string(),
            Some(_) => "Not currently seeking talent".to_string(),
            None => seeking_description,
        };

        if name.is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }

        conn.execute(
            "UPDATE venues SET name=?1, genres=?2, city=?3, state=?4, address=?5, phone=?6, image_link=?7, website_link=?8, facebook_link=?9, seeking_talent=?10, seeking_description=?11, updated_at=?12 WHERE id=?13",
            params![
                name,
                genres_json,
                city,
                state,
                address,
                phone,
                image_link,
                website_link,
                facebook_link,
                seeking_talent as i32,
                seeking_description,
                &now,
                &req.id
            ],
        )
        .map_err(|e| AppError::Persistence(e.to_string()))?;
    } // release conn before calling venue_get to avoid deadlock

    venue_get(pool, &req.id)
}

/// Deletes the venue row. Shows still referencing the venue block the
/// delete through the foreign key and surface as a persistence error.
pub fn venue_delete(pool: &DbPool, id: &str) -> Result<(), AppError> {
    let conn = get_connection(pool);
    let rows = conn
        .execute("DELETE FROM venues WHERE id = ?1", [id])
        .map_err(|e| AppError::Persistence(e.to_string()))?;
    if rows == 0 {
        return Err(AppError::NotFound(format!("venue {}", id)));
    }
    Ok(())
}
