//! Artist use cases: create, get, list, search, update.

use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use chrono::Utc;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type alias to reduce complexity of the raw artist query tuple.
type ArtistRawRow = (
    String, // id
    String, // name
    String, // genres (json)
    String, // city
    String, // state
    String, // phone
    String, // image_link
    String, // website_link
    String, // facebook_link
    i32,    // seeking_venue
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
pub struct ArtistCreateReq {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Option<Vec<String>>,
    pub image_link: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: Option<bool>,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ArtistShowDto {
    pub show_id: String,
    pub venue_id: String,
    pub venue_name: String,
    pub venue_image_link: String,
    pub start_time: String,
}

#[derive(Debug, Serialize)]
pub struct ArtistDetailDto {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub website_link: String,
    pub facebook_link: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
    pub past_shows: Vec<ArtistShowDto>,
    pub upcoming_shows: Vec<ArtistShowDto>,
    pub past_shows_count: i64,
    pub upcoming_shows_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct ArtistListItemDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ArtistSearchItemDto {
    pub id: String,
    pub name: String,
    pub num_upcoming_shows: i64,
}

#[derive(Debug, Serialize)]
pub struct ArtistSearchResultDto {
    pub count: i64,
    pub items: Vec<ArtistSearchItemDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistUpdateReq {
    pub id: String,
    pub name: Option<String>,
    pub genres: Option<Vec<String>>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: Option<bool>,
    pub seeking_description: Option<String>,
}

fn decode_list(raw: &str) -> Result<Vec<String>, AppError> {
    serde_json::from_str(raw).map_err(|e| AppError::Persistence(e.to_string()))
}

pub fn artist_create(pool: &DbPool, req: ArtistCreateReq) -> Result<ArtistDetailDto, AppError> {
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
    let seeking_venue = req.seeking_venue.unwrap_or(false);
    let seeking_description = req
        .seeking_description
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| {
            if seeking_venue {
                "Currently seeking performance venues".to_string()
            } else {
                "Not currently seeking performance venues".to_string()
            }
        });

    {
        let conn = get_connection(pool);
        conn.execute(
            "INSERT INTO artists (id, name, genres, city, state, phone, image_link, website_link, facebook_link, seeking_venue, seeking_description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
            params![
                id,
                name,
                genres_json,
                req.city.trim(),
                req.state.trim(),
                req.phone.trim(),
                image_link,
                website_link,
                facebook_link,
                seeking_venue as i32,
                seeking_description,
                &now
            ],
        )
        .map_err(|e| AppError::Persistence(e.to_string()))?;
    } // release conn before calling artist_get to avoid deadlock

    artist_get(pool, &id)
}

pub fn artist_get(pool: &DbPool, artist_id: &str) -> Result<ArtistDetailDto, AppError> {
    let conn = get_connection(pool);

    let artist: ArtistRawRow = conn
        .query_row(
            "SELECT id, name, genres, city, state, phone, image_link, website_link, facebook_link, seeking_venue, seeking_description, past_shows, upcoming_shows, past_shows_count, upcoming_shows_count, created_at, updated_at FROM artists WHERE id = ?1",
            [artist_id],
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
                ))
            },
        )
        .map_err(|_| AppError::NotFound(format!("artist {}", artist_id)))?;

    let genres = decode_list(&artist.2)?;
    let past_ids = decode_list(&artist.11)?;
    let upcoming_ids = decode_list(&artist.12)?;

    let mut stmt = conn.prepare(
        "SELECT s.id, s.venue_id, v.name, v.image_link, s.start_time \
         FROM shows s JOIN venues v ON v.id = s.venue_id \
         WHERE s.id = ?1",
    )?;

    let mut past_shows = Vec::new();
    for show_id in &past_ids {
        match stmt.query_row([show_id], |r| {
            Ok(ArtistShowDto {
                show_id: r.get(0)?,
                venue_id: r.get(1)?,
                venue_name: r.get(2)?,
                venue_image_link: r.get(3)?,
                start_time: r.get(4)?,
            })
        }) {
            Ok(dto) => past_shows.push(dto),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                log::warn!("artist {} past roster references missing show {}", artist_id, show_id);
            }
            Err(e) => return Err(AppError::Persistence(e.to_string())),
        }
    }

    let mut upcoming_shows = Vec::new();
    for show_id in &upcoming_ids {
        match stmt.query_row([show_id], |r| {
            Ok(ArtistShowDto {
                show_id: r.get(0)?,
                venue_id: r.get(1)?,
                venue_name: r.get(2)?,
                venue_image_link: r.get(3)?,
                start_time: r.get(4)?,
            })
        }) {
            Ok(dto) => upcoming_shows.push(dto),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                log::warn!("artist {} upcoming roster references missing show {}", artist_id, show_id);
            }
            Err(e) => return Err(AppError::Persistence(e.to_string())),
        }
    }

    Ok(ArtistDetailDto {
        id: artist.0,
        name: artist.1,
        genres,
        city: artist.3,
        state: artist.4,
        phone: artist.5,
        image_link: artist.6,
        website_link: artist.7,
        facebook_link: artist.8,
        seeking_venue: artist.9 != 0,
        seeking_description: artist.10,
        past_shows,
        upcoming_shows,
        past_shows_count: artist.13,
        upcoming_shows_count: artist.14,
        created_at: artist.15,
        updated_at: artist.16,
    })
}

pub fn artist_list(pool: &DbPool) -> Result<Vec<ArtistListItemDto>, AppError> {
    let conn = get_connection(pool);
    let mut stmt =
        conn.prepare("SELECT id, name FROM artists ORDER BY name COLLATE NOCASE")?;
    let rows = stmt.query_map([], |r| {
        Ok(ArtistListItemDto {
            id: r.get(0)?,
            name: r.get(1)?,
        })
    })?;
    let mut artists = Vec::new();
    for a in rows {
        artists.push(a.map_err(|e| AppError::Persistence(e.to_string()))?);
    }
    Ok(artists)
}

/// Case-insensitive substring match on artist name.
pub fn artist_search(pool: &DbPool, term: &str) -> Result<ArtistSearchResultDto, AppError> {
    let conn = get_connection(pool);
    let mut stmt = conn.prepare(
        "SELECT id, name, upcoming_shows_count FROM artists \
         WHERE instr(lower(name), lower(?1)) > 0 \
         ORDER BY name COLLATE NOCASE",
    )?;
    let rows = stmt.query_map([term], |r| {
        Ok(ArtistSearchItemDto {
            id: r.get(0)?,
            name: r.get(1)?,
            num_upcoming_shows: r.get(2)?,
        })
    })?;
    let mut items = Vec::new();
    for r in rows {
        items.push(r.map_err(|e| AppError::Persistence(e.to_string()))?);
    }
    Ok(ArtistSearchResultDto {
        count: items.len() as i64,
        items,
    })
}

/// Overlay update, same rules as venues: absent fields keep current
/// values, blanked links fall back to placeholders, rosters untouched.
pub fn artist_update(pool: &DbPool, req: ArtistUpdateReq) -> Result<ArtistDetailDto, AppError> {
    let now = Utc::now().to_rfc3339();

    {
        let conn = get_connection(pool);

        let (
            name,
            genres_json,
            city,
            state,
            phone,
            image_link,
            website_link,
            facebook_link,
            seeking_venue,
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
            i32,
            String,
        ) = conn
            .query_row(
                "SELECT name, genres, city, state, phone, image_link, website_link, facebook_link, seeking_venue, seeking_description FROM artists WHERE id = ?1",
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
                    ))
                },
            )
            .map_err(|_| AppError::NotFound(format!("artist {}", req.id)))?;

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
        let seeking_venue = req.seeking_venue.unwrap_or(seeking_venue != 0);
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
            Some(_) if seeking_venue => "Currently seeking performance venues".to_string(),
            Some(_) => "Not currently seeking performance venues".to_string(),
            None => seeking_description,
        };

        if name.is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }

        conn.execute(
            "UPDATE artists SET name=?1, genres=?2, city=?3, state=?4, phone=?5, image_link=?6, website_link=?7, facebook_link=?8, seeking_venue=?9, seeking_description=?10, updated_at=?11 WHERE id=?12",
            params![
                name,
                genres_json,
                city,
                state,
                phone,
                image_link,
                website_link,
                facebook_link,
                seeking_venue as i32,
                seeking_description,
                &now,
                &req.id
            ],
        )
        .map_err(|e| AppError::Persistence(e.to_string()))?;
    } // release conn before calling artist_get to avoid deadlock

    artist_get(pool, &req.id)
}
