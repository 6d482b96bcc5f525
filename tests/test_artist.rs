//! Artist CRUD + listing/search integration tests

use gigbook::app::{
    artist_create, artist_get, artist_list, artist_search, artist_update, ArtistCreateReq,
    ArtistUpdateReq,
};
use gigbook::infra::db::init_test_db;

// ──────────────────────── Helper ────────────────────────

fn make_artist_req(name: &str) -> ArtistCreateReq {
    ArtistCreateReq {
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        phone: "326-123-5000".to_string(),
        genres: Some(vec!["Rock n Roll".to_string()]),
        image_link: None,
        website_link: None,
        facebook_link: None,
        seeking_venue: None,
        seeking_description: None,
    }
}

fn empty_update_req(id: &str) -> ArtistUpdateReq {
    ArtistUpdateReq {
        id: id.to_string(),
        name: None,
        genres: None,
        city: None,
        state: None,
        phone: None,
        image_link: None,
        website_link: None,
        facebook_link: None,
        seeking_venue: None,
        seeking_description: None,
    }
}

// ══════════════════════════════════════════════════════════
//  artist_create
// ══════════════════════════════════════════════════════════

#[test]
fn create_artist_returns_full_detail() {
    let pool = init_test_db();
    let artist = artist_create(&pool, make_artist_req("Guns N Petals")).unwrap();

    assert_eq!(artist.name, "Guns N Petals");
    assert_eq!(artist.city, "San Francisco");
    assert_eq!(artist.state, "CA");
    assert_eq!(artist.phone, "326-123-5000");
    assert_eq!(artist.genres, vec!["Rock n Roll"]);
    assert!(!artist.seeking_venue);
    assert_eq!(artist.seeking_description, "Not currently seeking performance venues");
    assert!(artist.past_shows.is_empty());
    assert!(artist.upcoming_shows.is_empty());
    assert_eq!(artist.past_shows_count, 0);
    assert_eq!(artist.upcoming_shows_count, 0);
}

#[test]
fn create_artist_missing_links_get_placeholders() {
    let pool = init_test_db();
    let artist = artist_create(&pool, make_artist_req("No Links")).unwrap();

    assert_eq!(artist.image_link, "No Image Link");
    assert_eq!(artist.website_link, "No Website");
    assert_eq!(artist.facebook_link, "No Facebook Link");
}

#[test]
fn create_artist_seeking_description_defaults() {
    let pool = init_test_db();

    let mut req = make_artist_req("Seeking");
    req.seeking_venue = Some(true);
    let artist = artist_create(&pool, req).unwrap();
    assert!(artist.seeking_venue);
    assert_eq!(artist.seeking_description, "Currently seeking performance venues");

    let mut req = make_artist_req("CustomDesc");
    req.seeking_venue = Some(true);
    req.seeking_description = Some("Looking for intimate rooms".to_string());
    let artist = artist_create(&pool, req).unwrap();
    assert_eq!(artist.seeking_description, "Looking for intimate rooms");
}

#[test]
fn create_artist_empty_name_fails() {
    let pool = init_test_db();
    let mut req = make_artist_req("");
    req.name = "  ".to_string();
    let err = artist_create(&pool, req);
    assert_eq!(err.unwrap_err().code(), "VALIDATION_ERROR");
}

#[test]
fn create_artist_missing_required_field_fails() {
    let pool = init_test_db();

    let mut req = make_artist_req("NoCity");
    req.city = "".to_string();
    assert_eq!(artist_create(&pool, req).unwrap_err().code(), "VALIDATION_ERROR");

    let mut req = make_artist_req("NoState");
    req.state = " ".to_string();
    assert_eq!(artist_create(&pool, req).unwrap_err().code(), "VALIDATION_ERROR");

    let mut req = make_artist_req("NoPhone");
    req.phone = "".to_string();
    assert_eq!(artist_create(&pool, req).unwrap_err().code(), "VALIDATION_ERROR");
}

// ══════════════════════════════════════════════════════════
//  artist_get / artist_list
// ══════════════════════════════════════════════════════════

#[test]
fn get_artist_not_found() {
    let pool = init_test_db();
    let err = artist_get(&pool, "nonexistent");
    assert_eq!(err.unwrap_err().code(), "NOT_FOUND");
}

#[test]
fn list_artists_flat_and_name_ordered() {
    let pool = init_test_db();
    artist_create(&pool, make_artist_req("The Wild Sax Band")).unwrap();
    artist_create(&pool, make_artist_req("Guns N Petals")).unwrap();
    artist_create(&pool, make_artist_req("Matt Quevedo")).unwrap();

    let artists = artist_list(&pool).unwrap();
    assert_eq!(artists.len(), 3);
    assert_eq!(artists[0].name, "Guns N Petals");
    assert_eq!(artists[1].name, "Matt Quevedo");
    assert_eq!(artists[2].name, "The Wild Sax Band");
}

// ══════════════════════════════════════════════════════════
//  artist_search
// ══════════════════════════════════════════════════════════

#[test]
fn search_matches_case_insensitive_substring() {
    let pool = init_test_db();
    artist_create(&pool, make_artist_req("Guns N Petals")).unwrap();
    artist_create(&pool, make_artist_req("The Wild Sax Band")).unwrap();

    let result = artist_search(&pool, "BAND").unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.items[0].name, "The Wild Sax Band");
    assert_eq!(result.items[0].num_upcoming_shows, 0);

    let result = artist_search(&pool, "a").unwrap();
    assert_eq!(result.count, 2);
}

#[test]
fn search_no_match_returns_empty() {
    let pool = init_test_db();
    artist_create(&pool, make_artist_req("Guns N Petals")).unwrap();

    let result = artist_search(&pool, "orchestra").unwrap();
    assert_eq!(result.count, 0);
    assert!(result.items.is_empty());
}

// ══════════════════════════════════════════════════════════
//  artist_update
// ══════════════════════════════════════════════════════════

#[test]
fn update_artist_partial_fields() {
    let pool = init_test_db();
    let artist = artist_create(&pool, make_artist_req("Original")).unwrap();

    let mut req = empty_update_req(&artist.id);
    req.name = Some("Renamed".to_string());
    req.city = Some("Oakland".to_string());
    let updated = artist_update(&pool, req).unwrap();

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.city, "Oakland");
    assert_eq!(updated.state, "CA"); // unchanged
    assert_eq!(updated.phone, "326-123-5000"); // unchanged
}

#[test]
fn update_artist_seeking_toggle_redefaults_blank_description() {
    let pool = init_test_db();
    let artist = artist_create(&pool, make_artist_req("Toggle")).unwrap();

    let mut req = empty_update_req(&artist.id);
    req.seeking_venue = Some(true);
    req.seeking_description = Some("  ".to_string());
    let updated = artist_update(&pool, req).unwrap();

    assert!(updated.seeking_venue);
    assert_eq!(updated.seeking_description, "Currently seeking performance venues");
}

#[test]
fn update_artist_blank_link_resets_to_placeholder() {
    let pool = init_test_db();
    let mut req = make_artist_req("Linked");
    req.facebook_link = Some("https://www.facebook.com/GunsNPetals".to_string());
    let artist = artist_create(&pool, req).unwrap();

    let mut update = empty_update_req(&artist.id);
    update.facebook_link = Some("".to_string());
    let updated = artist_update(&pool, update).unwrap();
    assert_eq!(updated.facebook_link, "No Facebook Link");
}

#[test]
fn update_artist_not_found() {
    let pool = init_test_db();
    let mut req = empty_update_req("ghost");
    req.name = Some("X".to_string());
    let err = artist_update(&pool, req);
    assert_eq!(err.unwrap_err().code(), "NOT_FOUND");
}
