//! Application use cases and transactions.

mod artist;
mod show;
mod venue;

pub use artist::{
    artist_create, artist_get, artist_list, artist_search, artist_update, ArtistCreateReq,
    ArtistDetailDto, ArtistListItemDto, ArtistSearchItemDto, ArtistSearchResultDto, ArtistShowDto,
    ArtistUpdateReq,
};
pub use show::{show_create, show_delete, show_get, show_list, ShowCreateReq, ShowDetailDto};
pub use venue::{
    venue_create, venue_delete, venue_get, venue_list, venue_search, venue_update, CityVenuesDto,
    VenueCreateReq, VenueDetailDto, VenueListItemDto, VenueSearchResultDto, VenueShowDto,
    VenueUpdateReq,
};
