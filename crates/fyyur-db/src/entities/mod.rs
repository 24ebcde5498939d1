pub mod artist;
pub mod artist_genre;
pub mod show;
pub mod venue;
pub mod venue_genre;
