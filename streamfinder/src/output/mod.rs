pub mod m3u;
pub mod store;

pub use m3u::write_playlists;
