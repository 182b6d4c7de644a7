pub mod spotify;
pub mod twitter;

pub use spotify::SpotifyClient;
pub use twitter::TwitterClient;
