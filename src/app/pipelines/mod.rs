pub mod recently_played;
pub mod top_tracks;
pub mod tweets;

pub use recently_played::RecentlyPlayedPipeline;
pub use top_tracks::TopTracksPipeline;
pub use tweets::TweetsPipeline;
