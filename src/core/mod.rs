pub mod etl;
pub mod transform;

pub use crate::domain::model::{PlayedRow, Post, PostRow, TrackRow};
pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;
