mod error;
mod operations;
mod requests;
mod types;

pub use error::MovieError;
pub use operations::{validate_movie, validate_title, MAX_TITLE_BYTES};
pub use requests::{MovieKeyRequest, UpdateMovieRequest};
pub use types::{InfoValue, Movie};
