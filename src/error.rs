use thiserror::Error;

/// Library error type for gallery operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The slide image could not be decoded far enough to read its size.
    #[error(transparent)]
    Image(#[from] image::ImageError),
}
