use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load image at {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image has zero extent ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("invalid lens parameter: {0}")]
    InvalidParams(String),
}
