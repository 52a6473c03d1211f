pub mod images;

pub use images::{FetchImagesResponse, FetchSummary, PartImageResult, PartNumbers};
