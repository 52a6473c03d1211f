pub mod app;
pub mod images;

pub use app::{capabilities, health_check, not_found};
pub use images::fetch_images;
