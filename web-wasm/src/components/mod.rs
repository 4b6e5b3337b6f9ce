//! UIコンポーネント

pub mod header;
pub mod history_grid;
pub mod progress_bar;
pub mod results_view;
pub mod upload_area;
