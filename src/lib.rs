//! Paint-the-customer mini game: a raster brush canvas and a timed round
//! scorer, plus a small software-rendered window to play it in.

pub mod attributes;
pub mod canvas;
pub mod config;
pub mod draw;
pub mod error;
pub mod logging;
pub mod palette;
pub mod round;
pub mod session;
pub mod types;
