pub mod colormap;
pub mod config;
pub mod data;
pub mod error;
pub mod legend;
pub mod processing;
pub mod render;
pub mod scene;
pub mod server;
pub mod tiles;
pub mod types;
