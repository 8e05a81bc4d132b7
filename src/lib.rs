pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod copy_button;
pub mod error;
pub mod form;
pub mod header;
pub mod history;
pub mod output;
pub mod persistence;
pub mod state;
pub mod types;
pub mod utils;
pub mod validation;

pub use app::App;
