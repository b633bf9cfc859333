pub mod api;
pub mod cli;
pub mod config;
pub mod session_controller;

pub use session_controller::SessionController;
