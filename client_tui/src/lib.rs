//! Terminal front end for Deception Pong: screens, input, rendering and match pacing.

pub mod app;
pub mod fsm;
pub mod helpers;
pub mod input;
pub mod login;
pub mod render;
pub mod session;
pub mod settings;

pub use app::App;
