//! Mythic Machines Application
//!
//! A line-oriented shell standing in for the presentation layer: it turns
//! typed commands into gestures and prints every new snapshot.

mod app;
mod commands;
mod view;

pub use app::{App, AppConfig, AppError, GENERATION_DELAY_ENV};
pub use commands::{Command, CommandError, CommandHelp, CommandRegistry};
pub use view::{render_snapshot, render_themes, render_tray};
