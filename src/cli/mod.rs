//! CLI module
//!
//! Command-line interface for the Star Gallery backend.
//!
//! # Commands
//!
//! - `stars` - List, show, create, rename and delete stars
//! - `images` - List, show, upload and delete a star's images
//! - `browse` - Walk a star's gallery page by page

mod commands;
mod runner;

pub use commands::{Cli, Commands, ImageCommands, OutputFormat, StarCommands};
pub use runner::{human_size, render_image, render_star, Runner};
