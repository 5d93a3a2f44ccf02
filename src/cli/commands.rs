//! CLI commands and argument parsing

use crate::api::DEFAULT_LIMIT;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Star Gallery command-line client
#[derive(Parser, Debug)]
#[command(name = "star-gallery")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides config file and environment)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage stars
    #[command(subcommand)]
    Stars(StarCommands),

    /// Manage a star's images
    #[command(subcommand)]
    Images(ImageCommands),

    /// Walk a star's gallery page by page, the way infinite scroll does
    Browse {
        /// Star id
        star_id: String,

        /// Stop after this many pages (default: until exhausted)
        #[arg(long)]
        pages: Option<u32>,

        /// Images per page (default: from config)
        #[arg(long)]
        page_size: Option<u32>,
    },
}

/// Star subcommands
#[derive(Subcommand, Debug)]
pub enum StarCommands {
    /// List stars
    List {
        /// Only stars whose name matches
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one star
    Get { id: String },

    /// Create a star
    Create { name: String },

    /// Rename a star
    Update { id: String, name: String },

    /// Delete a star and all of its images
    Delete { id: String },
}

/// Image subcommands
#[derive(Subcommand, Debug)]
pub enum ImageCommands {
    /// List one page of a star's images
    List {
        star_id: String,

        /// Page number (1-indexed)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Images per page
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },

    /// Show one image
    Get { id: String },

    /// Upload image files to a star
    Upload {
        star_id: String,

        /// Image files (jpeg, png, gif, webp; 10MB max each)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Delete an image
    Delete { id: String },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_browse() {
        let cli = Cli::parse_from([
            "star-gallery",
            "--api-url",
            "http://127.0.0.1:9000",
            "browse",
            "s1",
            "--pages",
            "3",
        ]);
        assert_eq!(cli.api_url.as_deref(), Some("http://127.0.0.1:9000"));
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Browse {
                star_id,
                pages,
                page_size,
            } => {
                assert_eq!(star_id, "s1");
                assert_eq!(pages, Some(3));
                assert_eq!(page_size, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_image_list_defaults() {
        let cli = Cli::parse_from(["star-gallery", "-f", "pretty", "images", "list", "s1"]);
        assert_eq!(cli.format, OutputFormat::Pretty);
        match cli.command {
            Commands::Images(ImageCommands::List {
                star_id,
                page,
                limit,
            }) => {
                assert_eq!(star_id, "s1");
                assert_eq!(page, 1);
                assert_eq!(limit, 20);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_upload_requires_files() {
        assert!(Cli::try_parse_from(["star-gallery", "images", "upload", "s1"]).is_err());
    }
}
