use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "corkboard", version, about = "Terminal sticky-note canvas")]
pub struct Cli {
    /// Board owner (defaults to $USER)
    #[arg(long, global = true)]
    pub user: Option<String>,
    /// Override the data directory (useful for scripting and tests)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all notes on the board
    List,
    /// Add a new note to the canvas
    Add {
        /// Note color (yellow, pink, blue, green, purple, orange)
        color: String,
        /// Canvas x coordinate in pixels
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        x: i32,
        /// Canvas y coordinate in pixels
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        y: i32,
    },
    /// Edit a note's title, text, or icon
    Edit {
        /// Note id to edit
        note_id: String,
        /// New title (at most 30 characters)
        #[arg(long)]
        title: Option<String>,
        /// New body text
        #[arg(long)]
        text: Option<String>,
        /// New icon name (cupcake, sparkles, star, ...)
        #[arg(long)]
        icon: Option<String>,
    },
    /// Move a note to a new canvas position
    Move {
        /// Note id to move
        note_id: String,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
    },
    /// Delete a single note
    Delete {
        /// Note id to delete
        note_id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Delete every note on the board
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show board settings, or change them
    Board {
        /// New board title (at most 50 characters)
        #[arg(long)]
        title: Option<String>,
        /// New board description (at most 100 characters)
        #[arg(long)]
        description: Option<String>,
        /// New canvas color (white, slate, blue, purple, pink, green)
        #[arg(long)]
        canvas_color: Option<String>,
    },
    /// Launch the interactive canvas
    Tui,
}
