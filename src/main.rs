mod cli;
mod commands;
mod interaction;
mod model;
mod store;
mod ui;

use anyhow::{anyhow, Result};
use clap::Parser;
use store::Store;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let store = match args.data_dir {
        Some(dir) => Store::new(dir),
        None => Store::open_default()?,
    };
    let owner = match args.user {
        Some(user) => user,
        None => std::env::var("USER").map_err(|_| anyhow!("no --user given and $USER is unset"))?,
    };
    let command = args.command.unwrap_or(cli::Command::Tui);
    match command {
        cli::Command::List => commands::list(&store, &owner),
        cli::Command::Add { color, x, y } => commands::add(&store, &owner, color, x, y),
        cli::Command::Edit {
            note_id,
            title,
            text,
            icon,
        } => commands::edit(&store, &owner, note_id, title, text, icon),
        cli::Command::Move { note_id, x, y } => commands::move_note(&store, &owner, note_id, x, y),
        cli::Command::Delete { note_id, yes } => commands::delete(&store, &owner, note_id, yes),
        cli::Command::Clear { yes } => commands::clear(&store, &owner, yes),
        cli::Command::Board {
            title,
            description,
            canvas_color,
        } => commands::board(&store, &owner, title, description, canvas_color),
        cli::Command::Tui => commands::tui(store, owner),
    }
}
