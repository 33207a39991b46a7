use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "songbook", version, about = "Song catalog with full-text search and lyric pagination")]
pub struct Cli {
  /// SQLite database file, overriding `[storage] db_path`
  #[arg(long, global = true)]
  pub db: Option<PathBuf>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Report that the service is available
  Health,
  /// List songs matching every given filter
  List(ListArgs),
  /// Show one song
  Get {
    id: String,
  },
  /// Show one page of a song's lyrics, counted in verses
  Lyrics(LyricsArgs),
  /// Add a new song
  Add(AddArgs),
  /// Replace the title and/or group of a song
  Update(UpdateArgs),
  /// Delete a song
  Delete {
    id: String,
  },
}

#[derive(Debug, Args)]
pub struct ListArgs {
  /// Words that must appear in the title
  #[arg(long, default_value = "")]
  pub song: String,
  /// Words that must appear in the group name
  #[arg(long, default_value = "")]
  pub group: String,
  /// Words that must appear in the release date
  #[arg(long, default_value = "")]
  pub release_date: String,
  /// Words that must appear in the lyrics
  #[arg(long, default_value = "")]
  pub text: String,
  /// Words that must appear in the link
  #[arg(long, default_value = "")]
  pub link: String,
  #[arg(long)]
  pub page: Option<String>,
  #[arg(long)]
  pub page_size: Option<String>,
  /// id, song, group, release, text or link; prefix with '-' for descending
  #[arg(long, allow_hyphen_values = true)]
  pub sort: Option<String>,
}

#[derive(Debug, Args)]
pub struct LyricsArgs {
  pub id: String,
  #[arg(long)]
  pub page: Option<String>,
  /// Verses per page
  #[arg(long)]
  pub page_size: Option<String>,
}

#[derive(Debug, Args)]
pub struct AddArgs {
  #[arg(long, default_value = "")]
  pub song: String,
  #[arg(long, default_value = "")]
  pub group: String,
  #[arg(long, default_value = "")]
  pub release_date: String,
  /// Lyrics; separate verses with a blank line
  #[arg(long, default_value = "", conflicts_with = "text_file")]
  pub text: String,
  /// Read the lyrics from a file
  #[arg(long)]
  pub text_file: Option<PathBuf>,
  #[arg(long, default_value = "")]
  pub link: String,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
  pub id: String,
  #[arg(long)]
  pub song: Option<String>,
  #[arg(long)]
  pub group: Option<String>,
}
