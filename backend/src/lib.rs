mod cli;
mod config;
mod envelope;

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use songbook_core::domain::{NewSong, SongId, SongPatch, SongSearch};
use songbook_core::ports::SongRepository;
use songbook_core::query::{Filters, SONG_SORT_SAFELIST};
use songbook_core::services::CatalogService;
use songbook_core::{CoreError, OpContext, Validator};
use songbook_storage::{SqliteSongRepository, StorageConfig};
use tracing_subscriber::EnvFilter;

pub use crate::cli::{Cli, Command};
pub use crate::config::{CatalogConfig, LoggingConfig};
pub use crate::envelope::{Response, Status};

/// Entry point of the `songbook` binary.
pub fn run() -> ExitCode {
  let cli = Cli::parse();
  match execute(cli) {
    Ok(code) => code,
    Err(e) => {
      tracing::error!(error = ?e, "songbook failed");
      eprintln!("songbook: {e:#}");
      ExitCode::FAILURE
    }
  }
}

fn execute(cli: Cli) -> Result<ExitCode> {
  let logging = LoggingConfig::load().context("failed to load logging config")?;
  init_tracing(&logging);

  let response = match cli.command {
    Command::Health => health(),
    command => {
      let catalog = CatalogConfig::load().context("failed to load catalog config")?;
      let mut storage = StorageConfig::load().context("failed to load storage config")?;
      if let Some(db) = cli.db {
        storage.db_path = db;
      }

      let repo = SqliteSongRepository::open(&storage)
        .with_context(|| format!("failed to open database at {}", storage.db_path.display()))?;
      tracing::info!(db_path = %storage.db_path.display(), "database connection pool established");

      let service = CatalogService::new(repo);
      dispatch(&service, &catalog, command)?
    }
  };

  let rendered = serde_json::to_string_pretty(&response.body).context("failed to render response")?;
  println!("{rendered}");
  Ok(response.status.exit_code())
}

fn init_tracing(logging: &LoggingConfig) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
  // A second call (tests, embedding) keeps the first subscriber.
  let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

pub fn health() -> Response {
  Response::ok(json!({ "status": "available", "version": env!("CARGO_PKG_VERSION") }))
}

/// Runs one catalog command and renders its outcome.
///
/// Domain failures become error envelopes; only failures outside the catalog
/// (reading a lyrics file, for one) surface as `Err`.
pub fn dispatch<R: SongRepository>(
  service: &CatalogService<R>,
  catalog: &CatalogConfig,
  command: Command,
) -> Result<Response> {
  let outcome = match command {
    Command::Health => Ok(health()),
    Command::List(args) => {
      let ctx = OpContext::new("list_songs");
      let mut v = Validator::new();
      let filters = Filters::from_raw(
        args.page.as_deref(),
        args.page_size.as_deref(),
        args.sort.as_deref(),
        &catalog.listing_defaults(),
        SONG_SORT_SAFELIST,
        &mut v,
      );
      filters.validate(&mut v);
      let criteria = SongSearch {
        song: args.song,
        group: args.group,
        release_date: args.release_date,
        text: args.text,
        link: args.link,
      };
      v.into_result()
        .and_then(|()| service.search(&ctx, &criteria, &filters))
        .map(|(songs, metadata)| Response::ok(json!({ "songs": songs, "metadata": metadata })))
    }
    Command::Get { id } => {
      let ctx = OpContext::new("get_song");
      service.get(&ctx, parse_id(&id)).map(|song| Response::ok(json!({ "song": song })))
    }
    Command::Lyrics(args) => {
      let ctx = OpContext::new("get_lyrics");
      let id = parse_id(&args.id);
      let mut v = Validator::new();
      let filters = Filters::from_raw(
        args.page.as_deref(),
        args.page_size.as_deref(),
        None,
        &catalog.lyrics_defaults(),
        &[],
        &mut v,
      );
      // The service checks the id before the page range, so unparsable
      // paging only wins once the id itself is usable.
      let outcome = match v.into_result() {
        Err(e) if id.is_valid() => Err(e),
        _ => service.lyrics(&ctx, id, &filters),
      };
      outcome.map(|(lyrics, metadata)| Response::ok(json!({ "lyrics": lyrics, "metadata": metadata })))
    }
    Command::Add(args) => {
      let ctx = OpContext::new("add_song");
      let text = match args.text_file {
        Some(path) => {
          fs::read_to_string(&path).with_context(|| format!("failed to read lyrics from {}", path.display()))?
        }
        None => args.text,
      };
      let song = NewSong { title: args.song, group: args.group, release_date: args.release_date, text, link: args.link };
      service.insert(&ctx, song).map(|song| Response::created(json!({ "song": song })))
    }
    Command::Update(args) => {
      let ctx = OpContext::new("update_song");
      let patch = SongPatch { title: args.song, group: args.group };
      service.update(&ctx, parse_id(&args.id), patch).map(|song| Response::ok(json!({ "song": song })))
    }
    Command::Delete { id } => {
      let ctx = OpContext::new("delete_song");
      service
        .delete(&ctx, parse_id(&id))
        .map(|()| Response::ok(json!({ "message": "song successfully deleted" })))
    }
  };

  Ok(outcome.unwrap_or_else(|e: CoreError| Response::failure(&e)))
}

/// Ids that are not integers can never match a row, so they map to an
/// invalid id and end up as not found.
fn parse_id(raw: &str) -> SongId {
  raw.trim().parse::<i64>().map(SongId::new).unwrap_or(SongId::new(0))
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::{TempDir, tempdir};

  fn open_service() -> (TempDir, CatalogService<SqliteSongRepository>) {
    let dir = tempdir().unwrap();
    let repo = SqliteSongRepository::open(&StorageConfig::at(dir.path().join("songbook.db"))).unwrap();
    (dir, CatalogService::new(repo))
  }

  fn run_args(service: &CatalogService<SqliteSongRepository>, args: &[&str]) -> Response {
    let mut argv = vec!["songbook"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    dispatch(service, &CatalogConfig::default(), cli.command).unwrap()
  }

  fn add(service: &CatalogService<SqliteSongRepository>, song: &str, group: &str, text: &str) -> Response {
    run_args(service, &["add", "--song", song, "--group", group, "--text", text])
  }

  #[test]
  fn parses_global_db_flag_after_subcommand() {
    let cli = Cli::try_parse_from(["songbook", "get", "3", "--db", "/tmp/x.db"]).unwrap();
    assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/x.db")));
    assert!(matches!(cli.command, Command::Get { ref id } if id == "3"));
  }

  #[test]
  fn descending_sort_is_not_taken_for_a_flag() {
    let cli = Cli::try_parse_from(["songbook", "list", "--sort", "-group"]).unwrap();
    let Command::List(args) = cli.command else { panic!("expected list") };
    assert_eq!(args.sort.as_deref(), Some("-group"));
  }

  #[test]
  fn parse_id_is_lenient() {
    assert_eq!(parse_id(" 12 "), SongId::new(12));
    assert_eq!(parse_id("abc"), SongId::new(0));
    assert!(!parse_id("-4").is_valid());
  }

  #[test]
  fn health_reports_available() {
    let response = health();
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.body["status"], "available");
  }

  #[test]
  fn add_then_get_renders_song_envelope() {
    let (_dir, service) = open_service();

    let created = add(&service, "Uprising", "Muse", "Paranoia is in bloom");
    assert_eq!(created.status, Status::Created);
    assert_eq!(created.body["song"]["id"], 1);
    assert_eq!(created.body["song"]["song"], "Uprising");

    let fetched = run_args(&service, &["get", "1"]);
    assert_eq!(fetched.status, Status::Ok);
    assert_eq!(fetched.body["song"]["group"], "Muse");
    assert_eq!(fetched.body["song"]["version"], 1);
  }

  #[test]
  fn add_requires_song_and_group() {
    let (_dir, service) = open_service();

    let response = run_args(&service, &["add", "--text", "no title"]);
    assert_eq!(response.status, Status::Unprocessable);
    assert_eq!(response.body["error"]["song"], "must be provided");
    assert_eq!(response.body["error"]["group"], "must be provided");
  }

  #[test]
  fn duplicate_add_is_unprocessable() {
    let (_dir, service) = open_service();
    add(&service, "Uprising", "Muse", "");

    let response = add(&service, "Uprising", "Muse", "");
    assert_eq!(response.status, Status::Unprocessable);
    assert_eq!(response.body["error"]["song"], "a song of this group already exists");
  }

  #[test]
  fn list_reports_every_invalid_parameter() {
    let (_dir, service) = open_service();

    let response = run_args(&service, &["list", "--page", "0", "--page-size", "many", "--sort", "title"]);
    assert_eq!(response.status, Status::Unprocessable);
    assert_eq!(response.body["error"]["page"], "must be greater than zero");
    assert_eq!(response.body["error"]["page_size"], "must be an integer value");
    assert_eq!(response.body["error"]["sort"], "invalid sort value");
  }

  #[test]
  fn list_filters_and_paginates() {
    let (_dir, service) = open_service();
    add(&service, "Uprising", "Muse", "");
    add(&service, "Resistance", "Muse", "");
    add(&service, "Crazy", "Gnarls Barkley", "");

    let response = run_args(&service, &["list", "--group", "muse", "--sort", "-song", "--page-size", "1"]);
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.body["songs"][0]["song"], "Uprising");
    assert_eq!(response.body["metadata"]["total_records"], 2);
    assert_eq!(response.body["metadata"]["last_page"], 2);
  }

  #[test]
  fn lyrics_uses_one_verse_per_page_by_default() {
    let (_dir, service) = open_service();
    add(&service, "Uprising", "Muse", "Paranoia is in bloom\n\nThey will not force us\n\nInterchanging mind control");

    let response = run_args(&service, &["lyrics", "1", "--page", "2"]);
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.body["lyrics"], json!(["They will not force us"]));
    assert_eq!(response.body["metadata"]["total_records"], 3);
  }

  #[test]
  fn lyrics_rejects_oversized_page() {
    let (_dir, service) = open_service();
    add(&service, "Uprising", "Muse", "verse");

    let response = run_args(&service, &["lyrics", "1", "--page-size", "101"]);
    assert_eq!(response.status, Status::Unprocessable);
    assert_eq!(response.body["error"]["page_size"], "must be a maximum of 100");
  }

  #[test]
  fn lyrics_checks_the_id_before_paging() {
    let (_dir, service) = open_service();
    add(&service, "Uprising", "Muse", "verse");

    let response = run_args(&service, &["lyrics", "0", "--page", "0"]);
    assert_eq!(response.status, Status::NotFound);

    let response = run_args(&service, &["lyrics", "abc", "--page", "x"]);
    assert_eq!(response.status, Status::NotFound);

    let response = run_args(&service, &["lyrics", "1", "--page", "x"]);
    assert_eq!(response.status, Status::Unprocessable);
    assert_eq!(response.body["error"]["page"], "must be an integer value");
  }

  #[test]
  fn update_and_delete_envelopes() {
    let (_dir, service) = open_service();
    add(&service, "Uprising", "Muse", "");

    let updated = run_args(&service, &["update", "1", "--song", "Resistance"]);
    assert_eq!(updated.status, Status::Ok);
    assert_eq!(updated.body["song"]["song"], "Resistance");
    assert_eq!(updated.body["song"]["version"], 2);

    let deleted = run_args(&service, &["delete", "1"]);
    assert_eq!(deleted.body, json!({ "message": "song successfully deleted" }));

    let missing = run_args(&service, &["delete", "1"]);
    assert_eq!(missing.status, Status::NotFound);
    assert_eq!(missing.body["error"], "the requested resource could not be found");
  }

  #[test]
  fn non_numeric_id_is_not_found() {
    let (_dir, service) = open_service();

    let response = run_args(&service, &["get", "abc"]);
    assert_eq!(response.status, Status::NotFound);
  }
}
