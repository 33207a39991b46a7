use songbook_core::domain::{NewSong, SongSearch};
use songbook_core::ports::SongRepository;
use songbook_core::query::{Filters, SONG_SORT_SAFELIST};
use songbook_storage::SqliteSongRepository;

fn main() {
  // Pass a path to point at another database file.
  let path = std::env::args().nth(1).unwrap_or_else(|| "songbook.db".to_string());
  let repo = SqliteSongRepository::new(&path).expect("failed to connect");

  let song = NewSong {
    title: "Test Song".to_string(),
    group: "Test Group".to_string(),
    release_date: "01.01.2024".to_string(),
    text: "First verse\nstill first\n\nSecond verse".to_string(),
    link: "https://example.com/test-song".to_string(),
  };

  let stored = match repo.insert(&song) {
    Ok(stored) => stored,
    Err(e) => {
      println!("Insert skipped: {e}");
      return;
    }
  };
  println!("Saved song with id = {}", stored.id);

  let loaded = repo.find(stored.id).expect("failed to load song");
  println!("Loaded from DB: {loaded:?}");

  let filters = Filters::new(1, 5, "-id", SONG_SORT_SAFELIST);
  let criteria = SongSearch { group: "test group".to_string(), ..Default::default() };
  let page = repo.search(&criteria, &filters.page_request().expect("valid filters")).expect("failed to search");
  println!("Search found {} of {} songs", page.songs.len(), page.total_records);
}
