use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;

/// Idempotent schema: the catalog table, its FTS5 index and the triggers
/// keeping the index in step with every insert, update and delete.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS songs (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    song_name    TEXT    NOT NULL,
    group_name   TEXT    NOT NULL,
    release_date TEXT    NOT NULL DEFAULT '',
    lyrics       TEXT    NOT NULL DEFAULT '',
    link         TEXT    NOT NULL DEFAULT '',
    version      INTEGER NOT NULL DEFAULT 1,
    created_at   TEXT    NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at   TEXT    NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    UNIQUE (song_name, group_name)
);

CREATE VIRTUAL TABLE IF NOT EXISTS songs_fts USING fts5(
    song_name,
    group_name,
    release_date,
    lyrics,
    link,
    content = 'songs',
    content_rowid = 'id'
);

CREATE TRIGGER IF NOT EXISTS songs_fts_insert AFTER INSERT ON songs BEGIN
    INSERT INTO songs_fts (rowid, song_name, group_name, release_date, lyrics, link)
    VALUES (new.id, new.song_name, new.group_name, new.release_date, new.lyrics, new.link);
END;

CREATE TRIGGER IF NOT EXISTS songs_fts_delete AFTER DELETE ON songs BEGIN
    INSERT INTO songs_fts (songs_fts, rowid, song_name, group_name, release_date, lyrics, link)
    VALUES ('delete', old.id, old.song_name, old.group_name, old.release_date, old.lyrics, old.link);
END;

CREATE TRIGGER IF NOT EXISTS songs_fts_update AFTER UPDATE ON songs BEGIN
    INSERT INTO songs_fts (songs_fts, rowid, song_name, group_name, release_date, lyrics, link)
    VALUES ('delete', old.id, old.song_name, old.group_name, old.release_date, old.lyrics, old.link);
    INSERT INTO songs_fts (rowid, song_name, group_name, release_date, lyrics, link)
    VALUES (new.id, new.song_name, new.group_name, new.release_date, new.lyrics, new.link);
END;
"#;

pub fn ensure_schema(conn: &mut SqliteConnection) -> diesel::QueryResult<()> {
  conn.batch_execute(SCHEMA)
}
