// Mirrors the `songs` table created by `bootstrap::SCHEMA`.
// `songs_fts` is an FTS5 virtual table and is only reached through raw SQL.

diesel::table! {
    songs (id) {
        id -> BigInt,
        song_name -> Text,
        group_name -> Text,
        release_date -> Text,
        lyrics -> Text,
        link -> Text,
        version -> Integer,
        created_at -> Text,
        updated_at -> Text,
    }
}
