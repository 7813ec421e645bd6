pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS images (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  image_url TEXT NOT NULL,
  prompt TEXT NOT NULL,
  user_input TEXT,
  is_seed INTEGER NOT NULL DEFAULT 0,
  created_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_images_single_seed ON images(is_seed) WHERE is_seed = 1;
"#;

/// Millisecond UTC timestamp evaluated by SQLite inside the insert, so row id
/// order and `created_at` order agree.
pub(crate) const NOW_RFC3339: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";
