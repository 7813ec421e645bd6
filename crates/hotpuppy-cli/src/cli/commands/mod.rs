use super::args::{Cli, Command};
use hotpuppy_core::Store;
use std::path::Path;

pub mod history;
pub mod reset;
pub mod status;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const STORE_ERROR: i32 = 2;
}

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Reset(args) => reset::run(args),
        Command::History(args) => history::run(args),
        Command::Status(args) => status::run(args),
    }
}

/// Attaches to the server's database for reading. The CLI never creates a
/// database and never changes its journal mode or schema.
pub(crate) fn open_existing(db: &Path) -> anyhow::Result<Store> {
    if !db.exists() {
        anyhow::bail!(
            "database {} not found (start the server once to create it)",
            db.display()
        );
    }
    Store::open_existing(db)
}
