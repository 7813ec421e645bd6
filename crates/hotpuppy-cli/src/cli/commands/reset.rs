use crate::cli::args::ResetArgs;
use crate::cli::commands::exit_codes;
use hotpuppy_core::storage::{reset, ResetOutcome};

pub fn run(args: ResetArgs) -> anyhow::Result<i32> {
    match reset(&args.db)? {
        ResetOutcome::Removed => println!("Database {} deleted", args.db.display()),
        ResetOutcome::AlreadyClean => {
            println!("Database {} not found (already clean)", args.db.display())
        }
    }
    println!("Restart the server to plant a fresh seed image.");
    Ok(exit_codes::OK)
}
