use crate::cli::args::StatusArgs;
use crate::cli::commands::{exit_codes, open_existing};
use hotpuppy_core::ChainState;

pub fn run(args: StatusArgs) -> anyhow::Result<i32> {
    let store = open_existing(&args.db)?;
    let count = store.count()?;

    let state = match ChainState::from_count(count) {
        ChainState::Empty => "empty".to_string(),
        ChainState::Seeded => "seeded".to_string(),
        ChainState::Evolving(n) => format!("evolving ({n} records)"),
    };
    println!("Database: {}", args.db.display());
    println!("State:    {state}");
    println!("Images:   {count}");

    if let Some(current) = store.latest()? {
        println!(
            "Current:  #{} {} ({})",
            current.id,
            current.image_url,
            current.created_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        );
    }
    Ok(exit_codes::OK)
}
