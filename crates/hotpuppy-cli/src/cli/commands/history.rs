use crate::cli::args::HistoryArgs;
use crate::cli::commands::{exit_codes, open_existing};

pub fn run(args: HistoryArgs) -> anyhow::Result<i32> {
    let store = open_existing(&args.db)?;
    let images = store.all()?;

    if args.format == "json" {
        let out = serde_json::json!({ "images": images, "total": images.len() });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(exit_codes::OK);
    }

    for img in &images {
        let label = if img.is_seed {
            "seed".to_string()
        } else {
            img.user_input.clone().unwrap_or_default()
        };
        println!(
            "#{:<4} {}  {:<32}  {}",
            img.id,
            img.created_at.format("%Y-%m-%d %H:%M:%S"),
            label,
            img.image_url
        );
    }
    println!("{} images", images.len());
    Ok(exit_codes::OK)
}
