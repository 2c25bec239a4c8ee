use super::read_story;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use geostory_common::Value;
use geostory_editor::selectors::create_path_selector;
use geostory_editor::StoryStore;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Story document (JSON)
    pub story: PathBuf,

    /// Path of the value to print
    pub path: String,

    /// Print compact JSON instead of indented
    #[arg(long)]
    pub compact: bool,
}

pub fn get(args: GetArgs) -> Result<()> {
    let store = read_story(&args.story)?;

    match select(&store, &args.path)? {
        Some(value) => {
            let json = value.to_json();
            let text = if args.compact {
                serde_json::to_string(&json)?
            } else {
                serde_json::to_string_pretty(&json)?
            };
            println!("{}", text);
        }
        None => println!("{} nothing at {}", "⚠️".yellow(), args.path.bright_white()),
    }
    Ok(())
}

pub(crate) fn select(store: &StoryStore, path: &str) -> Result<Option<Value>> {
    let selector = create_path_selector(path).map_err(|e| anyhow!("Invalid path {}: {}", path, e))?;
    Ok(selector(store.state()))
}
