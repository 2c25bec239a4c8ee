use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use geostory_common::Value;
use geostory_editor::selectors::sections_selector;
use geostory_workspace::{Engine, EngineConfig, LoadPhase, Services};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Story id: digits for a stored story, otherwise a static story name
    pub id: String,

    /// Directory holding geostory.config.json (defaults to current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Outcome of a load run through the engine
#[derive(Debug)]
pub(crate) struct Loaded {
    pub phase: LoadPhase,
    pub title: Option<String>,
    pub sections: usize,
}

pub fn load(args: LoadArgs, cwd: &str) -> Result<()> {
    let dir = args.config.unwrap_or_else(|| PathBuf::from(cwd));
    let runtime = tokio::runtime::Runtime::new()?;
    let loaded = runtime.block_on(load_story(&dir, &args.id))?;

    match &loaded.phase {
        LoadPhase::Loaded { id } => {
            println!("{} Loaded {}", "✓".green(), id.bright_white());
            if let Some(title) = &loaded.title {
                println!("   Title:    {}", title);
            }
            println!("   Sections: {}", loaded.sections);
            Ok(())
        }
        LoadPhase::Failed {
            message_id: Some(message_id),
            ..
        } => Err(anyhow!("{}", message_id.red())),
        phase => Err(anyhow!("{} did not load ({:?})", args.id, phase)),
    }
}

pub(crate) async fn load_story(dir: &Path, id: &str) -> Result<Loaded> {
    let config = EngineConfig::load(dir)?;
    let services = Services::headless(config.get_stories_dir(dir));
    let engine = Engine::start(config, services);

    let phase = engine.load(id).await?;
    let story = engine.story();
    let title = story
        .get("settings")
        .and_then(|settings| settings.get("storyTitle"))
        .or_else(|| story.get("title"))
        .and_then(Value::as_str)
        .map(String::from);
    let sections = engine.with_state(|state| sections_selector(state).len());
    engine.stop();

    Ok(Loaded {
        phase,
        title,
        sections,
    })
}
