use super::read_story;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use geostory_common::Value;
use geostory_editor::{Mutation, PostEffectEngine, StoryStore};
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Story document (JSON)
    pub story: PathBuf,

    /// JSON array of mutations, e.g. [{"op": "remove", "path": "sections[0]"}]
    pub mutations: PathBuf,

    /// Write the edited story here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not remove containers emptied by removals and moves
    #[arg(long)]
    pub no_cleanup: bool,
}

pub fn apply(args: ApplyArgs) -> Result<()> {
    let mut store = read_story(&args.story)?;
    let source = fs::read_to_string(&args.mutations)
        .with_context(|| format!("Cannot read {}", args.mutations.display()))?;
    let mutations: Vec<Mutation> = serde_json::from_str(&source)
        .map_err(|e| anyhow!("{}: {}", args.mutations.display(), e))?;

    let effects = (!args.no_cleanup).then(PostEffectEngine::new);
    let applied = apply_all(&mut store, mutations, effects.as_ref())?;
    let text = serde_json::to_string_pretty(&store.current_story().to_json())?;

    match &args.output {
        Some(output) => {
            fs::write(output, text + "\n")?;
            eprintln!(
                "{} {} mutations applied → {}",
                "✓".green(),
                applied,
                output.display()
            );
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// Apply mutations in order, each followed by the cleanup it triggers.
///
/// Returns how many mutations were applied, follow-ups included.
pub(crate) fn apply_all(
    store: &mut StoryStore,
    mutations: Vec<Mutation>,
    effects: Option<&PostEffectEngine>,
) -> Result<usize> {
    let mut applied = 0;
    for mutation in mutations {
        let mut queue = VecDeque::from([mutation]);
        while let Some(next) = queue.pop_front() {
            let before: Value = store.current_story().clone();
            store.apply(&next)?;
            applied += 1;
            if store.current_story().same(&before) {
                tracing::debug!(mutation = ?next, "mutation left the story unchanged");
                continue;
            }
            if let Some(effects) = effects {
                queue.extend(effects.analyze(&next, &before, store.current_story()));
            }
        }
    }
    Ok(applied)
}
