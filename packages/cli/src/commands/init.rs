use anyhow::Result;
use clap::Args;
use colored::Colorize;
use geostory_workspace::{EngineConfig, DEFAULT_CONFIG_NAME};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory holding static story configurations
    #[arg(short, long, default_value = "configs")]
    pub stories_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing GeoStory project...".bright_blue().bold());

    let stories_dir = PathBuf::from(cwd).join(&args.stories_dir);
    if !stories_dir.exists() {
        fs::create_dir_all(&stories_dir)?;
        println!("  {} Created {}/", "✓".green(), args.stories_dir);
    }

    let sample = stories_dir.join("sampleStory.json");
    if !sample.exists() {
        fs::write(&sample, SAMPLE_STORY)?;
        println!("  {} Created {}/sampleStory.json", "✓".green(), args.stories_dir);
    }

    let config = EngineConfig {
        stories_dir: args.stories_dir,
        ..EngineConfig::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)? + "\n")?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    println!();
    println!("{}", "✅ Ready".green().bold());
    println!("Try: {}", "geostory load sampleStory".bright_white());

    Ok(())
}

const SAMPLE_STORY: &str = r#"{
  "type": "cascade",
  "settings": {
    "storyTitle": "Sample story"
  },
  "sections": [
    {
      "id": "intro",
      "type": "title",
      "title": "Welcome",
      "contents": [
        {
          "id": "intro_text",
          "type": "text",
          "html": "<h1>Welcome</h1>"
        }
      ]
    }
  ],
  "resources": []
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        init(
            InitArgs {
                stories_dir: "stories".into(),
                force: false,
            },
            &cwd,
        )
        .unwrap();

        let config = EngineConfig::load(dir.path()).unwrap();
        assert_eq!(config.stories_dir, "stories");
        assert_eq!(config.auth_reload_delay_ms, 500);
        assert!(dir.path().join("stories/sampleStory.json").exists());
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{"storiesDir": "mine"}"#).unwrap();

        init(
            InitArgs {
                stories_dir: "configs".into(),
                force: false,
            },
            &cwd,
        )
        .unwrap();

        assert_eq!(EngineConfig::load(dir.path()).unwrap().stories_dir, "mine");
    }
}
