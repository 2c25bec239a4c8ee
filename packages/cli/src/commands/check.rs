use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use geostory_parser::{format_error, parse};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Path expression, e.g. sections[{"id":"intro"}].contents[0]
    pub path: String,
}

pub fn check(args: CheckArgs) -> Result<()> {
    let canonical = canonical_form(&args.path)?;
    println!("{} {}", "✓".green(), canonical.bright_white());
    Ok(())
}

/// Canonical spelling of a path, or its rendered syntax error
pub(crate) fn canonical_form(source: &str) -> Result<String> {
    let path = parse(source).map_err(|e| anyhow!("\n{}", format_error(source, &e)))?;
    Ok(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_form() {
        assert_eq!(
            canonical_form(r#"sections[{id: "abc"}].contents.0"#).unwrap(),
            r#"sections[{"id":"abc"}].contents[0]"#
        );
    }

    #[test]
    fn test_malformed_path_reports_error() {
        assert!(canonical_form("sections[{id: 'a'}.contents").is_err());
        assert!(canonical_form("[{id: 'a'}]").is_err());
    }
}
