//! Shared helper functions for CLI commands

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Catalog, Config, Project};
use crate::messaging::format_money;
use crate::ranking::SortMode;

/// Project, configuration and catalog resolved for one command
pub struct Session {
    pub project: Option<Project>,
    pub config: Config,
    pub catalog: Catalog,
}

impl Session {
    /// Resolve the session; a project is optional unless `--project` was given
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let project = match &global.project {
            Some(path) => Some(Project::open(Some(path.as_path())).map_err(|e| miette::miette!("{}", e))?),
            None => Project::discover().ok(),
        };
        let config = Config::load_for(project.as_ref());
        let catalog = Catalog::load(project.as_ref())?;

        tracing::debug!(
            project = ?project.as_ref().map(|p| p.root()),
            suppliers = catalog.suppliers.len(),
            "session opened"
        );

        Ok(Self {
            project,
            config,
            catalog,
        })
    }

    /// The project, or an error telling the user to run `baskit init`
    pub fn require_project(&self) -> Result<&Project> {
        self.project.as_ref().ok_or_else(|| {
            miette::miette!(
                help = "run `baskit init` first, or pass --project <DIR>",
                "not inside a Baskit project (no .baskit/ directory found)"
            )
        })
    }

    /// Amount in the configured currency
    pub fn money(&self, amount: f64) -> String {
        format_money(amount, self.config.currency())
    }

    /// Sort mode from the flag, else the configured default, else `recommended`
    pub fn sort_mode(&self, explicit: Option<SortMode>) -> SortMode {
        explicit
            .or_else(|| {
                self.config
                    .default_sort
                    .as_deref()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or_default()
    }

    /// Output format with `Auto` resolved through the config
    pub fn format(&self, global: &GlobalOpts, fallback: OutputFormat) -> OutputFormat {
        global
            .format
            .resolve(self.config.default_format.as_deref(), fallback)
    }
}

/// Print a value as YAML or JSON; returns false for other formats
pub fn print_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(value).into_diagnostic()?);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("Kopi ☕ Susu Gula Aren", 8), "Kopi ...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("with\nnewline"), "\"with\nnewline\"");
    }
}
