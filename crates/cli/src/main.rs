//! Revisor CLI
//!
//! Runs the paper review crew over a directory of PDFs, renders template
//! articles from saved summaries, validates summary files and writes the
//! default configuration.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use revisor_core::article::render_document;
use revisor_core::config::{
    agent_ids, home_dir, ArticleMode, CrewContext, CrewPrompts, CrewSettings,
};
use revisor_core::crew::{run_timestamp, write_article, ArticleNames, Crew, CrewEvent, CrewReport};
use revisor_core::models::LlmProvider;
use revisor_core::summary::{validate, SummaryDocument};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Revisor - reads scientific papers and writes about them")]
struct Cli {
    /// Directory holding config.json, agents.yaml and tasks.yaml
    #[arg(long, global = true)]
    home: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Summarise every PDF and write articles (default)
    Run(RunArgs),
    /// Write template articles from a saved summaries YAML (no model calls)
    Render {
        /// Summaries file produced by a run
        yaml: PathBuf,
        /// Output directory for the Markdown files
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Check a summaries YAML against the field rules
    Validate {
        yaml: PathBuf,
    },
    /// Write editable agents.yaml, tasks.yaml and config.json
    Init {
        /// Target directory (defaults to the home directory)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args, Default)]
struct RunArgs {
    /// Directory containing the PDFs
    #[arg(long)]
    pdfs: Option<PathBuf>,
    /// Output directory (yamls/ and articles/ are created inside)
    #[arg(long)]
    out: Option<PathBuf>,
    /// Directory with agents.yaml / tasks.yaml overrides
    #[arg(long)]
    config_dir: Option<PathBuf>,
    /// File name pattern, e.g. "Smith*.pdf"
    #[arg(long)]
    pattern: Option<String>,
    /// Descend into subdirectories
    #[arg(long)]
    recursive: bool,
    /// Skip the web research stage
    #[arg(long)]
    no_research: bool,
    /// Render articles from the fixed template instead of the writer agent
    #[arg(long)]
    template_article: bool,
    /// Maximum reviewer passes per paper
    #[arg(long)]
    review_passes: Option<u32>,
    /// LLM provider (openai, anthropic, gemini, openrouter, grok, deepseek)
    #[arg(long)]
    provider: Option<String>,
    /// Model name for every agent
    #[arg(long)]
    model: Option<String>,
    /// Base URL for OpenAI-compatible endpoints
    #[arg(long)]
    base_url: Option<String>,
}

impl RunArgs {
    /// Command-line flags win over config.json
    fn apply(self, settings: &mut CrewSettings) -> Result<()> {
        if let Some(pdfs) = self.pdfs {
            settings.pdf_dir = pdfs;
        }
        if let Some(out) = self.out {
            settings.output_dir = out;
        }
        if let Some(dir) = self.config_dir {
            settings.config_dir = Some(dir);
        }
        if let Some(pattern) = self.pattern {
            settings.pattern = pattern;
        }
        if self.recursive {
            settings.recursive = true;
        }
        if self.no_research {
            settings.research_enabled = false;
        }
        if self.template_article {
            settings.article_mode = ArticleMode::Template;
        }
        if let Some(passes) = self.review_passes {
            settings.max_review_passes = passes;
        }
        if let Some(name) = self.provider {
            settings.global_provider = LlmProvider::parse(&name).ok_or_else(|| {
                let known: Vec<&str> = LlmProvider::all()
                    .iter()
                    .map(|p| p.display_name())
                    .collect();
                anyhow!("Unknown provider '{}'. Known providers: {}", name, known.join(", "))
            })?;
        }
        if let Some(model) = self.model {
            settings.global_model = Some(model);
        }
        if let Some(url) = self.base_url {
            settings.base_url = Some(url);
        }
        Ok(())
    }
}

/// Agents that will make model calls with these settings
fn active_agents(settings: &CrewSettings) -> Vec<&'static str> {
    let mut agents = vec![agent_ids::READER];
    if settings.max_review_passes > 0 {
        agents.push(agent_ids::REVIEWER);
    }
    if settings.article_mode == ArticleMode::Llm {
        if settings.research_enabled {
            agents.push(agent_ids::RESEARCHER);
        }
        agents.push(agent_ids::WRITER);
    }
    agents
}

async fn load_context(home: &Path, settings: CrewSettings) -> Result<CrewContext> {
    let config_dir = settings
        .config_dir
        .clone()
        .unwrap_or_else(|| home.to_path_buf());
    let prompts = CrewPrompts::load(Some(&config_dir)).await?;
    Ok(CrewContext::new(prompts, settings))
}

async fn run_crew(home: &Path, args: RunArgs) -> Result<ExitCode> {
    let mut settings = CrewSettings::load(home).await?;
    args.apply(&mut settings)?;

    for config in settings.model_configs(&active_agents(&settings)) {
        config.ensure_credentials()?;
    }

    let context = Arc::new(load_context(home, settings).await?);
    println!("📄 Reading PDFs from {}", context.settings.pdf_dir.display());

    let (tx, mut rx) = mpsc::channel::<CrewEvent>(64);
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            println!("   {}", event.describe());
        }
    });

    let report = {
        let mut crew = Crew::new(context).with_event_channel(tx);
        crew.run().await?
    };
    printer.await?;

    print_report(&report);
    if report.summaries.is_empty() && !report.failures.is_empty() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_report(report: &CrewReport) {
    println!();
    println!(
        "✅ {} paper(s) summarised, {} failed",
        report.summaries.len(),
        report.failures.len()
    );
    match &report.yaml_path {
        Some(path) => println!("   Summaries: {}", path.display()),
        None => println!("   No summaries written"),
    }
    for path in &report.articles {
        println!("   Article:   {}", path.display());
    }
    for review in report.unresolved() {
        println!(
            "⚠️  {} still has {} issue(s) after {} review pass(es)",
            review.filename,
            review.remaining.len(),
            review.passes
        );
    }
    for failure in &report.failures {
        println!(
            "❌ {} ({:?}): {}",
            failure.path.display(),
            failure.stage,
            failure.error
        );
    }
}

async fn render(home: &Path, yaml: &Path, out: Option<PathBuf>) -> Result<ExitCode> {
    let settings = CrewSettings::load(home).await?;
    let out = out.unwrap_or_else(|| settings.articles_dir());
    let context = load_context(home, settings).await?;
    let document = SummaryDocument::load(yaml).await?;

    let mut names = ArticleNames::new(&run_timestamp());
    let template = &context.prompts.tasks.write_article.article;
    for (file, markdown) in render_document(&document, template) {
        let path = write_article(&out, &file, &markdown, &mut names).await?;
        println!("📝 {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

async fn validate_file(home: &Path, yaml: &Path) -> Result<ExitCode> {
    let settings = CrewSettings::load(home).await?;
    let document = SummaryDocument::load(yaml).await?;
    if document.articles.is_empty() {
        println!("⚠️  {} contains no records", yaml.display());
        return Ok(ExitCode::FAILURE);
    }

    let mut issues = 0;
    for summary in &document.articles {
        let report = validate(summary, &settings.validation);
        if report.is_valid() {
            println!("✅ {}", summary.filename);
        } else {
            issues += report.violations.len();
            println!("❌ {}", summary.filename);
            println!("{}", report.to_bullets());
        }
    }

    if issues == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        println!("\n{} issue(s) found", issues);
        Ok(ExitCode::FAILURE)
    }
}

async fn init(dir: &Path, force: bool) -> Result<ExitCode> {
    for name in CrewPrompts::write_defaults(dir, force).await? {
        println!("📝 Wrote {}", dir.join(name).display());
    }

    let settings_path = dir.join(revisor_core::config::settings::SETTINGS_FILE);
    if force || !settings_path.exists() {
        let path = CrewSettings::default().save(dir).await?;
        println!("📝 Wrote {}", path.display());
    } else {
        println!("   Keeping {}", settings_path.display());
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let home = cli.home.unwrap_or_else(home_dir);
    tracing::debug!(home = %home.display(), "Using home directory");

    match cli.command {
        Some(CliCommand::Run(args)) => run_crew(&home, args).await,
        Some(CliCommand::Render { yaml, out }) => render(&home, &yaml, out).await,
        Some(CliCommand::Validate { yaml }) => validate_file(&home, &yaml).await,
        Some(CliCommand::Init { dir, force }) => {
            init(&dir.unwrap_or_else(|| home.clone()), force).await
        }
        None => run_crew(&home, RunArgs::default()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::parse_from([
            "revisor",
            "run",
            "--pdfs",
            "papers",
            "--no-research",
            "--template-article",
            "--review-passes",
            "3",
            "--provider",
            "anthropic",
        ]);
        let Some(CliCommand::Run(args)) = cli.command else {
            panic!("expected run");
        };

        let mut settings = CrewSettings::default();
        args.apply(&mut settings).unwrap();

        assert_eq!(settings.pdf_dir, PathBuf::from("papers"));
        assert!(!settings.research_enabled);
        assert_eq!(settings.article_mode, ArticleMode::Template);
        assert_eq!(settings.max_review_passes, 3);
        assert_eq!(settings.global_provider, LlmProvider::Anthropic);
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let args = RunArgs {
            provider: Some("mystery".to_string()),
            ..Default::default()
        };
        let err = args.apply(&mut CrewSettings::default()).unwrap_err();
        assert!(err.to_string().contains("mystery"));
    }

    #[test]
    fn test_active_agents() {
        let mut settings = CrewSettings::default();
        assert_eq!(active_agents(&settings).len(), 4);

        settings.article_mode = ArticleMode::Template;
        assert_eq!(
            active_agents(&settings),
            vec![agent_ids::READER, agent_ids::REVIEWER]
        );
    }

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::parse_from(["revisor"]);
        assert!(cli.command.is_none());
    }
}
