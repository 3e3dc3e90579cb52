use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use webpilot::browser::CdpBrowser;
use webpilot::config::{self, AppConfig};
use webpilot::hint::StdinHint;
use webpilot::llm::OpenAiCompatibleClient;
use webpilot::sites::{self, BUILTIN_SITES};
use webpilot::{RunRecorder, WebAgent, WebPilotError, WebPilotResult};

#[derive(Parser)]
#[command(name = "webpilot", version, about = "Vision-driven autonomous web navigation agent")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single task against a known site
    Task {
        /// Site name from the built-in catalog (see `sites`)
        site: String,
        /// Natural-language task description
        task: String,
        /// Run Chrome without a visible window
        #[arg(long)]
        headless: bool,
        /// Directory run artifacts are written under
        #[arg(long, default_value = "runs")]
        output: PathBuf,
        /// Read an optional operator hint from stdin before each step
        #[arg(long)]
        interactive_hints: bool,
    },
    /// List the built-in sites and their sample tasks
    Sites,
    /// Quick demo against example.com
    Demo {
        /// Run Chrome without a visible window
        #[arg(long)]
        headless: bool,
    },
}

#[tokio::main]
async fn main() {
    webpilot::init_logging();
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "run failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> WebPilotResult<()> {
    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "no usable config.toml, continuing with defaults");
            AppConfig::default()
        }
    };

    match cli.command {
        Commands::Sites => {
            print_sites();
            Ok(())
        }
        Commands::Task {
            site,
            task,
            headless,
            output,
            interactive_hints,
        } => {
            let Some(site) = sites::find_site(&site) else {
                let known = BUILTIN_SITES
                    .iter()
                    .map(|s| s.name)
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(WebPilotError::Config(format!(
                    "unknown site '{site}'; available: {known}"
                )));
            };
            run_one(
                config,
                site.name,
                site.url,
                &task,
                headless,
                &output,
                interactive_hints,
            )
            .await
        }
        Commands::Demo { headless } => {
            run_one(
                config,
                "Example",
                "https://example.com",
                "Find the 'More information' link and describe what you see",
                headless,
                Path::new("runs"),
                false,
            )
            .await
        }
    }
}

async fn run_one(
    mut config: AppConfig,
    site_name: &str,
    url: &str,
    task: &str,
    headless: bool,
    output: &Path,
    interactive_hints: bool,
) -> WebPilotResult<()> {
    if headless {
        config.browser.headless = true;
    }

    let model = OpenAiCompatibleClient::new(&config.llm, &config.agent)?;
    let browser = CdpBrowser::launch(&config.browser, &config.agent).await?;

    let mut agent = WebAgent::new(Box::new(browser), Box::new(model), config.agent.clone());
    if interactive_hints {
        agent = agent.with_hints(Box::new(StdinHint));
    }

    let recorder = RunRecorder::create(output)?;
    let outcome = agent.run_task(url, task, Some(&recorder)).await;
    agent.shutdown().await;
    let outcome = outcome?;

    if let Err(e) = recorder.save_result(site_name, url, task, &outcome) {
        tracing::warn!(error = %e, "failed to write result report");
    }

    let rule = "=".repeat(70);
    println!("\n{rule}");
    println!("SUMMARY");
    println!("{rule}");
    println!("Success: {}", if outcome.success { "yes" } else { "no" });
    println!("Steps taken: {}", outcome.steps);
    if let Some(error) = &outcome.error {
        println!("Error: {error}");
    }
    println!("Results saved: {}", recorder.dir().display());
    println!("{rule}\n");

    Ok(())
}

fn print_sites() {
    let mut categories: Vec<&str> = Vec::new();
    for site in BUILTIN_SITES {
        if !categories.contains(&site.category) {
            categories.push(site.category);
        }
    }

    println!("\nAvailable sites\n");
    for category in categories {
        println!("{}", category.to_uppercase().replace('_', " "));
        for site in BUILTIN_SITES.iter().filter(|s| s.category == category) {
            println!("  {}  {}", site.name, site.url);
            for task in site.sample_tasks {
                println!("    - {task}");
            }
        }
        println!();
    }
    println!("Usage: webpilot task <site> \"<task description>\"");
}
