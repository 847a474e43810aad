use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use formwizard::config::Config;
use formwizard::form::Record;
use formwizard::registry::WizardRegistry;
use formwizard::wizard::WizardRequest;
use formwizard::{demo, logging, rest};

#[derive(Parser)]
#[command(name = "formwizard")]
#[command(about = "Multi-step form wizards served over HTTP")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Serve {
        /// Port to listen on (default: server.port from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the ordered steps of a wizard
    Steps {
        /// Wizard name
        wizard: String,

        /// Content values as a JSON object, used to evaluate completion
        #[arg(long)]
        content: Option<String>,
    },

    /// Write the effective configuration to a TOML file
    InitConfig {
        /// Output path (default: ./formwizard.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the OpenAPI document
    Openapi,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let mut config = Config::load(cli.config.as_deref())?;

    let _logging_handle = logging::init_logging(&config, cli.debug)?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_serve(config).await?;
        }
        Commands::Steps { wizard, content } => {
            cmd_steps(&config, &wizard, content.as_deref())?;
        }
        Commands::InitConfig { output } => {
            let path = output.unwrap_or_else(Config::local_config_path);
            config.save(&path)?;
            println!("Wrote {}", path.display());
        }
        Commands::Openapi => {
            println!("{}", rest::ApiDoc::json()?);
        }
    }

    Ok(())
}

/// Demo wizards with the `[wizards.*]` configuration applied
fn load_registry(config: &Config) -> Result<WizardRegistry> {
    let mut registry = demo::demo_registry().context("Failed to register demo wizards")?;
    registry
        .apply_config(config)
        .context("Invalid wizard configuration")?;
    Ok(registry)
}

async fn cmd_serve(config: Config) -> Result<()> {
    let registry = load_registry(&config)?;

    println!("Starting formwizard server...");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!("  Wizards: {}", registry.names().join(", "));
    println!("  Endpoints:");
    println!("    GET  /api/v1/health                    Health check");
    println!("    GET  /api/v1/wizards                   List wizards");
    println!("    GET  /content/:id/:wizard              Enter a wizard");
    println!("    GET  /content/:id/:wizard/:step        Show a step");
    println!("    POST /content/:id/:wizard/:step        Submit a step");
    println!();

    let state = rest::ApiState::new(config, registry);
    rest::serve(state).await?;

    Ok(())
}

fn cmd_steps(config: &Config, wizard: &str, content: Option<&str>) -> Result<()> {
    let registry = load_registry(config)?;
    let definition = registry
        .get(wizard)
        .with_context(|| format!("Unknown wizard '{}'", wizard))?;

    let mut record: Record = match content {
        Some(json) => serde_json::from_str(json).context("Content must be a JSON object")?,
        None => Record::new(),
    };

    let request = WizardRequest::new(&config.server.public_url(), "/content/cli");
    let wizard = definition.wizard(&mut record, &request);
    let steps = wizard.steps();

    if steps.is_empty() {
        println!("Wizard '{}' has no available steps", definition.name());
        return Ok(());
    }

    println!("Wizard '{}' ({} steps)", definition.name(), steps.len());
    println!("{}", "─".repeat(60));

    for (idx, step) in steps.iter().enumerate() {
        let done = if step.completed(wizard.content()) {
            "✓"
        } else {
            " "
        };
        let hidden = if step.is_visible() { "" } else { " (hidden)" };
        println!(
            "[{}] {}. {:<12} {:<24} weight {}{}",
            done,
            idx + 1,
            step.name(),
            step.label(),
            step.settings().weight,
            hidden
        );
    }

    println!();
    println!("Wizard completed: {}", wizard.completed());

    Ok(())
}
