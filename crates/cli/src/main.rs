use anyhow::Context;
use aws_config::SdkConfig;
use clap::{Parser, Subcommand, ValueEnum};
use cloudclaw_agent::prompt;
use cloudclaw_agent::{Dispatcher, Session};
use cloudclaw_aws::{load_sdk_config, Ec2Compute, LambdaFunctions, S3Storage};
use cloudclaw_core::config::AppConfig;
use cloudclaw_providers::factory::create_provider;
use cloudclaw_providers::GenerationOptions;
use cloudclaw_tools::{compute_tools, function_tools, storage_tools, Toolset};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

const VERSION: &str = "0.1.0";

#[derive(Parser)]
#[command(name = "cloudclaw")]
#[command(version = VERSION)]
#[command(about = "Natural-language agent for AWS operations")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (or run a single command with -m)
    Chat {
        /// Which subsystem agent to talk to
        #[arg(short, long, value_enum, default_value_t = AgentKind::All)]
        agent: AgentKind,
        /// AWS region override
        #[arg(short, long)]
        region: Option<String>,
        /// Run one command and exit
        #[arg(short, long)]
        message: Option<String>,
    },
    /// List the tools an agent can call
    Tools {
        /// Which subsystem agent to describe
        #[arg(short, long, value_enum, default_value_t = AgentKind::All)]
        agent: AgentKind,
    },
    /// Show cloudclaw status
    Status,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AgentKind {
    /// EC2 instances
    Ec2,
    /// S3 buckets and objects
    S3,
    /// Lambda functions
    Lambda,
    /// All subsystems combined
    All,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the session transcript.
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(Level::INFO.into());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Chat {
            agent,
            region,
            message,
        }) => run_chat(agent, region, message).await,
        Some(Commands::Tools { agent }) => run_tools(agent).await,
        Some(Commands::Status) => {
            run_status();
            Ok(())
        }
        None => {
            println!("cloudclaw v{}", VERSION);
            println!("Use --help for usage.");
            Ok(())
        }
    }
}

async fn run_chat(
    agent: AgentKind,
    region: Option<String>,
    message: Option<String>,
) -> anyhow::Result<()> {
    let config = AppConfig::load(None).context("Failed to load configuration")?;
    let provider = create_provider(&config)?;

    let region = region.or_else(|| config.aws.region.clone());
    let sdk_config = load_sdk_config(region, config.aws.profile.clone()).await;
    let toolset = Arc::new(build_toolset(agent, &sdk_config)?);
    info!(
        toolset = toolset.name(),
        tools = toolset.len(),
        "toolset ready"
    );

    let system_prompt = prompt::system_prompt(agent_instructions(agent), &toolset);
    let options = GenerationOptions {
        model: config.agents.default.model.clone(),
        max_tokens: Some(config.agents.default.max_tokens),
        temperature: Some(config.agents.default.temperature),
    };

    let dispatcher = Dispatcher::new(provider, toolset, system_prompt, options);
    let mut session = Session::new(dispatcher);

    if let Some(message) = message {
        println!("{}", session.turn(&message).await);
        return Ok(());
    }

    run_repl(&mut session, agent).await
}

/// One SDK config per session; each subsystem client is built from it and
/// owned by the tools that wrap it.
fn build_toolset(agent: AgentKind, conf: &SdkConfig) -> anyhow::Result<Toolset> {
    let set = match agent {
        AgentKind::Ec2 => compute_tools::toolset(Arc::new(Ec2Compute::from_conf(conf)))?,
        AgentKind::S3 => storage_tools::toolset(Arc::new(S3Storage::from_conf(conf)))?,
        AgentKind::Lambda => function_tools::toolset(Arc::new(LambdaFunctions::from_conf(conf)))?,
        AgentKind::All => Toolset::combined(
            "aws",
            vec![
                compute_tools::toolset(Arc::new(Ec2Compute::from_conf(conf)))?,
                storage_tools::toolset(Arc::new(S3Storage::from_conf(conf)))?,
                function_tools::toolset(Arc::new(LambdaFunctions::from_conf(conf)))?,
            ],
        )?,
    };
    Ok(set)
}

fn agent_instructions(agent: AgentKind) -> &'static str {
    match agent {
        AgentKind::Ec2 => prompt::EC2_INSTRUCTIONS,
        AgentKind::S3 => prompt::S3_INSTRUCTIONS,
        AgentKind::Lambda => prompt::LAMBDA_INSTRUCTIONS,
        AgentKind::All => prompt::UNIFIED_INSTRUCTIONS,
    }
}

fn example_commands(agent: AgentKind) -> &'static [&'static str] {
    match agent {
        AgentKind::Ec2 => &[
            "List all EC2 instances",
            "Start EC2 instance i-1234567890abcdef0",
            "Stop EC2 instance i-1234567890abcdef0",
        ],
        AgentKind::S3 => &[
            "List all S3 buckets",
            "Upload example.txt to my-bucket",
            "Download report.csv from my-bucket to /tmp/report.csv",
        ],
        AgentKind::Lambda => &[
            "List all Lambda functions",
            "Invoke Lambda function my-function",
        ],
        AgentKind::All => &[
            "List all EC2 instances",
            "List all S3 buckets",
            "List all Lambda functions",
            "Start EC2 instance i-1234567890abcdef0",
            "Upload example.txt to my-bucket",
            "Invoke Lambda function my-function",
        ],
    }
}

async fn run_repl(session: &mut Session, agent: AgentKind) -> anyhow::Result<()> {
    println!("cloudclaw AWS agent - Ready!");
    println!("{}", "=".repeat(50));
    println!("Example commands you can try:");
    for (i, example) in example_commands(agent).iter().enumerate() {
        println!("{}. {}", i + 1, example);
    }
    println!("\n{}", "=".repeat(50));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nEnter your AWS command (or 'quit' to exit): ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "quit" | "exit" | "q") {
            println!("Goodbye!");
            break;
        }

        println!("\nExecuting: {}", input);
        println!("{}", "-".repeat(30));
        println!("{}", session.turn(input).await);
    }
    Ok(())
}

async fn run_tools(agent: AgentKind) -> anyhow::Result<()> {
    let config = AppConfig::load(None).context("Failed to load configuration")?;
    let sdk_config = load_sdk_config(config.aws.region.clone(), config.aws.profile.clone()).await;
    let toolset = build_toolset(agent, &sdk_config)?;

    println!("Toolset '{}' ({} tools):\n", toolset.name(), toolset.len());
    for spec in toolset.describe() {
        println!("{}", spec.name);
        println!("  {}", spec.description);

        let required: Vec<&str> = spec.parameters["required"]
            .as_array()
            .map(|names| names.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();
        if let Some(props) = spec.parameters["properties"].as_object() {
            for (param, schema) in props {
                let marker = if required.contains(&param.as_str()) {
                    " (required)"
                } else {
                    ""
                };
                println!(
                    "    {}{}: {}",
                    param,
                    marker,
                    schema["description"].as_str().unwrap_or("")
                );
            }
        }
        println!();
    }
    Ok(())
}

fn run_status() {
    let config_path = AppConfig::default_config_path();

    println!("cloudclaw Status\n");

    if config_path.exists() {
        println!("Config: {} ✓", config_path.display());
    } else {
        println!(
            "Config: {} ✗ (using defaults and environment)",
            config_path.display()
        );
    }

    match AppConfig::load(None) {
        Ok(config) => {
            println!("Model: {}", config.agents.default.model);
            println!(
                "Region: {}",
                config.aws.region.as_deref().unwrap_or("(SDK default chain)")
            );
            println!(
                "Profile: {}",
                config.aws.profile.as_deref().unwrap_or("(SDK default chain)")
            );

            let check = |name: &str, has: bool| {
                if has {
                    println!("{}: ✓", name);
                } else {
                    println!("{}: not set", name);
                }
            };

            check("Groq API", config.providers.groq.is_some());
            check("OpenAI-compatible API", config.providers.openai.is_some());
            check(
                "GROQ_API_KEY env",
                std::env::var("GROQ_API_KEY").is_ok_and(|k| !k.is_empty()),
            );
        }
        Err(e) => {
            println!("Error loading config: {}", e);
        }
    }
}
