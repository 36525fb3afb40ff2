use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};

use fitcoach_agent::chat::{ChatSession, Sender};
use fitcoach_agent::config::Config;
use fitcoach_agent::error::CoachError;
use fitcoach_agent::llm::GeminiClient;
use fitcoach_agent::outline;
use fitcoach_agent::planner::{self, BodyGoal, UserStats, INCOMPLETE_FORM_MESSAGE, PLAN_ERROR_MESSAGE};
use fitcoach_agent::search::SearchHistory;
use fitcoach_agent::share::share_text;
use fitcoach_agent::video::{VideoFeed, VideoSearchClient};

/// FitCoach - AI workout and meal plans from the terminal
#[derive(Parser, Debug)]
#[command(name = "fitcoach", version, about)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a personalized workout and meal plan
    Plan {
        #[arg(long)]
        age: String,
        /// Height in cm
        #[arg(long)]
        height: String,
        /// Weight in kg
        #[arg(long)]
        weight: String,
        /// lose-weight, gain-muscle or maintain-weight
        #[arg(long, default_value = "lose-weight")]
        goal: BodyGoal,
        /// Daily target calories
        #[arg(long)]
        calories: String,
        /// Food preferences, e.g. "Vegetarian, High Protein"
        #[arg(long)]
        preferences: String,
        /// Heading of the shareable text
        #[arg(long, default_value = "My Fitness Plan")]
        title: String,
        /// Print the plan as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Chat with the fitness assistant (interactive when no message is given)
    Chat { message: Option<String> },
    /// Search workout videos
    Videos { query: String },
    /// Sectionize a saved response without calling any API
    Parse {
        /// Text file, or a .json file holding the response value
        path: PathBuf,
        /// Print shareable text instead of JSON
        #[arg(long)]
        share: bool,
    },
}

fn read_sections(path: &Path) -> Result<Vec<outline::Section>, CoachError> {
    let content = std::fs::read_to_string(path)?;
    if path.extension().is_some_and(|ext| ext == "json") {
        let value: serde_json::Value = serde_json::from_str(&content)?;
        Ok(outline::parse_value(&value))
    } else {
        Ok(outline::parse(&content))
    }
}

async fn run_plan(config: &Config, stats: UserStats, title: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let client = GeminiClient::from_config(&config.gemini)?;
    match planner::generate_plan(&client, &stats).await {
        Ok(plan) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else if plan.sections.is_empty() {
                println!("{}", plan.raw);
            } else {
                println!("{}", share_text(title, &plan.sections));
            }
            Ok(())
        }
        Err(CoachError::MissingField(field)) => {
            Err(format!("{INCOMPLETE_FORM_MESSAGE} (missing {field})").into())
        }
        Err(e) => {
            eprintln!("{PLAN_ERROR_MESSAGE}");
            Err(e.into())
        }
    }
}

async fn run_chat(config: &Config, message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let client = GeminiClient::from_config(&config.gemini)?;
    let mut session = ChatSession::new();

    if let Some(message) = message {
        if let Some(reply) = session.send(&client, &message).await {
            println!("{}", reply.text);
        }
        return Ok(());
    }

    println!("Fitness AI Chatbot - ask about fitness, 'exit' to quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "exit" || line == "quit" {
            break;
        }
        if let Some(reply) = session.send(&client, line).await {
            if reply.sender == Sender::Bot {
                println!("bot> {}", reply.text);
            }
        }
    }
    info!(messages = session.messages().len(), "chat session ended");
    Ok(())
}

async fn run_videos(config: &Config, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut history = SearchHistory::new();
    let query = history.record(query).ok_or("search query is empty")?;

    let client = VideoSearchClient::from_config(&config.youtube)?;
    let mut feed = VideoFeed::new();
    feed.replace(client.search(&query).await?);

    if feed.videos().is_empty() {
        println!("No videos found for '{query}'");
        return Ok(());
    }
    for (i, video) in feed.videos().iter().enumerate() {
        let marker = if i == feed.active_index() { ">" } else { " " };
        println!("{marker} {}  [{}]", video.title, video.channel);
        println!("    {}", video.watch_url());
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Plan {
            age,
            height,
            weight,
            goal,
            calories,
            preferences,
            title,
            json,
        } => {
            let stats = UserStats {
                age,
                height_cm: height,
                weight_kg: weight,
                goal,
                daily_calories: calories,
                food_preferences: preferences,
            };
            run_plan(&config, stats, &title, json).await
        }
        Command::Chat { message } => run_chat(&config, message).await,
        Command::Videos { query } => run_videos(&config, &query).await,
        Command::Parse { path, share } => {
            let sections = read_sections(&path)?;
            if share {
                println!("{}", share_text("", &sections));
            } else {
                println!("{}", serde_json::to_string_pretty(&sections)?);
            }
            Ok(())
        }
    }
}
