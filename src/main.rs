use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use qsnake::{
    config::Config,
    demo::Demo,
    train::{parse_interval, Trainer},
    viz::{self, Dashboard, DEFAULT_FPS},
    Error, TrainedModel,
};

#[derive(Parser)]
#[command(name = "qsnake", version, about = "Tabular Q-learning agent for snake")]
struct Cli {
    /// Without a subcommand an interactive menu is shown
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Train a new agent
    Train(TrainArgs),
    /// Watch a trained agent play
    Demo(DemoArgs),
}

#[derive(Args, Default)]
struct TrainArgs {
    /// Maximum number of episodes
    #[arg(long)]
    episodes: Option<u32>,
    /// Offer a demo every N episodes, anything but a positive number disables it
    #[arg(long)]
    demo_every: Option<String>,
    /// Where the trained table is written
    #[arg(long)]
    table: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Default)]
struct DemoArgs {
    /// Table written by a training run
    #[arg(long)]
    table: Option<PathBuf>,
    /// Demo speed in frames per second [default: 10]
    #[arg(long)]
    fps: Option<u32>,
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn prompt(question: &str) -> Result<String> {
    print!("{question}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .context("failed to read from stdin")?;
    Ok(answer.trim().to_lowercase())
}

/// **Returns** the score on screen when the user quit
fn watch(demo: Demo, fps: u32) -> Result<u32> {
    let mut terminal = viz::init().context("failed to initialize the terminal")?;
    let played = viz::play(&mut terminal, demo, fps);
    viz::restore().context("failed to restore the terminal")?;
    played.context("demo failed")
}

fn summary(model: &TrainedModel, table_path: &Path) {
    println!("\nTraining complete!");
    println!("Episodes: {} ({:?})", model.episodes, model.stop);
    println!("Final avg score: {:.2}", model.final_average);
    println!("Best score: {}", model.best_score);
    println!("Final epsilon: {:.3}", model.epsilon);
    println!("Q-table saved to {}", table_path.display());
}

fn train(args: TrainArgs) -> Result<()> {
    // records are only shown in the dashboard's Logs tab
    viz::init_logger(LevelFilter::Debug).context("failed to install the logger")?;

    let mut config = load_config(args.config.as_deref())?;
    if let Some(episodes) = args.episodes {
        config.train.max_episodes = episodes;
    }
    if let Some(every) = args.demo_every.as_deref() {
        config.train.demo_interval = parse_interval(every);
    }
    if let Some(table) = args.table {
        config.train.table_path = table;
    }
    if args.seed.is_some() {
        config.train.seed = args.seed;
    }

    let trainer = Trainer::new(config.clone()).context("invalid training configuration")?;
    let mut dashboard = Dashboard::new(config.train.max_episodes, DEFAULT_FPS)
        .context("failed to initialize the terminal")?;
    let result = trainer.run(&mut dashboard);
    let closed = dashboard.finish();
    let model = result.context("training failed")?;
    closed.context("dashboard failed")?;

    summary(&model, &config.train.table_path);

    if prompt("\nWatch final demo? (y/n): ")? == "y" {
        let demo = Demo::new(model.table, config.game, None)?;
        let score = watch(demo, DEFAULT_FPS)?;
        println!("Final Score: {score}");
    }
    Ok(())
}

fn demo(args: DemoArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let table = args.table.unwrap_or(config.train.table_path);
    println!("Loading trained agent...");
    let demo = match Demo::load(&table, config.game, None) {
        Ok(demo) => demo,
        Err(Error::MissingTable(_)) => {
            println!("No trained Q-table found. Please train first.");
            return Ok(());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to load {}", table.display()))
        }
    };
    println!("Starting demo (press Q to quit, R to restart)...");
    let score = watch(demo, args.fps.unwrap_or(DEFAULT_FPS))?;
    println!("Final Score: {score}");
    Ok(())
}

fn menu() -> Result<()> {
    println!("Q-Learning Snake");
    println!("{}", "=".repeat(40));
    println!("1. Train new agent");
    println!("2. Watch trained agent (demo)");
    println!("{}", "=".repeat(40));

    match prompt("Enter choice (1 or 2): ")?.as_str() {
        "1" => {
            let every =
                prompt("Watch demo every N episodes? (enter number or 0 for no demos): ")?;
            train(TrainArgs {
                demo_every: Some(every),
                ..Default::default()
            })
        }
        "2" => demo(DemoArgs::default()),
        _ => {
            println!("Invalid choice");
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Some(Command::Train(args)) => train(args),
        Some(Command::Demo(args)) => demo(args),
        None => menu(),
    }
}
