use anyhow::Result;
use clap::{Parser, Subcommand};
use sakhi::app::Reply;
use sakhi::app::command::Command;
use sakhi::speech::Voice;
use sakhi::{App, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sakhi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List vocabulary with mastery levels
    Words,
    /// List scenarios with prerequisite readiness
    Scenarios,
    /// Show XP and totals
    Status,
    /// Record a correct practice attempt
    Correct {
        /// Word id, e.g. price_inquiry
        word: String,
    },
    /// Record a missed practice attempt
    Incorrect {
        /// Word id
        word: String,
    },
    /// Store a pronunciation score for a word
    Score {
        /// Word id
        word: String,
        /// Score from 0 to 100
        score: u32,
    },
    /// Make a scenario the current one
    Start {
        /// Scenario id, e.g. auto_negotiation
        scenario: String,
    },
    /// Record a scenario completion
    Complete {
        /// Scenario id
        scenario: String,
        /// Score from 0 to 100
        score: u32,
    },
    /// Show prerequisite readiness for a scenario
    Gating {
        /// Scenario id
        scenario: String,
    },
    /// Practice a word: recognition, then typing it in Kannada
    Practice {
        /// Word id
        word: String,
    },
    /// Play a word's pronunciation
    Speak {
        /// Word id
        word: String,
    },
    /// List available voices
    Voices,
    /// Choose the remote voice and save it to the config
    Voice {
        /// Voice name: aria, roger, sarah, brian or laura
        name: Voice,
    },
    /// Set the local speaking rate and save it to the config
    Speed {
        /// Rate from 0.25 to 2.0 (1.0 = normal)
        rate: f32,
    },
    /// Play a test phrase to check audio output
    TestAudio,
    /// Store the remote voice API key in the system keyring
    VoiceKey {
        /// API key
        key: String,
    },
    /// Remove the stored remote voice API key
    VoiceKeyClear,
    /// Discard all progress
    Reset,
    /// Start the interactive practice shell
    Shell,
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Words => Command::Words,
            Commands::Scenarios => Command::Scenarios,
            Commands::Status => Command::Status,
            Commands::Correct { word } => Command::Correct(word),
            Commands::Incorrect { word } => Command::Incorrect(word),
            Commands::Score { word, score } => Command::Score(word, score),
            Commands::Start { scenario } => Command::Start(scenario),
            Commands::Complete { scenario, score } => Command::Complete(scenario, score),
            Commands::Gating { scenario } => Command::Gating(scenario),
            Commands::Practice { word } => Command::Practice(word),
            Commands::Speak { word } => Command::Speak(word),
            Commands::Voices => Command::Voices,
            Commands::Voice { name } => Command::Voice(name),
            Commands::Speed { rate } => Command::Speed(rate),
            Commands::TestAudio => Command::TestAudio,
            Commands::VoiceKey { key } => Command::VoiceKey(key),
            Commands::VoiceKeyClear => Command::VoiceKeyClear,
            Commands::Reset => Command::Reset,
            Commands::Shell => Command::Nop,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sakhi=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config_path = Config::config_path()?;
    let config = Config::load_from(&config_path)?;
    let mut app = App::new(config, config_path)?;

    match cli.command {
        None | Some(Commands::Shell) => app.run_shell().await?,
        Some(command) => {
            if let Reply::Text(text) = app.execute(command.into()).await? {
                println!("{}", text);
            }
        }
    }

    Ok(())
}
