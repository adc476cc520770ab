//! Commands and the interactive shell parser

use crate::speech::Voice;

/// A learner action or query
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// List vocabulary with mastery: words
    Words,
    /// List scenarios with gating: scenarios
    Scenarios,
    /// Show totals: status
    Status,
    /// Record a correct attempt: correct <word-id>
    Correct(String),
    /// Record an incorrect attempt: incorrect <word-id>
    Incorrect(String),
    /// Store a pronunciation score: score <word-id> <0-100>
    Score(String, u32),
    /// Make a scenario current: start <scenario-id>
    Start(String),
    /// Record a scenario completion: complete <scenario-id> <0-100>
    Complete(String, u32),
    /// Show prerequisite readiness: gating <scenario-id>
    Gating(String),
    /// Guided recognition and typing practice: practice <word-id>
    Practice(String),
    /// Play a word's pronunciation: speak <word-id>
    Speak(String),
    /// List available voices: voices
    Voices,
    /// Choose the remote voice: voice <name>
    Voice(Voice),
    /// Set the local speaking rate: speed <0.25-2.0>
    Speed(f32),
    /// Play a test phrase: test-audio
    TestAudio,
    /// Store the remote voice API key: voice-key <key>
    VoiceKey(String),
    /// Remove the remote voice API key: voice-key-clear
    VoiceKeyClear,
    /// Discard all progress: reset
    Reset,
    /// Show help: help or ?
    Help,
    /// Leave the shell: quit or q
    Quit,
    /// Empty input
    Nop,
}

/// Result of parsing a command
#[derive(Debug)]
pub enum ParseResult {
    /// Successfully parsed command
    Ok(Command),
    /// Unknown command
    UnknownCommand(String),
    /// Command needs an argument
    MissingArgument(String),
    /// Argument could not be parsed
    InvalidArgument(String),
}

/// Parse a line typed into the shell
pub fn parse_command(input: &str) -> ParseResult {
    let input = input.trim();

    if input.is_empty() {
        return ParseResult::Ok(Command::Nop);
    }

    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("");
    let first = parts.next();
    let second = parts.next();

    let cmd_lower = cmd.to_lowercase();
    let name = cmd_lower.as_str();
    let require = |arg: Option<&str>| match arg {
        Some(a) => Ok(a.to_string()),
        None => Err(ParseResult::MissingArgument(name.to_string())),
    };
    let score = |arg: Option<&str>| match arg {
        Some(a) => a
            .parse::<u32>()
            .map_err(|_| ParseResult::InvalidArgument(format!("{name}: '{a}' is not a score"))),
        None => Err(ParseResult::MissingArgument(name.to_string())),
    };

    let parsed = match name {
        "words" | "w" => Ok(Command::Words),
        "scenarios" | "sc" => Ok(Command::Scenarios),
        "status" | "st" => Ok(Command::Status),
        "correct" | "c" | "+" => require(first).map(Command::Correct),
        "incorrect" | "i" | "-" => require(first).map(Command::Incorrect),
        "score" => require(first).and_then(|w| score(second).map(|s| Command::Score(w, s))),
        "start" => require(first).map(Command::Start),
        "complete" | "done" => {
            require(first).and_then(|id| score(second).map(|s| Command::Complete(id, s)))
        }
        "gating" | "g" => require(first).map(Command::Gating),
        "practice" | "learn" => require(first).map(Command::Practice),
        "speak" | "say" | "p" => require(first).map(Command::Speak),
        "voices" => Ok(Command::Voices),
        "voice" => require(first).and_then(|v| {
            v.parse::<Voice>().map(Command::Voice).map_err(ParseResult::InvalidArgument)
        }),
        "speed" => require(first).and_then(|a| {
            a.parse::<f32>()
                .map(Command::Speed)
                .map_err(|_| ParseResult::InvalidArgument(format!("speed: '{a}' is not a number")))
        }),
        "test-audio" => Ok(Command::TestAudio),
        "voice-key" => require(first).map(Command::VoiceKey),
        "voice-key-clear" => Ok(Command::VoiceKeyClear),
        "reset" => Ok(Command::Reset),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        _ => Err(ParseResult::UnknownCommand(cmd.to_string())),
    };

    match parsed {
        Ok(command) => ParseResult::Ok(command),
        Err(result) => result,
    }
}

/// Shell help text
pub const HELP: &str = "\
Commands:
  words                      list vocabulary with mastery
  scenarios                  list scenarios with readiness
  status                     show XP and totals
  correct <word>             record a correct attempt
  incorrect <word>           record a missed attempt
  score <word> <0-100>       store a pronunciation score
  start <scenario>           make a scenario current
  complete <scenario> <0-100> record a scenario completion
  gating <scenario>          show prerequisite readiness
  practice <word>            recognition and typing practice
  speak <word>               play a pronunciation
  voices                     list available voices
  voice <name>               choose the remote voice
  speed <0.25-2.0>           set the local speaking rate
  test-audio                 play a test phrase
  voice-key <key>            store the remote voice API key
  voice-key-clear            remove the remote voice API key
  reset                      discard all progress
  quit                       leave the shell";
