use anyhow::{Context, Result};
use heroforge_game::{BuildSession, Command, GenerationMethod, Rejection};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Build choices given directly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagChoices {
    pub method: Option<GenerationMethod>,
    pub culture: Option<String>,
    pub career: Option<String>,
    pub age: Option<String>,
    pub roll_age: bool,
    pub roll_money: bool,
    pub social_class: Option<String>,
}

impl FlagChoices {
    /// Commands equivalent to the flags, in dependency order.
    pub fn commands(&self) -> Vec<Command> {
        let mut commands = Vec::new();
        if let Some(method) = self.method {
            commands.push(Command::SetMethod { method });
        }
        if let Some(key) = &self.culture {
            commands.push(Command::SetCulture { key: key.clone() });
        }
        if let Some(key) = &self.career {
            commands.push(Command::SetCareer { key: key.clone() });
        }
        if let Some(key) = &self.age {
            commands.push(Command::SetAge { key: key.clone() });
        }
        if self.roll_age {
            commands.push(Command::RollAge);
        }
        if self.roll_money || self.social_class.is_some() {
            commands.push(Command::RollStartingMoney {
                social_class: self.social_class.clone(),
            });
        }
        commands
    }
}

pub fn parse_script(json: &str) -> Result<Vec<Command>> {
    serde_json::from_str(json).context("script must be a JSON array of commands")
}

pub fn load_script(path: &Path) -> Result<Vec<Command>> {
    let json =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_script(&json).with_context(|| format!("invalid script {}", path.display()))
}

/// A command the session refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedStep {
    pub index: usize,
    pub command: Command,
    pub rejection: Rejection,
}

/// Apply every command, collecting rejections. With `strict`, stop at the first.
pub fn replay(session: &mut BuildSession, commands: Vec<Command>, strict: bool) -> Vec<RejectedStep> {
    let mut rejected = Vec::new();
    for (index, command) in commands.into_iter().enumerate() {
        if let Err(rejection) = session.apply(command.clone()) {
            log::warn!("step {index} rejected: {rejection}");
            rejected.push(RejectedStep {
                index,
                command,
                rejection,
            });
            if strict {
                break;
            }
        }
    }
    rejected
}
