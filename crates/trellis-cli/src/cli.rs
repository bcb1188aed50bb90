use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use trellis_domain::commands::{
    AddComment, ArchiveCard, ChangeDirectory, CompletePath, CopyCard, CreateCard, EditCard,
    ListContents, MoveCard, PrintWorkingDirectory, Show,
};
use trellis_domain::ShellCommand;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Navigate boards, lists and cards like a filesystem", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the board data file (or set TRELLIS_FILE env var)
    #[arg(long, short, value_name = "FILE", env = "TRELLIS_FILE")]
    pub file: Option<PathBuf>,

    /// Look everything up again instead of caching boards, lists and cards
    #[arg(long)]
    pub no_cache: bool,

    /// Run one command and exit; without one, read commands from stdin
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Shell(ShellAction),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// One line typed at the interactive prompt.
#[derive(Parser)]
#[command(multicall = true)]
pub struct ReplLine {
    #[command(subcommand)]
    pub action: ReplAction,
}

#[derive(Subcommand)]
pub enum ReplAction {
    #[command(flatten)]
    Shell(ShellAction),
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ShellAction {
    /// Enter a board or list
    Cd { path: Option<String> },
    /// List what a path contains
    Ls { path: Option<String> },
    /// Show a board, list, card or comment
    Cat { path: String },
    /// Print the current location
    Pwd,
    /// Create a card
    Touch {
        path: String,
        description: Option<String>,
    },
    /// Move or rename a card
    Mv { source: String, destination: String },
    /// Copy a card
    Cp { source: String, destination: String },
    /// Archive a card
    Rm { path: String },
    /// Change card fields
    Edit(EditArgs),
    /// Comment on a card
    Comment { path: String, text: String },
    /// Complete a partial path
    Complete { partial: Option<String> },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct EditArgs {
    pub path: String,
    #[arg(long)]
    pub name: Option<String>,
    /// New description; an empty value clears it
    #[arg(long = "desc")]
    pub description: Option<String>,
    #[arg(long = "pos")]
    pub position: Option<f64>,
    /// Label name; repeat to set several. Replaces the card's labels
    #[arg(long = "label")]
    pub labels: Vec<String>,
    /// Remove every label from the card
    #[arg(long, conflicts_with = "labels")]
    pub clear_labels: bool,
}

impl From<ShellAction> for ShellCommand {
    fn from(action: ShellAction) -> Self {
        match action {
            ShellAction::Cd { path } => ShellCommand::Cd(ChangeDirectory {
                path: path.unwrap_or_else(|| "/".to_string()),
            }),
            ShellAction::Ls { path } => ShellCommand::Ls(ListContents {
                path: path.unwrap_or_default(),
            }),
            ShellAction::Cat { path } => ShellCommand::Cat(Show { path }),
            ShellAction::Pwd => ShellCommand::Pwd(PrintWorkingDirectory),
            ShellAction::Touch { path, description } => {
                ShellCommand::Touch(CreateCard { path, description })
            }
            ShellAction::Mv {
                source,
                destination,
            } => ShellCommand::Mv(MoveCard {
                source,
                destination,
            }),
            ShellAction::Cp {
                source,
                destination,
            } => ShellCommand::Cp(CopyCard {
                source,
                destination,
            }),
            ShellAction::Rm { path } => ShellCommand::Rm(ArchiveCard { path }),
            ShellAction::Edit(args) => {
                let labels = if args.clear_labels {
                    Some(Vec::new())
                } else if args.labels.is_empty() {
                    None
                } else {
                    Some(args.labels)
                };
                ShellCommand::Edit(EditCard {
                    path: args.path,
                    name: args.name,
                    description: args.description,
                    position: args.position,
                    labels,
                })
            }
            ShellAction::Comment { path, text } => ShellCommand::Comment(AddComment { path, text }),
            ShellAction::Complete { partial } => ShellCommand::Complete(CompletePath {
                partial: partial.unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn repl(words: &[&str]) -> ReplAction {
        ReplLine::try_parse_from(words).unwrap().action
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
        ReplLine::command().debug_assert();
    }

    #[test]
    fn test_bare_cd_goes_to_root() {
        match repl(&["cd"]) {
            ReplAction::Shell(action) => assert_eq!(
                ShellCommand::from(action),
                ShellCommand::Cd(ChangeDirectory { path: "/".into() })
            ),
            ReplAction::Exit => panic!("parsed exit"),
        }
    }

    #[test]
    fn test_edit_flags() {
        let action = match repl(&[
            "edit", "Ship it", "--name", "Shipped", "--desc", "", "--label", "bug", "--label",
            "ops",
        ]) {
            ReplAction::Shell(action) => action,
            ReplAction::Exit => panic!("parsed exit"),
        };
        assert_eq!(
            ShellCommand::from(action),
            ShellCommand::Edit(EditCard {
                path: "Ship it".into(),
                name: Some("Shipped".into()),
                description: Some(String::new()),
                position: None,
                labels: Some(vec!["bug".into(), "ops".into()]),
            })
        );
    }

    #[test]
    fn test_exit_and_unknown_commands() {
        assert!(matches!(repl(&["exit"]), ReplAction::Exit));
        assert!(matches!(repl(&["quit"]), ReplAction::Exit));
        assert!(ReplLine::try_parse_from(["frobnicate"]).is_err());
    }

    #[test]
    fn test_one_shot_command_with_file() {
        let cli = Cli::try_parse_from(["trellis", "--file", "boards.json", "ls", "/Board A"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("boards.json")));
        assert!(matches!(
            cli.command,
            Some(Commands::Shell(ShellAction::Ls { path: Some(ref p) })) if p == "/Board A"
        ));
    }
}
