use trellis_core::TrellisResult;

use crate::operations::Repository;
use crate::session::Session;
use crate::{Board, Card, Comment, List};

pub mod card_commands;
pub mod navigation;

pub use card_commands::*;
pub use navigation::*;

/// A user command that resolves paths and talks to the repository.
pub trait Command {
    /// Runs the command. Failures leave the session untouched; the caller
    /// swaps in `Execution::session` only on success.
    fn execute<R: Repository + ?Sized>(
        &self,
        context: &mut CommandContext<'_, R>,
    ) -> TrellisResult<Execution>;

    /// Human-readable description of what this command does
    fn description(&self) -> String;
}

pub struct CommandContext<'a, R: ?Sized> {
    pub repo: &'a mut R,
    pub session: &'a Session,
}

impl<'a, R: ?Sized> CommandContext<'a, R> {
    pub fn new(repo: &'a mut R, session: &'a Session) -> Self {
        Self { repo, session }
    }
}

/// What a command produced, for the caller to render.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    Boards(Vec<Board>),
    Lists(Vec<List>),
    Cards(Vec<Card>),
    Comments(Vec<Comment>),
    Board(Board),
    List(List),
    Card(Card),
    Comment(Comment),
    Path(String),
    Candidates(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub output: CommandOutput,
    /// Replacement session, when the command changes location.
    pub session: Option<Session>,
}

impl Execution {
    pub fn output(output: CommandOutput) -> Self {
        Self {
            output,
            session: None,
        }
    }

    pub fn enter(session: Session) -> Self {
        Self {
            output: CommandOutput::Path(session.path().to_string()),
            session: Some(session),
        }
    }
}

/// Every command the shell understands.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Cd(ChangeDirectory),
    Ls(ListContents),
    Cat(Show),
    Pwd(PrintWorkingDirectory),
    Complete(CompletePath),
    Touch(CreateCard),
    Mv(MoveCard),
    Cp(CopyCard),
    Rm(ArchiveCard),
    Edit(EditCard),
    Comment(AddComment),
}

impl Command for ShellCommand {
    fn execute<R: Repository + ?Sized>(
        &self,
        context: &mut CommandContext<'_, R>,
    ) -> TrellisResult<Execution> {
        match self {
            ShellCommand::Cd(cmd) => cmd.execute(context),
            ShellCommand::Ls(cmd) => cmd.execute(context),
            ShellCommand::Cat(cmd) => cmd.execute(context),
            ShellCommand::Pwd(cmd) => cmd.execute(context),
            ShellCommand::Complete(cmd) => cmd.execute(context),
            ShellCommand::Touch(cmd) => cmd.execute(context),
            ShellCommand::Mv(cmd) => cmd.execute(context),
            ShellCommand::Cp(cmd) => cmd.execute(context),
            ShellCommand::Rm(cmd) => cmd.execute(context),
            ShellCommand::Edit(cmd) => cmd.execute(context),
            ShellCommand::Comment(cmd) => cmd.execute(context),
        }
    }

    fn description(&self) -> String {
        match self {
            ShellCommand::Cd(cmd) => cmd.description(),
            ShellCommand::Ls(cmd) => cmd.description(),
            ShellCommand::Cat(cmd) => cmd.description(),
            ShellCommand::Pwd(cmd) => cmd.description(),
            ShellCommand::Complete(cmd) => cmd.description(),
            ShellCommand::Touch(cmd) => cmd.description(),
            ShellCommand::Mv(cmd) => cmd.description(),
            ShellCommand::Cp(cmd) => cmd.description(),
            ShellCommand::Rm(cmd) => cmd.description(),
            ShellCommand::Edit(cmd) => cmd.description(),
            ShellCommand::Comment(cmd) => cmd.description(),
        }
    }
}
