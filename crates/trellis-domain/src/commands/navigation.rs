use super::{Command, CommandContext, CommandOutput, Execution};
use crate::chain::{ResolutionChain, Step};
use crate::completion::complete;
use crate::operations::Repository;
use crate::session::Session;
use trellis_core::{TrellisError, TrellisResult};

/// Enter a board or a list
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeDirectory {
    pub path: String,
}

impl Command for ChangeDirectory {
    fn execute<R: Repository + ?Sized>(
        &self,
        context: &mut CommandContext<'_, R>,
    ) -> TrellisResult<Execution> {
        let mut entered = None;
        ResolutionChain::start(&mut *context.repo)
            .resolve_path(&self.path, context.session)
            .on_root(|_| {
                entered = Some(Session::new());
                Ok(Step::Done)
            })
            .find_board()
            .on_board(|_, board| {
                entered = Some(Session::at_board(board.clone()));
                Ok(Step::Done)
            })
            .find_list()
            .on_list(|_, board, list| {
                entered = Some(Session::at_list(board.clone(), list.clone()));
                Ok(Step::Done)
            })
            .find_card()
            .on_card(|_, _, _, card| {
                Err(TrellisError::Unsupported(format!(
                    "cannot enter card {}",
                    card.name
                )))
            })
            .find_comment()
            .on_comment(|_, _, comment| {
                Err(TrellisError::Unsupported(format!(
                    "cannot enter comment {}",
                    comment.id
                )))
            })
            .finish()
            .require_terminal("enter")?;

        let session = entered.ok_or_else(|| TrellisError::Internal("cd resolved nothing".into()))?;
        tracing::debug!(path = %session.path(), "changed directory");
        Ok(Execution::enter(session))
    }

    fn description(&self) -> String {
        format!("Change directory to '{}'", self.path)
    }
}

/// List the children of whatever the path names
#[derive(Debug, Clone, PartialEq)]
pub struct ListContents {
    pub path: String,
}

impl Command for ListContents {
    fn execute<R: Repository + ?Sized>(
        &self,
        context: &mut CommandContext<'_, R>,
    ) -> TrellisResult<Execution> {
        let mut output = None;
        ResolutionChain::start(&mut *context.repo)
            .resolve_path(&self.path, context.session)
            .on_root(|cx| {
                output = Some(CommandOutput::Boards(cx.repo().get_boards()?));
                Ok(Step::Done)
            })
            .find_board()
            .on_board(|cx, board| {
                output = Some(CommandOutput::Lists(cx.repo().get_lists(&board.id)?));
                Ok(Step::Done)
            })
            .find_list()
            .on_list(|cx, _, list| {
                output = Some(CommandOutput::Cards(cx.repo().get_cards(&list.id)?));
                Ok(Step::Done)
            })
            .find_card()
            .on_card(|cx, _, _, card| {
                output = Some(CommandOutput::Comments(cx.repo().get_comments(&card.id)?));
                Ok(Step::Done)
            })
            .find_comment()
            .on_comment(|_, _, comment| {
                output = Some(CommandOutput::Comment(comment.clone()));
                Ok(Step::Done)
            })
            .finish()
            .require_terminal("list")?;

        output
            .map(Execution::output)
            .ok_or_else(|| TrellisError::Internal("ls produced no output".into()))
    }

    fn description(&self) -> String {
        format!("List '{}'", self.path)
    }
}

/// Show the entity a path names.
///
/// A trailing slash asks for the contents of a level rather than the level
/// itself, which `cat` has nothing to say about.
#[derive(Debug, Clone, PartialEq)]
pub struct Show {
    pub path: String,
}

impl Command for Show {
    fn execute<R: Repository + ?Sized>(
        &self,
        context: &mut CommandContext<'_, R>,
    ) -> TrellisResult<Execution> {
        let mut output = None;
        ResolutionChain::start(&mut *context.repo)
            .resolve_path(&self.path, context.session)
            .on_root(|_| Err(TrellisError::NothingToDo("nothing to show at /".into())))
            .find_board()
            .on_board(|cx, board| {
                if cx.path().list().is_present() {
                    return Ok(Step::Continue);
                }
                output = Some(CommandOutput::Board(board.clone()));
                Ok(Step::Done)
            })
            .find_list()
            .on_list(|cx, _, list| {
                if cx.path().card().is_present() {
                    return Ok(Step::Continue);
                }
                output = Some(CommandOutput::List(list.clone()));
                Ok(Step::Done)
            })
            .find_card()
            .on_card(|cx, _, _, card| {
                if cx.path().comment().is_present() {
                    return Ok(Step::Continue);
                }
                output = Some(CommandOutput::Card(card.clone()));
                Ok(Step::Done)
            })
            .find_comment()
            .on_comment(|_, _, comment| {
                output = Some(CommandOutput::Comment(comment.clone()));
                Ok(Step::Done)
            })
            .finish()
            .require_terminal("show")?;

        output
            .map(Execution::output)
            .ok_or_else(|| TrellisError::Internal("cat produced no output".into()))
    }

    fn description(&self) -> String {
        format!("Show '{}'", self.path)
    }
}

/// Print the session's location
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrintWorkingDirectory;

impl Command for PrintWorkingDirectory {
    fn execute<R: Repository + ?Sized>(
        &self,
        context: &mut CommandContext<'_, R>,
    ) -> TrellisResult<Execution> {
        Ok(Execution::output(CommandOutput::Path(
            context.session.path().to_string(),
        )))
    }

    fn description(&self) -> String {
        "Print working directory".to_string()
    }
}

/// Offer completions for a partial path
#[derive(Debug, Clone, PartialEq)]
pub struct CompletePath {
    pub partial: String,
}

impl Command for CompletePath {
    fn execute<R: Repository + ?Sized>(
        &self,
        context: &mut CommandContext<'_, R>,
    ) -> TrellisResult<Execution> {
        let candidates = complete(&mut *context.repo, context.session, &self.partial)?;
        Ok(Execution::output(CommandOutput::Candidates(candidates)))
    }

    fn description(&self) -> String {
        format!("Complete '{}'", self.partial)
    }
}
