//! Sequential, short-circuiting resolution of a [`Path`] against a repository.
//!
//! A chain walks board, list, card and comment in that order. Each `find_*`
//! stage looks its segment up only when the segment is named; hooks run
//! caller actions against what has been resolved so far. The first error
//! moves the chain to [`ChainState::Failed`], after which every stage and hook
//! is a no-op. A hook returning [`Step::Done`] finishes the chain the same way,
//! but successfully.
//!
//! ```
//! use trellis_domain::chain::{ResolutionChain, Step};
//! use trellis_domain::memory::InMemoryRepository;
//! use trellis_domain::Session;
//!
//! let mut repo = InMemoryRepository::new();
//! let board = repo.add_board("Board A");
//! let list = repo.add_list(&board.id, "List 1");
//! repo.add_card(&list, "Card 1");
//!
//! let mut seen = None;
//! let result = ResolutionChain::start(&mut repo)
//!     .resolve_path("/Board A/List 1/Card 1", &Session::new())
//!     .find_board()
//!     .find_list()
//!     .find_card()
//!     .on_card(|_, _, _, card| {
//!         seen = Some(card.name.clone());
//!         Ok(Step::Done)
//!     })
//!     .finish();
//!
//! assert!(result.reached_terminal());
//! assert_eq!(seen.as_deref(), Some("Card 1"));
//! ```

use trellis_core::{TrellisError, TrellisResult};

use crate::operations::Repository;
use crate::path::{Path, PathResolver};
use crate::session::Session;
use crate::{Board, Card, Comment, List};

/// What a hook tells the chain to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Not handled at this level; later stages and hooks still run.
    Continue,
    /// The terminal action ran; the chain is finished.
    Done,
}

#[derive(Debug)]
pub enum ChainState {
    /// Path resolved, nothing looked up yet.
    Pending,
    ResolvingBoard,
    ResolvingList,
    ResolvingCard,
    ResolvingComment,
    /// A hook performed the terminal action.
    Done,
    /// Absorbing: the first error encountered.
    Failed(TrellisError),
}

impl ChainState {
    fn order(&self) -> Option<u8> {
        match self {
            ChainState::Pending => Some(0),
            ChainState::ResolvingBoard => Some(1),
            ChainState::ResolvingList => Some(2),
            ChainState::ResolvingCard => Some(3),
            ChainState::ResolvingComment => Some(4),
            ChainState::Done | ChainState::Failed(_) => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ChainState::Pending => "pending",
            ChainState::ResolvingBoard => "board",
            ChainState::ResolvingList => "list",
            ChainState::ResolvingCard => "card",
            ChainState::ResolvingComment => "comment",
            ChainState::Done => "done",
            ChainState::Failed(_) => "failed",
        }
    }
}

/// Entities found so far. A level is only filled once every level above it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolved {
    pub board: Option<Board>,
    pub list: Option<List>,
    pub card: Option<Card>,
    pub comment: Option<Comment>,
}

/// What a hook sees besides the entities passed to it.
pub struct HookContext<'a, R: ?Sized> {
    repo: &'a mut R,
    path: &'a Path,
    resolved: &'a Resolved,
}

impl<R: ?Sized> HookContext<'_, R> {
    pub fn repo(&mut self) -> &mut R {
        self.repo
    }

    pub fn path(&self) -> &Path {
        self.path
    }

    pub fn resolved(&self) -> &Resolved {
        self.resolved
    }
}

/// A chain that has a repository but no path yet.
pub struct ChainStart<'r, R: ?Sized> {
    repo: &'r mut R,
}

impl<'r, R: Repository + ?Sized> ChainStart<'r, R> {
    /// Resolves `raw` against `session`. A malformed path fails the chain
    /// before any repository call.
    ///
    /// Ambient slots the raw path keeps are bound to the session's own board
    /// and list rather than looked up again by name, so a list that shares its
    /// name with a sibling still resolves to the one that was entered.
    pub fn resolve_path(self, raw: &str, session: &Session) -> ResolutionChain<'r, R> {
        let (board, list) = session.ambient_names();
        match PathResolver::new(&board, &list).resolve_inherited(raw) {
            Ok((path, inherited)) => {
                let mut chain = self.with_path(path);
                if inherited >= 1 {
                    chain.entered_board = session.current_board().cloned();
                }
                if inherited >= 2 {
                    chain.entered_list = session.current_list().cloned();
                }
                chain
            }
            Err(e) => ResolutionChain {
                repo: self.repo,
                path: Path::root(),
                resolved: Resolved::default(),
                entered_board: None,
                entered_list: None,
                state: ChainState::Failed(e),
            },
        }
    }

    pub fn with_path(self, path: Path) -> ResolutionChain<'r, R> {
        ResolutionChain {
            repo: self.repo,
            path,
            resolved: Resolved::default(),
            entered_board: None,
            entered_list: None,
            state: ChainState::Pending,
        }
    }
}

pub struct ResolutionChain<'r, R: ?Sized> {
    repo: &'r mut R,
    path: Path,
    resolved: Resolved,
    entered_board: Option<Board>,
    entered_list: Option<List>,
    state: ChainState,
}

impl<'r, R: Repository + ?Sized> ResolutionChain<'r, R> {
    pub fn start(repo: &'r mut R) -> ChainStart<'r, R> {
        ChainStart { repo }
    }

    pub fn state(&self) -> &ChainState {
        &self.state
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn resolved(&self) -> &Resolved {
        &self.resolved
    }

    pub fn is_active(&self) -> bool {
        self.state.order().is_some()
    }

    /// Moves from the stage before `next` to `next`. Returns false when the
    /// chain is finished or the stages were called out of order, which
    /// fails the chain.
    fn enter(&mut self, next: ChainState) -> bool {
        let (Some(current), Some(target)) = (self.state.order(), next.order()) else {
            return false;
        };
        if current + 1 != target {
            let error = TrellisError::Internal(format!(
                "cannot resolve {} after {}",
                next.name(),
                self.state.name()
            ));
            self.state = ChainState::Failed(error);
            return false;
        }
        tracing::debug!(stage = next.name(), path = %self.path, "resolving");
        self.state = next;
        true
    }

    fn fail(&mut self, error: TrellisError) {
        tracing::debug!(stage = self.state.name(), path = %self.path, %error, "resolution failed");
        self.state = ChainState::Failed(error);
    }

    fn settle(&mut self, outcome: TrellisResult<Step>) {
        match outcome {
            Ok(Step::Continue) => {}
            Ok(Step::Done) => self.state = ChainState::Done,
            Err(e) => self.fail(e),
        }
    }

    fn missing_parent(&mut self, level: &str) {
        self.fail(TrellisError::Internal(format!(
            "{} segment named without a resolved parent",
            level
        )));
    }

    pub fn find_board(mut self) -> Self {
        if !self.enter(ChainState::ResolvingBoard) {
            return self;
        }
        let Some(name) = self.path.board().name() else {
            return self;
        };
        let found = match self.entered_board.take() {
            Some(board) => {
                tracing::debug!(board_id = %board.id, "using entered board");
                Ok(board)
            }
            None => self.repo.find_board(name),
        };
        match found {
            Ok(board) => self.resolved.board = Some(board),
            Err(e) => self.fail(e),
        }
        self
    }

    pub fn find_list(mut self) -> Self {
        if !self.enter(ChainState::ResolvingList) {
            return self;
        }
        let Some(name) = self.path.list().name() else {
            return self;
        };
        let Some(board) = &self.resolved.board else {
            self.missing_parent("list");
            return self;
        };
        let found = match self.entered_list.take() {
            Some(list) => {
                tracing::debug!(list_id = %list.id, "using entered list");
                Ok(list)
            }
            None => self.repo.find_list(&board.id, name),
        };
        match found {
            Ok(list) => self.resolved.list = Some(list),
            Err(e) => self.fail(e),
        }
        self
    }

    pub fn find_card(mut self) -> Self {
        if !self.enter(ChainState::ResolvingCard) {
            return self;
        }
        let Some(name) = self.path.card().name() else {
            return self;
        };
        let Some(list) = &self.resolved.list else {
            self.missing_parent("card");
            return self;
        };
        match self.repo.find_card(&list.id, name) {
            Ok(card) => self.resolved.card = Some(card),
            Err(e) => self.fail(e),
        }
        self
    }

    pub fn find_comment(mut self) -> Self {
        if !self.enter(ChainState::ResolvingComment) {
            return self;
        }
        let Some(id) = self.path.comment().name() else {
            return self;
        };
        let Some(card) = &self.resolved.card else {
            self.missing_parent("comment");
            return self;
        };
        match self.repo.find_comment(&card.id, id) {
            Ok(comment) => self.resolved.comment = Some(comment),
            Err(e) => self.fail(e),
        }
        self
    }

    /// Every stage in order.
    pub fn find_all(self) -> Self {
        self.find_board().find_list().find_card().find_comment()
    }

    /// Runs `hook` with whatever is resolved, as long as the chain is active.
    pub fn then<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&mut HookContext<'_, R>) -> TrellisResult<Step>,
    {
        if !self.is_active() {
            return self;
        }
        let mut cx = HookContext {
            repo: &mut *self.repo,
            path: &self.path,
            resolved: &self.resolved,
        };
        let outcome = hook(&mut cx);
        self.settle(outcome);
        self
    }

    /// Runs when the path names no board.
    pub fn on_root<F>(self, hook: F) -> Self
    where
        F: FnOnce(&mut HookContext<'_, R>) -> TrellisResult<Step>,
    {
        if self.path.board().is_named() {
            return self;
        }
        self.then(hook)
    }

    /// Runs when the board is resolved and the path stops there.
    pub fn on_board<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&mut HookContext<'_, R>, &Board) -> TrellisResult<Step>,
    {
        if !self.is_active() || self.path.list().is_named() {
            return self;
        }
        let Some(board) = &self.resolved.board else {
            return self;
        };
        let mut cx = HookContext {
            repo: &mut *self.repo,
            path: &self.path,
            resolved: &self.resolved,
        };
        let outcome = hook(&mut cx, board);
        self.settle(outcome);
        self
    }

    /// Runs when the list is resolved and the path stops there.
    pub fn on_list<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&mut HookContext<'_, R>, &Board, &List) -> TrellisResult<Step>,
    {
        if !self.is_active() || self.path.card().is_named() {
            return self;
        }
        let (Some(board), Some(list)) = (&self.resolved.board, &self.resolved.list) else {
            return self;
        };
        let mut cx = HookContext {
            repo: &mut *self.repo,
            path: &self.path,
            resolved: &self.resolved,
        };
        let outcome = hook(&mut cx, board, list);
        self.settle(outcome);
        self
    }

    /// Runs when the card is resolved and the path stops there.
    pub fn on_card<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&mut HookContext<'_, R>, &Board, &List, &Card) -> TrellisResult<Step>,
    {
        if !self.is_active() || self.path.comment().is_named() {
            return self;
        }
        let (Some(board), Some(list), Some(card)) = (
            &self.resolved.board,
            &self.resolved.list,
            &self.resolved.card,
        ) else {
            return self;
        };
        let mut cx = HookContext {
            repo: &mut *self.repo,
            path: &self.path,
            resolved: &self.resolved,
        };
        let outcome = hook(&mut cx, board, list, card);
        self.settle(outcome);
        self
    }

    /// Runs when the comment is resolved.
    pub fn on_comment<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&mut HookContext<'_, R>, &Card, &Comment) -> TrellisResult<Step>,
    {
        if !self.is_active() {
            return self;
        }
        let (Some(card), Some(comment)) = (&self.resolved.card, &self.resolved.comment) else {
            return self;
        };
        let mut cx = HookContext {
            repo: &mut *self.repo,
            path: &self.path,
            resolved: &self.resolved,
        };
        let outcome = hook(&mut cx, card, comment);
        self.settle(outcome);
        self
    }

    pub fn finish(self) -> ChainResult {
        let status = match self.state {
            ChainState::Failed(error) => ChainStatus::Failed(error),
            ChainState::Done => ChainStatus::Completed {
                reached_terminal: true,
            },
            _ => ChainStatus::Completed {
                reached_terminal: false,
            },
        };
        ChainResult {
            path: self.path,
            resolved: self.resolved,
            status,
        }
    }
}

#[derive(Debug)]
pub enum ChainStatus {
    Completed { reached_terminal: bool },
    Failed(TrellisError),
}

/// Outcome of a chain. On failure `resolved` still holds the last
/// known-good entities.
#[derive(Debug)]
pub struct ChainResult {
    pub path: Path,
    pub resolved: Resolved,
    pub status: ChainStatus,
}

impl ChainResult {
    pub fn error(&self) -> Option<&TrellisError> {
        match &self.status {
            ChainStatus::Failed(error) => Some(error),
            ChainStatus::Completed { .. } => None,
        }
    }

    pub fn reached_terminal(&self) -> bool {
        matches!(
            self.status,
            ChainStatus::Completed {
                reached_terminal: true
            }
        )
    }

    pub fn into_result(self) -> TrellisResult<Resolved> {
        match self.status {
            ChainStatus::Failed(error) => Err(error),
            ChainStatus::Completed { .. } => Ok(self.resolved),
        }
    }

    /// Like [`into_result`](Self::into_result), but a chain in which no
    /// terminal hook ran is reported as `NothingToDo`.
    pub fn require_terminal(self, action: &str) -> TrellisResult<Resolved> {
        match self.status {
            ChainStatus::Failed(error) => Err(error),
            ChainStatus::Completed {
                reached_terminal: true,
            } => Ok(self.resolved),
            ChainStatus::Completed {
                reached_terminal: false,
            } => Err(TrellisError::NothingToDo(format!(
                "cannot {} {}",
                action, self.path
            ))),
        }
    }
}
