use super::{Command, CommandContext, CommandOutput, Execution};
use crate::chain::{ResolutionChain, Step};
use crate::operations::Repository;
use crate::session::Session;
use crate::{Board, Card, CardCreate, CardUpdate, CommentCreate, FieldUpdate, List};
use trellis_core::{find_resource, TrellisError, TrellisResult};

/// Resolves `raw` to an open card. Boards, lists and comments are refused
/// with an error naming `action`.
fn resolve_card<R: Repository + ?Sized>(
    repo: &mut R,
    session: &Session,
    raw: &str,
    action: &str,
) -> TrellisResult<(Board, List, Card)> {
    let mut found = None;
    ResolutionChain::start(repo)
        .resolve_path(raw, session)
        .on_root(|_| Err(TrellisError::NothingToDo(format!("{} needs a card", action))))
        .find_board()
        .on_board(|_, board| {
            Err(TrellisError::Unsupported(format!(
                "cannot {} board {}",
                action, board.name
            )))
        })
        .find_list()
        .on_list(|_, _, list| {
            Err(TrellisError::Unsupported(format!(
                "cannot {} list {}",
                action, list.name
            )))
        })
        .find_card()
        .on_card(|_, board, list, card| {
            found = Some((board.clone(), list.clone(), card.clone()));
            Ok(Step::Done)
        })
        .find_comment()
        .on_comment(|_, _, comment| {
            Err(TrellisError::Unsupported(format!(
                "cannot {} comment {}",
                action, comment.id
            )))
        })
        .finish()
        .require_terminal(action)?;

    found.ok_or_else(|| TrellisError::Internal(format!("{} resolved no card", action)))
}

/// Where a card is moved or copied to: a list, and the card name to use
/// there when the path names one that does not exist yet.
fn resolve_destination<R: Repository + ?Sized>(
    repo: &mut R,
    session: &Session,
    raw: &str,
) -> TrellisResult<(List, Option<String>)> {
    let mut target = None;
    ResolutionChain::start(repo)
        .resolve_path(raw, session)
        .on_root(|_| Err(TrellisError::Validation("destination must name a list".into())))
        .find_board()
        .on_board(|_, board| {
            Err(TrellisError::Validation(format!(
                "destination {} is a board, not a list",
                board.name
            )))
        })
        .find_list()
        .on_list(|_, _, list| {
            target = Some((list.clone(), None));
            Ok(Step::Done)
        })
        .then(|cx| {
            if cx.path().comment().is_present() {
                return Err(TrellisError::InvalidPath(format!(
                    "{} cannot hold a card",
                    cx.path()
                )));
            }
            let list = cx
                .resolved()
                .list
                .clone()
                .ok_or_else(|| TrellisError::Internal("destination list unresolved".into()))?;
            let name = cx.path().card_name().to_string();
            ensure_vacant(cx.repo(), &list, &name)?;
            target = Some((list, Some(name)));
            Ok(Step::Done)
        })
        .finish()
        .require_terminal("use as destination")?;

    target.ok_or_else(|| TrellisError::Internal("destination resolved no list".into()))
}

fn ensure_vacant<R: Repository + ?Sized>(
    repo: &mut R,
    list: &List,
    name: &str,
) -> TrellisResult<()> {
    match repo.find_card(&list.id, name) {
        Ok(existing) => Err(TrellisError::Validation(format!(
            "card {} already exists in {}",
            existing.name, list.name
        ))),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

/// Create a card at the path (touch)
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCard {
    pub path: String,
    pub description: Option<String>,
}

impl Command for CreateCard {
    fn execute<R: Repository + ?Sized>(
        &self,
        context: &mut CommandContext<'_, R>,
    ) -> TrellisResult<Execution> {
        let mut created = None;
        ResolutionChain::start(&mut *context.repo)
            .resolve_path(&self.path, context.session)
            .on_root(|_| Err(TrellisError::NothingToDo("touch needs a card name".into())))
            .find_board()
            .on_board(|_, board| {
                Err(TrellisError::Unsupported(format!(
                    "cannot create inside board {} without a list",
                    board.name
                )))
            })
            .find_list()
            .on_list(|cx, _, list| {
                if cx.path().card().is_present() {
                    return Err(TrellisError::NothingToDo(format!(
                        "no card name given in {}",
                        cx.path()
                    )));
                }
                Err(TrellisError::Unsupported(format!(
                    "{} is an existing list; name a card inside it",
                    list.name
                )))
            })
            .then(|cx| {
                if cx.path().comment().is_present() {
                    return Err(TrellisError::Unsupported(
                        "comments are added with the comment command".into(),
                    ));
                }
                let list = cx
                    .resolved()
                    .list
                    .clone()
                    .ok_or_else(|| TrellisError::Internal("touch without a list".into()))?;
                let name = cx
                    .path()
                    .last_name()
                    .ok_or_else(|| TrellisError::Internal("touch without a card name".into()))?
                    .to_string();
                let card = cx.repo().create_card(CardCreate {
                    list_id: list.id.clone(),
                    name,
                    description: self.description.clone(),
                    ..Default::default()
                })?;
                tracing::info!(card_id = %card.id, list = %list.name, "created card");
                created = Some(card);
                Ok(Step::Done)
            })
            .finish()
            .require_terminal("create")?;

        created
            .map(|card| Execution::output(CommandOutput::Card(card)))
            .ok_or_else(|| TrellisError::Internal("touch created nothing".into()))
    }

    fn description(&self) -> String {
        format!("Create card '{}'", self.path)
    }
}

/// Move a card to another list, renaming it when the destination names a
/// card that does not exist yet
#[derive(Debug, Clone, PartialEq)]
pub struct MoveCard {
    pub source: String,
    pub destination: String,
}

impl Command for MoveCard {
    fn execute<R: Repository + ?Sized>(
        &self,
        context: &mut CommandContext<'_, R>,
    ) -> TrellisResult<Execution> {
        let (_, _, card) = resolve_card(&mut *context.repo, context.session, &self.source, "move")?;
        let (list, name) = resolve_destination(&mut *context.repo, context.session, &self.destination)?;

        let mut update = CardUpdate::new(card.id.clone());
        update.list_id = Some(list.id.clone());
        let relocating = update.is_move(&card);
        if !relocating {
            update.list_id = None;
        }
        update.name = name.filter(|n| *n != card.name);
        if update.is_empty() {
            return Err(TrellisError::NothingToDo(format!(
                "{} is already in {}",
                card.name, list.name
            )));
        }

        let moved = context.repo.update_card(update)?;
        tracing::info!(card_id = %moved.id, list = %list.name, relocating, "moved card");
        Ok(Execution::output(CommandOutput::Card(moved)))
    }

    fn description(&self) -> String {
        format!("Move '{}' to '{}'", self.source, self.destination)
    }
}

/// Copy a card's name, description and labels into another list
#[derive(Debug, Clone, PartialEq)]
pub struct CopyCard {
    pub source: String,
    pub destination: String,
}

impl Command for CopyCard {
    fn execute<R: Repository + ?Sized>(
        &self,
        context: &mut CommandContext<'_, R>,
    ) -> TrellisResult<Execution> {
        let (_, _, card) = resolve_card(&mut *context.repo, context.session, &self.source, "copy")?;
        let (list, name) = resolve_destination(&mut *context.repo, context.session, &self.destination)?;
        let name = match name {
            Some(name) => name,
            None => {
                ensure_vacant(&mut *context.repo, &list, &card.name)?;
                card.name.clone()
            }
        };

        let copy = context.repo.create_card(CardCreate {
            list_id: list.id.clone(),
            name,
            description: card.description.clone(),
            position: None,
            label_ids: card.label_ids(),
        })?;
        tracing::info!(from = %card.id, card_id = %copy.id, "copied card");
        Ok(Execution::output(CommandOutput::Card(copy)))
    }

    fn description(&self) -> String {
        format!("Copy '{}' to '{}'", self.source, self.destination)
    }
}

/// Close a card (rm)
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveCard {
    pub path: String,
}

impl Command for ArchiveCard {
    fn execute<R: Repository + ?Sized>(
        &self,
        context: &mut CommandContext<'_, R>,
    ) -> TrellisResult<Execution> {
        let (_, _, card) = resolve_card(&mut *context.repo, context.session, &self.path, "remove")?;
        let mut update = CardUpdate::new(card.id);
        update.closed = Some(true);
        let archived = context.repo.update_card(update)?;
        tracing::info!(card_id = %archived.id, "archived card");
        Ok(Execution::output(CommandOutput::Card(archived)))
    }

    fn description(&self) -> String {
        format!("Archive card '{}'", self.path)
    }
}

/// Change card fields. An empty description clears it; labels are given by
/// name and replace the card's labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditCard {
    pub path: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub position: Option<f64>,
    pub labels: Option<Vec<String>>,
}

impl EditCard {
    fn build_update<R: Repository + ?Sized>(
        &self,
        repo: &mut R,
        board: &Board,
        card: &Card,
    ) -> TrellisResult<CardUpdate> {
        let mut update = CardUpdate::new(card.id.clone());
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(TrellisError::Validation("card name cannot be empty".into()));
            }
            update.name = Some(name.clone());
        }
        update.description = self
            .description
            .as_deref()
            .map(FieldUpdate::from_input)
            .unwrap_or_default();
        update.position = self.position;
        if let Some(names) = &self.labels {
            let board_labels = repo.get_labels(&board.id)?;
            let ids = names
                .iter()
                .map(|name| find_resource(board_labels.clone(), name).map(|label| label.id))
                .collect::<TrellisResult<Vec<_>>>()?;
            update.label_ids = Some(ids);
        }
        Ok(update)
    }
}

impl Command for EditCard {
    fn execute<R: Repository + ?Sized>(
        &self,
        context: &mut CommandContext<'_, R>,
    ) -> TrellisResult<Execution> {
        let mut edited = None;
        ResolutionChain::start(&mut *context.repo)
            .resolve_path(&self.path, context.session)
            .on_root(|_| Err(TrellisError::NothingToDo("edit needs a card".into())))
            .find_board()
            .on_board(|_, board| {
                Err(TrellisError::Unsupported(format!(
                    "editing board {} is not supported",
                    board.name
                )))
            })
            .find_list()
            .on_list(|_, _, list| {
                Err(TrellisError::Unsupported(format!(
                    "editing list {} is not supported",
                    list.name
                )))
            })
            .find_card()
            .on_card(|cx, board, _, card| {
                let update = self.build_update(cx.repo(), board, card)?;
                if update.is_empty() {
                    return Err(TrellisError::Validation("no changes given".into()));
                }
                edited = Some(cx.repo().update_card(update)?);
                Ok(Step::Done)
            })
            .finish()
            .require_terminal("edit")?;

        let card = edited.ok_or_else(|| TrellisError::Internal("edit changed nothing".into()))?;
        tracing::info!(card_id = %card.id, "edited card");
        Ok(Execution::output(CommandOutput::Card(card)))
    }

    fn description(&self) -> String {
        format!("Edit card '{}'", self.path)
    }
}

/// Add a comment to a card
#[derive(Debug, Clone, PartialEq)]
pub struct AddComment {
    pub path: String,
    pub text: String,
}

impl Command for AddComment {
    fn execute<R: Repository + ?Sized>(
        &self,
        context: &mut CommandContext<'_, R>,
    ) -> TrellisResult<Execution> {
        if self.text.trim().is_empty() {
            return Err(TrellisError::Validation("comment text cannot be empty".into()));
        }
        let (_, _, card) = resolve_card(&mut *context.repo, context.session, &self.path, "comment on")?;
        let comment = context.repo.create_comment(CommentCreate {
            card_id: card.id,
            text: self.text.clone(),
        })?;
        Ok(Execution::output(CommandOutput::Comment(comment)))
    }

    fn description(&self) -> String {
        format!("Comment on '{}'", self.path)
    }
}
