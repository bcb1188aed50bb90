//! Filesystem-like addressing of the board/list/card/comment hierarchy.
//!
//! A [`Path`] has four slots. Each slot is absent, explicitly empty (the raw
//! input ended in `/` right before it) or named. Slots never skip a level:
//! once a slot is not named, every slot after it is absent or empty.
//!
//! [`PathResolver`] turns raw input into a [`Path`] relative to the current
//! board and list, using POSIX join/clean rules over the synthetic root `/`.

use std::borrow::Cow;
use std::fmt;

use trellis_core::{TrellisError, TrellisResult};

use crate::session::Session;

/// Board, list, card, comment.
pub const MAX_DEPTH: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Segment {
    /// Nothing was given for this level.
    #[default]
    Absent,
    /// The level was opened with a trailing `/` but not named.
    Empty,
    Named(String),
}

impl Segment {
    pub fn name(&self) -> Option<&str> {
        match self {
            Segment::Named(name) => Some(name),
            _ => None,
        }
    }

    /// The name, or `""` when the slot is absent or empty.
    pub fn as_str(&self) -> &str {
        self.name().unwrap_or("")
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Segment::Named(_))
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Segment::Absent)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    board: Segment,
    list: Segment,
    card: Segment,
    comment: Segment,
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from positional names. A trailing `/` opens the next
    /// level as [`Segment::Empty`].
    pub fn from_names<S: AsRef<str>>(names: &[S], trailing_slash: bool) -> TrellisResult<Self> {
        if names.len() > MAX_DEPTH {
            return Err(TrellisError::InvalidPath(format!(
                "at most {} segments are allowed, got {}",
                MAX_DEPTH,
                names.len()
            )));
        }
        if let Some(blank) = names.iter().position(|n| n.as_ref().is_empty()) {
            return Err(TrellisError::InvalidPath(format!(
                "segment {} is empty",
                blank + 1
            )));
        }

        let mut slots: [Segment; MAX_DEPTH] = Default::default();
        for (slot, name) in slots.iter_mut().zip(names) {
            *slot = Segment::Named(name.as_ref().to_string());
        }
        if trailing_slash && !names.is_empty() && names.len() < MAX_DEPTH {
            slots[names.len()] = Segment::Empty;
        }

        let [board, list, card, comment] = slots;
        Ok(Self {
            board,
            list,
            card,
            comment,
        })
    }

    /// Path for an ambient board/list pair; empty strings stop the path.
    pub fn ambient(board: &str, list: &str) -> Self {
        let names: Vec<&str> = [board, list]
            .into_iter()
            .take_while(|n| !n.is_empty())
            .collect();
        let [board, list, ..] = Self::slots_for(&names);
        Self {
            board,
            list,
            ..Self::default()
        }
    }

    fn slots_for(names: &[&str]) -> [Segment; MAX_DEPTH] {
        let mut slots: [Segment; MAX_DEPTH] = Default::default();
        for (slot, name) in slots.iter_mut().zip(names) {
            *slot = Segment::Named((*name).to_string());
        }
        slots
    }

    pub fn board(&self) -> &Segment {
        &self.board
    }

    pub fn list(&self) -> &Segment {
        &self.list
    }

    pub fn card(&self) -> &Segment {
        &self.card
    }

    pub fn comment(&self) -> &Segment {
        &self.comment
    }

    pub fn board_name(&self) -> &str {
        self.board.as_str()
    }

    pub fn list_name(&self) -> &str {
        self.list.as_str()
    }

    pub fn card_name(&self) -> &str {
        self.card.as_str()
    }

    pub fn comment_id(&self) -> &str {
        self.comment.as_str()
    }

    pub fn segments(&self) -> [&Segment; MAX_DEPTH] {
        [&self.board, &self.list, &self.card, &self.comment]
    }

    pub fn names(&self) -> Vec<&str> {
        self.segments().into_iter().filter_map(Segment::name).collect()
    }

    pub fn depth(&self) -> usize {
        self.names().len()
    }

    pub fn is_root(&self) -> bool {
        self.depth() == 0
    }

    /// True when the input ended with `/` after the deepest named segment.
    pub fn has_trailing_slash(&self) -> bool {
        self.segments().contains(&&Segment::Empty)
    }

    /// Name of the deepest named segment.
    pub fn last_name(&self) -> Option<&str> {
        self.names().last().copied()
    }
}

/// Renders `/board/list/...`, escaping `/` and `\` inside names so the
/// output resolves back to the same path.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names();
        if names.is_empty() {
            return f.write_str("/");
        }
        for name in &names {
            write!(f, "/{}", escape_segment(name))?;
        }
        if self.has_trailing_slash() {
            f.write_str("/")?;
        }
        Ok(())
    }
}

/// Resolves raw path strings against an ambient board and list.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    board: &'a str,
    list: &'a str,
}

impl<'a> PathResolver<'a> {
    /// A list without a board is ignored.
    pub fn new(board: &'a str, list: &'a str) -> Self {
        if board.is_empty() {
            Self { board, list: "" }
        } else {
            Self { board, list }
        }
    }

    pub fn resolve(&self, raw: &str) -> TrellisResult<Path> {
        self.resolve_inherited(raw).map(|(path, _)| path)
    }

    /// Like [`resolve`](Self::resolve), also returning how many leading slots
    /// of the result are still the ambient board and list, untouched by `..`.
    pub fn resolve_inherited(&self, raw: &str) -> TrellisResult<(Path, usize)> {
        let ambient: Vec<String> = [self.board, self.list]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if raw.is_empty() {
            return Ok((Path::ambient(self.board, self.list), ambient.len()));
        }

        let absolute = raw.starts_with('/');
        let parts = split_segments(raw);
        let trailing_slash =
            raw.len() > 1 && parts.len() > 1 && parts.last().is_some_and(String::is_empty);

        let mut stack: Vec<String> = Vec::with_capacity(MAX_DEPTH);
        if !absolute {
            stack.extend(ambient);
        }
        let mut inherited = stack.len();

        for part in parts {
            match part.as_str() {
                "" | "." => {}
                ".." => {
                    if stack.pop().is_none() && !absolute {
                        return Err(TrellisError::InvalidPath(format!(
                            "'{}' goes above the root",
                            raw
                        )));
                    }
                    inherited = inherited.min(stack.len());
                }
                _ => stack.push(part),
            }
        }

        if stack.is_empty() {
            return Ok((Path::root(), 0));
        }
        let path = Path::from_names(&stack, trailing_slash).map_err(|e| match e {
            TrellisError::InvalidPath(reason) => {
                TrellisError::InvalidPath(format!("'{}': {}", raw, reason))
            }
            other => other,
        })?;
        Ok((path, inherited))
    }
}

/// Splits raw input on `/`. `\/` keeps a slash inside a name and `\\` is a
/// literal backslash; any other backslash is kept as is.
fn split_segments(raw: &str) -> Vec<String> {
    let mut parts = vec![String::new()];
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        let Some(current) = parts.last_mut() else {
            break;
        };
        match c {
            '\\' => match chars.next() {
                Some(escaped @ ('/' | '\\')) => current.push(escaped),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            '/' => parts.push(String::new()),
            c => current.push(c),
        }
    }
    parts
}

/// Renders a name so that it reads back as a single path segment.
pub fn escape_segment(name: &str) -> Cow<'_, str> {
    if name.contains(['/', '\\']) {
        Cow::Owned(name.replace('\\', "\\\\").replace('/', "\\/"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Resolves `raw` relative to the board and list entered in `session`.
pub fn resolve_path(raw: &str, session: &Session) -> TrellisResult<Path> {
    let (board, list) = session.ambient_names();
    PathResolver::new(&board, &list).resolve(raw)
}
