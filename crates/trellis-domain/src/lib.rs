pub mod board;
pub mod cache;
pub mod card;
pub mod chain;
pub mod commands;
pub mod comment;
pub mod completion;
pub mod field_update;
pub mod identity;
pub mod label;
pub mod list;
pub mod memory;
pub mod operations;
pub mod path;
pub mod session;

pub use board::{Board, BoardId};
pub use cache::CachedRepository;
pub use card::{Card, CardCreate, CardId, CardUpdate};
pub use chain::{ChainResult, ChainState, ChainStatus, HookContext, ResolutionChain, Resolved, Step};
pub use commands::{Command, CommandContext, CommandOutput, Execution, ShellCommand};
pub use comment::{Comment, CommentCreate, CommentId};
pub use completion::complete;
pub use field_update::FieldUpdate;
pub use label::{Label, LabelId};
pub use list::{List, ListId};
pub use memory::{InMemoryRepository, RepositorySnapshot};
pub use operations::Repository;
pub use path::{escape_segment, resolve_path, Path, PathResolver, Segment};
pub use session::Session;
