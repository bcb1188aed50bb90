use std::path::PathBuf;

use anyhow::{anyhow, Context};
use trellis_core::{AppConfig, TrellisResult};
use trellis_domain::commands::ChangeDirectory;
use trellis_domain::{
    CachedRepository, Command, CommandContext, CommandOutput, Repository, Session, ShellCommand,
};
use trellis_persistence::JsonFileRepository;

/// Everything a running shell owns: the repository handle, the current
/// session and the loaded config.
pub struct AppContext {
    repository: Box<dyn Repository>,
    session: Session,
    config: AppConfig,
}

impl AppContext {
    pub fn new(repository: Box<dyn Repository>, config: AppConfig) -> Self {
        Self {
            repository,
            session: Session::new(),
            config,
        }
    }

    /// Opens the data file named by `file` or the config, wraps it in the
    /// lookup cache unless disabled, and enters the configured start path.
    pub fn open(file: Option<PathBuf>, no_cache: bool, config: AppConfig) -> anyhow::Result<Self> {
        let path = file.or_else(|| config.data_file.clone()).ok_or_else(|| {
            anyhow!("no data file given: pass --file, set TRELLIS_FILE, or set data_file in the config")
        })?;
        let repo = JsonFileRepository::open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let repository: Box<dyn Repository> = if config.cache && !no_cache {
            Box::new(CachedRepository::new(repo))
        } else {
            tracing::debug!("lookup cache disabled");
            Box::new(repo)
        };

        let mut ctx = Self::new(repository, config);
        if let Some(start) = ctx.config.start_path.clone() {
            ctx.execute(&ShellCommand::Cd(ChangeDirectory {
                path: start.clone(),
            }))
            .with_context(|| format!("cannot enter start_path {}", start))?;
        }
        Ok(ctx)
    }

    /// Runs one command. The session is replaced only when the command
    /// succeeds and proposes a new one.
    pub fn execute(&mut self, command: &ShellCommand) -> TrellisResult<CommandOutput> {
        tracing::debug!(command = %command.description(), session = %self.session.path(), "executing");
        let execution = {
            let mut context = CommandContext::new(&mut *self.repository, &self.session);
            command.execute(&mut context)?
        };
        if let Some(session) = execution.session {
            self.session = session;
        }
        Ok(execution.output)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn prompt(&self) -> String {
        format!("{}{}", self.session.path(), self.config.effective_prompt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_domain::commands::{ListContents, PrintWorkingDirectory};
    use trellis_domain::InMemoryRepository;

    fn context() -> AppContext {
        let mut repo = InMemoryRepository::new();
        let board = repo.add_board("Board A");
        repo.add_list(&board.id, "Todo");
        AppContext::new(Box::new(CachedRepository::new(repo)), AppConfig::default())
    }

    #[test]
    fn test_session_follows_successful_cd() {
        let mut ctx = context();
        ctx.execute(&ShellCommand::Cd(ChangeDirectory {
            path: "/Board A/Todo".into(),
        }))
        .unwrap();
        assert_eq!(ctx.session().current_list().unwrap().name, "Todo");
        assert!(ctx.prompt().ends_with("/Todo> "));
    }

    #[test]
    fn test_failed_command_keeps_session() {
        let mut ctx = context();
        ctx.execute(&ShellCommand::Cd(ChangeDirectory {
            path: "/Board A".into(),
        }))
        .unwrap();
        let before = ctx.session().clone();

        let err = ctx
            .execute(&ShellCommand::Cd(ChangeDirectory {
                path: "Nope".into(),
            }))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(ctx.session(), &before);

        let listing = ctx
            .execute(&ShellCommand::Ls(ListContents { path: "".into() }))
            .unwrap();
        assert!(matches!(listing, CommandOutput::Lists(ref lists) if lists.len() == 1));
        assert!(matches!(
            ctx.execute(&ShellCommand::Pwd(PrintWorkingDirectory)).unwrap(),
            CommandOutput::Path(ref p) if p.starts_with("/Board A")
        ));
    }

    #[test]
    fn test_open_requires_a_file() {
        let config = AppConfig::default();
        assert!(AppContext::open(None, false, config).is_err());
    }

    #[test]
    fn test_open_enters_start_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boards.json");
        let mut seed = InMemoryRepository::new();
        seed.add_board("Board A");
        trellis_persistence::JsonFileStore::new(&path)
            .save(seed.snapshot())
            .unwrap();

        let config = AppConfig {
            start_path: Some("/Board A".into()),
            ..Default::default()
        };
        let ctx = AppContext::open(Some(path), true, config).unwrap();
        assert_eq!(ctx.session().current_board().unwrap().name, "Board A");
    }
}
