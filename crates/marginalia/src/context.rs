//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds all the state a command handler needs:
//! the loaded configuration, resolved database path, acting user, domain
//! and global flags. [`RuntimeContext::backend`] opens the store and binds
//! the acting user's session.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::debug;

use marginalia_config::{MarginaliaConfig, load_config};
use marginalia_service::{
    LogMailer, Mailer, NoopMailer, Request, RequestOptions, Session, domain_name,
};
use marginalia_storage::{DomainStore, SqliteStore, UserStore};

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Merged configuration (defaults, file, environment).
    pub config: MarginaliaConfig,

    /// Path of the configuration file.
    pub config_path: PathBuf,

    /// Resolved database path: `--db`, else `database` from the config.
    pub db_path: PathBuf,

    /// Login name of the acting user, if any.
    pub user: Option<String>,

    /// Documentation SDK.
    pub sdk: String,

    /// Documentation version.
    pub doc_version: String,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Verbose output.
    pub verbose: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// Loads the config file named by `--config` (a missing file yields the
    /// defaults) layered under `MARGINALIA_*` environment variables.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let config = load_config(&global.config)
            .with_context(|| format!("failed to load {}", global.config.display()))?;

        let db_path = global
            .db
            .clone()
            .unwrap_or_else(|| config.database.clone());

        let user = global
            .user
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        Ok(Self {
            config,
            config_path: global.config.clone(),
            db_path,
            user,
            sdk: global.sdk.clone(),
            doc_version: global.doc_version.clone(),
            json: global.json,
            verbose: global.verbose,
            quiet: global.quiet,
        })
    }

    /// The `tracing_subscriber::EnvFilter` directive to log with.
    pub fn log_filter(&self) -> String {
        if self.verbose {
            "marginalia=debug".to_string()
        } else if self.quiet {
            "marginalia=error".to_string()
        } else {
            std::env::var("RUST_LOG").unwrap_or_else(|_| self.config.log.filter.clone())
        }
    }

    /// Opens the existing database.
    pub fn open_store(&self) -> Result<SqliteStore> {
        if !self.db_path.exists() {
            bail!(
                "no marginalia database found at {}\nHint: run 'marginalia init' to create one",
                self.db_path.display()
            );
        }
        SqliteStore::open(&self.db_path)
            .with_context(|| format!("failed to open database: {}", self.db_path.display()))
    }

    /// `{sdk}-{version}` of the documentation set commands act on.
    pub fn domain(&self) -> Result<String> {
        Ok(domain_name(&self.sdk, &self.doc_version)?)
    }

    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            flatten_replies_on_add: self.config.flatten_replies_on_add,
            default_limit: self.config.default_limit,
        }
    }

    /// The mailer selected by the `email` config section.
    pub fn mailer(&self) -> Box<dyn Mailer> {
        if self.config.email.enabled {
            Box::new(LogMailer::new(
                self.config.email.sender(),
                self.config.email.mailing_list.clone(),
            ))
        } else {
            Box::new(NoopMailer)
        }
    }

    /// Opens the store and resolves the acting user.
    pub fn backend(&self) -> Result<Backend> {
        let store = self.open_store()?;
        let session = match &self.user {
            Some(name) => {
                let user = store
                    .get_user_by_name(name)
                    .with_context(|| format!("unknown user '{name}'"))?;
                Session::logged_in(user)
            }
            None => Session::anonymous(),
        };

        let domain = self.domain()?;
        debug!(%domain, user = ?self.user, "resolved backend");

        Ok(Backend {
            store,
            session,
            domain,
            mailer: self.mailer(),
            options: self.request_options(),
        })
    }
}

/// An open store plus everything needed to build [`Request`]s on it.
pub struct Backend {
    pub store: SqliteStore,
    pub session: Session,
    pub domain: String,
    mailer: Box<dyn Mailer>,
    options: RequestOptions,
}

impl Backend {
    pub fn request(&self) -> Request<'_, DomainStore<'_>> {
        Request::new(
            self.store.domain(self.domain.clone()),
            self.session.clone(),
            self.mailer.as_ref(),
        )
        .with_options(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use crate::cli::Cli;

    fn ctx(args: &[&str]) -> RuntimeContext {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("marginalia.yaml");
        let mut argv = vec!["marginalia", "--config", config.to_str().unwrap()];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        RuntimeContext::from_global_args(&cli.global).unwrap()
    }

    #[test]
    fn db_flag_overrides_config() {
        let c = ctx(&["--db", "/tmp/other.db", "counts"]);
        assert_eq!(c.db_path, PathBuf::from("/tmp/other.db"));
    }

    #[test]
    fn domain_from_flags() {
        let c = ctx(&["--sdk", "touch", "--doc-version", "2", "counts"]);
        assert_eq!(c.domain().unwrap(), "touch-2");

        let bad = ctx(&["--doc-version", "latest", "counts"]);
        assert!(bad.domain().is_err());
    }

    #[test]
    fn blank_user_is_anonymous() {
        let c = ctx(&["--user", "  ", "counts"]);
        assert_eq!(c.user, None);
    }

    #[test]
    fn verbose_wins_over_config_filter() {
        let c = ctx(&["-v", "counts"]);
        assert_eq!(c.log_filter(), "marginalia=debug");
    }
}
