//! Local database side: pg_restore and database create/drop.

use crate::config::Config;
use crate::exec::{CommandRunner, Invocation};
use crate::utils::{RefreshError, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Outcome of a create/drop request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseStatus {
    Created,
    AlreadyExists,
    Dropped,
    Missing,
}

/// Runs the PostgreSQL client tools against the local server
#[derive(Clone)]
pub struct LocalDatabase {
    runner: Arc<dyn CommandRunner>,
    restore_program: String,
    createdb_program: String,
    dropdb_program: String,
    connection_args: Vec<String>,
}

impl LocalDatabase {
    pub fn new(runner: Arc<dyn CommandRunner>, config: &Config) -> Self {
        Self {
            runner,
            restore_program: config.database.restore_program.clone(),
            createdb_program: config.database.createdb_program.clone(),
            dropdb_program: config.database.dropdb_program.clone(),
            connection_args: config.connection_args(),
        }
    }

    /// Load `dump` into `database`, dropping conflicting objects first and
    /// skipping ownership statements.
    pub async fn restore(&self, database: &str, dump: &Path) -> Result<()> {
        let invocation = Invocation::new(&self.restore_program)
            .args(["--clean", "--no-owner"])
            .args(self.connection_args.iter().cloned())
            .args(["--dbname", database])
            .arg(dump.to_string_lossy());

        info!("Restoring {} into {}", dump.display(), database);
        self.runner.run(&invocation).await?.into_stdout(&invocation)?;
        Ok(())
    }

    pub async fn create_database(&self, database: &str) -> Result<DatabaseStatus> {
        let invocation = Invocation::new(&self.createdb_program)
            .args(self.connection_args.iter().cloned())
            .arg(database);

        match self.runner.run(&invocation).await?.into_stdout(&invocation) {
            Ok(_) => Ok(DatabaseStatus::Created),
            Err(RefreshError::ExternalCommand { stderr, .. }) if stderr.contains("already exists") => {
                Ok(DatabaseStatus::AlreadyExists)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn drop_database(&self, database: &str) -> Result<DatabaseStatus> {
        let invocation = Invocation::new(&self.dropdb_program)
            .args(self.connection_args.iter().cloned())
            .arg(database);

        match self.runner.run(&invocation).await?.into_stdout(&invocation) {
            Ok(_) => Ok(DatabaseStatus::Dropped),
            Err(RefreshError::ExternalCommand { stderr, .. }) if stderr.contains("does not exist") => {
                Ok(DatabaseStatus::Missing)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{CommandOutput, ScriptedRunner};

    fn local(runner: Arc<ScriptedRunner>) -> LocalDatabase {
        let mut config = Config::default();
        config.database.user = Some("postgres".to_string());
        LocalDatabase::new(runner, &config)
    }

    #[tokio::test]
    async fn test_restore_flags() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.push(CommandOutput::success(""));

        local(runner.clone())
            .restore("billing_dev", Path::new("dump.sql"))
            .await
            .unwrap();

        assert_eq!(
            runner.calls()[0].to_string(),
            "pg_restore --clean --no-owner --username postgres --dbname billing_dev dump.sql"
        );
    }

    #[tokio::test]
    async fn test_restore_failure_embeds_stderr() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.push(CommandOutput::failure(
            1,
            "pg_restore: error: input file does not appear to be a valid archive",
        ));

        let err = local(runner)
            .restore("billing_dev", Path::new("dump.sql"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("does not appear to be a valid archive"));
    }

    #[tokio::test]
    async fn test_create_tolerates_existing_database() {
        let runner = Arc::new(ScriptedRunner::new());
        runner
            .push(CommandOutput::success(""))
            .push(CommandOutput::failure(
                1,
                "createdb: error: database creation failed: ERROR:  database \"billing_dev\" already exists",
            ))
            .push(CommandOutput::failure(1, "createdb: error: connection refused"));
        let db = local(runner.clone());

        assert_eq!(db.create_database("billing_dev").await.unwrap(), DatabaseStatus::Created);
        assert_eq!(db.create_database("billing_dev").await.unwrap(), DatabaseStatus::AlreadyExists);
        assert!(matches!(
            db.create_database("billing_dev").await,
            Err(RefreshError::ExternalCommand { .. })
        ));
        assert_eq!(runner.calls()[0].to_string(), "createdb --username postgres billing_dev");
    }

    #[tokio::test]
    async fn test_drop_tolerates_missing_database() {
        let runner = Arc::new(ScriptedRunner::new());
        runner
            .push(CommandOutput::success(""))
            .push(CommandOutput::failure(
                1,
                "dropdb: error: database removal failed: ERROR:  database \"billing_dev\" does not exist",
            ));
        let db = local(runner);

        assert_eq!(db.drop_database("billing_dev").await.unwrap(), DatabaseStatus::Dropped);
        assert_eq!(db.drop_database("billing_dev").await.unwrap(), DatabaseStatus::Missing);
    }
}
