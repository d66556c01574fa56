//! Off-thread command execution.
//!
//! Store operations block on the connection lock and on SQLite I/O.
//! `PetService` runs each command on the tokio blocking pool so interactive
//! callers never stall their own thread. Commands are neither cancellable
//! nor time-limited once submitted.

use std::sync::Arc;

use petshelter_core::errors::{ExError, ExErrorKind};
use petshelter_core::model::{NewPet, Pet, PetId};
use petshelter_store::errors::Result;
use petshelter_store::{InsertOutcome, PetStore};
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};

use crate::commands::{apply_pet_command, PetCommand, PetCommandResult};

/// Submits pet commands to the blocking pool of a tokio runtime
#[derive(Debug, Clone)]
pub struct PetService {
    store: Arc<PetStore>,
    runtime: Handle,
}

impl PetService {
    pub fn new(store: Arc<PetStore>, runtime: Handle) -> Self {
        Self { store, runtime }
    }

    /// Bind to the runtime the caller is running on
    ///
    /// # Errors
    /// `Internal` when called outside a tokio runtime.
    pub fn current(store: Arc<PetStore>) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|err| {
            ExError::new(ExErrorKind::Internal)
                .with_op("pet_service")
                .with_message(format!("no tokio runtime: {}", err))
        })?;
        Ok(Self::new(store, runtime))
    }

    pub fn store(&self) -> &Arc<PetStore> {
        &self.store
    }

    /// Start `cmd` on the blocking pool
    pub fn submit(&self, cmd: PetCommand) -> JoinHandle<Result<PetCommandResult>> {
        let store = Arc::clone(&self.store);
        tracing::debug!(op = cmd.op_name(), "submitting pet command");
        self.runtime
            .spawn_blocking(move || apply_pet_command(cmd, &store))
    }

    /// Run `cmd` on the blocking pool and wait for it
    ///
    /// # Errors
    /// Whatever the command returns; `Internal` if the worker panicked.
    pub async fn execute(&self, cmd: PetCommand) -> Result<PetCommandResult> {
        let op = cmd.op_name();
        self.submit(cmd)
            .await
            .map_err(|err| join_error(op, err))?
    }

    /// Run `cmd` on the blocking pool and hand the result to `on_complete`
    ///
    /// `on_complete` runs on the worker thread.
    pub fn submit_with<F>(&self, cmd: PetCommand, on_complete: F)
    where
        F: FnOnce(Result<PetCommandResult>) + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let op = cmd.op_name();
        tracing::debug!(op, "submitting pet command with completion callback");
        // Fire and forget: the callback is the only consumer of the result
        drop(self.runtime.spawn_blocking(move || {
            let result = apply_pet_command(cmd, &store);
            if let Err(err) = &result {
                tracing::warn!(op, err_code = err.code(), "background command failed");
            }
            on_complete(result);
        }));
    }

    /// # Errors
    /// See [`PetService::execute`].
    pub async fn insert(&self, pet: NewPet) -> Result<InsertOutcome> {
        match self.execute(PetCommand::Insert(pet)).await? {
            PetCommandResult::Inserted(outcome) => Ok(outcome),
            other => Err(unexpected("insert_pet", &other)),
        }
    }

    /// # Errors
    /// See [`PetService::execute`].
    pub async fn update(&self, pet: Pet) -> Result<usize> {
        self.execute(PetCommand::Update(pet))
            .await
            .map(|r| r.rows_affected())
    }

    /// # Errors
    /// See [`PetService::execute`].
    pub async fn delete(&self, id: PetId) -> Result<usize> {
        self.execute(PetCommand::Delete(id))
            .await
            .map(|r| r.rows_affected())
    }

    /// # Errors
    /// See [`PetService::execute`].
    pub async fn delete_all(&self) -> Result<usize> {
        self.execute(PetCommand::DeleteAll)
            .await
            .map(|r| r.rows_affected())
    }
}

fn join_error(op: &'static str, err: JoinError) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op(op)
        .with_message(format!("background worker failed: {}", err))
}

fn unexpected(op: &'static str, result: &PetCommandResult) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op(op)
        .with_message(format!("unexpected command result {:?}", result))
}
