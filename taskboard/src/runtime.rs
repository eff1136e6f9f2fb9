//! Event loop glue between the board and spawned network work.
//!
//! The board has a single owner. Anything that talks to the backend runs
//! on a spawned tokio task and reports back as a [`BoardEvent`] over an
//! mpsc channel; the owner drains the channel (once per frame in the
//! terminal loop) and applies each event to the board.
//!
//! ```text
//! owner (BoardRuntime)  ──spawn──►  tokio tasks (fetch / confirm / create)
//!                       ◄─BoardEvent─
//! ```

use taskboard_proto::task::{Task, TaskId};
use tokio::sync::mpsc;

use crate::api::{ApiError, Backend};
use crate::board::{
    BoardError, ConfirmOutcome, Confirmation, CreateOutcome, DropTarget, FetchOutcome, Settlement,
    TaskBoard,
};
use crate::notify::Notifier;

/// Default capacity of the event channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Results of spawned network work, delivered to the owner.
#[derive(Debug)]
pub enum BoardEvent {
    /// A task-list fetch finished.
    Fetched(FetchOutcome),
    /// A status change was confirmed or rejected.
    Confirmed(Confirmation),
    /// A task creation finished.
    Created(CreateOutcome),
    /// The project owner lookup finished.
    OwnerResolved(Result<String, ApiError>),
}

/// What applying a [`BoardEvent`] did to the board.
#[derive(Debug)]
pub enum Applied {
    /// Fetch result; `true` if the store was replaced.
    Fetched(bool),
    /// A transition was settled.
    Settled(Settlement),
    /// A creation finished.
    Created(Result<Task, BoardError>),
    /// Owner lookup result; `true` if the owner is now known.
    Owner(bool),
}

/// Owns a [`TaskBoard`] and the channel its spawned work reports on.
pub struct BoardRuntime<B, N> {
    board: TaskBoard<B, N>,
    evt_tx: mpsc::Sender<BoardEvent>,
    evt_rx: mpsc::Receiver<BoardEvent>,
    outstanding: usize,
}

impl<B: Backend, N: Notifier> BoardRuntime<B, N> {
    /// Wraps `board` with an event channel of `capacity` (minimum 1).
    #[must_use]
    pub fn new(board: TaskBoard<B, N>, capacity: usize) -> Self {
        let (evt_tx, evt_rx) = mpsc::channel(capacity.max(1));
        Self {
            board,
            evt_tx,
            evt_rx,
            outstanding: 0,
        }
    }

    /// The board, for reading.
    #[must_use]
    pub const fn board(&self) -> &TaskBoard<B, N> {
        &self.board
    }

    /// The board, for direct synchronous updates.
    pub const fn board_mut(&mut self) -> &mut TaskBoard<B, N> {
        &mut self.board
    }

    /// Number of spawned operations whose result hasn't been applied.
    #[must_use]
    pub const fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Runs `work` on its own task. If that task panics or is cancelled,
    /// `lost` builds the event reported in its place, so every spawned
    /// operation yields exactly one event.
    fn spawn<F, L>(&mut self, work: F, lost: L)
    where
        F: Future<Output = BoardEvent> + Send + 'static,
        L: FnOnce(ApiError) -> BoardEvent + Send + 'static,
    {
        let tx = self.evt_tx.clone();
        self.outstanding += 1;
        tokio::spawn(async move {
            let event = match tokio::spawn(work).await {
                Ok(event) => event,
                Err(err) => {
                    tracing::error!(error = %err, "board task failed");
                    lost(ApiError::Transport(format!("background task failed: {err}")))
                }
            };
            if tx.send(event).await.is_err() {
                tracing::debug!("board runtime dropped before event delivery");
            }
        });
    }

    /// Starts a background fetch of the task list.
    pub fn spawn_fetch(&mut self) {
        let fetch = self.board.fetch();
        self.spawn(async move { BoardEvent::Fetched(fetch.await) }, |err| {
            BoardEvent::Fetched(Err(err))
        });
    }

    /// Starts a background lookup of the project owner.
    pub fn spawn_owner_lookup(&mut self) {
        let lookup = self.board.owner_lookup();
        self.spawn(async move { BoardEvent::OwnerResolved(lookup.await) }, |err| {
            BoardEvent::OwnerResolved(Err(err))
        });
    }

    /// Re-fetches the task list, and retries the owner lookup if an
    /// earlier one failed.
    pub fn refresh(&mut self) {
        self.spawn_fetch();
        if self.board.owner().is_none() {
            self.spawn_owner_lookup();
        }
    }

    /// A card was picked up.
    pub fn drag_start(&mut self, task_id: TaskId) -> bool {
        self.board.drag_start(task_id)
    }

    /// A card was released over `target`.
    ///
    /// A real move is applied to the store right away and its
    /// confirmation spawned. Returns whether a confirmation started.
    pub fn drop_task(&mut self, target: Option<DropTarget>) -> bool {
        let Some(pending) = self.board.drag_end(target) else {
            return false;
        };
        tracing::debug!(
            task_id = %pending.request.task_id,
            to = %pending.request.to,
            version = pending.version,
            "confirming status change"
        );
        let fallback = pending.clone();
        let confirmation = self.board.confirmation(pending);
        self.spawn(
            async move { BoardEvent::Confirmed(confirmation.await) },
            move |err| {
                BoardEvent::Confirmed(Confirmation {
                    pending: fallback,
                    outcome: ConfirmOutcome::Rejected(err),
                })
            },
        );
        true
    }

    /// Validates and spawns a task creation.
    ///
    /// # Errors
    ///
    /// Returns the validation error from [`TaskBoard::begin_create`];
    /// nothing is spawned in that case.
    pub fn spawn_create(&mut self, title: &str, description: &str) -> Result<(), BoardError> {
        let create = self.board.begin_create(title, description)?;
        self.spawn(async move { BoardEvent::Created(create.await) }, |err| {
            BoardEvent::Created(CreateOutcome {
                created: Err(err),
                refreshed: None,
            })
        });
        Ok(())
    }

    /// Applies one event to the board.
    pub fn apply(&mut self, event: BoardEvent) -> Applied {
        self.outstanding = self.outstanding.saturating_sub(1);
        match event {
            BoardEvent::Fetched(outcome) => Applied::Fetched(self.board.apply_fetch(outcome)),
            BoardEvent::Confirmed(confirmation) => {
                Applied::Settled(self.board.settle(confirmation))
            }
            BoardEvent::Created(outcome) => Applied::Created(self.board.finish_create(outcome)),
            BoardEvent::OwnerResolved(Ok(owner)) => {
                tracing::info!(owner = %owner, "project owner resolved");
                self.board.set_owner(Some(owner));
                Applied::Owner(true)
            }
            BoardEvent::OwnerResolved(Err(_)) => Applied::Owner(self.board.owner().is_some()),
        }
    }

    /// Applies every event that has already arrived, without waiting.
    pub fn drain(&mut self) -> Vec<Applied> {
        let mut applied = Vec::new();
        while let Ok(event) = self.evt_rx.try_recv() {
            applied.push(self.apply(event));
        }
        applied
    }

    /// Waits for the next event and applies it.
    ///
    /// Returns `None` when nothing is outstanding.
    pub async fn process_next(&mut self) -> Option<Applied> {
        if self.outstanding == 0 {
            return None;
        }
        let event = self.evt_rx.recv().await?;
        Some(self.apply(event))
    }

    /// Waits until every spawned operation has been applied.
    pub async fn settle_all(&mut self) -> Vec<Applied> {
        let mut applied = Vec::new();
        while let Some(result) = self.process_next().await {
            applied.push(result);
        }
        applied
    }
}
