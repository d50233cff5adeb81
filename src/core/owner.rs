//! Owner execution context
//!
//! The owner context is the single thread allowed to touch owner-exclusive
//! state (the view). The state is constructed on that thread and never
//! leaves it: other threads can only hand it closures through an
//! `OwnerHandle`, and those closures run one at a time on the owner thread.
//!
//! # Architecture
//!
//! ```text
//! OwnerContext<V>  (dedicated thread: current-thread runtime + LocalSet)
//!     ├── V                          (owner-exclusive state)
//!     └── UnboundedReceiver<OwnerJob<V>>
//!             ▲
//!             └── OwnerHandle<V>     (cloneable, Send + Sync)
//!                   ├── post(f)      run f(&mut V) later
//!                   ├── call(f)      run f(&mut V), await its result
//!                   └── spawn(task)  run an async task on the owner thread
//! ```
//!
//! The thread exits once every `OwnerHandle` is dropped and all queued jobs
//! and owner tasks have finished.

use std::future::Future;
use std::thread::{self, JoinHandle, ThreadId};

use futures::future::LocalBoxFuture;
use tokio::sync::{mpsc, oneshot};
use tokio::task::LocalSet;
use tracing::debug;

use crate::types::ConsolidationError;

type Update<V> = Box<dyn FnOnce(&mut V) + Send>;
type OwnerTask<V> = Box<dyn FnOnce(OwnerHandle<V>) -> LocalBoxFuture<'static, ()> + Send>;

enum OwnerJob<V> {
    Update(Update<V>),
    Spawn(OwnerTask<V>, OwnerHandle<V>),
}

/// Capturable handle to an owner context
pub struct OwnerHandle<V> {
    sender: mpsc::UnboundedSender<OwnerJob<V>>,
}

impl<V> Clone for OwnerHandle<V> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<V> std::fmt::Debug for OwnerHandle<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerHandle")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

impl<V: 'static> OwnerHandle<V> {
    /// Schedule `f` to run on the owner context
    ///
    /// # Errors
    ///
    /// `ConsolidationError::OwnerClosed` if the owner thread has exited.
    pub fn post<F>(&self, f: F) -> Result<(), ConsolidationError>
    where
        F: FnOnce(&mut V) + Send + 'static,
    {
        self.sender
            .send(OwnerJob::Update(Box::new(f)))
            .map_err(|_| ConsolidationError::OwnerClosed)
    }

    /// Run `f` on the owner context and wait for its result
    ///
    /// Safe to await from a task running on the owner context itself.
    pub async fn call<F, R>(&self, f: F) -> Result<R, ConsolidationError>
    where
        F: FnOnce(&mut V) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.post(move |view| {
            let _ = tx.send(f(view));
        })?;
        rx.await.map_err(|_| ConsolidationError::OwnerClosed)
    }

    /// Blocking variant of [`OwnerHandle::call`] for threads outside any runtime
    ///
    /// Must not be used from the owner thread (it would wait on itself).
    pub fn call_blocking<F, R>(&self, f: F) -> Result<R, ConsolidationError>
    where
        F: FnOnce(&mut V) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.post(move |view| {
            let _ = tx.send(f(view));
        })?;
        rx.blocking_recv()
            .map_err(|_| ConsolidationError::OwnerClosed)
    }

    /// Run an async task on the owner context
    ///
    /// The task receives its own handle, so every view access it makes goes
    /// through the owner's queue. The future itself need not be `Send`.
    pub fn spawn<F, Fut>(&self, task: F) -> Result<(), ConsolidationError>
    where
        F: FnOnce(OwnerHandle<V>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let boxed: OwnerTask<V> =
            Box::new(move |owner| -> LocalBoxFuture<'static, ()> { Box::pin(task(owner)) });
        self.sender
            .send(OwnerJob::Spawn(boxed, self.clone()))
            .map_err(|_| ConsolidationError::OwnerClosed)
    }

    /// True once the owner thread has stopped accepting jobs
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// A running owner context
pub struct OwnerContext<V> {
    handle: OwnerHandle<V>,
    thread: JoinHandle<()>,
}

impl<V: 'static> OwnerContext<V> {
    /// Start an owner thread whose exclusive state is built by `init`
    ///
    /// `init` runs on the new thread, so `V` itself does not need to be `Send`.
    pub fn spawn<F>(name: &str, init: F) -> Result<Self, ConsolidationError>
    where
        F: FnOnce() -> V + Send + 'static,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                ConsolidationError::runtime(format!("Failed to create owner runtime: {}", e))
            })?;

        let (sender, receiver) = mpsc::unbounded_channel();
        let thread = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || run_owner_loop(runtime, receiver, init))?;

        Ok(Self {
            handle: OwnerHandle { sender },
            thread,
        })
    }

    /// A new handle to this owner context
    pub fn handle(&self) -> OwnerHandle<V> {
        self.handle.clone()
    }

    /// Identity of the owner thread
    pub fn thread_id(&self) -> ThreadId {
        self.thread.thread().id()
    }

    /// Release this context's handle and wait for the owner thread to drain
    ///
    /// Returns once every other handle is gone and all queued work has run.
    pub fn join(self) -> Result<(), ConsolidationError> {
        let OwnerContext { handle, thread } = self;
        drop(handle);
        thread
            .join()
            .map_err(|_| ConsolidationError::runtime("owner thread panicked"))
    }
}

fn run_owner_loop<V, F>(
    runtime: tokio::runtime::Runtime,
    mut receiver: mpsc::UnboundedReceiver<OwnerJob<V>>,
    init: F,
) where
    V: 'static,
    F: FnOnce() -> V,
{
    let mut view = init();
    let local = LocalSet::new();

    local.block_on(&runtime, async {
        while let Some(job) = receiver.recv().await {
            match job {
                OwnerJob::Update(update) => update(&mut view),
                OwnerJob::Spawn(task, owner) => {
                    tokio::task::spawn_local(task(owner));
                }
            }
        }
    });

    // Owner tasks that dropped their handle early may still be pending.
    runtime.block_on(local);
    debug!("owner context drained");
}
