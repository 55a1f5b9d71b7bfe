use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use tokio::sync::mpsc;

/// State driven by a serial command queue.
///
/// Implementors get single-writer semantics for free: commands are
/// handled one at a time, in submission order, on a dedicated task.
/// Command results travel back on oneshot channels embedded in the
/// commands themselves, so a failed command reaches its submitter
/// without stalling the queue.
#[async_trait]
pub trait Serial: Send + Sized + 'static {
    type Command: Send + 'static;
    /// Receives a handle to the owning queue before the first command.
    /// Lets the state enqueue follow-ups (timer expiries) onto itself.
    fn attach(&mut self, _queue: Queue<Self::Command>) {}
    async fn handle(&mut self, command: Self::Command);
    /// Checked after every command; true stops the consumer.
    fn done(&self) -> bool {
        false
    }
    /// Runs after the queue closes and drains.
    async fn finish(&mut self) {}
}

/// FIFO, single-consumer task runner.
///
/// At most one command executes at a time; commands run in enqueue
/// order; the consumer yields to the scheduler between commands so
/// timers and sibling tables stay live. `len` counts submitted but
/// unfinished commands, the running one included.
pub struct Queue<C> {
    tx: mpsc::UnboundedSender<C>,
    depth: Arc<AtomicUsize>,
}

impl<C> Clone for Queue<C> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            depth: self.depth.clone(),
        }
    }
}

impl<C: Send + 'static> Queue<C> {
    /// Spawns the consumer task and hands the state its own queue handle.
    pub fn spawn<S>(mut state: S) -> Self
    where
        S: Serial<Command = C>,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let depth = Arc::new(AtomicUsize::new(0));
        let queue = Self {
            tx,
            depth: depth.clone(),
        };
        state.attach(queue.clone());
        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                state.handle(command).await;
                depth.fetch_sub(1, Ordering::SeqCst);
                if state.done() {
                    break;
                }
                tokio::task::yield_now().await;
            }
            state.finish().await;
        });
        queue
    }
    /// Enqueues a command; false if the consumer is gone.
    pub fn send(&self, command: C) -> bool {
        self.depth.fetch_add(1, Ordering::SeqCst);
        match self.tx.send(command) {
            Ok(()) => true,
            Err(_) => {
                self.depth.fetch_sub(1, Ordering::SeqCst);
                false
            }
        }
    }
    /// Waiting plus running commands.
    pub fn len(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
