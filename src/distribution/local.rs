//! In-process workers connected by channels.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Barrier};

use super::{Communicator, Message};
use crate::error::{AcoError, Result};

/// One worker's endpoint in a [`local_cluster`].
///
/// Holds a dedicated channel to and from every other rank, so
/// [`recv`](Communicator::recv) from a given source never sees messages
/// from another one. Dropping an endpoint disconnects its channels and
/// makes the peers' pending `recv` calls fail.
#[derive(Debug)]
pub struct LocalComm {
    rank: usize,
    outbox: Vec<Sender<Message>>,
    inbox: Vec<Receiver<Message>>,
    barrier: Arc<Barrier>,
}

/// Builds `workers` connected endpoints, indexed by rank.
///
/// Move each endpoint to its own thread.
///
/// ```
/// use u_antcolony::distribution::{local_cluster, Communicator, Message};
///
/// let comms = local_cluster(2);
/// comms[1].send(Message::Ants(Vec::new()), 0).unwrap();
/// assert!(matches!(comms[0].recv(1).unwrap(), Message::Ants(a) if a.is_empty()));
/// ```
pub fn local_cluster(workers: usize) -> Vec<LocalComm> {
    let barrier = Arc::new(Barrier::new(workers.max(1)));

    let mut outboxes: Vec<Vec<Sender<Message>>> = (0..workers).map(|_| Vec::new()).collect();
    let mut inboxes: Vec<Vec<Receiver<Message>>> = (0..workers).map(|_| Vec::new()).collect();
    for outbox in outboxes.iter_mut() {
        for inbox in inboxes.iter_mut() {
            let (tx, rx) = channel();
            outbox.push(tx);
            inbox.push(rx);
        }
    }

    outboxes
        .into_iter()
        .zip(inboxes)
        .enumerate()
        .map(|(rank, (outbox, inbox))| LocalComm {
            rank,
            outbox,
            inbox,
            barrier: Arc::clone(&barrier),
        })
        .collect()
}

impl Communicator for LocalComm {
    fn worker_count(&self) -> usize {
        self.outbox.len()
    }

    fn rank(&self) -> usize {
        self.rank
    }

    fn send(&self, message: Message, dest: usize) -> Result<()> {
        let tx = self
            .outbox
            .get(dest)
            .ok_or_else(|| AcoError::Transport(format!("no worker with rank {dest}")))?;
        tracing::trace!(from = self.rank, to = dest, "send");
        tx.send(message)
            .map_err(|_| AcoError::Transport(format!("worker {dest} disconnected")))
    }

    fn recv(&self, source: usize) -> Result<Message> {
        let rx = self
            .inbox
            .get(source)
            .ok_or_else(|| AcoError::Transport(format!("no worker with rank {source}")))?;
        let message = rx
            .recv()
            .map_err(|_| AcoError::Transport(format!("worker {source} disconnected")))?;
        tracing::trace!(from = source, to = self.rank, "recv");
        Ok(message)
    }

    fn barrier(&self) {
        self.barrier.wait();
    }
}
