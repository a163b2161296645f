use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use tracing::trace;

use super::{Fanout, Transmit};
use crate::sysex::{Frame, Target};

pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(30);

/// One independently throttled destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueKey {
    pub target: Target,
    pub name: &'static str,
}

impl QueueKey {
    pub fn new(target: Target, name: &'static str) -> Self {
        Self { target, name }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Transmitted immediately.
    Sent,
    /// Stored; the next flush after the cooling window sends it.
    Deferred,
    /// Unknown parameter, nothing queued.
    Dropped,
}

struct PendingSend {
    frame: Frame,
    last_sent: Instant,
    due_at: Option<Instant>,
}

/// Coalesces parameter writes so each key emits at most one frame per
/// `throttle`, always ending on the most recent value.
pub struct DispatchQueue {
    throttle: Duration,
    entries: HashMap<QueueKey, PendingSend>,
}

impl DispatchQueue {
    pub fn new(throttle: Duration) -> Self {
        Self {
            throttle,
            entries: HashMap::new(),
        }
    }

    pub fn request<T: Transmit + ?Sized>(
        &mut self,
        key: QueueKey,
        frame: Frame,
        now: Instant,
        fanout: &Fanout,
        sink: &mut T,
    ) -> Dispatch {
        let throttle = self.throttle;
        match self.entries.get_mut(&key) {
            Some(entry) if now.duration_since(entry.last_sent) < throttle => {
                // Latest value wins; superseded frames are discarded.
                entry.frame = frame;
                entry.due_at.get_or_insert(entry.last_sent + throttle);
                trace!("Deferred {}:{}", key.name, key.target.instance());
                Dispatch::Deferred
            }
            Some(entry) => {
                fanout.send(sink, frame.bytes());
                entry.frame = frame;
                entry.last_sent = now;
                entry.due_at = None;
                Dispatch::Sent
            }
            None => {
                fanout.send(sink, frame.bytes());
                self.entries.insert(
                    key,
                    PendingSend {
                        frame,
                        last_sent: now,
                        due_at: None,
                    },
                );
                Dispatch::Sent
            }
        }
    }

    /// Sends every entry whose due time has passed. Returns how many keys were flushed.
    pub fn flush_due<T: Transmit + ?Sized>(
        &mut self,
        now: Instant,
        fanout: &Fanout,
        sink: &mut T,
    ) -> usize {
        let mut flushed = 0;
        for (key, entry) in self.entries.iter_mut() {
            match entry.due_at {
                Some(due_at) if due_at <= now => {
                    trace!("Flushing {}:{}", key.name, key.target.instance());
                    fanout.send(sink, entry.frame.bytes());
                    entry.last_sent = now;
                    entry.due_at = None;
                    flushed += 1;
                }
                _ => {}
            }
        }

        // Entries that have cooled off with nothing pending behave exactly like absent ones.
        let throttle = self.throttle;
        self.entries.retain(|_, entry| {
            entry.due_at.is_some() || now.duration_since(entry.last_sent) < throttle
        });

        flushed
    }

    pub fn pending(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.due_at.is_some())
            .count()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.entries.values().filter_map(|entry| entry.due_at).min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DispatchQueue {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE)
    }
}
