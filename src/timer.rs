//! Fire-once delayed callbacks
//!
//! Session controllers hand out a `TimerToken` whenever they need a delayed
//! transition. The host keeps the token in a `TimerQueue` (or its own event
//! loop) and passes it back when the delay elapses. Tokens carry the epoch
//! of the session that issued them, so a token from before a restart or
//! teardown is recognised as stale and ignored.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Handle for one pending delayed callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken {
    pub(crate) epoch: u64,
    pub(crate) seq: u64,
}

/// Delay requested together with its token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub token: TimerToken,
    pub delay_ms: u64,
}

/// Issues tokens and recognises stale ones
#[derive(Debug, Clone, Default)]
pub struct Epoch {
    epoch: u64,
    next_seq: u64,
    pending: Option<u64>,
}

impl Epoch {
    /// Issue a token, replacing any pending one
    pub fn issue(&mut self) -> TimerToken {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending = Some(seq);
        TimerToken {
            epoch: self.epoch,
            seq,
        }
    }

    /// Consume `token` if it is the live pending one
    pub fn redeem(&mut self, token: TimerToken) -> bool {
        if token.epoch == self.epoch && self.pending == Some(token.seq) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Invalidate every token issued so far
    pub fn advance(&mut self) {
        self.epoch += 1;
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Min-heap of tokens ordered by due time, for hosts without their own
/// timer facility (tests, the headless demo)
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<(u64, TimerToken)>>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now_ms: u64, request: TimerRequest) {
        self.heap
            .push(Reverse((now_ms + request.delay_ms, request.token)));
    }

    /// Remove and return every token due at or before `now_ms`, earliest first
    pub fn pop_due(&mut self, now_ms: u64) -> Vec<TimerToken> {
        let mut due = Vec::new();
        while let Some(Reverse((at, token))) = self.heap.peek().copied() {
            if at > now_ms {
                break;
            }
            self.heap.pop();
            due.push(token);
        }
        due
    }

    /// Due time of the earliest pending token
    pub fn next_due(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse((at, _))| *at)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
