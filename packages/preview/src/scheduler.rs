//! # Debounce Scheduler
//!
//! Decides when a source mutation becomes a render commit.
//!
//! - **Auto**: every mutation cancels the pending commit and schedules a new
//!   one for `now + window`. Only the newest value of a burst is committed.
//! - **Manual**: edits are held until an explicit run. Whole-document
//!   replacements (upload, generation, clear) commit immediately.
//!
//! The scheduler owns at most one pending commit and never reads a clock;
//! callers pass `now` in and drive it with [`DebounceScheduler::next_deadline`]
//! and [`DebounceScheduler::poll`].

use crate::source::{SourceBuffer, SourceChange};
use crate::PreviewError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Default quiescence window
pub const QUIESCENCE_WINDOW: Duration = Duration::from_millis(800);

/// How mutations reach the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshPolicy {
    /// Continuous, debounced commits
    #[default]
    Auto,

    /// Commit on explicit run
    Manual,
}

impl RefreshPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshPolicy::Auto => "auto",
            RefreshPolicy::Manual => "manual",
        }
    }
}

impl FromStr for RefreshPolicy {
    type Err = PreviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(RefreshPolicy::Auto),
            "manual" => Ok(RefreshPolicy::Manual),
            other => Err(PreviewError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Where a mutation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOrigin {
    /// Keystroke-level edit from the editable surface
    Edit,

    /// Whole-document assignment (upload, generation result, clear, file reload)
    Replace,
}

/// Why a commit happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitTrigger {
    /// Quiescence window elapsed (auto)
    Quiescence,

    /// Replacement under manual policy
    Immediate,

    /// Explicit run signal
    Run,
}

/// A value handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub revision: u64,
    pub value: String,
    pub trigger: CommitTrigger,
}

#[derive(Debug, Clone)]
struct PendingCommit {
    revision: u64,
    value: String,
    due: Instant,
}

/// Single-slot debounce state machine
#[derive(Debug, Clone)]
pub struct DebounceScheduler {
    policy: RefreshPolicy,
    window: Duration,
    pending: Option<PendingCommit>,
    last_committed: Option<u64>,
}

impl DebounceScheduler {
    pub fn new(policy: RefreshPolicy, window: Duration) -> Self {
        Self {
            policy,
            window,
            pending: None,
            last_committed: None,
        }
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Switch policy.
    ///
    /// Leaving auto drops the pending commit instead of applying it; the next
    /// mutation is judged under the new policy. Returns true when a pending
    /// commit was dropped.
    pub fn set_policy(&mut self, policy: RefreshPolicy) -> bool {
        if self.policy == policy {
            return false;
        }

        self.policy = policy;
        let dropped = self.cancel();

        tracing::debug!(policy = policy.as_str(), dropped, "refresh policy switched");
        dropped
    }

    /// Feed a source mutation.
    ///
    /// Returns a commit only for replacements under manual policy; auto
    /// mutations are scheduled and surface later through [`Self::poll`].
    pub fn on_mutation(
        &mut self,
        change: &SourceChange,
        origin: MutationOrigin,
        now: Instant,
    ) -> Option<Commit> {
        match (self.policy, origin) {
            (RefreshPolicy::Auto, _) => {
                // Cancel-then-replace
                self.pending = Some(PendingCommit {
                    revision: change.revision,
                    value: change.value.clone(),
                    due: now + self.window,
                });
                None
            }
            (RefreshPolicy::Manual, MutationOrigin::Edit) => None,
            (RefreshPolicy::Manual, MutationOrigin::Replace) => {
                self.pending = None;
                self.commit(change.revision, change.value.clone(), CommitTrigger::Immediate)
            }
        }
    }

    /// Explicit run: cancel anything pending and commit the current source now.
    ///
    /// Always produces a commit, even when the revision was already rendered.
    pub fn run(&mut self, source: &SourceBuffer) -> Commit {
        self.pending = None;
        self.last_committed = Some(source.revision());

        Commit {
            revision: source.revision(),
            value: source.value().to_string(),
            trigger: CommitTrigger::Run,
        }
    }

    /// Fire the pending commit if its window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<Commit> {
        match &self.pending {
            Some(pending) if now >= pending.due => {
                let pending = self.pending.take()?;
                self.commit(pending.revision, pending.value, CommitTrigger::Quiescence)
            }
            _ => None,
        }
    }

    /// When the pending commit is due, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending commit. Returns true when one existed.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Revision of the most recent commit
    pub fn last_committed(&self) -> Option<u64> {
        self.last_committed
    }

    fn commit(&mut self, revision: u64, value: String, trigger: CommitTrigger) -> Option<Commit> {
        // Never hand out a revision older than one already committed
        if self.last_committed.is_some_and(|last| revision < last) {
            return None;
        }

        self.last_committed = Some(revision);
        Some(Commit {
            revision,
            value,
            trigger,
        })
    }
}

impl Default for DebounceScheduler {
    fn default() -> Self {
        Self::new(RefreshPolicy::Auto, QUIESCENCE_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_auto_burst_commits_only_last_value() {
        let mut source = SourceBuffer::new("");
        let mut scheduler = DebounceScheduler::default();
        let t0 = Instant::now();

        let burst = ["<", "<h", "<h1", "<h1>", "<h1>x</h1>"];
        for (i, value) in burst.iter().enumerate() {
            let change = source.set(*value);
            let now = t0 + ms(i as u64 * 100);
            assert!(scheduler.on_mutation(&change, MutationOrigin::Edit, now).is_none());
            // Nothing committed in the middle of the burst
            assert!(scheduler.poll(now + ms(700)).is_none());
        }

        // Last mutation at t0 + 400ms → due at t0 + 1200ms
        assert_eq!(scheduler.next_deadline(), Some(t0 + ms(1200)));
        assert!(scheduler.poll(t0 + ms(1199)).is_none());

        let commit = scheduler.poll(t0 + ms(1200)).unwrap();
        assert_eq!(commit.value, "<h1>x</h1>");
        assert_eq!(commit.revision, 5);
        assert_eq!(commit.trigger, CommitTrigger::Quiescence);

        // Fires once
        assert!(scheduler.poll(t0 + ms(5000)).is_none());
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn test_at_most_one_pending_commit() {
        let mut source = SourceBuffer::new("");
        let mut scheduler = DebounceScheduler::default();
        let t0 = Instant::now();

        scheduler.on_mutation(&source.set("a"), MutationOrigin::Edit, t0);
        scheduler.on_mutation(&source.set("b"), MutationOrigin::Replace, t0 + ms(10));

        assert_eq!(scheduler.next_deadline(), Some(t0 + ms(810)));
        assert_eq!(scheduler.poll(t0 + ms(900)).unwrap().value, "b");
    }

    #[test]
    fn test_manual_edits_wait_for_run() {
        let mut source = SourceBuffer::new("");
        let mut scheduler = DebounceScheduler::new(RefreshPolicy::Manual, QUIESCENCE_WINDOW);
        let t0 = Instant::now();

        for value in ["<p>", "<p>a", "<p>ab</p>"] {
            let change = source.set(value);
            assert!(scheduler.on_mutation(&change, MutationOrigin::Edit, t0).is_none());
        }
        assert!(scheduler.next_deadline().is_none());
        assert!(scheduler.poll(t0 + ms(10_000)).is_none());

        let commit = scheduler.run(&source);
        assert_eq!(commit.value, "<p>ab</p>");
        assert_eq!(commit.trigger, CommitTrigger::Run);
        assert!(scheduler.poll(t0 + ms(20_000)).is_none());
    }

    #[test]
    fn test_manual_replace_commits_immediately() {
        let mut source = SourceBuffer::new("");
        let mut scheduler = DebounceScheduler::new(RefreshPolicy::Manual, QUIESCENCE_WINDOW);

        let change = source.set("<h1>uploaded</h1>");
        let commit = scheduler
            .on_mutation(&change, MutationOrigin::Replace, Instant::now())
            .unwrap();

        assert_eq!(commit.trigger, CommitTrigger::Immediate);
        assert_eq!(commit.value, "<h1>uploaded</h1>");
    }

    #[test]
    fn test_policy_switch_drops_pending_without_applying() {
        let mut source = SourceBuffer::new("");
        let mut scheduler = DebounceScheduler::default();
        let t0 = Instant::now();

        scheduler.on_mutation(&source.set("pending"), MutationOrigin::Edit, t0);
        assert!(scheduler.set_policy(RefreshPolicy::Manual));
        assert!(scheduler.poll(t0 + ms(5000)).is_none());

        // Back to auto: nothing retroactive either
        assert!(!scheduler.set_policy(RefreshPolicy::Auto));
        assert!(scheduler.next_deadline().is_none());

        // Next mutation follows the new policy
        scheduler.on_mutation(&source.set("next"), MutationOrigin::Edit, t0 + ms(6000));
        assert_eq!(scheduler.next_deadline(), Some(t0 + ms(6800)));
    }

    #[test]
    fn test_run_in_auto_flushes_pending_once() {
        let mut source = SourceBuffer::new("");
        let mut scheduler = DebounceScheduler::default();
        let t0 = Instant::now();

        scheduler.on_mutation(&source.set("x"), MutationOrigin::Edit, t0);
        let commit = scheduler.run(&source);
        assert_eq!(commit.value, "x");
        assert!(scheduler.poll(t0 + ms(800)).is_none());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("AUTO".parse::<RefreshPolicy>().unwrap(), RefreshPolicy::Auto);
        assert_eq!("manual".parse::<RefreshPolicy>().unwrap(), RefreshPolicy::Manual);
        assert!("sometimes".parse::<RefreshPolicy>().is_err());
    }
}
