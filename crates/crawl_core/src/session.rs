/// Identifies one activation of the status poll loop.
pub type PollGeneration = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollState {
    #[default]
    Idle,
    Polling { generation: PollGeneration },
    Completed,
}

/// Per-submission state: the single poll handle and the last known result path.
///
/// Snapshots are tagged with the generation of the loop that fetched them and a
/// per-loop sequence number. Only snapshots from the active generation with a
/// sequence number newer than the last applied one are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobSession {
    poll: PollState,
    last_generation: PollGeneration,
    last_applied_seq: Option<u64>,
    result_path: Option<String>,
}

impl JobSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a new poll generation, superseding any active one.
    pub fn start(&mut self) -> PollGeneration {
        self.cancel_poll();
        self.last_generation += 1;
        self.last_applied_seq = None;
        self.poll = PollState::Polling {
            generation: self.last_generation,
        };
        self.last_generation
    }

    /// Drops the active poll handle, returning its generation if one was active.
    pub fn cancel_poll(&mut self) -> Option<PollGeneration> {
        match self.poll {
            PollState::Polling { generation } => {
                self.poll = PollState::Idle;
                Some(generation)
            }
            PollState::Idle | PollState::Completed => None,
        }
    }

    /// Terminal detection; later snapshots are discarded.
    pub fn complete(&mut self) -> Option<PollGeneration> {
        let cancelled = self.cancel_poll();
        self.poll = PollState::Completed;
        cancelled
    }

    /// Clears everything from a previous job. Generations keep increasing.
    pub fn reset(&mut self) {
        self.cancel_poll();
        self.poll = PollState::Idle;
        self.last_applied_seq = None;
        self.result_path = None;
    }

    /// Whether a snapshot tagged `(generation, seq)` should be applied.
    pub fn accept(&mut self, generation: PollGeneration, seq: u64) -> bool {
        let PollState::Polling { generation: active } = self.poll else {
            return false;
        };
        if active != generation {
            return false;
        }
        if self.last_applied_seq.is_some_and(|last| seq <= last) {
            return false;
        }
        self.last_applied_seq = Some(seq);
        true
    }

    pub fn record_result_path(&mut self, path: impl Into<String>) {
        self.result_path = Some(path.into());
    }

    pub fn result_path(&self) -> Option<&str> {
        self.result_path.as_deref()
    }

    pub fn poll_state(&self) -> PollState {
        self.poll
    }

    pub fn is_polling(&self) -> bool {
        matches!(self.poll, PollState::Polling { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_supersedes_previous_generation() {
        let mut session = JobSession::new();
        let first = session.start();
        let second = session.start();
        assert_ne!(first, second);
        assert_eq!(session.poll_state(), PollState::Polling { generation: second });
        assert!(!session.accept(first, 1));
        assert!(session.accept(second, 1));
    }

    #[test]
    fn out_of_order_sequences_are_rejected() {
        let mut session = JobSession::new();
        let generation = session.start();
        assert!(session.accept(generation, 2));
        assert!(!session.accept(generation, 1));
        assert!(!session.accept(generation, 2));
        assert!(session.accept(generation, 3));
    }

    #[test]
    fn completed_session_accepts_nothing() {
        let mut session = JobSession::new();
        let generation = session.start();
        assert_eq!(session.complete(), Some(generation));
        assert!(!session.accept(generation, 9));
        assert_eq!(session.cancel_poll(), None);
    }

    #[test]
    fn reset_clears_result_path_but_not_generation_counter() {
        let mut session = JobSession::new();
        let first = session.start();
        session.record_result_path("out/a.csv");
        session.reset();
        assert_eq!(session.result_path(), None);
        assert_eq!(session.poll_state(), PollState::Idle);
        assert!(session.start() > first);
    }
}
