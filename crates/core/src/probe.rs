use crate::{candidates, Entry};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("candidate list is empty")]
    EmptyCandidates,
}

/// Where the probe stands in its candidate walk. `Resolved` is terminal
/// and names the candidate index being displayed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProbeStatus {
    Pending(usize),
    Resolved(usize),
}

/// Outcome of one load attempt, tagged with the controller generation the
/// attempt was issued under. Events from a superseded generation are
/// discarded, which is what makes late responses harmless.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProbeEvent {
    Loaded { generation: u64, index: usize },
    Failed { generation: u64, index: usize },
}

/// Sequential attempt-and-fallback driver over a candidate list.
///
/// At most one attempt is in flight: the surface loads `current_url()` and
/// feeds back exactly one event per attempt. Failure at the last index
/// resolves to the placeholder regardless of the placeholder's own outcome.
#[derive(Debug, Clone)]
pub struct ProbeController {
    candidates: Vec<String>,
    generation: u64,
    status: ProbeStatus,
}

impl ProbeController {
    pub fn new(candidates: Vec<String>) -> Result<Self, ProbeError> {
        if candidates.is_empty() {
            return Err(ProbeError::EmptyCandidates);
        }
        Ok(Self {
            candidates,
            generation: 0,
            status: ProbeStatus::Pending(0),
        })
    }

    /// Controller primed with the entry's generated candidate list, which
    /// is never empty.
    pub fn for_entry(entry: &Entry) -> Self {
        Self {
            candidates: candidates(entry),
            generation: 0,
            status: ProbeStatus::Pending(0),
        }
    }

    /// Install a new candidate list and restart the walk. Bumps the
    /// generation so events from the previous list no longer apply.
    pub fn reset(&mut self, candidates: Vec<String>) -> Result<(), ProbeError> {
        if candidates.is_empty() {
            return Err(ProbeError::EmptyCandidates);
        }
        self.candidates = candidates;
        self.generation += 1;
        self.status = ProbeStatus::Pending(0);
        Ok(())
    }

    pub fn status(&self) -> ProbeStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn cursor(&self) -> usize {
        match self.status {
            ProbeStatus::Pending(index) | ProbeStatus::Resolved(index) => index,
        }
    }

    /// URL the surface should attempt (or display, once resolved).
    pub fn current_url(&self) -> &str {
        &self.candidates[self.cursor()]
    }

    pub fn loaded(&self) -> bool {
        matches!(self.status, ProbeStatus::Resolved(_))
    }

    /// Event describing a successful load of the current attempt.
    pub fn success_event(&self) -> ProbeEvent {
        ProbeEvent::Loaded {
            generation: self.generation,
            index: self.cursor(),
        }
    }

    /// Event describing a failed load of the current attempt.
    pub fn failure_event(&self) -> ProbeEvent {
        ProbeEvent::Failed {
            generation: self.generation,
            index: self.cursor(),
        }
    }

    /// Apply a load outcome. Returns whether the controller advanced;
    /// stale events (wrong generation, wrong index, already resolved) are
    /// ignored.
    pub fn handle(&mut self, event: ProbeEvent) -> bool {
        let (generation, index, success) = match event {
            ProbeEvent::Loaded { generation, index } => (generation, index, true),
            ProbeEvent::Failed { generation, index } => (generation, index, false),
        };
        if generation != self.generation {
            return false;
        }
        let ProbeStatus::Pending(cursor) = self.status else {
            return false;
        };
        if index != cursor {
            return false;
        }
        self.status = if success || cursor + 1 == self.candidates.len() {
            ProbeStatus::Resolved(cursor)
        } else {
            ProbeStatus::Pending(cursor + 1)
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(urls: &[&str]) -> ProbeController {
        ProbeController::new(urls.iter().map(ToString::to_string).collect()).expect("candidates")
    }

    #[test]
    fn rejects_empty_candidate_list() {
        assert!(matches!(
            ProbeController::new(Vec::new()),
            Err(ProbeError::EmptyCandidates)
        ));
    }

    #[test]
    fn walks_failures_then_resolves_on_success() {
        let mut probe = controller(&["/assets/a.jpg", "/assets/a.png", "/assets/placeholder.jpg"]);
        assert_eq!(probe.status(), ProbeStatus::Pending(0));

        assert!(probe.handle(probe.failure_event()));
        assert_eq!(probe.status(), ProbeStatus::Pending(1));

        assert!(probe.handle(probe.failure_event()));
        assert_eq!(probe.status(), ProbeStatus::Pending(2));

        assert!(probe.handle(probe.success_event()));
        assert_eq!(probe.status(), ProbeStatus::Resolved(2));
        assert!(probe.loaded());
        assert_eq!(probe.current_url(), "/assets/placeholder.jpg");
    }

    #[test]
    fn exhaustion_resolves_to_last_candidate() {
        let mut probe = controller(&["/assets/a.jpg", "/assets/placeholder.jpg"]);
        probe.handle(probe.failure_event());
        probe.handle(probe.failure_event());
        assert_eq!(probe.status(), ProbeStatus::Resolved(1));
        assert_eq!(probe.current_url(), "/assets/placeholder.jpg");
    }

    #[test]
    fn repeated_event_for_same_index_advances_once() {
        let mut probe = controller(&["/assets/a.jpg", "/assets/b.jpg", "/assets/c.jpg"]);
        let first_failure = probe.failure_event();
        assert!(probe.handle(first_failure));
        assert!(!probe.handle(first_failure));
        assert_eq!(probe.status(), ProbeStatus::Pending(1));
    }

    #[test]
    fn stale_generation_events_are_discarded() {
        let mut probe = controller(&["/assets/a.jpg", "/assets/b.jpg"]);
        let stale = probe.failure_event();
        probe
            .reset(vec![
                "/assets/x.jpg".to_string(),
                "/assets/placeholder.jpg".to_string(),
            ])
            .expect("reset");
        assert!(!probe.handle(stale));
        assert_eq!(probe.status(), ProbeStatus::Pending(0));
        assert_eq!(probe.current_url(), "/assets/x.jpg");
    }

    #[test]
    fn events_after_resolution_are_ignored() {
        let mut probe = controller(&["/assets/a.jpg", "/assets/b.jpg"]);
        assert!(probe.handle(probe.success_event()));
        let late = ProbeEvent::Failed {
            generation: probe.generation(),
            index: 0,
        };
        assert!(!probe.handle(late));
        assert_eq!(probe.status(), ProbeStatus::Resolved(0));
    }
}
