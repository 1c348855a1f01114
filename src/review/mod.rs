pub mod prompt;

use tracing::{debug, info};

use crate::error::ReviewError;
use crate::parser::candidate::{CandidateId, JokeCandidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Committed,
    Discarded,
}

/// Point-in-time copy of a session for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub candidates: Vec<JokeCandidate>,
    pub selected: usize,
}

/// The working set of candidates a user reviews before anything is stored.
///
/// Every operation fails with [`ReviewError::SessionClosed`] once the session
/// has been committed or discarded.
#[derive(Debug)]
pub struct ReviewSession {
    state: SessionState,
    candidates: Vec<JokeCandidate>,
}

impl ReviewSession {
    pub fn new(candidates: Vec<JokeCandidate>) -> Self {
        ReviewSession {
            state: SessionState::Active,
            candidates,
        }
    }

    pub fn candidates(&self) -> &[JokeCandidate] {
        &self.candidates
    }

    pub fn selected_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.is_included()).count()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            candidates: self.candidates.clone(),
            selected: self.selected_count(),
        }
    }

    fn ensure_active(&self) -> Result<(), ReviewError> {
        match self.state {
            SessionState::Active => Ok(()),
            SessionState::Committed | SessionState::Discarded => Err(ReviewError::SessionClosed),
        }
    }

    fn find_mut(&mut self, id: CandidateId) -> Option<&mut JokeCandidate> {
        self.candidates.iter_mut().find(|c| c.id() == id)
    }

    /// Flip inclusion of a candidate. Unknown ids are ignored.
    pub fn toggle_inclusion(&mut self, id: CandidateId) -> Result<(), ReviewError> {
        self.ensure_active()?;
        if let Some(c) = self.find_mut(id) {
            let included = !c.is_included();
            c.set_included(included);
        }
        Ok(())
    }

    /// Include or exclude every candidate at once.
    pub fn set_all_included(&mut self, included: bool) -> Result<(), ReviewError> {
        self.ensure_active()?;
        for c in &mut self.candidates {
            c.set_included(included);
        }
        Ok(())
    }

    pub fn edit(&mut self, id: CandidateId, title: &str, body: &str) -> Result<(), ReviewError> {
        self.ensure_active()?;
        let c = self.find_mut(id).ok_or(ReviewError::NotFound(id))?;
        c.set_text(title, body);
        Ok(())
    }

    /// Remove a candidate from the working set. Deleting twice is fine.
    pub fn delete(&mut self, id: CandidateId) -> Result<(), ReviewError> {
        self.ensure_active()?;
        self.candidates.retain(|c| c.id() != id);
        Ok(())
    }

    /// Close the session and hand back the included candidates in session
    /// order. With nothing included the session stays open and untouched.
    pub fn commit(&mut self) -> Result<Vec<JokeCandidate>, ReviewError> {
        self.ensure_active()?;
        if self.selected_count() == 0 {
            debug!("Commit refused, nothing selected");
            return Err(ReviewError::NothingSelected);
        }

        let selected: Vec<JokeCandidate> = std::mem::take(&mut self.candidates)
            .into_iter()
            .filter(|c| c.is_included())
            .collect();
        self.state = SessionState::Committed;
        info!("Committed {} jokes", selected.len());
        Ok(selected)
    }

    pub fn discard(&mut self) -> Result<(), ReviewError> {
        self.ensure_active()?;
        self.candidates.clear();
        self.state = SessionState::Discarded;
        info!("Review session discarded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(titles: &[&str]) -> ReviewSession {
        ReviewSession::new(titles.iter().map(|t| JokeCandidate::new(t, "body")).collect())
    }

    fn titles(jokes: &[JokeCandidate]) -> Vec<&str> {
        jokes.iter().map(|j| j.title()).collect()
    }

    #[test]
    fn commit_returns_included_in_order() {
        let mut s = session(&["A", "B", "C"]);
        let b = s.candidates()[1].id();
        s.toggle_inclusion(b).unwrap();
        let committed = s.commit().unwrap();
        assert_eq!(titles(&committed), vec!["A", "C"]);
        assert_eq!(s.snapshot().state, SessionState::Committed);
    }

    #[test]
    fn toggle_twice_restores() {
        let mut s = session(&["A"]);
        let a = s.candidates()[0].id();
        s.toggle_inclusion(a).unwrap();
        assert!(!s.candidates()[0].is_included());
        s.toggle_inclusion(a).unwrap();
        assert!(s.candidates()[0].is_included());
    }

    #[test]
    fn toggle_unknown_is_noop() {
        let mut s = session(&["A"]);
        let gone = s.candidates()[0].id();
        s.delete(gone).unwrap();
        assert_eq!(s.toggle_inclusion(gone), Ok(()));
    }

    #[test]
    fn edit_trims() {
        let mut s = session(&["A"]);
        let a = s.candidates()[0].id();
        s.edit(a, "  New title ", "\n new body\n").unwrap();
        assert_eq!(s.candidates()[0].title(), "New title");
        assert_eq!(s.candidates()[0].body(), "new body");
    }

    #[test]
    fn edit_unknown_is_not_found() {
        let mut s = session(&["A", "B"]);
        let b = s.candidates()[1].id();
        s.delete(b).unwrap();
        assert_eq!(s.edit(b, "x", "y"), Err(ReviewError::NotFound(b)));
    }

    #[test]
    fn delete_is_idempotent() {
        let mut s = session(&["A", "B"]);
        let a = s.candidates()[0].id();
        s.delete(a).unwrap();
        s.delete(a).unwrap();
        assert_eq!(titles(s.candidates()), vec!["B"]);
    }

    #[test]
    fn deleted_never_committed() {
        let mut s = session(&["A", "B"]);
        let a = s.candidates()[0].id();
        s.delete(a).unwrap();
        assert_eq!(titles(&s.commit().unwrap()), vec!["B"]);
    }

    #[test]
    fn nothing_selected_keeps_session_open() {
        let mut s = session(&["A", "B"]);
        s.set_all_included(false).unwrap();
        assert_eq!(s.commit(), Err(ReviewError::NothingSelected));
        assert_eq!(s.snapshot().state, SessionState::Active);
        assert_eq!(s.candidates().len(), 2);

        let a = s.candidates()[0].id();
        s.toggle_inclusion(a).unwrap();
        assert_eq!(titles(&s.commit().unwrap()), vec!["A"]);
    }

    #[test]
    fn empty_session_commit() {
        let mut s = ReviewSession::new(Vec::new());
        assert_eq!(s.commit(), Err(ReviewError::NothingSelected));
    }

    #[test]
    fn closed_after_commit() {
        let mut s = session(&["A"]);
        let a = s.candidates()[0].id();
        s.commit().unwrap();
        assert_eq!(s.toggle_inclusion(a), Err(ReviewError::SessionClosed));
        assert_eq!(s.edit(a, "x", "y"), Err(ReviewError::SessionClosed));
        assert_eq!(s.delete(a), Err(ReviewError::SessionClosed));
        assert_eq!(s.set_all_included(true), Err(ReviewError::SessionClosed));
        assert_eq!(s.commit(), Err(ReviewError::SessionClosed));
        assert_eq!(s.discard(), Err(ReviewError::SessionClosed));
    }

    #[test]
    fn closed_after_discard() {
        let mut s = session(&["A"]);
        s.discard().unwrap();
        assert_eq!(s.snapshot().state, SessionState::Discarded);
        assert!(s.candidates().is_empty());
        assert_eq!(s.commit(), Err(ReviewError::SessionClosed));
    }

    #[test]
    fn snapshot_is_detached() {
        let mut s = session(&["A", "B"]);
        let snap = s.snapshot();
        let a = s.candidates()[0].id();
        s.toggle_inclusion(a).unwrap();
        assert_eq!(snap.selected, 2);
        assert!(snap.candidates[0].is_included());
        assert_eq!(s.snapshot().selected, 1);
        assert_eq!(snap.state, SessionState::Active);
    }
}
