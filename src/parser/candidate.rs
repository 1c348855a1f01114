use std::fmt;

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CandidateId(Uuid);

impl CandidateId {
    fn new() -> Self {
        CandidateId(Uuid::new_v4())
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A joke recognized on a page, waiting for review before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JokeCandidate {
    id: CandidateId,
    title: String,
    body: String,
    is_included: bool,
}

impl JokeCandidate {
    pub fn new(title: &str, body: &str) -> Self {
        JokeCandidate {
            id: CandidateId::new(),
            title: title.trim().to_string(),
            body: body.trim().to_string(),
            is_included: true,
        }
    }

    pub fn id(&self) -> CandidateId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_included(&self) -> bool {
        self.is_included
    }

    pub(crate) fn set_text(&mut self, title: &str, body: &str) {
        self.title = title.trim().to_string();
        self.body = body.trim().to_string();
    }

    pub(crate) fn set_included(&mut self, included: bool) {
        self.is_included = included;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn included_by_default() {
        let c = JokeCandidate::new("Title", "Body");
        assert!(c.is_included());
    }

    #[test]
    fn trims_text() {
        let c = JokeCandidate::new("  Title \n", "\tBody  ");
        assert_eq!(c.title(), "Title");
        assert_eq!(c.body(), "Body");
    }

    #[test]
    fn ids_are_unique() {
        let a = JokeCandidate::new("same", "same");
        let b = JokeCandidate::new("same", "same");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn serializes_flat_id() {
        let c = JokeCandidate::new("Title", "");
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["id"], c.id().to_string());
        assert_eq!(json["is_included"], true);
    }
}
