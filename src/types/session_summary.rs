use serde::{Deserialize, Serialize};

/// Lightweight projection of a session, used for sidebar-style listings.
///
/// Summaries are always re-fetched from the backend; they are never trusted
/// beyond the refresh that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Opaque backend-assigned session id.
    pub id: String,

    /// Human-readable title.
    pub title: String,
}

#[cfg(test)]
mod tests {
    use serde_json::{from_value, json};

    use super::*;

    #[test]
    fn listing_shape() {
        let sessions: Vec<SessionSummary> = from_value(json!([
            {"id": "s-2", "title": "Headache follow-up"},
            {"id": "s-1", "title": "First visit"}
        ]))
        .unwrap();
        assert_eq!(sessions.len(), 2);
        // Backend order is preserved, most recent first.
        assert_eq!(sessions[0].id, "s-2");
    }
}
