use serde::{Deserialize, Serialize};

use crate::types::Message;

/// Full message history for one session, as returned by `GET /history/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDetail {
    /// Messages in arrival order.
    pub messages: Vec<Message>,
}

#[cfg(test)]
mod tests {
    use serde_json::{from_value, json};

    use super::*;
    use crate::types::MessageRole;

    #[test]
    fn detail_shape() {
        let detail: SessionDetail = from_value(json!({
            "messages": [
                {"role": "user", "content": "I have a sore throat."},
                {"role": "model", "content": "How long has it lasted?"}
            ]
        }))
        .unwrap();
        assert_eq!(detail.messages.len(), 2);
        assert_eq!(detail.messages[0].role, MessageRole::User);
        assert_eq!(detail.messages[1].text, "How long has it lasted?");
    }
}
