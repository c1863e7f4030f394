//! REST request bodies

use serde::{Deserialize, Serialize};

use rally_domain::{MessageId, UserId};

/// Body for every friend-graph action addressed at another user
/// (send, accept, decline, remove, block, unblock).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendTargetRequest {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub receiver_id: UserId,
    pub content: String,
    /// Id the client used for its provisional copy of the message
    pub client_message_id: MessageId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTournamentRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSearchQuery {
    pub q: String,
}
