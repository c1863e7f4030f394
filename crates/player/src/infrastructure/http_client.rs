//! REST adapter for the `SocialApi` port, built on reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use rally_domain::{
    Achievement, ConversationId, Profile, ProfilePatch, Tournament, TournamentId, UserId,
    UserSummary,
};
use rally_shared::{
    ApiErrorBody, BootstrapPayload, CreateTournamentRequest, FriendTargetRequest,
    OnlineCountResponse, OnlineStatusResponse, SendMessageRequest, UserSearchQuery,
    WireConversation, WireTournament,
};

use crate::ports::outbound::{ApiError, SocialApi};

/// Default request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Client for the Rally REST API.
#[derive(Clone)]
pub struct HttpSocialApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpSocialApi {
    pub fn new(base_url: Url, token: Option<String>, timeout_ms: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url,
            token,
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::Network(format!("Invalid URL for {}: {}", path, e)))?;
        let builder = self.client.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(ApiErrorBody::into_message)
            .or_else(|| Some(text.trim().to_string()).filter(|t| !t.is_empty()))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        tracing::warn!(status = status.as_u16(), "API request failed: {}", message);
        Err(ApiError::server(status.as_u16(), message))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        decode(response).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(method, path)?.json(body)).await?;
        decode(response).await
    }

    async fn send_no_response<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let builder = self.request(method, path)?;
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };
        self.send(builder).await.map(|_| ())
    }

    async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.send_no_response::<()>(Method::POST, path, None).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl SocialApi for HttpSocialApi {
    async fn fetch_bootstrap(&self) -> Result<BootstrapPayload, ApiError> {
        self.get_json("api/users/me/bootstrap").await
    }

    async fn fetch_online_count(&self) -> Result<u32, ApiError> {
        let response: OnlineCountResponse = self.get_json("api/users/online/count").await?;
        Ok(response.count)
    }

    async fn fetch_conversations(&self) -> Result<Vec<WireConversation>, ApiError> {
        self.get_json("api/conversations").await
    }

    async fn fetch_tournaments(&self) -> Result<Vec<Tournament>, ApiError> {
        let wire: Vec<WireTournament> = self.get_json("api/tournaments").await?;
        Ok(wire.iter().map(WireTournament::to_tournament).collect())
    }

    async fn fetch_achievement_catalogue(&self) -> Result<Vec<Achievement>, ApiError> {
        self.get_json("api/achievements").await
    }

    async fn online_status(&self, user_id: UserId) -> Result<bool, ApiError> {
        let response: OnlineStatusResponse = self
            .get_json(&format!("api/users/{}/online-status", user_id))
            .await?;
        Ok(response.online)
    }

    async fn send_friend_request(&self, user_id: UserId) -> Result<(), ApiError> {
        let body = FriendTargetRequest { user_id };
        self.send_no_response(Method::POST, "api/friends/requests", Some(&body))
            .await
    }

    async fn accept_friend_request(&self, user_id: UserId) -> Result<(), ApiError> {
        let body = FriendTargetRequest { user_id };
        self.send_no_response(Method::POST, "api/friends/requests/accept", Some(&body))
            .await
    }

    async fn decline_friend_request(&self, user_id: UserId) -> Result<(), ApiError> {
        let body = FriendTargetRequest { user_id };
        self.send_no_response(Method::POST, "api/friends/requests/decline", Some(&body))
            .await
    }

    async fn remove_friend(&self, user_id: UserId) -> Result<(), ApiError> {
        self.send_no_response::<()>(Method::DELETE, &format!("api/friends/{}", user_id), None)
            .await
    }

    async fn block_user(&self, user_id: UserId) -> Result<(), ApiError> {
        let body = FriendTargetRequest { user_id };
        self.send_no_response(Method::POST, "api/users/blocked", Some(&body))
            .await
    }

    async fn unblock_user(&self, user_id: UserId) -> Result<(), ApiError> {
        self.send_no_response::<()>(
            Method::DELETE,
            &format!("api/users/blocked/{}", user_id),
            None,
        )
        .await
    }

    async fn search_users(&self, query: String) -> Result<Vec<UserSummary>, ApiError> {
        let builder = self
            .request(Method::GET, "api/users/search")?
            .query(&UserSearchQuery { q: query });
        decode(self.send(builder).await?).await
    }

    async fn create_tournament(&self, name: String) -> Result<Tournament, ApiError> {
        let wire: WireTournament = self
            .send_json(Method::POST, "api/tournaments", &CreateTournamentRequest { name })
            .await?;
        Ok(wire.to_tournament())
    }

    async fn join_tournament(&self, id: TournamentId) -> Result<(), ApiError> {
        self.post_empty(&format!("api/tournaments/{}/join", id)).await
    }

    async fn leave_tournament(&self, id: TournamentId) -> Result<(), ApiError> {
        self.post_empty(&format!("api/tournaments/{}/leave", id)).await
    }

    async fn start_tournament(&self, id: TournamentId) -> Result<Tournament, ApiError> {
        let builder = self.request(Method::POST, &format!("api/tournaments/{}/start", id))?;
        let wire: WireTournament = decode(self.send(builder).await?).await?;
        Ok(wire.to_tournament())
    }

    async fn stop_tournament(&self, id: TournamentId) -> Result<Tournament, ApiError> {
        let builder = self.request(Method::POST, &format!("api/tournaments/{}/stop", id))?;
        let wire: WireTournament = decode(self.send(builder).await?).await?;
        Ok(wire.to_tournament())
    }

    async fn open_conversation(&self, user_id: UserId) -> Result<WireConversation, ApiError> {
        self.send_json(
            Method::POST,
            "api/conversations",
            &FriendTargetRequest { user_id },
        )
        .await
    }

    async fn fetch_conversation(&self, id: ConversationId) -> Result<WireConversation, ApiError> {
        self.get_json(&format!("api/conversations/{}", id)).await
    }

    async fn send_message(&self, request: SendMessageRequest) -> Result<(), ApiError> {
        self.send_no_response(Method::POST, "api/messages", Some(&request))
            .await
    }

    async fn update_profile(&self, patch: ProfilePatch) -> Result<Profile, ApiError> {
        self.send_json(Method::PATCH, "api/users/me/profile", &patch)
            .await
    }
}
