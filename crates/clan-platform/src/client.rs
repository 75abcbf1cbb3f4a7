//! Platform REST client

use async_trait::async_trait;
use clan_core::{RepoResult, RosterMember, RosterSource, Snowflake};
use reqwest::{header, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::error::{PlatformError, PlatformResult};
use crate::hierarchy;
use crate::models::{ApiErrorBody, ApiGuild, ApiMember, ApiUser, ModifyNick};

const USER_AGENT: &str = concat!("clan-sync (", env!("CARGO_PKG_VERSION"), ")");

/// Largest page the member listing endpoint accepts
const MEMBER_PAGE_SIZE: usize = 1000;

/// Rate-limit retries before giving up on a request
const MAX_RETRIES: u32 = 3;

/// Longest `retry_after` we are willing to sleep through
const MAX_RETRY_WAIT: Duration = Duration::from_secs(10);

/// Client settings
#[derive(Debug, Clone)]
pub struct PlatformClientConfig {
    pub api_base: String,
    pub bot_token: String,
    pub timeout: Duration,
}

impl From<&clan_common::PlatformConfig> for PlatformClientConfig {
    fn from(config: &clan_common::PlatformConfig) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            timeout: config.timeout(),
        }
    }
}

/// REST client authenticated as the bot
#[derive(Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    api_base: String,
    bot_id: Arc<OnceCell<Snowflake>>,
}

impl std::fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl PlatformClient {
    pub fn new(config: PlatformClientConfig) -> PlatformResult<Self> {
        let mut auth = header::HeaderValue::from_str(&format!("Bot {}", config.bot_token))
            .map_err(|e| PlatformError::Build(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| PlatformError::Build(e.to_string()))?;

        Ok(Self {
            http,
            api_base: config.api_base,
            bot_id: Arc::new(OnceCell::new()),
        })
    }

    pub fn from_config(config: &clan_common::PlatformConfig) -> PlatformResult<Self> {
        Self::new(PlatformClientConfig::from(config))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    /// Send a request, sleeping through short rate limits
    async fn send(&self, build: impl Fn() -> RequestBuilder) -> PlatformResult<Response> {
        let mut attempt = 0;
        loop {
            let response = build().send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            let body: ApiErrorBody = response.json().await.unwrap_or_default();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let wait = retry_wait(body.retry_after);
                if attempt < MAX_RETRIES && wait <= MAX_RETRY_WAIT {
                    attempt += 1;
                    warn!(wait_ms = wait.as_millis() as u64, attempt, "Rate limited by platform, retrying");
                    tokio::time::sleep(wait).await;
                    continue;
                }
                return Err(PlatformError::RateLimited {
                    retry_after_ms: wait.as_millis() as u64,
                });
            }

            return Err(match status {
                StatusCode::NOT_FOUND => PlatformError::NotFound(body.message),
                _ => PlatformError::Api {
                    status: status.as_u16(),
                    message: body.message,
                },
            });
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> PlatformResult<T> {
        let url = self.url(path);
        let response = self.send(|| self.http.get(&url)).await?;
        response.json().await.map_err(|e| PlatformError::Parse(e.to_string()))
    }

    /// The bot's own user id, fetched once
    pub async fn bot_id(&self) -> PlatformResult<Snowflake> {
        self.bot_id
            .get_or_try_init(|| async {
                let me: ApiUser = self.get_json("/users/@me").await?;
                info!(bot_id = %me.id, username = %me.username, "Resolved bot identity");
                Ok::<_, PlatformError>(me.id)
            })
            .await
            .copied()
    }

    /// Group with its roles
    #[instrument(skip(self))]
    pub async fn fetch_guild(&self, group_id: Snowflake) -> PlatformResult<ApiGuild> {
        self.get_json(&format!("/guilds/{group_id}")).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_member(&self, group_id: Snowflake, member_id: Snowflake) -> PlatformResult<ApiMember> {
        self.get_json(&format!("/guilds/{group_id}/members/{member_id}")).await
    }

    /// Every member of a group, following `after` pagination until a short page
    #[instrument(skip(self))]
    pub async fn fetch_all_members(&self, group_id: Snowflake) -> PlatformResult<Vec<ApiMember>> {
        let mut members: Vec<ApiMember> = Vec::new();
        let mut after: Option<Snowflake> = None;

        loop {
            let mut path = format!("/guilds/{group_id}/members?limit={MEMBER_PAGE_SIZE}");
            if let Some(after) = after {
                path.push_str(&format!("&after={after}"));
            }

            let page: Vec<ApiMember> = self.get_json(&path).await?;
            let page_len = page.len();
            debug!(page_len, "Fetched member page");

            after = page.iter().map(|m| m.user.id).max();
            members.extend(page);

            if page_len < MEMBER_PAGE_SIZE || after.is_none() {
                break;
            }
        }

        Ok(members)
    }

    /// Set a member's group nickname
    #[instrument(skip(self))]
    pub async fn modify_nick(&self, group_id: Snowflake, member_id: Snowflake, nick: &str) -> PlatformResult<()> {
        let url = self.url(&format!("/guilds/{group_id}/members/{member_id}"));
        let body = ModifyNick { nick };

        self.send(|| self.http.request(Method::PATCH, &url).json(&body))
            .await
            .map_err(|e| match e {
                PlatformError::Api { status: 403, .. } => PlatformError::Forbidden(member_id),
                other => other,
            })?;

        Ok(())
    }
}

#[async_trait]
impl RosterSource for PlatformClient {
    #[instrument(skip(self))]
    async fn list_members(&self, group_id: Snowflake) -> RepoResult<Vec<RosterMember>> {
        let guild = self.fetch_guild(group_id).await?;
        let rank_roles = guild.rank_roles();
        let members = self.fetch_all_members(group_id).await?;

        info!(members = members.len(), rank_roles = rank_roles.len(), "Fetched live roster");

        Ok(members.iter().map(|m| m.to_roster_member(&rank_roles)).collect())
    }

    #[instrument(skip(self))]
    async fn can_manage(&self, group_id: Snowflake, member_id: Snowflake) -> RepoResult<bool> {
        let bot_id = self.bot_id().await?;
        if bot_id == member_id {
            return Ok(false);
        }

        let guild = self.fetch_guild(group_id).await?;
        let bot = self.fetch_member(group_id, bot_id).await?;
        let target = self.fetch_member(group_id, member_id).await?;

        Ok(hierarchy::can_rename(&guild, bot_id, &bot.roles, member_id, &target.roles))
    }

    #[instrument(skip(self))]
    async fn set_profile_name(&self, group_id: Snowflake, member_id: Snowflake, name: &str) -> RepoResult<()> {
        self.modify_nick(group_id, member_id, name).await?;
        Ok(())
    }
}

/// Sleep requested by a 429 body; garbage or huge values exceed the retry cap
fn retry_wait(retry_after: Option<f64>) -> Duration {
    Duration::try_from_secs_f64(retry_after.unwrap_or(1.0).max(0.0)).unwrap_or(MAX_RETRY_WAIT + Duration::from_secs(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::{get, patch};
    use axum::{Json, Router};
    use clan_core::{DomainError, Rank};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    #[test]
    fn test_retry_wait_handles_extreme_values() {
        assert_eq!(retry_wait(None), Duration::from_secs(1));
        assert_eq!(retry_wait(Some(0.25)), Duration::from_millis(250));
        assert_eq!(retry_wait(Some(-3.0)), Duration::ZERO);
        assert!(retry_wait(Some(1e20)) > MAX_RETRY_WAIT);
        assert!(retry_wait(Some(f64::INFINITY)) > MAX_RETRY_WAIT);
    }

    /// Serve a fake platform API on an ephemeral port
    async fn spawn_fake_api(router: Router) -> PlatformClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        PlatformClient::new(PlatformClientConfig {
            api_base: format!("http://{addr}"),
            bot_token: "test-token".to_string(),
            timeout: Duration::from_millis(500),
        })
        .unwrap()
    }

    fn guild_json() -> Value {
        json!({
            "id": "100",
            "owner_id": "1",
            "roles": [
                { "id": "100", "name": "@everyone", "position": 0, "permissions": "0" },
                { "id": "201", "name": "Leader", "position": 5, "permissions": "0" },
                { "id": "202", "name": "Elder", "position": 2, "permissions": "0" },
                { "id": "301", "name": "Bot", "position": 3, "permissions": "134217728" }
            ]
        })
    }

    fn member_json(id: u64, roles: &[&str]) -> Value {
        json!({
            "user": { "id": id.to_string(), "username": format!("user{id}") },
            "nick": format!("Name{id} [{id}]"),
            "roles": roles,
        })
    }

    #[tokio::test]
    async fn test_list_members_paginates_and_ranks() {
        let router = Router::new()
            .route("/guilds/:id", get(|| async { Json(guild_json()) }))
            .route(
                "/guilds/:id/members",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let after: u64 = q.get("after").and_then(|a| a.parse().ok()).unwrap_or(0);
                    // 1001 members: one full page, then a single member
                    let ids: Vec<u64> = (after + 1..=1001).take(MEMBER_PAGE_SIZE).collect();
                    let page: Vec<Value> = ids
                        .iter()
                        .map(|&id| if id == 1001 { member_json(id, &["202"]) } else { member_json(id, &[]) })
                        .collect();
                    Json(page)
                }),
            );
        let client = spawn_fake_api(router).await;

        let roster = client.list_members(Snowflake::new(100)).await.unwrap();

        assert_eq!(roster.len(), 1001);
        let last = roster.last().unwrap();
        assert_eq!(last.member_id, Snowflake::new(1001));
        assert_eq!(last.rank, Rank::Elder);
        assert_eq!(roster[0].rank, Rank::Member);
        assert_eq!(roster[0].profile_name.as_deref(), Some("Name1 [1]"));
    }

    #[tokio::test]
    async fn test_server_error_is_source_unavailable() {
        let router = Router::new().route(
            "/guilds/:id",
            get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, Json(json!({ "message": "boom" }))) }),
        );
        let client = spawn_fake_api(router).await;

        let err = client.list_members(Snowflake::new(100)).await.unwrap_err();
        assert!(err.is_source_unavailable());
    }

    #[tokio::test]
    async fn test_timeout_is_source_unavailable() {
        let router = Router::new().route(
            "/guilds/:id",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(guild_json())
            }),
        );
        let client = spawn_fake_api(router).await;

        let err = client.list_members(Snowflake::new(100)).await.unwrap_err();
        assert!(matches!(err, DomainError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_can_manage_uses_hierarchy() {
        let router = Router::new()
            .route("/users/@me", get(|| async { Json(json!({ "id": "900", "username": "bot" })) }))
            .route("/guilds/:id", get(|| async { Json(guild_json()) }))
            .route(
                "/guilds/:id/members/:member",
                get(|Path((_, member)): Path<(String, u64)>| async move {
                    match member {
                        900 => Json(member_json(900, &["301"])),
                        7 => Json(member_json(7, &["201"])),
                        other => Json(member_json(other, &["202"])),
                    }
                }),
            );
        let client = spawn_fake_api(router).await;
        let group = Snowflake::new(100);

        assert!(client.can_manage(group, Snowflake::new(8)).await.unwrap());
        // Leader outranks the bot
        assert!(!client.can_manage(group, Snowflake::new(7)).await.unwrap());
        // Owner
        assert!(!client.can_manage(group, Snowflake::new(1)).await.unwrap());
        // Itself
        assert!(!client.can_manage(group, Snowflake::new(900)).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_profile_name_forbidden() {
        let router = Router::new().route(
            "/guilds/:id/members/:member",
            patch(|| async { (AxumStatus::FORBIDDEN, Json(json!({ "message": "Missing Permissions" }))) }),
        );
        let client = spawn_fake_api(router).await;

        let err = client
            .set_profile_name(Snowflake::new(100), Snowflake::new(8), "Joe")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientPrivilege(id) if id == Snowflake::new(8)));
    }

    #[tokio::test]
    async fn test_set_profile_name_sends_nick() {
        let router = Router::new().route(
            "/guilds/:id/members/:member",
            patch(|Json(body): Json<Value>| async move {
                if body["nick"] == "Joe" {
                    AxumStatus::NO_CONTENT
                } else {
                    AxumStatus::BAD_REQUEST
                }
            }),
        );
        let client = spawn_fake_api(router).await;

        client
            .set_profile_name(Snowflake::new(100), Snowflake::new(8), "Joe")
            .await
            .unwrap();
    }
}
