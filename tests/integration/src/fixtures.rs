//! Test fixtures: a fake platform REST API and request bodies

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique suffix so tests sharing a database don't collide
pub fn unique_suffix() -> u64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    (u64::from(nanos) << 16) | COUNTER.fetch_add(1, Ordering::SeqCst)
}

pub fn unique_community() -> String {
    format!("it-{}", unique_suffix())
}

/// A member as served by the fake platform
#[derive(Debug, Clone)]
pub struct FakeMember {
    pub id: u64,
    pub username: String,
    pub nick: Option<String>,
    /// Names of the member's roles; unknown names are created on the fly
    pub roles: Vec<String>,
}

impl FakeMember {
    pub fn new(id: u64, username: &str, nick: Option<&str>, roles: &[&str]) -> Self {
        Self {
            id,
            username: username.to_string(),
            nick: nick.map(String::from),
            roles: roles.iter().map(|r| (*r).to_string()).collect(),
        }
    }
}

type Roster = Arc<Mutex<Vec<FakeMember>>>;

const ROLE_NAMES: [&str; 4] = ["Leader", "Co-Leader", "Elder", "Member"];

fn role_id(name: &str) -> String {
    let index = ROLE_NAMES.iter().position(|n| *n == name).unwrap_or(ROLE_NAMES.len());
    (900 + index).to_string()
}

/// Fake platform API serving one group's roster
pub struct FakePlatform {
    pub base_url: String,
    roster: Roster,
}

impl FakePlatform {
    pub async fn start(members: Vec<FakeMember>) -> Result<Self> {
        let roster: Roster = Arc::new(Mutex::new(members));

        let app = Router::new()
            .route("/guilds/:group_id", get(guild))
            .route("/guilds/:group_id/members", get(members_page))
            .with_state(roster.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            roster,
        })
    }

    /// Replace the roster served from now on
    pub fn set_members(&self, members: Vec<FakeMember>) {
        if let Ok(mut roster) = self.roster.lock() {
            *roster = members;
        }
    }
}

async fn guild(Path(group_id): Path<String>) -> Json<Value> {
    let roles: Vec<Value> = ROLE_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "id": role_id(name), "name": name, "position": 10 - i, "permissions": "0" }))
        .collect();
    Json(json!({ "id": group_id, "owner_id": "1", "roles": roles }))
}

async fn members_page(State(roster): State<Roster>, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let after: u64 = query.get("after").and_then(|a| a.parse().ok()).unwrap_or(0);
    let members = roster.lock().map(|r| r.clone()).unwrap_or_default();
    let page: Vec<Value> = members
        .iter()
        .filter(|m| m.id > after)
        .map(|m| {
            json!({
                "user": { "id": m.id.to_string(), "username": m.username },
                "nick": m.nick,
                "roles": m.roles.iter().map(|r| role_id(r)).collect::<Vec<_>>(),
            })
        })
        .collect();
    Json(Value::Array(page))
}

#[derive(Debug, Serialize)]
pub struct SyncRequest {
    pub external_group_id: String,
    pub internal_group_id: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateRankRequest {
    pub member_id: String,
    pub community_id: String,
    pub rank: String,
}

#[derive(Debug, Deserialize)]
pub struct SyncResponse {
    pub count: usize,
    pub upserted: usize,
    pub removed: u64,
}

#[derive(Debug, Deserialize)]
pub struct MemberResponse {
    pub member_id: String,
    pub name: String,
    pub display_name: Option<String>,
    pub handle: String,
    pub rank: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
