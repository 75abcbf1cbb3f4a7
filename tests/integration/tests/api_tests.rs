//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance (`DATABASE_URL`)
//! - Optionally Redis (`REDIS_URL`) for the distributed sync lock
//!
//! The chat platform is replaced by a fake REST API on a local port.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use clan_common::SyncGroup;
use clan_core::Snowflake;
use integration_tests::{
    assert_json, assert_status, check_test_env, ErrorBody, FakeMember, FakePlatform, MemberResponse, SyncRequest,
    SyncResponse, TestServer, UpdateRankRequest, TEST_CRON_SECRET,
};
use reqwest::StatusCode;
use serde_json::Value;

const GROUP: u64 = 500;

fn farm() -> Vec<FakeMember> {
    vec![
        FakeMember::new(11, "joe", Some("Farmer Joe [123]"), &["Leader"]),
        FakeMember::new(12, "amy", Some("Amy [45] 🇫🇷"), &["Elder", "Member"]),
        FakeMember::new(13, "hen", None, &[]),
    ]
}

fn sync_request(community: &str) -> SyncRequest {
    SyncRequest {
        external_group_id: GROUP.to_string(),
        internal_group_id: community.to_string(),
    }
}

async fn setup(members: Vec<FakeMember>, groups: Vec<SyncGroup>) -> (FakePlatform, TestServer) {
    let platform = FakePlatform::start(members).await.expect("Failed to start fake platform");
    let server = TestServer::start(&platform.base_url, groups)
        .await
        .expect("Failed to start server");
    (platform, server)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let (_platform, server) = setup(vec![], vec![]).await;
    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "ok");
}

// ============================================================================
// Sync Tests
// ============================================================================

#[tokio::test]
async fn test_sync_requires_token() {
    if !check_test_env() {
        return;
    }

    let (_platform, server) = setup(farm(), vec![]).await;
    let response = server.post("/api/v1/sync", &sync_request("it-unauth")).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_sync_writes_parsed_roster() {
    if !check_test_env() {
        return;
    }

    let (_platform, server) = setup(farm(), vec![]).await;
    let token = server.token();
    let community = integration_tests::unique_community();

    let response = server
        .post_auth("/api/v1/sync", &token, &sync_request(&community))
        .await
        .unwrap();
    let sync: SyncResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(sync.count, 3);
    assert_eq!(sync.upserted, 3);
    assert_eq!(sync.removed, 0);

    let response = server
        .get_auth(&format!("/api/v1/communities/{community}/members"), &token)
        .await
        .unwrap();
    let members: Vec<MemberResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Farmer Joe", "Amy", "hen"]);
    assert_eq!(members[0].rank, "Leader");
    assert_eq!(members[1].rank, "Elder");
    assert_eq!(members[2].rank, "Member");
    // No profile name: the handle is stored as the display name
    assert_eq!(members[2].display_name.as_deref(), Some("hen"));
}

#[tokio::test]
async fn test_resync_is_idempotent_and_removes_leavers() {
    if !check_test_env() {
        return;
    }

    let (platform, server) = setup(farm(), vec![]).await;
    let token = server.token();
    let community = integration_tests::unique_community();

    for _ in 0..2 {
        let response = server
            .post_auth("/api/v1/sync", &token, &sync_request(&community))
            .await
            .unwrap();
        let sync: SyncResponse = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(sync.count, 3);
        assert_eq!(sync.removed, 0);
    }

    // Amy leaves
    platform.set_members(farm().into_iter().filter(|m| m.id != 12).collect());
    let response = server
        .post_auth("/api/v1/sync", &token, &sync_request(&community))
        .await
        .unwrap();
    let sync: SyncResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(sync.count, 2);
    assert_eq!(sync.removed, 1);

    let response = server
        .get_auth(&format!("/api/v1/communities/{community}/members/12"), &token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_sync_source_unavailable() {
    if !check_test_env() {
        return;
    }

    // Nothing listens on the discard port
    let server = TestServer::start("http://127.0.0.1:9", vec![])
        .await
        .expect("Failed to start server");
    let token = server.token();

    let response = server
        .post_auth("/api/v1/sync", &token, &sync_request(&integration_tests::unique_community()))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_GATEWAY).await.unwrap();
    assert_eq!(body.error.code, "SOURCE_UNAVAILABLE");
}

// ============================================================================
// Rank Tests
// ============================================================================

#[tokio::test]
async fn test_rank_update() {
    if !check_test_env() {
        return;
    }

    let (_platform, server) = setup(farm(), vec![]).await;
    let token = server.token();
    let community = integration_tests::unique_community();
    server
        .post_auth("/api/v1/sync", &token, &sync_request(&community))
        .await
        .unwrap();

    let request = UpdateRankRequest {
        member_id: "13".to_string(),
        community_id: community.clone(),
        rank: "CoLeader".to_string(),
    };
    let response = server.post_auth("/api/v1/members/rank", &token, &request).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["ok"], true);

    let response = server
        .get_auth(&format!("/api/v1/communities/{community}/members/13"), &token)
        .await
        .unwrap();
    let member: MemberResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(member.rank, "CoLeader");
    assert_eq!(member.handle, "hen");
    assert_eq!(member.member_id, "13");
}

#[tokio::test]
async fn test_rank_update_rejects_invalid_rank() {
    if !check_test_env() {
        return;
    }

    let (_platform, server) = setup(vec![], vec![]).await;
    let request = UpdateRankRequest {
        member_id: "13".to_string(),
        community_id: "farm-1".to_string(),
        rank: "Boss".to_string(),
    };

    let response = server
        .post_auth("/api/v1/members/rank", &server.token(), &request)
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_RANK");

    let response = server.post("/api/v1/members/rank", &request).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Cron Tests
// ============================================================================

#[tokio::test]
async fn test_cron_sweep() {
    if !check_test_env() {
        return;
    }

    let community = integration_tests::unique_community();
    let groups = vec![SyncGroup {
        external_id: Snowflake::new(GROUP as i64),
        internal_id: community.clone(),
    }];
    let (_platform, server) = setup(farm(), groups).await;

    let response = server.post_empty_auth("/api/v1/cron/sweep", "wrong").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .post_empty_auth("/api/v1/cron/sweep", TEST_CRON_SECRET)
        .await
        .unwrap();
    let report: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(report["deadline_hit"], false);
    assert_eq!(report["groups"][0]["community_id"], community.as_str());
    assert_eq!(report["groups"][0]["status"], "synced");
    assert_eq!(report["groups"][0]["count"], 3);
}
