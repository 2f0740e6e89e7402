//! Integration tests for the console session client
//!
//! These tests run the real HTTP session against a wiremock console:
//! - Login check and credential rejection
//! - Site listing pagination
//! - Site detail with scan template and alerts
//! - Site creation with its schedule and cloned alerts
//! - Calls after logout

use chrono::{TimeZone, Utc};
use nexpose_bulk::error_handling::{AuthError, RemoteError};
use nexpose_bulk::models::{
    AlertConfig, AlertVariant, NewSite, ScanEvent, Schedule, ScheduleKind, SiteId, VulnEvent,
};
use nexpose_bulk::{run, Action, ConsoleSession, Connector, RunConfig, SiteApi};
use serde_json::json;
use url::Url;
use wiremock::matchers::{basic_auth, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to build a connector for the mock console
fn connector_for(server: &MockServer) -> Connector {
    let base = Url::parse(&format!("{}/", server.uri())).expect("Mock server URI is a valid URL");
    Connector::new(base).timeout_seconds(5)
}

/// Helper function to accept the login check for nxadmin/secret
async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/3/administration/info"))
        .and(basic_auth("nxadmin", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "version": {} })))
        .mount(server)
        .await;
}

fn new_site() -> NewSite {
    NewSite {
        name: "Branch offices".to_string(),
        description: "WAN edge".to_string(),
        included_addresses: vec!["10.1.0.0/24".to_string(), "edge.example.com".to_string()],
        scan_template_id: "full-audit".to_string(),
        schedules: vec![Schedule::every(
            ScheduleKind::Weekly,
            Utc.with_ymd_and_hms(2026, 3, 1, 1, 0, 0).unwrap(),
        )],
        alerts: vec![AlertConfig {
            name: "Ops mail".to_string(),
            enabled: true,
            max_alerts: 25,
            scan_filter: [ScanEvent::Start, ScanEvent::Fail].into_iter().collect(),
            vuln_filter: [VulnEvent::Confirmed].into_iter().collect(),
            severity_threshold: None,
            variant: AlertVariant::Smtp {
                sender: "nexpose@example.com".to_string(),
                server: "smtp.example.com".to_string(),
                recipients: vec!["ops@example.com".to_string()],
            },
        }],
    }
}

#[tokio::test]
async fn test_rejected_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/administration/info"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = connector_for(&server).connect("nxadmin", "wrong").await;
    assert!(
        matches!(result, Err(AuthError::Rejected { status: 401, .. })),
        "expected a rejected login"
    );
}

#[tokio::test]
async fn test_login_server_error_is_unexpected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/administration/info"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = connector_for(&server).connect("nxadmin", "secret").await;
    assert!(matches!(result, Err(AuthError::Unexpected { status: 503, .. })));
}

#[tokio::test]
async fn test_list_sites_follows_pages() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/3/sites"))
        .and(query_param("page", "0"))
        .and(query_param("size", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": [ { "id": 1, "name": "HQ" }, { "id": 2, "name": "DMZ" } ],
            "page": { "number": 0, "size": 500, "totalPages": 2, "totalResources": 3 }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3/sites"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": [ { "id": 5, "name": "Lab" } ],
            "page": { "number": 1, "size": 500, "totalPages": 2, "totalResources": 3 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = connector_for(&server)
        .connect("nxadmin", "secret")
        .await
        .expect("Login should succeed");
    let sites = session.list_sites().await.expect("Listing should succeed");

    let ids: Vec<u64> = sites.iter().map(|s| s.id.0).collect();
    assert_eq!(ids, vec![1, 2, 5]);
    assert_eq!(sites[2].name, "Lab");
}

#[tokio::test]
async fn test_load_site_with_template_and_alerts() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/3/sites/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "name": "Lab",
            "description": "lab hosts",
            "scanTemplate": "full-audit"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3/scan_templates/full-audit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "full-audit",
            "name": "Full audit without Web Spider"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3/sites/7/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": [
                {
                    "id": 1,
                    "name": "Ops syslog",
                    "enabled": false,
                    "maximumAlerts": 10,
                    "notification": "Syslog",
                    "enabledScanEvents": { "start": true, "stopped": true },
                    "server": "logs.example.com"
                }
            ]
        })))
        .mount(&server)
        .await;

    let session = connector_for(&server)
        .connect("nxadmin", "secret")
        .await
        .expect("Login should succeed");
    let site = session.load_site(SiteId(7)).await.expect("Site should load");

    assert_eq!(site.name, "Lab");
    assert_eq!(site.description, "lab hosts");
    assert_eq!(site.scan_template_id, "full-audit");
    assert_eq!(site.scan_template_name, "Full audit without Web Spider");
    assert_eq!(site.alerts.len(), 1);
    let alert = &site.alerts[0];
    assert!(!alert.enabled);
    assert_eq!(alert.max_alerts, 10);
    assert!(alert.scan_filter.contains(ScanEvent::Start));
    assert!(alert.scan_filter.contains(ScanEvent::Stop));
    assert!(!alert.scan_filter.contains(ScanEvent::Pause));
    assert_eq!(
        alert.variant,
        AlertVariant::Syslog {
            server: "logs.example.com".to_string()
        }
    );
}

#[tokio::test]
async fn test_save_site_posts_site_schedule_and_alerts() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/3/sites"))
        .and(body_partial_json(json!({
            "name": "Branch offices",
            "description": "WAN edge",
            "scanTemplateId": "full-audit",
            "scan": { "assets": { "includedTargets": {
                "addresses": ["10.1.0.0/24", "edge.example.com"]
            } } }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 42, "links": [] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/3/sites/42/scan_schedules"))
        .and(body_partial_json(json!({
            "enabled": true,
            "start": "2026-03-01T01:00:00Z",
            "repeat": { "every": "week", "interval": 1 }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/3/sites/42/alerts/smtp"))
        .and(body_partial_json(json!({
            "name": "Ops mail",
            "recipients": ["ops@example.com"],
            "relayServer": "smtp.example.com"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 9 })))
        .expect(1)
        .mount(&server)
        .await;

    let session = connector_for(&server)
        .connect("nxadmin", "secret")
        .await
        .expect("Login should succeed");
    let id = session.save_site(&new_site()).await.expect("Save should succeed");
    assert_eq!(id, SiteId(42));
}

#[tokio::test]
async fn test_save_site_reports_console_message() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/3/sites"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": 400,
            "message": "The site name must be unique."
        })))
        .mount(&server)
        .await;

    let session = connector_for(&server)
        .connect("nxadmin", "secret")
        .await
        .expect("Login should succeed");
    let err = session.save_site(&new_site()).await.unwrap_err();
    match err {
        RemoteError::Status {
            status, message, ..
        } => {
            assert_eq!(status, 400);
            assert_eq!(message.as_deref(), Some("The site name must be unique."));
        }
        other => panic!("expected a status error, got {:?}", other),
    }
}

/// Helper function to mount a site creation that succeeds with id 42 and a
/// schedule creation that the console refuses
async fn mount_create_with_bad_schedule(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/3/sites"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 42 })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/3/sites/42/scan_schedules"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": 400,
            "message": "bad start"
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/3/sites/42/alerts/smtp"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 9 })))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_failed_schedule_removes_created_site() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_create_with_bad_schedule(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/3/sites/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "links": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let session = connector_for(&server)
        .connect("nxadmin", "secret")
        .await
        .expect("Login should succeed");
    let err = session.save_site(&new_site()).await.unwrap_err();
    match err {
        RemoteError::Status {
            resource,
            status,
            message,
        } => {
            assert_eq!(resource, "POST /api/3/sites/42/scan_schedules");
            assert_eq!(status, 400);
            assert_eq!(message.as_deref(), Some("bad start"));
        }
        other => panic!("expected the schedule failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_rollback_names_the_leftover_site() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_create_with_bad_schedule(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/3/sites/42"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let session = connector_for(&server)
        .connect("nxadmin", "secret")
        .await
        .expect("Login should succeed");
    let err = session.save_site(&new_site()).await.unwrap_err();
    assert!(matches!(
        err,
        RemoteError::Incomplete {
            site: SiteId(42),
            ..
        }
    ));
    assert!(err.to_string().starts_with("site 42 was created but left incomplete: "));
}

#[tokio::test]
async fn test_calls_after_logout_are_refused() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/3/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resources": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = connector_for(&server)
        .connect("nxadmin", "secret")
        .await
        .expect("Login should succeed");
    assert!(session.is_authenticated());

    session.logout();
    session.logout();
    assert!(!session.is_authenticated());
    assert!(matches!(
        session.list_sites().await,
        Err(RemoteError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn test_run_reports_login_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/administration/info"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resources": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let config = RunConfig {
        action: Action::List,
        username: "nxadmin".to_string(),
        host: server.uri(),
        timeout_seconds: 5,
        ..Default::default()
    };
    let mut out = Vec::new();
    let result = run(&config, "wrong", &mut out).await;

    assert!(result.is_err());
    assert_eq!(String::from_utf8(out).unwrap(), "Login Failure\n");
}

#[tokio::test]
async fn test_run_lists_sites_end_to_end() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/3/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": [ { "id": 3, "name": "HQ" } ],
            "page": { "totalPages": 1 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3/sites/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "name": "HQ", "description": "head office"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3/sites/3/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resources": [] })))
        .mount(&server)
        .await;

    let config = RunConfig {
        action: Action::List,
        username: "nxadmin".to_string(),
        host: server.uri(),
        timeout_seconds: 5,
        ..Default::default()
    };
    let mut out = Vec::new();
    let outcome = run(&config, "secret", &mut out)
        .await
        .expect("Run should succeed");
    assert_eq!(outcome.exit_code(), 0);

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Login Successful\nListing Sites...\n"));
    assert!(text.contains("Loaded Site ID 3\nSite Name HQ.\nDescription head office.\n"));
}
