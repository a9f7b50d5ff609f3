//! HTTP layer - axum router, shared state and server lifecycle.
//!
//! Handlers stay thin: they check the caller's permission, validate input, call into
//! [`crate::core`], and map errors through [`error::ApiError`].

/// Caller role extraction and permission enforcement
pub mod auth;
/// Error-to-response mapping
pub mod error;
/// Route handlers by resource
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderName, Method, header::CONTENT_TYPE},
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    config::app::AppConfig,
    core::store::{SeaOrmStore, StaffingStore},
    errors::{Error, Result},
};
use auth::USER_ROLE_HEADER;
use routes::{
    add_role_handler, assign_member_handler, check_allocations_handler, create_employee_handler,
    create_opportunity_handler, get_opportunity_handler, health_handler,
    list_employees_handler, list_opportunities_handler, permissions_handler,
    unassign_member_handler,
};

/// State shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Connection used by write operations
    pub db: Arc<DatabaseConnection>,
    /// Snapshot source for reads and allocation checks
    pub store: Arc<dyn StaffingStore>,
    /// Loaded application settings
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Builds state whose store reads from the same database connection.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Self {
        Self {
            store: Arc::new(SeaOrmStore::new(Arc::clone(&db))),
            db,
            config,
        }
    }

    /// Replaces the snapshot store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn StaffingStore>) -> Self {
        self.store = store;
        self
    }
}

/// Builds the application router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_ROLE_HEADER)])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_handler))
        .route("/permissions", get(permissions_handler))
        .route("/allocations/check", post(check_allocations_handler))
        .route(
            "/opportunities",
            get(list_opportunities_handler).post(create_opportunity_handler),
        )
        .route("/opportunities/{id}", get(get_opportunity_handler))
        .route("/opportunities/{id}/roles", post(add_role_handler))
        .route(
            "/opportunities/{id}/roles/{role_id}/members/{employee_id}",
            put(assign_member_handler).delete(unassign_member_handler),
        )
        .route(
            "/employees",
            get(list_employees_handler).post(create_employee_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `bind_address` and serves until Ctrl+C or SIGTERM.
pub async fn serve(state: AppState, bind_address: &str) -> Result<()> {
    let app = router(state);

    info!("Binding to {bind_address}");
    let listener = TcpListener::bind(bind_address).await?;
    info!("Server running on {bind_address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Server {
            message: e.to_string(),
        })?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::{
            employee::{NewEmployee, create_employee},
            model::{Employee, Opportunity},
            opportunity::{add_role, assign_member},
        },
        test_utils::*,
    };
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn send(
        app: Router,
        method: Method,
        uri: &str,
        role: Option<&str>,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(role) = role {
            request = request.header(USER_ROLE_HEADER, role);
        }
        let request = match body {
            Some(body) => request
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn test_app() -> Result<(Arc<DatabaseConnection>, Router)> {
        let db = Arc::new(setup_test_db().await?);
        let app = router(AppState::new(Arc::clone(&db), Arc::new(AppConfig::default())));
        Ok((db, app))
    }

    /// Ada (e1) is staffed at 40% and 70% on two opportunities in the first half of 2024.
    async fn seed_over_allocated(db: &DatabaseConnection) -> Result<(String, String)> {
        create_employee(
            db,
            NewEmployee {
                id: Some("e1".to_string()),
                name: "Ada".to_string(),
                ..Default::default()
            },
        )
        .await?;

        let first = create_test_opportunity(db, "2024-01-01", Some("2024-06-30")).await?;
        let lead = add_role(db, &first.id, new_role("Tech Lead", 40.0)).await?;
        assign_member(db, &first.id, &lead.id, "e1").await?;

        let second = create_test_opportunity(db, "2024-03-01", None).await?;
        let dev = add_role(db, &second.id, new_role("Developer", 70.0)).await?;
        assign_member(db, &second.id, &dev.id, "e1").await?;

        Ok((second.id, dev.id))
    }

    struct FailingStore;

    #[async_trait]
    impl StaffingStore for FailingStore {
        async fn opportunities(&self) -> Result<Vec<Opportunity>> {
            Err(Error::Server {
                message: "upstream unavailable".to_string(),
            })
        }

        async fn employees(&self) -> Result<Vec<Employee>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_health_needs_no_role() -> Result<()> {
        let (_db, app) = test_app().await?;
        let (status, body) = send(app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
        Ok(())
    }

    #[tokio::test]
    async fn test_permissions_endpoint() -> Result<()> {
        let (_db, app) = test_app().await?;

        let (status, _) = send(app.clone(), Method::GET, "/permissions", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(app.clone(), Method::GET, "/permissions", Some("intern"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(app, Method::GET, "/permissions", Some("viewer"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "role": "viewer", "permissions": ["view_opportunities", "view_clients"] })
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_check_allocations_sums_and_warns() -> Result<()> {
        let (db, app) = test_app().await?;
        seed_over_allocated(&db).await?;

        let body = r#"{
            "employeeIds": ["e1", "ghost"],
            "startDate": "2024-04-01",
            "endDate": "2024-04-30",
            "incomingAllocation": 10
        }"#;
        let (status, json) =
            send(app, Method::POST, "/allocations/check", Some("recruiter"), Some(body)).await;

        assert_eq!(status, StatusCode::OK);
        let allocations = json["allocations"].as_array().unwrap();
        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0]["employeeId"], "e1");
        assert_eq!(allocations[0]["name"], "Ada");
        assert_eq!(allocations[0]["totalAllocation"].as_f64().unwrap(), 110.0);
        assert_eq!(allocations[0]["allocations"].as_array().unwrap().len(), 2);
        assert_eq!(allocations[1]["name"], "Unknown Employee");
        assert_eq!(allocations[1]["totalAllocation"].as_f64().unwrap(), 0.0);

        assert_eq!(
            json["warning"],
            json!({
                "message": "Ada will be over-allocated at 120%. ",
                "isOverAllocated": true
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_check_allocations_excludes_role_being_edited() -> Result<()> {
        let (db, app) = test_app().await?;
        let (opportunity_id, role_id) = seed_over_allocated(&db).await?;

        let body = json!({
            "employeeIds": ["e1"],
            "startDate": "2024-04-01",
            "currentOpportunityId": opportunity_id,
            "currentRoleId": role_id,
        })
        .to_string();
        let (status, json) =
            send(app, Method::POST, "/allocations/check", Some("manager"), Some(&body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["allocations"][0]["totalAllocation"].as_f64().unwrap(), 40.0);
        assert!(json.get("warning").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_open_window_ignores_finished_roles() -> Result<()> {
        let (db, app) = test_app().await?;
        create_employee(
            &db,
            NewEmployee {
                id: Some("e1".to_string()),
                name: "Ada".to_string(),
                ..Default::default()
            },
        )
        .await?;
        let finished = create_test_opportunity(&db, "2020-01-01", Some("2020-12-31")).await?;
        let role = add_role(&db, &finished.id, new_role("Developer", 80.0)).await?;
        assign_member(&db, &finished.id, &role.id, "e1").await?;

        let body = r#"{ "employeeIds": ["e1"], "startDate": "2026-01-01", "incomingAllocation": 30 }"#;
        let (status, json) =
            send(app, Method::POST, "/allocations/check", Some("recruiter"), Some(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["allocations"][0]["totalAllocation"].as_f64().unwrap(), 0.0);
        assert_eq!(json["warning"], json!({ "message": "", "isOverAllocated": false }));
        Ok(())
    }

    #[tokio::test]
    async fn test_check_allocations_validation_errors() -> Result<()> {
        let (_db, app) = test_app().await?;

        let (status, json) = send(
            app.clone(),
            Method::POST,
            "/allocations/check",
            Some("admin"),
            Some(r#"{ "employeeIds": ["e1"] }"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Validation failed");
        assert_eq!(json["details"][0]["field"], "startDate");

        let (status, json) = send(
            app,
            Method::POST,
            "/allocations/check",
            Some("admin"),
            Some("{ not json"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["details"][0]["field"], "body");
        Ok(())
    }

    #[tokio::test]
    async fn test_check_allocations_forbidden_for_viewer() -> Result<()> {
        let (_db, app) = test_app().await?;
        let body = r#"{ "employeeIds": ["e1"], "startDate": "2024-01-01" }"#;

        let (status, _) = send(app, Method::POST, "/allocations/check", Some("viewer"), Some(body)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        Ok(())
    }

    #[tokio::test]
    async fn test_check_allocations_store_failure_is_500() -> Result<()> {
        let db = Arc::new(setup_test_db().await?);
        let state = AppState::new(db, Arc::new(AppConfig::default())).with_store(Arc::new(FailingStore));
        let body = r#"{ "employeeIds": ["e1"], "startDate": "2024-01-01" }"#;

        let (status, json) =
            send(router(state), Method::POST, "/allocations/check", Some("admin"), Some(body)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({ "error": "Failed to check allocations" }));
        Ok(())
    }

    #[tokio::test]
    async fn test_opportunity_staffing_flow() -> Result<()> {
        let (db, app) = test_app().await?;
        create_test_employee(&db, "Grace").await?;
        let employee_id = crate::core::employee::list_employees(&db).await?[0].id.clone();

        let (status, created) = send(
            app.clone(),
            Method::POST,
            "/opportunities",
            Some("manager"),
            Some(r#"{ "clientName": "Acme", "probability": 85, "expectedStartDate": "2024-01-01" }"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "In Progress");
        let opportunity_id = created["id"].as_str().unwrap().to_string();

        let (status, role) = send(
            app.clone(),
            Method::POST,
            &format!("/opportunities/{opportunity_id}/roles"),
            Some("manager"),
            Some(r#"{ "roleName": "Architect", "requiredGrade": "Principal", "allocation": 50 }"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(role["status"], "Open");
        let role_id = role["id"].as_str().unwrap().to_string();
        let members_uri = format!("/opportunities/{opportunity_id}/roles/{role_id}/members/{employee_id}");

        let (status, staffed) = send(app.clone(), Method::PUT, &members_uri, Some("manager"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(staffed["assignedMemberIds"], json!([employee_id]));

        let (status, page) = send(
            app.clone(),
            Method::GET,
            "/opportunities?client=acm&active_only=true&page_size=5",
            Some("viewer"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["totalItems"], 1);
        assert_eq!(page["pageSize"], 5);
        assert_eq!(page["items"][0]["roles"][0]["roleName"], "Architect");

        let (status, _) = send(app.clone(), Method::DELETE, &members_uri, Some("admin"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(app, Method::DELETE, &members_uri, Some("admin"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_opportunity_write_errors() -> Result<()> {
        let (_db, app) = test_app().await?;
        let body = r#"{ "clientName": "Acme", "probability": 50, "expectedStartDate": "2024-01-01" }"#;

        let (status, _) = send(app.clone(), Method::POST, "/opportunities", Some("recruiter"), Some(body)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, json) = send(
            app.clone(),
            Method::POST,
            "/opportunities",
            Some("admin"),
            Some(r#"{ "clientName": "Acme", "probability": 150, "expectedStartDate": "2024-01-01" }"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["details"][0]["field"], "probability");

        let (status, _) = send(app.clone(), Method::GET, "/opportunities/missing", Some("viewer"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, json) = send(app, Method::GET, "/opportunities?status=closed", Some("viewer"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["details"][0]["field"], "status");
        Ok(())
    }

    #[tokio::test]
    async fn test_employee_routes() -> Result<()> {
        let (_db, app) = test_app().await?;

        let (status, _) = send(
            app.clone(),
            Method::POST,
            "/employees",
            Some("manager"),
            Some(r#"{ "name": "Linus" }"#),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, created) = send(
            app.clone(),
            Method::POST,
            "/employees",
            Some("admin"),
            Some(r#"{ "id": "e7", "name": "Linus", "grade": "Staff" }"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], "e7");

        let (status, json) = send(
            app.clone(),
            Method::POST,
            "/employees",
            Some("admin"),
            Some(r#"{ "id": "e7", "name": "Grace" }"#),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json, json!({ "error": "Employee already exists: e7" }));

        let (status, list) = send(app, Method::GET, "/employees", Some("recruiter"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list, json!([{ "id": "e7", "name": "Linus", "grade": "Staff" }]));
        Ok(())
    }
}
