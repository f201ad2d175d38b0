mod common;

use std::collections::BTreeMap;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use serde_json::{Value as Json, json};
use tower::ServiceExt;

use ipo_tracker_backend::{app, entities::ipos::IpoStatus};

use crate::common::{base_ipo, listed_ipo, test_state};

async fn body_json(response: axum::response::Response) -> Json {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn decimal(value: &Json) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_list_returns_summaries_with_metrics() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            listed_ipo(1, "Acme Industries"),
            base_ipo(2, "Beta Corp", IpoStatus::Upcoming),
        ]])
        .into_connection();
    let app = app(test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/ipo")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);

    let acme = &items[0];
    assert_eq!(acme["company_name"], "Acme Industries");
    assert_eq!(acme["status"], "listed");
    assert_eq!(acme["status_display"], "Listed");
    assert_eq!(decimal(&acme["listing_gain"]), dec!(20));
    assert_eq!(decimal(&acme["current_return"]), dec!(-10));
    // Summary projection has no issue_type or document fields
    assert!(acme.get("issue_type").is_none());
    assert!(acme.get("rhp_document").is_none());
    // No logo -> url absent, never an empty string
    assert!(acme.get("logo_url").is_none());

    let beta = &items[1];
    assert_eq!(beta["listing_gain"], Json::Null);
    assert_eq!(beta["current_return"], Json::Null);
}

#[tokio::test]
async fn test_list_with_unknown_filter_values_degrades_gracefully() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![listed_ipo(1, "Acme Industries")]])
        .into_connection();
    let app = app(test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/ipo?ordering=foo&status=bogus")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_returns_full_projection() {
    let mut model = listed_ipo(7, "Acme Industries");
    model.logo = Some("ipo_logos/acme.png".to_string());
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model]])
        .into_connection();
    let app = app(test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/ipo/7")
                .header(header::HOST, "ipo.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], 7);
    assert_eq!(json["issue_type"], "book_building");
    assert_eq!(json["issue_type_display"], "Book Building");
    assert_eq!(json["status_display"], "Listed");
    assert_eq!(
        json["logo_url"],
        "http://ipo.example.com/media/ipo_logos/acme.png"
    );
    assert!(json.get("created_at").is_some());
    assert!(json.get("updated_at").is_some());
    assert_eq!(decimal(&json["listing_gain"]), dec!(20));
}

#[tokio::test]
async fn test_get_unknown_id_is_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<ipo_tracker_backend::entities::ipos::Model>::new()])
        .into_connection();
    let app = app(test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/ipo/99")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("99"));
}

#[tokio::test]
async fn test_create_rejects_non_positive_issue_size() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = app(test_state(db));

    let payload = json!({
        "company_name": "Acme Industries",
        "price_band": "1000-1100",
        "open_date": "2026-02-01",
        "close_date": "2026-02-04",
        "issue_size": "0"
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/ipo")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("issue_size"));
}

#[tokio::test]
async fn test_create_rejects_duplicate_company_name() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![listed_ipo(1, "Acme Industries")]])
        .into_connection();
    let app = app(test_state(db));

    let payload = json!({
        "company_name": "Acme Industries",
        "price_band": "1000-1100",
        "open_date": "2026-02-01",
        "close_date": "2026-02-04",
        "issue_size": "5000.00"
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/ipo")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("company_name"));
}

#[tokio::test]
async fn test_create_rejects_invalid_enum_value() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = app(test_state(db));

    let payload = json!({
        "company_name": "Acme Industries",
        "price_band": "1000-1100",
        "open_date": "2026-02-01",
        "close_date": "2026-02-04",
        "issue_size": "5000.00",
        "status": "delisted"
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/ipo")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("status"));
}

#[tokio::test]
async fn test_create_returns_created_record() {
    let created = listed_ipo(3, "Gamma Tech");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // Uniqueness pre-check finds nothing, then the insert returns the row
        .append_query_results([vec![], vec![created.clone()]])
        .into_connection();
    let app = app(test_state(db));

    let payload = json!({
        "company_name": "Gamma Tech",
        "price_band": "1000-1100",
        "open_date": "2026-02-01",
        "close_date": "2026-02-04",
        "issue_size": "5000.00",
        "status": "listed",
        "ipo_price": "100",
        "listing_price": "120",
        "current_market_price": "90"
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/ipo")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["id"], 3);
    assert_eq!(json["company_name"], "Gamma Tech");
    assert_eq!(decimal(&json["listing_gain"]), dec!(20));
}

#[tokio::test]
async fn test_patch_updates_status() {
    let before = base_ipo(5, "Delta Ltd", IpoStatus::Ongoing);
    let mut after = before.clone();
    after.status = IpoStatus::Listed;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // Fetch, then UPDATE .. RETURNING
        .append_query_results([vec![before], vec![after]])
        .into_connection();
    let app = app(test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/ipo/5")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"status": "listed"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "listed");
    assert_eq!(json["company_name"], "Delta Ltd");
}

#[tokio::test]
async fn test_put_requires_full_record() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = app(test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/ipo/5")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"status": "listed"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("company_name"));
}

#[tokio::test]
async fn test_delete_returns_no_content() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let app = app(test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/ipo/5")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_delete_unknown_id_is_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let app = app(test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/ipo/99")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upcoming_endpoint_uses_full_projection() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            base_ipo(1, "Alpha", IpoStatus::Upcoming),
            base_ipo(2, "Beta", IpoStatus::Upcoming),
        ]])
        .into_connection();
    let app = app(test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/ipo/upcoming")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    for item in items {
        assert_eq!(item["status"], "upcoming");
        // Full projection carries the issue_type fields the summary omits
        assert!(item.get("issue_type").is_some());
    }
}

#[tokio::test]
async fn test_performance_payload() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![listed_ipo(4, "Acme Industries")]])
        .into_connection();
    let app = app(test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/ipo/4/performance")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 5);
    assert_eq!(decimal(&json["ipo_price"]), dec!(100));
    assert_eq!(decimal(&json["listing_price"]), dec!(120));
    assert_eq!(decimal(&json["current_market_price"]), dec!(90));
    assert_eq!(decimal(&json["listing_gain"]), dec!(20));
    assert_eq!(decimal(&json["current_return"]), dec!(-10));
}

#[tokio::test]
async fn test_home_page_renders_sections() {
    fn count_row(n: i64) -> Vec<BTreeMap<&'static str, Value>> {
        vec![BTreeMap::from([("num_items", Value::BigInt(Some(n)))])]
    }

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // Three dashboard slices (upcoming, ongoing, listed)...
        .append_query_results([
            vec![base_ipo(1, "Alpha Industries", IpoStatus::Upcoming)],
            vec![],
            vec![listed_ipo(2, "Acme Industries")],
        ])
        // ...then three unfiltered totals
        .append_query_results([count_row(1), count_row(0), count_row(1)])
        .into_connection();
    let app = app(test_state(db));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Upcoming IPOs"));
    assert!(html.contains("Alpha Industries"));
    assert!(html.contains("Acme Industries"));
    assert!(html.contains("No IPOs in this section."));
}

#[tokio::test]
async fn test_detail_page_unknown_id_is_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<ipo_tracker_backend::entities::ipos::Model>::new()])
        .into_connection();
    let app = app(test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/detail/99")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_text(response).await;
    assert!(html.contains("IPO not found"));
}
