//! Integration tests for the risk endpoints (`/risk-data`, `/risk/evaluate`).

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_with_token, post_json, post_raw, test_config, TEST_TOKEN};
use armis_core::risk::RiskPolicy;
use serde_json::json;

#[tokio::test]
async fn no_reading_yields_no_data_sentinel() {
    let app = common::build_test_app(test_config());

    let response = get(app, "/api/v1/risk-data").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json["data"],
        json!({"risk_percent": 0, "risk_level": "No Data", "main_factor": "N/A"})
    );
}

#[tokio::test]
async fn dry_soil_scores_low() {
    let app = common::build_test_app(test_config());
    post_json(
        app.clone(),
        "/api/v1/upload",
        json!({"soil": "dry", "rain": "none", "vibration": "none", "temperature": 20}),
    )
    .await;

    let json = body_json(get(app, "/api/v1/risk-data").await).await;
    assert_eq!(json["data"]["risk_percent"], 10);
    assert_eq!(json["data"]["risk_level"], "Low");
    assert_eq!(json["data"]["main_factor"], "Soil");
}

#[tokio::test]
async fn worst_case_reading_scores_high() {
    let app = common::build_test_app(test_config());
    post_json(
        app.clone(),
        "/api/v1/upload",
        json!({"soil": "wet", "rain": "heavy", "vibration": "strong", "temperature": 40}),
    )
    .await;

    let json = body_json(get(app, "/api/v1/risk-data").await).await;
    assert_eq!(json["data"]["risk_percent"], 100);
    assert_eq!(json["data"]["risk_level"], "High");
    assert_eq!(json["data"]["main_factor"], "Rainfall");
    assert_eq!(json["data"]["factors"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn risk_follows_the_latest_upload() {
    let app = common::build_test_app(test_config());
    post_json(app.clone(), "/api/v1/upload", json!({"rain": "heavy", "soil": "wet"})).await;
    post_json(app.clone(), "/api/v1/upload", json!({"vibration": "mild"})).await;

    let json = body_json(get(app, "/api/v1/risk-data").await).await;
    assert_eq!(json["data"]["risk_percent"], 10);
    assert_eq!(json["data"]["main_factor"], "Vibration");
}

#[tokio::test]
async fn empty_reading_scores_zero_without_factor() {
    let app = common::build_test_app(test_config());
    post_raw(app.clone(), "/api/v1/upload", "").await;

    let json = body_json(get(app, "/api/v1/risk-data").await).await;
    assert_eq!(
        json["data"],
        json!({"risk_percent": 0, "risk_level": "Low", "main_factor": "None"})
    );
}

#[tokio::test]
async fn unstructured_reading_yields_error_sentinel() {
    let app = common::build_test_app(test_config());
    post_json(app.clone(), "/api/v1/upload", json!("heavy rain")).await;

    let json = body_json(get(app, "/api/v1/risk-data").await).await;
    assert_eq!(
        json["data"],
        json!({"risk_percent": 0, "risk_level": "Error", "main_factor": "N/A"})
    );
}

#[tokio::test]
async fn evaluate_scores_without_storing() {
    let app = common::build_test_app(test_config());

    let response = post_json(
        app.clone(),
        "/api/v1/risk/evaluate",
        json!({"rain": "light", "soil": "wet", "vibration": "mild"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["risk_percent"], 60);
    assert_eq!(json["data"]["risk_level"], "Medium");
    assert_eq!(json["data"]["main_factor"], "Soil");

    let latest = body_json(get(app, "/api/v1/risk-data").await).await;
    assert_eq!(latest["data"]["risk_level"], "No Data");
}

#[tokio::test]
async fn evaluate_rejects_invalid_json() {
    let app = common::build_test_app(test_config());

    let response = post_raw(app, "/api/v1/risk/evaluate", "not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn flag_policy_can_be_configured() {
    let mut config = test_config();
    config.risk_policy = RiskPolicy::flags();
    let app = common::build_test_app(config);

    let response = post_json(
        app,
        "/api/v1/risk/evaluate",
        json!({"temperature": 36, "soil": "dry", "rain": "rain"}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["risk_percent"], 75);
    assert_eq!(json["data"]["risk_level"], "High");
    assert_eq!(json["data"]["main_factor"], "Temperature");

    // Nothing triggered is the lowest band under this policy.
    let app = {
        let mut config = test_config();
        config.risk_policy = RiskPolicy::flags();
        common::build_test_app(config)
    };
    let json = body_json(post_json(app, "/api/v1/risk/evaluate", json!({})).await).await;
    assert_eq!(json["data"]["risk_level"], "Safe");
}

// ---------------------------------------------------------------------------
// Dashboard token
// ---------------------------------------------------------------------------

fn token_config() -> armis_api::config::ServerConfig {
    let mut config = test_config();
    config.dashboard_token = Some(TEST_TOKEN.to_string());
    config
}

#[tokio::test]
async fn risk_requires_token_when_configured() {
    let app = common::build_test_app(token_config());

    let response = get(app, "/api/v1/risk-data").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn wrong_token_is_rejected() {
    let app = common::build_test_app(token_config());

    let response = get_with_token(app, "/api/v1/risk-data", "not-the-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_is_admitted() {
    let app = common::build_test_app(token_config());

    let response = get_with_token(app, "/api/v1/risk-data", TEST_TOKEN).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["risk_level"], "No Data");
}

#[tokio::test]
async fn device_routes_stay_open_when_token_configured() {
    let app = common::build_test_app(token_config());

    let upload = post_json(app.clone(), "/api/v1/upload", json!({"soil": "dry"})).await;
    assert_eq!(upload.status(), StatusCode::OK);

    let data = get(app, "/api/v1/data").await;
    assert_eq!(data.status(), StatusCode::OK);
}
