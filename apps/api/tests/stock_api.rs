//! Integration tests for `/api/stock`.

mod common;

use axum::http::StatusCode;
use common::{build_test_app, create_product, get, login_as, post};
use serde_json::json;

#[tokio::test]
async fn import_export_scenario() {
    let (app, _) = build_test_app().await;
    let token = login_as(&app, "clerk").await;
    let p = create_product(&app, &token, "P-1", None).await;

    let (status, body) = post(
        &app,
        "/api/stock/import",
        &token,
        json!({ "productId": p, "quantity": 10, "notes": "opening" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["balance"], 10);
    assert_eq!(body["movement"]["type"], "import");
    assert_eq!(body["movement"]["notes"], "opening");

    let (status, body) = post(
        &app,
        "/api/stock/export",
        &token,
        json!({ "productId": p, "quantity": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 6);

    let (status, body) = post(
        &app,
        "/api/stock/export",
        &token,
        json!({ "productId": p, "quantity": 10 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");

    let (status, body) = post(
        &app,
        "/api/stock/import",
        &token,
        json!({ "productId": p, "quantity": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = get(&app, &format!("/api/stock/{p}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 6);

    let (status, body) = get(&app, &format!("/api/stock/movements?productId={p}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    let movements = body.as_array().unwrap();
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0]["type"], "export");
    assert_eq!(movements[0]["quantity"], 4);
    assert_eq!(movements[1]["type"], "import");
    assert_eq!(movements[1]["quantity"], 10);
    assert_eq!(movements[1]["username"], "clerk");

    let (status, body) = get(&app, &format!("/api/stock/{p}/audit"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["consistent"], true);
    assert_eq!(body["ledgerSum"], 6);
    assert_eq!(body["movementCount"], 2);
}

#[tokio::test]
async fn unknown_product_is_a_bad_request_on_movements() {
    let (app, _) = build_test_app().await;
    let token = login_as(&app, "clerk").await;

    for uri in ["/api/stock/import", "/api/stock/export"] {
        let (status, body) = post(&app, uri, &token, json!({ "productId": 999, "quantity": 1 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "PRODUCT_NOT_FOUND");
    }

    let (status, body) = get(&app, "/api/stock/999", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PRODUCT_NOT_FOUND");
}

#[tokio::test]
async fn movement_filters() {
    let (app, _) = build_test_app().await;
    let token = login_as(&app, "clerk").await;

    let (_, drinks) = post(&app, "/api/categories", &token, json!({ "name": "Drinks" })).await;
    let drinks = drinks["id"].as_i64().unwrap();
    let cola = create_product(&app, &token, "COLA", Some(drinks)).await;
    let bolt = create_product(&app, &token, "BOLT", None).await;

    for product in [cola, bolt] {
        let (status, _) = post(
            &app,
            "/api/stock/import",
            &token,
            json!({ "productId": product, "quantity": 5 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = post(
        &app,
        "/api/stock/movements",
        &token,
        json!({ "categoryId": drinks }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["productSku"], "COLA");

    let (status, body) = post(&app, "/api/stock/movements", &token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = post(
        &app,
        "/api/stock/movements",
        &token,
        json!({ "startDate": "2030-01-02T00:00:00Z", "endDate": "2030-01-01T00:00:00Z" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = get(
        &app,
        "/api/stock/movements?startDate=2000-01-01T00:00:00Z&endDate=2000-12-31T00:00:00Z",
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn a_movement_date_used_as_both_bounds_finds_that_movement() {
    let (app, _) = build_test_app().await;
    let token = login_as(&app, "clerk").await;
    let p = create_product(&app, &token, "P-1", None).await;

    let mut movements = Vec::new();
    for quantity in [1, 2, 3] {
        let (status, body) = post(
            &app,
            "/api/stock/import",
            &token,
            json!({ "productId": p, "quantity": quantity }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        movements.push(body["movement"].clone());
        std::thread::sleep(std::time::Duration::from_millis(2));
    }

    let middle = &movements[1];
    let (status, body) = post(
        &app,
        "/api/stock/movements",
        &token,
        json!({ "startDate": middle["date"], "endDate": middle["date"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1, "{body}");
    assert_eq!(entries[0]["id"], middle["id"]);
    assert_eq!(entries[0]["date"], middle["date"]);
}

#[tokio::test]
async fn summary_and_current_list_every_product() {
    let (app, _) = build_test_app().await;
    let token = login_as(&app, "clerk").await;
    let stocked = create_product(&app, &token, "STOCKED", None).await;
    create_product(&app, &token, "EMPTY", None).await;

    post(
        &app,
        "/api/stock/import",
        &token,
        json!({ "productId": stocked, "quantity": 3 }),
    )
    .await;

    let (status, body) = get(&app, "/api/stock/summary", &token).await;
    assert_eq!(status, StatusCode::OK);
    let summary = body.as_array().unwrap();
    assert_eq!(summary.len(), 2);
    let total: i64 = summary.iter().map(|e| e["quantity"].as_i64().unwrap()).sum();
    assert_eq!(total, 3);

    let (status, body) = get(&app, "/api/stock/current", &token).await;
    assert_eq!(status, StatusCode::OK);
    let current = body.as_array().unwrap();
    let line = current.iter().find(|e| e["productId"] == stocked).unwrap();
    assert_eq!(line["sku"], "STOCKED");
    assert_eq!(line["quantity"], 3);
}
