//! Stock handlers (`/api/stocks`).
//!
//! Writes check the referenced category inside the same session before
//! touching `stocks`, so an unknown `category_id` is a 400 and nothing is
//! written.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, info};

use stockroom_core::normalize::{StockCreated, StockItem, StockListResponse};
use stockroom_core::validation::{validate_inventory, validate_stock_name};
use stockroom_core::{CoreError, NewStock, PageNumbering, Pager, StockPatch, MAX_STOCK_PAGE_SIZE};
use stockroom_db::{DbError, Session};

use super::{fetch_stock_page, resolve_page, StockListParams, TOTAL_COUNT_HEADER};
use crate::error::ApiError;
use crate::AppState;

/// Pager of the JSON listings: pages start at 1.
const API_PAGER: Pager = Pager::new(PageNumbering::OneBased, MAX_STOCK_PAGE_SIZE);

// =============================================================================
// Listing
// =============================================================================

/// `GET /api/stocks` and `GET /api/stocks/search`.
///
/// ## Returns
/// `{page, total_pages, items}` with the unpaged count in `X-Total-Count`.
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<StockListParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    let (page, size) = resolve_page(
        &API_PAGER,
        params.page,
        params.size,
        state.config.default_page_size,
    )?;
    let filter = params.filter();

    let mut session = state.db.session().await?;
    let (window, records) = fetch_stock_page(&mut session, &API_PAGER, &filter, page, size).await?;

    debug!(
        page = window.page,
        total = window.total,
        category_id = ?filter.category_id,
        keyword = ?filter.keyword,
        "Listed stocks"
    );

    let headers = [(TOTAL_COUNT_HEADER, window.total.to_string())];
    Ok((headers, Json(StockListResponse::new(&window, records))).into_response())
}

// =============================================================================
// Single Stock
// =============================================================================

/// `POST /api/stocks`.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewStock>, JsonRejection>,
) -> Result<(StatusCode, Json<StockCreated>), ApiError> {
    let Json(payload) = payload?;
    let name = validate_stock_name(&payload.name)?;
    validate_inventory(payload.inventory)?;

    let mut session = state.db.write_session().await?;
    ensure_category(&mut session, payload.category_id).await?;

    let record = session
        .stocks()
        .insert(&name, payload.inventory, payload.category_id)
        .await
        .map_err(|e| reference_error(e, payload.category_id))?;
    session.commit().await?;

    info!(id = record.id, category_id = record.category_id, "Stock created");
    Ok((StatusCode::CREATED, Json(StockCreated::new(&record))))
}

/// `GET /api/stocks/{id}`.
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<StockItem>, ApiError> {
    let Path(id) = id?;
    let mut session = state.db.session().await?;

    let record = session
        .stocks()
        .get(id)
        .await?
        .ok_or(CoreError::StockNotFound(id))?;

    Ok(Json(StockItem::from(record)))
}

/// `PUT /api/stocks/{id}` and `PATCH /api/stocks/{id}`.
///
/// Both verbs take the same partial body; fields left out keep their
/// current values.
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<StockPatch>, JsonRejection>,
) -> Result<Json<StockItem>, ApiError> {
    let Path(id) = id?;
    let Json(mut patch) = payload?;

    if let Some(name) = patch.name.as_deref() {
        patch.name = Some(validate_stock_name(name)?);
    }
    if let Some(inventory) = patch.inventory {
        validate_inventory(inventory)?;
    }

    let mut session = state.db.write_session().await?;
    if session.stocks().get(id).await?.is_none() {
        return Err(CoreError::StockNotFound(id).into());
    }
    if let Some(category_id) = patch.category_id {
        ensure_category(&mut session, category_id).await?;
    }

    let record = session
        .stocks()
        .update(id, &patch)
        .await
        .map_err(|e| reference_error(e, patch.category_id.unwrap_or_default()))?;
    session.commit().await?;

    info!(id, "Stock updated");
    Ok(Json(StockItem::from(record)))
}

/// `DELETE /api/stocks/{id}`.
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let mut session = state.db.write_session().await?;

    session.stocks().delete(id).await.map_err(|e| match e {
        DbError::NotFound { .. } => ApiError::from(CoreError::StockNotFound(id)),
        other => ApiError::from(other),
    })?;
    session.commit().await?;

    info!(id, "Stock deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Helpers
// =============================================================================

/// Fails with `UnknownCategory` unless `category_id` exists.
async fn ensure_category(session: &mut Session, category_id: i64) -> Result<(), ApiError> {
    match session.categories().get(category_id).await? {
        Some(_) => Ok(()),
        None => Err(CoreError::UnknownCategory(category_id).into()),
    }
}

/// A foreign key failure on a stock write means the category vanished.
fn reference_error(err: DbError, category_id: i64) -> ApiError {
    match err {
        DbError::ForeignKeyViolation { .. } => CoreError::UnknownCategory(category_id).into(),
        other => other.into(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{
        create_category, create_stock, file_app, get, send, test_app,
    };

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let (app, _) = test_app().await;
        let drinks = create_category(&app, "Drinks").await;

        let res = send(
            &app,
            Method::POST,
            "/api/stocks",
            Some(json!({"name": "  Cola  ", "inventory": 12, "category_id": drinks})),
        )
        .await;
        assert_eq!(res.status, StatusCode::CREATED);
        let created = res.json();
        assert_eq!(created["message"], "created");
        assert_eq!(created["category_name"], "Drinks");

        let id = created["id"].as_i64().unwrap();
        let res = get(&app, &format!("/api/stocks/{id}")).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(
            res.json(),
            json!({
                "id": id,
                "name": "Cola",
                "inventory": 12,
                "category_id": drinks,
                "category_name": "Drinks",
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_category_writes_nothing() {
        let (app, _) = test_app().await;

        let res = send(
            &app,
            Method::POST,
            "/api/stocks",
            Some(json!({"name": "Ghost", "inventory": 1, "category_id": 999})),
        )
        .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.json()["code"], "INVALID_REFERENCE");

        let res = get(&app, "/api/stocks").await;
        assert_eq!(res.total_count(), Some(0));
        assert_eq!(res.json()["items"], json!([]));
    }

    #[tokio::test]
    async fn test_invalid_bodies_are_rejected() {
        let (app, _) = test_app().await;
        let drinks = create_category(&app, "Drinks").await;

        for body in [
            json!({"name": "   ", "inventory": 1, "category_id": drinks}),
            json!({"name": "x".repeat(201), "inventory": 1, "category_id": drinks}),
            json!({"name": "Cola", "inventory": -1, "category_id": drinks}),
            json!({"name": "Cola", "category_id": drinks}),
        ] {
            let res = send(&app, Method::POST, "/api/stocks", Some(body)).await;
            assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY, "{}", res.body);
            assert_eq!(res.json()["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_keyword_is_case_insensitive() {
        let (app, _) = test_app().await;
        let drinks = create_category(&app, "Drinks").await;
        let snacks = create_category(&app, "Snacks").await;
        create_stock(&app, "Cola", 5, drinks).await;
        create_stock(&app, "Water", 5, drinks).await;
        create_stock(&app, "Cola Gummies", 5, snacks).await;

        let res = get(&app, "/api/stocks/search?keyword=COLA").await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.total_count(), Some(2));

        let res = get(&app, &format!("/api/stocks?keyword=cola&categoryId={snacks}")).await;
        let items = res.json()["items"].clone();
        assert_eq!(items.as_array().unwrap().len(), 1);
        assert_eq!(items[0]["name"], "Cola Gummies");
    }

    #[tokio::test]
    async fn test_keyword_folds_non_ascii_letters() {
        let (app, _) = test_app().await;
        let fruit = create_category(&app, "Fruit").await;
        create_stock(&app, "Äpfel", 3, fruit).await;
        create_stock(&app, "Éclair", 1, fruit).await;

        // keyword=äpfel
        let res = get(&app, "/api/stocks?keyword=%C3%A4pfel").await;
        assert_eq!(res.total_count(), Some(1));
        assert_eq!(res.json()["items"][0]["name"], "Äpfel");

        // keyword=éCLAIR
        let res = get(&app, "/api/stocks/search?keyword=%C3%A9CLAIR").await;
        assert_eq!(res.total_count(), Some(1));
        assert_eq!(res.json()["items"][0]["name"], "Éclair");
    }

    #[tokio::test]
    async fn test_pages_clamp_and_report_total() {
        let (app, _) = test_app().await;
        let drinks = create_category(&app, "Drinks").await;
        for i in 0..5 {
            create_stock(&app, &format!("Item {i}"), i, drinks).await;
        }

        let res = get(&app, "/api/stocks?page=2&size=2").await;
        let body = res.json();
        assert_eq!(res.total_count(), Some(5));
        assert_eq!(body["page"], 2);
        assert_eq!(body["total_pages"], 3);
        // Newest first
        assert_eq!(body["items"][0]["name"], "Item 2");

        let res = get(&app, "/api/stocks?page=99&size=2").await;
        let body = res.json();
        assert_eq!(body["page"], 3);
        assert_eq!(body["items"].as_array().unwrap().len(), 1);

        assert_eq!(
            get(&app, "/api/stocks?page=0").await.status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get(&app, "/api/stocks?size=101").await.status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn test_empty_category_lists_one_empty_page() {
        let (app, _) = test_app().await;
        let empty = create_category(&app, "Empty").await;

        let res = get(&app, &format!("/api/stocks?categoryId={empty}")).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.json(), json!({"page": 1, "total_pages": 1, "items": []}));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let (app, _) = test_app().await;
        let drinks = create_category(&app, "Drinks").await;
        let snacks = create_category(&app, "Snacks").await;
        let id = create_stock(&app, "Cola", 10, drinks).await;

        let uri = format!("/api/stocks/{id}");
        let res = send(&app, Method::PATCH, &uri, Some(json!({"inventory": 3}))).await;
        assert_eq!(res.status, StatusCode::OK);
        let body = res.json();
        assert_eq!(body["inventory"], 3);
        assert_eq!(body["name"], "Cola");
        assert_eq!(body["category_id"], drinks);

        let res = send(&app, Method::PUT, &uri, Some(json!({"category_id": snacks}))).await;
        assert_eq!(res.json()["category_name"], "Snacks");

        let res = send(&app, Method::PUT, &uri, Some(json!({"category_id": 999}))).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(get(&app, &uri).await.json()["category_id"], snacks);
    }

    #[tokio::test]
    async fn test_missing_stock_is_not_found() {
        let (app, _) = test_app().await;

        assert_eq!(get(&app, "/api/stocks/42").await.status, StatusCode::NOT_FOUND);

        let res = send(&app, Method::PATCH, "/api/stocks/42", Some(json!({"inventory": 1}))).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);

        let res = send(&app, Method::DELETE, "/api/stocks/42", None).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.json()["message"], "Stock not found: 42");
    }

    #[tokio::test]
    async fn test_delete_removes_stock() {
        let (app, _) = test_app().await;
        let drinks = create_category(&app, "Drinks").await;
        let id = create_stock(&app, "Cola", 1, drinks).await;

        let res = send(&app, Method::DELETE, &format!("/api/stocks/{id}"), None).await;
        assert_eq!(res.status, StatusCode::NO_CONTENT);
        assert_eq!(
            get(&app, &format!("/api/stocks/{id}")).await.status,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_all_succeed() {
        let (app, _dir) = file_app(8).await;
        let drinks = create_category(&app, "Drinks").await;
        let cola = create_stock(&app, "Cola", 0, drinks).await;

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move {
                    if i % 2 == 0 {
                        let body = json!({
                            "name": format!("Item {i}"),
                            "inventory": i,
                            "category_id": drinks,
                        });
                        send(&app, Method::POST, "/api/stocks", Some(body)).await
                    } else {
                        let uri = format!("/api/stocks/{cola}");
                        send(&app, Method::PATCH, &uri, Some(json!({"inventory": i}))).await
                    }
                })
            })
            .collect();

        for task in tasks {
            let res = task.await.unwrap();
            assert!(res.status.is_success(), "{}: {}", res.status, res.body);
        }

        let res = get(&app, "/api/stocks?size=100").await;
        assert_eq!(res.total_count(), Some(9));
    }
}
