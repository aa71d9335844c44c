//! Category handlers (`/api/categories`).
//!
//! Name uniqueness is checked up front for a readable 409; the `UNIQUE`
//! index still backs it, and a violation from the insert maps to the same
//! error. Deleting a category that still has stocks is refused.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

use stockroom_core::validation::validate_category_name;
use stockroom_core::{
    Category, CategoryPatch, CoreError, NewCategory, PageNumbering, Pager, MAX_CATEGORY_PAGE_SIZE,
};
use stockroom_db::{DbError, Session};

use super::{resolve_page, PageParams, TOTAL_COUNT_HEADER};
use crate::error::ApiError;
use crate::AppState;

const CATEGORY_PAGER: Pager = Pager::new(PageNumbering::OneBased, MAX_CATEGORY_PAGE_SIZE);

/// `POST /api/categories`.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewCategory>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let Json(payload) = payload?;
    let name = validate_category_name(&payload.name)?;

    let mut session = state.db.write_session().await?;
    ensure_name_free(&mut session, &name, None).await?;

    let category = session
        .categories()
        .insert(&name)
        .await
        .map_err(|e| duplicate_error(e, &name))?;
    session.commit().await?;

    info!(id = category.id, name = %category.name, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// `GET /api/categories`: newest first, pages start at 1.
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    let (page, size) = resolve_page(
        &CATEGORY_PAGER,
        params.page,
        params.size,
        state.config.default_page_size,
    )?;

    let mut session = state.db.session().await?;
    let total = session.categories().count().await?;
    let window = CATEGORY_PAGER.window(page, size, total)?;
    let categories = session
        .categories()
        .list(window.limit, window.offset)
        .await?;

    let headers = [(TOTAL_COUNT_HEADER, total.to_string())];
    Ok((headers, Json(categories)).into_response())
}

/// `GET /api/categories/{id}`.
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Category>, ApiError> {
    let Path(id) = id?;
    let mut session = state.db.session().await?;
    let category = load(&mut session, id).await?;
    Ok(Json(category))
}

/// `PATCH /api/categories/{id}`.
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CategoryPatch>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let Path(id) = id?;
    let Json(patch) = payload?;

    let mut session = state.db.write_session().await?;
    let current = load(&mut session, id).await?;

    let Some(raw) = patch.name else {
        return Ok(Json(current));
    };
    let name = validate_category_name(&raw)?;
    ensure_name_free(&mut session, &name, Some(id)).await?;

    let category = session
        .categories()
        .rename(id, &name)
        .await
        .map_err(|e| duplicate_error(e, &name))?;
    session.commit().await?;

    info!(id, from = %current.name, to = %category.name, "Category renamed");
    Ok(Json(category))
}

/// `DELETE /api/categories/{id}`.
///
/// Refused with 409 while any stock references the category.
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;

    let mut session = state.db.write_session().await?;
    load(&mut session, id).await?;

    let stocks = session.categories().count_stocks(id).await?;
    if stocks > 0 {
        return Err(CoreError::CategoryInUse { id, stocks }.into());
    }

    session.categories().delete(id).await.map_err(|e| match e {
        DbError::ForeignKeyViolation { .. } => {
            ApiError::from(CoreError::CategoryInUse { id, stocks: 1 })
        }
        other => ApiError::from(other),
    })?;
    session.commit().await?;

    info!(id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Helpers
// =============================================================================

async fn load(session: &mut Session, id: i64) -> Result<Category, ApiError> {
    session
        .categories()
        .get(id)
        .await?
        .ok_or_else(|| CoreError::CategoryNotFound(id).into())
}

/// Fails with `DuplicateCategoryName` if another category already uses `name`.
async fn ensure_name_free(
    session: &mut Session,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<(), ApiError> {
    match session.categories().find_by_name(name, exclude_id).await? {
        Some(_) => Err(CoreError::DuplicateCategoryName(name.to_string()).into()),
        None => Ok(()),
    }
}

fn duplicate_error(err: DbError, name: &str) -> ApiError {
    match err {
        DbError::UniqueViolation { .. } => {
            CoreError::DuplicateCategoryName(name.to_string()).into()
        }
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
    async fn test_duplicate_name_conflicts_without_second_row() {
        let (app, _) = test_app().await;
        create_category(&app, "Drinks").await;

        let res = send(
            &app,
            Method::POST,
            "/api/categories",
            Some(json!({"name": " Drinks "})),
        )
        .await;
        assert_eq!(res.status, StatusCode::CONFLICT);
        assert_eq!(res.json()["code"], "CONFLICT");

        let res = get(&app, "/api/categories").await;
        assert_eq!(res.total_count(), Some(1));
        assert_eq!(res.json().as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_name_rules() {
        let (app, _) = test_app().await;

        let long = "x".repeat(51);
        for name in ["", "   ", long.as_str()] {
            let body = json!({ "name": name });
            let res = send(&app, Method::POST, "/api/categories", Some(body)).await;
            assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY, "{name:?}");
        }

        let res = send(&app, Method::POST, "/api/categories", Some(json!({}))).await;
        assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);

        // Uniqueness is case-sensitive
        create_category(&app, "drinks").await;
        create_category(&app, "Drinks").await;
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_paged() {
        let (app, _) = test_app().await;
        for name in ["A", "B", "C"] {
            create_category(&app, name).await;
        }

        let res = get(&app, "/api/categories?page=1&size=2").await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.total_count(), Some(3));
        let names: Vec<_> = res
            .json()
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["C", "B"]);

        let res = get(&app, "/api/categories?page=2&size=2").await;
        assert_eq!(res.json()[0]["name"], "A");

        assert_eq!(
            get(&app, "/api/categories?size=201").await.status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn test_rename_checks_other_names() {
        let (app, _) = test_app().await;
        let drinks = create_category(&app, "Drinks").await;
        create_category(&app, "Snacks").await;
        let uri = format!("/api/categories/{drinks}");

        let res = send(&app, Method::PATCH, &uri, Some(json!({"name": "Snacks"}))).await;
        assert_eq!(res.status, StatusCode::CONFLICT);

        // Keeping its own name is not a conflict
        let res = send(&app, Method::PATCH, &uri, Some(json!({"name": "Drinks"}))).await;
        assert_eq!(res.status, StatusCode::OK);

        let res = send(&app, Method::PATCH, &uri, Some(json!({"name": "Beverages"}))).await;
        assert_eq!(res.json(), json!({"id": drinks, "name": "Beverages"}));

        let res = send(&app, Method::PATCH, &uri, Some(json!({}))).await;
        assert_eq!(res.json()["name"], "Beverages");

        let res = send(&app, Method::PATCH, "/api/categories/99", Some(json!({"name": "X"}))).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_refuses_category_with_stocks() {
        let (app, _) = test_app().await;
        let drinks = create_category(&app, "Drinks").await;
        let empty = create_category(&app, "Empty").await;
        create_stock(&app, "Cola", 1, drinks).await;

        let res = send(&app, Method::DELETE, &format!("/api/categories/{drinks}"), None).await;
        assert_eq!(res.status, StatusCode::CONFLICT);
        assert_eq!(
            get(&app, &format!("/api/categories/{drinks}")).await.status,
            StatusCode::OK
        );

        let res = send(&app, Method::DELETE, &format!("/api/categories/{empty}"), None).await;
        assert_eq!(res.status, StatusCode::NO_CONTENT);
        assert_eq!(
            get(&app, &format!("/api/categories/{empty}")).await.status,
            StatusCode::NOT_FOUND
        );

        let res = send(&app, Method::DELETE, "/api/categories/99", None).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_creates_conflict() {
        let (app, _dir) = file_app(8).await;

        for round in 0..5 {
            let name = format!("Dup{round}");
            let tasks: Vec<_> = (0..8)
                .map(|_| {
                    let app = app.clone();
                    let body = json!({ "name": name });
                    tokio::spawn(async move {
                        send(&app, Method::POST, "/api/categories", Some(body)).await
                    })
                })
                .collect();

            let (mut created, mut conflicts) = (0, 0);
            for task in tasks {
                let res = task.await.unwrap();
                match res.status {
                    StatusCode::CREATED => created += 1,
                    StatusCode::CONFLICT => conflicts += 1,
                    other => panic!("unexpected {other} for {name}: {}", res.body),
                }
            }
            assert_eq!((created, conflicts), (1, 7), "{name}");
        }

        let res = get(&app, "/api/categories?size=200").await;
        assert_eq!(res.total_count(), Some(5));
    }
}
