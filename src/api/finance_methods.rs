//! Finance-method article endpoints

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{
    FinanceMethod, FinanceMethodChanges, FinanceMethodFilter, FinanceMethodView, NewFinanceMethod,
};
use crate::error::{AppError, AppResult};
use crate::repository::FinanceMethodRepository;
use crate::validation::{Check, Rule, Validate, Validated};

use super::middleware::CurrentUser;
use super::response::{DataResponse, ListResponse, MessageResponse};
use super::{parse_id, AppState};

const NOT_FOUND: &str = "Finance method not found";

// =========================================================================
// Request types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFinanceMethodRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub methodology: String,
    #[serde(default)]
    pub benefits: Option<Vec<String>>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Validate for CreateFinanceMethodRequest {
    const RULES: &'static [Rule] = &[
        Rule::new("title", Check::NotBlank, "Title is required"),
        Rule::new("description", Check::NotBlank, "Description is required"),
        Rule::new("category", Check::NotBlank, "Category is required"),
        Rule::new("methodology", Check::NotBlank, "Methodology is required"),
    ];
}

/// Updates carry no rules: every field is optional
impl Validate for FinanceMethodChanges {
    const RULES: &'static [Rule] = &[];
}

#[derive(Debug, Default, Deserialize)]
pub struct FinanceMethodQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

// =========================================================================
// GET /api/finance-methods
// =========================================================================

pub async fn list_finance_methods(
    State(state): State<AppState>,
    query: Result<Query<FinanceMethodQuery>, QueryRejection>,
) -> AppResult<Json<ListResponse<FinanceMethodView>>> {
    let Query(query) = query?;
    let filter = FinanceMethodFilter::new(query.category, query.search);

    let methods = FinanceMethodRepository::new(state.store.clone())
        .list(&filter)
        .await?;

    Ok(Json(ListResponse::new(methods)))
}

// =========================================================================
// GET /api/finance-methods/:id
// =========================================================================

pub async fn get_finance_method(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<FinanceMethodView>>> {
    let id = parse_id(&id, NOT_FOUND)?;

    let method = FinanceMethodRepository::new(state.store.clone())
        .find_view(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(DataResponse::new(method)))
}

// =========================================================================
// POST /api/finance-methods
// =========================================================================

pub async fn create_finance_method(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Validated(request): Validated<CreateFinanceMethodRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<FinanceMethod>>)> {
    let method = FinanceMethod::create(
        NewFinanceMethod {
            title: request.title,
            description: request.description,
            category: request.category,
            methodology: request.methodology,
            benefits: request.benefits.unwrap_or_default(),
            image_url: request.image_url,
            created_by: user.id,
        },
        Utc::now(),
    );

    FinanceMethodRepository::new(state.store.clone())
        .insert(&method)
        .await?;

    tracing::info!(finance_method_id = %method.id, created_by = %user.id, "Finance method created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            "Finance method created successfully",
            method,
        )),
    ))
}

// =========================================================================
// PUT /api/finance-methods/:id
// =========================================================================

pub async fn update_finance_method(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Validated(changes): Validated<FinanceMethodChanges>,
) -> AppResult<Json<DataResponse<FinanceMethod>>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let methods = FinanceMethodRepository::new(state.store.clone());

    let mut method = methods
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    method.apply(changes, Utc::now());

    if !methods.update(&method).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }

    tracing::info!(finance_method_id = %method.id, "Finance method updated");

    Ok(Json(DataResponse::with_message(
        "Finance method updated successfully",
        method,
    )))
}

// =========================================================================
// DELETE /api/finance-methods/:id
// =========================================================================

pub async fn delete_finance_method(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let methods = FinanceMethodRepository::new(state.store.clone());

    if methods.find_by_id(id).await?.is_none() || !methods.delete(id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }

    tracing::info!(finance_method_id = %id, "Finance method deleted");

    Ok(Json(MessageResponse::new("Finance method deleted successfully")))
}
