//! Contact inquiry endpoints

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{provided, Contact, ContactFilter, ContactStatus, InquiryType, NewContact};
use crate::error::{AppError, AppResult};
use crate::repository::ContactRepository;
use crate::validation::{Check, FieldError, Rule, Validate, Validated};

use super::response::{DataResponse, ListResponse, MessageResponse};
use super::{parse_id, AppState};

const NOT_FOUND: &str = "Contact inquiry not found";

// =========================================================================
// Request types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub inquiry_type: Option<String>,
}

impl Validate for CreateContactRequest {
    const RULES: &'static [Rule] = &[
        Rule::new("name", Check::NotBlank, "Name is required"),
        Rule::new("email", Check::Email, "Please provide a valid email"),
        Rule::new("subject", Check::NotBlank, "Subject is required"),
        Rule::new("message", Check::NotBlank, "Message is required"),
    ];
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateContactRequest {
    #[serde(default)]
    pub status: Option<String>,
}

impl Validate for UpdateContactRequest {
    const RULES: &'static [Rule] = &[];
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub inquiry_type: Option<String>,
}

fn parse_inquiry_type(value: Option<String>) -> AppResult<Option<InquiryType>> {
    provided(value)
        .map(|v| v.parse::<InquiryType>())
        .transpose()
        .map_err(|_| {
            AppError::ValidationFailed(vec![FieldError::new(
                "inquiryType",
                "Inquiry type must be one of General, Support, Feedback",
            )])
        })
}

fn parse_status(value: Option<String>) -> AppResult<Option<ContactStatus>> {
    provided(value)
        .map(|v| v.parse::<ContactStatus>())
        .transpose()
        .map_err(|_| {
            AppError::ValidationFailed(vec![FieldError::new(
                "status",
                "Status must be one of pending, resolved",
            )])
        })
}

// =========================================================================
// POST /api/contact
// =========================================================================

pub async fn create_contact(
    State(state): State<AppState>,
    Validated(request): Validated<CreateContactRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Contact>>)> {
    let inquiry_type = parse_inquiry_type(request.inquiry_type)?.unwrap_or_default();

    let contact = Contact::create(
        NewContact {
            name: request.name,
            email: request.email,
            subject: request.subject,
            message: request.message,
            inquiry_type,
        },
        Utc::now(),
    );

    ContactRepository::new(state.store.clone())
        .insert(&contact)
        .await?;

    tracing::info!(
        contact_id = %contact.id,
        inquiry_type = %contact.inquiry_type,
        "Contact inquiry submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            "Your inquiry has been submitted successfully",
            contact,
        )),
    ))
}

// =========================================================================
// GET /api/contact
// =========================================================================

pub async fn list_contacts(
    State(state): State<AppState>,
    query: Result<Query<ContactListQuery>, QueryRejection>,
) -> AppResult<Json<ListResponse<Contact>>> {
    let Query(query) = query?;

    let filter = ContactFilter {
        status: parse_status(query.status)?,
        inquiry_type: parse_inquiry_type(query.inquiry_type)?,
    };

    let contacts = ContactRepository::new(state.store.clone())
        .list(&filter)
        .await?;

    Ok(Json(ListResponse::new(contacts)))
}

// =========================================================================
// GET /api/contact/:id
// =========================================================================

pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Contact>>> {
    let id = parse_id(&id, NOT_FOUND)?;

    let contact = ContactRepository::new(state.store.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(DataResponse::new(contact)))
}

// =========================================================================
// PUT /api/contact/:id
// =========================================================================

pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Validated(request): Validated<UpdateContactRequest>,
) -> AppResult<Json<DataResponse<Contact>>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let contacts = ContactRepository::new(state.store.clone());

    let mut contact = contacts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    let status = parse_status(request.status)?;
    contact.apply_status(status, Utc::now());

    if !contacts.update(&contact).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }

    tracing::info!(contact_id = %contact.id, status = %contact.status, "Contact inquiry updated");

    Ok(Json(DataResponse::with_message(
        "Contact inquiry updated successfully",
        contact,
    )))
}

// =========================================================================
// DELETE /api/contact/:id
// =========================================================================

pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let contacts = ContactRepository::new(state.store.clone());

    if contacts.find_by_id(id).await?.is_none() || !contacts.delete(id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }

    tracing::info!(contact_id = %id, "Contact inquiry deleted");

    Ok(Json(MessageResponse::new("Contact inquiry deleted successfully")))
}
