use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};

use clientele_auth::Operation;
use clientele_core::CustomerId;
use clientele_customers::Customer;

use crate::app::{dto, errors::ApiError, services::AppServices};
use crate::authz::authorize_request;
use crate::context::PrincipalContext;

// Bodies are extracted as `Result<Json<_>, JsonRejection>` so a bad payload
// never masks a 401/403: authorization is always decided first.

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
    principal: Option<Extension<PrincipalContext>>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    authorize_request(principal.as_deref(), Operation::ListCustomers)?;
    Ok(Json(services.customers.list()?))
}

pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    principal: Option<Extension<PrincipalContext>>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    authorize_request(principal.as_deref(), Operation::GetCustomer)?;
    let id: CustomerId = id.parse()?;
    Ok(Json(services.customers.get(id)?))
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    principal: Option<Extension<PrincipalContext>>,
    body: Result<Json<Customer>, JsonRejection>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    authorize_request(principal.as_deref(), Operation::CreateCustomer)?;
    let Json(customer) = body?;

    let created = services.customers.create(customer)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_customer(
    Extension(services): Extension<Arc<AppServices>>,
    principal: Option<Extension<PrincipalContext>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateCustomerRequest>, JsonRejection>,
) -> Result<Json<Customer>, ApiError> {
    authorize_request(principal.as_deref(), Operation::UpdateCustomer)?;
    let id: CustomerId = id.parse()?;
    let Json(body) = body?;

    if let Some(body_id) = body.id.filter(|body_id| *body_id != id) {
        return Err(ApiError::InvalidRequest {
            status: StatusCode::BAD_REQUEST,
            message: format!("body id {body_id} does not match path id {id}"),
        });
    }

    let updated = services.customers.update(id, body.into())?;
    Ok(Json(updated))
}

pub async fn delete_customer(
    Extension(services): Extension<Arc<AppServices>>,
    principal: Option<Extension<PrincipalContext>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    authorize_request(principal.as_deref(), Operation::DeleteCustomer)?;
    let id: CustomerId = id.parse()?;

    services.customers.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
