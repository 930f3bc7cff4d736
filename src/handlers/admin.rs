use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::entities::discount_code::{self, DiscountType};
use crate::entities::itinerary::{self, ItineraryType};
use crate::entities::user::{self, UserRole};
use crate::entities::{additional_service, district_surcharge, participant, trip};
use crate::error::{AppError, AppResult};
use crate::handlers::staff::{find_live_trip, find_trip_participant, payment_record};
use crate::utils::jwt::Claims;
use crate::AppState;

// ============ Itinerary Management ============

#[derive(Debug, Deserialize)]
pub struct CreateItineraryRequest {
    pub name: String,
    pub itinerary_type: ItineraryType,
    pub price_per_person: i64,
    pub description: String,
    #[serde(default)]
    pub time_slots: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItineraryRequest {
    pub name: Option<String>,
    pub itinerary_type: Option<ItineraryType>,
    pub price_per_person: Option<i64>,
    pub description: Option<String>,
    pub time_slots: Option<Vec<String>>,
}

/// Create an itinerary (admin)
pub async fn create_itinerary(
    State(state): State<AppState>,
    Json(payload): Json<CreateItineraryRequest>,
) -> AppResult<Json<itinerary::Model>> {
    if payload.price_per_person < 0 {
        return Err(AppError::BadRequest(
            "Price per person must not be negative".to_string(),
        ));
    }

    let new_itinerary = itinerary::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        itinerary_type: Set(payload.itinerary_type),
        price_per_person: Set(payload.price_per_person),
        description: Set(payload.description),
        time_slots: Set(serde_json::json!(payload.time_slots)),
        ..Default::default()
    };

    let result = new_itinerary.insert(&state.db).await?;
    Ok(Json(result))
}

/// Update an itinerary (admin). Existing trips keep their snapshot of the
/// old name/type/price.
pub async fn update_itinerary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItineraryRequest>,
) -> AppResult<Json<itinerary::Model>> {
    let found = itinerary::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Itinerary not found".to_string()))?;

    let mut active: itinerary::ActiveModel = found.into();

    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(itinerary_type) = payload.itinerary_type {
        active.itinerary_type = Set(itinerary_type);
    }
    if let Some(price) = payload.price_per_person {
        if price < 0 {
            return Err(AppError::BadRequest(
                "Price per person must not be negative".to_string(),
            ));
        }
        active.price_per_person = Set(price);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(slots) = payload.time_slots {
        active.time_slots = Set(serde_json::json!(slots));
    }

    let result = active.update(&state.db).await?;
    Ok(Json(result))
}

/// Delete an itinerary (admin); refused while trips still reference it
pub async fn delete_itinerary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let referencing = trip::Entity::find()
        .filter(trip::Column::ItineraryId.eq(id))
        .count(&state.db)
        .await?;

    if referencing > 0 {
        return Err(AppError::Conflict(
            "Itinerary is referenced by existing trips".to_string(),
        ));
    }

    let result = itinerary::Entity::delete_by_id(id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Itinerary not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "success": true, "message": "Itinerary deleted" })))
}

// ============ District Surcharge Management ============

#[derive(Debug, Deserialize)]
pub struct CreateSurchargeRequest {
    pub district: String,
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSurchargeRequest {
    pub amount: i64,
}

/// List district surcharges (admin)
pub async fn list_surcharges(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<district_surcharge::Model>>> {
    let surcharges = district_surcharge::Entity::find()
        .order_by_asc(district_surcharge::Column::District)
        .all(&state.db)
        .await?;
    Ok(Json(surcharges))
}

/// Create a district surcharge (admin)
pub async fn create_surcharge(
    State(state): State<AppState>,
    Json(payload): Json<CreateSurchargeRequest>,
) -> AppResult<Json<district_surcharge::Model>> {
    let district = payload.district.trim().to_string();
    if district.is_empty() {
        return Err(AppError::BadRequest("District name is required".to_string()));
    }

    let existing = district_surcharge::Entity::find()
        .filter(district_surcharge::Column::District.eq(&district))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(
            "A surcharge for this district already exists".to_string(),
        ));
    }

    let new_surcharge = district_surcharge::ActiveModel {
        id: Set(Uuid::new_v4()),
        district: Set(district),
        amount: Set(payload.amount),
        ..Default::default()
    };

    let result = new_surcharge.insert(&state.db).await?;
    Ok(Json(result))
}

/// Update a district surcharge amount (admin)
pub async fn update_surcharge(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSurchargeRequest>,
) -> AppResult<Json<district_surcharge::Model>> {
    let found = district_surcharge::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Surcharge not found".to_string()))?;

    let mut active: district_surcharge::ActiveModel = found.into();
    active.amount = Set(payload.amount);

    let result = active.update(&state.db).await?;
    Ok(Json(result))
}

/// Delete a district surcharge (admin)
pub async fn delete_surcharge(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = district_surcharge::Entity::delete_by_id(id)
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Surcharge not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "success": true, "message": "Surcharge deleted" })))
}

// ============ Additional Service Management ============

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub applies_to: Vec<ItineraryType>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub applies_to: Option<Vec<ItineraryType>>,
}

/// List additional services (admin)
pub async fn list_services(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<additional_service::Model>>> {
    let services = additional_service::Entity::find()
        .order_by_asc(additional_service::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(services))
}

/// Create an additional service (admin)
pub async fn create_service(
    State(state): State<AppState>,
    Json(payload): Json<CreateServiceRequest>,
) -> AppResult<Json<additional_service::Model>> {
    if payload.price < 0 {
        return Err(AppError::BadRequest("Price must not be negative".to_string()));
    }

    let new_service = additional_service::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        price: Set(payload.price),
        applies_to: Set(serde_json::json!(payload.applies_to)),
        ..Default::default()
    };

    let result = new_service.insert(&state.db).await?;
    Ok(Json(result))
}

/// Update an additional service (admin)
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateServiceRequest>,
) -> AppResult<Json<additional_service::Model>> {
    let found = additional_service::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;

    let mut active: additional_service::ActiveModel = found.into();

    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(price) = payload.price {
        if price < 0 {
            return Err(AppError::BadRequest("Price must not be negative".to_string()));
        }
        active.price = Set(price);
    }
    if let Some(applies_to) = payload.applies_to {
        active.applies_to = Set(serde_json::json!(applies_to));
    }

    let result = active.update(&state.db).await?;
    Ok(Json(result))
}

/// Delete an additional service (admin)
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = additional_service::Entity::delete_by_id(id)
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Service not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "success": true, "message": "Service deleted" })))
}

// ============ Discount Code Management ============

#[derive(Debug, Deserialize)]
pub struct CreateDiscountRequest {
    pub code: String,
    pub discount_type: DiscountType,
    pub value: i64,
    pub usage_limit: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Distinguishes an absent field (keep the stored value) from an explicit
/// `null` (clear it). Plain `Option<Option<T>>` folds `null` into the outer
/// None, so the inner layer needs its own deserializer.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct UpdateDiscountRequest {
    pub value: Option<i64>,
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub usage_limit: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Serialize)]
pub struct DiscountCodeResponse {
    pub id: Uuid,
    pub code: String,
    pub discount_type: DiscountType,
    pub value: i64,
    pub is_active: bool,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_expired: bool,
    pub is_exhausted: bool,
}

impl From<discount_code::Model> for DiscountCodeResponse {
    fn from(d: discount_code::Model) -> Self {
        let is_expired = d.is_expired();
        let is_exhausted = d.is_exhausted();
        Self {
            id: d.id,
            code: d.code,
            discount_type: d.discount_type,
            value: d.value,
            is_active: d.is_active,
            usage_limit: d.usage_limit,
            used_count: d.used_count,
            expires_at: d.expires_at.map(|t| t.with_timezone(&Utc)),
            is_expired,
            is_exhausted,
        }
    }
}

/// List discount codes with computed expiry/exhaustion flags (admin)
pub async fn list_discounts(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<DiscountCodeResponse>>> {
    let discounts = discount_code::Entity::find()
        .order_by_asc(discount_code::Column::Code)
        .all(&state.db)
        .await?;

    Ok(Json(discounts.into_iter().map(Into::into).collect()))
}

/// Create a discount code (admin); codes are stored uppercase
pub async fn create_discount(
    State(state): State<AppState>,
    Json(payload): Json<CreateDiscountRequest>,
) -> AppResult<Json<DiscountCodeResponse>> {
    let code = payload.code.trim().to_uppercase();
    if code.is_empty() {
        return Err(AppError::BadRequest("Code is required".to_string()));
    }

    if payload.value < 0 {
        return Err(AppError::BadRequest("Value must not be negative".to_string()));
    }
    if payload.discount_type == DiscountType::Percentage && payload.value > 100 {
        return Err(AppError::BadRequest(
            "Percentage value must be between 0 and 100".to_string(),
        ));
    }

    let existing = discount_code::Entity::find()
        .filter(discount_code::Column::Code.eq(&code))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict("Code already exists".to_string()));
    }

    let new_discount = discount_code::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(code),
        discount_type: Set(payload.discount_type),
        value: Set(payload.value),
        is_active: Set(true),
        usage_limit: Set(payload.usage_limit),
        used_count: Set(0),
        expires_at: Set(payload.expires_at.map(Into::into)),
        ..Default::default()
    };

    let result = new_discount.insert(&state.db).await?;
    Ok(Json(result.into()))
}

/// Update a discount code (admin)
pub async fn update_discount(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDiscountRequest>,
) -> AppResult<Json<DiscountCodeResponse>> {
    let found = discount_code::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Discount code not found".to_string()))?;

    let mut active: discount_code::ActiveModel = found.into();

    if let Some(value) = payload.value {
        if value < 0 {
            return Err(AppError::BadRequest("Value must not be negative".to_string()));
        }
        active.value = Set(value);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(usage_limit) = payload.usage_limit {
        active.usage_limit = Set(usage_limit);
    }
    if let Some(expires_at) = payload.expires_at {
        active.expires_at = Set(expires_at.map(Into::into));
    }

    let result = active.update(&state.db).await?;
    Ok(Json(result.into()))
}

/// Delete a discount code (admin)
pub async fn delete_discount(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = discount_code::Entity::delete_by_id(id)
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Discount code not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "success": true, "message": "Discount code deleted" })))
}

// ============ Payment revert (admin only) ============

#[derive(Debug, Deserialize, Default)]
pub struct RevertPaymentRequest {
    /// None targets the creator's own payment
    pub participant_id: Option<Uuid>,
}

/// Take a confirmed payment back to pending and clear who confirmed it.
/// Deliberately admin-gated; staff can confirm but not undo.
pub async fn revert_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<RevertPaymentRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let trip = find_live_trip(&state, trip_id).await?;

    match payload.participant_id {
        None => {
            let mut record = payment_record(trip.status, trip.confirmed_by, trip.confirmed_at);
            record.revert()?;
            let mut active: trip::ActiveModel = trip.into();
            active.status = Set(record.status);
            active.confirmed_by = Set(record.confirmed_by);
            active.confirmed_at = Set(record.confirmed_at);
            active.update(&state.db).await?;
        }
        Some(participant_id) => {
            let participant = find_trip_participant(&state, trip.id, participant_id).await?;
            let mut record = payment_record(
                participant.status,
                participant.confirmed_by,
                participant.confirmed_at,
            );
            record.revert()?;
            let mut active: participant::ActiveModel = participant.into();
            active.status = Set(record.status);
            active.confirmed_by = Set(record.confirmed_by);
            active.confirmed_at = Set(record.confirmed_at);
            active.update(&state.db).await?;
        }
    }

    tracing::info!(trip_id = %trip_id, admin = %claims.sub, "Payment reverted to pending");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Payment reverted to pending",
    })))
}

// ============ Trip soft delete ============

/// Soft-delete a trip (admin). The record stays for audit; every read path
/// filters the tombstone.
pub async fn delete_trip(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(trip_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let trip = find_live_trip(&state, trip_id).await?;

    let mut active: trip::ActiveModel = trip.into();
    active.is_deleted = Set(true);
    active.deleted_by = Set(Some(claims.sub));
    active.deleted_at = Set(Some(Utc::now().into()));
    active.update(&state.db).await?;

    tracing::info!(trip_id = %trip_id, admin = %claims.sub, "Trip soft-deleted");

    Ok(Json(serde_json::json!({ "success": true, "message": "Trip deleted" })))
}

// ============ User Management ============

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// List all users (admin)
pub async fn list_all_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = user::Entity::find().all(&state.db).await?;

    let responses: Vec<UserResponse> = users
        .into_iter()
        .map(|u| UserResponse {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role,
            created_at: u.created_at.with_timezone(&Utc),
        })
        .collect();

    Ok(Json(responses))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

/// Update user role (admin), e.g. promoting a customer account to staff
pub async fn update_user_role(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> AppResult<Json<UserResponse>> {
    let found = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let mut active: user::ActiveModel = found.into();
    active.role = Set(payload.role.clone());
    let updated = active.update(&state.db).await?;

    Ok(Json(UserResponse {
        id: updated.id,
        email: updated.email,
        name: updated.name,
        role: updated.role,
        created_at: updated.created_at.with_timezone(&Utc),
    }))
}

#[cfg(test)]
mod tests {
    use super::UpdateDiscountRequest;

    #[test]
    fn test_update_discount_absent_fields_keep_stored_values() {
        let req: UpdateDiscountRequest = serde_json::from_str(r#"{ "value": 500 }"#).unwrap();
        assert_eq!(req.value, Some(500));
        assert_eq!(req.usage_limit, None);
        assert!(req.expires_at.is_none());
    }

    #[test]
    fn test_update_discount_null_clears_limit_and_expiry() {
        let req: UpdateDiscountRequest =
            serde_json::from_str(r#"{ "usage_limit": null, "expires_at": null }"#).unwrap();
        assert_eq!(req.usage_limit, Some(None));
        assert!(matches!(req.expires_at, Some(None)));
    }

    #[test]
    fn test_update_discount_present_value_sets_limit() {
        let req: UpdateDiscountRequest =
            serde_json::from_str(r#"{ "usage_limit": 10 }"#).unwrap();
        assert_eq!(req.usage_limit, Some(Some(10)));
    }
}
