use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::discount_code::{self, DiscountType};
use crate::entities::itinerary::{self, ItineraryType};
use crate::entities::trip::PaymentStatus;
use crate::entities::{additional_service, district_surcharge, participant, trip};
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;
use crate::utils::phone::is_valid_phone;
use crate::utils::pricing::calculate_price;
use crate::utils::status::{derive_overall_status, is_joinable};
use crate::AppState;

// ============ Catalog reads ============

/// List all itineraries (public catalog)
pub async fn list_itineraries(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<itinerary::Model>>> {
    let itineraries = itinerary::Entity::find()
        .order_by_asc(itinerary::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(itineraries))
}

/// Get one itinerary
pub async fn get_itinerary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<itinerary::Model>> {
    let found = itinerary::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Itinerary not found".to_string()))?;
    Ok(Json(found))
}

// ============ Discount validation ============

#[derive(Debug, Deserialize)]
pub struct ValidateDiscountQuery {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct DiscountInfo {
    pub code: String,
    pub discount_type: DiscountType,
    pub value: i64,
}

/// Check a discount code; returns the code's terms or null.
/// Valid = active, not expired, not used up.
pub async fn validate_discount(
    State(state): State<AppState>,
    Query(query): Query<ValidateDiscountQuery>,
) -> AppResult<Json<Option<DiscountInfo>>> {
    let found = find_discount(&state.db, &query.code).await?;

    Ok(Json(found.filter(|d| d.is_valid()).map(|d| DiscountInfo {
        code: d.code,
        discount_type: d.discount_type,
        value: d.value,
    })))
}

// ============ Price quote ============

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub itinerary_id: Uuid,
    pub number_of_people: i32,
    pub district: Option<String>,
    #[serde(default)]
    pub service_ids: Vec<Uuid>,
    pub discount_code: Option<String>,
}

/// Price preview for the booking form; same arithmetic as trip creation
pub async fn price_quote(
    State(state): State<AppState>,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if payload.number_of_people < 1 {
        return Err(AppError::BadRequest(
            "Number of people must be at least 1".to_string(),
        ));
    }

    let itinerary = itinerary::Entity::find_by_id(payload.itinerary_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Itinerary not found".to_string()))?;

    let discount = resolve_discount(&state.db, payload.discount_code.as_deref()).await?;
    let price = resolve_price(
        &state.db,
        itinerary.price_per_person,
        payload.number_of_people,
        payload.district.as_deref(),
        &payload.service_ids,
        discount.as_ref(),
    )
    .await?;

    Ok(Json(serde_json::json!({ "success": true, "price": price })))
}

// ============ Joinable trips ============

#[derive(Debug, Deserialize)]
pub struct JoinableQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct JoinableTripResponse {
    pub id: Uuid,
    pub itinerary_name: String,
    pub itinerary_type: ItineraryType,
    pub date: NaiveDate,
    pub departure_time: String,
    /// Creator's party plus everyone who has joined so far
    pub total_headcount: i32,
    pub price_per_person: i64,
}

/// Confirmed, future-dated trips open for joining, soonest first
pub async fn joinable_trips(
    State(state): State<AppState>,
    Query(query): Query<JoinableQuery>,
) -> AppResult<Json<Vec<JoinableTripResponse>>> {
    let today = Utc::now().date_naive();
    let limit = query.limit.unwrap_or(20) as usize;

    let trips = trip::Entity::find()
        .filter(trip::Column::IsDeleted.eq(false))
        .filter(trip::Column::Date.gte(today))
        .order_by_asc(trip::Column::Date)
        .all(&state.db)
        .await?;

    let mut responses = Vec::new();
    for t in trips {
        if responses.len() >= limit {
            break;
        }

        let participants = participant::Entity::find()
            .filter(participant::Column::TripId.eq(t.id))
            .all(&state.db)
            .await?;

        let statuses: Vec<PaymentStatus> = participants.iter().map(|p| p.status).collect();
        let overall = derive_overall_status(t.status, &statuses, t.date, today);

        if !is_joinable(overall, t.date, today) {
            continue;
        }

        let joined: i32 = participants
            .iter()
            .filter(|p| p.status != PaymentStatus::Cancelled)
            .map(|p| p.number_of_people)
            .sum();

        let itinerary = itinerary::Entity::find_by_id(t.itinerary_id)
            .one(&state.db)
            .await?;

        responses.push(JoinableTripResponse {
            id: t.id,
            itinerary_name: t.itinerary_name,
            itinerary_type: t.itinerary_type,
            date: t.date,
            departure_time: t.departure_time,
            total_headcount: t.number_of_people + joined,
            price_per_person: itinerary.map(|i| i.price_per_person).unwrap_or_default(),
        });
    }

    Ok(Json(responses))
}

// ============ Trip creation ============

#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    pub itinerary_id: Uuid,
    pub date: NaiveDate,
    pub departure_time: String,
    pub number_of_people: i32,
    pub pickup_address: Option<String>,
    pub dropoff_address: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    #[serde(default)]
    pub notes: String,
    pub district: Option<String>,
    #[serde(default)]
    pub service_ids: Vec<Uuid>,
    pub discount_code: Option<String>,
}

/// Create a trip owned by the logged-in customer
pub async fn create_trip(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateTripRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if payload.number_of_people < 1 {
        return Err(AppError::BadRequest(
            "Number of people must be at least 1".to_string(),
        ));
    }

    if !is_valid_phone(&payload.contact_phone) {
        return Err(AppError::BadRequest(
            "Contact phone is not a valid phone number".to_string(),
        ));
    }

    let itinerary = itinerary::Entity::find_by_id(payload.itinerary_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Itinerary not found".to_string()))?;

    // The itinerary type fixes one leg at the airport; the free-form leg is
    // the one the customer must fill in.
    match itinerary.itinerary_type {
        ItineraryType::AirportPickup => {
            if payload.dropoff_address.as_deref().unwrap_or("").trim().is_empty() {
                return Err(AppError::BadRequest(
                    "Dropoff address is required for airport pickup trips".to_string(),
                ));
            }
        }
        ItineraryType::AirportDropoff | ItineraryType::Tourism => {
            if payload.pickup_address.as_deref().unwrap_or("").trim().is_empty() {
                return Err(AppError::BadRequest(
                    "Pickup address is required for this trip type".to_string(),
                ));
            }
        }
    }

    let discount = resolve_discount(&state.db, payload.discount_code.as_deref()).await?;
    let total_price = resolve_price(
        &state.db,
        itinerary.price_per_person,
        payload.number_of_people,
        payload.district.as_deref(),
        &payload.service_ids,
        discount.as_ref(),
    )
    .await?;

    let trip_id = Uuid::new_v4();
    let new_trip = trip::ActiveModel {
        id: Set(trip_id),
        itinerary_id: Set(itinerary.id),
        itinerary_name: Set(itinerary.name.clone()),
        itinerary_type: Set(itinerary.itinerary_type),
        creator_id: Set(claims.sub),
        date: Set(payload.date),
        departure_time: Set(payload.departure_time.clone()),
        number_of_people: Set(payload.number_of_people),
        pickup_address: Set(payload.pickup_address.clone()),
        dropoff_address: Set(payload.dropoff_address.clone()),
        contact_name: Set(payload.contact_name.clone()),
        contact_phone: Set(payload.contact_phone.clone()),
        notes: Set(payload.notes.clone()),
        district: Set(payload.district.clone()),
        service_ids: Set(serde_json::json!(payload.service_ids)),
        discount_code: Set(discount.as_ref().map(|d| d.code.clone())),
        status: Set(PaymentStatus::PendingPayment),
        total_price: Set(total_price),
        proof_url: Set(None),
        confirmed_by: Set(None),
        confirmed_at: Set(None),
        handover_note: Set(String::new()),
        is_deleted: Set(false),
        deleted_by: Set(None),
        deleted_at: Set(None),
        ..Default::default()
    };

    new_trip.insert(&state.db).await?;

    if let Some(d) = discount {
        redeem_discount(&state.db, d).await?;
    }

    tracing::info!(trip_id = %trip_id, price = total_price, "Trip created");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Trip created, awaiting payment",
        "trip_id": trip_id,
    })))
}

// ============ Joining ============

#[derive(Debug, Deserialize)]
pub struct JoinTripRequest {
    pub name: String,
    pub phone: String,
    pub number_of_people: i32,
    pub address: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    #[serde(default)]
    pub service_ids: Vec<Uuid>,
    pub discount_code: Option<String>,
    #[serde(default)]
    pub notes: String,
}

/// Join a confirmed trip as an extra participant.
///
/// The joiner pays for their own party only: itinerary base price times
/// their headcount, plus their own selected add-ons, minus their own
/// discount. The creator's district surcharge and services are not
/// inherited.
pub async fn join_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<JoinTripRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if payload.number_of_people < 1 {
        return Err(AppError::BadRequest(
            "Number of people must be at least 1".to_string(),
        ));
    }

    if !is_valid_phone(&payload.phone) {
        return Err(AppError::BadRequest(
            "Phone is not a valid phone number".to_string(),
        ));
    }

    let today = Utc::now().date_naive();
    let trip = trip::Entity::find_by_id(trip_id)
        .filter(trip::Column::IsDeleted.eq(false))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

    let participants = participant::Entity::find()
        .filter(participant::Column::TripId.eq(trip.id))
        .all(&state.db)
        .await?;

    let statuses: Vec<PaymentStatus> = participants.iter().map(|p| p.status).collect();
    let overall = derive_overall_status(trip.status, &statuses, trip.date, today);

    if !is_joinable(overall, trip.date, today) {
        return Err(AppError::Conflict(
            "This trip is not open for joining".to_string(),
        ));
    }

    let itinerary = itinerary::Entity::find_by_id(trip.itinerary_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Internal("Trip references a missing itinerary".to_string()))?;

    let discount = resolve_discount(&state.db, payload.discount_code.as_deref()).await?;
    let amount_due = resolve_price(
        &state.db,
        itinerary.price_per_person,
        payload.number_of_people,
        None,
        &payload.service_ids,
        discount.as_ref(),
    )
    .await?;

    let new_participant = participant::ActiveModel {
        id: Set(Uuid::new_v4()),
        trip_id: Set(trip.id),
        name: Set(payload.name.clone()),
        phone: Set(payload.phone.clone()),
        number_of_people: Set(payload.number_of_people),
        address: Set(payload.address.clone()),
        age: Set(payload.age),
        gender: Set(payload.gender.clone()),
        service_ids: Set(serde_json::json!(payload.service_ids)),
        discount_code: Set(discount.as_ref().map(|d| d.code.clone())),
        notes: Set(payload.notes.clone()),
        status: Set(PaymentStatus::PendingPayment),
        amount_due: Set(amount_due),
        proof_url: Set(None),
        confirmed_by: Set(None),
        confirmed_at: Set(None),
        ..Default::default()
    };

    new_participant.insert(&state.db).await?;

    if let Some(d) = discount {
        redeem_discount(&state.db, d).await?;
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Joined the trip, awaiting payment",
    })))
}

// ============ My trips ============

#[derive(Debug, Serialize)]
pub struct MyTripResponse {
    pub id: Uuid,
    pub itinerary_name: String,
    pub itinerary_type: ItineraryType,
    pub date: NaiveDate,
    pub departure_time: String,
    pub number_of_people: i32,
    pub status: PaymentStatus,
    pub overall_status: PaymentStatus,
    pub total_price: i64,
    pub proof_url: Option<String>,
    pub participant_count: usize,
}

/// List trips created by the logged-in customer
pub async fn my_trips(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<MyTripResponse>>> {
    let today = Utc::now().date_naive();

    let trips = trip::Entity::find()
        .filter(trip::Column::CreatorId.eq(claims.sub))
        .filter(trip::Column::IsDeleted.eq(false))
        .order_by_desc(trip::Column::Date)
        .all(&state.db)
        .await?;

    let mut responses = Vec::new();
    for t in trips {
        let participants = participant::Entity::find()
            .filter(participant::Column::TripId.eq(t.id))
            .all(&state.db)
            .await?;

        let statuses: Vec<PaymentStatus> = participants.iter().map(|p| p.status).collect();
        let overall = derive_overall_status(t.status, &statuses, t.date, today);

        responses.push(MyTripResponse {
            id: t.id,
            itinerary_name: t.itinerary_name,
            itinerary_type: t.itinerary_type,
            date: t.date,
            departure_time: t.departure_time,
            number_of_people: t.number_of_people,
            status: t.status,
            overall_status: overall,
            total_price: t.total_price,
            proof_url: t.proof_url,
            participant_count: participants.len(),
        });
    }

    Ok(Json(responses))
}

// ============ Payment proof upload ============

#[derive(Debug, Deserialize)]
pub struct UploadProofRequest {
    pub participant_id: Option<Uuid>,
    pub proof_url: String,
}

/// Attach a transfer-proof URL to a pending payment. Evidence submission
/// only; confirmation stays a separate staff step.
pub async fn upload_proof(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<UploadProofRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if payload.proof_url.trim().is_empty() {
        return Err(AppError::BadRequest("Proof URL must not be empty".to_string()));
    }

    let trip = trip::Entity::find_by_id(trip_id)
        .filter(trip::Column::IsDeleted.eq(false))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

    match payload.participant_id {
        None => {
            // Creator's own payment
            if trip.creator_id != claims.sub {
                return Err(AppError::Forbidden(
                    "Only the trip creator can upload this proof".to_string(),
                ));
            }
            if trip.status != PaymentStatus::PendingPayment {
                return Err(AppError::Conflict(
                    "Payment is not awaiting proof".to_string(),
                ));
            }

            let mut active: trip::ActiveModel = trip.into();
            active.proof_url = Set(Some(payload.proof_url.clone()));
            active.update(&state.db).await?;
        }
        Some(participant_id) => {
            let participant = participant::Entity::find_by_id(participant_id)
                .filter(participant::Column::TripId.eq(trip.id))
                .one(&state.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Participant not found".to_string()))?;

            if participant.status != PaymentStatus::PendingPayment {
                return Err(AppError::Conflict(
                    "Payment is not awaiting proof".to_string(),
                ));
            }

            let mut active: participant::ActiveModel = participant.into();
            active.proof_url = Set(Some(payload.proof_url.clone()));
            active.update(&state.db).await?;
        }
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Payment proof uploaded, awaiting confirmation",
    })))
}

// ============ Shared pricing resolution ============

/// Look up a discount code, uppercased. A missing code is fine (None); a
/// supplied code that is unknown or no longer redeemable is a validation
/// failure rather than a silent ignore.
pub(crate) async fn resolve_discount(
    db: &DatabaseConnection,
    code: Option<&str>,
) -> AppResult<Option<discount_code::Model>> {
    let Some(code) = code.filter(|c| !c.trim().is_empty()) else {
        return Ok(None);
    };

    let found = find_discount(db, code).await?;
    match found {
        Some(d) if d.is_valid() => Ok(Some(d)),
        _ => Err(AppError::BadRequest(
            "Discount code is invalid or expired".to_string(),
        )),
    }
}

pub(crate) async fn find_discount(
    db: &DatabaseConnection,
    code: &str,
) -> AppResult<Option<discount_code::Model>> {
    let normalized = code.trim().to_uppercase();
    let found = discount_code::Entity::find()
        .filter(discount_code::Column::Code.eq(&normalized))
        .one(db)
        .await?;
    Ok(found)
}

/// Count a redemption against the code's usage limit
pub(crate) async fn redeem_discount(
    db: &DatabaseConnection,
    discount: discount_code::Model,
) -> AppResult<()> {
    let used = discount.used_count + 1;
    let mut active: discount_code::ActiveModel = discount.into();
    active.used_count = Set(used);
    active.update(db).await?;
    Ok(())
}

/// Resolve catalog references and run the price calculation. Unknown
/// district names and unknown service ids are dropped silently, matching
/// the form behavior: a typo means "no surcharge", never an error.
pub(crate) async fn resolve_price(
    db: &DatabaseConnection,
    price_per_person: i64,
    headcount: i32,
    district: Option<&str>,
    service_ids: &[Uuid],
    discount: Option<&discount_code::Model>,
) -> AppResult<i64> {
    let surcharge = match district.filter(|d| !d.trim().is_empty()) {
        Some(name) => district_surcharge::Entity::find()
            .filter(district_surcharge::Column::District.eq(name.trim()))
            .one(db)
            .await?
            .map(|s| s.amount),
        None => None,
    };

    let service_prices: Vec<i64> = if service_ids.is_empty() {
        Vec::new()
    } else {
        additional_service::Entity::find()
            .filter(additional_service::Column::Id.is_in(service_ids.iter().copied()))
            .all(db)
            .await?
            .iter()
            .map(|s| s.price)
            .collect()
    };

    Ok(calculate_price(
        price_per_person,
        headcount,
        surcharge,
        &service_prices,
        discount.map(|d| (d.discount_type, d.value)),
    ))
}
