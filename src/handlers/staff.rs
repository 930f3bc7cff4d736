use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::itinerary::ItineraryType;
use crate::entities::trip::PaymentStatus;
use crate::entities::{participant, trip};
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;
use crate::utils::status::{derive_overall_status, ConfirmOutcome, PaymentRecord};
use crate::AppState;

// ============ Triage views ============

/// One payment line for the triage screens. `participant_id` is None for
/// the creator's own payment.
#[derive(Debug, Serialize)]
pub struct PaymentRow {
    pub trip_id: Uuid,
    pub participant_id: Option<Uuid>,
    pub name: String,
    pub phone: String,
    pub number_of_people: i32,
    pub amount_due: i64,
    pub proof_url: Option<String>,
    pub itinerary_name: String,
    pub date: NaiveDate,
    pub departure_time: String,
}

fn has_proof(proof_url: &Option<String>) -> bool {
    proof_url.as_deref().is_some_and(|u| !u.trim().is_empty())
}

async fn pending_payment_rows(state: &AppState, with_proof: bool) -> AppResult<Vec<PaymentRow>> {
    let trips = trip::Entity::find()
        .filter(trip::Column::IsDeleted.eq(false))
        .order_by_asc(trip::Column::Date)
        .all(&state.db)
        .await?;

    let mut rows = Vec::new();
    for t in &trips {
        if t.status == PaymentStatus::PendingPayment && has_proof(&t.proof_url) == with_proof {
            rows.push(PaymentRow {
                trip_id: t.id,
                participant_id: None,
                name: t.contact_name.clone(),
                phone: t.contact_phone.clone(),
                number_of_people: t.number_of_people,
                amount_due: t.total_price,
                proof_url: t.proof_url.clone(),
                itinerary_name: t.itinerary_name.clone(),
                date: t.date,
                departure_time: t.departure_time.clone(),
            });
        }
    }

    let participants = participant::Entity::find()
        .filter(participant::Column::Status.eq(PaymentStatus::PendingPayment))
        .all(&state.db)
        .await?;

    for p in participants {
        if has_proof(&p.proof_url) != with_proof {
            continue;
        }
        // Skip participants on deleted trips
        let Some(t) = trips.iter().find(|t| t.id == p.trip_id) else {
            continue;
        };

        rows.push(PaymentRow {
            trip_id: p.trip_id,
            participant_id: Some(p.id),
            name: p.name,
            phone: p.phone,
            number_of_people: p.number_of_people,
            amount_due: p.amount_due,
            proof_url: p.proof_url,
            itinerary_name: t.itinerary_name.clone(),
            date: t.date,
            departure_time: t.departure_time.clone(),
        });
    }

    rows.sort_by_key(|r| r.date);
    Ok(rows)
}

/// Payments waiting on a transfer proof that has been uploaded
pub async fn pending_proof_payments(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PaymentRow>>> {
    let rows = pending_payment_rows(&state, true).await?;
    Ok(Json(rows))
}

/// Payments with no proof uploaded yet
pub async fn not_paid_payments(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PaymentRow>>> {
    let rows = pending_payment_rows(&state, false).await?;
    Ok(Json(rows))
}

// ============ Trip list ============

#[derive(Debug, Deserialize)]
pub struct TripListQuery {
    pub status: Option<PaymentStatus>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ParticipantInfo {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub number_of_people: i32,
    pub status: PaymentStatus,
    pub amount_due: i64,
    pub proof_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TripDetailResponse {
    pub id: Uuid,
    pub itinerary_name: String,
    pub itinerary_type: ItineraryType,
    pub date: NaiveDate,
    pub departure_time: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub number_of_people: i32,
    pub district: Option<String>,
    pub status: PaymentStatus,
    pub overall_status: PaymentStatus,
    pub total_price: i64,
    pub proof_url: Option<String>,
    pub handover_note: String,
    pub participants: Vec<ParticipantInfo>,
}

#[derive(Debug, Serialize)]
pub struct TripListResponse {
    pub trips: Vec<TripDetailResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// Paginated trip list, optionally filtered by the creator's payment status
pub async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<TripListQuery>,
) -> AppResult<Json<TripListResponse>> {
    let today = Utc::now().date_naive();
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let mut select = trip::Entity::find().filter(trip::Column::IsDeleted.eq(false));
    if let Some(status) = query.status {
        select = select.filter(trip::Column::Status.eq(status));
    }

    let paginator = select
        .order_by_desc(trip::Column::Date)
        .paginate(&state.db, per_page);
    let total = paginator.num_items().await?;
    let trips = paginator.fetch_page(page - 1).await?;

    let mut responses = Vec::new();
    for t in trips {
        let participants = participant::Entity::find()
            .filter(participant::Column::TripId.eq(t.id))
            .all(&state.db)
            .await?;

        let statuses: Vec<PaymentStatus> = participants.iter().map(|p| p.status).collect();
        let overall = derive_overall_status(t.status, &statuses, t.date, today);

        responses.push(TripDetailResponse {
            id: t.id,
            itinerary_name: t.itinerary_name,
            itinerary_type: t.itinerary_type,
            date: t.date,
            departure_time: t.departure_time,
            contact_name: t.contact_name,
            contact_phone: t.contact_phone,
            number_of_people: t.number_of_people,
            district: t.district,
            status: t.status,
            overall_status: overall,
            total_price: t.total_price,
            proof_url: t.proof_url,
            handover_note: t.handover_note,
            participants: participants
                .into_iter()
                .map(|p| ParticipantInfo {
                    id: p.id,
                    name: p.name,
                    phone: p.phone,
                    number_of_people: p.number_of_people,
                    status: p.status,
                    amount_due: p.amount_due,
                    proof_url: p.proof_url,
                })
                .collect(),
        });
    }

    Ok(Json(TripListResponse {
        trips: responses,
        page,
        per_page,
        total,
    }))
}

// ============ Payment confirmation ============

#[derive(Debug, Deserialize, Default)]
pub struct PaymentTargetRequest {
    /// None targets the creator's own payment
    pub participant_id: Option<Uuid>,
}

/// Confirm a pending payment. Reconfirming an already-confirmed payment is
/// a no-op so double-clicks in the admin panel stay harmless.
pub async fn confirm_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<PaymentTargetRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let trip = find_live_trip(&state, trip_id).await?;
    let now = Utc::now().into();

    match payload.participant_id {
        None => {
            let mut record = payment_record(trip.status, trip.confirmed_by, trip.confirmed_at);
            if record.confirm(claims.sub, now)? == ConfirmOutcome::AlreadyConfirmed {
                return Ok(Json(serde_json::json!({
                    "success": true,
                    "message": "Payment was already confirmed",
                })));
            }
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
            if record.confirm(claims.sub, now)? == ConfirmOutcome::AlreadyConfirmed {
                return Ok(Json(serde_json::json!({
                    "success": true,
                    "message": "Payment was already confirmed",
                })));
            }
            let mut active: participant::ActiveModel = participant.into();
            active.status = Set(record.status);
            active.confirmed_by = Set(record.confirmed_by);
            active.confirmed_at = Set(record.confirmed_at);
            active.update(&state.db).await?;
        }
    }

    tracing::info!(trip_id = %trip_id, admin = %claims.sub, "Payment confirmed");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Payment confirmed",
    })))
}

/// Cancel a payment that is still pending
pub async fn cancel_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<PaymentTargetRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let trip = find_live_trip(&state, trip_id).await?;

    match payload.participant_id {
        None => {
            let mut record = payment_record(trip.status, trip.confirmed_by, trip.confirmed_at);
            record.cancel()?;
            let mut active: trip::ActiveModel = trip.into();
            active.status = Set(record.status);
            active.update(&state.db).await?;
        }
        Some(participant_id) => {
            let participant = find_trip_participant(&state, trip.id, participant_id).await?;
            let mut record = payment_record(
                participant.status,
                participant.confirmed_by,
                participant.confirmed_at,
            );
            record.cancel()?;
            let mut active: participant::ActiveModel = participant.into();
            active.status = Set(record.status);
            active.update(&state.db).await?;
        }
    }

    tracing::info!(trip_id = %trip_id, staff = %claims.sub, "Payment cancelled");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Payment cancelled",
    })))
}

// ============ Handover note ============

#[derive(Debug, Deserialize)]
pub struct HandoverRequest {
    pub note: String,
}

/// Update the free-text handover note staff use for shift continuity
pub async fn update_handover(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<HandoverRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let trip = find_live_trip(&state, trip_id).await?;

    let mut active: trip::ActiveModel = trip.into();
    active.handover_note = Set(payload.note);
    active.update(&state.db).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Handover note updated",
    })))
}

// ============ Shared lookups ============

pub(crate) fn payment_record(
    status: PaymentStatus,
    confirmed_by: Option<Uuid>,
    confirmed_at: Option<sea_orm::prelude::DateTimeWithTimeZone>,
) -> PaymentRecord {
    PaymentRecord {
        status,
        confirmed_by,
        confirmed_at,
    }
}

pub(crate) async fn find_live_trip(state: &AppState, trip_id: Uuid) -> AppResult<trip::Model> {
    trip::Entity::find_by_id(trip_id)
        .filter(trip::Column::IsDeleted.eq(false))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))
}

pub(crate) async fn find_trip_participant(
    state: &AppState,
    trip_id: Uuid,
    participant_id: Uuid,
) -> AppResult<participant::Model> {
    participant::Entity::find_by_id(participant_id)
        .filter(participant::Column::TripId.eq(trip_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Participant not found".to_string()))
}
