//! Hospital search and visit booking handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use medichat_auth::CurrentUser;
use medichat_core::domain::HospitalVisit;
use medichat_core::response::ApiResponse;

use crate::handlers::AppError;
use crate::models::{CreateVisit, HospitalDto, SearchHospitals, VisitDto};
use crate::state::AppState;

/// Search hospitals by name (POST /api/hospitals/search).
pub async fn search_hospitals(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<SearchHospitals>,
) -> Result<Json<ApiResponse<Vec<HospitalDto>>>, Response> {
    if let Err(message) = payload.validate() {
        return Err(AppError::with_status(StatusCode::BAD_REQUEST, message));
    }

    let hospitals = state
        .hospitals
        .search_hospitals(payload.keyword.trim())
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    let dtos = hospitals.iter().map(HospitalDto::from).collect();
    Ok(Json(ApiResponse::success(200, dtos, "Hospitals fetched")))
}

/// Book a hospital visit (POST /api/hospitals/visits).
pub async fn create_visit(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateVisit>,
) -> Result<impl IntoResponse, Response> {
    if let Err(message) = payload.validate(Utc::now()) {
        return Err(AppError::with_status(StatusCode::BAD_REQUEST, message));
    }

    let hospital = state
        .hospitals
        .get_hospital(payload.hospital_id)
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    let Some(hospital) = hospital else {
        return Err(AppError::with_status(
            StatusCode::NOT_FOUND,
            "Hospital not found",
        ));
    };

    let visit = HospitalVisit::new(user.id, hospital.id, payload.scheduled_at);
    state
        .visits
        .create_visit(&visit)
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    tracing::info!(visit_id = %visit.id, hospital_id = %hospital.id, user_id = %user.id, "Visit booked");

    let body = ApiResponse::success(201, VisitDto::new(&visit, &hospital.name), "Visit booked");
    Ok((StatusCode::CREATED, Json(body)))
}

/// List the caller's visits, soonest first (GET /api/hospitals/visits).
pub async fn list_visits(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<VisitDto>>>, Response> {
    let visits = state
        .visits
        .visits_for_user(user.id)
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    let mut dtos = Vec::with_capacity(visits.len());
    for visit in &visits {
        let name = state
            .hospitals
            .get_hospital(visit.hospital_id)
            .await
            .map_err(|e| AppError::from(e).into_response())?
            .map(|h| h.name)
            .unwrap_or_default();
        dtos.push(VisitDto::new(visit, name));
    }

    Ok(Json(ApiResponse::success(200, dtos, "Visits fetched")))
}
