//! Admin REST API. Everything except `/login` sits behind the session
//! middleware.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
};

use crate::auth::{self, Claims, LoginRequest, SessionToken};
use crate::dashboard::{Dashboard, DashboardSummary};
use crate::db::repository::{self, Table};
use crate::error::AppError;
use crate::models::{Course, CourseDetails, Instructor, Project, TeamMember};
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/session", get(session))
        .route("/dashboard", get(dashboard))
        .route("/courses/{id}/details", get(details_for_course))
        .merge(collection::<Course>())
        .merge(collection::<CourseDetails>())
        .merge(collection::<TeamMember>())
        .merge(collection::<Project>())
        .merge(collection::<Instructor>())
        .route_layer(middleware::from_fn_with_state(state, auth::require_session));

    Router::new()
        .route("/login", post(login))
        .merge(protected)
}

fn collection<E: Table>() -> Router<AppState> {
    Router::new()
        .route(&format!("/{}", E::COLLECTION), get(list::<E>).post(create::<E>))
        .route(
            &format!("/{}/{{id}}", E::COLLECTION),
            get(show::<E>).patch(update::<E>).delete(remove::<E>),
        )
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionToken>, AppError> {
    let session = state.sessions.login(&req)?;
    Ok(Json(session))
}

async fn session(Extension(claims): Extension<Claims>) -> Json<Claims> {
    Json(claims)
}

async fn dashboard(State(state): State<AppState>) -> Json<DashboardSummary> {
    let mut dashboard = Dashboard::new(state.services.clone());
    dashboard.load().await;
    Json(dashboard.summary())
}

async fn list<E: Table>(State(state): State<AppState>) -> Result<Json<Vec<E>>, AppError> {
    let records = repository::fetch_all::<E>(&state.db).await?;
    Ok(Json(records))
}

async fn show<E: Table>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<E>, AppError> {
    let record = repository::find_by_id::<E>(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(record))
}

async fn create<E: Table>(
    State(state): State<AppState>,
    Json(new): Json<E::New>,
) -> Result<(StatusCode, Json<E>), AppError> {
    let record = repository::insert::<E>(&state.db, new).await?;
    tracing::info!("created {} {}", E::LABEL, record.id());
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update<E: Table>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<E::Patch>,
) -> Result<Json<E>, AppError> {
    let record = repository::update::<E>(&state.db, &id, patch)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(record))
}

async fn remove<E: Table>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let ok = repository::delete::<E>(&state.db, &id).await?;
    if ok {
        tracing::info!("deleted {} {}", E::LABEL, id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn details_for_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CourseDetails>, AppError> {
    let details = repository::find_details_by_course_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(details))
}
