//! Read-only payloads for the public site, rendered through the server-side
//! services.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::error::AppError;
use crate::models::{AboutPage, Course, CoursePage, CourseStatus, CoursesPage, HomePage};
use crate::state::AppState;

const HOME_PAST_COURSES: usize = 2;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/home", get(home))
        .route("/api/about", get(about))
        .route("/api/courses", get(courses))
        .route("/api/courses/{slug}", get(course_page))
        .route("/api/course-slugs", get(course_slugs))
}

fn split_by_status(courses: Vec<Course>) -> (Vec<Course>, Vec<Course>) {
    courses
        .into_iter()
        .partition(|course| course.status == CourseStatus::Current)
}

async fn home(State(state): State<AppState>) -> Json<HomePage> {
    let (current_courses, mut past_courses) =
        split_by_status(state.services.courses.get_all().await);
    past_courses.truncate(HOME_PAST_COURSES);

    Json(HomePage {
        current_courses,
        past_courses,
    })
}

async fn about(State(state): State<AppState>) -> Json<AboutPage> {
    let (team_members, projects) = tokio::join!(
        state.services.team_members.get_all(),
        state.services.projects.get_all(),
    );

    Json(AboutPage {
        team_members,
        projects,
    })
}

async fn courses(State(state): State<AppState>) -> Json<CoursesPage> {
    let (courses, instructors) = tokio::join!(
        state.services.courses.get_all(),
        state.services.instructors.get_all(),
    );
    let (current, past) = split_by_status(courses);

    Json(CoursesPage {
        current,
        past,
        instructors,
    })
}

async fn course_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CoursePage>, AppError> {
    let course = state
        .services
        .courses
        .get_by_slug(&slug)
        .await
        .ok_or(AppError::NotFound)?;
    let details = state.services.course_details.get_by_course_id(&course.id).await;

    Ok(Json(CoursePage { course, details }))
}

async fn course_slugs(State(state): State<AppState>) -> Json<Vec<String>> {
    let slugs = state
        .services
        .courses
        .get_all()
        .await
        .into_iter()
        .map(|course| course.slug)
        .collect();
    Json(slugs)
}
