mod test_support;

use std::sync::Arc;

use branch_portal::client::AdminClient;
use branch_portal::dashboard::{CourseDetailsEditor, Dashboard, DashboardForm, EntityKind, Mode};
use branch_portal::forms::{CourseForm, ListField, EntityForm, TeamMemberForm};
use branch_portal::models::CourseStatus;
use branch_portal::routes::router;
use branch_portal::services::{Services, Transport};
use test_support::{ADMIN_EMAIL, ADMIN_PASSWORD, test_state};
use tokio::net::TcpListener;

/// Serve a fresh in-memory app on an ephemeral port and return its base URL.
async fn spawn_server() -> String {
    let app = router(test_state().await);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

async fn client_services(base_url: &str) -> Services {
    let client = AdminClient::login(base_url, ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("login over http");
    Services::new(Transport::Client(Arc::new(client)))
}

fn course_form(slug: &str) -> CourseForm {
    CourseForm {
        title: "Embedded Systems".to_string(),
        description: "Microcontrollers from scratch".to_string(),
        year: "2025".to_string(),
        semester: "Spring".to_string(),
        thumbnail: "/embedded.jpg".to_string(),
        slug: slug.to_string(),
        status: CourseStatus::Current,
        duration: "10 weeks".to_string(),
        enrolled: 18,
    }
}

#[tokio::test]
async fn login_with_bad_password_fails() {
    let base_url = spawn_server().await;
    let result = AdminClient::login(&base_url, ADMIN_EMAIL, "wrong").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn dashboard_drives_a_remote_server() {
    let base_url = spawn_server().await;
    let services = client_services(&base_url).await;
    assert_eq!(services.courses.transport().name(), "client");

    let mut dashboard = Dashboard::new(services.clone());
    dashboard.load().await;
    assert!(dashboard.courses().is_empty());

    dashboard.open_add(EntityKind::Course);
    assert!(dashboard.save(DashboardForm::Course(course_form("embedded"))).await);
    assert_eq!(dashboard.mode(), &Mode::Idle);
    let id = dashboard.courses()[0].id.clone();

    let fetched = services.courses.get_by_slug("embedded").await.expect("course by slug");
    assert_eq!(fetched.id, id);

    // Same slug again is refused by the server and the form stays open.
    dashboard.open_add(EntityKind::Course);
    assert!(!dashboard.save(DashboardForm::Course(course_form("embedded"))).await);
    assert!(matches!(dashboard.mode(), Mode::FormOpen { editing: None, .. }));
    assert_eq!(dashboard.courses().len(), 1);
    dashboard.cancel();

    let Some(DashboardForm::Course(mut form)) = dashboard.open_edit(EntityKind::Course, &id) else {
        panic!("expected a course form");
    };
    form.status = CourseStatus::Past;
    assert!(dashboard.save(DashboardForm::Course(form)).await);
    assert_eq!(dashboard.courses()[0].status, CourseStatus::Past);

    assert!(dashboard.delete(EntityKind::Course, &id).await);
    assert!(dashboard.courses().is_empty());
    assert!(services.courses.get_by_id(&id).await.is_none());
    assert!(!services.courses.delete(&id).await);
}

#[tokio::test]
async fn team_member_edit_replaces_in_place() {
    let base_url = spawn_server().await;
    let services = client_services(&base_url).await;
    let mut dashboard = Dashboard::new(services);

    for name in ["Ana", "Sam"] {
        dashboard.open_add(EntityKind::TeamMember);
        let saved = dashboard
            .save(DashboardForm::TeamMember(TeamMemberForm {
                name: name.to_string(),
                role: "Officer".to_string(),
                image: format!("/{name}.jpg"),
                bio: format!("{name} serves on the board"),
            }))
            .await;
        assert!(saved);
    }
    let names: Vec<_> = dashboard.team_members().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Sam", "Ana"]);

    let ana = dashboard.team_members()[1].id.clone();
    let Some(DashboardForm::TeamMember(mut form)) = dashboard.open_edit(EntityKind::TeamMember, &ana) else {
        panic!("expected a team member form");
    };
    form.role = "Chair".to_string();
    assert!(dashboard.save(DashboardForm::TeamMember(form)).await);

    assert_eq!(dashboard.team_members()[1].role, "Chair");
    assert_eq!(dashboard.team_members().len(), 2);

    dashboard.load().await;
    assert_eq!(dashboard.team_members()[1].role, "Chair");
}

#[tokio::test]
async fn details_editor_creates_then_updates() {
    let base_url = spawn_server().await;
    let services = client_services(&base_url).await;
    let course = services
        .courses
        .create(course_form("embedded").to_new())
        .await
        .expect("course created");

    let mut editor = CourseDetailsEditor::load(services.clone(), &course.id).await;
    assert!(editor.details().is_none());

    let mut form = editor.form();
    form.level = "Advanced".to_string();
    form.instructor = "Dr. Okafor".to_string();
    let prerequisites = form.list_mut(ListField::Prerequisites).unwrap();
    prerequisites.set_draft("C programming");
    assert!(prerequisites.add());
    assert!(editor.save(&form).await);

    let mut editor = CourseDetailsEditor::load(services.clone(), &course.id).await;
    let details_id = editor.details().expect("details exist").id.clone();
    let mut form = editor.form();
    assert_eq!(form.prerequisites.items(), ["C programming"]);
    form.max_capacity = 40;
    assert!(editor.save(&form).await);

    let details = services
        .course_details
        .get_by_course_id(&course.id)
        .await
        .expect("details by course");
    assert_eq!(details.id, details_id);
    assert_eq!(details.max_capacity, 40);
}

#[tokio::test]
async fn details_editor_refuses_unknown_course() {
    let base_url = spawn_server().await;
    let services = client_services(&base_url).await;

    let mut editor = CourseDetailsEditor::load(services, "missing").await;
    assert!(editor.course().is_none());

    let mut form = editor.form();
    form.level = "Beginner".to_string();
    form.instructor = "Someone".to_string();
    assert!(!editor.save(&form).await);
}

#[tokio::test]
async fn slugs_with_reserved_characters_round_trip() {
    let base_url = spawn_server().await;
    let services = client_services(&base_url).await;

    let slug = "c++/intro?part=1#top";
    let course = services
        .courses
        .create(course_form(slug).to_new())
        .await
        .expect("course created");

    let fetched = services.courses.get_by_slug(slug).await.expect("course by slug");
    assert_eq!(fetched.id, course.id);
    assert!(services.courses.get_by_slug("c++").await.is_none());

    let weird_id = "missing/../courses";
    assert!(services.courses.get_by_id(weird_id).await.is_none());
    assert!(!services.courses.delete(weird_id).await);
    assert_eq!(services.courses.get_all().await.len(), 1);
}
