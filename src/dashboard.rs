//! Headless admin dashboard: list state for the four managed collections and
//! the add/edit/delete flow that drives the entity services.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::forms::{
    CourseDetailsForm, CourseForm, EntityForm, InstructorForm, ProjectForm, TeamMemberForm,
};
use crate::models::{Course, CourseDetails, CourseStatus, Entity, Instructor, Project, TeamMember};
use crate::services::{EntityService, Services};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Course,
    TeamMember,
    Project,
    Instructor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Idle,
    FormOpen {
        kind: EntityKind,
        /// Id of the record being edited; `None` when adding.
        editing: Option<String>,
    },
}

/// A submitted form, tagged with the collection it belongs to.
#[derive(Debug, Clone)]
pub enum DashboardForm {
    Course(CourseForm),
    TeamMember(TeamMemberForm),
    Project(ProjectForm),
    Instructor(InstructorForm),
}

impl DashboardForm {
    pub fn kind(&self) -> EntityKind {
        match self {
            DashboardForm::Course(_) => EntityKind::Course,
            DashboardForm::TeamMember(_) => EntityKind::TeamMember,
            DashboardForm::Project(_) => EntityKind::Project,
            DashboardForm::Instructor(_) => EntityKind::Instructor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub courses: usize,
    pub current_courses: usize,
    pub team_members: usize,
    pub projects: usize,
    pub instructors: usize,
    pub recent_courses: Vec<Course>,
}

pub struct Dashboard {
    services: Services,
    courses: Vec<Course>,
    team_members: Vec<TeamMember>,
    projects: Vec<Project>,
    instructors: Vec<Instructor>,
    mode: Mode,
    loading: bool,
}

impl Dashboard {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            courses: Vec::new(),
            team_members: Vec::new(),
            projects: Vec::new(),
            instructors: Vec::new(),
            mode: Mode::Idle,
            loading: false,
        }
    }

    /// Fetch all four collections concurrently and wait for every one.
    pub async fn load(&mut self) {
        self.loading = true;

        let (courses, team_members, projects, instructors) = tokio::join!(
            self.services.courses.get_all(),
            self.services.team_members.get_all(),
            self.services.projects.get_all(),
            self.services.instructors.get_all(),
        );

        self.courses = courses;
        self.team_members = team_members;
        self.projects = projects;
        self.instructors = instructors;
        self.loading = false;

        info!(
            "dashboard loaded: {} courses, {} team members, {} projects, {} instructors",
            self.courses.len(),
            self.team_members.len(),
            self.projects.len(),
            self.instructors.len()
        );
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn team_members(&self) -> &[TeamMember] {
        &self.team_members
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn instructors(&self) -> &[Instructor] {
        &self.instructors
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Course => self.courses.len(),
            EntityKind::TeamMember => self.team_members.len(),
            EntityKind::Project => self.projects.len(),
            EntityKind::Instructor => self.instructors.len(),
        }
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            courses: self.courses.len(),
            current_courses: self
                .courses
                .iter()
                .filter(|c| c.status == CourseStatus::Current)
                .count(),
            team_members: self.team_members.len(),
            projects: self.projects.len(),
            instructors: self.instructors.len(),
            recent_courses: self.courses.iter().take(3).cloned().collect(),
        }
    }

    pub fn open_add(&mut self, kind: EntityKind) {
        self.mode = Mode::FormOpen {
            kind,
            editing: None,
        };
    }

    /// Open the editor for a listed record and return its prefilled form.
    pub fn open_edit(&mut self, kind: EntityKind, id: &str) -> Option<DashboardForm> {
        let form = match kind {
            EntityKind::Course => prefill::<CourseForm>(&self.courses, id).map(DashboardForm::Course),
            EntityKind::TeamMember => {
                prefill::<TeamMemberForm>(&self.team_members, id).map(DashboardForm::TeamMember)
            }
            EntityKind::Project => prefill::<ProjectForm>(&self.projects, id).map(DashboardForm::Project),
            EntityKind::Instructor => {
                prefill::<InstructorForm>(&self.instructors, id).map(DashboardForm::Instructor)
            }
        };

        match form {
            Some(form) => {
                self.mode = Mode::FormOpen {
                    kind,
                    editing: Some(id.to_string()),
                };
                Some(form)
            }
            None => {
                warn!("cannot edit {:?} {}: not in the list", kind, id);
                None
            }
        }
    }

    pub fn cancel(&mut self) {
        self.mode = Mode::Idle;
    }

    /// Create or update depending on how the form was opened. On success the
    /// list is updated (new records first, edits in place) and the dashboard
    /// returns to idle; on failure nothing changes.
    pub async fn save(&mut self, form: DashboardForm) -> bool {
        let editing = match &self.mode {
            Mode::FormOpen { kind, editing } if *kind == form.kind() => editing.clone(),
            Mode::FormOpen { kind, .. } => {
                warn!("form for {:?} submitted while {:?} form is open", form.kind(), kind);
                return false;
            }
            Mode::Idle => {
                warn!("form for {:?} submitted with no form open", form.kind());
                return false;
            }
        };
        let editing = editing.as_deref();

        let saved = match &form {
            DashboardForm::Course(f) => {
                commit(&self.services.courses, &mut self.courses, editing, f).await
            }
            DashboardForm::TeamMember(f) => {
                commit(&self.services.team_members, &mut self.team_members, editing, f).await
            }
            DashboardForm::Project(f) => {
                commit(&self.services.projects, &mut self.projects, editing, f).await
            }
            DashboardForm::Instructor(f) => {
                commit(&self.services.instructors, &mut self.instructors, editing, f).await
            }
        };

        if saved {
            self.mode = Mode::Idle;
        }
        saved
    }

    pub async fn delete(&mut self, kind: EntityKind, id: &str) -> bool {
        match kind {
            EntityKind::Course => remove(&self.services.courses, &mut self.courses, id).await,
            EntityKind::TeamMember => {
                remove(&self.services.team_members, &mut self.team_members, id).await
            }
            EntityKind::Project => remove(&self.services.projects, &mut self.projects, id).await,
            EntityKind::Instructor => {
                remove(&self.services.instructors, &mut self.instructors, id).await
            }
        }
    }
}

fn prefill<F: EntityForm>(list: &[F::Entity], id: &str) -> Option<F> {
    list.iter().find(|e| e.id() == id).map(F::from_existing)
}

async fn commit<F: EntityForm>(
    service: &EntityService<F::Entity>,
    list: &mut Vec<F::Entity>,
    editing: Option<&str>,
    form: &F,
) -> bool {
    if let Err(e) = form.validate() {
        warn!("rejected {} form: {}", <F::Entity as Entity>::LABEL, e);
        return false;
    }

    match editing {
        Some(id) => match service.update(id, form.to_patch()).await {
            Some(updated) => {
                match list.iter_mut().find(|e| e.id() == id) {
                    Some(slot) => *slot = updated,
                    None => list.insert(0, updated),
                }
                true
            }
            None => {
                error!("Failed to update {} {}", <F::Entity as Entity>::LABEL, id);
                false
            }
        },
        None => match service.create(form.to_new()).await {
            Some(created) => {
                list.insert(0, created);
                true
            }
            None => {
                error!("Failed to create {}", <F::Entity as Entity>::LABEL);
                false
            }
        },
    }
}

async fn remove<E: crate::db::repository::Table>(
    service: &EntityService<E>,
    list: &mut Vec<E>,
    id: &str,
) -> bool {
    if service.delete(id).await {
        list.retain(|e| e.id() != id);
        true
    } else {
        error!("Failed to delete {} {}", E::LABEL, id);
        false
    }
}

/// The per-course details editor: loads the course and its optional details
/// together, then saves by updating existing details or creating new ones.
pub struct CourseDetailsEditor {
    services: Services,
    course_id: String,
    course: Option<Course>,
    details: Option<CourseDetails>,
}

impl CourseDetailsEditor {
    pub async fn load(services: Services, course_id: &str) -> Self {
        let (course, details) = tokio::join!(
            services.courses.get_by_id(course_id),
            services.course_details.get_by_course_id(course_id),
        );

        Self {
            services,
            course_id: course_id.to_string(),
            course,
            details,
        }
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    pub fn details(&self) -> Option<&CourseDetails> {
        self.details.as_ref()
    }

    pub fn form(&self) -> CourseDetailsForm {
        match &self.details {
            Some(details) => CourseDetailsForm::from_existing(details),
            None => CourseDetailsForm::for_course(self.course_id.clone()),
        }
    }

    pub async fn save(&mut self, form: &CourseDetailsForm) -> bool {
        if self.course.is_none() {
            warn!("no course {} to attach details to", self.course_id);
            return false;
        }
        if let Err(e) = form.validate() {
            warn!("rejected course details form: {}", e);
            return false;
        }

        let result = match &self.details {
            Some(existing) => {
                self.services
                    .course_details
                    .update(&existing.id, form.to_patch())
                    .await
            }
            None => {
                let mut new = form.to_new();
                new.course_id = self.course_id.clone();
                self.services.course_details.create(new).await
            }
        };

        match result {
            Some(details) => {
                info!("course details saved for {}", self.course_id);
                self.details = Some(details);
                true
            }
            None => {
                error!("Failed to save course details for {}", self.course_id);
                false
            }
        }
    }
}
