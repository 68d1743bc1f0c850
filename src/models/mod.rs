pub mod course;
pub mod instructor;
pub mod page;
pub mod project;
pub mod team_member;

use std::fmt::Debug;

use chrono::{SecondsFormat, Utc};
use serde::{Serialize, de::DeserializeOwned};

pub use course::{
    Course, CourseDetails, CourseDetailsPatch, CoursePatch, CourseStatus, NewCourse,
    NewCourseDetails, SyllabusItem,
};
pub use instructor::{Instructor, InstructorPatch, NewInstructor};
pub use page::{AboutPage, CoursePage, CoursesPage, HomePage};
pub use project::{NewProject, Project, ProjectPatch};
pub use team_member::{NewTeamMember, TeamMember, TeamMemberPatch};

/// A record managed through the admin panel.
///
/// `New` is the payload accepted on create (everything except the generated
/// id and timestamps). `Patch` carries optional fields; `None` leaves the
/// stored value untouched.
pub trait Entity: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + Unpin + 'static {
    type New: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static;
    type Patch: Serialize + DeserializeOwned + Clone + Debug + Default + Send + Sync + 'static;

    /// Path segment under `/api/admin`.
    const COLLECTION: &'static str;
    /// Human readable name used in log lines.
    const LABEL: &'static str;

    fn build(id: String, now: String, new: Self::New) -> Self;
    fn apply(&mut self, patch: Self::Patch);
    fn touch(&mut self, now: String);
    fn id(&self) -> &str;
}

/// RFC 3339 with fixed microsecond precision so stored timestamps sort lexically.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
