use serde::{Deserialize, Serialize};

use super::{Course, CourseDetails, Instructor, Project, TeamMember};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomePage {
    pub current_courses: Vec<Course>,
    pub past_courses: Vec<Course>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoursesPage {
    pub current: Vec<Course>,
    pub past: Vec<Course>,
    pub instructors: Vec<Instructor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoursePage {
    pub course: Course,
    pub details: Option<CourseDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutPage {
    pub team_members: Vec<TeamMember>,
    pub projects: Vec<Project>,
}
