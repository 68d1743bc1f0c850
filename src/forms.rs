//! Form models behind the admin editors.
//!
//! Each form mirrors one entity's editable fields, can be prefilled from an
//! existing record, and turns into either a create payload or a full patch.
//! The only validation is that required text fields are not blank.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::repository::Table;
use crate::models::{
    Course, CourseDetails, CourseDetailsPatch, CoursePatch, CourseStatus, Instructor,
    InstructorPatch, NewCourse, NewCourseDetails, NewInstructor, NewProject, NewTeamMember,
    Project, ProjectPatch, SyllabusItem, TeamMember, TeamMemberPatch,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),
}

/// Ordered list with a pending draft entry. Duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEditor<T> {
    items: Vec<T>,
    draft: String,
}

impl<T> Default for ListEditor<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> ListEditor<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            draft: String::new(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Out-of-range indexes are ignored.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, value: impl Into<String>) {
        self.draft = value.into();
    }
}

impl ListEditor<String> {
    /// Append the trimmed draft and clear it. Blank drafts are dropped.
    pub fn add(&mut self) -> bool {
        let value = self.draft.trim().to_string();
        self.draft.clear();
        if value.is_empty() {
            return false;
        }
        self.items.push(value);
        true
    }
}

/// String list fields, addressed by name across all forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListField {
    Prerequisites,
    LearningObjectives,
    Resources,
    Technologies,
    Members,
    Expertise,
}

/// Form state for one entity type.
pub trait EntityForm: Sized {
    type Entity: Table;

    fn from_existing(record: &Self::Entity) -> Self;
    fn validate(&self) -> Result<(), FormError>;
    fn to_new(&self) -> <Self::Entity as crate::models::Entity>::New;
    fn to_patch(&self) -> <Self::Entity as crate::models::Entity>::Patch;

    fn list_mut(&mut self, _field: ListField) -> Option<&mut ListEditor<String>> {
        None
    }
}

fn required(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::Required(field))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseForm {
    pub title: String,
    pub description: String,
    pub year: String,
    pub semester: String,
    pub thumbnail: String,
    pub slug: String,
    pub status: CourseStatus,
    pub duration: String,
    pub enrolled: i64,
}

impl EntityForm for CourseForm {
    type Entity = Course;

    fn from_existing(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            description: course.description.clone(),
            year: course.year.clone(),
            semester: course.semester.clone(),
            thumbnail: course.thumbnail.clone(),
            slug: course.slug.clone(),
            status: course.status,
            duration: course.duration.clone(),
            enrolled: course.enrolled,
        }
    }

    fn validate(&self) -> Result<(), FormError> {
        required(&self.title, "title")?;
        required(&self.description, "description")?;
        required(&self.year, "year")?;
        required(&self.thumbnail, "thumbnail")?;
        required(&self.slug, "slug")?;
        required(&self.duration, "duration")
    }

    fn to_new(&self) -> NewCourse {
        NewCourse {
            title: self.title.clone(),
            description: self.description.clone(),
            year: self.year.clone(),
            semester: self.semester.clone(),
            thumbnail: self.thumbnail.clone(),
            slug: self.slug.trim().to_string(),
            status: self.status,
            duration: self.duration.clone(),
            enrolled: self.enrolled,
        }
    }

    fn to_patch(&self) -> CoursePatch {
        CoursePatch {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            year: Some(self.year.clone()),
            semester: Some(self.semester.clone()),
            thumbnail: Some(self.thumbnail.clone()),
            status: Some(self.status),
            duration: Some(self.duration.clone()),
            enrolled: Some(self.enrolled),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyllabusDraft {
    pub week: u32,
    pub topic: String,
    pub description: String,
}

impl Default for SyllabusDraft {
    fn default() -> Self {
        Self {
            week: 1,
            topic: String::new(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseDetailsForm {
    pub course_id: String,
    pub level: String,
    pub instructor: String,
    pub max_capacity: i64,
    pub prerequisites: ListEditor<String>,
    pub learning_objectives: ListEditor<String>,
    pub resources: ListEditor<String>,
    pub syllabus: ListEditor<SyllabusItem>,
    pub syllabus_draft: SyllabusDraft,
}

impl CourseDetailsForm {
    pub fn for_course(course_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            ..Default::default()
        }
    }

    /// Append the syllabus draft when both topic and description are filled,
    /// then start a fresh draft for the following week.
    pub fn add_syllabus_item(&mut self) -> bool {
        let draft = &self.syllabus_draft;
        if draft.topic.trim().is_empty() || draft.description.trim().is_empty() {
            return false;
        }

        self.syllabus.push(SyllabusItem {
            week: draft.week,
            topic: draft.topic.trim().to_string(),
            description: draft.description.trim().to_string(),
        });
        self.syllabus_draft = SyllabusDraft {
            week: self.syllabus.len() as u32 + 1,
            ..Default::default()
        };
        true
    }
}

impl EntityForm for CourseDetailsForm {
    type Entity = CourseDetails;

    fn from_existing(details: &CourseDetails) -> Self {
        Self {
            course_id: details.course_id.clone(),
            level: details.level.clone(),
            instructor: details.instructor.clone(),
            max_capacity: details.max_capacity,
            prerequisites: ListEditor::new(details.prerequisites.clone()),
            learning_objectives: ListEditor::new(details.learning_objectives.clone()),
            resources: ListEditor::new(details.resources.clone()),
            syllabus: ListEditor::new(details.syllabus.clone()),
            syllabus_draft: SyllabusDraft {
                week: details.syllabus.len() as u32 + 1,
                ..Default::default()
            },
        }
    }

    fn validate(&self) -> Result<(), FormError> {
        required(&self.course_id, "course_id")?;
        required(&self.level, "level")?;
        required(&self.instructor, "instructor")
    }

    fn to_new(&self) -> NewCourseDetails {
        NewCourseDetails {
            course_id: self.course_id.clone(),
            level: self.level.clone(),
            instructor: self.instructor.clone(),
            max_capacity: self.max_capacity,
            prerequisites: self.prerequisites.items().to_vec(),
            learning_objectives: self.learning_objectives.items().to_vec(),
            syllabus: self.syllabus.items().to_vec(),
            resources: self.resources.items().to_vec(),
        }
    }

    fn to_patch(&self) -> CourseDetailsPatch {
        CourseDetailsPatch {
            level: Some(self.level.clone()),
            instructor: Some(self.instructor.clone()),
            max_capacity: Some(self.max_capacity),
            prerequisites: Some(self.prerequisites.items().to_vec()),
            learning_objectives: Some(self.learning_objectives.items().to_vec()),
            syllabus: Some(self.syllabus.items().to_vec()),
            resources: Some(self.resources.items().to_vec()),
        }
    }

    fn list_mut(&mut self, field: ListField) -> Option<&mut ListEditor<String>> {
        match field {
            ListField::Prerequisites => Some(&mut self.prerequisites),
            ListField::LearningObjectives => Some(&mut self.learning_objectives),
            ListField::Resources => Some(&mut self.resources),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamMemberForm {
    pub name: String,
    pub role: String,
    pub image: String,
    pub bio: String,
}

impl EntityForm for TeamMemberForm {
    type Entity = TeamMember;

    fn from_existing(member: &TeamMember) -> Self {
        Self {
            name: member.name.clone(),
            role: member.role.clone(),
            image: member.image.clone(),
            bio: member.bio.clone(),
        }
    }

    fn validate(&self) -> Result<(), FormError> {
        required(&self.name, "name")?;
        required(&self.role, "role")?;
        required(&self.image, "image")?;
        required(&self.bio, "bio")
    }

    fn to_new(&self) -> NewTeamMember {
        NewTeamMember {
            name: self.name.clone(),
            role: self.role.clone(),
            image: self.image.clone(),
            bio: self.bio.clone(),
        }
    }

    fn to_patch(&self) -> TeamMemberPatch {
        TeamMemberPatch {
            name: Some(self.name.clone()),
            role: Some(self.role.clone()),
            image: Some(self.image.clone()),
            bio: Some(self.bio.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub image: String,
    pub technologies: ListEditor<String>,
    pub course: String,
    pub members: ListEditor<String>,
}

impl EntityForm for ProjectForm {
    type Entity = Project;

    fn from_existing(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            image: project.image.clone(),
            technologies: ListEditor::new(project.technologies.clone()),
            course: project.course.clone(),
            members: ListEditor::new(project.members.clone()),
        }
    }

    fn validate(&self) -> Result<(), FormError> {
        required(&self.title, "title")?;
        required(&self.description, "description")?;
        required(&self.image, "image")?;
        required(&self.course, "course")
    }

    fn to_new(&self) -> NewProject {
        NewProject {
            title: self.title.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            technologies: self.technologies.items().to_vec(),
            course: self.course.clone(),
            members: self.members.items().to_vec(),
        }
    }

    fn to_patch(&self) -> ProjectPatch {
        ProjectPatch {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            image: Some(self.image.clone()),
            technologies: Some(self.technologies.items().to_vec()),
            course: Some(self.course.clone()),
            members: Some(self.members.items().to_vec()),
        }
    }

    fn list_mut(&mut self, field: ListField) -> Option<&mut ListEditor<String>> {
        match field {
            ListField::Technologies => Some(&mut self.technologies),
            ListField::Members => Some(&mut self.members),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructorForm {
    pub name: String,
    pub title: String,
    pub department: String,
    pub image: String,
    pub bio: String,
    pub expertise: ListEditor<String>,
    pub email: String,
}

impl EntityForm for InstructorForm {
    type Entity = Instructor;

    fn from_existing(instructor: &Instructor) -> Self {
        Self {
            name: instructor.name.clone(),
            title: instructor.title.clone(),
            department: instructor.department.clone(),
            image: instructor.image.clone(),
            bio: instructor.bio.clone(),
            expertise: ListEditor::new(instructor.expertise.clone()),
            email: instructor.email.clone(),
        }
    }

    fn validate(&self) -> Result<(), FormError> {
        required(&self.name, "name")?;
        required(&self.title, "title")?;
        required(&self.department, "department")?;
        required(&self.image, "image")?;
        required(&self.bio, "bio")?;
        required(&self.email, "email")
    }

    fn to_new(&self) -> NewInstructor {
        NewInstructor {
            name: self.name.clone(),
            title: self.title.clone(),
            department: self.department.clone(),
            image: self.image.clone(),
            bio: self.bio.clone(),
            expertise: self.expertise.items().to_vec(),
            email: self.email.clone(),
        }
    }

    fn to_patch(&self) -> InstructorPatch {
        InstructorPatch {
            name: Some(self.name.clone()),
            title: Some(self.title.clone()),
            department: Some(self.department.clone()),
            image: Some(self.image.clone()),
            bio: Some(self.bio.clone()),
            expertise: Some(self.expertise.items().to_vec()),
            email: Some(self.email.clone()),
        }
    }

    fn list_mut(&mut self, field: ListField) -> Option<&mut ListEditor<String>> {
        match field {
            ListField::Expertise => Some(&mut self.expertise),
            _ => None,
        }
    }
}
