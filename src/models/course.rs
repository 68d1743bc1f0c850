use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CourseStatus {
    #[default]
    Current,
    Past,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub year: String,
    pub semester: String,
    pub thumbnail: String,
    pub slug: String,
    pub status: CourseStatus,
    pub duration: String,
    pub enrolled: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub year: String,
    pub semester: String,
    pub thumbnail: String,
    pub slug: String,
    #[serde(default)]
    pub status: CourseStatus,
    pub duration: String,
    #[serde(default)]
    pub enrolled: i64,
}

/// Slug is fixed at creation; public routes are keyed on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoursePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CourseStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrolled: Option<i64>,
}

impl Entity for Course {
    type New = NewCourse;
    type Patch = CoursePatch;

    const COLLECTION: &'static str = "courses";
    const LABEL: &'static str = "course";

    fn build(id: String, now: String, new: NewCourse) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            year: new.year,
            semester: new.semester,
            thumbnail: new.thumbnail,
            slug: new.slug,
            status: new.status,
            duration: new.duration,
            enrolled: new.enrolled,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: CoursePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(semester) = patch.semester {
            self.semester = semester;
        }
        if let Some(thumbnail) = patch.thumbnail {
            self.thumbnail = thumbnail;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(enrolled) = patch.enrolled {
            self.enrolled = enrolled;
        }
    }

    fn touch(&mut self, now: String) {
        self.updated_at = now;
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllabusItem {
    pub week: u32,
    pub topic: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CourseDetails {
    pub id: String,
    pub course_id: String,
    pub level: String,
    pub instructor: String,
    pub max_capacity: i64,
    #[sqlx(json)]
    pub prerequisites: Vec<String>,
    #[sqlx(json)]
    pub learning_objectives: Vec<String>,
    #[sqlx(json)]
    pub syllabus: Vec<SyllabusItem>,
    #[sqlx(json)]
    pub resources: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCourseDetails {
    pub course_id: String,
    pub level: String,
    pub instructor: String,
    #[serde(default)]
    pub max_capacity: i64,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub syllabus: Vec<SyllabusItem>,
    #[serde(default)]
    pub resources: Vec<String>,
}

/// `course_id` is not patchable: details stay attached to their course.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseDetailsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_objectives: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syllabus: Option<Vec<SyllabusItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
}

impl Entity for CourseDetails {
    type New = NewCourseDetails;
    type Patch = CourseDetailsPatch;

    const COLLECTION: &'static str = "course-details";
    const LABEL: &'static str = "course details";

    fn build(id: String, now: String, new: NewCourseDetails) -> Self {
        Self {
            id,
            course_id: new.course_id,
            level: new.level,
            instructor: new.instructor,
            max_capacity: new.max_capacity,
            prerequisites: new.prerequisites,
            learning_objectives: new.learning_objectives,
            syllabus: new.syllabus,
            resources: new.resources,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: CourseDetailsPatch) {
        if let Some(level) = patch.level {
            self.level = level;
        }
        if let Some(instructor) = patch.instructor {
            self.instructor = instructor;
        }
        if let Some(max_capacity) = patch.max_capacity {
            self.max_capacity = max_capacity;
        }
        if let Some(prerequisites) = patch.prerequisites {
            self.prerequisites = prerequisites;
        }
        if let Some(learning_objectives) = patch.learning_objectives {
            self.learning_objectives = learning_objectives;
        }
        if let Some(syllabus) = patch.syllabus {
            self.syllabus = syllabus;
        }
        if let Some(resources) = patch.resources {
            self.resources = resources;
        }
    }

    fn touch(&mut self, now: String) {
        self.updated_at = now;
    }

    fn id(&self) -> &str {
        &self.id
    }
}
