use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Instructor {
    pub id: String,
    pub name: String,
    pub title: String,
    pub department: String,
    pub image: String,
    pub bio: String,
    #[sqlx(json)]
    pub expertise: Vec<String>,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInstructor {
    pub name: String,
    pub title: String,
    pub department: String,
    pub image: String,
    pub bio: String,
    #[serde(default)]
    pub expertise: Vec<String>,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstructorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expertise: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Entity for Instructor {
    type New = NewInstructor;
    type Patch = InstructorPatch;

    const COLLECTION: &'static str = "instructors";
    const LABEL: &'static str = "instructor";

    fn build(id: String, now: String, new: NewInstructor) -> Self {
        Self {
            id,
            name: new.name,
            title: new.title,
            department: new.department,
            image: new.image,
            bio: new.bio,
            expertise: new.expertise,
            email: new.email,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: InstructorPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(department) = patch.department {
            self.department = department;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(bio) = patch.bio {
            self.bio = bio;
        }
        if let Some(expertise) = patch.expertise {
            self.expertise = expertise;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
    }

    fn touch(&mut self, now: String) {
        self.updated_at = now;
    }

    fn id(&self) -> &str {
        &self.id
    }
}
