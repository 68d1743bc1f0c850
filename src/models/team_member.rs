use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub image: String,
    pub bio: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTeamMember {
    pub name: String,
    pub role: String,
    pub image: String,
    pub bio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMemberPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl Entity for TeamMember {
    type New = NewTeamMember;
    type Patch = TeamMemberPatch;

    const COLLECTION: &'static str = "team-members";
    const LABEL: &'static str = "team member";

    fn build(id: String, now: String, new: NewTeamMember) -> Self {
        Self {
            id,
            name: new.name,
            role: new.role,
            image: new.image,
            bio: new.bio,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: TeamMemberPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(bio) = patch.bio {
            self.bio = bio;
        }
    }

    fn touch(&mut self, now: String) {
        self.updated_at = now;
    }

    fn id(&self) -> &str {
        &self.id
    }
}
