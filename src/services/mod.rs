pub mod entity_service;
pub mod transport;

pub use entity_service::EntityService;
pub use transport::Transport;

use crate::models::{Course, CourseDetails, Instructor, Project, TeamMember};

pub type CourseService = EntityService<Course>;
pub type CourseDetailsService = EntityService<CourseDetails>;
pub type TeamMemberService = EntityService<TeamMember>;
pub type ProjectService = EntityService<Project>;
pub type InstructorService = EntityService<Instructor>;

/// One service per entity, all sharing the same transport.
#[derive(Clone)]
pub struct Services {
    pub courses: CourseService,
    pub course_details: CourseDetailsService,
    pub team_members: TeamMemberService,
    pub projects: ProjectService,
    pub instructors: InstructorService,
}

impl Services {
    pub fn new(transport: Transport) -> Self {
        Self {
            courses: EntityService::new(transport.clone()),
            course_details: EntityService::new(transport.clone()),
            team_members: EntityService::new(transport.clone()),
            projects: EntityService::new(transport.clone()),
            instructors: EntityService::new(transport),
        }
    }
}
