use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{FromRow, SqlitePool};

use crate::models::{
    Course, CourseDetails, Entity, Instructor, Project, TeamMember, new_id, timestamp,
};

/// Storage mapping for an [`Entity`]: table name, column list and the two
/// statements that differ per table.
#[async_trait]
pub trait Table: Entity + for<'r> FromRow<'r, SqliteRow> {
    const TABLE: &'static str;
    const COLUMNS: &'static str;

    async fn insert_row(db: &SqlitePool, record: &Self) -> Result<(), sqlx::Error>;
    async fn update_row(db: &SqlitePool, record: &Self) -> Result<(), sqlx::Error>;
}

/// Newest first. `rowid` breaks ties between rows created in the same microsecond.
pub async fn fetch_all<T: Table>(db: &SqlitePool) -> Result<Vec<T>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY created_at DESC, rowid DESC",
        T::COLUMNS,
        T::TABLE
    );
    sqlx::query_as::<_, T>(&sql).fetch_all(db).await
}

pub async fn find_by_id<T: Table>(db: &SqlitePool, id: &str) -> Result<Option<T>, sqlx::Error> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?", T::COLUMNS, T::TABLE);
    sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(db).await
}

pub async fn insert<T: Table>(db: &SqlitePool, new: T::New) -> Result<T, sqlx::Error> {
    let record = T::build(new_id(), timestamp(), new);
    T::insert_row(db, &record).await?;
    Ok(record)
}

pub async fn update<T: Table>(
    db: &SqlitePool,
    id: &str,
    patch: T::Patch,
) -> Result<Option<T>, sqlx::Error> {
    let mut current = match find_by_id::<T>(db, id).await? {
        Some(record) => record,
        None => return Ok(None),
    };

    current.apply(patch);
    current.touch(timestamp());
    T::update_row(db, &current).await?;

    Ok(Some(current))
}

pub async fn delete<T: Table>(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let sql = format!("DELETE FROM {} WHERE id = ?", T::TABLE);
    let result = sqlx::query(&sql)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn find_course_by_slug(db: &SqlitePool, slug: &str) -> Result<Option<Course>, sqlx::Error> {
    let sql = format!("SELECT {} FROM courses WHERE slug = ?", Course::COLUMNS);
    sqlx::query_as::<_, Course>(&sql)
        .bind(slug)
        .fetch_optional(db)
        .await
}

pub async fn find_details_by_course_id(
    db: &SqlitePool,
    course_id: &str,
) -> Result<Option<CourseDetails>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM course_details WHERE course_id = ?",
        CourseDetails::COLUMNS
    );
    sqlx::query_as::<_, CourseDetails>(&sql)
        .bind(course_id)
        .fetch_optional(db)
        .await
}

#[async_trait]
impl Table for Course {
    const TABLE: &'static str = "courses";
    const COLUMNS: &'static str = "id, title, description, year, semester, thumbnail, slug, status, duration, enrolled, created_at, updated_at";

    async fn insert_row(db: &SqlitePool, course: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO courses
                (id, title, description, year, semester, thumbnail, slug,
                status, duration, enrolled, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&course.id)
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.year)
        .bind(&course.semester)
        .bind(&course.thumbnail)
        .bind(&course.slug)
        .bind(course.status)
        .bind(&course.duration)
        .bind(course.enrolled)
        .bind(&course.created_at)
        .bind(&course.updated_at)
        .execute(db)
        .await?;
        Ok(())
    }

    async fn update_row(db: &SqlitePool, course: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE courses
            SET title = ?1,
                description = ?2,
                year = ?3,
                semester = ?4,
                thumbnail = ?5,
                status = ?6,
                duration = ?7,
                enrolled = ?8,
                updated_at = ?9
            WHERE id = ?10
            "#,
        )
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.year)
        .bind(&course.semester)
        .bind(&course.thumbnail)
        .bind(course.status)
        .bind(&course.duration)
        .bind(course.enrolled)
        .bind(&course.updated_at)
        .bind(&course.id)
        .execute(db)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Table for CourseDetails {
    const TABLE: &'static str = "course_details";
    const COLUMNS: &'static str = "id, course_id, level, instructor, max_capacity, prerequisites, learning_objectives, syllabus, resources, created_at, updated_at";

    async fn insert_row(db: &SqlitePool, details: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO course_details
                (id, course_id, level, instructor, max_capacity, prerequisites,
                learning_objectives, syllabus, resources, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&details.id)
        .bind(&details.course_id)
        .bind(&details.level)
        .bind(&details.instructor)
        .bind(details.max_capacity)
        .bind(Json(&details.prerequisites))
        .bind(Json(&details.learning_objectives))
        .bind(Json(&details.syllabus))
        .bind(Json(&details.resources))
        .bind(&details.created_at)
        .bind(&details.updated_at)
        .execute(db)
        .await?;
        Ok(())
    }

    async fn update_row(db: &SqlitePool, details: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE course_details
            SET level = ?1,
                instructor = ?2,
                max_capacity = ?3,
                prerequisites = ?4,
                learning_objectives = ?5,
                syllabus = ?6,
                resources = ?7,
                updated_at = ?8
            WHERE id = ?9
            "#,
        )
        .bind(&details.level)
        .bind(&details.instructor)
        .bind(details.max_capacity)
        .bind(Json(&details.prerequisites))
        .bind(Json(&details.learning_objectives))
        .bind(Json(&details.syllabus))
        .bind(Json(&details.resources))
        .bind(&details.updated_at)
        .bind(&details.id)
        .execute(db)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Table for TeamMember {
    const TABLE: &'static str = "team_members";
    const COLUMNS: &'static str = "id, name, role, image, bio, created_at, updated_at";

    async fn insert_row(db: &SqlitePool, member: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO team_members (id, name, role, image, bio, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&member.id)
        .bind(&member.name)
        .bind(&member.role)
        .bind(&member.image)
        .bind(&member.bio)
        .bind(&member.created_at)
        .bind(&member.updated_at)
        .execute(db)
        .await?;
        Ok(())
    }

    async fn update_row(db: &SqlitePool, member: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE team_members
            SET name = ?1, role = ?2, image = ?3, bio = ?4, updated_at = ?5
            WHERE id = ?6
            "#,
        )
        .bind(&member.name)
        .bind(&member.role)
        .bind(&member.image)
        .bind(&member.bio)
        .bind(&member.updated_at)
        .bind(&member.id)
        .execute(db)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Table for Project {
    const TABLE: &'static str = "projects";
    const COLUMNS: &'static str = "id, title, description, image, technologies, course, members, created_at, updated_at";

    async fn insert_row(db: &SqlitePool, project: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO projects
                (id, title, description, image, technologies, course, members,
                created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&project.id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.image)
        .bind(Json(&project.technologies))
        .bind(&project.course)
        .bind(Json(&project.members))
        .bind(&project.created_at)
        .bind(&project.updated_at)
        .execute(db)
        .await?;
        Ok(())
    }

    async fn update_row(db: &SqlitePool, project: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE projects
            SET title = ?1,
                description = ?2,
                image = ?3,
                technologies = ?4,
                course = ?5,
                members = ?6,
                updated_at = ?7
            WHERE id = ?8
            "#,
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.image)
        .bind(Json(&project.technologies))
        .bind(&project.course)
        .bind(Json(&project.members))
        .bind(&project.updated_at)
        .bind(&project.id)
        .execute(db)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Table for Instructor {
    const TABLE: &'static str = "instructors";
    const COLUMNS: &'static str = "id, name, title, department, image, bio, expertise, email, created_at, updated_at";

    async fn insert_row(db: &SqlitePool, instructor: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO instructors
                (id, name, title, department, image, bio, expertise, email,
                created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&instructor.id)
        .bind(&instructor.name)
        .bind(&instructor.title)
        .bind(&instructor.department)
        .bind(&instructor.image)
        .bind(&instructor.bio)
        .bind(Json(&instructor.expertise))
        .bind(&instructor.email)
        .bind(&instructor.created_at)
        .bind(&instructor.updated_at)
        .execute(db)
        .await?;
        Ok(())
    }

    async fn update_row(db: &SqlitePool, instructor: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE instructors
            SET name = ?1,
                title = ?2,
                department = ?3,
                image = ?4,
                bio = ?5,
                expertise = ?6,
                email = ?7,
                updated_at = ?8
            WHERE id = ?9
            "#,
        )
        .bind(&instructor.name)
        .bind(&instructor.title)
        .bind(&instructor.department)
        .bind(&instructor.image)
        .bind(&instructor.bio)
        .bind(Json(&instructor.expertise))
        .bind(&instructor.email)
        .bind(&instructor.updated_at)
        .bind(&instructor.id)
        .execute(db)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{
        CourseDetailsPatch, CoursePatch, CourseStatus, NewCourse, NewCourseDetails, NewInstructor, NewProject,
        NewTeamMember, SyllabusItem, TeamMemberPatch,
    };

    fn new_course(slug: &str) -> NewCourse {
        NewCourse {
            title: "HOPE".to_string(),
            description: "Hands-on PCB engineering".to_string(),
            year: "2025".to_string(),
            semester: "Fall".to_string(),
            thumbnail: "/hope.jpg".to_string(),
            slug: slug.to_string(),
            status: CourseStatus::Current,
            duration: "8 weeks".to_string(),
            enrolled: 10,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_course() {
        let pool = db::in_memory().await.expect("Failed to create test db");

        let course = insert::<Course>(&pool, new_course("hope")).await.expect("Failed to insert course");
        assert_eq!(course.title, "HOPE");
        assert_eq!(course.created_at, course.updated_at);

        let fetched = find_by_id::<Course>(&pool, &course.id)
            .await
            .expect("Failed to fetch course")
            .expect("Course not found");
        assert_eq!(fetched, course);

        let by_slug = find_course_by_slug(&pool, "hope").await.expect("Failed to fetch by slug");
        assert_eq!(by_slug.map(|c| c.id), Some(course.id));
    }

    #[tokio::test]
    async fn test_fetch_all_is_newest_first() {
        let pool = db::in_memory().await.expect("Failed to create test db");

        let first = insert::<Course>(&pool, new_course("one")).await.unwrap();
        let second = insert::<Course>(&pool, new_course("two")).await.unwrap();
        let third = insert::<Course>(&pool, new_course("three")).await.unwrap();

        let ids: Vec<String> = fetch_all::<Course>(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_rejected() {
        let pool = db::in_memory().await.expect("Failed to create test db");

        insert::<Course>(&pool, new_course("dup")).await.unwrap();
        let err = insert::<Course>(&pool, new_course("dup")).await.unwrap_err();
        let kind = err.as_database_error().map(|e| e.kind());
        assert!(matches!(kind, Some(sqlx::error::ErrorKind::UniqueViolation)));
    }

    #[tokio::test]
    async fn test_update_course_keeps_unspecified_fields() {
        let pool = db::in_memory().await.expect("Failed to create test db");
        let course = insert::<Course>(&pool, new_course("patch-me")).await.unwrap();

        let updated = update::<Course>(
            &pool,
            &course.id,
            CoursePatch {
                status: Some(CourseStatus::Past),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update course")
        .expect("Course not found");

        assert_eq!(updated.status, CourseStatus::Past);
        assert_eq!(updated.title, course.title);
        assert_eq!(updated.slug, course.slug);
        assert_eq!(updated.enrolled, course.enrolled);
        assert_eq!(updated.created_at, course.created_at);

        let stored = find_by_id::<Course>(&pool, &course.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let pool = db::in_memory().await.expect("Failed to create test db");
        let result = update::<TeamMember>(
            &pool,
            "missing",
            TeamMemberPatch {
                name: Some("x".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_team_member() {
        let pool = db::in_memory().await.expect("Failed to create test db");
        let member = insert::<TeamMember>(
            &pool,
            NewTeamMember {
                name: "Ada".to_string(),
                role: "President".to_string(),
                image: "/ada.jpg".to_string(),
                bio: "EE senior".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(delete::<TeamMember>(&pool, &member.id).await.unwrap());
        assert!(!delete::<TeamMember>(&pool, &member.id).await.unwrap());
        assert!(find_by_id::<TeamMember>(&pool, &member.id).await.unwrap().is_none());
        assert!(fetch_all::<TeamMember>(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_fields_keep_order_and_duplicates() {
        let pool = db::in_memory().await.expect("Failed to create test db");
        let project = insert::<Project>(
            &pool,
            NewProject {
                title: "Line follower".to_string(),
                description: "Robot".to_string(),
                image: "/robot.jpg".to_string(),
                technologies: vec!["C".to_string(), "KiCAD".to_string(), "C".to_string()],
                course: "HOPE".to_string(),
                members: vec!["Ada".to_string(), "Grace".to_string()],
            },
        )
        .await
        .unwrap();

        let stored = find_by_id::<Project>(&pool, &project.id).await.unwrap().unwrap();
        assert_eq!(stored.technologies, vec!["C", "KiCAD", "C"]);
        assert_eq!(stored.members, vec!["Ada", "Grace"]);

        let instructor = insert::<Instructor>(
            &pool,
            NewInstructor {
                name: "Dr. Smith".to_string(),
                title: "Professor".to_string(),
                department: "EECS".to_string(),
                image: "/smith.jpg".to_string(),
                bio: "VLSI".to_string(),
                expertise: vec!["VLSI".to_string(), "UVM".to_string()],
                email: "smith@example.edu".to_string(),
            },
        )
        .await
        .unwrap();
        let stored = find_by_id::<Instructor>(&pool, &instructor.id).await.unwrap().unwrap();
        assert_eq!(stored.expertise, vec!["VLSI", "UVM"]);
    }

    #[tokio::test]
    async fn test_course_details_lifecycle() {
        let pool = db::in_memory().await.expect("Failed to create test db");
        let course = insert::<Course>(&pool, new_course("viva")).await.unwrap();

        let details = insert::<CourseDetails>(
            &pool,
            NewCourseDetails {
                course_id: course.id.clone(),
                level: "Advanced".to_string(),
                instructor: "Dr. Smith".to_string(),
                max_capacity: 30,
                prerequisites: vec!["Digital logic".to_string()],
                learning_objectives: vec![],
                syllabus: vec![SyllabusItem {
                    week: 1,
                    topic: "Verilog".to_string(),
                    description: "Modules and ports".to_string(),
                }],
                resources: vec![],
            },
        )
        .await
        .unwrap();

        let found = find_details_by_course_id(&pool, &course.id).await.unwrap().unwrap();
        assert_eq!(found, details);

        let updated = update::<CourseDetails>(
            &pool,
            &details.id,
            CourseDetailsPatch {
                resources: Some(vec!["Textbook".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.resources, vec!["Textbook"]);
        assert_eq!(updated.syllabus.len(), 1);

        // details follow their course on delete
        assert!(delete::<Course>(&pool, &course.id).await.unwrap());
        assert!(find_details_by_course_id(&pool, &course.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_details_require_existing_course() {
        let pool = db::in_memory().await.expect("Failed to create test db");
        let err = insert::<CourseDetails>(
            &pool,
            NewCourseDetails {
                course_id: "no-such-course".to_string(),
                level: "Beginner".to_string(),
                instructor: "TBD".to_string(),
                max_capacity: 0,
                prerequisites: vec![],
                learning_objectives: vec![],
                syllabus: vec![],
                resources: vec![],
            },
        )
        .await
        .unwrap_err();
        let kind = err.as_database_error().map(|e| e.kind());
        assert!(matches!(kind, Some(sqlx::error::ErrorKind::ForeignKeyViolation)));
    }
}
