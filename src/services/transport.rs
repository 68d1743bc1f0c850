use std::sync::Arc;

use sqlx::SqlitePool;

use crate::client::AdminClient;
use crate::db::repository::{self, Table};
use crate::error::AppError;
use crate::models::{Course, CourseDetails};

/// Where entity operations are executed.
///
/// `Server` talks to the database in-process; `Client` goes through a running
/// server's admin API with a session token.
#[derive(Clone)]
pub enum Transport {
    Server(SqlitePool),
    Client(Arc<AdminClient>),
}

impl Transport {
    pub fn name(&self) -> &'static str {
        match self {
            Transport::Server(_) => "server",
            Transport::Client(_) => "client",
        }
    }

    pub(crate) async fn fetch_all<T: Table>(&self) -> Result<Vec<T>, AppError> {
        match self {
            Transport::Server(db) => Ok(repository::fetch_all::<T>(db).await?),
            Transport::Client(client) => Ok(client.list::<T>().await?),
        }
    }

    pub(crate) async fn find_by_id<T: Table>(&self, id: &str) -> Result<Option<T>, AppError> {
        match self {
            Transport::Server(db) => Ok(repository::find_by_id::<T>(db, id).await?),
            Transport::Client(client) => Ok(client.get::<T>(id).await?),
        }
    }

    pub(crate) async fn insert<T: Table>(&self, new: T::New) -> Result<T, AppError> {
        match self {
            Transport::Server(db) => Ok(repository::insert::<T>(db, new).await?),
            Transport::Client(client) => Ok(client.create::<T>(&new).await?),
        }
    }

    pub(crate) async fn update<T: Table>(
        &self,
        id: &str,
        patch: T::Patch,
    ) -> Result<Option<T>, AppError> {
        match self {
            Transport::Server(db) => Ok(repository::update::<T>(db, id, patch).await?),
            Transport::Client(client) => Ok(client.update::<T>(id, &patch).await?),
        }
    }

    pub(crate) async fn delete<T: Table>(&self, id: &str) -> Result<bool, AppError> {
        match self {
            Transport::Server(db) => Ok(repository::delete::<T>(db, id).await?),
            Transport::Client(client) => Ok(client.delete::<T>(id).await?),
        }
    }

    pub(crate) async fn course_by_slug(&self, slug: &str) -> Result<Option<Course>, AppError> {
        match self {
            Transport::Server(db) => Ok(repository::find_course_by_slug(db, slug).await?),
            Transport::Client(client) => Ok(client.course_by_slug(slug).await?),
        }
    }

    pub(crate) async fn details_for_course(
        &self,
        course_id: &str,
    ) -> Result<Option<CourseDetails>, AppError> {
        match self {
            Transport::Server(db) => {
                Ok(repository::find_details_by_course_id(db, course_id).await?)
            }
            Transport::Client(client) => Ok(client.details_for_course(course_id).await?),
        }
    }
}
