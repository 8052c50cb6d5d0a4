//! MongoDB-backed account and example data repositories.
//!
//! Both adapters write through [`insert_if_absent`], keyed by each record's
//! natural key, and never modify an existing document.

use async_trait::async_trait;
use mongodb::bson::Document;
use mongodb::{Collection, Database};

use super::documents::{
    course_document, course_filter, enrollment_document, enrollment_filter, user_document,
    user_filter,
};
use super::upsert::insert_if_absent;
use crate::domain::ports::{
    AccountRepository, ExampleDataSeedRepository, StorageError, UpsertOutcome,
};
use crate::domain::schema::{COURSES, ENROLLMENTS, USERS};
use crate::domain::{NewCourse, NewEnrollment, NewUser};

async fn insert_user(
    users: &Collection<Document>,
    user: &NewUser,
) -> Result<UpsertOutcome, StorageError> {
    insert_if_absent(users, user_filter(user), user_document(user)).await
}

/// Account adapter writing to the `users` collection.
#[derive(Debug, Clone)]
pub struct MongoAccountRepository {
    users: Collection<Document>,
}

impl MongoAccountRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            users: database.collection(USERS),
        }
    }
}

#[async_trait]
impl AccountRepository for MongoAccountRepository {
    async fn insert_user_if_absent(&self, user: &NewUser) -> Result<UpsertOutcome, StorageError> {
        insert_user(&self.users, user).await
    }
}

/// Seed adapter writing users, courses and enrollments.
#[derive(Debug, Clone)]
pub struct MongoExampleDataSeedRepository {
    users: Collection<Document>,
    courses: Collection<Document>,
    enrollments: Collection<Document>,
}

impl MongoExampleDataSeedRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            users: database.collection(USERS),
            courses: database.collection(COURSES),
            enrollments: database.collection(ENROLLMENTS),
        }
    }
}

#[async_trait]
impl ExampleDataSeedRepository for MongoExampleDataSeedRepository {
    async fn insert_user_if_absent(&self, user: &NewUser) -> Result<UpsertOutcome, StorageError> {
        insert_user(&self.users, user).await
    }

    async fn insert_course_if_absent(
        &self,
        course: &NewCourse,
    ) -> Result<UpsertOutcome, StorageError> {
        insert_if_absent(&self.courses, course_filter(course), course_document(course)?).await
    }

    async fn insert_enrollment_if_absent(
        &self,
        enrollment: &NewEnrollment,
    ) -> Result<UpsertOutcome, StorageError> {
        insert_if_absent(
            &self.enrollments,
            enrollment_filter(enrollment)?,
            enrollment_document(enrollment)?,
        )
        .await
    }
}
