//! BSON renderings of catalogue specs and domain records.
//!
//! These helpers are internal to the MongoDB adapters; the domain never sees
//! a `Document`.

use chrono::{DateTime, Utc};
use mongodb::IndexModel;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::options::IndexOptions;

use crate::domain::ports::StorageError;
use crate::domain::{
    FieldRule, IndexKind, IndexSpec, NewCourse, NewEnrollment, NewUser, RecordId, ValidatorSpec,
};

/// Render a validator as a `$jsonSchema` document.
pub(crate) fn validator_document(spec: &ValidatorSpec) -> Document {
    let mut properties = Document::new();
    for rule in &spec.properties {
        properties.insert(rule.field, field_rule_document(rule));
    }

    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": spec.required.clone(),
            "properties": properties,
        }
    }
}

fn field_rule_document(rule: &FieldRule) -> Document {
    let mut document = doc! { "bsonType": rule.bson_type.as_str() };
    if let Some(min) = rule.min_length {
        document.insert("minLength", i64::from(min));
    }
    if let Some(max) = rule.max_length {
        document.insert("maxLength", i64::from(max));
    }
    if !rule.allowed_values.is_empty() {
        document.insert("enum", rule.allowed_values.clone());
    }
    if let Some(pattern) = rule.pattern {
        document.insert("pattern", pattern);
    }
    document
}

/// Build the driver index model for `spec`.
pub(crate) fn index_model(spec: &IndexSpec) -> IndexModel {
    let mut keys = Document::new();
    for key in &spec.keys {
        let direction = match key.kind {
            IndexKind::Ascending => Bson::Int32(1),
            IndexKind::Text => Bson::String("text".to_owned()),
        };
        keys.insert(key.field, direction);
    }

    let options = IndexOptions::builder()
        .name(spec.name.to_owned())
        .unique(spec.unique.then_some(true))
        .background(spec.background)
        .build();
    IndexModel::builder().keys(keys).options(options).build()
}

pub(crate) fn bson_date(value: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(value.timestamp_millis())
}

pub(crate) fn object_id(id: &RecordId) -> Result<ObjectId, StorageError> {
    ObjectId::parse_str(id.as_str()).map_err(|err| StorageError::query(err.to_string()))
}

pub(crate) fn record_id(id: ObjectId) -> Result<RecordId, StorageError> {
    RecordId::new(id.to_hex()).map_err(|err| StorageError::query(err.to_string()))
}

/// Natural-key filter for a user.
pub(crate) fn user_filter(user: &NewUser) -> Document {
    doc! { "email": user.email.as_str() }
}

pub(crate) fn user_document(user: &NewUser) -> Document {
    let created_at = bson_date(user.created_at);
    doc! {
        "email": user.email.as_str(),
        "username": user.username.as_str(),
        "first_name": user.first_name.as_str(),
        "last_name": user.last_name.as_str(),
        "role": user.role.as_str(),
        "hashed_password": user.hashed_password.as_str(),
        "is_active": user.is_active,
        "created_at": created_at,
        "updated_at": created_at,
    }
}

/// Natural-key filter for a course.
pub(crate) fn course_filter(course: &NewCourse) -> Document {
    doc! { "title": course.title.as_str() }
}

pub(crate) fn course_document(course: &NewCourse) -> Result<Document, StorageError> {
    let created_at = bson_date(course.created_at);
    Ok(doc! {
        "title": course.title.as_str(),
        "description": course.description.as_str(),
        "instructor_id": object_id(&course.instructor_id)?,
        "status": course.status.as_str(),
        "price": course.price,
        "duration_hours": i64::from(course.duration_hours),
        "max_students": i64::from(course.max_students),
        "tags": course.tags.clone(),
        "enrollment_count": i64::from(course.enrollment_count),
        "created_at": created_at,
        "updated_at": created_at,
    })
}

/// Natural-key filter for an enrollment.
pub(crate) fn enrollment_filter(enrollment: &NewEnrollment) -> Result<Document, StorageError> {
    Ok(doc! {
        "user_id": object_id(&enrollment.user_id)?,
        "course_id": object_id(&enrollment.course_id)?,
    })
}

pub(crate) fn enrollment_document(enrollment: &NewEnrollment) -> Result<Document, StorageError> {
    let mut document = enrollment_filter(enrollment)?;
    document.insert("enrolled_at", bson_date(enrollment.enrolled_at));
    document.insert("status", enrollment.status.as_str());
    document.insert("progress", enrollment.progress);
    if let Some(completed_at) = enrollment.completed_at {
        document.insert("completed_at", bson_date(completed_at));
    }
    if let Some(last_accessed) = enrollment.last_accessed {
        document.insert("last_accessed", bson_date(last_accessed));
    }
    Ok(document)
}
