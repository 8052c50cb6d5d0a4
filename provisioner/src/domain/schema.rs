//! Schema catalogue for the LMS document store.
//!
//! The catalogue is plain data: which collections must exist, the structural
//! validator attached to each, and the named indexes to build. Adapters render
//! it into store-specific commands; the provisioner iterates it in order.

use super::account::{EMAIL_PATTERN, Role, USERNAME_MAX, USERNAME_MIN};

/// Collection holding user accounts.
pub const USERS: &str = "users";
/// Collection holding courses.
pub const COURSES: &str = "courses";
/// Collection holding enrollments.
pub const ENROLLMENTS: &str = "enrollments";

/// Minimum allowed length for a course title.
pub const TITLE_MIN: u32 = 1;
/// Maximum allowed length for a course title.
pub const TITLE_MAX: u32 = 200;
/// Minimum allowed length for a course description.
pub const DESCRIPTION_MIN: u32 = 1;
/// Maximum allowed length for a course description.
pub const DESCRIPTION_MAX: u32 = 1000;

/// Storage type a validated field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BsonType {
    String,
    ObjectId,
    Date,
}

impl BsonType {
    /// Name used by `$jsonSchema` `bsonType`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::ObjectId => "objectId",
            Self::Date => "date",
        }
    }
}

/// Constraints applied to a single field by a collection validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub bson_type: BsonType,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub allowed_values: Vec<&'static str>,
    pub pattern: Option<&'static str>,
}

impl FieldRule {
    /// A rule that only constrains the field's type.
    pub const fn new(field: &'static str, bson_type: BsonType) -> Self {
        Self {
            field,
            bson_type,
            min_length: None,
            max_length: None,
            allowed_values: Vec::new(),
            pattern: None,
        }
    }

    /// Bound the field's length in characters.
    #[must_use]
    pub fn with_length(mut self, min: u32, max: u32) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    /// Restrict the field to an enumeration.
    #[must_use]
    pub fn with_allowed_values(mut self, values: impl IntoIterator<Item = &'static str>) -> Self {
        self.allowed_values = values.into_iter().collect();
        self
    }

    /// Require the field to match a regular expression.
    #[must_use]
    pub fn with_pattern(mut self, pattern: &'static str) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

/// Structural validator attached to a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorSpec {
    pub required: Vec<&'static str>,
    pub properties: Vec<FieldRule>,
}

impl ValidatorSpec {
    /// Look up the rule for `field`.
    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.properties.iter().find(|rule| rule.field == field)
    }
}

/// A collection that must exist together with its validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub validator: ValidatorSpec,
}

/// Ordering or text kind of an index key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Ascending,
    Text,
}

/// A single key within an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexKey {
    pub field: &'static str,
    pub kind: IndexKind,
}

impl IndexKey {
    /// Ascending key on `field`.
    pub const fn ascending(field: &'static str) -> Self {
        Self {
            field,
            kind: IndexKind::Ascending,
        }
    }

    /// Text key on `field`.
    pub const fn text(field: &'static str) -> Self {
        Self {
            field,
            kind: IndexKind::Text,
        }
    }
}

/// A named index to build on a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub collection: &'static str,
    pub name: &'static str,
    pub keys: Vec<IndexKey>,
    pub unique: bool,
    pub background: bool,
}

impl IndexSpec {
    fn background(
        collection: &'static str,
        name: &'static str,
        keys: Vec<IndexKey>,
        unique: bool,
    ) -> Self {
        Self {
            collection,
            name,
            keys,
            unique,
            background: true,
        }
    }

    /// `collection.name`, used as the target label in logs and reports.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.collection, self.name)
    }
}

/// The complete target state: collections first, then indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCatalog {
    collections: Vec<CollectionSpec>,
    indexes: Vec<IndexSpec>,
}

impl SchemaCatalog {
    /// Build a catalogue from explicit parts.
    pub const fn new(collections: Vec<CollectionSpec>, indexes: Vec<IndexSpec>) -> Self {
        Self {
            collections,
            indexes,
        }
    }

    /// The LMS catalogue: three validated collections and six indexes.
    ///
    /// # Examples
    /// ```
    /// use provisioner::domain::SchemaCatalog;
    ///
    /// let catalog = SchemaCatalog::lms();
    /// let names: Vec<_> = catalog.collections().iter().map(|c| c.name).collect();
    /// assert_eq!(names, ["users", "courses", "enrollments"]);
    /// assert_eq!(catalog.indexes().len(), 6);
    /// ```
    pub fn lms() -> Self {
        let role_values = Role::ALL.map(Role::as_str);
        let users = CollectionSpec {
            name: USERS,
            validator: ValidatorSpec {
                required: vec!["email", "username", "role"],
                properties: vec![
                    FieldRule::new("email", BsonType::String).with_pattern(EMAIL_PATTERN),
                    FieldRule::new("username", BsonType::String)
                        .with_length(length_bound(USERNAME_MIN), length_bound(USERNAME_MAX)),
                    FieldRule::new("role", BsonType::String).with_allowed_values(role_values),
                ],
            },
        };
        let courses = CollectionSpec {
            name: COURSES,
            validator: ValidatorSpec {
                required: vec!["title", "description", "instructor_id"],
                properties: vec![
                    FieldRule::new("title", BsonType::String).with_length(TITLE_MIN, TITLE_MAX),
                    FieldRule::new("description", BsonType::String)
                        .with_length(DESCRIPTION_MIN, DESCRIPTION_MAX),
                    FieldRule::new("instructor_id", BsonType::ObjectId),
                ],
            },
        };
        let enrollments = CollectionSpec {
            name: ENROLLMENTS,
            validator: ValidatorSpec {
                required: vec!["user_id", "course_id", "enrolled_at"],
                properties: vec![
                    FieldRule::new("user_id", BsonType::ObjectId),
                    FieldRule::new("course_id", BsonType::ObjectId),
                    FieldRule::new("enrolled_at", BsonType::Date),
                ],
            },
        };

        let indexes = vec![
            IndexSpec::background(USERS, "email_1", vec![IndexKey::ascending("email")], true),
            IndexSpec::background(
                USERS,
                "username_1",
                vec![IndexKey::ascending("username")],
                true,
            ),
            IndexSpec::background(
                COURSES,
                "instructor_id_1",
                vec![IndexKey::ascending("instructor_id")],
                false,
            ),
            IndexSpec::background(
                COURSES,
                "title_text_description_text",
                vec![IndexKey::text("title"), IndexKey::text("description")],
                false,
            ),
            IndexSpec::background(
                ENROLLMENTS,
                "user_id_1_course_id_1",
                vec![IndexKey::ascending("user_id"), IndexKey::ascending("course_id")],
                true,
            ),
            IndexSpec::background(
                ENROLLMENTS,
                "course_id_1",
                vec![IndexKey::ascending("course_id")],
                false,
            ),
        ];

        Self::new(vec![users, courses, enrollments], indexes)
    }

    /// Collections in provisioning order.
    pub fn collections(&self) -> &[CollectionSpec] {
        &self.collections
    }

    /// Indexes in provisioning order.
    pub fn indexes(&self) -> &[IndexSpec] {
        &self.indexes
    }

    /// Look up a collection by name.
    pub fn collection(&self, name: &str) -> Option<&CollectionSpec> {
        self.collections.iter().find(|spec| spec.name == name)
    }

    /// Indexes declared on `collection`.
    pub fn indexes_for<'a>(&'a self, collection: &'a str) -> impl Iterator<Item = &'a IndexSpec> {
        self.indexes
            .iter()
            .filter(move |spec| spec.collection == collection)
    }
}

fn length_bound(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
