//! Integration tests for seed fixture loading.
//!
//! These tests validate fixture parsing, cross-reference checks, duplicate
//! natural key detection and capability-scoped file loading.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]


use camino::Utf8Path;
use example_data::{
    CourseStatusSeed, EnrollmentStatusSeed, FixtureError, RoleSeed, SeedFixture, is_valid_email,
    is_valid_username,
};
use rstest::rstest;
use test_support::{open_fixture_dir, unique_temp_path};

const TWO_USER_JSON: &str = r#"{
    "version": 1,
    "credentials": {"tutor": "instructor123", "learner": "student123"},
    "users": [
        {"email": "ada@example.com", "username": "ada", "firstName": "Ada",
         "lastName": "Lovelace", "role": "instructor", "credential": "tutor"},
        {"email": "alan@example.com", "username": "alan", "firstName": "Alan",
         "lastName": "Turing", "role": "student", "credential": "learner"}
    ],
    "courses": [
        {"title": "Engines", "description": "Analytical engines.", "instructor": "ada",
         "status": "published", "price": 10.0, "durationHours": 4, "maxStudents": 5}
    ],
    "enrollments": [
        {"student": "alan", "course": "Engines", "progress": 50.0, "enrolledDaysAgo": 3}
    ]
}"#;

#[test]
fn bundled_fixture_matches_development_dataset() {
    let fixture = SeedFixture::bundled().expect("bundled fixture");

    assert_eq!(fixture.users().len(), 12);
    assert_eq!(fixture.count_role(RoleSeed::Admin), 1);
    assert_eq!(fixture.count_role(RoleSeed::Instructor), 3);
    assert_eq!(fixture.count_role(RoleSeed::Student), 8);
    assert_eq!(fixture.courses().len(), 6);
    assert_eq!(fixture.enrollments().len(), 18);
}

#[test]
fn bundled_fixture_records_satisfy_validators() {
    let fixture = SeedFixture::bundled().expect("bundled fixture");

    for user in fixture.users() {
        assert!(is_valid_email(&user.email), "email: {}", user.email);
        assert!(is_valid_username(&user.username), "username: {}", user.username);
    }
}

#[rstest]
#[case("Introduction to Python Programming", 5)]
#[case("Advanced Web Development with React", 3)]
#[case("Data Science Fundamentals", 3)]
#[case("Database Design and SQL", 4)]
#[case("Mobile App Development with Flutter", 0)]
#[case("Cybersecurity Essentials", 3)]
fn bundled_fixture_enrollment_counts(#[case] title: &str, #[case] expected: usize) {
    let fixture = SeedFixture::bundled().expect("bundled fixture");
    assert_eq!(fixture.enrollment_count_for(title), expected);
}

#[test]
fn bundled_fixture_statuses_are_parsed() {
    let fixture = SeedFixture::bundled().expect("bundled fixture");

    let flutter = fixture
        .find_course("Mobile App Development with Flutter")
        .expect("flutter course");
    assert_eq!(flutter.status, CourseStatusSeed::Draft);

    let dropped = fixture
        .enrollments()
        .iter()
        .filter(|enrollment| enrollment.status == EnrollmentStatusSeed::Dropped)
        .count();
    assert_eq!(dropped, 1);
}

/// Tests that use pattern matching for parse errors (message content varies).
#[rstest]
#[case::malformed_json("not valid json")]
#[case::missing_users(r#"{"version": 1}"#)]
#[case::unknown_role(
    r#"{"version": 1, "credentials": {"c": "p"}, "users": [{"email": "a@b.io", "username": "abc",
        "firstName": "A", "lastName": "B", "role": "superuser", "credential": "c"}]}"#
)]
fn rejects_json_with_parse_error(#[case] json: &str) {
    let result = SeedFixture::from_json(json);
    assert!(matches!(result, Err(FixtureError::ParseError { .. })));
}

/// Tests that check exact error variants.
#[rstest]
#[case::unsupported_version(
    r#"{"version": 2, "users": []}"#,
    FixtureError::UnsupportedVersion { expected: 1, actual: 2 }
)]
#[case::empty_users(r#"{"version": 1, "users": []}"#, FixtureError::EmptyUsers)]
#[case::unknown_credential(
    r#"{"version": 1, "users": [{"email": "a@b.io", "username": "abc",
        "firstName": "A", "lastName": "B", "role": "admin", "credential": "root"}]}"#,
    FixtureError::UnknownCredential { username: "abc".to_owned(), credential: "root".to_owned() }
)]
fn rejects_invalid_fixture(#[case] json: &str, #[case] expected: FixtureError) {
    assert_eq!(SeedFixture::from_json(json), Err(expected));
}

#[rstest]
#[case::bad_email(r#""email": "alan@example.com""#, r#""email": "alan-at-example""#)]
#[case::short_username(r#""username": "alan""#, r#""username": "al""#)]
fn rejects_users_that_violate_the_validator(#[case] from: &str, #[case] to: &str) {
    let json = TWO_USER_JSON.replacen(from, to, 1);
    let result = SeedFixture::from_json(&json);

    assert!(
        matches!(result, Err(FixtureError::InvalidUser { index: 1, .. })),
        "result: {result:?}"
    );
}

#[test]
fn rejects_duplicate_email() {
    let json = TWO_USER_JSON.replacen(r#""alan@example.com""#, r#""ada@example.com""#, 1);
    let result = SeedFixture::from_json(&json);

    assert_eq!(
        result,
        Err(FixtureError::DuplicateEmail {
            email: "ada@example.com".to_owned()
        })
    );
}

#[test]
fn rejects_duplicate_username() {
    let json = TWO_USER_JSON.replacen(r#""username": "alan""#, r#""username": "ada""#, 1);
    let result = SeedFixture::from_json(&json);

    assert_eq!(
        result,
        Err(FixtureError::DuplicateUsername {
            username: "ada".to_owned()
        })
    );
}

#[test]
fn rejects_duplicate_enrollment_pair() {
    let json = TWO_USER_JSON.replacen(
        r#"{"student": "alan", "course": "Engines", "progress": 50.0, "enrolledDaysAgo": 3}"#,
        r#"{"student": "alan", "course": "Engines", "progress": 50.0, "enrolledDaysAgo": 3},
           {"student": "alan", "course": "Engines", "progress": 10.0, "enrolledDaysAgo": 2}"#,
        1,
    );
    let result = SeedFixture::from_json(&json);

    assert_eq!(
        result,
        Err(FixtureError::DuplicateEnrollment {
            student: "alan".to_owned(),
            course: "Engines".to_owned(),
        })
    );
}

#[rstest]
#[case::unknown_student(
    r#""student": "alan""#,
    r#""student": "grace""#,
    FixtureError::UnknownStudent { index: 0, student: "grace".to_owned() }
)]
#[case::unknown_course(
    r#""course": "Engines""#,
    r#""course": "Looms""#,
    FixtureError::UnknownCourse { index: 0, course: "Looms".to_owned() }
)]
#[case::unknown_instructor(
    r#""instructor": "ada""#,
    r#""instructor": "charles""#,
    FixtureError::UnknownInstructor { course: "Engines".to_owned(), instructor: "charles".to_owned() }
)]
fn rejects_dangling_references(#[case] from: &str, #[case] to: &str, #[case] expected: FixtureError) {
    let json = TWO_USER_JSON.replacen(from, to, 1);
    assert_eq!(SeedFixture::from_json(&json), Err(expected));
}

#[test]
fn loads_fixture_from_file() {
    let path = unique_temp_path("fixture-load", "lms-seed.json").expect("temp path");
    let dir = open_fixture_dir(&path).expect("open dir");
    let file_name = Utf8Path::new(path.file_name().expect("file name"));
    dir.write(file_name, TWO_USER_JSON).expect("write fixture");

    let fixture = SeedFixture::from_file(&dir, file_name).expect("load fixture");

    assert_eq!(fixture.users().len(), 2);
    dir.remove_file(file_name).expect("clean up");
}

#[test]
fn missing_file_reports_io_error() {
    let path = unique_temp_path("fixture-missing", "absent.json").expect("temp path");
    let dir = open_fixture_dir(&path).expect("open dir");
    let file_name = Utf8Path::new(path.file_name().expect("file name"));

    let result = SeedFixture::from_file(&dir, file_name);

    assert!(matches!(result, Err(FixtureError::IoError { .. })));
}
