#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::NaiveDate;
use edurank_core::attendance::AttendanceStatus;
use edurank_core::types::DbId;
use edurank_db::models::attendance::CreateAttendanceRecord;
use edurank_db::models::classroom::CreateClassroom;
use edurank_db::models::student::CreateStudent;
use edurank_db::models::subject::CreateSubject;
use edurank_db::models::user::CreateUser;
use edurank_db::repositories::{
    AttendanceRepo, ClassroomRepo, StudentRepo, SubjectRepo, UserRepo,
};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use edurank_api::config::ServerConfig;
use edurank_api::router::build_app_router;
use edurank_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: String::new(),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        expose_error_details: false,
    }
}

/// Build the full application router, with the production middleware stack,
/// on top of the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = Arc::new(test_config());
    build_app_router(AppState::new(pool, Arc::clone(&config)), &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "POST", uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "PUT", uri, body).await
}

async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const YEAR: &str = "2024-2025";

/// A teacher, a classroom, one subject and `students` enrolled students.
pub struct Scope {
    pub teacher_id: DbId,
    pub class_id: DbId,
    pub subject_id: DbId,
    pub student_ids: Vec<DbId>,
}

pub async fn seed_scope(pool: &PgPool, students: usize) -> Scope {
    let teacher = UserRepo::create(
        pool,
        &CreateUser {
            name: "Ms. Teacher".into(),
            role: None,
        },
    )
    .await
    .unwrap();
    let class = ClassroomRepo::create(
        pool,
        &CreateClassroom {
            grade: "10".into(),
            section: "A".into(),
        },
    )
    .await
    .unwrap();
    let subject = SubjectRepo::create(
        pool,
        &CreateSubject {
            name: "Mathematics".into(),
        },
    )
    .await
    .unwrap();

    let mut student_ids = Vec::with_capacity(students);
    for i in 0..students {
        let student = StudentRepo::create(
            pool,
            &CreateStudent {
                name: format!("Student {i}"),
                class_id: class.id,
            },
        )
        .await
        .unwrap();
        student_ids.push(student.id);
    }

    Scope {
        teacher_id: teacher.id,
        class_id: class.id,
        subject_id: subject.id,
        student_ids,
    }
}

pub async fn add_subject(pool: &PgPool, name: &str) -> DbId {
    SubjectRepo::create(pool, &CreateSubject { name: name.into() })
        .await
        .unwrap()
        .id
}

/// Insert `present` Present and `absent` Absent records for one student.
pub async fn add_attendance(
    pool: &PgPool,
    scope: &Scope,
    student_id: DbId,
    subject_id: DbId,
    academic_year: &str,
    present: usize,
    absent: usize,
) {
    let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
    let rows: Vec<CreateAttendanceRecord> = std::iter::repeat(AttendanceStatus::Present)
        .take(present)
        .chain(std::iter::repeat(AttendanceStatus::Absent).take(absent))
        .map(|status| CreateAttendanceRecord {
            student_id,
            subject_id,
            class_id: scope.class_id,
            status,
            date,
            period_start: "08:00".into(),
            period_end: "08:45".into(),
            academic_year: academic_year.into(),
            marked_by: scope.teacher_id,
        })
        .collect();
    AttendanceRepo::create_batch(pool, &rows).await.unwrap();
}
