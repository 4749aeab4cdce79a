#![allow(dead_code)]

use chrono::NaiveDate;
use edurank_core::attendance::AttendanceStatus;
use edurank_core::scores::ExamScores;
use edurank_core::types::DbId;
use edurank_db::models::attendance::CreateAttendanceRecord;
use edurank_db::models::classroom::CreateClassroom;
use edurank_db::models::student::CreateStudent;
use edurank_db::models::student_result::CreateStudentResult;
use edurank_db::models::subject::CreateSubject;
use edurank_db::models::user::CreateUser;
use edurank_db::repositories::{ClassroomRepo, StudentRepo, SubjectRepo, UserRepo};
use sqlx::PgPool;

pub const YEAR: &str = "2024-2025";

pub struct Fixture {
    pub teacher_id: DbId,
    pub class_id: DbId,
    pub subject_id: DbId,
    pub student_ids: Vec<DbId>,
}

pub async fn seed(pool: &PgPool, students: usize) -> Fixture {
    let teacher = UserRepo::create(
        pool,
        &CreateUser {
            name: "Teacher".into(),
            role: Some("teacher".into()),
        },
    )
    .await
    .unwrap();
    let class = ClassroomRepo::create(
        pool,
        &CreateClassroom {
            grade: "9".into(),
            section: "B".into(),
        },
    )
    .await
    .unwrap();
    let subject = SubjectRepo::create(
        pool,
        &CreateSubject {
            name: "History".into(),
        },
    )
    .await
    .unwrap();

    let mut student_ids = Vec::new();
    for i in 0..students {
        let student = StudentRepo::create(
            pool,
            &CreateStudent {
                name: format!("Pupil {i}"),
                class_id: class.id,
            },
        )
        .await
        .unwrap();
        student_ids.push(student.id);
    }

    Fixture {
        teacher_id: teacher.id,
        class_id: class.id,
        subject_id: subject.id,
        student_ids,
    }
}

pub fn mark(
    fx: &Fixture,
    student_id: DbId,
    academic_year: &str,
    status: AttendanceStatus,
) -> CreateAttendanceRecord {
    CreateAttendanceRecord {
        student_id,
        subject_id: fx.subject_id,
        class_id: fx.class_id,
        status,
        date: NaiveDate::from_ymd_opt(2024, 9, 16).unwrap(),
        period_start: "11:00".into(),
        period_end: "11:45".into(),
        academic_year: academic_year.into(),
        marked_by: fx.teacher_id,
    }
}

pub fn result_row(fx: &Fixture, student_id: DbId, each: f64) -> CreateStudentResult {
    let scores = ExamScores {
        first_exam: each,
        mid_exam: each,
        third_exam: each,
        final_exam: each,
        activities: each,
    };
    CreateStudentResult {
        teacher_id: fx.teacher_id,
        student_id,
        class_id: fx.class_id,
        subject_id: fx.subject_id,
        academic_year: YEAR.into(),
        attendance_rate: "0.0".into(),
        total: scores.total_string(),
        scores,
    }
}
