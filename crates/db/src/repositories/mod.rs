//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod attendance_repo;
pub mod classroom_repo;
pub mod student_repo;
pub mod student_result_repo;
pub mod subject_repo;
pub mod user_repo;

pub use attendance_repo::AttendanceRepo;
pub use classroom_repo::ClassroomRepo;
pub use student_repo::StudentRepo;
pub use student_result_repo::StudentResultRepo;
pub use subject_repo::SubjectRepo;
pub use user_repo::UserRepo;
