use crate::error::AppResult;

pub mod backend;
pub mod student;
#[cfg(test)]
pub mod testing;

pub use student::{
    EnrollmentStatus, EnrollmentStatusUpdate, Gender, Status, Student, StudentCourse,
    StudentDetail,
};

/// The REST backend that owns every student record. The UI only ever holds copies.
#[allow(async_fn_in_trait)]
pub trait StudentBackend: Sync {
    async fn list_students(&self) -> AppResult<Vec<StudentDetail>>;
    async fn get_student(&self, id: &str) -> AppResult<StudentDetail>;
    /// Returns the record as created by the backend.
    async fn register_student(&self, detail: &StudentDetail) -> AppResult<StudentDetail>;
    async fn update_student(&self, detail: &StudentDetail) -> AppResult<()>;
    /// `detail` already carries `is_deleted = true`.
    async fn soft_delete_student(&self, detail: &StudentDetail) -> AppResult<()>;
    async fn update_enrollment_status(&self, update: &EnrollmentStatusUpdate) -> AppResult<()>;
}
