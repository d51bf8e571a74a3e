use crate::{
    data::{EnrollmentStatusUpdate, Status, StudentBackend, StudentCourse},
    error::AppResult,
    form::Draft,
    validation::{self, FieldErrors},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusField {
    Status,
}

impl StatusField {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Status => "status",
        }
    }
}

/// Edits the status of one course. The course it points at is fixed once the draft is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentStatusDraft {
    student_id: String,
    student_course_id: String,
    pub status: String,
}

impl EnrollmentStatusDraft {
    pub const fn new(student_id: String, student_course_id: String, status: String) -> Self {
        Self {
            student_id,
            student_course_id,
            status,
        }
    }

    pub fn for_course(course: &StudentCourse) -> Self {
        Self::new(
            course.student_id.clone(),
            course.id.clone(),
            course.enrollment_status.status.as_str().to_string(),
        )
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn student_course_id(&self) -> &str {
        &self.student_course_id
    }

    pub fn set_status(&mut self, status: String) {
        self.status = status;
    }

    pub fn validate(&self) -> Result<EnrollmentStatusUpdate, FieldErrors<StatusField>> {
        let mut errors = FieldErrors::default();
        errors.check(StatusField::Status, &self.status, validation::STATUS);

        match Status::parse(&self.status) {
            Some(status) if errors.is_empty() => Ok(EnrollmentStatusUpdate {
                student_course_id: self.student_course_id.clone(),
                status,
            }),
            //anything unparseable has already failed the status rules
            _ => Err(errors),
        }
    }
}

impl Draft for EnrollmentStatusDraft {
    type Field = StatusField;
    type Valid = EnrollmentStatusUpdate;
    type Saved = EnrollmentStatusUpdate;

    fn validate(&self) -> Result<Self::Valid, FieldErrors<StatusField>> {
        Self::validate(self)
    }

    async fn transmit<B: StudentBackend>(valid: Self::Valid, backend: &B) -> AppResult<Self::Saved> {
        info!(course = %valid.student_course_id, status = %valid.status, "Updating enrollment status");
        backend.update_enrollment_status(&valid).await?;
        Ok(valid)
    }
}
