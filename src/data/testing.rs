//! In-memory [`StudentBackend`] that records every call, for asserting exactly what reached the backend.

use crate::{
    data::{
        EnrollmentStatus, EnrollmentStatusUpdate, Gender, Status, Student, StudentBackend,
        StudentCourse, StudentDetail,
    },
    error::{AppError, AppResult},
};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    List,
    Get(String),
    Register(StudentDetail),
    Update(StudentDetail),
    SoftDelete(StudentDetail),
    UpdateStatus(EnrollmentStatusUpdate),
}

#[derive(Default)]
pub struct RecordingBackend {
    students: Vec<StudentDetail>,
    reject_with: Option<String>,
    calls: Mutex<Vec<BackendCall>>,
}

impl RecordingBackend {
    pub fn with_students(students: Vec<StudentDetail>) -> Self {
        Self {
            students,
            ..Self::default()
        }
    }

    /// Every call fails with a 400 carrying `message`.
    pub fn rejecting(message: &str) -> Self {
        Self {
            reject_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: BackendCall) -> AppResult<()> {
        self.calls.lock().unwrap().push(call);
        match &self.reject_with {
            Some(message) => Err(AppError::Backend {
                status: 400,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl StudentBackend for RecordingBackend {
    async fn list_students(&self) -> AppResult<Vec<StudentDetail>> {
        self.record(BackendCall::List)?;
        Ok(self.students.clone())
    }

    async fn get_student(&self, id: &str) -> AppResult<StudentDetail> {
        self.record(BackendCall::Get(id.to_string()))?;
        self.students
            .iter()
            .find(|detail| detail.student.id == id)
            .cloned()
            .ok_or_else(|| AppError::Backend {
                status: 404,
                message: format!("student {id} not found"),
            })
    }

    async fn register_student(&self, detail: &StudentDetail) -> AppResult<StudentDetail> {
        self.record(BackendCall::Register(detail.clone()))?;
        let mut created = detail.clone();
        created.student.id = "new-id".to_string();
        Ok(created)
    }

    async fn update_student(&self, detail: &StudentDetail) -> AppResult<()> {
        self.record(BackendCall::Update(detail.clone()))
    }

    async fn soft_delete_student(&self, detail: &StudentDetail) -> AppResult<()> {
        self.record(BackendCall::SoftDelete(detail.clone()))
    }

    async fn update_enrollment_status(&self, update: &EnrollmentStatusUpdate) -> AppResult<()> {
        self.record(BackendCall::UpdateStatus(update.clone()))
    }
}

pub fn student(id: &str, full_name: &str, age: Option<u32>) -> StudentDetail {
    StudentDetail {
        student: Student {
            id: id.to_string(),
            full_name: full_name.to_string(),
            kana: "タロウ".to_string(),
            nick_name: Some(format!("{full_name}-chan")),
            email: format!("{id}@example.com"),
            city: "東京".to_string(),
            age,
            gender: Some(Gender::Male),
            remark: String::new(),
            is_deleted: false,
        },
        student_course_list: vec![course(id, &format!("{id}-c1"), "Javaコース")],
    }
}

pub fn course(student_id: &str, id: &str, name: &str) -> StudentCourse {
    StudentCourse {
        id: id.to_string(),
        student_id: student_id.to_string(),
        course_name: name.to_string(),
        start_date: "2024-04-01".to_string(),
        end_date: "2024-09-30".to_string(),
        enrollment_status: EnrollmentStatus {
            id: format!("{id}-s"),
            student_course_id: id.to_string(),
            status: Status::Provisional,
            created_at: "2024-03-01T10:00:00".to_string(),
        },
    }
}
