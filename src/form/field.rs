use crate::error::{AppError, UnknownFieldSnafu};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StudentField {
    Id,
    FullName,
    Kana,
    NickName,
    Email,
    City,
    Age,
    Gender,
    Remark,
    IsDeleted,
}

impl StudentField {
    pub const ALL: [Self; 10] = [
        Self::Id,
        Self::FullName,
        Self::Kana,
        Self::NickName,
        Self::Email,
        Self::City,
        Self::Age,
        Self::Gender,
        Self::Remark,
        Self::IsDeleted,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FullName => "fullName",
            Self::Kana => "kana",
            Self::NickName => "nickName",
            Self::Email => "email",
            Self::City => "city",
            Self::Age => "age",
            Self::Gender => "gender",
            Self::Remark => "remark",
            Self::IsDeleted => "isDeleted",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CourseField {
    Id,
    StudentId,
    CourseName,
    StartDate,
    EndDate,
    StatusId,
    Status,
    StatusCreatedAt,
}

impl CourseField {
    pub const ALL: [Self; 8] = [
        Self::Id,
        Self::StudentId,
        Self::CourseName,
        Self::StartDate,
        Self::EndDate,
        Self::StatusId,
        Self::Status,
        Self::StatusCreatedAt,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::StudentId => "studentId",
            Self::CourseName => "courseName",
            Self::StartDate => "startDate",
            Self::EndDate => "endDate",
            Self::StatusId => "enrollmentStatus.id",
            Self::Status => "enrollmentStatus.status",
            Self::StatusCreatedAt => "enrollmentStatus.createdAt",
        }
    }
}

/// Address of one draft value, spelled the way form inputs are named:
/// `student.fullName`, `studentCourseList.2.enrollmentStatus.status`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldPath {
    Student(StudentField),
    Course(usize, CourseField),
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student(field) => write!(f, "student.{}", field.key()),
            Self::Course(index, field) => write!(f, "studentCourseList.{index}.{}", field.key()),
        }
    }
}

impl FromStr for FieldPath {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownFieldSnafu { name: s }.build();

        if let Some(key) = s.strip_prefix("student.") {
            return StudentField::ALL
                .into_iter()
                .find(|field| field.key() == key)
                .map(Self::Student)
                .ok_or_else(unknown);
        }

        let (index, key) = s
            .strip_prefix("studentCourseList.")
            .and_then(|rest| rest.split_once('.'))
            .ok_or_else(unknown)?;
        let index: usize = index.parse().map_err(|_| unknown())?;

        CourseField::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .map(|field| Self::Course(index, field))
            .ok_or_else(unknown)
    }
}
