use crate::{
    data::{
        EnrollmentStatus, Gender, Status, Student, StudentBackend, StudentCourse, StudentDetail,
    },
    error::{AppResult, UnknownFieldSnafu},
    form::{
        Draft,
        field::{CourseField, FieldPath, StudentField},
    },
    validation::{self, FieldErrors},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DraftMode {
    Register,
    Edit,
}

impl DraftMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Edit => "edit",
        }
    }
}

/// Whether a conditionally shown input exists on the form, and what it holds.
///
/// `Absent` means the value was never set, so the input isn't rendered at all. `Empty` means the
/// input is rendered but blank, e.g. because the user cleared it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Presence {
    #[default]
    Absent,
    Empty,
    Filled(String),
}

impl Presence {
    pub fn from_input(value: String) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Filled(value)
        }
    }

    pub const fn is_shown(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Filled(value) => value,
            Self::Absent | Self::Empty => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CourseDraft {
    pub id: String,
    pub student_id: String,
    pub course_name: String,
    pub start_date: String,
    pub end_date: String,
    pub status_id: String,
    pub status: String,
    pub status_created_at: String,
}

impl CourseDraft {
    fn field(&self, field: CourseField) -> &str {
        match field {
            CourseField::Id => &self.id,
            CourseField::StudentId => &self.student_id,
            CourseField::CourseName => &self.course_name,
            CourseField::StartDate => &self.start_date,
            CourseField::EndDate => &self.end_date,
            CourseField::StatusId => &self.status_id,
            CourseField::Status => &self.status,
            CourseField::StatusCreatedAt => &self.status_created_at,
        }
    }

    fn field_mut(&mut self, field: CourseField) -> &mut String {
        match field {
            CourseField::Id => &mut self.id,
            CourseField::StudentId => &mut self.student_id,
            CourseField::CourseName => &mut self.course_name,
            CourseField::StartDate => &mut self.start_date,
            CourseField::EndDate => &mut self.end_date,
            CourseField::StatusId => &mut self.status_id,
            CourseField::Status => &mut self.status,
            CourseField::StatusCreatedAt => &mut self.status_created_at,
        }
    }
}

impl From<&StudentCourse> for CourseDraft {
    fn from(course: &StudentCourse) -> Self {
        Self {
            id: course.id.clone(),
            student_id: course.student_id.clone(),
            course_name: course.course_name.clone(),
            start_date: course.start_date.clone(),
            end_date: course.end_date.clone(),
            status_id: course.enrollment_status.id.clone(),
            status: course.enrollment_status.status.as_str().to_string(),
            status_created_at: course.enrollment_status.created_at.clone(),
        }
    }
}

/// Editable copy of a [`StudentDetail`]. Everything is kept as entered so bad input can be shown
/// back next to its error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDraft {
    pub mode: DraftMode,
    pub id: String,
    pub full_name: String,
    pub kana: String,
    pub nick_name: String,
    pub email: String,
    pub city: String,
    pub age: String,
    pub gender: Presence,
    pub remark: String,
    pub is_deleted: bool,
    pub courses: Vec<CourseDraft>,
}

/// What a valid draft turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentSubmission {
    Register(StudentDetail),
    Update(StudentDetail),
}

impl StudentDraft {
    pub fn registration() -> Self {
        Self {
            mode: DraftMode::Register,
            id: String::new(),
            full_name: String::new(),
            kana: String::new(),
            nick_name: String::new(),
            email: String::new(),
            city: String::new(),
            age: "0".to_string(),
            gender: Presence::Empty,
            remark: String::new(),
            is_deleted: false,
            courses: vec![CourseDraft::default()],
        }
    }

    pub fn from_snapshot(detail: &StudentDetail) -> Self {
        let student = &detail.student;
        Self {
            mode: DraftMode::Edit,
            id: student.id.clone(),
            full_name: student.full_name.clone(),
            kana: student.kana.clone(),
            nick_name: student.nick_name.clone().unwrap_or_default(),
            email: student.email.clone(),
            city: student.city.clone(),
            age: student.age.map(|age| age.to_string()).unwrap_or_default(),
            gender: student
                .gender
                .map_or(Presence::Absent, |g| Presence::Filled(g.as_str().to_string())),
            remark: student.remark.clone(),
            is_deleted: student.is_deleted,
            courses: detail.student_course_list.iter().map(CourseDraft::from).collect(),
        }
    }

    /// Rebuilds a draft from posted `(name, value)` pairs. `mode` picks the draft kind; a missing
    /// `student.gender` means the gender input was never rendered.
    pub fn from_form(pairs: &[(String, String)]) -> AppResult<Self> {
        let mut draft = match pairs.iter().find(|(name, _)| name == "mode") {
            Some((_, mode)) if mode == DraftMode::Edit.as_str() => Self {
                mode: DraftMode::Edit,
                age: String::new(),
                ..Self::registration()
            },
            _ => Self::registration(),
        };
        draft.gender = Presence::Absent;
        draft.courses.clear();

        for (name, value) in pairs {
            if name == "mode" {
                continue;
            }
            let path: FieldPath = name.parse()?;
            draft.set(path, value.clone())?;
        }

        Ok(draft)
    }

    pub fn get(&self, path: FieldPath) -> Option<&str> {
        match path {
            FieldPath::Student(field) => Some(match field {
                StudentField::Id => &self.id,
                StudentField::FullName => &self.full_name,
                StudentField::Kana => &self.kana,
                StudentField::NickName => &self.nick_name,
                StudentField::Email => &self.email,
                StudentField::City => &self.city,
                StudentField::Age => &self.age,
                StudentField::Gender => self.gender.value(),
                StudentField::Remark => &self.remark,
                StudentField::IsDeleted => {
                    if self.is_deleted {
                        "true"
                    } else {
                        "false"
                    }
                }
            }),
            FieldPath::Course(index, field) => {
                self.courses.get(index).map(|course| course.field(field))
            }
        }
    }

    /// Writing to the slot just past the end of the course list appends it. Anything further out is
    /// an unknown field.
    pub fn set(&mut self, path: FieldPath, value: String) -> AppResult<()> {
        match path {
            FieldPath::Student(field) => match field {
                StudentField::Id => self.id = value,
                StudentField::FullName => self.full_name = value,
                StudentField::Kana => self.kana = value,
                StudentField::NickName => self.nick_name = value,
                StudentField::Email => self.email = value,
                StudentField::City => self.city = value,
                StudentField::Age => self.age = value,
                StudentField::Gender => self.gender = Presence::from_input(value),
                StudentField::Remark => self.remark = value,
                StudentField::IsDeleted => self.is_deleted = value == "true",
            },
            FieldPath::Course(index, field) => {
                snafu::ensure!(
                    index <= self.courses.len(),
                    UnknownFieldSnafu {
                        name: path.to_string()
                    }
                );
                if index == self.courses.len() {
                    self.courses.push(CourseDraft::default());
                }
                *self.courses[index].field_mut(field) = value;
            }
        }
        Ok(())
    }

    pub fn add_course(&mut self) {
        self.courses.push(CourseDraft {
            student_id: self.id.clone(),
            ..CourseDraft::default()
        });
    }

    /// Removes one slot, leaving the rest in order. Registration drafts always keep one slot.
    pub fn remove_course(&mut self, index: usize) -> AppResult<()> {
        snafu::ensure!(
            index < self.courses.len(),
            UnknownFieldSnafu {
                name: format!("studentCourseList.{index}")
            }
        );
        if self.mode == DraftMode::Register && self.courses.len() == 1 {
            return Ok(());
        }
        self.courses.remove(index);
        Ok(())
    }

    pub fn validate(&self) -> Result<StudentSubmission, FieldErrors<FieldPath>> {
        let mut errors = FieldErrors::default();
        let student = |field| FieldPath::Student(field);

        errors.check(student(StudentField::FullName), &self.full_name, validation::FULL_NAME);
        errors.check(student(StudentField::Kana), &self.kana, validation::KANA_RULES);
        errors.check(student(StudentField::Email), &self.email, validation::EMAIL_RULES);
        errors.check(student(StudentField::City), &self.city, validation::CITY);
        errors.check(student(StudentField::Age), &self.age, validation::AGE);
        errors.check(student(StudentField::Gender), self.gender.value(), validation::GENDER);

        for (index, course) in self.courses.iter().enumerate() {
            let at = |field| FieldPath::Course(index, field);
            errors.check(at(CourseField::CourseName), &course.course_name, validation::COURSE_NAME);
            errors.check(at(CourseField::StartDate), &course.start_date, validation::START_DATE);
            errors.check(at(CourseField::EndDate), &course.end_date, validation::END_DATE);
            errors.check(at(CourseField::Status), &course.status, validation::STATUS);
        }

        errors.into_result(|| {
            let detail = self.to_detail();
            match self.mode {
                DraftMode::Register => StudentSubmission::Register(detail),
                DraftMode::Edit => StudentSubmission::Update(detail),
            }
        })
    }

    ///only called once validation has passed, so the parses here can't fail
    fn to_detail(&self) -> StudentDetail {
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.trim().to_string());

        StudentDetail {
            student: Student {
                id: self.id.clone(),
                full_name: self.full_name.trim().to_string(),
                kana: self.kana.clone(),
                nick_name: non_empty(&self.nick_name),
                email: self.email.trim().to_string(),
                city: self.city.trim().to_string(),
                age: self.age.trim().parse().ok(),
                gender: Gender::parse(self.gender.value()),
                remark: self.remark.clone(),
                is_deleted: self.is_deleted,
            },
            student_course_list: self
                .courses
                .iter()
                .filter_map(|course| {
                    Some(StudentCourse {
                        id: course.id.clone(),
                        student_id: course.student_id.clone(),
                        course_name: course.course_name.trim().to_string(),
                        start_date: course.start_date.clone(),
                        end_date: course.end_date.clone(),
                        enrollment_status: EnrollmentStatus {
                            id: course.status_id.clone(),
                            student_course_id: course.id.clone(),
                            status: Status::parse(&course.status)?,
                            created_at: course.status_created_at.clone(),
                        },
                    })
                })
                .collect(),
        }
    }
}

impl Draft for StudentDraft {
    type Field = FieldPath;
    type Valid = StudentSubmission;
    type Saved = StudentDetail;

    fn validate(&self) -> Result<Self::Valid, FieldErrors<FieldPath>> {
        Self::validate(self)
    }

    async fn transmit<B: StudentBackend>(valid: Self::Valid, backend: &B) -> AppResult<Self::Saved> {
        match valid {
            StudentSubmission::Register(detail) => {
                info!(name = %detail.student.full_name, "Registering student");
                backend.register_student(&detail).await
            }
            StudentSubmission::Update(detail) => {
                info!(id = %detail.student.id, "Updating student");
                backend.update_student(&detail).await?;
                Ok(detail)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::testing::{course, student},
        error::AppError,
    };
    use pretty_assertions::assert_eq;

    fn filled_registration() -> StudentDraft {
        let mut draft = StudentDraft::registration();
        draft.full_name = "山田太郎".to_string();
        draft.kana = "ヤマダ タロウ".to_string();
        draft.email = "taro@example.com".to_string();
        draft.city = "東京".to_string();
        draft.age = "30".to_string();
        draft.courses[0] = CourseDraft {
            course_name: "Javaコース".to_string(),
            start_date: "2024-04-01".to_string(),
            end_date: "2024-09-30".to_string(),
            status: "仮申込".to_string(),
            ..CourseDraft::default()
        };
        draft
    }

    #[test]
    fn registration_starts_with_one_empty_course() {
        let draft = StudentDraft::registration();
        assert_eq!(draft.courses, vec![CourseDraft::default()]);
        assert_eq!(draft.gender, Presence::Empty);
        assert_eq!(draft.age, "0");
        assert!(draft.full_name.is_empty());
    }

    #[test]
    fn snapshot_copy_hides_unset_gender() {
        let mut detail = student("1", "山田太郎", Some(30));
        let draft = StudentDraft::from_snapshot(&detail);
        assert_eq!(draft.gender, Presence::Filled("Male".to_string()));
        assert_eq!(draft.courses[0].status, "仮申込");

        detail.student.gender = None;
        assert_eq!(StudentDraft::from_snapshot(&detail).gender, Presence::Absent);
    }

    #[test]
    fn empty_full_name_fails() {
        let mut draft = filled_registration();
        draft.full_name = String::new();

        let errors = draft.validate().unwrap_err();
        assert_eq!(
            errors.for_field(&FieldPath::Student(StudentField::FullName)),
            &["氏名は必須です"]
        );
    }

    #[test]
    fn hiragana_kana_fails_and_katakana_passes() {
        let mut draft = filled_registration();
        draft.kana = "あいう".to_string();
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(!errors.for_field(&FieldPath::Student(StudentField::Kana)).is_empty());

        draft.kana = "アイウ".to_string();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn every_course_is_validated() {
        let mut draft = filled_registration();
        draft.add_course();
        draft
            .set(FieldPath::Course(1, CourseField::CourseName), "AWSコース".to_string())
            .unwrap();

        let errors = draft.validate().unwrap_err();
        let failing: Vec<FieldPath> = errors.iter().map(|(path, _)| *path).collect();
        assert_eq!(
            failing,
            vec![
                FieldPath::Course(1, CourseField::StartDate),
                FieldPath::Course(1, CourseField::EndDate),
                FieldPath::Course(1, CourseField::Status),
            ]
        );
    }

    #[test]
    fn all_failures_are_reported_together() {
        let mut draft = StudentDraft::registration();
        draft.age = "200".to_string();
        draft.gender = Presence::Filled("Other".to_string());

        let errors = draft.validate().unwrap_err();
        // full name, email, city, age, gender, and four course fields
        assert_eq!(errors.len(), 9);
    }

    #[test]
    fn valid_registration_becomes_register_submission() {
        let submission = filled_registration().validate().unwrap();
        let StudentSubmission::Register(detail) = submission else {
            panic!("expected a registration");
        };
        assert_eq!(detail.student.age, Some(30));
        assert_eq!(detail.student.gender, None);
        assert_eq!(detail.student.nick_name, None);
        assert_eq!(detail.student_course_list.len(), 1);
        assert_eq!(
            detail.student_course_list[0].enrollment_status.status,
            Status::Provisional
        );
    }

    #[test]
    fn unedited_snapshot_round_trips() {
        let detail = student("1", "山田太郎", Some(30));
        let submission = StudentDraft::from_snapshot(&detail).validate().unwrap();
        assert_eq!(submission, StudentSubmission::Update(detail));
    }

    #[test]
    fn removing_a_course_keeps_the_others_in_order() {
        let mut detail = student("1", "山田太郎", Some(30));
        detail.student_course_list = vec![
            course("1", "a", "Java"),
            course("1", "b", "AWS"),
            course("1", "c", "Design"),
        ];
        let mut draft = StudentDraft::from_snapshot(&detail);
        draft.remove_course(1).unwrap();

        let ids: Vec<&str> = draft.courses.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(draft.get(FieldPath::Course(1, CourseField::CourseName)), Some("Design"));
        assert!(draft.remove_course(5).is_err());
    }

    #[test]
    fn registration_keeps_its_last_course_slot() {
        let mut draft = StudentDraft::registration();
        draft.remove_course(0).unwrap();
        assert_eq!(draft.courses.len(), 1);
    }

    #[test]
    fn form_pairs_rebuild_the_draft() {
        let detail = student("1", "山田太郎", Some(30));
        let original = StudentDraft::from_snapshot(&detail);

        let mut pairs = vec![("mode".to_string(), "edit".to_string())];
        for field in StudentField::ALL {
            let path = FieldPath::Student(field);
            pairs.push((path.to_string(), original.get(path).unwrap().to_string()));
        }
        for field in CourseField::ALL {
            let path = FieldPath::Course(0, field);
            pairs.push((path.to_string(), original.get(path).unwrap().to_string()));
        }

        assert_eq!(StudentDraft::from_form(&pairs).unwrap(), original);
    }

    #[test]
    fn form_without_gender_input_keeps_it_absent() {
        let pairs = vec![
            ("mode".to_string(), "edit".to_string()),
            ("student.fullName".to_string(), "山田太郎".to_string()),
        ];
        let draft = StudentDraft::from_form(&pairs).unwrap();
        assert_eq!(draft.mode, DraftMode::Edit);
        assert_eq!(draft.gender, Presence::Absent);
        assert!(draft.courses.is_empty());
    }

    #[test]
    fn unknown_form_field_is_an_error() {
        let pairs = vec![("student.password".to_string(), "hunter2".to_string())];
        assert!(StudentDraft::from_form(&pairs).is_err());
    }

    #[test]
    fn course_index_past_the_next_slot_is_an_error() {
        for index in [2, 100_000_000, usize::MAX] {
            let pairs = vec![
                ("mode".to_string(), "register".to_string()),
                ("studentCourseList.0.courseName".to_string(), "Javaコース".to_string()),
                (format!("studentCourseList.{index}.courseName"), "AWSコース".to_string()),
            ];
            let err = StudentDraft::from_form(&pairs).unwrap_err();
            assert!(matches!(err, AppError::UnknownField { .. }), "{index}: {err:?}");
        }
    }

    #[test]
    fn next_course_slot_is_appended() {
        let mut draft = StudentDraft::registration();
        draft
            .set(FieldPath::Course(1, CourseField::CourseName), "AWSコース".to_string())
            .unwrap();
        assert_eq!(draft.courses.len(), 2);
        assert_eq!(draft.courses[1].course_name, "AWSコース");

        assert!(
            draft
                .set(FieldPath::Course(3, CourseField::CourseName), String::new())
                .is_err()
        );
        assert_eq!(draft.courses.len(), 2);
    }

    #[test]
    fn cleared_gender_is_sent_as_unset() {
        let detail = student("1", "山田太郎", Some(30));
        let mut draft = StudentDraft::from_snapshot(&detail);
        draft
            .set(FieldPath::Student(StudentField::Gender), String::new())
            .unwrap();
        assert_eq!(draft.gender, Presence::Empty);

        let StudentSubmission::Update(updated) = draft.validate().unwrap() else {
            panic!("expected an update");
        };
        assert_eq!(updated.student.gender, None);
    }
}
