use jiff::{civil::DateTime, tz::TimeZone, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub kana: String,
    #[serde(default)]
    pub nick_name: Option<String>,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub city: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default, with = "gender_on_the_wire")]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub remark: String,
    #[serde(default)]
    pub is_deleted: bool,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    #[serde(rename = "NON_BINARY")]
    NonBinary,
}

impl Gender {
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::NonBinary];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::NonBinary => "NON_BINARY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|gender| gender.as_str() == s)
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    #[serde(rename = "仮申込")]
    Provisional,
    #[serde(rename = "本申込")]
    Confirmed,
    #[serde(rename = "受講中")]
    InProgress,
    #[serde(rename = "受講終了")]
    Completed,
}

impl Status {
    pub const ALL: [Self; 4] = [
        Self::Provisional,
        Self::Confirmed,
        Self::InProgress,
        Self::Completed,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Provisional => "仮申込",
            Self::Confirmed => "本申込",
            Self::InProgress => "受講中",
            Self::Completed => "受講終了",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentStatus {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub student_course_id: String,
    pub status: Status,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

impl EnrollmentStatus {
    pub fn created_at_display(&self) -> String {
        display_timestamp(&self.created_at)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentCourse {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub student_id: String,
    pub course_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub end_date: String,
    pub enrollment_status: EnrollmentStatus,
}

/// A student together with its ordered course list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetail {
    pub student: Student,
    #[serde(default)]
    pub student_course_list: Vec<StudentCourse>,
}

impl StudentDetail {
    pub fn course(&self, course_id: &str) -> Option<&StudentCourse> {
        self.student_course_list
            .iter()
            .find(|course| course.id == course_id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentStatusUpdate {
    pub student_course_id: String,
    pub status: Status,
}

///backend timestamps are usually `LocalDateTime`s, but accept RFC 3339 too
pub fn display_timestamp(raw: &str) -> String {
    const FORMAT: &str = "%Y/%m/%d %H:%M";

    if let Ok(dt) = raw.parse::<DateTime>() {
        return dt.strftime(FORMAT).to_string();
    }
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return ts.to_zoned(TimeZone::UTC).strftime(FORMAT).to_string();
    }
    raw.to_string()
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

mod gender_on_the_wire {
    use super::Gender;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(gender: &Option<Gender>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(gender.map_or("", Gender::as_str))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Gender>, D::Error> {
        match Option::<String>::deserialize(deserializer)?.as_deref() {
            //the backend defaults records created without a gender to `Unspecified`
            None | Some("" | "Unspecified") => Ok(None),
            Some(other) => Gender::parse(other)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("unknown gender {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decodes_backend_aggregate() {
        let detail: StudentDetail = serde_json::from_value(json!({
            "student": {
                "id": "1",
                "fullName": "山田太郎",
                "kana": "ヤマダタロウ",
                "nickName": null,
                "email": "taro@example.com",
                "city": "東京",
                "age": 30,
                "gender": "NON_BINARY",
                "remark": null,
                "isDeleted": false
            },
            "studentCourseList": [{
                "id": "10",
                "studentId": "1",
                "courseName": "Javaコース",
                "startDate": "2024-04-01",
                "endDate": "2024-09-30",
                "enrollmentStatus": {
                    "id": "100",
                    "studentCourseId": "10",
                    "status": "受講中",
                    "createdAt": "2024-04-01T09:30:00"
                }
            }]
        }))
        .unwrap();

        assert_eq!(detail.student.gender, Some(Gender::NonBinary));
        assert_eq!(detail.student.nick_name, None);
        assert_eq!(detail.student.remark, "");
        assert_eq!(
            detail.student_course_list[0].enrollment_status.status,
            Status::InProgress
        );
        assert_eq!(
            detail.student_course_list[0]
                .enrollment_status
                .created_at_display(),
            "2024/04/01 09:30"
        );
    }

    #[test]
    fn empty_gender_is_unset_and_written_back_empty() {
        let student: Student = serde_json::from_value(json!({
            "fullName": "a",
            "email": "a@b.cd",
            "gender": ""
        }))
        .unwrap();
        assert_eq!(student.gender, None);

        let written = serde_json::to_value(&student).unwrap();
        assert_eq!(written["gender"], json!(""));
        assert!(written.get("id").is_none());
    }

    #[test]
    fn backend_default_gender_is_unset() {
        let list: Vec<StudentDetail> = serde_json::from_value(json!([{
            "student": {
                "id": "2",
                "fullName": "佐藤花子",
                "email": "hanako@example.com",
                "city": "大阪",
                "gender": "Unspecified",
                "isDeleted": false
            },
            "studentCourseList": []
        }]))
        .unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].student.gender, None);
    }

    #[test]
    fn unrecognised_gender_is_still_rejected() {
        let res = serde_json::from_value::<Student>(json!({
            "fullName": "a",
            "email": "a@b.cd",
            "gender": "Other"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let res = serde_json::from_value::<EnrollmentStatus>(json!({ "status": "cancelled" }));
        assert!(res.is_err());
    }

    #[test]
    fn timestamp_display_falls_back_to_raw_text() {
        assert_eq!(display_timestamp("2024-05-06T07:08:09Z"), "2024/05/06 07:08");
        assert_eq!(display_timestamp("yesterday"), "yesterday");
    }
}
