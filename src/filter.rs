//! Client-side narrowing of the fetched student list by the nine filter-bar fields.

use crate::data::{Student, StudentDetail};
use serde::Deserialize;

/// Filter-bar contents. Every field is free text; an empty field is an inactive criterion.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    pub full_name: String,
    pub kana: String,
    pub nick_name: String,
    pub email: String,
    pub city: String,
    pub max_age: String,
    pub min_age: String,
    pub gender: String,
    pub remark: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    FullName,
    Kana,
    NickName,
    Email,
    City,
    Remark,
}

impl TextField {
    fn of(self, student: &Student) -> Option<&str> {
        match self {
            Self::FullName => Some(&student.full_name),
            Self::Kana => Some(&student.kana),
            Self::NickName => student.nick_name.as_deref(),
            Self::Email => Some(&student.email),
            Self::City => Some(&student.city),
            Self::Remark => Some(&student.remark),
        }
    }
}

/// One active predicate over a single student field.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Contains(TextField, String),
    GenderIs(String),
    MaxAge(f64),
    MinAge(f64),
}

impl Criterion {
    pub fn matches(&self, student: &Student) -> bool {
        match self {
            Self::Contains(field, needle) => field
                .of(student)
                .is_some_and(|haystack| haystack.contains(needle.as_str())),
            Self::GenderIs(gender) => student.gender.is_some_and(|g| g.as_str() == gender),
            Self::MaxAge(max) => student.age.is_some_and(|age| f64::from(age) <= *max),
            Self::MinAge(min) => student.age.is_some_and(|age| f64::from(age) >= *min),
        }
    }
}

///non-numeric bounds are ignored rather than filtering everything out
fn parse_bound(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

impl FilterCriteria {
    pub fn active_criteria(&self) -> Vec<Criterion> {
        let text = [
            (TextField::FullName, &self.full_name),
            (TextField::Kana, &self.kana),
            (TextField::NickName, &self.nick_name),
            (TextField::Email, &self.email),
            (TextField::City, &self.city),
            (TextField::Remark, &self.remark),
        ];

        let mut criteria: Vec<Criterion> = text
            .into_iter()
            .filter(|(_, needle)| !needle.is_empty())
            .map(|(field, needle)| Criterion::Contains(field, needle.clone()))
            .collect();

        if !self.gender.is_empty() {
            criteria.push(Criterion::GenderIs(self.gender.clone()));
        }
        if let Some(max) = parse_bound(&self.max_age) {
            criteria.push(Criterion::MaxAge(max));
        }
        if let Some(min) = parse_bound(&self.min_age) {
            criteria.push(Criterion::MinAge(min));
        }

        criteria
    }

    pub fn is_inactive(&self) -> bool {
        self.active_criteria().is_empty()
    }
}

/// Keeps the records that satisfy every criterion, in their original order.
pub fn apply_criteria<'a>(all: &'a [StudentDetail], criteria: &[Criterion]) -> Vec<&'a StudentDetail> {
    all.iter()
        .filter(|detail| criteria.iter().all(|c| c.matches(&detail.student)))
        .collect()
}

/// `None` means the list hasn't been fetched yet, which yields no rows rather than an error.
pub fn apply_filters<'a>(
    all: Option<&'a [StudentDetail]>,
    criteria: &FilterCriteria,
) -> Vec<&'a StudentDetail> {
    all.map_or_else(Vec::new, |all| apply_criteria(all, &criteria.active_criteria()))
}
