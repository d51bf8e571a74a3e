//! Per-field rules checked before any draft is submitted.
//!
//! Each failing rule yields its own message, and every field is checked, so a form can show all of
//! its problems at once.

use crate::data::{Gender, Status};
use regex::Regex;
use std::{collections::BTreeMap, sync::LazyLock};

#[derive(Debug, Copy, Clone)]
pub enum Rule {
    Required(&'static str),
    /// Only checked on non-empty values, as is `OneOf`. Emptiness belongs to [`Rule::Required`].
    Pattern {
        matches: fn(&str) -> bool,
        message: &'static str,
    },
    IntRange {
        min: i64,
        max: i64,
        not_a_number: &'static str,
        below_min: &'static str,
        above_max: &'static str,
    },
    OneOf {
        allowed: &'static [&'static str],
        message: &'static str,
    },
}

impl Rule {
    pub fn check(&self, value: &str) -> Option<&'static str> {
        match *self {
            Self::Required(message) => value.trim().is_empty().then_some(message),
            Self::Pattern { matches, message } => {
                (!value.is_empty() && !matches(value)).then_some(message)
            }
            Self::IntRange {
                min,
                max,
                not_a_number,
                below_min,
                above_max,
            } => {
                let value = value.trim();
                if value.is_empty() {
                    return None;
                }
                match value.parse::<i64>() {
                    Err(_) => Some(not_a_number),
                    Ok(n) if n < min => Some(below_min),
                    Ok(n) if n > max => Some(above_max),
                    Ok(_) => None,
                }
            }
            Self::OneOf { allowed, message } => {
                (!value.is_empty() && !allowed.contains(&value)).then_some(message)
            }
        }
    }
}

/// Every message produced by `rules` for `value`, in table order.
pub fn check_all(value: &str, rules: &[Rule]) -> Vec<&'static str> {
    rules.iter().filter_map(|rule| rule.check(value)).collect()
}

static KANA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ァ-ヶー\s　]+$").expect("kana pattern is valid"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is valid")
});

pub fn is_katakana(value: &str) -> bool {
    KANA.is_match(value)
}

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

const GENDERS: &[&str] = &[
    Gender::Male.as_str(),
    Gender::Female.as_str(),
    Gender::NonBinary.as_str(),
    "",
];
const STATUSES: &[&str] = &[
    Status::Provisional.as_str(),
    Status::Confirmed.as_str(),
    Status::InProgress.as_str(),
    Status::Completed.as_str(),
];

pub const FULL_NAME: &[Rule] = &[Rule::Required("氏名は必須です")];
pub const KANA_RULES: &[Rule] = &[Rule::Pattern {
    matches: is_katakana,
    message: "カナ名はカタカナとスペースのみを入力してください",
}];
pub const EMAIL_RULES: &[Rule] = &[
    Rule::Required("メールアドレスは必須です"),
    Rule::Pattern {
        matches: is_email,
        message: "正しい形式のメールアドレスを入力してください。",
    },
];
pub const CITY: &[Rule] = &[Rule::Required("居住地域は必須です")];
pub const AGE: &[Rule] = &[Rule::IntRange {
    min: 0,
    max: 150,
    not_a_number: "年齢は整数で入力してください",
    below_min: "年齢は0歳以上である必要があります",
    above_max: "年齢は150歳以下である必要があります",
}];
pub const GENDER: &[Rule] = &[Rule::OneOf {
    allowed: GENDERS,
    message: "性別はMale, Female, NON_BINARY のいずれかを指定してください",
}];
pub const COURSE_NAME: &[Rule] = &[Rule::Required("コース名は必須です")];
pub const START_DATE: &[Rule] = &[Rule::Required("受講開始日は必須です")];
pub const END_DATE: &[Rule] = &[Rule::Required("受講修了予定日は必須です")];
pub const STATUS: &[Rule] = &[
    Rule::Required("申込状況は必須です"),
    Rule::OneOf {
        allowed: STATUSES,
        message: "申込状況は仮申込, 本申込, 受講中, 受講終了 のいずれかを指定してください",
    },
];

/// Messages keyed by field, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<K: Ord>(BTreeMap<K, Vec<&'static str>>);

impl<K: Ord> Default for FieldErrors<K> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<K: Ord> FieldErrors<K> {
    pub fn check(&mut self, field: K, value: &str, rules: &[Rule]) {
        let messages = check_all(value, rules);
        if !messages.is_empty() {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn for_field(&self, field: &K) -> &[&'static str] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[&'static str])> {
        self.0.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn into_result<T>(self, ok: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(ok()) } else { Err(self) }
    }
}
