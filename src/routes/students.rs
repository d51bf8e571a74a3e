use crate::{
    data::{Gender, StudentBackend, StudentDetail},
    error::AppResult,
    filter::{FilterCriteria, apply_filters},
    form::{Confirmation, DeleteOutcome, soft_delete},
    maud_conveniences::{
        DANGER_BUTTON_CLASS, INPUT_CLASS, SECONDARY_BUTTON_CLASS, SUBMIT_BUTTON_CLASS, escape,
        notice, render_table, title,
    },
    routes::refresh::{Fragment, STUDENTS_CHANGED},
    state::AppState,
};
use axum::extract::{Query, State};
use maud::{Markup, html};
use serde::Deserialize;
use serde_json::json;

/// Everything the list page shows for one request.
#[derive(Debug)]
pub struct ListPageState {
    pub criteria: FilterCriteria,
    /// `None` until the backend has answered.
    pub students: Option<Vec<StudentDetail>>,
}

impl ListPageState {
    pub const fn new(criteria: FilterCriteria, students: Option<Vec<StudentDetail>>) -> Self {
        Self { criteria, students }
    }

    pub fn visible(&self) -> Vec<&StudentDetail> {
        apply_filters(self.students.as_deref(), &self.criteria)
    }
}

pub async fn get_students(
    State(state): State<AppState>,
    Query(criteria): Query<FilterCriteria>,
) -> Markup {
    state.render(html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-7xl w-full flex flex-col space-y-4" {
            div class="container flex flex-col space-y-4" {
                div class="flex flex-row items-center justify-between" {
                    (title("受講生一覧"))
                    div class="flex flex-row space-x-2" {
                        a href="/" class=(SECONDARY_BUTTON_CLASS) {"トップへ"}
                        button class=(SUBMIT_BUTTON_CLASS) hx-get="/internal/students/register" hx-target="#in_focus" {
                            "新規登録"
                        }
                    }
                }
                div id="in_focus" {}
                (render_filter_bar(&criteria))
                div id="student_table" hx-get="/internal/students" hx-include="#filter_bar" hx-trigger="load" hx-swap="outerHTML" {
                    p class="text-gray-400 italic text-center p-4" {"読み込み中..."}
                }
            }
        }
    })
}

pub fn render_filter_bar(criteria: &FilterCriteria) -> Markup {
    let text_input = |name: &str, label: &str, value: &str, input_type: &str| {
        html! {
            div {
                label for=(name) class="block text-sm font-bold mb-1" {(label)}
                input type=(input_type) id=(name) name=(name) value=(value) class=(INPUT_CLASS);
            }
        }
    };

    html! {
        form id="filter_bar" hx-get="/internal/students" hx-target="#student_table" hx-swap="outerHTML" hx-trigger="input changed delay:300ms, change" class="grid grid-cols-2 md:grid-cols-5 gap-4 items-end" {
            (text_input("fullName", "氏名", &criteria.full_name, "text"))
            (text_input("kana", "カナ名", &criteria.kana, "text"))
            (text_input("nickName", "ニックネーム", &criteria.nick_name, "text"))
            (text_input("email", "メールアドレス", &criteria.email, "text"))
            (text_input("city", "居住地域", &criteria.city, "text"))
            (text_input("maxAge", "最大年齢", &criteria.max_age, "number"))
            (text_input("minAge", "最小年齢", &criteria.min_age, "number"))
            div {
                label for="gender" class="block text-sm font-bold mb-1" {"性別"}
                select id="gender" name="gender" class=(INPUT_CLASS) {
                    option value="" selected[criteria.gender.is_empty()] {"すべて"}
                    @for gender in Gender::ALL {
                        option value=(gender.as_str()) selected[criteria.gender == gender.as_str()] {(gender)}
                    }
                }
            }
            (text_input("remark", "備考", &criteria.remark, "text"))
            //a plain reload drops every criterion
            a href="/students" class={(SECONDARY_BUTTON_CLASS) " text-center"} {"リセット"}
        }
    }
}

pub async fn internal_get_students<B: StudentBackend>(
    State(state): State<AppState<B>>,
    Query(criteria): Query<FilterCriteria>,
) -> AppResult<Markup> {
    let students = state.list_students().await?;
    let page = ListPageState::new(criteria, Some(students));

    Ok(render_student_table(&page))
}

pub fn render_student_table(page: &ListPageState) -> Markup {
    let rows: Vec<_> = page
        .visible()
        .into_iter()
        .map(|detail| {
            let student = &detail.student;
            [
                html! {
                    a href={"/students/" (student.id)} class="hover:text-blue-400 underline" {(student.full_name)}
                },
                escape(&student.kana),
                escape(student.nick_name.as_deref().unwrap_or_default()),
                escape(&student.email),
                escape(&student.city),
                escape(student.age.map(|age| age.to_string()).unwrap_or_default()),
                escape(student.gender.map(|g| g.as_str()).unwrap_or_default()),
                escape(&student.remark),
                html! {
                    button class=(DANGER_BUTTON_CLASS)
                        hx-delete="/students"
                        hx-vals=(delete_vals(&student.id))
                        hx-confirm={(student.full_name) "さんを本当に削除してよろしいですか？"}
                        hx-target="#in_focus" {
                        "削除"
                    }
                },
            ]
        })
        .collect();
    let is_empty = rows.is_empty();
    let empty_message = if page.criteria.is_inactive() {
        "受講生が登録されていません"
    } else {
        "条件に一致する受講生はいません"
    };

    html! {
        div id="student_table" hx-get="/internal/students" hx-include="#filter_bar" hx-trigger={(STUDENTS_CHANGED) " from:body"} hx-swap="outerHTML" {
            (render_table(
                "受講生",
                ["氏名", "カナ名", "ニックネーム", "メールアドレス", "居住地域", "年齢", "性別", "備考", "操作"],
                rows,
            ))
            @if is_empty && page.students.is_some() {
                p class="text-gray-400 italic text-center p-4" {(empty_message)}
            }
        }
    }
}

/// Query values sent by a row's delete button, once the browser's confirm prompt was accepted.
fn delete_vals(id: &str) -> String {
    json!({ "id": id, "confirmed": true }).to_string()
}

#[derive(Deserialize)]
pub struct DeleteQuery {
    id: String,
    #[serde(default)]
    confirmed: bool,
}

pub async fn delete_student<B: StudentBackend>(
    State(state): State<AppState<B>>,
    Query(DeleteQuery { id, confirmed }): Query<DeleteQuery>,
) -> AppResult<Fragment> {
    let confirmation = Confirmation::from(confirmed);
    if confirmation == Confirmation::Declined {
        return Ok(Fragment::unchanged(html! {}));
    }

    let detail = state.get_student(&id).await?;
    Ok(match soft_delete(&*state, &detail, confirmation).await? {
        DeleteOutcome::Declined => Fragment::unchanged(html! {}),
        DeleteOutcome::Deleted => {
            let deleted = format!("{}さんを削除しました", detail.student.full_name);
            Fragment::students_changed(notice(&[
                deleted.as_str(),
                "データの復旧を希望の場合は管理者にお問い合わせください",
            ]))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testing::{BackendCall, RecordingBackend, student};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn backend_with_two() -> Arc<RecordingBackend> {
        Arc::new(RecordingBackend::with_students(vec![
            student("1", "山田太郎", Some(30)),
            student("2", "佐藤花子", Some(25)),
        ]))
    }

    fn page(criteria: FilterCriteria) -> ListPageState {
        ListPageState::new(
            criteria,
            Some(vec![
                student("1", "山田太郎", Some(30)),
                student("2", "佐藤花子", Some(25)),
            ]),
        )
    }

    #[test]
    fn table_shows_only_matching_rows() {
        let html = render_student_table(&page(FilterCriteria {
            full_name: "山田".to_string(),
            ..FilterCriteria::default()
        }))
        .into_string();

        assert!(html.contains("山田太郎"));
        assert!(!html.contains("佐藤花子"));
        assert!(html.contains("山田太郎さんを本当に削除してよろしいですか？"));
        assert!(html.contains(r#"href="/students/1""#));
    }

    #[test]
    fn empty_result_says_why() {
        let html = render_student_table(&page(FilterCriteria {
            city: "札幌".to_string(),
            ..FilterCriteria::default()
        }))
        .into_string();
        assert!(html.contains("条件に一致する受講生はいません"));

        let html = render_student_table(&ListPageState::new(FilterCriteria::default(), Some(vec![])))
            .into_string();
        assert!(html.contains("受講生が登録されていません"));
    }

    #[test]
    fn unfetched_page_has_no_rows() {
        let page = ListPageState::new(FilterCriteria::default(), None);
        assert!(page.visible().is_empty());
        assert!(!render_student_table(&page).into_string().contains("<td"));
    }

    #[test]
    fn filter_bar_keeps_entered_criteria() {
        let criteria = FilterCriteria {
            city: "大阪".to_string(),
            gender: "Female".to_string(),
            ..FilterCriteria::default()
        };
        let html = render_filter_bar(&criteria).into_string();
        assert!(html.contains(r#"value="大阪""#));
        assert!(html.contains(r#"<option value="Female" selected>"#));
    }

    #[test]
    fn visible_keeps_backend_order() {
        let page = page(FilterCriteria::default());
        let ids: Vec<&str> = page
            .visible()
            .into_iter()
            .map(|d| d.student.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn delete_vals_survive_awkward_ids() {
        let vals: serde_json::Value = serde_json::from_str(&delete_vals(r#"a"b\c"#)).unwrap();
        assert_eq!(vals, json!({ "id": r#"a"b\c"#, "confirmed": true }));
    }

    #[tokio::test]
    async fn table_fragment_is_filtered_and_refreshes_on_change() {
        let backend = backend_with_two();
        let criteria = FilterCriteria {
            min_age: "26".to_string(),
            ..FilterCriteria::default()
        };

        let html = internal_get_students(State(AppState::with_backend(backend.clone())), Query(criteria))
            .await
            .unwrap()
            .into_string();
        assert!(html.contains("山田太郎"));
        assert!(!html.contains("佐藤花子"));
        assert!(html.contains(r#"hx-trigger="students_changed from:body""#));
        assert_eq!(backend.calls(), vec![BackendCall::List]);
    }

    #[tokio::test]
    async fn declined_delete_never_reaches_the_backend() {
        let backend = backend_with_two();
        let query = DeleteQuery {
            id: "1".to_string(),
            confirmed: false,
        };

        let fragment = delete_student(State(AppState::with_backend(backend.clone())), Query(query))
            .await
            .unwrap();
        assert!(!fragment.students_changed);
        assert!(fragment.markup.into_string().is_empty());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn confirmed_delete_flags_one_record_and_refreshes() {
        let backend = backend_with_two();
        let query = DeleteQuery {
            id: "1".to_string(),
            confirmed: true,
        };

        let fragment = delete_student(State(AppState::with_backend(backend.clone())), Query(query))
            .await
            .unwrap();
        assert!(fragment.students_changed);
        let html = fragment.markup.into_string();
        assert!(html.contains("山田太郎さんを削除しました"));
        assert!(html.contains("データの復旧を希望の場合は管理者にお問い合わせください"));

        let mut flagged = student("1", "山田太郎", Some(30));
        flagged.student.is_deleted = true;
        assert_eq!(
            backend.calls(),
            vec![BackendCall::Get("1".to_string()), BackendCall::SoftDelete(flagged)]
        );
    }

    #[tokio::test]
    async fn rejected_delete_is_an_error_without_refresh() {
        let backend = Arc::new(RecordingBackend::rejecting("削除できません"));
        let query = DeleteQuery {
            id: "1".to_string(),
            confirmed: true,
        };

        let err = delete_student(State(AppState::with_backend(backend)), Query(query))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "削除できません");
    }
}
