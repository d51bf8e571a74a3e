use crate::{
    data::{StudentBackend, StudentDetail},
    error::AppResult,
    maud_conveniences::{SECONDARY_BUTTON_CLASS, SUBMIT_BUTTON_CLASS, escape, loading, render_table, title},
    routes::refresh::STUDENTS_CHANGED,
    state::AppState,
};
use axum::extract::{Path, State};
use maud::{Markup, html};

pub async fn get_student_page(State(state): State<AppState>, Path(id): Path<String>) -> Markup {
    state.render(html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-7xl w-full flex flex-col space-y-4" {
            div class="container flex flex-col space-y-4" {
                div class="flex flex-row items-center justify-between" {
                    (title("受講生詳細"))
                    div class="flex flex-row space-x-2" {
                        a href="/students" class=(SECONDARY_BUTTON_CLASS) {"一覧へ戻る"}
                        button class=(SUBMIT_BUTTON_CLASS) hx-get={"/internal/students/" (id) "/edit"} hx-target="#in_focus" {
                            "編集"
                        }
                    }
                }
                div id="in_focus" {}
                (loading(&format!("/internal/students/{id}")))
            }
        }
    })
}

pub async fn internal_get_student_detail<B: StudentBackend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let detail = state.get_student(&id).await?;
    Ok(render_student_detail(&detail))
}

pub fn render_student_detail(detail: &StudentDetail) -> Markup {
    let student = &detail.student;

    let info = render_table(
        "基本情報",
        ["氏名", "カナ名", "ニックネーム", "メールアドレス", "居住地域", "年齢", "性別", "備考"],
        vec![[
            escape(&student.full_name),
            escape(&student.kana),
            escape(student.nick_name.as_deref().unwrap_or_default()),
            escape(&student.email),
            escape(&student.city),
            escape(student.age.map(|age| age.to_string()).unwrap_or_default()),
            escape(student.gender.map(|g| g.as_str()).unwrap_or_default()),
            escape(&student.remark),
        ]],
    );

    let courses = render_table(
        "受講コース",
        ["受講コース名", "受講開始日", "受講修了予定日", "申込状況", "申込状況更新日時", "申込状況更新"],
        detail
            .student_course_list
            .iter()
            .map(|course| {
                [
                    escape(&course.course_name),
                    escape(&course.start_date),
                    escape(&course.end_date),
                    escape(course.enrollment_status.status.as_str()),
                    escape(course.enrollment_status.created_at_display()),
                    html! {
                        button class=(SECONDARY_BUTTON_CLASS) hx-get={"/internal/students/" (student.id) "/courses/" (course.id) "/status"} hx-target="#in_focus" {
                            "更新"
                        }
                    },
                ]
            })
            .collect(),
    );

    html! {
        div hx-get={"/internal/students/" (student.id)} hx-trigger={(STUDENTS_CHANGED) " from:body"} hx-swap="outerHTML" class="flex flex-col space-y-8" {
            (info)
            (courses)
        }
    }
}
