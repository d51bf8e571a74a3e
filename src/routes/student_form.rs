//! The student dialog, shared by registration and editing.
//!
//! The draft lives in the browser as form fields. Every action posts all of them back, and the
//! handler rebuilds the dialog from them before re-rendering.

use crate::{
    data::{Gender, Status, StudentBackend},
    error::AppResult,
    form::{
        CourseField, Dialog, DialogState, DraftMode, FieldPath, StudentDraft, StudentField, SubmitOutcome,
    },
    maud_conveniences::{
        DANGER_BUTTON_CLASS, INPUT_CLASS, SECONDARY_BUTTON_CLASS, SUBMIT_BUTTON_CLASS, alert,
        field_errors, form_element, notice, select_form_element, simple_form_element, title,
    },
    routes::refresh::Fragment,
    state::AppState,
};
use axum::{
    Form,
    extract::{Path, Query, State},
};
use maud::{Markup, html};
use serde::Deserialize;

type PostedFields = Form<Vec<(String, String)>>;

const GENDER_OPTIONS: [&str; 3] = [
    Gender::Male.as_str(),
    Gender::Female.as_str(),
    Gender::NonBinary.as_str(),
];
const STATUS_OPTIONS: [&str; 4] = [
    Status::Provisional.as_str(),
    Status::Confirmed.as_str(),
    Status::InProgress.as_str(),
    Status::Completed.as_str(),
];

///edit dialogs reset by re-fetching, so only registration needs a real initial draft here
fn resume_posted(draft: StudentDraft) -> Dialog<StudentDraft> {
    let initial = match draft.mode {
        DraftMode::Register => StudentDraft::registration(),
        DraftMode::Edit => draft.clone(),
    };
    Dialog::resume(initial, draft)
}

/// Renders nothing once the dialog is closed.
pub fn render_student_form(dialog: &Dialog<StudentDraft>) -> Markup {
    if !dialog.is_open() {
        return html! {};
    }
    let draft = dialog.draft();
    let errors = dialog.errors();
    let is_edit = draft.mode == DraftMode::Edit;

    let value = |path: FieldPath| draft.get(path).unwrap_or_default().to_string();
    let text_input = |field: StudentField, label: &str, required: bool, input_type: Option<&str>| {
        let path = FieldPath::Student(field);
        simple_form_element(
            &path.to_string(),
            label,
            required,
            input_type,
            &value(path),
            errors.for_field(&path),
        )
    };

    let (heading, submit_label) = if is_edit {
        ("受講生情報編集", "更新")
    } else {
        ("新規受講生登録", "登録")
    };
    let (hx_put, hx_post) = if is_edit {
        (None, Some(format!("/internal/students/{}/edit", draft.id)))
    } else {
        (Some("/internal/students/register".to_string()), None)
    };

    html! {
        div class="bg-gray-800 p-6 rounded shadow-md w-full" {
            (title(heading))

            @if let Some(server_error) = dialog.server_error() {
                (alert(server_error))
            }

            form hx-put=[hx_put] hx-post=[hx_post] hx-trigger="submit" hx-target="#in_focus" class="p-4" {
                input type="hidden" name="mode" value=(draft.mode.as_str());
                @if is_edit {
                    input type="hidden" name=(FieldPath::Student(StudentField::Id).to_string()) value=(draft.id);
                    input type="hidden" name=(FieldPath::Student(StudentField::IsDeleted).to_string()) value=(value(FieldPath::Student(StudentField::IsDeleted)));
                }

                div class="grid grid-cols-1 md:grid-cols-2 gap-x-4" {
                    (text_input(StudentField::FullName, "氏名", true, None))
                    (text_input(StudentField::Kana, "カナ名", false, None))
                    (text_input(StudentField::NickName, "ニックネーム", false, None))
                    (text_input(StudentField::Email, "メールアドレス", true, Some("email")))
                    (text_input(StudentField::City, "居住地域", true, None))
                    (text_input(StudentField::Age, "年齢", false, Some("number")))
                    @if draft.gender.is_shown() {
                        @let path = FieldPath::Student(StudentField::Gender);
                        (select_form_element(
                            &path.to_string(),
                            "性別",
                            &GENDER_OPTIONS,
                            Some("未設定"),
                            draft.gender.value(),
                            errors.for_field(&path),
                        ))
                    }
                }
                (form_element(
                    &FieldPath::Student(StudentField::Remark).to_string(),
                    "備考",
                    &[],
                    html! {
                        textarea id=(FieldPath::Student(StudentField::Remark).to_string()) name=(FieldPath::Student(StudentField::Remark).to_string()) class=(INPUT_CLASS) {
                            (draft.remark)
                        }
                    },
                ))

                h2 class="text-xl font-semibold mb-2" {"受講コース"}
                @for index in 0..draft.courses.len() {
                    (render_course(dialog, index))
                }
                button type="button" class={(SECONDARY_BUTTON_CLASS) " mb-4"} hx-post="/internal/students/form/courses/add" hx-include="closest form" hx-target="#in_focus" {
                    "コースを追加"
                }

                div class="flex items-center justify-between" {
                    button type="submit" class=(SUBMIT_BUTTON_CLASS) {(submit_label)}
                    div class="flex flex-row space-x-2" {
                        button type="button" class=(SECONDARY_BUTTON_CLASS) hx-post="/internal/students/form/reset" hx-include="closest form" hx-target="#in_focus" disabled[dialog.state() == DialogState::Pristine] {"リセット"}
                        button type="button" class=(SECONDARY_BUTTON_CLASS) hx-post="/internal/students/form/cancel" hx-include="closest form" hx-target="#in_focus" {"キャンセル"}
                    }
                }
            }
        }
    }
}

fn render_course(dialog: &Dialog<StudentDraft>, index: usize) -> Markup {
    let draft = dialog.draft();
    let errors = dialog.errors();
    let is_edit = draft.mode == DraftMode::Edit;
    let can_remove = is_edit || draft.courses.len() > 1;
    let is_saved_course = is_edit && !draft.courses[index].id.is_empty();

    let at = |field| FieldPath::Course(index, field);
    let value = |field| draft.get(at(field)).unwrap_or_default().to_string();
    let input = |field: CourseField, label: &str, input_type: Option<&str>| {
        simple_form_element(
            &at(field).to_string(),
            label,
            true,
            input_type,
            &value(field),
            errors.for_field(&at(field)),
        )
    };
    let hidden = |field: CourseField| {
        html! {
            input type="hidden" name=(at(field).to_string()) value=(value(field));
        }
    };

    html! {
        div class="border border-gray-600 rounded p-4 mb-4" {
            (hidden(CourseField::Id))
            (hidden(CourseField::StudentId))
            (hidden(CourseField::StatusId))
            (hidden(CourseField::StatusCreatedAt))

            div class="grid grid-cols-1 md:grid-cols-2 gap-x-4" {
                (input(CourseField::CourseName, "コース名", None))
                (input(CourseField::StartDate, "受講開始日", Some("date")))
                (input(CourseField::EndDate, "受講修了予定日", Some("date")))
                //saved courses change status through their own dialog
                @if is_saved_course {
                    (hidden(CourseField::Status))
                    (field_errors(errors.for_field(&at(CourseField::Status))))
                } @else {
                    (select_form_element(
                        &at(CourseField::Status).to_string(),
                        "申込状況",
                        &STATUS_OPTIONS,
                        Some("選択してください"),
                        &value(CourseField::Status),
                        errors.for_field(&at(CourseField::Status)),
                    ))
                }
            }

            @if can_remove {
                button type="button" class=(DANGER_BUTTON_CLASS) hx-post={"/internal/students/form/courses/remove?index=" (index)} hx-include="closest form" hx-target="#in_focus" {
                    "コースを削除"
                }
            }
        }
    }
}

pub async fn internal_get_register_form() -> Markup {
    let mut dialog = Dialog::new(StudentDraft::registration());
    dialog.open();
    render_student_form(&dialog)
}

pub async fn internal_put_register<B: StudentBackend>(
    State(state): State<AppState<B>>,
    Form(fields): PostedFields,
) -> AppResult<Fragment> {
    let mut draft = StudentDraft::from_form(&fields)?;
    draft.mode = DraftMode::Register;

    let mut dialog = resume_posted(draft);
    Ok(match dialog.submit(&*state).await {
        SubmitOutcome::Saved(created) => Fragment::students_changed(notice(&[
            format!("{}さんを登録しました", created.student.full_name).as_str(),
        ])),
        SubmitOutcome::Invalid | SubmitOutcome::Rejected(_) => {
            Fragment::unchanged(render_student_form(&dialog))
        }
    })
}

pub async fn internal_get_edit_form<B: StudentBackend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let snapshot = state.get_student(&id).await?;

    let mut dialog = Dialog::new(StudentDraft::from_snapshot(&snapshot));
    dialog.open();
    Ok(render_student_form(&dialog))
}

pub async fn internal_post_edit<B: StudentBackend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Form(fields): PostedFields,
) -> AppResult<Fragment> {
    let mut draft = StudentDraft::from_form(&fields)?;
    draft.mode = DraftMode::Edit;
    draft.id = id;

    let mut dialog = resume_posted(draft);
    Ok(match dialog.submit(&*state).await {
        SubmitOutcome::Saved(updated) => Fragment::students_changed(notice(&[
            format!("{}さんの情報を更新しました", updated.student.full_name).as_str(),
        ])),
        SubmitOutcome::Invalid | SubmitOutcome::Rejected(_) => {
            Fragment::unchanged(render_student_form(&dialog))
        }
    })
}

pub async fn internal_post_add_course(Form(fields): PostedFields) -> AppResult<Markup> {
    let mut dialog = resume_posted(StudentDraft::from_form(&fields)?);
    dialog.edit(StudentDraft::add_course);
    Ok(render_student_form(&dialog))
}

#[derive(Deserialize)]
pub struct CourseIndexQuery {
    index: usize,
}

pub async fn internal_post_remove_course(
    Query(CourseIndexQuery { index }): Query<CourseIndexQuery>,
    Form(fields): PostedFields,
) -> AppResult<Markup> {
    let mut dialog = resume_posted(StudentDraft::from_form(&fields)?);
    dialog.edit(|draft| draft.remove_course(index))?;
    Ok(render_student_form(&dialog))
}

/// Registration goes back to a blank draft. Editing goes back to what the backend holds now, not
/// to what the dialog was opened with.
pub async fn internal_post_reset<B: StudentBackend>(
    State(state): State<AppState<B>>,
    Form(fields): PostedFields,
) -> AppResult<Markup> {
    let mut dialog = resume_posted(StudentDraft::from_form(&fields)?);
    match dialog.draft().mode {
        DraftMode::Register => dialog.reset(),
        DraftMode::Edit => {
            let snapshot = state.get_student(&dialog.draft().id).await?;
            dialog.prime(StudentDraft::from_snapshot(&snapshot));
        }
    }
    Ok(render_student_form(&dialog))
}

pub async fn internal_post_cancel(Form(fields): PostedFields) -> AppResult<Markup> {
    let mut dialog = resume_posted(StudentDraft::from_form(&fields)?);
    dialog.cancel();
    Ok(render_student_form(&dialog))
}
