use crate::{
    data::{Status, StudentBackend},
    error::{AppResult, MissingCourseSnafu},
    form::{Dialog, EnrollmentStatusDraft, StatusField, SubmitOutcome},
    maud_conveniences::{
        INPUT_CLASS, SECONDARY_BUTTON_CLASS, SUBMIT_BUTTON_CLASS, alert, form_element, notice,
        select_form_element, title,
    },
    routes::refresh::Fragment,
    state::AppState,
};
use axum::{
    Form,
    extract::{Path, State},
};
use maud::{Markup, html};
use serde::Deserialize;
use snafu::OptionExt;

pub fn render_status_form(dialog: &Dialog<EnrollmentStatusDraft>) -> Markup {
    let draft = dialog.draft();
    let options = Status::ALL.map(Status::as_str);

    html! {
        div class="bg-gray-800 p-6 rounded shadow-md w-full max-w-md" {
            (title("申込状況更新"))

            @if let Some(server_error) = dialog.server_error() {
                (alert(server_error))
            }

            form hx-post={"/internal/students/" (draft.student_id()) "/courses/" (draft.student_course_id()) "/status"} hx-trigger="submit" hx-target="#in_focus" class="p-4" {
                (form_element("studentCourseId", "コースID", &[], html! {
                    input type="text" id="studentCourseId" value=(draft.student_course_id()) disabled class=(INPUT_CLASS);
                }))
                (select_form_element(
                    StatusField::Status.key(),
                    "申込状況",
                    &options,
                    None,
                    &draft.status,
                    dialog.errors().for_field(&StatusField::Status),
                ))

                div class="flex items-center justify-between" {
                    button type="submit" class=(SUBMIT_BUTTON_CLASS) {"更新"}
                    button type="button" class=(SECONDARY_BUTTON_CLASS) hx-get="/internal/dialog/close" hx-target="#in_focus" {"キャンセル"}
                }
            }
        }
    }
}

pub async fn internal_get_status_form<B: StudentBackend>(
    State(state): State<AppState<B>>,
    Path((student_id, course_id)): Path<(String, String)>,
) -> AppResult<Markup> {
    let detail = state.get_student(&student_id).await?;
    let course = detail.course(&course_id).context(MissingCourseSnafu {
        student_id,
        course_id: course_id.clone(),
    })?;

    let mut dialog = Dialog::new(EnrollmentStatusDraft::for_course(course));
    dialog.open();
    Ok(render_status_form(&dialog))
}

#[derive(Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    status: String,
}

pub async fn internal_post_status<B: StudentBackend>(
    State(state): State<AppState<B>>,
    Path((student_id, course_id)): Path<(String, String)>,
    Form(StatusForm { status }): Form<StatusForm>,
) -> AppResult<Fragment> {
    let mut dialog = Dialog::new(EnrollmentStatusDraft::new(student_id, course_id, String::new()));
    dialog.open();
    dialog.edit(|draft| draft.set_status(status));

    Ok(match dialog.submit(&*state).await {
        SubmitOutcome::Saved(_) => Fragment::students_changed(notice(&["申込状況を更新しました"])),
        SubmitOutcome::Invalid | SubmitOutcome::Rejected(_) => {
            Fragment::unchanged(render_status_form(&dialog))
        }
    })
}
