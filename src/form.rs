//! Editable drafts and the dialog lifecycle they're submitted through.

use crate::{
    data::{StudentBackend, StudentDetail},
    error::AppResult,
    validation::FieldErrors,
};

pub mod field;
pub mod status_draft;
pub mod student_draft;

pub use field::{CourseField, FieldPath, StudentField};
pub use status_draft::{EnrollmentStatusDraft, StatusField};
pub use student_draft::{DraftMode, Presence, StudentDraft};

/// Something a dialog can edit, check, and send off.
#[allow(async_fn_in_trait)]
pub trait Draft: Clone {
    type Field: Ord;
    /// What passes validation, ready to send.
    type Valid;
    /// What the backend hands back once it's been accepted.
    type Saved;

    fn validate(&self) -> Result<Self::Valid, FieldErrors<Self::Field>>;

    async fn transmit<B: StudentBackend>(valid: Self::Valid, backend: &B) -> AppResult<Self::Saved>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    Pristine,
    Dirty,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<T> {
    Invalid,
    Saved(T),
    Rejected(String),
}

pub struct Dialog<D: Draft> {
    state: DialogState,
    initial: D,
    draft: D,
    errors: FieldErrors<D::Field>,
    server_error: Option<String>,
}

impl<D: Draft> Dialog<D> {
    pub fn new(initial: D) -> Self {
        Self {
            state: DialogState::Closed,
            draft: initial.clone(),
            initial,
            errors: FieldErrors::default(),
            server_error: None,
        }
    }

    /// Rebuilds an open, edited dialog from a draft that came back from the browser.
    pub fn resume(initial: D, draft: D) -> Self {
        Self {
            state: DialogState::Dirty,
            initial,
            draft,
            errors: FieldErrors::default(),
            server_error: None,
        }
    }

    pub fn open(&mut self) {
        self.reset();
    }

    /// Swaps in a fresh snapshot. An open dialog starts over from it.
    pub fn prime(&mut self, initial: D) {
        self.initial = initial;
        if self.is_open() {
            self.reset();
        }
    }

    pub fn edit<T>(&mut self, change: impl FnOnce(&mut D) -> T) -> T {
        self.state = DialogState::Dirty;
        change(&mut self.draft)
    }

    pub fn reset(&mut self) {
        self.draft = self.initial.clone();
        self.errors = FieldErrors::default();
        self.server_error = None;
        self.state = DialogState::Pristine;
    }

    pub fn cancel(&mut self) {
        self.draft = self.initial.clone();
        self.errors = FieldErrors::default();
        self.server_error = None;
        self.state = DialogState::Closed;
    }

    pub async fn submit<B: StudentBackend>(&mut self, backend: &B) -> SubmitOutcome<D::Saved> {
        self.server_error = None;
        let valid = match self.draft.validate() {
            Ok(valid) => valid,
            Err(errors) => {
                debug!(fields = errors.len(), "Draft failed validation");
                self.errors = errors;
                self.state = DialogState::Dirty;
                return SubmitOutcome::Invalid;
            }
        };
        self.errors = FieldErrors::default();

        self.state = DialogState::Submitting;
        match D::transmit(valid, backend).await {
            Ok(saved) => {
                self.state = DialogState::Closed;
                SubmitOutcome::Saved(saved)
            }
            Err(e) => {
                warn!(?e, "Submission rejected");
                let message = e.user_message();
                self.server_error = Some(message.clone());
                self.state = DialogState::Dirty;
                SubmitOutcome::Rejected(message)
            }
        }
    }

    pub const fn state(&self) -> DialogState {
        self.state
    }

    pub const fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Pristine | DialogState::Dirty)
    }

    pub const fn draft(&self) -> &D {
        &self.draft
    }

    pub const fn errors(&self) -> &FieldErrors<D::Field> {
        &self.errors
    }

    pub fn server_error(&self) -> Option<&str> {
        self.server_error.as_deref()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

/// Flags a copy of `detail` as deleted and sends it. Nothing is sent unless the user confirmed.
pub async fn soft_delete<B: StudentBackend>(
    backend: &B,
    detail: &StudentDetail,
    confirmation: Confirmation,
) -> AppResult<DeleteOutcome> {
    if confirmation == Confirmation::Declined {
        debug!(id = %detail.student.id, "Delete declined");
        return Ok(DeleteOutcome::Declined);
    }

    let mut deleted = detail.clone();
    deleted.student.is_deleted = true;

    info!(id = %deleted.student.id, "Soft-deleting student");
    backend.soft_delete_student(&deleted).await?;
    Ok(DeleteOutcome::Deleted)
}
