pub mod enrollment_status;
pub mod index;
pub mod refresh;
pub mod student_detail;
pub mod student_form;
pub mod students;
