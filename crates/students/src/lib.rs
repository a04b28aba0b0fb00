//! Students domain module: courses and the students who take them.
//!
//! This crate contains the record types and input validation only
//! (no IO, no HTTP, no storage).

pub mod course;
pub mod student;
pub mod validation;

pub use course::{Course, CoursePatch, NewCourse};
pub use student::{NewStudent, Student, StudentPatch, parse_birth_date};
