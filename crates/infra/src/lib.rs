//! Infrastructure layer: record stores (in-memory and Postgres).

pub mod store;

pub use store::{
    CourseFilter, CourseStore, InMemoryCourseStore, InMemoryStudentStore, PostgresCourseStore,
    PostgresStudentStore, StoreError, StoreResult, StudentFilter, StudentStore,
};
