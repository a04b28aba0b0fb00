//! Record-store wiring.

use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use campus_infra::{
    CourseStore, InMemoryCourseStore, InMemoryStudentStore, PostgresCourseStore,
    PostgresStudentStore, StudentStore,
};

use crate::config::{ApiConfig, StoreBackend};

/// Stores shared by every handler (injected as an `Extension`).
#[derive(Clone)]
pub struct AppServices {
    pub courses: Arc<dyn CourseStore>,
    pub students: Arc<dyn StudentStore>,
}

impl AppServices {
    /// In-memory wiring (dev/test): state lives as long as the process.
    pub fn in_memory() -> Self {
        Self {
            courses: Arc::new(InMemoryCourseStore::new()),
            students: Arc::new(InMemoryStudentStore::new()),
        }
    }

    /// Postgres wiring: connects, then creates the tables if needed.
    pub async fn postgres(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .context("failed to connect to Postgres")?;

        let courses = PostgresCourseStore::new(pool.clone());
        courses.ensure_schema().await?;
        let students = PostgresStudentStore::new(pool);
        students.ensure_schema().await?;

        Ok(Self {
            courses: Arc::new(courses),
            students: Arc::new(students),
        })
    }
}

pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    match &config.store {
        StoreBackend::InMemory => {
            tracing::info!("using in-memory record stores");
            Ok(AppServices::in_memory())
        }
        StoreBackend::Postgres { database_url } => {
            tracing::info!("using Postgres record stores");
            AppServices::postgres(database_url).await
        }
    }
}
