//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use orderpulse_core::config::NotificationsConfig;
use orderpulse_core::error::AppError;

use crate::jobs::RetentionJob;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler })
    }

    /// Register all default scheduled tasks
    pub async fn register_default_tasks(
        &self,
        retention: Arc<RetentionJob>,
        config: &NotificationsConfig,
    ) -> Result<(), AppError> {
        if config.cleanup_enabled {
            self.register_notification_cleanup(retention, &config.cleanup_cron)
                .await?;
        } else {
            tracing::info!("Notification cleanup disabled");
        }

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Notification retention on `schedule` (six-field cron, seconds first)
    async fn register_notification_cleanup(
        &self,
        retention: Arc<RetentionJob>,
        schedule: &str,
    ) -> Result<(), AppError> {
        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let retention = Arc::clone(&retention);
            Box::pin(async move {
                if let Err(e) = retention.run().await {
                    tracing::error!(error = %e, "Notification retention failed");
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid notification cleanup schedule '{schedule}': {e}"
            ))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add notification_cleanup schedule: {e}"))
        })?;

        tracing::info!(schedule, "Registered: notification_cleanup");
        Ok(())
    }
}
