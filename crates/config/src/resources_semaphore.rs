//! Semaphore utilities for resource management
//!
//! This module provides helper functions for managing semaphores with
//! consistent error handling across pga.

use pga_errors::{Error, GuardError};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Acquire a semaphore permit with proper error handling
///
/// # Arguments
///
/// * `semaphore` - The semaphore to acquire a permit from
/// * `operation` - Description of the operation for error reporting
///
/// # Errors
///
/// Returns an error if the semaphore is closed or acquisition fails
pub async fn acquire_semaphore_permit(
    semaphore: Arc<Semaphore>,
    operation: &str,
) -> Result<OwnedSemaphorePermit, Error> {
    semaphore.acquire_owned().await.map_err(|_| {
        GuardError::TaskFailed {
            message: format!("failed to acquire semaphore for {operation}"),
        }
        .into()
    })
}

/// Create a semaphore with a specified number of permits
///
/// # Arguments
///
/// * `permits` - Number of permits the semaphore should have
///
/// # Returns
///
/// Returns an Arc-wrapped semaphore for shared ownership
#[must_use]
pub fn create_semaphore(permits: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(permits))
}
