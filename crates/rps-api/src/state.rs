use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusHandle;
use rps_store::{FileStore, Progress, StoreError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{ApiConfig, config::Environment, error::ApiError};

type UserLocks = Arc<Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>>;

#[derive(Clone)]
pub struct ApiState {
    pub data_dir: PathBuf,
    pub environment: Environment,
    pub metrics_handle: Option<PrometheusHandle>,
    user_locks: UserLocks,
}

/// Exclusive access to one user's data. The lock table entry goes away with the
/// last guard so the table only holds users with writes in flight.
pub struct UserGuard {
    guard: Option<OwnedMutexGuard<()>>,
    user_id: Uuid,
    locks: UserLocks,
}

impl Drop for UserGuard {
    fn drop(&mut self) {
        // Release first so our own reference no longer counts
        drop(self.guard.take());

        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        let unused = locks
            .get(&self.user_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if unused {
            locks.remove(&self.user_id);
        }
    }
}

impl ApiState {
    pub fn new(config: &ApiConfig, metrics_handle: Option<PrometheusHandle>) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!("failed to create data directory {}", config.data_dir.display())
        })?;

        tracing::info!(data_dir = %config.data_dir.display(), "Using data directory");

        Ok(Self {
            data_dir: config.data_dir.clone(),
            environment: config.env,
            metrics_handle,
            user_locks: UserLocks::default(),
        })
    }

    /// Progress store for one user, kept under `<data_dir>/<user_id>/`.
    ///
    /// The directory is only created by the first write.
    pub fn progress_for(&self, user_id: Uuid) -> Progress<FileStore> {
        Progress::new(FileStore::new(self.data_dir.join(user_id.to_string())))
    }

    /// Serialize writes for one user. Hold the guard for the whole load → mutate → save.
    pub async fn lock_user(&self, user_id: Uuid) -> UserGuard {
        let lock = {
            let mut locks = self
                .user_locks
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            Arc::clone(locks.entry(user_id).or_default())
        };

        UserGuard {
            guard: Some(lock.lock_owned().await),
            user_id,
            locks: Arc::clone(&self.user_locks),
        }
    }

    /// Number of users with a lock entry
    pub fn active_user_locks(&self) -> usize {
        self.user_locks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Run `f` on the user's progress off the async workers, without locking.
    pub async fn read_progress<T, F>(&self, user_id: Uuid, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(Progress<FileStore>) -> T + Send + 'static,
        T: Send + 'static,
    {
        let progress = self.progress_for(user_id);
        Ok(tokio::task::spawn_blocking(move || f(progress)).await?)
    }

    /// Run `f` on the user's progress off the async workers while holding the
    /// user's lock.
    pub async fn write_progress<T, F>(&self, user_id: Uuid, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(Progress<FileStore>) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let guard = self.lock_user(user_id).await;
        let progress = self.progress_for(user_id);

        // The guard moves along so a dropped request cannot release it mid-write
        let value = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            f(progress)
        })
        .await??;
        Ok(value)
    }
}
