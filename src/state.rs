use crate::errors::AppError;
use crate::storage::FileBackend;
use crate::store::EntryStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<EntryStore<FileBackend>>>,
}

impl AppState {
    pub fn new(store: EntryStore<FileBackend>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs a store mutation on the blocking pool, since every mutation
    /// writes through to disk.
    pub async fn write<F, T>(&self, mutate: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut EntryStore<FileBackend>) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let mut store = store.blocking_lock();
            mutate(&mut store)
        })
        .await
        .map_err(AppError::internal)
    }
}
