use super::hub::dispatch;
use crate::report::FailureInput;
use std::future::Future;
use tokio::task::JoinHandle;

/// Spawn a fallible background task whose error nobody awaits.
///
/// An `Err` outcome is an unhandled rejection: it is dispatched to the hub as
/// a native error and the handle resolves to `None`. Panics inside the task
/// are left to the panic hook.
pub fn spawn_supervised<F, T, E>(future: F) -> JoinHandle<Option<T>>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Into<anyhow::Error> + Send + 'static,
{
    tokio::spawn(async move {
        match future.await {
            Ok(value) => Some(value),
            Err(error) => {
                let error: anyhow::Error = error.into();
                tracing::debug!("Supervised task failed: {:#}", error);
                dispatch(FailureInput::from(error));
                None
            }
        }
    })
}
