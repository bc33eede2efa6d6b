//! Typed dialogs that produce a result

use super::base::Dialog;
use super::types::{CloseOutcome, DialogError, DialogId, DialogResult, Payload};
use futures::future::BoxFuture;
use std::any::type_name;
use std::sync::Arc;
use tracing::{debug, error};

/// A dialog that answers with a value of type [`ResultDialog::Output`].
///
/// `show_async` resolves to `Some(value)` when the dialog was closed through
/// [`ResultDialog::close_with`], and to `None` when it was dismissed any other
/// way (Escape, backdrop, [`Dialog::close`], the host going away).
pub trait ResultDialog: Dialog + Sized {
    type Output: Send + 'static;

    /// Show this dialog on its host and wait for it to close.
    ///
    /// The UI loop keeps running while this is pending. Fails with
    /// [`DialogError::ResultTypeMismatch`] if the host closed the dialog with
    /// a payload that is not `Self::Output`.
    fn show_async(self: Arc<Self>) -> BoxFuture<'static, DialogResult<Option<Self::Output>>> {
        Box::pin(async move {
            let host = self.core().host()?;
            let id = self.id();
            let dialog: Arc<dyn Dialog> = self;
            let payload = host.show(dialog).await?;
            decode_payload::<Self::Output>(id, payload)
        })
    }

    /// Ask the host to close this dialog with `result`.
    ///
    /// Only the first close of a show cycle delivers a result; what happens to
    /// later ones is up to the host.
    fn close_with(&self, result: Self::Output) -> CloseOutcome {
        let payload: Payload = Box::new(result);
        self.core().request_close(Some(payload))
    }
}

fn decode_payload<T: Send + 'static>(
    id: DialogId,
    payload: Option<Payload>,
) -> DialogResult<Option<T>> {
    let Some(payload) = payload else {
        debug!("Dialog {} closed without a result", id);
        return Ok(None);
    };
    match payload.downcast::<T>() {
        Ok(value) => Ok(Some(*value)),
        Err(_) => {
            error!(
                "Dialog {} was closed with a result that is not {}",
                id,
                type_name::<T>()
            );
            Err(DialogError::ResultTypeMismatch {
                expected: type_name::<T>(),
            })
        }
    }
}
