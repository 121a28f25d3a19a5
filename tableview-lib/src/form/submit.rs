//! Form submission engine.
//!
//! A [`BoundForm`] ties a [`Form`] to the endpoint it posts to, the extra
//! fields merged into every submission and the continuation run once the
//! server accepts it. Rejections are rendered back onto the form.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use futures::FutureExt;
use futures::future;
use futures::future::BoxFuture;
use log::debug;
use log::warn;

use super::Form;
use crate::error::Error;
use crate::error::TransportError;
use crate::model::FormErrorPayload;
use crate::model::SubmitResponse;
use crate::transport::Transport;

/// Continuation run once after an accepted submission.
pub type OnSuccess = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Wraps a synchronous closure as an [`OnSuccess`].
pub fn on_success(f: impl FnOnce() + Send + 'static) -> OnSuccess {
    Box::new(move || {
        f();
        future::ready(()).boxed()
    })
}

/// What a submission did to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server accepted the data; the form was left untouched.
    Accepted,
    /// The server sent a whole new form, which replaced the old one.
    Replaced,
    /// The server reported validation errors, now rendered on the form.
    Rejected(FormErrorPayload),
}

impl SubmitOutcome {
    /// Returns `true` for [`SubmitOutcome::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

const IDLE: u8 = 0;
const SUBMITTING: u8 = 1;
const ACCEPTED: u8 = 2;

/// Marks a form as submitting for as long as it lives.
///
/// Dropping the guard returns the form to idle, unless the submission was
/// accepted: an accepted form never submits again.
struct InFlight<'a> {
    state: &'a AtomicU8,
    accepted: bool,
}

impl<'a> InFlight<'a> {
    fn acquire(state: &'a AtomicU8) -> Option<Self> {
        state
            .compare_exchange(IDLE, SUBMITTING, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                state,
                accepted: false,
            })
    }

    fn accept(&mut self) {
        self.accepted = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let next = if self.accepted { ACCEPTED } else { IDLE };
        self.state.store(next, Ordering::Release);
    }
}

/// A form bound to its submission endpoint.
pub struct BoundForm {
    form: Mutex<Form>,
    url: String,
    extra_fields: Vec<(String, String)>,
    on_success: Mutex<Option<OnSuccess>>,
    state: AtomicU8,
    transport: Arc<dyn Transport>,
}

impl BoundForm {
    /// Binds `form` to `url`.
    ///
    /// `extra_fields` are merged into every submission and override form
    /// fields of the same name.
    pub fn new(
        form: Form,
        transport: Arc<dyn Transport>,
        url: impl Into<String>,
        extra_fields: Vec<(String, String)>,
        on_success: OnSuccess,
    ) -> Self {
        Self {
            form: Mutex::new(form),
            url: url.into(),
            extra_fields,
            on_success: Mutex::new(Some(on_success)),
            state: AtomicU8::new(IDLE),
            transport,
        }
    }

    /// Returns the endpoint this form posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the extra fields merged into each submission.
    pub fn extra_fields(&self) -> &[(String, String)] {
        &self.extra_fields
    }

    fn lock_form(&self) -> MutexGuard<'_, Form> {
        self.form.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a snapshot of the form.
    pub fn form(&self) -> Form {
        self.lock_form().clone()
    }

    /// Runs `f` with mutable access to the form, as user input would.
    pub fn with_form<R>(&self, f: impl FnOnce(&mut Form) -> R) -> R {
        f(&mut self.lock_form())
    }

    /// Returns `true` while a submission is outstanding.
    pub fn is_submitting(&self) -> bool {
        self.state.load(Ordering::Acquire) == SUBMITTING
    }

    /// Returns `true` once the server accepted a submission.
    pub fn is_accepted(&self) -> bool {
        self.state.load(Ordering::Acquire) == ACCEPTED
    }

    /// Serializes the form and posts it.
    ///
    /// While a previous call is outstanding, including its success
    /// continuation, this returns [`Error::SubmissionInFlight`] without
    /// sending anything. So does every call after an accepted submission.
    /// Transport failures leave the form untouched.
    pub async fn submit(&self) -> Result<SubmitOutcome, Error> {
        let mut guard = InFlight::acquire(&self.state).ok_or(Error::SubmissionInFlight)?;

        let mut payload = self.lock_form().payload();
        payload.merge(self.extra_fields.iter().cloned());
        debug!("Submitting {} parts to {}", payload.len(), self.url);

        let body = self.transport.post_multipart(&self.url, payload).await?;

        let response: SubmitResponse =
            serde_json::from_value(body).map_err(TransportError::from)?;

        if response.success {
            guard.accept();
            let continuation = self
                .on_success
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .take();
            if let Some(continuation) = continuation {
                continuation().await;
            }
            return Ok(SubmitOutcome::Accepted);
        }

        Ok(apply_rejection(&mut self.lock_form(), response))
    }
}

impl std::fmt::Debug for BoundForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundForm")
            .field("url", &self.url)
            .field("extra_fields", &self.extra_fields)
            .field("submitting", &self.is_submitting())
            .field("accepted", &self.is_accepted())
            .finish()
    }
}

/// Renders a rejected submission onto `form`.
///
/// Replacement markup wins over structured errors. Structured errors first
/// clear every previous decoration; fields the form does not have are
/// skipped.
pub fn apply_rejection(form: &mut Form, response: SubmitResponse) -> SubmitOutcome {
    if let Some(content) = response.content {
        form.replace_content(content);
        return SubmitOutcome::Replaced;
    }

    let errors = response.errors.unwrap_or_else(|| {
        warn!("Submission rejected without errors or replacement content");
        FormErrorPayload::default()
    });

    form.clear_errors();
    form.show_global_errors(errors.global_errors.clone());
    for (field, messages) in &errors.field_errors {
        if messages.is_empty() {
            continue;
        }
        if !form.show_field_errors(field, messages.clone()) {
            debug!("Ignoring errors for unknown field '{}'", field);
        }
    }

    SubmitOutcome::Rejected(errors)
}
