//! Modal host adapter.
//!
//! A [`ModalHost`] owns one modal shell for one logical action ("New Record",
//! "Edit Record", "Sign In", ...). The shell is created once; every
//! [`show`](ModalHost::show) fetches fresh form markup into it and rebinds
//! the submission engine, so repeated use never stacks up dialogs.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use futures::FutureExt;
use log::debug;

use crate::error::Error;
use crate::form::BoundForm;
use crate::form::Form;
use crate::form::OnSuccess;
use crate::form::SubmitOutcome;
use crate::transport::Transport;

static NEXT_SHELL_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies a modal shell towards the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShellId(u64);

impl ShellId {
    fn next() -> Self {
        Self(NEXT_SHELL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the numeric id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ShellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "modal-{}", self.0)
    }
}

/// The dialog host: whatever actually draws modals.
///
/// Shells start hidden. `set_body` may be called again while a shell is
/// visible, after the form changed.
pub trait ModalPresenter: Send + Sync {
    /// Instantiates a hidden shell with a title and an empty body.
    fn create_shell(&self, id: ShellId, title: &str);

    /// Replaces the body of a shell with `form`.
    fn set_body(&self, id: ShellId, form: &Form);

    /// Shows a shell.
    fn reveal(&self, id: ShellId);

    /// Hides a shell.
    fn hide(&self, id: ShellId);
}

#[derive(Debug)]
struct ModalShell {
    id: ShellId,
    title: String,
}

/// One reusable modal bound to remotely loaded forms.
pub struct ModalHost {
    default_title: String,
    presenter: Arc<dyn ModalPresenter>,
    transport: Arc<dyn Transport>,
    shell: OnceLock<ModalShell>,
    bound: Mutex<Option<Arc<BoundForm>>>,
    visible: Arc<AtomicBool>,
    latest_show: AtomicU64,
}

impl ModalHost {
    /// Creates a host. No shell exists until [`create`](Self::create) or the
    /// first [`show`](Self::show), which uses `default_title`.
    pub fn new(
        default_title: impl Into<String>,
        presenter: Arc<dyn ModalPresenter>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            default_title: default_title.into(),
            presenter,
            transport,
            shell: OnceLock::new(),
            bound: Mutex::new(None),
            visible: Arc::new(AtomicBool::new(false)),
            latest_show: AtomicU64::new(0),
        }
    }

    /// Instantiates the hidden shell. Later calls return the existing shell.
    pub fn create(&self, title: impl Into<String>) -> ShellId {
        let title = title.into();
        let shell = self.shell.get_or_init(|| {
            let id = ShellId::next();
            self.presenter.create_shell(id, &title);
            debug!("Created {} '{}'", id, title);
            ModalShell {
                id,
                title: title.clone(),
            }
        });
        if shell.title != title {
            debug!("{} already created as '{}'", shell.id, shell.title);
        }
        shell.id
    }

    /// Returns the shell id, if the shell was created.
    pub fn shell_id(&self) -> Option<ShellId> {
        self.shell.get().map(|shell| shell.id)
    }

    /// Returns the shell title, if the shell was created.
    pub fn title(&self) -> Option<&str> {
        self.shell.get().map(|shell| shell.title.as_str())
    }

    /// Returns `true` while the modal is revealed.
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    /// Loads the form at `url?data` into the shell and reveals it.
    ///
    /// Creates the shell first if needed. The form posts back to `url` with
    /// `data` merged in. When the server accepts it, `on_success` runs and
    /// the modal hides. A previous binding is replaced. On a transport error
    /// the shell stays as it was.
    ///
    /// Only the latest call binds its form. A call overtaken by a later
    /// `show` or by [`close`](Self::close) returns `Ok(false)` and leaves the
    /// shell alone, whether its fetch succeeded or not.
    pub async fn show(
        &self,
        url: &str,
        data: Vec<(String, String)>,
        on_success: OnSuccess,
    ) -> Result<bool, Error> {
        let shell_id = match self.shell_id() {
            Some(id) => id,
            None => self.create(self.default_title.clone()),
        };
        let token = self.latest_show.fetch_add(1, Ordering::AcqRel) + 1;

        let markup = self.transport.get_text(url, &data).await;
        if self.latest_show.load(Ordering::Acquire) != token {
            debug!("Discarding superseded form for {} from {}", shell_id, url);
            return Ok(false);
        }
        let form = Form::from_fragment(markup?);

        let presenter = Arc::clone(&self.presenter);
        let visible = Arc::clone(&self.visible);
        let continuation: OnSuccess = Box::new(move || {
            async move {
                on_success().await;
                visible.store(false, Ordering::Release);
                presenter.hide(shell_id);
            }
            .boxed()
        });

        let bound = Arc::new(BoundForm::new(
            form,
            Arc::clone(&self.transport),
            url,
            data,
            continuation,
        ));

        let mut current = self.lock_bound();
        if self.latest_show.load(Ordering::Acquire) != token {
            debug!("Discarding superseded form for {} from {}", shell_id, url);
            return Ok(false);
        }
        self.presenter.set_body(shell_id, &bound.form());
        *current = Some(bound);
        drop(current);

        self.visible.store(true, Ordering::Release);
        self.presenter.reveal(shell_id);
        Ok(true)
    }

    /// Submits the bound form.
    ///
    /// After a rejection the presenter receives the decorated form.
    pub async fn submit(&self) -> Result<SubmitOutcome, Error> {
        let bound = self.bound().ok_or_else(|| self.no_form())?;
        let outcome = bound.submit().await?;

        if outcome.is_accepted() {
            let mut current = self.lock_bound();
            if current.as_ref().is_some_and(|b| Arc::ptr_eq(b, &bound)) {
                *current = None;
            }
        } else if let Some(shell_id) = self.shell_id() {
            self.presenter.set_body(shell_id, &bound.form());
        }

        Ok(outcome)
    }

    /// Hides the modal and drops its form, as a cancel button would.
    pub fn close(&self) {
        self.latest_show.fetch_add(1, Ordering::AcqRel);
        *self.lock_bound() = None;
        if let Some(shell_id) = self.shell_id() {
            self.visible.store(false, Ordering::Release);
            self.presenter.hide(shell_id);
        }
    }

    /// Returns the currently bound form, if any.
    pub fn bound(&self) -> Option<Arc<BoundForm>> {
        self.lock_bound().clone()
    }

    /// Runs `f` against the bound form.
    pub fn with_form<R>(&self, f: impl FnOnce(&mut Form) -> R) -> Result<R, Error> {
        let bound = self.bound().ok_or_else(|| self.no_form())?;
        Ok(bound.with_form(f))
    }

    fn lock_bound(&self) -> std::sync::MutexGuard<'_, Option<Arc<BoundForm>>> {
        self.bound.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn no_form(&self) -> Error {
        Error::NoFormBound {
            title: self.title().unwrap_or(&self.default_title).to_string(),
        }
    }
}

impl std::fmt::Debug for ModalHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalHost")
            .field("default_title", &self.default_title)
            .field("shell", &self.shell.get())
            .field("visible", &self.is_visible())
            .finish()
    }
}
