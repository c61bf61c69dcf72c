//! Form interaction state machine.
//!
//! A [`WikiForm`] lives for exactly one form interaction and sequences the
//! whole hand-off:
//!
//! ```text
//! Idle --submit--> Resolving --ok--> ConfigPending --confirm--> Submitting --> Navigated
//!                      |                  |    ^                    |
//!                      +--err--> Idle     |    +-----re-check err---+
//!                                         +--cancel--> Idle
//! ```
//!
//! The submission guard is one-shot: once a confirm has been accepted, every
//! later confirm is ignored for the rest of the form's life. Only a failed
//! re-validation inside `Submitting` releases it.

use crate::messages::MessageLookup;
use crate::models::{ConfigurationBundle, RepositoryLocator};
use crate::request::{NavigationRequest, build_request};
use crate::resolver::{ResolveError, resolve};

/// Receives the finished navigation request.
pub trait Navigator {
    fn navigate(&mut self, request: &NavigationRequest);
}

/// Navigator that keeps every request it is handed, in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pub visits: Vec<NavigationRequest>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&NavigationRequest> {
        self.visits.last()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, request: &NavigationRequest) {
        self.visits.push(request.clone());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Resolving,
    /// Reference resolved; waiting for the options dialog to confirm or cancel.
    ConfigPending,
    Submitting,
    /// Terminal.
    Navigated,
}

impl FormState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormState::Idle => "idle",
            FormState::Resolving => "resolving",
            FormState::ConfigPending => "config_pending",
            FormState::Submitting => "submitting",
            FormState::Navigated => "navigated",
        }
    }
}

impl std::fmt::Display for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of the first-stage submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The reference resolved and the options dialog should open.
    DialogOpened(RepositoryLocator),
    /// The reference did not resolve; the form shows the fixed error.
    Rejected(ResolveError),
    /// The form has already navigated.
    Ignored,
}

/// Result of confirming the options dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Navigated(NavigationRequest),
    /// Re-validation failed; the guard was released and the dialog stays open.
    Rejected(ResolveError),
    /// Duplicate or out-of-order confirm. Not an error.
    Ignored,
}

/// One form interaction: the raw input, its error, and the submission guard.
#[derive(Debug, Clone)]
pub struct WikiForm {
    input: String,
    state: FormState,
    error: Option<&'static str>,
    is_submitting: bool,
    locator: Option<RepositoryLocator>,
}

impl Default for WikiForm {
    fn default() -> Self {
        Self::new()
    }
}

impl WikiForm {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            state: FormState::Idle,
            error: None,
            is_submitting: false,
            locator: None,
        }
    }

    /// Start a form with the reference already typed in.
    pub fn with_input(input: impl Into<String>) -> Self {
        let mut form = Self::new();
        form.input = input.into();
        form
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// The user-facing error currently shown, if any.
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Locator from the most recent successful resolution.
    pub fn locator(&self) -> Option<&RepositoryLocator> {
        self.locator.as_ref()
    }

    /// User edit. Clears the error; ignored once submission has started.
    pub fn set_input(&mut self, input: impl Into<String>) {
        if matches!(self.state, FormState::Submitting | FormState::Navigated) {
            return;
        }
        self.input = input.into();
        self.error = None;
    }

    /// First-stage submit: validate the reference and open the dialog.
    pub fn submit(&mut self) -> SubmitOutcome {
        if matches!(self.state, FormState::Submitting | FormState::Navigated) {
            return SubmitOutcome::Ignored;
        }

        self.state = FormState::Resolving;
        self.error = None;
        match resolve(&self.input) {
            Ok(locator) => {
                self.state = FormState::ConfigPending;
                self.locator = Some(locator.clone());
                SubmitOutcome::DialogOpened(locator)
            }
            Err(err) => {
                self.state = FormState::Idle;
                self.locator = None;
                self.error = Some(err.user_message());
                SubmitOutcome::Rejected(err)
            }
        }
    }

    /// Close the options dialog without submitting.
    pub fn cancel(&mut self) {
        if self.state == FormState::ConfigPending {
            self.state = FormState::Idle;
        }
    }

    /// Confirm the options dialog and hand the built request to `navigator`.
    pub fn confirm<N>(&mut self, config: &ConfigurationBundle, navigator: &mut N) -> ConfirmOutcome
    where
        N: Navigator + ?Sized,
    {
        if self.is_submitting {
            tracing::debug!("submission already in progress, ignoring duplicate confirm");
            return ConfirmOutcome::Ignored;
        }
        if self.state != FormState::ConfigPending {
            tracing::debug!(state = %self.state, "confirm outside the options dialog ignored");
            return ConfirmOutcome::Ignored;
        }

        self.is_submitting = true;
        self.state = FormState::Submitting;

        // The input may have been edited while the dialog was open.
        let locator = match resolve(&self.input) {
            Ok(locator) => locator,
            Err(err) => {
                tracing::debug!(error = %err, "reference no longer resolves at confirm");
                self.is_submitting = false;
                self.state = FormState::ConfigPending;
                self.error = Some(err.user_message());
                return ConfirmOutcome::Rejected(err);
            }
        };

        let request = build_request(&locator, config);
        tracing::info!(path = %request.path, source = %locator.source_kind(), "navigating to wiki");
        navigator.navigate(&request);

        self.locator = Some(locator);
        self.state = FormState::Navigated;
        ConfirmOutcome::Navigated(request)
    }

    /// Label for the submit button.
    pub fn submit_label(&self, messages: &dyn MessageLookup) -> String {
        if self.is_submitting {
            messages.message("common.processing", &[])
        } else {
            messages.message("common.generateWiki", &[])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MessageCatalog;
    use crate::resolver::INVALID_REFERENCE_FORMAT;

    fn config() -> ConfigurationBundle {
        ConfigurationBundle::new()
            .with_provider("p")
            .with_model("m")
    }

    #[test]
    fn test_new_form_is_idle() {
        let form = WikiForm::new();
        assert_eq!(form.state(), FormState::Idle);
        assert!(!form.is_submitting());
        assert!(form.error().is_none());
    }

    #[test]
    fn test_submit_valid_opens_dialog() {
        let mut form = WikiForm::with_input("octocat/Hello-World");
        let outcome = form.submit();

        assert!(matches!(outcome, SubmitOutcome::DialogOpened(ref l) if l.repo() == "Hello-World"));
        assert_eq!(form.state(), FormState::ConfigPending);
        assert!(form.error().is_none());
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_submit_invalid_sets_error_and_stays_idle() {
        let mut form = WikiForm::with_input("not a path or url");
        let outcome = form.submit();

        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(form.error(), Some(INVALID_REFERENCE_FORMAT));
        assert!(form.locator().is_none());
    }

    #[test]
    fn test_error_clears_on_edit_and_retry() {
        let mut form = WikiForm::with_input("nope");
        form.submit();
        assert!(form.error().is_some());

        form.set_input("foo/bar");
        assert!(form.error().is_none());
        assert!(matches!(form.submit(), SubmitOutcome::DialogOpened(_)));
    }

    #[test]
    fn test_cancel_returns_to_idle_without_side_effects() {
        let mut form = WikiForm::with_input("foo/bar");
        form.submit();
        form.cancel();

        assert_eq!(form.state(), FormState::Idle);
        assert!(form.error().is_none());
        assert!(!form.is_submitting());

        let mut nav = RecordingNavigator::new();
        assert_eq!(form.confirm(&config(), &mut nav), ConfirmOutcome::Ignored);
        assert!(nav.visits.is_empty());
    }

    #[test]
    fn test_confirm_navigates_once() {
        let mut form = WikiForm::with_input("octocat/Hello-World");
        form.submit();

        let mut nav = RecordingNavigator::new();
        let first = form.confirm(&config(), &mut nav);
        let second = form.confirm(&config(), &mut nav);

        assert!(matches!(first, ConfirmOutcome::Navigated(ref r) if r.path == "/octocat/Hello-World"));
        assert_eq!(second, ConfirmOutcome::Ignored);
        assert_eq!(nav.visits.len(), 1);
        assert_eq!(form.state(), FormState::Navigated);
        assert!(form.is_submitting());
    }

    #[test]
    fn test_confirm_before_submit_is_ignored() {
        let mut form = WikiForm::with_input("foo/bar");
        let mut nav = RecordingNavigator::new();

        assert_eq!(form.confirm(&config(), &mut nav), ConfirmOutcome::Ignored);
        assert!(nav.visits.is_empty());
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_revalidation_failure_releases_guard() {
        let mut form = WikiForm::with_input("foo/bar");
        form.submit();
        form.set_input("garbage");

        let mut nav = RecordingNavigator::new();
        let outcome = form.confirm(&config(), &mut nav);

        assert!(matches!(outcome, ConfirmOutcome::Rejected(_)));
        assert_eq!(form.state(), FormState::ConfigPending);
        assert!(!form.is_submitting());
        assert_eq!(form.error(), Some(INVALID_REFERENCE_FORMAT));
        assert!(nav.visits.is_empty());

        // Fixing the input lets the same dialog confirm again.
        form.set_input("foo/bar");
        assert!(matches!(
            form.confirm(&config(), &mut nav),
            ConfirmOutcome::Navigated(_)
        ));
        assert_eq!(nav.visits.len(), 1);
    }

    #[test]
    fn test_navigated_form_ignores_edits_and_submits() {
        let mut form = WikiForm::with_input("foo/bar");
        form.submit();
        form.confirm(&config(), &mut RecordingNavigator::new());

        form.set_input("other/repo");
        assert_eq!(form.input(), "foo/bar");
        assert_eq!(form.submit(), SubmitOutcome::Ignored);
    }

    #[test]
    fn test_confirm_uses_current_input_for_repo_url() {
        let mut form = WikiForm::with_input("foo/bar");
        form.submit();
        form.set_input("https://github.com/foo/baz");

        let mut nav = RecordingNavigator::new();
        form.confirm(&config(), &mut nav);
        let request = nav.last().unwrap();
        assert_eq!(request.path, "/foo/baz");
        assert_eq!(request.get("repo_url"), Some("https://github.com/foo/baz"));
    }

    #[test]
    fn test_submit_label() {
        let catalog = MessageCatalog::english();
        let mut form = WikiForm::with_input("foo/bar");
        assert_eq!(form.submit_label(&catalog), "Generate Wiki");

        form.submit();
        form.confirm(&config(), &mut RecordingNavigator::new());
        assert_eq!(form.submit_label(&catalog), "Processing...");
    }
}
