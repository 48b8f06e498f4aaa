//! Application state and core logic

use crate::backend::{
    auth_error_message, AuthErrorContext, MarketplaceBackend, SessionState, SessionSubscription,
};
use crate::config::TuiConfig;
use crate::platform::{NEWLINE_MODIFIER, SWITCH_MODIFIER};
use crate::state::auth_gate::{
    redirect_if_authenticated, require_auth, safe_next_or_home, GateDecision,
};
use crate::state::auth_input::{validate_login, validate_registration};
use crate::state::{
    AppState, AuthFocus, AuthForm, AuthMode, BasicField, DetailsField, DraftStore, FieldKey, Form,
    Location, Page, ReviewController, Route, StepController, StepOutcome, SubmitOutcome,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;

/// Upper bound on chained redirects while resolving one navigation
const MAX_REDIRECTS: usize = 4;

/// Remote work started by a key press and run after the next draw, so the
/// "submitting" state is on screen while it is outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    SignIn,
    SignUp,
    SignOut,
    SubmitListing,
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Remote data store and auth service
    backend: Arc<dyn MarketplaceBackend>,
    /// Step drafts
    drafts: Box<dyn DraftStore>,
    /// Push updates from the auth client
    session: SessionSubscription,
    config: TuiConfig,
    pending: Option<PendingAction>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance
    pub fn new(
        backend: Arc<dyn MarketplaceBackend>,
        drafts: Box<dyn DraftStore>,
        session: SessionSubscription,
        config: TuiConfig,
    ) -> Self {
        let state = AppState {
            session: session.current(),
            ..Default::default()
        };
        Self {
            state,
            backend,
            drafts,
            session,
            config,
            pending: None,
            quit: false,
        }
    }

    /// Verify the restored session against the server in the background.
    /// The result arrives through the session subscription.
    pub fn spawn_session_check(&self) {
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            if let Err(e) = backend.current_user().await {
                tracing::warn!("Session check failed: {}", e);
            }
        });
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn pending(&self) -> Option<PendingAction> {
        self.pending
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Pick up session changes published since the last call
    pub fn tick(&mut self) {
        if let Some(session) = self.session.poll_change() {
            self.on_session_change(session);
        }
    }

    fn on_session_change(&mut self, session: SessionState) {
        self.state.session = session;
        let reopen = match &self.state.page {
            Page::Loading(_) => true,
            _ if self.state.location.route.is_auth_page() => self.state.session.user().is_some(),
            _ => {
                self.is_gated(self.state.location.route)
                    && self.state.session == SessionState::Absent
            }
        };
        if reopen {
            let location = self.state.location.clone();
            self.open(location);
        }
    }

    /// Whether a route needs a signed-in session
    fn is_gated(&self, route: Route) -> bool {
        match route {
            Route::Confirmation => true,
            _ => route.is_wizard_step() && self.config.require_login_for_wizard(),
        }
    }

    /// Navigate to a location, recording the current one in history
    pub fn navigate(&mut self, location: Location) {
        tracing::debug!("Navigate to {}", location);
        self.state.push_location(location.clone());
        self.open(location);
    }

    /// Navigate without a history entry
    pub fn replace(&mut self, location: Location) {
        tracing::debug!("Replace with {}", location);
        self.open(location);
    }

    /// Go back to the previous location
    pub fn go_back(&mut self) {
        let location = self.state.back_location();
        tracing::debug!("Back to {}", location);
        self.open(location);
    }

    /// Resolve gates and step guards for `location` and show the result.
    /// Redirects replace the location.
    fn open(&mut self, location: Location) {
        let mut location = location;
        for _ in 0..MAX_REDIRECTS {
            match self.resolve(&location) {
                Ok(page) => {
                    self.state.replace_location(location);
                    self.state.page = page;
                    return;
                }
                Err(redirect) => {
                    tracing::debug!("Redirect {} -> {}", location, redirect);
                    location = redirect;
                }
            }
        }
        tracing::warn!("Too many redirects, ending at {}", location);
        self.state.replace_location(Location::default());
        self.state.page = Page::Home;
    }

    fn resolve(&self, location: &Location) -> Result<Page, Location> {
        let route = location.route;
        if self.is_gated(route) {
            match require_auth(&self.state.session, route) {
                GateDecision::Pending => return Ok(Page::Loading(route)),
                GateDecision::Redirect(login) => return Err(login),
                GateDecision::Allow(_) => {}
            }
        }

        match route {
            Route::Home => Ok(Page::Home),
            Route::Login | Route::Register => {
                let next = safe_next_or_home(location.next.as_deref());
                if let Some(destination) = redirect_if_authenticated(&self.state.session, &next) {
                    return Err(destination);
                }
                Ok(if route == Route::Login {
                    Page::Login(AuthForm::new(AuthMode::Login, next))
                } else {
                    Page::Register(AuthForm::new(AuthMode::Register, next))
                })
            }
            Route::BasicInfo => StepController::<BasicField>::enter(self.drafts.as_ref())
                .map(Page::BasicInfo)
                .map_err(Location::from),
            Route::AdditionalDetails => StepController::<DetailsField>::enter(self.drafts.as_ref())
                .map(Page::AdditionalDetails)
                .map_err(Location::from),
            Route::Confirmation => ReviewController::enter(self.drafts.as_ref())
                .map(Page::Confirmation)
                .map_err(Location::from),
        }
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.current_error().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Input is frozen while remote work is outstanding
        if self.pending.is_some() {
            return Ok(());
        }

        // Clear any status messages on key press
        self.state.status_message = None;

        match self.state.page {
            Page::Loading(_) => {
                if key.code == KeyCode::Esc {
                    self.go_back();
                }
            }
            Page::Home => self.handle_home_key(key),
            Page::Login(_) | Page::Register(_) => self.handle_auth_key(key),
            Page::BasicInfo(_) => self.handle_basic_info_key(key),
            Page::AdditionalDetails(_) => self.handle_details_key(key),
            Page::Confirmation(_) => self.handle_confirmation_key(key),
        }
        Ok(())
    }

    /// Handle keys on Home
    fn handle_home_key(&mut self, key: KeyEvent) {
        let signed_in = self.state.session.user().is_some();
        let signed_out = self.state.session == SessionState::Absent;
        match key.code {
            KeyCode::Char('c') => self.navigate(Route::BasicInfo.into()),
            KeyCode::Char('l') if signed_out => self.navigate(Route::Login.into()),
            KeyCode::Char('r') if signed_out => self.navigate(Route::Register.into()),
            KeyCode::Char('o') if signed_in => self.pending = Some(PendingAction::SignOut),
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
    }

    fn handle_basic_info_key(&mut self, key: KeyEvent) {
        let Page::BasicInfo(controller) = &mut self.state.page else {
            return;
        };
        match step_key(controller, key, self.drafts.as_mut()) {
            StepKey::Handled => {}
            StepKey::Outcome(outcome) => self.apply_step_outcome(outcome),
            StepKey::Back(route) => self.navigate(route.into()),
        }
    }

    fn handle_details_key(&mut self, key: KeyEvent) {
        let Page::AdditionalDetails(controller) = &mut self.state.page else {
            return;
        };
        match step_key(controller, key, self.drafts.as_mut()) {
            StepKey::Handled => {}
            StepKey::Outcome(outcome) => self.apply_step_outcome(outcome),
            StepKey::Back(route) => self.navigate(route.into()),
        }
    }

    fn apply_step_outcome<K: FieldKey>(&mut self, outcome: StepOutcome<K>) {
        match outcome {
            StepOutcome::Invalid { focus } => {
                tracing::debug!("Advance blocked, focus on {:?}", focus);
            }
            StepOutcome::Advanced(next) => self.navigate(next.into()),
            StepOutcome::StoreFailed(message) => self.push_error(message),
        }
    }

    fn handle_confirmation_key(&mut self, key: KeyEvent) {
        let Page::Confirmation(review) = &mut self.state.page else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                let route = review.back();
                self.navigate(route.into());
            }
            KeyCode::Enter => match review.begin() {
                Ok(()) => self.pending = Some(PendingAction::SubmitListing),
                Err(outcome) => tracing::debug!("Submit ignored: {:?}", outcome),
            },
            _ => {}
        }
    }

    /// Handle keys on the login and register pages
    fn handle_auth_key(&mut self, key: KeyEvent) {
        let (Page::Login(form) | Page::Register(form)) = &mut self.state.page else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Char('r') if key.modifiers.contains(SWITCH_MODIFIER) => {
                let target = match form.mode {
                    AuthMode::Login => Route::Register,
                    AuthMode::Register => Route::Login,
                };
                let next = form.next.clone();
                self.replace(Location::with_next(target, next));
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Enter => {
                if form.submitting {
                    return;
                }
                form.error = None;
                form.submitting = true;
                self.pending = Some(match form.mode {
                    AuthMode::Login => PendingAction::SignIn,
                    AuthMode::Register => PendingAction::SignUp,
                });
            }
            KeyCode::Backspace => form.pop_char(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.push_char(c)
            }
            _ => {}
        }
    }

    /// Run the remote work queued by the last key press
    pub async fn run_pending(&mut self) {
        let Some(action) = self.pending.take() else {
            return;
        };
        match action {
            PendingAction::SignIn => self.sign_in().await,
            PendingAction::SignUp => self.sign_up().await,
            PendingAction::SignOut => self.sign_out().await,
            PendingAction::SubmitListing => self.submit_listing().await,
        }
    }

    async fn sign_in(&mut self) {
        let Page::Login(form) = &mut self.state.page else {
            return;
        };
        let email = match validate_login(&form.email, &form.password) {
            Ok(email) => email,
            Err(invalid) => {
                form.submitting = false;
                form.show_error(invalid.message, invalid.focus);
                return;
            }
        };

        let result = self.backend.sign_in(&email, &form.password).await;
        form.submitting = false;
        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Login succeeded");
                let next = form.next.clone();
                self.state.session = SessionState::Present(user);
                self.replace(Location::parse(&next));
            }
            Err(e) => {
                tracing::warn!("Login failed: {}", e);
                let message = auth_error_message(&e.provider_message(), AuthErrorContext::SignIn);
                form.show_error(message, AuthFocus::Error);
            }
        }
    }

    async fn sign_up(&mut self) {
        let Page::Register(form) = &mut self.state.page else {
            return;
        };
        let email = match validate_registration(&form.email, &form.password, &form.confirm_password)
        {
            Ok(email) => email,
            Err(invalid) => {
                form.submitting = false;
                form.show_error(invalid.message, invalid.focus);
                return;
            }
        };

        let result = self.backend.sign_up(&email, &form.password).await;
        form.submitting = false;
        match result {
            Ok(user) => {
                let next = form.next.clone();
                match user {
                    Some(user) => {
                        tracing::info!(user_id = %user.id, "Registration succeeded");
                        self.state.session = SessionState::Present(user);
                    }
                    None => {
                        self.state.status_message =
                            Some("Check your email to confirm your account.".to_string());
                    }
                }
                self.replace(Location::parse(&next));
            }
            Err(e) => {
                tracing::warn!("Registration failed: {}", e);
                let message = auth_error_message(&e.provider_message(), AuthErrorContext::SignUp);
                form.show_error(message, AuthFocus::Error);
            }
        }
    }

    async fn sign_out(&mut self) {
        if let Err(e) = self.backend.sign_out().await {
            tracing::warn!("Remote sign-out failed: {}", e);
        }
        self.state.session = SessionState::Absent;
        self.state.history.clear();
        self.replace(Route::Home.into());
        self.state.status_message = Some("Signed out.".to_string());
    }

    async fn submit_listing(&mut self) {
        let Page::Confirmation(review) = &mut self.state.page else {
            return;
        };
        let outcome = review
            .submit(
                self.backend.as_ref(),
                self.drafts.as_mut(),
                self.config.listings_table(),
            )
            .await;

        match outcome {
            SubmitOutcome::Submitted => {
                self.navigate(Route::Home.into());
                self.state.status_message = Some("Your listing has been saved.".to_string());
            }
            SubmitOutcome::LoginRequired(login) => {
                self.state.session = SessionState::Absent;
                self.navigate(login);
            }
            SubmitOutcome::MissingDrafts(start) => self.replace(start),
            // Shown inline on the review page
            SubmitOutcome::Failed(_) | SubmitOutcome::AlreadyInFlight => {}
        }
    }
}

/// What a key press on a wizard step asks the app to do
enum StepKey<K: FieldKey> {
    Handled,
    Outcome(StepOutcome<K>),
    Back(Route),
}

fn step_key<K: FieldKey>(
    controller: &mut StepController<K>,
    key: KeyEvent,
    drafts: &mut dyn DraftStore,
) -> StepKey<K> {
    let form = &mut controller.form;
    match key.code {
        KeyCode::Esc => return StepKey::Back(controller.back()),
        KeyCode::Enter if key.modifiers.contains(NEWLINE_MODIFIER) => form.push_char('\n'),
        KeyCode::Enter => return StepKey::Outcome(controller.request_advance(drafts)),
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left => form.cycle_option(false),
        KeyCode::Right => form.cycle_option(true),
        KeyCode::Backspace => form.pop_char(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => form.push_char(c),
        _ => {}
    }
    StepKey::Handled
}
