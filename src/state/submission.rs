//! Listing review and submission

use super::app_state::{paths, Location, Route};
use super::drafts::{load_draft, DraftNamespace, DraftStore};
use super::forms::{BasicField, DetailsField, FieldKey, StepDraft};
use super::wizard::WizardStep;
use crate::backend::MarketplaceBackend;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Shown for unset values on the review page
pub const EMPTY_VALUE: &str = "—";

/// Prefix of the message shown when the insert fails
pub const SUBMIT_FAILED_PREFIX: &str = "Sorry, we couldn't save your listing.";

/// Both step drafts, as loaded for review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDrafts {
    pub basic: StepDraft<BasicField>,
    pub details: StepDraft<DetailsField>,
}

/// Load both drafts. `None` if either is missing or corrupt.
pub fn load_listing_drafts(store: &dyn DraftStore) -> Option<ListingDrafts> {
    let basic = load_draft::<BasicField>(store).present()?;
    let details = load_draft::<DetailsField>(store).present()?;
    Some(ListingDrafts { basic, details })
}

/// The two drafts merged at submission time
#[derive(Debug, Clone, PartialEq)]
pub struct MergedListing {
    pub drafts: ListingDrafts,
    pub created_at: DateTime<Utc>,
}

impl MergedListing {
    pub fn merge(drafts: ListingDrafts, created_at: DateTime<Utc>) -> Self {
        Self { drafts, created_at }
    }

    /// Map to the remote record shape
    pub fn to_payload(&self, user_id: &str) -> ListingPayload {
        let basic = &self.drafts.basic;
        let details = &self.drafts.details;
        ListingPayload {
            brand: basic.get(BasicField::Brand).to_string(),
            appliance_type: basic.get(BasicField::ApplianceType).to_string(),
            part_type: basic.get(BasicField::PartType).to_string(),
            short_description: basic.get(BasicField::ShortDescription).to_string(),
            condition: details.get(DetailsField::Condition).to_string(),
            price: coerce_price(details.get(DetailsField::Price)),
            location: details.get(DetailsField::Location).to_string(),
            description: details.get(DetailsField::Description).to_string(),
            user_id: user_id.to_string(),
            created_at: self.created_at.to_rfc3339(),
        }
    }
}

/// Outgoing `listings` row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingPayload {
    pub brand: String,
    pub appliance_type: String,
    pub part_type: String,
    pub short_description: String,
    pub condition: String,
    pub price: f64,
    pub location: String,
    pub description: String,
    pub user_id: String,
    pub created_at: String,
}

/// Loose price parsing: keep digits, `.` and `,`, read the first comma as
/// a decimal point, and fall back to zero.
pub fn coerce_price(raw: &str) -> f64 {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let normalised = kept.replacen(',', ".", 1);
    match normalised.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Review rows in schema order, step one first
pub fn review_rows(drafts: &ListingDrafts) -> Vec<(&'static str, String)> {
    let display = |value: &str| {
        if value.trim().is_empty() {
            EMPTY_VALUE.to_string()
        } else {
            value.to_string()
        }
    };
    let basic = drafts.basic.iter().map(|(k, v)| (k.label(), display(v)));
    let details = drafts.details.iter().map(|(k, v)| (k.label(), display(v)));
    basic.chain(details).collect()
}

/// Result of a submit request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission is already outstanding; nothing was sent
    AlreadyInFlight,
    /// Drafts vanished; restart the wizard
    MissingDrafts(Location),
    /// No session; sign in and come back
    LoginRequired(Location),
    /// The insert failed; drafts are kept so the user can retry
    Failed(String),
    /// Saved and drafts cleared; go home
    Submitted,
}

/// Controller for the confirmation page
#[derive(Debug, Clone)]
pub struct ReviewController {
    drafts: ListingDrafts,
    in_flight: bool,
    pub error: Option<String>,
}

impl ReviewController {
    /// Enter the review page, or get the route to redirect to
    pub fn enter(store: &dyn DraftStore) -> Result<Self, Route> {
        match load_listing_drafts(store) {
            Some(drafts) => Ok(Self {
                drafts,
                in_flight: false,
                error: None,
            }),
            None => {
                tracing::warn!("Review opened without both drafts, restarting wizard");
                Err(WizardStep::BasicInfo.route())
            }
        }
    }

    pub fn drafts(&self) -> &ListingDrafts {
        &self.drafts
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    pub fn back(&self) -> Route {
        WizardStep::Confirmation.previous()
    }

    /// Mark a submission as started. While it is outstanding further
    /// requests are refused with [`SubmitOutcome::AlreadyInFlight`].
    pub fn begin(&mut self) -> Result<(), SubmitOutcome> {
        if self.in_flight {
            return Err(SubmitOutcome::AlreadyInFlight);
        }
        self.in_flight = true;
        self.error = None;
        Ok(())
    }

    /// Re-check the session, insert the merged listing and clear the drafts.
    ///
    /// The caller must have won [`ReviewController::begin`]; the in-flight
    /// flag is released before returning.
    pub async fn submit(
        &mut self,
        backend: &dyn MarketplaceBackend,
        store: &mut dyn DraftStore,
        table: &str,
    ) -> SubmitOutcome {
        let outcome = self.run_submit(backend, store, table).await;
        self.in_flight = false;
        if let SubmitOutcome::Failed(message) = &outcome {
            self.error = Some(message.clone());
        }
        outcome
    }

    async fn run_submit(
        &mut self,
        backend: &dyn MarketplaceBackend,
        store: &mut dyn DraftStore,
        table: &str,
    ) -> SubmitOutcome {
        let user = match backend.current_user().await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::info!("Session expired before submit, sending to login");
                return SubmitOutcome::LoginRequired(Location::with_next(
                    Route::Login,
                    paths::CONFIRMATION,
                ));
            }
            Err(e) => {
                tracing::warn!("Session check failed before submit: {}", e);
                return SubmitOutcome::Failed(format!(
                    "{SUBMIT_FAILED_PREFIX} {}",
                    e.provider_message()
                ));
            }
        };

        // Drafts could have been cleared by another page since entry
        let Some(drafts) = load_listing_drafts(store) else {
            return SubmitOutcome::MissingDrafts(WizardStep::BasicInfo.route().into());
        };
        self.drafts = drafts;

        let merged = MergedListing::merge(self.drafts.clone(), Utc::now());
        let payload = match serde_json::to_value(merged.to_payload(&user.id)) {
            Ok(payload) => payload,
            Err(e) => return SubmitOutcome::Failed(format!("{SUBMIT_FAILED_PREFIX} {e}")),
        };

        if let Err(e) = backend.insert_record(table, payload).await {
            tracing::error!("Failed to insert listing: {}", e);
            return SubmitOutcome::Failed(format!(
                "{SUBMIT_FAILED_PREFIX} {}",
                e.provider_message()
            ));
        }

        for namespace in DraftNamespace::ALL {
            if let Err(e) = store.clear(namespace) {
                tracing::warn!("Failed to clear draft {}: {}", namespace.key(), e);
            }
        }
        tracing::info!("Listing submitted for user {}", user.id);
        SubmitOutcome::Submitted
    }
}
