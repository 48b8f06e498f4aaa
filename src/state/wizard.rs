//! Listing wizard state machine
//!
//! Each step is a [`StepController`] over that step's field enum. Entering
//! a step checks its prerequisites in the draft store, advancing validates
//! and persists, and every transition returns the route to go to instead of
//! navigating on its own.

use super::app_state::Route;
use super::drafts::{load_draft, save_draft, DraftNamespace, DraftStore};
use super::forms::{BasicField, DetailsField, FieldKey, StepForm};
use super::validation::validate;

/// Ordered wizard steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    BasicInfo,
    AdditionalDetails,
    Confirmation,
}

impl WizardStep {
    pub fn route(self) -> Route {
        match self {
            Self::BasicInfo => Route::BasicInfo,
            Self::AdditionalDetails => Route::AdditionalDetails,
            Self::Confirmation => Route::Confirmation,
        }
    }

    /// Drafts that must exist before this step can load
    pub fn prerequisites(self) -> &'static [DraftNamespace] {
        match self {
            Self::BasicInfo => &[],
            Self::AdditionalDetails => &[DraftNamespace::BasicInfo],
            Self::Confirmation => &[DraftNamespace::BasicInfo, DraftNamespace::AdditionalDetails],
        }
    }

    /// Where a successful advance leads
    pub fn next(self) -> Route {
        match self {
            Self::BasicInfo => Route::AdditionalDetails,
            Self::AdditionalDetails => Route::Confirmation,
            Self::Confirmation => Route::Home,
        }
    }

    /// Where Back leads
    pub fn previous(self) -> Route {
        match self {
            Self::BasicInfo => Route::Home,
            Self::AdditionalDetails => Route::BasicInfo,
            Self::Confirmation => Route::AdditionalDetails,
        }
    }

    /// Step position for the progress indicator (1-based)
    pub fn number(self) -> usize {
        match self {
            Self::BasicInfo => 1,
            Self::AdditionalDetails => 2,
            Self::Confirmation => 3,
        }
    }
}

/// Whether a namespace holds a decodable draft
pub fn draft_ready(store: &dyn DraftStore, namespace: DraftNamespace) -> bool {
    match namespace {
        DraftNamespace::BasicInfo => load_draft::<BasicField>(store).present().is_some(),
        DraftNamespace::AdditionalDetails => {
            load_draft::<DetailsField>(store).present().is_some()
        }
    }
}

/// Check a step's prerequisites. Missing or corrupt data sends the user
/// back to the start of the wizard.
pub fn check_prerequisites(step: WizardStep, store: &dyn DraftStore) -> Result<(), Route> {
    for namespace in step.prerequisites() {
        if !draft_ready(store, *namespace) {
            tracing::warn!(
                "Draft {} missing for {:?}, restarting wizard",
                namespace.key(),
                step
            );
            return Err(WizardStep::BasicInfo.route());
        }
    }
    Ok(())
}

/// Phase of a step while it is on screen.
///
/// A gated step that is still waiting for the session is represented by
/// `Page::Loading` and never reaches a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    Editing,
    SubmittingAdvance,
    Advanced,
}

/// Result of an advance request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome<K: FieldKey> {
    /// Validation failed; focus moved to this field
    Invalid { focus: K },
    /// Draft saved; go to this route
    Advanced(Route),
    /// Draft could not be saved
    StoreFailed(String),
}

/// Controller for one data-entry step
#[derive(Debug, Clone)]
pub struct StepController<K: FieldKey> {
    pub form: StepForm<K>,
    phase: StepPhase,
}

impl<K: FieldKey> StepController<K> {
    /// Enter the step, or get the route to redirect to.
    ///
    /// A draft previously saved for this step pre-fills the form.
    pub fn enter(store: &dyn DraftStore) -> Result<Self, Route> {
        check_prerequisites(K::STEP, store)?;
        let draft = load_draft::<K>(store).present().unwrap_or_default();
        Ok(Self {
            form: StepForm::from_draft(draft),
            phase: StepPhase::Editing,
        })
    }

    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    pub fn step(&self) -> WizardStep {
        K::STEP
    }

    /// Validate, then persist and advance.
    ///
    /// All errors are recorded at once and focus moves to the first invalid
    /// field in schema order.
    pub fn request_advance(&mut self, store: &mut dyn DraftStore) -> StepOutcome<K> {
        self.phase = StepPhase::SubmittingAdvance;

        let errors = validate(&self.form.draft);
        if let Some(first) = errors.first_invalid() {
            let invalid: Vec<K> = errors.iter().map(|(k, _)| k).collect();
            tracing::debug!("{:?}: invalid fields {:?}", K::STEP, invalid);
            self.form.errors = errors;
            self.form.focus(first);
            self.phase = StepPhase::Editing;
            return StepOutcome::Invalid { focus: first };
        }
        self.form.errors = errors;

        match save_draft(store, &self.form.draft) {
            Ok(()) => {
                self.phase = StepPhase::Advanced;
                tracing::info!("{:?} saved, advancing", K::STEP);
                StepOutcome::Advanced(K::STEP.next())
            }
            Err(e) => {
                self.phase = StepPhase::Editing;
                tracing::warn!("Failed to save {:?} draft: {}", K::STEP, e);
                StepOutcome::StoreFailed(format!("We couldn't save your progress. {e}"))
            }
        }
    }

    /// Leave without validating or saving
    pub fn back(&self) -> Route {
        K::STEP.previous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::drafts::{DraftError, MemoryDraftStore};
    use crate::state::forms::{Form, StepDraft};
    use pretty_assertions::assert_eq;

    fn complete_basic() -> StepDraft<BasicField> {
        let mut draft = StepDraft::new();
        draft.set(BasicField::Brand, "LG");
        draft.set(BasicField::ApplianceType, "Fridge");
        draft.set(BasicField::PartType, "Shelf");
        draft.set(BasicField::ShortDescription, "Glass shelf, lower");
        draft
    }

    /// Store whose writes always fail
    struct ReadOnlyStore;

    impl DraftStore for ReadOnlyStore {
        fn write(&mut self, _: DraftNamespace, _: &str) -> Result<(), DraftError> {
            Err(DraftError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
        fn read(&self, _: DraftNamespace) -> Result<Option<String>, DraftError> {
            Ok(None)
        }
        fn clear(&mut self, _: DraftNamespace) -> Result<(), DraftError> {
            Ok(())
        }
    }

    mod steps {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_order() {
            assert_eq!(WizardStep::BasicInfo.next(), Route::AdditionalDetails);
            assert_eq!(WizardStep::AdditionalDetails.next(), Route::Confirmation);
            assert_eq!(WizardStep::Confirmation.next(), Route::Home);
        }

        #[test]
        fn test_back_targets() {
            assert_eq!(WizardStep::BasicInfo.previous(), Route::Home);
            assert_eq!(WizardStep::AdditionalDetails.previous(), Route::BasicInfo);
            assert_eq!(
                WizardStep::Confirmation.previous(),
                Route::AdditionalDetails
            );
        }

        #[test]
        fn test_prerequisites() {
            assert!(WizardStep::BasicInfo.prerequisites().is_empty());
            assert_eq!(
                WizardStep::Confirmation.prerequisites(),
                &[DraftNamespace::BasicInfo, DraftNamespace::AdditionalDetails]
            );
        }
    }

    mod entering {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_step_one_always_enters() {
            let store = MemoryDraftStore::new();
            let controller = StepController::<BasicField>::enter(&store).unwrap();
            assert_eq!(controller.phase(), StepPhase::Editing);
            assert_eq!(controller.form.active_field(), 0);
        }

        #[test]
        fn test_step_two_without_step_one_redirects() {
            let store = MemoryDraftStore::new();
            let result = StepController::<DetailsField>::enter(&store);
            assert_eq!(result.unwrap_err(), Route::BasicInfo);
        }

        #[test]
        fn test_step_two_with_corrupt_step_one_redirects() {
            let mut store = MemoryDraftStore::new();
            store.write(DraftNamespace::BasicInfo, "not json").unwrap();
            let result = StepController::<DetailsField>::enter(&store);
            assert_eq!(result.unwrap_err(), Route::BasicInfo);
        }

        #[test]
        fn test_reentry_prefills_saved_draft() {
            let mut store = MemoryDraftStore::new();
            save_draft(&mut store, &complete_basic()).unwrap();
            let controller = StepController::<BasicField>::enter(&store).unwrap();
            assert_eq!(controller.form.draft, complete_basic());
        }
    }

    mod advancing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_scenario_a_complete_step_one_persists_and_advances() {
            let mut store = MemoryDraftStore::new();
            let mut controller = StepController::<BasicField>::enter(&store).unwrap();
            for (field, value) in complete_basic().iter() {
                controller.form.edit(field, value);
            }

            let outcome = controller.request_advance(&mut store);
            assert_eq!(outcome, StepOutcome::Advanced(Route::AdditionalDetails));
            assert_eq!(controller.phase(), StepPhase::Advanced);
            assert!(store.contains(DraftNamespace::BasicInfo));

            // A fresh session without step one data cannot reach step two
            let fresh = MemoryDraftStore::new();
            assert_eq!(
                StepController::<DetailsField>::enter(&fresh).unwrap_err(),
                Route::BasicInfo
            );
        }

        #[test]
        fn test_scenario_b_bad_price_blocks_and_focuses_price() {
            let mut store = MemoryDraftStore::new();
            save_draft(&mut store, &complete_basic()).unwrap();
            let mut controller = StepController::<DetailsField>::enter(&store).unwrap();
            controller.form.edit(DetailsField::Condition, "Used - Good");
            controller.form.edit(DetailsField::Price, "19.999");
            controller.form.edit(DetailsField::Location, "Galway");
            controller.form.edit(DetailsField::Description, "Works fine");

            let outcome = controller.request_advance(&mut store);
            assert_eq!(
                outcome,
                StepOutcome::Invalid {
                    focus: DetailsField::Price
                }
            );
            assert_eq!(controller.phase(), StepPhase::Editing);
            assert_eq!(controller.form.active_key(), DetailsField::Price);
            assert_eq!(
                controller.form.error_for(DetailsField::Price),
                Some("Price must be a valid number (e.g., 12.99).")
            );
            assert!(!store.contains(DraftNamespace::AdditionalDetails));
        }

        #[test]
        fn test_all_errors_shown_at_once_focus_first() {
            let mut store = MemoryDraftStore::new();
            let mut controller = StepController::<BasicField>::enter(&store).unwrap();
            controller.form.focus(BasicField::ShortDescription);
            controller.form.edit(BasicField::ApplianceType, "Oven");

            let outcome = controller.request_advance(&mut store);
            assert_eq!(
                outcome,
                StepOutcome::Invalid {
                    focus: BasicField::Brand
                }
            );
            assert_eq!(controller.form.errors.iter().count(), 3);
            assert!(controller.form.errors.get(BasicField::ApplianceType).is_none());
        }

        #[test]
        fn test_errors_cleared_after_fix() {
            let mut store = MemoryDraftStore::new();
            let mut controller = StepController::<BasicField>::enter(&store).unwrap();
            controller.request_advance(&mut store);
            for (field, value) in complete_basic().iter() {
                controller.form.edit(field, value);
            }
            controller.request_advance(&mut store);
            assert!(controller.form.errors.is_empty());
        }

        #[test]
        fn test_store_failure_stays_editing() {
            let mut store = ReadOnlyStore;
            let mut controller = StepController::<BasicField>::enter(&store).unwrap();
            controller.form.draft = complete_basic();
            let outcome = controller.request_advance(&mut store);
            assert!(matches!(outcome, StepOutcome::StoreFailed(_)));
            assert_eq!(controller.phase(), StepPhase::Editing);
        }

        #[test]
        fn test_back_does_not_persist() {
            let store = MemoryDraftStore::new();
            let mut controller = StepController::<BasicField>::enter(&store).unwrap();
            controller.form.edit(BasicField::Brand, "Beko");
            assert_eq!(controller.back(), Route::Home);
            assert!(!store.contains(DraftNamespace::BasicInfo));
        }
    }
}
