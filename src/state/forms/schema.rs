//! Listing field schema
//!
//! Static description of the fields collected at each wizard step.
//! Declaration order is render order, validation order and review order.

use crate::state::drafts::DraftNamespace;
use crate::state::wizard::WizardStep;
use std::fmt::Debug;
use std::hash::Hash;

/// How a field's value is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    FreeText,
    /// Value must be one of the listed options
    Enumerated(&'static [&'static str]),
}

/// Extra format rule applied once a value is present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Any,
    /// Decimal money amount, at most two fraction digits
    Money,
}

/// One schema entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Persisted key in the draft store
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub format: FieldFormat,
    pub multiline: bool,
}

impl FieldSpec {
    const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::FreeText,
            format: FieldFormat::Any,
            multiline: false,
        }
    }

    const fn select(
        key: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Enumerated(options),
            format: FieldFormat::Any,
            multiline: false,
        }
    }

    pub fn options(&self) -> Option<&'static [&'static str]> {
        match self.kind {
            FieldKind::Enumerated(options) => Some(options),
            FieldKind::FreeText => None,
        }
    }
}

/// Closed set of field identifiers for one wizard step
pub trait FieldKey: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// The step these fields belong to
    const STEP: WizardStep;

    /// Where the step's draft is persisted
    const NAMESPACE: DraftNamespace;

    /// All fields, in declaration order
    const ALL: &'static [Self];

    fn spec(self) -> &'static FieldSpec;

    fn key(self) -> &'static str {
        self.spec().key
    }

    fn label(self) -> &'static str {
        self.spec().label
    }

    /// Position in declaration order
    fn index(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }

    /// Look up a field by its persisted key
    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.key() == key)
    }
}

pub const BRAND_OPTIONS: &[&str] = &["Bosch", "Samsung", "LG", "Whirlpool", "Electrolux", "Beko"];

pub const APPLIANCE_TYPE_OPTIONS: &[&str] = &[
    "Washing Machine",
    "Fridge",
    "Dishwasher",
    "Dryer",
    "Oven",
    "Microwave",
    "Toaster",
];

pub const PART_TYPE_OPTIONS: &[&str] = &[
    "Motor",
    "Door",
    "Drum",
    "Filter",
    "Shelf",
    "Control Panel",
    "Tray",
];

pub const CONDITION_OPTIONS: &[&str] = &[
    "New",
    "Used - Like New",
    "Used - Good",
    "Used - Acceptable",
];

/// Step 1: basic info
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicField {
    Brand,
    ApplianceType,
    PartType,
    ShortDescription,
}

static BRAND: FieldSpec = FieldSpec::select("brand", "Brand", BRAND_OPTIONS);
static APPLIANCE_TYPE: FieldSpec =
    FieldSpec::select("applianceType", "Appliance Type", APPLIANCE_TYPE_OPTIONS);
static PART_TYPE: FieldSpec = FieldSpec::select("partType", "Part Type", PART_TYPE_OPTIONS);
static SHORT_DESCRIPTION: FieldSpec = FieldSpec::text("shortDescription", "Short Description");

impl FieldKey for BasicField {
    const STEP: WizardStep = WizardStep::BasicInfo;
    const NAMESPACE: DraftNamespace = DraftNamespace::BasicInfo;
    const ALL: &'static [Self] = &[
        Self::Brand,
        Self::ApplianceType,
        Self::PartType,
        Self::ShortDescription,
    ];

    fn spec(self) -> &'static FieldSpec {
        match self {
            Self::Brand => &BRAND,
            Self::ApplianceType => &APPLIANCE_TYPE,
            Self::PartType => &PART_TYPE,
            Self::ShortDescription => &SHORT_DESCRIPTION,
        }
    }
}

/// Step 2: additional details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailsField {
    Condition,
    Price,
    Location,
    Description,
}

static CONDITION: FieldSpec = FieldSpec::select("condition", "Condition", CONDITION_OPTIONS);
static PRICE: FieldSpec = FieldSpec {
    format: FieldFormat::Money,
    ..FieldSpec::text("price", "Price")
};
static LOCATION: FieldSpec = FieldSpec::text("location", "Location");
static DESCRIPTION: FieldSpec = FieldSpec {
    multiline: true,
    ..FieldSpec::text("description", "Description")
};

impl FieldKey for DetailsField {
    const STEP: WizardStep = WizardStep::AdditionalDetails;
    const NAMESPACE: DraftNamespace = DraftNamespace::AdditionalDetails;
    const ALL: &'static [Self] = &[
        Self::Condition,
        Self::Price,
        Self::Location,
        Self::Description,
    ];

    fn spec(self) -> &'static FieldSpec {
        match self {
            Self::Condition => &CONDITION,
            Self::Price => &PRICE,
            Self::Location => &LOCATION,
            Self::Description => &DESCRIPTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_declaration_order() {
        let keys: Vec<_> = BasicField::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(
            keys,
            ["brand", "applianceType", "partType", "shortDescription"]
        );
    }

    #[test]
    fn test_details_declaration_order() {
        let labels: Vec<_> = DetailsField::ALL.iter().map(|f| f.label()).collect();
        assert_eq!(labels, ["Condition", "Price", "Location", "Description"]);
    }

    #[test]
    fn test_enumerated_fields_have_options() {
        assert_eq!(BasicField::Brand.spec().options(), Some(BRAND_OPTIONS));
        assert_eq!(DetailsField::Condition.spec().options(), Some(CONDITION_OPTIONS));
        assert!(BasicField::ShortDescription.spec().options().is_none());
    }

    #[test]
    fn test_only_price_is_money() {
        for field in DetailsField::ALL {
            let is_money = field.spec().format == FieldFormat::Money;
            assert_eq!(is_money, *field == DetailsField::Price);
        }
        assert!(BasicField::ALL
            .iter()
            .all(|f| f.spec().format == FieldFormat::Any));
    }

    #[test]
    fn test_index_and_from_key() {
        assert_eq!(DetailsField::Location.index(), 2);
        assert_eq!(BasicField::from_key("partType"), Some(BasicField::PartType));
        assert_eq!(BasicField::from_key("part_type"), None);
    }
}
