//! Closed category sets for each property type.
//!
//! Each taxonomy is a plain enum whose serialized form is the literal label the
//! model is asked to return. The [`Taxonomy`] trait bundles the labels with the
//! instruction text and response schema, so one categorization routine serves
//! every property type.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// Kind of property an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Hotel,
    #[default]
    Apartment,
}

impl PropertyType {
    /// Parse a property type from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hotel" => Some(Self::Hotel),
            "apartment" => Some(Self::Apartment),
            _ => None,
        }
    }

    /// Category labels for this property type, in taxonomy order.
    pub fn labels(&self) -> Vec<&'static str> {
        match self {
            PropertyType::Hotel => HotelCategory::labels(),
            PropertyType::Apartment => ApartmentCategory::labels(),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::Hotel => write!(f, "hotel"),
            PropertyType::Apartment => write!(f, "apartment"),
        }
    }
}

/// A closed set of categories plus the prompt material that goes with it.
pub trait Taxonomy:
    Copy + Eq + fmt::Debug + fmt::Display + Serialize + Send + Sync + 'static
{
    /// Property type this taxonomy classifies.
    const PROPERTY: PropertyType;

    /// Fixed instruction sent alongside every image.
    const INSTRUCTION: &'static str;

    /// Every variant, in taxonomy order.
    fn all() -> &'static [Self];

    /// The exact label the model must return for this variant.
    fn label(&self) -> &'static str;

    /// Look up a variant by its exact label. No trimming, no case folding.
    fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.label() == label)
    }

    /// All labels, in taxonomy order.
    fn labels() -> Vec<&'static str> {
        Self::all().iter().map(|c| c.label()).collect()
    }

    /// Response schema constraining the model to `{category, reason}`.
    fn response_schema() -> serde_json::Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "category": {
                    "type": "STRING",
                    "enum": Self::labels(),
                    "description": format!(
                        "The specific image category relevant to {} amenities and spaces.",
                        Self::PROPERTY
                    ),
                },
                "reason": {
                    "type": "STRING",
                    "description": "A single-sentence justification for the category choice.",
                },
            },
            "required": ["category", "reason"],
            "propertyOrdering": ["category", "reason"],
        })
    }
}

/// Hotel image categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HotelCategory {
    #[serde(rename = "Guest Room")]
    GuestRoom,
    #[serde(rename = "Bathroom")]
    Bathroom,
    #[serde(rename = "Lobby / Common Area")]
    LobbyCommonArea,
    #[serde(rename = "Restaurants / Bar")]
    RestaurantsBar,
    #[serde(rename = "Facilities (Amenities)")]
    FacilitiesAmenities,
    #[serde(rename = "Exterior / Facade")]
    ExteriorFacade,
    #[serde(rename = "Miscellaneous / Details")]
    MiscellaneousDetails,
    #[serde(rename = "Other")]
    Other,
    #[serde(rename = "Non-Relevant")]
    NonRelevant,
}

const HOTEL_CATEGORIES: &[HotelCategory] = &[
    HotelCategory::GuestRoom,
    HotelCategory::Bathroom,
    HotelCategory::LobbyCommonArea,
    HotelCategory::RestaurantsBar,
    HotelCategory::FacilitiesAmenities,
    HotelCategory::ExteriorFacade,
    HotelCategory::MiscellaneousDetails,
    HotelCategory::Other,
    HotelCategory::NonRelevant,
];

const HOTEL_INSTRUCTION: &str = "\
You are an expert image classification system for a business travel platform. \
Your task is to analyze the provided image of a hotel property and classify it \
into ONE specific category from the allowed list defined in the JSON schema.

INSTRUCTION:
1. Classify the image into ONE specific category from the 'category' enum provided in the schema.
2. Provide a brief, single-sentence justification for your classification in the 'reason' field.

STRICT CONSTRAINTS:
- You MUST respond only with a valid JSON object that strictly conforms to the provided JSON Schema.
- The 'category' value MUST be an exact match to one of the enum values allowed.
";

impl Taxonomy for HotelCategory {
    const PROPERTY: PropertyType = PropertyType::Hotel;
    const INSTRUCTION: &'static str = HOTEL_INSTRUCTION;

    fn all() -> &'static [Self] {
        HOTEL_CATEGORIES
    }

    fn label(&self) -> &'static str {
        match self {
            HotelCategory::GuestRoom => "Guest Room",
            HotelCategory::Bathroom => "Bathroom",
            HotelCategory::LobbyCommonArea => "Lobby / Common Area",
            HotelCategory::RestaurantsBar => "Restaurants / Bar",
            HotelCategory::FacilitiesAmenities => "Facilities (Amenities)",
            HotelCategory::ExteriorFacade => "Exterior / Facade",
            HotelCategory::MiscellaneousDetails => "Miscellaneous / Details",
            HotelCategory::Other => "Other",
            HotelCategory::NonRelevant => "Non-Relevant",
        }
    }
}

impl fmt::Display for HotelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Apartment image categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApartmentCategory {
    #[serde(rename = "Bedroom")]
    Bedroom,
    #[serde(rename = "Bathroom")]
    Bathroom,
    #[serde(rename = "Kitchen / Utility")]
    KitchenUtility,
    #[serde(rename = "Living / Dining")]
    LivingDining,
    #[serde(rename = "Exterior / Building")]
    ExteriorBuilding,
    #[serde(rename = "View / Balcony")]
    ViewBalcony,
    #[serde(rename = "Other")]
    Other,
    #[serde(rename = "Non-Relevant")]
    NonRelevant,
}

const APARTMENT_CATEGORIES: &[ApartmentCategory] = &[
    ApartmentCategory::Bedroom,
    ApartmentCategory::Bathroom,
    ApartmentCategory::KitchenUtility,
    ApartmentCategory::LivingDining,
    ApartmentCategory::ExteriorBuilding,
    ApartmentCategory::ViewBalcony,
    ApartmentCategory::Other,
    ApartmentCategory::NonRelevant,
];

// The property type is already known, so the model must not echo it back.
const APARTMENT_INSTRUCTION: &str = "\
You are an expert image classification system for a business travel platform. \
Your task is to analyze the provided image of an apartment property and classify it \
into ONE specific category from the allowed list defined in the JSON schema.

INSTRUCTION:
1. Classify the image into ONE specific category from the 'category' enum provided in the schema.
2. Provide a brief, single-sentence justification for your classification in the 'reason' field.

STRICT CONSTRAINTS:
- You MUST respond only with a valid JSON object that strictly conforms to the provided JSON Schema.
- The output MUST NOT include the 'property_type' field, as it is known to be 'Apartment'.
- The 'category' value MUST be an exact match to one of the enum values allowed.
";

impl Taxonomy for ApartmentCategory {
    const PROPERTY: PropertyType = PropertyType::Apartment;
    const INSTRUCTION: &'static str = APARTMENT_INSTRUCTION;

    fn all() -> &'static [Self] {
        APARTMENT_CATEGORIES
    }

    fn label(&self) -> &'static str {
        match self {
            ApartmentCategory::Bedroom => "Bedroom",
            ApartmentCategory::Bathroom => "Bathroom",
            ApartmentCategory::KitchenUtility => "Kitchen / Utility",
            ApartmentCategory::LivingDining => "Living / Dining",
            ApartmentCategory::ExteriorBuilding => "Exterior / Building",
            ApartmentCategory::ViewBalcony => "View / Balcony",
            ApartmentCategory::Other => "Other",
            ApartmentCategory::NonRelevant => "Non-Relevant",
        }
    }
}

impl fmt::Display for ApartmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
