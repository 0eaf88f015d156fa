use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Product offer the leads are scored against. Replaced wholesale on every
/// store; never mutated during a scoring run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub name: String,
    pub value_props: Vec<String>,
    pub ideal_use_cases: Vec<String>,
}

impl Offer {
    /// Validates an incoming offer payload: `name` must be a non-empty
    /// string, `value_props` and `ideal_use_cases` must be arrays (possibly
    /// empty). Array entries that are not strings are stringified rather
    /// than rejected.
    pub fn from_payload(payload: &Value) -> Result<Self, OfferError> {
        let object = payload.as_object().ok_or(OfferError::PayloadRequired)?;

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(OfferError::InvalidShape)?;

        let value_props =
            string_array(object.get("value_props")).ok_or(OfferError::InvalidShape)?;
        let ideal_use_cases =
            string_array(object.get("ideal_use_cases")).ok_or(OfferError::InvalidShape)?;

        Ok(Self {
            name: name.to_string(),
            value_props,
            ideal_use_cases,
        })
    }
}

fn string_array(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .map(|item| match item.as_str() {
                Some(text) => text.to_string(),
                None => item.to_string(),
            })
            .collect(),
    )
}

/// Persisted form of an offer, stamped at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredOffer {
    #[serde(flatten)]
    pub offer: Offer,
    pub created_at: DateTime<Utc>,
}

impl StoredOffer {
    pub fn new(offer: Offer) -> Self {
        Self {
            offer,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OfferError {
    #[error("Offer payload required")]
    PayloadRequired,
    #[error("Fields required: name (string), value_props (array), ideal_use_cases (array)")]
    InvalidShape,
    #[error("No offer found. POST /offer first.")]
    NotFound,
}

/// A normalized lead row. Every field defaults to the empty string so a
/// sparse CSV row still produces a scoreable lead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub linkedin_bio: String,
}

impl Lead {
    /// True when all six fields carry non-blank values after trimming.
    pub fn is_complete(&self) -> bool {
        [
            &self.name,
            &self.role,
            &self.company,
            &self.industry,
            &self.location,
            &self.linkedin_bio,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

/// Buying-intent tier reported by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    High,
    Medium,
    Low,
}

impl Intent {
    /// Permissive parse: the upstream classifier's output is not trusted,
    /// so anything other than exactly "High" or "Medium" collapses to Low.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "High" => Self::High,
            "Medium" => Self::Medium,
            _ => Self::Low,
        }
    }

    /// Points contributed to the total score: High 50, Medium 30, Low 10.
    pub fn points(self) -> u8 {
        match self {
            Self::High => 50,
            Self::Medium => 30,
            Self::Low => 10,
        }
    }
}

/// Transient classifier output for one (lead, offer) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentResult {
    pub intent: Intent,
    pub reasoning: String,
}

/// One scored output record. Field order here defines both the JSON record
/// shape and the CSV export column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredLead {
    pub name: String,
    pub role: String,
    pub company: String,
    pub industry: String,
    pub location: String,
    pub intent: Intent,
    pub score: u8,
    pub rule_score: u8,
    pub ai_points: u8,
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn offer_payload_with_all_fields_validates() {
        let payload = json!({
            "name": "AI Outreach Automation",
            "value_props": ["24/7 outreach", "6x more meetings"],
            "ideal_use_cases": ["B2B SaaS mid-market"],
        });

        let offer = Offer::from_payload(&payload).expect("valid payload");
        assert_eq!(offer.name, "AI Outreach Automation");
        assert_eq!(offer.value_props.len(), 2);
        assert_eq!(offer.ideal_use_cases, vec!["B2B SaaS mid-market"]);
    }

    #[test]
    fn offer_payload_must_be_an_object() {
        let err = Offer::from_payload(&Value::Null).expect_err("null rejected");
        assert_eq!(err, OfferError::PayloadRequired);
    }

    #[test]
    fn offer_payload_rejects_blank_name_and_missing_arrays() {
        let blank_name = json!({ "name": "  ", "value_props": [], "ideal_use_cases": [] });
        assert_eq!(
            Offer::from_payload(&blank_name).expect_err("blank name rejected"),
            OfferError::InvalidShape
        );

        let scalar_props = json!({ "name": "X", "value_props": "fast", "ideal_use_cases": [] });
        assert_eq!(
            Offer::from_payload(&scalar_props).expect_err("non-array rejected"),
            OfferError::InvalidShape
        );
    }

    #[test]
    fn offer_payload_allows_empty_arrays_and_stringifies_entries() {
        let payload = json!({ "name": "X", "value_props": [], "ideal_use_cases": [42] });
        let offer = Offer::from_payload(&payload).expect("valid payload");
        assert!(offer.value_props.is_empty());
        assert_eq!(offer.ideal_use_cases, vec!["42"]);
    }

    #[test]
    fn intent_label_parse_is_permissive() {
        assert_eq!(Intent::from_label("High"), Intent::High);
        assert_eq!(Intent::from_label(" Medium "), Intent::Medium);
        assert_eq!(Intent::from_label("Low"), Intent::Low);
        assert_eq!(Intent::from_label("HIGH"), Intent::Low);
        assert_eq!(Intent::from_label("maybe?"), Intent::Low);
        assert_eq!(Intent::from_label(""), Intent::Low);
    }

    #[test]
    fn intent_points_follow_the_tier_mapping() {
        assert_eq!(Intent::High.points(), 50);
        assert_eq!(Intent::Medium.points(), 30);
        assert_eq!(Intent::Low.points(), 10);
    }

    #[test]
    fn lead_completeness_requires_every_field() {
        let mut lead = Lead {
            name: "Dana".to_string(),
            role: "Senior Manager".to_string(),
            company: "Acme".to_string(),
            industry: "SaaS".to_string(),
            location: "NY".to_string(),
            linkedin_bio: "bio".to_string(),
        };
        assert!(lead.is_complete());

        lead.location = "   ".to_string();
        assert!(!lead.is_complete());
    }
}
