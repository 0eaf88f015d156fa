use super::classifier::IntentClassifier;
use super::rules;
use crate::domain::{Intent, IntentResult, Lead, Offer, ScoredLead};
use std::sync::Arc;
use tracing::warn;

/// Reasoning substituted when a classifier call fails despite the adapter's
/// own internal handling.
pub const FALLBACK_REASONING: &str = "AI service unavailable — defaulted to Low";

const TOTAL_SCORE_CAP: u8 = 100;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("No offer found. POST /offer first.")]
    MissingOffer,
    #[error("No leads found. POST /leads/upload first.")]
    MissingLeads,
    #[error("Leads file is empty")]
    EmptyLeads,
}

/// Drives the scoring pipeline over a batch of leads: rule score plus
/// classifier intent per lead, combined, clamped, and collected in input
/// order. Persistence of the finished batch is the caller's concern.
pub struct ScoringPipeline<C: ?Sized> {
    classifier: Arc<C>,
}

impl<C> ScoringPipeline<C>
where
    C: IntentClassifier + ?Sized,
{
    pub fn new(classifier: Arc<C>) -> Self {
        Self { classifier }
    }

    /// Scores every lead against the offer. Always returns one record per
    /// input lead, in input order; a single lead's classifier failure never
    /// aborts the batch.
    pub async fn run(
        &self,
        offer: &Offer,
        leads: &[Lead],
    ) -> Result<Vec<ScoredLead>, ScoringError> {
        if leads.is_empty() {
            return Err(ScoringError::EmptyLeads);
        }

        let mut batch = Vec::with_capacity(leads.len());
        for lead in leads {
            batch.push(self.score_lead(lead, offer).await);
        }
        Ok(batch)
    }

    async fn score_lead(&self, lead: &Lead, offer: &Offer) -> ScoredLead {
        let rule_score = rules::rule_score(lead, offer);

        // The adapter already absorbs remote failures; this guard catches
        // anything that still escapes so the batch stays complete.
        let IntentResult { intent, reasoning } = match self.classifier.classify(lead, offer).await {
            Ok(result) => result,
            Err(err) => {
                warn!(lead = %lead.name, error = %err, "classifier failed, defaulting intent to Low");
                IntentResult {
                    intent: Intent::Low,
                    reasoning: FALLBACK_REASONING.to_string(),
                }
            }
        };

        let ai_points = intent.points();
        let score = (rule_score + ai_points).min(TOTAL_SCORE_CAP);

        ScoredLead {
            name: lead.name.clone(),
            role: lead.role.clone(),
            company: lead.company.clone(),
            industry: lead.industry.clone(),
            location: lead.location.clone(),
            intent,
            score,
            rule_score,
            ai_points,
            reasoning: flatten_reasoning(&reasoning),
        }
    }
}

/// Reasoning text must not carry embedded newlines into the flat exports.
fn flatten_reasoning(raw: &str) -> String {
    raw.replace(['\n', '\r'], " ").trim().to_string()
}
