use async_trait::async_trait;
use lead_scoring::domain::{Intent, IntentResult, Lead, Offer, ScoredLead, StoredOffer};
use lead_scoring::ingest;
use lead_scoring::scoring::classifier::{ClassifierError, IntentClassifier};
use lead_scoring::scoring::{formatter, ScoringError, ScoringPipeline, FALLBACK_REASONING};
use lead_scoring::store::{DocumentStore, InMemoryStore};
use std::io::Cursor;
use std::sync::Arc;

struct FixedClassifier {
    intent: Intent,
    fail_for: Option<String>,
}

#[async_trait]
impl IntentClassifier for FixedClassifier {
    async fn classify(&self, lead: &Lead, offer: &Offer) -> Result<IntentResult, ClassifierError> {
        if self.fail_for.as_deref() == Some(lead.name.as_str()) {
            return Err(ClassifierError::EmptyResponse);
        }
        Ok(IntentResult {
            intent: self.intent,
            reasoning: format!("{} fit for {}", lead.name, offer.name),
        })
    }
}

fn sample_offer() -> Offer {
    Offer {
        name: "AI Outreach Automation".to_string(),
        value_props: vec!["24/7 outreach".to_string(), "6x more meetings".to_string()],
        ideal_use_cases: vec!["B2B SaaS mid-market".to_string()],
    }
}

const LEADS_CSV: &str = "\
name,role,company,industry,location,linkedin bio
Alice,CEO,Acme,B2B SaaS mid-market,NY,founder-turned-operator
Bob,Engineering Manager,Globex,Retail,SF,
Dana,Senior Manager,Initech,SaaS,NY,growth bio
";

#[tokio::test]
async fn csv_upload_through_scoring_to_export() {
    let store = InMemoryStore::default();

    store
        .put_offer(&StoredOffer::new(sample_offer()))
        .expect("offer stored");

    let leads = ingest::parse_leads(Cursor::new(LEADS_CSV.as_bytes())).expect("csv parses");
    assert_eq!(leads.len(), 3);
    store.put_leads(&leads).expect("leads stored");

    let offer = store
        .get_offer()
        .expect("offer read")
        .expect("offer present");
    let leads = store
        .get_leads()
        .expect("leads read")
        .expect("leads present");

    let pipeline = ScoringPipeline::new(Arc::new(FixedClassifier {
        intent: Intent::Medium,
        fail_for: None,
    }));
    let batch = pipeline
        .run(&offer.offer, &leads)
        .await
        .expect("scoring completes");

    assert_eq!(batch.len(), 3);

    // Alice: 20 role + 20 exact industry + 10 completeness + 30 Medium.
    assert_eq!(batch[0].rule_score, 50);
    assert_eq!(batch[0].score, 80);

    // Bob: influencer role, no industry match, blank bio.
    assert_eq!(batch[1].rule_score, 10);
    assert_eq!(batch[1].score, 40);

    // Dana: the canonical 30-rule-point scenario.
    assert_eq!(batch[2].rule_score, 30);
    assert_eq!(batch[2].score, 60);

    store.put_results(&batch).expect("results stored");
    let exported = store
        .get_results()
        .expect("results read")
        .expect("results present");
    let csv = formatter::to_csv(&exported).expect("csv renders");

    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "name,role,company,industry,location,intent,score,rule_score,ai_points,reasoning"
    );
    assert!(lines[1].starts_with("Alice,"));
    assert!(lines[3].starts_with("Dana,"));
}

#[tokio::test]
async fn one_failing_lead_degrades_alone() {
    let pipeline = ScoringPipeline::new(Arc::new(FixedClassifier {
        intent: Intent::High,
        fail_for: Some("Bob".to_string()),
    }));

    let leads = ingest::parse_leads(Cursor::new(LEADS_CSV.as_bytes())).expect("csv parses");
    let batch = pipeline
        .run(&sample_offer(), &leads)
        .await
        .expect("scoring completes");

    assert_eq!(batch.len(), 3);
    assert_eq!(batch[0].intent, Intent::High);
    assert_eq!(batch[1].intent, Intent::Low);
    assert_eq!(batch[1].reasoning, FALLBACK_REASONING);
    assert_eq!(batch[2].intent, Intent::High);
}

#[tokio::test]
async fn empty_lead_set_fails_the_run() {
    let pipeline = ScoringPipeline::new(Arc::new(FixedClassifier {
        intent: Intent::High,
        fail_for: None,
    }));

    let err = pipeline
        .run(&sample_offer(), &[])
        .await
        .expect_err("empty set rejected");
    assert_eq!(err, ScoringError::EmptyLeads);
}

#[test]
fn results_replace_wholesale_between_runs() {
    let store = InMemoryStore::default();

    let first = vec![scored("Alice", 80), scored("Bob", 40)];
    store.put_results(&first).expect("first batch stored");

    let second = vec![scored("Dana", 60)];
    store.put_results(&second).expect("second batch stored");

    let current = store
        .get_results()
        .expect("results read")
        .expect("results present");
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].name, "Dana");
}

fn scored(name: &str, score: u8) -> ScoredLead {
    ScoredLead {
        name: name.to_string(),
        role: "CEO".to_string(),
        company: "Acme".to_string(),
        industry: "SaaS".to_string(),
        location: "NY".to_string(),
        intent: Intent::Medium,
        score,
        rule_score: score.saturating_sub(30),
        ai_points: 30,
        reasoning: "fit".to_string(),
    }
}
