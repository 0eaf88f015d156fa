use crate::domain::{Lead, Offer};

const DECISION_MAKER_KEYWORDS: [&str; 11] = [
    "head",
    "vp",
    "vice",
    "chief",
    "ceo",
    "cto",
    "founder",
    "co-founder",
    "owner",
    "director",
    "president",
];

const INFLUENCER_KEYWORDS: [&str; 4] = ["manager", "lead", "principal", "senior"];

const RULE_SCORE_CAP: u8 = 50;

/// Deterministic rule score in [0, 50]: role relevance (0/10/20) plus
/// industry match (0/10/20) plus data completeness (0/10), clamped. Pure
/// computation with no failure mode; a malformed lead scores low, never
/// aborts a batch.
pub fn rule_score(lead: &Lead, offer: &Offer) -> u8 {
    let score = role_relevance(&lead.role)
        + industry_match(&lead.industry, &offer.ideal_use_cases)
        + completeness(lead);
    score.min(RULE_SCORE_CAP)
}

/// Decision makers outrank influencers; the checks are mutually exclusive.
fn role_relevance(role: &str) -> u8 {
    let role = role.trim().to_lowercase();
    if role.is_empty() {
        return 0;
    }

    if DECISION_MAKER_KEYWORDS
        .iter()
        .any(|keyword| role.contains(keyword))
    {
        20
    } else if INFLUENCER_KEYWORDS
        .iter()
        .any(|keyword| role.contains(keyword))
    {
        10
    } else {
        0
    }
}

/// An industry equal to or containing a whole ideal-use-case phrase wins
/// 20; a mere word-token overlap (the industry naming one word of a longer
/// phrase) wins 10. Both passes scan use cases in given order and
/// short-circuit on the first hit.
fn industry_match(industry: &str, ideal_use_cases: &[String]) -> u8 {
    let industry = industry.trim().to_lowercase();
    if industry.is_empty() {
        return 0;
    }

    for use_case in ideal_use_cases {
        let use_case = use_case.trim().to_lowercase();
        if use_case.is_empty() {
            continue;
        }
        if industry == use_case || industry.contains(&use_case) {
            return 20;
        }
    }

    for use_case in ideal_use_cases {
        let use_case = use_case.to_lowercase();
        let tokens = use_case
            .split(|c: char| c.is_whitespace() || c == ',' || c == '/' || c == '-')
            .filter(|token| !token.is_empty());
        for token in tokens {
            if industry.contains(token) {
                return 10;
            }
        }
    }

    0
}

fn completeness(lead: &Lead) -> u8 {
    if lead.is_complete() {
        10
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_offer() -> Offer {
        Offer {
            name: "AI Outreach Automation".to_string(),
            value_props: vec!["24/7 outreach".to_string(), "6x more meetings".to_string()],
            ideal_use_cases: vec!["B2B SaaS mid-market".to_string()],
        }
    }

    fn lead(name: &str, role: &str, industry: &str, location: &str, bio: &str) -> Lead {
        Lead {
            name: name.to_string(),
            role: role.to_string(),
            company: "Acme".to_string(),
            industry: industry.to_string(),
            location: location.to_string(),
            linkedin_bio: bio.to_string(),
        }
    }

    #[test]
    fn decision_maker_with_exact_industry_and_complete_data_scores_fifty() {
        let lead = lead("Alice", "CEO", "B2B SaaS mid-market", "NY", "...");
        assert_eq!(rule_score(&lead, &sample_offer()), 50);
    }

    #[test]
    fn vp_role_counts_as_decision_maker() {
        let lead = lead("Charlie", "VP Sales", "B2B SaaS mid-market", "NY", "...");
        assert_eq!(rule_score(&lead, &sample_offer()), 50);
    }

    #[test]
    fn influencer_role_with_partial_industry_match_scores_thirty() {
        let lead = lead("Dana", "Senior Manager", "SaaS", "NY", "bio");
        // 10 influencer + 10 token overlap + 10 completeness
        assert_eq!(rule_score(&lead, &sample_offer()), 30);
    }

    #[test]
    fn influencer_with_no_match_and_incomplete_data_scores_ten() {
        let incomplete = Lead {
            name: "Bob".to_string(),
            role: "Engineering Manager".to_string(),
            ..Lead::default()
        };
        assert_eq!(rule_score(&incomplete, &sample_offer()), 10);
    }

    #[test]
    fn unrecognized_role_scores_zero_for_relevance() {
        let lead = lead("Eve", "Accountant", "Retail", "NY", "...");
        // completeness only
        assert_eq!(rule_score(&lead, &sample_offer()), 10);
    }

    #[test]
    fn incomplete_lead_loses_the_completeness_points() {
        let lead = Lead {
            name: "Eve".to_string(),
            company: "Acme".to_string(),
            ..Lead::default()
        };
        assert_eq!(rule_score(&lead, &sample_offer()), 0);
    }

    #[test]
    fn empty_lead_scores_zero() {
        assert_eq!(rule_score(&Lead::default(), &sample_offer()), 0);
    }

    #[test]
    fn industry_containing_the_whole_phrase_scores_twenty() {
        let offer = Offer {
            name: "X".to_string(),
            value_props: vec![],
            ideal_use_cases: vec!["fintech".to_string()],
        };
        let broader = lead("A", "", "Consumer Fintech Platforms", "", "");
        assert_eq!(rule_score(&broader, &offer), 20);
    }

    #[test]
    fn industry_naming_one_word_of_a_phrase_scores_ten() {
        let dana = lead("Dana", "", "SaaS", "", "");
        // "SaaS" is a token of "B2B SaaS mid-market", not the whole phrase
        assert_eq!(rule_score(&dana, &sample_offer()), 10);
    }

    #[test]
    fn use_case_tokens_split_on_punctuation() {
        let offer = Offer {
            name: "X".to_string(),
            value_props: vec![],
            ideal_use_cases: vec!["logistics/transport, last-mile".to_string()],
        };
        let slash_token = lead("A", "", "transport", "", "");
        assert_eq!(rule_score(&slash_token, &offer), 10);

        let hyphen_token = lead("A", "", "last mile carriers", "", "");
        assert_eq!(rule_score(&hyphen_token, &offer), 10);
    }

    #[test]
    fn empty_use_case_list_contributes_nothing() {
        let offer = Offer {
            name: "X".to_string(),
            value_props: vec![],
            ideal_use_cases: vec![],
        };
        let lead = lead("A", "CTO", "SaaS", "NY", "bio");
        assert_eq!(rule_score(&lead, &offer), 30);
    }

    #[test]
    fn score_is_deterministic_and_bounded() {
        let offer = sample_offer();
        let lead = lead("Dana", "Senior Manager", "SaaS", "NY", "bio");
        let first = rule_score(&lead, &offer);
        for _ in 0..10 {
            let score = rule_score(&lead, &offer);
            assert_eq!(score, first);
            assert!(score <= 50);
        }
    }
}
