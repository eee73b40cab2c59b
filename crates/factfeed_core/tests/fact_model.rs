use factfeed_core::{find_category, list_categories, Fact, VoteField};

fn fact_with_votes(interest: u32, mindblow: u32, falsehood: u32) -> Fact {
    Fact {
        id: 1,
        text: "Octopuses have three hearts".to_string(),
        source: "https://example.com/octopus".to_string(),
        category: "science".to_string(),
        votes_interest: interest,
        votes_mindblow: mindblow,
        votes_false: falsehood,
        created_at: 1_700_000_000_000,
    }
}

#[test]
fn disputed_iff_false_votes_exceed_positive_votes() {
    for interest in 0..6 {
        for mindblow in 0..6 {
            for falsehood in 0..12 {
                let fact = fact_with_votes(interest, mindblow, falsehood);
                assert_eq!(
                    fact.is_disputed(),
                    interest + mindblow < falsehood,
                    "interest={interest} mindblow={mindblow} false={falsehood}"
                );
            }
        }
    }
}

#[test]
fn dispute_check_does_not_overflow() {
    let fact = fact_with_votes(u32::MAX, u32::MAX, u32::MAX);
    assert!(!fact.is_disputed());

    let fact = fact_with_votes(0, 0, u32::MAX);
    assert!(fact.is_disputed());
}

#[test]
fn dispute_status_follows_vote_changes() {
    let mut fact = fact_with_votes(1, 1, 2);
    assert!(!fact.is_disputed());

    fact.votes_false += 1;
    assert!(fact.is_disputed());

    fact.votes_mindblow += 1;
    assert!(!fact.is_disputed());
}

#[test]
fn fact_serialization_uses_store_column_names() {
    let fact = fact_with_votes(3, 2, 1);
    let json = serde_json::to_value(&fact).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["v_interest"], 3);
    assert_eq!(json["v_mindblow"], 2);
    assert_eq!(json["v_false"], 1);
    assert_eq!(json["created_at"], 1_700_000_000_000_i64);
    assert!(json.get("is_disputed").is_none());

    let decoded: Fact = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, fact);
}

#[test]
fn vote_fields_map_to_counters_and_columns() {
    let fact = fact_with_votes(7, 8, 9);
    assert_eq!(fact.votes(VoteField::Interest), 7);
    assert_eq!(fact.votes(VoteField::Mindblow), 8);
    assert_eq!(fact.votes(VoteField::False), 9);

    let columns: Vec<_> = VoteField::ALL.iter().map(|field| field.column()).collect();
    assert_eq!(columns, ["v_interest", "v_mindblow", "v_false"]);

    assert_eq!(VoteField::parse("interest"), Some(VoteField::Interest));
    assert_eq!(VoteField::parse("V_FALSE"), Some(VoteField::False));
    assert_eq!(VoteField::parse("like"), None);
}

#[test]
fn every_category_has_a_color() {
    for category in list_categories() {
        assert!(category.color.starts_with('#'), "{}", category.name);
        assert_eq!(find_category(category.name), Some(category));
    }
}
