use skinlab_api::{
    classifier::heuristic::SkinTypeScores,
    skin::{ConditionScores, ConditionWeights, SkinCondition, argmax, format_label},
};

#[tokio::test]
async fn argmax_prefers_first_label_on_ties() {
    assert_eq!(argmax([40.0, 40.0, 10.0, 10.0]), Some(0));
    assert_eq!(argmax([1.0, 3.0, 3.0]), Some(1));
    assert_eq!(argmax(Vec::<f64>::new()), None);
}

#[tokio::test]
async fn argmax_skips_nan() {
    assert_eq!(argmax([f64::NAN, 0.2, 0.1]), Some(1));
    assert_eq!(argmax([f64::NAN, f64::NAN]), None);
}

#[tokio::test]
async fn tied_skin_types_resolve_to_oily() {
    let scores = SkinTypeScores {
        oily: 40.0,
        dry: 40.0,
        normal: 10.0,
        acne: 10.0,
    };
    assert_eq!(scores.dominant(), "oily");
}

#[tokio::test]
async fn dominant_condition_of_clear_skin_scores() {
    let scores = ConditionScores {
        acne: 0.1,
        blackheads: 0.1,
        clear_skin: 0.9,
        dark_spots: 0.05,
        puffy_eyes: 0.05,
        wrinkles: 0.05,
    };
    assert_eq!(scores.dominant(), SkinCondition::ClearSkin);
}

#[tokio::test]
async fn missing_score_fields_default_to_zero() {
    let scores: ConditionScores =
        serde_json::from_str(r#"{"acne": 12.5, "wrinkles": 80}"#).expect("valid json");
    assert_eq!(scores.acne, 12.5);
    assert_eq!(scores.blackheads, 0.0);
    assert_eq!(scores.dominant(), SkinCondition::Wrinkles);
}

#[tokio::test]
async fn labels_round_trip_through_strings() {
    for condition in SkinCondition::ALL {
        let parsed: SkinCondition = condition.as_str().parse().expect("known label");
        assert_eq!(parsed, condition);
    }
    assert!("oily".parse::<SkinCondition>().is_err());
    assert_eq!(format_label("dark_spots"), "Dark Spots");
    assert_eq!(SkinCondition::PuffyEyes.display_name(), "Puffy Eyes");
}

#[tokio::test]
async fn combined_weights_scale_by_largest_total() {
    let salicylic = ConditionWeights {
        w_acne: 0.9,
        w_blackheads: 0.9,
        ..Default::default()
    };
    let tea_tree = ConditionWeights {
        w_acne: 0.8,
        w_blackheads: 0.4,
        ..Default::default()
    };
    let combined = ConditionWeights::combine([&salicylic, &tea_tree]);

    assert!((combined.w_acne - 1.0).abs() < 1e-9);
    assert!((combined.w_blackheads - 1.3 / 1.7).abs() < 1e-9);
    assert_eq!(combined.w_wrinkles, 0.0);
}

#[tokio::test]
async fn small_totals_are_not_scaled_up() {
    let aloe = ConditionWeights {
        w_clear_skin: 0.6,
        w_acne: 0.3,
        ..Default::default()
    };
    let combined = ConditionWeights::combine([&aloe]);
    assert_eq!(combined, aloe);

    assert_eq!(ConditionWeights::combine(Vec::new()), ConditionWeights::default());
}

#[tokio::test]
async fn weighted_sum_is_a_dot_product() {
    let scores = ConditionScores {
        acne: 0.5,
        wrinkles: 0.25,
        ..Default::default()
    };
    let weights = ConditionWeights {
        w_acne: 0.8,
        w_wrinkles: 0.4,
        w_clear_skin: 1.0,
        ..Default::default()
    };
    assert!((scores.weighted_sum(&weights) - 0.5).abs() < 1e-9);
}
