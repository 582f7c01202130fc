// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end behaviour of both engines through the `SpamPredictor` façade

use spam_predictor::{
    EngineKind, FeatureSet, SpamLabel, SpamPredictor, SpamPredictorConfig, demo_examples,
    sample_corpus,
};

const SPAM_SCENARIO: &str = "FREE MONEY! Click here to claim your $1000 prize NOW!";
const HAM_SCENARIO: &str = "Thanks for your help with the project. It looks great!";

fn check_texts() -> Vec<&'static str> {
    let demos = demo_examples();
    let mut texts = vec!["", "   ", "!!!???", "12345", "https://example.com", "a@b"];
    texts.extend(demos.ham);
    texts.extend(demos.spam);
    texts
}

fn trained_statistical() -> SpamPredictor {
    let mut predictor = SpamPredictor::new(SpamPredictorConfig::default()).unwrap();
    predictor.train(&sample_corpus()).unwrap();
    predictor
}

fn rules() -> SpamPredictor {
    SpamPredictor::new(SpamPredictorConfig::for_engine(EngineKind::Rules)).unwrap()
}

#[test]
fn statistical_engine_recovers_training_labels() {
    let predictor = trained_statistical();
    let corpus = sample_corpus();

    let recovered = corpus
        .iter()
        .filter(|example| predictor.predict(&example.text).unwrap().prediction() == example.label)
        .count();

    assert!(recovered >= 18, "recovered only {recovered}/20 labels");
}

#[test]
fn rule_engine_scenarios() {
    let predictor = rules();

    let spam = predictor.predict(SPAM_SCENARIO).unwrap();
    assert_eq!(spam.prediction(), SpamLabel::Spam);
    assert!(spam.features().spam_keyword_count >= 1);
    assert_eq!(spam.features().exclamation_count, 2);
    assert!(spam.features().capital_ratio() > 0.2);

    let ham = predictor.predict(HAM_SCENARIO).unwrap();
    assert_eq!(ham.prediction(), SpamLabel::Ham);
    assert_eq!(ham.features().spam_keyword_count, 0);
    assert!(ham.features().ham_keyword_count >= 1);
}

#[test]
fn statistical_engine_separates_scenarios() {
    let predictor = trained_statistical();
    assert_eq!(
        predictor
            .predict("FREE MONEY! Click here to claim your prize!")
            .unwrap()
            .prediction(),
        SpamLabel::Spam
    );
    assert_eq!(
        predictor.predict(HAM_SCENARIO).unwrap().prediction(),
        SpamLabel::Ham
    );
}

#[test]
fn empty_text_yields_well_formed_result() {
    for predictor in [rules(), trained_statistical()] {
        let result = predictor.predict("").unwrap();
        assert_eq!(*result.features(), FeatureSet::default());
        assert!((result.spam_probability() + result.ham_probability() - 1.0).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&result.confidence()));
    }

    let result = rules().predict("").unwrap();
    assert_eq!(result.prediction(), SpamLabel::Ham);
    assert!(result.spam_probability().abs() < f64::EPSILON);
}

#[test]
fn probabilities_are_complementary_and_bounded() {
    for predictor in [rules(), trained_statistical()] {
        for text in check_texts() {
            let result = predictor.predict(text).unwrap();
            let spam = result.spam_probability();

            assert!((0.0..=1.0).contains(&spam), "{text:?}: {spam}");
            assert!((0.0..=1.0).contains(&result.confidence()));
            assert!((spam + result.ham_probability() - 1.0).abs() < 1e-9);
            assert_eq!(result.is_spam(), result.prediction() == SpamLabel::Spam);
        }
    }
}

#[test]
fn rule_engine_decision_follows_threshold() {
    let predictor = rules();
    for text in check_texts() {
        let result = predictor.predict(text).unwrap();
        assert_eq!(result.is_spam(), result.spam_probability() > 0.5, "{text:?}");
        let expected_confidence = (result.spam_probability() - 0.5).abs() * 2.0;
        assert!((result.confidence() - expected_confidence).abs() < 1e-12);
    }
}

#[test]
fn statistical_confidence_is_chosen_class_probability() {
    let predictor = trained_statistical();
    for text in check_texts() {
        let result = predictor.predict(text).unwrap();
        let chosen = if result.is_spam() {
            result.spam_probability()
        } else {
            result.ham_probability()
        };
        assert!((result.confidence() - chosen).abs() < 1e-12, "{text:?}");
    }
}

#[test]
fn predictions_are_deterministic() {
    for predictor in [rules(), trained_statistical()] {
        for text in check_texts() {
            assert_eq!(
                predictor.predict(text).unwrap(),
                predictor.predict(text).unwrap()
            );
        }
    }
}

#[test]
fn save_and_load_preserve_predictions() {
    let dir = tempfile::tempdir().unwrap();

    for (source, config) in [
        (trained_statistical(), SpamPredictorConfig::default()),
        (rules(), SpamPredictorConfig::for_engine(EngineKind::Rules)),
    ] {
        let path = dir.path().join(format!("{}.json", source.kind()));
        source.save(&path).unwrap();

        let restored = SpamPredictor::from_path(config, &path).unwrap();
        assert!(restored.is_ready());
        for text in check_texts() {
            assert_eq!(
                restored.predict(text).unwrap(),
                source.predict(text).unwrap(),
                "{text:?}"
            );
        }
    }
}

#[test]
fn loaded_model_keeps_its_normalizer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");

    let mut config = SpamPredictorConfig::default();
    config.normalizer.strip_digits = false;
    let mut source = SpamPredictor::new(config).unwrap();
    source.train(&sample_corpus()).unwrap();
    source.save(&path).unwrap();

    let restored = SpamPredictor::from_path(SpamPredictorConfig::default(), &path).unwrap();
    let text = "Win 1000 dollars now";
    assert_eq!(
        restored.predict(text).unwrap(),
        source.predict(text).unwrap()
    );
}

#[test]
fn load_failure_leaves_predictor_untrained() {
    let dir = tempfile::tempdir().unwrap();
    let mut predictor = SpamPredictor::new(SpamPredictorConfig::default()).unwrap();

    let err = predictor.load(dir.path().join("missing.json")).unwrap_err();
    assert!(err.is_model_missing());
    assert!(!predictor.is_ready());

    // Falling back to training recovers
    predictor.train(&sample_corpus()).unwrap();
    assert!(predictor.is_ready());
}

fn saved_statistical_json(dir: &tempfile::TempDir) -> (std::path::PathBuf, serde_json::Value) {
    let path = dir.path().join("model.json");
    trained_statistical().save(&path).unwrap();
    let json = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    (path, json)
}

fn assert_rejected(path: &std::path::Path, json: &serde_json::Value) {
    std::fs::write(path, serde_json::to_vec(json).unwrap()).unwrap();

    let mut predictor = SpamPredictor::new(SpamPredictorConfig::default()).unwrap();
    let err = predictor.load(path).unwrap_err();
    assert!(err.is_model_missing(), "unexpected error: {err}");
    assert!(!err.is_retryable());
    assert!(!predictor.is_ready());
}

#[test]
fn out_of_range_vocabulary_index_is_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let (path, mut json) = saved_statistical_json(&dir);

    assert!(json["state"]["vectorizer"]["vocabulary"]["free"].is_number());
    json["state"]["vectorizer"]["vocabulary"]["free"] = 999.into();

    assert_rejected(&path, &json);
}

#[test]
fn zero_length_ngrams_are_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let (path, mut json) = saved_statistical_json(&dir);

    json["state"]["vectorizer"]["config"]["ngram_range"] = serde_json::json!([0, 1]);

    assert_rejected(&path, &json);
}

#[test]
fn classifier_shape_mismatch_is_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let (path, mut json) = saved_statistical_json(&dir);

    json["state"]["classifier"]["feature_log_prob"][1]
        .as_array_mut()
        .unwrap()
        .pop();

    assert_rejected(&path, &json);
}

#[test]
fn truncated_idf_is_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let (path, mut json) = saved_statistical_json(&dir);

    json["state"]["vectorizer"]["idf"]
        .as_array_mut()
        .unwrap()
        .pop();

    assert_rejected(&path, &json);
}

#[test]
fn invalid_rule_threshold_is_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.json");
    rules().save(&path).unwrap();

    let mut json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    json["state"]["weights"]["threshold"] = 1.5.into();
    std::fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();

    let mut predictor = rules();
    let err = predictor.load(&path).unwrap_err();
    assert!(err.is_model_missing(), "unexpected error: {err}");
    // The rule engine keeps its constructed weights
    assert_eq!(
        predictor.predict(SPAM_SCENARIO).unwrap().prediction(),
        SpamLabel::Spam
    );
}

#[test]
fn overlapping_keywords_are_counted_once() {
    let result = rules().predict("click here").unwrap();
    assert_eq!(result.features().spam_keyword_count, 1);

    let result = trained_statistical().predict("Click here, click HERE!").unwrap();
    assert_eq!(result.features().spam_keyword_count, 2);
}
