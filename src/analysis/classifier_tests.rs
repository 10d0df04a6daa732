use super::*;

#[test]
fn test_default_table_kick() {
    let classifier = DrumClassifier::default();

    // 100 Hz sits in the low band [20, 150)
    assert_eq!(
        classifier.classify(100.0),
        "kick",
        "Expected kick for a 100 Hz estimate"
    );
}

#[test]
fn test_default_table_snare_and_hihat() {
    let classifier = DrumClassifier::default();

    assert_eq!(classifier.classify(400.0), "snare");
    assert_eq!(classifier.classify(2500.0), "hihat-closed");
}

#[test]
fn test_band_bounds_are_half_open() {
    let classifier = DrumClassifier::default();

    assert_eq!(classifier.classify(20.0), "kick");
    // 150 belongs to the mid band, not the low band
    assert_eq!(classifier.classify(150.0), "snare");
    assert_eq!(classifier.classify(800.0), "hihat-closed");
    // 5000 is past the top band's exclusive upper bound
    assert_eq!(classifier.classify(5000.0), DEFAULT_FALLBACK_DRUM);
}

#[test]
fn test_out_of_range_falls_back() {
    let classifier = DrumClassifier::default();

    assert_eq!(classifier.classify(12000.0), "snare");
    assert_eq!(classifier.classify(0.0), "snare");
    assert_eq!(classifier.classify(10.0), "snare");
}

#[test]
fn test_first_match_wins_on_overlap() {
    let classifier = DrumClassifier::new(
        vec![
            FrequencyRange::new("floor", 50.0, 200.0, "tom-floor"),
            FrequencyRange::new("low", 20.0, 150.0, "kick"),
        ],
        "ride",
    );

    assert_eq!(classifier.classify(100.0), "tom-floor");
    assert_eq!(classifier.classify(30.0), "kick");
    assert_eq!(classifier.classify(9000.0), "ride");
}

#[test]
fn test_classifier_from_config() {
    let config = AnalysisConfig {
        frequency_ranges: vec![FrequencyRange::new("all", 0.0, 20000.0, "clap")],
        fallback_drum: "none".to_string(),
        ..AnalysisConfig::default()
    };
    let classifier = DrumClassifier::from_config(&config);

    assert_eq!(classifier.classify(440.0), "clap");
    assert_eq!(classifier.classify(30000.0), "none");
    assert_eq!(classifier.fallback(), "none");
    assert_eq!(classifier.ranges().len(), 1);
}

#[test]
fn test_empty_table_always_falls_back() {
    let classifier = DrumClassifier::new(Vec::new(), "snare");
    assert_eq!(classifier.classify(100.0), "snare");
}
