use super::*;
use crate::testing::{DrumVoice, HitTrack};

const SAMPLE_RATE: u32 = 44100;
const HOP: usize = 512;
/// 43 hops = 0.4992s, which the tempo histogram buckets as 0.5s
const SPACING: usize = 43 * HOP;
const FIRST_HIT: usize = 4 * HOP;

fn alternating_track(count: usize) -> DecodedAudio {
    let voices: Vec<DrumVoice> = (0..count)
        .map(|i| {
            if i % 2 == 0 {
                DrumVoice::Kick
            } else {
                DrumVoice::Snare
            }
        })
        .collect();
    HitTrack::grid(SAMPLE_RATE, &voices, FIRST_HIT, SPACING).into_audio()
}

fn hit_time(index: usize) -> f64 {
    (FIRST_HIT + index * SPACING) as f64 / SAMPLE_RATE as f64
}

#[test]
fn test_silence_yields_no_points_and_default_tempo() {
    let pipeline = OnsetAnalysisPipeline::default();
    let audio = DecodedAudio::new(vec![0.0; SAMPLE_RATE as usize * 2], SAMPLE_RATE);

    let result = pipeline.analyze(&audio).unwrap();

    assert!(result.drum_points.is_empty());
    assert_eq!(result.bpm, 120);
    assert!((result.duration - 2.0).abs() < 1e-9);
    assert_eq!(result.sample_rate, SAMPLE_RATE);
}

#[test]
fn test_buffer_shorter_than_a_frame() {
    let pipeline = OnsetAnalysisPipeline::default();
    let audio = DecodedAudio::new(vec![0.5; 600], SAMPLE_RATE);

    let result = pipeline.analyze(&audio).unwrap();
    assert!(result.drum_points.is_empty());
    assert_eq!(result.bpm, 120);
}

#[test]
fn test_invalid_input_rejected() {
    let pipeline = OnsetAnalysisPipeline::default();

    let empty = DecodedAudio::new(Vec::new(), SAMPLE_RATE);
    assert_eq!(pipeline.analyze(&empty), Err(AnalysisError::EmptyBuffer));

    let no_rate = DecodedAudio::new(vec![0.0; 4096], 0);
    assert_eq!(
        pipeline.analyze(&no_rate),
        Err(AnalysisError::InvalidSampleRate { sample_rate: 0 })
    );
}

#[test]
fn test_alternating_kick_snare_grid() {
    let pipeline = OnsetAnalysisPipeline::default();
    let audio = alternating_track(8);

    let result = pipeline.analyze(&audio).unwrap();

    assert_eq!(
        result.drum_points.len(),
        8,
        "Expected one drum point per hit, got {:?}",
        result.drum_points
    );

    let hop_secs = HOP as f64 / SAMPLE_RATE as f64;
    for (i, point) in result.drum_points.iter().enumerate() {
        let expected = if i % 2 == 0 { "kick" } else { "snare" };
        assert_eq!(
            point.auto_drum, expected,
            "point {} at {:.3}s estimated {:.1} Hz",
            i, point.time, point.frequency
        );
        // The peak lands on the frame that first overlaps the hit
        assert!(
            (point.time - hit_time(i)).abs() <= hop_secs + 1e-9,
            "point {} at {:.4}s, hit at {:.4}s",
            i,
            point.time,
            hit_time(i)
        );
        assert!((0.0..=1.0).contains(&point.strength));
        assert!(point.frequency >= 0.0);
        assert!(!point.confirmed);
    }

    assert_eq!(result.bpm, 120);
    assert!((result.duration - audio.duration()).abs() < 1e-12);
}

#[test]
fn test_hihat_classified_high() {
    let pipeline = OnsetAnalysisPipeline::default();
    let audio = HitTrack::grid(
        SAMPLE_RATE,
        &[DrumVoice::HiHat, DrumVoice::Kick, DrumVoice::HiHat],
        FIRST_HIT,
        SPACING,
    )
    .into_audio();

    let drums: Vec<String> = pipeline
        .analyze(&audio)
        .unwrap()
        .drum_points
        .into_iter()
        .map(|point| point.auto_drum)
        .collect();

    assert_eq!(drums, vec!["hihat-closed", "kick", "hihat-closed"]);
}

#[test]
fn test_custom_table_flows_through_pipeline() {
    let config = AnalysisConfig {
        frequency_ranges: Vec::new(),
        fallback_drum: "tom".to_string(),
        ..AnalysisConfig::default()
    };
    let pipeline = OnsetAnalysisPipeline::new(config);

    let result = pipeline.analyze(&alternating_track(4)).unwrap();
    assert_eq!(result.drum_points.len(), 4);
    assert!(result.drum_points.iter().all(|p| p.auto_drum == "tom"));
    // Four onsets are enough for a tempo estimate
    assert_eq!(result.bpm, 120);
}

#[test]
fn test_progress_reported_in_order() {
    let pipeline = OnsetAnalysisPipeline::default();
    let audio = alternating_track(2);
    let mut updates = Vec::new();

    pipeline
        .analyze_with_progress(&audio, &mut |progress| updates.push(progress))
        .unwrap();

    let percents: Vec<u32> = updates.iter().map(|p| p.percent).collect();
    assert_eq!(percents, vec![30, 60, 90, 100]);
    assert_eq!(updates.last().map(|p| p.stage), Some(AnalysisStage::Complete));
}

#[test]
fn test_progress_reports_error_on_invalid_input() {
    let pipeline = OnsetAnalysisPipeline::default();
    let mut updates = Vec::new();

    let result = pipeline.analyze_with_progress(
        &DecodedAudio::new(Vec::new(), SAMPLE_RATE),
        &mut |progress| updates.push(progress),
    );

    assert!(result.is_err());
    assert_eq!(updates, vec![AnalysisProgress::new(AnalysisStage::Error, 0)]);
}

#[test]
fn test_analysis_is_deterministic() {
    let pipeline = OnsetAnalysisPipeline::default();
    let mut track = HitTrack::grid(
        SAMPLE_RATE,
        &[DrumVoice::Kick, DrumVoice::Snare, DrumVoice::HiHat],
        FIRST_HIT,
        SPACING,
    );
    track.add_noise(0.01, 42);
    let audio = track.into_audio();

    let first = pipeline.analyze(&audio).unwrap();
    let second = pipeline.analyze(&audio).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_cancelled_run_discards_output() {
    let pipeline = OnsetAnalysisPipeline::default();
    let audio = alternating_track(4);
    let cancel = AtomicBool::new(true);

    let result = pipeline.run(&audio, Some(&cancel), &mut |_| {});
    assert_eq!(result, Err(AnalysisError::Cancelled));
}

#[test]
fn test_job_matches_direct_analysis() {
    let pipeline = OnsetAnalysisPipeline::default();
    let audio = Arc::new(alternating_track(6));

    let direct = pipeline.analyze(&audio).unwrap();
    let job = AnalysisJob::spawn(pipeline.clone(), Arc::clone(&audio));
    let background = job.join().unwrap();

    assert_eq!(direct, background);
}

#[test]
fn test_independent_jobs_run_concurrently() {
    let pipeline = OnsetAnalysisPipeline::default();
    let short = Arc::new(alternating_track(2));
    let long = Arc::new(alternating_track(8));

    let first = AnalysisJob::spawn(pipeline.clone(), Arc::clone(&short));
    let second = AnalysisJob::spawn(pipeline, Arc::clone(&long));

    assert_eq!(second.join().unwrap().drum_points.len(), 8);
    assert_eq!(first.join().unwrap().drum_points.len(), 2);
}

#[test]
fn test_job_progress_completes() {
    let job = AnalysisJob::spawn(
        OnsetAnalysisPipeline::default(),
        Arc::new(alternating_track(2)),
    );
    while !job.is_finished() {
        std::thread::yield_now();
    }
    assert_eq!(job.progress(), 100);
    assert!(job.join().is_ok());
}

#[test]
fn test_click_track_off_hop_grid() {
    let pipeline = OnsetAnalysisPipeline::default();
    let audio = HitTrack::click_track(SAMPLE_RATE, 120, 8, DrumVoice::Kick).into_audio();

    let result = pipeline.analyze(&audio).unwrap();

    assert_eq!(result.drum_points.len(), 8, "{:?}", result.drum_points);
    assert_eq!(result.bpm, 120);

    let hop_secs = HOP as f64 / SAMPLE_RATE as f64;
    for (i, point) in result.drum_points.iter().enumerate() {
        let click = (i + 1) as f64 * 0.5;
        assert!(
            (point.time - click).abs() <= 2.0 * hop_secs,
            "point {} at {:.4}s, click at {:.4}s",
            i,
            point.time,
            click
        );
    }
}
