//! End-to-end game session tests against an in-memory asset library

use aural_audio::assets::MemoryAssetLibrary;
use aural_audio::{AudioBuffer, PlayOutcome, SessionManager};
use aural_core::{GameKind, StemId};
use aural_game::{
    graphs, Advance, GameConfig, Guess, ParameterGenerator, RoundController, RoundParams,
};
use std::sync::Arc;

fn library_with_all_assets() -> Arc<MemoryAssetLibrary> {
    let mut lib = MemoryAssetLibrary::new();
    let clip = Arc::new(AudioBuffer::new(vec![0.4, -0.4, 0.2, -0.2], 44100));

    for track in aural_game::config::TRACK_FOLDERS {
        for stem in StemId::ALL {
            lib.insert(aural_game::config::stem_asset(track, stem), clip.clone());
        }
    }
    for mix in aural_game::config::MIX_CLIPS {
        lib.insert(mix, clip.clone());
    }
    for vocal in aural_game::config::VOCAL_CLIPS {
        lib.insert(vocal, clip.clone());
    }
    Arc::new(lib)
}

fn controller_for(kind: GameKind, seed: u64) -> RoundController {
    RoundController::new(
        GameConfig::for_kind(kind),
        ParameterGenerator::seeded(seed),
        SessionManager::new(library_with_all_assets()),
    )
}

#[tokio::test]
async fn balance_session_plays_reference_and_user_mix() {
    let mut controller = controller_for(GameKind::Balance, 21);

    let RoundParams::Balance(truth) = controller.params().clone() else {
        panic!("wrong params");
    };

    // Reference mix starts
    let outcome = controller
        .audition("reference", graphs::balance_reference(&truth))
        .await
        .unwrap();
    assert!(matches!(outcome, PlayOutcome::Started(_)));

    // Switching to the user's fader mix replaces it
    let faders = [0.0, -6.0, -3.0, 1.0, -9.0];
    let outcome = controller
        .audition("user-mix", graphs::balance_mix(&truth, &faders))
        .await
        .unwrap();
    assert!(matches!(outcome, PlayOutcome::Started(_)));
    assert_eq!(controller.session().current_label(), Some("user-mix"));

    // Perfect guess scores the full 100
    let score = controller
        .submit_guess(&Guess::Balance { gains: truth.gains })
        .unwrap()
        .unwrap();
    assert_eq!(score.points, 100);
    assert!(!controller.session().is_playing());
}

#[tokio::test]
async fn old_session_is_disposed_before_new_one_starts() {
    let mut controller = controller_for(GameKind::Balance, 22);

    let RoundParams::Balance(truth) = controller.params().clone() else {
        panic!("wrong params");
    };

    let first = match controller
        .audition("reference", graphs::balance_reference(&truth))
        .await
        .unwrap()
    {
        PlayOutcome::Started(handle) => handle,
        other => panic!("expected start, got {:?}", other),
    };
    assert!(first.is_active());

    let second = match controller
        .audition("user-mix", graphs::balance_mix(&truth, &[0.0; 5]))
        .await
        .unwrap()
    {
        PlayOutcome::Started(handle) => handle,
        other => panic!("expected start, got {:?}", other),
    };

    // Never two live sessions: the first was fully disposed
    assert!(first.is_disposed());
    assert!(second.is_active());
}

#[tokio::test]
async fn compressor_session_reports_gain_reduction() {
    let mut controller = controller_for(GameKind::Compressor, 23);

    let RoundParams::Compressor(truth) = controller.params().clone() else {
        panic!("wrong params");
    };

    controller
        .audition("target", graphs::compressor_reference(&truth))
        .await
        .unwrap();

    // The metered compressor publishes a reduction value once rendering
    let mut out = vec![0.0; 512];
    controller.session_mut().render(&mut out, 44100);
    assert!(controller.session().gain_reduction_db().is_some());

    // Stopping tears the meter down with the session
    controller.session_mut().stop();
    assert!(controller.session().gain_reduction_db().is_none());
}

#[tokio::test]
async fn frequency_session_full_game_with_band_guesses() {
    let mut controller = controller_for(GameKind::Frequency, 24);

    loop {
        let RoundParams::Frequency(truth) = controller.params().clone() else {
            panic!("wrong params");
        };

        controller
            .audition("boosted", graphs::frequency_boosted(&truth))
            .await
            .unwrap();

        // Guess the exact boosted frequency: always the same band
        let score = controller
            .submit_guess(&Guess::Frequency {
                frequency_hz: truth.frequency_hz as f32,
            })
            .unwrap()
            .unwrap();
        assert_eq!(score.points, 100);

        match controller.advance().unwrap() {
            Advance::NextRound(_) => {}
            Advance::Complete(summary) => {
                assert_eq!(summary.total_score, 1000);
                assert_eq!(summary.tier, aural_game::Tier::Excellent);
                break;
            }
        }
    }
}

#[tokio::test]
async fn total_score_is_clamped_at_game_maximum() {
    // Balance: 6 rounds of 100 = 600 max achievable, ceiling 800; force the
    // clamp by checking the accumulator never exceeds the configured max
    let mut controller = controller_for(GameKind::Balance, 25);

    loop {
        let RoundParams::Balance(truth) = controller.params().clone() else {
            panic!("wrong params");
        };
        controller
            .submit_guess(&Guess::Balance { gains: truth.gains })
            .unwrap();
        assert!(controller.accumulator().total() <= controller.config().max_total());

        match controller.advance().unwrap() {
            Advance::NextRound(_) => {}
            Advance::Complete(summary) => {
                assert!(summary.total_score <= summary.max_score);
                break;
            }
        }
    }
}

#[tokio::test]
async fn toggling_the_same_control_stops_playback() {
    let mut controller = controller_for(GameKind::Stereo, 26);

    let RoundParams::Stereo(truth) = controller.params().clone() else {
        panic!("wrong params");
    };

    let spec = graphs::stereo_panned(&truth);
    let outcome = controller.audition("panned", spec.clone()).await.unwrap();
    assert!(matches!(outcome, PlayOutcome::Started(_)));

    let outcome = controller.audition("panned", spec).await.unwrap();
    assert!(matches!(outcome, PlayOutcome::Stopped));
    assert!(!controller.session().is_playing());
}

#[tokio::test]
async fn missing_asset_does_not_poison_the_round() {
    // Library without the stereo vocals: playback fails, guessing still works
    let mut controller = RoundController::new(
        GameConfig::for_kind(GameKind::Stereo),
        ParameterGenerator::seeded(27),
        SessionManager::new(Arc::new(MemoryAssetLibrary::new())),
    );

    let RoundParams::Stereo(truth) = controller.params().clone() else {
        panic!("wrong params");
    };

    let result = controller
        .audition("panned", graphs::stereo_panned(&truth))
        .await;
    assert!(result.is_err());

    // The round still accepts a guess based on prior listening
    let score = controller
        .submit_guess(&Guess::Stereo { pan: truth.pan })
        .unwrap();
    assert!(score.is_some());
}
