//! Interactive command loop
//!
//! A thin stdin surface over the round controller: audition commands map to
//! graph specs, `guess` maps to the game's guess shape, and the summary is
//! printed and submitted when the last round is scored.

use anyhow::Result;
use aural_audio::effects::GainReductionMeter;
use aural_core::{ScoreSubmitter, StemId};
use aural_game::{
    graphs, Advance, Breakdown, Guess, RoundController, RoundParams, RoundScore, Tier,
};
use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;
use tracing::warn;

pub struct Repl {
    controller: Arc<Mutex<RoundController>>,
    rt: Runtime,
    submitter: Box<dyn ScoreSubmitter>,
    user_id: String,
    meter: GainReductionMeter,
}

impl Repl {
    pub fn new(
        controller: Arc<Mutex<RoundController>>,
        rt: Runtime,
        submitter: Box<dyn ScoreSubmitter>,
        user_id: String,
    ) -> Self {
        Self {
            controller,
            rt,
            submitter,
            user_id,
            meter: GainReductionMeter::new(),
        }
    }

    /// Run until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        self.print_round_banner();
        println!("Type 'help' for commands.");

        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            print!("> ");
            std::io::stdout().flush()?;
            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            let Some((&command, args)) = parts.split_first() else {
                continue;
            };

            match command {
                "quit" | "q" => break,
                "help" => self.print_help(),
                "next" => self.next_round(),
                "restart" => {
                    self.controller.lock().unwrap().restart();
                    self.print_round_banner();
                }
                "volume" => self.set_volume(args),
                "mute" => {
                    let mut controller = self.controller.lock().unwrap();
                    let volume = controller.session_mut().master_volume_mut();
                    if volume.is_muted() {
                        volume.unmute();
                        println!("Unmuted.");
                    } else {
                        volume.mute();
                        println!("Muted.");
                    }
                }
                "gr" => self.show_gain_reduction(),
                "guess" => self.submit_guess(args),
                other => self.audition(other, args),
            }
        }
        Ok(())
    }

    fn audition(&mut self, command: &str, args: &[&str]) {
        let spec = {
            let controller = self.controller.lock().unwrap();
            match (controller.params().clone(), command) {
                (RoundParams::Balance(p), "ref") => Some(graphs::balance_reference(&p)),
                (RoundParams::Balance(p), "mine") => match parse_five(args) {
                    Some(gains) => Some(graphs::balance_mix(&p, &gains)),
                    None => {
                        println!("Usage: mine <drums> <vocals> <bass> <guitars> <others> (dB)");
                        return;
                    }
                },
                (RoundParams::Compressor(p), "ref") => Some(graphs::compressor_reference(&p)),
                (RoundParams::Compressor(p), "flat") => Some(graphs::flat_reference(p.clip)),
                (RoundParams::Compressor(p), "mine") => match parse_compressor(args) {
                    Some((ratio, attack, release, makeup)) => {
                        Some(graphs::compressor_mix(p.clip, ratio, attack, release, makeup))
                    }
                    None => {
                        println!("Usage: mine <ratio> <attack_ms> <release_ms> <makeup_db>");
                        return;
                    }
                },
                (RoundParams::Frequency(p), "ref") => Some(graphs::frequency_reference(p.clip)),
                (RoundParams::Frequency(p), "boost") => Some(graphs::frequency_boosted(&p)),
                (RoundParams::Stereo(p), "play") => Some(graphs::stereo_panned(&p)),
                _ => None,
            }
        };

        let Some(spec) = spec else {
            println!("Unknown command '{}'. Type 'help'.", command);
            return;
        };

        let controller = self.controller.clone();
        let label = command.to_string();
        let result = self.rt.block_on(async move {
            let mut controller = controller.lock().unwrap();
            controller.audition(&label, spec).await
        });
        match result {
            Ok(outcome) => println!("{:?}", outcome),
            Err(e) => println!("Playback failed: {}", e),
        }
    }

    fn submit_guess(&mut self, args: &[&str]) {
        let guess = {
            let controller = self.controller.lock().unwrap();
            match controller.params() {
                RoundParams::Balance(_) => parse_five(args).map(|gains| Guess::Balance { gains }),
                RoundParams::Compressor(_) => {
                    parse_compressor(args).map(|(ratio, attack_ms, release_ms, makeup_db)| {
                        Guess::Compressor {
                            ratio,
                            attack_ms,
                            release_ms,
                            makeup_db,
                        }
                    })
                }
                RoundParams::Frequency(_) => args
                    .first()
                    .and_then(|s| s.parse::<f32>().ok())
                    .map(|frequency_hz| Guess::Frequency { frequency_hz }),
                RoundParams::Stereo(_) => args
                    .first()
                    .and_then(|s| s.parse::<f32>().ok())
                    .map(|pan| Guess::Stereo { pan }),
            }
        };

        let Some(guess) = guess else {
            println!("Could not parse guess. Type 'help' for the shape.");
            return;
        };

        let result = self.controller.lock().unwrap().submit_guess(&guess);
        match result {
            Ok(Some(score)) => self.print_score(&score),
            Ok(None) => println!("Already scored this round; type 'next'."),
            Err(e) => println!("Guess rejected: {}", e),
        }
    }

    fn print_score(&self, score: &RoundScore) {
        println!("Round score: {} points", score.points);
        match &score.breakdown {
            Breakdown::Balance { differences } => {
                for (stem, diff) in StemId::ALL.iter().zip(differences) {
                    println!("  {:<8} off by {:+.1} dB", stem.file_name(), diff);
                }
            }
            Breakdown::Compressor {
                ratio,
                attack,
                release,
                makeup,
            } => {
                println!(
                    "  ratio {:.0}/32  attack {:.1}/16  release {:.1}/16  makeup {:.1}/16",
                    ratio, attack, release, makeup
                );
            }
            Breakdown::Frequency {
                guess_band,
                truth_band,
            } => {
                println!(
                    "  you picked {}, answer was {}",
                    aural_core::FREQUENCY_BANDS[*guess_band].label,
                    aural_core::FREQUENCY_BANDS[*truth_band].label
                );
            }
            Breakdown::Stereo { difference } => {
                println!("  pan difference {:.2}", difference);
            }
        }
        let controller = self.controller.lock().unwrap();
        println!("Answer: {:?}", controller.params());
        println!(
            "Total: {} / {}",
            controller.accumulator().total(),
            controller.config().max_total()
        );
    }

    fn next_round(&mut self) {
        let advance = self.controller.lock().unwrap().advance();
        match advance {
            Ok(Advance::NextRound(_)) => self.print_round_banner(),
            Ok(Advance::Complete(summary)) => {
                println!(
                    "Game complete: {} / {} ({}%) - {}",
                    summary.total_score,
                    summary.max_score,
                    summary.percentage,
                    tier_message(summary.tier)
                );
                let receipt = self
                    .rt
                    .block_on(summary.submit(self.submitter.as_ref(), &self.user_id));
                match receipt {
                    Some(receipt) => {
                        if receipt.new_best {
                            println!("New personal best!");
                        }
                        for achievement in &receipt.achievements {
                            println!("Achievement unlocked: {}", achievement.name);
                        }
                    }
                    None => warn!("score was not submitted"),
                }
                println!("Type 'restart' to play again.");
            }
            Err(e) => println!("{}", e),
        }
    }

    fn set_volume(&mut self, args: &[&str]) {
        match args.first().and_then(|s| s.parse::<u8>().ok()) {
            Some(level) => {
                let mut controller = self.controller.lock().unwrap();
                controller.session_mut().set_master_level(level);
                println!(
                    "Master volume {}% ({:.1} dB)",
                    level.min(100),
                    controller.session().master_volume().to_db()
                );
            }
            None => println!("Usage: volume <0-100>"),
        }
    }

    fn show_gain_reduction(&mut self) {
        let raw = self
            .controller
            .lock()
            .unwrap()
            .session()
            .gain_reduction_db();
        let displayed = match raw {
            Some(db) => self.meter.update(db),
            None => self.meter.decay(),
        };
        println!("GR: {:.1} dB", displayed);
    }

    fn print_round_banner(&self) {
        let controller = self.controller.lock().unwrap();
        println!(
            "--- {} - round {} / {} ---",
            controller.config().kind().name(),
            controller.current_round(),
            controller.config().rounds()
        );
    }

    fn print_help(&self) {
        let controller = self.controller.lock().unwrap();
        match controller.params() {
            RoundParams::Balance(_) => {
                println!("  ref                         play the hidden reference mix");
                println!("  mine <5 gains in dB>        play your fader mix");
                println!("  guess <5 gains in dB>       submit your balance guess");
            }
            RoundParams::Compressor(_) => {
                println!("  ref                         play the target compression");
                println!("  flat                        play the unprocessed clip");
                println!("  mine <ratio> <atk> <rel> <mk>  play your settings");
                println!("  guess <ratio> <atk> <rel> <mk> submit your guess");
                println!("  gr                          show the gain-reduction meter");
            }
            RoundParams::Frequency(_) => {
                println!("  ref                         play the clip unprocessed");
                println!("  boost                       play the clip with the hidden boost");
                println!("  guess <frequency Hz>        submit the band you heard");
            }
            RoundParams::Stereo(_) => {
                println!("  play                        play the panned vocal");
                println!("  guess <pan -1.0..1.0>       submit the pan position");
            }
        }
        println!("  next / restart / volume <0-100> / mute / quit");
    }
}

fn tier_message(tier: Tier) -> &'static str {
    match tier {
        Tier::Excellent => "Excellent ear!",
        Tier::Great => "Great work!",
        Tier::Good => "Good, keep practicing!",
        Tier::KeepPracticing => "Keep at it - ears improve with practice.",
    }
}

fn parse_five(args: &[&str]) -> Option<[f32; 5]> {
    if args.len() != 5 {
        return None;
    }
    let mut gains = [0.0_f32; 5];
    for (slot, arg) in gains.iter_mut().zip(args) {
        *slot = arg.parse().ok()?;
    }
    Some(gains)
}

fn parse_compressor(args: &[&str]) -> Option<(u32, u32, u32, f32)> {
    if args.len() != 4 {
        return None;
    }
    Some((
        args[0].parse().ok()?,
        args[1].parse().ok()?,
        args[2].parse().ok()?,
        args[3].parse().ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_five_requires_exactly_five() {
        assert!(parse_five(&["0", "1", "2", "3"]).is_none());
        assert_eq!(
            parse_five(&["-3", "0.5", "-12", "2", "0"]),
            Some([-3.0, 0.5, -12.0, 2.0, 0.0])
        );
    }

    #[test]
    fn parse_compressor_shape() {
        assert_eq!(
            parse_compressor(&["4", "20", "300", "5.5"]),
            Some((4, 20, 300, 5.5))
        );
        assert!(parse_compressor(&["4", "x", "300", "5.5"]).is_none());
    }
}
