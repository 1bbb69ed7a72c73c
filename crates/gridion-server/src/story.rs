// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! The narrated story walkthrough: static step definitions and the
//! playback controller.
//!
//! Playback state is owned by one [`StoryPlayer`] instance; there are no
//! module-global timer handles. The current position is a pure function of
//! the start instant and the step durations, so a poller asking twice for
//! the same instant gets the same answer.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One step of the walkthrough: narration plus a camera pose, layer set
/// and companion chart for the renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryStep {
    pub id: usize,
    pub title: &'static str,
    pub description: &'static str,
    /// (longitude, latitude)
    pub map_center: [f64; 2],
    pub map_zoom: f64,
    pub map_bearing: f64,
    pub map_pitch: f64,
    pub layers: &'static [&'static str],
    pub chart_type: Option<&'static str>,
    pub duration_ms: u64,
}

/// The eleven walkthrough steps, in playback order.
pub const STORY_STEPS: [StoryStep; 11] = [
    StoryStep {
        id: 0,
        title: "Welcome to the GB Energy Story",
        description: "A guided tour of the challenges in Great Britain's electricity grid: \
                      how geography, weather and infrastructure create a complex balancing act.",
        map_center: [-2.5, 54.5],
        map_zoom: 4.0,
        map_bearing: 0.0,
        map_pitch: 20.0,
        layers: &["all-cables"],
        chart_type: None,
        duration_ms: 2500,
    },
    StoryStep {
        id: 1,
        title: "Wind Generation in Rural Scotland",
        description: "Scotland hosts most of GB's onshore wind thanks to strong, consistent \
                      North Sea winds and vast open landscape.",
        map_center: [-3.5, 56.0],
        map_zoom: 4.5,
        map_bearing: 0.0,
        map_pitch: 25.0,
        layers: &["wind-turbines", "all-cables"],
        chart_type: Some("windComparison"),
        duration_ms: 3000,
    },
    StoryStep {
        id: 2,
        title: "Demand in the South",
        description: "Most demand sits in the south, around London, Birmingham and the other \
                      large English cities.",
        map_center: [-1.0, 52.0],
        map_zoom: 6.0,
        map_bearing: 0.0,
        map_pitch: 30.0,
        layers: &["all-cables"],
        chart_type: Some("demand"),
        duration_ms: 3000,
    },
    StoryStep {
        id: 3,
        title: "Interconnectors Across GB",
        description: "Eight subsea cables link GB to France, Belgium, the Netherlands, Norway, \
                      Denmark and Ireland, supporting demand across the country.",
        map_center: [-1.5, 53.0],
        map_zoom: 4.2,
        map_bearing: 0.0,
        map_pitch: 25.0,
        layers: &["all-cables"],
        chart_type: Some("interconnector"),
        duration_ms: 3000,
    },
    StoryStep {
        id: 4,
        title: "The B6 Boundary Bottleneck",
        description: "Only two transmission corridors cross the Anglo-Scottish border. Around \
                      12 GW of wind capacity sits north of B6 but the network carries at most \
                      5-6 GW south, so clean power gets stuck.",
        map_center: [-2.2, 54.9],
        map_zoom: 7.5,
        map_bearing: -10.0,
        map_pitch: 40.0,
        layers: &["b6-boundary", "all-cables"],
        chart_type: Some("renewable"),
        duration_ms: 4000,
    },
    StoryStep {
        id: 5,
        title: "Windy Days, Low Prices",
        description: "On very windy days day-ahead prices drop sharply and can even go \
                      negative as cheap renewable output floods the market.",
        map_center: [-2.5, 54.5],
        map_zoom: 5.0,
        map_bearing: 0.0,
        map_pitch: 25.0,
        layers: &["wind-turbines", "all-cables"],
        chart_type: Some("negativePrice"),
        duration_ms: 3500,
    },
    StoryStep {
        id: 6,
        title: "Wind Turbines Spin Up",
        description: "Turbines generate as forecast, and the B6 boundary becomes constrained \
                      as transmission capacity runs out.",
        map_center: [-3.0, 56.5],
        map_zoom: 6.0,
        map_bearing: 0.0,
        map_pitch: 30.0,
        layers: &["wind-turbines", "b6-boundary", "all-cables"],
        chart_type: Some("renewable"),
        duration_ms: 4000,
    },
    StoryStep {
        id: 7,
        title: "Paying Wind to Curtail",
        description: "With no route south, the system operator pays northern wind farms to \
                      turn down in the balancing mechanism.",
        map_center: [-2.0, 54.5],
        map_zoom: 4.8,
        map_bearing: 0.0,
        map_pitch: 30.0,
        layers: &["wind-curtailment-icons", "b6-boundary", "all-cables"],
        chart_type: None,
        duration_ms: 4000,
    },
    StoryStep {
        id: 8,
        title: "Paying Gas to Turn Up",
        description: "Southern demand still needs serving, so gas plants near the load are \
                      paid to turn up at the same time.",
        map_center: [-1.5, 53.5],
        map_zoom: 5.0,
        map_bearing: 0.0,
        map_pitch: 40.0,
        layers: &["gas-facilities", "all-cables"],
        chart_type: None,
        duration_ms: 4000,
    },
    StoryStep {
        id: 9,
        title: "Paying to Reverse Interconnector Flows",
        description: "Interconnectors chasing cheap GB prices export at exactly the wrong \
                      moment, and the operator pays to reverse the flows.",
        map_center: [0.0, 52.0],
        map_zoom: 4.5,
        map_bearing: 0.0,
        map_pitch: 35.0,
        layers: &["all-cables"],
        chart_type: None,
        duration_ms: 4000,
    },
    StoryStep {
        id: 10,
        title: "Customers Pay the Bill",
        description: "Balancing these constraints has cost hundreds of millions of pounds \
                      this year alone, funded directly from customer bills.",
        map_center: [-2.0, 54.0],
        map_zoom: 5.0,
        map_bearing: 0.0,
        map_pitch: 35.0,
        layers: &["all-cables"],
        chart_type: Some("spending"),
        duration_ms: 3500,
    },
];

/// What a poll of the player sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPosition {
    pub step: usize,
    pub playing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerState {
    Paused { step: usize },
    Playing { from_step: usize, started_at: DateTime<Utc> },
}

/// Owns all playback state for the story walkthrough.
#[derive(Debug, Clone, Copy)]
pub struct StoryPlayer {
    state: PlayerState,
}

impl Default for StoryPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryPlayer {
    pub fn new() -> Self {
        Self {
            state: PlayerState::Paused { step: 0 },
        }
    }

    /// Start (or resume) playback from the current step.
    pub fn start(&mut self, now: DateTime<Utc>) {
        if let PlayerState::Paused { step } = self.state {
            // Restart a finished run from the top
            let from_step = if step + 1 >= STORY_STEPS.len() { 0 } else { step };
            self.state = PlayerState::Playing {
                from_step,
                started_at: now,
            };
        }
    }

    /// Freeze playback at the step reached by `now`.
    pub fn stop(&mut self, now: DateTime<Utc>) {
        let position = self.position(now);
        self.state = PlayerState::Paused {
            step: position.step,
        };
    }

    /// Jump to a step, clamping to the valid range. Seeking pauses playback.
    pub fn seek(&mut self, step: usize) {
        self.state = PlayerState::Paused {
            step: step.min(STORY_STEPS.len() - 1),
        };
    }

    /// The position at `now`. Playback ends paused on the final step once
    /// every duration has elapsed.
    pub fn position(&self, now: DateTime<Utc>) -> PlayerPosition {
        match self.state {
            PlayerState::Paused { step } => PlayerPosition {
                step,
                playing: false,
            },
            PlayerState::Playing {
                from_step,
                started_at,
            } => {
                let elapsed_ms = now
                    .signed_duration_since(started_at)
                    .num_milliseconds()
                    .max(0)
                    .unsigned_abs();
                let mut remaining = elapsed_ms;
                for (index, step) in STORY_STEPS.iter().enumerate().skip(from_step) {
                    if remaining < step.duration_ms {
                        return PlayerPosition {
                            step: index,
                            playing: true,
                        };
                    }
                    remaining -= step.duration_ms;
                }
                PlayerPosition {
                    step: STORY_STEPS.len() - 1,
                    playing: false,
                }
            }
        }
    }

    /// Persist the end-of-run pause so a later `start` restarts cleanly.
    pub fn settle(&mut self, now: DateTime<Utc>) {
        let position = self.position(now);
        if !position.playing {
            self.state = PlayerState::Paused {
                step: position.step,
            };
        }
    }
}
