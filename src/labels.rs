//! Human readable stress levels and handling advice

use crate::core::ClassId;
use std::fmt;

/// Returned by [`resolve_label`] for class identifiers without a description
pub const UNRECOGNIZED_LABEL: &str = "Unrecognized label";

/// The three stress categories predicted by every classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StressLevel {
    Low,
    Moderate,
    High,
}

impl StressLevel {
    pub const ALL: [StressLevel; 3] = [StressLevel::Low, StressLevel::Moderate, StressLevel::High];

    pub fn from_class_id(class_id: ClassId) -> Option<Self> {
        match class_id {
            0 => Some(StressLevel::Low),
            1 => Some(StressLevel::Moderate),
            2 => Some(StressLevel::High),
            _ => None,
        }
    }

    pub fn class_id(&self) -> ClassId {
        match self {
            StressLevel::Low => 0,
            StressLevel::Moderate => 1,
            StressLevel::High => 2,
        }
    }

    /// Short description of a student in this category
    pub fn description(&self) -> &'static str {
        match self {
            StressLevel::Low => {
                "Low stress level: you seem to be a student starting to feel tired from coursework or mild social pressure."
            }
            StressLevel::Moderate => {
                "Moderate stress level: you seem to be a student facing academic pressure combined with minor personal problems."
            }
            StressLevel::High => {
                "High stress level: you seem to be a student experiencing burnout, mild to moderate depression, or heavy social pressure."
            }
        }
    }

    /// Typical signs of this category
    pub fn signs(&self) -> &'static str {
        match self {
            StressLevel::Low => {
                "Feeling tired and slightly anxious, but still able to carry out daily activities well."
            }
            StressLevel::Moderate => {
                "Trouble focusing, frequently postponing tasks, changes in sleep or eating patterns, easily irritated."
            }
            StressLevel::High => {
                "Severe sleep problems, loss of motivation, physical symptoms (headache, nausea), feeling hopeless."
            }
        }
    }

    /// Suggested ways of handling this level of stress
    pub fn advice(&self) -> &'static [&'static str] {
        match self {
            StressLevel::Low => &[
                "Light time management: keep a to-do list and try the pomodoro technique.",
                "Light relaxation: listen to music, draw, watch a light film.",
                "Light exercise: a 20 minute walk, stretching, gentle yoga.",
                "Regular sleep: 7-8 hours a day on a consistent schedule.",
                "Gratitude journal: write down 3 positive things every day.",
            ],
            StressLevel::Moderate => &[
                "Relaxation techniques: deep breathing and guided meditation.",
                "Stress management: simple CBT techniques, an emotion journal.",
                "Socialise: talk with close friends or family.",
                "Workload management: prioritise tasks and avoid multitasking.",
                "Light consultation: talk to an academic advisor or campus counselling service.",
            ],
            StressLevel::High => &[
                "Professional counselling: campus psychologist, licensed counsellor or tele-counselling service.",
                "Regular support: mood monitoring and mental health apps.",
                "Lifestyle changes: healthy diet, less caffeine and screen time, moderate exercise.",
                "Emergency plan for severe depression: contact a psychological emergency service or campus hotline.",
                "Long-term therapy if chronic: CBT or interpersonal therapy.",
            ],
        }
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StressLevel::Low => "low",
            StressLevel::Moderate => "moderate",
            StressLevel::High => "high",
        };
        write!(f, "{name}")
    }
}

/// Description for a class identifier
///
/// Never fails: identifiers outside the known categories resolve to
/// [`UNRECOGNIZED_LABEL`].
pub fn resolve_label(class_id: ClassId) -> &'static str {
    StressLevel::from_class_id(class_id)
        .map(|level| level.description())
        .unwrap_or(UNRECOGNIZED_LABEL)
}
