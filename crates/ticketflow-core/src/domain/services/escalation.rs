//! Sentiment and escalation detection from ticket text.

use crate::domain::value_objects::{EscalationRisk, Sentiment};

const NEGATIVE_WORDS: &[&str] = &[
    "frustrated",
    "angry",
    "terrible",
    "awful",
    "horrible",
    "disappointed",
    "urgent",
    "upset",
];

const POSITIVE_WORDS: &[&str] = &["thanks", "appreciate", "great", "excellent", "wonderful"];

#[derive(Clone, Copy, Debug)]
pub struct EscalationDetector {
    enabled: bool,
}

impl EscalationDetector {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sentiment and escalation risk; neutral and low when disabled.
    pub fn assess(&self, title: &str, description: &str) -> (Sentiment, EscalationRisk) {
        if !self.enabled {
            return (Sentiment::Neutral, EscalationRisk::Low);
        }
        let sentiment = detect_sentiment(&format!("{title} {description}"));
        let risk = match sentiment {
            Sentiment::Negative => EscalationRisk::High,
            _ => EscalationRisk::Low,
        };
        (sentiment, risk)
    }
}

impl Default for EscalationDetector {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn detect_sentiment(text: &str) -> Sentiment {
    let text = text.to_lowercase();
    if NEGATIVE_WORDS.iter().any(|w| text.contains(w)) {
        Sentiment::Negative
    } else if POSITIVE_WORDS.iter().any(|w| text.contains(w)) {
        Sentiment::Positive
    } else {
        Sentiment::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_wins_over_positive() {
        assert_eq!(detect_sentiment("Thanks, but I am FRUSTRATED"), Sentiment::Negative);
        assert_eq!(detect_sentiment("Great support, thanks"), Sentiment::Positive);
        assert_eq!(detect_sentiment("Cannot export CSV"), Sentiment::Neutral);
    }

    #[test]
    fn test_negative_escalates() {
        let detector = EscalationDetector::default();
        assert_eq!(
            detector.assess("Urgent: checkout down", ""),
            (Sentiment::Negative, EscalationRisk::High)
        );
        assert_eq!(detector.assess("Question", "thanks"), (Sentiment::Positive, EscalationRisk::Low));
    }

    #[test]
    fn test_disabled_detector_is_neutral() {
        let detector = EscalationDetector::new(false);
        assert_eq!(detector.assess("Angry customer", ""), (Sentiment::Neutral, EscalationRisk::Low));
    }
}
