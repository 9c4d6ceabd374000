// Customer attributes: what the customer looks like, what the player claims to
// have painted, and the rule that compares the two.

use std::fmt;

use rand::Rng;
use rand::distr::{Distribution, StandardUniform};

use crate::types::Rgba;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Surprised,
    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [Emotion::Happy, Emotion::Sad, Emotion::Angry, Emotion::Surprised, Emotion::Neutral];
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Accessory {
    None,
    Glasses,
    Hat,
    Earrings,
    Scarf,
}

impl Accessory {
    pub const ALL: [Accessory; 5] = [Accessory::None, Accessory::Glasses, Accessory::Hat, Accessory::Earrings, Accessory::Scarf];
}

impl Distribution<Emotion> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Emotion {
        Emotion::ALL[rng.random_range(0..Emotion::ALL.len())]
    }
}

impl Distribution<Accessory> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Accessory {
        Accessory::ALL[rng.random_range(0..Accessory::ALL.len())]
    }
}

/// Opaque color with r, g, b uniform in [0,1).
fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Rgba {
    Rgba::rgb(rng.random(), rng.random(), rng.random())
}

/// Rough human name for a color, for log lines.
pub fn color_name(c: Rgba) -> &'static str {
    let hi = |v: f32| v > 0.8;
    let lo = |v: f32| v < 0.2;
    match (c.r, c.g, c.b) {
        (r, g, b) if hi(r) && lo(g) && lo(b) => "Red",
        (r, g, b) if hi(g) && lo(r) && lo(b) => "Green",
        (r, g, b) if hi(b) && lo(r) && lo(g) => "Blue",
        (r, g, b) if hi(r) && hi(g) && lo(b) => "Yellow",
        (r, g, b) if hi(r) && hi(b) && lo(g) => "Purple",
        (r, g, b) if hi(g) && hi(b) && lo(r) => "Cyan",
        (r, g, b) if hi(r) && hi(g) && hi(b) => "White",
        (r, g, b) if lo(r) && lo(g) && lo(b) => "Black",
        _ => "Custom Color",
    }
}

/// The customer's look for one round. Immutable once generated.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TargetAttributes {
    pub emotion: Emotion,
    pub hair_color: Rgba,
    pub eye_color: Rgba,
    pub accessory: Accessory,
}

impl TargetAttributes {
    /// Draw all four attributes independently.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            emotion: rng.random(),
            hair_color: random_color(rng),
            eye_color: random_color(rng),
            accessory: rng.random(),
        }
    }

    /// A submission that claims exactly these attributes.
    pub fn as_submission(&self) -> Submission {
        Submission {
            emotion: Some(self.emotion),
            hair_color: Some(self.hair_color),
            eye_color: Some(self.eye_color),
            accessory: Some(self.accessory),
        }
    }

    /// All four fields must agree; colors within `threshold` (strictly).
    /// A malformed submission never matches.
    pub fn matches(&self, submission: &Submission, threshold: f32) -> bool {
        let Some(claimed) = submission.complete() else {
            return false;
        };
        let close = |a: Rgba, b: Rgba| a.distance(b) < threshold;

        claimed.emotion == self.emotion
            && close(claimed.hair_color, self.hair_color)
            && close(claimed.eye_color, self.eye_color)
            && claimed.accessory == self.accessory
    }
}

impl fmt::Display for TargetAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "emotion={:?}, hair={}, eyes={}, accessory={:?}",
            self.emotion,
            color_name(self.hair_color),
            color_name(self.eye_color),
            self.accessory
        )
    }
}

/// What the player hands in. Fields may be missing when the input layer could
/// not fill them; such a submission is malformed.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Submission {
    pub emotion: Option<Emotion>,
    pub hair_color: Option<Rgba>,
    pub eye_color: Option<Rgba>,
    pub accessory: Option<Accessory>,
}

impl Submission {
    /// Every field present and both colors finite.
    pub fn complete(&self) -> Option<TargetAttributes> {
        let hair_color = self.hair_color.filter(|c| c.is_finite())?;
        let eye_color = self.eye_color.filter(|c| c.is_finite())?;
        Some(TargetAttributes { emotion: self.emotion?, hair_color, eye_color, accessory: self.accessory? })
    }

    pub fn is_malformed(&self) -> bool {
        self.complete().is_none()
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    use super::*;

    fn target() -> TargetAttributes {
        TargetAttributes {
            emotion: Emotion::Sad,
            hair_color: Rgba::rgb(0.3, 0.2, 0.1),
            eye_color: Rgba::rgb(0.1, 0.5, 0.9),
            accessory: Accessory::Hat,
        }
    }

    #[test]
    fn identical_submission_matches() {
        let t = target();
        assert!(t.matches(&t.as_submission(), 0.2));
    }

    #[rstest]
    #[case(Submission { emotion: Some(Emotion::Happy), ..target().as_submission() })]
    #[case(Submission { accessory: Some(Accessory::Scarf), ..target().as_submission() })]
    #[case(Submission { hair_color: Some(Rgba::rgb(0.3, 0.2, 0.4)), ..target().as_submission() })]
    #[case(Submission { eye_color: Some(Rgba::BLACK), ..target().as_submission() })]
    fn one_differing_field_mismatches(#[case] submission: Submission) {
        assert!(!target().matches(&submission, 0.2));
    }

    #[test]
    fn colors_within_threshold_match() {
        let sub = Submission { hair_color: Some(Rgba::rgb(0.35, 0.25, 0.1)), ..target().as_submission() };
        assert!(target().matches(&sub, 0.2));
    }

    #[rstest]
    #[case(Submission { emotion: None, ..target().as_submission() })]
    #[case(Submission { hair_color: None, ..target().as_submission() })]
    #[case(Submission { eye_color: Some(Rgba::rgb(f32::NAN, 0.5, 0.9)), ..target().as_submission() })]
    #[case(Submission::default())]
    fn malformed_submission_is_a_mismatch(#[case] submission: Submission) {
        assert!(submission.is_malformed());
        assert!(!target().matches(&submission, 0.2));
    }

    #[test]
    fn random_targets_stay_in_domain() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let t = TargetAttributes::random(&mut rng);
            for c in [t.hair_color, t.eye_color] {
                assert!((0.0..1.0).contains(&c.r) && (0.0..1.0).contains(&c.g) && (0.0..1.0).contains(&c.b));
                assert_eq!(c.a, 1.0);
            }
        }
    }

    #[test]
    fn every_emotion_and_accessory_shows_up() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut emotions = std::collections::HashSet::new();
        let mut accessories = std::collections::HashSet::new();
        for _ in 0..500 {
            let t = TargetAttributes::random(&mut rng);
            emotions.insert(t.emotion);
            accessories.insert(t.accessory);
        }
        assert_eq!(emotions.len(), Emotion::ALL.len());
        assert_eq!(accessories.len(), Accessory::ALL.len());
    }

    #[rstest]
    #[case(Rgba::RED, "Red")]
    #[case(Rgba::rgb(0.1, 0.9, 0.9), "Cyan")]
    #[case(Rgba::WHITE, "White")]
    #[case(Rgba::BLACK, "Black")]
    #[case(Rgba::rgb(0.5, 0.5, 0.5), "Custom Color")]
    fn names_colors(#[case] c: Rgba, #[case] name: &str) {
        assert_eq!(color_name(c), name);
    }
}
