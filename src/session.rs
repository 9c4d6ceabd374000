//! One painting session: the canvas, the brush, the scorer and the collaborators
//! that feed them, driven one frame at a time.
//!
//! The session is the frame-loop caller. Each step of a frame returns a
//! `Result`; failures are logged and the rest of the frame still runs, so a bad
//! frame never stops the next one.

use rand::RngCore;
use rand::rngs::StdRng;

use crate::attributes::{Accessory, Emotion, Submission};
use crate::canvas::{BrushTool, Canvas, LocalPoint, Viewport};
use crate::config::GameConfig;
use crate::error::Error;
use crate::palette::{ColorWheel, Palette};
use crate::round::{Phase, RoundOutcome, RoundScorer};
use crate::types::Rgba;

/// Turns the player's work into a [`Submission`].
///
/// Reading attributes back out of the painted pixels is not solved here; this
/// is the seam where such a classifier plugs in.
pub trait SubmissionSource {
    fn build(&mut self, canvas: &Canvas, tool: &BrushTool) -> Submission;
}

/// Placeholder source: a happy customer with no accessory, hair and eyes in
/// whatever color the brush currently holds.
#[derive(Debug, Default, Clone, Copy)]
pub struct ToolStateSubmission;

impl SubmissionSource for ToolStateSubmission {
    fn build(&mut self, _canvas: &Canvas, tool: &BrushTool) -> Submission {
        let color = tool.chosen_color();
        Submission {
            emotion: Some(Emotion::Happy),
            hair_color: Some(color),
            eye_color: Some(color),
            accessory: Some(Accessory::None),
        }
    }
}

/// Everything the input layer noticed during one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Pointer over the canvas, centered coordinates.
    pub pointer: Option<(LocalPoint, Viewport)>,
    /// Left click on the color wheel this frame.
    pub wheel_click: Option<(LocalPoint, Viewport)>,
    pub paint_held: bool,
    pub erase_pressed: bool,
    pub erase_held: bool,
    pub erase_released: bool,
    pub palette_slot: Option<usize>,
    pub brush_slider: Option<f32>,
    pub submit: bool,
    pub clear: bool,
    pub start: bool,
}

/// Values the UI shows every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudSnapshot {
    pub phase: Phase,
    pub score: u32,
    pub seconds_left: u32,
    pub budget_fraction: f32,
    pub final_score: Option<u32>,
    pub brush_radius: i32,
    pub color: Rgba,
    pub erasing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Result of this frame's submission, if there was one.
    pub submitted: Option<RoundOutcome>,
    /// Result of this frame's timer tick.
    pub ticked: RoundOutcome,
    pub hud: HudSnapshot,
}

impl FrameReport {
    pub fn game_over(&self) -> Option<u32> {
        [self.submitted, Some(self.ticked)].into_iter().flatten().find_map(|o| match o {
            RoundOutcome::GameOver { final_score } => Some(final_score),
            _ => None,
        })
    }
}

pub struct PaintSession<R: RngCore = StdRng> {
    canvas: Canvas,
    tool: BrushTool,
    scorer: RoundScorer<R>,
    palette: Palette,
    wheel: Option<ColorWheel>,
    source: Option<Box<dyn SubmissionSource>>,
}

impl PaintSession<StdRng> {
    pub fn new(config: GameConfig) -> Result<Self, Error> {
        config.validate()?;
        let canvas = Canvas::from_config(&config)?;
        Ok(Self::assemble(canvas, RoundScorer::new(config)))
    }
}

impl<R: RngCore> PaintSession<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, Error> {
        config.validate()?;
        let canvas = Canvas::from_config(&config)?;
        Ok(Self::assemble(canvas, RoundScorer::with_rng(config, rng)))
    }

    fn assemble(canvas: Canvas, scorer: RoundScorer<R>) -> Self {
        let palette = Palette::default();
        let first = palette.select(0).unwrap_or(Rgba::BLACK);
        Self {
            tool: BrushTool::new(first, canvas.background()),
            canvas,
            scorer,
            palette,
            wheel: None,
            source: Some(Box::new(ToolStateSubmission)),
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        if let Ok(first) = palette.select(0) {
            self.tool.set_color(first);
        }
        self.palette = palette;
        self
    }

    pub fn with_color_wheel(mut self, wheel: ColorWheel) -> Self {
        self.wheel = Some(wheel);
        self
    }

    /// `None` unplugs the source; submissions are then logged and dropped.
    pub fn with_submission_source(mut self, source: Option<Box<dyn SubmissionSource>>) -> Self {
        self.source = source;
        self
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn tool(&self) -> &BrushTool {
        &self.tool
    }

    pub fn scorer(&self) -> &RoundScorer<R> {
        &self.scorer
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn wheel(&self) -> Option<&ColorWheel> {
        self.wheel.as_ref()
    }

    pub fn start_game(&mut self) {
        self.scorer.start_game();
        self.tool.end_erase();
        self.canvas.clear_to_background();
    }

    pub fn select_palette(&mut self, slot: usize) -> Result<Rgba, Error> {
        let color = self.palette.select(slot)?;
        self.tool.set_color(color);
        Ok(color)
    }

    /// Pick from the wheel. `Ok(None)` means the click missed the disc.
    pub fn pick_from_wheel(&mut self, local: LocalPoint, viewport: Viewport) -> Result<Option<Rgba>, Error> {
        let wheel = self.wheel.as_ref().ok_or(Error::MissingCollaborator("color wheel"))?;
        let picked = wheel.pick(local, viewport);
        if let Some(color) = picked {
            self.tool.set_color(color);
        }
        Ok(picked)
    }

    /// One stamp under the pointer with whatever the brush holds right now.
    pub fn stamp(&mut self, local: LocalPoint, viewport: Viewport) {
        let stroke = self.canvas.stroke_at(local, viewport, &self.tool);
        self.canvas.apply(&stroke);
    }

    pub fn submit(&mut self) -> Result<RoundOutcome, Error> {
        if !self.scorer.is_active() {
            return Err(Error::NoActiveRound);
        }
        let source = self.source.as_mut().ok_or(Error::MissingCollaborator("submission source"))?;
        let submission = source.build(&self.canvas, &self.tool);
        let outcome = self.scorer.submit(&submission);
        self.canvas.clear_to_background();
        Ok(outcome)
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            phase: self.scorer.state().phase,
            score: self.scorer.score(),
            seconds_left: self.scorer.remaining_seconds_display(),
            budget_fraction: self.scorer.budget_fraction(),
            final_score: self.scorer.final_score(),
            brush_radius: self.canvas.brush().radius(),
            color: self.tool.chosen_color(),
            erasing: self.tool.is_erasing(),
        }
    }

    /// Advance one frame.
    pub fn frame(&mut self, input: &FrameInput, dt: f32) -> FrameReport {
        if input.start {
            self.start_game();
        }
        if let Some(value) = input.brush_slider {
            self.canvas.set_brush_radius(value);
        }
        if let Some(slot) = input.palette_slot {
            log_failure("palette", self.select_palette(slot));
        }
        if let Some((local, viewport)) = input.wheel_click {
            log_failure("color wheel", self.pick_from_wheel(local, viewport));
        }

        // a held right button keeps erasing across a game start
        if input.erase_pressed || (input.erase_held && !self.tool.is_erasing()) {
            self.tool.begin_erase();
        }
        if input.paint_held || input.erase_held {
            if let Some((local, viewport)) = input.pointer {
                self.stamp(local, viewport);
            }
        }
        if input.erase_released {
            self.tool.end_erase();
        }

        if input.clear {
            self.canvas.clear_to_background();
        }

        let submitted = if input.submit { log_failure("submit", self.submit()) } else { None };

        let ticked = self.scorer.tick(dt);
        if ticked.advances_round() {
            self.canvas.clear_to_background();
        }

        FrameReport { submitted, ticked, hud: self.hud() }
    }
}

/// Log a failed step and keep going.
fn log_failure<T>(step: &str, result: Result<T, Error>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("{step}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::logging::init_test_logging;

    const VP: Viewport = Viewport::new(64.0, 64.0);

    fn session() -> PaintSession<StdRng> {
        init_test_logging();
        let config = GameConfig { canvas_width: 64, canvas_height: 64, ..GameConfig::default() };
        PaintSession::with_rng(config, StdRng::seed_from_u64(3)).unwrap()
    }

    fn center() -> Option<(LocalPoint, Viewport)> {
        Some((LocalPoint::new(0.0, 0.0), VP))
    }

    fn painted(s: &PaintSession<StdRng>) -> usize {
        let bg = s.canvas().background();
        s.canvas().buffer().pixels().iter().filter(|p| **p != bg).count()
    }

    #[test]
    fn holding_paint_stamps_current_color() {
        let mut s = session();
        s.frame(&FrameInput { pointer: center(), paint_held: true, ..Default::default() }, 0.016);
        assert_eq!(s.canvas().buffer().get(32, 32), Some(Rgba::RED));
        assert!(painted(&s) > 0);
    }

    #[test]
    fn erase_gesture_buffers_color_changes() {
        let mut s = session();
        s.frame(&FrameInput { pointer: center(), paint_held: true, ..Default::default() }, 0.0);
        s.frame(&FrameInput { erase_pressed: true, erase_held: true, pointer: center(), ..Default::default() }, 0.0);
        assert_eq!(painted(&s), 0);
        s.frame(&FrameInput { erase_held: true, pointer: center(), palette_slot: Some(1), ..Default::default() }, 0.0);
        assert_eq!(s.tool().active_color(), s.canvas().background());
        s.frame(&FrameInput { erase_released: true, ..Default::default() }, 0.0);
        assert_eq!(s.tool().active_color(), Rgba::BLUE);
    }

    #[test]
    fn right_drag_across_game_start_keeps_erasing() {
        let mut s = session();
        s.frame(&FrameInput { pointer: center(), paint_held: true, ..Default::default() }, 0.0);
        s.frame(&FrameInput { erase_pressed: true, erase_held: true, ..Default::default() }, 0.0);
        s.frame(&FrameInput { start: true, erase_held: true, pointer: center(), ..Default::default() }, 0.0);
        assert!(s.tool().is_erasing());
        assert_eq!(painted(&s), 0);
        s.frame(&FrameInput { erase_held: true, pointer: center(), ..Default::default() }, 0.0);
        assert_eq!(painted(&s), 0);
        s.frame(&FrameInput { erase_released: true, ..Default::default() }, 0.0);
        assert_eq!(s.tool().active_color(), Rgba::RED);
    }

    #[test]
    fn brush_slider_is_clamped() {
        let mut s = session();
        s.frame(&FrameInput { brush_slider: Some(500.0), ..Default::default() }, 0.0);
        assert_eq!(s.hud().brush_radius, 100);
        s.frame(&FrameInput { brush_slider: Some(0.0), ..Default::default() }, 0.0);
        assert_eq!(s.hud().brush_radius, 1);
    }

    #[test]
    fn bad_palette_slot_is_logged_not_fatal() {
        let mut s = session();
        let report = s.frame(&FrameInput { palette_slot: Some(8), pointer: center(), paint_held: true, ..Default::default() }, 0.0);
        assert_eq!(report.hud.color, Rgba::RED);
        assert!(painted(&s) > 0);
    }

    #[test]
    fn submit_without_game_is_ignored() {
        let mut s = session();
        let report = s.frame(&FrameInput { submit: true, ..Default::default() }, 0.1);
        assert_eq!(report.submitted, None);
        assert_eq!(report.ticked, RoundOutcome::Inactive);
    }

    #[test]
    fn missing_submission_source_is_a_noop() {
        let mut s = session().with_submission_source(None);
        s.frame(&FrameInput { start: true, ..Default::default() }, 0.0);
        let report = s.frame(&FrameInput { submit: true, ..Default::default() }, 0.0);
        assert_eq!(report.submitted, None);
        assert!(matches!(s.submit(), Err(Error::MissingCollaborator(_))));
        assert_eq!(s.hud().score, 0);
        assert_eq!(s.scorer().paint_budget(), 50.0);
    }

    #[test]
    fn missing_wheel_is_reported() {
        let mut s = session();
        assert!(matches!(s.pick_from_wheel(LocalPoint::new(0.0, 0.0), VP), Err(Error::MissingCollaborator("color wheel"))));
    }

    #[test]
    fn wheel_click_sets_color() {
        let mut s = session().with_color_wheel(ColorWheel::new(65));
        let vp = Viewport::new(65.0, 65.0);
        s.frame(&FrameInput { wheel_click: Some((LocalPoint::new(-0.5, -0.5), vp)), ..Default::default() }, 0.0);
        assert_eq!(s.hud().color, Rgba::WHITE);
        // a miss keeps the color
        s.frame(&FrameInput { wheel_click: Some((LocalPoint::new(-32.0, -32.0), vp)), ..Default::default() }, 0.0);
        assert_eq!(s.hud().color, Rgba::WHITE);
    }

    #[test]
    fn submission_clears_canvas() {
        let mut s = session();
        s.frame(&FrameInput { start: true, pointer: center(), paint_held: true, ..Default::default() }, 0.0);
        assert!(painted(&s) > 0);
        let report = s.frame(&FrameInput { submit: true, ..Default::default() }, 0.0);
        assert!(matches!(report.submitted, Some(RoundOutcome::Matched | RoundOutcome::Mismatched)));
        assert_eq!(painted(&s), 0);
    }

    #[test]
    fn clear_request_resets_canvas() {
        let mut s = session();
        s.frame(&FrameInput { pointer: center(), paint_held: true, ..Default::default() }, 0.0);
        s.frame(&FrameInput { clear: true, ..Default::default() }, 0.0);
        assert_eq!(painted(&s), 0);
    }

    #[test]
    fn placeholder_source_uses_chosen_color() {
        let mut s = session();
        s.select_palette(2).unwrap();
        let sub = ToolStateSubmission.build(s.canvas(), s.tool());
        assert_eq!(sub.emotion, Some(Emotion::Happy));
        assert_eq!(sub.accessory, Some(Accessory::None));
        assert_eq!(sub.hair_color, Some(Rgba::GREEN));
        assert_eq!(sub.eye_color, Some(Rgba::GREEN));
    }
}
