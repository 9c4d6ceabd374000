// What you SEE:
// • A white canvas on the left, a color wheel and swatches on the right.
// • SPACE starts a game. Paint the customer, ENTER submits, C clears.
// • Hold Left Mouse to paint, Right Mouse to erase, 1-9 pick a swatch,
//   [ and ] change the brush size, left click on the wheel picks any color.
// • ESC quits. An optional JSON config path can be passed as the first argument.

use std::time::{Duration, Instant};

use portrait_rush::attributes::color_name;
use portrait_rush::config::GameConfig;
use portrait_rush::draw::{
    Drawer, MouseFrame, ScreenRect, blit_canvas, blit_image, draw_crosshair, draw_text_5x7, fill_rect, outline_rect,
};
use portrait_rush::error::Error;
use portrait_rush::logging::{LoggingConfig, init_logging};
use portrait_rush::palette::ColorWheel;
use portrait_rush::round::Phase;
use portrait_rush::session::{FrameInput, HudSnapshot, PaintSession};
use portrait_rush::types::FrameBuffer;

const WIN_W: usize = 720;
const WIN_H: usize = 600;

const CANVAS_RECT: ScreenRect = ScreenRect::new(16, 40, 512, 512);
const WHEEL_RECT: ScreenRect = ScreenRect::new(552, 40, 152, 152);
const SWATCH_X: i32 = 552;
const SWATCH_Y: i32 = 208;
const METER_RECT: ScreenRect = ScreenRect::new(552, 470, 152, 14);

const BG: u32 = 0x0020_2028;
const TEXT: u32 = 0x00FF_FFFF;

// Delta time ceiling so a stalled window does not burn a whole customer at once.
const MAX_DT: f32 = 0.25;

fn main() -> Result<(), Error> {
    init_logging(LoggingConfig::default());

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let mut session = PaintSession::new(config)?.with_color_wheel(ColorWheel::new(WHEEL_RECT.w as u32));
    let mut drawer = Drawer::new("Portrait Rush", WIN_W, WIN_H)?;
    let mut screen = FrameBuffer::new(WIN_W, WIN_H);

    let mut last_frame_time = Instant::now();
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let dt = (now - last_frame_time).as_secs_f32().min(MAX_DT);
        last_frame_time = now;

        /* 1) Inputs -> one FrameInput for the session */
        let mouse = drawer.poll_mouse();
        let input = read_input(&drawer, &mouse, session.hud().brush_radius);

        /* 2) Advance the game */
        let report = session.frame(&input, dt);
        if let Some(final_score) = report.game_over() {
            log::info!("final score: {final_score}");
        }

        /* 3) Draw everything and present */
        render(&mut screen, &session, &report.hud, mouse.pos);
        drawer.present(&screen)?;

        /* 4) FPS to the debug log once per second */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            log::debug!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}

fn read_input(drawer: &Drawer, mouse: &MouseFrame, brush_radius: i32) -> FrameInput {
    let over = |r: ScreenRect| mouse.pos.filter(|p| r.contains(*p));

    let step = drawer.brush_step();
    FrameInput {
        pointer: over(CANVAS_RECT).map(|p| (CANVAS_RECT.local_point(p), CANVAS_RECT.viewport())),
        wheel_click: over(WHEEL_RECT)
            .filter(|_| mouse.left_pressed)
            .map(|p| (WHEEL_RECT.local_point(p), WHEEL_RECT.viewport())),
        paint_held: mouse.left_down,
        erase_pressed: mouse.right_pressed,
        erase_held: mouse.right_down,
        erase_released: mouse.right_released,
        palette_slot: drawer.palette_key_pressed(),
        brush_slider: (step != 0).then(|| (brush_radius + 2 * step) as f32),
        submit: drawer.submit_pressed_once(),
        clear: drawer.c_pressed_once(),
        start: drawer.start_pressed_once(),
    }
}

fn render(screen: &mut FrameBuffer, session: &PaintSession, hud: &HudSnapshot, mouse: Option<(f32, f32)>) {
    screen.pixels.fill(BG);

    blit_canvas(screen, session.canvas().buffer(), CANVAS_RECT);
    outline_rect(screen, CANVAS_RECT, 0x0080_8080);

    if let Some(wheel) = session.wheel() {
        blit_image(screen, wheel.image(), WHEEL_RECT.x, WHEEL_RECT.y);
    }

    for (i, color) in session.palette().colors().iter().enumerate().take(9) {
        let y = SWATCH_Y + i as i32 * 26;
        fill_rect(screen, ScreenRect::new(SWATCH_X, y, 20, 20), color.to_u32());
        outline_rect(screen, ScreenRect::new(SWATCH_X, y, 20, 20), 0x0080_8080);
        draw_text_5x7(screen, SWATCH_X + 28, y + 7, &format!("{}", i + 1), TEXT);
    }

    // paint meter: red when empty, green when full
    let fill = (hud.budget_fraction * METER_RECT.w as f32).round() as i32;
    let red = ((1.0 - hud.budget_fraction) * 255.0) as u32;
    let green = (hud.budget_fraction * 255.0) as u32;
    fill_rect(screen, METER_RECT, 0x0040_4040);
    fill_rect(screen, ScreenRect { w: fill, ..METER_RECT }, (red << 16) | (green << 8));
    outline_rect(screen, METER_RECT, 0x0080_8080);
    draw_text_5x7(screen, METER_RECT.x, METER_RECT.y - 12, "PAINT", TEXT);

    // current color + brush size
    fill_rect(screen, ScreenRect::new(552, 500, 40, 40), hud.color.to_u32());
    outline_rect(screen, ScreenRect::new(552, 500, 40, 40), 0x0080_8080);
    let mode = if hud.erasing { "ERASE" } else { "PAINT" };
    draw_text_5x7(screen, 600, 506, &format!("{mode} {}", hud.brush_radius), TEXT);

    let status = match (hud.phase, hud.final_score) {
        (Phase::RoundActive, _) => format!("SCORE: {} | TIME: {}S", hud.score, hud.seconds_left),
        (Phase::Idle, Some(score)) => format!("GAME OVER - FINAL SCORE: {score} | SPACE: PLAY AGAIN"),
        (Phase::Idle, None) => "PRESS SPACE TO START".to_string(),
    };
    draw_text_5x7(screen, 16, 14, &status, TEXT);

    // the customer's order, with chips for the two colors
    if let Ok(target) = session.scorer().target() {
        let order = format!(
            "WANTS: {:?} | HAIR: {} | EYES: {} | {:?}",
            target.emotion,
            color_name(target.hair_color),
            color_name(target.eye_color),
            target.accessory
        );
        draw_text_5x7(screen, 16, 26, &order, 0x00FF_E080);
        fill_rect(screen, ScreenRect::new(552, 24, 12, 12), target.hair_color.to_u32());
        fill_rect(screen, ScreenRect::new(570, 24, 12, 12), target.eye_color.to_u32());
    }
    draw_text_5x7(screen, 16, 566, "ENTER: SUBMIT  C: CLEAR  1-9: COLOR  [ ]: SIZE  RMB: ERASE", 0x00B0_B0B0);

    if let Some((mx, my)) = mouse {
        draw_crosshair(screen, mx as i32, my as i32, 12, 0x00FF_CC33);
    }
}
