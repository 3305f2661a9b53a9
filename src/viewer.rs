use std::collections::HashMap;

use anyhow::Result;
use log::{debug, warn};
use raylib::prelude::*;

use crate::constants::{
    FPS, RETREAT_ZONE_FRACTION, TAP_HOLD_THRESHOLD_MS, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use crate::invitation::{AccountInfo, Invitation};
use crate::media::MediaStore;
use crate::player::{segments, PlaybackSession, ProgressFill, Segment, SessionEvent};
use crate::slide::{DetailsPage, IntroPage, Slide, SlideContent};
use crate::texture_loader::load_texture;

// Side effects on slide change (background music, prefetching) are opt-in
// and best-effort: the hook returns nothing and can never stall playback.
#[derive(Default)]
pub struct ViewerHooks {
    pub on_slide_changed: Option<Box<dyn FnMut(usize)>>,
}

fn notify(hooks: &mut ViewerHooks, index: usize) {
    if let Some(hook) = hooks.on_slide_changed.as_mut() {
        hook(index);
    }
}

// Runs one playback session in a portrait window. Tap on the left 30%
// retreats, tap elsewhere advances, press-and-hold pauses, R on the
// details page restarts. Returns when the session ends or the window is
// closed.
pub fn run(
    invitation: &Invitation,
    slides: Vec<Slide>,
    media: &MediaStore,
    mut hooks: ViewerHooks,
) -> Result<()> {
    let (mut rl, thread) = raylib::init()
        .size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .title(&format!(
            "{} ♥ {}",
            invitation.groom_name, invitation.bride_name
        ))
        .vsync()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // Preload every photo up front so navigation never waits on disk. A
    // photo that fails to load leaves its slide with a plain background.
    let mut textures: HashMap<usize, Texture2D> = HashMap::new();
    for slide in &slides {
        if let Some(relative) = &slide.image_path {
            match load_texture(&mut rl, &thread, &media.resolve(relative)) {
                Ok(texture) => {
                    textures.insert(slide.id, texture);
                }
                Err(e) => warn!("photo for slide {} unavailable: {e:#}", slide.id),
            }
        }
    }

    let mut session = PlaybackSession::create(slides)?;
    let mut fill = ProgressFill::new();
    let mut hold_ms = 0.0_f32;
    let mut last_index = session.current_index();
    let mut session_ended = false;
    notify(&mut hooks, last_index);

    while !rl.window_should_close() {
        let dt_ms = rl.get_frame_time() * 1000.0;
        let mut ended = false;

        // -- Input --
        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            hold_ms = 0.0;
            session.pause();
        }
        if rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_LEFT) {
            hold_ms += dt_ms;
        }
        if rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
            session.resume();
            if hold_ms < TAP_HOLD_THRESHOLD_MS {
                let tap_x = rl.get_mouse_position().x;
                let retreat_zone = rl.get_screen_width() as f32 * RETREAT_ZONE_FRACTION;
                if tap_x < retreat_zone {
                    session.retreat();
                } else if session.advance() == Some(SessionEvent::Ended) {
                    ended = true;
                }
            }
        }
        if session.current_slide().is_terminal && rl.is_key_pressed(KeyboardKey::KEY_R) {
            let (next, _restarted) = session.restart();
            session = next;
            fill = ProgressFill::new();
            last_index = session.current_index();
            notify(&mut hooks, last_index);
            debug!("session restarted");
        }

        // -- Engine tick --
        if !ended && session.tick(dt_ms) == Some(SessionEvent::Ended) {
            ended = true;
        }
        if ended {
            session_ended = true;
            break;
        }

        if session.current_index() != last_index {
            last_index = session.current_index();
            notify(&mut hooks, last_index);
        }
        fill.observe(session.current_index(), session.is_paused());
        if session.pending().is_none() {
            fill.advance(dt_ms);
        }

        // -- Draw --
        let mut d = rl.begin_drawing(&thread);
        let slide = session.current_slide();
        match &slide.content {
            SlideContent::Details(page) => draw_details(&mut d, page),
            content => {
                draw_photo(&mut d, textures.get(&slide.id));
                match content {
                    SlideContent::Intro(intro) => draw_intro(&mut d, intro),
                    SlideContent::Caption(text) => draw_caption(&mut d, text),
                    SlideContent::Details(_) => {}
                }
                draw_progress(&mut d, &session, &fill);
            }
        }
    }

    if !session_ended {
        // Window closed mid-play: terminate the session explicitly.
        let _ = session.close();
    }
    Ok(())
}

// Cover-fit: fill the window, overflow the longer edge, keep aspect.
fn draw_photo(d: &mut RaylibDrawHandle, texture: Option<&Texture2D>) {
    d.clear_background(Color::BLACK);
    let sw = d.get_screen_width() as f32;
    let sh = d.get_screen_height() as f32;
    if let Some(texture) = texture {
        let tw = texture.width() as f32;
        let th = texture.height() as f32;
        let scale = (sw / tw).max(sh / th);
        let dw = tw * scale;
        let dh = th * scale;
        d.draw_texture_pro(
            texture,
            Rectangle::new(0.0, 0.0, tw, th),
            Rectangle::new((sw - dw) * 0.5, (sh - dh) * 0.5, dw, dh),
            Vector2::new(0.0, 0.0),
            0.0,
            Color::WHITE,
        );
    }
    // Scrim for text legibility.
    d.draw_rectangle(0, 0, sw as i32, sh as i32, Color::new(0, 0, 0, 77));
}

fn draw_centered(d: &mut RaylibDrawHandle, text: &str, y: i32, font_size: i32, color: Color) {
    let sw = d.get_screen_width();
    let width = measure_text(text, font_size);
    d.draw_text(text, (sw - width) / 2, y, font_size, color);
}

fn draw_intro(d: &mut RaylibDrawHandle, intro: &IntroPage) {
    let sh = d.get_screen_height();
    let mut y = sh / 3;
    draw_centered(d, &intro.headline, y, 28, Color::WHITE);
    y += 56;
    draw_centered(d, &intro.groom_line, y, 18, Color::WHITE);
    y += 28;
    draw_centered(d, &intro.bride_line, y, 18, Color::WHITE);
    y += 48;
    draw_centered(d, &intro.date_line, y, 17, Color::WHITE);
    y += 26;
    if !intro.time_line.is_empty() {
        draw_centered(d, &intro.time_line, y, 17, Color::WHITE);
        y += 26;
    }
    draw_centered(d, &intro.venue_line, y, 18, Color::WHITE);
    y += 26;
    if let Some(hall) = &intro.hall_line {
        draw_centered(d, hall, y, 16, Color::new(255, 255, 255, 220));
    }
}

fn draw_caption(d: &mut RaylibDrawHandle, text: &str) {
    let sh = d.get_screen_height();
    let lines: Vec<&str> = text.lines().collect();
    let mut y = sh - 140 - (lines.len() as i32 - 1) * 30;
    for line in lines {
        draw_centered(d, line, y, 20, Color::WHITE);
        y += 30;
    }
}

fn draw_account_block(
    d: &mut RaylibDrawHandle,
    heading: &str,
    accounts: &[AccountInfo],
    mut y: i32,
) -> i32 {
    if accounts.is_empty() {
        return y;
    }
    d.draw_text(heading, 32, y, 17, Color::new(60, 60, 60, 255));
    y += 26;
    for account in accounts {
        let owner = format!("{} {}", account.relationship, account.holder);
        let number = format!("{} {}", account.bank, account.number);
        d.draw_text(&owner, 40, y, 15, Color::new(90, 90, 90, 255));
        y += 20;
        d.draw_text(&number, 40, y, 15, Color::new(90, 90, 90, 255));
        y += 26;
    }
    y + 8
}

// The terminal page is static reference info on a light background.
fn draw_details(d: &mut RaylibDrawHandle, page: &DetailsPage) {
    d.clear_background(Color::RAYWHITE);
    let dark = Color::new(40, 40, 40, 255);
    let gray = Color::new(90, 90, 90, 255);

    let mut y = 36;
    draw_centered(d, "오시는 길", y, 24, dark);
    y += 40;
    draw_centered(d, &page.venue, y, 18, dark);
    y += 26;
    if !page.hall.is_empty() {
        draw_centered(d, &page.hall, y, 16, gray);
        y += 24;
    }
    if !page.address.is_empty() {
        draw_centered(d, &page.address, y, 15, gray);
        y += 24;
    }
    for link in &page.map_links {
        let line = format!("{}: {}", link.label, link.url);
        d.draw_text(&line, 24, y, 12, Color::new(0, 90, 170, 255));
        y += 18;
    }
    y += 12;
    for info in &page.transportation {
        d.draw_text(&info.title, 32, y, 16, dark);
        y += 22;
        for line in info.description.lines() {
            d.draw_text(line, 40, y, 14, gray);
            y += 18;
        }
        y += 8;
    }

    y += 16;
    draw_centered(d, "마음 전하실 곳", y, 24, dark);
    y += 40;
    let y = draw_account_block(d, "신랑측", &page.groom_accounts, y);
    draw_account_block(d, "신부측", &page.bride_accounts, y);

    let sh = d.get_screen_height();
    draw_centered(d, "R: 청첩장 다시보기", sh - 48, 16, Color::new(200, 80, 120, 255));
}

fn draw_progress(d: &mut RaylibDrawHandle, session: &PlaybackSession, fill: &ProgressFill) {
    let sw = d.get_screen_width() as f32;
    let count = session.slides().len();
    let margin = 8.0;
    let gap = 4.0;
    let height = 4;
    let segment_width = (sw - 2.0 * margin - gap * (count as f32 - 1.0)) / count as f32;
    let fraction = fill.fraction(session.current_slide().effective_duration_ms());

    let bar = segments(count, session.current_index(), session.pending(), fraction);
    for (index, segment) in bar.iter().enumerate() {
        let x = margin + index as f32 * (segment_width + gap);
        d.draw_rectangle(
            x as i32,
            8,
            segment_width as i32,
            height,
            Color::new(255, 255, 255, 70),
        );
        let filled = match segment {
            Segment::Filled => segment_width,
            Segment::Active(f) => segment_width * f,
            Segment::Empty => 0.0,
        };
        if filled >= 1.0 {
            d.draw_rectangle(x as i32, 8, filled as i32, height, Color::WHITE);
        }
    }
}
