//! Desktop simulator for the slate extended widgets.
//!
//! Renders two pages in an SDL2 window via `embedded-graphics-simulator`:
//!
//! 1. RGB sliders: three sliders share one position callback that recolors a
//!    color box. The SAVE button records a snapshot of the slider values and
//!    quits.
//! 2. Widgets: an animated gauge, a checkbox, a radio group, and a stepper
//!    driving a vertical gauge.
//!
//! # Key bindings
//!
//! | Key | Action           |
//! |-----|------------------|
//! | 1   | RGB slider page  |
//! | 2   | Widgets page     |
//! | Q   | Quit             |
//!
//! Mouse press, drag and release are forwarded as touch events.

mod config;

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_7X13, FONT_7X13_BOLD, FONT_10X20};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Alignment;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{error, info};

use slate_core::framebuffer::FrameBuffer;
use slate_core::input::{TouchQueue, TouchTracker};
use slate_core::store::ElementStore;
use slate_core::ui::styling::{
    BLACK, BLUE, BLUE_DARK, GRAY, GRAY_DARK, GRAY_DARKER, GRAY_LIGHT, GREEN, GREEN_DARK, ORANGE,
    RED, RED_DARK, WHITE, rgb888,
};
use slate_core::ui::{
    Action, Button, DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, ElementId, ElementIdRequest,
    ElementStyle, FontId, GroupId, PageId, TextLabel, TouchPoint, TouchResult,
};
use slate_core::widgets::{
    Callback, CheckStyle, Checkbox, Gauge, Orientation, Slider, SliderStyle, WidgetError,
};

use config::DemoConfig;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Interval between steps of the animated gauge.
const GAUGE_STEP_INTERVAL: Duration = Duration::from_millis(100);

const PAGE_RGB: PageId = PageId(0);
const PAGE_WIDGETS: PageId = PageId(1);

const FONT_BTN: FontId = FontId(0);
const FONT_TXT: FontId = FontId(1);
const FONT_HEAD: FontId = FontId(2);
const FONT_TITLE: FontId = FontId(3);

// RGB page
const ELEM_SAVE: ElementId = ElementId(1);
const ELEM_COLOR: ElementId = ElementId(2);
const SLIDER_R: ElementId = ElementId(3);
const SLIDER_G: ElementId = ElementId(4);
const SLIDER_B: ElementId = ElementId(5);

// Widgets page
const ELEM_GAUGE: ElementId = ElementId(10);
const ELEM_LEVEL: ElementId = ElementId(11);
const ELEM_STEPPER: ElementId = ElementId(12);
const ELEM_MODE_LABEL: ElementId = ElementId(13);
const RADIO_MODES: GroupId = GroupId(1);
const RADIO_LABELS: [&str; 3] = ["Low", "Medium", "High"];

type Store = ElementStore<2, 24>;

// ---------------------------------------------------------------------------
// Page construction
// ---------------------------------------------------------------------------

fn rect(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(w, h))
}

/// Style for plain text: no frame, filled with the page background.
fn text_style(color: Rgb565) -> ElementStyle {
    ElementStyle::new(GRAY_DARKER, GRAY_DARKER, GRAY_DARKER)
        .with_text(color)
        .with_frame_enabled(false)
}

fn add_text(
    store: &mut Store,
    page: PageId,
    id: ElementIdRequest,
    bounds: Rectangle,
    text: &str,
    font: FontId,
    color: Rgb565,
) -> Result<ElementId, WidgetError> {
    store.create_text(page, id, bounds, text_style(color), TextLabel::new(text, font))
}

/// Shared RGB state written by the slider callback, read by the main loop
#[derive(Default)]
struct RgbState {
    rgb: Cell<[u8; 3]>,
    changed: Cell<bool>,
}

fn build_rgb_page(store: &mut Store, rgb: &Rc<RgbState>) -> Result<(), WidgetError> {
    store.add_page(PAGE_RGB)?;

    let title = TextLabel::new("Home Automation", FONT_TITLE).with_alignment(Alignment::Center);
    store.create_text(
        PAGE_RGB,
        ElementIdRequest::Auto,
        rect(0, 10, 320, 30),
        text_style(rgb888(128, 128, 240)),
        title,
    )?;

    store.create_box(
        PAGE_RGB,
        ElementIdRequest::Auto,
        rect(10, 50, 300, 180),
        ElementStyle::new(WHITE, BLACK, BLACK),
    )?;
    store.create_box(
        PAGE_RGB,
        ElementIdRequest::Auto,
        rect(20, 100, 280, 1),
        ElementStyle::new(GRAY_DARK, BLACK, BLACK),
    )?;

    let [r, g, b] = rgb.rgb.get();
    store.create_box(
        PAGE_RGB,
        ElementIdRequest::Fixed(ELEM_COLOR),
        rect(20, 120, 130, 100),
        ElementStyle::new(WHITE, rgb888(r, g, b), WHITE),
    )?;

    store.create_button(
        PAGE_RGB,
        ElementIdRequest::Fixed(ELEM_SAVE),
        rect(250, 60, 50, 30),
        ElementStyle::new(BLUE_DARK, BLUE_DARK, BLUE).with_text(WHITE),
        Button::new("SAVE", FONT_BTN),
    )?;

    let black_text = |color| {
        ElementStyle::new(BLACK, BLACK, BLACK)
            .with_text(color)
            .with_frame_enabled(false)
    };
    store.create_text(
        PAGE_RGB,
        ElementIdRequest::Auto,
        rect(20, 65, 110, 20),
        black_text(GRAY_LIGHT),
        TextLabel::new("Selected Room:", FONT_HEAD),
    )?;
    store.create_button(
        PAGE_RGB,
        ElementIdRequest::Auto,
        rect(140, 65, 80, 20),
        ElementStyle::new(GRAY_DARK, GRAY_DARKER, BLUE).with_text(WHITE),
        Button::new("Kitchen...", FONT_BTN),
    )?;

    let label_x = 160;
    let slider_x = label_x + 50;
    let mut y = 115;
    store.create_text(
        PAGE_RGB,
        ElementIdRequest::Auto,
        rect(label_x, y, 120, 20),
        black_text(WHITE),
        TextLabel::new("Set LED RGB:", FONT_HEAD),
    )?;
    y += 25;

    let channels = [
        (SLIDER_R, "Red:", RED, RED_DARK, r),
        (SLIDER_G, "Green:", GREEN, GREEN_DARK, g),
        (SLIDER_B, "Blue:", BLUE, BLUE_DARK, b),
    ];

    for (id, label, color, trim, pos) in channels {
        store.create_text(
            PAGE_RGB,
            ElementIdRequest::Auto,
            rect(label_x, y, 45, 20),
            black_text(GRAY_LIGHT),
            TextLabel::new(label, FONT_TXT),
        )?;

        // All three sliders share one callback and tell themselves apart by id
        let state = Rc::clone(rgb);
        let slider = Slider::new(Orientation::Horizontal, 5, 0, 255, pos as i16)?
            .with_style(SliderStyle {
                trim: Some(trim),
                tick_divisions: 10,
                tick_length: 5,
                tick_color: GRAY_DARK,
            })
            .with_position_callback(Callback::new(move |id, pos: i16| {
                let mut rgb = state.rgb.get();
                let channel = match id {
                    SLIDER_R => 0,
                    SLIDER_G => 1,
                    SLIDER_B => 2,
                    _ => return,
                };
                rgb[channel] = pos.clamp(0, 255) as u8;
                state.rgb.set(rgb);
                state.changed.set(true);
            }));

        store.create_slider(
            PAGE_RGB,
            ElementIdRequest::Fixed(id),
            rect(slider_x, y, 80, 20),
            ElementStyle::new(color, BLACK, WHITE),
            slider,
        )?;
        y += 30;
    }

    Ok(())
}

fn build_widgets_page(store: &mut Store) -> Result<(), WidgetError> {
    store.add_page(PAGE_WIDGETS)?;

    store.create_text(
        PAGE_WIDGETS,
        ElementIdRequest::Auto,
        rect(0, 5, 320, 25),
        text_style(WHITE),
        TextLabel::new("Widgets", FONT_TITLE).with_alignment(Alignment::Center),
    )?;

    store.create_gauge(
        PAGE_WIDGETS,
        ElementIdRequest::Fixed(ELEM_GAUGE),
        rect(20, 40, 280, 16),
        ElementStyle::new(GRAY, BLACK, GRAY),
        Gauge::new(0, 100, 0, ORANGE, Orientation::Horizontal)?,
    )?;

    store.create_checkbox(
        PAGE_WIDGETS,
        ElementIdRequest::Auto,
        rect(20, 70, 20, 20),
        ElementStyle::new(GRAY, BLACK, WHITE),
        Checkbox::new(false, CheckStyle::Box, GREEN, true).with_callback(Callback::new(
            |id, checked| info!("Checkbox {:?} -> {}", id, checked),
        )),
        None,
    )?;
    add_text(store, PAGE_WIDGETS, ElementIdRequest::Auto, rect(45, 70, 80, 20), "Enable", FONT_TXT, WHITE)?;

    for (i, label) in RADIO_LABELS.iter().enumerate() {
        let y = 100 + 30 * i as i32;
        store.create_checkbox(
            PAGE_WIDGETS,
            ElementIdRequest::Fixed(ElementId(20 + i as u16)),
            rect(20, y, 20, 20),
            ElementStyle::new(GRAY, BLACK, WHITE),
            Checkbox::new(true, CheckStyle::Round, ORANGE, i == 0),
            Some(RADIO_MODES),
        )?;
        add_text(store, PAGE_WIDGETS, ElementIdRequest::Auto, rect(45, y, 80, 20), label, FONT_TXT, WHITE)?;
    }

    store.create_stepper(
        PAGE_WIDGETS,
        ElementIdRequest::Fixed(ELEM_STEPPER),
        rect(150, 100, 140, 30),
        ElementStyle::new(GRAY, GRAY_DARK, WHITE).with_text(WHITE),
        FONT_BTN,
        5,
    )?;

    add_text(
        store,
        PAGE_WIDGETS,
        ElementIdRequest::Fixed(ELEM_MODE_LABEL),
        rect(150, 140, 90, 20),
        "Mode: Low",
        FONT_TXT,
        GRAY_LIGHT,
    )?;

    store.create_gauge(
        PAGE_WIDGETS,
        ElementIdRequest::Fixed(ELEM_LEVEL),
        rect(270, 140, 20, 90),
        ElementStyle::new(GRAY, BLACK, GRAY),
        Gauge::new(0, 20, 5, GREEN, Orientation::Vertical)?,
    )?;

    Ok(())
}

fn build_store(config: &DemoConfig, rgb: &Rc<RgbState>) -> Result<Store, WidgetError> {
    let mut store = Store::new(GRAY_DARKER);

    store.add_font(FONT_BTN, &FONT_7X13)?;
    store.add_font(FONT_TXT, &FONT_6X10)?;
    store.add_font(FONT_HEAD, &FONT_7X13_BOLD)?;
    store.add_font(FONT_TITLE, &FONT_10X20)?;

    build_rgb_page(&mut store, rgb)?;
    build_widgets_page(&mut store)?;

    if config.start_page == 2 {
        store.set_current_page(PAGE_WIDGETS)?;
    }
    Ok(store)
}

// ---------------------------------------------------------------------------
// Event handling
// ---------------------------------------------------------------------------

fn keycode_to_page(keycode: Keycode) -> Option<PageId> {
    match keycode {
        Keycode::Num1 | Keycode::Kp1 => Some(PAGE_RGB),
        Keycode::Num2 | Keycode::Kp2 => Some(PAGE_WIDGETS),
        _ => None,
    }
}

/// React to a touch result. Returns `true` when the application should quit.
fn on_touch_result(store: &mut Store, result: TouchResult) -> Result<bool, WidgetError> {
    let TouchResult::Action(action) = result else {
        return Ok(false);
    };
    info!("Touch → {:?}", action);

    match action {
        Action::Clicked(ELEM_SAVE) => {
            let bytes = store.snapshot(PAGE_RGB)?;
            info!("Saved slider settings ({} bytes): {:02x?}", bytes.len(), bytes);
            return Ok(true);
        }
        Action::RadioSelected { .. } => {
            let label = store
                .find_checked(PAGE_WIDGETS, RADIO_MODES)?
                .and_then(|id| RADIO_LABELS.get(id.0.checked_sub(20)? as usize))
                .copied()
                .unwrap_or("-");
            store.set_text(PAGE_WIDGETS, ELEM_MODE_LABEL, &format!("Mode: {}", label))?;
        }
        Action::CounterChanged { id: ELEM_STEPPER, counter } => {
            store.update_gauge(PAGE_WIDGETS, ELEM_LEVEL, counter)?;
        }
        _ => {}
    }
    Ok(false)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    let config = DemoConfig::from_env();
    info!("Starting slate simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, config.scale
    );
    info!("Keys: 1=RGB sliders  2=Widgets  Q=Quit");

    let rgb = Rc::new(RgbState::default());
    rgb.rgb.set(config.initial_rgb);

    let mut store = match build_store(&config, &rgb) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to build pages: {}", e);
            return;
        }
    };

    let size = Size::new(DISPLAY_WIDTH_PX as u32, DISPLAY_HEIGHT_PX as u32);
    let mut display = SimulatorDisplay::<Rgb565>::new(size);
    let mut framebuffer = FrameBuffer::new(size);

    let output_settings = OutputSettingsBuilder::new().scale(config.scale).build();
    let mut window = Window::new("Slate Simulator", &output_settings);

    let queue: TouchQueue<16> = TouchQueue::new();
    let mut tracker = TouchTracker::new();
    let mut mouse_down = false;

    let mut gauge_value: i16 = 0;
    let mut last_gauge_step = Instant::now();

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    window.update(&display);

    'running: loop {
        let frame_start = Instant::now();

        // --- SDL events ---------------------------------------------------
        for event in window.events() {
            let sample = match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => {
                    if keycode == Keycode::Q || keycode == Keycode::Escape {
                        break 'running;
                    }
                    if let Some(target) = keycode_to_page(keycode)
                        && let Err(e) = store.set_current_page(target)
                    {
                        error!("Page switch failed: {}", e);
                    }
                    continue;
                }

                SimulatorEvent::MouseButtonDown { point, .. } => {
                    mouse_down = true;
                    Some(point)
                }
                SimulatorEvent::MouseMove { point } if mouse_down => Some(point),
                SimulatorEvent::MouseButtonUp { .. } => {
                    mouse_down = false;
                    None
                }
                _ => continue,
            };

            let sample = sample.map(|p| TouchPoint::new(p.x.max(0) as u16, p.y.max(0) as u16));
            if let Some(touch) = tracker.update(sample) {
                // Dropped events are logged by the queue
                let _ = queue.push(touch);
            }
        }

        // --- Touch --------------------------------------------------------
        while let Some(touch) = queue.pop() {
            let result = store.handle_touch(touch);
            match on_touch_result(&mut store, result) {
                Ok(true) => break 'running,
                Ok(false) => {}
                Err(e) => error!("Touch handling failed: {}", e),
            }
        }

        // --- Slider callback side effects ---------------------------------
        if rgb.changed.replace(false) {
            let [r, g, b] = rgb.rgb.get();
            let style = ElementStyle::new(WHITE, rgb888(r, g, b), WHITE);
            if let Err(e) = store.set_style(PAGE_RGB, ELEM_COLOR, style) {
                error!("Color box update failed: {}", e);
            }
        }

        // --- Animated gauge -----------------------------------------------
        if last_gauge_step.elapsed() >= GAUGE_STEP_INTERVAL {
            gauge_value = if gauge_value >= 100 { 0 } else { gauge_value + 2 };
            if let Err(e) = store.update_gauge(PAGE_WIDGETS, ELEM_GAUGE, gauge_value) {
                error!("Gauge update failed: {}", e);
            }
            last_gauge_step = Instant::now();
        }

        // --- Render -------------------------------------------------------
        if store.needs_redraw() {
            if let Err(e) = store.redraw(&mut framebuffer) {
                error!("Draw error: {}", e);
            }
            let _ = framebuffer.flush(&mut display);
        }

        window.update(&display);

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("Simulator exiting");
}
