//! Tilt Garden entry point
//!
//! Handles platform-specific initialization and runs the sketch loops.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{
        CanvasRenderingContext2d, DeviceMotionEvent, DeviceOrientationEvent, Document,
        HtmlCanvasElement, HtmlElement, HtmlImageElement, MouseEvent, TouchEvent, Window,
    };

    use tilt_garden::fit::{FitMode, FitRect, fit_rect};
    use tilt_garden::input::TiltState;
    use tilt_garden::layout;
    use tilt_garden::scene::{PlaybackChange, SceneState};
    use tilt_garden::sensors::{PermissionOutcome, request_motion_permission};
    use tilt_garden::settings::Settings;

    /// Image assets (opaque animated files; the browser decodes them)
    const SUN_GIF: &str = "assets/sunshine.gif";
    const FLOWER_GIF: &str = "assets/flowers.gif";
    const CAT_GIF: &str = "assets/cat.gif";

    /// Id of the manual permission prompt button
    const ENABLE_BTN_ID: &str = "enable-motion-btn";

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tilt Garden starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();

        match query_param(&window, "sketch").as_deref() {
            Some("fitter") => run_fitter(&window, &document, settings),
            _ => run_garden(&window, &document, settings),
        }
    }

    /// Read a single query parameter from the page URL
    fn query_param(window: &Window, key: &str) -> Option<String> {
        let search = window.location().search().ok()?;
        let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
        params.get(key)
    }

    /// Current viewport size in CSS pixels
    fn viewport_size(window: &Window) -> Vec2 {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Vec2::new(w as f32, h as f32)
    }

    /// Grab the full-viewport canvas and its 2D context
    fn canvas_and_context(document: &Document) -> (HtmlCanvasElement, CanvasRenderingContext2d) {
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("get_context failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");
        (canvas, ctx)
    }

    /// Size the canvas backing store to the viewport (CSS pixels)
    fn size_canvas(canvas: &HtmlCanvasElement, viewport: Vec2) {
        canvas.set_width(viewport.x as u32);
        canvas.set_height(viewport.y as u32);
    }

    // =========================================================
    // Image fitter sketch
    // =========================================================

    /// Fitter sketch state
    struct FitterApp {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        image: HtmlImageElement,
        mode: FitMode,
    }

    impl FitterApp {
        /// Draw one frame. While the image has no intrinsic size yet the
        /// draw is skipped; it picks up automatically once loading ends.
        fn frame(&self) {
            let w = self.canvas.width() as f32;
            let h = self.canvas.height() as f32;

            self.ctx.set_fill_style_str("rgb(255, 0, 0)");
            self.ctx.fill_rect(0.0, 0.0, w as f64, h as f64);

            let iw = self.image.natural_width() as f32;
            let ih = self.image.natural_height() as f32;
            if !self.image.complete() || iw < 1.0 || ih < 1.0 {
                return;
            }

            let r = fit_rect(iw, ih, w, h, self.mode);
            let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                &self.image,
                r.x as f64,
                r.y as f64,
                r.w as f64,
                r.h as f64,
            );
        }
    }

    fn run_fitter(window: &Window, document: &Document, mut settings: Settings) {
        let (canvas, ctx) = canvas_and_context(document);
        size_canvas(&canvas, viewport_size(window));

        // Query override wins and sticks for later visits
        let mode = match query_param(window, "mode").and_then(|s| FitMode::from_str(&s)) {
            Some(mode) => {
                if mode != settings.fit_mode {
                    settings.fit_mode = mode;
                    settings.save();
                }
                mode
            }
            None => settings.fit_mode,
        };
        log::info!("Fitter sketch, mode: {}", mode.as_str());

        // Loaded off-DOM; the canvas is the only thing on screen
        let image = HtmlImageElement::new().expect("create img");
        image.set_src(CAT_GIF);
        let app = Rc::new(RefCell::new(FitterApp {
            canvas,
            ctx,
            image,
            mode,
        }));

        // Resize recomputes the backing store synchronously
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let window = web_sys::window().expect("no window");
                let a = app.borrow();
                size_canvas(&a.canvas, viewport_size(&window));
            });
            let _ = web_sys::window()
                .expect("no window")
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        fitter_animation_frame(app);
        log::info!("Fitter running!");
    }

    fn fitter_animation_frame(app: Rc<RefCell<FitterApp>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |_time: f64| {
            app.borrow().frame();
            fitter_animation_frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // =========================================================
    // Tilt reactive garden scene
    // =========================================================

    /// Garden scene state shared between event listeners and the frame loop
    struct GardenApp {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        sun: HtmlImageElement,
        flower: HtmlImageElement,
        tilt: TiltState,
        scene: SceneState,
        /// Any sensor has proven itself (orientation/motion event arrived
        /// or permission granted)
        sensors_enabled: bool,
        /// Mouse button currently held (gates mousemove as pointer input)
        mouse_down: bool,
        viewport: Vec2,
        sun_box: FitRect,
        flower_box: FitRect,
        show_hint: bool,
    }

    impl GardenApp {
        /// Recompute element layout for the current viewport and image
        /// sizes, and apply it to the DOM
        fn relayout(&mut self) {
            size_canvas(&self.canvas, self.viewport);

            let sun_natural = layout::natural_or_default(
                self.sun.natural_width() as f32,
                self.sun.natural_height() as f32,
            );
            let flower_natural = layout::natural_or_default(
                self.flower.natural_width() as f32,
                self.flower.natural_height() as f32,
            );

            self.sun_box = layout::sun_box(self.viewport, sun_natural);
            self.flower_box = layout::flower_box(self.viewport, flower_natural, &self.sun_box);

            apply_box(&self.sun, &self.sun_box);
            apply_box(&self.flower, &self.flower_box);
        }

        /// Advance the scene one frame and apply the output to the DOM
        fn frame(&mut self) {
            let sample = self.tilt.sample();
            let out = self.scene.advance(sample.progress());

            // Sun travels the top edge with tilt progress
            let x = layout::sun_x(self.viewport.x, self.sun_box.w, out.sun_t);
            set_position(&self.sun, x, self.sun_box.y);

            // Black veil: more tilt, more transparent
            let w = self.viewport.x as f64;
            let h = self.viewport.y as f64;
            self.ctx.clear_rect(0.0, 0.0, w, h);
            self.ctx
                .set_fill_style_str(&format!("rgba(0, 0, 0, {:.4})", out.veil_alpha / 255.0));
            self.ctx.fill_rect(0.0, 0.0, w, h);

            match out.change {
                Some(PlaybackChange::Started) => {
                    let _ = self.flower.style().set_property("opacity", "1");
                    restart_gif(&self.flower, FLOWER_GIF);
                    log::info!("Flower started (progress {:.2})", sample.progress());
                }
                Some(PlaybackChange::Stopped) => {
                    let _ = self.flower.style().set_property("opacity", "0");
                    log::info!("Flower paused (progress {:.2})", sample.progress());
                }
                None => {}
            }

            if self.show_hint {
                self.draw_hint();
            }
        }

        fn draw_hint(&self) {
            let tip = if self.sensors_enabled {
                "Tilt right to START \u{2022} Tilt back to PAUSE"
            } else {
                "Tap \"Enable Motion\", then tilt right to START"
            };
            self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.47)");
            self.ctx.set_font(
                "13px system-ui, -apple-system, 'Segoe UI', Roboto, Helvetica, Arial",
            );
            self.ctx.set_text_align("center");
            self.ctx.set_text_baseline("top");
            let _ = self
                .ctx
                .fill_text(tip, (self.viewport.x / 2.0) as f64, 14.0);
        }

        /// Mark sensors live and retire the manual prompt
        fn enable_sensors(&mut self) {
            if !self.sensors_enabled {
                self.sensors_enabled = true;
                log::info!("Motion sensors enabled");
            }
            set_button_hidden(true);
        }
    }

    fn run_garden(window: &Window, document: &Document, settings: Settings) {
        let (canvas, ctx) = canvas_and_context(document);

        // Sunshine at top, flower at bottom (initially hidden)
        let sun = create_image(document, SUN_GIF, "sunshine");
        let _ = sun.style().set_property("z-index", "1");
        let flower = create_image(document, FLOWER_GIF, "flower");
        let _ = flower.style().set_property("z-index", "2");
        let _ = flower.style().set_property("opacity", "0");

        let viewport = viewport_size(window);
        let app = Rc::new(RefCell::new(GardenApp {
            canvas,
            ctx,
            sun,
            flower,
            tilt: TiltState::new(),
            scene: SceneState::new(),
            sensors_enabled: false,
            mouse_down: false,
            viewport,
            sun_box: FitRect { x: 0.0, y: 0.0, w: 0.0, h: 0.0 },
            flower_box: FitRect { x: 0.0, y: 0.0, w: 0.0, h: 0.0 },
            show_hint: settings.show_hint,
        }));
        app.borrow_mut().relayout();

        set_button_hidden(false);
        lock_gestures(document);
        setup_sensor_listeners(app.clone());
        setup_permission_gestures(app.clone());
        setup_pointer_fallback(app.clone());
        setup_resize(app.clone());
        setup_image_load(app.clone());

        garden_animation_frame(app);
        log::info!("Garden running!");
    }

    fn garden_animation_frame(app: Rc<RefCell<GardenApp>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |_time: f64| {
            app.borrow_mut().frame();
            garden_animation_frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Sensor listeners: orientation (primary) and motion (secondary).
    /// Either event arriving proves sensors work and hides the prompt.
    fn setup_sensor_listeners(app: Rc<RefCell<GardenApp>>) {
        let window = web_sys::window().expect("no window");

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DeviceOrientationEvent| {
                if let Some(gamma) = event.gamma() {
                    let mut a = app.borrow_mut();
                    a.tilt.gamma = Some(gamma as f32);
                    a.enable_sensors();
                }
            });
            let _ = window.add_event_listener_with_callback(
                "deviceorientation",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DeviceMotionEvent| {
                let mut a = app.borrow_mut();
                // Roll estimate from the gravity vector; only used when no
                // orientation sample ever arrives
                if let Some(accel) = event.acceleration_including_gravity() {
                    if let (Some(x), Some(y), Some(z)) = (accel.x(), accel.y(), accel.z()) {
                        let roll = x.atan2((y * y + z * z).sqrt()).to_degrees();
                        a.tilt.rotation = Some(roll as f32);
                    }
                }
                a.enable_sensors();
            });
            let _ = web_sys::window()
                .expect("no window")
                .add_event_listener_with_callback(
                    "devicemotion",
                    closure.as_ref().unchecked_ref(),
                );
            closure.forget();
        }
    }

    /// Request motion permission on the prompt button and on the first
    /// user gestures (iOS requires the call to come from one)
    fn setup_permission_gestures(app: Rc<RefCell<GardenApp>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(btn) = document.get_element_by_id(ENABLE_BTN_ID) {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                request_permission(app.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                request_permission(app.clone());
            });
            let _ = window
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                request_permission(app.clone());
            });
            let _ = web_sys::window()
                .expect("no window")
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// One-shot async permission request; only Granted flips state
    fn request_permission(app: Rc<RefCell<GardenApp>>) {
        spawn_local(async move {
            match request_motion_permission().await {
                PermissionOutcome::Granted => app.borrow_mut().enable_sensors(),
                outcome => {
                    log::warn!("Motion permission {}, staying on pointer fallback", outcome.as_str());
                }
            }
        });
    }

    /// Pointer/touch fallback: x position maps to the tilt range
    fn setup_pointer_fallback(app: Rc<RefCell<GardenApp>>) {
        let window = web_sys::window().expect("no window");

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.mouse_down = true;
                let t = event.client_x() as f32 / a.viewport.x.max(1.0);
                a.tilt.pointer = Some(t.clamp(0.0, 1.0));
            });
            let _ = window
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                if a.mouse_down {
                    let t = event.client_x() as f32 / a.viewport.x.max(1.0);
                    a.tilt.pointer = Some(t.clamp(0.0, 1.0));
                }
            });
            let _ = web_sys::window()
                .expect("no window")
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.mouse_down = false;
                a.tilt.pointer = None;
            });
            let _ = web_sys::window()
                .expect("no window")
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch listeners need passive off so preventDefault can stop the
        // page from scrolling under the swipe
        let opts = web_sys::AddEventListenerOptions::new();
        opts.set_passive(false);

        for event_name in ["touchstart", "touchmove"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    let t = touch.client_x() as f32 / a.viewport.x.max(1.0);
                    a.tilt.pointer = Some(t.clamp(0.0, 1.0));
                }
            });
            let _ = web_sys::window()
                .expect("no window")
                .add_event_listener_with_callback_and_add_event_listener_options(
                    event_name,
                    closure.as_ref().unchecked_ref(),
                    &opts,
                );
            closure.forget();
        }
    }

    /// Resize recomputes canvas size and element layout synchronously
    fn setup_resize(app: Rc<RefCell<GardenApp>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let window = web_sys::window().expect("no window");
            let mut a = app.borrow_mut();
            a.viewport = viewport_size(&window);
            a.relayout();
        });
        let _ = web_sys::window()
            .expect("no window")
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Re-run layout when an image reports its intrinsic size
    fn setup_image_load(app: Rc<RefCell<GardenApp>>) {
        let (sun, flower) = {
            let a = app.borrow();
            (a.sun.clone(), a.flower.clone())
        };
        for img in [sun, flower] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().relayout();
            });
            let _ = img.add_event_listener_with_callback("load", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    // =========================================================
    // DOM helpers
    // =========================================================

    /// Create a fixed-position image element and attach it to the body
    fn create_image(document: &Document, src: &str, alt: &str) -> HtmlImageElement {
        let img: HtmlImageElement = document
            .create_element("img")
            .expect("create img")
            .dyn_into()
            .expect("not an img");
        img.set_src(src);
        img.set_alt(alt);
        let _ = img.style().set_property("position", "fixed");
        let _ = img.style().set_property("pointer-events", "none");
        if let Some(body) = document.body() {
            let _ = body.append_child(&img);
        }
        img
    }

    /// Apply a layout box to an image element
    fn apply_box(img: &HtmlImageElement, rect: &FitRect) {
        img.set_width(rect.w as u32);
        img.set_height(rect.h as u32);
        set_position(img, rect.x, rect.y);
    }

    fn set_position(img: &HtmlImageElement, x: f32, y: f32) {
        let _ = img.style().set_property("left", &format!("{x:.1}px"));
        let _ = img.style().set_property("top", &format!("{y:.1}px"));
    }

    /// Toggle the enable-motion prompt via its `hidden` class
    fn set_button_hidden(hidden: bool) {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");
        if let Some(btn) = document.get_element_by_id(ENABLE_BTN_ID) {
            let list = btn.class_list();
            let _ = if hidden {
                list.add_1("hidden")
            } else {
                list.remove_1("hidden")
            };
        }
    }

    /// Reload a looping GIF with a cache-busting query so it restarts at
    /// frame one
    fn restart_gif(img: &HtmlImageElement, src: &str) {
        img.set_src(&format!("{}?t={}", src, js_sys::Date::now()));
    }

    /// Keep swipes driving the sketch instead of scrolling the page
    fn lock_gestures(document: &Document) {
        if let Some(root) = document.document_element() {
            if let Ok(root) = root.dyn_into::<HtmlElement>() {
                let _ = root.style().set_property("touch-action", "none");
            }
        }
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.prevent_default();
        });
        let _ = document
            .add_event_listener_with_callback("gesturestart", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tilt Garden (native) starting...");
    log::info!("Sketches need a browser - run with `trunk serve` for the web version");

    // Run self-checks
    println!("\nRunning placement and playback checks...");
    check_fit_placement();
    check_playback_sequence();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn check_fit_placement() {
    use tilt_garden::fit::{FitMode, fit_rect};

    let r = fit_rect(640.0, 480.0, 400.0, 800.0, FitMode::Contain);
    assert!(r.x >= 0.0 && r.y >= 0.0 && r.x + r.w <= 400.0 && r.y + r.h <= 800.0);
    assert!((r.aspect() - 640.0 / 480.0).abs() < 1e-3);
    println!("✓ Fit placement checks passed!");
}

#[cfg(not(target_arch = "wasm32"))]
fn check_playback_sequence() {
    use tilt_garden::scene::{PlaybackChange, SceneState};

    let mut scene = SceneState::new();
    let changes: Vec<_> = [0.0, 0.2, 0.4, 0.3, 0.5]
        .iter()
        .map(|&p| scene.advance(p).change)
        .collect();
    assert_eq!(changes[2], Some(PlaybackChange::Started));
    assert_eq!(changes[3], Some(PlaybackChange::Stopped));
    println!("✓ Playback sequence checks passed!");
}
