//! Prism demo: batched shapes in a fixed 400x300 logical viewport.
//!
//! Usage:
//!   prism-demo [--headless] [--screenshot PATH] [--title TITLE]
//!
//! Windowed mode animates until the window closes; `--screenshot` captures
//! one frame a couple of seconds in. Headless mode renders a few frames to an
//! offscreen target and exits, writing `--screenshot` if given.

use std::path::PathBuf;

use anyhow::Result;

use prism_engine::app::App;
use prism_engine::coords::{Rect, Vec2, Viewport};
use prism_engine::logging::{LoggingConfig, init_logging};
use prism_engine::paint::Color;
use prism_engine::platform::MouseState;
use prism_engine::render::Canvas;
use prism_engine::runtime::{RunConfig, run};

/// Frame at which a windowed `--screenshot` request fires (~2s at 60 Hz).
const CAPTURE_FRAME: u64 = 120;

struct Demo {
    t: f32,
    frames: u64,
    mouse: MouseState,
    /// Stop after this many frames (headless mode).
    max_frames: Option<u64>,
    /// Pending windowed screenshot request.
    screenshot: Option<PathBuf>,
}

impl Demo {
    fn new(max_frames: Option<u64>, screenshot: Option<PathBuf>) -> Self {
        Self {
            t: 0.0,
            frames: 0,
            mouse: MouseState::default(),
            max_frames,
            screenshot,
        }
    }
}

impl App for Demo {
    fn update(&mut self, dt: f32, mouse: MouseState) {
        self.t += dt;
        self.frames += 1;
        self.mouse = mouse;
    }

    fn render(&mut self, canvas: &mut Canvas<'_>) {
        // Sky gradient over the whole viewport.
        canvas.fill_rect_gradient(
            Rect::new(0.0, 0.0, 400.0, 300.0),
            [
                Color::from_hex(0x10163a),
                Color::from_hex(0x10163a),
                Color::from_hex(0x3a2e55),
                Color::from_hex(0x3a2e55),
            ],
        );

        // Rolling hills as a polygon.
        let mut hills = vec![Vec2::new(0.0, 300.0)];
        for i in 0..=20 {
            let x = i as f32 * 20.0;
            let y = 230.0 + 20.0 * (x * 0.02 + self.t * 0.4).sin();
            hills.push(Vec2::new(x, y));
        }
        hills.push(Vec2::new(400.0, 300.0));
        canvas.fill_polygon(&hills, Color::from_hex(0x1f4d2e));

        // Orbiting sun.
        let center = Vec2::new(200.0, 120.0);
        let sun = center + Vec2::new((self.t * 0.8).cos(), (self.t * 0.8).sin()) * 70.0;
        canvas.fill_circle(sun, 18.0, Color::YELLOW);

        // Sine trace across the sky.
        let mut trace = Vec::with_capacity(41);
        for i in 0..=40 {
            let x = i as f32 * 10.0;
            trace.push(Vec2::new(x, 80.0 + 25.0 * (x * 0.05 + self.t).sin()));
        }
        canvas.draw_polyline(&trace, 2.0, Color::CYAN);

        // Spinning triangle.
        let spin = self.t * 1.5;
        let tri: Vec<Vec2> = (0..3)
            .map(|i| {
                let a = spin + i as f32 * std::f32::consts::TAU / 3.0;
                Vec2::new(320.0 + 30.0 * a.cos(), 220.0 + 30.0 * a.sin())
            })
            .collect();
        canvas.fill_triangle_shaded(
            [tri[0], tri[1], tri[2]],
            [Color::RED, Color::GREEN, Color::BLUE],
        );

        // Mouse crosshair in logical coordinates.
        let m = Vec2::new(self.mouse.x, self.mouse.y);
        let color = if self.mouse.buttons.left {
            Color::MAGENTA
        } else {
            Color::WHITE
        };
        canvas.draw_line(m - Vec2::new(8.0, 0.0), m + Vec2::new(8.0, 0.0), 1.5, color);
        canvas.draw_line(m - Vec2::new(0.0, 8.0), m + Vec2::new(0.0, 8.0), 1.5, color);

        // Viewport frame.
        canvas.stroke_rect(Rect::new(1.0, 1.0, 398.0, 298.0), 2.0, Color::LIGHT_GRAY);
    }

    fn is_running(&self) -> bool {
        match self.max_frames {
            Some(max) => self.frames < max,
            None => true,
        }
    }

    fn should_take_screenshot(&mut self) -> Option<PathBuf> {
        if self.frames >= CAPTURE_FRAME {
            self.screenshot.clone()
        } else {
            None
        }
    }

    fn on_screenshot_complete(&mut self) {
        self.screenshot = None;
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut config = RunConfig {
        title: "prism demo".to_string(),
        viewport: Viewport::new(400.0, 300.0),
        initial_size: (800, 600),
        clear_color: Color::from_hex(0x0a0a12),
        ..RunConfig::default()
    };
    let mut screenshot: Option<PathBuf> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--headless" => config.headless = true,
            "--screenshot" => {
                screenshot = args.next().map(PathBuf::from);
                anyhow::ensure!(screenshot.is_some(), "--screenshot requires a path");
            }
            "--title" => {
                if let Some(title) = args.next() {
                    config.title = title;
                }
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    log::info!(
        "starting {} in {} mode",
        config.title,
        if config.headless { "headless" } else { "windowed" }
    );

    let app = if config.headless {
        // The headless runtime owns the startup capture.
        config.screenshot = screenshot;
        Demo::new(Some(3), None)
    } else {
        Demo::new(None, screenshot)
    };

    run(config, app)
}
