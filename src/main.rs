use anyhow::Context;
use pixelfx::compositor::Compositor;
use pixelfx::config::{self, CliAction, DemoKind};
use pixelfx::display::{Display, InputEvent, RenderTarget};
use pixelfx::effects;
use pixelfx::util::FpsCounter;
use sdl2::keyboard::Keycode;
use std::time::{Duration, Instant};

/// How often the FPS line is logged while enabled
const FPS_LOG_INTERVAL: Duration = Duration::from_secs(1);

fn print_banner(width: u32, height: u32, vsync: bool) {
    println!("=== pixelfx ===");
    println!("Resolution: {}x{}", width, height);
    if vsync {
        println!("VSync: ON (60fps locked). Use --no-vsync for uncapped.");
    } else {
        println!("VSync: OFF (uncapped framerate)");
    }
    println!("Use --help for command line options.");
    println!("Controls:");
    println!("  Left/Right - Cycle through effects");
    for (i, kind) in DemoKind::ALL.iter().enumerate() {
        println!("  {}          - {}", i + 1, kind.name());
    }
    println!("  F          - Toggle FPS logging");
    println!("  P          - Log profiler report");
    println!("  Escape/Q   - Quit");
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match config::parse_args(std::env::args().skip(1))? {
        CliAction::Run(config) => config,
        CliAction::Help => {
            println!("{}", config::usage());
            return Ok(());
        },
    };
    let (width, height) = (config.width, config.height);

    let (mut display, texture_creator) =
        Display::with_options("pixelfx", width, height, config.vsync).map_err(anyhow::Error::msg)?;
    let mut target = RenderTarget::with_size(&texture_creator, width, height)
        .map_err(anyhow::Error::msg)
        .context("creating streaming texture")?;

    let mut compositor = Compositor::new(width, height, effects::all(config.seed));
    compositor.select(config.demo.index());

    // FPS counter with 60 sample rolling average
    let mut fps_counter = FpsCounter::new(60);
    let mut show_fps = false;
    let mut last_fps_log = Instant::now();

    print_banner(width, height, config.vsync);
    log::info!("starting with {}", compositor.current_name());

    let start = Instant::now();
    'main: loop {
        let (_dt, avg_fps) = fps_counter.tick();

        for event in display.poll_events() {
            let key = match event {
                InputEvent::Quit => break 'main,
                InputEvent::KeyDown(key) => key,
            };
            match key {
                Keycode::Escape | Keycode::Q => break 'main,
                Keycode::Left => compositor.prev(),
                Keycode::Right => compositor.next(),
                Keycode::Num1 => {
                    compositor.select(0);
                },
                Keycode::Num2 => {
                    compositor.select(1);
                },
                Keycode::Num3 => {
                    compositor.select(2);
                },
                Keycode::Num4 => {
                    compositor.select(3);
                },
                Keycode::Num5 => {
                    compositor.select(4);
                },
                Keycode::F => {
                    show_fps = !show_fps;
                    log::info!("fps logging {}", if show_fps { "on" } else { "off" });
                },
                Keycode::P => compositor.stopwatch().log_report(),
                _ => {},
            }
        }

        compositor.frame(start.elapsed().as_millis() as u64);

        if show_fps && last_fps_log.elapsed() >= FPS_LOG_INTERVAL {
            let (min_fps, max_fps) = fps_counter.min_max_fps();
            log::info!(
                "FPS {} avg  {} min  {} max  {}ms",
                avg_fps as u32,
                min_fps as u32,
                max_fps as u32,
                fps_counter.avg_frame_time_ms() as u32
            );
            last_fps_log = Instant::now();
        }

        display
            .present(&mut target, compositor.buffer())
            .map_err(anyhow::Error::msg)?;
    }

    if config.profile {
        compositor.stopwatch().log_report();
    }

    Ok(())
}
