//! Runtime Configuration
//!
//! A `DemoConfig` comes from an optional JSON file (`--config PATH`) with
//! command-line flags applied on top. Every field has a default, so a partial
//! file or no file at all is fine.

use crate::display::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

// ============================================================================
// Demo selection
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum DemoKind {
    #[default]
    Fireworks,
    Tunnel,
    Bump,
    Snowfall,
    Plasma,
}

impl DemoKind {
    /// Same order as `effects::all`
    pub const ALL: [DemoKind; 5] = [
        DemoKind::Fireworks,
        DemoKind::Tunnel,
        DemoKind::Bump,
        DemoKind::Snowfall,
        DemoKind::Plasma,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DemoKind::Fireworks => "fireworks",
            DemoKind::Tunnel => "tunnel",
            DemoKind::Bump => "bump",
            DemoKind::Snowfall => "snowfall",
            DemoKind::Plasma => "plasma",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for DemoKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let wanted = s.to_ascii_lowercase();
        DemoKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| anyhow!("unknown demo '{}' (expected one of: {})", s, demo_names()))
    }
}

fn demo_names() -> String {
    DemoKind::ALL.map(DemoKind::name).join(", ")
}

// ============================================================================
// Config
// ============================================================================

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Effect shown at start-up
    pub demo: DemoKind,
    /// Seed for every effect's random generator
    pub seed: u64,
    /// Log the per-effect timing table on exit
    pub profile: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            vsync: true,
            demo: DemoKind::default(),
            seed: 0x2545_F491_4F6C_DD1D,
            profile: false,
        }
    }
}

impl DemoConfig {
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }
}

// ============================================================================
// Command line
// ============================================================================

#[derive(Debug, PartialEq)]
pub enum CliAction {
    Run(DemoConfig),
    Help,
}

/// Parse arguments (without the program name). `--config` is loaded first so
/// the remaining flags override it regardless of their position.
pub fn parse_args<I>(args: I) -> anyhow::Result<CliAction>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();

    let mut config = match args.iter().position(|a| a == "--config" || a == "-c") {
        Some(i) => {
            let path = args.get(i + 1).ok_or_else(|| anyhow!("--config needs a path"))?;
            DemoConfig::load(path)?
        },
        None => DemoConfig::default(),
    };

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || next_value(&args, &mut i, flag);

        match flag {
            "--help" => return Ok(CliAction::Help),
            "--config" | "-c" => {
                value()?;
            },
            "--no-vsync" => config.vsync = false,
            "--profile" => config.profile = true,
            "--width" | "-w" => config.width = parse_number(flag, value()?)?,
            "--height" | "-h" => config.height = parse_number(flag, value()?)?,
            "--resolution" | "-r" => {
                let (width, height) = parse_resolution(value()?)?;
                config.width = width;
                config.height = height;
            },
            "--demo" | "-d" => config.demo = value()?.parse()?,
            "--seed" => config.seed = parse_number(flag, value()?)?,
            other => bail!("unknown option '{}' (try --help)", other),
        }
        i += 1;
    }

    if config.width == 0 || config.height == 0 {
        bail!("resolution must be non-zero, got {}x{}", config.width, config.height);
    }
    Ok(CliAction::Run(config))
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> anyhow::Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} needs a value", flag))
}

fn parse_number<T: FromStr>(flag: &str, text: &str) -> anyhow::Result<T> {
    text.parse()
        .map_err(|_| anyhow!("{} expects a number, got '{}'", flag, text))
}

/// `WxH`, e.g. `1920x1080`
fn parse_resolution(text: &str) -> anyhow::Result<(u32, u32)> {
    let (w, h) = text
        .split_once('x')
        .ok_or_else(|| anyhow!("resolution must look like WxH, got '{}'", text))?;
    Ok((parse_number("--resolution", w)?, parse_number("--resolution", h)?))
}

pub fn usage() -> String {
    format!(
        "Usage: pixelfx [OPTIONS]

Options:
  --config PATH, -c PATH    Load settings from a JSON file (flags override it)
  --width W, -w W           Set window width (default: {})
  --height H, -h H          Set window height (default: {})
  --resolution WxH, -r WxH  Set resolution (e.g., 1920x1080)
  --demo NAME, -d NAME      Start with effect: {}
  --seed N                  Random seed
  --no-vsync                Disable VSync for uncapped framerate
  --profile                 Log per-effect timings on exit
  --help                    Show this help message",
        DEFAULT_WIDTH,
        DEFAULT_HEIGHT,
        demo_names()
    )
}
