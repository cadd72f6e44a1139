//! Harness settings read from the environment.
//!
//! Values may come from the process environment or from a `.env` file in the
//! working directory:
//!
//! | Variable          | Default       | Meaning                          |
//! |-------------------|---------------|----------------------------------|
//! | `SLATE_SCALE`     | `2`           | Window pixel scale               |
//! | `SLATE_RGB`       | `255,128,0`   | Initial slider positions (R,G,B) |
//! | `SLATE_PAGE`      | `1`           | Page shown at startup (1 or 2)   |

use std::env;
use std::str::FromStr;

use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoConfig {
    pub scale: u32,
    pub initial_rgb: [u8; 3],
    pub start_page: u8,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            scale: 2,
            initial_rgb: [255, 128, 0],
            start_page: 1,
        }
    }
}

impl DemoConfig {
    /// Load `.env` if present, then read the settings from the environment.
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded settings from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("Ignoring .env: {}", e),
        }

        let defaults = Self::default();
        Self {
            scale: read_var("SLATE_SCALE", defaults.scale).max(1),
            initial_rgb: env::var("SLATE_RGB")
                .ok()
                .and_then(|raw| parse_rgb(&raw).or_else(|| {
                    warn!("SLATE_RGB={:?} is not R,G,B; using default", raw);
                    None
                }))
                .unwrap_or(defaults.initial_rgb),
            start_page: read_var("SLATE_PAGE", defaults.start_page).clamp(1, 2),
        }
    }
}

fn read_var<T: FromStr + Copy + std::fmt::Debug>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{}={:?} is invalid; using {:?}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

fn parse_rgb(raw: &str) -> Option<[u8; 3]> {
    let mut parts = raw.split(',').map(|p| p.trim().parse::<u8>());
    let rgb = [parts.next()?.ok()?, parts.next()?.ok()?, parts.next()?.ok()?];
    if parts.next().is_some() {
        return None;
    }
    Some(rgb)
}
