// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! CLI command implementations.
//!
//! - `generate`: Write the routes file once
//! - `watch`: Keep the routes file up to date
//! - `layouts`: Print the layout modules

/// One-off generation command.
pub mod generate;
/// Layout module command.
pub mod layouts;
/// File watch command.
pub mod watch;

use crate::config::Config;
use pageroute::{RouteGenerator, RouteOptions};

/// Load `pageroute.toml` from the current directory and build a generator.
pub(crate) fn load_generator(adjust: impl FnOnce(&mut RouteOptions)) -> anyhow::Result<RouteGenerator> {
    let config = Config::load()?;
    let mut options = config.route_options(std::env::current_dir()?);
    adjust(&mut options);

    let generator = RouteGenerator::new(options);
    generator.validate()?;
    Ok(generator)
}
