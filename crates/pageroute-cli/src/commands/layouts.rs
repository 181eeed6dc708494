// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Prints the layout modules.

use console::style;
use pageroute::generate_layouts_export;

/// Runs the layouts command.
pub async fn run() -> anyhow::Result<()> {
    let generator = super::load_generator(|options| options.enable_layouts = true)?;
    let options = generator.options();

    println!("{}", style(format!("// {}", options.layouts_virtual_module)).dim());
    println!("{}", generator.generate_layouts().await?);
    println!("{}", style("// layout runtime").dim());
    println!("{}", generate_layouts_export(options)?);
    Ok(())
}
