// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! One-off route generation.

use clap::ValueEnum;
use console::style;
use pageroute::{write_routes_file, ModuleFormat, RouteGenerator};
use std::path::PathBuf;
use std::time::Instant;

/// `--format` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Bare `export default [...]` module
    Module,
    /// JavaScript with JSDoc types
    Js,
    /// TypeScript
    Ts,
}

impl From<FormatArg> for ModuleFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Module => ModuleFormat::Module,
            FormatArg::Js => ModuleFormat::JavaScript,
            FormatArg::Ts => ModuleFormat::TypeScript,
        }
    }
}

/// Generate routes and write them to the configured output directory.
pub async fn write_routes(generator: &RouteGenerator) -> pageroute::Result<PathBuf> {
    let code = generator.generate().await?;
    let options = generator.options();
    write_routes_file(&options.out_path(), &code, options.format).await
}

/// Runs the generate command.
pub async fn run(out: Option<String>, format: Option<FormatArg>, stdout: bool, quiet: bool) -> anyhow::Result<()> {
    let generator = super::load_generator(|options| {
        if let Some(out) = out {
            options.out_dir = out;
        }
        if let Some(format) = format {
            options.format = format.into();
        }
    })?;

    if stdout {
        println!("{}", generator.generate().await?);
        return Ok(());
    }

    let start = Instant::now();
    let path = write_routes(&generator).await?;

    if !quiet {
        println!(
            "{} {} in {:.2?}",
            style("Generated").green().bold(),
            path.display(),
            start.elapsed()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_arg_mapping() {
        assert_eq!(ModuleFormat::from(FormatArg::Module), ModuleFormat::Module);
        assert_eq!(ModuleFormat::from(FormatArg::Js), ModuleFormat::JavaScript);
        assert_eq!(ModuleFormat::from(FormatArg::Ts), ModuleFormat::TypeScript);
    }
}
