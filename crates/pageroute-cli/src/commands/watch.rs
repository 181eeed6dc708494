// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Watch command: keeps the routes file in sync with the pages directory.

use crate::watcher::FileWatcher;
use console::style;
use pageroute::{
    write_routes_file, Debouncer, MemoryModules, RouteGenerator, VirtualModuleStore,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Write the current routes module from `modules` to disk.
pub async fn flush(generator: &RouteGenerator, modules: &MemoryModules) -> anyhow::Result<Option<PathBuf>> {
    let options = generator.options();
    let Some(code) = modules.read_module(&options.virtual_module) else {
        return Ok(None);
    };
    let path = write_routes_file(&options.out_path(), &code, options.format).await?;
    Ok(Some(path))
}

/// Handle one debounced batch of changed paths.
pub async fn process_batch(
    generator: &RouteGenerator,
    modules: &MemoryModules,
    paths: Vec<PathBuf>,
) -> anyhow::Result<Option<PathBuf>> {
    if !generator.handle_changes(&paths, modules).await? {
        return Ok(None);
    }
    flush(generator, modules).await
}

/// Runs the file watcher and regenerates routes on change.
pub async fn run(quiet: bool) -> anyhow::Result<()> {
    let generator = Arc::new(super::load_generator(|_| {})?);
    let modules = MemoryModules::new();

    generator.regenerate(&modules).await?;
    if let Some(path) = flush(&generator, &modules).await? {
        if !quiet {
            println!("{} {}", style("Generated").green().bold(), path.display());
        }
    }

    let options = generator.options();
    let mut dirs = vec![options.pages_path()];
    if options.enable_layouts {
        dirs.push(options.layouts_path());
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<PathBuf>>();
    let _watcher = FileWatcher::new(&dirs, options.extensions.clone(), move |paths| {
        let _ = tx.send(paths);
    })?;

    if !quiet {
        println!("Watching for changes in: {}", options.pages_dir);
        println!("Press Ctrl+C to stop...");
        println!();
    }

    let debouncer = Debouncer::default();
    let batch: Arc<Mutex<Vec<PathBuf>>> = Arc::new(Mutex::new(Vec::new()));

    loop {
        tokio::select! {
            Some(paths) = rx.recv() => {
                info!("{} file(s) changed", paths.len());
                if let Ok(mut pending) = batch.lock() {
                    pending.extend(paths);
                }

                let generator = generator.clone();
                let modules = modules.clone();
                let batch = batch.clone();
                debouncer.trigger(move || async move {
                    let paths = batch
                        .lock()
                        .map(|mut pending| std::mem::take(&mut *pending))
                        .unwrap_or_default();

                    match process_batch(&generator, &modules, paths).await {
                        Ok(Some(path)) if !quiet => {
                            println!("  {} {}", style("Regenerated").green(), path.display());
                        }
                        Ok(_) => {}
                        Err(e) => error!("Regeneration failed: {}", e),
                    }
                });
            }
            _ = signal::ctrl_c() => break,
        }
    }

    debouncer.cancel();
    if !quiet {
        println!("\nStopping file watcher...");
    }
    Ok(())
}
