// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Integration tests for configuration loading, generation and change
//! handling against a project on disk.

use std::fs;
use std::path::Path;

use pageroute::{MemoryModules, RouteGenerator, VirtualModuleStore};
use pageroute_cli::commands::generate::write_routes;
use pageroute_cli::commands::watch::process_batch;
use pageroute_cli::config::{Config, CONFIG_FILE};
use tempfile::tempdir;

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Create a small Vue project in a temp directory
fn setup_project(dir: &Path) {
    write(
        dir,
        CONFIG_FILE,
        "[layouts]\nenabled = true\n\n[output]\ndir = \"generated\"\nformat = \"ts\"\n",
    );
    write(dir, "src/pages/index.vue", "<template><h1>Home</h1></template>");
    write(
        dir,
        "src/pages/user.vue",
        "<template><router-view /></template>\n<script setup>\ndefinePageMeta({ layout: 'admin', meta: { title: 'Users' } })\n</script>",
    );
    write(dir, "src/pages/user/[id].vue", "<template>user</template>");
    write(dir, "src/pages/docs/[...slug].vue", "<template>docs</template>");
    write(dir, "src/pages/user/components/Avatar.vue", "<template>avatar</template>");
    write(dir, "src/layouts/default.vue", "<template><slot /></template>");
    write(dir, "src/layouts/admin.vue", "<template><slot /></template>");
}

fn generator_for(dir: &Path) -> RouteGenerator {
    let config = Config::load_from(&dir.join(CONFIG_FILE)).unwrap();
    RouteGenerator::new(config.route_options(dir.to_path_buf()))
}

#[tokio::test]
async fn test_generate_writes_typescript_routes() {
    let dir = tempdir().unwrap();
    setup_project(dir.path());

    let generator = generator_for(dir.path());
    let path = write_routes(&generator).await.unwrap();
    assert_eq!(path, dir.path().join("generated/routes.ts"));

    let code = fs::read_to_string(&path).unwrap();
    assert!(code.contains("import type { RouteRecordRaw } from 'vue-router';"));
    assert!(code.contains("\"path\": \"/user\""));
    assert!(code.contains("\"path\": \":id\""));
    assert!(code.contains("\"path\": \"/docs/:slug(.*)\""));
    assert!(code.contains("\"layout\": \"admin\""));
    assert!(code.contains("\"title\": \"Users\""));
    assert!(code.contains("import('@/pages/user/[id].vue')"));
    assert!(!code.contains("Avatar"));
}

#[tokio::test]
async fn test_batch_regenerates_only_on_meta_changes() {
    let dir = tempdir().unwrap();
    setup_project(dir.path());

    let generator = generator_for(dir.path());
    let modules = MemoryModules::new();
    generator.regenerate(&modules).await.unwrap();

    let page = dir.path().join("src/pages/index.vue");
    fs::write(&page, "<template><h1>Welcome</h1></template>").unwrap();
    let result = process_batch(&generator, &modules, vec![page.clone()]).await.unwrap();
    assert!(result.is_none());

    fs::write(
        &page,
        "<template><h1>Welcome</h1></template>\n<script setup>definePageMeta({ name: 'home' })</script>",
    )
    .unwrap();
    let path = process_batch(&generator, &modules, vec![page]).await.unwrap().unwrap();

    let code = fs::read_to_string(path).unwrap();
    assert!(code.contains("\"name\": \"home\""));
}

#[tokio::test]
async fn test_batch_refreshes_layouts() {
    let dir = tempdir().unwrap();
    setup_project(dir.path());

    let generator = generator_for(dir.path());
    let modules = MemoryModules::new();
    generator.regenerate(&modules).await.unwrap();
    let before = modules.read_module("~virtual-layouts").unwrap();
    assert!(before.contains("'admin'"));
    assert!(!before.contains("'marketing'"));

    write(dir.path(), "src/layouts/marketing.vue", "<template><slot /></template>");
    let layout = dir.path().join("src/layouts/marketing.vue");
    let result = process_batch(&generator, &modules, vec![layout]).await.unwrap();

    // routes untouched, layouts module rebuilt
    assert!(result.is_none());
    assert!(modules.read_module("~virtual-layouts").unwrap().contains("'marketing'"));
}
