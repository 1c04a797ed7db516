//! End-to-end tests for Cartograph.
//!
//! These tests exercise the full config -> collect -> build pipeline
//! against a temporary site.

use std::{fs, path::PathBuf};

use cartograph_core::Config;
use cartograph_generator::{Builder, PageCollector};
use tempfile::TempDir;

fn write_config(dir: &TempDir, extra: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    let content = format!(
        r#"
[site]
base_url = "https://example.com"
{extra}
"#
    );
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn test_manifest_build_end_to_end() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, "");
    let output_dir = dir.path().join("public");

    let manifest = dir.path().join("pages.json");
    fs::write(
        &manifest,
        r#"[
            { "path": "/", "changefreq": "daily", "priority": 1.0 },
            { "path": "/about", "lastmod": "2026-01-14T00:00:00Z" },
            { "path": "/" }
        ]"#,
    )
    .unwrap();

    let config = Config::load(&config_path).expect("load config");
    let pages = PageCollector::from_manifest(&manifest).expect("load manifest");
    let report = Builder::new(config, &output_dir).build(&pages).expect("build");

    assert_eq!(report.entry_count, 2);
    assert_eq!(report.document_paths.len(), 1);
    assert!(report.index_path.is_none());

    let xml = fs::read_to_string(output_dir.join("sitemap-0.xml")).unwrap();
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert_eq!(xml.matches("<url>").count(), 2);
    assert!(xml.contains("<loc>https://example.com/</loc>"));
    assert!(xml.contains("<loc>https://example.com/about</loc>"));
    assert!(xml.contains("<changefreq>daily</changefreq>"));
    assert!(xml.contains("<priority>1.0</priority>"));
    assert!(xml.contains("<lastmod>2026-01-14</lastmod>"));

    let robots = fs::read_to_string(output_dir.join("robots.txt")).unwrap();
    assert!(robots.contains("Sitemap: https://example.com/sitemap-0.xml"));
}

#[test]
fn test_scan_build_end_to_end() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, "");

    // Rendered site produced by some external pipeline.
    let site = dir.path().join("site");
    fs::create_dir_all(site.join("posts/hello")).unwrap();
    fs::write(site.join("index.html"), "<html></html>").unwrap();
    fs::write(site.join("posts/hello/index.html"), "<html></html>").unwrap();
    fs::write(site.join("notes.txt"), "not a page").unwrap();

    let config = Config::load(&config_path).expect("load config");
    let pages = PageCollector::scan(&site).expect("scan");
    let report = Builder::new(config, &site).build(&pages).expect("build");

    assert_eq!(report.entry_count, 2);

    let xml = fs::read_to_string(site.join("sitemap-0.xml")).unwrap();
    assert!(xml.contains("<loc>https://example.com/</loc>"));
    assert!(xml.contains("<loc>https://example.com/posts/hello/</loc>"));
    // Scanned pages carry mtime-derived lastmod values.
    assert_eq!(xml.matches("<lastmod>").count(), 2);

    // The rendered pages are untouched.
    assert!(site.join("index.html").exists());
    assert!(site.join("notes.txt").exists());
}

#[test]
fn test_split_build_writes_index_in_chunk_order() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(
        &dir,
        r#"
[sitemap]
entry_limit = 2
"#,
    );
    let output_dir = dir.path().join("public");

    let config = Config::load(&config_path).expect("load config");
    let pages: Vec<_> = (0..5)
        .map(|n| cartograph_core::PageEntry::new(format!("/page-{n}")))
        .collect();

    let report = Builder::new(config, &output_dir).build(&pages).expect("build");

    assert_eq!(report.document_paths.len(), 3);
    let index = fs::read_to_string(report.index_path.expect("index")).unwrap();
    assert!(index.contains("<sitemapindex"));

    let positions: Vec<usize> = (0..3)
        .map(|n| index.find(&format!("sitemap-{n}.xml")).expect("doc listed"))
        .collect();
    assert!(positions[0] < positions[1] && positions[1] < positions[2]);

    let robots = fs::read_to_string(output_dir.join("robots.txt")).unwrap();
    assert!(robots.contains("Sitemap: https://example.com/sitemap-index.xml"));
}

#[test]
fn test_rebuild_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, "");
    let output_dir = dir.path().join("public");

    let pages = vec![
        cartograph_core::PageEntry::new("/"),
        cartograph_core::PageEntry::new("/about"),
    ];

    let config = Config::load(&config_path).expect("load config");
    Builder::new(config.clone(), &output_dir)
        .build(&pages)
        .expect("first build");
    let first_sitemap = fs::read(output_dir.join("sitemap-0.xml")).unwrap();
    let first_robots = fs::read(output_dir.join("robots.txt")).unwrap();

    Builder::new(config, &output_dir)
        .build(&pages)
        .expect("second build");

    assert_eq!(fs::read(output_dir.join("sitemap-0.xml")).unwrap(), first_sitemap);
    assert_eq!(fs::read(output_dir.join("robots.txt")).unwrap(), first_robots);
}

#[test]
fn test_invalid_manifest_entry_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, "");
    let output_dir = dir.path().join("public");

    let manifest = dir.path().join("pages.json");
    fs::write(
        &manifest,
        r#"[
            { "path": "/fine" },
            { "path": "../../etc/passwd" }
        ]"#,
    )
    .unwrap();

    let config = Config::load(&config_path).expect("load config");
    let pages = PageCollector::from_manifest(&manifest).expect("load manifest");
    let err = Builder::new(config, &output_dir).build(&pages).unwrap_err();

    assert!(err.to_string().contains("etc/passwd"));
    assert!(!output_dir.exists());
}
