//! End-to-end runs with the `image` codec and the local filesystem.

use std::fs;

use dzi_tiler::{PyramidConfig, PyramidError, PyramidGenerator};

use super::test_utils::{
    create_source_jpeg, create_source_png, is_valid_jpeg, list_levels, list_tiles,
};

fn generator(tile_size: u32, overlap: u32) -> PyramidGenerator {
    PyramidGenerator::new(PyramidConfig::new(tile_size, overlap).unwrap())
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn test_png_pyramid_layout() {
    let dir = tempfile::tempdir().unwrap();
    let source = create_source_png(dir.path(), "photo.png", 300, 200);

    let output = generator(128, 0).run(&source).unwrap();

    assert_eq!(output.name, "photo");
    assert_eq!(output.tiles_dir, dir.path().join("photo_files"));
    assert_eq!(list_levels(&output.tiles_dir), (0..=9).collect::<Vec<_>>());

    // 6 tiles at level 9, 2 at level 8, one for each of levels 0-7
    assert_eq!(output.tile_count, 16);
    assert_eq!(list_tiles(&output.tiles_dir).len(), 16);

    let top = list_tiles(&output.tiles_dir.join("9"));
    let expected: Vec<String> = ["0_0", "0_1", "1_0", "1_1", "2_0", "2_1"]
        .iter()
        .map(|t| format!("{t}.png"))
        .collect();
    assert_eq!(top.into_iter().collect::<Vec<_>>(), expected);

    assert!(output.tiles_dir.join("8/1_0.png").is_file());
    assert!(output.tiles_dir.join("0/0_0.png").is_file());
}

#[test]
fn test_level_reports_coarsest_first() {
    let dir = tempfile::tempdir().unwrap();
    let source = create_source_png(dir.path(), "photo.png", 300, 200);

    let output = generator(128, 0).run(&source).unwrap();

    let dims: Vec<(u32, u32, u32)> = output
        .levels
        .iter()
        .map(|r| (r.level.index, r.level.width, r.level.height))
        .collect();
    assert_eq!(dims.first(), Some(&(0, 1, 1)));
    assert_eq!(dims.get(7), Some(&(7, 75, 50)));
    assert_eq!(dims.last(), Some(&(9, 300, 200)));

    let top = output.levels.last().unwrap();
    assert_eq!((top.grid.cols, top.grid.rows), (3, 2));
    assert_eq!(top.tiles, 6);
}

#[test]
fn test_edge_tiles_are_clipped() {
    let dir = tempfile::tempdir().unwrap();
    let source = create_source_png(dir.path(), "photo.png", 300, 200);

    let output = generator(128, 0).run(&source).unwrap();
    let top = output.tiles_dir.join("9");

    assert_eq!(image::image_dimensions(top.join("0_0.png")).unwrap(), (128, 128));
    assert_eq!(image::image_dimensions(top.join("2_0.png")).unwrap(), (44, 128));
    assert_eq!(image::image_dimensions(top.join("2_1.png")).unwrap(), (44, 72));
    assert_eq!(
        image::image_dimensions(output.tiles_dir.join("0/0_0.png")).unwrap(),
        (1, 1)
    );
}

#[test]
fn test_overlap_tile_sizes() {
    let dir = tempfile::tempdir().unwrap();
    let source = create_source_png(dir.path(), "square.png", 300, 300);

    let output = generator(256, 1).run(&source).unwrap();
    let top = output.tiles_dir.join("9");

    // step is 255, so the second column starts at 255 and is 45 px wide
    assert_eq!(list_tiles(&top).len(), 4);
    assert_eq!(image::image_dimensions(top.join("0_0.png")).unwrap(), (256, 256));
    assert_eq!(image::image_dimensions(top.join("1_0.png")).unwrap(), (45, 256));
    assert_eq!(image::image_dimensions(top.join("0_1.png")).unwrap(), (256, 45));
    assert_eq!(image::image_dimensions(top.join("1_1.png")).unwrap(), (45, 45));
}

#[test]
fn test_single_pixel_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = create_source_png(dir.path(), "dot.png", 1, 1);

    let output = generator(256, 0).run(&source).unwrap();

    assert_eq!(output.levels.len(), 1);
    assert_eq!(output.tile_count, 1);
    assert_eq!(
        list_tiles(&output.tiles_dir).into_iter().collect::<Vec<_>>(),
        vec!["0/0_0.png".to_string()]
    );
}

// =============================================================================
// Formats
// =============================================================================

#[test]
fn test_jpeg_source_produces_jpeg_tiles() {
    let dir = tempfile::tempdir().unwrap();
    let source = create_source_jpeg(dir.path(), "scan.jpg", 200, 100);

    let output = generator(256, 0).run(&source).unwrap();

    let tile = fs::read(output.tiles_dir.join("8/0_0.jpg")).unwrap();
    assert!(is_valid_jpeg(&tile));
    assert!(list_tiles(&output.tiles_dir)
        .iter()
        .all(|t| t.ends_with(".jpg")));

    let dzi = fs::read_to_string(dir.path().join("scan.dzi")).unwrap();
    assert!(dzi.contains("Format=\"jpg\""));
}

#[test]
fn test_uppercase_extension_is_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let source = create_source_png(dir.path(), "shot.PNG", 10, 10);

    let output = generator(256, 0).run(&source).unwrap();

    assert!(output.tiles_dir.join("4/0_0.PNG").is_file());
    assert_eq!(output.descriptor.format, "PNG");
}

// =============================================================================
// Descriptors and Naming
// =============================================================================

#[test]
fn test_descriptors_written_next_to_tiles() {
    let dir = tempfile::tempdir().unwrap();
    let source = create_source_png(dir.path(), "photo.png", 300, 200);

    let output = generator(128, 1).run(&source).unwrap();
    let paths = output.descriptors.expect("descriptors should be written");

    assert_eq!(paths.dzi, dir.path().join("photo.dzi"));
    assert_eq!(paths.js, dir.path().join("photo.js"));

    let dzi = fs::read_to_string(&paths.dzi).unwrap();
    assert!(dzi.starts_with("<?xml"));
    assert!(dzi.contains("xmlns=\"http://schemas.microsoft.com/deepzoom/2008\""));
    assert!(dzi.contains("Format=\"png\""));
    assert!(dzi.contains("Overlap=\"1\""));
    assert!(dzi.contains("TileSize=\"128\""));
    assert!(dzi.contains("<Size Height=\"200\" Width=\"300\" />"));

    let js = fs::read_to_string(&paths.js).unwrap();
    assert_eq!(
        js,
        "photo({Image:{xmlns:'http://schemas.microsoft.com/deepzoom/2008', \
         Format:'png', Overlap:1, TileSize:128, Size:{Width:300, Height:200}}});\n"
    );
}

#[test]
fn test_source_name_is_sanitized() {
    let dir = tempfile::tempdir().unwrap();
    let source = create_source_png(dir.path(), "My Photo #1.png", 40, 30);

    let output = generator(256, 0).run(&source).unwrap();

    assert_eq!(output.name, "My_Photo_1");
    assert!(dir.path().join("My_Photo_1_files/6/0_0.png").is_file());
    assert!(dir.path().join("My_Photo_1.dzi").is_file());

    let js = fs::read_to_string(dir.path().join("My_Photo_1.js")).unwrap();
    assert!(js.starts_with("My_Photo_1({Image:"));
}

#[test]
fn test_invalid_identifier_skips_descriptors() {
    let dir = tempfile::tempdir().unwrap();
    let source = create_source_png(dir.path(), "1image.png", 20, 20);

    let output = generator(256, 0).run(&source).unwrap();

    assert_eq!(output.name, "1image");
    assert!(output.descriptors.is_none());
    assert!(dir.path().join("1image_files/5/0_0.png").is_file());
    assert!(!dir.path().join("1image.dzi").exists());
    assert!(!dir.path().join("1image.js").exists());
}

#[test]
fn test_output_dir_override() {
    let dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let source = create_source_png(dir.path(), "photo.png", 64, 64);

    let config = PyramidConfig::new(256, 0).unwrap().with_output_dir(out.path());
    let output = PyramidGenerator::new(config).run(&source).unwrap();

    assert_eq!(output.tiles_dir, out.path().join("photo_files"));
    assert!(out.path().join("photo.dzi").is_file());
    assert!(!dir.path().join("photo_files").exists());
}

// =============================================================================
// Re-runs
// =============================================================================

#[test]
fn test_rerun_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let source = create_source_png(dir.path(), "photo.png", 300, 200);
    let tiler = generator(128, 0);

    let first = tiler.run(&source).unwrap();
    let first_tiles = list_tiles(&first.tiles_dir);
    let first_dzi = fs::read_to_string(dir.path().join("photo.dzi")).unwrap();

    let second = tiler.run(&source).unwrap();

    assert_eq!(list_tiles(&second.tiles_dir), first_tiles);
    assert_eq!(
        fs::read_to_string(dir.path().join("photo.dzi")).unwrap(),
        first_dzi
    );
}

#[test]
fn test_rerun_clears_stale_tiles() {
    let dir = tempfile::tempdir().unwrap();
    let source = create_source_png(dir.path(), "photo.png", 300, 200);

    let small = generator(64, 0).run(&source).unwrap();
    assert!(small.tiles_dir.join("9/4_3.png").is_file());
    fs::write(small.tiles_dir.join("stray.txt"), b"left behind").unwrap();

    let large = generator(128, 0).run(&source).unwrap();

    assert!(!large.tiles_dir.join("9/4_3.png").exists());
    assert!(!large.tiles_dir.join("stray.txt").exists());
    assert_eq!(list_tiles(&large.tiles_dir).len(), 16);
}

#[test]
fn test_rerun_keeps_unrelated_files() {
    let dir = tempfile::tempdir().unwrap();
    let source = create_source_png(dir.path(), "photo.png", 32, 32);
    fs::write(dir.path().join("notes.txt"), b"keep me").unwrap();

    generator(256, 0).run(&source).unwrap();
    generator(256, 0).run(&source).unwrap();

    assert!(source.is_file());
    assert_eq!(fs::read(dir.path().join("notes.txt")).unwrap(), b"keep me");
}

#[test]
fn test_parallel_and_sequential_match() {
    let dir = tempfile::tempdir().unwrap();
    let parallel_dir = dir.path().join("parallel");
    let sequential_dir = dir.path().join("sequential");
    let source = create_source_png(dir.path(), "photo.png", 300, 200);

    let base = PyramidConfig::new(128, 1).unwrap();
    let parallel = PyramidGenerator::new(base.clone().with_output_dir(&parallel_dir))
        .run(&source)
        .unwrap();
    let sequential =
        PyramidGenerator::new(base.with_parallel(false).with_output_dir(&sequential_dir))
            .run(&source)
            .unwrap();

    let parallel_tiles = list_tiles(&parallel.tiles_dir);
    assert_eq!(parallel_tiles, list_tiles(&sequential.tiles_dir));
    for tile in &parallel_tiles {
        assert_eq!(
            fs::read(parallel.tiles_dir.join(tile)).unwrap(),
            fs::read(sequential.tiles_dir.join(tile)).unwrap(),
            "tile {tile} differs"
        );
    }
}

// =============================================================================
// Source Errors
// =============================================================================

#[test]
fn test_corrupt_source_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("broken.png");
    fs::write(&source, b"definitely not a png").unwrap();

    let result = generator(256, 0).run(&source);

    match result {
        Err(PyramidError::SourceDecodeFailed { path, .. }) => assert_eq!(path, source),
        other => panic!("Expected SourceDecodeFailed, got {:?}", other),
    }
    assert!(!dir.path().join("broken_files").exists());
}

#[test]
fn test_missing_source() {
    let dir = tempfile::tempdir().unwrap();
    let result = generator(256, 0).run(dir.path().join("absent.png"));
    assert!(matches!(result, Err(PyramidError::SourceDecodeFailed { .. })));
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("notes.txt");
    fs::write(&source, b"text").unwrap();

    match generator(256, 0).run(&source) {
        Err(PyramidError::UnsupportedFormat { extension }) => assert_eq!(extension, "txt"),
        other => panic!("Expected UnsupportedFormat, got {:?}", other),
    }
}
