//! Deep Zoom Image (DZI) descriptors.
//!
//! A generated pyramid is described by two sidecar files next to the tile
//! root:
//!
//! - `<name>.dzi`, the XML manifest read by OpenSeadragon and other Deep
//!   Zoom viewers
//! - `<name>.js`, the same data wrapped in a call to `<name>(...)` so a page
//!   can load it with a plain `<script>` tag
//!
//! Both carry the same five values: tile format, overlap, tile size, width and
//! height of the full-resolution image.

use serde::Serialize;

use crate::pyramid::PyramidConfig;

/// XML namespace of Deep Zoom descriptors.
pub const DEEPZOOM_NAMESPACE: &str = "http://schemas.microsoft.com/deepzoom/2008";

/// Metadata shared by both descriptor files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// Tile file extension, e.g. `jpg`
    pub format: String,

    /// Overlap between adjacent tiles in pixels
    pub overlap: u32,

    /// Tile edge length in pixels
    pub tile_size: u32,

    /// Width of the full-resolution image
    pub width: u32,

    /// Height of the full-resolution image
    pub height: u32,
}

impl Descriptor {
    pub fn new(format: impl Into<String>, config: &PyramidConfig, width: u32, height: u32) -> Self {
        Self {
            format: format.into(),
            overlap: config.overlap(),
            tile_size: config.tile_size(),
            width,
            height,
        }
    }
}

/// Render the `.dzi` XML manifest.
///
/// # Example Output
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <Image xmlns="http://schemas.microsoft.com/deepzoom/2008"
///        Format="jpg"
///        Overlap="0"
///        TileSize="256">
///   <Size Height="768" Width="1024" />
/// </Image>
/// ```
pub fn build_manifest_xml(descriptor: &Descriptor) -> String {
    let Descriptor {
        format,
        overlap,
        tile_size,
        width,
        height,
    } = descriptor;
    let format = xml_escape(format);

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Image xmlns="{DEEPZOOM_NAMESPACE}"
       Format="{format}"
       Overlap="{overlap}"
       TileSize="{tile_size}">
  <Size Height="{height}" Width="{width}" />
</Image>
"#
    )
}

/// Render the `.js` callback manifest for `name`.
///
/// ```
/// use dzi_tiler::descriptor::{build_manifest_callback, Descriptor};
///
/// let descriptor = Descriptor {
///     format: "png".to_string(),
///     overlap: 1,
///     tile_size: 254,
///     width: 300,
///     height: 200,
/// };
/// let js = build_manifest_callback("scan", &descriptor);
/// assert!(js.starts_with("scan({Image:{"));
/// assert!(js.ends_with("});\n"));
/// ```
pub fn build_manifest_callback(name: &str, descriptor: &Descriptor) -> String {
    let Descriptor {
        format,
        overlap,
        tile_size,
        width,
        height,
    } = descriptor;
    let format = js_escape(format);

    format!(
        "{name}({{Image:{{xmlns:'{DEEPZOOM_NAMESPACE}', Format:'{format}', Overlap:{overlap}, \
         TileSize:{tile_size}, Size:{{Width:{width}, Height:{height}}}}}}});\n"
    )
}

fn xml_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    result
}

fn js_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '\n' => result.push_str("\\n"),
            _ => result.push(c),
        }
    }
    result
}
