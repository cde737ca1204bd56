//! Viewer module - generates the HTML page for viewing a pyramid with OpenSeadragon.

/// Escape HTML special characters to prevent XSS attacks.
fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Quote `s` as a JavaScript string literal that is safe inside `<script>`.
fn js_string_literal(s: &str) -> String {
    serde_json::Value::from(s)
        .to_string()
        .replace('<', "\\u003c")
}

/// Generate an HTML page that opens `/<name>.dzi` in OpenSeadragon.
///
/// OpenSeadragon reads tile size, overlap and format from the descriptor and
/// requests tiles from `/<name>_files/` next to it.
pub fn generate_viewer_html(name: &str) -> String {
    let escaped_name = html_escape(name);
    let descriptor_url = js_string_literal(&format!("/{name}.dzi"));

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>DZI Preview - {escaped_name}</title>
    <script src="https://cdn.jsdelivr.net/npm/openseadragon@4.1/build/openseadragon.min.js"></script>
    <style>
        html, body {{ margin: 0; height: 100%; background: #1b1b1b; }}
        #viewer {{ position: fixed; inset: 0; }}
        header {{
            position: fixed; top: 0; left: 0; z-index: 10;
            padding: 6px 12px; color: #eee; background: #000a;
            font: 13px/1.4 system-ui, sans-serif;
        }}
        header.failed {{ background: #b91c1c; }}
    </style>
</head>
<body>
    <header id="title">{escaped_name}</header>
    <div id="viewer"></div>

    <script>
        const title = document.getElementById("title");
        const viewer = OpenSeadragon({{
            id: "viewer",
            prefixUrl: "https://cdn.jsdelivr.net/npm/openseadragon@4.1/build/openseadragon/images/",
            tileSources: {descriptor_url},
            showNavigator: true,
            maxZoomPixelRatio: 4,
            debugMode: new URLSearchParams(location.search).has("grid")
        }});

        viewer.addHandler("open-failed", (event) => {{
            title.classList.add("failed");
            title.textContent += ": " + (event.message || "cannot open descriptor");
        }});
    </script>
</body>
</html>"##
    )
}
