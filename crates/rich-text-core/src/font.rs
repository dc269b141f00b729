//! `@font-face` CSS generation.
//!
//! When the host declares custom faces for its font family, the surface needs
//! the corresponding `@font-face` rules injected into its document head. The
//! source format is inferred from the file extension.

use crate::options::FontFace;

/// CSS `format()` hint for a font source URL.
fn format_for(src: &str) -> &str {
    match src.rsplit('.').next() {
        Some("ttf") => "truetype",
        Some("otf") => "opentype",
        Some("eot") => "embedded-opentype",
        Some(extension) => extension,
        None => "",
    }
}

/// Build the `@font-face` rules for `family` from its declared faces.
pub fn font_faces_css(family: &str, faces: &[FontFace]) -> String {
    faces
        .iter()
        .map(|face| {
            let sources: Vec<String> = face
                .src
                .urls()
                .iter()
                .map(|src| format!("url('{}') format('{}')", src, format_for(src)))
                .collect();
            format!(
                "@font-face {{ font-family: '{}'; font-weight: {}; font-style: {}; src: {}; }}",
                family,
                face.weight,
                face.style,
                sources.join(", ")
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}
