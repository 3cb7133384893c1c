// ABOUTME: Standalone HTML document generation for the party-slides application
// ABOUTME: Serializes a presentation with embedded styling, slide data and navigation script

use crate::errors::{Result, SlideError};
use crate::model::{Presentation, Slide, Theme};
use crate::navigation::{NavKey, KEY_BINDINGS};
use crate::utils::{self, escape_html};
use log::info;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const DATA_SCRIPT_ID: &str = "presentation-data";
const KEYS_SCRIPT_ID: &str = "key-bindings";

const BASE_CSS: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
    font-family: 'Arial', sans-serif;
    overflow: hidden;
    height: 100vh;
    display: flex;
    align-items: center;
    justify-content: center;
    background-size: cover;
    background-position: center;
    background-repeat: no-repeat;
}
.presentation-container { width: 100%; height: 100%; display: flex; align-items: center; justify-content: center; position: relative; }
.slide {
    display: none;
    width: 90%;
    max-width: 1200px;
    text-align: center;
    padding: 60px;
    background-color: rgba(255, 255, 255, 0.1);
    border-radius: 20px;
    backdrop-filter: blur(10px);
    box-shadow: 0 20px 40px rgba(0, 0, 0, 0.2);
}
.slide.active { display: block; animation: slideIn 0.5s ease-in-out; }
@keyframes slideIn { from { opacity: 0; transform: translateY(30px); } to { opacity: 1; transform: translateY(0); } }
.slide-title { font-size: 4rem; font-weight: bold; margin-bottom: 30px; text-shadow: 2px 2px 4px rgba(0, 0, 0, 0.3); }
.slide-emoji { font-size: 6rem; margin-bottom: 30px; display: block; }
.slide-content { font-size: 2rem; line-height: 1.6; margin-bottom: 40px; text-shadow: 1px 1px 2px rgba(0, 0, 0, 0.3); }
.slide-with-background { background-color: rgba(0, 0, 0, 0.4) !important; backdrop-filter: blur(5px); }
.slide-with-background .slide-title,
.slide-with-background .slide-content { text-shadow: 3px 3px 6px rgba(0, 0, 0, 0.8); background: rgba(0, 0, 0, 0.3); padding: 10px 20px; border-radius: 10px; }
.slide-with-background .slide-emoji { display: none; }
.navigation { position: fixed; bottom: 30px; left: 50%; transform: translateX(-50%); display: flex; gap: 20px; z-index: 1000; }
.nav-button {
    padding: 15px 25px;
    background: rgba(255, 255, 255, 0.2);
    border: 2px solid rgba(255, 255, 255, 0.3);
    border-radius: 50px;
    color: white;
    font-size: 16px;
    font-weight: bold;
    cursor: pointer;
}
.nav-button:disabled { opacity: 0.5; cursor: not-allowed; }
.slide-counter, .presentation-title {
    position: fixed;
    top: 30px;
    background: rgba(0, 0, 0, 0.5);
    color: white;
    padding: 10px 20px;
    border-radius: 25px;
    font-size: 18px;
}
.slide-counter { right: 30px; }
.presentation-title { left: 30px; max-width: 400px; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }
.keyboard-hint { position: fixed; bottom: 100px; left: 50%; transform: translateX(-50%); color: rgba(255, 255, 255, 0.7); font-size: 14px; text-align: center; }
"#;

// Transitions clamp exactly like `Navigator`.
const NAVIGATION_JS: &str = r#"
(function () {
    var data = JSON.parse(document.getElementById('presentation-data').textContent);
    var bindings = JSON.parse(document.getElementById('key-bindings').textContent);
    var slides = document.querySelectorAll('.slide');
    var total = data.slides.length;
    var current = 0;

    function render() {
        for (var i = 0; i < slides.length; i++) {
            slides[i].classList.toggle('active', i === current);
        }
        var slide = data.slides[current];
        document.body.style.backgroundImage = slide && slide.imageUrl
            ? 'url(' + JSON.stringify(slide.imageUrl) + ')'
            : '';
        document.getElementById('current-slide').textContent = current + 1;
        document.getElementById('prev-btn').disabled = current === 0;
        document.getElementById('next-btn').disabled = current >= total - 1;
    }

    function jump(n) {
        var target = Math.max(0, Math.min(n, total - 1));
        if (target === current) { return; }
        current = target;
        render();
    }

    function next() { if (current < total - 1) { jump(current + 1); } }
    function previous() { if (current > 0) { jump(current - 1); } }

    function toggleFullscreen() {
        if (!document.fullscreenElement) {
            document.documentElement.requestFullscreen().catch(function () {});
        } else {
            document.exitFullscreen();
        }
    }

    function dismiss() {
        if (document.fullscreenElement) {
            document.exitFullscreen();
        } else {
            window.close();
        }
    }

    var actions = { advance: next, retreat: previous, dismiss: dismiss, fullscreen: toggleFullscreen };

    document.addEventListener('keydown', function (e) {
        var action = bindings[e.key];
        if (!action) { return; }
        e.preventDefault();
        actions[action]();
    });
    document.getElementById('prev-btn').addEventListener('click', previous);
    document.getElementById('next-btn').addEventListener('click', next);

    render();
    window.focus();
})();
"#;

/// Serialize JSON so it can sit inside a `<script>` element.
fn script_safe_json<T: serde::Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json.replace('<', "\\u003c"))
}

fn theme_css(theme: Theme) -> String {
    format!(
        "body {{ background: {}; color: {}; }}\n",
        theme.background(),
        theme.color()
    )
}

fn slide_markup(index: usize, slide: &Slide) -> String {
    let mut classes = String::from("slide");
    if slide.image_url.is_some() {
        classes.push_str(" slide-with-background");
    }
    if index == 0 {
        classes.push_str(" active");
    }

    let mut markup = format!(
        "<div class=\"{}\" data-slide=\"{}\">\n",
        classes, index
    );
    markup.push_str(&format!(
        "<div class=\"slide-emoji\">{}</div>\n",
        escape_html(&slide.emoji)
    ));
    markup.push_str(&format!(
        "<h1 class=\"slide-title\">{}</h1>\n",
        escape_html(&slide.title)
    ));
    if !slide.content.is_empty() {
        markup.push_str(&format!(
            "<div class=\"slide-content\">{}</div>\n",
            escape_html(&slide.content)
        ));
    }
    markup.push_str("</div>\n");
    markup
}

/// Build the self-contained document for a presentation
pub fn generate_presentation_html(presentation: &Presentation) -> Result<String> {
    info!(
        "Generating HTML document for presentation {} ({} slides)",
        presentation.id,
        presentation.len()
    );

    if presentation.is_empty() {
        return Err(SlideError::DocumentError(
            "Presentation has no slides".to_string(),
        ));
    }

    let title = escape_html(&presentation.title);
    let bindings: BTreeMap<&str, NavKey> = KEY_BINDINGS.iter().copied().collect();

    let mut html_doc = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html_doc.push_str("<meta charset=\"UTF-8\">\n");
    html_doc.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html_doc.push_str(&format!("<title>{}</title>\n", title));
    html_doc.push_str("<style>");
    html_doc.push_str(BASE_CSS);
    html_doc.push_str(&theme_css(presentation.theme));
    html_doc.push_str("</style>\n");
    html_doc.push_str("</head>\n<body>\n");

    html_doc.push_str("<div class=\"presentation-container\">\n");
    html_doc.push_str(&format!(
        "<div class=\"presentation-title\">{}</div>\n",
        title
    ));
    html_doc.push_str(&format!(
        "<div class=\"slide-counter\"><span id=\"current-slide\">1</span> / {}</div>\n",
        presentation.len()
    ));

    for (index, slide) in presentation.slides.iter().enumerate() {
        html_doc.push_str(&slide_markup(index, slide));
    }

    html_doc.push_str("<div class=\"navigation\">\n");
    html_doc.push_str("<button class=\"nav-button\" id=\"prev-btn\">&larr; Previous</button>\n");
    html_doc.push_str("<button class=\"nav-button\" id=\"next-btn\">Next &rarr;</button>\n");
    html_doc.push_str("</div>\n");
    html_doc.push_str("<div class=\"keyboard-hint\">Use arrow keys or buttons to navigate &bull; Press F11 for fullscreen &bull; Press Esc to exit</div>\n");
    html_doc.push_str("</div>\n");

    html_doc.push_str(&format!(
        "<script type=\"application/json\" id=\"{}\">{}</script>\n",
        DATA_SCRIPT_ID,
        script_safe_json(presentation)?
    ));
    html_doc.push_str(&format!(
        "<script type=\"application/json\" id=\"{}\">{}</script>\n",
        KEYS_SCRIPT_ID,
        script_safe_json(&bindings)?
    ));
    html_doc.push_str("<script>");
    html_doc.push_str(NAVIGATION_JS);
    html_doc.push_str("</script>\n");

    html_doc.push_str("</body>\n</html>");

    Ok(html_doc)
}

/// Recover the presentation embedded in a generated document
pub fn extract_presentation(html: &str) -> Result<Presentation> {
    let marker = format!("id=\"{}\">", DATA_SCRIPT_ID);
    let start = html
        .find(&marker)
        .map(|i| i + marker.len())
        .ok_or_else(|| SlideError::DocumentError("No embedded presentation data".to_string()))?;
    let end = html[start..]
        .find("</script>")
        .map(|i| start + i)
        .ok_or_else(|| SlideError::DocumentError("Unterminated presentation data".to_string()))?;

    Ok(serde_json::from_str(&html[start..end])?)
}

/// Recover just the embedded slide sequence
pub fn extract_slides_data(html: &str) -> Result<Vec<Slide>> {
    Ok(extract_presentation(html)?.slides)
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);

    utils::ensure_parent_directory_exists(output_path)?;
    fs::write(output_path, html_content).map_err(SlideError::FileReadError)?;

    Ok(())
}

/// Read a previously written document back into a presentation
pub fn read_presentation_from_file(path: &Path) -> Result<Presentation> {
    utils::validate_file_exists(path)?;
    let html = fs::read_to_string(path).map_err(SlideError::FileReadError)?;
    extract_presentation(&html)
}
