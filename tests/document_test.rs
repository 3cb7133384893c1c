use chrono::Utc;
use party_slides::html::{extract_presentation, read_presentation_from_file};
use party_slides::{
    extract_slides_data, generate_presentation_html, write_html_to_file, DocumentServer,
    MockPipeline, Presentation, Slide, Theme,
};
use std::thread;
use tempfile::TempDir;

fn tricky_presentation() -> Presentation {
    Presentation {
        id: "doc-test".to_string(),
        title: "Cats </script><script>alert(1)</script> & Dogs".to_string(),
        slides: vec![
            Slide {
                id: 1,
                title: "Opening \"night\"".to_string(),
                content: "Fish <b>&</b> chips".to_string(),
                image_url: Some("https://images.test/a.png?x=1&y=2".to_string()),
                emoji: "🐱".to_string(),
            },
            Slide {
                id: 2,
                title: "Party!".to_string(),
                content: String::new(),
                image_url: None,
                emoji: "🎉".to_string(),
            },
        ],
        theme: Theme::Sunset,
        created_at: Utc::now(),
    }
}

#[test]
fn test_document_round_trip_preserves_slides() {
    let presentation = MockPipeline::seeded(11)
        .presentation(7, Some(Theme::Forest))
        .expect("mock presentation");
    let html = generate_presentation_html(&presentation).expect("document");

    let slides = extract_slides_data(&html).expect("embedded slides");
    assert_eq!(slides.len(), presentation.len());
    for (original, recovered) in presentation.slides.iter().zip(&slides) {
        assert_eq!(original.id, recovered.id);
        assert_eq!(original.title, recovered.title);
        assert_eq!(original.content, recovered.content);
        assert_eq!(original.emoji, recovered.emoji);
        assert_eq!(original.image_url.is_some(), recovered.image_url.is_some());
    }

    let recovered = extract_presentation(&html).expect("embedded presentation");
    assert_eq!(recovered, presentation);
}

#[test]
fn test_document_escapes_hostile_text() {
    let presentation = tricky_presentation();
    let html = generate_presentation_html(&presentation).expect("document");

    // the only closing script tags are the ones the document writes itself
    assert_eq!(html.matches("</script>").count(), 3);
    assert!(html.contains("Cats &lt;/script&gt;"));
    assert!(html.contains("Fish &lt;b&gt;&amp;&lt;/b&gt; chips"));
    assert!(!html.contains("<script>alert(1)"));

    let recovered = extract_presentation(&html).expect("embedded presentation");
    assert_eq!(recovered.title, presentation.title);
    assert_eq!(recovered.slides, presentation.slides);
}

#[test]
fn test_document_carries_theme_and_navigation() {
    let html = generate_presentation_html(&tricky_presentation()).expect("document");

    assert!(html.contains(Theme::Sunset.background()));
    assert!(html.contains("#333333"));
    assert!(html.contains("ArrowRight"));
    assert!(html.contains("F11"));
    assert!(html.contains("id=\"prev-btn\""));
    assert!(html.contains("id=\"next-btn\""));
    assert!(html.contains("<span id=\"current-slide\">1</span> / 2"));
}

#[test]
fn test_signed_image_urls_are_used_verbatim() {
    let signed = "https://blob.test/img.png?st=2024&sig=abc%2Bdef%3D";
    let mut presentation = tricky_presentation();
    presentation.slides[0].image_url = Some(signed.to_string());
    let html = generate_presentation_html(&presentation).expect("document");

    // percent-escapes survive into the data the script reads
    assert!(html.contains(signed));
    assert!(!html.contains("%252B"));
    assert!(!html.contains("encodeURI"));
    assert!(html.contains("'url(' + JSON.stringify(slide.imageUrl) + ')'"));

    let slides = extract_slides_data(&html).expect("embedded slides");
    assert_eq!(slides[0].image_url.as_deref(), Some(signed));
}

#[test]
fn test_empty_presentation_has_no_document() {
    let mut presentation = tricky_presentation();
    presentation.slides.clear();
    assert!(generate_presentation_html(&presentation).is_err());
}

#[test]
fn test_write_and_read_back_from_disk() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("nested").join("show.html");
    let presentation = tricky_presentation();

    let html = generate_presentation_html(&presentation).expect("document");
    write_html_to_file(&html, &path).expect("write document");
    assert!(path.exists());

    let recovered = read_presentation_from_file(&path).expect("read document");
    assert_eq!(recovered.slides, presentation.slides);

    assert!(read_presentation_from_file(&temp_dir.path().join("missing.html")).is_err());
}

#[test]
fn test_document_server_answers_index_and_404() {
    let html = generate_presentation_html(&tricky_presentation()).expect("document");
    let server = DocumentServer::bind(html.clone(), 0).expect("bind");
    let port = server.port().expect("TCP port");
    assert_eq!(server.url(), format!("http://127.0.0.1:{}/", port));

    let handle = thread::spawn(move || server.serve_requests(2));

    let index = reqwest::blocking::get(format!("http://127.0.0.1:{}/", port)).expect("GET /");
    assert_eq!(index.status().as_u16(), 200);
    let content_type = index
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    assert_eq!(index.text().expect("body"), html);

    let missing =
        reqwest::blocking::get(format!("http://127.0.0.1:{}/nope.css", port)).expect("GET");
    assert_eq!(missing.status().as_u16(), 404);

    handle
        .join()
        .expect("server thread panicked")
        .expect("serve requests");
}
