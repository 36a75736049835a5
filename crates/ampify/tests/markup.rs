use ampify::{Error, NoMetadata, SanitizeOptions, StaticMetadata, sanitize_markup};
use serde_json::json;

fn assert_well_formed(markup: &str) {
    let wrapped = format!("<root>{markup}</root>");
    if let Err(err) = roxmltree::Document::parse(&wrapped) {
        panic!("output is not well-formed ({err}): {markup}");
    }
}

#[test]
fn unchanged_markup_returns_none() {
    let out = sanitize_markup(
        "<p>Nothing <em>to</em> convert.</p>",
        &SanitizeOptions::default(),
        &NoMetadata,
    )
    .unwrap();
    assert_eq!(out, None);
}

#[test]
fn invalid_markup_is_an_error() {
    let err = sanitize_markup("<video src=\"a.mp4\">", &SanitizeOptions::default(), &NoMetadata)
        .unwrap_err();
    assert!(matches!(err, Error::Markup(_)));
    assert!(err.to_string().starts_with("Invalid markup:"));
}

#[test]
fn entities_survive_the_round_trip() {
    let out = sanitize_markup(
        r#"<p>Tom &amp; Jerry</p><video src="a.mp4?x=1&amp;y=2"/>"#,
        &SanitizeOptions::default(),
        &NoMetadata,
    )
    .unwrap()
    .unwrap();
    assert_eq!(
        out,
        concat!(
            r#"<p>Tom &amp; Jerry</p>"#,
            r#"<amp-video src="a.mp4?x=1&amp;y=2">"#,
            r#"<a href="a.mp4?x=1&amp;y=2" fallback="">a.mp4?x=1&amp;y=2</a>"#,
            r#"</amp-video>"#
        )
    );
    assert_well_formed(&out);
}

#[test]
fn output_is_stable_under_a_second_pass() {
    let options = SanitizeOptions::from_value(json!({
        "add_noscript_fallback": true,
        "content_max_width": 600,
    }))
    .unwrap();
    let lookup: StaticMetadata = serde_json::from_value(json!({
        "intro": { "width": 1920, "height": 1080 },
    }))
    .unwrap();

    let input = concat!(
        r#"<article>"#,
        r#"<figure class="wp-block-video"><video controls="" src="https://cdn.example.com/intro.mp4"></video></figure>"#,
        r#"<audio src="https://cdn.example.com/theme.mp3"><p>Download the theme.</p></audio>"#,
        r#"<video width="50%" height="200"><source src="clip.webm" type="video/webm"/></video>"#,
        r#"</article>"#
    );
    let first = sanitize_markup(input, &options, &lookup).unwrap().unwrap();
    assert_well_formed(&first);
    assert!(first.contains(
        r#"<amp-video controls="" src="https://cdn.example.com/intro.mp4" width="1920" height="1080" layout="intrinsic">"#
    ));
    assert!(first.contains(r#"<amp-video width="300" height="200" layout="responsive">"#));
    assert!(first.contains(r#"<p fallback="">Download the theme.</p>"#));
    assert_eq!(first.matches("<noscript>").count(), 3);

    assert_eq!(sanitize_markup(&first, &options, &lookup).unwrap(), None);
}
