use super::{sanitize, sanitize_default, sanitize_with};
use crate::*;

#[test]
fn audio_converts_to_amp_audio_without_layout_inference() {
    assert_eq!(
        sanitize_default(r#"<audio src="a.mp3" width="300" height="50" controls=""></audio>"#),
        concat!(
            r#"<amp-audio src="a.mp3" width="300" height="50" controls="">"#,
            r#"<a href="a.mp3" fallback="">a.mp3</a>"#,
            r#"</amp-audio>"#
        )
    );
}

#[test]
fn audio_ignores_video_only_attributes() {
    assert_eq!(
        sanitize_default(r#"<audio src="a.mp3" poster="p.jpg" artist="x"><source src="b.ogg"/></audio>"#),
        concat!(
            r#"<amp-audio src="a.mp3">"#,
            r#"<source src="b.ogg" />"#,
            r#"<a href="a.mp3" fallback="">a.mp3</a>"#,
            r#"</amp-audio>"#
        )
    );
}

#[test]
fn audio_does_not_consult_metadata() {
    let lookup = StaticMetadata::new().with("a", 640, 360);
    let (out, _) = sanitize_with(r#"<audio src="a.mp3"></audio>"#, &SanitizeOptions::default(), &lookup);
    assert!(!out.contains("width="), "{out}");
}

#[test]
fn audio_keeps_explicit_layout_hint() {
    let out = sanitize_default(r#"<audio data-amp-layout="nodisplay" src="a.mp3"></audio>"#);
    assert!(out.starts_with(r#"<amp-audio src="a.mp3">"#), "{out}");

    let out = sanitize_default(r#"<audio data-amp-layout="fixed" src="a.mp3"></audio>"#);
    assert!(out.starts_with(r#"<amp-audio src="a.mp3" layout="fixed">"#), "{out}");
}

#[test]
fn audio_without_source_is_removed() {
    let options = SanitizeOptions::default().with_require_https_source(true);
    let (out, mutated) = sanitize(
        r#"<div><audio><source src="http://example.com/a.mp3"/><p>Listen elsewhere.</p></audio></div>"#,
        &options,
    );
    assert!(mutated);
    assert_eq!(out, "<div></div>");
}
