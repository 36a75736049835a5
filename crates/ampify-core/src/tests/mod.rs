use crate::*;

mod audio;

fn sanitize_with(
    markup: &str,
    options: &SanitizeOptions,
    lookup: &dyn MetadataLookup,
) -> (String, bool) {
    let mut doc = Document::parse_fragment(markup).unwrap();
    let ctx = SanitizeContext::new(options).with_lookup(lookup);
    let mutated = Pipeline::media().run(&mut doc, &ctx);
    doc.check_integrity().unwrap();
    (doc.to_html(), mutated)
}

fn sanitize(markup: &str, options: &SanitizeOptions) -> (String, bool) {
    sanitize_with(markup, options, &NoMetadata)
}

fn sanitize_default(markup: &str) -> String {
    sanitize(markup, &SanitizeOptions::default()).0
}
