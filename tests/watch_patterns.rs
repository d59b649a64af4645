// tests/watch_patterns.rs

use devloop::watch::build_watch_profile;
use devloop_test_utils::builders::ConfigBuilder;
use proptest::prelude::*;

#[test]
fn app_glob_matches_js_css_html_at_any_depth() {
    let cfg = ConfigBuilder::new().build();
    let profile = build_watch_profile(&cfg).unwrap();

    assert!(profile.matches("client/a.js"));
    assert!(profile.matches("client/b.css"));
    assert!(profile.matches("client/c.html"));

    assert!(profile.matches("client/deep/nested/dir/a.js"));
    assert!(profile.matches("client/widgets/b.css"));
    assert!(profile.matches("client/pages/about/c.html"));
}

#[test]
fn other_extensions_do_not_match() {
    let cfg = ConfigBuilder::new().build();
    let profile = build_watch_profile(&cfg).unwrap();

    assert!(!profile.matches("client/logo.png"));
    assert!(!profile.matches("client/readme.txt"));
    assert!(!profile.matches("client/data.json"));
    assert!(!profile.matches("client/a.jsx"));
    assert!(!profile.matches("client/style.scss"));
}

#[test]
fn files_outside_the_source_root_do_not_match() {
    let cfg = ConfigBuilder::new().build();
    let profile = build_watch_profile(&cfg).unwrap();

    assert!(!profile.matches("server/a.js"));
    assert!(!profile.matches("a.js"));
}

#[test]
fn bundle_output_is_not_watched() {
    let cfg = ConfigBuilder::new().build();
    let profile = build_watch_profile(&cfg).unwrap();

    // Writing the bundle must not retrigger the build.
    assert!(!profile.matches("client/bundle.js"));
    assert!(profile.matches("client/app.js"));
}

proptest! {
    /// Any app file with a watched extension matches, at any depth.
    #[test]
    fn any_depth_app_file_matches(
        segs in prop::collection::vec("[a-z]{1,8}", 0..4),
        stem in "[a-z]{1,8}",
        ext in prop::sample::select(vec!["js", "css", "html"]),
    ) {
        let cfg = ConfigBuilder::new().build();
        let profile = build_watch_profile(&cfg).unwrap();

        let mut path = String::from("client");
        for seg in &segs {
            path.push('/');
            path.push_str(seg);
        }
        path.push('/');
        path.push_str(&stem);
        path.push('.');
        path.push_str(ext);

        // The emitted bundle itself is the one deliberate exception.
        prop_assume!(path != "client/bundle.js");
        prop_assert!(profile.matches(&path));
    }

    /// Unwatched extensions never match, at any depth.
    #[test]
    fn other_extension_never_matches(
        segs in prop::collection::vec("[a-z]{1,8}", 0..4),
        stem in "[a-z]{1,8}",
        ext in prop::sample::select(vec!["png", "json", "txt", "scss", "jsx"]),
    ) {
        let cfg = ConfigBuilder::new().build();
        let profile = build_watch_profile(&cfg).unwrap();

        let mut path = String::from("client");
        for seg in &segs {
            path.push('/');
            path.push_str(seg);
        }
        path.push('/');
        path.push_str(&stem);
        path.push('.');
        path.push_str(ext);

        prop_assert!(!profile.matches(&path));
    }
}
