//! End-to-end rebasing scenarios over a fixture tree.

use super::*;
use crate::asset::ContentHash;
use std::thread;
use tempfile::TempDir;

const IMAGE: &[u8] = b"\x89PNG\r\n\x1a\nimage";
const FONT: &[u8] = b"wOFFfont";
const CSS_FONT: &[u8] = b"wOFFcss-font";
const BLANK_GIF: &[u8] = b"GIF89a\x01\x00\x01\x00";
const ICON_SVG: &[u8] = b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>";

const CSS: &str = r#"@font-face {
  font-family: "CssFont";
  src: url("./css-font.woff") format("woff");
}
.deep { background: url(deep/blank.gif) no-repeat; }
.inline { background: url(data:image/gif;base64,R0lGODlhAQABAAAAACw=); }
"#;

const ASSETS_JS: &str = r#"import image from "./image.png"
import font from "./font.woff"
import deep from "./deep/blank.gif"
import css from "./css-font.css"

export { image, font, deep, css }
"#;

const PLAIN_JS: &str = "export default function plain() {\n  return 42\n}\n";

struct Fixture {
    _dir: TempDir,
    base: PathBuf,
}

impl Fixture {
    /// ```text
    /// fixtures/
    /// ├── assets.js  plain.js  image.png  font.woff  css-font.css  css-font.woff
    /// └── deep/
    ///     ├── blank.gif  icon.svg
    ///     └── assets-mixed.js
    /// outside/deep/assets-outside.js
    /// ```
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let base = dir.path().canonicalize().unwrap();
        let fixtures = base.join("fixtures");
        fs::create_dir_all(fixtures.join("deep")).unwrap();
        fs::create_dir_all(base.join("outside/deep")).unwrap();

        fs::write(fixtures.join("assets.js"), ASSETS_JS).unwrap();
        fs::write(fixtures.join("plain.js"), PLAIN_JS).unwrap();
        fs::write(fixtures.join("image.png"), IMAGE).unwrap();
        fs::write(fixtures.join("font.woff"), FONT).unwrap();
        fs::write(fixtures.join("css-font.css"), CSS).unwrap();
        fs::write(fixtures.join("css-font.woff"), CSS_FONT).unwrap();
        fs::write(fixtures.join("deep/blank.gif"), BLANK_GIF).unwrap();
        fs::write(fixtures.join("deep/icon.svg"), ICON_SVG).unwrap();
        fs::write(
            fixtures.join("deep/assets-mixed.js"),
            "import font from \"../font.woff\"\nimport icon from \"./icon.svg\"\nimport \"../css-font.css\"\n",
        )
        .unwrap();
        fs::write(
            base.join("outside/deep/assets-outside.js"),
            "import image from \"../../fixtures/image.png\"\nimport \"../../fixtures/css-font.css\"\n",
        )
        .unwrap();

        Self { _dir: dir, base }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.base.join(rel)
    }

    fn config(&self, out: &str) -> RebaseConfig {
        RebaseConfig::with_dirs(self.path("fixtures"), self.path(out))
    }
}

fn token(bytes: &[u8]) -> String {
    ContentHash::of(bytes).token()
}

/// Act as the host: rebase `entry` and write its rewritten text next to the assets.
fn bundle(build: &Build, entry: &Path) -> RewriteResult {
    let text = fs::read_to_string(entry).unwrap();
    let result = build.process_file(entry, &text).unwrap();
    let dest = build.output_dir().join(entry.file_name().unwrap());
    fs::write(dest, &result.code).unwrap();
    result
}

/// All files under `dir`, relative and `/`-separated, sorted.
fn files_in(dir: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in fs::read_dir(dir).unwrap().flatten() {
            let path = entry.path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap();
                out.push(crate::utils::path::to_slash(rel));
            }
        }
    }
    let mut out = Vec::new();
    walk(dir, dir, &mut out);
    out.sort();
    out
}

/// Emitted stylesheet text, found through the build report.
fn emitted_css(report: &BuildReport) -> (String, String) {
    let css = report
        .assets
        .iter()
        .find(|a| a.resolved.extension == "css")
        .unwrap();
    let text = fs::read_to_string(report.output_dir.join(&css.output_path)).unwrap();
    (css.output_path.clone(), text)
}

#[test]
fn test_plain_script_emits_no_assets() {
    let fx = Fixture::new();
    let build = Build::new(&fx.config("out")).unwrap();

    let result = bundle(&build, &fx.path("fixtures/plain.js"));
    let report = build.finish();

    assert_eq!(result.code, PLAIN_JS);
    assert!(result.assets.is_empty());
    assert!(report.assets.is_empty());
    assert_eq!(files_in(&fx.path("out")), vec!["plain.js"]);
}

#[test]
fn test_assets_are_rebased() {
    let fx = Fixture::new();
    let build = Build::new(&fx.config("out")).unwrap();

    let result = bundle(&build, &fx.path("fixtures/assets.js"));
    let report = build.finish();
    let (css_path, css_text) = emitted_css(&report);

    assert_eq!(
        css_text,
        CSS.replace("./css-font.woff", &format!("{}.woff", token(CSS_FONT)))
            .replace("deep/blank.gif", &format!("{}.gif", token(BLANK_GIF)))
    );
    assert_eq!(css_path, format!("{}.css", token(css_text.as_bytes())));

    assert_eq!(
        result.code,
        format!(
            r#"import image from "./{}.png"
import font from "./{}.woff"
import deep from "./{}.gif"
import css from "./{css_path}"

export {{ image, font, deep, css }}
"#,
            token(IMAGE),
            token(FONT),
            token(BLANK_GIF),
        )
    );

    let mut expected = vec![
        "assets.js".to_string(),
        format!("{}.png", token(IMAGE)),
        format!("{}.woff", token(FONT)),
        format!("{}.woff", token(CSS_FONT)),
        format!("{}.gif", token(BLANK_GIF)),
        css_path,
    ];
    expected.sort();
    assert_eq!(files_in(&fx.path("out")), expected);
    assert_eq!(report.assets.len(), 5);
    assert_eq!(result.assets.len(), 4);
}

#[test]
fn test_assets_written_to_subfolder() {
    let fx = Fixture::new();
    let mut config = fx.config("out");
    config.folder = "static".into();
    let build = Build::new(&config).unwrap();

    let result = bundle(&build, &fx.path("fixtures/assets.js"));
    let report = build.finish();
    let (css_path, css_text) = emitted_css(&report);

    for asset in &report.assets {
        assert!(asset.output_path.starts_with("static/"), "{}", asset.output_path);
        assert!(fx.path("out").join(&asset.output_path).is_file());
    }
    assert!(result.code.contains(&format!("\"./static/{}.png\"", token(IMAGE))));
    assert!(result.code.contains(&format!("\"./{css_path}\"")));
    // Stylesheet and its font share the folder, so the reference stays bare
    assert!(css_text.contains(&format!("url(\"{}.woff\")", token(CSS_FONT))));
    assert_eq!(
        files_in(&fx.path("out"))
            .iter()
            .filter(|f| !f.starts_with("static/"))
            .collect::<Vec<_>>(),
        vec!["assets.js"]
    );
}

#[test]
fn test_outside_asset_source_location() {
    let fx = Fixture::new();
    // Source root deliberately excludes both the script and its assets
    let config = RebaseConfig::with_dirs(fx.path("elsewhere"), fx.path("out"));
    let build = Build::new(&config).unwrap();

    let result = bundle(&build, &fx.path("outside/deep/assets-outside.js"));
    let report = build.finish();
    let (css_path, css_text) = emitted_css(&report);

    assert!(result.code.contains(&format!("\"./{}.png\"", token(IMAGE))));
    assert!(result.code.contains(&format!("\"./{css_path}\"")));
    assert!(css_text.contains(&format!("{}.woff", token(CSS_FONT))));
    assert!(css_text.contains(&format!("{}.gif", token(BLANK_GIF))));
    // image, css, css font, gif
    assert_eq!(report.assets.len(), 4);
}

#[test]
fn test_mixed_asset_source_locations() {
    let fx = Fixture::new();
    let build = Build::new(&fx.config("out")).unwrap();

    let result = bundle(&build, &fx.path("fixtures/deep/assets-mixed.js"));
    let report = build.finish();
    let (css_path, css_text) = emitted_css(&report);

    assert_eq!(
        result.code,
        format!(
            "import font from \"./{}.woff\"\nimport icon from \"./{}.svg\"\nimport \"./{css_path}\"\n",
            token(FONT),
            token(ICON_SVG),
        )
    );
    // The stylesheet's font resolves next to the stylesheet, not the script
    assert!(css_text.contains(&format!("url(\"{}.woff\")", token(CSS_FONT))));
    assert_eq!(report.assets.len(), 5);
}

#[test]
fn test_identical_content_is_emitted_once() {
    let fx = Fixture::new();
    fs::write(fx.path("fixtures/copy.png"), IMAGE).unwrap();
    fs::write(
        fx.path("fixtures/twice.js"),
        "import a from \"./image.png\"\nimport b from \"./copy.png\"\n",
    )
    .unwrap();
    let build = Build::new(&fx.config("out")).unwrap();

    let result = bundle(&build, &fx.path("fixtures/twice.js"));
    let png = format!("{}.png", token(IMAGE));

    assert_eq!(
        result.code,
        format!("import a from \"./{png}\"\nimport b from \"./{png}\"\n")
    );
    assert_eq!(result.assets.len(), 1);
    assert_eq!(files_in(&fx.path("out")), vec![png, "twice.js".to_string()]);
}

#[test]
fn test_concurrent_files_share_assets() {
    let fx = Fixture::new();
    fs::write(fx.path("fixtures/one.js"), "import i from \"./image.png\"\n").unwrap();
    fs::write(fx.path("fixtures/two.js"), "import i from \"./image.png\"\n").unwrap();
    let build = Build::new(&fx.config("out")).unwrap();
    let shared = &build;

    let results: Vec<RewriteResult> = thread::scope(|s| {
        let handles: Vec<_> = ["fixtures/one.js", "fixtures/two.js", "fixtures/assets.js"]
            .into_iter()
            .map(|entry| {
                let path = fx.path(entry);
                s.spawn(move || bundle(shared, &path))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results[0].code, results[1].code);
    assert_eq!(results[0].assets, results[1].assets);
    let report = build.finish();
    assert_eq!(report.assets.len(), 5);
    let pngs = files_in(&fx.path("out"))
        .into_iter()
        .filter(|f| f.ends_with(".png"))
        .count();
    assert_eq!(pngs, 1);
}

#[test]
fn test_output_paths_are_deterministic() {
    let fx = Fixture::new();
    let paths = |out: &str| {
        let build = Build::new(&fx.config(out)).unwrap();
        bundle(&build, &fx.path("fixtures/assets.js"));
        build
            .finish()
            .assets
            .into_iter()
            .map(|a| a.output_path)
            .collect::<Vec<_>>()
    };
    assert_eq!(paths("out-1"), paths("out-2"));
}

#[test]
fn test_nested_bundle_location() {
    let fx = Fixture::new();
    let mut config = fx.config("out");
    config.folder = "static".into();
    let build = Build::new(&config).unwrap();

    let text = "import image from \"./image.png\"\n";
    let result = build
        .process_file_as(&fx.path("fixtures/assets.js"), text, Path::new("js/index.js"))
        .unwrap();

    assert_eq!(
        result.code,
        format!("import image from \"../static/{}.png\"\n", token(IMAGE))
    );
}

#[test]
fn test_keep_name_policy() {
    let fx = Fixture::new();
    let mut config = fx.config("out");
    config.keep_name = true;
    let build = Build::new(&config).unwrap();

    let result = bundle(&build, &fx.path("fixtures/assets.js"));

    assert!(result.code.contains(&format!("\"./image_{}.png\"", token(IMAGE))));
    assert!(result.code.contains(&format!("\"./font_{}.woff\"", token(FONT))));
    assert!(result.code.contains("\"./css-font_"));
    assert!(fx.path("out").join(format!("blank_{}.gif", token(BLANK_GIF))).is_file());
}

#[test]
fn test_unresolved_asset_is_fatal() {
    let fx = Fixture::new();
    let build = Build::new(&fx.config("out")).unwrap();
    let entry = fx.path("fixtures/assets.js");

    let err = build
        .process_file(&entry, "import gone from \"./gone.png\"\n")
        .unwrap_err();

    match err {
        RebaseError::UnresolvedAsset {
            referencing,
            specifier,
            ..
        } => {
            assert_eq!(referencing, entry);
            assert_eq!(specifier, "./gone.png");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unresolved_nested_asset_is_fatal() {
    let fx = Fixture::new();
    fs::write(fx.path("fixtures/broken.css"), ".x { background: url(nope.gif) }").unwrap();
    let build = Build::new(&fx.config("out")).unwrap();

    let err = build
        .process_file(
            &fx.path("fixtures/assets.js"),
            "import \"./broken.css\"\n",
        )
        .unwrap_err();

    assert!(matches!(
        err,
        RebaseError::UnresolvedAsset { ref specifier, .. } if specifier == "nope.gif"
    ));
}

#[test]
fn test_stylesheet_entry_is_rewritten() {
    let fx = Fixture::new();
    let mut config = fx.config("out");
    config.folder = "static".into();
    let build = Build::new(&config).unwrap();

    let result = build
        .process_file(&fx.path("fixtures/css-font.css"), CSS)
        .unwrap();

    assert!(result.code.contains(&format!("url(\"static/{}.woff\")", token(CSS_FONT))));
    assert!(result.code.contains(&format!("url(static/{}.gif)", token(BLANK_GIF))));
    // Data URI left exactly as written
    assert!(result.code.contains("url(data:image/gif;base64,R0lGODlhAQABAAAAACw=)"));
    assert_eq!(result.assets.len(), 2);
}

#[test]
fn test_registry_is_build_scoped() {
    let fx = Fixture::new();
    let build = Build::new(&fx.config("out")).unwrap();
    bundle(&build, &fx.path("fixtures/assets.js"));
    assert_eq!(build.finish().assets.len(), 5);

    let next = Build::new(&fx.config("out")).unwrap();
    assert!(next.emitted().is_empty());
}

#[test]
fn test_commented_imports_are_ignored() {
    let fx = Fixture::new();
    let build = Build::new(&fx.config("out")).unwrap();
    let text = "// import old from \"./removed.png\"\n\
                // import logo from \"./image.png\"\n\
                /* import x from './gone.gif' */\n\
                export default 1\n";

    let result = build
        .process_file(&fx.path("fixtures/plain.js"), text)
        .unwrap();

    assert_eq!(result.code, text);
    assert!(result.assets.is_empty());
    assert!(build.finish().assets.is_empty());
}

#[test]
fn test_cyclic_stylesheets_are_order_independent() {
    let fx = Fixture::new();
    fs::write(
        fx.path("fixtures/ca.css"),
        "@import \"cb.css\";\n.ca { background: url(image.png) }\n",
    )
    .unwrap();
    fs::write(fx.path("fixtures/cb.css"), "@import \"ca.css\";\n.cb {}\n").unwrap();
    fs::write(fx.path("fixtures/x.js"), "import \"./ca.css\"\n").unwrap();
    fs::write(fx.path("fixtures/y.js"), "import \"./cb.css\"\n").unwrap();

    let emitted = |order: [&str; 2], out: &str| {
        let build = Build::new(&fx.config(out)).unwrap();
        for entry in order {
            bundle(&build, &fx.path(entry));
        }
        let report = build.finish();
        (
            report.assets.into_iter().map(|a| a.output_path).collect::<Vec<_>>(),
            files_in(&fx.path(out)),
        )
    };

    let forward = emitted(["fixtures/x.js", "fixtures/y.js"], "out-xy");
    let backward = emitted(["fixtures/y.js", "fixtures/x.js"], "out-yx");

    // ca, cb and the image
    assert_eq!(forward.0.len(), 3);
    assert_eq!(forward, backward);
}

#[test]
fn test_keep_name_with_identical_content() {
    let fx = Fixture::new();
    fs::write(fx.path("fixtures/copy.png"), IMAGE).unwrap();
    let mut config = fx.config("out");
    config.keep_name = true;
    let build = Build::new(&config).unwrap();

    let result = build
        .process_file(
            &fx.path("fixtures/plain.js"),
            "import a from \"./image.png\"\nimport b from \"./copy.png\"\n",
        )
        .unwrap();

    // One file, named after whichever path registered the content first
    assert_eq!(result.assets.len(), 1);
    let name = &result.assets[0].output_path;
    assert_eq!(name, &format!("image_{}.png", token(IMAGE)));
    assert_eq!(
        result.code,
        format!("import a from \"./{name}\"\nimport b from \"./{name}\"\n")
    );
}
