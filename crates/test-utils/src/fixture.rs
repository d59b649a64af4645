use std::fs;
use std::io;
use std::path::Path;

use tempfile::TempDir;

/// Lay out a minimal client app in a fresh temp directory.
///
/// ```text
/// client/index.html
/// client/app.js            entry; imports the three below
/// client/message.js
/// client/template.html
/// client/style.css
/// client/node_modules/vendor.js
/// ```
pub fn sample_project() -> io::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    let client = dir.path().join("client");
    fs::create_dir_all(client.join("node_modules"))?;

    write(&client, "index.html", INDEX_HTML)?;
    write(&client, "app.js", APP_JS)?;
    write(&client, "message.js", MESSAGE_JS)?;
    write(&client, "template.html", TEMPLATE_HTML)?;
    write(&client, "style.css", STYLE_CSS)?;
    write(&client, "node_modules/vendor.js", VENDOR_JS)?;

    Ok(dir)
}

fn write(client: &Path, rel: &str, contents: &str) -> io::Result<()> {
    fs::write(client.join(rel), contents)
}

pub const INDEX_HTML: &str = "<!doctype html>\n<html>\n<head><title>app</title></head>\n<body>\n<script src=\"bundle.js\"></script>\n</body>\n</html>\n";

pub const APP_JS: &str = "import { greet } from './message.js';\nimport template from './template.html';\nimport './style.css';\nconst vendor = require('./node_modules/vendor.js');\n\ndocument.body.innerHTML = template;\ngreet(vendor.version);\n";

pub const MESSAGE_JS: &str = "export const name = \"world\";\nexport function greet(version) {\n  console.log(\"hello \" + name + \" (vendor \" + version + \")\");\n}\n";

pub const TEMPLATE_HTML: &str = "<h1>devloop fixture</h1>\n";

pub const STYLE_CSS: &str = "body { background: #fafafa; }\n";

pub const VENDOR_JS: &str = "module.exports = { version: \"1.0.0\" };\n";
