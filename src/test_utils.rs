use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

pub fn init_test_logger() {
    INIT.call_once(|| {
        // Initialize logger only once
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub const DOCUMENT_TEMPLATE: &str = concat!(
    r#"<w:document><w:body>"#,
    r#"<w:p><w:r><w:t>{{ Title | xmlEscape }}</w:t></w:r></w:p>"#,
    r#"{% for p in ChartData %}<w:p><w:r><w:t>{{ loop.index }}. {{ p.Key | xmlEscape }}: {{ p.Value }}</w:t></w:r></w:p>{% endfor %}"#,
    r#"</w:body></w:document>"#
);

pub const CHART_TEMPLATE: &str = concat!(
    r#"<c:chartSpace><c:title>{{ ChartTitle | xmlEscape }}</c:title>"#,
    r#"{% for p in ChartData %}<c:pt idx="{{ loop.index0 }}"><c:v>{{ p.Value }}</c:v></c:pt>{% endfor %}"#,
    r#"</c:chartSpace>"#
);

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4];

/// A template package tree plus an external image, all inside one temp dir.
pub struct TemplateFixture {
    pub dir: TempDir,
}

impl TemplateFixture {
    pub fn template_dir(&self) -> PathBuf {
        self.dir.path().join("template")
    }

    pub fn image_path(&self) -> PathBuf {
        self.dir.path().join("photo.png")
    }
}

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

pub fn create_template_tree() -> TemplateFixture {
    init_test_logger();
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("template");

    write(&root, "[Content_Types].xml", b"<Types/>");
    write(&root, "_rels/.rels", b"<Relationships/>");
    write(&root, "word/document.xml", DOCUMENT_TEMPLATE.as_bytes());
    write(&root, "word/styles.xml", b"<w:styles/>");
    write(&root, "word/charts/chart1.xml", CHART_TEMPLATE.as_bytes());
    write(&root, "word/media/image1.png", b"placeholder image");
    write(&root, "word/embeddings/Microsoft_Excel____.xlsx", b"");
    write(dir.path(), "photo.png", PNG_BYTES);

    TemplateFixture { dir }
}
