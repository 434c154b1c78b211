//! Dashboard files compiled into the binary.

pub struct Asset {
    pub content_type: &'static str,
    pub body: &'static str,
}

macro_rules! embed {
    ($file:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/src/web/assets/", $file))
    };
}

pub const INDEX_HTML: &str = embed!("index.html");

pub const STYLES: Asset = Asset {
    content_type: "text/css; charset=utf-8",
    body: embed!("styles.css"),
};

pub const APP_JS: Asset = Asset {
    content_type: "application/javascript; charset=utf-8",
    body: embed!("app.js"),
};
