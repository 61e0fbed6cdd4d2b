//! HTML rendering of the chat page

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use url::{ParseError, Url};
use std::path::Path;

use docchat_core::{ChatMessage, ChatRole, Result};

use crate::config::PageText;

const STYLE: &str = r#"
body {
    margin: 0;
    font-family: "Source Sans Pro", sans-serif;
    display: flex;
    min-height: 100vh;
}

.sidebar {
    width: 280px;
    padding: 24px;
    background-color: #F0F2F6;
    box-sizing: border-box;
}

.sidebar .logo {
    display: block;
    margin: 0 auto 16px auto;
}

.main {
    flex: 1;
    padding: 24px 48px 80px 48px;
}

.question input[type="text"] {
    width: 100%;
    padding: 8px;
    box-sizing: border-box;
}

.warning {
    padding: 12px;
    background-color: #FFF3CD;
    color: #856404;
    border-radius: 4px;
    margin: 12px 0;
}

.chat::after {
    content: "";
    display: block;
    clear: both;
}

.user-message {
    margin: 5px;
    padding: 10px;
    background-color: #007BFF;
    color: white;
    border-radius: 15px;
    max-width: 60%;
    word-wrap: break-word;
    float: right;
    clear: both;
}

.bot-message {
    margin: 5px;
    padding: 10px;
    background-color: #E0E0E0;
    border-radius: 15px;
    max-width: 60%;
    word-wrap: break-word;
    float: left;
    clear: both;
}

@keyframes moveText {
    0% { transform: translateX(0); }
    25% { transform: translateX(5px); }
    50% { transform: translateX(0); }
    75% { transform: translateX(-5px); }
    100% { transform: translateX(0); }
}

.moving-text {
    animation: moveText 2s infinite;
    position: fixed;
    bottom: 0;
    left: 0;
    width: 100%;
    background-color: #e60000;
    padding: 10px;
    text-align: center;
    color: #ffffff;
}

.moving-text a {
    color: #ffffff;
}
"#;

/// Everything one render of the chat page needs
pub struct PageView<'a> {
    pub text: &'a PageText,
    /// `data:` URI of the sidebar image
    pub logo: Option<&'a str>,
    pub history: &'a [ChatMessage],
    pub warning: Option<&'a str>,
}

pub fn render_page(view: &PageView<'_>) -> String {
    let mut page = String::with_capacity(4096);

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{}</title>\n", escape(&view.text.title)));
    page.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));

    page.push_str(&render_sidebar(view.text, view.logo));

    page.push_str("<main class=\"main\">\n");
    page.push_str(&format!("<h1>{}</h1>\n", escape(&view.text.header)));
    page.push_str(&format!(
        "<form class=\"question\" method=\"post\" action=\"/ask\">\n\
         <label for=\"question\">{}</label>\n\
         <input type=\"text\" id=\"question\" name=\"question\" autocomplete=\"off\" autofocus>\n\
         </form>\n",
        escape(&view.text.input_label)
    ));

    if let Some(warning) = view.warning {
        page.push_str(&format!("<div class=\"warning\">{}</div>\n", escape(warning)));
    }

    page.push_str("<div class=\"chat\">\n");
    for message in view.history {
        page.push_str(&render_message(message));
        page.push('\n');
    }
    page.push_str("</div>\n<hr>\n");
    page.push_str(
        "<form method=\"post\" action=\"/reset\"><button type=\"submit\">New conversation</button></form>\n",
    );
    page.push_str("</main>\n");

    page.push_str(&render_footer(view.text));
    page.push_str("</body>\n</html>\n");
    page
}

/// One chat bubble. User text is escaped; assistant text is Markdown.
pub fn render_message(message: &ChatMessage) -> String {
    match message.role {
        ChatRole::User => format!("<div class=\"user-message\">{}</div>", escape(&message.content)),
        ChatRole::Assistant | ChatRole::System => format!(
            "<div class=\"bot-message\">{}</div>",
            markdown_to_html(&message.content)
        ),
    }
}

/// Render Markdown, showing any raw HTML in it as text.
///
/// Images render as their alt text and links keep only web or mail targets.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH).filter_map(|event| {
        match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
            Event::Start(Tag::Image { .. }) | Event::End(TagEnd::Image) => None,
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) if !is_safe_link(&dest_url) => Some(Event::Start(Tag::Link {
                link_type,
                dest_url: CowStr::Borrowed("#"),
                title,
                id,
            })),
            other => Some(other),
        }
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn is_safe_link(dest: &str) -> bool {
    match Url::parse(dest.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https" | "mailto"),
        Err(ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

/// Read an image into a `data:` URI for inline display
pub async fn load_logo(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(logo_data_uri(path, &bytes))
}

pub fn logo_data_uri(path: &Path, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", image_mime(path), STANDARD.encode(bytes))
}

fn image_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Generic page for failures that end the request
pub fn render_error_page() -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Error</title>\n<style>{}</style>\n</head>\n<body>\n\
         <main class=\"main\">\n<h1>Something went wrong</h1>\n\
         <p>The request could not be completed. Please try again later.</p>\n\
         <p><a href=\"/\">Back to the chat</a></p>\n</main>\n</body>\n</html>\n",
        STYLE
    )
}

fn render_sidebar(text: &PageText, logo: Option<&str>) -> String {
    let mut sidebar = String::from("<aside class=\"sidebar\">\n");

    if let Some(src) = logo {
        sidebar.push_str(&format!(
            "<img class=\"logo\" src=\"{}\" width=\"90\" alt=\"logo\">\n",
            html_escape::encode_double_quoted_attribute(src)
        ));
    }
    sidebar.push_str("<hr>\n");
    sidebar.push_str(&markdown_to_html(&text.sidebar_welcome));
    sidebar.push_str("<hr>\n");
    sidebar.push_str(&markdown_to_html(&text.sidebar_about));
    sidebar.push_str("<hr>\n");
    sidebar.push_str(&markdown_to_html(&text.sidebar_how_to));
    sidebar.push_str("</aside>\n");
    sidebar
}

fn render_footer(text: &PageText) -> String {
    let label = escape(&text.footer_label);
    let owner = match &text.footer_url {
        Some(url) => format!(
            "<a href=\"{}\" target=\"_blank\">{}</a>",
            html_escape::encode_double_quoted_attribute(url),
            label
        ),
        None => label,
    };

    format!("<div class=\"moving-text\">© {} | Made with ❤️</div>\n", owner)
}

fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}
