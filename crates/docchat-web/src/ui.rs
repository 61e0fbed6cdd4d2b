//! Console output for the server process

use colored::*;

use crate::config::WebConfig;

const BANNER_WIDTH: usize = 61;

/// Display startup banner
pub fn display_banner(config: &WebConfig, chat_model: &str, embed_model: &str) {
    let top_border = format!("┌{}┐", "─".repeat(BANNER_WIDTH - 2));
    let bottom_border = format!("└{}┘", "─".repeat(BANNER_WIDTH - 2));
    let empty_line = format!("│{}│", " ".repeat(BANNER_WIDTH - 2));

    println!();
    println!("{}", top_border.blue());
    println!("{}", empty_line.blue());

    let title = "docchat - chat with your PDFs";
    let title_line = format!(
        "│  {}{}│",
        title.blue().bold(),
        " ".repeat(padding(title))
    );
    println!("{}", title_line);

    println!("{}", empty_line.blue());

    let feature_lines = vec![
        format!("Documents:   {}", config.pdf_dir.display()),
        format!("Chat model:  {}", chat_model),
        format!("Embeddings:  {}", embed_model),
        format!("Sessions:    idle after {} min", config.session_idle_timeout.as_secs() / 60),
        String::new(),
        format!("v{}", env!("CARGO_PKG_VERSION")),
    ];

    for line in feature_lines {
        if line.is_empty() {
            println!("{}", empty_line.blue());
        } else {
            let content = if line.starts_with('v') {
                format!("│  {}{}│", line.dimmed(), " ".repeat(padding(&line)))
            } else {
                format!("│  {}{}│", line, " ".repeat(padding(&line)))
            };
            println!("{}", content.blue());
        }
    }

    println!("{}", empty_line.blue());
    println!("{}", bottom_border.blue());
    println!();
    println!(
        "{} {}",
        "💡 Open".dimmed(),
        format!("http://{}", config.bind).green().bold()
    );
    println!();
}

/// Print a failed startup check without stopping the server
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠️".yellow(), message.yellow());
}

fn padding(line: &str) -> usize {
    (BANNER_WIDTH - 4).saturating_sub(line.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_fills_the_banner() {
        assert_eq!(padding(""), BANNER_WIDTH - 4);
        assert_eq!(padding("abc"), BANNER_WIDTH - 7);
        assert_eq!(padding(&"x".repeat(200)), 0);
    }
}
