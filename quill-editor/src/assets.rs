use quill_core::format::FormatCommand;

use crate::protocol::MESSAGE_HANDLER;

pub const EDITOR_HTML: &str = include_str!("../web/editor.html");
pub const EDITOR_CSS: &str = include_str!("../web/editor.css");
pub const EDITOR_JS: &str = include_str!("../web/editor.js");

const STYLE_SLOT: &str = "<!-- quill:style -->";
const TOOLBAR_SLOT: &str = "<!-- quill:toolbar -->";
const SCRIPT_SLOT: &str = "<!-- quill:script -->";

/// Must match the page's Content-Security-Policy. Inline handlers inside
/// document content carry no nonce and never run.
const SCRIPT_NONCE: &str = "quill-editor";

/// Render the self-contained editor page with CSS, toolbar and script
/// inlined, ready for `WebView::load_html`.
pub fn editor_page() -> String {
    EDITOR_HTML
        .replace(STYLE_SLOT, &format!("<style>\n{}</style>", EDITOR_CSS))
        .replace(TOOLBAR_SLOT, &toolbar_markup())
        .replace(
            SCRIPT_SLOT,
            &format!(
                "<script nonce=\"{}\">\n{}</script>",
                SCRIPT_NONCE,
                EDITOR_JS.replace("__HANDLER__", MESSAGE_HANDLER)
            ),
        )
}

/// One button per supported format command, so the toolbar can never offer
/// a command the host would reject.
fn toolbar_markup() -> String {
    FormatCommand::ALL
        .iter()
        .map(|cmd| {
            format!(
                r#"<button class="tool-btn tool-{name}" data-command="{name}" title="{label}" aria-label="{label}"></button>"#,
                name = cmd.command_name(),
                label = cmd.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n      ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_has_no_unfilled_slots() {
        let page = editor_page();
        assert!(!page.contains("quill:style"));
        assert!(!page.contains("quill:toolbar"));
        assert!(!page.contains("quill:script"));
        assert!(!page.contains("__HANDLER__"));
    }

    #[test]
    fn toolbar_offers_every_format_command() {
        let page = editor_page();
        for cmd in FormatCommand::ALL {
            assert!(
                page.contains(&format!(r#"data-command="{}""#, cmd.command_name())),
                "missing toolbar button for {}",
                cmd
            );
        }
    }

    #[test]
    fn page_posts_to_quill_handler() {
        let page = editor_page();
        assert!(page.contains("messageHandlers.quill"));
        assert!(page.contains("quillReceiveCommand"));
        assert!(page.contains(r#"id="editor""#));
    }

    #[test]
    fn script_nonce_matches_policy() {
        let page = editor_page();
        assert!(page.contains(&format!("'nonce-{}'", SCRIPT_NONCE)));
        assert!(page.contains(&format!(r#"<script nonce="{}">"#, SCRIPT_NONCE)));
        assert!(!page.contains("script-src 'unsafe-inline'"));
    }
}
