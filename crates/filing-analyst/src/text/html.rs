//! HTML to plain text conversion

use scraper::{Html, Node};

/// Elements whose text never reaches the output
const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "head", "noscript"];

/// Extract visible text from an HTML document
///
/// Every text node outside script, style and head elements is trimmed;
/// empty nodes are dropped and the rest joined with newlines.
pub fn html_to_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let document = Html::parse_document(html);
    let mut lines: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }

        let hidden = node.ancestors().any(|ancestor| {
            matches!(ancestor.value(), Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            lines.push(trimmed);
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_only() {
        let html = r#"<html><head><title>10-K</title><style>p { color: red; }</style></head>
            <body><div>  PART I  </div><p>Item 1A. <b>Risk Factors</b></p>
            <script>var x = 1;</script><p>   </p><td>$ 391,035</td></body></html>"#;

        assert_eq!(html_to_text(html), "PART I\nItem 1A.\nRisk Factors\n$ 391,035");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(html_to_text(""), "");
        assert_eq!(html_to_text("   "), "");
    }

    #[test]
    fn test_entities_are_decoded() {
        assert_eq!(html_to_text("<p>Research &amp; Development</p>"), "Research & Development");
    }
}
