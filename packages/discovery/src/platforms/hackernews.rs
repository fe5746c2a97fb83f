//! Hacker News item page extractor.
//!
//! Layout relied on:
//! - `.fatitem` holds the root item: author in `.hnuser`, body in `.comment`
//!   (comment roots) or `.toptext` (stories)
//! - `.comment-tree .athing` rows are the replies in document order, each with
//!   `.hnuser`, `.ind[indent]` for nesting depth, and `.comment` for the body

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use super::comment_tree::{pair_question_answers, CommentNode};
use crate::types::thread::ExtractedThread;

struct Selectors {
    main_user: Selector,
    main_comment: Selector,
    main_toptext: Selector,
    comment_rows: Selector,
    user: Selector,
    indent: Selector,
    body: Selector,
    paragraph: Selector,
}

static SELECTORS: LazyLock<Selectors> = LazyLock::new(|| Selectors {
    main_user: css(".fatitem .hnuser"),
    main_comment: css(".fatitem .comment"),
    main_toptext: css(".fatitem .toptext"),
    comment_rows: css(".comment-tree .athing"),
    user: css(".hnuser"),
    indent: css(".ind"),
    body: css(".comment"),
    paragraph: css("p"),
});

fn css(selector: &'static str) -> Selector {
    Selector::parse(selector).expect("static selector is valid CSS")
}

/// Parse an item page into the thread summary fed to the model.
pub fn parse_thread(html: &str) -> ExtractedThread {
    let document = Html::parse_document(html);
    let selectors = &*SELECTORS;

    let main_user = document
        .select(&selectors.main_user)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let mut main_comment = joined_text(document.select(&selectors.main_comment));
    if main_comment.is_empty() {
        main_comment = joined_text(document.select(&selectors.main_toptext));
    }

    let comments: Vec<CommentNode> = document
        .select(&selectors.comment_rows)
        .map(comment_node)
        .collect();

    ExtractedThread {
        main_comment,
        question_answers: pair_question_answers(&comments, &main_user),
    }
}

fn comment_node(row: ElementRef<'_>) -> CommentNode {
    let selectors = &*SELECTORS;

    let author = row
        .select(&selectors.user)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty());

    let depth = row
        .select(&selectors.indent)
        .next()
        .and_then(|el| el.value().attr("indent"))
        .and_then(parse_indent);

    CommentNode {
        author,
        depth,
        body: joined_text(row.select(&selectors.body)),
    }
}

/// Nesting depth from an `indent` attribute. A blank value is depth 0.
fn parse_indent(indent: &str) -> Option<u32> {
    let indent = indent.trim();
    if indent.is_empty() {
        return Some(0);
    }
    indent.parse().ok()
}

/// Concatenate the normalized text of every match, trimmed.
fn joined_text<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> String {
    elements
        .map(normalized_text)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Text of a comment body.
///
/// Bodies quoting another comment (`>` marker) get a line break ahead of their
/// first paragraph so the quote and the reply read as separate blocks.
fn normalized_text(comment: ElementRef<'_>) -> String {
    let raw: String = comment.text().collect();
    if !raw.contains('>') {
        return raw;
    }

    let first_paragraph = comment.select(&SELECTORS.paragraph).next().map(|p| p.id());
    let mut text = String::with_capacity(raw.len() + 1);
    for node in comment.descendants() {
        if Some(node.id()) == first_paragraph {
            text.push('\n');
        }
        if let Some(fragment) = node.value().as_text() {
            text.push_str(fragment);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::thread::QuestionAnswer;

    fn row(user: &str, indent: u32, body: &str) -> String {
        format!(
            r#"<tr class="athing comtr"><td><table><tr>
                <td class="ind" indent="{indent}"><img src="s.gif" height="1" width="{width}"></td>
                <td class="default">
                  <div><span class="comhead"><a href="user?id={user}" class="hnuser">{user}</a></span></div>
                  <div class="comment"><div class="commtext c00">{body}</div></div>
                </td>
            </tr></table></td></tr>"#,
            indent = indent,
            width = indent * 40,
            user = user,
            body = body,
        )
    }

    fn page(root: &str, rows: &[String]) -> String {
        format!(
            r#"<html><body><center><table id="hnmain"><tr><td>
              <table class="fatitem">
                <tr class="athing submission"><td class="title"><span class="titleline"><a href="https://example.com">Ask HN: Show me your profitable side project</a></span></td></tr>
                <tr><td class="subtext"><span class="subline"><a href="user?id=founder" class="hnuser">founder</a></span></td></tr>
                <tr><td></td><td>{root}</td></tr>
              </table>
              <table class="comment-tree">{rows}</table>
            </td></tr></table></center></body></html>"#,
            root = root,
            rows = rows.concat(),
        )
    }

    #[test]
    fn story_uses_toptext_as_main_comment() {
        let html = page(
            r#"<div class="toptext">I sell invoicing software to plumbers.</div>"#,
            &[],
        );

        let thread = parse_thread(&html);

        assert_eq!(thread.main_comment, "I sell invoicing software to plumbers.");
        assert!(thread.question_answers.is_empty());
    }

    #[test]
    fn comment_root_prefers_comment_body() {
        let html = page(
            r#"<div class="comment"><div class="commtext">Root comment body</div></div>
               <div class="toptext">ignored</div>"#,
            &[],
        );

        assert_eq!(parse_thread(&html).main_comment, "Root comment body");
    }

    #[test]
    fn pairs_founder_replies_with_parent_comments() {
        let html = page(
            r#"<div class="toptext">Launched last year.</div>"#,
            &[
                row("alice", 0, "What is your MRR?"),
                row("founder", 1, "About $5k."),
                row("bob", 0, "Which stack?"),
                row("carol", 1, "Probably Rails"),
                row("founder", 2, "Rust and Postgres."),
            ],
        );

        let thread = parse_thread(&html);

        assert_eq!(thread.main_comment, "Launched last year.");
        assert_eq!(
            thread.question_answers,
            vec![
                QuestionAnswer::new("What is your MRR?", "About $5k."),
                QuestionAnswer::new("Probably Rails", "Rust and Postgres."),
            ]
        );
    }

    #[test]
    fn quoted_reply_gets_line_break_before_first_paragraph() {
        let html = page(
            r#"<div class="toptext">Root</div>"#,
            &[
                row("alice", 0, "How did you find customers?"),
                row(
                    "founder",
                    1,
                    "&gt; How did you find customers?<p>Cold email.</p><p>Lots of it.</p>",
                ),
            ],
        );

        let thread = parse_thread(&html);

        assert_eq!(
            thread.question_answers[0].answer,
            "> How did you find customers?\nCold email.Lots of it."
        );
    }

    #[test]
    fn missing_indent_attribute_is_never_a_parent() {
        let rows = vec![
            r#"<tr class="athing comtr"><td><table><tr>
                <td class="default">
                  <div><a class="hnuser">alice</a></div>
                  <div class="comment">no indent here</div>
                </td></tr></table></td></tr>"#
                .to_string(),
            row("founder", 1, "reply"),
        ];
        let html = page(r#"<div class="toptext">Root</div>"#, &rows);

        let thread = parse_thread(&html);

        assert_eq!(thread.question_answers, vec![QuestionAnswer::new("", "reply")]);
    }

    #[test]
    fn blank_indent_is_top_level() {
        assert_eq!(parse_indent(""), Some(0));
        assert_eq!(parse_indent(" 3 "), Some(3));
        assert_eq!(parse_indent("deep"), None);

        let rows = vec![
            r#"<tr class="athing comtr"><td><table><tr>
                <td class="ind" indent=""></td>
                <td class="default">
                  <div><a class="hnuser">alice</a></div>
                  <div class="comment">Blank indent question</div>
                </td></tr></table></td></tr>"#
                .to_string(),
            row("founder", 1, "reply"),
        ];
        let html = page(r#"<div class="toptext">Root</div>"#, &rows);

        let thread = parse_thread(&html);

        assert_eq!(
            thread.question_answers,
            vec![QuestionAnswer::new("Blank indent question", "reply")]
        );
    }
}
