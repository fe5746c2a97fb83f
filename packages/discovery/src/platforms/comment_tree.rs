//! Question/answer recovery over an indentation-encoded comment tree.
//!
//! Forums like Hacker News render the reply tree as a flat list where each
//! comment carries its nesting depth. For every reply by the thread author we
//! look back for the nearest comment that sits strictly shallower: that is a
//! direct or indirect parent, and its body is treated as the question being
//! answered.

use crate::types::thread::QuestionAnswer;

/// One comment in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    /// Author handle; `None` for deleted or anonymous comments
    pub author: Option<String>,
    /// Nesting depth (0 = top-level reply); `None` when unreadable
    pub depth: Option<u32>,
    pub body: String,
}

impl CommentNode {
    pub fn new(author: impl Into<String>, depth: u32, body: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            depth: Some(depth),
            body: body.into(),
        }
    }

    fn is_by(&self, user: &str) -> bool {
        self.author.as_deref() == Some(user)
    }

    /// True when this comment sits strictly above `other` in the tree.
    fn is_shallower_than(&self, other: &CommentNode) -> bool {
        match (self.depth, other.depth) {
            (Some(mine), Some(theirs)) => mine < theirs,
            _ => false,
        }
    }
}

/// Pair every comment by `main_user` with the comment it answers.
///
/// The backward scan for comment `i` stops at the previous author comment
/// (inclusive), so an ancestor already paired further up is not reused and
/// the whole pass stays linear. The cursor advances on every author comment,
/// matched or not. An author comment with no shallower comment in its window
/// gets an empty question.
pub fn pair_question_answers(comments: &[CommentNode], main_user: &str) -> Vec<QuestionAnswer> {
    let mut pairs = Vec::new();
    let mut last_user_comment_index = 0;

    for (i, comment) in comments.iter().enumerate() {
        if !comment.is_by(main_user) {
            continue;
        }

        let question = comments[last_user_comment_index..=i]
            .iter()
            .rev()
            .find(|prev| prev.is_shallower_than(comment))
            .map(|prev| prev.body.clone())
            .unwrap_or_default();

        last_user_comment_index = i;
        pairs.push(QuestionAnswer::new(question, comment.body.clone()));
    }

    pairs
}
