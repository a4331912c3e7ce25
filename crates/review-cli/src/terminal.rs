//! Line-oriented reviewer for an interactive terminal.

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use doccloud::{Decision, ReviewCounts, ReviewItem, Reviewer, Verdict};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

const PROMPT: &str = "[s]ensitive / [n]on-sensitive / s[k]ip / [q]uit > ";

/// Parse one answer. Unknown input yields `None`.
pub fn parse_decision(input: &str) -> Option<Decision> {
    match input.trim().to_ascii_lowercase().as_str() {
        "s" | "sensitive" => Some(Decision::Classify(Verdict::Sensitive)),
        "n" | "non-sensitive" | "nonsensitive" => Some(Decision::Classify(Verdict::NonSensitive)),
        "k" | "skip" => Some(Decision::Skip),
        "q" | "quit" | "exit" => Some(Decision::Quit),
        _ => None,
    }
}

/// Shows each document and reads decisions line by line.
///
/// End of input counts as quit.
pub struct TerminalReviewer<R, W> {
    lines: tokio::sync::Mutex<Lines<R>>,
    out: Mutex<W>,
}

impl TerminalReviewer<BufReader<Stdin>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), std::io::stdout())
    }
}

impl<R, W> TerminalReviewer<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: tokio::sync::Mutex::new(input.lines()),
            out: Mutex::new(out),
        }
    }

    fn print(&self, text: &str) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn render(item: &ReviewItem) -> String {
    let mut text = format!("\nDocument {}: {}\n", item.document, item.embed_url);
    if item.notes.is_empty() {
        text.push_str("  (no notes)\n");
    }
    for note in &item.notes {
        text.push_str(&format!("  {note}\n"));
    }
    text
}

#[async_trait]
impl<R, W> Reviewer for TerminalReviewer<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    async fn decide(&self, item: &ReviewItem) -> Decision {
        self.print(&render(item));

        let mut lines = self.lines.lock().await;
        loop {
            self.print(PROMPT);
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return Decision::Quit,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read answer");
                    return Decision::Quit;
                }
            };
            match parse_decision(&line) {
                Some(decision) => return decision,
                None => self.print(&format!("Unrecognised answer '{}'.\n", line.trim())),
            }
        }
    }

    async fn show_counts(&self, counts: &ReviewCounts) {
        self.print(&format!("{counts}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doccloud::types::{Note, ProjectDocument};

    fn item(notes: Vec<Note>) -> ReviewItem {
        ReviewItem {
            document: 101,
            membership: ProjectDocument {
                document: 101,
                edit_access: true,
            },
            notes,
            embed_url: "https://embed.example/documents/101".to_string(),
        }
    }

    #[test]
    fn parses_short_and_long_answers() {
        assert_eq!(
            parse_decision("s"),
            Some(Decision::Classify(Verdict::Sensitive))
        );
        assert_eq!(
            parse_decision(" Non-Sensitive\n"),
            Some(Decision::Classify(Verdict::NonSensitive))
        );
        assert_eq!(parse_decision("k"), Some(Decision::Skip));
        assert_eq!(parse_decision("q"), Some(Decision::Quit));
        assert_eq!(parse_decision("maybe"), None);
    }

    #[tokio::test]
    async fn reprompts_until_answer_is_recognised() {
        let reviewer = TerminalReviewer::new(&b"what\nn\n"[..], Vec::new());

        let decision = reviewer.decide(&item(Vec::new())).await;
        assert_eq!(decision, Decision::Classify(Verdict::NonSensitive));

        let out = String::from_utf8(reviewer.into_output()).unwrap();
        assert!(out.contains("Document 101: https://embed.example/documents/101"));
        assert!(out.contains("(no notes)"));
        assert!(out.contains("Unrecognised answer 'what'."));
        assert_eq!(out.matches(PROMPT).count(), 2);
    }

    #[tokio::test]
    async fn end_of_input_quits() {
        let reviewer = TerminalReviewer::new(&b""[..], Vec::new());
        assert_eq!(reviewer.decide(&item(Vec::new())).await, Decision::Quit);
    }

    #[tokio::test]
    async fn notes_and_counts_are_printed() {
        let note: Note = serde_json::from_value(serde_json::json!({
            "id": 1, "title": "SSN", "content": "visible", "page_number": 3
        }))
        .unwrap();
        let reviewer = TerminalReviewer::new(&b"s\n"[..], Vec::new());

        reviewer
            .show_counts(&ReviewCounts {
                non_sensitive: 1,
                sensitive: 1,
            })
            .await;
        reviewer.decide(&item(vec![note])).await;

        let out = String::from_utf8(reviewer.into_output()).unwrap();
        assert!(out.contains("false positive rate: 50.00%"));
        assert!(out.contains("  Page 3: SSN - visible"));
    }
}
