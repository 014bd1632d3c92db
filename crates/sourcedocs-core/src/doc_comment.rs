//! Documentation comments
//!
//! Records either carry pre-split documentation fields or the raw comment
//! text. Raw text is parsed here using Swift markup callouts:
//!
//! ```text
//! Summary paragraph.
//!
//! Discussion, code blocks and anything else.
//!
//! - Parameters:
//!   - name: Description
//! - Parameter other: Description
//! - Returns: Description
//! - Throws: Description
//! ```

use std::sync::OnceLock;

use regex::Regex;

/// Parsed documentation comment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocComment {
    /// Brief summary (first paragraph)
    pub summary: String,
    /// Discussion (everything that is not summary or a callout)
    pub discussion: Option<String>,
    /// Parameter documentation, in declaration order
    pub params: Vec<ParamDoc>,
    /// Return value documentation
    pub returns: Option<String>,
    /// Thrown errors documentation
    pub throws: Option<String>,
}

/// Documentation for a function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDoc {
    pub name: String,
    pub description: String,
}

impl ParamDoc {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Section being parsed
#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Summary,
    Discussion,
    Parameters,
    Parameter,
    Returns,
    Throws,
}

/// A recognized callout line
enum Callout {
    Parameters,
    Parameter(String, String),
    Returns(String),
    Throws(String),
}

fn callout_patterns() -> &'static [Regex; 4] {
    static PATTERNS: OnceLock<[Regex; 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"^[-*+]\s*(?i:parameters)\s*:\s*$").expect("valid regex"),
            Regex::new(r"^[-*+]\s*(?i:parameter)\s+([^\s:]+)\s*:\s*(.*)$").expect("valid regex"),
            Regex::new(r"^[-*+]\s*(?i:returns?)\s*:\s*(.*)$").expect("valid regex"),
            Regex::new(r"^[-*+]\s*(?i:throws)\s*:\s*(.*)$").expect("valid regex"),
        ]
    })
}

fn param_item_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[-*+]\s*([^\s:]+)\s*:\s*(.*)$").expect("valid regex"))
}

fn parse_callout(line: &str) -> Option<Callout> {
    let [parameters, parameter, returns, throws] = callout_patterns();
    if parameters.is_match(line) {
        return Some(Callout::Parameters);
    }
    if let Some(caps) = parameter.captures(line) {
        return Some(Callout::Parameter(caps[1].to_string(), caps[2].trim().to_string()));
    }
    if let Some(caps) = returns.captures(line) {
        return Some(Callout::Returns(caps[1].trim().to_string()));
    }
    if let Some(caps) = throws.captures(line) {
        return Some(Callout::Throws(caps[1].trim().to_string()));
    }
    None
}

fn append(target: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

impl DocComment {
    /// Parse a doc comment from raw text
    pub fn parse(text: &str) -> Self {
        let mut doc = DocComment::default();

        let mut section = Section::Summary;
        let mut summary_lines: Vec<&str> = Vec::new();
        let mut discussion_lines: Vec<&str> = Vec::new();
        let mut returns = String::new();
        let mut throws = String::new();
        let mut in_code_block = false;

        for line in text.lines() {
            let trimmed = line.trim();

            // Code blocks always belong to the discussion, verbatim
            if trimmed.starts_with("```") {
                in_code_block = !in_code_block;
                section = Section::Discussion;
                discussion_lines.push(line.trim_end());
                continue;
            }
            if in_code_block {
                discussion_lines.push(line.trim_end());
                continue;
            }

            if let Some(callout) = parse_callout(trimmed) {
                match callout {
                    Callout::Parameters => section = Section::Parameters,
                    Callout::Parameter(name, desc) => {
                        doc.params.push(ParamDoc::new(name, desc));
                        section = Section::Parameter;
                    }
                    Callout::Returns(desc) => {
                        append(&mut returns, &desc);
                        section = Section::Returns;
                    }
                    Callout::Throws(desc) => {
                        append(&mut throws, &desc);
                        section = Section::Throws;
                    }
                }
                continue;
            }

            if section == Section::Parameters {
                if let Some(caps) = param_item_pattern().captures(trimmed) {
                    doc.params
                        .push(ParamDoc::new(&caps[1], caps[2].trim()));
                    continue;
                }
            }

            match section {
                Section::Summary => {
                    if trimmed.is_empty() {
                        if !summary_lines.is_empty() {
                            section = Section::Discussion;
                        }
                    } else {
                        summary_lines.push(trimmed);
                    }
                }
                Section::Discussion => discussion_lines.push(line.trim_end()),
                Section::Parameters | Section::Parameter => {
                    if trimmed.is_empty() {
                        section = Section::Discussion;
                    } else if let Some(last) = doc.params.last_mut() {
                        append(&mut last.description, trimmed);
                    }
                }
                Section::Returns => {
                    if trimmed.is_empty() {
                        section = Section::Discussion;
                    } else {
                        append(&mut returns, trimmed);
                    }
                }
                Section::Throws => {
                    if trimmed.is_empty() {
                        section = Section::Discussion;
                    } else {
                        append(&mut throws, trimmed);
                    }
                }
            }
        }

        doc.summary = summary_lines.join(" ");

        let discussion = discussion_lines.join("\n");
        let discussion = discussion.trim_matches('\n').trim_end();
        if !discussion.is_empty() {
            doc.discussion = Some(discussion.to_string());
        }
        if !returns.is_empty() {
            doc.returns = Some(returns);
        }
        if !throws.is_empty() {
            doc.throws = Some(throws);
        }

        doc
    }

    /// Check if the doc comment is empty
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
            && self.discussion.is_none()
            && self.params.is_empty()
            && self.returns.is_none()
            && self.throws.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_doc() {
        let doc = DocComment::parse("This is a public class named Foo");
        assert_eq!(doc.summary, "This is a public class named Foo");
        assert!(doc.discussion.is_none());
    }

    #[test]
    fn test_parse_summary_spans_lines() {
        let doc = DocComment::parse("First line\ncontinues here.\n\nMore details.");
        assert_eq!(doc.summary, "First line continues here.");
        assert_eq!(doc.discussion.as_deref(), Some("More details."));
    }

    #[test]
    fn test_parse_parameters_block() {
        let text = "Global method.\n\n- Parameters:\n  - param1: The first one\n  - param2: The second\n    one, continued\n- Returns: Nothing useful";
        let doc = DocComment::parse(text);
        assert_eq!(doc.summary, "Global method.");
        assert_eq!(
            doc.params,
            vec![
                ParamDoc::new("param1", "The first one"),
                ParamDoc::new("param2", "The second one, continued"),
            ]
        );
        assert_eq!(doc.returns.as_deref(), Some("Nothing useful"));
        assert!(doc.discussion.is_none());
    }

    #[test]
    fn test_parse_single_parameter_callouts() {
        let text = "Speak.\n- Parameter volume: How loud\n- Throws: `SpeechError` when mute";
        let doc = DocComment::parse(text);
        assert_eq!(doc.params, vec![ParamDoc::new("volume", "How loud")]);
        assert_eq!(doc.throws.as_deref(), Some("`SpeechError` when mute"));
    }

    #[test]
    fn test_code_block_preserved() {
        let text = "Make a dog.\n\n```swift\nlet dog = Dog()\n    dog.bark()\n```";
        let doc = DocComment::parse(text);
        let discussion = doc.discussion.unwrap();
        assert!(discussion.contains("```swift"));
        assert!(discussion.contains("    dog.bark()"));
    }

    #[test]
    fn test_plain_list_stays_in_discussion() {
        let text = "Summary.\n\n- first\n- second";
        let doc = DocComment::parse(text);
        assert!(doc.params.is_empty());
        assert_eq!(doc.discussion.as_deref(), Some("- first\n- second"));
    }

    #[test]
    fn test_empty() {
        assert!(DocComment::parse("").is_empty());
        assert!(!DocComment::parse("x").is_empty());
    }
}
