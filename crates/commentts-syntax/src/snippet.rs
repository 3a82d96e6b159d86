//! Rendered phrases: text fragments interleaved with cursor stops, and their
//! conversion to a `/** ... */` block as plain text or editor snippet syntax.

/// One piece of generated documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    /// Empty cursor stop.
    Tabstop,
    /// Cursor stop pre-filled with editable text.
    Placeholder(String),
}

/// Ordered fragments of one generated comment, without delimiters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPhrase {
    fragments: Vec<Fragment>,
}

impl RenderedPhrase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if text.is_empty() {
            return self;
        }
        match self.fragments.last_mut() {
            Some(Fragment::Text(last)) => last.push_str(text),
            _ => self.fragments.push(Fragment::Text(text.to_string())),
        }
        self
    }

    pub fn append_line(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.append(text).append("\n")
    }

    pub fn append_tabstop(&mut self) -> &mut Self {
        self.fragments.push(Fragment::Tabstop);
        self
    }

    pub fn append_placeholder(&mut self, text: impl Into<String>) -> &mut Self {
        self.fragments.push(Fragment::Placeholder(text.into()));
        self
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Body text with cursor stops dropped and placeholders filled in.
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(t) | Fragment::Placeholder(t) => out.push_str(t),
                Fragment::Tabstop => {}
            }
        }
        out
    }

    /// Body text in editor snippet syntax: `$1`, `${2:text}`, with `$`, `}`
    /// and `\` escaped in literal text.
    pub fn to_snippet(&self) -> String {
        let mut out = String::new();
        let mut index = 0;
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(t) => out.push_str(&escape_snippet(t)),
                Fragment::Tabstop => {
                    index += 1;
                    out.push_str(&format!("${}", index));
                }
                Fragment::Placeholder(t) => {
                    index += 1;
                    out.push_str(&format!("${{{}:{}}}", index, escape_snippet(t)));
                }
            }
        }
        out
    }

    /// Wrap the body into a comment block, one ` * ` prefixed line per body line.
    pub fn to_comment(&self, style: CommentStyle) -> String {
        let body = match style {
            CommentStyle::Plain => self.to_plain(),
            CommentStyle::Snippet => self.to_snippet(),
        };
        comment_block(&body)
    }
}

/// How cursor stops are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    Plain,
    Snippet,
}

/// `/**` + ` * line` per line + ` */`, each terminated by a newline.
pub fn comment_block(body: &str) -> String {
    let mut out = String::from("/**\n");
    let lines: Vec<&str> = body.split('\n').collect();
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() && i == lines.len() - 1 {
            continue;
        }
        out.push_str(" * ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(" */\n");
    out
}

fn escape_snippet(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '$' | '}' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
