use regex::Regex;
use std::path::Path;

/// Converts article HTML into lightweight markdown-ish text.
///
/// This is pattern substitution, not parsing: malformed markup degrades the
/// output but never fails the conversion.
pub struct HtmlNormalizer {
    scripts: Regex,
    article: Regex,
    rules: Vec<(Regex, &'static str)>,
    excess_newlines: Regex,
}

impl HtmlNormalizer {
    pub fn new() -> Result<Self, regex::Error> {
        let rule = |pattern: &str, replacement: &'static str| -> Result<(Regex, &'static str), regex::Error> {
            Ok((Regex::new(pattern)?, replacement))
        };

        let rules = vec![
            rule(r"(?is)<h[1-6]\b[^>]*>(.*?)</h[1-6]\s*>", "\n# ${1}\n")?,
            rule(r"(?is)<p\b[^>]*>(.*?)</p\s*>", "\n\n${1}\n\n")?,
            rule(
                r"(?is)<pre\b[^>]*>\s*(?:<code\b[^>]*>)?(.*?)(?:</code\s*>)?\s*</pre\s*>",
                "\n```\n${1}\n```\n",
            )?,
            rule(r"(?is)<(?:strong|b)\b[^>]*>(.*?)</(?:strong|b)\s*>", "**${1}**")?,
            rule(r"(?is)<(?:em|i)\b[^>]*>(.*?)</(?:em|i)\s*>", "*${1}*")?,
            rule(r"(?is)<code\b[^>]*>(.*?)</code\s*>", "`${1}`")?,
            rule(
                r#"(?is)<a\s[^>]*?href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))[^>]*>(.*?)</a\s*>"#,
                "[${4}](${1}${2}${3})",
            )?,
            // Only real tags, comments and doctypes; a bare `<` in prose is text.
            rule(r"(?s)<!--.*?-->|</?[A-Za-z][^>]*>|<[!?][^>]*>", "")?,
        ];

        Ok(Self {
            scripts: Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>")?,
            article: Regex::new(r"(?is)<article\b[^>]*>(.*?)</article\s*>")?,
            rules,
            excess_newlines: Regex::new(r"\n{3,}")?,
        })
    }

    pub fn to_text(&self, html: &str) -> String {
        // CRLF pages would otherwise escape newline collapsing.
        // Scripts go before the <article> cut so markup inside a script string
        // cannot select the wrong region.
        let html = html.replace("\r\n", "\n");
        let mut text = self.scripts.replace_all(&html, "").into_owned();

        let article = self
            .article
            .captures(&text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());
        if let Some(inner) = article {
            text = inner;
        }

        for (pattern, replacement) in &self.rules {
            text = pattern.replace_all(&text, *replacement).into_owned();
        }

        let text = decode_entities(&text);
        let text = self.excess_newlines.replace_all(&text, "\n\n");
        text.trim().to_string()
    }
}

/// `&amp;` goes last so an escaped entity such as `&amp;lt;` is decoded only once.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Fence language for a file path: its lowercased extension, or empty.
pub fn language_hint(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default()
}
