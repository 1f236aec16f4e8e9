//! Address pattern parts and their matcher fragments

/// One character of the class that may appear in a literal segment
pub(crate) const LITERAL_CLASS: &str = r"[^\s#\*,/\?\[\]\{\}]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressPartKind {
    /// `/`
    AddressSeparator,
    /// Leading `//`: match at any depth
    AddressWildcard,
    Literal,
    /// Run of `*` and `?`
    Wildcard,
    /// `[a-z]` or `[!a-z]`
    CharSpan,
    /// `[abc]` or `[!abc]`
    CharList,
    /// `{foo,bar}`
    List,
}

/// A lexical piece of an address pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressPart {
    kind: AddressPartKind,
    value: String,
    interpreted: String,
    fragment: String,
}

impl AddressPart {
    pub fn kind(&self) -> AddressPartKind {
        self.kind
    }

    /// Text as it appeared in the address
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Canonical text rebuilt from the parsed part
    pub fn interpreted(&self) -> &str {
        &self.interpreted
    }

    /// Regular expression text matching this part
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Whether this part only matches its own text
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            AddressPartKind::AddressSeparator | AddressPartKind::Literal
        )
    }

    pub(crate) fn separator() -> Self {
        Self {
            kind: AddressPartKind::AddressSeparator,
            value: "/".to_string(),
            interpreted: "/".to_string(),
            fragment: "/".to_string(),
        }
    }

    pub(crate) fn address_wildcard() -> Self {
        Self {
            kind: AddressPartKind::AddressWildcard,
            value: "//".to_string(),
            interpreted: "//".to_string(),
            fragment: "/".to_string(),
        }
    }

    pub(crate) fn literal(value: &str) -> Self {
        Self {
            kind: AddressPartKind::Literal,
            value: value.to_string(),
            interpreted: value.to_string(),
            fragment: format!("({})", escape(value)),
        }
    }

    /// `?` runs become exact-count repetitions, each `*` a zero-or-more
    /// repetition. A `?` run is only flushed by a following `*` or the end
    /// of the token.
    pub(crate) fn wildcard(value: &str) -> Self {
        let mut collapsed = value.to_string();
        while collapsed.contains("**") {
            collapsed = collapsed.replace("**", "*");
        }

        let mut fragment = String::new();
        let mut count = 0usize;

        for c in collapsed.chars() {
            match c {
                '*' => {
                    if count > 0 {
                        fragment.push_str(&format!("({}{{{}}})", LITERAL_CLASS, count));
                    }
                    count = 0;
                    fragment.push_str(&format!("({}*)", LITERAL_CLASS));
                }
                '?' => count += 1,
                _ => {}
            }
        }

        if count > 0 {
            fragment.push_str(&format!("({}{{{}}})", LITERAL_CLASS, count));
        }

        Self {
            kind: AddressPartKind::Wildcard,
            value: value.to_string(),
            interpreted: value.to_string(),
            fragment,
        }
    }

    /// `value` is the full bracketed token, e.g. `[!a-z]`. The class holds
    /// exactly the listed bounds, so a negated span also accepts `/`.
    pub(crate) fn char_span(value: &str) -> Self {
        let inner: Vec<char> = value[1..value.len() - 1].chars().collect();
        let (negate, bounds) = match inner.first() {
            Some('!') if inner.len() == 4 => (true, &inner[1..]),
            _ => (false, &inner[..]),
        };

        let (low, high) = (bounds[0], bounds[2]);
        let interpreted = format!("[{}{}-{}]", if negate { "!" } else { "" }, low, high);

        let (low, high) = if low > high { (high, low) } else { (low, high) };
        let fragment = format!(
            "[{}{}-{}]+",
            if negate { "^" } else { "" },
            escape_class(&low.to_string()),
            escape_class(&high.to_string())
        );

        Self {
            kind: AddressPartKind::CharSpan,
            value: value.to_string(),
            interpreted,
            fragment,
        }
    }

    /// `value` is the full bracketed token, e.g. `[abc]`. A lone `[!]`
    /// lists the `!` character itself.
    pub(crate) fn char_list(value: &str) -> Self {
        let inner = &value[1..value.len() - 1];
        let (negate, list) = match inner.strip_prefix('!') {
            Some(rest) if !rest.is_empty() => (true, rest),
            _ => (false, inner),
        };

        Self {
            kind: AddressPartKind::CharList,
            value: value.to_string(),
            interpreted: format!("[{}{}]", if negate { "!" } else { "" }, list),
            fragment: format!("[{}{}]+", if negate { "^" } else { "" }, escape_class(list)),
        }
    }

    /// `value` is the full braced token, e.g. `{foo,bar}`
    pub(crate) fn list(value: &str) -> Self {
        let items: Vec<&str> = value[1..value.len() - 1].split(',').collect();

        let alternatives: Vec<String> = items.iter().map(|item| format!("({})", escape(item))).collect();

        Self {
            kind: AddressPartKind::List,
            value: value.to_string(),
            interpreted: format!("{{{}}}", items.join(",")),
            fragment: format!("({})", alternatives.join("|")),
        }
    }
}

// ============ Scanning ============

/// Characters allowed in a literal run
pub(crate) fn is_literal_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '#' | '*' | ',' | '/' | '?' | '[' | ']' | '{' | '}')
}

/// Characters allowed in a `{...}` item; the same set as literals
fn is_list_item_char(c: char) -> bool {
    is_literal_char(c)
}

/// Split one segment into parts, or `None` if some text is not covered
/// by any part grammar
pub(crate) fn scan_segment(segment: &str) -> Option<Vec<AddressPart>> {
    let mut parts = Vec::new();
    let mut rest = segment;

    while !rest.is_empty() {
        let (part, len) = scan_part(rest)?;
        parts.push(part);
        rest = &rest[len..];
    }

    Some(parts)
}

/// Longest part at the start of `s`, tried in grammar priority order
fn scan_part(s: &str) -> Option<(AddressPart, usize)> {
    let literal = prefix_len(s, is_literal_char);
    if literal > 0 {
        return Some((AddressPart::literal(&s[..literal]), literal));
    }

    let wildcard = prefix_len(s, |c| c == '*' || c == '?');
    if wildcard > 0 {
        return Some((AddressPart::wildcard(&s[..wildcard]), wildcard));
    }

    if s.starts_with('[') {
        if let Some(len) = scan_char_span(s) {
            return Some((AddressPart::char_span(&s[..len]), len));
        }
        if let Some(len) = scan_char_list(s) {
            return Some((AddressPart::char_list(&s[..len]), len));
        }
        return None;
    }

    if s.starts_with('{') {
        let len = scan_list(s)?;
        return Some((AddressPart::list(&s[..len]), len));
    }

    None
}

fn prefix_len(s: &str, accept: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|(_, c)| !accept(*c))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// `[` `!`? X `-` X `]`, X a literal character other than `-`
fn scan_char_span(s: &str) -> Option<usize> {
    let bound = |c: char| is_literal_char(c) && c != '-';

    let try_at = |negate: bool| -> Option<usize> {
        let mut chars = s.char_indices().skip(if negate { 2 } else { 1 });
        let (_, low) = chars.next()?;
        let (_, dash) = chars.next()?;
        let (_, high) = chars.next()?;
        let (end, close) = chars.next()?;
        (bound(low) && dash == '-' && bound(high) && close == ']').then_some(end + 1)
    };

    if s[1..].starts_with('!') {
        if let Some(len) = try_at(true) {
            return Some(len);
        }
    }
    try_at(false)
}

/// `[` `!`? literal+ `]`
fn scan_char_list(s: &str) -> Option<usize> {
    let body = &s[1..];
    let len = prefix_len(body, is_literal_char);
    if len == 0 || !body[len..].starts_with(']') {
        return None;
    }
    Some(1 + len + 1)
}

/// `{` item (`,` item)* `}`
fn scan_list(s: &str) -> Option<usize> {
    let mut index = 1;

    loop {
        let item = prefix_len(&s[index..], is_list_item_char);
        if item == 0 {
            return None;
        }
        index += item;

        match s[index..].chars().next()? {
            ',' => index += 1,
            '}' => return Some(index + 1),
            _ => return None,
        }
    }
}

// ============ Escaping ============

fn is_meta(c: char) -> bool {
    matches!(
        c,
        '.' | '$' | '^' | '{' | '[' | '(' | '|' | ')' | '*' | '+' | '?' | '\\'
    )
}

/// Escape regular expression metacharacters in literal text
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if is_meta(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape text placed inside a bracketed class; `-` stays a range operator
fn escape_class(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if is_meta(c) || matches!(c, '&' | '~' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
