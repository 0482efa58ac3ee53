use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use weft_expand::MappedTextRange;
use weft_lexer::SyntaxKind;
use weft_source::{TextRange, TextSize};

/// A macro known to the test workspace.
#[derive(Debug, Clone)]
pub(crate) enum MacroDef {
    /// Function-like: match the argument against a pattern, then
    /// substitute the bindings into a template.
    Template {
        pattern: Vec<PatternPart>,
        template: String,
    },
    /// Attribute: re-emit the item without the attribute.
    IdentityAttr,
    /// Derive: a template where `$name` is the deriving item's name.
    Derive { template: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PatternPart {
    /// A token that must appear as written.
    Literal(SmolStr),
    /// `$x`: one token.
    One(SmolStr),
    /// `$x*`: every remaining token, possibly none.
    Rest(SmolStr),
}

/// Expansion text plus its mapping to the call body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Expanded {
    pub text: String,
    pub ranges: Vec<MappedTextRange>,
}

impl Expanded {
    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    // Copy `range` of the body and record where it went.
    fn push_mapped(&mut self, body: &str, range: TextRange) {
        if range.is_empty() {
            return;
        }
        let dst = TextSize::of(self.text.as_str());
        self.text.push_str(&body[range]);
        self.ranges
            .push(MappedTextRange::new(range.start(), dst, range.len()));
    }
}

// Significant tokens with their ranges.
fn significant_tokens(text: &str) -> Vec<(SyntaxKind, TextRange)> {
    let mut offset = TextSize::from(0);
    let mut out = Vec::new();
    for token in weft_lexer::lex(text) {
        let range = TextRange::at(offset, token.len);
        offset += token.len;
        if !token.kind.is_trivia() && token.kind != SyntaxKind::Eof {
            out.push((token.kind, range));
        }
    }
    out
}

pub(crate) fn parse_pattern(pattern: &str) -> Vec<PatternPart> {
    let tokens = significant_tokens(pattern);
    let mut parts = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let (kind, range) = tokens[i];
        let next = tokens.get(i + 1).copied();
        match (kind, next) {
            (SyntaxKind::Dollar, Some((SyntaxKind::Ident, name))) => {
                let name = SmolStr::new(&pattern[name]);
                if tokens.get(i + 2).is_some_and(|(k, _)| *k == SyntaxKind::Star) {
                    parts.push(PatternPart::Rest(name));
                    i += 3;
                } else {
                    parts.push(PatternPart::One(name));
                    i += 2;
                }
            }
            _ => {
                parts.push(PatternPart::Literal(SmolStr::new(&pattern[range])));
                i += 1;
            }
        }
    }
    parts
}

/// Bind pattern variables to body-relative ranges. `None` when the body
/// does not match.
pub(crate) fn match_pattern(
    pattern: &[PatternPart],
    body: &str,
) -> Option<FxHashMap<SmolStr, TextRange>> {
    let tokens = significant_tokens(body);
    let mut bindings = FxHashMap::default();
    let mut i = 0;
    for part in pattern {
        match part {
            PatternPart::Literal(text) => {
                let (_, range) = tokens.get(i)?;
                if &body[*range] != text.as_str() {
                    return None;
                }
                i += 1;
            }
            PatternPart::One(name) => {
                let (_, range) = tokens.get(i)?;
                bindings.insert(name.clone(), *range);
                i += 1;
            }
            PatternPart::Rest(name) => {
                let range = match (tokens.get(i), tokens.last()) {
                    (Some((_, first)), Some((_, last))) => first.cover(*last),
                    _ => TextRange::empty(TextSize::of(body)),
                };
                bindings.insert(name.clone(), range);
                i = tokens.len();
            }
        }
    }
    (i == tokens.len()).then_some(bindings)
}

/// Copy `template`, replacing each `$name` with the bound body text.
pub(crate) fn substitute(
    template: &str,
    bindings: &FxHashMap<SmolStr, TextRange>,
    body: &str,
) -> Expanded {
    let mut out = Expanded {
        text: String::new(),
        ranges: Vec::new(),
    };
    let mut offset = TextSize::from(0);
    let tokens = weft_lexer::lex(template);
    let mut i = 0;
    while i < tokens.len() {
        let range = TextRange::at(offset, tokens[i].len);
        if tokens[i].kind == SyntaxKind::Dollar
            && tokens.get(i + 1).is_some_and(|t| t.kind == SyntaxKind::Ident)
        {
            let name_range = TextRange::at(range.end(), tokens[i + 1].len);
            if let Some(bound) = bindings.get(&template[name_range]) {
                out.push_mapped(body, *bound);
                offset = name_range.end();
                i += 2;
                continue;
            }
        }
        out.push_text(&template[range]);
        offset = range.end();
        i += 1;
    }
    out
}

/// Re-emit `item` without the attribute at `attr` (both item-relative),
/// dropping whitespace that followed the attribute.
pub(crate) fn strip_attribute(item: &str, attr: TextRange) -> Expanded {
    let after = &item[usize::from(attr.end())..];
    let skipped = after.len() - after.trim_start().len();
    let rest_start = attr.end() + TextSize::of(&after[..skipped]);
    let mut out = Expanded {
        text: String::new(),
        ranges: Vec::new(),
    };
    out.push_mapped(item, TextRange::up_to(attr.start()));
    out.push_mapped(item, TextRange::new(rest_start, TextSize::of(item)));
    out
}
